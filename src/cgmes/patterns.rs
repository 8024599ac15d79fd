//! Regular expressions used to scan CGMES equipment files.
//!
//! All block patterns run with dot-matches-newline and lazy quantifiers, so a
//! block ends at the first closing tag after its opening tag.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::Result;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static CGMES pattern must compile")
}

/// GeneratingUnit name followed by its maxOperatingP
pub static GENERATING_UNIT: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?s)<cim:GeneratingUnit[^>]*>.*?<cim:IdentifiedObject\.name>(.*?)</cim:IdentifiedObject\.name>.*?<cim:GeneratingUnit\.maxOperatingP>(.*?)</cim:GeneratingUnit\.maxOperatingP>",
    )
});

pub static IDENTIFIED_NAME: Lazy<Regex> =
    Lazy::new(|| compile(r"<cim:IdentifiedObject\.name>(.*?)</cim:IdentifiedObject\.name>"));

pub static RATED_U: Lazy<Regex> = Lazy::new(|| {
    compile(r"<cim:PowerTransformerEnd\.ratedU>(.*?)</cim:PowerTransformerEnd\.ratedU>")
});

pub static END_NUMBER: Lazy<Regex> =
    Lazy::new(|| compile(r"<cim:TransformerEnd\.endNumber>(.*?)</cim:TransformerEnd\.endNumber>"));

pub static CURRENT_LIMIT: Lazy<Regex> =
    Lazy::new(|| compile(r"(?s)<cim:CurrentLimit.*?</cim:CurrentLimit>"));

pub static LIMIT_KIND: Lazy<Regex> = Lazy::new(|| {
    compile(r"<cim:IdentifiedObject\.name>(PATL|TATL)</cim:IdentifiedObject\.name>")
});

pub static NORMAL_VALUE: Lazy<Regex> = Lazy::new(|| {
    compile(r"<cim:CurrentLimit\.normalValue>(.*?)</cim:CurrentLimit\.normalValue>")
});

pub static SYNCHRONOUS_MACHINE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?s)<cim:SynchronousMachine[^>]*>.*?</cim:SynchronousMachine>"));

pub static RDF_ID: Lazy<Regex> = Lazy::new(|| compile(r#"rdf:ID="(_[^"]*)""#));

pub static ALL_PATL: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?s)<cim:IdentifiedObject\.name>PATL</cim:IdentifiedObject\.name>.*?<cim:CurrentLimit\.normalValue>(\d+)</cim:CurrentLimit\.normalValue>",
    )
});

pub static ALL_TATL: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?s)<cim:IdentifiedObject\.name>TATL</cim:IdentifiedObject\.name>.*?<cim:CurrentLimit\.normalValue>(\d+)</cim:CurrentLimit\.normalValue>",
    )
});

/// PowerTransformerEnd blocks that reference `transformer_id`
pub fn transformer_ends(transformer_id: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r##"(?s)<cim:PowerTransformerEnd[^>]*>.*?<cim:PowerTransformerEnd\.PowerTransformer rdf:resource="#{}".*?</cim:PowerTransformerEnd>"##,
        regex::escape(transformer_id)
    ))?)
}

/// Single-line references from a PowerTransformerEnd to `transformer_id`
pub fn transformer_end_references(transformer_id: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r##"<cim:PowerTransformerEnd.*?PowerTransformer rdf:resource="#{}""##,
        regex::escape(transformer_id)
    ))?)
}

/// OperationalLimitSet blocks mentioning `line_name`
pub fn limit_sets_for(line_name: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?s)<cim:OperationalLimitSet.*?{}.*?</cim:OperationalLimitSet>",
        regex::escape(line_name)
    ))?)
}

/// Integer CurrentLimit values reached from a limit set mentioning `line_name`
pub fn direct_line_limits(line_name: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?s)<cim:OperationalLimitSet.*?{}.*?CurrentLimit.*?normalValue>(\d+)</cim:CurrentLimit\.normalValue>",
        regex::escape(line_name)
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_patterns_compile() {
        for pattern in [
            &GENERATING_UNIT,
            &IDENTIFIED_NAME,
            &RATED_U,
            &END_NUMBER,
            &CURRENT_LIMIT,
            &LIMIT_KIND,
            &NORMAL_VALUE,
            &SYNCHRONOUS_MACHINE,
            &RDF_ID,
            &ALL_PATL,
            &ALL_TATL,
        ] {
            assert!(!pattern.as_str().is_empty());
        }
    }

    #[test]
    fn test_dynamic_patterns_escape_input() {
        let re = limit_sets_for("Line.(5)").unwrap();
        assert!(re.as_str().contains(r"Line\.\(5\)"));
        assert!(transformer_ends("_abc-123").is_ok());
        assert!(transformer_end_references("_abc-123").is_ok());
        assert!(direct_line_limits("NL-Line_5").is_ok());
    }

    #[test]
    fn test_rdf_id_pattern() {
        let ids: Vec<_> = RDF_ID
            .captures_iter(r#"<a rdf:ID="_one"/><b rdf:ID="two"/><c rdf:ID="_three"/>"#)
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(ids, vec!["_one", "_three"]);
    }
}
