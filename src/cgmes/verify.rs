use serde::Serialize;

use super::CgmesOptions;
use super::analysis::tally;
use super::model::CgmesDocument;
use super::patterns;
use crate::core::error::Result;

/// Direct cross-checks of the values the analysis reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub transformer_label: String,
    /// PowerTransformerEnd lines that reference the transformer
    pub transformer_end_refs: usize,
    pub line_name: String,
    /// Integer limits found right after a limit set naming the line
    pub line_limit_values: Vec<String>,
    /// Every integer PATL value in the file, most common first
    pub patl_counts: Vec<(String, usize)>,
    /// Every integer TATL value in the file, most common first
    pub tatl_counts: Vec<(String, usize)>,
}

fn captured(re: &regex::Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

pub fn verify_specific_values(
    doc: &CgmesDocument,
    options: &CgmesOptions,
) -> Result<VerificationReport> {
    let content = doc.content();

    let transformer_end_refs = patterns::transformer_end_references(&options.transformer_id)?
        .find_iter(content)
        .count();
    let line_limit_values = captured(&patterns::direct_line_limits(&options.line_name)?, content);

    let patl = captured(&patterns::ALL_PATL, content);
    let tatl = captured(&patterns::ALL_TATL, content);

    Ok(VerificationReport {
        transformer_label: options.transformer_label.clone(),
        transformer_end_refs,
        line_name: options.line_name.clone(),
        line_limit_values,
        patl_counts: tally(&patl),
        tatl_counts: tally(&tatl),
    })
}
