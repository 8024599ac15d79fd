//! CGMES equipment model inspection.
//!
//! The model is scanned as plain text with regular expressions rather than
//! parsed as RDF/XML. Each scan is independent, so a malformed region of the
//! file only affects the scans that touch it.

pub mod analysis;
pub mod model;
pub mod patterns;
pub mod verify;

pub use analysis::{ModelIssue, ModelReport, definitive_analysis};
pub use model::CgmesDocument;
pub use verify::{VerificationReport, verify_specific_values};

use serde::Serialize;

use crate::config::Config;
use crate::core::constants::cgmes;

/// Targets of the transformer, line and sanity scans
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CgmesOptions {
    pub transformer_id: String,
    pub transformer_label: String,
    pub line_name: String,
    pub expected_windings: usize,
    pub suspect_ids: Vec<String>,
}

impl Default for CgmesOptions {
    fn default() -> Self {
        Self {
            transformer_id: cgmes::DEFAULT_TRANSFORMER_ID.to_string(),
            transformer_label: cgmes::DEFAULT_TRANSFORMER_LABEL.to_string(),
            line_name: cgmes::DEFAULT_LINE_NAME.to_string(),
            expected_windings: cgmes::EXPECTED_WINDINGS,
            suspect_ids: cgmes::SUSPECT_LIMIT_TYPE_IDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CgmesOptions {
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            transformer_id: config
                .transformer_id
                .clone()
                .unwrap_or(defaults.transformer_id),
            transformer_label: config
                .transformer_label
                .clone()
                .unwrap_or(defaults.transformer_label),
            line_name: config.line_name.clone().unwrap_or(defaults.line_name),
            expected_windings: config
                .expected_windings
                .unwrap_or(defaults.expected_windings),
            suspect_ids: config.suspect_ids.clone().unwrap_or(defaults.suspect_ids),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::CgmesOptions;

    /// Small equipment model with one of every defect the scans look for
    pub const SAMPLE_MODEL: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:cim="http://iec.ch/TC57/2013/CIM-schema-cim16#" xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
<cim:GeneratingUnit rdf:ID="_gu1">
  <cim:IdentifiedObject.name>NL-G1</cim:IdentifiedObject.name>
  <cim:GeneratingUnit.maxOperatingP>500</cim:GeneratingUnit.maxOperatingP>
</cim:GeneratingUnit>
<cim:GeneratingUnit rdf:ID="_gu2">
  <cim:IdentifiedObject.name>NL-G2</cim:IdentifiedObject.name>
  <cim:GeneratingUnit.maxOperatingP>250.5</cim:GeneratingUnit.maxOperatingP>
</cim:GeneratingUnit>
<cim:PowerTransformerEnd rdf:ID="_end1">
  <cim:PowerTransformerEnd.PowerTransformer rdf:resource="#_2184f365-8cd5-4b5d-8a28-9d68603bb6a4"/>
  <cim:IdentifiedObject.name>NL_TR2_2_W1</cim:IdentifiedObject.name>
  <cim:PowerTransformerEnd.ratedU>220</cim:PowerTransformerEnd.ratedU>
  <cim:TransformerEnd.endNumber>1</cim:TransformerEnd.endNumber>
</cim:PowerTransformerEnd>
<cim:PowerTransformerEnd rdf:ID="_end2">
  <cim:PowerTransformerEnd.PowerTransformer rdf:resource="#_2184f365-8cd5-4b5d-8a28-9d68603bb6a4"/>
  <cim:IdentifiedObject.name>NL_TR2_2_W2</cim:IdentifiedObject.name>
  <cim:PowerTransformerEnd.ratedU>110</cim:PowerTransformerEnd.ratedU>
  <cim:TransformerEnd.endNumber>2</cim:TransformerEnd.endNumber>
</cim:PowerTransformerEnd>
<cim:PowerTransformerEnd rdf:ID="_end1">
  <cim:PowerTransformerEnd.PowerTransformer rdf:resource="#_2184f365-8cd5-4b5d-8a28-9d68603bb6a4"/>
  <cim:IdentifiedObject.name>NL_TR2_2_W1_copy</cim:IdentifiedObject.name>
  <cim:PowerTransformerEnd.ratedU>225</cim:PowerTransformerEnd.ratedU>
  <cim:TransformerEnd.endNumber>1</cim:TransformerEnd.endNumber>
</cim:PowerTransformerEnd>
<cim:OperationalLimitSet rdf:ID="_ols1">
  <cim:IdentifiedObject.name>NL-Line_5 side 1</cim:IdentifiedObject.name>
  <cim:CurrentLimit rdf:ID="_cl1">
    <cim:IdentifiedObject.name>PATL</cim:IdentifiedObject.name>
    <cim:CurrentLimit.normalValue>1000</cim:CurrentLimit.normalValue>
  </cim:CurrentLimit>
  <cim:CurrentLimit rdf:ID="_cl2">
    <cim:IdentifiedObject.name>TATL</cim:IdentifiedObject.name>
    <cim:CurrentLimit.normalValue>1200</cim:CurrentLimit.normalValue>
  </cim:CurrentLimit>
</cim:OperationalLimitSet>
<cim:OperationalLimitSet rdf:ID="_ols2">
  <cim:IdentifiedObject.name>NL-Line_5 side 2</cim:IdentifiedObject.name>
  <cim:CurrentLimit rdf:ID="_cl3">
    <cim:IdentifiedObject.name>PATL</cim:IdentifiedObject.name>
    <cim:CurrentLimit.normalValue>1000</cim:CurrentLimit.normalValue>
  </cim:CurrentLimit>
</cim:OperationalLimitSet>
<cim:OperationalLimitSet rdf:ID="_ols3">
  <cim:IdentifiedObject.name>NL-Line_7 side 1</cim:IdentifiedObject.name>
  <cim:CurrentLimit rdf:ID="_cl4">
    <cim:IdentifiedObject.name>PATL</cim:IdentifiedObject.name>
    <cim:CurrentLimit.normalValue>800</cim:CurrentLimit.normalValue>
  </cim:CurrentLimit>
</cim:OperationalLimitSet>
<cim:OperationalLimitType rdf:ID="_bf2a4896-2e92-465b-b5f9-b033993a318">
  <cim:OperationalLimitType.acceptableDuration>600</cim:OperationalLimitType.acceptableDuration>
</cim:OperationalLimitType>
<cim:SynchronousMachine rdf:ID="_sm1">
  <cim:IdentifiedObject.name>NL-G1</cim:IdentifiedObject.name>
  <cim:RegulatingCondEq.RegulatingControl rdf:resource="#_rc1"/>
</cim:SynchronousMachine>
<cim:SynchronousMachine rdf:ID="_sm2">
  <cim:IdentifiedObject.name>NL-G2</cim:IdentifiedObject.name>
  <cim:RegulatingCondEq.RegulatingControl rdf:resource="#_rc2"/>
</cim:SynchronousMachine>
<cim:SynchronousMachine rdf:ID="_sm3">
  <cim:IdentifiedObject.name>NL-G3</cim:IdentifiedObject.name>
</cim:SynchronousMachine>
<cim:LoadArea>
  <cim:IdentifiedObject.name>NL</cim:IdentifiedObject.name>
</rdf:RDF>
"##;

    pub fn options() -> CgmesOptions {
        CgmesOptions::default()
    }
}
