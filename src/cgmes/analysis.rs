use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::CgmesOptions;
use super::model::CgmesDocument;
use super::patterns;
use crate::core::error::{GridProbeError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratorCapacity {
    pub name: String,
    pub max_operating_p_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Winding {
    pub end_number: String,
    pub name: String,
    /// ratedU as written in the model, in kV
    pub rated_u_kv: String,
}

/// Where the current limits for the line were taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitScope {
    /// OperationalLimitSets that mention the line
    LineLimitSets,
    /// No set mentioned the line; every CurrentLimit in the file
    WholeFile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineLimits {
    pub scope: LimitScope,
    pub patl_values: Vec<f64>,
    pub tatl_values: Vec<f64>,
    /// Most common PATL value in amperes
    pub patl: Option<f64>,
    /// Most common TATL value in amperes
    pub tatl: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackAnalysis {
    /// Machines referencing a RegulatingControl, in file order
    pub regulated_generators: Vec<String>,
    /// Last regulated machine; the likely slack
    pub slack: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelIssue {
    DuplicateIds { count: usize },
    MalformedLoadArea,
    LimitTypeIdMismatch { id: String },
    ExtraWindings { transformer: String, found: usize, expected: usize },
}

impl fmt::Display for ModelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelIssue::DuplicateIds { count } => {
                write!(f, "Duplicate element IDs found: {count} duplicates")
            }
            ModelIssue::MalformedLoadArea => {
                write!(f, "Malformed LoadArea tags (missing closing tag)")
            }
            ModelIssue::LimitTypeIdMismatch { .. } => {
                write!(f, "OperationalLimitType ID mismatch in TATL definition")
            }
            ModelIssue::ExtraWindings {
                transformer,
                found,
                expected,
            } => write!(
                f,
                "Transformer {transformer} has {found} winding definitions (expected {expected})"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelReport {
    pub generators: Vec<GeneratorCapacity>,
    pub total_capacity_mw: f64,
    pub transformer_label: String,
    pub windings: Vec<Winding>,
    pub winding_definitions: usize,
    pub line_name: String,
    pub limits: LineLimits,
    pub slack: SlackAnalysis,
    pub issues: Vec<ModelIssue>,
}

/// Count occurrences, most common first; ties keep first-seen order.
pub fn tally<T: PartialEq + Clone>(values: &[T]) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| seen == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value.clone(), 1)),
        }
    }
    // sort_by is stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn most_common<T: PartialEq + Clone>(values: &[T]) -> Option<T> {
    tally(values).into_iter().next().map(|(v, _)| v)
}

fn parse_f64(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| GridProbeError::parse(field, raw))
}

pub fn generator_capacities(doc: &CgmesDocument) -> Result<Vec<GeneratorCapacity>> {
    patterns::GENERATING_UNIT
        .captures_iter(doc.content())
        .map(|caps| {
            Ok(GeneratorCapacity {
                name: caps[1].to_string(),
                max_operating_p_mw: parse_f64("GeneratingUnit.maxOperatingP", &caps[2])?,
            })
        })
        .collect()
}

/// PowerTransformerEnd blocks of one transformer, duplicates included
pub fn transformer_end_blocks<'a>(
    doc: &'a CgmesDocument,
    transformer_id: &str,
) -> Result<Vec<&'a str>> {
    let re = patterns::transformer_ends(transformer_id)?;
    Ok(re.find_iter(doc.content()).map(|m| m.as_str()).collect())
}

/// One winding per end number, first definition wins, ordered by end number
pub fn windings_from_blocks(blocks: &[&str]) -> Vec<Winding> {
    let mut windings: BTreeMap<String, Winding> = BTreeMap::new();
    for block in blocks {
        let voltage = patterns::RATED_U.captures(block);
        let end_number = patterns::END_NUMBER.captures(block);
        let (Some(voltage), Some(end_number)) = (voltage, end_number) else {
            continue;
        };

        let end_number = end_number[1].to_string();
        if windings.contains_key(&end_number) {
            continue;
        }
        let name = patterns::IDENTIFIED_NAME
            .captures(block)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| format!("Winding {end_number}"));

        windings.insert(
            end_number.clone(),
            Winding {
                end_number,
                name,
                rated_u_kv: voltage[1].to_string(),
            },
        );
    }
    windings.into_values().collect()
}

pub fn line_limits(doc: &CgmesDocument, line_name: &str) -> Result<LineLimits> {
    let sets = patterns::limit_sets_for(line_name)?;
    let mut blocks: Vec<&str> = sets
        .find_iter(doc.content())
        .flat_map(|set| patterns::CURRENT_LIMIT.find_iter(set.as_str()))
        .map(|m| m.as_str())
        .collect();

    let scope = if blocks.is_empty() {
        blocks = patterns::CURRENT_LIMIT
            .find_iter(doc.content())
            .map(|m| m.as_str())
            .collect();
        LimitScope::WholeFile
    } else {
        LimitScope::LineLimitSets
    };

    let mut patl_values = Vec::new();
    let mut tatl_values = Vec::new();
    for block in blocks {
        let (Some(kind), Some(value)) = (
            patterns::LIMIT_KIND.captures(block),
            patterns::NORMAL_VALUE.captures(block),
        ) else {
            continue;
        };
        let value = parse_f64("CurrentLimit.normalValue", &value[1])?;
        match &kind[1] {
            "PATL" => patl_values.push(value),
            "TATL" => tatl_values.push(value),
            _ => {}
        }
    }

    Ok(LineLimits {
        scope,
        patl: most_common(&patl_values),
        tatl: most_common(&tatl_values),
        patl_values,
        tatl_values,
    })
}

pub fn slack_candidates(doc: &CgmesDocument) -> SlackAnalysis {
    let regulated_generators: Vec<String> = patterns::SYNCHRONOUS_MACHINE
        .find_iter(doc.content())
        .map(|m| m.as_str())
        .filter(|machine| machine.contains("RegulatingControl"))
        .filter_map(|machine| {
            patterns::IDENTIFIED_NAME
                .captures(machine)
                .map(|c| c[1].to_string())
        })
        .collect();

    SlackAnalysis {
        slack: regulated_generators.last().cloned(),
        regulated_generators,
    }
}

/// Number of `rdf:ID="_..."` values that occur more than once
pub fn duplicate_id_count(doc: &CgmesDocument) -> usize {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for caps in patterns::RDF_ID.captures_iter(doc.content()) {
        if let Some(id) = caps.get(1) {
            *counts.entry(id.as_str()).or_insert(0) += 1;
        }
    }
    counts.values().filter(|&&n| n > 1).count()
}

pub fn detect_issues(
    doc: &CgmesDocument,
    options: &CgmesOptions,
    winding_definitions: usize,
) -> Vec<ModelIssue> {
    let mut issues = Vec::new();

    let duplicates = duplicate_id_count(doc);
    if duplicates > 0 {
        issues.push(ModelIssue::DuplicateIds { count: duplicates });
    }

    if doc.contains("<cim:LoadArea>") && !doc.contains("</cim:LoadArea>") {
        issues.push(ModelIssue::MalformedLoadArea);
    }

    if let Some(id) = options
        .suspect_ids
        .iter()
        .find(|id| doc.contains(&format!("rdf:ID=\"{id}\"")))
    {
        issues.push(ModelIssue::LimitTypeIdMismatch { id: id.clone() });
    }

    if winding_definitions > options.expected_windings {
        issues.push(ModelIssue::ExtraWindings {
            transformer: options.transformer_label.clone(),
            found: winding_definitions,
            expected: options.expected_windings,
        });
    }

    issues
}

/// Run every scan over the model and collect the findings.
pub fn definitive_analysis(doc: &CgmesDocument, options: &CgmesOptions) -> Result<ModelReport> {
    let generators = generator_capacities(doc)?;
    let total_capacity_mw = generators.iter().map(|g| g.max_operating_p_mw).sum();

    let blocks = transformer_end_blocks(doc, &options.transformer_id)?;
    let windings = windings_from_blocks(&blocks);

    let limits = line_limits(doc, &options.line_name)?;
    let slack = slack_candidates(doc);
    let issues = detect_issues(doc, options, blocks.len());

    Ok(ModelReport {
        generators,
        total_capacity_mw,
        transformer_label: options.transformer_label.clone(),
        windings,
        winding_definitions: blocks.len(),
        line_name: options.line_name.clone(),
        limits,
        slack,
        issues,
    })
}
