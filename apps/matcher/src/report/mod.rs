//! Match report — the validated result of comparing a CV to a job description.
//!
//! Reports only ever come from the body of a successful analysis response and
//! are immutable once parsed. `parse_report` is the single way to build one,
//! so every `MatchReport` in the process has already passed validation.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod percentage;

pub use percentage::Percentage;

// ────────────────────────────────────────────────────────────────────────────
// Keys
// ────────────────────────────────────────────────────────────────────────────

/// The two metrics every report carries. The label doubles as the wire key
/// and the display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetricKey {
    OverallMatch,
    SkillsMatch,
}

impl MetricKey {
    /// Fixed display order.
    pub const ALL: [MetricKey; 2] = [MetricKey::OverallMatch, MetricKey::SkillsMatch];

    pub fn label(self) -> &'static str {
        match self {
            MetricKey::OverallMatch => "Overall Match",
            MetricKey::SkillsMatch => "Skills Match",
        }
    }
}

/// Skill category as reported by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    /// Present in both the CV and the job description.
    Matching,
    /// Required by the job but absent from the CV.
    Missing,
    /// Present in the CV but not required.
    Additional,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 3] = [
        SkillCategory::Matching,
        SkillCategory::Missing,
        SkillCategory::Additional,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SkillCategory::Matching => "Matching Skills",
            SkillCategory::Missing => "Missing Skills",
            SkillCategory::Additional => "Additional Skills",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report
// ────────────────────────────────────────────────────────────────────────────

/// Serializes back into the wire shape it was parsed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub metrics: Metrics,
    pub skills_analysis: SkillsAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    #[serde(rename = "Overall Match")]
    overall_match: Percentage,
    #[serde(rename = "Skills Match")]
    skills_match: Percentage,
}

impl Metrics {
    pub fn new(overall_match: Percentage, skills_match: Percentage) -> Self {
        Self {
            overall_match,
            skills_match,
        }
    }

    pub fn get(&self, key: MetricKey) -> &Percentage {
        match key {
            MetricKey::OverallMatch => &self.overall_match,
            MetricKey::SkillsMatch => &self.skills_match,
        }
    }
}

/// Skill lists in source order. Duplicates and overlaps between lists are
/// preserved as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillsAnalysis {
    #[serde(rename = "Matching Skills")]
    pub matching: Vec<String>,
    #[serde(rename = "Missing Skills")]
    pub missing: Vec<String>,
    #[serde(rename = "Additional Skills")]
    pub additional: Vec<String>,
}

impl SkillsAnalysis {
    pub fn skills(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::Matching => &self.matching,
            SkillCategory::Missing => &self.missing,
            SkillCategory::Additional => &self.additional,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("field '{field}' must be {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    #[error("metric '{}' is not a number: {value:?}", .metric.label())]
    InvalidPercentage { metric: MetricKey, value: String },

    #[error("metric '{}' is outside 0..=100: {value}", .metric.label())]
    OutOfRange { metric: MetricKey, value: f64 },
}

/// Validates a raw response body into a `MatchReport`.
///
/// Nothing is defaulted: a missing metric or skill list is an error, because
/// "no data" must never render as "no skills". Unknown extra keys are ignored.
pub fn parse_report(raw: &Value) -> Result<MatchReport, ParseError> {
    let root = as_object(raw, "$")?;

    let metrics = as_object(field(root, "metrics", "metrics")?, "metrics")?;
    let overall_match = parse_metric(metrics, MetricKey::OverallMatch)?;
    let skills_match = parse_metric(metrics, MetricKey::SkillsMatch)?;

    let skills = as_object(
        field(root, "skills_analysis", "skills_analysis")?,
        "skills_analysis",
    )?;

    Ok(MatchReport {
        metrics: Metrics::new(overall_match, skills_match),
        skills_analysis: SkillsAnalysis {
            matching: parse_skill_list(skills, SkillCategory::Matching)?,
            missing: parse_skill_list(skills, SkillCategory::Missing)?,
            additional: parse_skill_list(skills, SkillCategory::Additional)?,
        },
    })
}

fn field<'a>(obj: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a Value, ParseError> {
    obj.get(key)
        .ok_or_else(|| ParseError::MissingField(path.to_string()))
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ParseError> {
    value.as_object().ok_or_else(|| ParseError::InvalidType {
        field: path.to_string(),
        expected: "an object",
    })
}

fn parse_metric(metrics: &Map<String, Value>, key: MetricKey) -> Result<Percentage, ParseError> {
    let path = format!("metrics.{}", key.label());
    let value = field(metrics, key.label(), &path)?;
    match value {
        Value::String(s) => Percentage::parse(key, s),
        Value::Number(n) => Percentage::parse(key, &n.to_string()),
        _ => Err(ParseError::InvalidType {
            field: path,
            expected: "a percentage string",
        }),
    }
}

fn parse_skill_list(
    skills: &Map<String, Value>,
    category: SkillCategory,
) -> Result<Vec<String>, ParseError> {
    let path = format!("skills_analysis.{}", category.label());
    let items = field(skills, category.label(), &path)?
        .as_array()
        .ok_or_else(|| ParseError::InvalidType {
            field: path.clone(),
            expected: "an array of strings",
        })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ParseError::InvalidType {
                    field: format!("{path}[{i}]"),
                    expected: "a string",
                })
        })
        .collect()
}
