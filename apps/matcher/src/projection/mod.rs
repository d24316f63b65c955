//! Report projection — pure transforms from a `MatchReport` to view data.
//!
//! Inputs are already validated by `report::parse_report`, so nothing here
//! can fail. Every function is deterministic and borrows its input.

use serde::Serialize;

use crate::report::{MatchReport, MetricKey, SkillCategory, SkillsAnalysis};

// ────────────────────────────────────────────────────────────────────────────
// View data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: &'static str,
    pub value: u8,
}

/// One labelled progress bar under the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricBar {
    pub label: &'static str,
    pub display: String,
    pub width_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Positive,
    Negative,
    Neutral,
}

impl BadgeTone {
    /// Class name the page styles the badge with.
    pub fn css_class(self) -> &'static str {
        match self {
            BadgeTone::Positive => "positive",
            BadgeTone::Negative => "negative",
            BadgeTone::Neutral => "neutral",
        }
    }
}

impl From<SkillCategory> for BadgeTone {
    fn from(category: SkillCategory) -> Self {
        match category {
            SkillCategory::Matching => BadgeTone::Positive,
            SkillCategory::Missing => BadgeTone::Negative,
            SkillCategory::Additional => BadgeTone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSection {
    pub category: SkillCategory,
    pub title: &'static str,
    pub tone: BadgeTone,
    pub skills: Vec<String>,
}

/// Everything the presentation layer needs for one report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub chart: [ChartPoint; 2],
    pub metric_bars: Vec<MetricBar>,
    pub skill_sections: Vec<SkillSection>,
    pub suggestions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Transforms
// ────────────────────────────────────────────────────────────────────────────

/// Overall Match then Skills Match, as integer percentages.
pub fn to_chart_series(report: &MatchReport) -> [ChartPoint; 2] {
    MetricKey::ALL.map(|key| ChartPoint {
        label: key.label(),
        value: report.metrics.get(key).as_integer(),
    })
}

pub fn to_metric_bars(report: &MatchReport) -> Vec<MetricBar> {
    MetricKey::ALL
        .into_iter()
        .map(|key| {
            let pct = report.metrics.get(key);
            MetricBar {
                label: key.label(),
                display: pct.display(),
                width_percent: pct.value().clamp(0.0, 100.0),
            }
        })
        .collect()
}

/// Matching, Missing, Additional — empty sections included.
pub fn to_skill_sections(skills: &SkillsAnalysis) -> Vec<SkillSection> {
    SkillCategory::ALL
        .into_iter()
        .map(|category| SkillSection {
            category,
            title: category.label(),
            tone: category.into(),
            skills: skills.skills(category).to_vec(),
        })
        .collect()
}

/// One suggestion per missing skill, then one line highlighting the matching
/// skills if there are any.
pub fn to_suggestions(skills: &SkillsAnalysis) -> Vec<String> {
    let mut suggestions: Vec<String> = skills
        .missing
        .iter()
        .map(|skill| format!("Consider adding {skill} skills to better match the job requirements"))
        .collect();

    if !skills.matching.is_empty() {
        suggestions.push(format!(
            "Highlight your expertise in: {}",
            skills.matching.join(", ")
        ));
    }

    suggestions
}

pub fn project(report: &MatchReport) -> ReportView {
    ReportView {
        chart: to_chart_series(report),
        metric_bars: to_metric_bars(report),
        skill_sections: to_skill_sections(&report.skills_analysis),
        suggestions: to_suggestions(&report.skills_analysis),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parse_report;
    use serde_json::json;

    fn report(overall: &str, skills: &str, matching: &[&str], missing: &[&str]) -> MatchReport {
        parse_report(&json!({
            "metrics": {"Overall Match": overall, "Skills Match": skills},
            "skills_analysis": {
                "Matching Skills": matching,
                "Missing Skills": missing,
                "Additional Skills": ["react"]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_chart_series_fixed_order_and_values() {
        let chart = to_chart_series(&report("80", "75", &[], &[]));
        assert_eq!(
            chart,
            [
                ChartPoint {
                    label: "Overall Match",
                    value: 80
                },
                ChartPoint {
                    label: "Skills Match",
                    value: 75
                },
            ]
        );
    }

    #[test]
    fn test_chart_series_truncates_decimals() {
        let chart = to_chart_series(&report("42.86%", "66.67%", &[], &[]));
        assert_eq!(chart[0].value, 42);
        assert_eq!(chart[1].value, 66);
    }

    #[test]
    fn test_suggestions_missing_then_matching() {
        let r = report("50", "50", &["python", "sql"], &["docker", "aws"]);
        assert_eq!(
            to_suggestions(&r.skills_analysis),
            vec![
                "Consider adding docker skills to better match the job requirements",
                "Consider adding aws skills to better match the job requirements",
                "Highlight your expertise in: python, sql",
            ]
        );
    }

    #[test]
    fn test_suggestion_count_is_n_or_n_plus_one() {
        let missing = ["a", "b", "c"];
        let without = report("1", "1", &[], &missing);
        let with = report("1", "1", &["x"], &missing);
        assert_eq!(to_suggestions(&without.skills_analysis).len(), 3);
        assert_eq!(to_suggestions(&with.skills_analysis).len(), 4);
    }

    #[test]
    fn test_duplicate_missing_skills_each_get_a_suggestion() {
        let r = report("1", "1", &[], &["Go", "Go"]);
        assert_eq!(to_suggestions(&r.skills_analysis).len(), 2);
    }

    #[test]
    fn test_all_empty_yields_empty_view_sections() {
        let skills = SkillsAnalysis::default();
        assert!(to_suggestions(&skills).is_empty());

        let sections = to_skill_sections(&skills);
        assert_eq!(sections.len(), 3);
        assert!(sections.iter().all(|s| s.skills.is_empty()));
    }

    #[test]
    fn test_skill_sections_order_and_tone() {
        let r = report("1", "1", &["python"], &["go"]);
        let sections = to_skill_sections(&r.skills_analysis);
        let titles: Vec<_> = sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec!["Matching Skills", "Missing Skills", "Additional Skills"]
        );
        assert_eq!(sections[0].tone, BadgeTone::Positive);
        assert_eq!(sections[1].tone, BadgeTone::Negative);
        assert_eq!(sections[2].tone, BadgeTone::Neutral);
        assert_eq!(sections[2].skills, vec!["react"]);
    }

    #[test]
    fn test_metric_bars_display_single_percent() {
        let bars = to_metric_bars(&report("42.5%", "75", &[], &[]));
        assert_eq!(bars[0].display, "42.5%");
        assert_eq!(bars[0].width_percent, 42.5);
        assert_eq!(bars[1].display, "75%");
    }

    #[test]
    fn test_projection_is_idempotent() {
        let r = report("80", "75", &["python"], &["go"]);
        assert_eq!(project(&r), project(&r));
        assert_eq!(
            to_suggestions(&r.skills_analysis),
            to_suggestions(&r.skills_analysis)
        );
    }
}
