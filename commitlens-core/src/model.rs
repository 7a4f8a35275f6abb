//! Report data model
//!
//! Everything here is a read-only projection of what the analysis backend
//! returns. Deserialization is lenient: a missing or `null` field becomes its
//! default so that rendering never fails on partial reports.

use crate::level::{Level, LevelCounts, LevelLabel};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize `null` as `T::default()`
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Report metadata as stored by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMetadata {
    #[serde(deserialize_with = "null_default")]
    pub report_id: String,
}

/// Entry of the recent reports list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentReport {
    #[serde(deserialize_with = "null_default")]
    pub timeframe: String,
    #[serde(deserialize_with = "null_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_default")]
    pub commit_count: u64,
    #[serde(deserialize_with = "null_default")]
    pub metadata: ReportMetadata,
}

impl RecentReport {
    pub fn report_id(&self) -> Option<&str> {
        non_empty(&self.metadata.report_id)
    }
}

/// Full analysis report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub timeframe: String,
    #[serde(deserialize_with = "null_default")]
    pub created_at: String,
    /// Stored reports carry the count as `commits_analyzed`
    #[serde(alias = "commits_analyzed", deserialize_with = "null_default")]
    pub commit_count: u64,
    pub dashboard_summary: Option<DashboardSummary>,
    #[serde(deserialize_with = "null_default")]
    pub non_technical_summaries: Vec<CommitSummary>,
    #[serde(deserialize_with = "null_default")]
    pub detailed_analysis: Vec<CommitRecord>,
    #[serde(deserialize_with = "null_default")]
    pub metadata: ReportMetadata,
}

impl Report {
    /// Report identifier, falling back to `metadata.report_id`
    pub fn report_id(&self) -> Option<&str> {
        non_empty(&self.id).or_else(|| non_empty(&self.metadata.report_id))
    }
}

/// Pre-aggregated dashboard metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    #[serde(deserialize_with = "null_default")]
    pub total_commits: u64,
    #[serde(deserialize_with = "null_default")]
    pub time_span_days: u64,
    #[serde(deserialize_with = "null_default")]
    pub active_contributors: u64,
    pub impact_distribution: Option<LevelCounts>,
    pub commit_categories: Option<IndexMap<String, u64>>,
    #[serde(deserialize_with = "null_default")]
    pub activity_timeline: Vec<ActivityDay>,
    #[serde(deserialize_with = "null_default")]
    pub most_active_contributor: String,
    #[serde(deserialize_with = "null_default")]
    pub visual_changes_count: u64,
    #[serde(deserialize_with = "null_default")]
    pub high_risk_commits: u64,
}

/// One day of the activity timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityDay {
    #[serde(deserialize_with = "null_default")]
    pub date: String,
    #[serde(deserialize_with = "null_default")]
    pub total_commits: u64,
    #[serde(deserialize_with = "null_default")]
    pub category_breakdown: IndexMap<String, u64>,
}

impl ActivityDay {
    pub fn count(&self, category: &str) -> u64 {
        self.category_breakdown.get(category).copied().unwrap_or(0)
    }
}

/// Non-technical summary of a single commit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitSummary {
    #[serde(deserialize_with = "null_default")]
    pub commit_id: String,
    #[serde(deserialize_with = "null_default")]
    pub message: String,
    #[serde(deserialize_with = "null_default")]
    pub author: String,
    #[serde(deserialize_with = "null_default")]
    pub date: String,
    #[serde(deserialize_with = "null_default")]
    pub category: String,
    #[serde(deserialize_with = "null_default")]
    pub category_explanation: String,
    /// Impact label, e.g. "High impact - major change to the application"
    pub impact_score: LevelLabel,
    #[serde(deserialize_with = "null_default")]
    pub overall_impact: String,
    /// Risk label, e.g. "Low risk - routine change"
    pub risk_level: LevelLabel,
    #[serde(deserialize_with = "null_default")]
    pub file_explanations: Vec<FileExplanation>,
    #[serde(deserialize_with = "null_default")]
    pub files_by_type: IndexMap<String, Vec<FileExplanation>>,
}

impl CommitSummary {
    pub fn impact(&self) -> Option<Level> {
        self.impact_score.level
    }

    /// Risk bucket for charting; an absent label counts as low
    pub fn risk(&self) -> Level {
        self.risk_level.level.unwrap_or(Level::Low)
    }
}

/// Explanation of a changed file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExplanation {
    #[serde(deserialize_with = "null_default")]
    pub file_path: String,
    #[serde(deserialize_with = "null_default")]
    pub code_summary: String,
    #[serde(deserialize_with = "null_default")]
    pub non_technical_summary: String,
    #[serde(deserialize_with = "null_default")]
    pub changes_explanation: String,
    #[serde(deserialize_with = "null_default")]
    pub language: String,
    #[serde(deserialize_with = "null_default")]
    pub complexity_level: String,
}

impl FileExplanation {
    pub fn path_or_unknown(&self) -> &str {
        non_empty(&self.file_path).unwrap_or("unknown")
    }

    /// Summary text, preferring the code summary over the non-technical one
    pub fn summary_text(&self) -> &str {
        non_empty(&self.code_summary)
            .or_else(|| non_empty(&self.non_technical_summary))
            .unwrap_or("No summary available")
    }

    pub fn language_or_unknown(&self) -> &str {
        non_empty(&self.language).unwrap_or("Unknown")
    }
}

/// Raw per-commit analysis with numeric impact and categorical risk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitRecord {
    #[serde(deserialize_with = "null_default")]
    pub commit_hash: String,
    #[serde(deserialize_with = "null_default")]
    pub author: String,
    #[serde(deserialize_with = "null_default")]
    pub date: String,
    #[serde(deserialize_with = "null_default")]
    pub message: String,
    #[serde(deserialize_with = "null_default")]
    pub category: String,
    #[serde(deserialize_with = "null_default")]
    pub impact_score: f64,
    #[serde(deserialize_with = "null_default")]
    pub risk_assessment: String,
}

impl CommitRecord {
    pub fn impact(&self) -> Level {
        Level::from_impact_score(self.impact_score)
    }

    pub fn risk(&self) -> Level {
        Level::from_risk_assessment(&self.risk_assessment)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tolerates_missing_and_null_fields() {
        let report: Report = serde_json::from_str(
            r#"{
                "timeframe": null,
                "commits_analyzed": 2,
                "dashboard_summary": {"total_commits": null, "commit_categories": null},
                "non_technical_summaries": [{"message": "Fix login", "risk_level": null}],
                "detailed_analysis": null
            }"#,
        )
        .unwrap();

        assert_eq!(report.timeframe, "");
        assert_eq!(report.commit_count, 2);
        let summary = report.dashboard_summary.as_ref().unwrap();
        assert_eq!(summary.total_commits, 0);
        assert!(summary.commit_categories.is_none());
        assert!(summary.impact_distribution.is_none());
        assert_eq!(report.non_technical_summaries.len(), 1);
        assert_eq!(report.non_technical_summaries[0].risk(), Level::Low);
        assert_eq!(report.non_technical_summaries[0].impact(), None);
        assert!(report.detailed_analysis.is_empty());
    }

    #[test]
    fn test_report_ignores_fields_the_dashboard_does_not_show() {
        let report: Report = serde_json::from_str(
            r##"{
                "report": "# Weekly report",
                "non_technical_summaries": [{
                    "message": "Add login page",
                    "visual_changes": true,
                    "insertions": 120,
                    "deletions": 4,
                    "file_explanations": [{"file_path": "src/login.rs", "purpose": "auth"}]
                }]
            }"##,
        )
        .unwrap();

        let commit = &report.non_technical_summaries[0];
        assert_eq!(commit.message, "Add login page");
        assert_eq!(commit.file_explanations[0].file_path, "src/login.rs");
    }

    #[test]
    fn test_report_id_falls_back_to_metadata() {
        let report: Report =
            serde_json::from_str(r#"{"metadata": {"report_id": "report_20240115_103000"}}"#)
                .unwrap();
        assert_eq!(report.report_id(), Some("report_20240115_103000"));

        let report = Report::default();
        assert_eq!(report.report_id(), None);
    }

    #[test]
    fn test_commit_categories_keep_server_order() {
        let summary: DashboardSummary = serde_json::from_str(
            r#"{"commit_categories": {"security": 1, "feature": 3, "bugfix": 2}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = summary
            .commit_categories
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["security", "feature", "bugfix"]);
    }

    #[test]
    fn test_commit_summary_levels_assigned_on_ingestion() {
        let commit: CommitSummary = serde_json::from_str(
            r#"{
                "impact_score": "Medium impact - noticeable change to functionality",
                "risk_level": "High risk - affects critical components and requires careful review"
            }"#,
        )
        .unwrap();
        assert_eq!(commit.impact(), Some(Level::Medium));
        assert_eq!(commit.risk(), Level::High);
    }

    #[test]
    fn test_file_explanation_fallbacks() {
        let file = FileExplanation::default();
        assert_eq!(file.path_or_unknown(), "unknown");
        assert_eq!(file.summary_text(), "No summary available");
        assert_eq!(file.language_or_unknown(), "Unknown");

        let file = FileExplanation {
            code_summary: String::new(),
            non_technical_summary: "Updates the login page".to_string(),
            ..Default::default()
        };
        assert_eq!(file.summary_text(), "Updates the login page");

        let file = FileExplanation {
            code_summary: "Adds a session cache".to_string(),
            non_technical_summary: "Updates the login page".to_string(),
            ..Default::default()
        };
        assert_eq!(file.summary_text(), "Adds a session cache");
    }

    #[test]
    fn test_commit_record_levels() {
        let record: CommitRecord = serde_json::from_str(
            r#"{"commit_hash": "abc123", "impact_score": 0.7, "risk_assessment": "medium"}"#,
        )
        .unwrap();
        assert_eq!(record.impact(), Level::Medium);
        assert_eq!(record.risk(), Level::Medium);
    }
}
