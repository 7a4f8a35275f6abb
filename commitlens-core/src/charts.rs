//! Chart registry and Chart.js configurations
//!
//! Two input contracts feed the charts and they are kept apart:
//! - the base dashboard charts bucket raw commit analyses themselves
//!   ([`ChartRegistry::update_from_commits`])
//! - the enhanced report charts read counts the backend already aggregated
//!   ([`EnhancedChartSet::create`])
//!
//! Base charts live as long as the page and are updated in place. Enhanced
//! charts are rebuilt from scratch whenever a report is rendered or the visual
//! tab is entered, so series never accumulate across reports.

use crate::document::{ids, Document, Mounted};
use crate::level::{Level, LevelCounts};
use crate::model::{CommitRecord, Report};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;

/// Categories plotted on the category trend charts
pub const TREND_CATEGORIES: [&str; 4] = ["feature", "bugfix", "documentation", "security"];
const TREND_COLORS: [&str; 4] = ["#4CAF50", "#F44336", "#2196F3", "#FF9800"];

const ACTIVITY_COLORS: [&str; 8] = [
    "#4CAF50", "#2196F3", "#FFC107", "#FF5722", "#9C27B0", "#00BCD4", "#795548", "#607D8B",
];
const LEVEL_COLORS: [&str; 3] = ["#EF4444", "#F59E0B", "#10B981"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Doughnut,
    Pie,
    Line,
}

/// A single colour or one colour per data point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Single(String),
    Each(Vec<String>),
}

impl Paint {
    fn each(colors: &[&str]) -> Paint {
        Paint::Each(colors.iter().map(|c| c.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

impl Dataset {
    fn new(data: Vec<u64>) -> Self {
        Dataset {
            label: None,
            data,
            background_color: None,
            border_color: None,
            border_width: None,
            tension: None,
        }
    }

    fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn background(mut self, paint: Paint) -> Self {
        self.background_color = Some(paint);
        self
    }

    fn border(mut self, paint: Paint) -> Self {
        self.border_color = Some(paint);
        self
    }

    fn border_width(mut self, width: u32) -> Self {
        self.border_width = Some(width);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Chart.js chart configuration (`new Chart(ctx, config)`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub data: ChartData,
    pub options: serde_json::Value,
}

impl ChartConfig {
    /// Empty bar chart with one labelled series
    pub fn empty_bar(label: &str) -> Self {
        ChartConfig {
            chart_type: ChartType::Bar,
            data: ChartData {
                labels: Vec::new(),
                datasets: vec![Dataset::new(Vec::new())
                    .labeled(label)
                    .background(Paint::Single("rgba(59, 130, 246, 0.5)".to_string()))
                    .border(Paint::Single("rgba(59, 130, 246, 1)".to_string()))
                    .border_width(1)],
            },
            options: begin_at_zero(),
        }
    }

    /// Labels of the dataset at `index`, zipped with their values
    pub fn series(&self, index: usize) -> Vec<(String, u64)> {
        let Some(dataset) = self.data.datasets.get(index) else {
            return Vec::new();
        };
        self.data
            .labels
            .iter()
            .cloned()
            .zip(dataset.data.iter().copied())
            .collect()
    }
}

fn begin_at_zero() -> serde_json::Value {
    json!({ "responsive": true, "scales": { "y": { "beginAtZero": true } } })
}

fn legend_bottom() -> serde_json::Value {
    json!({ "responsive": true, "plugins": { "legend": { "position": "bottom" } } })
}

fn level_labels(suffix: &str) -> Vec<String> {
    Level::ALL
        .iter()
        .map(|l| format!("{} {}", l.title(), suffix))
        .collect()
}

/// Uppercase the first character ("bugfix" -> "Bugfix")
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Calendar-date label for a commit date
///
/// Parseable timestamps are reduced to `YYYY-MM-DD` in their own offset;
/// anything else is used verbatim.
pub fn date_label(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().to_string();
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%a %b %d %H:%M:%S %Y %z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return dt.date_naive().to_string();
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.date().to_string();
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.to_string();
    }
    raw.to_string()
}

/// Base chart slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    CommitVolume,
    ImpactDistribution,
    RiskDistribution,
    CategoryTrend,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::CommitVolume,
        ChartKind::ImpactDistribution,
        ChartKind::RiskDistribution,
        ChartKind::CategoryTrend,
    ];

    pub fn canvas_id(&self) -> &'static str {
        match self {
            ChartKind::CommitVolume => ids::COMMIT_CHART,
            ChartKind::ImpactDistribution => ids::IMPACT_CHART,
            ChartKind::RiskDistribution => ids::RISK_CHART,
            ChartKind::CategoryTrend => ids::CATEGORY_TREND_CHART,
        }
    }

    /// Configuration of the chart with no data
    pub fn empty_config(&self) -> ChartConfig {
        match self {
            ChartKind::CommitVolume => ChartConfig::empty_bar("Commits by Date"),
            ChartKind::ImpactDistribution => ChartConfig {
                chart_type: ChartType::Doughnut,
                data: ChartData {
                    labels: level_labels("Impact"),
                    datasets: vec![Dataset::new(vec![0, 0, 0]).background(Paint::each(&[
                        "rgba(239, 68, 68, 0.7)",
                        "rgba(245, 158, 11, 0.7)",
                        "rgba(34, 197, 94, 0.7)",
                    ]))],
                },
                options: json!({ "responsive": true }),
            },
            ChartKind::RiskDistribution => ChartConfig {
                chart_type: ChartType::Pie,
                data: ChartData {
                    labels: level_labels("Risk"),
                    datasets: vec![Dataset::new(vec![0, 0, 0]).background(Paint::each(&[
                        "rgba(239, 68, 68, 0.8)",
                        "rgba(245, 158, 11, 0.8)",
                        "rgba(34, 197, 94, 0.8)",
                    ]))],
                },
                options: json!({ "responsive": true }),
            },
            ChartKind::CategoryTrend => ChartConfig {
                chart_type: ChartType::Line,
                data: ChartData::default(),
                options: begin_at_zero(),
            },
        }
    }
}

/// Live chart bound to a canvas
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle {
    canvas_id: String,
    config: ChartConfig,
    revision: u64,
}

impl ChartHandle {
    fn new(canvas_id: &str, config: ChartConfig) -> Self {
        ChartHandle {
            canvas_id: canvas_id.to_string(),
            config,
            revision: 0,
        }
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Number of in-place updates since creation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn draw<D: Document + ?Sized>(&self, document: &mut D) {
        if let Err(e) = document.draw_chart(&self.canvas_id, &self.config) {
            tracing::warn!(canvas = %self.canvas_id, "failed to draw chart: {}", e);
        }
    }
}

/// Counts derived from raw commit analyses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitBuckets {
    /// Commits per calendar date, in first-seen order
    pub by_date: IndexMap<String, u64>,
    pub impact: LevelCounts,
    pub risk: LevelCounts,
    /// Per-date category counts, in first-seen date order
    pub categories_by_date: IndexMap<String, IndexMap<String, u64>>,
}

impl CommitBuckets {
    pub fn from_commits(commits: &[CommitRecord]) -> Self {
        let mut buckets = CommitBuckets::default();
        for commit in commits {
            let date = date_label(&commit.date);
            *buckets.by_date.entry(date.clone()).or_insert(0) += 1;
            *buckets
                .categories_by_date
                .entry(date)
                .or_default()
                .entry(commit.category.clone())
                .or_insert(0) += 1;
            buckets.impact.record(commit.impact());
            buckets.risk.record(commit.risk());
        }
        buckets
    }
}

/// The four persistent dashboard charts
#[derive(Debug, Clone)]
pub struct ChartRegistry {
    commit_volume: ChartHandle,
    impact: ChartHandle,
    risk: ChartHandle,
    category_trend: ChartHandle,
}

impl Default for ChartRegistry {
    fn default() -> Self {
        ChartRegistry::new()
    }
}

impl ChartRegistry {
    pub fn new() -> Self {
        let handle = |kind: ChartKind| ChartHandle::new(kind.canvas_id(), kind.empty_config());
        ChartRegistry {
            commit_volume: handle(ChartKind::CommitVolume),
            impact: handle(ChartKind::ImpactDistribution),
            risk: handle(ChartKind::RiskDistribution),
            category_trend: handle(ChartKind::CategoryTrend),
        }
    }

    /// Create the registry and draw every chart in its empty state
    pub fn initialize<D: Document + ?Sized>(document: &mut D) -> Self {
        let registry = ChartRegistry::new();
        for kind in ChartKind::ALL {
            registry.get(kind).draw(document);
        }
        registry
    }

    pub fn get(&self, kind: ChartKind) -> &ChartHandle {
        match kind {
            ChartKind::CommitVolume => &self.commit_volume,
            ChartKind::ImpactDistribution => &self.impact,
            ChartKind::RiskDistribution => &self.risk,
            ChartKind::CategoryTrend => &self.category_trend,
        }
    }

    fn get_mut(&mut self, kind: ChartKind) -> &mut ChartHandle {
        match kind {
            ChartKind::CommitVolume => &mut self.commit_volume,
            ChartKind::ImpactDistribution => &mut self.impact,
            ChartKind::RiskDistribution => &mut self.risk,
            ChartKind::CategoryTrend => &mut self.category_trend,
        }
    }

    /// Recompute every bucket from `commits` and redraw all four charts
    pub fn update_from_commits<D: Document + ?Sized>(
        &mut self,
        commits: &[CommitRecord],
        document: &mut D,
    ) {
        let buckets = CommitBuckets::from_commits(commits);
        tracing::debug!(
            commits = commits.len(),
            dates = buckets.by_date.len(),
            "updating dashboard charts"
        );

        {
            let data = &mut self.commit_volume.config.data;
            data.labels = buckets.by_date.keys().cloned().collect();
            if let Some(dataset) = data.datasets.first_mut() {
                dataset.data = buckets.by_date.values().copied().collect();
            }
        }
        if let Some(dataset) = self.impact.config.data.datasets.first_mut() {
            dataset.data = buckets.impact.to_vec();
        }
        if let Some(dataset) = self.risk.config.data.datasets.first_mut() {
            dataset.data = buckets.risk.to_vec();
        }
        {
            let data = &mut self.category_trend.config.data;
            data.labels = buckets.categories_by_date.keys().cloned().collect();
            data.datasets = trend_datasets(|category| {
                buckets
                    .categories_by_date
                    .values()
                    .map(|counts| counts.get(category).copied().unwrap_or(0))
                    .collect()
            });
        }

        for kind in ChartKind::ALL {
            let handle = self.get_mut(kind);
            handle.revision += 1;
            handle.draw(document);
        }
    }
}

fn trend_datasets(mut series: impl FnMut(&str) -> Vec<u64>) -> Vec<Dataset> {
    TREND_CATEGORIES
        .iter()
        .zip(TREND_COLORS)
        .map(|(category, color)| {
            let mut dataset = Dataset::new(series(category))
                .labeled(capitalize(category))
                .border(Paint::Single(color.to_string()));
            dataset.tension = Some(0.1);
            dataset
        })
        .collect()
}

/// Charts of the visual analytics tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnhancedChart {
    Activity,
    Impact,
    Risk,
    CategoryTrend,
}

impl EnhancedChart {
    pub const ALL: [EnhancedChart; 4] = [
        EnhancedChart::Activity,
        EnhancedChart::Impact,
        EnhancedChart::Risk,
        EnhancedChart::CategoryTrend,
    ];

    pub fn canvas_id(&self) -> &'static str {
        match self {
            EnhancedChart::Activity => "enhancedCommitChart",
            EnhancedChart::Impact => "enhancedImpactChart",
            EnhancedChart::Risk => "enhancedRiskChart",
            EnhancedChart::CategoryTrend => "enhancedCategoryTrendChart",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EnhancedChart::Activity => "Activity Distribution",
            EnhancedChart::Impact => "Impact Analysis",
            EnhancedChart::Risk => "Risk Distribution",
            EnhancedChart::CategoryTrend => "Category Trends",
        }
    }

    /// Build this chart's configuration from a report
    ///
    /// Returns `None` when the report has no dashboard summary.
    pub fn config(&self, report: &Report) -> Option<ChartConfig> {
        let summary = report.dashboard_summary.as_ref()?;
        let config = match self {
            EnhancedChart::Activity => {
                let categories = summary.commit_categories.clone().unwrap_or_default();
                ChartConfig {
                    chart_type: ChartType::Pie,
                    data: ChartData {
                        labels: categories.keys().map(|k| capitalize(k)).collect(),
                        datasets: vec![Dataset::new(categories.values().copied().collect())
                            .background(Paint::each(&ACTIVITY_COLORS))],
                    },
                    options: legend_bottom(),
                }
            }
            EnhancedChart::Impact => {
                let impacts = summary.impact_distribution.unwrap_or_default();
                ChartConfig {
                    chart_type: ChartType::Doughnut,
                    data: ChartData {
                        labels: level_labels("Impact"),
                        datasets: vec![
                            Dataset::new(impacts.to_vec()).background(Paint::each(&LEVEL_COLORS))
                        ],
                    },
                    options: legend_bottom(),
                }
            }
            EnhancedChart::Risk => {
                let risks: LevelCounts = report
                    .non_technical_summaries
                    .iter()
                    .map(|commit| commit.risk())
                    .collect();
                ChartConfig {
                    chart_type: ChartType::Bar,
                    data: ChartData {
                        labels: level_labels("Risk"),
                        datasets: vec![Dataset::new(risks.to_vec())
                            .labeled("Number of Commits")
                            .background(Paint::each(&LEVEL_COLORS))],
                    },
                    options: json!({
                        "responsive": true,
                        "scales": { "y": { "beginAtZero": true, "ticks": { "stepSize": 1 } } }
                    }),
                }
            }
            EnhancedChart::CategoryTrend => {
                let timeline = &summary.activity_timeline;
                ChartConfig {
                    chart_type: ChartType::Line,
                    data: ChartData {
                        labels: timeline.iter().map(|day| day.date.clone()).collect(),
                        datasets: trend_datasets(|category| {
                            timeline.iter().map(|day| day.count(category)).collect()
                        }),
                    },
                    options: begin_at_zero(),
                }
            }
        };
        Some(config)
    }
}

/// Enhanced charts of the currently rendered report
#[derive(Debug, Clone, Default)]
pub struct EnhancedChartSet {
    generation: u64,
    charts: Vec<(EnhancedChart, ChartHandle)>,
}

impl EnhancedChartSet {
    /// Build a fresh set of charts for every mounted enhanced canvas
    pub fn create<D: Document + ?Sized>(
        report: &Report,
        mounted: &Mounted,
        generation: u64,
        document: &mut D,
    ) -> Self {
        let mut charts = Vec::new();
        for chart in EnhancedChart::ALL {
            if !mounted.has_canvas(chart.canvas_id()) {
                continue;
            }
            let Some(config) = chart.config(report) else {
                continue;
            };
            let handle = ChartHandle::new(chart.canvas_id(), config);
            handle.draw(document);
            charts.push((chart, handle));
        }
        tracing::debug!(generation, charts = charts.len(), "built enhanced charts");
        EnhancedChartSet { generation, charts }
    }

    /// Incremented every time the set is rebuilt
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn get(&self, chart: EnhancedChart) -> Option<&ChartHandle> {
        self.charts
            .iter()
            .find(|(c, _)| *c == chart)
            .map(|(_, handle)| handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;

    fn commit(date: &str, score: f64, risk: &str, category: &str) -> CommitRecord {
        CommitRecord {
            date: date.to_string(),
            impact_score: score,
            risk_assessment: risk.to_string(),
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_date_label_formats() {
        assert_eq!(date_label("2024-01-15 10:30:00+00:00"), "2024-01-15");
        assert_eq!(date_label("2024-01-15T10:30:00.123456"), "2024-01-15");
        assert_eq!(date_label("2024-01-15T23:30:00-05:00"), "2024-01-15");
        assert_eq!(date_label("Mon Jan 15 10:30:00 2024 +0100"), "2024-01-15");
        assert_eq!(date_label("2024-01-15"), "2024-01-15");
        assert_eq!(date_label("last tuesday"), "last tuesday");
    }

    #[test]
    fn test_buckets_from_commits() {
        let commits = vec![
            commit("2024-01-15 09:00:00", 0.9, "high", "feature"),
            commit("2024-01-15 17:00:00", 0.7, "medium", "bugfix"),
            commit("2024-01-16 08:00:00", 0.3, "High", "feature"),
            commit("2024-01-14 08:00:00", 0.31, "unknown", "security"),
        ];
        let buckets = CommitBuckets::from_commits(&commits);

        let dates: Vec<(&str, u64)> = buckets
            .by_date
            .iter()
            .map(|(d, c)| (d.as_str(), *c))
            .collect();
        assert_eq!(
            dates,
            vec![("2024-01-15", 2), ("2024-01-16", 1), ("2024-01-14", 1)]
        );
        assert_eq!(buckets.impact, LevelCounts { high: 1, medium: 2, low: 1 });
        assert_eq!(buckets.risk, LevelCounts { high: 1, medium: 1, low: 2 });
    }

    #[test]
    fn test_registry_update_recomputes_from_scratch() {
        let mut doc = PageDocument::new();
        let mut registry = ChartRegistry::initialize(&mut doc);
        assert_eq!(doc.draw_count(ids::IMPACT_CHART), 1);

        registry.update_from_commits(
            &[
                commit("2024-01-15", 0.8, "high", "feature"),
                commit("2024-01-15", 0.1, "low", "documentation"),
            ],
            &mut doc,
        );
        registry.update_from_commits(&[commit("2024-01-16", 0.5, "medium", "bugfix")], &mut doc);

        let impact = registry.get(ChartKind::ImpactDistribution);
        assert_eq!(impact.revision(), 2);
        assert_eq!(impact.config().data.datasets[0].data, vec![0, 1, 0]);
        assert_eq!(
            registry.get(ChartKind::CommitVolume).config().series(0),
            vec![("2024-01-16".to_string(), 1)]
        );
        assert_eq!(doc.chart(ids::RISK_CHART).unwrap().data.datasets[0].data, vec![0, 1, 0]);
        assert_eq!(doc.draw_count(ids::IMPACT_CHART), 3);
    }

    #[test]
    fn test_registry_category_trend_zero_fills() {
        let mut doc = PageDocument::new();
        let mut registry = ChartRegistry::initialize(&mut doc);
        registry.update_from_commits(
            &[
                commit("2024-01-15", 0.8, "high", "feature"),
                commit("2024-01-16", 0.1, "low", "security"),
            ],
            &mut doc,
        );
        let trend = registry.get(ChartKind::CategoryTrend).config();
        assert_eq!(trend.chart_type, ChartType::Line);
        assert_eq!(trend.data.labels, vec!["2024-01-15", "2024-01-16"]);
        let series: Vec<(&str, &[u64])> = trend
            .data
            .datasets
            .iter()
            .map(|d| (d.label.as_deref().unwrap_or(""), d.data.as_slice()))
            .collect();
        assert_eq!(
            series,
            vec![
                ("Feature", &[1, 0][..]),
                ("Bugfix", &[0, 0][..]),
                ("Documentation", &[0, 0][..]),
                ("Security", &[0, 1][..]),
            ]
        );
    }

    #[test]
    fn test_enhanced_configs_need_summary() {
        let report = Report::default();
        for chart in EnhancedChart::ALL {
            assert!(chart.config(&report).is_none());
        }
    }

    #[test]
    fn test_enhanced_risk_counts_labels() {
        let report: Report = serde_json::from_str(
            r#"{
                "dashboard_summary": {"impact_distribution": {"high": 2, "medium": 0, "low": 5}},
                "non_technical_summaries": [
                    {"risk_level": "High risk - affects critical components"},
                    {"risk_level": "Medium risk - could affect some functionality"},
                    {"risk_level": "Low risk - routine change"},
                    {"risk_level": "high risk"},
                    {}
                ]
            }"#,
        )
        .unwrap();
        let risk = EnhancedChart::Risk.config(&report).unwrap();
        assert_eq!(risk.chart_type, ChartType::Bar);
        assert_eq!(risk.data.datasets[0].data, vec![1, 1, 3]);

        let impact = EnhancedChart::Impact.config(&report).unwrap();
        assert_eq!(impact.data.datasets[0].data, vec![2, 0, 5]);
    }

    #[test]
    fn test_config_serializes_as_chartjs() {
        let value = serde_json::to_value(ChartKind::ImpactDistribution.empty_config()).unwrap();
        assert_eq!(value["type"], "doughnut");
        assert_eq!(value["data"]["labels"][0], "High Impact");
        assert_eq!(value["data"]["datasets"][0]["backgroundColor"][2], "rgba(34, 197, 94, 0.7)");
        assert!(value["data"]["datasets"][0].get("label").is_none());
    }

    #[test]
    fn test_commit_volume_outlined() {
        let value = serde_json::to_value(ChartKind::CommitVolume.empty_config()).unwrap();
        assert_eq!(value["type"], "bar");
        assert_eq!(value["data"]["datasets"][0]["label"], "Commits by Date");
        assert_eq!(value["data"]["datasets"][0]["borderWidth"], 1);
        assert!(value["options"]["scales"]["y"]["beginAtZero"].as_bool().unwrap());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("documentation"), "Documentation");
        assert_eq!(capitalize(""), "");
    }
}
