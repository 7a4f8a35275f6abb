//! Impact and risk level classification
//!
//! Three buckets are used everywhere on the dashboard. They are assigned in
//! one of three ways depending on where the data comes from:
//! - numeric impact scores from raw commit analyses (`> 0.7`, `> 0.3`)
//! - raw risk assessments, matched exactly against `"high"` / `"medium"`
//! - human-readable labels from commit summaries, matched by substring

use serde::{Deserialize, Deserializer, Serialize};

/// Impact score above which a commit is high impact
pub const HIGH_IMPACT_THRESHOLD: f64 = 0.7;
/// Impact score above which a commit is at least medium impact
pub const MEDIUM_IMPACT_THRESHOLD: f64 = 0.3;

/// Impact/risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::High, Level::Medium, Level::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }

    /// Capitalized name used in chart and badge labels
    pub fn title(&self) -> &'static str {
        match self {
            Level::High => "High",
            Level::Medium => "Medium",
            Level::Low => "Low",
        }
    }

    /// Bucket a numeric impact score
    ///
    /// The high threshold is strict, so exactly 0.7 is medium and exactly 0.3 is low.
    pub fn from_impact_score(score: f64) -> Level {
        if score > HIGH_IMPACT_THRESHOLD {
            Level::High
        } else if score > MEDIUM_IMPACT_THRESHOLD {
            Level::Medium
        } else {
            Level::Low
        }
    }

    /// Bucket a raw risk assessment (case-sensitive exact match)
    pub fn from_risk_assessment(assessment: &str) -> Level {
        match assessment {
            "high" => Level::High,
            "medium" => Level::Medium,
            _ => Level::Low,
        }
    }

    /// Bucket a human-readable label such as "High impact - major change"
    ///
    /// Case-sensitive: "High" wins over "Medium"; anything else is low.
    pub fn from_label(label: &str) -> Level {
        if label.contains("High") {
            Level::High
        } else if label.contains("Medium") {
            Level::Medium
        } else {
            Level::Low
        }
    }

    pub fn parse(s: &str) -> Option<Level> {
        match s {
            "high" => Some(Level::High),
            "medium" => Some(Level::Medium),
            "low" => Some(Level::Low),
            _ => None,
        }
    }
}

/// A label string from the backend with its level resolved at ingestion
///
/// `level` is `None` only when the label was absent, null or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelLabel {
    pub text: String,
    #[serde(skip)]
    pub level: Option<Level>,
}

impl LevelLabel {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let level = if text.is_empty() {
            None
        } else {
            Some(Level::from_label(&text))
        };
        LevelLabel { text, level }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl<'de> Deserialize<'de> for LevelLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = Option::<String>::deserialize(deserializer)?;
        Ok(LevelLabel::new(text.unwrap_or_default()))
    }
}

/// Per-level counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCounts {
    #[serde(deserialize_with = "crate::model::null_default")]
    pub high: u64,
    #[serde(deserialize_with = "crate::model::null_default")]
    pub medium: u64,
    #[serde(deserialize_with = "crate::model::null_default")]
    pub low: u64,
}

impl LevelCounts {
    pub fn record(&mut self, level: Level) {
        match level {
            Level::High => self.high += 1,
            Level::Medium => self.medium += 1,
            Level::Low => self.low += 1,
        }
    }

    pub fn get(&self, level: Level) -> u64 {
        match level {
            Level::High => self.high,
            Level::Medium => self.medium,
            Level::Low => self.low,
        }
    }

    pub fn total(&self) -> u64 {
        self.high + self.medium + self.low
    }

    /// Counts in High, Medium, Low order (chart dataset order)
    pub fn to_vec(&self) -> Vec<u64> {
        Level::ALL.iter().map(|l| self.get(*l)).collect()
    }
}

impl FromIterator<Level> for LevelCounts {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        let mut counts = LevelCounts::default();
        for level in iter {
            counts.record(level);
        }
        counts
    }
}
