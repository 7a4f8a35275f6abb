//! CommitLens core library - dashboard for commit analysis reports

#![deny(warnings)]

// Global invariants enforced in this crate:
// - All UI state is owned by the dashboard controller; no global mutable state
// - Missing or null report fields degrade to placeholders, never to errors
// - Category maps keep the order the backend sent them in
// - Charts are only drawn on canvases the document reports as mounted
// - Network calls are issued one at a time on a single-threaded runtime

pub mod api;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod document;
pub mod html;
pub mod level;
pub mod model;
pub mod notify;
pub mod tabs;

pub use api::{AnalysisOutcome, ApiError, HttpReportApi, ReportApi};
pub use config::ResolvedConfig;
pub use dashboard::{Dashboard, DashboardOptions};
pub use document::{Document, PageDocument};
pub use level::Level;
pub use model::{RecentReport, Report};
pub use tabs::Tab;

/// Render recent reports as plain text, one per line
pub fn render_recent_text(reports: &[RecentReport]) -> String {
    if reports.is_empty() {
        return "No reports found.\n".to_string();
    }
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!(
            "{:<32} {:<8} {:>6} commits  {}\n",
            report.report_id().unwrap_or("-"),
            report.timeframe,
            report.commit_count,
            report.created_at,
        ));
    }
    out
}
