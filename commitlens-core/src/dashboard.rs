//! Dashboard controller
//!
//! Owns every piece of UI state: the base chart registry, the enhanced charts
//! of the open report, the tab state, and the toasts. Operations are driven
//! one at a time from a single-threaded runtime. There is no cancellation,
//! so a late response simply replaces whatever report is displayed.
//!
//! The base charts show the last `detailed_analysis` seen. Opening a report
//! without raw commits leaves them as they were.

use crate::api::{AnalysisOutcome, ApiError, ReportApi};
use crate::charts::{ChartRegistry, EnhancedChartSet};
use crate::document::{ids, Document, DocumentError, Mounted};
use crate::html::{self, TimelineFilter, DEFAULT_TECHNICAL_PREVIEW};
use crate::model::{RecentReport, Report};
use crate::notify::{NotificationKind, Notifier, DEFAULT_TTL};
use crate::tabs::{Tab, TabState};
use std::time::{Duration, Instant};

/// Tunables taken from the resolved configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub notification_ttl: Duration,
    pub technical_preview_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        DashboardOptions {
            notification_ttl: DEFAULT_TTL,
            technical_preview_limit: DEFAULT_TECHNICAL_PREVIEW,
        }
    }
}

pub struct Dashboard<A: ReportApi, D: Document> {
    api: A,
    document: D,
    options: DashboardOptions,
    charts: ChartRegistry,
    enhanced: EnhancedChartSet,
    enhanced_generation: u64,
    /// Canvases present in the visual tab of the open report
    visual_mounted: Option<Mounted>,
    notifier: Notifier,
    tabs: TabState,
    recent: Vec<RecentReport>,
    current: Option<Report>,
    filter: TimelineFilter,
}

impl<A: ReportApi, D: Document> Dashboard<A, D> {
    pub fn new(api: A, document: D, options: DashboardOptions) -> Self {
        Dashboard {
            api,
            document,
            options,
            charts: ChartRegistry::new(),
            enhanced: EnhancedChartSet::default(),
            enhanced_generation: 0,
            visual_mounted: None,
            notifier: Notifier::new(options.notification_ttl),
            tabs: TabState::new(),
            recent: Vec::new(),
            current: None,
            filter: TimelineFilter::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    pub fn enhanced_charts(&self) -> &EnhancedChartSet {
        &self.enhanced
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn active_tab(&self) -> Tab {
        self.tabs.active()
    }

    pub fn recent_reports(&self) -> &[RecentReport] {
        &self.recent
    }

    pub fn current_report(&self) -> Option<&Report> {
        self.current.as_ref()
    }

    pub fn timeline_filter(&self) -> &TimelineFilter {
        &self.filter
    }

    /// Populate the recent list and draw the four base charts empty
    pub async fn load(&mut self) {
        // Failure is already logged; the dashboard still comes up
        let _ = self.refresh_recent().await;
        self.charts = ChartRegistry::initialize(&mut self.document);
    }

    /// Fetch the recent reports and render them as cards
    ///
    /// On failure the error is logged and the current list is left untouched.
    pub async fn refresh_recent(&mut self) -> Result<usize, ApiError> {
        let reports = match self.api.list_recent().await {
            Ok(reports) => reports,
            Err(e) => {
                tracing::warn!("failed to load recent reports: {}", e);
                return Err(e);
            }
        };

        tracing::debug!(count = reports.len(), "loaded recent reports");
        let fragment = html::render_recent_reports(&reports);
        log_document_error(self.document.mount(ids::RECENT_REPORTS, &fragment));
        self.recent = reports;
        Ok(self.recent.len())
    }

    /// Fetch a report and open it
    pub async fn view_report(&mut self, report_id: &str) -> Result<(), ApiError> {
        match self.api.get(report_id).await {
            Ok(mut report) => {
                if report.id.is_empty() {
                    report.id = report_id.to_string();
                }
                self.show_report(report);
                Ok(())
            }
            Err(e) => {
                self.notify(format!("Error loading report: {}", e), NotificationKind::Error);
                Err(e)
            }
        }
    }

    /// Render `report` into the report panel and reveal it
    pub fn show_report(&mut self, report: Report) {
        tracing::debug!(
            report = report.report_id().unwrap_or("<unknown>"),
            summaries = report.non_technical_summaries.len(),
            "rendering report"
        );
        let fragments = html::render_report(
            &report,
            &self.filter,
            self.options.technical_preview_limit,
        );

        log_document_error(self.document.mount(ids::REPORT_CONTENT, &fragments.shell));
        log_document_error(self.document.mount(ids::FILTER_CONTROLS, &fragments.filters));
        self.visual_mounted = None;
        for (tab, fragment) in &fragments.tabs {
            if let Some(mounted) = log_document_error(self.document.mount(tab.content_id(), fragment))
            {
                if *tab == Tab::Visual {
                    self.visual_mounted = Some(mounted);
                }
            }
        }

        let transition = self.tabs.reset();
        log_document_error(transition.apply(&mut self.document));

        self.current = Some(report);
        self.rebuild_enhanced_charts();

        if let Some(report) = &self.current {
            if !report.detailed_analysis.is_empty() {
                self.charts
                    .update_from_commits(&report.detailed_analysis, &mut self.document);
            }
        }

        log_document_error(self.document.set_hidden(ids::REPORT_VIEW, false));
        log_document_error(self.document.scroll_into_view(ids::REPORT_VIEW));
    }

    /// Hide the report panel; its content stays in place
    pub fn close_report(&mut self) {
        log_document_error(self.document.set_hidden(ids::REPORT_VIEW, true));
    }

    /// Run an analysis for the repository and timeframe in the form inputs
    pub async fn run_analysis(&mut self) -> Result<AnalysisOutcome, ApiError> {
        let repo_path = self
            .document
            .input_value(ids::REPO_PATH_INPUT)
            .unwrap_or_default();
        let timeframe = self
            .document
            .input_value(ids::TIMEFRAME_INPUT)
            .unwrap_or_default();
        tracing::info!(repo = %repo_path, timeframe = %timeframe, "running analysis");

        let response = match self.api.run_analysis(&repo_path, &timeframe).await {
            Ok(response) => response,
            Err(e) => {
                self.notify(format!("Error running analysis: {}", e), NotificationKind::Error);
                return Err(e);
            }
        };

        let outcome = response.outcome();
        match &outcome {
            AnalysisOutcome::Completed {
                report_id,
                commit_count,
            } => {
                tracing::info!(commits = commit_count, "analysis completed");
                self.notify("Analysis completed successfully!", NotificationKind::Success);
                let _ = self.refresh_recent().await;
                match report_id {
                    Some(id) => {
                        let _ = self.view_report(id).await;
                    }
                    None => tracing::warn!("analysis response did not include a report id"),
                }
            }
            AnalysisOutcome::NoCommits => {
                self.notify(
                    "No commits found in the specified timeframe.",
                    NotificationKind::Warning,
                );
            }
            AnalysisOutcome::Failed { error, details } => {
                if let Some(details) = details {
                    tracing::error!(details = %details, "analysis failed: {}", error);
                }
                self.notify(format!("Analysis failed: {}", error), NotificationKind::Error);
            }
        }
        Ok(outcome)
    }

    /// Switch tabs; entering the visual tab rebuilds the enhanced charts
    pub fn select_tab(&mut self, tab: Tab) {
        let transition = self.tabs.select(tab);
        log_document_error(transition.apply(&mut self.document));
        if transition.enters_visual() {
            self.rebuild_enhanced_charts();
        }
    }

    /// Re-render the timeline of the open report with a new filter
    pub fn set_timeline_filter(&mut self, filter: TimelineFilter) {
        self.filter = filter;
        let Some(report) = &self.current else {
            return;
        };
        let timeline = html::render_timeline(&report.non_technical_summaries, &self.filter);
        let controls = html::render_filter_controls(&self.filter);
        log_document_error(self.document.mount(Tab::Timeline.content_id(), &timeline));
        log_document_error(self.document.mount(ids::FILTER_CONTROLS, &controls));
    }

    /// Remove toasts whose lifetime has elapsed
    pub fn expire_notifications(&mut self, now: Instant) -> usize {
        self.notifier.expire(&mut self.document, now)
    }

    fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notifier
            .notify(&mut self.document, message, kind, Instant::now());
    }

    fn rebuild_enhanced_charts(&mut self) {
        let (Some(report), Some(mounted)) = (&self.current, &self.visual_mounted) else {
            return;
        };
        self.enhanced_generation += 1;
        self.enhanced = EnhancedChartSet::create(
            report,
            mounted,
            self.enhanced_generation,
            &mut self.document,
        );
    }
}

/// Document failures are never fatal to the controller
fn log_document_error<T>(result: Result<T, DocumentError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("document update skipped: {}", e);
            None
        }
    }
}
