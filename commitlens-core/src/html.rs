//! HTML rendering
//!
//! Builds the dashboard skeleton, recent report cards, and the four report
//! views (executive summary, timeline, technical details, visual analytics).
//! Every renderer substitutes placeholder text for missing data instead of
//! failing. All interpolated text is escaped.

use crate::charts::{capitalize, EnhancedChart};
use crate::document::{ids, Fragment};
use crate::level::Level;
use crate::model::{CommitSummary, DashboardSummary, FileExplanation, RecentReport, Report};
use crate::notify::Toast;
use crate::tabs::Tab;
use chrono::{DateTime, NaiveDateTime};
use indexmap::IndexMap;

/// Default number of files listed per file type on the technical tab
pub const DEFAULT_TECHNICAL_PREVIEW: usize = 5;

/// Categories offered by the timeline filter
pub const FILTER_CATEGORIES: [&str; 4] = ["feature", "bugfix", "documentation", "security"];

/// Timeline filter; the default shows every commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineFilter {
    pub category: Option<String>,
    pub impact: Option<Level>,
}

impl TimelineFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.impact.is_none()
    }

    pub fn matches(&self, commit: &CommitSummary) -> bool {
        let category_ok = match &self.category {
            Some(category) => commit.category == *category,
            None => true,
        };
        let impact_ok = match self.impact {
            Some(level) => commit.impact() == Some(level),
            None => true,
        };
        category_ok && impact_ok
    }
}

/// Fragments for one rendered report
#[derive(Debug, Clone)]
pub struct ReportFragments {
    pub shell: Fragment,
    pub filters: Fragment,
    pub tabs: Vec<(Tab, Fragment)>,
}

/// Render every view of a report
pub fn render_report(
    report: &Report,
    filter: &TimelineFilter,
    technical_preview: usize,
) -> ReportFragments {
    let summary = report.dashboard_summary.as_ref();
    ReportFragments {
        shell: render_report_shell(),
        filters: render_filter_controls(filter),
        tabs: vec![
            (Tab::Executive, render_executive_summary(summary)),
            (
                Tab::Timeline,
                render_timeline(&report.non_technical_summaries, filter),
            ),
            (
                Tab::Technical,
                render_technical_details(&report.non_technical_summaries, technical_preview),
            ),
            (Tab::Visual, render_visual_analytics(summary)),
        ],
    }
}

/// Dashboard skeleton mounted at the document root
pub fn render_skeleton() -> Fragment {
    let canvases = [
        ("Commit Activity", ids::COMMIT_CHART),
        ("Impact Distribution", ids::IMPACT_CHART),
        ("Risk Distribution", ids::RISK_CHART),
        ("Category Trends", ids::CATEGORY_TREND_CHART),
    ];
    let chart_cards: String = canvases
        .iter()
        .map(|(title, id)| {
            format!(
                r#"
            <div class="bg-white p-6 rounded-lg shadow">
                <h3 class="text-lg font-semibold mb-4">{title}</h3>
                <canvas id="{id}"></canvas>
            </div>"#,
                title = title,
                id = id,
            )
        })
        .collect();

    let html = format!(
        r#"<header class="mb-8">
        <h1 class="text-3xl font-bold">Commit Analysis Dashboard</h1>
    </header>
    <section class="bg-white p-6 rounded-lg shadow mb-8">
        <h2 class="text-xl font-semibold mb-4">Run Analysis</h2>
        <div class="flex space-x-4">
            <input id="{repo}" type="text" placeholder="/path/to/repository" class="flex-1 p-2 border rounded">
            <select id="{timeframe}" class="p-2 border rounded">
                <option value="week">Last Week</option>
                <option value="month">Last Month</option>
            </select>
            <button class="bg-blue-600 text-white px-4 py-2 rounded">Analyze</button>
        </div>
    </section>
    <section class="bg-white p-6 rounded-lg shadow mb-8">
        <h2 class="text-xl font-semibold mb-4">Recent Reports</h2>
        <div id="{recent}" class="space-y-4">{recent_slot}</div>
    </section>
    <section class="grid grid-cols-1 md:grid-cols-2 gap-6 mb-8">{charts}
    </section>
    <section id="{view}" class="bg-white p-6 rounded-lg shadow hidden">
        <div class="flex justify-between items-center mb-4">
            <h2 class="text-xl font-semibold">Report</h2>
            <button data-action="close-report" class="text-gray-500 hover:text-gray-700">Close</button>
        </div>
        <div id="{content}">{content_slot}</div>
    </section>"#,
        repo = ids::REPO_PATH_INPUT,
        timeframe = ids::TIMEFRAME_INPUT,
        recent = ids::RECENT_REPORTS,
        recent_slot = Fragment::slot(ids::RECENT_REPORTS),
        charts = chart_cards,
        view = ids::REPORT_VIEW,
        content = ids::REPORT_CONTENT,
        content_slot = Fragment::slot(ids::REPORT_CONTENT),
    );

    let mut fragment = Fragment::new(html)
        .with_element(ids::RECENT_REPORTS, false)
        .with_element(ids::REPORT_VIEW, true)
        .with_element(ids::REPORT_CONTENT, false);
    for (_, id) in canvases {
        fragment = fragment.with_canvas(id);
    }
    fragment
}

/// Wrap a composed document body into a standalone page
pub fn render_page(body: &str, toasts: &str, state_json: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Commit Analysis Dashboard</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>{css}</style>
</head>
<body class="bg-gray-100">
    <div id="{root}" class="container mx-auto p-8">
    {body}
    </div>
    <div id="toasts">{toasts}</div>
    <script>window.__clState = {state};</script>
    <script>{js}</script>
</body>
</html>"#,
        css = inline_css(),
        root = ids::ROOT,
        body = body,
        toasts = toasts,
        state = state_json.replace("</", "<\\/"),
        js = inline_javascript(),
    )
}

/// Toast element for a notification
pub fn render_toast(toast: &Toast) -> String {
    format!(
        r#"<div class="toast fixed top-4 right-4 p-4 rounded-lg text-white {class}" data-toast-id="{id}" data-kind="{kind}" data-ttl="{ttl}">{message}</div>"#,
        class = toast.kind.css_class(),
        id = toast.id,
        ttl = toast.ttl.as_millis(),
        kind = toast.kind.as_str(),
        message = html_escape(&toast.message),
    )
}

/// Cards for the recent reports list
pub fn render_recent_reports(reports: &[RecentReport]) -> Fragment {
    let cards: String = reports.iter().map(render_report_card).collect();
    Fragment::new(cards)
}

fn render_report_card(report: &RecentReport) -> String {
    let button = match report.report_id() {
        Some(id) => format!(
            r#"<button data-report-id="{id}" class="bg-blue-100 text-blue-700 px-3 py-1 rounded hover:bg-blue-200">
                View
            </button>"#,
            id = html_escape(id),
        ),
        None => r#"<button class="bg-gray-100 text-gray-400 px-3 py-1 rounded" disabled>View</button>"#
            .to_string(),
    };

    format!(
        r#"
<div class="bg-gray-50 p-4 rounded-lg hover:bg-gray-100 transition">
    <div class="flex justify-between items-center">
        <div>
            <h3 class="font-semibold">{timeframe} Analysis</h3>
            <p class="text-sm text-gray-600">{date}</p>
            <p class="text-sm">Commits analyzed: {count}</p>
        </div>
        {button}
    </div>
</div>"#,
        timeframe = html_escape(&report.timeframe),
        date = html_escape(&format_created_at(&report.created_at)),
        count = report.commit_count,
        button = button,
    )
}

/// Tab navigation with one slot per tab plus the filter controls
pub fn render_report_shell() -> Fragment {
    let buttons: String = Tab::ALL
        .iter()
        .map(|tab| {
            format!(
                r#"
                <button id="{id}" class="tab-button{active} px-3 py-2 text-sm font-medium" data-tab="{name}">
                    {title}
                </button>"#,
                id = tab.button_id(),
                active = if *tab == Tab::Executive { " active" } else { "" },
                name = tab.as_str(),
                title = tab.title(),
            )
        })
        .collect();
    let contents: String = Tab::ALL
        .iter()
        .map(|tab| {
            format!(
                r#"
<div id="{id}" class="tab-content{hidden}">{slot}</div>"#,
                id = tab.content_id(),
                hidden = if *tab == Tab::Executive { "" } else { " hidden" },
                slot = Fragment::slot(tab.content_id()),
            )
        })
        .collect();

    let html = format!(
        r#"<div class="mb-6">
    <div class="border-b border-gray-200">
        <nav class="flex space-x-4">{buttons}
        </nav>
    </div>
    <div id="{filter_id}" class="mt-4">{filter_slot}</div>
</div>
{contents}"#,
        buttons = buttons,
        filter_id = ids::FILTER_CONTROLS,
        filter_slot = Fragment::slot(ids::FILTER_CONTROLS),
        contents = contents,
    );

    let mut fragment = Fragment::new(html).with_element(ids::FILTER_CONTROLS, false);
    for tab in Tab::ALL {
        fragment = fragment
            .with_element(tab.button_id(), false)
            .with_element(tab.content_id(), tab != Tab::Executive);
    }
    fragment
}

/// Category and impact selects reflecting `filter`
pub fn render_filter_controls(filter: &TimelineFilter) -> Fragment {
    let selected = |on: bool| if on { " selected" } else { "" };

    let mut categories = format!(
        r#"<option value="all"{}>All Categories</option>"#,
        selected(filter.category.is_none())
    );
    for (value, label) in FILTER_CATEGORIES.iter().zip([
        "Features",
        "Bug Fixes",
        "Documentation",
        "Security",
    ]) {
        categories.push_str(&format!(
            r#"<option value="{value}"{sel}>{label}</option>"#,
            value = value,
            sel = selected(filter.category.as_deref() == Some(*value)),
            label = label,
        ));
    }

    let mut impacts = format!(
        r#"<option value="all"{}>All Impacts</option>"#,
        selected(filter.impact.is_none())
    );
    for level in Level::ALL {
        impacts.push_str(&format!(
            r#"<option value="{value}"{sel}>{label} Impact</option>"#,
            value = level.as_str(),
            sel = selected(filter.impact == Some(level)),
            label = level.title(),
        ));
    }

    Fragment::new(format!(
        r#"<select id="categoryFilter" class="p-2 border rounded mr-2">{categories}</select>
        <select id="impactFilter" class="p-2 border rounded mr-2">{impacts}</select>"#,
        categories = categories,
        impacts = impacts,
    ))
}

/// Executive summary: headline cards, highlights, and category breakdown
pub fn render_executive_summary(summary: Option<&DashboardSummary>) -> Fragment {
    let Some(summary) = summary else {
        return Fragment::new("<p>No summary available</p>");
    };

    let high_impact = summary
        .impact_distribution
        .as_ref()
        .map(|d| d.high)
        .unwrap_or_default();
    let contributor = if summary.most_active_contributor.is_empty() {
        "N/A"
    } else {
        summary.most_active_contributor.as_str()
    };

    Fragment::new(format!(
        r#"
<div class="grid grid-cols-1 md:grid-cols-3 gap-6 mb-8">
    <div class="bg-blue-50 p-6 rounded-lg">
        <h3 class="text-lg font-semibold text-blue-800">Total Updates</h3>
        <p class="text-3xl font-bold text-blue-900">{total}</p>
        <p class="text-sm text-blue-600">Over {days} days</p>
    </div>
    <div class="bg-green-50 p-6 rounded-lg">
        <h3 class="text-lg font-semibold text-green-800">Team Activity</h3>
        <p class="text-3xl font-bold text-green-900">{contributors}</p>
        <p class="text-sm text-green-600">Active contributors</p>
    </div>
    <div class="bg-purple-50 p-6 rounded-lg">
        <h3 class="text-lg font-semibold text-purple-800">High Impact</h3>
        <p class="text-3xl font-bold text-purple-900">{high}</p>
        <p class="text-sm text-purple-600">Critical changes</p>
    </div>
</div>
<div class="prose max-w-none">
    <h2>Key Highlights</h2>
    <ul>
        <li><strong>Most Active Contributor:</strong> {contributor}</li>
        <li><strong>Visual Changes:</strong> {visual} updates affecting the user interface</li>
        <li><strong>Risk Areas:</strong> {risky} changes requiring careful review</li>
    </ul>
    <h2>Activity Breakdown</h2>
    {breakdown}
</div>"#,
        total = summary.total_commits,
        days = summary.time_span_days,
        contributors = summary.active_contributors,
        high = high_impact,
        contributor = html_escape(contributor),
        visual = summary.visual_changes_count,
        risky = summary.high_risk_commits,
        breakdown = render_category_breakdown(summary.commit_categories.as_ref()),
    ))
}

/// Proportional bar per category
///
/// An absent map renders nothing; a map whose counts sum to zero renders the
/// empty-state text instead of dividing by zero.
pub fn render_category_breakdown(categories: Option<&IndexMap<String, u64>>) -> String {
    let Some(categories) = categories else {
        return String::new();
    };
    let total: u64 = categories.values().sum();
    if total == 0 {
        return "<p>No categories available</p>".to_string();
    }

    let rows: String = categories
        .iter()
        .map(|(category, count)| {
            format!(
                r#"
    <div class="mb-2">
        <div class="flex justify-between">
            <span class="font-medium">{label}</span>
            <span>{count} commits</span>
        </div>
        <div class="w-full bg-gray-200 rounded-full h-2.5">
            <div class="bg-blue-600 h-2.5 rounded-full" style="width: {width}%"></div>
        </div>
    </div>"#,
                label = html_escape(&capitalize(category)),
                count = count,
                width = *count as f64 / total as f64 * 100.0,
            )
        })
        .collect();

    format!(r#"<div class="mt-4">{}</div>"#, rows)
}

/// Left-border colour class for a commit category
pub fn category_border_class(category: &str) -> &'static str {
    match category {
        "feature" => "border-green-500",
        "bugfix" => "border-red-500",
        "documentation" => "border-blue-500",
        "security" => "border-yellow-500",
        "performance" => "border-purple-500",
        "style" => "border-pink-500",
        "test" => "border-orange-500",
        "configuration" => "border-gray-500",
        "dependency" => "border-teal-500",
        _ => "border-gray-500",
    }
}

/// Badge classes and text for an impact level
pub fn impact_badge(level: Option<Level>) -> (&'static str, &'static str) {
    match level {
        Some(Level::High) => ("bg-red-100 text-red-800", "High Impact"),
        Some(Level::Medium) => ("bg-yellow-100 text-yellow-800", "Medium Impact"),
        Some(Level::Low) => ("bg-green-100 text-green-800", "Low Impact"),
        None => ("bg-gray-100 text-gray-800", "Unknown Impact"),
    }
}

/// One entry per commit, newest first as delivered by the backend
pub fn render_timeline(summaries: &[CommitSummary], filter: &TimelineFilter) -> Fragment {
    if summaries.is_empty() {
        return Fragment::new("<p>No timeline data available</p>");
    }

    let entries: Vec<String> = summaries
        .iter()
        .filter(|c| filter.matches(c))
        .map(render_timeline_entry)
        .collect();
    if entries.is_empty() {
        return Fragment::new("<p>No commits match the selected filters</p>");
    }

    Fragment::new(format!(
        r#"<div class="space-y-8">{}</div>"#,
        entries.concat()
    ))
}

fn render_timeline_entry(commit: &CommitSummary) -> String {
    let (badge_class, badge_label) = impact_badge(commit.impact());
    let commit_id = if commit.commit_id.is_empty() {
        String::new()
    } else {
        format!(
            r#" • <code>{}</code>"#,
            html_escape(&commit.commit_id)
        )
    };
    let explanation = if commit.category_explanation.is_empty() {
        String::new()
    } else {
        format!(
            r#"
            <p class="text-xs text-gray-500">{}</p>"#,
            html_escape(&commit.category_explanation)
        )
    };
    let risk = if commit.risk_level.is_empty() {
        "Risk level unknown"
    } else {
        commit.risk_level.text.as_str()
    };

    format!(
        r#"
    <div class="border-l-4 {border} pl-4" data-category="{category}">
        <div class="flex justify-between items-start">
            <div>
                <h3 class="font-semibold text-lg">{message}</h3>
                <p class="text-sm text-gray-600">{author} • {date}{commit_id}</p>{explanation}
            </div>
            <div class="text-right">
                <span class="px-2 py-1 rounded text-sm {badge_class}">{badge_label}</span>
            </div>
        </div>
        <div class="mt-2">
            <p class="text-gray-700">{overall}</p>
        </div>
        {files}
        <div class="mt-2 text-sm text-gray-500">Risk: {risk}</div>
    </div>"#,
        border = category_border_class(&commit.category),
        category = html_escape(&commit.category),
        message = html_escape(&commit.message),
        author = html_escape(&commit.author),
        date = html_escape(&commit.date),
        commit_id = commit_id,
        explanation = explanation,
        badge_class = badge_class,
        badge_label = badge_label,
        overall = html_escape(&commit.overall_impact),
        files = render_file_explanations(&commit.file_explanations),
        risk = html_escape(risk),
    )
}

/// Nested "Files Modified" block; empty when there is nothing to list
pub fn render_file_explanations(explanations: &[FileExplanation]) -> String {
    if explanations.is_empty() {
        return String::new();
    }

    let items: String = explanations
        .iter()
        .map(|file| {
            format!(
                r#"
            <li class="border-b border-gray-200 pb-2">
                <div class="font-mono bg-gray-200 px-2 py-1 rounded inline-block mb-1">{path}</div>
                <div class="text-gray-700 ml-4">
                    <p class="mb-1">{summary}</p>
                    <p class="text-xs text-gray-500">{changes}</p>
                    <p class="text-xs text-gray-400 mt-1">Language: {language} | {complexity}</p>
                </div>
            </li>"#,
                path = html_escape(file.path_or_unknown()),
                summary = html_escape(file.summary_text()),
                changes = html_escape(&file.changes_explanation),
                language = html_escape(file.language_or_unknown()),
                complexity = html_escape(&file.complexity_level),
            )
        })
        .collect();

    format!(
        r#"<div class="files-modified mt-3 bg-gray-50 rounded p-3">
            <h4 class="font-medium text-sm mb-2">Files Modified:</h4>
            <ul class="text-sm space-y-2">{}</ul>
        </div>"#,
        items
    )
}

/// Merge `files_by_type` across commits, keeping first-seen type order
pub fn group_files_by_type(summaries: &[CommitSummary]) -> IndexMap<&str, Vec<&FileExplanation>> {
    let mut groups: IndexMap<&str, Vec<&FileExplanation>> = IndexMap::new();
    for commit in summaries {
        for (file_type, files) in &commit.files_by_type {
            groups
                .entry(file_type.as_str())
                .or_default()
                .extend(files.iter());
        }
    }
    groups
}

/// Technology breakdown listing up to `preview` files per type
pub fn render_technical_details(summaries: &[CommitSummary], preview: usize) -> Fragment {
    if summaries.is_empty() {
        return Fragment::new("<p>No technical details available</p>");
    }

    let groups: String = group_files_by_type(summaries)
        .iter()
        .map(|(file_type, files)| {
            let items: String = files
                .iter()
                .take(preview)
                .map(|file| {
                    format!(
                        r#"
                <li class="text-sm border-b border-gray-200 pb-2">
                    <div><code class="bg-gray-200 px-1 rounded">{path}</code></div>
                    <div class="mt-1 ml-4">
                        <p class="text-gray-700">{summary}</p>
                        <p class="text-xs text-gray-500">{changes}</p>
                    </div>
                </li>"#,
                        path = html_escape(file.path_or_unknown()),
                        summary = html_escape(file.summary_text()),
                        changes = html_escape(&file.changes_explanation),
                    )
                })
                .collect();
            let more = if files.len() > preview {
                format!(
                    r#"
                <li class="text-sm text-gray-500">...and {} more</li>"#,
                    files.len() - preview
                )
            } else {
                String::new()
            };

            format!(
                r#"
    <div class="bg-gray-50 p-4 rounded">
        <h4 class="font-semibold">{file_type} Files</h4>
        <p class="text-sm text-gray-600">Total changes: {total}</p>
        <ul class="mt-2 space-y-2">{items}{more}
        </ul>
    </div>"#,
                file_type = html_escape(file_type),
                total = files.len(),
                items = items,
                more = more,
            )
        })
        .collect();

    Fragment::new(format!(
        r#"<div class="space-y-6">
    <h3 class="text-lg font-semibold">Technology Breakdown</h3>{}
</div>"#,
        groups
    ))
}

/// Canvas placeholders for the enhanced charts
pub fn render_visual_analytics(summary: Option<&DashboardSummary>) -> Fragment {
    if summary.is_none() {
        return Fragment::new("<p>No visual analytics available</p>");
    }

    let cards: String = EnhancedChart::ALL
        .iter()
        .map(|chart| {
            format!(
                r#"
        <div class="bg-white p-6 rounded-lg shadow">
            <h3 class="text-lg font-semibold mb-4">{title}</h3>
            <canvas id="{id}"></canvas>
        </div>"#,
                title = chart.title(),
                id = chart.canvas_id(),
            )
        })
        .collect();

    let mut fragment = Fragment::new(format!(
        r#"<div id="visualAnalyticsContainer">
    <div class="grid grid-cols-1 md:grid-cols-2 gap-6">{}
    </div>
</div>"#,
        cards
    ));
    for chart in EnhancedChart::ALL {
        fragment = fragment.with_canvas(chart.canvas_id());
    }
    fragment
}

/// Human-readable creation time ("YYYY-MM-DD HH:MM"), or the raw value
fn format_created_at(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

/// Inline CSS styles (layout comes from the Tailwind CDN)
fn inline_css() -> &'static str {
    r#"
.tab-button {
    border-bottom: 2px solid transparent;
    color: #6b7280;
}

.tab-button.active {
    border-bottom-color: #2563eb;
    color: #1d4ed8;
}

.toast {
    z-index: 50;
    box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);
}

#toasts .toast + .toast {
    margin-top: 4.5rem;
}
"#
}

fn inline_javascript() -> &'static str {
    r#"
(function() {
    const state = window.__clState || {};
    const charts = {};
    const enhanced = ['enhancedCommitChart', 'enhancedImpactChart', 'enhancedRiskChart', 'enhancedCategoryTrendChart'];

    function draw(id) {
        const config = (state.charts || {})[id];
        const canvas = document.getElementById(id);
        if (!config || !canvas || typeof Chart === 'undefined') return;
        if (charts[id]) charts[id].destroy();
        charts[id] = new Chart(canvas.getContext('2d'), JSON.parse(JSON.stringify(config)));
    }

    function switchTab(name) {
        document.querySelectorAll('.tab-content').forEach(c => c.classList.add('hidden'));
        const selected = document.getElementById(name + 'Tab');
        if (selected) selected.classList.remove('hidden');
        document.querySelectorAll('.tab-button').forEach(b => b.classList.toggle('active', b.dataset.tab === name));
        // Canvases inside a hidden tab have no size; rebuild once visible
        if (name === 'visual') enhanced.forEach(draw);
    }

    function applyState() {
        Object.entries(state.hidden || {}).forEach(([id, hidden]) => {
            const el = document.getElementById(id);
            if (el) el.classList.toggle('hidden', hidden);
        });
        document.querySelectorAll('.tab-button').forEach(b => b.classList.remove('active'));
        (state.active || []).forEach(id => {
            const el = document.getElementById(id);
            if (el) el.classList.add('active');
        });
        Object.entries(state.inputs || {}).forEach(([id, value]) => {
            const el = document.getElementById(id);
            if (el) el.value = value;
        });
    }

    document.addEventListener('DOMContentLoaded', () => {
        applyState();
        Object.keys(state.charts || {}).forEach(draw);

        document.querySelectorAll('.tab-button').forEach(button => {
            button.addEventListener('click', () => switchTab(button.dataset.tab));
        });
        document.querySelectorAll('[data-action="close-report"]').forEach(button => {
            button.addEventListener('click', () => {
                const view = document.getElementById('reportView');
                if (view) view.classList.add('hidden');
            });
        });
        document.querySelectorAll('#toasts .toast').forEach(toast => {
            const ttl = parseInt(toast.dataset.ttl, 10);
            setTimeout(() => toast.remove(), Number.isNaN(ttl) ? 3000 : ttl);
        });

        if (state.scrollTo) {
            const target = document.getElementById(state.scrollTo);
            if (target) target.scrollIntoView({ behavior: 'smooth' });
        }
    });
})();
"#
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
