//! Document surface the dashboard renders into
//!
//! The controller never touches markup directly. It mounts [`Fragment`]s into
//! named elements, toggles visibility, and draws charts on canvases. Mounting
//! returns a [`Mounted`] event listing the canvases that exist afterwards;
//! charts are only constructed for those.

use crate::charts::ChartConfig;
use crate::html;
use crate::notify::Toast;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Element ids of the dashboard skeleton
pub mod ids {
    pub const ROOT: &str = "dashboard";
    pub const REPO_PATH_INPUT: &str = "repoPath";
    pub const TIMEFRAME_INPUT: &str = "timeframe";
    pub const RECENT_REPORTS: &str = "recentReports";
    pub const REPORT_VIEW: &str = "reportView";
    pub const REPORT_CONTENT: &str = "reportContent";
    pub const FILTER_CONTROLS: &str = "filterControls";
    pub const COMMIT_CHART: &str = "commitChart";
    pub const IMPACT_CHART: &str = "impactChart";
    pub const RISK_CHART: &str = "riskChart";
    pub const CATEGORY_TREND_CHART: &str = "categoryTrendChart";
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("element not found: #{0}")]
    MissingElement(String),
    #[error("canvas not mounted: #{0}")]
    MissingCanvas(String),
}

/// A nested element declared by a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentElement {
    pub id: String,
    pub hidden: bool,
}

/// Markup plus the addressable elements and canvases it contains
///
/// Nested containers are marked in the markup with [`Fragment::slot`] so that
/// content can later be mounted into them independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub html: String,
    pub elements: Vec<FragmentElement>,
    pub canvases: Vec<String>,
}

impl Fragment {
    pub fn new(html: impl Into<String>) -> Self {
        Fragment {
            html: html.into(),
            ..Default::default()
        }
    }

    pub fn with_element(mut self, id: impl Into<String>, hidden: bool) -> Self {
        self.elements.push(FragmentElement {
            id: id.into(),
            hidden,
        });
        self
    }

    pub fn with_canvas(mut self, id: impl Into<String>) -> Self {
        self.canvases.push(id.into());
        self
    }

    /// Placeholder where the content of a nested element is composed
    pub fn slot(id: &str) -> String {
        format!("<!--slot:{}-->", id)
    }
}

/// Emitted once a fragment is in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mounted {
    pub element_id: String,
    pub canvases: Vec<String>,
}

impl Mounted {
    pub fn has_canvas(&self, id: &str) -> bool {
        self.canvases.iter().any(|c| c == id)
    }
}

pub trait Document {
    /// Current value of a form input
    fn input_value(&self, id: &str) -> Option<String>;

    /// Replace the content of `id` with `fragment`
    fn mount(&mut self, id: &str, fragment: &Fragment) -> Result<Mounted, DocumentError>;

    fn set_hidden(&mut self, id: &str, hidden: bool) -> Result<(), DocumentError>;

    fn set_active(&mut self, id: &str, active: bool) -> Result<(), DocumentError>;

    fn scroll_into_view(&mut self, id: &str) -> Result<(), DocumentError>;

    /// Draw (or redraw) a chart on a mounted canvas
    fn draw_chart(&mut self, canvas_id: &str, config: &ChartConfig) -> Result<(), DocumentError>;

    fn append_toast(&mut self, toast: &Toast);

    fn remove_toast(&mut self, toast_id: u64);
}

#[derive(Debug, Clone, Default)]
struct Element {
    html: String,
    hidden: bool,
    active: bool,
    owner: Option<String>,
}

/// In-memory document that serializes to a standalone dashboard page
#[derive(Debug)]
pub struct PageDocument {
    inputs: BTreeMap<String, String>,
    elements: IndexMap<String, Element>,
    /// canvas id -> owning element
    canvases: BTreeMap<String, String>,
    charts: BTreeMap<String, ChartConfig>,
    draw_counts: BTreeMap<String, u32>,
    toasts: Vec<Toast>,
    scrolled_to: Option<String>,
}

impl Default for PageDocument {
    fn default() -> Self {
        PageDocument::new()
    }
}

impl PageDocument {
    /// Document holding the standard dashboard skeleton
    pub fn new() -> Self {
        let mut doc = PageDocument {
            inputs: BTreeMap::new(),
            elements: IndexMap::new(),
            canvases: BTreeMap::new(),
            charts: BTreeMap::new(),
            draw_counts: BTreeMap::new(),
            toasts: Vec::new(),
            scrolled_to: None,
        };
        doc.inputs.insert(ids::REPO_PATH_INPUT.to_string(), String::new());
        doc.inputs.insert(ids::TIMEFRAME_INPUT.to_string(), "week".to_string());
        doc.elements.insert(ids::ROOT.to_string(), Element::default());
        doc.register(ids::ROOT, &html::render_skeleton());
        doc
    }

    pub fn set_input(&mut self, id: &str, value: impl Into<String>) {
        self.inputs.insert(id.to_string(), value.into());
    }

    /// Raw content last mounted into `id` (nested slots not expanded)
    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.html.as_str())
    }

    /// Content of `id` with every nested element composed in
    pub fn composed_html(&self, id: &str) -> Option<String> {
        let element = self.elements.get(id)?;
        let mut out = element.html.clone();
        for (child_id, child) in &self.elements {
            if child.owner.as_deref() == Some(id) {
                let slot = Fragment::slot(child_id);
                if out.contains(&slot) {
                    let child_html = self.composed_html(child_id).unwrap_or_default();
                    out = out.replace(&slot, &child_html);
                }
            }
        }
        Some(out)
    }

    pub fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn is_hidden(&self, id: &str) -> Option<bool> {
        self.elements.get(id).map(|e| e.hidden)
    }

    pub fn is_active(&self, id: &str) -> Option<bool> {
        self.elements.get(id).map(|e| e.active)
    }

    pub fn has_canvas(&self, id: &str) -> bool {
        self.canvases.contains_key(id)
    }

    pub fn chart(&self, canvas_id: &str) -> Option<&ChartConfig> {
        self.charts.get(canvas_id)
    }

    /// How many times a chart was drawn on `canvas_id` since it was mounted
    pub fn draw_count(&self, canvas_id: &str) -> u32 {
        self.draw_counts.get(canvas_id).copied().unwrap_or(0)
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn scrolled_to(&self) -> Option<&str> {
        self.scrolled_to.as_deref()
    }

    /// Serialize the whole document as a standalone HTML page
    pub fn render_html(&self) -> String {
        let body = self.composed_html(ids::ROOT).unwrap_or_default();
        let toasts: String = self.toasts.iter().map(html::render_toast).collect();
        let state = PageState {
            hidden: self
                .elements
                .iter()
                .map(|(id, e)| (id.as_str(), e.hidden))
                .collect(),
            active: self
                .elements
                .iter()
                .filter(|(_, e)| e.active)
                .map(|(id, _)| id.as_str())
                .collect(),
            inputs: &self.inputs,
            charts: &self.charts,
            scroll_to: self.scrolled_to.as_deref(),
        };
        let state_json = serde_json::to_string(&state).unwrap_or_else(|_| "{}".to_string());
        html::render_page(&body, &toasts, &state_json)
    }

    fn register(&mut self, owner: &str, fragment: &Fragment) {
        for el in &fragment.elements {
            self.elements.insert(
                el.id.clone(),
                Element {
                    hidden: el.hidden,
                    owner: Some(owner.to_string()),
                    ..Default::default()
                },
            );
        }
        for canvas in &fragment.canvases {
            self.canvases.insert(canvas.clone(), owner.to_string());
        }
        if let Some(element) = self.elements.get_mut(owner) {
            element.html = fragment.html.clone();
        }
    }

    /// Drop every element and canvas that lives inside `owner`
    fn unmount_children(&mut self, owner: &str) {
        let children: Vec<String> = self
            .elements
            .iter()
            .filter(|(_, e)| e.owner.as_deref() == Some(owner))
            .map(|(id, _)| id.clone())
            .collect();
        for child in children {
            self.unmount_children(&child);
            self.elements.shift_remove(&child);
        }

        let canvases: Vec<String> = self
            .canvases
            .iter()
            .filter(|(_, o)| o.as_str() == owner)
            .map(|(id, _)| id.clone())
            .collect();
        for canvas in canvases {
            self.canvases.remove(&canvas);
            self.charts.remove(&canvas);
            self.draw_counts.remove(&canvas);
        }
    }
}

impl Document for PageDocument {
    fn input_value(&self, id: &str) -> Option<String> {
        self.inputs.get(id).cloned()
    }

    fn mount(&mut self, id: &str, fragment: &Fragment) -> Result<Mounted, DocumentError> {
        if !self.elements.contains_key(id) {
            return Err(DocumentError::MissingElement(id.to_string()));
        }
        self.unmount_children(id);
        self.register(id, fragment);
        Ok(Mounted {
            element_id: id.to_string(),
            canvases: fragment.canvases.clone(),
        })
    }

    fn set_hidden(&mut self, id: &str, hidden: bool) -> Result<(), DocumentError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| DocumentError::MissingElement(id.to_string()))?;
        element.hidden = hidden;
        Ok(())
    }

    fn set_active(&mut self, id: &str, active: bool) -> Result<(), DocumentError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| DocumentError::MissingElement(id.to_string()))?;
        element.active = active;
        Ok(())
    }

    fn scroll_into_view(&mut self, id: &str) -> Result<(), DocumentError> {
        if !self.elements.contains_key(id) {
            return Err(DocumentError::MissingElement(id.to_string()));
        }
        self.scrolled_to = Some(id.to_string());
        Ok(())
    }

    fn draw_chart(&mut self, canvas_id: &str, config: &ChartConfig) -> Result<(), DocumentError> {
        if !self.canvases.contains_key(canvas_id) {
            return Err(DocumentError::MissingCanvas(canvas_id.to_string()));
        }
        self.charts.insert(canvas_id.to_string(), config.clone());
        *self.draw_counts.entry(canvas_id.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn append_toast(&mut self, toast: &Toast) {
        self.toasts.push(toast.clone());
    }

    fn remove_toast(&mut self, toast_id: u64) {
        self.toasts.retain(|t| t.id != toast_id);
    }
}

/// Client-side state embedded in the rendered page
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageState<'a> {
    hidden: BTreeMap<&'a str, bool>,
    active: Vec<&'a str>,
    inputs: &'a BTreeMap<String, String>,
    charts: &'a BTreeMap<String, ChartConfig>,
    scroll_to: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_elements_exist() {
        let doc = PageDocument::new();
        for id in [
            ids::RECENT_REPORTS,
            ids::REPORT_VIEW,
            ids::REPORT_CONTENT,
        ] {
            assert!(doc.has_element(id), "missing #{}", id);
        }
        for canvas in [
            ids::COMMIT_CHART,
            ids::IMPACT_CHART,
            ids::RISK_CHART,
            ids::CATEGORY_TREND_CHART,
        ] {
            assert!(doc.has_canvas(canvas), "missing canvas #{}", canvas);
        }
        assert_eq!(doc.is_hidden(ids::REPORT_VIEW), Some(true));
        assert_eq!(doc.input_value(ids::TIMEFRAME_INPUT).as_deref(), Some("week"));
    }

    #[test]
    fn test_mount_unknown_element_fails() {
        let mut doc = PageDocument::new();
        let err = doc.mount("nope", &Fragment::new("<p>x</p>")).unwrap_err();
        assert_eq!(err, DocumentError::MissingElement("nope".to_string()));
    }

    #[test]
    fn test_remount_drops_nested_elements_and_canvases() {
        let mut doc = PageDocument::new();
        let fragment = Fragment::new(format!("<div id=\"inner\">{}</div>", Fragment::slot("inner")))
            .with_element("inner", false)
            .with_canvas("innerCanvas");
        let mounted = doc.mount(ids::REPORT_CONTENT, &fragment).unwrap();
        assert!(mounted.has_canvas("innerCanvas"));
        doc.mount("inner", &Fragment::new("<p>nested</p>")).unwrap();
        assert!(doc
            .composed_html(ids::REPORT_CONTENT)
            .unwrap()
            .contains("<p>nested</p>"));

        doc.mount(ids::REPORT_CONTENT, &Fragment::new("<p>fresh</p>"))
            .unwrap();
        assert!(!doc.has_element("inner"));
        assert!(!doc.has_canvas("innerCanvas"));
    }

    #[test]
    fn test_draw_on_missing_canvas_fails() {
        let mut doc = PageDocument::new();
        let config = crate::charts::ChartConfig::empty_bar("x");
        assert_eq!(
            doc.draw_chart("enhancedCommitChart", &config),
            Err(DocumentError::MissingCanvas("enhancedCommitChart".to_string()))
        );
        doc.draw_chart(ids::COMMIT_CHART, &config).unwrap();
        assert_eq!(doc.draw_count(ids::COMMIT_CHART), 1);
    }

    #[test]
    fn test_render_html_embeds_state() {
        let mut doc = PageDocument::new();
        doc.mount(ids::RECENT_REPORTS, &Fragment::new("<p>card</p>"))
            .unwrap();
        let page = doc.render_html();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<p>card</p>"));
        assert!(page.contains("window.__clState"));
        assert!(!page.contains("<!--slot:"));
    }
}
