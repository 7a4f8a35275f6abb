//! Report view tabs
//!
//! Exactly one tab is active at a time. The initial tab is the executive
//! summary and transitions only happen on explicit selection.

use crate::document::{Document, DocumentError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Executive,
    Timeline,
    Technical,
    Visual,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Executive, Tab::Timeline, Tab::Technical, Tab::Visual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Executive => "executive",
            Tab::Timeline => "timeline",
            Tab::Technical => "technical",
            Tab::Visual => "visual",
        }
    }

    pub fn parse(s: &str) -> Option<Tab> {
        Tab::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Executive => "Executive Summary",
            Tab::Timeline => "Timeline",
            Tab::Technical => "Technical Details",
            Tab::Visual => "Visual Analytics",
        }
    }

    /// Element id of the tab's content region
    pub fn content_id(&self) -> &'static str {
        match self {
            Tab::Executive => "executiveTab",
            Tab::Timeline => "timelineTab",
            Tab::Technical => "technicalTab",
            Tab::Visual => "visualTab",
        }
    }

    /// Element id of the tab's navigation button
    pub fn button_id(&self) -> &'static str {
        match self {
            Tab::Executive => "tab-executive",
            Tab::Timeline => "tab-timeline",
            Tab::Technical => "tab-technical",
            Tab::Visual => "tab-visual",
        }
    }
}

/// A tab change, produced by [`TabState::select`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabTransition {
    pub from: Tab,
    pub to: Tab,
}

impl TabTransition {
    /// Entering the visual tab requires the enhanced charts to be rebuilt
    pub fn enters_visual(&self) -> bool {
        self.to == Tab::Visual
    }

    /// Hide every tab's content except the target and mark its button active
    pub fn apply<D: Document + ?Sized>(&self, document: &mut D) -> Result<(), DocumentError> {
        for tab in Tab::ALL {
            document.set_hidden(tab.content_id(), tab != self.to)?;
            document.set_active(tab.button_id(), tab == self.to)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TabState {
    active: Tab,
}

impl TabState {
    pub fn new() -> Self {
        TabState::default()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn select(&mut self, tab: Tab) -> TabTransition {
        let from = self.active;
        self.active = tab;
        TabTransition { from, to: tab }
    }

    /// Return to the initial tab (used when a new report is rendered)
    pub fn reset(&mut self) -> TabTransition {
        self.select(Tab::Executive)
    }
}
