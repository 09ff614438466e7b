//! Panel models for every tab the client can compose.
//!
//! Panels hold data and in-flight state only; drawing them is the front
//! end's job (via [`crate::tabs::Panel::table`]).

pub mod admin;
pub mod borrows;
pub mod history;
pub mod recommendation;
pub mod records;
pub mod reference;
pub mod search;
pub mod shelf;

pub use admin::{BorrowAdminPanel, ManagementPanel, RecommendationAdminPanel, StatisticsPanel};
pub use borrows::CurrentBorrowsPanel;
pub use history::HistoryPanel;
pub use recommendation::RecommendationPanel;
pub use records::{ListPanel, RecordList};
pub use reference::ReferencePanel;
pub use search::SearchPanel;
pub use shelf::ShelfPanel;

use crate::tabs::{Panel, PanelKind};

/// Construct the panel for a tab.
pub fn build(kind: PanelKind) -> Box<dyn Panel> {
    match kind {
        PanelKind::Search => Box::new(SearchPanel::new()),
        PanelKind::Shelf => Box::new(ShelfPanel::new()),
        PanelKind::CurrentBorrows => Box::new(CurrentBorrowsPanel::new()),
        PanelKind::History => Box::new(HistoryPanel::new()),
        PanelKind::Recommendation => Box::new(RecommendationPanel::new()),
        PanelKind::Reference => Box::new(ReferencePanel::new()),
        PanelKind::Management => Box::new(ManagementPanel::new()),
        PanelKind::BorrowAdmin => Box::new(BorrowAdminPanel::new()),
        PanelKind::Statistics => Box::new(StatisticsPanel::new()),
        PanelKind::RecommendationAdmin => Box::new(RecommendationAdminPanel::new()),
    }
}
