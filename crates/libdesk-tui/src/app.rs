//! Application state for the terminal front end.
//!
//! `App` owns the `TabController` (all display state) and the UI context that
//! command outcomes are posted to. Everything here runs on the UI loop.

use std::path::PathBuf;

use libdesk_core::dispatch::UiContext;
use libdesk_core::panels::{
    BorrowAdminPanel, CurrentBorrowsPanel, HistoryPanel, ListPanel, ManagementPanel,
    RecommendationAdminPanel, RecommendationPanel, ReferencePanel, SearchPanel, ShelfPanel,
    StatisticsPanel,
};
use libdesk_core::{Notice, NoticeLevel, PanelKind, TabController};
use tracing::{error, info};

/// Rows moved by PageUp/PageDown
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Maximum characters accepted in a text prompt
const MAX_INPUT_LENGTH: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Editing(InputTarget),
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// What the text prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Search,
    Filter,
    ShelfCategory,
    RecommendTitle,
    RecommendAuthor,
    RecommendReason,
}

impl InputTarget {
    pub fn label(&self) -> &'static str {
        match self {
            InputTarget::Search => "Search",
            InputTarget::Filter => "Filter",
            InputTarget::ShelfCategory => "Shelf category",
            InputTarget::RecommendTitle => "Title",
            InputTarget::RecommendAuthor => "Author",
            InputTarget::RecommendReason => "Reason",
        }
    }
}

/// Fields collected so far for a purchase suggestion.
#[derive(Debug, Default)]
struct RecommendationDraft {
    title: String,
    author: String,
}

pub struct App {
    pub tabs: TabController,
    ui: UiContext<TabController>,
    pub state: AppState,
    pub input: String,
    draft: RecommendationDraft,
    pub status_message: Option<String>,
    export_dir: PathBuf,
    user_name: String,
}

impl App {
    pub fn new(tabs: TabController, ui: UiContext<TabController>, export_dir: PathBuf) -> Self {
        let user_name = tabs.context().user_name.clone();
        Self {
            tabs,
            ui,
            state: AppState::Normal,
            input: String::new(),
            draft: RecommendationDraft::default(),
            status_message: None,
            export_dir,
            user_name,
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Run every task waiting on the UI context.
    pub fn drain(&mut self) -> usize {
        self.ui.run_pending(&mut self.tabs)
    }

    pub fn active_kind(&self) -> PanelKind {
        self.tabs.active_panel().kind()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.tabs.current_notice()
    }

    pub fn dismiss_notice(&mut self) {
        self.tabs.dismiss_notice();
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn switch_tab(&mut self, index: usize) {
        if self.tabs.activate(index) {
            self.status_message = None;
        }
    }

    pub fn next_tab(&mut self) {
        if self.tabs.activate_next() {
            self.status_message = None;
        }
    }

    pub fn prev_tab(&mut self) {
        if self.tabs.activate_prev() {
            self.status_message = None;
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let panel = self.tabs.active_panel_mut();
        let current = panel.selection();
        panel.select(current.saturating_add_signed(delta));
    }

    pub fn select_first(&mut self) {
        self.tabs.active_panel_mut().select(0);
    }

    pub fn select_last(&mut self) {
        self.tabs.active_panel_mut().select(usize::MAX);
    }

    pub fn refresh(&mut self) {
        if !self.tabs.refresh_active() && self.tabs.active_panel().load_state().is_some() {
            self.status_message = Some("Already loading...".to_string());
        }
    }

    // ========================================================================
    // Text prompt
    // ========================================================================

    pub fn begin_input(&mut self, target: InputTarget) {
        self.input = match target {
            InputTarget::Search => self
                .tabs
                .panel::<SearchPanel>()
                .map(|p| p.query().to_string())
                .unwrap_or_default(),
            InputTarget::Filter => self.current_filter().unwrap_or_default(),
            _ => String::new(),
        };
        self.state = AppState::Editing(target);
    }

    /// `/` searches on the search tab and filters everywhere else.
    pub fn begin_search_or_filter(&mut self) {
        match self.active_kind() {
            PanelKind::Search => self.begin_input(InputTarget::Search),
            _ => self.begin_input(InputTarget::Filter),
        }
    }

    pub fn push_input(&mut self, c: char) {
        if self.input.chars().count() < MAX_INPUT_LENGTH && !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn cancel_input(&mut self) {
        self.input.clear();
        self.draft = RecommendationDraft::default();
        self.state = AppState::Normal;
    }

    pub fn submit_input(&mut self) {
        let AppState::Editing(target) = self.state else {
            return;
        };
        let text = std::mem::take(&mut self.input);
        self.state = AppState::Normal;

        match target {
            InputTarget::Search => {
                let started = self
                    .tabs
                    .with_panel::<SearchPanel, _>(|panel, ctx| panel.search(ctx, &text))
                    .unwrap_or(false);
                self.status_message = Some(if started {
                    "Searching...".to_string()
                } else {
                    "A search is already running".to_string()
                });
            }
            InputTarget::Filter => self.apply_filter(&text),
            InputTarget::ShelfCategory => {
                let sent = self
                    .tabs
                    .with_panel::<SearchPanel, _>(|panel, ctx| {
                        panel.add_selected_to_shelf(ctx, &text)
                    })
                    .unwrap_or(false);
                self.report_action(sent, "Adding to bookshelf...");
            }
            InputTarget::RecommendTitle => {
                if text.trim().is_empty() {
                    self.status_message = Some("A title is required".to_string());
                    return;
                }
                self.draft.title = text;
                self.state = AppState::Editing(InputTarget::RecommendAuthor);
            }
            InputTarget::RecommendAuthor => {
                self.draft.author = text;
                self.state = AppState::Editing(InputTarget::RecommendReason);
            }
            InputTarget::RecommendReason => {
                let draft = std::mem::take(&mut self.draft);
                let sent = self
                    .tabs
                    .with_panel::<RecommendationPanel, _>(|panel, ctx| {
                        panel.submit(ctx, &draft.title, &draft.author, &text)
                    })
                    .unwrap_or(false);
                self.report_action(sent, "Submitting recommendation...");
            }
        }
    }

    fn apply_filter(&mut self, text: &str) {
        fn set<P: ListPanel>(tabs: &mut TabController, text: &str) {
            if let Some(panel) = tabs.panel_mut::<P>() {
                panel.records_mut().set_filter(text);
            }
        }

        match self.active_kind() {
            PanelKind::Search => {}
            PanelKind::Shelf => set::<ShelfPanel>(&mut self.tabs, text),
            PanelKind::CurrentBorrows => set::<CurrentBorrowsPanel>(&mut self.tabs, text),
            PanelKind::History => set::<HistoryPanel>(&mut self.tabs, text),
            PanelKind::Recommendation => set::<RecommendationPanel>(&mut self.tabs, text),
            PanelKind::Reference => set::<ReferencePanel>(&mut self.tabs, text),
            PanelKind::Management => set::<ManagementPanel>(&mut self.tabs, text),
            PanelKind::BorrowAdmin => set::<BorrowAdminPanel>(&mut self.tabs, text),
            PanelKind::Statistics => set::<StatisticsPanel>(&mut self.tabs, text),
            PanelKind::RecommendationAdmin => set::<RecommendationAdminPanel>(&mut self.tabs, text),
        }
    }

    /// Filter text of the active panel, if it is a filterable list.
    pub fn current_filter(&self) -> Option<String> {
        fn get<P: ListPanel>(tabs: &TabController) -> Option<String> {
            tabs.panel::<P>().map(|p| p.records().filter().to_string())
        }

        match self.active_kind() {
            PanelKind::Search => None,
            PanelKind::Shelf => get::<ShelfPanel>(&self.tabs),
            PanelKind::CurrentBorrows => get::<CurrentBorrowsPanel>(&self.tabs),
            PanelKind::History => get::<HistoryPanel>(&self.tabs),
            PanelKind::Recommendation => get::<RecommendationPanel>(&self.tabs),
            PanelKind::Reference => get::<ReferencePanel>(&self.tabs),
            PanelKind::Management => get::<ManagementPanel>(&self.tabs),
            PanelKind::BorrowAdmin => get::<BorrowAdminPanel>(&self.tabs),
            PanelKind::Statistics => get::<StatisticsPanel>(&self.tabs),
            PanelKind::RecommendationAdmin => get::<RecommendationAdminPanel>(&self.tabs),
        }
    }

    // ========================================================================
    // Panel actions
    // ========================================================================

    fn report_action(&mut self, sent: bool, pending: &str) {
        self.status_message = Some(if sent {
            pending.to_string()
        } else {
            "Nothing selected, or the previous request is still running".to_string()
        });
    }

    pub fn borrow_selected(&mut self) {
        if self.active_kind() != PanelKind::Search {
            return;
        }
        if let Some(sent) = self
            .tabs
            .with_panel::<SearchPanel, _>(|panel, ctx| panel.borrow_selected(ctx))
        {
            self.report_action(sent, "Borrowing...");
        }
    }

    pub fn add_to_shelf(&mut self) {
        if self.active_kind() == PanelKind::Search {
            self.begin_input(InputTarget::ShelfCategory);
        }
    }

    /// `t`: return on the borrow tab, forced return on the admin lending tab.
    pub fn return_selected(&mut self) {
        let sent = match self.active_kind() {
            PanelKind::CurrentBorrows => self
                .tabs
                .with_panel::<CurrentBorrowsPanel, _>(|panel, ctx| panel.return_selected(ctx)),
            PanelKind::BorrowAdmin => self
                .tabs
                .with_panel::<BorrowAdminPanel, _>(|panel, ctx| panel.force_return_selected(ctx)),
            _ => None,
        };
        if let Some(sent) = sent {
            self.report_action(sent, "Returning...");
        }
    }

    pub fn renew_selected(&mut self) {
        if self.active_kind() != PanelKind::CurrentBorrows {
            return;
        }
        if let Some(sent) = self
            .tabs
            .with_panel::<CurrentBorrowsPanel, _>(|panel, ctx| panel.renew_selected(ctx))
        {
            self.report_action(sent, "Renewing...");
        }
    }

    /// `d`: remove from the shelf, or delete from the catalogue.
    pub fn delete_selected(&mut self) {
        let sent = match self.active_kind() {
            PanelKind::Shelf => self
                .tabs
                .with_panel::<ShelfPanel, _>(|panel, ctx| panel.remove_selected(ctx)),
            PanelKind::Management => self
                .tabs
                .with_panel::<ManagementPanel, _>(|panel, ctx| panel.delete_selected(ctx)),
            _ => None,
        };
        if let Some(sent) = sent {
            self.report_action(sent, "Removing...");
        }
    }

    pub fn review_selected(&mut self, approve: bool) {
        if self.active_kind() != PanelKind::RecommendationAdmin {
            return;
        }
        if let Some(sent) = self
            .tabs
            .with_panel::<RecommendationAdminPanel, _>(|panel, ctx| {
                panel.review_selected(ctx, approve)
            })
        {
            self.report_action(sent, if approve { "Approving..." } else { "Rejecting..." });
        }
    }

    pub fn cycle_shelf_category(&mut self) {
        if self.active_kind() != PanelKind::Shelf {
            return;
        }
        let Some(panel) = self.tabs.panel_mut::<ShelfPanel>() else {
            return;
        };
        // The running load was built for the old category
        if !panel.cycle_category() {
            self.status_message = Some("Already loading...".to_string());
            return;
        }
        self.status_message = Some(format!("Category: {}", panel.category().unwrap_or("all")));
        self.tabs.refresh_active();
    }

    pub fn start_recommendation(&mut self) {
        if self.active_kind() == PanelKind::Recommendation {
            self.draft = RecommendationDraft::default();
            self.begin_input(InputTarget::RecommendTitle);
        }
    }

    pub fn export_history(&mut self) {
        if self.active_kind() != PanelKind::History {
            return;
        }
        let Some(panel) = self.tabs.panel::<HistoryPanel>() else {
            return;
        };
        match panel.export(&self.export_dir, &self.user_name) {
            Ok(path) => {
                self.tabs.notify(Notice::info(
                    PanelKind::History.title(),
                    format!("Exported to {}", path.display()),
                ));
            }
            Err(e) => {
                error!(error = %e, "History export failed");
                self.tabs.notify(Notice {
                    level: NoticeLevel::Error,
                    title: PanelKind::History.title().to_string(),
                    message: format!("{:#}", e),
                });
            }
        }
    }

    pub fn request_quit(&mut self) {
        self.state = AppState::ConfirmingQuit;
    }

    pub fn quit(&mut self) {
        info!("Quit requested");
        self.tabs.dispose();
        self.state = AppState::Quitting;
    }
}
