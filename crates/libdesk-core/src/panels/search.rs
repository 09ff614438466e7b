use std::any::Any;

use tracing::{debug, warn};

use crate::api::{decode_list, Request};
use crate::dispatch::{Liveness, TriggerControl};
use crate::models::{Book, Record};
use crate::tabs::{Notice, Panel, PanelContext, PanelKind, TableModel};

use super::records::submit_action;
use super::{CurrentBorrowsPanel, ShelfPanel};

const SEARCH_URI: &str = "library/books/search";
const BORROW_URI: &str = "library/borrow";
const SHELF_ADD_URI: &str = "library/bookshelf/add";

/// Category used when the user does not name one.
pub const DEFAULT_SHELF_CATEGORY: &str = "默认";

/// Catalogue search. Results come from explicit queries, so there is
/// nothing to reload on activation.
#[derive(Debug, Default)]
pub struct SearchPanel {
    query: String,
    results: Vec<Book>,
    selection: usize,
    searched: bool,
    search_control: TriggerControl,
    borrow_control: TriggerControl,
    shelf_control: TriggerControl,
    liveness: Liveness,
}

impl SearchPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Book] {
        &self.results
    }

    pub fn has_searched(&self) -> bool {
        self.searched
    }

    pub fn is_searching(&self) -> bool {
        !self.search_control.is_enabled()
    }

    pub fn selected(&self) -> Option<&Book> {
        self.results.get(self.selection)
    }

    pub fn search_control(&self) -> &TriggerControl {
        &self.search_control
    }

    pub fn borrow_control(&self) -> &TriggerControl {
        &self.borrow_control
    }

    /// Run a keyword search. An empty keyword lists the whole catalogue.
    /// Returns false if a search is already running.
    pub fn search(&mut self, ctx: &PanelContext, keyword: &str) -> bool {
        let Some(lease) = self.search_control.try_acquire() else {
            debug!("Search already running");
            return false;
        };
        self.query = keyword.trim().to_string();
        let request = Request::new(SEARCH_URI).param("keyword", &self.query);

        ctx.dispatcher
            .submit(request, self.liveness.token(), Some(lease), |tabs, outcome| {
                match outcome.into_payload().and_then(decode_list::<Book>) {
                    Ok(books) => {
                        let foreground = tabs.is_active::<SearchPanel>();
                        if let Some(panel) = tabs.panel_mut::<SearchPanel>() {
                            panel.show_results(books, foreground);
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Search failed");
                        tabs.notify(Notice::error(PanelKind::Search.title(), &e));
                    }
                }
            });
        true
    }

    fn show_results(&mut self, books: Vec<Book>, foreground: bool) {
        self.results = books;
        self.searched = true;
        if foreground {
            self.selection = 0;
        } else {
            self.selection = self.selection.min(self.results.len().saturating_sub(1));
        }
    }

    pub fn borrow_selected(&self, ctx: &PanelContext) -> bool {
        let Some(book_id) = self.selected().and_then(|b| b.id) else {
            return false;
        };
        let request = Request::new(BORROW_URI).param("bookId", book_id);
        submit_action::<CurrentBorrowsPanel>(
            ctx,
            PanelKind::Search,
            self.liveness.token(),
            &self.borrow_control,
            request,
        )
    }

    /// Save the selected book to a bookshelf category, creating the category
    /// on the server if it does not exist yet.
    pub fn add_selected_to_shelf(&self, ctx: &PanelContext, category: &str) -> bool {
        let Some(book_id) = self.selected().and_then(|b| b.id) else {
            return false;
        };
        let category = match category.trim() {
            "" => DEFAULT_SHELF_CATEGORY,
            named => named,
        };
        let request = Request::new(SHELF_ADD_URI)
            .param("bookId", book_id)
            .param("category", category);
        submit_action::<ShelfPanel>(
            ctx,
            PanelKind::Search,
            self.liveness.token(),
            &self.shelf_control,
            request,
        )
    }
}

impl Panel for SearchPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Search
    }

    fn table(&self) -> TableModel {
        TableModel {
            columns: Book::COLUMNS.to_vec(),
            rows: self.results.iter().map(Record::cells).collect(),
        }
    }

    fn selection(&self) -> usize {
        self.selection
    }

    fn select(&mut self, index: usize) {
        self.selection = index.min(self.results.len().saturating_sub(1));
    }

    fn dispose(&mut self) {
        self.liveness.dispose();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
