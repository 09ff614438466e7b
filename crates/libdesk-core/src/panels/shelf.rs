use tracing::warn;

use crate::api::{decode_list, Request};
use crate::dispatch::{Liveness, TriggerControl};
use crate::lifecycle::ActivationState;
use crate::models::ShelfEntry;
use crate::tabs::{PanelContext, PanelKind};

use super::records::{list_panel, submit_action, ListPanel, RecordList};

const LIST_URI: &str = "library/bookshelf/list";
const CATEGORIES_URI: &str = "library/bookshelf/categories";
const REMOVE_URI: &str = "library/bookshelf/remove";

/// The user's personal bookshelf, optionally narrowed to one category.
#[derive(Debug, Default)]
pub struct ShelfPanel {
    records: RecordList<ShelfEntry>,
    categories: Vec<String>,
    category: Option<String>,
    remove_control: TriggerControl,
    liveness: Liveness,
}

impl ShelfPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Category names known to the server, refreshed with every load.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Narrow the shelf to one category; takes effect on the next load.
    /// Refused while a load is running, since that load was built without it.
    pub fn set_category(&mut self, category: Option<&str>) -> bool {
        if self.records.state() == ActivationState::Loading {
            return false;
        }
        self.category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);
        true
    }

    /// Move to the next known category, wrapping back to "all".
    /// Refused while a load is running.
    pub fn cycle_category(&mut self) -> bool {
        if self.records.state() == ActivationState::Loading {
            return false;
        }
        let next = match &self.category {
            None => self.categories.first().cloned(),
            Some(current) => self
                .categories
                .iter()
                .position(|c| c == current)
                .and_then(|i| self.categories.get(i + 1))
                .cloned(),
        };
        self.category = next;
        true
    }

    pub fn remove_control(&self) -> &TriggerControl {
        &self.remove_control
    }

    pub fn remove_selected(&self, ctx: &PanelContext) -> bool {
        let Some(book_id) = self.records.selected().and_then(|e| e.book_id) else {
            return false;
        };
        let request = Request::new(REMOVE_URI).param("bookId", book_id);
        submit_action::<ShelfPanel>(
            ctx,
            PanelKind::Shelf,
            self.liveness.token(),
            &self.remove_control,
            request,
        )
    }
}

impl ListPanel for ShelfPanel {
    type Row = ShelfEntry;

    fn records(&self) -> &RecordList<ShelfEntry> {
        &self.records
    }

    fn records_mut(&mut self) -> &mut RecordList<ShelfEntry> {
        &mut self.records
    }

    fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    fn load_request(&self, _ctx: &PanelContext) -> Request {
        match &self.category {
            Some(category) => Request::new(LIST_URI).param("category", category),
            None => Request::new(LIST_URI),
        }
    }

    fn on_refresh(&mut self, ctx: &PanelContext) {
        ctx.dispatcher.submit(
            Request::new(CATEGORIES_URI),
            self.liveness.token(),
            None,
            |tabs, outcome| match outcome.into_payload().and_then(decode_list::<String>) {
                Ok(categories) => {
                    if let Some(panel) = tabs.panel_mut::<ShelfPanel>() {
                        if panel
                            .category
                            .as_ref()
                            .is_some_and(|c| !categories.contains(c))
                        {
                            panel.category = None;
                        }
                        panel.categories = categories;
                    }
                }
                // The list itself still loaded; a stale category list is not worth a notice
                Err(e) => warn!(error = %e, "Failed to load bookshelf categories"),
            },
        );
    }
}

list_panel!(ShelfPanel, PanelKind::Shelf);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::Panel;
    use crate::api::Response;
    use crate::testing::{Harness, Reply, ScriptedTransport};
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn entries() -> serde_json::Value {
        json!([
            {"bookId": 3, "title": "围城", "category": "小说"},
            {"bookId": 4, "title": "Rust 权威指南", "category": "技术"}
        ])
    }

    async fn open_shelf(h: &mut Harness) {
        h.tabs.activate(1);
        h.drain();
        // list and categories, in either order
        h.next().await;
        h.next().await;
    }

    #[tokio::test]
    async fn test_refresh_loads_list_and_categories() {
        let transport = ScriptedTransport::new()
            .on(LIST_URI, Reply::ok(entries()))
            .on(CATEGORIES_URI, Reply::ok(json!(["小说", "技术"])));
        let mut h = Harness::student(transport);

        open_shelf(&mut h).await;

        let panel = h.tabs.panel::<ShelfPanel>().unwrap();
        assert_eq!(panel.load_state(), Some(ActivationState::Loaded));
        assert_eq!(panel.table().rows.len(), 2);
        assert_eq!(panel.categories(), ["小说", "技术"]);
    }

    #[tokio::test]
    async fn test_category_is_sent_and_cycles() {
        let transport = ScriptedTransport::new()
            .on(LIST_URI, Reply::ok(entries()))
            .on(CATEGORIES_URI, Reply::ok(json!(["小说", "技术"])));
        let mut h = Harness::student(transport);
        open_shelf(&mut h).await;

        let panel = h.tabs.panel_mut::<ShelfPanel>().unwrap();
        assert!(panel.cycle_category());
        assert_eq!(panel.category(), Some("小说"));
        assert!(panel.cycle_category());
        assert_eq!(panel.category(), Some("技术"));
        assert!(panel.cycle_category());
        assert_eq!(panel.category(), None);
        assert!(panel.set_category(Some(" 技术 ")));

        assert!(h.tabs.refresh_active());
        h.next().await;
        h.next().await;

        let last_list = h
            .transport
            .requests()
            .into_iter()
            .filter(|r| r.uri == LIST_URI)
            .last()
            .unwrap();
        assert_eq!(last_list.get("category"), Some("技术"));
    }

    #[tokio::test]
    async fn test_category_change_refused_while_loading() {
        let gate = Arc::new(Notify::new());
        let transport = ScriptedTransport::new()
            .on(LIST_URI, Reply::Gated(gate.clone(), Response::success(entries())))
            .on(CATEGORIES_URI, Reply::ok(json!(["小说", "技术"])));
        let mut h = Harness::student(transport);

        h.tabs.activate(1);
        h.drain();
        // categories answer first, the list is held
        h.next().await;

        let panel = h.tabs.panel_mut::<ShelfPanel>().unwrap();
        assert_eq!(panel.load_state(), Some(ActivationState::Loading));
        assert!(!panel.set_category(Some("技术")));
        assert!(!panel.cycle_category());
        assert_eq!(panel.category(), None);

        gate.notify_one();
        h.next().await;

        let panel = h.tabs.panel_mut::<ShelfPanel>().unwrap();
        assert_eq!(panel.load_state(), Some(ActivationState::Loaded));
        assert_eq!(panel.table().rows.len(), 2);
        assert!(panel.set_category(Some("技术")));
        assert_eq!(h.transport.count(LIST_URI), 1);
    }

    #[tokio::test]
    async fn test_vanished_category_resets_to_all() {
        let transport = ScriptedTransport::new()
            .on(LIST_URI, Reply::ok(entries()))
            .on(CATEGORIES_URI, Reply::ok(json!(["小说"])));
        let mut h = Harness::student(transport);
        assert!(h.tabs.panel_mut::<ShelfPanel>().unwrap().set_category(Some("已删除")));

        open_shelf(&mut h).await;
        assert_eq!(h.tabs.panel::<ShelfPanel>().unwrap().category(), None);
    }

    #[tokio::test]
    async fn test_remove_selected_reloads_shelf() {
        let transport = ScriptedTransport::new()
            .on(LIST_URI, Reply::ok(entries()))
            .on(CATEGORIES_URI, Reply::ok(json!([])))
            .on(REMOVE_URI, Reply::ok(json!(null)));
        let mut h = Harness::student(transport);
        open_shelf(&mut h).await;
        h.tabs.active_panel_mut().select(1);

        let ctx = h.ctx();
        assert!(h.tabs.panel::<ShelfPanel>().unwrap().remove_selected(&ctx));
        assert!(!h.tabs.panel::<ShelfPanel>().unwrap().remove_selected(&ctx));
        h.next().await;

        assert_eq!(h.tabs.current_notice().unwrap().message, "Done");
        assert_eq!(h.transport.count(REMOVE_URI), 1);
        let removed = h
            .transport
            .requests()
            .into_iter()
            .find(|r| r.uri == REMOVE_URI)
            .unwrap();
        assert_eq!(removed.get("bookId"), Some("4"));
        // success triggered a second list cycle
        assert_eq!(h.tabs.panel::<ShelfPanel>().unwrap().records().cycles(), 2);
    }
}
