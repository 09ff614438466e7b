//! Shared load/select/filter machinery for list-backed panels.

use tracing::{debug, warn};

use crate::api::{decode_list, CommandError, Request};
use crate::dispatch::{LiveToken, Liveness, Outcome, TriggerControl};
use crate::lifecycle::{ActivationState, LoadTicket, RefreshState, Refreshable};
use crate::models::Record;
use crate::tabs::{Notice, Panel, PanelContext, PanelKind, TableModel};

/// Rows of one record type plus their load cycle, selection and filter.
#[derive(Debug)]
pub struct RecordList<T> {
    rows: Vec<T>,
    refresh: RefreshState,
    selection: usize,
    filter: String,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            refresh: RefreshState::new(),
            selection: 0,
            filter: String::new(),
        }
    }
}

impl<T: Record> RecordList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn state(&self) -> ActivationState {
        self.refresh.state()
    }

    pub fn cycles(&self) -> u64 {
        self.refresh.cycles()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.trim().to_lowercase();
        self.clamp_selection();
    }

    /// Rows that pass the current filter, in server order.
    pub fn visible(&self) -> Vec<&T> {
        if self.filter.is_empty() {
            self.rows.iter().collect()
        } else {
            self.rows.iter().filter(|r| r.matches(&self.filter)).collect()
        }
    }

    pub fn selection(&self) -> usize {
        self.selection
    }

    pub fn select(&mut self, index: usize) {
        self.selection = index;
        self.clamp_selection();
    }

    pub fn selected(&self) -> Option<&T> {
        self.visible().get(self.selection).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selection = self.selection.min(len.saturating_sub(1));
    }

    pub fn table(&self) -> TableModel {
        TableModel {
            columns: T::COLUMNS.to_vec(),
            rows: self.visible().into_iter().map(Record::cells).collect(),
        }
    }

    pub fn begin(&mut self) -> Option<LoadTicket> {
        self.refresh.begin()
    }

    /// Finish a load cycle. On failure the previous rows stay in place.
    /// A foreground load resets the selection to the top; a background load
    /// only keeps it in range.
    pub fn apply(
        &mut self,
        ticket: LoadTicket,
        outcome: Outcome,
        foreground: bool,
    ) -> Result<usize, CommandError> {
        let decoded = outcome
            .into_payload()
            .and_then(decode_list::<T>);

        match decoded {
            Ok(rows) => {
                if self.refresh.finish(ticket, true) {
                    self.rows = rows;
                    if foreground {
                        self.selection = 0;
                    } else {
                        self.clamp_selection();
                    }
                }
                Ok(self.rows.len())
            }
            Err(e) => {
                self.refresh.finish(ticket, false);
                Err(e)
            }
        }
    }
}

/// A panel whose content is one server-loaded list.
pub trait ListPanel: Panel + Sized {
    type Row: Record;

    fn records(&self) -> &RecordList<Self::Row>;

    fn records_mut(&mut self) -> &mut RecordList<Self::Row>;

    fn liveness(&self) -> &Liveness;

    fn load_request(&self, ctx: &PanelContext) -> Request;

    /// Called when a new load cycle has started.
    fn on_refresh(&mut self, _ctx: &PanelContext) {}
}

impl<P: ListPanel> Refreshable for P {
    fn refresh(&mut self, ctx: &PanelContext) -> bool {
        let Some(ticket) = self.records_mut().begin() else {
            return false;
        };
        let kind = self.kind();
        let request = self.load_request(ctx);
        debug!(panel = %kind, uri = %request.uri, "Refreshing panel");

        ctx.dispatcher
            .submit(request, self.liveness().token(), None, move |tabs, outcome| {
                let foreground = tabs.is_active::<P>();
                let result = match tabs.panel_mut::<P>() {
                    Some(panel) => panel.records_mut().apply(ticket, outcome, foreground),
                    None => return,
                };
                if let Err(e) = result {
                    warn!(panel = %kind, error = %e, "Panel load failed");
                    tabs.notify(Notice::error(kind.title(), &e));
                }
            });

        self.on_refresh(ctx);
        true
    }

    fn activation_state(&self) -> ActivationState {
        self.records().state()
    }
}

/// Send a mutating request on behalf of `origin`. The control stays disabled
/// until the outcome is back; on success the panel of type `R` reloads.
pub(crate) fn submit_action<R: ListPanel>(
    ctx: &PanelContext,
    origin: PanelKind,
    token: LiveToken,
    control: &TriggerControl,
    request: Request,
) -> bool {
    let Some(lease) = control.try_acquire() else {
        debug!(panel = %origin, uri = %request.uri, "Action already in flight, ignoring");
        return false;
    };

    ctx.dispatcher
        .submit(request, token, Some(lease), move |tabs, outcome| match outcome.into_message() {
            Ok(message) => {
                let message = message.unwrap_or_else(|| "Done".to_string());
                tabs.notify(Notice::info(origin.title(), message));
                let ctx = tabs.context().clone();
                if let Some(panel) = tabs.panel_mut::<R>() {
                    panel.refresh(&ctx);
                }
            }
            Err(e) => {
                warn!(panel = %origin, error = %e, "Action failed");
                tabs.notify(Notice::error(origin.title(), &e));
            }
        });
    true
}

/// Implements [`Panel`] for a [`ListPanel`] by delegating to its records.
macro_rules! list_panel {
    ($panel:ty, $kind:expr) => {
        impl $crate::tabs::Panel for $panel {
            fn kind(&self) -> $crate::tabs::PanelKind {
                $kind
            }

            fn table(&self) -> $crate::tabs::TableModel {
                $crate::panels::ListPanel::records(self).table()
            }

            fn selection(&self) -> usize {
                $crate::panels::ListPanel::records(self).selection()
            }

            fn select(&mut self, index: usize) {
                $crate::panels::ListPanel::records_mut(self).select(index)
            }

            fn refreshable(&mut self) -> Option<&mut dyn $crate::lifecycle::Refreshable> {
                Some(self)
            }

            fn load_state(&self) -> Option<$crate::lifecycle::ActivationState> {
                Some($crate::panels::ListPanel::records(self).state())
            }

            fn dispose(&mut self) {
                $crate::panels::ListPanel::liveness(self).dispose()
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }
    };
}

pub(crate) use list_panel;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Response;
    use crate::models::Book;
    use serde_json::json;

    fn loaded(titles: &[&str]) -> RecordList<Book> {
        let mut list = RecordList::new();
        let ticket = list.begin().unwrap();
        let rows: Vec<_> = titles.iter().map(|t| json!({"title": t})).collect();
        list.apply(ticket, Outcome::Completed(Response::success(json!(rows))), true)
            .unwrap();
        list
    }

    #[test]
    fn test_filter_and_selection() {
        let mut list = loaded(&["Rust Programming", "Python Basics", "Rust Atomics"]);
        list.select(2);
        assert_eq!(list.selected().and_then(|b| b.title.as_deref()), Some("Rust Atomics"));

        list.set_filter("  PYTHON ");
        assert_eq!(list.visible().len(), 1);
        assert_eq!(list.selection(), 0);
        assert_eq!(list.table().rows.len(), 1);

        list.set_filter("");
        assert_eq!(list.visible().len(), 3);
    }

    #[test]
    fn test_empty_success_clears_rows() {
        let mut list = loaded(&["One"]);
        let ticket = list.begin().unwrap();
        let count = list
            .apply(ticket, Outcome::Completed(Response::success(json!(null))), true)
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(list.state(), ActivationState::Loaded);
    }

    #[test]
    fn test_failure_preserves_rows() {
        let mut list = loaded(&["One", "Two"]);
        let ticket = list.begin().unwrap();
        let err = list
            .apply(ticket, Outcome::TransportFailure("connection reset".into()), true)
            .unwrap_err();
        assert_eq!(err, CommandError::Transport("connection reset".into()));
        assert_eq!(list.rows().len(), 2);
        assert_eq!(list.state(), ActivationState::Failed);
    }

    #[test]
    fn test_background_load_clamps_selection() {
        let mut list = loaded(&["a", "b", "c", "d"]);
        list.select(3);
        let ticket = list.begin().unwrap();
        list.apply(
            ticket,
            Outcome::Completed(Response::success(json!([{"title": "a"}, {"title": "b"}]))),
            false,
        )
        .unwrap();
        assert_eq!(list.selection(), 1);
    }
}
