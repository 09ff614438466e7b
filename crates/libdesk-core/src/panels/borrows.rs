use crate::api::Request;
use crate::dispatch::{Liveness, TriggerControl};
use crate::models::BorrowRecord;
use crate::tabs::{PanelContext, PanelKind};

use super::records::{list_panel, submit_action, ListPanel, RecordList};

const RETURN_URI: &str = "library/return";
const RENEW_URI: &str = "library/renew";

/// Books the user currently has out.
#[derive(Debug, Default)]
pub struct CurrentBorrowsPanel {
    records: RecordList<BorrowRecord>,
    return_control: TriggerControl,
    renew_control: TriggerControl,
    liveness: Liveness,
}

impl CurrentBorrowsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn return_control(&self) -> &TriggerControl {
        &self.return_control
    }

    pub fn renew_control(&self) -> &TriggerControl {
        &self.renew_control
    }

    fn selected_request(&self, uri: &str) -> Option<Request> {
        let borrow_id = self.records.selected()?.borrow_id?;
        Some(Request::new(uri).param("borrowId", borrow_id))
    }

    pub fn return_selected(&self, ctx: &PanelContext) -> bool {
        let Some(request) = self.selected_request(RETURN_URI) else {
            return false;
        };
        submit_action::<CurrentBorrowsPanel>(
            ctx,
            PanelKind::CurrentBorrows,
            self.liveness.token(),
            &self.return_control,
            request,
        )
    }

    pub fn renew_selected(&self, ctx: &PanelContext) -> bool {
        let Some(request) = self.selected_request(RENEW_URI) else {
            return false;
        };
        submit_action::<CurrentBorrowsPanel>(
            ctx,
            PanelKind::CurrentBorrows,
            self.liveness.token(),
            &self.renew_control,
            request,
        )
    }
}

impl ListPanel for CurrentBorrowsPanel {
    type Row = BorrowRecord;

    fn records(&self) -> &RecordList<BorrowRecord> {
        &self.records
    }

    fn records_mut(&mut self) -> &mut RecordList<BorrowRecord> {
        &mut self.records
    }

    fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    fn load_request(&self, ctx: &PanelContext) -> Request {
        Request::new(format!("library/{}/current-borrows", ctx.role.api_scope()))
    }
}

list_panel!(CurrentBorrowsPanel, PanelKind::CurrentBorrows);
