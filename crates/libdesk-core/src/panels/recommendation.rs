use crate::api::Request;
use crate::dispatch::{Liveness, TriggerControl};
use crate::models::Recommendation;
use crate::tabs::{PanelContext, PanelKind};

use super::records::{list_panel, submit_action, ListPanel, RecordList};

const LIST_URI: &str = "library/recommendations/list";
const SUBMIT_URI: &str = "library/recommendations/submit";

/// The user's own purchase suggestions and a form to add one.
#[derive(Debug, Default)]
pub struct RecommendationPanel {
    records: RecordList<Recommendation>,
    submit_control: TriggerControl,
    liveness: Liveness,
}

impl RecommendationPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_control(&self) -> &TriggerControl {
        &self.submit_control
    }

    /// Suggest a book for purchase. A title is required; the other fields may
    /// be blank.
    pub fn submit(&self, ctx: &PanelContext, title: &str, author: &str, reason: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let request = Request::new(SUBMIT_URI)
            .param("title", title)
            .param("author", author.trim())
            .param("reason", reason.trim());
        submit_action::<RecommendationPanel>(
            ctx,
            PanelKind::Recommendation,
            self.liveness.token(),
            &self.submit_control,
            request,
        )
    }
}

impl ListPanel for RecommendationPanel {
    type Row = Recommendation;

    fn records(&self) -> &RecordList<Recommendation> {
        &self.records
    }

    fn records_mut(&mut self) -> &mut RecordList<Recommendation> {
        &mut self.records
    }

    fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    fn load_request(&self, _ctx: &PanelContext) -> Request {
        Request::new(LIST_URI)
    }
}

list_panel!(RecommendationPanel, PanelKind::Recommendation);
