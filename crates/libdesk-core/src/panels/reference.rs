use crate::api::Request;
use crate::dispatch::Liveness;
use crate::models::Book;
use crate::tabs::{PanelContext, PanelKind};

use super::records::{list_panel, ListPanel, RecordList};

const LIST_URI: &str = "library/teacher/reference-books";

/// Course reference books, shown to teachers only.
#[derive(Debug, Default)]
pub struct ReferencePanel {
    records: RecordList<Book>,
    liveness: Liveness,
}

impl ReferencePanel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ListPanel for ReferencePanel {
    type Row = Book;

    fn records(&self) -> &RecordList<Book> {
        &self.records
    }

    fn records_mut(&mut self) -> &mut RecordList<Book> {
        &mut self.records
    }

    fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    fn load_request(&self, _ctx: &PanelContext) -> Request {
        Request::new(LIST_URI)
    }
}

list_panel!(ReferencePanel, PanelKind::Reference);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::Panel;
    use crate::testing::{Harness, Reply, ScriptedTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_reference_list_is_teacher_only() {
        let transport = ScriptedTransport::new().on(
            LIST_URI,
            Reply::ok(json!([{
                "bookId": 9,
                "title": "操作系统概念",
                "availableCopies": 1,
                "totalCopies": 2
            }])),
        );
        let mut h = Harness::teacher(transport);
        h.tabs.activate(5);
        h.drain();
        h.next().await;

        let table = h.tabs.panel::<ReferencePanel>().unwrap().table();
        assert_eq!(table.rows[0][1], "操作系统概念");
        assert_eq!(table.rows[0][6], "1/2");

        let student = Harness::student(ScriptedTransport::new());
        assert!(student.tabs.panel::<ReferencePanel>().is_none());
    }
}
