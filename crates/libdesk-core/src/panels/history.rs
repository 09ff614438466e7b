use std::path::{Path, PathBuf};

use chrono::Local;

use crate::api::Request;
use crate::dispatch::Liveness;
use crate::export;
use crate::models::BorrowRecord;
use crate::tabs::{PanelContext, PanelKind};

use super::records::{list_panel, ListPanel, RecordList};

/// Past and present borrows for the session user.
#[derive(Debug, Default)]
pub struct HistoryPanel {
    records: RecordList<BorrowRecord>,
    liveness: Liveness,
}

impl HistoryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_cycles(&self) -> u64 {
        self.records.cycles()
    }

    pub fn filter(&self) -> &str {
        self.records.filter()
    }

    /// Keyword filter over every column.
    pub fn set_filter(&mut self, filter: &str) {
        self.records.set_filter(filter);
    }

    /// Write the rows currently shown to a text file in `dir`.
    pub fn export(&self, dir: &Path, user_name: &str) -> anyhow::Result<PathBuf> {
        export::export_history(
            dir,
            user_name,
            self.records.visible(),
            Local::now().naive_local(),
        )
    }
}

impl ListPanel for HistoryPanel {
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
        Request::new(format!("library/{}/borrow-history", ctx.role.api_scope()))
    }
}

list_panel!(HistoryPanel, PanelKind::History);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::Panel;
    use crate::testing::{Harness, Reply, ScriptedTransport};
    use serde_json::json;

    fn rows() -> serde_json::Value {
        json!([
            {"borrowId": 1, "bookId": 10, "title": "Rust 程序设计", "status": "RETURNED"},
            {"borrowId": 2, "bookId": 11, "title": "数据库系统概念", "status": "BORROWED"},
            {"borrowId": 3, "bookId": 12, "title": "Rust 异步编程", "status": "RETURNED"}
        ])
    }

    async fn loaded(h: &mut Harness) {
        h.tabs.activate(3);
        h.drain();
        h.next().await;
    }

    #[tokio::test]
    async fn test_teacher_history_uri() {
        let transport =
            ScriptedTransport::new().on("library/teacher/borrow-history", Reply::ok(rows()));
        let mut h = Harness::teacher(transport);
        loaded(&mut h).await;
        assert_eq!(h.tabs.panel::<HistoryPanel>().unwrap().table().rows.len(), 3);
    }

    #[tokio::test]
    async fn test_export_writes_visible_rows() {
        let transport =
            ScriptedTransport::new().on("library/student/borrow-history", Reply::ok(rows()));
        let mut h = Harness::student(transport);
        loaded(&mut h).await;

        let panel = h.tabs.panel_mut::<HistoryPanel>().unwrap();
        panel.set_filter("rust");
        assert_eq!(panel.table().rows.len(), 2);

        let dir = tempfile::tempdir().unwrap();
        let path = panel.export(dir.path(), "wang").unwrap();
        let text = std::fs::read_to_string(path).unwrap();

        let data: Vec<&str> = text
            .lines()
            .skip(5)
            .take_while(|line| !line.is_empty())
            .collect();
        assert_eq!(data.len(), 2);
        assert!(data[0].starts_with("1\t10\tRust 程序设计"));
        assert!(data[1].starts_with("3\t12\tRust 异步编程"));
        assert!(text.ends_with("共 2 条记录\n"));
    }
}
