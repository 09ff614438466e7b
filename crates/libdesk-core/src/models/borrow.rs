use serde::{Deserialize, Serialize};

use super::{cell, Record};

/// One instance of a book lent to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRecord {
    #[serde(rename = "borrowId", alias = "id")]
    pub borrow_id: Option<i64>,
    #[serde(rename = "bookId")]
    pub book_id: Option<i64>,
    #[serde(alias = "bookTitle")]
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    #[serde(rename = "borrowDate")]
    pub borrow_date: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    #[serde(rename = "returnDate")]
    pub return_date: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "renewCount", default)]
    pub renew_count: Option<i64>,
}

impl BorrowRecord {
    pub fn is_returned(&self) -> bool {
        self.return_date.is_some()
            || self
                .status
                .as_deref()
                .map(|s| s.eq_ignore_ascii_case("returned"))
                .unwrap_or(false)
    }

    /// Fields in history export order.
    pub fn export_fields(&self) -> [String; 7] {
        [
            cell(&self.borrow_id),
            cell(&self.book_id),
            cell(&self.title),
            cell(&self.author),
            cell(&self.borrow_date),
            cell(&self.return_date),
            cell(&self.status),
        ]
    }
}

impl Record for BorrowRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Borrow ID",
        "Book ID",
        "Title",
        "Author",
        "Borrower",
        "Borrowed",
        "Due",
        "Returned",
        "Status",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.borrow_id),
            cell(&self.book_id),
            cell(&self.title),
            cell(&self.author),
            cell(&self.user_name),
            cell(&self.borrow_date),
            cell(&self.due_date),
            cell(&self.return_date),
            cell(&self.status),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_borrow_record() {
        let json = r#"{"borrowId": 31, "bookId": 9, "bookTitle": "活着", "author": "余华",
                       "borrowDate": "2026-09-01", "dueDate": "2026-10-01", "returnDate": null,
                       "status": "BORROWED"}"#;
        let record: BorrowRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title.as_deref(), Some("活着"));
        assert!(!record.is_returned());
        assert_eq!(
            record.export_fields(),
            ["31", "9", "活着", "余华", "2026-09-01", "", "BORROWED"].map(String::from)
        );
    }

    #[test]
    fn test_returned_by_status_or_date() {
        let mut record: BorrowRecord = serde_json::from_str(r#"{"status": "Returned"}"#).unwrap();
        assert!(record.is_returned());
        record.status = None;
        record.return_date = Some("2026-10-02".to_string());
        assert!(record.is_returned());
    }

    #[test]
    fn test_matches_filter() {
        let record: BorrowRecord = serde_json::from_str(r#"{"title": "Rust in Action"}"#).unwrap();
        assert!(record.matches("rust"));
        assert!(!record.matches("python"));
    }
}
