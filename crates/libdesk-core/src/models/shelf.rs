use serde::{Deserialize, Serialize};

use super::{cell, Record};

/// A book saved to one of the user's bookshelf categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfEntry {
    #[serde(rename = "bookId")]
    pub book_id: Option<i64>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "addedAt", alias = "addTime")]
    pub added_at: Option<String>,
}

impl Record for ShelfEntry {
    const COLUMNS: &'static [&'static str] = &["Book ID", "Title", "Author", "Category", "Added"];

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.book_id),
            cell(&self.title),
            cell(&self.author),
            cell(&self.category),
            cell(&self.added_at),
        ]
    }
}
