use serde::{Deserialize, Serialize};

use super::{cell, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "bookId", alias = "id")]
    pub id: Option<i64>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub category: Option<String>,
    /// Copies currently on the shelf.
    #[serde(rename = "availableCopies", default)]
    pub available: Option<i64>,
    #[serde(rename = "totalCopies", default)]
    pub total: Option<i64>,
}

impl Book {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }

    pub fn is_available(&self) -> bool {
        self.available.map(|n| n > 0).unwrap_or(false)
    }
}

impl Record for Book {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Title", "Author", "ISBN", "Publisher", "Category", "Available"];

    fn cells(&self) -> Vec<String> {
        let stock = match (self.available, self.total) {
            (Some(a), Some(t)) => format!("{}/{}", a, t),
            (Some(a), None) => a.to_string(),
            _ => String::new(),
        };
        vec![
            cell(&self.id),
            cell(&self.title),
            cell(&self.author),
            cell(&self.isbn),
            cell(&self.publisher),
            cell(&self.category),
            stock,
        ]
    }
}
