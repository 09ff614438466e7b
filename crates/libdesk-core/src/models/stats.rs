use serde::{Deserialize, Serialize};

use super::{cell, Record};

/// Per-category totals for the admin statistics view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStat {
    #[serde(alias = "categoryName")]
    pub category: Option<String>,
    #[serde(rename = "bookCount", default)]
    pub book_count: Option<i64>,
    #[serde(rename = "borrowCount", default)]
    pub borrow_count: Option<i64>,
}

impl CategoryStat {
    /// Borrows per book, for the share column.
    pub fn circulation(&self) -> Option<f64> {
        match (self.book_count, self.borrow_count) {
            (Some(books), Some(borrows)) if books > 0 => Some(borrows as f64 / books as f64),
            _ => None,
        }
    }
}

impl Record for CategoryStat {
    const COLUMNS: &'static [&'static str] = &["Category", "Books", "Borrows", "Borrows/Book"];

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.category),
            cell(&self.book_count),
            cell(&self.borrow_count),
            self.circulation()
                .map(|c| format!("{:.2}", c))
                .unwrap_or_default(),
        ]
    }
}
