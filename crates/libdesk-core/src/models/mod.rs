//! Data models for library entities.
//!
//! - `Book`: catalogue entries (search results, reference list, admin catalogue)
//! - `BorrowRecord`: one lending of a book, current or historical
//! - `ShelfEntry`: a book saved to a personal bookshelf category
//! - `Recommendation`: a purchase suggestion and its review status
//! - `CategoryStat`: per-category counts for the admin statistics view

pub mod book;
pub mod borrow;
pub mod recommendation;
pub mod shelf;
pub mod stats;

pub use book::Book;
pub use borrow::BorrowRecord;
pub use recommendation::Recommendation;
pub use shelf::ShelfEntry;
pub use stats::CategoryStat;

use serde::de::DeserializeOwned;

/// A row type that can be listed in a panel table.
pub trait Record: DeserializeOwned + Send + 'static {
    const COLUMNS: &'static [&'static str];

    /// One string per column, in column order. Missing values are empty.
    fn cells(&self) -> Vec<String>;

    /// Whether the row matches a free-text filter (already lowercased).
    fn matches(&self, needle: &str) -> bool {
        self.cells()
            .iter()
            .any(|cell| cell.to_lowercase().contains(needle))
    }
}

pub(crate) fn cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}
