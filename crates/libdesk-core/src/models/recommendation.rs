use serde::{Deserialize, Serialize};

use super::{cell, Record};

/// A purchase suggestion submitted by a reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(alias = "recommendationId")]
    pub id: Option<i64>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub reason: Option<String>,
    #[serde(alias = "userName")]
    pub recommender: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "createdAt", alias = "createTime")]
    pub created_at: Option<String>,
}

impl Recommendation {
    pub fn is_pending(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("pending"))
            .unwrap_or(true)
    }
}

impl Record for Recommendation {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Title", "Author", "Reason", "From", "Status", "Submitted"];

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            cell(&self.title),
            cell(&self.author),
            cell(&self.reason),
            cell(&self.recommender),
            cell(&self.status),
            cell(&self.created_at),
        ]
    }
}
