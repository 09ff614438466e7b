//! Role resolution from loosely-typed identity data.
//!
//! The campus login service describes a user through up to three overlapping
//! sources: an explicit `primaryRole`, a `roles` list, and a free-text
//! `userType`. [`resolve`] walks an ordered rule list over these sources and
//! always lands on exactly one [`Role`]; missing or unrecognized data falls
//! through to [`Role::Student`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tabs::PanelKind;

/// Access-level classification that decides which panels are composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    /// Fixed, ordered panel set for this role.
    pub fn panels(&self) -> &'static [PanelKind] {
        match self {
            Role::Admin => &[
                PanelKind::Management,
                PanelKind::BorrowAdmin,
                PanelKind::Statistics,
                PanelKind::RecommendationAdmin,
            ],
            Role::Teacher => &[
                PanelKind::Search,
                PanelKind::Shelf,
                PanelKind::CurrentBorrows,
                PanelKind::History,
                PanelKind::Recommendation,
                PanelKind::Reference,
            ],
            Role::Student => &[
                PanelKind::Search,
                PanelKind::Shelf,
                PanelKind::CurrentBorrows,
                PanelKind::History,
                PanelKind::Recommendation,
            ],
        }
    }

    /// Path segment used by role-scoped URIs (`library/{scope}/...`).
    pub fn api_scope(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Teacher => write!(f, "Teacher"),
            Role::Student => write!(f, "Student"),
        }
    }
}

/// Identity data as delivered by the login service.
///
/// Deserialization never fails on shape: keys with an unexpected type are
/// treated as absent, and non-string entries in `roles` are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct IdentityRecord {
    #[serde(rename = "primaryRole", skip_serializing_if = "Option::is_none")]
    pub primary_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(rename = "userType", skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

impl IdentityRecord {
    pub fn with_primary_role(role: impl Into<String>) -> Self {
        Self {
            primary_role: Some(role.into()),
            ..Self::default()
        }
    }

    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: Some(roles.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn with_user_type(user_type: impl Into<String>) -> Self {
        Self {
            user_type: Some(user_type.into()),
            ..Self::default()
        }
    }
}

impl From<Value> for IdentityRecord {
    fn from(value: Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        let roles = value.get("roles").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        });

        Self {
            primary_role: text("primaryRole"),
            roles,
            user_type: text("userType"),
        }
    }
}

// ============================================================================
// Resolution rules
// ============================================================================

type Rule = fn(&IdentityRecord) -> Option<Role>;

/// Precedence chain; the first rule that answers wins.
const RULES: [Rule; 3] = [by_primary_role, by_role_list, by_user_type];

const ADMIN_KEYWORDS: [&str; 3] = ["admin", "管理员", "manager"];
const TEACHER_KEYWORDS: [&str; 4] = ["teacher", "教师", "staff", "教职工"];

/// Derive the single role for an identity record. Pure and total.
pub fn resolve(record: &IdentityRecord) -> Role {
    RULES
        .iter()
        .find_map(|rule| rule(record))
        .unwrap_or(Role::Student)
}

fn normalized(value: &str) -> String {
    value.trim().to_lowercase()
}

fn by_primary_role(record: &IdentityRecord) -> Option<Role> {
    let role = record
        .primary_role
        .as_deref()
        .map(normalized)
        .filter(|r| !r.is_empty())?;

    Some(match role.as_str() {
        "admin" | "manager" => Role::Admin,
        "teacher" | "staff" => Role::Teacher,
        _ => Role::Student,
    })
}

fn by_role_list(record: &IdentityRecord) -> Option<Role> {
    let roles: Vec<String> = record
        .roles
        .as_ref()
        .filter(|roles| !roles.is_empty())?
        .iter()
        .map(|r| normalized(r))
        .collect();

    let has = |names: &[&str]| roles.iter().any(|r| names.contains(&r.as_str()));

    Some(if has(&["admin", "manager"]) {
        Role::Admin
    } else if has(&["teacher", "staff"]) {
        Role::Teacher
    } else {
        Role::Student
    })
}

fn by_user_type(record: &IdentityRecord) -> Option<Role> {
    let user_type = record
        .user_type
        .as_deref()
        .map(normalized)
        .filter(|t| !t.is_empty())?;

    let mentions = |words: &[&str]| words.iter().any(|w| user_type.contains(w));

    Some(if mentions(&ADMIN_KEYWORDS) {
        Role::Admin
    } else if mentions(&TEACHER_KEYWORDS) {
        Role::Teacher
    } else {
        Role::Student
    })
}
