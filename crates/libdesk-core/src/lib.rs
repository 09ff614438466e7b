//! Core library for libdesk, a terminal client for a campus library service.
//!
//! Everything here is front-end agnostic:
//!
//! - `api`: request/response envelope, errors and the HTTP transport
//! - `dispatch`: bounded command execution, the UI-affinity executor,
//!   double-submit guards and stale-view tokens
//! - `identity`: resolution of the session role from login data
//! - `lifecycle` / `tabs`: refresh cycles and role-based tab composition
//! - `panels` / `models`: the data behind each tab
//! - `export`, `config`, `session`

pub mod api;
pub mod config;
pub mod dispatch;
pub mod export;
pub mod identity;
pub mod lifecycle;
pub mod models;
pub mod panels;
pub mod session;
pub mod tabs;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use identity::Role;
pub use session::Session;
pub use tabs::{Notice, NoticeLevel, Panel, PanelKind, TabController};
