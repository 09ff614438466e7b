//! Asynchronous command dispatch.
//!
//! Every user action runs its network call on a worker task, waits a bounded
//! time for the result, and hands the outcome back to the single UI-affinity
//! context as one task:
//!
//! - `UiContext` / `UiHandle`: the FIFO queue the UI loop drains when idle
//! - `CommandRunner`: bounded worker pool + timeout around a `Transport`
//! - `Dispatcher`: spawn, execute, post exactly one completion
//! - `TriggerControl`: disable-while-in-flight guard against double submission
//! - `Liveness`: epoch tokens that let late outcomes for disposed views be dropped

pub mod command;
pub mod control;
pub mod liveness;
pub mod ui_context;

pub use command::{CommandRunner, Dispatcher, Outcome, DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT};
pub use control::{ControlLease, TriggerControl};
pub use liveness::{LiveToken, Liveness};
pub use ui_context::{UiContext, UiHandle};
