//! Reload semantics for panels that own server-backed data.

use std::fmt;

use crate::tabs::PanelContext;

/// Where a panel is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationState {
    #[default]
    Inactive,
    Loading,
    Loaded,
    Failed,
}

impl fmt::Display for ActivationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationState::Inactive => write!(f, "Idle"),
            ActivationState::Loading => write!(f, "Loading..."),
            ActivationState::Loaded => write!(f, "Loaded"),
            ActivationState::Failed => write!(f, "Load failed"),
        }
    }
}

/// Issued when a load cycle starts; redeemed exactly once when it ends.
#[derive(Debug)]
pub struct LoadTicket {
    cycle: u64,
}

/// Per-panel load state. At most one cycle is `Loading` at a time.
#[derive(Debug, Default)]
pub struct RefreshState {
    state: ActivationState,
    cycle: u64,
}

impl RefreshState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ActivationState::Loading
    }

    /// Number of load cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    /// Start a cycle. Returns None while a cycle is already in flight; the
    /// request is coalesced into the running one.
    pub fn begin(&mut self) -> Option<LoadTicket> {
        if self.is_loading() {
            return None;
        }
        self.cycle += 1;
        self.state = ActivationState::Loading;
        Some(LoadTicket { cycle: self.cycle })
    }

    /// End the cycle the ticket belongs to. Returns false for a ticket that
    /// does not match the running cycle.
    pub fn finish(&mut self, ticket: LoadTicket, succeeded: bool) -> bool {
        if !self.is_loading() || ticket.cycle != self.cycle {
            return false;
        }
        self.state = if succeeded {
            ActivationState::Loaded
        } else {
            ActivationState::Failed
        };
        true
    }
}

/// Capability of a panel that can reload its own data.
pub trait Refreshable {
    /// Start a load cycle unless one is already running.
    /// Returns true if a request was dispatched.
    fn refresh(&mut self, ctx: &PanelContext) -> bool;

    fn activation_state(&self) -> ActivationState;
}
