use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Enabled/disabled state of a control that triggers a command.
#[derive(Debug, Clone)]
pub struct TriggerControl {
    enabled: Arc<AtomicBool>,
}

/// Proof that a control is disabled for one in-flight command.
///
/// Re-enables the control exactly once: on [`ControlLease::release`], or on
/// drop if it was never released.
#[derive(Debug)]
pub struct ControlLease {
    enabled: Arc<AtomicBool>,
    released: bool,
}

impl Default for TriggerControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerControl {
    pub fn new() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Disable the control, or return None if a command already holds it.
    pub fn try_acquire(&self) -> Option<ControlLease> {
        self.enabled
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ControlLease {
                enabled: Arc::clone(&self.enabled),
                released: false,
            })
    }
}

impl ControlLease {
    pub fn release(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        if !self.released {
            self.released = true;
            self.enabled.store(true, Ordering::Release);
        }
    }
}

impl Drop for ControlLease {
    fn drop(&mut self) {
        self.restore();
    }
}
