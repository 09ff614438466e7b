use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Epoch owned by a view. Disposing the view (or dropping it) advances the
/// epoch, so every token captured earlier reports stale.
#[derive(Debug, Default)]
pub struct Liveness {
    epoch: Arc<AtomicU64>,
}

/// Captured at request time, checked at delivery time.
#[derive(Debug, Clone)]
pub struct LiveToken {
    epoch: Arc<AtomicU64>,
    captured: u64,
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> LiveToken {
        LiveToken {
            epoch: Arc::clone(&self.epoch),
            captured: self.epoch.load(Ordering::Acquire),
        }
    }

    pub fn dispose(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }
}

impl Drop for Liveness {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl LiveToken {
    pub fn is_live(&self) -> bool {
        self.epoch.load(Ordering::Acquire) == self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_live_until_dispose() {
        let liveness = Liveness::new();
        let token = liveness.token();
        assert!(token.is_live());

        liveness.dispose();
        assert!(!token.is_live());

        // Tokens taken after disposal belong to the new epoch
        assert!(liveness.token().is_live());
    }

    #[test]
    fn test_drop_invalidates_tokens() {
        let liveness = Liveness::new();
        let token = liveness.token();
        drop(liveness);
        assert!(!token.is_live());
    }
}
