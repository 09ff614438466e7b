use tokio::sync::mpsc;
use tracing::debug;

/// A unit of work that must run on the UI context.
pub type UiTask<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Single-threaded, FIFO executor for display mutations.
///
/// The owner of the display state `S` drains it with [`UiContext::run_pending`];
/// everything else only ever holds a [`UiHandle`].
pub struct UiContext<S> {
    tx: mpsc::UnboundedSender<UiTask<S>>,
    rx: mpsc::UnboundedReceiver<UiTask<S>>,
}

/// Cloneable sender side of a [`UiContext`]. Safe to move to worker tasks.
pub struct UiHandle<S> {
    tx: mpsc::UnboundedSender<UiTask<S>>,
}

impl<S> Clone for UiHandle<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S> UiHandle<S> {
    /// Queue a task behind everything already posted.
    /// Returns false if the context has been dropped.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        if self.tx.send(Box::new(task)).is_err() {
            debug!("UI context gone, dropping task");
            return false;
        }
        true
    }
}

impl<S> Default for UiContext<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> UiContext<S> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn handle(&self) -> UiHandle<S> {
        UiHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run every queued task in order without blocking. Tasks posted while
    /// draining are run in the same pass. Returns the number of tasks run.
    pub fn run_pending(&mut self, state: &mut S) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task(state);
            ran += 1;
        }
        ran
    }

    /// Wait for the next task and run it.
    pub async fn run_next(&mut self, state: &mut S) -> bool {
        // The context keeps its own sender, so recv only ends if that is dropped.
        match self.rx.recv().await {
            Some(task) => {
                task(state);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_run_in_post_order() {
        let mut ui: UiContext<Vec<u32>> = UiContext::new();
        let handle = ui.handle();
        for i in 0..5 {
            assert!(handle.post(move |log: &mut Vec<u32>| log.push(i)));
        }

        let mut log = Vec::new();
        assert_eq!(ui.run_pending(&mut log), 5);
        assert_eq!(log, vec![0, 1, 2, 3, 4]);
        assert_eq!(ui.run_pending(&mut log), 0);
    }

    #[test]
    fn test_nothing_runs_until_drained() {
        let mut ui: UiContext<u32> = UiContext::new();
        ui.handle().post(|n: &mut u32| *n += 1);

        let mut counter = 0;
        assert_eq!(counter, 0);
        ui.run_pending(&mut counter);
        assert_eq!(counter, 1);
    }

    #[test]
    fn test_post_after_drop_reports_failure() {
        let ui: UiContext<u32> = UiContext::new();
        let handle = ui.handle();
        drop(ui);
        assert!(!handle.post(|n: &mut u32| *n += 1));
    }

    #[tokio::test]
    async fn test_run_next_waits_for_worker() {
        let mut ui: UiContext<String> = UiContext::new();
        let handle = ui.handle();
        tokio::spawn(async move {
            handle.post(|s: &mut String| s.push_str("from worker"));
        });

        let mut state = String::new();
        assert!(ui.run_next(&mut state).await);
        assert_eq!(state, "from worker");
    }
}
