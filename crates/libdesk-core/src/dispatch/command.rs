//! Single request/response execution units.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::api::{CommandError, Request, Response, Transport};

use super::{ControlLease, LiveToken, UiHandle};

/// Bound on a single command, measured from submission.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum commands executing at once; later ones wait for a free worker.
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Result of one command. Absence of a response is not a `Response`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(Response),
    TimedOut,
    TransportFailure(String),
}

impl Outcome {
    /// Collapse into the payload of a successful response or a [`CommandError`].
    pub fn into_payload(self) -> Result<Value, CommandError> {
        match self {
            Outcome::Completed(response) => response.into_data(),
            Outcome::TimedOut => Err(CommandError::Timeout),
            Outcome::TransportFailure(reason) => Err(CommandError::Transport(reason)),
        }
    }

    /// Like [`Outcome::into_payload`], but yields the server's message instead.
    pub fn into_message(self) -> Result<Option<String>, CommandError> {
        match self {
            Outcome::Completed(response) if response.is_success() => Ok(response.message),
            other => other.into_payload().map(|_| None),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Outcome::Completed(r) if r.is_success() => "success",
            Outcome::Completed(_) => "server failure",
            Outcome::TimedOut => "timed out",
            Outcome::TransportFailure(_) => "transport failure",
        }
    }
}

/// Executes requests on a bounded pool of workers with a timeout.
/// Clone is cheap - the transport and the pool are shared.
#[derive(Clone)]
pub struct CommandRunner {
    transport: Arc<dyn Transport>,
    workers: Arc<Semaphore>,
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            workers: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT)),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, workers: usize) -> Self {
        self.workers = Arc::new(Semaphore::new(workers.max(1)));
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one request, waiting at most `timeout` (including the wait for a
    /// free worker). On timeout the in-flight call is dropped; no cancel
    /// message is sent to the server.
    pub async fn execute(&self, request: &Request, timeout: Duration) -> Outcome {
        let call = async {
            let _permit = self
                .workers
                .acquire()
                .await
                .map_err(|_| "worker pool closed".to_string())?;
            self.transport
                .send(request.clone())
                .await
                .map_err(|e| e.to_string())
        };

        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(response)) => Outcome::Completed(response),
            Ok(Err(reason)) => Outcome::TransportFailure(reason),
            Err(_) => Outcome::TimedOut,
        }
    }
}

/// Runs commands off the UI context and posts each outcome back onto it.
pub struct Dispatcher<S> {
    runner: CommandRunner,
    ui: UiHandle<S>,
    runtime: Handle,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            runner: self.runner.clone(),
            ui: self.ui.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

impl<S: 'static> Dispatcher<S> {
    pub fn new(runner: CommandRunner, ui: UiHandle<S>, runtime: Handle) -> Self {
        Self { runner, ui, runtime }
    }

    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    pub fn ui(&self) -> &UiHandle<S> {
        &self.ui
    }

    /// Execute `request` on a worker and deliver its outcome on the UI context.
    ///
    /// Exactly one task is posted per submission. That task re-enables the
    /// triggering control (if a lease was given) for every outcome, then calls
    /// `deliver` only if `token` is still live; stale outcomes are discarded.
    pub fn submit<F>(
        &self,
        request: Request,
        token: LiveToken,
        lease: Option<ControlLease>,
        deliver: F,
    ) where
        F: FnOnce(&mut S, Outcome) + Send + 'static,
    {
        let runner = self.runner.clone();
        let ui = self.ui.clone();

        debug!(uri = %request.uri, "Dispatching command");
        self.runtime.spawn(async move {
            let outcome = runner.execute(&request, runner.timeout()).await;
            match &outcome {
                Outcome::TimedOut => warn!(uri = %request.uri, "Command timed out"),
                Outcome::TransportFailure(reason) => {
                    warn!(uri = %request.uri, error = %reason, "Command transport failure")
                }
                _ => debug!(uri = %request.uri, outcome = outcome.label(), "Command finished"),
            }

            let uri = request.uri;
            ui.post(move |state: &mut S| {
                if let Some(lease) = lease {
                    lease.release();
                }
                if token.is_live() {
                    deliver(state, outcome);
                } else {
                    debug!(%uri, "Discarding outcome for disposed view");
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Liveness, TriggerControl, UiContext};
    use crate::testing::{Reply, ScriptedTransport};
    use serde_json::json;

    type Log = Vec<Outcome>;

    fn dispatcher(
        transport: ScriptedTransport,
        timeout: Duration,
    ) -> (UiContext<Log>, Dispatcher<Log>) {
        let ui = UiContext::new();
        let runner = CommandRunner::new(Arc::new(transport)).with_timeout(timeout);
        let dispatcher = Dispatcher::new(runner, ui.handle(), Handle::current());
        (ui, dispatcher)
    }

    #[tokio::test]
    async fn test_execute_completed() {
        let transport = ScriptedTransport::new()
            .on("library/bookshelf/categories", Reply::ok(json!(["小说"])));
        let runner = CommandRunner::new(Arc::new(transport));

        let outcome = runner
            .execute(&Request::new("library/bookshelf/categories"), DEFAULT_TIMEOUT)
            .await;
        assert_eq!(outcome.into_payload(), Ok(json!(["小说"])));
    }

    #[tokio::test]
    async fn test_execute_times_out() {
        let transport = ScriptedTransport::new().on("slow", Reply::Hang);
        let runner = CommandRunner::new(Arc::new(transport));

        let outcome = runner
            .execute(&Request::new("slow"), Duration::from_millis(50))
            .await;
        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(outcome.into_payload(), Err(CommandError::Timeout));
    }

    #[tokio::test]
    async fn test_execute_transport_failure() {
        let transport = ScriptedTransport::new().on("down", Reply::Unreachable);
        let runner = CommandRunner::new(Arc::new(transport));

        let outcome = runner.execute(&Request::new("down"), DEFAULT_TIMEOUT).await;
        assert!(matches!(outcome, Outcome::TransportFailure(_)));
    }

    #[tokio::test]
    async fn test_worker_wait_counts_against_timeout() {
        let transport = ScriptedTransport::new()
            .on("busy", Reply::Hang)
            .on("queued", Reply::ok(json!(null)));
        let runner = CommandRunner::new(Arc::new(transport)).with_max_concurrent(1);

        let blocker = runner.clone();
        tokio::spawn(async move {
            blocker.execute(&Request::new("busy"), Duration::from_secs(5)).await;
        });
        tokio::task::yield_now().await;

        let outcome = runner
            .execute(&Request::new("queued"), Duration::from_millis(50))
            .await;
        assert_eq!(outcome, Outcome::TimedOut);
    }

    #[tokio::test]
    async fn test_submit_delivers_once_on_ui_context() {
        let transport = ScriptedTransport::new().on("ping", Reply::ok(json!("pong")));
        let (mut ui, dispatcher) = dispatcher(transport, DEFAULT_TIMEOUT);
        let liveness = Liveness::new();

        dispatcher.submit(Request::new("ping"), liveness.token(), None, |log: &mut Log, outcome| {
            log.push(outcome);
        });

        let mut delivered = Vec::new();
        assert!(ui.run_next(&mut delivered).await);
        assert_eq!(delivered.len(), 1);
        assert_eq!(ui.run_pending(&mut delivered), 0);
    }

    #[tokio::test]
    async fn test_outcomes_delivered_in_completion_order() {
        let transport = ScriptedTransport::new()
            .on(
                "slow",
                Reply::After(Duration::from_millis(80), Response::success(json!("slow"))),
            )
            .on("fast", Reply::ok(json!("fast")));
        let (mut ui, dispatcher) = dispatcher(transport, DEFAULT_TIMEOUT);
        let liveness = Liveness::new();

        for uri in ["slow", "fast"] {
            dispatcher.submit(
                Request::new(uri),
                liveness.token(),
                None,
                |log: &mut Log, outcome| log.push(outcome),
            );
        }

        let mut delivered = Vec::new();
        assert!(ui.run_next(&mut delivered).await);
        assert!(ui.run_next(&mut delivered).await);
        let payloads: Vec<_> = delivered.into_iter().map(Outcome::into_payload).collect();
        assert_eq!(payloads, vec![Ok(json!("fast")), Ok(json!("slow"))]);
    }

    #[tokio::test]
    async fn test_timeout_reenables_control() {
        let transport = ScriptedTransport::new().on("slow", Reply::Hang);
        let (mut ui, dispatcher) = dispatcher(transport, Duration::from_millis(50));
        let liveness = Liveness::new();
        let control = TriggerControl::new();

        let lease = control.try_acquire();
        assert!(lease.is_some());
        dispatcher.submit(Request::new("slow"), liveness.token(), lease, |log: &mut Log, outcome| {
            log.push(outcome);
        });
        assert!(!control.is_enabled());
        assert!(control.try_acquire().is_none());

        let mut delivered = Vec::new();
        ui.run_next(&mut delivered).await;
        assert_eq!(delivered, vec![Outcome::TimedOut]);
        assert!(control.is_enabled());
    }

    #[tokio::test]
    async fn test_control_stays_disabled_until_ui_runs_completion() {
        let transport = ScriptedTransport::new().on("ping", Reply::ok(json!(1)));
        let (mut ui, dispatcher) = dispatcher(transport, DEFAULT_TIMEOUT);
        let liveness = Liveness::new();
        let control = TriggerControl::new();

        let lease = control.try_acquire();
        dispatcher.submit(Request::new("ping"), liveness.token(), lease, |_: &mut Log, _| {});
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!control.is_enabled());

        let mut delivered = Vec::new();
        ui.run_next(&mut delivered).await;
        assert!(control.is_enabled());
    }

    #[tokio::test]
    async fn test_disposed_view_outcome_discarded() {
        let transport = ScriptedTransport::new().on("ping", Reply::ok(json!(1)));
        let (mut ui, dispatcher) = dispatcher(transport, DEFAULT_TIMEOUT);
        let liveness = Liveness::new();
        let control = TriggerControl::new();

        let lease = control.try_acquire();
        dispatcher.submit(Request::new("ping"), liveness.token(), lease, |log: &mut Log, outcome| {
            log.push(outcome);
        });
        liveness.dispose();

        let mut delivered = Vec::new();
        assert!(ui.run_next(&mut delivered).await);
        assert!(delivered.is_empty());
        // The control is still handed back even though nothing was applied
        assert!(control.is_enabled());
    }

    #[test]
    fn test_into_message() {
        let ok = Outcome::Completed(Response::success(json!(null)).with_message("借阅成功"));
        assert_eq!(ok.into_message(), Ok(Some("借阅成功".to_string())));

        let failed = Outcome::Completed(Response::failure("超出借阅上限"));
        assert_eq!(
            failed.into_message(),
            Err(CommandError::Server("超出借阅上限".to_string()))
        );
    }
}
