//! Scripted transport and tab harness for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::Notify;

use crate::api::{Request, Response, Transport, TransportError};
use crate::dispatch::{CommandRunner, Dispatcher, UiContext};
use crate::identity::IdentityRecord;
use crate::session::Session;
use crate::tabs::{PanelContext, TabController};

#[derive(Clone)]
pub enum Reply {
    Respond(Response),
    After(Duration, Response),
    /// Respond once the gate is notified.
    Gated(Arc<Notify>, Response),
    Hang,
    Unreachable,
}

impl Reply {
    pub fn ok(data: Value) -> Self {
        Reply::Respond(Response::success(data))
    }

    pub fn fail(message: &str) -> Self {
        Reply::Respond(Response::failure(message))
    }
}

/// Answers by URI. Several replies for one URI are used in order; the last
/// one repeats.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    seen: Arc<Mutex<Vec<Request>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, uri: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(uri.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self, uri: &str) -> usize {
        self.seen.lock().unwrap().iter().filter(|r| r.uri == uri).count()
    }

    fn next_reply(&self, uri: &str) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(uri)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: Request) -> BoxFuture<'static, Result<Response, TransportError>> {
        let reply = self.next_reply(&request.uri);
        self.seen.lock().unwrap().push(request);

        async move {
            match reply {
                Some(Reply::Respond(response)) => Ok(response),
                Some(Reply::After(delay, response)) => {
                    tokio::time::sleep(delay).await;
                    Ok(response)
                }
                Some(Reply::Gated(gate, response)) => {
                    gate.notified().await;
                    Ok(response)
                }
                Some(Reply::Hang) => futures::future::pending().await,
                Some(Reply::Unreachable) => Err(TransportError::Closed),
                None => Err(TransportError::InvalidResponse("no scripted reply".to_string())),
            }
        }
        .boxed()
    }
}

/// A composed `TabController` wired to a scripted transport.
pub struct Harness {
    pub ui: UiContext<TabController>,
    pub tabs: TabController,
    pub transport: ScriptedTransport,
}

impl Harness {
    pub fn new(identity: IdentityRecord, transport: ScriptedTransport) -> Self {
        let ui = UiContext::new();
        let runner = CommandRunner::new(Arc::new(transport.clone()))
            .with_timeout(Duration::from_millis(200));
        let dispatcher = Dispatcher::new(runner, ui.handle(), Handle::current());
        let session = Session::new("wang", identity);
        let tabs = TabController::new(&session, dispatcher);
        Self { ui, tabs, transport }
    }

    pub fn student(transport: ScriptedTransport) -> Self {
        Self::new(IdentityRecord::with_user_type("本科生"), transport)
    }

    pub fn teacher(transport: ScriptedTransport) -> Self {
        Self::new(IdentityRecord::with_primary_role("teacher"), transport)
    }

    pub fn admin(transport: ScriptedTransport) -> Self {
        Self::new(IdentityRecord::with_primary_role("admin"), transport)
    }

    /// Run whatever is queued on the UI context right now.
    pub fn drain(&mut self) -> usize {
        self.ui.run_pending(&mut self.tabs)
    }

    /// Wait for the next posted task (typically a command outcome) and run it.
    pub async fn next(&mut self) {
        assert!(self.ui.run_next(&mut self.tabs).await);
    }

    pub fn ctx(&self) -> PanelContext {
        self.tabs.context().clone()
    }
}
