//! Session lifecycle: request, stream, decode, parse, apply, publish.
//!
//! A [`SessionController`] runs at most one session at a time. Submitting
//! a new request supersedes the running one: its cancellation token fires
//! and any snapshot it still tries to publish is rejected, because every
//! publish is checked against the current session id under the watch
//! channel's lock.

mod handle;

use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::RecommendationClient;
use crate::error::StreamError;
use crate::models::RecommendationRequest;
use crate::sse::{parse_frame, FrameDecoder};
use crate::state::StreamState;

pub use handle::SessionHandle;

struct ActiveSession {
    id: Uuid,
    cancel: CancellationToken,
}

/// Publishes snapshots for one session only.
#[derive(Clone)]
struct Publisher {
    tx: Arc<watch::Sender<StreamState>>,
    session_id: Uuid,
}

impl Publisher {
    /// Returns false if a newer session has taken over the channel.
    fn publish(&self, state: &StreamState) -> bool {
        self.tx.send_if_modified(|current| {
            if current.session_id != self.session_id {
                return false;
            }
            *current = state.clone();
            true
        })
    }
}

/// Drives recommendation sessions and exposes their state.
///
/// # Example
///
/// ```ignore
/// let controller = SessionController::new(RecommendationClient::from_config(&config)?);
/// let mut updates = controller.subscribe();
/// let handle = controller.submit(request);
/// while updates.changed().await.is_ok() {
///     let state = updates.borrow_and_update().clone();
///     if !state.is_streaming { break; }
/// }
/// ```
pub struct SessionController {
    client: RecommendationClient,
    state_tx: Arc<watch::Sender<StreamState>>,
    active: Arc<Mutex<Option<ActiveSession>>>,
}

impl SessionController {
    pub fn new(client: RecommendationClient) -> Self {
        let (state_tx, _) = watch::channel(StreamState::idle());
        Self {
            client,
            state_tx: Arc::new(state_tx),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<StreamState> {
        self.state_tx.subscribe()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> StreamState {
        self.state_tx.borrow().clone()
    }

    /// Start a session on the tokio runtime, superseding any running one.
    pub fn submit(&self, request: RecommendationRequest) -> SessionHandle {
        let cancel = CancellationToken::new();
        let publisher = self.begin(cancel.clone());
        let session_id = publisher.session_id;

        let client = self.client.clone();
        let active = Arc::clone(&self.active);
        let task_cancel = cancel.clone();
        let done = CancellationToken::new();
        let done_guard = done.clone().drop_guard();
        let task = tokio::spawn(async move {
            let _done = done_guard;
            let state = drive_session(client, request, publisher, task_cancel).await;
            release(&active, session_id);
            state
        });

        SessionHandle::new(session_id, cancel, done, task)
    }

    /// Run a session on the current task and return its final state.
    ///
    /// Cancelling `cancel` stops the session early. A later `submit` or
    /// `run` on this controller also stops it, without cancelling `cancel`
    /// itself.
    pub async fn run(
        &self,
        request: RecommendationRequest,
        cancel: CancellationToken,
    ) -> StreamState {
        let session_cancel = cancel.child_token();
        let publisher = self.begin(session_cancel.clone());
        let session_id = publisher.session_id;
        let state = drive_session(self.client.clone(), request, publisher, session_cancel).await;
        release(&self.active, session_id);
        state
    }

    /// True while a session started by this controller has not finished.
    pub fn is_running(&self) -> bool {
        lock(&self.active).is_some()
    }

    /// Cancel the running session, if any.
    pub fn cancel(&self) {
        let active = lock(&self.active).take();
        if let Some(active) = active {
            info!(session_id = %active.id, "Cancelling recommendation session");
            active.cancel.cancel();
        }
    }

    /// Supersede the previous session and publish a fresh state.
    fn begin(&self, cancel: CancellationToken) -> Publisher {
        let session_id = Uuid::new_v4();
        let mut active = lock(&self.active);

        if let Some(previous) = active.take() {
            info!(
                previous = %previous.id,
                session_id = %session_id,
                "Superseding running recommendation session"
            );
            previous.cancel.cancel();
        }

        self.state_tx.send_replace(StreamState::connecting(session_id));
        *active = Some(ActiveSession {
            id: session_id,
            cancel,
        });

        Publisher {
            tx: Arc::clone(&self.state_tx),
            session_id,
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(active) = lock(&self.active).take() {
            active.cancel.cancel();
        }
    }
}

fn lock(active: &Mutex<Option<ActiveSession>>) -> MutexGuard<'_, Option<ActiveSession>> {
    active
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Forget a finished session unless a newer one has already replaced it.
fn release(active: &Mutex<Option<ActiveSession>>, session_id: Uuid) {
    let mut active = lock(active);
    if active.as_ref().is_some_and(|a| a.id == session_id) {
        *active = None;
    }
}

/// One request/response/stream lifecycle.
///
/// Returns the session's final state: terminal, or the last published
/// snapshot if cancelled.
async fn drive_session(
    client: RecommendationClient,
    request: RecommendationRequest,
    publisher: Publisher,
    cancel: CancellationToken,
) -> StreamState {
    let session_id = publisher.session_id;
    let mut state = StreamState::connecting(session_id);

    info!(
        session_id = %session_id,
        tracks = request.tracks().len(),
        "Starting recommendation session"
    );

    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!(session_id = %session_id, "Session cancelled before connecting");
            return state;
        }
        opened = client.open_stream(&request) => opened,
    };

    let mut body = match opened {
        Ok(body) => body,
        Err(err) => {
            state.fail(&err);
            publisher.publish(&state);
            return state;
        }
    };

    let mut decoder = FrameDecoder::new();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(
                    session_id = %session_id,
                    events = state.events_applied,
                    "Session cancelled"
                );
                return state;
            }
            next = body.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                for payload in decoder.push(&chunk) {
                    match parse_frame(&payload) {
                        Ok(event) => {
                            debug!(event_type = event.event_type_name(), "Applying event");
                            if state.apply(event) && !publisher.publish(&state) {
                                debug!(session_id = %session_id, "Session superseded");
                                return state;
                            }
                        }
                        Err(err) => {
                            warn!(session_id = %session_id, "Dropping malformed frame: {}", err);
                        }
                    }
                    if state.is_terminal() {
                        break;
                    }
                }
                if state.is_terminal() {
                    info!(
                        session_id = %session_id,
                        complete = state.is_complete(),
                        events = state.events_applied,
                        "Recommendation session finished"
                    );
                    return state;
                }
            }
            Some(Err(err)) => {
                state.fail(&StreamError::ConnectionLost {
                    message: err.to_string(),
                });
                publisher.publish(&state);
                return state;
            }
            None => {
                decoder.finish();
                state.fail(&StreamError::EndedEarly);
                publisher.publish(&state);
                return state;
            }
        }
    }
}
