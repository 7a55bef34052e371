//! Caller-side handle to a spawned session.

use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::state::StreamState;

/// Handle returned by [`super::SessionController::submit`].
///
/// Dropping the handle does not cancel the session.
#[derive(Debug)]
pub struct SessionHandle {
    id: Uuid,
    cancel: CancellationToken,
    /// Fired when the session task exits, however it exits
    done: CancellationToken,
    task: JoinHandle<StreamState>,
}

impl SessionHandle {
    pub(super) fn new(
        id: Uuid,
        cancel: CancellationToken,
        done: CancellationToken,
        task: JoinHandle<StreamState>,
    ) -> Self {
        Self {
            id,
            cancel,
            done,
            task,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stop reading the stream. The last published snapshot stays as is.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel the session if it is still running after `deadline`.
    ///
    /// The timer stops as soon as the session ends or is cancelled.
    pub fn cancel_after(&self, deadline: Duration) -> JoinHandle<()> {
        let token = self.cancel.clone();
        let done = self.done.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(deadline) => token.cancel(),
                _ = token.cancelled() => {}
                _ = done.cancelled() => {}
            }
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the session has been cancelled by any path.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session to stop and return its final state.
    pub async fn wait(self) -> Result<StreamState, JoinError> {
        self.task.await
    }
}
