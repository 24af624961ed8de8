/*
[INPUT]:  Actions dispatched by workflow steps and views
[OUTPUT]: Published TaskState snapshots; the only mutation path
[POS]:    Store layer - single source of truth for the current task
[UPDATE]: When changing dispatch semantics or snapshot publishing
*/

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::{MISSING_TASK_ID, REPORT_GENERATION_FAILED, TransitionError, reduce};
pub use state::{PhaseStatus, ReportStatus, TaskState};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

/// Published store contents. The session changes on every reset.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub session: Uuid,
    pub state: TaskState,
}

/// Identity of the task an asynchronous completion belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchGuard {
    pub session: Uuid,
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// The task was reset or replaced while the call was in flight
    #[error("result discarded: task changed while the request was in flight")]
    Stale,
}

/// Task state container shared by views, workflow and poller.
///
/// Dispatches are serialized by the watch channel; subscribers see every accepted change.
#[derive(Debug)]
pub struct TaskStore {
    tx: watch::Sender<StoreSnapshot>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StoreSnapshot {
            session: Uuid::new_v4(),
            state: TaskState::default(),
        });
        Self { tx }
    }

    pub fn dispatch(&self, action: Action) -> Result<(), TransitionError> {
        match self.apply(None, action) {
            Err(DispatchError::Transition(err)) => Err(err),
            // Unguarded dispatches never go stale
            Ok(()) | Err(DispatchError::Stale) => Ok(()),
        }
    }

    /// Dispatch only if the store still holds the task the guard was taken from
    pub fn dispatch_guarded(&self, guard: &DispatchGuard, action: Action) -> Result<(), DispatchError> {
        self.apply(Some(guard), action)
    }

    fn apply(&self, guard: Option<&DispatchGuard>, action: Action) -> Result<(), DispatchError> {
        let name = action.name();
        let mut outcome = Ok(());

        self.tx.send_if_modified(|snapshot| {
            if let Some(guard) = guard {
                if guard.session != snapshot.session || guard.task_id != snapshot.state.task_id {
                    outcome = Err(DispatchError::Stale);
                    return false;
                }
            }

            match reduce(&snapshot.state, &action) {
                Ok(next) => {
                    if action == Action::Reset {
                        snapshot.session = Uuid::new_v4();
                    }
                    snapshot.state = next;
                    true
                }
                Err(err) => {
                    outcome = Err(DispatchError::Transition(err));
                    false
                }
            }
        });

        match &outcome {
            Ok(()) => debug!(action = name, "dispatched"),
            Err(DispatchError::Stale) => debug!(action = name, "discarded stale result"),
            Err(DispatchError::Transition(err)) => {
                warn!(action = name, error = %err, "transition rejected")
            }
        }
        outcome
    }

    pub fn snapshot(&self) -> TaskState {
        self.tx.borrow().state.clone()
    }

    pub fn session(&self) -> Uuid {
        self.tx.borrow().session
    }

    /// Capture the current task identity before starting a network call
    pub fn guard(&self) -> DispatchGuard {
        let snapshot = self.tx.borrow();
        DispatchGuard {
            session: snapshot.session,
            task_id: snapshot.state.task_id.clone(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.tx.subscribe()
    }
}
