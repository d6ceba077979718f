//! Single-flight handle for the background catalogue regeneration.
//!
//! At most one regeneration runs at a time. `start_if_idle` only starts
//! from `Idle`; a finished run must be `reset` (the admin page visit)
//! before another can start. Nothing here touches conversation state.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::regenerator::{CatalogueRegenerator, RegenerationProgress};
use crate::domain::foundation::{StateMachine, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationState {
    Idle,
    Running,
    Done,
    Failed,
}

impl RegenerationState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Not Started",
            Self::Running => "In Progress",
            Self::Done => "Completed",
            Self::Failed => "Failed",
        }
    }
}

impl StateMachine for RegenerationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Idle => vec![Self::Running],
            Self::Running => vec![Self::Done, Self::Failed],
            Self::Done | Self::Failed => vec![Self::Idle],
        }
    }
}

/// Point-in-time view of the task, as reported to the admin page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegenerationStatus {
    pub state: RegenerationState,
    pub status: &'static str,
    pub progress: u8,
    pub processed: usize,
    pub total: usize,
    pub error: Option<String>,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
}

#[derive(Debug)]
struct Slot {
    state: RegenerationState,
    error: Option<String>,
    started_at: Option<Timestamp>,
    finished_at: Option<Timestamp>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct RegenerationTask {
    regenerator: Arc<CatalogueRegenerator>,
    slot: Arc<Mutex<Slot>>,
    progress: RegenerationProgress,
}

impl RegenerationTask {
    pub fn new(regenerator: Arc<CatalogueRegenerator>) -> Self {
        Self {
            regenerator,
            slot: Arc::new(Mutex::new(Slot {
                state: RegenerationState::Idle,
                error: None,
                started_at: None,
                finished_at: None,
                handle: None,
            })),
            progress: RegenerationProgress::new(),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts a run if the task is idle. Returns whether a run was started.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_if_idle(&self) -> bool {
        let mut slot = self.slot();
        let Ok(next) = slot.state.transition_to(RegenerationState::Running) else {
            return false;
        };
        slot.state = next;
        slot.error = None;
        slot.started_at = Some(Timestamp::now());
        slot.finished_at = None;
        self.progress.clear();

        let task = self.clone();
        slot.handle = Some(tokio::spawn(async move { task.run().await }));
        info!("Catalogue regeneration started");
        true
    }

    async fn run(&self) {
        let result = self.regenerator.regenerate(&self.progress).await;

        let mut slot = self.slot();
        slot.finished_at = Some(Timestamp::now());
        match result {
            Ok(rows) => {
                slot.state = RegenerationState::Done;
                info!(rows, "Catalogue regeneration completed");
            }
            Err(err) => {
                error!(error = %err, "Catalogue regeneration failed");
                slot.state = RegenerationState::Failed;
                slot.error = Some(err.to_string());
            }
        }
    }

    /// Moves a finished task back to `Idle`. A running task is untouched.
    pub fn reset(&self) -> RegenerationStatus {
        {
            let mut slot = self.slot();
            if let Ok(next) = slot.state.transition_to(RegenerationState::Idle) {
                slot.state = next;
                slot.error = None;
                slot.started_at = None;
                slot.finished_at = None;
                slot.handle = None;
                self.progress.clear();
            }
        }
        self.status()
    }

    pub fn status(&self) -> RegenerationStatus {
        let slot = self.slot();
        RegenerationStatus {
            state: slot.state,
            status: slot.state.label(),
            progress: self.progress.percent(),
            processed: self.progress.processed(),
            total: self.progress.total(),
            error: slot.error.clone(),
            started_at: slot.started_at,
            finished_at: slot.finished_at,
        }
    }

    /// Waits for the current run, if any, and reports the final status.
    pub async fn join(&self) -> RegenerationStatus {
        let handle = self.slot().handle.take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                error!(error = %err, "Catalogue regeneration task panicked");
                let mut slot = self.slot();
                slot.state = RegenerationState::Failed;
                slot.error = Some(err.to_string());
            }
        }
        self.status()
    }
}
