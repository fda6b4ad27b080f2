//! In-memory backends.
//!
//! Scriptable stand-ins for the session directory and the compute fleet.
//! Every call is recorded so callers can assert on what the broker sent.

use crate::backend::directory::{DirectoryEntry, SessionDirectory};
use crate::backend::fleet::{
    CreateGameSessionInput, FleetBackend, GameSession, GameSessionPlacement, PlacementStarted,
    StartPlacementInput, TerminateGameSessionInput,
};
use crate::core::BackendError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Scripted response for a backend call.
#[derive(Clone, Debug)]
enum Scripted<T> {
    Respond(Result<T, BackendError>),
    Hang,
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<T, BackendError> {
        match self {
            Scripted::Respond(outcome) => outcome,
            Scripted::Hang => futures::future::pending().await,
        }
    }
}

/// A call received by [`InMemoryFleet`].
#[derive(Clone, Debug, PartialEq)]
pub enum FleetCall {
    Create(CreateGameSessionInput),
    Terminate(TerminateGameSessionInput),
    StartPlacement(StartPlacementInput),
}

/// In-memory compute fleet.
///
/// Locations without a scripted outcome create a session on `127.0.0.1:7777`.
#[derive(Default)]
pub struct InMemoryFleet {
    create_outcomes: Mutex<HashMap<String, Scripted<GameSession>>>,
    terminate_outcome: Mutex<Option<Scripted<()>>>,
    placement_outcome: Mutex<Option<Scripted<PlacementStarted>>>,
    calls: Mutex<Vec<FleetCall>>,
}

impl InMemoryFleet {
    /// Create a fleet where every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every creation in `location`.
    pub fn fail_in(&self, location: &str, error: BackendError) {
        self.create_outcomes
            .lock()
            .insert(location.to_string(), Scripted::Respond(Err(error)));
    }

    /// Answer every creation in `location` with `session`.
    pub fn respond_in(&self, location: &str, session: GameSession) {
        self.create_outcomes
            .lock()
            .insert(location.to_string(), Scripted::Respond(Ok(session)));
    }

    /// Never answer creations in `location`.
    pub fn hang_in(&self, location: &str) {
        self.create_outcomes
            .lock()
            .insert(location.to_string(), Scripted::Hang);
    }

    /// Fail every termination.
    pub fn fail_terminate(&self, error: BackendError) {
        *self.terminate_outcome.lock() = Some(Scripted::Respond(Err(error)));
    }

    /// Answer every placement with `outcome`.
    pub fn respond_placement(&self, outcome: Result<PlacementStarted, BackendError>) {
        *self.placement_outcome.lock() = Some(Scripted::Respond(outcome));
    }

    /// Never answer placements.
    pub fn hang_placement(&self) {
        *self.placement_outcome.lock() = Some(Scripted::Hang);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<FleetCall> {
        self.calls.lock().clone()
    }

    /// Creation requests received so far.
    pub fn create_calls(&self) -> Vec<CreateGameSessionInput> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                FleetCall::Create(input) => Some(input.clone()),
                _ => None,
            })
            .collect()
    }

    /// Termination requests received so far.
    pub fn terminate_calls(&self) -> Vec<TerminateGameSessionInput> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                FleetCall::Terminate(input) => Some(input.clone()),
                _ => None,
            })
            .collect()
    }

    /// Placement requests received so far.
    pub fn placement_calls(&self) -> Vec<StartPlacementInput> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                FleetCall::StartPlacement(input) => Some(input.clone()),
                _ => None,
            })
            .collect()
    }

    fn local_session(input: &CreateGameSessionInput) -> GameSession {
        GameSession {
            game_session_id: Some(format!(
                "arn:aws:gamelift:{}::gamesession/fleet-local/{}",
                input.location, input.idempotency_token
            )),
            ip_address: Some("127.0.0.1".to_string()),
            port: Some(7777),
            location: Some(input.location.clone()),
        }
    }
}

#[async_trait]
impl FleetBackend for InMemoryFleet {
    async fn create_game_session(&self, input: CreateGameSessionInput) -> Result<GameSession, BackendError> {
        self.calls.lock().push(FleetCall::Create(input.clone()));

        let scripted = self.create_outcomes.lock().get(&input.location).cloned();
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(Self::local_session(&input)),
        }
    }

    async fn terminate_game_session(&self, input: TerminateGameSessionInput) -> Result<(), BackendError> {
        self.calls.lock().push(FleetCall::Terminate(input));

        let scripted = self.terminate_outcome.lock().clone();
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(()),
        }
    }

    async fn start_game_session_placement(
        &self,
        input: StartPlacementInput,
    ) -> Result<PlacementStarted, BackendError> {
        self.calls.lock().push(FleetCall::StartPlacement(input.clone()));

        let scripted = self.placement_outcome.lock().clone();
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(PlacementStarted {
                placement: Some(GameSessionPlacement {
                    placement_id: input.placement_id,
                    game_session_queue_name: input.game_session_queue_name,
                    status: "PENDING".to_string(),
                }),
            }),
        }
    }
}

/// In-memory session directory.
#[derive(Default)]
pub struct InMemoryDirectory {
    entries: Mutex<HashMap<(String, String), DirectoryEntry>>,
    failure: Mutex<Option<BackendError>>,
    lookups: Mutex<Vec<(String, String)>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session.
    pub fn insert(&self, entry: DirectoryEntry) {
        let key = (entry.namespace.clone(), entry.session_id.clone());
        self.entries.lock().insert(key, entry);
    }

    /// Fail every lookup with `error`.
    pub fn fail_with(&self, error: BackendError) {
        *self.failure.lock() = Some(error);
    }

    /// Lookups received so far as `(namespace, session_id)`.
    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl SessionDirectory for InMemoryDirectory {
    async fn lookup(&self, namespace: &str, session_id: &str) -> Result<DirectoryEntry, BackendError> {
        self.lookups
            .lock()
            .push((namespace.to_string(), session_id.to_string()));

        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }

        self.entries
            .lock()
            .get(&(namespace.to_string(), session_id.to_string()))
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("session {} in namespace {}", session_id, namespace)))
    }
}
