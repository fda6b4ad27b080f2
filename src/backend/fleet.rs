//! Compute fleet interface.
//!
//! Request and response shapes mirror the GameLift API calls the broker
//! needs. Response fields the backend may omit are optional so that
//! partial responses can be detected instead of defaulted.

use crate::core::BackendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Key/value property attached to a game session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProperty {
    pub key: String,
    pub value: String,
}

impl GameProperty {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Synchronous game session creation request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateGameSessionInput {
    /// Alias ID or fully-qualified alias ARN
    pub alias_id: String,
    /// Idempotency token (the caller's session ID)
    pub idempotency_token: String,
    /// Maximum number of players
    pub maximum_player_session_count: i32,
    /// Fleet location to place the session in
    pub location: String,
    /// Session properties readable by the hosting server
    pub game_properties: Vec<GameProperty>,
    /// Opaque session data, omitted when the caller supplied none
    pub game_session_data: Option<String>,
}

/// Game session as reported by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    /// Fully-qualified game session ARN
    pub game_session_id: Option<String>,
    pub ip_address: Option<String>,
    pub port: Option<i32>,
    pub location: Option<String>,
}

/// How a game session is shut down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationMode {
    /// Notify the server process and let it shut down normally
    #[default]
    TriggerOnProcessTerminate,
    /// Stop the process immediately
    ForceTerminate,
}

/// Game session termination request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminateGameSessionInput {
    /// Fully-qualified game session ARN
    pub game_session_id: String,
    pub termination_mode: TerminationMode,
}

/// Latency from one player to one region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerLatency {
    pub player_id: String,
    pub region_identifier: String,
    pub latency_in_milliseconds: f32,
}

/// Queue placement request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartPlacementInput {
    /// Queue name or fully-qualified queue ARN
    pub game_session_queue_name: String,
    pub maximum_player_session_count: i32,
    /// Placement ID (the caller's session ID)
    pub placement_id: String,
    /// Latency hints, omitted when none are known
    pub player_latencies: Option<Vec<PlayerLatency>>,
}

/// Placement record returned when a placement starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSessionPlacement {
    pub placement_id: String,
    pub game_session_queue_name: String,
    pub status: String,
}

/// Acknowledgement of a started placement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementStarted {
    pub placement: Option<GameSessionPlacement>,
}

/// Game session hosting backend.
#[async_trait]
pub trait FleetBackend: Send + Sync {
    /// Create a game session in one location.
    async fn create_game_session(&self, input: CreateGameSessionInput) -> Result<GameSession, BackendError>;

    /// Terminate a running game session.
    async fn terminate_game_session(&self, input: TerminateGameSessionInput) -> Result<(), BackendError>;

    /// Start an asynchronous queue placement.
    async fn start_game_session_placement(
        &self,
        input: StartPlacementInput,
    ) -> Result<PlacementStarted, BackendError>;
}
