//! Request and response value types of the session protocol.

use crate::core::{now, Timestamp, GAME_SERVER_SOURCE_GAMELIFT, SERVER_STATUS_READY};
use serde::{Deserialize, Serialize};

/// Request to place a game session, synchronously or through a queue.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    /// Caller-chosen session ID, used as idempotency token
    pub session_id: String,
    /// Namespace
    pub namespace: String,
    /// Alias or queue reference
    pub deployment: String,
    /// Candidate regions in preference order
    pub requested_regions: Vec<String>,
    /// Maximum number of players
    pub maximum_player: i32,
    /// Opaque caller-defined session data
    pub session_data: String,
    /// Client version
    pub client_version: String,
    /// Game mode
    pub game_mode: String,
    /// Secret handed to the hosting server
    pub secret: String,
}

impl PlacementRequest {
    /// Create a request for `session_id` targeting `deployment`.
    pub fn new(namespace: &str, session_id: &str, deployment: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            namespace: namespace.to_string(),
            deployment: deployment.to_string(),
            ..Default::default()
        }
    }

    /// Set candidate regions.
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requested_regions = regions.into_iter().map(Into::into).collect();
        self
    }

    /// Set maximum players.
    pub fn with_max_players(mut self, maximum_player: i32) -> Self {
        self.maximum_player = maximum_player;
        self
    }

    /// Set session data.
    pub fn with_session_data(mut self, session_data: &str) -> Self {
        self.session_data = session_data.to_string();
        self
    }

    /// Set client version and game mode.
    pub fn with_client(mut self, client_version: &str, game_mode: &str) -> Self {
        self.client_version = client_version.to_string();
        self.game_mode = game_mode.to_string();
        self
    }

    /// Set the session secret.
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }
}

/// A session placed synchronously on the fleet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub session_id: String,
    pub namespace: String,
    pub session_data: String,
    pub client_version: String,
    pub game_mode: String,
    /// Backend that fulfilled the session
    pub source: String,
    pub status: String,
    /// Backend session handle, used later for termination
    pub deployment: String,
    pub ip: String,
    pub port: i64,
    /// Must equal `deployment`: the hosting server presents this ID when it connects
    pub server_id: String,
    pub region: String,
    pub created_region: String,
    pub created_at: Timestamp,
}

impl PlacementResult {
    /// Build the result for a session placed at `ip:port` in `region` under `handle`.
    pub(crate) fn placed(request: &PlacementRequest, handle: String, ip: String, port: i64, region: String) -> Self {
        Self {
            session_id: request.session_id.clone(),
            namespace: request.namespace.clone(),
            session_data: request.session_data.clone(),
            client_version: request.client_version.clone(),
            game_mode: request.game_mode.clone(),
            source: GAME_SERVER_SOURCE_GAMELIFT.to_string(),
            status: SERVER_STATUS_READY.to_string(),
            deployment: handle.clone(),
            ip,
            port,
            server_id: handle,
            created_region: region.clone(),
            region,
            created_at: now(),
        }
    }
}

/// Outcome of starting a queue placement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncPlacementResult {
    pub success: bool,
    pub message: String,
}

impl AsyncPlacementResult {
    /// Placement started.
    pub fn started() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    /// Placement could not be started.
    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Request to terminate a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminateRequest {
    pub namespace: String,
    pub session_id: String,
}

impl TerminateRequest {
    pub fn new(namespace: &str, session_id: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            session_id: session_id.to_string(),
        }
    }
}

/// Acknowledgement of a terminated session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminateResponse {
    pub namespace: String,
    pub session_id: String,
    pub success: bool,
}
