//! Common types used across broker modules.

/// Source tag for sessions fulfilled by the GameLift fleet.
pub const GAME_SERVER_SOURCE_GAMELIFT: &str = "gamelift";

/// Status tag for a session that is ready to accept players.
pub const SERVER_STATUS_READY: &str = "READY";

/// Session property key for the client version.
pub const PROPERTY_CLIENT_VERSION: &str = "clientVersion";

/// Session property key for the game mode.
pub const PROPERTY_GAME_MODE: &str = "gameMode";

/// Session property key for the session secret.
pub const PROPERTY_SESSION_SECRET: &str = "sessionSecret";

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}
