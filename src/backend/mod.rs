//! Backend capability interfaces.
//!
//! Two narrow interfaces cover everything the broker needs:
//! - Session directory lookup
//! - Compute fleet creation, termination and queue placement

pub mod directory;
pub mod fleet;
pub mod memory;

pub use directory::{DirectoryEntry, SessionDirectory};
pub use fleet::{
    CreateGameSessionInput, FleetBackend, GameProperty, GameSession, GameSessionPlacement,
    PlacementStarted, PlayerLatency, StartPlacementInput, TerminateGameSessionInput, TerminationMode,
};
pub use memory::{FleetCall, InMemoryDirectory, InMemoryFleet};
