//! Session placement orchestration.
//!
//! Three independent components:
//! - Region-failover session creation
//! - Latency-aware queue placement
//! - Session termination

pub mod failover;
pub mod latency;
pub mod queue;
pub mod request;
pub mod terminate;

pub use failover::RegionFailoverCreator;
pub use latency::{extract_latencies, LatencyExtraction, LatencySample};
pub use queue::PlacementRequester;
pub use request::{AsyncPlacementResult, PlacementRequest, PlacementResult, TerminateRequest, TerminateResponse};
pub use terminate::SessionTerminator;
