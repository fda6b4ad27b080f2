//! Queue-based session placement.
//!
//! Starting a placement is fire-and-forget: the queue fulfils it later and
//! the platform learns the outcome through the backend's own notification
//! channel. Placement problems are reported in-band, never as call errors.

use crate::backend::{FleetBackend, PlayerLatency, StartPlacementInput};
use crate::config::Overrides;
use crate::context::RequestContext;
use crate::core::{Error, Result};
use crate::placement::latency::{extract_latencies, LatencyExtraction};
use crate::placement::request::{AsyncPlacementResult, PlacementRequest};
use std::sync::Arc;
use tracing::{error, info, warn};

const OPERATION: &str = "StartGameSessionPlacement";

/// Starts queue placements with optional latency hints.
pub struct PlacementRequester {
    fleet: Arc<dyn FleetBackend>,
    overrides: Overrides,
}

impl PlacementRequester {
    /// Create a new requester.
    pub fn new(fleet: Arc<dyn FleetBackend>, overrides: Overrides) -> Self {
        Self { fleet, overrides }
    }

    /// Start a placement on the request's queue.
    ///
    /// Only cancellation or deadline expiry of `ctx` is returned as `Err`.
    pub async fn start(&self, ctx: &RequestContext, request: &PlacementRequest) -> Result<AsyncPlacementResult> {
        let session_id = request.session_id.as_str();
        let queue = self.overrides.queue_for_placement(&request.deployment);

        let latencies = player_latencies(session_id, &request.session_data);

        let input = StartPlacementInput {
            game_session_queue_name: queue,
            maximum_player_session_count: request.maximum_player,
            placement_id: request.session_id.clone(),
            player_latencies: Some(latencies).filter(|l| !l.is_empty()),
        };

        let started = match ctx
            .call(session_id, OPERATION, self.fleet.start_game_session_placement(input))
            .await
        {
            Ok(started) => started,
            Err(err) if err.is_cancellation() => return Err(err),
            Err(err) => {
                let reason = match &err {
                    Error::Backend { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                let message = format!(
                    "failed to start gamelift queue session placement for session: {}, Error: {}",
                    session_id, reason
                );
                error!(session_id, "{}", message);
                return Ok(AsyncPlacementResult::failed(message));
            }
        };

        let Some(placement) = started.placement else {
            let message = format!("failed to start gamelift queue session placement for session: {}", session_id);
            error!(session_id, "{}", message);
            return Ok(AsyncPlacementResult::failed(message));
        };

        info!(
            session_id,
            placement_id = %placement.placement_id,
            queue = %placement.game_session_queue_name,
            status = %placement.status,
            "Successfully started game session placement"
        );
        Ok(AsyncPlacementResult::started())
    }
}

/// Latency hints for the placement; empty when none could be read.
fn player_latencies(session_id: &str, session_data: &str) -> Vec<PlayerLatency> {
    match extract_latencies(session_data) {
        LatencyExtraction::Samples(samples) => samples.into_iter().map(PlayerLatency::from).collect(),
        LatencyExtraction::Empty => {
            info!(session_id, "No player latencies in session data, queue location order applies");
            Vec::new()
        }
        LatencyExtraction::Malformed(reason) => {
            warn!(
                session_id,
                error = %reason,
                "failed to parse player QoS data, continuing with session placement"
            );
            Vec::new()
        }
    }
}
