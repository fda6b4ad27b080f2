//! Synchronous session creation with region failover.
//!
//! Regions are tried one at a time in the caller's order. The first
//! region that creates a session wins; per-region failures move on to
//! the next region.

use crate::backend::{CreateGameSessionInput, FleetBackend, GameProperty, GameSession};
use crate::config::Overrides;
use crate::context::RequestContext;
use crate::core::{Error, Result, PROPERTY_CLIENT_VERSION, PROPERTY_GAME_MODE, PROPERTY_SESSION_SECRET};
use crate::placement::request::{PlacementRequest, PlacementResult};
use std::sync::Arc;
use tracing::{error, info, warn};

const OPERATION: &str = "CreateGameSession";

/// Creates sessions on the fleet, failing over across regions.
pub struct RegionFailoverCreator {
    fleet: Arc<dyn FleetBackend>,
    overrides: Overrides,
}

impl RegionFailoverCreator {
    /// Create a new creator.
    pub fn new(fleet: Arc<dyn FleetBackend>, overrides: Overrides) -> Self {
        Self { fleet, overrides }
    }

    /// Create a session in the first region that accepts it.
    pub async fn create(&self, ctx: &RequestContext, request: &PlacementRequest) -> Result<PlacementResult> {
        let session_id = request.session_id.as_str();
        let deployment = self.overrides.deployment_for_create(&request.deployment);
        let regions = self.overrides.regions_for_create(&request.requested_regions);

        let mut last_error = Error::validation(session_id, "need provide requested region");
        if regions.is_empty() {
            error!(session_id, "Requested region is required");
            return Err(last_error);
        }

        let properties = session_properties(request);

        for (attempt, region) in regions.iter().enumerate() {
            let input = CreateGameSessionInput {
                alias_id: deployment.clone(),
                idempotency_token: request.session_id.clone(),
                maximum_player_session_count: request.maximum_player,
                location: region.clone(),
                game_properties: properties.clone(),
                game_session_data: Some(request.session_data.clone()).filter(|data| !data.is_empty()),
            };

            match ctx.call(session_id, OPERATION, self.fleet.create_game_session(input)).await {
                Ok(session) => {
                    let result = normalize(request, session)?;
                    info!(
                        session_id,
                        region = %result.region,
                        server_id = %result.server_id,
                        attempts = attempt + 1,
                        "Created game session"
                    );
                    return Ok(result);
                }
                Err(err) if err.is_cancellation() => {
                    warn!(session_id, region = %region, error = %err, "Session creation aborted");
                    return Err(err);
                }
                Err(err) => {
                    warn!(session_id, region = %region, error = %err, "Failed to create game session in region");
                    last_error = err;
                }
            }
        }

        error!(session_id, error = %last_error, "Failed to create session");
        Err(last_error)
    }
}

/// Properties readable by the server that ends up hosting the session.
fn session_properties(request: &PlacementRequest) -> Vec<GameProperty> {
    vec![
        GameProperty::new(PROPERTY_CLIENT_VERSION, &request.client_version),
        GameProperty::new(PROPERTY_GAME_MODE, &request.game_mode),
        GameProperty::new(PROPERTY_SESSION_SECRET, &request.secret),
    ]
}

fn normalize(request: &PlacementRequest, session: GameSession) -> Result<PlacementResult> {
    let missing = |field| Error::IncompleteResponse {
        session_id: request.session_id.clone(),
        field,
    };

    let handle = session.game_session_id.ok_or_else(|| missing("GameSessionId"))?;
    let ip = session.ip_address.ok_or_else(|| missing("IpAddress"))?;
    let port = session.port.ok_or_else(|| missing("Port"))?;
    let region = session.location.ok_or_else(|| missing("Location"))?;

    Ok(PlacementResult::placed(request, handle, ip, i64::from(port), region))
}
