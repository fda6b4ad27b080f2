//! Session broker service.
//!
//! Exposes the three session operations behind a transport-agnostic trait.
//! An RPC host binds [`SessionDsm`] to its own server scaffolding.

use crate::backend::{FleetBackend, SessionDirectory};
use crate::config::BrokerConfig;
use crate::context::RequestContext;
use crate::core::Result;
use crate::placement::{
    AsyncPlacementResult, PlacementRequest, PlacementRequester, PlacementResult, RegionFailoverCreator,
    SessionTerminator, TerminateRequest, TerminateResponse,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

/// Session management operations.
#[async_trait]
pub trait SessionDsm: Send + Sync {
    /// Create a session synchronously, failing over across regions.
    async fn create_game_session(&self, ctx: RequestContext, request: PlacementRequest) -> Result<PlacementResult>;

    /// Start a queue placement; the session is reported later out of band.
    async fn create_game_session_async(
        &self,
        ctx: RequestContext,
        request: PlacementRequest,
    ) -> Result<AsyncPlacementResult>;

    /// Terminate a session.
    async fn terminate_game_session(&self, ctx: RequestContext, request: TerminateRequest) -> Result<TerminateResponse>;
}

/// Broker backed by a session directory and a compute fleet.
pub struct SessionBroker {
    config: BrokerConfig,
    creator: RegionFailoverCreator,
    requester: PlacementRequester,
    terminator: SessionTerminator,
}

impl SessionBroker {
    /// Create a new broker.
    pub fn new(directory: Arc<dyn SessionDirectory>, fleet: Arc<dyn FleetBackend>, config: BrokerConfig) -> Self {
        Self {
            creator: RegionFailoverCreator::new(fleet.clone(), config.overrides.clone()),
            requester: PlacementRequester::new(fleet.clone(), config.overrides.clone()),
            terminator: SessionTerminator::new(directory, fleet),
            config,
        }
    }

    /// Create a broker configured from the process environment.
    pub fn from_env(directory: Arc<dyn SessionDirectory>, fleet: Arc<dyn FleetBackend>) -> Result<Self> {
        Ok(Self::new(directory, fleet, BrokerConfig::from_env()?))
    }

    /// Get the configuration.
    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    fn bounded(&self, ctx: RequestContext) -> RequestContext {
        match (ctx.deadline(), self.config.default_timeout) {
            (None, Some(timeout)) => ctx.with_timeout(timeout),
            _ => ctx,
        }
    }
}

#[async_trait]
impl SessionDsm for SessionBroker {
    async fn create_game_session(&self, ctx: RequestContext, request: PlacementRequest) -> Result<PlacementResult> {
        let ctx = self.bounded(ctx);
        let span = tracing::info_span!(
            "CreateGameSession",
            request_id = %ctx.request_id,
            session_id = %request.session_id,
            namespace = %request.namespace,
        );
        self.creator.create(&ctx, &request).instrument(span).await
    }

    async fn create_game_session_async(
        &self,
        ctx: RequestContext,
        request: PlacementRequest,
    ) -> Result<AsyncPlacementResult> {
        let ctx = self.bounded(ctx);
        let span = tracing::info_span!(
            "CreateGameSessionAsync",
            request_id = %ctx.request_id,
            session_id = %request.session_id,
            namespace = %request.namespace,
        );
        self.requester.start(&ctx, &request).instrument(span).await
    }

    async fn terminate_game_session(&self, ctx: RequestContext, request: TerminateRequest) -> Result<TerminateResponse> {
        let ctx = self.bounded(ctx);
        let span = tracing::info_span!(
            "TerminateGameSession",
            request_id = %ctx.request_id,
            session_id = %request.session_id,
            namespace = %request.namespace,
        );
        self.terminator.terminate(&ctx, &request).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DirectoryEntry, GameSession, InMemoryDirectory, InMemoryFleet};
    use crate::config::Overrides;
    use crate::core::{BackendError, Error};
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    struct Harness {
        directory: Arc<InMemoryDirectory>,
        fleet: Arc<InMemoryFleet>,
        broker: SessionBroker,
    }

    fn harness(config: BrokerConfig) -> Harness {
        let directory = Arc::new(InMemoryDirectory::new());
        let fleet = Arc::new(InMemoryFleet::new());
        let broker = SessionBroker::new(directory.clone(), fleet.clone(), config);
        Harness {
            directory,
            fleet,
            broker,
        }
    }

    #[tokio::test]
    async fn test_create_then_terminate() {
        let h = harness(BrokerConfig::default());
        h.fleet.fail_in("us-west-2", BackendError::Unavailable("no capacity".to_string()));
        h.fleet.respond_in(
            "eu-west-1",
            GameSession {
                game_session_id: Some("arn:aws:gamelift:eu-west-1::gamesession/fleet-1/gs1".to_string()),
                ip_address: Some("1.2.3.4".to_string()),
                port: Some(7777),
                location: Some("eu-west-1".to_string()),
            },
        );

        let request = PlacementRequest::new("ns", "s-1", "alias-1")
            .with_regions(["us-west-2", "eu-west-1"])
            .with_max_players(4);
        let placed = h
            .broker
            .create_game_session(RequestContext::new("CreateGameSession"), request)
            .await
            .unwrap();

        assert_eq!(placed.server_id, "arn:aws:gamelift:eu-west-1::gamesession/fleet-1/gs1");
        assert_eq!(placed.ip, "1.2.3.4");
        assert_eq!(placed.port, 7777);
        assert_eq!(placed.region, "eu-west-1");
        assert_eq!(h.fleet.create_calls().len(), 2);

        // The platform records the placed session under its handle
        h.directory
            .insert(DirectoryEntry::new("ns", "s-1", &placed.deployment).with_region(&placed.region));

        let terminated = h
            .broker
            .terminate_game_session(RequestContext::new("TerminateGameSession"), TerminateRequest::new("ns", "s-1"))
            .await
            .unwrap();

        assert!(terminated.success);
        assert_eq!(h.fleet.terminate_calls()[0].game_session_id, placed.deployment);
    }

    #[tokio::test]
    async fn test_async_placement_end_to_end() {
        let h = harness(BrokerConfig::default());
        let request = PlacementRequest::new("ns", "s-2", "queue-1")
            .with_max_players(2)
            .with_session_data(r#"{"gamelift_latencies":{"p1":{"us-east-1":10.0},"p2":{"us-east-1":20.0}}}"#);

        let result = assert_ok!(
            h.broker
                .create_game_session_async(RequestContext::new("CreateGameSessionAsync"), request)
                .await
        );

        assert!(result.success);
        let calls = h.fleet.placement_calls();
        assert_eq!(calls[0].player_latencies.as_ref().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_terminate_unknown_session() {
        let h = harness(BrokerConfig::default());

        let err = assert_err!(
            h.broker
                .terminate_game_session(RequestContext::new("TerminateGameSession"), TerminateRequest::new("ns", "nope"))
                .await
        );

        assert!(matches!(err.backend_error(), Some(BackendError::NotFound(_))));
        assert!(h.fleet.terminate_calls().is_empty());
    }

    #[tokio::test]
    async fn test_overrides_flow_through_broker() {
        let overrides = Overrides::none()
            .with_alias_id("alias-forced")
            .with_queue_arn("queue-forced");
        let h = harness(BrokerConfig::new(overrides));

        h.broker
            .create_game_session(
                RequestContext::new("CreateGameSession"),
                PlacementRequest::new("ns", "s-3", "alias-caller").with_regions(["us-west-2"]),
            )
            .await
            .unwrap();
        h.broker
            .create_game_session_async(
                RequestContext::new("CreateGameSessionAsync"),
                PlacementRequest::new("ns", "s-4", "queue-caller"),
            )
            .await
            .unwrap();

        assert_eq!(h.fleet.create_calls()[0].alias_id, "alias-forced");
        assert_eq!(h.fleet.placement_calls()[0].game_session_queue_name, "queue-forced");
    }

    #[tokio::test]
    async fn test_empty_regions_rejected_before_backend() {
        let h = harness(BrokerConfig::default());

        let err = h
            .broker
            .create_game_session(
                RequestContext::new("CreateGameSession"),
                PlacementRequest::new("ns", "s-5", "alias-1"),
            )
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("s-5"));
        assert!(h.fleet.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_timeout_applies() {
        let h = harness(BrokerConfig::default().with_default_timeout(Duration::from_secs(3)));
        h.fleet.hang_in("us-west-2");

        let err = h
            .broker
            .create_game_session(
                RequestContext::new("CreateGameSession"),
                PlacementRequest::new("ns", "s-6", "alias-1").with_regions(["us-west-2"]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DeadlineExceeded { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_broker() {
        let h = harness(BrokerConfig::default());
        let broker = Arc::new(h.broker);

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let broker = broker.clone();
                tokio::spawn(async move {
                    broker
                        .create_game_session(
                            RequestContext::new("CreateGameSession"),
                            PlacementRequest::new("ns", &format!("s-{}", i), "alias-1").with_regions(["us-east-1"]),
                        )
                        .await
                })
            })
            .collect();

        for task in futures::future::join_all(tasks).await {
            assert!(task.unwrap().is_ok());
        }
        assert_eq!(h.fleet.create_calls().len(), 8);
    }
}
