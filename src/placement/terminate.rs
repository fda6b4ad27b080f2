//! Session teardown.
//!
//! The caller-visible session ID is not a backend handle, so the handle is
//! resolved through the session directory before the fleet is asked to
//! terminate the session.

use crate::backend::{FleetBackend, SessionDirectory, TerminateGameSessionInput, TerminationMode};
use crate::context::RequestContext;
use crate::core::{Error, Result};
use crate::placement::request::{TerminateRequest, TerminateResponse};
use std::sync::Arc;
use tracing::{error, info};

/// Terminates sessions gracefully.
pub struct SessionTerminator {
    directory: Arc<dyn SessionDirectory>,
    fleet: Arc<dyn FleetBackend>,
}

impl SessionTerminator {
    /// Create a new terminator.
    pub fn new(directory: Arc<dyn SessionDirectory>, fleet: Arc<dyn FleetBackend>) -> Self {
        Self { directory, fleet }
    }

    /// Resolve the session's backend handle and terminate it.
    pub async fn terminate(&self, ctx: &RequestContext, request: &TerminateRequest) -> Result<TerminateResponse> {
        let session_id = request.session_id.as_str();

        let entry = ctx
            .call(
                session_id,
                "GetGameSession",
                self.directory.lookup(&request.namespace, session_id),
            )
            .await
            .map_err(|err| {
                error!(session_id, error = %err, "Failed to get session info while terminating game session");
                err
            })?;

        if entry.deployment.is_empty() {
            error!(session_id, "Session info has no game session handle, not terminating");
            return Err(Error::IncompleteResponse {
                session_id: session_id.to_string(),
                field: "Deployment",
            });
        }

        let input = TerminateGameSessionInput {
            game_session_id: entry.deployment,
            termination_mode: TerminationMode::TriggerOnProcessTerminate,
        };

        ctx.call(session_id, "TerminateGameSession", self.fleet.terminate_game_session(input))
            .await
            .map_err(|err| {
                error!(session_id, error = %err, "Failed to terminate game session");
                err
            })?;

        info!(session_id, namespace = %request.namespace, "Terminated session");
        Ok(TerminateResponse {
            namespace: request.namespace.clone(),
            session_id: request.session_id.clone(),
            success: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DirectoryEntry, FleetCall, InMemoryDirectory, InMemoryFleet};
    use crate::core::BackendError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio_util::sync::CancellationToken;

    const HANDLE: &str = "arn:aws:gamelift:us-west-2::gamesession/fleet-1/gs1";

    fn setup() -> (Arc<InMemoryDirectory>, Arc<InMemoryFleet>, SessionTerminator) {
        let directory = Arc::new(InMemoryDirectory::new());
        let fleet = Arc::new(InMemoryFleet::new());
        let terminator = SessionTerminator::new(directory.clone(), fleet.clone());
        (directory, fleet, terminator)
    }

    #[tokio::test]
    async fn test_terminate_uses_directory_handle() {
        let (directory, fleet, terminator) = setup();
        directory.insert(DirectoryEntry::new("ns", "s-1", HANDLE));

        let response = terminator
            .terminate(&RequestContext::new("TerminateGameSession"), &TerminateRequest::new("ns", "s-1"))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.session_id, "s-1");
        assert_eq!(response.namespace, "ns");
        assert_eq!(directory.lookups(), vec![("ns".to_string(), "s-1".to_string())]);
        assert_eq!(
            fleet.calls(),
            vec![FleetCall::Terminate(TerminateGameSessionInput {
                game_session_id: HANDLE.to_string(),
                termination_mode: TerminationMode::TriggerOnProcessTerminate,
            })]
        );
    }

    #[tokio::test]
    async fn test_unknown_session_never_terminates() {
        let (directory, fleet, terminator) = setup();

        let err = terminator
            .terminate(&RequestContext::new("TerminateGameSession"), &TerminateRequest::new("ns", "ghost"))
            .await
            .unwrap_err();

        assert!(matches!(err.backend_error(), Some(BackendError::NotFound(_))));
        assert!(err.to_string().contains("ghost"));
        assert_eq!(directory.lookups().len(), 1);
        assert!(fleet.calls().is_empty());
    }

    #[tokio::test]
    async fn test_directory_outage_never_terminates() {
        let (directory, fleet, terminator) = setup();
        directory.insert(DirectoryEntry::new("ns", "s-1", HANDLE));
        directory.fail_with(BackendError::Unavailable("directory down".to_string()));

        let err = terminator
            .terminate(&RequestContext::new("TerminateGameSession"), &TerminateRequest::new("ns", "s-1"))
            .await
            .unwrap_err();

        assert_eq!(
            err.backend_error(),
            Some(&BackendError::Unavailable("directory down".to_string()))
        );
        assert!(fleet.calls().is_empty());
    }

    #[tokio::test]
    async fn test_termination_failure_is_not_retried() {
        let (directory, fleet, terminator) = setup();
        directory.insert(DirectoryEntry::new("ns", "s-1", HANDLE));
        fleet.fail_terminate(BackendError::Rejected("session already terminated".to_string()));

        let err = terminator
            .terminate(&RequestContext::new("TerminateGameSession"), &TerminateRequest::new("ns", "s-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Backend { operation: "TerminateGameSession", .. }));
        assert_eq!(fleet.terminate_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_request_issues_nothing() {
        let (directory, fleet, terminator) = setup();
        directory.insert(DirectoryEntry::new("ns", "s-1", HANDLE));

        let token = CancellationToken::new();
        token.cancel();
        let ctx = RequestContext::new("TerminateGameSession").with_cancellation(token);

        let err = terminator
            .terminate(&ctx, &TerminateRequest::new("ns", "s-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled { .. }));
        assert!(fleet.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_handle_is_incomplete_response() {
        let (directory, fleet, terminator) = setup();
        directory.insert(DirectoryEntry::new("ns", "s-1", ""));

        let err = terminator
            .terminate(&RequestContext::new("TerminateGameSession"), &TerminateRequest::new("ns", "s-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::IncompleteResponse { field: "Deployment", .. }));
        assert!(err.to_string().contains("s-1"));
        assert!(fleet.calls().is_empty());
    }

    /// Directory that records how many fleet calls had happened at lookup time.
    struct WatchedDirectory {
        inner: InMemoryDirectory,
        fleet: Arc<InMemoryFleet>,
        fleet_calls_at_lookup: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl SessionDirectory for WatchedDirectory {
        async fn lookup(&self, namespace: &str, session_id: &str) -> std::result::Result<DirectoryEntry, BackendError> {
            self.fleet_calls_at_lookup.lock().push(self.fleet.calls().len());
            self.inner.lookup(namespace, session_id).await
        }
    }

    #[tokio::test]
    async fn test_lookup_happens_before_termination() {
        let fleet = Arc::new(InMemoryFleet::new());
        let directory = Arc::new(WatchedDirectory {
            inner: InMemoryDirectory::new(),
            fleet: fleet.clone(),
            fleet_calls_at_lookup: Mutex::new(Vec::new()),
        });
        directory.inner.insert(DirectoryEntry::new("ns", "s-1", HANDLE));
        let terminator = SessionTerminator::new(directory.clone(), fleet.clone());

        terminator
            .terminate(&RequestContext::new("TerminateGameSession"), &TerminateRequest::new("ns", "s-1"))
            .await
            .unwrap();

        assert_eq!(*directory.fleet_calls_at_lookup.lock(), vec![0]);
        assert_eq!(directory.inner.lookups().len(), 1);
        assert_eq!(fleet.terminate_calls().len(), 1);
    }
}
