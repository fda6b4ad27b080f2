//! Per-request context.
//!
//! Carries the caller's cancellation signal and deadline. Every backend
//! call made on behalf of a request goes through [`RequestContext::call`].

use crate::core::{BackendError, Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Context for one broker request.
#[derive(Clone, Debug)]
pub struct RequestContext {
    /// Correlation ID for logs
    pub request_id: Uuid,
    /// RPC operation name
    pub operation: &'static str,
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Create a context with no deadline.
    pub fn new(operation: &'static str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            operation,
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Expire the request after `timeout`.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Expire the request at `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Tie the request to an existing cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Derive a context for a sub-operation. Cancelling the parent cancels the child.
    pub fn child(&self, operation: &'static str) -> Self {
        Self {
            request_id: self.request_id,
            operation,
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel the request.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check if the request has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Run a backend call, aborting it on cancellation or deadline expiry.
    pub async fn call<T, F>(&self, session_id: &str, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, BackendError>>,
    {
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => futures::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled {
                session_id: session_id.to_string(),
            }),
            _ = expired => Err(Error::DeadlineExceeded {
                session_id: session_id.to_string(),
            }),
            outcome = call => outcome.map_err(|source| Error::Backend {
                session_id: session_id.to_string(),
                operation,
                source,
            }),
        }
    }
}
