//! Session directory interface.
//!
//! The directory knows every session the platform created and which
//! backend handle it was placed on.

use crate::core::BackendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Server details recorded for a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Namespace
    pub namespace: String,
    /// Caller-visible session ID
    pub session_id: String,
    /// Backend session handle (fully-qualified game session ARN)
    pub deployment: String,
    /// Region the server runs in
    pub region: String,
}

impl DirectoryEntry {
    /// Create a new entry for a session placed on `deployment`.
    pub fn new(namespace: &str, session_id: &str, deployment: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            session_id: session_id.to_string(),
            deployment: deployment.to_string(),
            region: String::new(),
        }
    }

    /// Set region.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }
}

/// Lookup of sessions known to the platform.
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    /// Fetch the directory entry for a session.
    ///
    /// Unknown sessions are reported as [`BackendError::NotFound`].
    async fn lookup(&self, namespace: &str, session_id: &str) -> Result<DirectoryEntry, BackendError>;
}
