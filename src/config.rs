//! Broker configuration.
//!
//! Overrides are read once at startup and stay fixed for the lifetime
//! of the broker.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Forces the deployment of every synchronous session creation.
pub const ENV_ALIAS_ID_OVERRIDE: &str = "AWS_ALIAS_ID_OVERRIDE";

/// Forces a single region for every synchronous session creation.
/// Useful with Anywhere fleets, which use custom locations.
pub const ENV_LOCATION_OVERRIDE: &str = "AWS_LOCATION_OVERRIDE";

/// Forces the queue for every asynchronous placement.
pub const ENV_QUEUE_ARN_OVERRIDE: &str = "AWS_QUEUE_ARN_OVERRIDE";

/// Default per-request deadline in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "SESSION_DSM_TIMEOUT_MS";

/// Operational overrides for the target deployment, region and queue.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    /// Alias ID or ARN replacing the caller's deployment
    pub alias_id: Option<String>,
    /// Location replacing the caller's region list
    pub location: Option<String>,
    /// Queue name or ARN replacing the caller's deployment for placements
    pub queue_arn: Option<String>,
}

impl Overrides {
    /// No overrides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary lookup function.
    ///
    /// Unset and empty values both mean "no override".
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            alias_id: non_empty(lookup(ENV_ALIAS_ID_OVERRIDE)),
            location: non_empty(lookup(ENV_LOCATION_OVERRIDE)),
            queue_arn: non_empty(lookup(ENV_QUEUE_ARN_OVERRIDE)),
        }
    }

    /// Set the alias override.
    pub fn with_alias_id(mut self, alias_id: &str) -> Self {
        self.alias_id = non_empty(Some(alias_id.to_string()));
        self
    }

    /// Set the location override.
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = non_empty(Some(location.to_string()));
        self
    }

    /// Set the queue override.
    pub fn with_queue_arn(mut self, queue_arn: &str) -> Self {
        self.queue_arn = non_empty(Some(queue_arn.to_string()));
        self
    }

    /// Deployment to use for a synchronous creation.
    pub fn deployment_for_create(&self, requested: &str) -> String {
        match &self.alias_id {
            Some(alias_id) => {
                debug!(alias_id = %alias_id, "Using AWS Alias ID override");
                alias_id.clone()
            }
            None => requested.to_string(),
        }
    }

    /// Candidate regions to use for a synchronous creation.
    pub fn regions_for_create(&self, requested: &[String]) -> Vec<String> {
        match &self.location {
            Some(location) => {
                debug!(location = %location, "Using AWS Location override");
                vec![location.clone()]
            }
            None => requested.to_vec(),
        }
    }

    /// Queue to target for an asynchronous placement.
    pub fn queue_for_placement(&self, requested: &str) -> String {
        match &self.queue_arn {
            Some(queue_arn) => {
                debug!(queue_arn = %queue_arn, "Using AWS Queue ARN override");
                queue_arn.clone()
            }
            None => requested.to_string(),
        }
    }

    /// Check if any override is active.
    pub fn is_empty(&self) -> bool {
        self.alias_id.is_none() && self.location.is_none() && self.queue_arn.is_none()
    }
}

/// Broker configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Fixed overrides
    pub overrides: Overrides,
    /// Deadline applied to requests that carry none
    pub default_timeout: Option<Duration>,
}

impl BrokerConfig {
    /// Create a config with the given overrides and no default deadline.
    pub fn new(overrides: Overrides) -> Self {
        Self {
            overrides,
            default_timeout: None,
        }
    }

    /// Set the default per-request deadline.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_timeout = match non_empty(lookup(ENV_TIMEOUT_MS)) {
            Some(raw) => {
                let millis: u64 = raw.trim().parse().map_err(|_| {
                    Error::Config(format!("{} must be a number of milliseconds, got {:?}", ENV_TIMEOUT_MS, raw))
                })?;
                if millis == 0 {
                    return Err(Error::Config(format!("{} must be greater than zero", ENV_TIMEOUT_MS)));
                }
                Some(Duration::from_millis(millis))
            }
            None => None,
        };

        Ok(Self {
            overrides: Overrides::from_lookup(&lookup),
            default_timeout,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
