//! # Session DSM - Session placement broker
//!
//! Translates session management requests into calls against a game
//! server hosting backend:
//! - **Create**: synchronous creation with ordered region failover
//! - **Create async**: queue placement biased by player latencies
//! - **Terminate**: handle lookup through the session directory, then graceful shutdown
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use session_dsm::backend::{InMemoryDirectory, InMemoryFleet};
//! use session_dsm::{BrokerConfig, PlacementRequest, RequestContext, SessionBroker, SessionDsm};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let broker = SessionBroker::new(
//!         Arc::new(InMemoryDirectory::new()),
//!         Arc::new(InMemoryFleet::new()),
//!         BrokerConfig::from_env().unwrap(),
//!     );
//!
//!     let request = PlacementRequest::new("my-namespace", "session-1", "alias-1234")
//!         .with_regions(["us-west-2", "eu-west-1"])
//!         .with_max_players(8);
//!     let session = broker
//!         .create_game_session(RequestContext::new("CreateGameSession"), request)
//!         .await
//!         .unwrap();
//!     println!("Session on {}:{}", session.ip, session.port);
//! }
//! ```

pub mod backend;
pub mod broker;
pub mod config;
pub mod context;
pub mod core;
pub mod placement;
pub mod telemetry;

pub use broker::{SessionBroker, SessionDsm};
pub use config::{BrokerConfig, Overrides};
pub use context::RequestContext;
pub use core::error::{BackendError, Error, Result};
pub use placement::{AsyncPlacementResult, PlacementRequest, PlacementResult, TerminateRequest, TerminateResponse};
