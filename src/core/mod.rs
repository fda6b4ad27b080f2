//! Core utilities and common types for the session broker.

pub mod error;
pub mod types;

pub use error::{BackendError, Error, Result};
pub use types::*;
