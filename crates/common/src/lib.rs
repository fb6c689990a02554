//! Common types, protocol definitions, and errors shared across `fleet-relay` crates.

pub mod envelope;
pub mod error;
pub mod protocol;

pub use envelope::{Score, UpdateEnvelope};
pub use error::ServiceError;
