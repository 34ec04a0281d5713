use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Behavior of the single resource a simulator process hosts.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Produces the current representation. Sensor-backed resources take a
    /// fresh sample here, so calling this is never free of side effects.
    async fn retrieve(&self) -> Value;

    /// Applies a representation sent by a client and returns the resulting
    /// one. Read-only resources keep the default.
    async fn update(&self, _payload: Value) -> Result<Value, UpdateError> {
        Err(UpdateError::NotSupported)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum UpdateError {
    #[error("the resource does not support updates")]
    NotSupported,
    #[error("invalid payload: {reason}")]
    InvalidPayload { reason: String },
}
