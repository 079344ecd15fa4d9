//! Boundary to the authoritative admin store.

pub mod http;
pub mod in_memory;

use async_trait::async_trait;

use huddle_core::{CategoryId, GroupId};
use huddle_directory::{
    AttendeeGroup, CategoryPatch, CategoryWithGroups, GroupPatch, NewCategory, NewGroup,
};

pub use http::HttpGateway;
pub use in_memory::InMemoryGateway;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The remote store does not hold the identifier.
    #[error("not found: {0}")]
    NotFound(String),
    /// The remote store already holds the identifier.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl GatewayError {
    /// Map a non-2xx response onto the error taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Api { status, message },
        }
    }

    /// HTTP status behind the failure, when there was a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::Api { status, .. } => Some(*status),
            Self::Network(_) | Self::Parse(_) => None,
        }
    }
}

/// CRUD capability over both remote collections.
///
/// Every call is one round trip; implementations never retry.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn list_groups(&self) -> GatewayResult<Vec<AttendeeGroup>>;
    async fn create_group(&self, new: &NewGroup) -> GatewayResult<AttendeeGroup>;
    async fn update_group(&self, id: &GroupId, patch: &GroupPatch) -> GatewayResult<AttendeeGroup>;
    async fn delete_group(&self, id: &GroupId) -> GatewayResult<()>;

    async fn list_categories(&self) -> GatewayResult<Vec<CategoryWithGroups>>;
    async fn create_category(&self, new: &NewCategory) -> GatewayResult<CategoryWithGroups>;
    async fn update_category(
        &self,
        id: &CategoryId,
        patch: &CategoryPatch,
    ) -> GatewayResult<CategoryWithGroups>;
    async fn delete_category(&self, id: &CategoryId) -> GatewayResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(GatewayError::from_status(404, "x"), GatewayError::NotFound("x".into()));
        assert_eq!(GatewayError::from_status(409, "x"), GatewayError::Conflict("x".into()));
        assert_eq!(
            GatewayError::from_status(503, "down"),
            GatewayError::Api { status: 503, message: "down".into() }
        );
        assert_eq!(GatewayError::Network("reset".into()).status(), None);
    }
}
