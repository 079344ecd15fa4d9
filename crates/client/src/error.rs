use huddle_core::DomainError;
use huddle_directory::EntityKind;

use crate::gateway::GatewayError;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The entity is not in the local projection. Raised before any optimistic
    /// change or remote call.
    #[error("{kind} `{id}` not found locally")]
    NotFound { kind: EntityKind, id: String },

    /// The remote store already holds the identifier.
    #[error("{kind} `{id}` already exists: {message}")]
    Conflict {
        kind: EntityKind,
        id: String,
        message: String,
    },

    /// Network or server failure; local state has been rolled back.
    #[error("remote call failed: {0}")]
    Remote(#[from] GatewayError),

    /// Input rejected locally before any optimistic change.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl ClientError {
    pub fn not_found(kind: EntityKind, id: impl core::fmt::Display) -> Self {
        Self::NotFound { kind, id: id.to_string() }
    }

    /// Classify a failed remote call for `kind`/`id`.
    pub fn from_gateway(kind: EntityKind, id: impl core::fmt::Display, err: GatewayError) -> Self {
        match err {
            GatewayError::Conflict(message) => Self::Conflict {
                kind,
                id: id.to_string(),
                message,
            },
            other => Self::Remote(other),
        }
    }
}

impl From<DomainError> for ClientError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}
