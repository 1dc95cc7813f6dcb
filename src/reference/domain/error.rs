//! Error types for reference domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing reference domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReferenceDomainError {
    /// The service name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// The service name contains whitespace.
    #[error("service name '{0}' must not contain whitespace")]
    InvalidServiceName(String),

    /// The service version is empty after trimming.
    #[error("service version must not be empty")]
    EmptyServiceVersion,

    /// The service version contains whitespace.
    #[error("service version '{0}' must not contain whitespace")]
    InvalidServiceVersion(String),

    /// The model name is empty after trimming.
    #[error("model name must not be empty")]
    EmptyModelName,

    /// The model name contains whitespace.
    #[error("model name '{0}' must not contain whitespace")]
    InvalidModelName(String),

    /// The synchronization type is empty after trimming.
    #[error("synchronization type must not be empty")]
    EmptySynchronizationType,

    /// The synchronization type contains characters outside `[a-z0-9_]`.
    #[error(
        "synchronization type '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidSynchronizationType(String),
}

/// Error returned while parsing a mapping direction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown mapping direction: {0}")]
pub struct ParseMappingDirectionError(pub String);

/// Error returned while parsing a capability kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown capability kind: {0}")]
pub struct ParseCapabilityKindError(pub String);
