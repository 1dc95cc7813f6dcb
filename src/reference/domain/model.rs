//! Resolution criteria passed to capability match predicates.

use super::{ParseMappingDirectionError, ReferenceDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a data model in the host application, e.g.
/// `product.product` or `res.partner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelName(String);

impl ModelName {
    /// Creates a validated model name.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDomainError::EmptyModelName`] when the value is
    /// empty after trimming or [`ReferenceDomainError::InvalidModelName`] when
    /// it contains inner whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ReferenceDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ReferenceDomainError::EmptyModelName);
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(ReferenceDomainError::InvalidModelName(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the model name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direction in which a mapper transforms record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingDirection {
    /// External representation into the application.
    Import,
    /// Application representation out to the external service.
    Export,
}

impl MappingDirection {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for MappingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MappingDirection {
    type Error = ParseMappingDirectionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "import" => Ok(Self::Import),
            "export" => Ok(Self::Export),
            _ => Err(ParseMappingDirectionError(value.to_owned())),
        }
    }
}

/// Tag naming a synchronization workflow, e.g. `import`, `export` or
/// `batch_import`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynchronizationType(String);

impl SynchronizationType {
    /// Creates a validated synchronization type.
    ///
    /// The input is trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDomainError::EmptySynchronizationType`] when the
    /// value is empty after trimming or
    /// [`ReferenceDomainError::InvalidSynchronizationType`] when it contains
    /// characters outside `[a-z0-9_]`.
    pub fn new(value: impl Into<String>) -> Result<Self, ReferenceDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(ReferenceDomainError::EmptySynchronizationType);
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if !is_valid {
            return Err(ReferenceDomainError::InvalidSynchronizationType(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the synchronization type as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SynchronizationType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SynchronizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
