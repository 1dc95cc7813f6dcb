//! Service identity: validated name, version, and the lookup key built from
//! them.

use super::ReferenceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an external service, such as `magento` or `presta.shop`.
///
/// Names are compared verbatim after trimming; case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDomainError::EmptyServiceName`] when the value is
    /// empty after trimming or [`ReferenceDomainError::InvalidServiceName`]
    /// when it contains inner whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ReferenceDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ReferenceDomainError::EmptyServiceName);
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(ReferenceDomainError::InvalidServiceName(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the service name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Version label of an external service, such as `1.7` or `2.0-beta`.
///
/// Versions are compared verbatim; no semantic ordering is implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceVersion(String);

impl ServiceVersion {
    /// Creates a validated service version.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDomainError::EmptyServiceVersion`] when the value is
    /// empty after trimming or [`ReferenceDomainError::InvalidServiceVersion`]
    /// when it contains inner whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ReferenceDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ReferenceDomainError::EmptyServiceVersion);
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(ReferenceDomainError::InvalidServiceVersion(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceVersion {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry lookup key: a service with an optional version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceKey {
    service: ServiceName,
    version: Option<ServiceVersion>,
}

impl ReferenceKey {
    /// Creates a key from validated parts.
    #[must_use]
    pub const fn new(service: ServiceName, version: Option<ServiceVersion>) -> Self {
        Self { service, version }
    }

    /// Parses a key from raw strings.
    ///
    /// # Errors
    ///
    /// Returns a [`ReferenceDomainError`] when either part fails validation.
    pub fn parse(service: &str, version: Option<&str>) -> Result<Self, ReferenceDomainError> {
        let service_name = ServiceName::new(service)?;
        let service_version = version.map(ServiceVersion::new).transpose()?;
        Ok(Self::new(service_name, service_version))
    }

    /// Returns the service name.
    #[must_use]
    pub const fn service(&self) -> &ServiceName {
        &self.service
    }

    /// Returns the version, if any.
    #[must_use]
    pub const fn version(&self) -> Option<&ServiceVersion> {
        self.version.as_ref()
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{version}", self.service),
            None => write!(f, "{}", self.service),
        }
    }
}
