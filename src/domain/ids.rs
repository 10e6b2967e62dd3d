//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers the consent API hands out, so an
//! organization id can never be passed where a project id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Organization identifier
///
/// The top-level tenant whose projects are exported.
///
/// # Examples
///
/// ```
/// use consent_export::domain::ids::OrganizationId;
/// use std::str::FromStr;
///
/// let id = OrganizationId::from_str("5fb3e3c3a1b2c3d4e5f60718").unwrap();
/// assert_eq!(id.as_str(), "5fb3e3c3a1b2c3d4e5f60718");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationId(String);

impl OrganizationId {
    /// Creates a new OrganizationId, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Organization ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the organization ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrganizationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for OrganizationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Project identifier
///
/// # Examples
///
/// ```
/// use consent_export::domain::ids::ProjectId;
///
/// assert!(ProjectId::new("61a0f1").is_ok());
/// assert!(ProjectId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(String);

impl ProjectId {
    /// Creates a new ProjectId, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Project ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the project ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
