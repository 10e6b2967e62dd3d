//! External integrations
//!
//! - [`consent_api`] - Remote consent-management REST API

pub mod consent_api;
