//! Remote client for the realm management API.
//!
//! The controller talks to the management API only through [`RealmClient`].
//! [`HttpRealmClient`] speaks the Keycloak admin REST API;
//! [`InMemoryRealmClient`] keeps realms in process.

mod http;
mod memory;

pub use http::HttpRealmClient;
pub use memory::{ClientCall, InMemoryRealmClient};

use async_trait::async_trait;
use kc_model::Realm;
use thiserror::Error;

/// Errors returned by a [`RealmClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The realm does not exist.
    #[error("realm not found: {id}")]
    NotFound {
        /// Identity that was looked up.
        id: String,
    },

    /// The server answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not a valid realm.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Checks if this is a network or server-side failure.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Http(_) | Self::Transport(_))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Access to realms held by the management API.
///
/// Implementations must be thread-safe; the controller may be shared across
/// tasks that reconcile different realms.
#[async_trait]
pub trait RealmClient: Send + Sync {
    /// Gets a realm by identity.
    ///
    /// ## Errors
    ///
    /// Returns `ClientError::NotFound` if the realm doesn't exist.
    async fn get_realm(&self, id: &str) -> ClientResult<Realm>;

    /// Creates a realm and returns it with its server-assigned identity.
    async fn create_realm(&self, realm: &Realm) -> ClientResult<Realm>;

    /// Replaces a realm's settings with the given record.
    ///
    /// ## Errors
    ///
    /// Returns `ClientError::NotFound` if the realm doesn't exist.
    async fn update_realm(&self, realm: &Realm) -> ClientResult<()>;

    /// Deletes a realm by identity.
    ///
    /// ## Errors
    ///
    /// Returns `ClientError::NotFound` if the realm doesn't exist.
    async fn delete_realm(&self, id: &str) -> ClientResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_not_transport() {
        let err = ClientError::not_found("acme");
        assert!(err.is_not_found());
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "realm not found: acme");
    }

    #[test]
    fn api_error_is_transport() {
        let err = ClientError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }
}
