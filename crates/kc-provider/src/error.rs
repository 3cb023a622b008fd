//! Provider error types.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::client::ClientError;

/// Operation being performed when a remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Creating a realm.
    Create,
    /// Reading a realm.
    Read,
    /// Updating a realm.
    Update,
    /// Deleting a realm.
    Delete,
    /// Importing an existing realm.
    Import,
}

impl Operation {
    /// Returns the lowercase operation name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field name as it appears in the document.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found while validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Records a violation.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the recorded violations.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Returns true if `field` has at least one violation.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    /// Converts into a result, failing if any violation was recorded.
    pub fn into_result(self) -> ProviderResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Errors surfaced by the reconciliation engine.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The document failed schema validation. No network call was made.
    #[error("validation error: {0}")]
    Validation(ValidationErrors),

    /// The remote API rejected or failed an operation.
    #[error("failed to {operation} realm '{id}': {source}")]
    Remote {
        /// Operation that failed.
        operation: Operation,
        /// Realm identity (or name, before creation).
        id: String,
        /// Underlying client error.
        #[source]
        source: ClientError,
    },

    /// The realm does not exist remotely.
    #[error("realm not found: {id}")]
    NotFound {
        /// Realm identity.
        id: String,
    },

    /// An in-place change was requested for a field that requires replacement.
    #[error("field '{field}' cannot be changed in place ({prior} -> {requested}); the realm must be replaced")]
    Conflict {
        /// Field name.
        field: &'static str,
        /// Value in the tracked state.
        prior: Value,
        /// Value in the new configuration.
        requested: Value,
    },

    /// The create call succeeded but no identity came back.
    #[error("remote API returned no id for created realm '{realm}'")]
    MissingIdentity {
        /// Realm name.
        realm: String,
    },

    /// The realm was created but reading it back failed. The realm exists
    /// remotely under `id` and must be tracked.
    #[error("realm '{id}' was created but could not be read back: {source}")]
    Tainted {
        /// Identity the server assigned.
        id: String,
        /// Read-back failure.
        #[source]
        source: Box<ProviderError>,
    },

    /// A document could not be translated to or from a record.
    #[error("codec error: {0}")]
    Codec(String),
}

impl ProviderError {
    /// Wraps a client error with operation context.
    pub fn remote(operation: Operation, id: impl Into<String>, source: ClientError) -> Self {
        Self::Remote {
            operation,
            id: id.into(),
            source,
        }
    }

    /// Checks if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Checks if this error means the realm is absent remotely.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Remote { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Checks if this error came from the network or the remote server.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Remote { source, .. } => source.is_transport(),
            Self::Tainted { source, .. } => source.is_transport(),
            _ => false,
        }
    }

    /// Returns the identity of a realm that was created despite the error.
    #[must_use]
    pub fn created_id(&self) -> Option<&str> {
        match self {
            Self::Tainted { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_join_messages() {
        let mut errors = ValidationErrors::new();
        errors.push("ssl_required", "must be one of ALL, EXTERNAL, NONE");
        errors.push("enabled", "is required");

        assert!(errors.contains("enabled"));
        assert_eq!(
            errors.to_string(),
            "ssl_required: must be one of ALL, EXTERNAL, NONE; enabled: is required"
        );
        assert!(errors.into_result().unwrap_err().is_validation());
    }

    #[test]
    fn empty_validation_errors_pass() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn remote_error_carries_context() {
        let err = ProviderError::remote(
            Operation::Update,
            "r-1",
            ClientError::Transport("connection refused".to_string()),
        );

        assert!(err.is_transport());
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "failed to update realm 'r-1': transport error: connection refused"
        );
    }

    #[test]
    fn tainted_error_keeps_the_created_id() {
        let err = ProviderError::Tainted {
            id: "r-1".to_string(),
            source: Box::new(ProviderError::remote(
                Operation::Read,
                "r-1",
                ClientError::Transport("timeout".to_string()),
            )),
        };

        assert_eq!(err.created_id(), Some("r-1"));
        assert!(err.is_transport());
        assert_eq!(
            err.to_string(),
            "realm 'r-1' was created but could not be read back: failed to read realm 'r-1': transport error: timeout"
        );
        assert_eq!(ProviderError::NotFound { id: "r-1".into() }.created_id(), None);
    }

    #[test]
    fn remote_not_found_is_classified() {
        let err = ProviderError::remote(
            Operation::Read,
            "r-1",
            ClientError::not_found("r-1"),
        );
        assert!(err.is_not_found());
        assert!(!err.is_transport());
    }
}
