//! Error types for capmat

use thiserror::Error;

/// The main error type for capmat operations.
///
/// Policy denials (`CapabilityDenied`, `RoleNotPermitted`) and malformed
/// requests (`NotFound`, `InvalidDecision`, ...) are distinct kinds so a
/// caller can tell "denied by policy" from "caller bug". Every variant is
/// recoverable: a failed request leaves the matrix untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcmError {
    #[error("subject \"{0}\" already exists")]
    DuplicateSubject(String),

    #[error("manuscript \"{0}\" already exists")]
    DuplicateObject(String),

    #[error("role \"{0}\" does not exist")]
    UnknownRole(String),

    #[error("{kind} \"{name}\" does not exist")]
    NotFound { kind: &'static str, name: String },

    #[error("role \"{role}\" is not permitted to {attempted}")]
    RoleNotPermitted { role: String, attempted: &'static str },

    #[error("decision \"{0}\" is not a valid Consider_Reviews option")]
    InvalidDecision(String),

    #[error("\"{subject}\" lacks {capability} on \"{object}\"")]
    CapabilityDenied {
        subject: String,
        capability: &'static str,
        object: String,
    },
}

impl AcmError {
    /// Shorthand for a missing subject.
    pub(crate) fn no_subject(name: &str) -> Self {
        AcmError::NotFound { kind: "subject", name: name.to_string() }
    }

    /// Shorthand for a missing manuscript.
    pub(crate) fn no_object(name: &str) -> Self {
        AcmError::NotFound { kind: "manuscript", name: name.to_string() }
    }
}

/// Result type alias for capmat operations
pub type Result<T> = std::result::Result<T, AcmError>;
