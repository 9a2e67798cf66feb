//! Error types for the datastore contract
//!
//! Only two failures originate in the core: a request rejected by its rule
//! and a hook the backend never overrode. Anything a backend raises travels
//! through `Backend` untouched.

use std::fmt;
use thiserror::Error;
use serde::{Serialize, Deserialize};

use crate::core::operation::Operation;

/// A single rule violation found while checking a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    /// Dotted path of the offending field (`value` for the request itself)
    pub path: String,
    /// Human readable description of the violation
    pub message: String,
}

impl ValidationDetail {
    /// Violation of the field at `path`
    pub fn new<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        ValidationDetail {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A request did not match the rule of its operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Operation whose rule was applied
    pub operation: Option<Operation>,
    /// Every violation found, in field order
    pub details: Vec<ValidationDetail>,
}

impl ValidationError {
    /// Error listing `details` for the rule of `operation`
    pub fn new(operation: Option<Operation>, details: Vec<ValidationDetail>) -> Self {
        ValidationError { operation, details }
    }

    /// Build an error carrying a single violation
    pub fn single<P: Into<String>, M: Into<String>>(
        operation: Option<Operation>,
        path: P,
        message: M,
    ) -> Self {
        ValidationError::new(operation, vec![ValidationDetail::new(path, message)])
    }

    /// Whether any violation points at `path`
    pub fn mentions(&self, path: &str) -> bool {
        self.details.iter().any(|d| d.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.details.is_empty() {
            return write!(f, "validation failed");
        }
        let messages: Vec<&str> = self.details.iter().map(|d| d.message.as_str()).collect();
        write!(f, "{}", messages.join(". "))
    }
}

impl std::error::Error for ValidationError {}

/// Errors that can occur when calling a datastore operation
#[derive(Error, Debug)]
pub enum DatastoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not implemented")]
    NotImplemented { operation: Operation },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Failure raised by a backend hook, passed through as is
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl DatastoreError {
    /// Whether the request was rejected by its rule
    pub fn is_validation(&self) -> bool {
        matches!(self, DatastoreError::Validation(_))
    }

    /// Whether the backend left the hook unimplemented
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, DatastoreError::NotImplemented { .. })
    }

    /// The rule violations, if this is a validation failure
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            DatastoreError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for datastore operations
pub type Result<T> = std::result::Result<T, DatastoreError>;
