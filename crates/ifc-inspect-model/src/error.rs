// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types reported by collaborator services

use crate::ElementId;
use thiserror::Error;

/// Result type alias for collaborator operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors a [`ModelService`](crate::ModelService) can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The file could not be turned into a model
    #[error("Failed to load model: {0}")]
    Load(String),

    /// A per-element query failed
    #[error("Query failed for element {element}: {message}")]
    Query { element: ElementId, message: String },

    /// The element universe of a model could not be enumerated
    #[error("Failed to enumerate elements: {0}")]
    Enumerate(String),

    /// A filtered render subset could not be created
    #[error("Subset creation failed: {0}")]
    Subset(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl ServiceError {
    /// Create a new load error
    pub fn load(msg: impl Into<String>) -> Self {
        ServiceError::Load(msg.into())
    }

    /// Create a new per-element query error
    pub fn query(element: ElementId, msg: impl Into<String>) -> Self {
        ServiceError::Query {
            element,
            message: msg.into(),
        }
    }

    /// Create a new enumeration error
    pub fn enumerate(msg: impl Into<String>) -> Self {
        ServiceError::Enumerate(msg.into())
    }

    /// Create a new subset error
    pub fn subset(msg: impl Into<String>) -> Self {
        ServiceError::Subset(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        ServiceError::Other(msg.into())
    }
}
