// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for viewer operations

use ifc_inspect_model::{ElementId, ServiceError};
use thiserror::Error;

/// Result type alias for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Errors surfaced by the viewer core
///
/// None of these are fatal: after any of them the viewer keeps accepting
/// input and can load a new file.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// The parsing service rejected the file
    #[error("Failed to load {file}: {source}")]
    LoadFailed {
        file: String,
        #[source]
        source: ServiceError,
    },

    /// Another load is still running
    #[error("A model load is already in progress")]
    LoadInProgress,

    /// The operation needs a loaded model
    #[error("No model loaded")]
    NoModelLoaded,

    /// Element categories could not be enumerated
    #[error("Category index unavailable: {0}")]
    IndexUnavailable(#[source] ServiceError),

    /// A filtered subset could not be materialized
    #[error("Filtered subset unavailable: {0}")]
    SubsetUnavailable(#[source] ServiceError),

    /// Attribute query failed after a successful pick
    #[error("Metadata fetch failed for {element}: {source}")]
    MetadataFetch {
        element: ElementId,
        #[source]
        source: ServiceError,
    },

    /// Toggle for a category the current model does not have
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Invalid settings or snapshot
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ViewerError {
    /// Create a new load error
    pub fn load_failed(file: impl Into<String>, source: ServiceError) -> Self {
        ViewerError::LoadFailed {
            file: file.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ViewerError::Config(msg.into())
    }
}
