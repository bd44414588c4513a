// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Error types for `libdd-log-sample`.

use crate::Category;
use thiserror::Error;

/// Errors reported while reading from, encoding or decoding a sample.
/// Adding values to a sample never fails.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The requested key does not exist in the category, or the category has
    /// not been created yet.
    #[error("invalid key: {key} with category: {category}")]
    InvalidKey {
        /// The key that was looked up.
        key: String,
        /// The category it was looked up in.
        category: Category,
    },

    /// A decoded value is present but cannot be represented as the
    /// category's type.
    #[error("invalid value for key: {key} with category: {category}: {reason}")]
    InvalidValue {
        /// The key holding the value.
        key: String,
        /// The category the value was found in.
        category: Category,
        /// Why the conversion failed.
        reason: String,
    },

    /// The decoded document does not have the shape of a sample.
    #[error("malformed sample document: {0}")]
    MalformedDocument(String),

    /// The JSON encoder or decoder failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the encoded sample failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SampleError {
    pub(crate) fn invalid_key(key: impl Into<String>, category: Category) -> Self {
        SampleError::InvalidKey {
            key: key.into(),
            category,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = SampleError> = std::result::Result<T, E>;
