// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for trestle-core.
//!
//! Provides a unified error type that the routing layer maps to transport
//! responses via [`CoreError::error_code`].

use std::fmt;

/// Result type using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur during request processing.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum CoreError {
    /// Table was not found in the store.
    TableNotFound {
        /// The table ID that was not found.
        table_id: String,
    },

    /// Input validation failed.
    ValidationError {
        /// The field that failed validation.
        field: String,
        /// The validation error message.
        message: String,
    },

    /// Store operation failed.
    StoreUnavailable {
        /// The operation that failed.
        operation: String,
        /// Error details.
        details: String,
    },
}

impl CoreError {
    /// Get the error code string for this error type.
    ///
    /// The routing layer uses these codes to choose transport status codes.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TableNotFound { .. } => "TABLE_NOT_FOUND",
            Self::ValidationError { .. } => "VALIDATION_ERROR",
            Self::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableNotFound { table_id } => {
                write!(f, "Table '{}' not found", table_id)
            }
            Self::ValidationError { field, message } => {
                write!(f, "Validation error for '{}': {}", field, message)
            }
            Self::StoreUnavailable { operation, details } => {
                write!(f, "Store error during '{}': {}", operation, details)
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        CoreError::StoreUnavailable {
            operation: "query".to_string(),
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::StoreUnavailable {
            operation: "json".to_string(),
            details: err.to_string(),
        }
    }
}
