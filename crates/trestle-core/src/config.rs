// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

use chrono::Duration;

use crate::lifecycle::DEFAULT_ACTIVE_WINDOW_HOURS;

/// Trestle Core configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL for the bundled store backend
    pub database_url: String,
    /// Hours a table stays `active` after its start time
    pub active_window_hours: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `TRESTLE_DATABASE_URL`: SQLite connection string
    ///
    /// Optional (with defaults):
    /// - `TRESTLE_ACTIVE_WINDOW_HOURS`: post-start active window (default: 6)
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("TRESTLE_DATABASE_URL")
            .map_err(|_| ConfigError::Missing("TRESTLE_DATABASE_URL"))?;

        let active_window_hours: i64 = std::env::var("TRESTLE_ACTIVE_WINDOW_HOURS")
            .unwrap_or_else(|_| DEFAULT_ACTIVE_WINDOW_HOURS.to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("TRESTLE_ACTIVE_WINDOW_HOURS", "must be a positive integer")
            })?;

        if active_window_hours <= 0 {
            return Err(ConfigError::Invalid(
                "TRESTLE_ACTIVE_WINDOW_HOURS",
                "must be a positive integer",
            ));
        }

        Ok(Self {
            database_url,
            active_window_hours,
        })
    }

    /// The active window as a signed duration, ready for the derivation rule.
    pub fn active_window(&self) -> Duration {
        Duration::hours(self.active_window_hours)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
