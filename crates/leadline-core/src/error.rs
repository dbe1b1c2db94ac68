// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Leadline outreach tracker.

use thiserror::Error;

/// The primary error type used across all Leadline adapter traits and core operations.
#[derive(Debug, Error)]
pub enum LeadlineError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Gateway errors (bind failure, request handling, serving).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No lead exists with the requested id.
    #[error("lead not found: {id}")]
    LeadNotFound { id: i64 },

    /// A message slot index outside 0..=6 was requested.
    #[error("slot {slot} out of range (sequence has {max} slots)")]
    SlotOutOfRange { slot: usize, max: usize },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
