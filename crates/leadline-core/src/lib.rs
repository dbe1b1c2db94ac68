// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Leadline outreach tracker.
//!
//! This crate provides the foundational error type, domain types, the
//! message-sequence resolver, and the store trait the persistence adapter
//! implements. The resolver is the only real decision-making in the
//! system; everything else in the workspace is plumbing around it.

pub mod error;
pub mod sequence;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LeadlineError;
pub use sequence::{NextStep, resolve_current};
pub use types::{AdapterType, CampaignStats, HealthStatus, Lead, MessageSlot, NewLead, SLOT_COUNT};

// Re-export adapter traits at crate root.
pub use traits::{LeadStore, PluginAdapter};
