// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead store trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::LeadlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CampaignStats, Lead, NewLead};

/// Adapter for the lead persistence backend.
///
/// The store owns one record per lead and applies sent/replied mutations
/// as single atomic row updates so two racing operators cannot lose
/// writes. The resolver itself never talks to the store; callers fetch a
/// snapshot, resolve, and persist the outcome through these methods.
#[async_trait]
pub trait LeadStore: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), LeadlineError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), LeadlineError>;

    /// Inserts a new lead and returns its assigned id.
    async fn create_lead(&self, lead: &NewLead) -> Result<i64, LeadlineError>;

    /// Fetches one lead by id, or `None` when no such lead exists.
    async fn fetch_lead(&self, id: i64) -> Result<Option<Lead>, LeadlineError>;

    /// Fetches every lead, ordered by id.
    async fn fetch_all_leads(&self) -> Result<Vec<Lead>, LeadlineError>;

    /// Case-insensitive substring search over email, website, and
    /// telegram, plus exact id match when `query` is numeric.
    async fn fetch_leads_matching(&self, query: &str) -> Result<Vec<Lead>, LeadlineError>;

    /// Marks `slot` as sent and refreshes `updated_at`. Idempotent.
    async fn mark_sent(&self, id: i64, slot: usize) -> Result<(), LeadlineError>;

    /// Marks `slot` as replied and refreshes `updated_at`. Idempotent.
    async fn mark_replied(&self, id: i64, slot: usize) -> Result<(), LeadlineError>;

    /// Aggregate sent/replied counts per slot across all leads.
    async fn campaign_stats(&self) -> Result<CampaignStats, LeadlineError>;
}
