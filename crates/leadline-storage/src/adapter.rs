// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the LeadStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use leadline_config::model::StorageConfig;
use leadline_core::types::{CampaignStats, Lead, NewLead};
use leadline_core::{AdapterType, HealthStatus, LeadStore, LeadlineError, PluginAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed lead store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`LeadStore::initialize`].
pub struct SqliteLeadStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteLeadStore {
    /// Create a new SqliteLeadStore with the given configuration.
    ///
    /// The database connection is not opened until [`LeadStore::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, LeadlineError> {
        self.db.get().ok_or_else(|| LeadlineError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteLeadStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadlineError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadlineError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl LeadStore for SqliteLeadStore {
    async fn initialize(&self) -> Result<(), LeadlineError> {
        let path = self.config.database_path.clone();
        let db = Database::open(&path).await?;
        self.db.set(db).map_err(|_| LeadlineError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite lead store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), LeadlineError> {
        self.db()?.close().await
    }

    async fn create_lead(&self, lead: &NewLead) -> Result<i64, LeadlineError> {
        queries::leads::insert_lead(self.db()?, lead).await
    }

    async fn fetch_lead(&self, id: i64) -> Result<Option<Lead>, LeadlineError> {
        queries::leads::get_lead(self.db()?, id).await
    }

    async fn fetch_all_leads(&self) -> Result<Vec<Lead>, LeadlineError> {
        queries::leads::list_leads(self.db()?).await
    }

    async fn fetch_leads_matching(&self, query: &str) -> Result<Vec<Lead>, LeadlineError> {
        queries::leads::search_leads(self.db()?, query).await
    }

    async fn mark_sent(&self, id: i64, slot: usize) -> Result<(), LeadlineError> {
        queries::leads::mark_sent(self.db()?, id, slot).await
    }

    async fn mark_replied(&self, id: i64, slot: usize) -> Result<(), LeadlineError> {
        queries::leads::mark_replied(self.db()?, id, slot).await
    }

    async fn campaign_stats(&self) -> Result<CampaignStats, LeadlineError> {
        queries::stats::campaign_stats(self.db()?).await
    }
}
