// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign statistics aggregation.

use leadline_core::LeadlineError;

use crate::database::{Database, map_tr_err};
use crate::models::{CampaignStats, SLOT_COUNT};

/// Aggregate sent/replied counts per slot across all leads in one query.
pub async fn campaign_stats(db: &Database) -> Result<CampaignStats, LeadlineError> {
    let mut select = String::from("SELECT COUNT(*)");
    for slot in 0..SLOT_COUNT {
        select.push_str(&format!(
            ", COALESCE(SUM(msg{slot}_sent), 0), COALESCE(SUM(msg{slot}_replied), 0)"
        ));
    }
    select.push_str(" FROM leads");

    db.connection()
        .call(move |conn| {
            let stats = conn.query_row(&select, [], |row| {
                let mut stats = CampaignStats {
                    total_leads: row.get(0)?,
                    ..Default::default()
                };
                for slot in 0..SLOT_COUNT {
                    stats.sent[slot] = row.get(1 + slot * 2)?;
                    stats.replied[slot] = row.get(2 + slot * 2)?;
                }
                Ok(stats)
            })?;
            Ok(stats)
        })
        .await
        .map_err(map_tr_err)
}
