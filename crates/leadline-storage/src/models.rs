// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types and row-mapping helpers for storage entities.
//!
//! The canonical types are defined in `leadline-core::types` for use across
//! adapter trait boundaries. This module re-exports them and holds the
//! SQLite row <-> `Lead` conversion shared by the query modules.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

pub use leadline_core::types::{CampaignStats, Lead, MessageSlot, NewLead, SLOT_COUNT};

/// Column list shared by every SELECT that maps into a [`Lead`].
///
/// Order is load-bearing: [`lead_from_row`] reads by index.
pub(crate) const LEAD_COLUMNS: &str = "id, url, raw_html, extracted_text, telegram, email, website, \
     msg0_body, msg0_sent, msg0_replied, \
     msg1_body, msg1_sent, msg1_replied, \
     msg2_body, msg2_sent, msg2_replied, \
     msg3_body, msg3_sent, msg3_replied, \
     msg4_body, msg4_sent, msg4_replied, \
     msg5_body, msg5_sent, msg5_replied, \
     msg6_body, msg6_sent, msg6_replied, \
     free_demo, meeting, money_in, created_at, updated_at";

/// Format a timestamp the way SQLite's `strftime('%Y-%m-%dT%H:%M:%fZ','now')`
/// does, so stored values stay uniform regardless of which side wrote them.
pub(crate) fn format_ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_ts(idx: usize, s: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Map a row selected with [`LEAD_COLUMNS`] into a [`Lead`].
pub(crate) fn lead_from_row(row: &rusqlite::Row<'_>) -> Result<Lead, rusqlite::Error> {
    let mut slots: [MessageSlot; SLOT_COUNT] = Default::default();
    for (i, slot) in slots.iter_mut().enumerate() {
        let base = 7 + i * 3;
        slot.body = row.get(base)?;
        slot.sent = row.get(base + 1)?;
        slot.replied = row.get(base + 2)?;
    }

    let created_at: String = row.get(31)?;
    let updated_at: Option<String> = row.get(32)?;

    Ok(Lead {
        id: row.get(0)?,
        url: row.get(1)?,
        raw_html: row.get(2)?,
        extracted_text: row.get(3)?,
        telegram: row.get(4)?,
        email: row.get(5)?,
        website: row.get(6)?,
        slots,
        free_demo: row.get(28)?,
        meeting: row.get(29)?,
        money_in: row.get(30)?,
        created_at: Some(parse_ts(31, &created_at)?),
        updated_at: match updated_at {
            Some(s) => Some(parse_ts(32, &s)?),
            None => None,
        },
    })
}
