// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead CRUD operations.
//!
//! `mark_sent` and `mark_replied` are single-row UPDATEs so a racing pair
//! of operators cannot leave a lead half-mutated; both refresh
//! `updated_at`, which is the cool-down anchor the resolver reads.

use chrono::Utc;
use leadline_core::LeadlineError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{Lead, NewLead, SLOT_COUNT, format_ts, lead_from_row, LEAD_COLUMNS};

/// Insert a new lead and return its assigned id.
pub async fn insert_lead(db: &Database, lead: &NewLead) -> Result<i64, LeadlineError> {
    let lead = lead.clone();
    let created_at = format_ts(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO leads (url, raw_html, extracted_text, telegram, email, website,
                                    msg0_body, msg1_body, msg2_body, msg3_body,
                                    msg4_body, msg5_body, msg6_body,
                                    free_demo, meeting, money_in, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                params![
                    lead.url,
                    lead.raw_html,
                    lead.extracted_text,
                    lead.telegram,
                    lead.email,
                    lead.website,
                    lead.messages[0],
                    lead.messages[1],
                    lead.messages[2],
                    lead.messages[3],
                    lead.messages[4],
                    lead.messages[5],
                    lead.messages[6],
                    lead.free_demo,
                    lead.meeting,
                    lead.money_in,
                    created_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a lead by id.
pub async fn get_lead(db: &Database, id: i64) -> Result<Option<Lead>, LeadlineError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], lead_from_row);
            match result {
                Ok(lead) => Ok(Some(lead)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List every lead, ordered by id.
pub async fn list_leads(db: &Database) -> Result<Vec<Lead>, LeadlineError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map([], lead_from_row)?;
            let mut leads = Vec::new();
            for row in rows {
                leads.push(row?);
            }
            Ok(leads)
        })
        .await
        .map_err(map_tr_err)
}

/// Case-insensitive substring search over email, website, and telegram,
/// plus exact id match when the query parses as an integer.
pub async fn search_leads(db: &Database, query: &str) -> Result<Vec<Lead>, LeadlineError> {
    let pattern = format!("%{}%", query.trim());
    let id_match: i64 = query.trim().parse().unwrap_or(-1);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads
                 WHERE email LIKE ?1 OR website LIKE ?1 OR telegram LIKE ?1 OR id = ?2
                 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(params![pattern, id_match], lead_from_row)?;
            let mut leads = Vec::new();
            for row in rows {
                leads.push(row?);
            }
            Ok(leads)
        })
        .await
        .map_err(map_tr_err)
}

/// Mark `slot` as sent and refresh `updated_at`. Idempotent apart from
/// the timestamp.
pub async fn mark_sent(db: &Database, id: i64, slot: usize) -> Result<(), LeadlineError> {
    set_slot_flag(db, id, slot, "sent").await
}

/// Mark `slot` as replied and refresh `updated_at`. Like `mark_sent`,
/// this touches the cool-down anchor even though nothing went out.
pub async fn mark_replied(db: &Database, id: i64, slot: usize) -> Result<(), LeadlineError> {
    set_slot_flag(db, id, slot, "replied").await
}

async fn set_slot_flag(
    db: &Database,
    id: i64,
    slot: usize,
    flag: &'static str,
) -> Result<(), LeadlineError> {
    if slot >= SLOT_COUNT {
        return Err(LeadlineError::SlotOutOfRange {
            slot,
            max: SLOT_COUNT,
        });
    }
    // Column name is built from a bounds-checked index, never user text.
    let sql = format!(
        "UPDATE leads SET msg{slot}_{flag} = 1,
                          updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
         WHERE id = ?1"
    );
    let affected = db
        .connection()
        .call(move |conn| Ok(conn.execute(&sql, params![id])?))
        .await
        .map_err(map_tr_err)?;
    if affected == 0 {
        return Err(LeadlineError::LeadNotFound { id });
    }
    Ok(())
}
