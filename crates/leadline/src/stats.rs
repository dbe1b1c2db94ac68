// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadline stats` command implementation.
//!
//! Opens the local database directly and prints aggregate campaign
//! numbers. Falls back to plain output when stdout is not a TTY.

use std::io::IsTerminal;

use leadline_config::model::LeadlineConfig;
use leadline_core::types::CampaignStats;
use leadline_core::{LeadStore, LeadlineError, PluginAdapter, SLOT_COUNT};
use leadline_storage::SqliteLeadStore;
use serde::Serialize;

/// Structured stats output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatsOutput {
    pub total_leads: i64,
    pub sent_outreach: i64,
    pub sent_follow_ups: i64,
    pub replied_outreach: i64,
    pub replied_follow_ups: i64,
    pub sent_per_slot: Vec<i64>,
    pub replied_per_slot: Vec<i64>,
}

impl From<&CampaignStats> for StatsOutput {
    fn from(stats: &CampaignStats) -> Self {
        Self {
            total_leads: stats.total_leads,
            sent_outreach: stats.sent_outreach(),
            sent_follow_ups: stats.sent_follow_ups(),
            replied_outreach: stats.replied_outreach(),
            replied_follow_ups: stats.replied_follow_ups(),
            sent_per_slot: stats.sent.to_vec(),
            replied_per_slot: stats.replied.to_vec(),
        }
    }
}

/// Run the `leadline stats` command.
///
/// Reads aggregates from the configured database. If `--json` is passed,
/// outputs structured JSON for scripting. If `--plain` is passed or
/// stdout is not a TTY, disables colors.
pub async fn run_stats(
    config: &LeadlineConfig,
    json: bool,
    plain: bool,
) -> Result<(), LeadlineError> {
    let store = SqliteLeadStore::new(config.storage.clone());
    store.initialize().await?;
    let stats = store.campaign_stats().await;
    store.shutdown().await?;
    let stats = stats?;

    if json {
        let output = StatsOutput::from(&stats);
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_stats(&stats, use_color);
    }

    Ok(())
}

/// Print the campaign report with optional colors.
fn print_stats(stats: &CampaignStats, use_color: bool) {
    println!();
    println!("  leadline campaign stats");
    println!("  {}", "-".repeat(35));
    println!("    Leads:           {}", stats.total_leads);

    if use_color {
        use colored::Colorize;
        println!(
            "    Outreach:        {} sent, {} replied",
            stats.sent_outreach().to_string().green(),
            stats.replied_outreach().to_string().cyan()
        );
        println!(
            "    Follow-ups:      {} sent, {} replied",
            stats.sent_follow_ups().to_string().green(),
            stats.replied_follow_ups().to_string().cyan()
        );
    } else {
        println!(
            "    Outreach:        {} sent, {} replied",
            stats.sent_outreach(),
            stats.replied_outreach()
        );
        println!(
            "    Follow-ups:      {} sent, {} replied",
            stats.sent_follow_ups(),
            stats.replied_follow_ups()
        );
    }

    println!();
    for slot in 0..SLOT_COUNT {
        println!(
            "    {:<16} {} sent, {} replied",
            slot_name(slot),
            stats.sent[slot],
            stats.replied[slot]
        );
    }
    println!();
}

fn slot_name(slot: usize) -> String {
    if slot == 0 {
        "Initial Outreach".to_string()
    } else {
        format!("Follow-up {slot}")
    }
}
