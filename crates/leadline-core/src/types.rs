// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Leadline workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Number of message slots in the fixed outreach sequence.
///
/// Slot 0 is the initial outreach; slots 1..=6 are follow-ups 1..6.
pub const SLOT_COUNT: usize = 7;

/// One position in a lead's message sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSlot {
    /// Composed message body. `None` means nothing has been written for
    /// this slot yet, which the resolver skips silently.
    pub body: Option<String>,
    /// Whether the message was marked sent by the operator.
    pub sent: bool,
    /// Whether the contact replied to this message.
    pub replied: bool,
}

/// One outreach target with its full sequence state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub url: Option<String>,
    pub raw_html: Option<String>,
    pub extracted_text: Option<String>,
    pub telegram: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Fixed sequence of message slots, ordered 0..=6.
    pub slots: [MessageSlot; SLOT_COUNT],
    pub free_demo: bool,
    pub meeting: bool,
    pub money_in: bool,
    pub created_at: Option<DateTime<Utc>>,
    /// Timestamp of the most recent sent/replied mutation. `None` until the
    /// lead is touched for the first time; doubles as the cool-down anchor.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Lead {
    /// Human identifier used in mutation confirmations: email, else
    /// website, else `Lead {id}`.
    pub fn display_name(&self) -> String {
        self.email
            .clone()
            .or_else(|| self.website.clone())
            .unwrap_or_else(|| format!("Lead {}", self.id))
    }
}

/// Payload for creating a lead. Leads are produced by an external
/// enrichment process; the tracker never composes its own messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewLead {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub raw_html: Option<String>,
    #[serde(default)]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Pre-written message bodies per slot; missing entries stay uncomposed.
    #[serde(default)]
    pub messages: [Option<String>; SLOT_COUNT],
    #[serde(default)]
    pub free_demo: bool,
    #[serde(default)]
    pub meeting: bool,
    #[serde(default)]
    pub money_in: bool,
}

/// Aggregate send/reply counts across all leads, indexed by slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub total_leads: i64,
    pub sent: [i64; SLOT_COUNT],
    pub replied: [i64; SLOT_COUNT],
}

impl CampaignStats {
    /// Initial outreach messages marked sent.
    pub fn sent_outreach(&self) -> i64 {
        self.sent[0]
    }

    /// Follow-up messages marked sent, summed over slots 1..=6.
    pub fn sent_follow_ups(&self) -> i64 {
        self.sent[1..].iter().sum()
    }

    /// Initial outreach messages that got a reply.
    pub fn replied_outreach(&self) -> i64 {
        self.replied[0]
    }

    /// Follow-up messages that got a reply, summed over slots 1..=6.
    pub fn replied_follow_ups(&self) -> i64 {
        self.replied[1..].iter().sum()
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind the plugin base trait.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Gateway,
}
