// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! The dashboard, search, detail, and stats handlers are read paths that
//! re-resolve every lead from its stored snapshot; mark-sent and
//! mark-replied are the only mutations.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use leadline_core::sequence::{
    NextStep, hours_until_eligible, is_eligible_at, next_eligible_at, resolve_current,
};
use leadline_core::types::{Lead, NewLead};
use leadline_core::LeadlineError;

use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// One lead whose next message is ready to send now.
#[derive(Debug, Serialize)]
pub struct ReadyLead {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub slot: usize,
    pub message: String,
}

/// One lead with a pending message still inside the cool-down window.
#[derive(Debug, Serialize)]
pub struct WaitingLead {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub slot: usize,
    /// Whole hours until eligible, rounded up.
    pub hours_left: i64,
}

/// Response body for GET /v1/dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub ready: Vec<ReadyLead>,
    pub waiting: Vec<WaitingLead>,
}

/// Compact lead representation for listings.
#[derive(Debug, Serialize)]
pub struct LeadSummary {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub telegram: Option<String>,
}

/// Response body for GET /v1/leads.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<LeadSummary>,
}

/// Query parameters for GET /v1/leads.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Response body for POST /v1/leads.
#[derive(Debug, Serialize)]
pub struct CreateLeadResponse {
    pub id: i64,
}

/// The currently resolved step for a lead.
#[derive(Debug, Serialize)]
pub struct CurrentStep {
    pub label: String,
    pub slot: usize,
    pub message: Option<String>,
}

/// One composed slot in a lead's message history.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub label: String,
    pub slot: usize,
    pub body: String,
    pub sent: bool,
    pub replied: bool,
}

/// Response body for GET /v1/leads/{id}.
#[derive(Debug, Serialize)]
pub struct LeadDetailResponse {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub telegram: Option<String>,
    pub free_demo: bool,
    pub meeting: bool,
    pub money_in: bool,
    pub current: CurrentStep,
    pub ready: bool,
    /// RFC 3339 timestamp at which the next message becomes eligible.
    pub next_eligible_at: String,
    pub history: Vec<HistoryEntry>,
}

/// Response body for the mark-sent / mark-replied mutations.
#[derive(Debug, Serialize)]
pub struct MarkResponse {
    pub id: i64,
    pub slot: usize,
    pub action: String,
    pub detail: String,
}

/// Response body for GET /v1/stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_leads: i64,
    pub sent_outreach: i64,
    pub sent_follow_ups: i64,
    pub replied_outreach: i64,
    pub replied_follow_ups: i64,
    pub sent_per_slot: Vec<i64>,
    pub replied_per_slot: Vec<i64>,
}

/// Human label for a slot independent of sequence state.
fn slot_label(slot: usize) -> String {
    if slot == 0 {
        "Initial Outreach".to_string()
    } else {
        format!("Follow-up {slot}")
    }
}

/// Map a core error onto a JSON error response with a fitting status code.
fn error_response(err: LeadlineError) -> Response {
    let status = match &err {
        LeadlineError::LeadNotFound { .. } => StatusCode::NOT_FOUND,
        LeadlineError::SlotOutOfRange { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn not_found(id: i64) -> Response {
    error_response(LeadlineError::LeadNotFound { id })
}

fn summarize(lead: &Lead) -> LeadSummary {
    LeadSummary {
        id: lead.id,
        name: lead.display_name(),
        email: lead.email.clone(),
        website: lead.website.clone(),
        telegram: lead.telegram.clone(),
    }
}

/// GET /health
///
/// Unauthenticated liveness endpoint for systemd and monitoring.
pub async fn get_public_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /v1/dashboard
///
/// Every lead with a pending resolved message, partitioned into `ready`
/// (cool-down elapsed) and `waiting` (hours remaining).
pub async fn get_dashboard(State(state): State<GatewayState>) -> Response {
    let leads = match state.store.fetch_all_leads().await {
        Ok(leads) => leads,
        Err(e) => return error_response(e),
    };

    let now = Utc::now();
    let mut ready = Vec::new();
    let mut waiting = Vec::new();

    for lead in &leads {
        let step = resolve_current(lead);
        let NextStep::Send { slot, body } = step else {
            continue;
        };
        let label = slot_label(slot);
        if is_eligible_at(lead, now) {
            ready.push(ReadyLead {
                id: lead.id,
                name: lead.display_name(),
                label,
                slot,
                message: body,
            });
        } else {
            waiting.push(WaitingLead {
                id: lead.id,
                name: lead.display_name(),
                label,
                slot,
                hours_left: hours_until_eligible(lead, now),
            });
        }
    }

    Json(DashboardResponse { ready, waiting }).into_response()
}

/// GET /v1/leads?q=
///
/// Search across email, website, telegram, and id. An empty query returns
/// no results rather than the whole table.
pub async fn get_leads(
    State(state): State<GatewayState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Json(SearchResponse {
            query,
            results: Vec::new(),
        })
        .into_response();
    }

    match state.store.fetch_leads_matching(&query).await {
        Ok(leads) => Json(SearchResponse {
            query,
            results: leads.iter().map(summarize).collect(),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /v1/leads
///
/// Entry point for the external enrichment process that produces leads.
pub async fn post_leads(
    State(state): State<GatewayState>,
    Json(body): Json<NewLead>,
) -> Response {
    match state.store.create_lead(&body).await {
        Ok(id) => {
            tracing::info!(id, "lead created");
            (StatusCode::CREATED, Json(CreateLeadResponse { id })).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /v1/leads/{id}
///
/// Full detail view: profile, currently resolved step, eligibility, and
/// the per-slot message history (composed slots only).
pub async fn get_lead_detail(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Response {
    let lead = match state.store.fetch_lead(id).await {
        Ok(Some(lead)) => lead,
        Ok(None) => return not_found(id),
        Err(e) => return error_response(e),
    };

    let now = Utc::now();
    let step = resolve_current(&lead);

    let history = lead
        .slots
        .iter()
        .enumerate()
        .filter_map(|(slot, msg)| {
            msg.body.as_ref().map(|body| HistoryEntry {
                label: slot_label(slot),
                slot,
                body: body.clone(),
                sent: msg.sent,
                replied: msg.replied,
            })
        })
        .collect();

    Json(LeadDetailResponse {
        id: lead.id,
        name: lead.display_name(),
        url: lead.url.clone(),
        email: lead.email.clone(),
        website: lead.website.clone(),
        telegram: lead.telegram.clone(),
        free_demo: lead.free_demo,
        meeting: lead.meeting,
        money_in: lead.money_in,
        current: CurrentStep {
            label: step.label(),
            slot: step.slot(),
            message: step.body().map(str::to_string),
        },
        ready: is_eligible_at(&lead, now),
        next_eligible_at: next_eligible_at(&lead, now)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        history,
    })
    .into_response()
}

/// POST /v1/leads/{id}/slots/{slot}/sent
pub async fn post_mark_sent(
    State(state): State<GatewayState>,
    Path((id, slot)): Path<(i64, usize)>,
) -> Response {
    mark(state, id, slot, Action::Sent).await
}

/// POST /v1/leads/{id}/slots/{slot}/replied
pub async fn post_mark_replied(
    State(state): State<GatewayState>,
    Path((id, slot)): Path<(i64, usize)>,
) -> Response {
    mark(state, id, slot, Action::Replied).await
}

enum Action {
    Sent,
    Replied,
}

impl Action {
    fn as_str(&self) -> &'static str {
        match self {
            Action::Sent => "sent",
            Action::Replied => "replied",
        }
    }
}

async fn mark(state: GatewayState, id: i64, slot: usize, action: Action) -> Response {
    // Fetch first so the confirmation can name the lead; also turns an
    // unknown id into a clean 404 before any mutation attempt.
    let lead = match state.store.fetch_lead(id).await {
        Ok(Some(lead)) => lead,
        Ok(None) => return not_found(id),
        Err(e) => return error_response(e),
    };

    let result = match action {
        Action::Sent => state.store.mark_sent(id, slot).await,
        Action::Replied => state.store.mark_replied(id, slot).await,
    };
    if let Err(e) = result {
        return error_response(e);
    }

    tracing::info!(id, slot, action = action.as_str(), "lead updated");
    Json(MarkResponse {
        id,
        slot,
        action: action.as_str().to_string(),
        detail: format!(
            "Message marked as {} for {}",
            action.as_str(),
            lead.display_name()
        ),
    })
    .into_response()
}

/// GET /v1/stats
pub async fn get_stats(State(state): State<GatewayState>) -> Response {
    match state.store.campaign_stats().await {
        Ok(stats) => Json(StatsResponse {
            total_leads: stats.total_leads,
            sent_outreach: stats.sent_outreach(),
            sent_follow_ups: stats.sent_follow_ups(),
            replied_outreach: stats.replied_outreach(),
            replied_follow_ups: stats.replied_follow_ups(),
            sent_per_slot: stats.sent.to_vec(),
            replied_per_slot: stats.replied.to_vec(),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}
