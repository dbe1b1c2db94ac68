// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP JSON gateway for the Leadline outreach tracker.
//!
//! Exposes the dashboard, search, lead detail, mark-sent/mark-replied,
//! and stats surfaces over a bearer-guarded `/v1` API, plus an open
//! `/health` endpoint. The gateway never interprets sequence state
//! itself; it calls the core resolver over snapshots from the store.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};
