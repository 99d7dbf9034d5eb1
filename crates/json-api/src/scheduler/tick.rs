//! Scheduler Tick Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use pricedrop_app::domain::scheduler::{TickScope, TickSummary};

use crate::{extensions::*, state::State};

/// Tick Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TickResponse {
    /// Sales activated by this tick
    pub started: usize,

    /// Sales completed by this tick
    pub ended: usize,

    /// Titles of the shop's sales that were due to start
    pub sales_to_start: Vec<String>,

    /// Titles of the shop's sales that were due to end
    pub sales_to_end: Vec<String>,

    /// Titles of the shop's pending sales whose window passed without starting
    pub sales_missed: Vec<String>,
}

impl From<TickSummary> for TickResponse {
    fn from(summary: TickSummary) -> Self {
        Self {
            started: summary.started,
            ended: summary.ended,
            sales_to_start: summary.sales_to_start,
            sales_to_end: summary.sales_to_end,
            sales_missed: summary.sales_missed,
        }
    }
}

/// Scheduler Tick Handler
///
/// Starts the authenticated shop's due sales and ends every sale whose window has closed.
/// Safe to call repeatedly; sales already moved by an earlier tick are left alone.
#[endpoint(
    tags("scheduler"),
    summary = "Run Scheduler Tick",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Tick completed"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<TickResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let shop = depot.shop_uuid_or_401()?;

    let summary = state
        .app
        .scheduler
        .tick(TickScope::Shop(shop), Timestamp::now())
        .await
        .or_500("scheduler tick failed")?;

    Ok(Json(summary.into()))
}
