use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::extractors::Principal,
    error::ApiResult,
    state::AppState,
    stats::{
        summary::{full_summary, public_summary, FullSummary, PublicSummary},
        trends::{compute_trend, TrendRange, TrendSeries},
    },
    store::VulnerabilityFilter,
};

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub range: Option<String>,
}

#[instrument(skip(state))]
pub async fn full(
    State(state): State<AppState>,
    _principal: Principal,
) -> ApiResult<Json<FullSummary>> {
    let snapshot = state.vulns.list(VulnerabilityFilter::default()).await?;
    Ok(Json(full_summary(&snapshot)))
}

/// Landing-page numbers; deliberately unauthenticated.
#[instrument(skip(state))]
pub async fn public(State(state): State<AppState>) -> ApiResult<Json<PublicSummary>> {
    let snapshot = state.vulns.list(VulnerabilityFilter::default()).await?;
    Ok(Json(public_summary(&snapshot)))
}

#[instrument(skip(state))]
pub async fn trends(
    State(state): State<AppState>,
    _principal: Principal,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Json<TrendSeries>> {
    let range = TrendRange::parse(query.range.as_deref());
    let snapshot = state.vulns.list(VulnerabilityFilter::default()).await?;
    let created_at: Vec<OffsetDateTime> = snapshot.iter().map(|v| v.created_at).collect();
    Ok(Json(compute_trend(
        range,
        OffsetDateTime::now_utc(),
        &created_at,
    )))
}
