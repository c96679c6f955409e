use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{extractors::Principal, policy},
    error::{ApiError, ApiResult},
    state::AppState,
    store::VulnerabilityFilter,
    vulns::{
        dto::{CreateVulnerabilityRequest, ListQuery, UpdateVulnerabilityRequest},
        model::{Severity, Status, Vulnerability},
        status,
    },
};

fn parse_severity(value: &str) -> ApiResult<Severity> {
    Severity::parse(value)
        .ok_or_else(|| ApiError::validation("Severity must be one of: low, medium, high, critical"))
}

fn parse_status(value: &str) -> ApiResult<Status> {
    Status::parse(value)
        .ok_or_else(|| ApiError::validation("Status must be one of: open, in_review, fixed, closed"))
}

#[instrument(skip(state))]
pub async fn list_vulnerabilities(
    State(state): State<AppState>,
    _principal: Principal,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Vulnerability>>> {
    let filter = VulnerabilityFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
        severity: query.severity.as_deref().map(parse_severity).transpose()?,
    };
    let vulns = state.vulns.list(filter).await?;
    Ok(Json(vulns))
}

#[instrument(skip(state, payload))]
pub async fn create_vulnerability(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateVulnerabilityRequest>,
) -> ApiResult<(StatusCode, Json<Vulnerability>)> {
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    let severity = parse_severity(&payload.severity)?;

    let now = OffsetDateTime::now_utc();
    let vuln = Vulnerability {
        id: Uuid::new_v4(),
        title,
        description: payload.description,
        category: payload.category,
        severity,
        status: Status::Open,
        created_by: principal.id,
        created_at: now,
        updated_at: now,
    };
    state.vulns.insert(vuln.clone()).await?;

    info!(vulnerability = %vuln.id, severity = %severity.as_str(), "vulnerability reported");
    Ok((StatusCode::CREATED, Json(vuln)))
}

#[instrument(skip(state))]
pub async fn get_vulnerability(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vulnerability>> {
    let vuln = state
        .vulns
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Vulnerability"))?;
    Ok(Json(vuln))
}

#[instrument(skip(state, payload))]
pub async fn update_vulnerability(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVulnerabilityRequest>,
) -> ApiResult<Json<Vulnerability>> {
    let mut vuln = state
        .vulns
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Vulnerability"))?;
    if !policy::can_edit(&principal, &vuln) {
        warn!(user_id = %principal.id, vulnerability = %vuln.id, "edit denied");
        return Err(ApiError::Forbidden("You cannot edit this vulnerability"));
    }

    let now = OffsetDateTime::now_utc();
    let mut changed = false;

    if let Some(title) = payload.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::validation("Title is required"));
        }
        vuln.title = title;
        changed = true;
    }
    if let Some(description) = payload.description {
        vuln.description = description;
        changed = true;
    }
    if let Some(category) = payload.category {
        vuln.category = category;
        changed = true;
    }
    if let Some(severity) = payload.severity.as_deref() {
        vuln.severity = parse_severity(severity)?;
        changed = true;
    }
    if changed {
        vuln.updated_at = now;
    }

    if let Some(value) = payload.status.as_deref() {
        let new_status = parse_status(value)?;
        status::apply_status(&principal, &mut vuln, new_status, now)?;
    }

    state.vulns.update(vuln.clone()).await?;
    Ok(Json(vuln))
}

#[instrument(skip(state))]
pub async fn delete_vulnerability(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !policy::can_delete(&principal) {
        warn!(user_id = %principal.id, vulnerability = %id, "delete denied");
        return Err(ApiError::Forbidden("You cannot delete vulnerabilities"));
    }
    if !state.vulns.delete(id).await? {
        return Err(ApiError::NotFound("Vulnerability"));
    }
    info!(vulnerability = %id, user_id = %principal.id, "vulnerability deleted");
    Ok(StatusCode::NO_CONTENT)
}
