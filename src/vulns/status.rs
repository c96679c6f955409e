use time::OffsetDateTime;
use tracing::info;

use crate::{
    auth::{extractors::Principal, policy},
    error::{ApiError, ApiResult},
    vulns::model::{Status, Vulnerability},
};

/// Applies a status change to a report. The lifecycle is full-mesh:
/// every status is reachable from every other. Re-applying the current
/// status is a permitted no-op and leaves `updated_at` untouched.
///
/// Returns whether the record actually changed.
pub fn apply_status(
    principal: &Principal,
    vuln: &mut Vulnerability,
    new_status: Status,
    now: OffsetDateTime,
) -> ApiResult<bool> {
    if !policy::can_edit(principal, vuln) {
        return Err(ApiError::Forbidden("You cannot edit this vulnerability"));
    }
    if vuln.status == new_status {
        return Ok(false);
    }

    info!(
        vulnerability = %vuln.id,
        from = %vuln.status.as_str(),
        to = %new_status.as_str(),
        "status changed"
    );
    vuln.status = new_status;
    vuln.updated_at = now;
    Ok(true)
}
