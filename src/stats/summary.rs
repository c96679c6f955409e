use serde::Serialize;

use crate::vulns::model::{Severity, Status, Vulnerability};

/// Reduced summary for the landing page; served without authentication.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSummary {
    pub total: usize,
    pub open_count: usize,
    pub resolved_count: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
}

/// Full dashboard breakdown; every enumerated status and severity is
/// present, with zero counts where nothing matches.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSummary {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub by_severity: Vec<SeverityCount>,
}

pub fn public_summary(vulns: &[Vulnerability]) -> PublicSummary {
    let by_status = |status: Status| vulns.iter().filter(|v| v.status == status).count();
    PublicSummary {
        total: vulns.len(),
        open_count: by_status(Status::Open),
        resolved_count: by_status(Status::Fixed) + by_status(Status::Closed),
    }
}

pub fn full_summary(vulns: &[Vulnerability]) -> FullSummary {
    FullSummary {
        total: vulns.len(),
        by_status: Status::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: vulns.iter().filter(|v| v.status == status).count(),
            })
            .collect(),
        by_severity: Severity::ALL
            .into_iter()
            .map(|severity| SeverityCount {
                severity,
                count: vulns.iter().filter(|v| v.severity == severity).count(),
            })
            .collect(),
    }
}
