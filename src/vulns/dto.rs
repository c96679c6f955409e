use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateVulnerabilityRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub severity: String,
}

/// Partial update; absent fields are left as they are. Status changes
/// run through the status machine.
#[derive(Debug, Deserialize)]
pub struct UpdateVulnerabilityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub severity: Option<String>,
}
