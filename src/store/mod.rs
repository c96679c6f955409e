use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::policy::Role,
    vulns::model::{Severity, Status, Vulnerability},
};

pub mod memory;

pub use memory::{InMemoryUserStore, InMemoryVulnerabilityStore};

/// Identity record. The password hash never serializes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Credential store seam. Email lookups expect an already-normalized
/// (trimmed, lowercased) address.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stores the record unless the email is already held by another
    /// user; returns whether it was stored. The uniqueness decision and
    /// the write happen atomically.
    async fn insert(&self, user: User) -> anyhow::Result<bool>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    /// Replaces the record with the same id.
    async fn update(&self, user: User) -> anyhow::Result<()>;
    /// All users, newest first.
    async fn list(&self) -> anyhow::Result<Vec<User>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct VulnerabilityFilter {
    pub status: Option<Status>,
    pub severity: Option<Severity>,
}

/// Report store seam. `list` with a default filter doubles as the
/// consistent snapshot the aggregators read from.
#[async_trait]
pub trait VulnerabilityStore: Send + Sync {
    async fn insert(&self, vuln: Vulnerability) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Vulnerability>>;
    async fn update(&self, vuln: Vulnerability) -> anyhow::Result<()>;
    /// Returns whether a record was actually removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Matching reports, newest first.
    async fn list(&self, filter: VulnerabilityFilter) -> anyhow::Result<Vec<Vulnerability>>;
}
