use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{User, UserStore, VulnerabilityFilter, VulnerabilityStore};
use crate::vulns::model::Vulnerability;

/// Default store wiring: a map behind an async lock. Reads take a
/// shared lock, so one `list` call sees a consistent snapshot.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> anyhow::Result<bool> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Ok(false);
        }
        users.insert(user.id, user);
        Ok(true)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user: User) -> anyhow::Result<()> {
        self.users.write().await.insert(user.id, user);
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }
}

#[derive(Default)]
pub struct InMemoryVulnerabilityStore {
    vulns: RwLock<HashMap<Uuid, Vulnerability>>,
}

#[async_trait]
impl VulnerabilityStore for InMemoryVulnerabilityStore {
    async fn insert(&self, vuln: Vulnerability) -> anyhow::Result<()> {
        self.vulns.write().await.insert(vuln.id, vuln);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Vulnerability>> {
        Ok(self.vulns.read().await.get(&id).cloned())
    }

    async fn update(&self, vuln: Vulnerability) -> anyhow::Result<()> {
        self.vulns.write().await.insert(vuln.id, vuln);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.vulns.write().await.remove(&id).is_some())
    }

    async fn list(&self, filter: VulnerabilityFilter) -> anyhow::Result<Vec<Vulnerability>> {
        let mut vulns: Vec<Vulnerability> = self
            .vulns
            .read()
            .await
            .values()
            .filter(|v| filter.status.map_or(true, |s| v.status == s))
            .filter(|v| filter.severity.map_or(true, |s| v.severity == s))
            .cloned()
            .collect();
        vulns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vulns)
    }
}
