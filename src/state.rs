use std::sync::Arc;

use crate::{
    config::AppConfig,
    store::{InMemoryUserStore, InMemoryVulnerabilityStore, UserStore, VulnerabilityStore},
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub vulns: Arc<dyn VulnerabilityStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Ok(Self::in_memory(config))
    }

    /// State wired with in-memory stores; also what the tests use.
    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::default()),
            vulns: Arc::new(InMemoryVulnerabilityStore::default()),
            config: Arc::new(config),
        }
    }
}
