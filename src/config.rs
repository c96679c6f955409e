use anyhow::Context;

/// Token signing configuration. Tokens are short-lived bearer
/// credentials; there is no refresh mechanism.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: u64,
}

/// Optional bootstrap admin account, created at startup when the
/// email is not taken yet.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Immutable process configuration, built once in `main` and passed
/// into `AppState`. Business logic never reads the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub client_origin: String,
    pub jwt: JwtConfig,
    pub admin_seed: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            // u64 rejects negative values; anything unparseable keeps
            // the 8 hour default.
            ttl_hours: std::env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(8),
        };
        let admin_seed = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminSeed {
                name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin User".into()),
                email,
                password,
            }),
            _ => None,
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(4000),
            client_origin: std::env::var("CLIENT_ORIGIN").unwrap_or_else(|_| "*".into()),
            jwt,
            admin_seed,
        })
    }
}
