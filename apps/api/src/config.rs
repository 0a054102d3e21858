use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing; no credential has a built-in fallback.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// Base URL of the identity admin API, e.g. `https://project.example.co/auth/v1`.
    pub auth_admin_url: String,
    pub service_role_key: String,
    /// Bearer token required on every `/api/v1/admin/*` route.
    pub admin_api_token: String,
    /// Second secret for the destructive reset. The reset route is disabled when unset.
    pub reset_token: Option<String>,
    /// Public site origin used for sitemap URLs and CORS.
    pub site_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            auth_admin_url: require_env("AUTH_ADMIN_URL")?
                .trim_end_matches('/')
                .to_string(),
            service_role_key: require_env("SERVICE_ROLE_KEY")?,
            admin_api_token: require_env("ADMIN_API_TOKEN")?,
            reset_token: std::env::var("RESET_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            site_url: require_env("SITE_URL")?.trim_end_matches('/').to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

pub fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/listings_test".to_string(),
        database_max_connections: 1,
        auth_admin_url: "http://127.0.0.1:9/auth/v1".to_string(),
        service_role_key: "service-role".to_string(),
        admin_api_token: "admin-secret".to_string(),
        reset_token: Some("reset-secret".to_string()),
        site_url: "https://listings.example".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}
