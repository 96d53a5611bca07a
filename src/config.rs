use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Identity provider whose ID tokens are exchanged for service tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct IdpConfig {
    pub base_url: String,
    pub client_id: String,
    pub public_key_pem: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub deployment: String,
}

impl AiConfig {
    pub fn is_enabled(&self) -> bool {
        self.endpoint.as_deref().is_some_and(|v| !v.is_empty())
            && self.api_key.as_deref().is_some_and(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub idp: IdpConfig,
    pub ai: AiConfig,
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "rideshare".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "rideshare-clients".into()),
            ttl_minutes: parsed_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: parsed_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let idp = IdpConfig {
            base_url: std::env::var("IDP_BASE_URL").unwrap_or_default(),
            client_id: std::env::var("IDP_CLIENT_ID").unwrap_or_default(),
            public_key_pem: std::env::var("IDP_PUBLIC_KEY_PEM")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        };
        let ai = AiConfig {
            endpoint: std::env::var("AI_ENDPOINT").ok(),
            api_key: std::env::var("AI_API_KEY").ok(),
            deployment: std::env::var("AI_DEPLOYMENT").unwrap_or_else(|_| "gpt-4o".into()),
        };
        Ok(Self {
            database_url,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 10),
            jwt,
            idp,
            ai,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_needs_endpoint_and_key() {
        let mut ai = AiConfig {
            endpoint: Some("https://example.openai.azure.com".into()),
            api_key: None,
            deployment: "gpt-4o".into(),
        };
        assert!(!ai.is_enabled());
        ai.api_key = Some(String::new());
        assert!(!ai.is_enabled());
        ai.api_key = Some("key".into());
        assert!(ai.is_enabled());
    }
}
