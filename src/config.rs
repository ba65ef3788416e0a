use std::fmt;
use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost:5432/api";

#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 secret from `JWT_SECRET_KEY`. `None` when unset or empty.
    pub secret: Option<String>,
    pub leeway_secs: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {v}"))?,
            None => 10,
        };
        let host = get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("APP_PORT is not a valid port: {v}"))?,
            None => 8080,
        };
        let jwt = JwtConfig {
            secret: get("JWT_SECRET_KEY").filter(|s| !s.is_empty()),
            leeway_secs: get("JWT_LEEWAY_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0),
        };
        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            jwt,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config_from(&[]).expect("defaults should load");
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.port, 8080);
        assert!(cfg.jwt.secret.is_none());
        assert_eq!(cfg.bind_addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn empty_secret_counts_as_unset() {
        let cfg = config_from(&[("JWT_SECRET_KEY", "")]).unwrap();
        assert!(cfg.jwt.secret.is_none());

        let cfg = config_from(&[("JWT_SECRET_KEY", "s3cret")]).unwrap();
        assert_eq!(cfg.jwt.secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn rejects_bad_port() {
        let err = config_from(&[("APP_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let cfg = config_from(&[("JWT_SECRET_KEY", "top-secret")]).unwrap();
        let printed = format!("{:?}", cfg);
        assert!(!printed.contains("top-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
