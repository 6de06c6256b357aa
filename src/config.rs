use std::env;
use std::str::FromStr;

/// Runtime settings, read from the environment (a `.env` file is loaded first by the binaries).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Upper bound on in-flight requests.
    pub concurrency_limit: usize,
    pub body_limit_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        Ok(Self {
            database_url,
            host: env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("APP_PORT", 3000),
            concurrency_limit: parse_var("APP_CONCURRENCY_LIMIT", 100),
            body_limit_bytes: parse_var("APP_BODY_LIMIT_BYTES", 1024 * 1024),
        })
    }
}

/// Unset, unparsable or zero values fall back to `default`.
fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr + PartialEq + Default,
{
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
        .unwrap_or(default)
}
