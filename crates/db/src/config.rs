use sift_core::config::parse_positive;
use sift_core::error::CoreError;

/// Default pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Database connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl DbConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Default  |
    /// |----------------------|----------|
    /// | `DATABASE_URL`       | required |
    /// | `DB_MAX_CONNECTIONS` | `20`     |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| CoreError::Config("DATABASE_URL must be set".into()))?;

        let max_connections = parse_positive(
            &lookup,
            "DB_MAX_CONNECTIONS",
            i64::from(DEFAULT_MAX_CONNECTIONS),
        )?;
        let max_connections = u32::try_from(max_connections).map_err(|_| {
            CoreError::Config(format!("DB_MAX_CONNECTIONS is too large: {max_connections}"))
        })?;

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}
