//! Query configuration loaded from environment variables.

use crate::error::CoreError;

/// Default number of records per page when the caller omits `size`.
pub const DEFAULT_PAGE_SIZE: i64 = 15;

/// Upper bound applied to any caller-provided page size.
pub const MAX_PAGE_SIZE: i64 = 500;

/// Pagination settings shared by every filtered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    /// Page size used when the request omits it or sends a non-positive value.
    pub default_page_size: i64,
    /// Largest page size a caller may request.
    pub max_page_size: i64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl QueryConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default |
    /// |---------------------|---------|
    /// | `DEFAULT_PAGE_SIZE` | `15`    |
    /// | `MAX_PAGE_SIZE`     | `500`   |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_page_size =
            parse_positive(&lookup, "DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let max_page_size = parse_positive(&lookup, "MAX_PAGE_SIZE", MAX_PAGE_SIZE)?;

        if default_page_size > max_page_size {
            return Err(CoreError::Validation(format!(
                "DEFAULT_PAGE_SIZE ({default_page_size}) exceeds MAX_PAGE_SIZE ({max_page_size})"
            )));
        }

        Ok(Self {
            default_page_size,
            max_page_size,
        })
    }
}

/// Parse a positive integer variable, falling back to `default` when unset.
pub fn parse_positive<F>(lookup: &F, name: &str, default: i64) -> Result<i64, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Config(format!("{name} must be an integer, got {raw:?}")))?;

    if value < 1 {
        return Err(CoreError::Config(format!("{name} must be at least 1")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = QueryConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, QueryConfig::default());
        assert_eq!(config.default_page_size, 15);
    }

    #[test]
    fn reads_overrides() {
        let config = QueryConfig::from_lookup(lookup_from(&[
            ("DEFAULT_PAGE_SIZE", "25"),
            ("MAX_PAGE_SIZE", " 100 "),
        ]))
        .unwrap();
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn rejects_garbage() {
        let result = QueryConfig::from_lookup(lookup_from(&[("DEFAULT_PAGE_SIZE", "lots")]));
        assert_matches!(result, Err(CoreError::Config(_)));
    }

    #[test]
    fn rejects_zero() {
        let result = QueryConfig::from_lookup(lookup_from(&[("MAX_PAGE_SIZE", "0")]));
        assert_matches!(result, Err(CoreError::Config(_)));
    }

    #[test]
    fn rejects_default_above_max() {
        let result = QueryConfig::from_lookup(lookup_from(&[
            ("DEFAULT_PAGE_SIZE", "50"),
            ("MAX_PAGE_SIZE", "10"),
        ]));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }
}
