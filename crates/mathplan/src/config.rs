//! Server settings read from the environment.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const ADDR_VAR: &str = "MATHPLAN_ADDR";
pub const CATALOG_DIR_VAR: &str = "MATHPLAN_CATALOG_DIR";
pub const CACHE_TTL_VAR: &str = "MATHPLAN_CACHE_TTL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind, e.g. `0.0.0.0:3000`
    pub addr: String,
    /// Catalog directory; the bundled catalog is used when unset
    pub catalog_dir: Option<PathBuf>,
    pub cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:3000".to_string(),
            catalog_dir: None,
            cache_ttl: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from `MATHPLAN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|name| env::var(name).ok())
    }

    /// Applies overrides from a variable lookup. Empty values are treated as unset.
    ///
    /// # Returns
    /// * `Err` - If the cache TTL is not a whole number of seconds
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(addr) = lookup(ADDR_VAR) {
            self.addr = addr.trim().to_string();
        }
        if let Some(dir) = lookup(CATALOG_DIR_VAR) {
            self.catalog_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(ttl) = lookup(CACHE_TTL_VAR) {
            let secs: u64 = ttl
                .trim()
                .parse()
                .with_context(|| format!("{CACHE_TTL_VAR} must be a number of seconds, got {ttl:?}"))?;
            self.cache_ttl = Duration::from_secs(secs);
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::default().with_overrides(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = with(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr, "0.0.0.0:3000");
        assert!(config.catalog_dir.is_none());
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let config = with(&[
            (ADDR_VAR, "127.0.0.1:8080"),
            (CATALOG_DIR_VAR, "/etc/mathplan/catalog"),
            (CACHE_TTL_VAR, " 300 "),
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.catalog_dir, Some(PathBuf::from("/etc/mathplan/catalog")));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = with(&[(ADDR_VAR, ""), (CATALOG_DIR_VAR, "  ")]).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_bad_ttl() {
        let err = with(&[(CACHE_TTL_VAR, "soon")]).unwrap_err();
        assert!(err.to_string().contains(CACHE_TTL_VAR));
    }
}
