//! Workstation configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DocketError, Result};

/// Environment variable holding the collaborator service base URL.
pub const SERVICE_URL_VAR: &str = "DOCKET_SERVICE_URL";
/// Environment variable for the job history page size.
pub const HISTORY_LIMIT_VAR: &str = "DOCKET_HISTORY_LIMIT";
/// Environment variable for the HTTP timeout, in seconds.
pub const TIMEOUT_VAR: &str = "DOCKET_TIMEOUT_SECS";
/// Environment variable for the column preference file.
pub const PREFERENCES_VAR: &str = "DOCKET_PREFERENCES";

/// Configuration for a workstation and its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct DocketConfig {
    /// Base URL of the job, suggestion and rendering services.
    pub service_url: Option<String>,

    /// How many jobs a history refresh asks for.
    pub history_limit: usize,

    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,

    /// Where column preferences are stored.
    pub preferences_path: PathBuf,
}

impl Default for DocketConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            history_limit: 50,
            request_timeout: Duration::from_secs(60),
            preferences_path: PathBuf::from(".docket/preferences.json"),
        }
    }
}

impl DocketConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service base URL.
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    /// Set the history page size.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set the HTTP timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the preference file path.
    pub fn with_preferences_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preferences_path = path.into();
        self
    }

    /// Load configuration from `DOCKET_*` environment variables, keeping
    /// defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(SERVICE_URL_VAR).filter(|u| !u.trim().is_empty()) {
            config.service_url = Some(url.trim().to_string());
        }
        if let Some(limit) = lookup(HISTORY_LIMIT_VAR) {
            config.history_limit = parse_positive(HISTORY_LIMIT_VAR, &limit)? as usize;
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            config.request_timeout = Duration::from_secs(parse_positive(TIMEOUT_VAR, &secs)?);
        }
        if let Some(path) = lookup(PREFERENCES_VAR).filter(|p| !p.trim().is_empty()) {
            config.preferences_path = PathBuf::from(path);
        }

        Ok(config)
    }

    /// The service URL, or a configuration error if unset.
    pub fn require_service_url(&self) -> Result<&str> {
        self.service_url.as_deref().ok_or_else(|| {
            DocketError::Config(format!("{} environment variable not set", SERVICE_URL_VAR))
        })
    }
}

fn parse_positive(name: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DocketError::Config(format!(
            "{} must be a positive integer, got '{}'",
            name, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DocketConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config, DocketConfig::default());
        assert_eq!(config.history_limit, 50);
        assert!(config.require_service_url().is_err());
    }

    #[test]
    fn test_from_vars() {
        let config = DocketConfig::from_vars(vars(&[
            (SERVICE_URL_VAR, "http://localhost:8080 "),
            (HISTORY_LIMIT_VAR, "20"),
            (TIMEOUT_VAR, "5"),
            (PREFERENCES_VAR, "/tmp/prefs.json"),
        ]))
        .unwrap();

        assert_eq!(config.require_service_url().unwrap(), "http://localhost:8080");
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.preferences_path, PathBuf::from("/tmp/prefs.json"));
    }

    #[test]
    fn test_invalid_values() {
        for (name, value) in [(HISTORY_LIMIT_VAR, "0"), (TIMEOUT_VAR, "soon")] {
            let err = DocketConfig::from_vars(vars(&[(name, value)])).unwrap_err();
            assert!(matches!(err, DocketError::Config(_)));
        }
    }
}
