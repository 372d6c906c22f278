//! Client configuration: scorer address and request timeout.
//!
//! Defaults, then `FLOORPLAN_SERVER` / `FLOORPLAN_TIMEOUT_SECS` from the
//! environment, then `--server` / `--timeout` on the command line.

use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const EVALUATION_PATH: &str = "data_server/evaluation";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid server URL {value:?}: {source}")]
    Url {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    Timeout(String),
    #[error("{0} requires a value")]
    MissingValue(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub server_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides read through `lookup`.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(server) = lookup("FLOORPLAN_SERVER") {
            self.server_url = server;
        }
        if let Some(secs) = lookup("FLOORPLAN_TIMEOUT_SECS") {
            self.timeout = parse_timeout(&secs)?;
        }
        self.endpoint()?;
        Ok(self)
    }

    /// Applies `--server|-s` and `--timeout|-t`; every other argument is
    /// returned in order for the caller to interpret.
    pub fn with_args(
        mut self,
        args: impl IntoIterator<Item = String>,
    ) -> Result<(Self, Vec<String>), ConfigError> {
        let args: Vec<String> = args.into_iter().collect();
        let mut rest = Vec::new();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                flag @ ("--server" | "-s" | "--timeout" | "-t") => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))?;
                    match flag {
                        "--server" | "-s" => self.server_url = value.clone(),
                        _ => self.timeout = parse_timeout(value)?,
                    }
                    i += 2;
                }
                _ => {
                    rest.push(args[i].clone());
                    i += 1;
                }
            }
        }
        self.endpoint()?;
        Ok((self, rest))
    }

    /// Full URL of the evaluation route, without the query.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let raw = self.server_url.trim();
        let url_err = |source| ConfigError::Url {
            value: self.server_url.clone(),
            source,
        };
        let mut base = Url::parse(raw).map_err(url_err)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(EVALUATION_PATH).map_err(url_err)
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::Timeout(value.to_string());
    match value.trim().parse::<f64>() {
        Ok(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://127.0.0.1:5000/data_server/evaluation"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = ClientConfig {
            server_url: " https://scores.example.com/api ".into(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://scores.example.com/api/data_server/evaluation"
        );
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::default()
            .with_env(|key| match key {
                "FLOORPLAN_SERVER" => Some("http://scorer:8080".into()),
                "FLOORPLAN_TIMEOUT_SECS" => Some("2.5".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.server_url, "http://scorer:8080");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_bad_env_timeout() {
        let err = ClientConfig::default()
            .with_env(|key| (key == "FLOORPLAN_TIMEOUT_SECS").then(|| "0".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Timeout(_)));
    }

    #[test]
    fn test_oversized_timeout_rejected() {
        let err = ClientConfig::default()
            .with_args(args(&["--timeout", "1e20"]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Timeout(ref v) if v == "1e20"));

        let err = ClientConfig::default()
            .with_env(|key| (key == "FLOORPLAN_TIMEOUT_SECS").then(|| "inf".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Timeout(_)));
    }

    #[test]
    fn test_args_override_and_passthrough() {
        let (config, rest) = ClientConfig::default()
            .with_args(args(&["plan.json", "-s", "http://h:1", "--offline", "--timeout", "3"]))
            .unwrap();
        assert_eq!(config.server_url, "http://h:1");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(rest, args(&["plan.json", "--offline"]));
    }

    #[test]
    fn test_short_timeout_flag() {
        let (config, _) = ClientConfig::default()
            .with_args(args(&["-t", "1"]))
            .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.server_url, DEFAULT_SERVER);
    }

    #[test]
    fn test_missing_flag_value() {
        let err = ClientConfig::default()
            .with_args(args(&["plan.json", "--server"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "--server requires a value");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = ClientConfig::default()
            .with_args(args(&["--server", "not a url"]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Url { .. }));
    }
}
