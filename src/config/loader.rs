use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{Context, Result};

use super::{validator, ClientConfig, Endpoints, RequestConfig};

/// Load a client configuration from JSON, falling back to builtin values for absent keys.
pub fn load_client_config(path: &Path) -> Result<ClientConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read client config JSON at {}", path.display()))?;

    parse_client_config(&json)
        .with_context(|| format!("invalid client config at {}", path.display()))
        .map_err(Into::into)
}

pub fn parse_client_config(json: &str) -> Result<ClientConfig> {
    let raw: RawClientConfig =
        serde_json::from_str(json).context("failed to parse client config JSON")?;
    let config = raw.into_client_config();

    validator::validate_client_config(&config)?;

    Ok(config)
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawClientConfig {
    #[serde(default)]
    timeout_ms: Option<u64>,
    #[serde(default)]
    wait_period_ms: Option<u64>,
    #[serde(default)]
    hard_timeout: Option<bool>,
    #[serde(default)]
    verbose: Option<bool>,
    #[serde(default)]
    max_in_flight: Option<usize>,
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default)]
    endpoints: RawEndpoints,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawEndpoints {
    v1: Option<String>,
    v6: Option<String>,
    v7: Option<String>,
    v10: Option<String>,
}

impl RawClientConfig {
    fn into_client_config(self) -> ClientConfig {
        let builtin = ClientConfig::builtin();
        let defaults = builtin.request;

        let request = RequestConfig {
            timeout: self
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            wait_period: self
                .wait_period_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.wait_period),
            hard_timeout: self.hard_timeout.unwrap_or(defaults.hard_timeout),
            verbose: self.verbose.unwrap_or(defaults.verbose),
            max_in_flight: self.max_in_flight.or(defaults.max_in_flight),
        };

        ClientConfig {
            endpoints: self.endpoints.into_endpoints(builtin.endpoints),
            user_agent: self.user_agent.unwrap_or(builtin.user_agent),
            request,
        }
    }
}

impl RawEndpoints {
    fn into_endpoints(self, fallback: Endpoints) -> Endpoints {
        Endpoints {
            v1: self.v1.map(with_trailing_slash).unwrap_or(fallback.v1),
            v6: self.v6.map(with_trailing_slash).unwrap_or(fallback.v6),
            v7: self.v7.map(with_trailing_slash).unwrap_or(fallback.v7),
            v10: self.v10.map(with_trailing_slash).unwrap_or(fallback.v10),
        }
    }
}

// Request builders append path segments directly to the base.
fn with_trailing_slash(mut base: String) -> String {
    if !base.is_empty() && !base.ends_with('/') {
        base.push('/');
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_bundled_default_config() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let config = load_client_config(&root.join("assets/configs/default.json"))
            .expect("bundled config loads");

        assert_eq!(config, ClientConfig::builtin());
    }

    #[test]
    fn empty_object_yields_builtin() {
        let config = parse_client_config("{}").expect("empty config");
        assert_eq!(config, ClientConfig::builtin());
    }

    #[test]
    fn overrides_selected_fields() {
        let config = parse_client_config(
            r#"{
                "timeout_ms": 1500,
                "wait_period_ms": 0,
                "hard_timeout": true,
                "verbose": false,
                "max_in_flight": 8,
                "endpoints": { "v7": "http://localhost:9000/v7" }
            }"#,
        )
        .expect("config parses");

        assert_eq!(config.request.timeout, Duration::from_millis(1500));
        assert_eq!(config.request.wait_period, Duration::ZERO);
        assert!(config.request.hard_timeout);
        assert!(!config.request.verbose);
        assert_eq!(config.request.max_in_flight, Some(8));
        assert_eq!(config.endpoints.v7, "http://localhost:9000/v7/");
        assert_eq!(config.endpoints.v6, Endpoints::default().v6);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = parse_client_config(r#"{ "timeout": 5 }"#).expect_err("unknown key");
        assert!(
            format!("{err:#}").contains("parse"),
            "unexpected error message: {err}"
        );
    }

    #[test]
    fn surfaces_validation_issues() {
        let err = parse_client_config(r#"{ "timeout_ms": 0, "max_in_flight": 0 }"#)
            .expect_err("invalid values");
        let message = err.to_string();
        assert!(message.contains("timeout"), "unexpected error message: {message}");
        assert!(
            message.contains("max_in_flight"),
            "unexpected error message: {message}"
        );
    }
}
