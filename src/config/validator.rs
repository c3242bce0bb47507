use crate::error::{AppError, Result};

use super::{ClientConfig, Endpoints, RequestConfig};

/// Validate a client configuration, reporting every issue in one error.
pub fn validate_client_config(config: &ClientConfig) -> Result<()> {
    let mut issues = Vec::new();

    validate_request(&config.request, &mut issues);
    validate_endpoints(&config.endpoints, &mut issues);
    if config.user_agent.trim().is_empty() {
        issues.push("user_agent must not be empty".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "client config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_request(request: &RequestConfig, issues: &mut Vec<String>) {
    if request.timeout.is_zero() {
        issues.push("timeout must be greater than zero".to_string());
    }
    if request.max_in_flight == Some(0) {
        issues.push("max_in_flight must be at least 1 when set".to_string());
    }
}

fn validate_endpoints(endpoints: &Endpoints, issues: &mut Vec<String>) {
    for (name, base) in [
        ("v1", &endpoints.v1),
        ("v6", &endpoints.v6),
        ("v7", &endpoints.v7),
        ("v10", &endpoints.v10),
    ] {
        if base.trim().is_empty() {
            issues.push(format!("endpoints.{name} must not be empty"));
        } else if !(base.starts_with("http://") || base.starts_with("https://")) {
            issues.push(format!("endpoints.{name} must be an http(s) URL, got `{base}`"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_is_valid() {
        validate_client_config(&ClientConfig::builtin()).expect("builtin is valid");
    }

    #[test]
    fn aggregates_every_issue() {
        let mut config = ClientConfig::builtin();
        config.user_agent = "  ".to_string();
        config.endpoints.v10 = "ftp://example.com/".to_string();
        config.endpoints.v1.clear();

        let err = validate_client_config(&config).expect_err("validation should fail");
        let message = err.to_string();
        assert!(message.contains("user_agent"), "unexpected error message: {message}");
        assert!(message.contains("endpoints.v10"), "unexpected error message: {message}");
        assert!(message.contains("endpoints.v1 "), "unexpected error message: {message}");
    }
}
