use std::time::Duration;

pub mod loader;
pub mod validator;

pub use loader::{load_client_config, parse_client_config};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_WAIT_PERIOD: Duration = Duration::from_millis(250);
/// Lower bound applied to burst timeouts unless `hard_timeout` is set.
pub const BURST_TIMEOUT_FLOOR: Duration = Duration::from_secs(30);
/// Largest symbol list the quote endpoint accepts in one request.
pub const MAX_SYMBOLS_PER_REQUEST: usize = 2500;

// Some endpoints reject the default reqwest user agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:107.0) Gecko/20100101 Firefox/107.0";

/// Per-batch request policy. Callers pass it by reference into every fetch;
/// fetchers never mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub timeout: Duration,
    /// Pause between consecutive requests (sequential) or dispatches (burst).
    pub wait_period: Duration,
    /// Use `timeout` verbatim for bursts instead of raising it to [`BURST_TIMEOUT_FLOOR`].
    pub hard_timeout: bool,
    pub verbose: bool,
    /// Optional cap on concurrently running burst workers.
    pub max_in_flight: Option<usize>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            wait_period: DEFAULT_WAIT_PERIOD,
            hard_timeout: false,
            verbose: true,
            max_in_flight: None,
        }
    }
}

impl RequestConfig {
    pub fn effective_burst_timeout(&self) -> Duration {
        if self.hard_timeout {
            self.timeout
        } else {
            self.timeout.max(BURST_TIMEOUT_FLOOR)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub v1: String,
    pub v6: String,
    pub v7: String,
    pub v10: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            v1: "https://query2.finance.yahoo.com/v1/finance/".to_string(),
            v6: "https://query2.finance.yahoo.com/v6/finance/".to_string(),
            v7: "https://query2.finance.yahoo.com/v7/finance/".to_string(),
            v10: "https://query2.finance.yahoo.com/v10/finance/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoints: Endpoints,
    pub user_agent: String,
    pub request: RequestConfig,
}

impl ClientConfig {
    pub fn builtin() -> Self {
        Self {
            endpoints: Endpoints::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request: RequestConfig::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
