use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Url};
use tokio::time::timeout;

use crate::config::{ClientConfig, Endpoints};
use crate::error::{FetchError, Result};
use crate::transport::{HttpTransport, Transport, TransportError};

pub mod decode;
pub mod history;
pub mod quotes;
pub mod request;
pub mod summary;

pub use history::{Bar, FetchResult};
pub use quotes::{Quote, QuoteBatchError};
pub use summary::{Currency, MarketSummary, RawValue};

/// Entry point for every provider call. Cheap to clone; burst workers each hold a copy.
#[derive(Clone)]
pub struct YahooClient {
    transport: Arc<dyn Transport>,
    endpoints: Arc<Endpoints>,
}

impl YahooClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.user_agent)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            config.endpoints.clone(),
        ))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints: Arc::new(endpoints),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GET `url` within `deadline`, returning the body of a 2xx response.
    async fn send_checked(
        &self,
        url: &Url,
        deadline: Duration,
    ) -> std::result::Result<String, FetchError> {
        let request = self.transport.send(Method::GET, url.as_str(), deadline);
        let response = timeout(deadline, request)
            .await
            .map_err(|_| TransportError::Timeout(deadline))??;

        match FetchError::from_status(response.status) {
            Some(err) => Err(err),
            None => Ok(response.body),
        }
    }
}
