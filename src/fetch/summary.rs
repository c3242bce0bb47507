use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::RequestConfig;
use crate::domain::QuoteParam;
use crate::error::FetchError;

use super::decode::{decode_currencies, decode_market_summaries, decode_quote_summary};
use super::request::{currencies_url, market_summary_url, quote_summary_url};
use super::YahooClient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Currency {
    pub short_name: String,
    pub long_name: String,
    pub symbol: String,
    pub local_long_name: String,
}

/// Provider number paired with its display form, e.g. `{"raw": 5000.5, "fmt": "5,000.50"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawValue {
    pub raw: f64,
    pub fmt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketSummary {
    pub symbol: String,
    pub short_name: String,
    pub full_exchange_name: String,
    pub exchange: String,
    pub exchange_timezone_name: String,
    pub market: String,
    pub market_state: String,
    pub quote_type: String,
    pub regular_market_price: RawValue,
    pub regular_market_change: RawValue,
    pub regular_market_change_percent: RawValue,
    pub regular_market_previous_close: RawValue,
    pub regular_market_time: RawValue,
}

impl YahooClient {
    /// Fetch the requested quote-summary modules for one symbol, keyed by module name.
    pub async fn quote_summary(
        &self,
        symbol: &str,
        modules: &[QuoteParam],
        config: &RequestConfig,
    ) -> Result<Map<String, Value>, FetchError> {
        if modules.is_empty() {
            return Err(FetchError::EmptyQuoteParams);
        }

        let url = quote_summary_url(&self.endpoints, symbol, modules)?;
        debug!("requesting {} summary modules for {}", modules.len(), symbol);
        let body = self.send_checked(&url, config.timeout).await?;
        decode_quote_summary(&body)
    }

    pub async fn currencies(&self, config: &RequestConfig) -> Result<Vec<Currency>, FetchError> {
        let url = currencies_url(&self.endpoints)?;
        let body = self.send_checked(&url, config.timeout).await?;
        decode_currencies(&body)
    }

    pub async fn markets_summary(
        &self,
        config: &RequestConfig,
    ) -> Result<Vec<MarketSummary>, FetchError> {
        let url = market_summary_url(&self.endpoints)?;
        let body = self.send_checked(&url, config.timeout).await?;
        decode_market_summaries(&body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::Endpoints;
    use crate::transport::testing::{query_value, FakeReply, FakeTransport};

    fn client(transport: Arc<FakeTransport>) -> YahooClient {
        YahooClient::with_transport(transport, Endpoints::default())
    }

    #[tokio::test]
    async fn empty_module_list_makes_no_request() {
        let transport = FakeTransport::new(|_| FakeReply::ok("{}"));
        let err = client(transport.clone())
            .quote_summary("AAPL", &[], &RequestConfig::default())
            .await
            .expect_err("no modules");

        assert_eq!(err, FetchError::EmptyQuoteParams);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn returns_requested_modules() {
        let transport = FakeTransport::new(|url| {
            assert_eq!(query_value(url, "modules").as_deref(), Some("price,assetProfile"));
            FakeReply::ok(
                r#"{"quoteSummary":{"result":[{"price":{"currency":"USD"},"assetProfile":{"sector":"Technology"}}],"error":null}}"#,
            )
        });
        let modules = client(transport)
            .quote_summary(
                "AAPL",
                &[QuoteParam::Price, QuoteParam::AssetProfile],
                &RequestConfig::default(),
            )
            .await
            .expect("summary");

        assert_eq!(modules["price"]["currency"], "USD");
        assert_eq!(modules["assetProfile"]["sector"], "Technology");
    }

    #[tokio::test]
    async fn unknown_symbol_maps_to_not_found() {
        let transport =
            FakeTransport::new(|_| FakeReply::status(404, r#"{"quoteSummary":{"result":null}}"#));
        let err = client(transport)
            .quote_summary("BOGUSXYZ", &[QuoteParam::Price], &RequestConfig::default())
            .await
            .expect_err("404");
        assert_eq!(err, FetchError::NotFound);
    }

    #[tokio::test]
    async fn lists_currencies() {
        let transport = FakeTransport::new(|url| {
            assert!(url.path().ends_with("/v1/finance/currencies"));
            FakeReply::ok(
                r#"{"currencies":{"result":[
                    {"shortName":"USD","longName":"US Dollar","symbol":"USD","localLongName":"US Dollar"},
                    {"shortName":"EUR","longName":"Euro","symbol":"EUR","localLongName":"Euro"}
                ],"error":null}}"#,
            )
        });
        let currencies = client(transport)
            .currencies(&RequestConfig::default())
            .await
            .expect("currencies");

        assert_eq!(currencies.len(), 2);
        assert_eq!(currencies[1].long_name, "Euro");
    }

    #[tokio::test]
    async fn lists_market_summaries() {
        let transport = FakeTransport::new(|_| {
            FakeReply::ok(
                r#"{"marketSummaryResponse":{"result":[
                    {"symbol":"^GSPC","shortName":"S&P 500","regularMarketPrice":{"raw":5000.5,"fmt":"5,000.50"},
                     "regularMarketChangePercent":{"raw":0.25,"fmt":"0.25%"}}
                ],"error":null}}"#,
            )
        });
        let markets = client(transport)
            .markets_summary(&RequestConfig::default())
            .await
            .expect("markets");

        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].short_name, "S&P 500");
        assert_eq!(markets[0].regular_market_change_percent.fmt, "0.25%");
        assert_eq!(markets[0].regular_market_change, RawValue::default());
    }

    #[tokio::test(start_paused = true)]
    async fn listing_calls_respect_timeout() {
        let transport = FakeTransport::new(|_| FakeReply::ok("{}").after(Duration::from_secs(10)));
        let err = client(transport)
            .currencies(&RequestConfig::default())
            .await
            .expect_err("stalled");
        assert_eq!(err, FetchError::Timeout(Duration::from_secs(5)));
    }
}
