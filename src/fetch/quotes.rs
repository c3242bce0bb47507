use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::{RequestConfig, MAX_SYMBOLS_PER_REQUEST};
use crate::error::FetchError;

use super::decode::decode_quotes;
use super::request::quotes_url;
use super::YahooClient;

/// Quote record. Only commonly used fields are typed; the rest land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(default)]
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    pub exchange: Option<String>,
    pub full_exchange_name: Option<String>,
    pub currency: Option<String>,
    pub market_state: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_open: Option<f64>,
    pub regular_market_day_high: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub regular_market_change: Option<f64>,
    pub regular_market_change_percent: Option<f64>,
    pub regular_market_volume: Option<u64>,
    pub regular_market_time: Option<i64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_day_average: Option<f64>,
    pub two_hundred_day_average: Option<f64>,
    pub average_daily_volume3_month: Option<u64>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A quote chunk failed. `partial` holds what earlier chunks merged.
#[derive(Debug, Error)]
#[error("quote chunk {chunk} failed: {source}")]
pub struct QuoteBatchError {
    pub partial: HashMap<String, Quote>,
    pub chunk: usize,
    #[source]
    pub source: FetchError,
}

impl YahooClient {
    /// Look up quotes for every symbol, at most [`MAX_SYMBOLS_PER_REQUEST`] per request.
    ///
    /// Chunks run one after another in input order. Symbols the provider does not
    /// know are simply absent from the map.
    pub async fn fetch_quotes(
        &self,
        symbols: &[String],
        config: &RequestConfig,
    ) -> Result<HashMap<String, Quote>, QuoteBatchError> {
        let wanted: Vec<&str> = symbols
            .iter()
            .map(String::as_str)
            .filter(|symbol| !symbol.trim().is_empty())
            .collect();

        let mut merged = HashMap::with_capacity(wanted.len());
        if wanted.is_empty() {
            return Ok(merged);
        }

        let chunk_count = wanted.len().div_ceil(MAX_SYMBOLS_PER_REQUEST);
        for (chunk, group) in wanted.chunks(MAX_SYMBOLS_PER_REQUEST).enumerate() {
            if config.verbose {
                info!(
                    "requesting quote chunk {}/{} ({} symbols)",
                    chunk + 1,
                    chunk_count,
                    group.len()
                );
            }

            let quotes = match self.fetch_quote_chunk(group, config).await {
                Ok(quotes) => quotes,
                Err(source) => {
                    return Err(QuoteBatchError {
                        partial: merged,
                        chunk,
                        source,
                    })
                }
            };

            for quote in quotes {
                if quote.symbol.is_empty() {
                    debug!("skipping quote record without a symbol");
                    continue;
                }
                merged.insert(quote.symbol.clone(), quote);
            }
        }

        Ok(merged)
    }

    async fn fetch_quote_chunk(
        &self,
        symbols: &[&str],
        config: &RequestConfig,
    ) -> Result<Vec<Quote>, FetchError> {
        let url = quotes_url(&self.endpoints, symbols)?;
        let body = self.send_checked(&url, config.timeout).await?;
        decode_quotes(&body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Endpoints;
    use crate::transport::testing::{query_value, FakeReply, FakeTransport};

    /// Echoes a quote for every requested symbol except those starting with `BOGUS`.
    fn echo_transport() -> Arc<FakeTransport> {
        FakeTransport::new(|url| {
            let requested = query_value(url, "symbols").unwrap_or_default();
            let records: Vec<Value> = requested
                .split(',')
                .filter(|symbol| !symbol.starts_with("BOGUS"))
                .map(|symbol| serde_json::json!({ "symbol": symbol, "regularMarketPrice": 1.0 }))
                .collect();
            FakeReply::ok(
                serde_json::json!({ "quoteResponse": { "result": records, "error": null } })
                    .to_string(),
            )
        })
    }

    fn client(transport: Arc<FakeTransport>) -> YahooClient {
        YahooClient::with_transport(transport, Endpoints::default())
    }

    fn numbered(count: usize) -> Vec<String> {
        (0..count).map(|idx| format!("S{idx}")).collect()
    }

    fn requested_counts(transport: &FakeTransport) -> Vec<usize> {
        transport
            .calls()
            .iter()
            .map(|url| {
                let url = reqwest::Url::parse(url).unwrap();
                query_value(&url, "symbols").unwrap().split(',').count()
            })
            .collect()
    }

    #[tokio::test]
    async fn small_batch_uses_one_request() {
        let transport = echo_transport();
        let quotes = client(transport.clone())
            .fetch_quotes(&numbered(2500), &RequestConfig::default())
            .await
            .expect("batch succeeds");

        assert_eq!(quotes.len(), 2500);
        assert_eq!(requested_counts(&transport), vec![2500]);
    }

    #[tokio::test]
    async fn large_batch_is_split_into_contiguous_chunks() {
        let transport = echo_transport();
        let symbols = numbered(5001);
        let quotes = client(transport.clone())
            .fetch_quotes(&symbols, &RequestConfig::default())
            .await
            .expect("batch succeeds");

        assert_eq!(requested_counts(&transport), vec![2500, 2500, 1]);
        assert_eq!(quotes.len(), 5001);
        assert!(!quotes.contains_key(""));

        let last_call = reqwest::Url::parse(&transport.calls()[2]).unwrap();
        assert_eq!(query_value(&last_call, "symbols").as_deref(), Some("S5000"));
    }

    #[tokio::test]
    async fn unknown_symbols_are_absent() {
        let quotes = client(echo_transport())
            .fetch_quotes(
                &["AAPL".to_string(), "BOGUSXYZ".to_string()],
                &RequestConfig::default(),
            )
            .await
            .expect("batch succeeds");

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes["AAPL"].regular_market_price, Some(1.0));
    }

    #[tokio::test]
    async fn blank_symbols_are_never_sent() {
        let transport = echo_transport();
        let symbols = vec![
            String::new(),
            "MSFT".to_string(),
            "  ".to_string(),
            "BRK B".to_string(),
        ];
        let quotes = client(transport.clone())
            .fetch_quotes(&symbols, &RequestConfig::default())
            .await
            .expect("batch succeeds");

        assert_eq!(quotes.len(), 2);
        assert!(quotes.contains_key("MSFT"));
        // Non-blank symbols are sent exactly as given.
        assert!(quotes.contains_key("BRK B"));
        let call = reqwest::Url::parse(&transport.calls()[0]).unwrap();
        assert_eq!(query_value(&call, "symbols").as_deref(), Some("MSFT,BRK B"));
    }

    #[tokio::test]
    async fn empty_input_makes_no_request() {
        let transport = echo_transport();
        let quotes = client(transport.clone())
            .fetch_quotes(&[String::new()], &RequestConfig::default())
            .await
            .expect("nothing to do");

        assert!(quotes.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn chunk_failure_keeps_earlier_chunks() {
        let transport = FakeTransport::new(|url| {
            let requested = query_value(url, "symbols").unwrap_or_default();
            if requested.starts_with("S2500") {
                return FakeReply::status(401, "");
            }
            let records: Vec<Value> = requested
                .split(',')
                .map(|symbol| serde_json::json!({ "symbol": symbol }))
                .collect();
            FakeReply::ok(serde_json::json!({ "quoteResponse": { "result": records } }).to_string())
        });

        let err = client(transport.clone())
            .fetch_quotes(&numbered(7000), &RequestConfig::default())
            .await
            .expect_err("second chunk fails");

        assert_eq!(err.chunk, 1);
        assert_eq!(err.source, FetchError::Unauthorized);
        assert_eq!(err.partial.len(), 2500);
        // The third chunk is never attempted.
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn undecodable_body_is_a_chunk_failure() {
        let transport = FakeTransport::new(|_| FakeReply::ok("<html>rate limited</html>"));
        let err = client(transport)
            .fetch_quotes(&["AAPL".to_string()], &RequestConfig::default())
            .await
            .expect_err("bad body");

        assert!(matches!(err.source, FetchError::MalformedResponse(_)));
        assert!(err.partial.is_empty());
    }

    #[tokio::test]
    async fn records_without_symbol_are_skipped() {
        let transport = FakeTransport::new(|_| {
            FakeReply::ok(
                r#"{"quoteResponse":{"result":[
                    {"symbol":""},{"regularMarketPrice":3.0},{"symbol":"AAPL"}
                ]}}"#,
            )
        });
        let quotes = client(transport)
            .fetch_quotes(&["AAPL".to_string()], &RequestConfig::default())
            .await
            .expect("batch succeeds");

        assert_eq!(quotes.len(), 1);
        assert!(quotes.contains_key("AAPL"));
    }
}
