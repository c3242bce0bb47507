use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Serialize, Serializer};
use tokio::sync::{mpsc, Semaphore};
use tokio::time::sleep;

use crate::config::RequestConfig;
use crate::domain::{validate_interval, DateRange, TimeSpan};
use crate::error::FetchError;

use super::decode::decode_history_csv;
use super::request::history_url;
use super::YahooClient;

/// One row of a history download.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

/// Outcome for a single symbol: the parallel price columns plus an optional error.
///
/// Without an error every column has the same length, in provider order. With an
/// error the columns are empty, or hold the rows decoded before a malformed one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    pub symbol: String,
    pub interval: TimeSpan,
    pub dates: Vec<DateTime<Utc>>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub adj_close: Vec<f64>,
    pub volume: Vec<u64>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<FetchError>,
}

impl FetchResult {
    pub fn new(symbol: impl Into<String>, interval: TimeSpan) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            dates: Vec::new(),
            open: Vec::new(),
            high: Vec::new(),
            low: Vec::new(),
            close: Vec::new(),
            adj_close: Vec::new(),
            volume: Vec::new(),
            error: None,
        }
    }

    pub fn failed(symbol: impl Into<String>, interval: TimeSpan, error: FetchError) -> Self {
        let mut result = Self::new(symbol, interval);
        result.error = Some(error);
        result
    }

    pub fn push(&mut self, bar: Bar) {
        self.dates.push(bar.date);
        self.open.push(bar.open);
        self.high.push(bar.high);
        self.low.push(bar.low);
        self.close.push(bar.close);
        self.adj_close.push(bar.adj_close);
        self.volume.push(bar.volume);
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Row view over the parallel columns.
    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        (0..self.len()).map(move |idx| Bar {
            date: self.dates[idx],
            open: self.open[idx],
            high: self.high[idx],
            low: self.low[idx],
            close: self.close[idx],
            adj_close: self.adj_close[idx],
            volume: self.volume[idx],
        })
    }
}

fn serialize_error<S>(error: &Option<FetchError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

impl YahooClient {
    /// Fetch one symbol's history with `config.timeout` as the deadline.
    pub async fn fetch_history(
        &self,
        symbol: &str,
        interval: TimeSpan,
        range: &DateRange,
        config: &RequestConfig,
    ) -> FetchResult {
        self.fetch_history_within(symbol, interval, range, config.timeout)
            .await
    }

    /// Validation failures return before any request is made. The deadline is enforced
    /// here as well as in the transport, so a stalled call always ends as `Timeout`.
    pub async fn fetch_history_within(
        &self,
        symbol: &str,
        interval: TimeSpan,
        range: &DateRange,
        deadline: Duration,
    ) -> FetchResult {
        let mut result = FetchResult::new(symbol, interval);

        if let Err(err) = validate_interval(interval).and_then(|_| range.validate()) {
            result.error = Some(err);
            return result;
        }

        let url = match history_url(&self.endpoints, symbol, interval, range) {
            Ok(url) => url,
            Err(err) => {
                result.error = Some(err);
                return result;
            }
        };

        debug!("requesting history for {} from {}", symbol, url);

        let body = match self.send_checked(&url, deadline).await {
            Ok(body) => body,
            Err(err) => {
                result.error = Some(err);
                return result;
            }
        };

        if let Err(err) = decode_history_csv(&body, |bar| result.push(bar)) {
            result.error = Some(err);
        }

        result
    }

    /// Fetch each symbol in turn, pausing `wait_period` between requests.
    ///
    /// The output is aligned with `symbols`; failures stay on their own entry.
    pub async fn fetch_all_sequential(
        &self,
        symbols: &[String],
        interval: TimeSpan,
        range: &DateRange,
        config: &RequestConfig,
    ) -> Vec<FetchResult> {
        let total = symbols.len();
        let mut results = Vec::with_capacity(total);

        for (position, symbol) in symbols.iter().enumerate() {
            let result = self.fetch_history(symbol, interval, range, config).await;
            if config.verbose {
                report_progress(&result, position, total);
            }
            results.push(result);

            if position + 1 < total && !config.wait_period.is_zero() {
                sleep(config.wait_period).await;
            }
        }

        results
    }

    /// Dispatch one worker per symbol, spaced by `wait_period` at dispatch time,
    /// without waiting on earlier responses.
    ///
    /// Each worker gets [`RequestConfig::effective_burst_timeout`]. Results are
    /// placed by input position, so the output is aligned with `symbols` whatever
    /// order the responses arrive in. Verbose progress is logged in arrival order.
    pub async fn fetch_all_burst(
        &self,
        symbols: &[String],
        interval: TimeSpan,
        range: &DateRange,
        config: &RequestConfig,
    ) -> Vec<FetchResult> {
        let total = symbols.len();
        if total == 0 {
            return Vec::new();
        }

        let deadline = config.effective_burst_timeout();
        let gate = config
            .max_in_flight
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));
        let (tx, mut rx) = mpsc::channel::<(usize, FetchResult)>(total);

        for (index, symbol) in symbols.iter().enumerate() {
            sleep(config.wait_period).await;

            let permit = match &gate {
                Some(gate) => Arc::clone(gate).acquire_owned().await.ok(),
                None => None,
            };

            let client = self.clone();
            let tx = tx.clone();
            let symbol = symbol.clone();
            let range = *range;

            debug!("dispatching burst worker {} for {}", index, symbol);
            tokio::spawn(async move {
                let _permit = permit;
                let result = client
                    .fetch_history_within(&symbol, interval, &range, deadline)
                    .await;
                // Capacity equals the symbol count, so this never waits.
                let _ = tx.send((index, result)).await;
            });
        }
        drop(tx);

        let mut slots: Vec<Option<FetchResult>> = vec![None; total];
        let mut received = 0;
        while received < total {
            let Some((index, result)) = rx.recv().await else {
                break;
            };
            if config.verbose {
                report_progress(&result, received, total);
            }
            slots[index] = Some(result);
            received += 1;
        }

        slots
            .into_iter()
            .zip(symbols)
            .map(|(slot, symbol)| {
                slot.unwrap_or_else(|| {
                    warn!("burst worker for {} exited without a result", symbol);
                    FetchResult::failed(symbol.as_str(), interval, FetchError::WorkerLost)
                })
            })
            .collect()
    }
}

fn report_progress(result: &FetchResult, position: usize, total: usize) {
    match &result.error {
        None => info!(
            "{} ({}/{}): {} rows",
            result.symbol,
            position + 1,
            total,
            result.len()
        ),
        Some(err) => warn!("{} ({}/{}): {}", result.symbol, position + 1, total, err),
    }
}
