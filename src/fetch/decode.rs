use std::io::Cursor;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FetchError;

use super::history::Bar;
use super::quotes::Quote;
use super::summary::{Currency, MarketSummary};

const HISTORY_COLUMNS: usize = 7;

/// Decode a history CSV (`Date,Open,High,Low,Close,Adj Close,Volume`), handing each row to `sink`.
///
/// Stops at the first short or unparsable row; rows already handed over stay with the caller.
pub fn decode_history_csv<F>(body: &str, mut sink: F) -> Result<(), FetchError>
where
    F: FnMut(Bar),
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(body.as_bytes()));

    for (row, record) in reader.records().enumerate() {
        let line = row + 2;
        let record = record
            .map_err(|err| FetchError::malformed(format!("line {line}: {err}")))?;

        if record.len() < HISTORY_COLUMNS {
            return Err(FetchError::malformed(format!(
                "line {line}: expected {HISTORY_COLUMNS} columns, found {}",
                record.len()
            )));
        }

        let field = |idx: usize| record.get(idx).unwrap_or_default().trim();
        let parse_number = |idx: usize| -> Result<f64, FetchError> {
            field(idx).parse::<f64>().map_err(|_| {
                FetchError::malformed(format!(
                    "line {line}: column {} is not numeric: `{}`",
                    idx + 1,
                    field(idx)
                ))
            })
        };

        let date = parse_timestamp(field(0)).ok_or_else(|| {
            FetchError::malformed(format!("line {line}: unrecognised date `{}`", field(0)))
        })?;

        let volume = field(6).parse::<u64>().map_err(|_| {
            FetchError::malformed(format!(
                "line {line}: volume is not an integer: `{}`",
                field(6)
            ))
        })?;

        sink(Bar {
            date,
            open: parse_number(1)?,
            high: parse_number(2)?,
            low: parse_number(3)?,
            close: parse_number(4)?,
            adj_close: parse_number(5)?,
            volume,
        });
    }

    Ok(())
}

/// Daily rows carry a bare date; intraday rows carry a time and sometimes an offset.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    if let Ok(moment) = DateTime::parse_from_rfc3339(value) {
        return Some(moment.with_timezone(&Utc));
    }
    if let Ok(moment) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(moment.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    #[serde(default)]
    result: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: Listing<Quote>,
}

#[derive(Debug, Deserialize)]
struct CurrencyEnvelope {
    currencies: Listing<Currency>,
}

#[derive(Debug, Deserialize)]
struct MarketSummaryEnvelope {
    #[serde(rename = "marketSummaryResponse")]
    market_summary_response: Listing<MarketSummary>,
}

pub fn decode_quotes(body: &str) -> Result<Vec<Quote>, FetchError> {
    decode_json::<QuoteEnvelope>(body, "quote").map(|envelope| envelope.quote_response.result)
}

pub fn decode_currencies(body: &str) -> Result<Vec<Currency>, FetchError> {
    decode_json::<CurrencyEnvelope>(body, "currencies").map(|envelope| envelope.currencies.result)
}

pub fn decode_market_summaries(body: &str) -> Result<Vec<MarketSummary>, FetchError> {
    decode_json::<MarketSummaryEnvelope>(body, "market summary")
        .map(|envelope| envelope.market_summary_response.result)
}

/// Unwrap `quoteSummary.result[0]` into its module map.
pub fn decode_quote_summary(body: &str) -> Result<Map<String, Value>, FetchError> {
    let root: Value = decode_json(body, "quote summary")?;
    let results = walk_json_path(&root, &["quoteSummary", "result"])?
        .as_array()
        .ok_or_else(|| FetchError::malformed("quoteSummary.result is not an array"))?;

    let first = results
        .first()
        .ok_or_else(|| FetchError::malformed("quoteSummary.result is empty"))?;

    first
        .as_object()
        .cloned()
        .ok_or_else(|| FetchError::malformed("quoteSummary.result[0] is not an object"))
}

pub fn walk_json_path<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value, FetchError> {
    let mut cursor = root;
    for key in path {
        cursor = cursor.get(key).ok_or_else(|| {
            FetchError::malformed(format!("missing key `{key}` while navigating JSON path"))
        })?;
    }
    Ok(cursor)
}

fn decode_json<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, FetchError> {
    serde_json::from_str(body)
        .map_err(|err| FetchError::malformed(format!("failed to parse {what} JSON: {err}")))
}
