use reqwest::Url;

use crate::config::Endpoints;
use crate::domain::{DateRange, QuoteParam, TimeSpan};
use crate::error::FetchError;

/// CSV download for one symbol over `range`, sampled at `interval`.
pub fn history_url(
    endpoints: &Endpoints,
    symbol: &str,
    interval: TimeSpan,
    range: &DateRange,
) -> Result<Url, FetchError> {
    let mut url = endpoint(&endpoints.v7, &["download", symbol])?;
    url.query_pairs_mut()
        .append_pair("period1", &range.period1().to_string())
        .append_pair("period2", &range.period2().to_string())
        .append_pair("interval", interval.as_str())
        .append_pair("includeAdjustedClose", "true");
    Ok(url)
}

/// Multi-symbol quote lookup. Callers are responsible for chunking and blank filtering.
pub fn quotes_url(endpoints: &Endpoints, symbols: &[&str]) -> Result<Url, FetchError> {
    let mut url = endpoint(&endpoints.v6, &["quote"])?;
    url.query_pairs_mut()
        .append_pair("symbols", &symbols.join(","));
    Ok(url)
}

pub fn quote_summary_url(
    endpoints: &Endpoints,
    symbol: &str,
    modules: &[QuoteParam],
) -> Result<Url, FetchError> {
    let modules = modules
        .iter()
        .map(|module| module.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let mut url = endpoint(&endpoints.v10, &["quoteSummary", symbol])?;
    url.query_pairs_mut().append_pair("modules", &modules);
    Ok(url)
}

pub fn currencies_url(endpoints: &Endpoints) -> Result<Url, FetchError> {
    endpoint(&endpoints.v1, &["currencies"])
}

pub fn market_summary_url(endpoints: &Endpoints) -> Result<Url, FetchError> {
    endpoint(&endpoints.v6, &["quote", "marketSummary"])
}

// Segments are percent-encoded, so a `/` inside a symbol stays within its segment.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url =
        Url::parse(base).map_err(|err| FetchError::InvalidUrl(format!("{base}: {err}")))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(format!("{base}: cannot be a base URL")))?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}
