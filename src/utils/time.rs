use chrono::{Local, NaiveDate};

use crate::error::Result;

pub fn timestamp_slug() -> String {
    Local::now().format("%Y_%m_%d_%H_%M").to_string()
}

/// Parse a `YYYY-MM-DD` command-line date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")?)
}
