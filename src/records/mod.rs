use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Context, Result};
use crate::fetch::FetchResult;
use crate::utils::{symbol_file_stem, timestamp_slug};

pub const HISTORY_CSV_HEADER: [&str; 7] =
    ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RecordFormat::Json => "json",
            RecordFormat::Csv => "csv",
        }
    }
}

/// Write one result as pretty JSON. The error, if any, is stored as its message.
pub fn save_history_json<P: AsRef<Path>>(result: &FetchResult, file_path: P) -> Result<()> {
    let path = file_path.as_ref();
    let json = serde_json::to_string_pretty(result)
        .with_context(|| format!("Failed to serialize history for {}", result.symbol))?;

    let mut file = fs::File::create(path)
        .with_context(|| format!("Failed to create history file {:?}", path))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write history file {:?}", path))?;
    Ok(())
}

/// Write one row per bar under the provider's own column header.
pub fn save_history_csv<P: AsRef<Path>>(result: &FetchResult, file_path: P) -> Result<()> {
    let path = file_path.as_ref();
    let mut writer = csv::Writer::from_path(path).context("Failed to create CSV writer")?;

    writer.write_record(HISTORY_CSV_HEADER)?;
    for bar in result.bars() {
        writer.write_record(&[
            bar.date.to_rfc3339(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.adj_close.to_string(),
            bar.volume.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Save under `dir` with a timestamped name derived from the symbol and interval.
pub fn save_history(result: &FetchResult, dir: &Path, format: RecordFormat) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let stem = symbol_file_stem(&result.symbol).ok_or_else(|| {
        AppError::message(format!("Symbol `{}` yields an empty file name", result.symbol))
    })?;
    let filename = format!(
        "{}_{}_{}.{}",
        stem,
        result.interval,
        timestamp_slug(),
        format.extension()
    );
    let path = dir.join(filename);

    match format {
        RecordFormat::Json => save_history_json(result, &path)?,
        RecordFormat::Csv => save_history_csv(result, &path)?,
    }
    Ok(path)
}

/// Read symbols from the first column of a headed CSV file, skipping blank cells.
pub fn load_symbols<P: AsRef<Path>>(file_path: P) -> Result<Vec<String>> {
    let path = file_path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open symbols file {}", path.display()))?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record?;
        let symbol = record.get(0).unwrap_or_default().trim();
        if !symbol.is_empty() {
            symbols.push(symbol.to_string());
        }
    }
    Ok(symbols)
}
