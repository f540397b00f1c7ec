//! Ticker list ingestion.
//!
//! `.csv` files contribute the first column of every record after the header.
//! Anything else is free text: upper-cased, commas count as separators.
//! Duplicates are dropped, first occurrence wins.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TickerError {
    #[error("read ticker file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse ticker csv {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Split free text into tickers.
pub fn parse_tickers_text(text: &str) -> Vec<String> {
    dedupe(
        text.to_uppercase()
            .replace(',', " ")
            .split_whitespace()
            .map(str::to_string),
    )
}

/// Read a ticker file, choosing csv or free-text rules by extension.
pub fn read_ticker_file(path: &Path) -> Result<Vec<String>, TickerError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        return read_csv_column(path);
    }

    let text = std::fs::read_to_string(path).map_err(|source| TickerError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_tickers_text(&text))
}

fn read_csv_column(path: &Path) -> Result<Vec<String>, TickerError> {
    let csv_err = |source: csv::Error| TickerError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut tickers = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if let Some(first) = record.get(0).filter(|s| !s.is_empty()) {
            tickers.push(first.to_string());
        }
    }
    Ok(dedupe(tickers))
}

/// Drop repeats, keeping the first occurrence in place.
pub fn dedupe(tickers: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tickers
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
