//! Yahoo Finance data provider.
//!
//! Fetches OHLCV bars from Yahoo's v8 chart API using `range`/`interval`
//! parameters (2y of daily bars, 60d of 30-minute bars). One request per
//! call, no retries: a failure surfaces as a `DataError` and the screener
//! moves on to the next ticker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; every structural surprise maps to `ResponseFormatChanged`.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use crate::domain::Timeframe;
use chrono::{NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the provider at a different chart endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chart_url(&self, symbol: &str, timeframe: Timeframe) -> String {
        format!(
            "{}/{symbol}?range={}&interval={}&includeAdjustedClose=true",
            self.base_url,
            timeframe.range(),
            timeframe.interval()
        )
    }

    /// Parse the chart API response into RawBars, oldest first.
    fn parse_response(
        symbol: &str,
        timeframe: Timeframe,
        resp: ChartResponse,
    ) -> Result<Vec<RawBar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        // A valid symbol with no trading history comes back without timestamps.
        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars: Vec<RawBar> = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let timestamp = parse_timestamp(ts, timeframe)?;

            let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
            let (Some(open), Some(high), Some(low), Some(close)) = (
                field(&quote.open),
                field(&quote.high),
                field(&quote.low),
                field(&quote.close),
            ) else {
                // Holidays and halted sessions come through as null rows.
                continue;
            };

            let bar = RawBar {
                timestamp,
                open,
                high,
                low,
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
                adj_close: adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten()),
            };

            // The live session is sometimes repeated as a trailing row.
            match bars.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                Some(last) if last.timestamp > bar.timestamp => {
                    return Err(DataError::ResponseFormatChanged(format!(
                        "timestamps out of order for {symbol} at {ts}"
                    )));
                }
                _ => bars.push(bar),
            }
        }

        Ok(bars)
    }
}

/// Daily bars are keyed by session date at midnight; intraday bars keep
/// their UTC open time.
fn parse_timestamp(ts: i64, timeframe: Timeframe) -> Result<NaiveDateTime, DataError> {
    let dt = chrono::DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?
        .naive_utc();
    Ok(match timeframe {
        Timeframe::Daily => dt.date().and_time(NaiveTime::MIN),
        Timeframe::ThirtyMinute => dt,
    })
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        let url = self.chart_url(symbol, timeframe);
        debug!(%symbol, %timeframe, %url, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(DataError::Http {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;
        let bars = Self::parse_response(symbol, timeframe, chart)?;
        debug!(%symbol, %timeframe, bars = bars.len(), "chart parsed");

        Ok(FetchResult {
            symbol: symbol.to_string(),
            timeframe,
            bars,
            source: DataSource::YahooFinance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str, timeframe: Timeframe) -> Result<Vec<RawBar>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response("TEST", timeframe, resp)
    }

    #[test]
    fn chart_url_uses_range_and_interval() {
        let provider = YahooProvider::new(Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://localhost/chart");
        assert_eq!(
            provider.chart_url("MSFT", Timeframe::ThirtyMinute),
            "http://localhost/chart/MSFT?range=60d&interval=30m&includeAdjustedClose=true"
        );
        assert!(provider
            .chart_url("MSFT", Timeframe::Daily)
            .contains("range=2y&interval=1d"));
    }

    #[test]
    fn parses_daily_bars_and_skips_null_rows() {
        // 2024-01-02 14:30 UTC, 2024-01-03 14:30 UTC, 2024-01-04 14:30 UTC
        let json = r#"{"chart":{"result":[{
            "timestamp":[1704205800,1704292200,1704378600],
            "indicators":{
                "quote":[{"open":[10.0,null,12.0],"high":[11.0,null,13.0],
                          "low":[9.0,null,11.0],"close":[10.5,null,12.5],
                          "volume":[100,null,300]}],
                "adjclose":[{"adjclose":[10.0,null,12.5]}]
            }}],"error":null}}"#;
        let bars = parse(json, Timeframe::Daily).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.to_string(), "2024-01-02 00:00:00");
        assert_eq!(bars[0].adj_close, Some(10.0));
        assert_eq!(bars[1].close, 12.5);
        assert_eq!(bars[1].volume, 300);
    }

    #[test]
    fn intraday_keeps_time_of_day_and_dedupes_trailing_row() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1704205800,1704207600,1704207600],
            "indicators":{"quote":[{"open":[1.0,2.0,2.0],"high":[1.5,2.5,2.6],
                          "low":[0.5,1.5,1.5],"close":[1.2,2.2,2.4],"volume":[1,2,3]}]}
            }],"error":null}}"#;
        let bars = parse(json, Timeframe::ThirtyMinute).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.to_string(), "2024-01-02 14:30:00");
        assert_eq!(bars[1].close, 2.4);
        assert_eq!(bars[1].adj_close, None);
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,
            "error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(
            parse(json, Timeframe::Daily),
            Err(DataError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn missing_timestamps_yield_no_bars() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse(json, Timeframe::Daily).unwrap().is_empty());
    }
}
