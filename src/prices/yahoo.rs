//! Yahoo Finance chart API provider
//!
//! Talks to the v8 chart endpoint over blocking HTTP and maps its nested
//! JSON envelope onto [`PriceBar`] rows. Transient transport failures get
//! one retry; anything else surfaces as an error.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{AppError, Result};
use crate::prices::bar::PriceBar;
use crate::prices::provider::PriceProvider;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const RETRY_DELAY: Duration = Duration::from_millis(500);
const MAX_ATTEMPTS: u32 = 2;
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Blocking client for the Yahoo v8 chart endpoint.
pub struct YahooProvider {
    client: Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: &str,
    ) -> Result<Vec<PriceBar>> {
        let url = chart_url(symbol, start, end, interval)?;
        debug!("fetching {} {} from {} to {}", symbol, interval, start, end);

        let mut last_err: Option<AppError> = None;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                warn!("retrying yahoo request for {} (attempt {})", symbol, attempt + 1);
                thread::sleep(RETRY_DELAY);
            }

            match self.client.get(url.clone()).send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text()?;
                        return parse_chart(symbol, &body);
                    }
                    let err = AppError::Source(format!("yahoo returned {status} for {symbol}"));
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = Some(err);
                        continue;
                    }
                    return Err(err);
                }
                Err(err) if err.is_timeout() || err.is_connect() => {
                    last_err = Some(err.into());
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(last_err
            .unwrap_or_else(|| AppError::Source(format!("yahoo request failed for {symbol}"))))
    }
}

fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate, interval: &str) -> Result<Url> {
    let period1 = unix_midnight(start);
    let period2 = unix_midnight(end);

    let mut url = Url::parse(&format!("{BASE_URL}/{symbol}"))
        .map_err(|e| AppError::Validation(format!("bad chart url for '{symbol}': {e}")))?;
    url.query_pairs_mut()
        .append_pair("period1", &period1.to_string())
        .append_pair("period2", &period2.to_string())
        .append_pair("interval", interval)
        .append_pair("includeAdjustedClose", "true");
    Ok(url)
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<serde_json::Value>,
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
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Option<Vec<Option<f64>>>,
}

fn parse_chart(symbol: &str, body: &str) -> Result<Vec<PriceBar>> {
    let envelope: ChartResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Source(format!("unreadable yahoo payload for {symbol}: {e}")))?;

    if let Some(err) = envelope.chart.error {
        if !err.is_null() {
            return Err(AppError::Source(format!("yahoo error for {symbol}: {err}")));
        }
    }

    let data = match envelope.chart.result.and_then(|mut r| {
        if r.is_empty() {
            None
        } else {
            Some(r.remove(0))
        }
    }) {
        Some(data) => data,
        None => {
            return Err(AppError::Source(format!("yahoo chart result missing for {symbol}")))
        }
    };

    // No timestamps means no trading data in the window, not a failure.
    let timestamps = match data.timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Ok(Vec::new()),
    };

    let quote = match data.indicators.quote.into_iter().next() {
        Some(quote) => quote,
        None => return Err(AppError::Source(format!("yahoo quote block missing for {symbol}"))),
    };
    let adjclose = data.indicators.adjclose.and_then(|mut a| {
        if a.is_empty() {
            None
        } else {
            a.remove(0).adjclose
        }
    });

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let open = series_value(&quote.open, i);
        let high = series_value(&quote.high, i);
        let low = series_value(&quote.low, i);
        let close = series_value(&quote.close, i);
        let volume = quote.volume.as_ref().and_then(|v| v.get(i)).and_then(|v| *v);

        // Yahoo pads holidays with all-null rows; drop those outright.
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            continue;
        }

        let date = match DateTime::from_timestamp(*ts, 0) {
            Some(dt) => dt.date_naive(),
            None => continue,
        };

        let close_value = close.unwrap_or(f64::NAN);
        let adj = adjclose
            .as_ref()
            .and_then(|a| a.get(i))
            .and_then(|v| *v)
            .unwrap_or(close_value);

        bars.push(PriceBar {
            date,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close_value,
            adj_close: adj,
            volume: volume.unwrap_or(0),
        });
    }

    Ok(bars)
}

fn series_value(series: &Option<Vec<Option<f64>>>, i: usize) -> Option<f64> {
    series.as_ref().and_then(|v| v.get(i)).and_then(|v| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    // 2024-01-02 and 2024-01-03 at 00:00 UTC.
    const TS_JAN_2: i64 = 1_704_153_600;
    const TS_JAN_3: i64 = 1_704_240_000;

    #[test]
    fn test_chart_url_carries_window_and_interval() {
        let url = chart_url("AAPL", date("2024-01-01"), date("2024-02-01"), "1d").unwrap();
        let rendered = url.as_str();

        assert!(rendered.starts_with("https://query1.finance.yahoo.com/v8/finance/chart/AAPL?"));
        assert!(rendered.contains("period1=1704067200"));
        assert!(rendered.contains("period2=1706745600"));
        assert!(rendered.contains("interval=1d"));
        assert!(rendered.contains("includeAdjustedClose=true"));
    }

    #[test]
    fn test_parse_chart_maps_rows() {
        let body = format!(
            r#"{{"chart":{{"result":[{{"timestamp":[{TS_JAN_2},{TS_JAN_3}],
                "indicators":{{"quote":[{{"open":[10.0,11.0],"high":[10.5,11.5],
                "low":[9.5,10.5],"close":[10.2,11.2],"volume":[1000,2000]}}],
                "adjclose":[{{"adjclose":[10.1,11.1]}}]}}}}],"error":null}}}}"#
        );

        let bars = parse_chart("AAPL", &body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, date("2024-01-02"));
        assert_eq!(bars[0].open, 10.0);
        assert_eq!(bars[0].close, 10.2);
        assert_eq!(bars[0].adj_close, 10.1);
        assert_eq!(bars[0].volume, 1000);
        assert_eq!(bars[1].date, date("2024-01-03"));
    }

    #[test]
    fn test_parse_chart_skips_all_null_rows() {
        let body = format!(
            r#"{{"chart":{{"result":[{{"timestamp":[{TS_JAN_2},{TS_JAN_3}],
                "indicators":{{"quote":[{{"open":[null,11.0],"high":[null,11.5],
                "low":[null,10.5],"close":[null,11.2],"volume":[null,2000]}}]}}}}],
                "error":null}}}}"#
        );

        let bars = parse_chart("AAPL", &body).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, date("2024-01-03"));
    }

    #[test]
    fn test_parse_chart_adjclose_falls_back_to_close() {
        let body = format!(
            r#"{{"chart":{{"result":[{{"timestamp":[{TS_JAN_2}],
                "indicators":{{"quote":[{{"open":[10.0],"high":[10.5],
                "low":[9.5],"close":[10.2],"volume":[1000]}}]}}}}],"error":null}}}}"#
        );

        let bars = parse_chart("AAPL", &body).unwrap();
        assert_eq!(bars[0].adj_close, 10.2);
    }

    #[test]
    fn test_parse_chart_without_timestamps_is_empty_series() {
        let body = r#"{"chart":{"result":[{"timestamp":null,
            "indicators":{"quote":[{}]}}],"error":null}}"#;

        let bars = parse_chart("EMPTY", body).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_parse_chart_error_payload_is_source_error() {
        let body = r#"{"chart":{"result":null,
            "error":{"code":"Not Found","description":"No data found"}}}"#;

        let err = parse_chart("NOPE", body).unwrap_err();
        assert!(matches!(err, AppError::Source(_)));
    }

    #[test]
    fn test_parse_chart_garbage_is_source_error() {
        let err = parse_chart("AAPL", "<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, AppError::Source(_)));
    }
}
