use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::{GraphData, SeriesData};
use crate::error::BotError;
use crate::models::{Component, ComponentSeries, IndexReading, IndexSnapshot, SeriesPoint};

/// Client for the CNN Fear & Greed graphdata endpoint.
pub struct CnnClient {
    http_client: HttpClient,
    base_url: String,
}

impl Default for CnnClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CnnClient {
    const DEFAULT_BASE_URL: &'static str = "https://production.dataviz.cnn.io";
    const GRAPHDATA_PATH: &'static str = "/index/fearandgreed/graphdata";

    // The endpoint rejects default HTTP client identities, so a
    // browser-like User-Agent is mandatory.
    const BROWSER_USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    /// Bounded per-request timeout so a stalled upstream cannot hold a
    /// scheduled slot indefinitely. Single attempt, no retry.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    /// Trailing window applied to every history series.
    pub const HISTORY_WINDOW_DAYS: i64 = 365;

    pub fn new() -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(Self::BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Current index reading plus its trailing history.
    pub async fn fetch_index(&self) -> Result<IndexSnapshot, BotError> {
        let document = self.fetch_graphdata().await?;
        parse_index(&document, Utc::now())
    }

    /// Trailing history for every component sub-indicator.
    pub async fn fetch_components(&self) -> Result<Vec<ComponentSeries>, BotError> {
        let document = self.fetch_graphdata().await?;
        parse_components(&document, Utc::now())
    }

    async fn fetch_graphdata(&self) -> Result<GraphData, BotError> {
        let url = format!("{}{}", self.base_url, Self::GRAPHDATA_PATH);
        debug!("Fetching graphdata from {}", url);

        let response = self
            .http_client
            .get(&url)
            .headers(Self::create_headers())
            .timeout(Self::REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| BotError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotError::UpstreamUnavailable(format!(
                "upstream returned HTTP {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BotError::UpstreamUnavailable(e.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| BotError::MalformedResponse(format!("invalid JSON body: {}", e)))
    }
}

pub(crate) fn parse_index(
    document: &GraphData,
    now: DateTime<Utc>,
) -> Result<IndexSnapshot, BotError> {
    let current = document
        .fear_and_greed
        .as_ref()
        .ok_or_else(|| BotError::MalformedResponse("missing 'fear_and_greed' key".to_string()))?;

    let score = current
        .score
        .ok_or_else(|| BotError::MalformedResponse("'fear_and_greed' missing 'score'".to_string()))?;

    let rating = current
        .rating
        .clone()
        .ok_or_else(|| BotError::MalformedResponse("'fear_and_greed' missing 'rating'".to_string()))?;

    let historical = document.fear_and_greed_historical.as_ref().ok_or_else(|| {
        BotError::MalformedResponse("missing 'fear_and_greed_historical' key".to_string())
    })?;

    let history = parse_series(historical, now)?;
    if history.is_empty() {
        return Err(BotError::MalformedResponse(
            "index history is empty within the trailing window".to_string(),
        ));
    }

    Ok(IndexSnapshot {
        current: IndexReading::new(now, score, rating),
        history,
    })
}

pub(crate) fn parse_components(
    document: &GraphData,
    now: DateTime<Utc>,
) -> Result<Vec<ComponentSeries>, BotError> {
    let mut series_set = Vec::with_capacity(Component::ALL.len());

    for component in Component::ALL {
        let Some(series_data) = document.component_series(component) else {
            warn!("Upstream document is missing component '{}'", component.api_key());
            continue;
        };

        let points = parse_series(series_data, now)?;
        if points.len() < 2 {
            warn!(
                "Component '{}' has too few points within the trailing window",
                component.api_key()
            );
            continue;
        }

        let score = series_data.score.ok_or_else(|| {
            BotError::MalformedResponse(format!("'{}' missing 'score'", component.api_key()))
        })?;
        let rating = series_data.rating.clone().ok_or_else(|| {
            BotError::MalformedResponse(format!("'{}' missing 'rating'", component.api_key()))
        })?;

        series_set.push(ComponentSeries {
            component,
            points,
            score,
            rating,
        });
    }

    if series_set.is_empty() {
        return Err(BotError::MalformedResponse(
            "no component series present in upstream document".to_string(),
        ));
    }

    Ok(series_set)
}

/// Extract the point list of one series block: epoch-millisecond x values
/// become UTC timestamps, non-numeric y values are dropped, and the result
/// is sorted ascending and cut to the trailing window.
fn parse_series(series: &SeriesData, now: DateTime<Utc>) -> Result<Vec<SeriesPoint>, BotError> {
    let raw = series
        .data
        .as_ref()
        .ok_or_else(|| BotError::MalformedResponse("series missing 'data' array".to_string()))?;

    let cutoff = now - chrono::Duration::days(CnnClient::HISTORY_WINDOW_DAYS);

    let mut points: Vec<SeriesPoint> = raw
        .iter()
        .filter_map(|point| {
            let x = point.x?;
            let value = point.y.as_ref()?.as_f64()?;
            let timestamp = Utc.timestamp_millis_opt(x as i64).single()?;
            Some(SeriesPoint { timestamp, value })
        })
        .filter(|point| point.timestamp >= cutoff)
        .collect();

    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_json(now: DateTime<Utc>) -> String {
        let a = (now - chrono::Duration::days(2)).timestamp_millis();
        let b = (now - chrono::Duration::days(1)).timestamp_millis();
        format!(r#"{{"data": [{{"x": {}, "y": 40.0}}, {{"x": {}, "y": 62.0}}]}}"#, a, b)
    }

    fn full_document(now: DateTime<Utc>) -> GraphData {
        let history = history_json(now);
        let component = format!(
            r#"{{"score": 55.0, "rating": "greed", "data": [{{"x": {}, "y": 10.0}}, {{"x": {}, "y": 20.0}}]}}"#,
            (now - chrono::Duration::days(2)).timestamp_millis(),
            (now - chrono::Duration::days(1)).timestamp_millis(),
        );
        let body = format!(
            r#"{{
                "fear_and_greed": {{"score": 62.0, "rating": "greed"}},
                "fear_and_greed_historical": {},
                "market_momentum_sp500": {c},
                "stock_price_strength": {c},
                "stock_price_breadth": {c},
                "put_call_options": {c},
                "market_volatility_vix": {c},
                "junk_bond_demand": {c},
                "safe_haven_demand": {c}
            }}"#,
            history,
            c = component
        );
        serde_json::from_str(&body).unwrap()
    }

    #[test]
    fn test_parse_index_happy_path() {
        let now = Utc::now();
        let snapshot = parse_index(&full_document(now), now).unwrap();
        assert_eq!(snapshot.current.score, 62.0);
        assert_eq!(snapshot.current.rating, "greed");
        assert_eq!(snapshot.history.len(), 2);
        assert!(snapshot.history[0].timestamp < snapshot.history[1].timestamp);
    }

    #[test]
    fn test_parse_index_missing_score_is_malformed() {
        let now = Utc::now();
        let body = format!(
            r#"{{"fear_and_greed": {{"rating": "greed"}}, "fear_and_greed_historical": {}}}"#,
            history_json(now)
        );
        let document: GraphData = serde_json::from_str(&body).unwrap();
        let result = parse_index(&document, now);
        assert!(matches!(result, Err(BotError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_index_missing_current_block_is_malformed() {
        let now = Utc::now();
        let body = format!(r#"{{"fear_and_greed_historical": {}}}"#, history_json(now));
        let document: GraphData = serde_json::from_str(&body).unwrap();
        let result = parse_index(&document, now);
        assert!(matches!(result, Err(BotError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_series_drops_non_numeric_values() {
        let now = Utc::now();
        let a = (now - chrono::Duration::days(3)).timestamp_millis();
        let b = (now - chrono::Duration::days(2)).timestamp_millis();
        let c = (now - chrono::Duration::days(1)).timestamp_millis();
        let body = format!(
            r#"{{"data": [{{"x": {}, "y": "n/a"}}, {{"x": {}, "y": 12.5}}, {{"x": {}, "y": 13.0}}]}}"#,
            a, b, c
        );
        let series: SeriesData = serde_json::from_str(&body).unwrap();
        let points = parse_series(&series, now).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 12.5);
    }

    #[test]
    fn test_parse_series_applies_trailing_window() {
        let now = Utc::now();
        let old = (now - chrono::Duration::days(400)).timestamp_millis();
        let recent = (now - chrono::Duration::days(10)).timestamp_millis();
        let body = format!(
            r#"{{"data": [{{"x": {}, "y": 1.0}}, {{"x": {}, "y": 2.0}}]}}"#,
            old, recent
        );
        let series: SeriesData = serde_json::from_str(&body).unwrap();
        let points = parse_series(&series, now).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 2.0);
    }

    #[test]
    fn test_parse_components_collects_all_seven() {
        let now = Utc::now();
        let series_set = parse_components(&full_document(now), now).unwrap();
        assert_eq!(series_set.len(), Component::ALL.len());
    }

    #[test]
    fn test_parse_components_empty_document_is_malformed() {
        let document: GraphData = serde_json::from_str("{}").unwrap();
        let result = parse_components(&document, Utc::now());
        assert!(matches!(result, Err(BotError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_fetch_index_http_error_is_upstream_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/index/fearandgreed/graphdata")
            .with_status(500)
            .create_async()
            .await;

        let client = CnnClient::with_base_url(server.url());
        let result = client.fetch_index().await;
        assert!(matches!(result, Err(BotError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_fetch_index_non_json_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/index/fearandgreed/graphdata")
            .with_status(200)
            .with_body("<html>blocked</html>")
            .create_async()
            .await;

        let client = CnnClient::with_base_url(server.url());
        let result = client.fetch_index().await;
        assert!(matches!(result, Err(BotError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_fetch_index_sends_browser_headers() {
        let now = Utc::now();
        let component = format!(
            r#"{{"score": 55.0, "rating": "greed", "data": [{{"x": {}, "y": 10.0}}, {{"x": {}, "y": 20.0}}]}}"#,
            (now - chrono::Duration::days(2)).timestamp_millis(),
            (now - chrono::Duration::days(1)).timestamp_millis(),
        );
        let body = format!(
            r#"{{"fear_and_greed": {{"score": 62.0, "rating": "greed"}},
                "fear_and_greed_historical": {},
                "market_momentum_sp500": {}}}"#,
            history_json(now),
            component
        );

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/index/fearandgreed/graphdata")
            .match_header("user-agent", mockito::Matcher::Regex("Mozilla".to_string()))
            .match_header("accept", "application/json")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = CnnClient::with_base_url(server.url());
        let snapshot = client.fetch_index().await.unwrap();
        assert_eq!(snapshot.current.score, 62.0);
        mock.assert_async().await;
    }
}
