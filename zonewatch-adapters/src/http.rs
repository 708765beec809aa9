//! Client for the zone monitoring HTTP API.
//!
//! Two read-only endpoints are used:
//!
//! - `GET /api/zones`: the registered zones (identity only)
//! - `GET /api/host/{host}/zone/{name}`: full detail of one zone
//!
//! ## Example
//!
//! ```rust,no_run
//! use zonewatch_adapters::http::HttpZoneClient;
//! use zonewatch_types::ZoneKey;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpZoneClient::builder()
//!         .endpoint("http://localhost:3000")
//!         .build()?;
//!
//!     let zone = client.get_zone(&ZoneKey::new("helms-deep", "box")).await?;
//!     println!("{} active alarms", zone.active_alarm_count());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use zonewatch_types::{Zone, ZoneKey};

use crate::payload::{parse_zone, parse_zone_list};
use crate::AdapterError;

/// HTTP client for zone lists and zone details.
#[derive(Debug, Clone)]
pub struct HttpZoneClient {
    client: Client,
    endpoint: String,
}

impl HttpZoneClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpZoneClientBuilder {
        HttpZoneClientBuilder::default()
    }

    /// Base URL requests are made against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the identities of all registered zones.
    pub async fn list_zones(&self) -> Result<Vec<ZoneKey>, AdapterError> {
        let url = format!("{}/api/zones", self.endpoint);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(status_error(&response));
        }

        let body = response.bytes().await?;
        parse_zone_list(&body)
    }

    /// Fetch the full detail of one zone.
    pub async fn get_zone(&self, key: &ZoneKey) -> Result<Zone, AdapterError> {
        let url = format!(
            "{}/api/host/{}/zone/{}",
            self.endpoint,
            urlencoded(&key.host),
            urlencoded(&key.name)
        );
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AdapterError::NotFound(key.clone()));
        }

        if !response.status().is_success() {
            return Err(status_error(&response));
        }

        let body = response.bytes().await?;
        parse_zone(&body)
    }
}

fn status_error(response: &Response) -> AdapterError {
    AdapterError::Http(format!("API returned status {}", response.status()))
}

/// Builder for HttpZoneClient.
#[derive(Debug, Default)]
pub struct HttpZoneClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpZoneClientBuilder {
    /// Set the API endpoint (e.g., "http://localhost:3000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpZoneClient, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        Ok(HttpZoneClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

// Percent-encode the characters that would change a path segment's meaning
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            ' ' => out.push_str("%20"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> HttpZoneClient {
        HttpZoneClient::builder()
            .endpoint(server.uri())
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let client = HttpZoneClient::builder().build().unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3000");
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = HttpZoneClient::builder()
            .endpoint("http://olympus.local:3000/")
            .build()
            .unwrap();
        assert_eq!(client.endpoint(), "http://olympus.local:3000");
    }

    #[test]
    fn test_urlencoded() {
        assert_eq!(urlencoded("box"), "box");
        assert_eq!(urlencoded("my/zone"), "my%2Fzone");
        assert_eq!(urlencoded("50% rh"), "50%25%20rh");
    }

    #[tokio::test]
    async fn test_list_zones() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"Host": "helms-deep", "Name": "box"},
                {"Host": "rivendel", "Name": "box"}
            ])))
            .mount(&server)
            .await;

        let keys = client_for(&server).await.list_zones().await.unwrap();
        assert_eq!(
            keys,
            vec![ZoneKey::new("helms-deep", "box"), ZoneKey::new("rivendel", "box")]
        );
    }

    #[tokio::test]
    async fn test_get_zone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/host/helms-deep/zone/box"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Host": "helms-deep",
                "Name": "box",
                "Temperature": 30.0,
                "TemperatureBounds": {"Min": 15.0, "Max": 25.0},
                "Humidity": 55.0,
                "Alarms": [{"Reason": "Temperature is outside of boundaries", "On": true, "Level": 2}]
            })))
            .mount(&server)
            .await;

        let zone = client_for(&server)
            .await
            .get_zone(&ZoneKey::new("helms-deep", "box"))
            .await
            .unwrap();
        assert_eq!(zone.temperature_status(), zonewatch_types::MetricStatus::Danger);
        assert_eq!(zone.active_alarm_count(), 1);
    }

    #[tokio::test]
    async fn test_get_zone_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .get_zone(&ZoneKey::new("helms-deep", "attic"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).await.list_zones().await.unwrap_err();
        assert!(matches!(err, AdapterError::Http(_)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .get_zone(&ZoneKey::new("helms-deep", "box"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
    }
}
