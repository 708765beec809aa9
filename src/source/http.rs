//! HTTP-backed zone source.

use async_trait::async_trait;
use zonewatch_adapters::http::HttpZoneClient;
use zonewatch_adapters::AdapterError;
use zonewatch_types::{Zone, ZoneKey};

use super::ZoneSource;

/// A zone source that queries the monitoring server's JSON API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: HttpZoneClient,
    description: String,
}

impl HttpSource {
    /// Wrap an already configured client.
    pub fn new(client: HttpZoneClient) -> Self {
        let description = format!("http: {}", client.endpoint());
        Self {
            client,
            description,
        }
    }

    pub fn client(&self) -> &HttpZoneClient {
        &self.client
    }
}

#[async_trait]
impl ZoneSource for HttpSource {
    async fn list_zones(&self) -> Result<Vec<ZoneKey>, AdapterError> {
        self.client.list_zones().await
    }

    async fn get_zone(&self, key: &ZoneKey) -> Result<Zone, AdapterError> {
        self.client.get_zone(key).await
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_source_description() {
        let client = HttpZoneClient::builder()
            .endpoint("http://olympus.local:3000/")
            .build()
            .unwrap();
        let source = HttpSource::new(client);
        assert_eq!(source.description(), "http: http://olympus.local:3000");
        assert_eq!(source.client().endpoint(), "http://olympus.local:3000");
    }

    #[tokio::test]
    async fn test_http_source_unreachable_is_error() {
        let client = HttpZoneClient::builder()
            .endpoint("http://127.0.0.1:1")
            .timeout(std::time::Duration::from_millis(500))
            .build()
            .unwrap();
        let source = HttpSource::new(client);
        assert!(source.list_zones().await.is_err());
    }
}
