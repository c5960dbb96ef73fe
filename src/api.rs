//! Async client for the inventory REST API.
//!
//! The collection endpoints are decoded into the wire shapes and
//! normalized before they leave this module, so callers only ever see
//! the canonical record types. The mutating CRUD endpoints are thin
//! pass-throughs: the server owns those payloads and this client has no
//! reason to model them.

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use time::UtcOffset;
use tracing::debug;

use crate::alert::{Alert, AlertCountDto, AlertDto, CheckOutcome, normalize_alert};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::record::wire::{CategoryDto, ManufacturerDto, PartDto, StockInDto, StockOutDto};
use crate::record::{
    Category, Manufacturer, Part, StockMovement, normalize_category, normalize_manufacturer,
    normalize_part, normalize_stock_in, normalize_stock_out,
};
use crate::session::{LoginResponseDto, Session};

/// The catalogue collections fetched together, already normalized and
/// cross resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    /// All parts, with category and manufacturer names resolved.
    pub parts: Vec<Part>,
    /// The category lookup collection.
    pub categories: Vec<Category>,
    /// The manufacturer lookup collection.
    pub manufacturers: Vec<Manufacturer>,
}

/// Client for the inventory API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the API at `config.base_url`.
    ///
    /// The base URL must be an absolute URL; a trailing slash is
    /// tolerated and trimmed.
    pub fn new(config: &ClientConfig) -> Result<ApiClient, Error> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        Url::parse(&base_url).map_err(|_| Error::InvalidBaseUrl(base_url.clone()))?;

        Ok(ApiClient {
            client: Client::new(),
            base_url,
        })
    }

    // ========================================================================
    // COLLECTION FETCHES
    // ========================================================================

    /// Fetches parts, categories, and manufacturers concurrently and
    /// normalizes them against each other.
    pub async fn fetch_catalogue(&self) -> Result<Catalogue, Error> {
        let (parts, categories, manufacturers) = tokio::try_join!(
            self.get_json::<Vec<PartDto>>("/spare_parts"),
            self.get_json::<Vec<CategoryDto>>("/categories"),
            self.get_json::<Vec<ManufacturerDto>>("/manufacturers"),
        )?;

        Ok(Catalogue {
            parts: parts
                .iter()
                .map(|part| normalize_part(part, &categories, &manufacturers))
                .collect(),
            categories: categories.iter().map(normalize_category).collect(),
            manufacturers: manufacturers.iter().map(normalize_manufacturer).collect(),
        })
    }

    /// Fetches the stock receipts, resolving part names against
    /// `parts` and taking record dates in `offset`.
    pub async fn fetch_stock_in(
        &self,
        parts: &[Part],
        offset: UtcOffset,
    ) -> Result<Vec<StockMovement>, Error> {
        let records = self.get_json::<Vec<StockInDto>>("/stock_in").await?;

        Ok(records
            .iter()
            .map(|record| normalize_stock_in(record, parts, offset))
            .collect())
    }

    /// Fetches the stock issues, resolving part names against `parts`
    /// and taking record dates in `offset`.
    pub async fn fetch_stock_out(
        &self,
        parts: &[Part],
        offset: UtcOffset,
    ) -> Result<Vec<StockMovement>, Error> {
        let records = self.get_json::<Vec<StockOutDto>>("/stock_out").await?;

        Ok(records
            .iter()
            .map(|record| normalize_stock_out(record, parts, offset))
            .collect())
    }

    /// Fetches the server's view of which parts are below threshold.
    pub async fn fetch_low_stock(&self) -> Result<Vec<Part>, Error> {
        let records = self.get_json::<Vec<PartDto>>("/low_stock").await?;

        Ok(records
            .iter()
            .map(|record| normalize_part(record, &[], &[]))
            .collect())
    }

    // ========================================================================
    // ALERT LIFECYCLE
    // ========================================================================

    /// Fetches the open alerts.
    pub async fn fetch_open_alerts(&self) -> Result<Vec<Alert>, Error> {
        let records = self.get_json::<Vec<AlertDto>>("/alerts?status=open").await?;

        Ok(records.iter().map(normalize_alert).collect())
    }

    /// Asks the server to rescan stock levels against thresholds.
    pub async fn check_alerts(&self) -> Result<CheckOutcome, Error> {
        let value = self.send_value(Method::POST, "/alerts/check", None).await?;

        decode("/alerts/check", value)
    }

    /// Marks one alert as resolved.
    pub async fn resolve_alert(&self, alert_id: &str) -> Result<Value, Error> {
        self.send_value(
            Method::POST,
            &format!("/alerts/resolve/{alert_id}"),
            None,
        )
        .await
    }

    /// Fetches the open alert count shown on the navigation badge.
    pub async fn fetch_alert_count(&self) -> Result<u32, Error> {
        let count = self.get_json::<AlertCountDto>("/alerts/count").await?;

        Ok(count.count())
    }

    // ========================================================================
    // SESSION
    // ========================================================================

    /// Signs in and returns the established session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, Error> {
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self.send_value(Method::POST, "/login", Some(&body)).await?;

        let response: LoginResponseDto = decode("/login", value)?;
        let user = response
            .user
            .ok_or_else(|| {
                Error::Decode("/login".to_string(), "response carried no user".to_string())
            })?
            .into_user();

        Ok(Session { user })
    }

    // ========================================================================
    // PASS-THROUGH CRUD
    // ========================================================================

    /// Creates a part. The payload is forwarded untouched.
    pub async fn create_part(&self, body: &Value) -> Result<Value, Error> {
        self.send_value(Method::POST, "/spare_parts", Some(body))
            .await
    }

    /// Updates a part. The payload is forwarded untouched.
    pub async fn update_part(&self, part_id: &str, body: &Value) -> Result<Value, Error> {
        self.send_value(Method::PUT, &format!("/spare_parts/{part_id}"), Some(body))
            .await
    }

    /// Deletes a part.
    pub async fn delete_part(&self, part_id: &str) -> Result<Value, Error> {
        self.send_value(Method::DELETE, &format!("/spare_parts/{part_id}"), None)
            .await
    }

    /// Records a stock receipt. The payload is forwarded untouched.
    pub async fn create_stock_in(&self, body: &Value) -> Result<Value, Error> {
        self.send_value(Method::POST, "/stock_in", Some(body)).await
    }

    /// Records a stock issue. The payload is forwarded untouched.
    pub async fn create_stock_out(&self, body: &Value) -> Result<Value, Error> {
        self.send_value(Method::POST, "/stock_out", Some(body)).await
    }

    /// Creates a category. The payload is forwarded untouched.
    pub async fn create_category(&self, body: &Value) -> Result<Value, Error> {
        self.send_value(Method::POST, "/categories", Some(body))
            .await
    }

    /// Creates a manufacturer. The payload is forwarded untouched.
    pub async fn create_manufacturer(&self, body: &Value) -> Result<Value, Error> {
        self.send_value(Method::POST, "/manufacturers", Some(body))
            .await
    }

    /// Deletes a manufacturer.
    pub async fn delete_manufacturer(&self, manufacturer_id: &str) -> Result<Value, Error> {
        self.send_value(
            Method::DELETE,
            &format!("/manufacturers/{manufacturer_id}"),
            None,
        )
        .await
    }

    // ========================================================================
    // TRANSPORT
    // ========================================================================

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|error| Error::Fetch(endpoint.to_string(), error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiStatus(endpoint.to_string(), status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|error| Error::Decode(endpoint.to_string(), error.to_string()))
    }

    async fn send_value(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{method} {url}");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|error| Error::Fetch(endpoint.to_string(), error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiStatus(endpoint.to_string(), status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|error| Error::Decode(endpoint.to_string(), error.to_string()))
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, Error> {
    serde_json::from_value(value)
        .map_err(|error| Error::Decode(endpoint.to_string(), error.to_string()))
}

#[cfg(test)]
mod api_client_tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::ApiClient;
    use crate::config::ClientConfig;
    use crate::error::Error;

    fn client_for(base_url: &str) -> Result<ApiClient, Error> {
        let config = ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        };

        ApiClient::new(&config)
    }

    /// Serves exactly one canned HTTP response on a fresh local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;

            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{address}")
    }

    #[test]
    fn rejects_relative_base_url() {
        let got = client_for("localhost:5050/api");

        assert!(matches!(got, Err(Error::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn decodes_collection_response() {
        let base_url = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"CategoryID": 1, "CategoryName": "Brakes"}]"#,
        )
        .await;
        let client = client_for(&base_url).unwrap();

        let catalogue_entry: Vec<crate::record::wire::CategoryDto> =
            client.get_json("/categories").await.unwrap();

        assert_eq!(catalogue_entry.len(), 1);
        assert_eq!(catalogue_entry[0].name.as_deref(), Some("Brakes"));
    }

    #[tokio::test]
    async fn non_success_status_maps_to_api_status() {
        let base_url = serve_once("HTTP/1.1 500 Internal Server Error", "{}").await;
        let client = client_for(&base_url).unwrap();

        let got = client.fetch_alert_count().await;

        assert_eq!(
            got,
            Err(Error::ApiStatus("/alerts/count".to_string(), 500))
        );
    }

    #[tokio::test]
    async fn malformed_body_maps_to_decode() {
        let base_url = serve_once("HTTP/1.1 200 OK", "not json").await;
        let client = client_for(&base_url).unwrap();

        let got = client.fetch_alert_count().await;

        assert!(matches!(got, Err(Error::Decode(endpoint, _)) if endpoint == "/alerts/count"));
    }
}
