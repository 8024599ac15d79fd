use async_trait::async_trait;
use reqwest::redirect::Policy;
use serde_json::Value;
use tokio::time::sleep;

use crate::config::Config;
use crate::core::constants::export_api;
use crate::core::error::{GridProbeError, Result};
use crate::reporting::logging;

/// One export query against the transparency dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub item_id: String,
    pub start: String,
    pub end: String,
    pub timezone: String,
}

impl ExportRequest {
    pub fn new(item_id: &str, start: &str, end: &str, timezone: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            timezone: timezone.to_string(),
        }
    }

    /// Query string pairs in the order the API documents them
    pub fn query(&self) -> [(&'static str, &str); 7] {
        [
            ("id", self.item_id.as_str()),
            ("start_date", self.start.as_str()),
            ("end_date", self.end.as_str()),
            ("output_time_zone", self.timezone.as_str()),
            ("output_format", export_api::OUTPUT_FORMAT),
            ("json_header_groups", export_api::JSON_HEADER_GROUPS),
            ("download", export_api::DOWNLOAD),
        ]
    }
}

/// Anything that can answer an export query with a JSON document
#[async_trait]
pub trait ExportSource {
    async fn fetch_export(&self, request: &ExportRequest) -> Result<Value>;
}

/// HTTP implementation of [`ExportSource`]
#[derive(Debug, Clone)]
pub struct ExportClient {
    client: reqwest::Client,
    base_url: String,
    retry_attempts: u8,
    retry_delay: std::time::Duration,
}

impl ExportClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        let mut client_builder = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .redirect(Policy::limited(10))
            .user_agent(user_agent);

        if let Some(ref proxy_url) = config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                GridProbeError::Config(format!("Invalid proxy URL '{proxy_url}': {e}"))
            })?;
            client_builder = client_builder.proxy(proxy);
        }

        Ok(Self {
            client: client_builder.build()?,
            base_url: config
                .api_url
                .clone()
                .unwrap_or_else(|| export_api::BASE_URL.to_string()),
            retry_attempts: config.retry_attempts.unwrap_or(0),
            retry_delay: config.retry_delay_duration(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_with_retry(&self, request: &ExportRequest) -> Result<reqwest::Response> {
        let mut attempts = 0;
        loop {
            match self
                .client
                .get(&self.base_url)
                .query(&request.query())
                .send()
                .await
            {
                Ok(resp) => return Ok(resp),
                Err(err) if attempts < self.retry_attempts => {
                    attempts += 1;
                    logging::log_retry(&request.item_id, attempts, &err);
                    sleep(self.retry_delay).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[async_trait]
impl ExportSource for ExportClient {
    async fn fetch_export(&self, request: &ExportRequest) -> Result<Value> {
        logging::log_fetch(request);
        let response = self.send_with_retry(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GridProbeError::Api {
                dataset: request.item_id.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        logging::log_fetch_complete(&request.item_id, body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use mockito::{Matcher, Server};

    fn request() -> ExportRequest {
        ExportRequest::new(
            "activations_afrr",
            "2025-09-22T00:00:00",
            "2025-09-22T23:59:59",
            "EET",
        )
    }

    fn client_for(url: String) -> ExportClient {
        retrying_client_for(url, 0)
    }

    fn retrying_client_for(url: String, retry_attempts: u8) -> ExportClient {
        let config = Config {
            api_url: Some(url),
            retry_attempts: Some(retry_attempts),
            retry_delay: Some(1),
            ..Default::default()
        };
        ExportClient::from_config(&config).unwrap()
    }

    #[test]
    fn test_query_parameters() {
        let request = request();
        let query = request.query();
        assert_eq!(query[0], ("id", "activations_afrr"));
        assert_eq!(query[3], ("output_time_zone", "EET"));
        assert!(query.contains(&("output_format", "json")));
        assert!(query.contains(&("json_header_groups", "1")));
        assert!(query.contains(&("download", "0")));
    }

    #[test]
    fn test_from_config__defaults_to_baltic_api() {
        let client = ExportClient::from_config(&Config::default()).unwrap();
        assert_eq!(client.base_url(), export_api::BASE_URL);
    }

    #[test]
    fn test_from_config__rejects_bad_proxy() {
        let config = Config {
            proxy: Some("http://[::1".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ExportClient::from_config(&config),
            Err(GridProbeError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_export__sends_expected_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/export")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), "activations_afrr".into()),
                Matcher::UrlEncoded("start_date".into(), "2025-09-22T00:00:00".into()),
                Matcher::UrlEncoded("end_date".into(), "2025-09-22T23:59:59".into()),
                Matcher::UrlEncoded("output_time_zone".into(), "EET".into()),
                Matcher::UrlEncoded("output_format".into(), "json".into()),
                Matcher::UrlEncoded("json_header_groups".into(), "1".into()),
                Matcher::UrlEncoded("download".into(), "0".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": {"columns": [], "timeseries": []}}"#)
            .create_async()
            .await;

        let client = client_for(server.url() + "/api/v1/export");
        let document = client.fetch_export(&request()).await.unwrap();

        assert!(document.get("data").is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_export__non_success_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/export")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = client_for(server.url() + "/api/v1/export");
        let err = client.fetch_export(&request()).await.unwrap_err();

        match err {
            GridProbeError::Api { dataset, status } => {
                assert_eq!(dataset, "activations_afrr");
                assert_eq!(status, 503);
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_export__invalid_json() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/export")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = client_for(server.url() + "/api/v1/export");
        let err = client.fetch_export(&request()).await.unwrap_err();
        assert!(matches!(err, GridProbeError::Json(_)));
    }

    #[tokio::test]
    async fn test_fetch_export__retries_transport_errors() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        // Accept and immediately drop every connection
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&connections);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                seen.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });

        let client = retrying_client_for(format!("http://{addr}/api/v1/export"), 2);
        let err = client.fetch_export(&request()).await.unwrap_err();

        assert!(matches!(err, GridProbeError::Http(_)));
        assert_eq!(connections.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_export__closed_port_is_http_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let client = retrying_client_for(format!("http://{addr}/api/v1/export"), 2);
        let err = client.fetch_export(&request()).await.unwrap_err();
        assert!(matches!(err, GridProbeError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_export__status_errors_are_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/export")
            .match_query(Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let client = retrying_client_for(server.url() + "/api/v1/export", 2);
        let err = client.fetch_export(&request()).await.unwrap_err();

        assert!(matches!(err, GridProbeError::Api { status: 500, .. }));
        mock.assert_async().await;
    }
}
