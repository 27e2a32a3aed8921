//! HTTP client wrapper around reqwest
//!
//! Performs exactly one outbound request per call and decodes the body as
//! JSON regardless of status. Non-2xx responses are returned to the
//! caller, not turned into errors; transport failures and undecodable
//! bodies surface as [`FetchError`]. Retries, caching and rate limiting
//! are left to the integrating application.

use crate::config::OutgoingSettings;
use crate::error::FetchError;
use crate::providers::{HttpMethod, ProviderRequest};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// A decoded response body paired with the HTTP status code.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub response: T,
    pub status: u16,
}

/// HTTP client shared by all provider adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with default outgoing settings.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a client from caller-supplied outgoing settings. The request
    /// timeout lives here, on the client, not in the per-call fetch path.
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Issue one request and decode the JSON body.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: ProviderRequest,
    ) -> Result<Fetched<T>, FetchError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        builder = builder.header("Content-Type", "application/json");
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        debug!(url = %request.url, status, "provider request completed");

        let text = response.text().await?;
        let decoded = serde_json::from_str(&text)?;

        Ok(Fetched {
            response: decoded,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn client_creation_succeeds() {
        assert!(HttpClient::new().is_ok());
    }

    #[tokio::test]
    async fn non_2xx_status_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "denied"})))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = ProviderRequest::get(format!("{}/search", server.uri()));
        let fetched: Fetched<Value> = client.fetch(request).await.unwrap();

        assert_eq!(fetched.status, 403);
        assert_eq!(fetched.response["error"], "denied");
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = ProviderRequest::get(server.uri());
        let result: Result<Fetched<Value>, _> = client.fetch(request).await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn posts_json_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(wiremock::matchers::header("X-Test", "1"))
            .and(wiremock::matchers::body_json(json!({"input": "berlin"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = ProviderRequest::post(server.uri())
            .header("X-Test", "1")
            .json(json!({"input": "berlin"}));
        let fetched: Fetched<Value> = client.fetch(request).await.unwrap();

        assert_eq!(fetched.response["ok"], true);
    }
}
