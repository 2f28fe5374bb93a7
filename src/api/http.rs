// src/api/http.rs
//! Thin request layer shared by both backend clients.
//!
//! Handles URL building, timeouts, and the one rule every endpoint follows:
//! a non-2xx response becomes [`ApiError::Http`] carrying the body text.

use bytes::Bytes;
use log::{debug, warn};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::api::error::{extract_error_message, ApiError};

/// Base-URL bound HTTP client.
///
/// Cloning is cheap: `reqwest::Client` keeps its connection pool behind an `Arc`.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Creates a client for one backend.
    ///
    /// # Arguments
    /// * `base_url` - Scheme, host and port, without a trailing slash
    /// * `timeout` - Per-request timeout covering connect and body transfer
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("esign-console/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `path` (which must start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.client.get(self.url(path)), "GET", path).await?;
        decode_json(response).await
    }

    /// GET returning the raw body text, for endpoints with unstable shapes.
    pub async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let response = self.send(self.client.get(self.url(path)), "GET", path).await?;
        Ok(response.text().await?)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.send(request, "POST", path).await?;
        decode_json(response).await
    }

    /// Multipart POST whose response is a binary file.
    pub async fn post_multipart_bytes(
        &self,
        path: &str,
        query: &[(&str, &str)],
        form: Form,
    ) -> Result<(Bytes, HeaderMap), ApiError> {
        let request = self.client.post(self.url(path)).query(query).multipart(form);
        let response = self.send(request, "POST", path).await?;
        let headers = response.headers().clone();
        Ok((response.bytes().await?, headers))
    }

    /// Multipart POST whose response is a JSON report.
    pub async fn post_multipart_json<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.url(path)).multipart(form);
        let response = self.send(request, "POST", path).await?;
        decode_json(response).await
    }

    /// `text/plain` POST whose response is a binary file.
    pub async fn post_text_bytes(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: String,
    ) -> Result<Bytes, ApiError> {
        let request = self
            .client
            .post(self.url(path))
            .query(query)
            .header(CONTENT_TYPE, "text/plain")
            .body(body);
        let response = self.send(request, "POST", path).await?;
        Ok(response.bytes().await?)
    }

    async fn send(&self, request: RequestBuilder, method: &str, path: &str) -> Result<Response, ApiError> {
        debug!("{} {}", method, self.url(path));
        let response = request.send().await?;
        check_status(response, method, path).await
    }
}

/// Turns non-2xx responses into [`ApiError::Http`].
async fn check_status(response: Response, method: &str, path: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // A body that cannot be read is treated like an empty one.
    let body = response.text().await.unwrap_or_default();
    warn!("{} {} failed with HTTP {}", method, path, status.as_u16());
    Err(ApiError::Http {
        status: status.as_u16(),
        message: extract_error_message(&body),
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Boolean form fields are sent as `"true"` / `"false"` text parts.
pub fn bool_field(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
