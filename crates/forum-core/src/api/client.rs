//! HTTP client wrapper for the forum API.
//!
//! `ApiClient` resolves paths against a fixed base address, runs the request
//! pipeline, sends through a `Transport`, and unwraps the response envelope so
//! callers only ever see the payload or an `ApiError`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::config::Config;

use super::envelope::{error_descriptor, unwrap_payload};
use super::pipeline::Pipeline;
use super::transport::{OutgoingRequest, Transport};
use super::ApiError;

/// Query parameters and body for a single call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// API client for the forum server.
/// Clone is cheap - transport and pipeline are shared behind `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    pipeline: Arc<Pipeline>,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &Config, transport: Arc<dyn Transport>, pipeline: Pipeline) -> Self {
        Self {
            transport,
            pipeline: Arc::new(pipeline),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one request and return the envelope's `data`, unchanged.
    ///
    /// An absent or `null` payload comes back as `Value::Null`. Failures are
    /// passed to the response hooks first, then returned.
    pub async fn request_value(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let mut request = OutgoingRequest {
            method,
            path: path.to_string(),
            url: self.url(path),
            headers: HeaderMap::new(),
            query: options.query,
            body: options.body,
            timeout: self.timeout,
        };
        self.pipeline.before_send(&mut request)?;

        let outcome = match self.transport.send(&request).await {
            Ok(response) => {
                self.pipeline.on_response(&request, &response);
                if response.is_success() {
                    Ok(unwrap_payload(&response.body))
                } else {
                    Err(match error_descriptor(&response.body) {
                        Some(error) => ApiError::Rejected {
                            status: response.status,
                            error,
                        },
                        None => ApiError::from_status(response.status, &response.body),
                    })
                }
            }
            Err(e) => Err(e),
        };

        if let Err(ref e) = outcome {
            self.pipeline.on_error(&request, e);
        }
        outcome
    }

    /// Like `request_value`, decoding the payload into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = self.request_value(method, path, options).await?;
        serde_json::from_value(value).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, RequestOptions::new().query(query))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, RequestOptions::new().json(body)?)
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, RequestOptions::new().json(body)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, RequestOptions::new()).await
    }
}
