//! Internal HTTP client for the Oracle VM Manager REST API.

use crate::core::domain::{
    error::{OvmError, OvmResult, ValidationError},
    model::{ovm_config::OvmConfig, ovm_connection::OvmConnection},
};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    Client, Method, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// Internal HTTP client that authenticates every call and speaks JSON.
///
/// The manager uses HTTP basic authentication, so there is no session
/// ticket to refresh: credentials are attached to each request. One client
/// is built per invocation and shared by reference between the services.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<OvmConnection>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Errors
    /// Returns `OvmError::Validation` for an unusable rate limit and
    /// `OvmError::Connection` if the HTTP client cannot be built.
    pub fn new(connection: OvmConnection, config: &OvmConfig) -> OvmResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.request_timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| OvmError::Connection(e.to_string()))?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let per_second = NonZeroU32::new(rl.requests_per_second).ok_or_else(|| {
                    ValidationError::Field {
                        field: "rate_limit.requests_per_second".to_string(),
                        message: "Must be greater than zero".to_string(),
                    }
                })?;
                let burst = NonZeroU32::new(rl.burst_size).ok_or_else(|| ValidationError::Field {
                    field: "rate_limit.burst_size".to_string(),
                    message: "Must be greater than zero".to_string(),
                })?;
                let quota = Quota::per_second(per_second).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        Ok(Self {
            http_client,
            connection: Arc::new(connection),
            rate_limiter,
        })
    }

    /// Performs a GET request.
    ///
    /// # Errors
    /// Returns `OvmError` if the request fails or the response cannot be parsed.
    pub async fn get<T>(&self, path: &str) -> OvmResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.execute_request(Method::GET, path, &[], None::<&()>)
            .await
    }

    /// Performs a POST request with a JSON body.
    ///
    /// # Errors
    /// Returns `OvmError` if the request fails or the response cannot be parsed.
    pub async fn post<B, T>(&self, path: &str, query: &[(&str, &str)], body: &B) -> OvmResult<T>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        self.execute_request(Method::POST, path, query, Some(body))
            .await
    }

    /// Performs a PUT request with a JSON body.
    ///
    /// # Errors
    /// Returns `OvmError` if the request fails or the response cannot be parsed.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> OvmResult<T>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        self.execute_request(Method::PUT, path, &[], Some(body))
            .await
    }

    /// Performs a body-less PUT, the form the manager uses for verbs such as
    /// `start` or `releaseOwnership`.
    ///
    /// # Errors
    /// Returns `OvmError` if the request fails or the response cannot be parsed.
    pub async fn put_action<T>(&self, path: &str, query: &[(&str, &str)]) -> OvmResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.execute_request(Method::PUT, path, query, None::<&()>)
            .await
    }

    /// Performs a DELETE request.
    ///
    /// # Errors
    /// Returns `OvmError` if the request fails or the response cannot be parsed.
    pub async fn delete<T>(&self, path: &str) -> OvmResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.execute_request(Method::DELETE, path, &[], None::<&()>)
            .await
    }

    /// Core request execution method: builds the URL, applies rate limiting
    /// and credentials, sends the request and parses the response.
    async fn execute_request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> OvmResult<T>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let mut url = self.connection.url().endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!(%method, %url, "sending request");

        let mut req_builder = self
            .http_client
            .request(method.clone(), url.clone())
            .basic_auth(
                self.connection.username().as_str(),
                Some(self.connection.password().as_str()),
            );

        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                OvmError::Connection(format!("HTTP request timed out: {}", e))
            } else {
                OvmError::Connection(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(OvmError::Authentication(format!(
                "Manager rejected credentials for {} {} ({})",
                method,
                url.path(),
                status
            )));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(OvmError::Connection(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        response.json::<T>().await.map_err(|e| {
            OvmError::UnexpectedResponse(format!(
                "Failed to parse response of {} {}: {}",
                method,
                url.path(),
                e
            ))
        })
    }
}
