//! Authenticating HTTP client.
//!
//! # Responsibilities
//! - Send requests through `reqwest`
//! - Call the coordinator on every 401, with the lineage built so far
//! - Resubmit the reauthenticated request, or return the 401 to the caller
//!
//! # Design Decisions
//! - Coordinator runs under `spawn_blocking`; callbacks may block freely
//! - Interceptors run once on the original request, never on retries
//! - No timeout is layered over callbacks; reqwest timeouts apply per attempt
//! - One UUID per lineage, carried on the tracing span

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Response, StatusCode};
use tracing::Instrument;
use url::Url;

use crate::config::ClientConfig;
use crate::http::error::ClientError;
use crate::http::interceptor::RequestInterceptor;
use crate::observability::metrics;
use crate::reauth::{ChallengeResponse, Coordinator, Lineage, Request, Route};

/// HTTP client that reauthenticates on 401.
#[derive(Clone)]
pub struct AuthenticatingClient {
    http: reqwest::Client,
    coordinator: Arc<Coordinator>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl AuthenticatingClient {
    /// Create a client with the given configuration.
    pub fn new(config: &ClientConfig, coordinator: Arc<Coordinator>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .user_agent(&config.user_agent);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            coordinator,
            interceptors: Vec::new(),
        })
    }

    /// Add an interceptor. Interceptors run in insertion order.
    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    /// GET a URL.
    pub async fn get(&self, url: &str) -> Result<Response, ClientError> {
        let url = Url::parse(url)?;
        self.execute(Request::get(url)).await
    }

    /// Send a request, reauthenticating on 401 until the coordinator stops.
    ///
    /// Returns the first non-401 response, or the last 401 when the
    /// coordinator declines to retry.
    pub async fn execute(&self, request: Request) -> Result<Response, ClientError> {
        let mut request = request;
        for interceptor in &self.interceptors {
            interceptor.intercept(&mut request);
        }

        let lineage = Lineage::new();
        let span = tracing::info_span!(
            "lineage",
            id = %lineage.id(),
            method = %request.method(),
            url = %request.url(),
        );
        self.run_lineage(request, lineage).instrument(span).await
    }

    async fn run_lineage(
        &self,
        mut request: Request,
        mut lineage: Lineage,
    ) -> Result<Response, ClientError> {
        loop {
            let start = Instant::now();
            let outgoing = request.clone().into_reqwest(&self.http)?;
            let response = self.http.execute(outgoing).await?;
            let status = response.status();
            metrics::record_request(request.method().as_str(), status.as_u16(), start);

            if status != StatusCode::UNAUTHORIZED {
                tracing::debug!(status = %status, attempts = lineage.len() + 1, "Request completed");
                return Ok(response);
            }

            let route = Route::for_url(request.url()).with_remote_addr(response.remote_addr());
            let challenge =
                ChallengeResponse::new(request, status, response.headers().clone(), lineage);
            tracing::debug!(attempt = challenge.attempt_count(), route = %route, "Authentication challenge");

            let coordinator = Arc::clone(&self.coordinator);
            let span = tracing::Span::current();
            let (challenge, next) = tokio::task::spawn_blocking(move || {
                let next = span.in_scope(|| coordinator.resolve(&route, &challenge));
                (challenge, next)
            })
            .await?;

            match next? {
                Some(next) => {
                    lineage = challenge.into_lineage();
                    request = next;
                }
                None => return Ok(response),
            }
        }
    }
}

impl std::fmt::Debug for AuthenticatingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatingClient")
            .field("coordinator", &self.coordinator)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
