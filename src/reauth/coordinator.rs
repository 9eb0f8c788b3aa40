//! Reauthentication retry coordinator.
//!
//! # States
//! - Ignored: the original request carries the ignore header
//! - Exhausted: the lineage reached the retry bound, terminal callback called
//! - Retry: the reauthenticate callback produced a request to resubmit
//! - Declined: the reauthenticate callback returned no request
//!
//! # Decision Order
//! ```text
//! ignore header on original request? → Ignored
//! attempts >= retry_bound?            → unable_to_authenticate → Exhausted
//! reauthenticate()                    → Some(request) → Retry
//!                                     → None          → Declined
//! ```
//!
//! The coordinator holds no mutable state and does no I/O. It is safe to call
//! from any number of threads at once.

use std::fmt;

use reqwest::header::HeaderName;

use crate::config::validation::{ignore_header_name, ValidationError};
use crate::config::ReauthConfig;
use crate::observability::metrics;
use crate::reauth::callback::{Callback, CallbackError};
use crate::reauth::lineage::{lineage_length, ChallengeResponse};
use crate::reauth::request::Request;
use crate::reauth::route::Route;

/// Outcome of one challenge.
#[derive(Debug, Clone)]
pub enum Resolution {
    Ignored,
    Retry(Request),
    Declined,
    Exhausted,
}

impl Resolution {
    /// Metric/log label.
    pub fn outcome(&self) -> &'static str {
        match self {
            Resolution::Ignored => "ignored",
            Resolution::Retry(_) => "retry",
            Resolution::Declined => "declined",
            Resolution::Exhausted => "exhausted",
        }
    }

    /// The request to resubmit, if any.
    pub fn into_request(self) -> Option<Request> {
        match self {
            Resolution::Retry(request) => Some(request),
            _ => None,
        }
    }
}

/// Decides what happens to each 401.
pub struct Coordinator {
    retry_bound: u32,
    ignore_header: HeaderName,
    notify_on_decline: bool,
    callback: Box<dyn Callback>,
}

impl Coordinator {
    /// Build a coordinator, rejecting a zero retry bound or an unusable
    /// ignore header.
    pub fn new(
        config: ReauthConfig,
        callback: impl Callback + 'static,
    ) -> Result<Self, ValidationError> {
        Self::with_boxed(config, Box::new(callback))
    }

    fn with_boxed(
        config: ReauthConfig,
        callback: Box<dyn Callback>,
    ) -> Result<Self, ValidationError> {
        if config.retry_bound == 0 {
            return Err(ValidationError::ZeroRetryBound);
        }
        let ignore_header = ignore_header_name(&config.ignore_header)?;

        Ok(Self {
            retry_bound: config.retry_bound,
            ignore_header,
            notify_on_decline: config.notify_on_decline,
            callback,
        })
    }

    /// Start a builder with default settings.
    pub fn builder(callback: impl Callback + 'static) -> CoordinatorBuilder {
        CoordinatorBuilder {
            config: ReauthConfig::default(),
            callback: Box::new(callback),
        }
    }

    pub fn retry_bound(&self) -> u32 {
        self.retry_bound
    }

    pub fn ignore_header(&self) -> &HeaderName {
        &self.ignore_header
    }

    /// Decide whether to retry. Returns the request to resubmit, or `None`
    /// to hand the 401 back to the caller.
    pub fn resolve(
        &self,
        route: &Route,
        response: &ChallengeResponse,
    ) -> Result<Option<Request>, CallbackError> {
        self.decide(route, response).map(Resolution::into_request)
    }

    /// Like [`resolve`](Self::resolve) but reports which path was taken.
    pub fn decide(
        &self,
        route: &Route,
        response: &ChallengeResponse,
    ) -> Result<Resolution, CallbackError> {
        let lineage_id = response.lineage().id();

        if response.original_request().has_header(&self.ignore_header) {
            tracing::debug!(
                lineage = %lineage_id,
                header = %self.ignore_header,
                "Challenge ignored for opted-out request"
            );
            return Ok(record(Resolution::Ignored));
        }

        let attempts = lineage_length(response);
        if attempts >= self.retry_bound as usize {
            tracing::warn!(
                lineage = %lineage_id,
                route = %route,
                attempts,
                retry_bound = self.retry_bound,
                "Retry bound reached, unable to authenticate"
            );
            self.callback.unable_to_authenticate(route, response)?;
            return Ok(record(Resolution::Exhausted));
        }

        match self.callback.reauthenticate(route, response)? {
            Some(request) => {
                tracing::info!(
                    lineage = %lineage_id,
                    route = %route,
                    attempts,
                    "Retrying with reauthenticated request"
                );
                Ok(record(Resolution::Retry(request)))
            }
            None => {
                tracing::info!(
                    lineage = %lineage_id,
                    route = %route,
                    attempts,
                    "Reauthentication declined"
                );
                if self.notify_on_decline {
                    self.callback.unable_to_authenticate(route, response)?;
                }
                Ok(record(Resolution::Declined))
            }
        }
    }
}

fn record(resolution: Resolution) -> Resolution {
    metrics::record_resolution(resolution.outcome());
    resolution
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("retry_bound", &self.retry_bound)
            .field("ignore_header", &self.ignore_header)
            .field("notify_on_decline", &self.notify_on_decline)
            .finish_non_exhaustive()
    }
}

/// Named-setter construction for [`Coordinator`].
pub struct CoordinatorBuilder {
    config: ReauthConfig,
    callback: Box<dyn Callback>,
}

impl CoordinatorBuilder {
    /// Attempts before giving up. Defaults to 3.
    pub fn retry_bound(mut self, retry_bound: u32) -> Self {
        self.config.retry_bound = retry_bound;
        self
    }

    /// Header that exempts a request from reauthentication.
    pub fn ignore_header(mut self, ignore_header: impl Into<String>) -> Self {
        self.config.ignore_header = ignore_header.into();
        self
    }

    pub fn notify_on_decline(mut self, notify: bool) -> Self {
        self.config.notify_on_decline = notify;
        self
    }

    pub fn build(self) -> Result<Coordinator, ValidationError> {
        Coordinator::with_boxed(self.config, self.callback)
    }
}
