//! Request interceptors.
//!
//! # Responsibilities
//! - Transform a request once, before its first attempt is sent
//! - Attach whatever credential the last reauthentication produced
//!
//! # Design Decisions
//! - Interceptors carry no decision logic; the coordinator never sees them
//! - The credential slot is an `ArcSwapOption` so callbacks running on the
//!   blocking pool can swap it without locking the request path

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::header::{HeaderName, HeaderValue};

use crate::reauth::Request;

/// A request-transforming step run before the first attempt.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut Request);
}

/// Attaches a shared credential header to outgoing requests.
///
/// Clones share the same slot, so one clone can live in the client and
/// another in the reauthentication callback.
#[derive(Clone)]
pub struct CredentialInterceptor {
    header: HeaderName,
    credential: Arc<ArcSwapOption<HeaderValue>>,
}

impl CredentialInterceptor {
    pub fn new(header: HeaderName) -> Self {
        Self {
            header,
            credential: Arc::new(ArcSwapOption::empty()),
        }
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// Replace the current credential.
    pub fn set(&self, value: HeaderValue) {
        self.credential.store(Some(Arc::new(value)));
    }

    pub fn clear(&self) {
        self.credential.store(None);
    }

    pub fn current(&self) -> Option<HeaderValue> {
        self.credential.load_full().map(|value| (*value).clone())
    }
}

impl RequestInterceptor for CredentialInterceptor {
    fn intercept(&self, request: &mut Request) {
        if let Some(value) = self.credential.load_full() {
            request
                .headers_mut()
                .insert(self.header.clone(), (*value).clone());
        }
    }
}

impl std::fmt::Debug for CredentialInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialInterceptor")
            .field("header", &self.header)
            .field("credential", &"[REDACTED]")
            .finish()
    }
}
