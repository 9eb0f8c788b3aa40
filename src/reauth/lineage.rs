//! Challenge responses and their retry lineage.
//!
//! # Responsibilities
//! - Capture the request/response pair that produced a 401
//! - Keep every prior attempt of the same request, oldest first
//! - Count attempts as a pure function of the lineage
//!
//! # Design Decisions
//! - The lineage is an explicit ordered list, not a back-reference chain
//! - The original request is the oldest attempt, or the current request when
//!   no retry has happened yet
//! - Response bodies are not kept; only status and headers matter here

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::reauth::request::Request;

/// A request that was sent and the response head it got back.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub request: Request,
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Prior attempts of one original request.
#[derive(Debug, Clone)]
pub struct Lineage {
    id: Uuid,
    attempts: Vec<Attempt>,
}

impl Lineage {
    /// Start an empty lineage with a fresh correlation ID.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            attempts: Vec::new(),
        }
    }

    /// Correlation ID shared by every attempt in this lineage.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn push(&mut self, attempt: Attempt) {
        self.attempts.push(attempt);
    }
}

impl Default for Lineage {
    fn default() -> Self {
        Self::new()
    }
}

/// A 401 response together with the request that produced it and every
/// attempt that came before it.
#[derive(Debug, Clone)]
pub struct ChallengeResponse {
    request: Request,
    status: StatusCode,
    headers: HeaderMap,
    lineage: Lineage,
}

impl ChallengeResponse {
    pub fn new(request: Request, status: StatusCode, headers: HeaderMap, lineage: Lineage) -> Self {
        Self {
            request,
            status,
            headers,
            lineage,
        }
    }

    /// The request whose response was challenged.
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Attempts made before this one.
    pub fn lineage(&self) -> &Lineage {
        &self.lineage
    }

    /// The first request of the lineage.
    pub fn original_request(&self) -> &Request {
        self.lineage
            .attempts
            .first()
            .map(|attempt| &attempt.request)
            .unwrap_or(&self.request)
    }

    /// Number of attempts so far, this one included.
    pub fn attempt_count(&self) -> usize {
        lineage_length(self)
    }

    /// Move this challenge into its lineage, ready for the next attempt.
    pub fn into_lineage(self) -> Lineage {
        let mut lineage = self.lineage;
        lineage.push(Attempt {
            request: self.request,
            status: self.status,
            headers: self.headers,
        });
        lineage
    }
}

/// Length of the lineage ending at `response`. The original request counts
/// as attempt 1.
pub fn lineage_length(response: &ChallengeResponse) -> usize {
    response.lineage.len() + 1
}
