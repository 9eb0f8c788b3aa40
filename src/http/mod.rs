//! HTTP client pipeline.
//!
//! # Data Flow
//! ```text
//! caller Request
//!     → interceptor.rs (attach credential, once)
//!     → client.rs (send attempt)
//!     → 401? build ChallengeResponse + Lineage
//!     → Coordinator on the blocking pool
//!     → resubmit returned request, or hand the 401 back
//! ```

pub mod client;
pub mod error;
pub mod interceptor;

pub use client::AuthenticatingClient;
pub use error::ClientError;
pub use interceptor::{CredentialInterceptor, RequestInterceptor};
