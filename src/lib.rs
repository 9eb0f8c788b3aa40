//! Reauthentication retry coordinator for HTTP clients.
//!
//! When a response comes back `401 Unauthorized`, the [`Coordinator`] decides
//! whether to ignore it, retry with a reauthenticated request produced by a
//! caller-supplied [`Callback`], or give up and report that authentication is
//! impossible. [`AuthenticatingClient`] drives it from a `reqwest` pipeline.
//!
//! ```text
//!   Request ──▶ interceptors ──▶ send ──▶ 200 ──▶ caller
//!                                  │
//!                                 401
//!                                  ▼
//!                       ┌─────────────────────┐
//!                       │     Coordinator     │  (blocking pool)
//!                       │ ignore? bound? ask  │──▶ Callback
//!                       └─────────┬───────────┘
//!                   Some(request) │ None
//!                  ◀──────────────┴──────────▶ 401 to caller
//! ```

pub mod cli;
pub mod config;
pub mod http;
pub mod observability;
pub mod reauth;

pub use config::ClientConfig;
pub use http::{AuthenticatingClient, ClientError, CredentialInterceptor, RequestInterceptor};
pub use reauth::{Callback, CallbackError, ChallengeResponse, Coordinator, FnCallback, Request, Resolution, Route};
