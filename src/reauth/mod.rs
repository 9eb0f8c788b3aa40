//! Reauthentication subsystem.
//!
//! # Data Flow
//! ```text
//! 401 response from the HTTP pipeline
//!     → lineage.rs (ChallengeResponse + ordered prior attempts)
//!     → coordinator.rs (ignore check → attempt count → bound check)
//!     → callback.rs (reauthenticate | unable_to_authenticate)
//!     → Resolution handed back to the pipeline
//! ```
//!
//! # Design Decisions
//! - Coordinator is immutable after construction and shared via Arc
//! - Lineage is an explicit Vec of attempts, never a persisted counter
//! - Ignore header is checked on the original request only
//! - Callbacks are synchronous and may block; callers run them off the async workers
//! - Callback errors are never swallowed

pub mod callback;
pub mod coordinator;
pub mod lineage;
pub mod request;
pub mod route;

pub use callback::{Callback, CallbackError, FnCallback};
pub use coordinator::{Coordinator, CoordinatorBuilder, Resolution};
pub use lineage::{lineage_length, Attempt, ChallengeResponse, Lineage};
pub use request::Request;
pub use route::Route;
