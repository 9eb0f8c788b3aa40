//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! coordinator + HTTP client produce:
//!     → logging.rs (structured log events, lineage ID on every span)
//!     → metrics.rs (resolution counters, request latency)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Whatever metrics recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Lineage ID flows through every attempt of one request
//! - The library never installs a metrics exporter itself

pub mod logging;
pub mod metrics;
