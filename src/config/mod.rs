//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → ReauthConfig handed to the Coordinator, the rest to the HTTP client
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the coordinator never sees a reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::ObservabilityConfig;
pub use schema::ReauthConfig;
pub use schema::TimeoutConfig;
pub use validation::ValidationError;
