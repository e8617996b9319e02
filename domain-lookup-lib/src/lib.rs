//! # Domain Lookup Library
//!
//! Check whether a domain name is registered and fetch its raw WHOIS record.
//!
//! Lookups go through a [`WhoisSource`]. The default source runs the system
//! `whois` client; tests and embedders can supply their own. Every outcome is
//! classified into a typed result or a [`DomainLookupError`]. A failed lookup
//! is never reported as "available".
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_lookup_lib::DomainLookupService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = DomainLookupService::new();
//!
//!     let result = service.check_availability("example.com").await?;
//!     println!("Domain: {} - Available: {}", result.domain, result.available);
//!
//!     if !result.available {
//!         let record = service.fetch_record("example.com").await?;
//!         println!("{}", record.raw_text);
//!     }
//!     Ok(())
//! }
//! ```

// Re-export main public API types and functions
pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
    OutputConfig, WhoisConfig, MAX_CONCURRENCY,
};
pub use error::DomainLookupError;
pub use protocols::whois::is_command_available;
pub use protocols::{classify_response, CommandWhoisSource, SourceResponse, WhoisSource};
pub use service::DomainLookupService;
pub use types::{AvailabilityResult, DomainStatus, LookupConfig, WhoisRecord};
pub use utils::{expand_domain_inputs, normalize_domain};

mod config;
mod error;
mod protocols;
mod service;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainLookupError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
