//! WHOIS data sources.
//!
//! A source answers one question for one domain: here is the registration
//! record, or there is none. Everything else is an error. The service layer
//! adds validation and deadlines on top, so sources stay small.

use crate::error::DomainLookupError;
use async_trait::async_trait;

/// WHOIS client backed by the system `whois` command
pub mod whois;

pub use whois::{classify_response, CommandWhoisSource};

/// Outcome of a successful query against a WHOIS source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceResponse {
    /// A registration record, as raw text exactly as received
    Record(String),

    /// The source explicitly reported that no record exists
    NotFound,
}

/// Anything that can answer WHOIS queries.
///
/// Implementations receive an already normalized domain. Failures should use
/// `TransportError`, `Timeout`, or `UnrecognizedResponse`; "no record" is
/// reported as [`SourceResponse::NotFound`], not as an error.
#[async_trait]
pub trait WhoisSource: Send + Sync {
    /// Query the registration record for `domain`.
    async fn query(&self, domain: &str) -> Result<SourceResponse, DomainLookupError>;

    /// WHOIS server this source talks to, if it is pinned to one.
    fn server(&self) -> Option<&str> {
        None
    }
}
