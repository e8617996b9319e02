//! Domain lookup service.
//!
//! This module provides [`DomainLookupService`], the entry point for both
//! availability checks and raw WHOIS record retrieval.

use crate::error::DomainLookupError;
use crate::protocols::{CommandWhoisSource, SourceResponse, WhoisSource};
use crate::types::{AvailabilityResult, DomainStatus, LookupConfig, WhoisRecord};
use crate::utils::normalize_domain;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Stateless lookup service over a [`WhoisSource`].
///
/// Each call validates the input, performs exactly one source query under a
/// deadline, and classifies the outcome. Nothing is cached between calls.
/// Cloning is cheap; clones share the same source.
///
/// # Example
///
/// ```rust,no_run
/// use domain_lookup_lib::DomainLookupService;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = DomainLookupService::new();
///     let result = service.check_availability("example.com").await?;
///     println!("{} available: {}", result.domain, result.available);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DomainLookupService {
    source: Arc<dyn WhoisSource>,
    timeout: Duration,
}

impl DomainLookupService {
    /// Create a service using the system `whois` client and default settings.
    pub fn new() -> Self {
        Self::with_config(LookupConfig::default())
    }

    /// Create a service whose `whois` client is set up from `config`.
    pub fn with_config(config: LookupConfig) -> Self {
        let source = CommandWhoisSource::from_config(&config);
        Self::with_source(source, config.timeout)
    }

    /// Create a service over any WHOIS source.
    pub fn with_source<S: WhoisSource + 'static>(source: S, timeout: Duration) -> Self {
        Self {
            source: Arc::new(source),
            timeout,
        }
    }

    /// Deadline applied by the calls without an explicit timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check whether `domain` is free to register.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for empty or malformed names (no query is made)
    /// - `Timeout`, `TransportError`, `UnrecognizedResponse` when the source
    ///   could not give a clear answer
    ///
    /// Never returns `NotFound`: that outcome is `available == true`.
    pub async fn check_availability(
        &self,
        domain: &str,
    ) -> Result<AvailabilityResult, DomainLookupError> {
        self.check_availability_within(domain, self.timeout).await
    }

    /// Same as [`check_availability`](Self::check_availability) with an explicit deadline.
    pub async fn check_availability_within(
        &self,
        domain: &str,
        timeout: Duration,
    ) -> Result<AvailabilityResult, DomainLookupError> {
        let domain = normalize_domain(domain)?;
        let start = Instant::now();
        let response = self.query_source(&domain, timeout).await?;

        Ok(AvailabilityResult {
            available: matches!(response, SourceResponse::NotFound),
            domain,
            check_duration: Some(start.elapsed()),
        })
    }

    /// Fetch the raw WHOIS record for `domain`.
    ///
    /// # Errors
    ///
    /// Same as [`check_availability`](Self::check_availability), plus
    /// `NotFound` when the domain is not registered.
    pub async fn fetch_record(&self, domain: &str) -> Result<WhoisRecord, DomainLookupError> {
        self.fetch_record_within(domain, self.timeout).await
    }

    /// Same as [`fetch_record`](Self::fetch_record) with an explicit deadline.
    pub async fn fetch_record_within(
        &self,
        domain: &str,
        timeout: Duration,
    ) -> Result<WhoisRecord, DomainLookupError> {
        match self.lookup_within(domain, timeout).await? {
            DomainStatus::Registered(record) => Ok(record),
            DomainStatus::Available { domain } => Err(DomainLookupError::not_found(domain)),
        }
    }

    /// Answer both questions with a single query.
    pub async fn lookup(&self, domain: &str) -> Result<DomainStatus, DomainLookupError> {
        self.lookup_within(domain, self.timeout).await
    }

    /// Same as [`lookup`](Self::lookup) with an explicit deadline.
    pub async fn lookup_within(
        &self,
        domain: &str,
        timeout: Duration,
    ) -> Result<DomainStatus, DomainLookupError> {
        let domain = normalize_domain(domain)?;
        let start = Instant::now();

        match self.query_source(&domain, timeout).await? {
            SourceResponse::NotFound => Ok(DomainStatus::Available { domain }),
            SourceResponse::Record(raw_text) => Ok(DomainStatus::Registered(WhoisRecord {
                domain,
                raw_text,
                server: self.source.server().map(str::to_string),
                check_duration: Some(start.elapsed()),
            })),
        }
    }

    /// Run one source query under `timeout` and normalize its outcome.
    ///
    /// A source that reports "no record" as an error is folded into
    /// `SourceResponse::NotFound`; an empty record is unrecognized.
    async fn query_source(
        &self,
        domain: &str,
        timeout: Duration,
    ) -> Result<SourceResponse, DomainLookupError> {
        let start = Instant::now();
        let outcome = tokio::time::timeout(timeout, self.source.query(domain)).await;

        let response = match outcome {
            Err(_) => Err(DomainLookupError::timeout(
                format!("WHOIS query for '{}'", domain),
                timeout,
            )),
            Ok(Err(DomainLookupError::NotFound { .. })) => Ok(SourceResponse::NotFound),
            Ok(Ok(SourceResponse::Record(text))) if text.trim().is_empty() => Err(
                DomainLookupError::unrecognized(domain, "Source returned an empty record"),
            ),
            Ok(other) => other,
        };

        match &response {
            Ok(SourceResponse::NotFound) => {
                debug!(domain, elapsed = ?start.elapsed(), "no registration record")
            }
            Ok(SourceResponse::Record(text)) => {
                debug!(domain, elapsed = ?start.elapsed(), bytes = text.len(), "registration record found")
            }
            Err(e) => debug!(domain, elapsed = ?start.elapsed(), error = %e, "lookup failed"),
        }

        response
    }
}

impl Default for DomainLookupService {
    fn default() -> Self {
        Self::new()
    }
}
