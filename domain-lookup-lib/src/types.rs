//! Core data types for domain lookups.
//!
//! Results are created fresh per query and never cached: registration status
//! can change at any moment, so a stale "available" would be actively harmful.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of an availability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    /// The domain name that was checked, normalized (e.g., "example.com")
    pub domain: String,

    /// `true` when the registry reported no registration record
    pub available: bool,

    /// How long the lookup took to complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration: Option<Duration>,
}

/// Raw WHOIS registration record for a registered domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhoisRecord {
    /// The domain name that was queried
    pub domain: String,

    /// Full textual record exactly as the source returned it.
    /// Never empty: an unregistered domain is reported as `NotFound` instead.
    pub raw_text: String,

    /// WHOIS server explicitly queried, when one was configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// How long the lookup took to complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration: Option<Duration>,
}

/// Combined answer from a single lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DomainStatus {
    /// No registration record exists
    Available { domain: String },

    /// The domain is registered; the record is attached
    Registered(WhoisRecord),
}

impl DomainStatus {
    /// The queried domain name.
    pub fn domain(&self) -> &str {
        match self {
            DomainStatus::Available { domain } => domain,
            DomainStatus::Registered(record) => &record.domain,
        }
    }

    /// Whether the domain is free to register.
    pub fn is_available(&self) -> bool {
        matches!(self, DomainStatus::Available { .. })
    }
}

/// Configuration for a lookup service and its default WHOIS source.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupConfig {
    /// Deadline for each lookup
    /// Default: 10 seconds
    pub timeout: Duration,

    /// WHOIS client executable
    /// Default: "whois"
    pub whois_command: String,

    /// Extra arguments placed before the domain (e.g. "-H")
    /// Default: empty
    pub whois_args: Vec<String>,

    /// Query this WHOIS server instead of letting the client pick one
    /// Default: None
    pub whois_server: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            whois_command: "whois".to_string(),
            whois_args: Vec::new(),
            whois_server: None,
        }
    }
}

impl LookupConfig {
    /// Set the lookup deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a different WHOIS client executable.
    pub fn with_whois_command<S: Into<String>>(mut self, command: S) -> Self {
        self.whois_command = command.into();
        self
    }

    /// Pass extra arguments to the WHOIS client.
    pub fn with_whois_args(mut self, args: Vec<String>) -> Self {
        self.whois_args = args;
        self
    }

    /// Query a specific WHOIS server.
    pub fn with_whois_server<S: Into<String>>(mut self, server: S) -> Self {
        self.whois_server = Some(server.into());
        self
    }
}
