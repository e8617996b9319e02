//! Utility functions for domain normalization and validation.
//!
//! Every lookup goes through [`normalize_domain`] before any process is
//! spawned, so malformed input is rejected without a wasted round trip.

use crate::error::DomainLookupError;
use lazy_static::lazy_static;
use regex::Regex;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

lazy_static! {
    // Letters (including IDN scripts), digits and inner hyphens.
    static ref LABEL_RE: Regex =
        Regex::new(r"^[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?$").expect("valid label regex");
}

/// Normalize and validate a domain name.
///
/// Trims whitespace, lowercases, and strips one trailing dot, then checks the
/// result is a plausible fully qualified name.
///
/// # Errors
///
/// Returns [`DomainLookupError::InvalidInput`] describing the first problem found.
pub fn normalize_domain(domain: &str) -> Result<String, DomainLookupError> {
    let trimmed = domain.trim();
    let normalized = trimmed.strip_suffix('.').unwrap_or(trimmed).to_lowercase();

    if normalized.is_empty() {
        return Err(DomainLookupError::invalid_input(
            domain,
            "Domain name cannot be empty",
        ));
    }

    // Lengths count characters of the Unicode form, like the label check below
    if normalized.chars().count() > MAX_DOMAIN_LEN {
        return Err(DomainLookupError::invalid_input(
            domain,
            format!("Domain name longer than {} characters", MAX_DOMAIN_LEN),
        ));
    }

    let labels: Vec<&str> = normalized.split('.').collect();
    if labels.len() < 2 {
        return Err(DomainLookupError::invalid_input(
            domain,
            "Domain name needs a TLD (e.g. example.com)",
        ));
    }

    for label in &labels {
        if label.is_empty() {
            return Err(DomainLookupError::invalid_input(domain, "Empty label"));
        }
        if label.chars().count() > MAX_LABEL_LEN {
            return Err(DomainLookupError::invalid_input(
                domain,
                format!("Label '{}' longer than {} characters", label, MAX_LABEL_LEN),
            ));
        }
        if !LABEL_RE.is_match(label) {
            return Err(DomainLookupError::invalid_input(
                domain,
                format!(
                    "Label '{}' must use letters, digits and inner hyphens only",
                    label
                ),
            ));
        }
    }

    let tld = labels[labels.len() - 1];
    if tld.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainLookupError::invalid_input(
            domain,
            "TLD cannot be numeric",
        ));
    }

    Ok(normalized)
}

/// Expand CLI-style inputs into fully qualified domain names.
///
/// - Entries with dots are treated as FQDNs (no expansion)
/// - Entries without dots get every TLD in `tlds` appended (defaults to "com")
/// - Blank entries are skipped; nothing else is validated here
pub fn expand_domain_inputs(domains: &[String], tlds: &Option<Vec<String>>) -> Vec<String> {
    let mut results = Vec::new();

    for domain in domains {
        let trimmed = domain.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.contains('.') {
            results.push(trimmed.to_string());
            continue;
        }

        match tlds {
            Some(tld_list) if !tld_list.is_empty() => {
                for tld in tld_list {
                    let tld_clean = tld.trim().trim_start_matches('.');
                    if !tld_clean.is_empty() {
                        results.push(format!("{}.{}", trimmed, tld_clean));
                    }
                }
            }
            _ => results.push(format!("{}.com", trimmed)),
        }
    }

    results
}
