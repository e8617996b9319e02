//! Display logic for the domain-lookup CLI.
//!
//! Plain messages, `--pretty` colored lines, JSON report shapes, the spinner,
//! and run summaries. Uses only the `console` crate for styling.

use console::{pad_str, style, Alignment, Term};
use domain_lookup_lib::{DomainLookupError, WhoisRecord};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::{CheckOutcome, ErrorStats};

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a spinner with the given message. Returns `None` when stderr is not a terminal.
    pub fn start(message: String) -> Option<Self> {
        if !Term::stderr().is_term() {
            return None;
        }

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Some(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── check ────────────────────────────────────────────────────────────────────

/// Plain sentence per domain.
pub fn print_check_default(outcome: &CheckOutcome) {
    println!("{}", check_message(outcome));
}

/// Sentence describing one availability outcome.
pub fn check_message(outcome: &CheckOutcome) -> String {
    match &outcome.result {
        Ok(result) if result.available => {
            format!("The domain '{}' is available!", result.domain)
        }
        Ok(result) => format!("The domain '{}' is not available.", result.domain),
        Err(e) => format!("Could not check '{}': {}", outcome.domain, e),
    }
}

/// Aligned, colored line per domain.
pub fn print_check_pretty(outcome: &CheckOutcome, debug: bool) {
    let padded_domain = pad_str(&outcome.domain, 30, Alignment::Left, Some(".."));

    match &outcome.result {
        Ok(result) => {
            let status = if result.available {
                style("AVAILABLE").green().bold()
            } else {
                style("TAKEN").red().bold()
            };
            println!("  {}  {}", style(&padded_domain).white(), status);

            if debug {
                if let Some(duration) = result.check_duration {
                    println!(
                        "    {} Checked in {}ms",
                        style("└─").dim(),
                        duration.as_millis()
                    );
                }
            }
        }
        Err(e) => {
            println!(
                "  {}  {}  {}",
                style(&padded_domain).white(),
                style("UNKNOWN").yellow(),
                style(brief_error(e)).dim(),
            );
            if debug {
                println!("    {} {}", style("└─").dim(), style(e).dim());
            }
        }
    }
}

/// JSON shape of one availability outcome.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub domain: String,
    /// `None` when the lookup failed
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

impl From<&CheckOutcome> for CheckReport {
    fn from(outcome: &CheckOutcome) -> Self {
        match &outcome.result {
            Ok(result) => Self {
                domain: result.domain.clone(),
                available: Some(result.available),
                check_duration_ms: result.check_duration.map(|d| d.as_millis() as u64),
                error: None,
                error_kind: None,
            },
            Err(e) => Self {
                domain: outcome.domain.clone(),
                available: None,
                check_duration_ms: None,
                error: Some(e.to_string()),
                error_kind: Some(e.kind()),
            },
        }
    }
}

// ── whois ────────────────────────────────────────────────────────────────────

/// JSON shape of a record lookup.
#[derive(Debug, Serialize)]
pub struct WhoisReport<'a> {
    pub domain: &'a str,
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<&'a WhoisRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

impl<'a> WhoisReport<'a> {
    pub fn new(domain: &'a str, result: &'a Result<WhoisRecord, DomainLookupError>) -> Self {
        match result {
            Ok(record) => Self {
                domain: &record.domain,
                available: Some(false),
                record: Some(record),
                error: None,
                error_kind: None,
            },
            Err(e) if e.is_not_found() => Self {
                domain,
                available: Some(true),
                record: None,
                error: None,
                error_kind: None,
            },
            Err(e) => Self {
                domain,
                available: None,
                record: None,
                error: Some(e.to_string()),
                error_kind: Some(e.kind()),
            },
        }
    }
}

/// Print a record lookup as text.
pub fn print_whois(
    domain: &str,
    result: &Result<WhoisRecord, DomainLookupError>,
    pretty: bool,
    debug: bool,
) {
    match result {
        Ok(record) => {
            let heading = format!("WHOIS information of {}:", record.domain);
            if pretty {
                println!("{}", style(heading).bold());
                if let Some(server) = &record.server {
                    println!("{}", style(format!("Server: {}", server)).dim());
                }
            } else {
                println!("{}", heading);
            }
            println!();
            println!("{}", record.raw_text.trim_end());

            if debug {
                if let Some(duration) = record.check_duration {
                    println!();
                    println!(
                        "{}",
                        style(format!("Fetched in {}ms", duration.as_millis())).dim()
                    );
                }
            }
        }
        Err(e) if e.is_not_found() => {
            let message = format!(
                "No WHOIS record for '{}': the domain appears to be available.",
                domain.trim()
            );
            if pretty {
                println!("{}", style(message).green());
            } else {
                println!("{}", message);
            }
        }
        Err(e) => {
            let message = format!("Could not look up '{}': {}", domain.trim(), e);
            if pretty {
                println!("{}", style(message).yellow());
            } else {
                println!("{}", message);
            }
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary line with counts.
pub fn print_summary(outcomes: &[CheckOutcome], duration: Duration) {
    let available = outcomes
        .iter()
        .filter(|o| matches!(&o.result, Ok(r) if r.available))
        .count();
    let taken = outcomes
        .iter()
        .filter(|o| matches!(&o.result, Ok(r) if !r.available))
        .count();
    let failed = outcomes.len() - available - taken;

    println!(
        "Summary: {} domain{} in {:.1}s  {}  {}  {}  {}  {}",
        style(outcomes.len()).bold(),
        if outcomes.len() == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style(format!("{} available", available)).green(),
        style("|").dim(),
        style(format!("{} taken", taken)).red(),
        style("|").dim(),
        style(format!("{} could not be checked", failed)).yellow(),
    );
}

/// Print a categorized error summary.
pub fn print_error_summary(error_stats: &ErrorStats) {
    if !error_stats.has_errors() {
        return;
    }

    println!(
        "{}",
        style("Some domains could not be checked (they are NOT known to be available):").yellow()
    );

    let categories = [
        ("timeout", &error_stats.timeouts),
        ("transport error", &error_stats.transport_errors),
        ("unrecognized response", &error_stats.unrecognized),
        ("invalid domain", &error_stats.invalid_inputs),
        ("other error", &error_stats.other_errors),
    ];

    for (label, domains) in categories {
        if domains.is_empty() {
            continue;
        }
        println!(
            "  {} {} {}{}: {}",
            style("•").dim(),
            domains.len(),
            label,
            if domains.len() == 1 { "" } else { "s" },
            format_domain_list(domains, 5),
        );
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Join domains, truncating after `max_show` entries.
fn format_domain_list(domains: &[String], max_show: usize) -> String {
    if domains.len() <= max_show {
        domains.join(", ")
    } else {
        let shown = &domains[..max_show];
        let remaining = domains.len() - max_show;
        format!("{}, ... and {} more", shown.join(", "), remaining)
    }
}

/// Short reason for a failed lookup.
fn brief_error(error: &DomainLookupError) -> &'static str {
    match error {
        DomainLookupError::Timeout { .. } => "(timeout)",
        DomainLookupError::TransportError { .. } => "(transport error)",
        DomainLookupError::UnrecognizedResponse { .. } => "(unrecognized response)",
        DomainLookupError::InvalidInput { .. } => "(invalid domain)",
        _ => "(error)",
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
