//! WHOIS source that shells out to the system `whois` client.
//!
//! WHOIS answers are unstructured text whose wording varies per registry, so
//! the output is classified with phrase lists. Anything that matches neither a
//! not-found phrase nor a registry field is reported as unrecognized rather
//! than guessed.

use super::{SourceResponse, WhoisSource};
use crate::error::DomainLookupError;
use crate::types::LookupConfig;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tokio::process::Command;
use tracing::debug;

/// Phrases registries use when the TLD itself cannot be served.
const UNKNOWN_TLD_PATTERNS: &[&str] = &[
    "no whois server is known",
    "no whois server",
    "invalid tld",
    "unknown tld",
    "tld not found",
    "no such tld",
    "bad tld",
    "invalid domain extension",
];

/// Phrases registries use when they refuse to answer right now.
const RATE_LIMIT_PATTERNS: &[&str] = &[
    "rate limit exceeded",
    "too many requests",
    "query rate exceeded",
    "quota exceeded",
    "limit exceeded",
    "rate-limited",
    "please try again later",
];

/// Phrases that mean the registry holds no record for the domain.
const NOT_FOUND_PATTERNS: &[&str] = &[
    "no match",
    "not found",
    "no data found",
    "no entries found",
    "domain not found",
    "domain available",
    "status: available",
    "status: free",
    "no information available",
    "not registered",
    "no matching record",
    "domain status: no object found",
    "the queried object does not exist",
    "object does not exist",
    "no matching entry",
    "this domain name has not been registered",
];

lazy_static! {
    // Fields only a registered domain carries. Their presence wins over any
    // not-found or rate-limit wording from a second (registrar) server.
    static ref REGISTERED_FIELD_RE: Regex = Regex::new(
        r"(?im)^\s*(registry domain id|creation date|registrar|registry expiry date)\s*:[ \t]*\S"
    )
    .expect("valid registered field regex");

    // A registry field at the start of a line, e.g. "Registrar: Example Inc."
    static ref RECORD_FIELD_RE: Regex = Regex::new(
        r"(?im)^\s*(domain name|domain|registrar|registrant|creation date|created|registry domain id|registry expiry date|expiry date|expires|updated date|last updated|name server|nameservers|nserver|domain status|status)\s*:"
    )
    .expect("valid record field regex");
}

/// WHOIS source that runs `<command> [args] [-h server] <domain>`.
///
/// The child process is killed if the query future is dropped, so a deadline
/// applied by the caller never leaves a stray `whois` behind.
#[derive(Debug, Clone)]
pub struct CommandWhoisSource {
    command: String,
    args: Vec<String>,
    server: Option<String>,
}

impl CommandWhoisSource {
    /// Use the `whois` found on `PATH` with no extra arguments.
    pub fn new() -> Self {
        Self {
            command: "whois".to_string(),
            args: Vec::new(),
            server: None,
        }
    }

    /// Build a source from the command settings in `config`.
    pub fn from_config(config: &LookupConfig) -> Self {
        Self {
            command: config.whois_command.clone(),
            args: config.whois_args.clone(),
            server: config.whois_server.clone(),
        }
    }

    /// Use a different client executable.
    pub fn with_command<S: Into<String>>(mut self, command: S) -> Self {
        self.command = command.into();
        self
    }

    /// Pass extra arguments before the domain.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Query a specific server with `-h`.
    pub fn with_server<S: Into<String>>(mut self, server: S) -> Self {
        self.server = Some(server.into());
        self
    }

    /// The executable this source runs.
    pub fn command(&self) -> &str {
        &self.command
    }

    fn build_command(&self, domain: &str) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args);
        if let Some(server) = &self.server {
            cmd.arg("-h").arg(server);
        }
        cmd.arg(domain).kill_on_drop(true);
        cmd
    }
}

impl Default for CommandWhoisSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WhoisSource for CommandWhoisSource {
    async fn query(&self, domain: &str) -> Result<SourceResponse, DomainLookupError> {
        debug!(command = %self.command, server = ?self.server, domain, "running whois");

        let output = self.build_command(domain).output().await.map_err(|e| {
            DomainLookupError::transport_with_source(
                format!(
                    "Failed to execute '{}'. Make sure a whois client is installed",
                    self.command
                ),
                e.to_string(),
            )
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        if stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if !output.status.success() {
                return Err(DomainLookupError::transport_with_source(
                    format!("'{}' exited with {}", self.command, output.status),
                    if stderr.is_empty() {
                        "no output".to_string()
                    } else {
                        stderr
                    },
                ));
            }
            return Err(DomainLookupError::unrecognized(
                domain,
                "WHOIS client produced no output",
            ));
        }

        classify_response(domain, &stdout)
    }

    fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }
}

/// Classify raw WHOIS output for `domain`.
///
/// Checks, in order: registered-only fields, unknown TLD, rate limiting,
/// not-found phrases, then any registry field. A record is returned
/// unmodified.
pub fn classify_response(domain: &str, output: &str) -> Result<SourceResponse, DomainLookupError> {
    if output.trim().is_empty() {
        return Err(DomainLookupError::unrecognized(domain, "Empty WHOIS response"));
    }

    if REGISTERED_FIELD_RE.is_match(output) {
        return Ok(SourceResponse::Record(output.to_string()));
    }

    let lower = output.to_lowercase();

    if UNKNOWN_TLD_PATTERNS.iter().any(|p| lower.contains(p)) {
        return Err(DomainLookupError::invalid_input(
            domain,
            "TLD is not served by any known WHOIS server",
        ));
    }

    if RATE_LIMIT_PATTERNS.iter().any(|p| lower.contains(p)) {
        return Err(DomainLookupError::transport_with_source(
            "WHOIS server refused the query",
            "rate limited",
        ));
    }

    if NOT_FOUND_PATTERNS.iter().any(|p| lower.contains(p)) {
        return Ok(SourceResponse::NotFound);
    }

    if RECORD_FIELD_RE.is_match(output) {
        return Ok(SourceResponse::Record(output.to_string()));
    }

    Err(DomainLookupError::unrecognized_with_content(
        domain,
        "Response is neither a registration record nor a not-found answer",
        output.chars().take(512).collect::<String>(),
    ))
}

/// Check if the configured whois client can be started at all.
///
/// Useful for a friendlier message before running a batch of lookups.
pub async fn is_command_available(command: &str) -> bool {
    match Command::new(command)
        .arg("--version")
        .kill_on_drop(true)
        .output()
        .await
    {
        Ok(_) => true,
        Err(e) => e.kind() != std::io::ErrorKind::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERISIGN_TAKEN: &str = "   Domain Name: GOOGLE.COM\r\n   Registry Domain ID: 2138514_DOMAIN_COM-VRSN\r\n   Registrar WHOIS Server: whois.markmonitor.com\r\n   Creation Date: 1997-09-15T04:00:00Z\r\n   Name Server: NS1.GOOGLE.COM\r\n";

    #[test]
    fn test_classify_registered() {
        let result = classify_response("google.com", VERISIGN_TAKEN).unwrap();
        assert_eq!(result, SourceResponse::Record(VERISIGN_TAKEN.to_string()));
    }

    #[test]
    fn test_classify_partial_record_is_still_a_record() {
        let partial = "registrar: Some Registrar\n";
        assert_eq!(
            classify_response("partial.io", partial).unwrap(),
            SourceResponse::Record(partial.to_string())
        );
    }

    #[test]
    fn test_classify_not_found_variants() {
        let answers = [
            "No match for \"KWIKAWEB-NOT-REAL.COM\".\r\n>>> Last update of whois database: 2024-01-01T00:00:00Z <<<",
            "NOT FOUND",
            "Domain not found.",
            "%% No entries found for the selected source(s).",
            "Status: AVAILABLE",
            "The queried object does not exist: DOMAIN NOT FOUND",
        ];
        for answer in answers {
            assert_eq!(
                classify_response("x.com", answer).unwrap(),
                SourceResponse::NotFound,
                "answer {:?}",
                answer
            );
        }
    }

    #[test]
    fn test_classify_record_with_registrar_not_found_trailer() {
        let output = "Domain Name: GOOGLE.COM\r\nRegistry Domain ID: 2138514_DOMAIN_COM-VRSN\r\nCreation Date: 1997-09-15T04:00:00Z\r\n\r\nDomain not found.\r\n";
        assert_eq!(
            classify_response("google.com", output).unwrap(),
            SourceResponse::Record(output.to_string())
        );
    }

    #[test]
    fn test_classify_record_with_rate_limit_wording() {
        let output = format!(
            "{}\r\nRegistrar: MarkMonitor Inc.\r\n\r\nQuery limit exceeded. Please try again later.\r\n",
            VERISIGN_TAKEN
        );
        assert_eq!(
            classify_response("google.com", &output).unwrap(),
            SourceResponse::Record(output.clone())
        );
    }

    #[test]
    fn test_classify_denic_free_is_not_found() {
        let output = "Domain: kwikaweb-free.de\nStatus: free\n";
        assert_eq!(
            classify_response("kwikaweb-free.de", output).unwrap(),
            SourceResponse::NotFound
        );
    }

    #[test]
    fn test_classify_unknown_tld_is_invalid_input() {
        let err = classify_response("example.notatld", "No whois server is known for this kind of object.")
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn test_classify_rate_limit_is_transport() {
        let err = classify_response("example.com", "Query rate exceeded. Please try again later.")
            .unwrap_err();
        assert_eq!(err.kind(), "transport");
    }

    #[test]
    fn test_classify_garbage_is_unrecognized() {
        let err = classify_response("example.com", "<html><body>502 Bad Gateway</body></html>")
            .unwrap_err();
        assert!(matches!(
            err,
            DomainLookupError::UnrecognizedResponse { content: Some(_), .. }
        ));

        let err = classify_response("example.com", "  \n ").unwrap_err();
        assert_eq!(err.kind(), "unrecognized_response");
    }

    #[test]
    fn test_build_command_argument_order() {
        let source = CommandWhoisSource::new()
            .with_args(vec!["-H".to_string()])
            .with_server("whois.nic.io");
        let cmd = source.build_command("example.io");
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, vec!["-H", "-h", "whois.nic.io", "example.io"]);
        assert_eq!(source.server(), Some("whois.nic.io"));
    }

    #[test]
    fn test_from_config() {
        let config = LookupConfig::default().with_whois_command("/opt/bin/whois");
        let source = CommandWhoisSource::from_config(&config);
        assert_eq!(source.command(), "/opt/bin/whois");
        assert_eq!(source.server(), None);
    }

    #[tokio::test]
    async fn test_missing_binary_is_transport_error() {
        let source = CommandWhoisSource::new().with_command("/nonexistent/bin/whois-client");
        let err = source.query("example.com").await.unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert!(!is_command_available("/nonexistent/bin/whois-client").await);
    }
}
