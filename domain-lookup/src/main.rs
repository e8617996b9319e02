//! Domain Lookup CLI Application
//!
//! Command-line front end for domain-lookup-lib. `check` answers "can I
//! register this name?", `whois` shows the registration record.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args as ClapArgs, Parser, Subcommand};
use domain_lookup_lib::{
    expand_domain_inputs, is_command_available, load_env_config, parse_timeout_string,
    AvailabilityResult, ConfigManager, DomainLookupError, DomainLookupService, FileConfig,
    LookupConfig, MAX_CONCURRENCY,
};
use futures::StreamExt;
use std::process;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

const DEFAULT_CONCURRENCY: usize = 5;

/// CLI arguments for domain-lookup
#[derive(Parser, Debug)]
#[command(name = "domain-lookup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check whether a domain is registered and view its WHOIS record")]
#[command(
    long_about = "Check whether a domain is registered and view its WHOIS record.\n\nLookups use the system whois client. A lookup that fails is reported as a failure, never as an available domain."
)]
#[command(styles = STYLES)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether domains are available to register
    Check {
        /// Domain names to check (base names get the configured TLDs)
        #[arg(value_name = "DOMAINS", required = true)]
        domains: Vec<String>,

        /// TLDs for base names (comma-separated or multiple -t flags)
        #[arg(short = 't', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append)]
        tlds: Option<Vec<String>>,

        /// Max concurrent lookups (default: 5, max: 50)
        #[arg(short = 'c', long = "concurrency", value_name = "N")]
        concurrency: Option<usize>,
    },

    /// Show the WHOIS registration record of a domain
    Whois {
        /// Domain name to look up
        #[arg(value_name = "DOMAIN")]
        domain: String,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct GlobalArgs {
    /// Deadline per lookup, e.g. 500ms, 10s, 1m (default: 10s)
    #[arg(long = "timeout", value_name = "DURATION", global = true, help_heading = "Lookup")]
    pub timeout: Option<String>,

    /// Query this WHOIS server instead of the client's default
    #[arg(long = "server", value_name = "HOST", global = true, help_heading = "Lookup")]
    pub server: Option<String>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", global = true, help_heading = "Output Format")]
    pub json: bool,

    /// Colored, aligned output with a summary
    #[arg(short = 'p', long = "pretty", global = true, help_heading = "Output Format")]
    pub pretty: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", global = true, help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show debug logging and lookup timings
    #[arg(short = 'd', long = "debug", global = true, help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", global = true, help_heading = "Configuration")]
    pub verbose: bool,
}

/// Effective settings after merging config files, environment and flags.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub(crate) lookup: LookupConfig,
    pub(crate) concurrency: usize,
    pub(crate) tlds: Option<Vec<String>>,
    pub(crate) json: bool,
    pub(crate) pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lookup: LookupConfig::default(),
            concurrency: DEFAULT_CONCURRENCY,
            tlds: None,
            json: false,
            pretty: false,
        }
    }
}

/// Failed lookups grouped by category for the end-of-run summary
#[derive(Debug, Default)]
pub(crate) struct ErrorStats {
    pub(crate) timeouts: Vec<String>,
    pub(crate) transport_errors: Vec<String>,
    pub(crate) unrecognized: Vec<String>,
    pub(crate) invalid_inputs: Vec<String>,
    pub(crate) other_errors: Vec<String>,
}

impl ErrorStats {
    pub(crate) fn add_error(&mut self, domain: &str, error: &DomainLookupError) {
        let bucket = match error {
            DomainLookupError::Timeout { .. } => &mut self.timeouts,
            DomainLookupError::TransportError { .. } => &mut self.transport_errors,
            DomainLookupError::UnrecognizedResponse { .. } => &mut self.unrecognized,
            DomainLookupError::InvalidInput { .. } => &mut self.invalid_inputs,
            _ => &mut self.other_errors,
        };
        bucket.push(domain.to_string());
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.total() > 0
    }

    pub(crate) fn total(&self) -> usize {
        self.timeouts.len()
            + self.transport_errors.len()
            + self.unrecognized.len()
            + self.invalid_inputs.len()
            + self.other_errors.len()
    }
}

/// One domain's outcome from a `check` run.
#[derive(Debug)]
pub(crate) struct CheckOutcome {
    pub(crate) domain: String,
    pub(crate) result: Result<AvailabilityResult, DomainLookupError>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args.global);

    let settings = match build_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        timeout = ?settings.lookup.timeout,
        command = %settings.lookup.whois_command,
        "domain-lookup starting"
    );

    // A client that hangs on --version still started; the lookups will time out on their own
    let client_found = tokio::time::timeout(
        settings.lookup.timeout,
        is_command_available(&settings.lookup.whois_command),
    )
    .await
    .unwrap_or(true);
    if !client_found {
        warn!(
            command = %settings.lookup.whois_command,
            "whois client not found; install one or set DL_WHOIS_COMMAND"
        );
    }

    let service = DomainLookupService::with_config(settings.lookup.clone());

    let all_answered = match &args.command {
        Commands::Check { domains, .. } => run_check(&service, domains, &settings, &args.global).await,
        Commands::Whois { domain } => run_whois(&service, domain, &settings, &args.global).await,
    };

    match all_answered {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` overrides the flag-derived level.
fn init_logging(global: &GlobalArgs) {
    let default_level = if global.debug {
        "debug"
    } else if global.verbose {
        "info"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Check availability of every requested domain.
///
/// Returns `Ok(false)` when at least one lookup failed.
async fn run_check(
    service: &DomainLookupService,
    inputs: &[String],
    settings: &Settings,
    global: &GlobalArgs,
) -> Result<bool, Box<dyn std::error::Error>> {
    let domains = expand_domain_inputs(inputs, &settings.tlds);
    if domains.is_empty() {
        return Err("No domains to check".into());
    }

    debug!(count = domains.len(), concurrency = settings.concurrency, "checking domains");

    let spinner = if settings.pretty && !settings.json {
        ui::Spinner::start(format!(
            "Checking {} domain{}...",
            domains.len(),
            if domains.len() == 1 { "" } else { "s" }
        ))
    } else {
        None
    };

    let start_time = std::time::Instant::now();

    // Order of results follows the order of inputs
    let outcomes: Vec<CheckOutcome> = futures::stream::iter(domains.into_iter().map(|domain| {
        let service = service.clone();
        async move {
            let result = service.check_availability(&domain).await;
            CheckOutcome { domain, result }
        }
    }))
    .buffered(settings.concurrency)
    .collect()
    .await;

    let duration = start_time.elapsed();

    if let Some(s) = spinner {
        s.stop().await;
    }

    let mut error_stats = ErrorStats::default();
    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            error_stats.add_error(&outcome.domain, e);
        }
    }

    if settings.json {
        let reports: Vec<ui::CheckReport> = outcomes.iter().map(ui::CheckReport::from).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for outcome in &outcomes {
            if settings.pretty {
                ui::print_check_pretty(outcome, global.debug);
            } else {
                ui::print_check_default(outcome);
            }
        }

        if outcomes.len() > 1 {
            println!();
            ui::print_summary(&outcomes, duration);
            if error_stats.has_errors() {
                println!();
                ui::print_error_summary(&error_stats);
            }
        }
    }

    Ok(!error_stats.has_errors())
}

/// Print the WHOIS record of one domain.
///
/// An unregistered domain is an answer, not a failure.
async fn run_whois(
    service: &DomainLookupService,
    domain: &str,
    settings: &Settings,
    global: &GlobalArgs,
) -> Result<bool, Box<dyn std::error::Error>> {
    let spinner = if settings.pretty && !settings.json {
        ui::Spinner::start(format!("Looking up {}...", domain))
    } else {
        None
    };

    let result = service.fetch_record(domain).await;

    if let Some(s) = spinner {
        s.stop().await;
    }

    if settings.json {
        let report = ui::WhoisReport::new(domain, &result);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        ui::print_whois(domain, &result, settings.pretty, global.debug);
    }

    Ok(match result {
        Ok(_) => true,
        Err(e) => e.is_not_found(),
    })
}

/// Build effective settings.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (DL_*)
/// 3. Explicit config file (--config or DL_CONFIG), otherwise discovered files
/// 4. Built-in defaults
fn build_settings(args: &Args) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::default();
    let env_config = load_env_config();
    let config_manager = ConfigManager::new(args.global.verbose);

    let explicit_path = args.global.config.clone().or_else(|| env_config.config.clone());
    let file_config = match explicit_path {
        Some(path) => {
            info!(path = %path, "using explicit config file");
            config_manager
                .load_file(&path)
                .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?
        }
        None => config_manager.discover_and_load()?,
    };
    settings = merge_file_config(settings, file_config)?;

    if let Some(timeout) = env_config.timeout {
        settings.lookup.timeout = timeout;
    }
    if let Some(concurrency) = env_config.concurrency {
        settings.concurrency = concurrency;
    }
    if let Some(tlds) = env_config.tlds {
        settings.tlds = Some(tlds);
    }
    if let Some(command) = env_config.whois_command {
        settings.lookup.whois_command = command;
    }
    if let Some(server) = env_config.whois_server {
        settings.lookup.whois_server = Some(server);
    }
    if let Some(json) = env_config.json {
        settings.json = json;
    }
    if let Some(pretty) = env_config.pretty {
        settings.pretty = pretty;
    }

    apply_cli_args(settings, args)
}

/// Fold a loaded config file into settings.
fn merge_file_config(
    mut settings: Settings,
    file_config: FileConfig,
) -> Result<Settings, Box<dyn std::error::Error>> {
    if let Some(defaults) = file_config.defaults {
        if let Some(timeout_str) = defaults.timeout {
            settings.lookup.timeout = parse_timeout_string(&timeout_str)
                .ok_or_else(|| format!("Invalid timeout '{}' in config file", timeout_str))?;
        }
        if let Some(concurrency) = defaults.concurrency {
            settings.concurrency = concurrency;
        }
        if defaults.tlds.is_some() {
            settings.tlds = defaults.tlds;
        }
    }

    if let Some(whois) = file_config.whois {
        if let Some(command) = whois.command {
            settings.lookup.whois_command = command;
        }
        if let Some(args) = whois.args {
            settings.lookup.whois_args = args;
        }
        if whois.server.is_some() {
            settings.lookup.whois_server = whois.server;
        }
    }

    if let Some(output) = file_config.output {
        if let Some(json) = output.json {
            settings.json = json;
        }
        if let Some(pretty) = output.pretty {
            settings.pretty = pretty;
        }
    }

    Ok(settings)
}

/// Apply CLI arguments (highest precedence) and validate the result.
fn apply_cli_args(
    mut settings: Settings,
    args: &Args,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let global = &args.global;

    if let Some(timeout_str) = &global.timeout {
        settings.lookup.timeout = parse_timeout_string(timeout_str).ok_or_else(|| {
            format!(
                "Invalid --timeout '{}'. Use format like '500ms', '10s', '1m'",
                timeout_str
            )
        })?;
    }
    if let Some(server) = &global.server {
        settings.lookup.whois_server = Some(server.clone());
    }
    // Flags only switch output modes on; config/env values stay otherwise
    if global.json {
        settings.json = true;
    }
    if global.pretty {
        settings.pretty = true;
    }

    if let Commands::Check {
        tlds, concurrency, ..
    } = &args.command
    {
        if tlds.is_some() {
            settings.tlds = tlds.clone();
        }
        if let Some(concurrency) = concurrency {
            settings.concurrency = *concurrency;
        }
    }

    if settings.concurrency == 0 || settings.concurrency > MAX_CONCURRENCY {
        return Err(format!("Concurrency must be between 1 and {}", MAX_CONCURRENCY).into());
    }

    Ok(settings)
}
