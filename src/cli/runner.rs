//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{CountProbeFailure, PaginationConfig};
use crate::error::{Error, Result};
use crate::output::{Destination, ResultSink};
use crate::pagination::PaginationCoordinator;
use std::io;
use tracing::{info, warn};

/// Flags of the `fetch` command that feed the config
#[derive(Debug, Default, Clone)]
pub struct FetchArgs {
    pub endpoint: Option<String>,
    pub page_size: Option<u64>,
    pub headers: Vec<String>,
    pub total_count: Option<u64>,
    pub data_field: Option<String>,
    pub count_fields: Vec<String>,
    pub max_concurrency: Option<usize>,
    pub fail_on_count_error: bool,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                endpoint,
                page_size,
                headers,
                total_count,
                data_field,
                count_fields,
                max_concurrency,
                fail_on_count_error,
                output,
                pretty,
            } => {
                let args = FetchArgs {
                    endpoint: endpoint.clone(),
                    page_size: *page_size,
                    headers: headers.clone(),
                    total_count: *total_count,
                    data_field: data_field.clone(),
                    count_fields: count_fields.clone(),
                    max_concurrency: *max_concurrency,
                    fail_on_count_error: *fail_on_count_error,
                };
                self.fetch(&args, output.as_deref(), *pretty).await
            }
            Commands::Validate => self.validate(),
        }
    }

    /// Load the config file (if any) and apply command-line overrides
    pub fn build_config(&self, args: &FetchArgs) -> Result<PaginationConfig> {
        let mut config = match (&self.cli.config, &args.endpoint) {
            (Some(path), _) => PaginationConfig::from_file(path)?,
            (None, Some(endpoint)) => {
                PaginationConfig::new(endpoint.clone(), args.page_size.unwrap_or(100))
            }
            (None, None) => {
                return Err(Error::config(
                    "No endpoint given (use --endpoint or a --config file)",
                ))
            }
        };

        if let Some(endpoint) = &args.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(page_size) = args.page_size {
            config.page_size = page_size;
        }
        for header in &args.headers {
            let (key, value) = parse_header(header)?;
            config.headers.insert(key, value);
        }
        if args.total_count.is_some() {
            config.total_count_override = args.total_count;
        }
        if let Some(field) = &args.data_field {
            config.data_field.clone_from(field);
        }
        if !args.count_fields.is_empty() {
            config.total_count_field_candidates.clone_from(&args.count_fields);
        }
        if args.max_concurrency.is_some() {
            config.max_concurrency = args.max_concurrency;
        }
        if args.fail_on_count_error {
            config.count_probe_failure = CountProbeFailure::Fail;
        }

        config.validate()?;
        Ok(config)
    }

    async fn fetch(&self, args: &FetchArgs, output: Option<&str>, pretty: bool) -> Result<()> {
        let config = self.build_config(args)?;
        if self.cli.verbose {
            info!("Config: {:?}", config);
        }

        let coordinator = PaginationCoordinator::new(config).await?;
        for failure in coordinator.failures() {
            warn!("{}", failure);
        }

        let sink = ResultSink::new().pretty(pretty);
        match output {
            Some(destination) => {
                let destination = Destination::parse(destination)?;
                sink.write(&destination, coordinator.get_results()).await?;
            }
            None => sink.write_to(io::stdout().lock(), coordinator.get_results())?,
        }

        info!(
            "Fetched {} of {} items ({} pages, {} failed)",
            coordinator.get_results().len(),
            coordinator.total_count(),
            coordinator.page_count(),
            coordinator.failures().len()
        );
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use -C flag)"))?;

        let config = PaginationConfig::from_file(path)?;
        println!(
            "✓ Valid config: {} (page size {})",
            config.endpoint, config.page_size
        );
        Ok(())
    }
}

/// Split `KEY=VALUE` (or `KEY: VALUE`) into a header pair
fn parse_header(raw: &str) -> Result<(String, String)> {
    let split = raw
        .find(|c: char| c == '=' || c == ':')
        .ok_or_else(|| Error::invalid_value("header", format!("expected KEY=VALUE, got '{raw}'")))?;
    let (key, value) = (&raw[..split], &raw[split + 1..]);

    let key = key.trim();
    if key.is_empty() {
        return Err(Error::invalid_value("header", "header name cannot be empty"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
