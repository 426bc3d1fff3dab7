mod catalog;
mod details;
mod prices;
mod quote;

use std::str::FromStr;

use bullion_core::{Aggregator, FetchFailure, MetalKind, ServiceConfig, SourceId, Spread};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::envelope::{Envelope, EnvelopeMeta};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub table: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<FetchFailure>,
    pub latency_ms: u64,
    pub source: Option<SourceId>,
}

impl CommandResult {
    pub fn ok(data: Value, table: Vec<String>) -> Self {
        Self {
            data,
            table,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            source: None,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<FetchFailure>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = Some(source);
        self
    }
}

/// Output of a command: the envelope plus pre-rendered table lines.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub table: Vec<String>,
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let config = service_config(cli)?;
    debug!(
        spread = config.spread.value(),
        seed = ?config.seed,
        catalog = ?config.catalog_path,
        "resolved service config"
    );

    let result = match &cli.command {
        Command::Prices => prices::run(&build_aggregator(&config)?).await?,
        Command::Quote(args) => {
            let kind = parse_metal(&args.metal)?;
            quote::run(&build_aggregator(&config)?, kind).await?
        }
        Command::Details(args) => {
            let kind = parse_metal(&args.metal)?;
            details::run(&build_aggregator(&config)?, kind).await?
        }
        Command::Catalog => catalog::run(&config)?,
    };

    let CommandResult {
        data,
        table,
        warnings,
        errors,
        latency_ms,
        source,
    } = result;

    let mut meta = EnvelopeMeta::new(source, latency_ms);
    for warning in warnings {
        meta.push_warning(warning);
    }

    Ok(CommandOutput {
        envelope: Envelope::new(meta, data, errors),
        table,
    })
}

/// Environment settings with command-line flags layered on top.
fn service_config(cli: &Cli) -> Result<ServiceConfig, CliError> {
    let mut config = ServiceConfig::from_env()?;
    if let Some(spread) = cli.spread {
        config = config.with_spread(Spread::new(spread)?);
    }
    if cli.no_latency {
        config = config.without_latency();
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(path) = &cli.catalog {
        config = config.with_catalog_path(path);
    }
    Ok(config)
}

fn build_aggregator(config: &ServiceConfig) -> Result<Aggregator, CliError> {
    Ok(config.build_aggregator()?)
}

fn parse_metal(raw: &str) -> Result<MetalKind, CliError> {
    Ok(MetalKind::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    async fn run_args(args: &[&str]) -> Result<CommandOutput, CliError> {
        let cli = Cli::try_parse_from(args).expect("parses");
        run(&cli).await
    }

    fn envelope_json(output: &CommandOutput) -> Value {
        serde_json::to_value(&output.envelope).expect("serializes")
    }

    #[tokio::test]
    async fn prices_returns_live_entries_in_order() {
        let output = run_args(&["bullion", "prices", "--no-latency", "--spread", "0"])
            .await
            .expect("prices succeeds");
        let json = envelope_json(&output);

        assert_eq!(json["meta"]["request_id"].as_str().map(str::len), Some(36));
        assert_eq!(json["meta"]["source"], "simulated");
        assert!(json.get("errors").is_none());

        let data = json["data"].as_array().expect("array of entries");
        let kinds = data
            .iter()
            .map(|entry| entry["kind"].as_str().unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(kinds, ["gold", "silver", "platinum", "palladium"]);
        assert_eq!(data[0]["origin"], "live");
        assert_eq!(data[0]["value"]["price"], 1950.5);
        assert_eq!(data[0]["value"]["change_24h"], 12.3);

        assert_eq!(output.table.len(), 4);
        assert!(output.table[0].starts_with("Gold"));
        assert!(output.table[0].contains("$1,950.50"));
        assert!(output.table[0].contains("+$12.30 (+0.63%)"));
    }

    #[tokio::test]
    async fn quote_refreshes_a_single_metal() {
        let output = run_args(&["bullion", "quote", "Silver", "--no-latency", "--spread", "0"])
            .await
            .expect("quote succeeds");
        let json = envelope_json(&output);

        assert_eq!(json["data"]["kind"], "silver");
        assert_eq!(json["data"]["origin"], "live");
        assert_eq!(json["data"]["value"]["price"], 23.45);
        assert_eq!(output.table.len(), 1);
        assert!(output.table[0].contains("-$0.15"));
        assert!(output.envelope.meta.warnings.is_empty());
    }

    #[tokio::test]
    async fn details_merge_descriptive_fields() {
        let output = run_args(&["bullion", "details", "gold", "--no-latency", "--spread", "0"])
            .await
            .expect("details succeeds");
        let json = envelope_json(&output);

        let value = &json["data"]["value"];
        assert_eq!(value["price"], 1950.5);
        assert_eq!(value["purity"], "24 Karat (99.9% pure)");
        assert!(value["description"]
            .as_str()
            .is_some_and(|text| text.starts_with("Gold")));
        assert!(output
            .table
            .iter()
            .any(|line| line.starts_with("price") && line.ends_with("$1,950.50")));
    }

    #[tokio::test]
    async fn catalog_lists_every_profile() {
        let output = run_args(&["bullion", "catalog"]).await.expect("catalog succeeds");
        let json = envelope_json(&output);

        let data = json["data"].as_array().expect("array of profiles");
        assert_eq!(data.len(), 4);
        assert_eq!(data[1]["kind"], "silver");
        assert!(json["meta"].get("source").is_none());
        assert!(output.table[0].contains("$1,950.50"));
    }

    #[tokio::test]
    async fn unknown_metal_command_exits_with_validation_code() {
        let err = run_args(&["bullion", "details", "rhodium", "--no-latency"])
            .await
            .err()
            .expect("must fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn missing_catalog_file_exits_with_io_code() {
        let err = run_args(&["bullion", "catalog", "--catalog", "/nonexistent/bullion/catalog.json"])
            .await
            .err()
            .expect("must fail");
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn rejects_untracked_metal_before_fetching() {
        let err = parse_metal("rhodium").err().expect("must fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from(["bullion", "prices", "--spread", "0", "--seed", "5"])
            .expect("parses");
        let config = service_config(&cli).expect("valid config");

        assert_eq!(config.spread, Spread::ZERO);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn invalid_spread_flag_is_a_validation_error() {
        let cli = Cli::try_parse_from(["bullion", "prices", "--spread", "1.5"]).expect("parses");
        let err = service_config(&cli).err().expect("must fail");
        assert!(matches!(err, CliError::Validation(_)));
    }
}
