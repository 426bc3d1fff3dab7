//! CLI argument definitions for bullion.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `prices` | Quotes for every tracked metal |
//! | `quote` | Refresh a single metal |
//! | `details` | Quote plus description, purity, and market cap |
//! | `catalog` | Print the baseline catalog |
//!
//! # Examples
//!
//! ```bash
//! bullion prices --format table
//! bullion quote gold --no-latency --pretty
//! bullion details palladium --spread 0
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Synthetic precious-metal quotes.
#[derive(Debug, Parser)]
#[command(
    name = "bullion",
    author,
    version,
    about = "Synthetic precious-metal price quotes",
    long_about = "bullion synthesizes pseudo-live quotes for gold, silver, platinum, and \
palladium from a static baseline catalog with bounded random jitter.\n\
\n\
Environment overrides: BULLION_PRICE_SPREAD, BULLION_LATENCY_MIN_MS, \
BULLION_LATENCY_MAX_MS, BULLION_SEED, BULLION_CATALOG_PATH. Log level via RUST_LOG."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// JSON catalog file replacing the built-in baseline table.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Price jitter half-width as a fraction (0.01 = ±1%).
    #[arg(long, global = true)]
    pub spread: Option<f64>,

    /// Skip the artificial per-quote delay.
    #[arg(long, global = true, default_value_t = false)]
    pub no_latency: bool,

    /// Seed for reproducible jitter.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch quotes for every tracked metal.
    Prices,
    /// Refresh the quote for one metal.
    Quote(MetalArgs),
    /// Show the details view for one metal.
    Details(MetalArgs),
    /// Print the baseline catalog.
    Catalog,
}

#[derive(Debug, Args)]
pub struct MetalArgs {
    /// One of gold, silver, platinum, palladium.
    pub metal: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bullion", "quote", "gold", "--spread", "0", "--no-latency"])
            .expect("parses");
        assert_eq!(cli.spread, Some(0.0));
        assert!(cli.no_latency);
        assert!(matches!(cli.command, Command::Quote(MetalArgs { ref metal }) if metal == "gold"));
    }

    #[test]
    fn defaults_to_json_output() {
        let cli = Cli::try_parse_from(["bullion", "prices"]).expect("parses");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.strict);
    }
}
