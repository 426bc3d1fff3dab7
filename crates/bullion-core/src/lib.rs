//! # Bullion Core
//!
//! Synthetic precious-metal quotes: a static baseline catalog, bounded random
//! jitter, a per-metal synthesizer, and a concurrent aggregator with per-metal
//! fallback.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Data source implementations (simulated) |
//! | [`aggregator`] | Concurrent fan-out across all metals with fallback |
//! | [`catalog`] | Baseline table, one profile per metal |
//! | [`config`] | Environment-driven service configuration |
//! | [`data_source`] | Data source trait and fetch failure types |
//! | [`display`] | Price, change, volume, and market-cap formatting |
//! | [`domain`] | Domain models (MetalKind, PriceQuote, MetalProfile) |
//! | [`error`] | Core error types |
//! | [`jitter`] | Random sources and the jitter factor |
//! | [`last_known`] | Last successful quote per metal |
//! | [`synthesizer`] | Baseline + jitter -> quote |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bullion_core::ServiceConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = ServiceConfig::from_env()?.build_aggregator()?;
//!     let aggregation = aggregator.aggregate_all().await;
//!
//!     for entry in &aggregation.entries {
//!         println!("{}: ${:.2} ({})", entry.value.metal, entry.value.price, entry.origin.as_str());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / UI       │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Aggregator     │────▶│ Last-known store │
//! └────────┬────────┘     └──────────────────┘
//!          │ one future per metal
//!          ▼
//! ┌─────────────────┐
//! │ Data Source     │  SimulatedSource: delay + synthesize
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Synthesizer     │────▶│ Jitter           │
//! └────────┬────────┘     └──────────────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Price Catalog   │
//! └─────────────────┘
//! ```

pub mod adapters;
pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod data_source;
pub mod display;
pub mod domain;
pub mod error;
pub mod jitter;
pub mod last_known;
pub mod synthesizer;

pub use adapters::{LatencyProfile, SimulatedSource};
pub use aggregator::{Aggregation, Aggregator, QuoteOrigin, Sourced};
pub use catalog::PriceCatalog;
pub use config::ServiceConfig;
pub use data_source::{
    DataSource, FetchFailure, FetchFailureKind, HealthState, HealthStatus, QuoteFuture, SourceId,
    FAILED_TO_LOAD,
};
pub use domain::{validate_currency_code, MetalDetails, MetalKind, MetalProfile, PriceQuote, UtcDateTime};
pub use error::{CoreError, ValidationError};
pub use jitter::{jitter, FastRandSource, FixedSource, RandomSource, Spread};
pub use last_known::LastKnownStore;
pub use synthesizer::PriceSynthesizer;

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn duration_ms(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
