//! Service configuration.
//!
//! # Environment Variables
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `BULLION_PRICE_SPREAD` | Price jitter half-width as a fraction | `0.01` |
//! | `BULLION_LATENCY_MIN_MS` | Minimum artificial delay | `500` |
//! | `BULLION_LATENCY_MAX_MS` | Maximum artificial delay | `1500` |
//! | `BULLION_SEED` | Seed for reproducible jitter | unset |
//! | `BULLION_CATALOG_PATH` | JSON catalog replacing the built-in table | unset |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::adapters::{LatencyProfile, SimulatedSource};
use crate::aggregator::Aggregator;
use crate::jitter::Spread;
use crate::synthesizer::PriceSynthesizer;
use crate::{duration_ms, CoreError, PriceCatalog, ValidationError};

pub const ENV_PRICE_SPREAD: &str = "BULLION_PRICE_SPREAD";
pub const ENV_LATENCY_MIN_MS: &str = "BULLION_LATENCY_MIN_MS";
pub const ENV_LATENCY_MAX_MS: &str = "BULLION_LATENCY_MAX_MS";
pub const ENV_SEED: &str = "BULLION_SEED";
pub const ENV_CATALOG_PATH: &str = "BULLION_CATALOG_PATH";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceConfig {
    pub spread: Spread,
    pub latency: LatencyProfile,
    pub seed: Option<u64>,
    pub catalog_path: Option<PathBuf>,
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads overrides through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_PRICE_SPREAD) {
            config.spread = Spread::new(parse_setting(ENV_PRICE_SPREAD, &raw)?)?;
        }

        let defaults = LatencyProfile::default();
        let min_ms = match lookup(ENV_LATENCY_MIN_MS) {
            Some(raw) => parse_setting(ENV_LATENCY_MIN_MS, &raw)?,
            None => duration_ms(defaults.min()),
        };
        let max_ms = match lookup(ENV_LATENCY_MAX_MS) {
            Some(raw) => parse_setting(ENV_LATENCY_MAX_MS, &raw)?,
            None => duration_ms(defaults.max()),
        };
        config.latency = LatencyProfile::from_millis(min_ms, max_ms)?;

        if let Some(raw) = lookup(ENV_SEED) {
            config.seed = Some(parse_setting(ENV_SEED, &raw)?);
        }

        config.catalog_path = lookup(ENV_CATALOG_PATH)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn with_spread(mut self, spread: Spread) -> Self {
        self.spread = spread;
        self
    }

    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    pub fn without_latency(self) -> Self {
        self.with_latency(LatencyProfile::none())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Loads the configured catalog, or the built-in table.
    pub fn load_catalog(&self) -> Result<Arc<PriceCatalog>, CoreError> {
        let catalog = match &self.catalog_path {
            Some(path) => PriceCatalog::load(path)?,
            None => PriceCatalog::standard(),
        };
        Ok(Arc::new(catalog))
    }

    pub fn simulated_source(&self, catalog: Arc<PriceCatalog>) -> SimulatedSource {
        let source = SimulatedSource::new(PriceSynthesizer::new(catalog, self.spread))
            .with_latency(self.latency);
        match self.seed {
            Some(seed) => source.with_seed(seed),
            None => source,
        }
    }

    /// Wires catalog, simulated source, and aggregator.
    pub fn build_aggregator(&self) -> Result<Aggregator, CoreError> {
        let catalog = self.load_catalog()?;
        let source = self.simulated_source(Arc::clone(&catalog));
        Ok(Aggregator::new(Arc::new(source), catalog))
    }
}

fn parse_setting<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidSetting {
            key,
            value: raw.to_owned(),
        })
}
