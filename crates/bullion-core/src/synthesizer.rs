use std::sync::Arc;

use crate::jitter::{jitter, RandomSource, Spread};
use crate::{MetalDetails, MetalKind, PriceCatalog, PriceQuote, UtcDateTime};

/// Turns catalog baselines into point-in-time quotes.
#[derive(Debug, Clone)]
pub struct PriceSynthesizer {
    catalog: Arc<PriceCatalog>,
    spread: Spread,
}

impl PriceSynthesizer {
    pub fn new(catalog: Arc<PriceCatalog>, spread: Spread) -> Self {
        Self { catalog, spread }
    }

    pub fn catalog(&self) -> &Arc<PriceCatalog> {
        &self.catalog
    }

    pub const fn spread(&self) -> Spread {
        self.spread
    }

    /// Synthesizes one quote stamped with the current time.
    ///
    /// The price gets one factor at the configured spread; both change figures
    /// share a second factor at half the spread. Everything else is copied from
    /// the profile.
    pub fn synthesize<R: RandomSource + ?Sized>(&self, kind: MetalKind, rng: &mut R) -> PriceQuote {
        let profile = self.catalog.lookup(kind);
        let price_factor = jitter(self.spread, rng);
        let change_factor = jitter(self.spread.dampened(), rng);

        PriceQuote::from_profile(
            profile,
            profile.price * price_factor,
            profile.change_24h * change_factor,
            profile.change_percent_24h * change_factor,
            UtcDateTime::now(),
        )
    }

    /// Synthesizes a quote and merges the profile's descriptive fields.
    pub fn details<R: RandomSource + ?Sized>(&self, kind: MetalKind, rng: &mut R) -> MetalDetails {
        let quote = self.synthesize(kind, rng);
        MetalDetails::new(quote, self.catalog.lookup(kind))
    }
}
