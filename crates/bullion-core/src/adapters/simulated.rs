use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::data_source::{DataSource, HealthState, HealthStatus, QuoteFuture, SourceId};
use crate::jitter::{FastRandSource, RandomSource};
use crate::synthesizer::PriceSynthesizer;
use crate::{duration_ms, MetalKind, ValidationError};

/// Uniform artificial delay applied before each simulated quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    min: Duration,
    max: Duration,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(500),
            max: Duration::from_millis(1500),
        }
    }
}

impl LatencyProfile {
    pub fn new(min: Duration, max: Duration) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::InvalidLatencyRange {
                min_ms: duration_ms(min),
                max_ms: duration_ms(max),
            });
        }
        Ok(Self { min, max })
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Result<Self, ValidationError> {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub const fn min(self) -> Duration {
        self.min
    }

    pub const fn max(self) -> Duration {
        self.max
    }

    pub fn sample<R: RandomSource + ?Sized>(self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let span = (self.max - self.min).as_secs_f64();
        self.min + Duration::from_secs_f64(span * rng.next_unit().clamp(0.0, 1.0))
    }
}

/// Local source that synthesizes quotes after an artificial delay.
#[derive(Debug)]
pub struct SimulatedSource {
    synthesizer: PriceSynthesizer,
    latency: LatencyProfile,
    seed: Option<u64>,
    calls: AtomicU64,
    health_state: HealthState,
}

impl SimulatedSource {
    pub fn new(synthesizer: PriceSynthesizer) -> Self {
        Self {
            synthesizer,
            latency: LatencyProfile::default(),
            seed: None,
            calls: AtomicU64::new(0),
            health_state: HealthState::Healthy,
        }
    }

    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Makes every draw reproducible for a given call sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_health(mut self, health_state: HealthState) -> Self {
        self.health_state = health_state;
        self
    }

    fn next_rng(&self) -> FastRandSource {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => FastRandSource::seeded(seed ^ call.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => FastRandSource::entropy(),
        }
    }
}

impl DataSource for SimulatedSource {
    fn id(&self) -> SourceId {
        SourceId::SIMULATED
    }

    fn quote<'a>(&'a self, kind: MetalKind) -> QuoteFuture<'a> {
        let mut rng = self.next_rng();
        Box::pin(async move {
            let delay = self.latency.sample(&mut rng);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let quote = self.synthesizer.synthesize(kind, &mut rng);
            debug!(
                metal = %kind,
                price = quote.price,
                delay_ms = duration_ms(delay),
                "synthesized quote"
            );
            Ok(quote)
        })
    }

    fn health<'a>(&'a self) -> Pin<Box<dyn Future<Output = HealthStatus> + Send + 'a>> {
        Box::pin(async move { HealthStatus::new(self.health_state, true) })
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use super::*;
    use crate::jitter::{FixedSource, Spread};
    use crate::PriceCatalog;

    fn source(spread: Spread) -> SimulatedSource {
        let catalog = Arc::new(PriceCatalog::standard());
        SimulatedSource::new(PriceSynthesizer::new(catalog, spread))
    }

    #[test]
    fn latency_sample_spans_range() {
        let latency = LatencyProfile::from_millis(500, 1500).expect("valid range");
        let mut rng = FixedSource::new(vec![0.0, 1.0, 0.5]);
        assert_eq!(latency.sample(&mut rng), Duration::from_millis(500));
        assert_eq!(latency.sample(&mut rng), Duration::from_millis(1500));
        assert_eq!(latency.sample(&mut rng), Duration::from_millis(1000));
    }

    #[test]
    fn rejects_inverted_latency_range() {
        let err = LatencyProfile::from_millis(20, 10).expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::InvalidLatencyRange {
                min_ms: 20,
                max_ms: 10
            }
        );
    }

    #[tokio::test]
    async fn zero_latency_quote_resolves_immediately() {
        let source = source(Spread::ZERO).with_latency(LatencyProfile::none());
        let started = Instant::now();

        let quote = source.quote(MetalKind::Gold).await.expect("never fails");

        assert_eq!(quote.price, 1950.50);
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn waits_at_least_the_minimum_delay() {
        let latency = LatencyProfile::from_millis(30, 40).expect("valid range");
        let source = source(Spread::DEFAULT).with_latency(latency);
        let started = Instant::now();

        source.quote(MetalKind::Silver).await.expect("never fails");

        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn seeded_sources_produce_identical_prices() {
        let first = source(Spread::DEFAULT)
            .with_latency(LatencyProfile::none())
            .with_seed(42);
        let second = source(Spread::DEFAULT)
            .with_latency(LatencyProfile::none())
            .with_seed(42);

        for kind in MetalKind::ALL {
            let a = first.quote(kind).await.expect("never fails");
            let b = second.quote(kind).await.expect("never fails");
            assert_eq!(a.price, b.price);
            assert_eq!(a.change_24h, b.change_24h);
        }
    }

    #[tokio::test]
    async fn reports_configured_health() {
        let source = source(Spread::DEFAULT).with_health(HealthState::Degraded);
        assert_eq!(source.health().await.state, HealthState::Degraded);
    }
}
