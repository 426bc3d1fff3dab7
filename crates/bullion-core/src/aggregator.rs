use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::data_source::{DataSource, FetchFailure, HealthState, HealthStatus, SourceId};
use crate::last_known::LastKnownStore;
use crate::{duration_ms, MetalDetails, MetalKind, PriceCatalog, PriceQuote, UtcDateTime};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteOrigin {
    /// Fresh from the data source.
    Live,
    /// Most recent live quote, re-served after a failed fetch.
    LastKnown,
    /// Catalog baseline, served when nothing live has been seen yet.
    Baseline,
}

impl QuoteOrigin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::LastKnown => "last_known",
            Self::Baseline => "baseline",
        }
    }
}

/// A per-metal value together with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Sourced<T> {
    pub kind: MetalKind,
    pub origin: QuoteOrigin,
    pub value: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FetchFailure>,
    /// Time spent resolving this entry, fallback included.
    pub latency_ms: u64,
}

impl<T> Sourced<T> {
    pub fn is_live(&self) -> bool {
        self.origin == QuoteOrigin::Live
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            kind: self.kind,
            origin: self.origin,
            value: f(self.value),
            failure: self.failure,
            latency_ms: self.latency_ms,
        }
    }

    fn fallback_warning(&self) -> Option<String> {
        self.failure.as_ref().map(|failure| {
            format!(
                "{} quote served from {} after fetch failure: {}",
                self.kind,
                self.origin.as_str(),
                failure.message()
            )
        })
    }
}

/// Result of an aggregate fetch across every tracked metal.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregation {
    pub source: SourceId,
    /// One entry per metal, in [`MetalKind::ALL`] order.
    pub entries: Vec<Sourced<PriceQuote>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub latency_ms: u64,
}

impl Aggregation {
    pub fn failures(&self) -> impl Iterator<Item = &FetchFailure> {
        self.entries.iter().filter_map(|entry| entry.failure.as_ref())
    }

    /// True when every entry is live.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(Sourced::is_live)
    }

    pub fn get(&self, kind: MetalKind) -> Option<&Sourced<PriceQuote>> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }
}

/// Fans out one quote request per metal and assembles the results.
///
/// A failed metal never affects its siblings: its slot is filled from the
/// last-known store, or from the catalog baseline when nothing live has been
/// recorded yet.
pub struct Aggregator {
    source: Arc<dyn DataSource>,
    catalog: Arc<PriceCatalog>,
    last_known: LastKnownStore,
}

impl Aggregator {
    pub fn new(source: Arc<dyn DataSource>, catalog: Arc<PriceCatalog>) -> Self {
        Self {
            source,
            catalog,
            last_known: LastKnownStore::new(),
        }
    }

    /// Shares an existing store, e.g. across aggregators for the same UI.
    pub fn with_last_known(mut self, last_known: LastKnownStore) -> Self {
        self.last_known = last_known;
        self
    }

    pub fn source_id(&self) -> SourceId {
        self.source.id()
    }

    pub fn catalog(&self) -> &Arc<PriceCatalog> {
        &self.catalog
    }

    pub fn last_known(&self) -> &LastKnownStore {
        &self.last_known
    }

    /// Fetches every metal concurrently. Output order is enumeration order.
    pub async fn aggregate_all(&self) -> Aggregation {
        let started = Instant::now();
        let health = self.source.health().await;

        let entries = join_all(
            MetalKind::ALL
                .iter()
                .map(|&kind| self.fetch_one(kind, health)),
        )
        .await;

        let warnings = entries
            .iter()
            .filter_map(Sourced::fallback_warning)
            .collect::<Vec<_>>();
        let latency_ms = duration_ms(started.elapsed());

        info!(
            source = %self.source.id(),
            live = entries.iter().filter(|entry| entry.is_live()).count(),
            fallbacks = warnings.len(),
            latency_ms,
            "aggregated metal quotes"
        );

        Aggregation {
            source: self.source.id(),
            entries,
            warnings,
            latency_ms,
        }
    }

    /// Single-metal refresh with the same fallback policy as [`aggregate_all`](Self::aggregate_all).
    pub async fn refresh(&self, kind: MetalKind) -> Sourced<PriceQuote> {
        let health = self.source.health().await;
        self.fetch_one(kind, health).await
    }

    /// Resolved quote merged with the catalog's descriptive fields.
    pub async fn details(&self, kind: MetalKind) -> Sourced<MetalDetails> {
        let entry = self.refresh(kind).await;
        let profile = self.catalog.lookup(kind);
        entry.map(|quote| MetalDetails::new(quote, profile))
    }

    async fn fetch_one(&self, kind: MetalKind, health: HealthStatus) -> Sourced<PriceQuote> {
        let started = Instant::now();
        let result = match precheck(self.source.id(), kind, health) {
            Some(failure) => Err(failure),
            None => self.source.quote(kind).await,
        };

        let mut entry = match result {
            Ok(quote) => {
                debug!(metal = %kind, price = quote.price, "live quote");
                self.last_known.record(&quote).await;
                Sourced {
                    kind,
                    origin: QuoteOrigin::Live,
                    value: quote,
                    failure: None,
                    latency_ms: 0,
                }
            }
            Err(failure) => self.fall_back(kind, failure).await,
        };
        entry.latency_ms = duration_ms(started.elapsed());
        entry
    }

    async fn fall_back(&self, kind: MetalKind, failure: FetchFailure) -> Sourced<PriceQuote> {
        let (origin, value) = match self.last_known.get(kind).await {
            Some(quote) => (QuoteOrigin::LastKnown, quote),
            None => (
                QuoteOrigin::Baseline,
                PriceQuote::baseline(self.catalog.lookup(kind), UtcDateTime::now()),
            ),
        };

        warn!(
            metal = %kind,
            code = failure.code(),
            origin = origin.as_str(),
            "quote fetch failed, serving fallback: {}",
            failure.message()
        );

        Sourced {
            kind,
            origin,
            value,
            failure: Some(failure),
            latency_ms: 0,
        }
    }
}

fn precheck(source: SourceId, kind: MetalKind, health: HealthStatus) -> Option<FetchFailure> {
    if health.state == HealthState::Unhealthy {
        return Some(FetchFailure::unavailable(
            kind,
            format!("source '{source}' health check reported unhealthy"),
        ));
    }
    if !health.rate_available {
        return Some(FetchFailure::rate_limited(
            kind,
            format!("source '{source}' has no rate budget available"),
        ));
    }
    None
}


#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use super::*;
    use crate::adapters::{LatencyProfile, SimulatedSource};
    use crate::data_source::QuoteFuture;
    use crate::jitter::Spread;
    use crate::synthesizer::PriceSynthesizer;

    fn simulated(catalog: &Arc<PriceCatalog>, spread: Spread) -> Arc<dyn DataSource> {
        Arc::new(
            SimulatedSource::new(PriceSynthesizer::new(Arc::clone(catalog), spread))
                .with_latency(LatencyProfile::none()),
        )
    }

    /// Fails for one metal, delegates to a zero-spread simulation otherwise.
    struct FailingFor {
        failing: MetalKind,
        inner: Arc<dyn DataSource>,
    }

    impl DataSource for FailingFor {
        fn id(&self) -> SourceId {
            SourceId::new("failing")
        }

        fn quote<'a>(&'a self, kind: MetalKind) -> QuoteFuture<'a> {
            Box::pin(async move {
                if kind == self.failing {
                    return Err(FetchFailure::unavailable(kind, "simulated outage"));
                }
                self.inner.quote(kind).await
            })
        }

        fn health<'a>(&'a self) -> Pin<Box<dyn Future<Output = HealthStatus> + Send + 'a>> {
            Box::pin(async { HealthStatus::healthy() })
        }
    }

    #[tokio::test]
    async fn returns_one_live_entry_per_metal_in_order() {
        let catalog = Arc::new(PriceCatalog::standard());
        let aggregator = Aggregator::new(simulated(&catalog, Spread::DEFAULT), catalog);

        let aggregation = aggregator.aggregate_all().await;

        let kinds = aggregation.entries.iter().map(|e| e.kind).collect::<Vec<_>>();
        assert_eq!(kinds, MetalKind::ALL.to_vec());
        assert!(aggregation.is_complete());
        assert!(aggregation.warnings.is_empty());
        assert_eq!(aggregator.last_known().len().await, 4);
    }

    #[tokio::test]
    async fn failed_metal_falls_back_to_baseline_without_touching_siblings() {
        let catalog = Arc::new(PriceCatalog::standard());
        let source = Arc::new(FailingFor {
            failing: MetalKind::Silver,
            inner: simulated(&catalog, Spread::ZERO),
        });
        let aggregator = Aggregator::new(source, Arc::clone(&catalog));

        let aggregation = aggregator.aggregate_all().await;

        assert_eq!(aggregation.entries.len(), 4);
        let silver = aggregation.get(MetalKind::Silver).expect("silver entry");
        assert_eq!(silver.origin, QuoteOrigin::Baseline);
        assert_eq!(silver.value.price, 23.45);
        assert!(silver.failure.is_some());
        for kind in [MetalKind::Gold, MetalKind::Platinum, MetalKind::Palladium] {
            assert!(aggregation.get(kind).expect("entry").is_live());
        }
        assert_eq!(aggregation.warnings.len(), 1);
        assert!(aggregation.warnings[0].contains("silver"));
    }

    #[tokio::test]
    async fn failed_metal_prefers_last_known_quote() {
        let catalog = Arc::new(PriceCatalog::standard());
        let healthy = Aggregator::new(simulated(&catalog, Spread::DEFAULT), Arc::clone(&catalog));
        let first = healthy.aggregate_all().await;
        let remembered = first.get(MetalKind::Gold).expect("gold").value.clone();

        let failing = Aggregator::new(
            Arc::new(FailingFor {
                failing: MetalKind::Gold,
                inner: simulated(&catalog, Spread::DEFAULT),
            }),
            Arc::clone(&catalog),
        )
        .with_last_known(healthy.last_known().clone());

        let gold = failing.refresh(MetalKind::Gold).await;

        assert_eq!(gold.origin, QuoteOrigin::LastKnown);
        assert_eq!(gold.value, remembered);
    }

    #[tokio::test]
    async fn unhealthy_source_is_not_called() {
        let catalog = Arc::new(PriceCatalog::standard());
        let source: Arc<dyn DataSource> = Arc::new(
            SimulatedSource::new(PriceSynthesizer::new(Arc::clone(&catalog), Spread::DEFAULT))
                .with_latency(LatencyProfile::none())
                .with_health(HealthState::Unhealthy),
        );
        let aggregator = Aggregator::new(source, catalog);

        let aggregation = aggregator.aggregate_all().await;

        assert!(aggregation.entries.iter().all(|e| e.origin == QuoteOrigin::Baseline));
        assert_eq!(aggregation.failures().count(), 4);
        assert!(aggregator.last_known().is_empty().await);
    }

    #[tokio::test]
    async fn details_merge_profile_fields() {
        let catalog = Arc::new(PriceCatalog::standard());
        let aggregator = Aggregator::new(simulated(&catalog, Spread::ZERO), catalog);

        let details = aggregator.details(MetalKind::Platinum).await;

        assert!(details.is_live());
        assert_eq!(details.value.quote.price, 985.75);
        assert_eq!(details.value.market_cap, Some(800_000_000_000.0));
    }
}
