//! Most recent successful quote per metal, used as a fetch fallback.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{MetalKind, PriceQuote};

/// Thread-safe store of the latest live quote for each metal.
#[derive(Debug, Clone, Default)]
pub struct LastKnownStore {
    inner: Arc<tokio::sync::RwLock<HashMap<MetalKind, PriceQuote>>>,
}

impl LastKnownStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, kind: MetalKind) -> Option<PriceQuote> {
        let store = self.inner.read().await;
        store.get(&kind).cloned()
    }

    /// Records `quote` unless a newer one for the same metal is already stored.
    pub async fn record(&self, quote: &PriceQuote) {
        let mut store = self.inner.write().await;
        let newer_present = store
            .get(&quote.kind)
            .is_some_and(|existing| existing.timestamp > quote.timestamp);
        if !newer_present {
            store.insert(quote.kind, quote.clone());
        }
    }

    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.clear();
    }
}
