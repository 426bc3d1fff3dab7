//! Data source trait and fetch error types.
//!
//! The aggregator talks to quotes only through [`DataSource`]. The bundled
//! [`SimulatedSource`](crate::adapters::SimulatedSource) synthesizes locally;
//! an upstream market-data adapter would implement the same trait.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Serialize, Serializer};

use crate::{MetalKind, PriceQuote};

/// Generic message surfaced to end users for any fetch failure.
pub const FAILED_TO_LOAD: &str = "failed to load";

/// Stable identifier of a data source, used in logs and envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(&'static str);

impl SourceId {
    pub const SIMULATED: Self = Self("simulated");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for SourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0)
    }
}

/// Health state reported by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Runtime source health snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub state: HealthState,
    pub rate_available: bool,
}

impl HealthStatus {
    pub const fn new(state: HealthState, rate_available: bool) -> Self {
        Self {
            state,
            rate_available,
        }
    }

    pub const fn healthy() -> Self {
        Self::new(HealthState::Healthy, true)
    }
}

/// Classification of a failed per-metal fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    Unavailable,
    RateLimited,
    Internal,
}

/// A per-metal fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    kind: FetchFailureKind,
    metal: MetalKind,
    message: String,
    retryable: bool,
}

impl FetchFailure {
    pub fn unavailable(metal: MetalKind, message: impl Into<String>) -> Self {
        Self {
            kind: FetchFailureKind::Unavailable,
            metal,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(metal: MetalKind, message: impl Into<String>) -> Self {
        Self {
            kind: FetchFailureKind::RateLimited,
            metal,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn internal(metal: MetalKind, message: impl Into<String>) -> Self {
        Self {
            kind: FetchFailureKind::Internal,
            metal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> FetchFailureKind {
        self.kind
    }

    pub const fn metal(&self) -> MetalKind {
        self.metal
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchFailureKind::Unavailable => "fetch.unavailable",
            FetchFailureKind::RateLimited => "fetch.rate_limited",
            FetchFailureKind::Internal => "fetch.internal",
        }
    }

    /// Message suitable for an error banner.
    pub fn user_message(&self) -> String {
        format!("{} {} price", capitalize(FAILED_TO_LOAD), self.metal.display_name())
    }
}

impl Display for FetchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.metal, self.message, self.code())
    }
}

impl std::error::Error for FetchFailure {}

impl Serialize for FetchFailure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("FetchFailure", 4)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("metal", &self.metal)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("retryable", &self.retryable)?;
        state.end()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub type QuoteFuture<'a> =
    Pin<Box<dyn Future<Output = Result<PriceQuote, FetchFailure>> + Send + 'a>>;

/// Quote source contract.
///
/// Implementations must be `Send + Sync`; the aggregator issues one `quote`
/// call per metal concurrently against a shared reference.
pub trait DataSource: Send + Sync {
    /// Returns the source identifier.
    fn id(&self) -> SourceId;

    /// Fetches the current quote for one metal.
    ///
    /// # Errors
    ///
    /// Returns [`FetchFailure`] when the source cannot produce a quote. The
    /// simulated source never fails.
    fn quote<'a>(&'a self, kind: MetalKind) -> QuoteFuture<'a>;

    /// Returns the current health status of this source.
    fn health<'a>(&'a self) -> Pin<Box<dyn Future<Output = HealthStatus> + Send + 'a>>;
}
