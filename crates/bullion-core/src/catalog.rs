//! Static baseline table, one [`MetalProfile`] per [`MetalKind`].

use std::fs;
use std::path::Path;

use crate::{CoreError, MetalKind, MetalProfile, ValidationError};

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_UNIT: &str = "per troy ounce";
const DEFAULT_PURITY: &str = "24 Karat (99.9% pure)";

/// Immutable catalog of metal profiles.
///
/// Constructed once at startup and shared by reference (usually behind an
/// `Arc`) with the synthesizer and aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCatalog {
    // Ordered by `MetalKind::index`, always one entry per kind.
    profiles: Vec<MetalProfile>,
}

impl Default for PriceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl PriceCatalog {
    /// The built-in baseline table.
    pub fn standard() -> Self {
        let profiles = vec![
            standard_profile(
                MetalKind::Gold,
                Baseline {
                    price: 1950.50,
                    change_24h: 12.30,
                    change_percent_24h: 0.63,
                    previous_close: 1938.20,
                    previous_open: 1935.80,
                    high_24h: 1962.40,
                    low_24h: 1930.10,
                    volume_24h: 1_250_000,
                    market_cap: 12_000_000_000_000.0,
                },
                "Gold is a precious metal that has been used as currency and jewelry for thousands \
                 of years. It is highly valued for its rarity, beauty, and resistance to corrosion. \
                 Gold is considered a safe-haven asset and is often used as a hedge against \
                 inflation and economic uncertainty.",
            ),
            standard_profile(
                MetalKind::Silver,
                Baseline {
                    price: 23.45,
                    change_24h: -0.15,
                    change_percent_24h: -0.64,
                    previous_close: 23.60,
                    previous_open: 23.55,
                    high_24h: 23.80,
                    low_24h: 23.20,
                    volume_24h: 850_000,
                    market_cap: 1_500_000_000_000.0,
                },
                "Silver is a precious metal with excellent electrical conductivity and \
                 antimicrobial properties. It is used in jewelry, electronics, and industrial \
                 applications. Silver is also considered a precious metal investment and is often \
                 used in coinage and bullion.",
            ),
            standard_profile(
                MetalKind::Platinum,
                Baseline {
                    price: 985.75,
                    change_24h: 8.25,
                    change_percent_24h: 0.84,
                    previous_close: 977.50,
                    previous_open: 975.20,
                    high_24h: 990.30,
                    low_24h: 970.80,
                    volume_24h: 450_000,
                    market_cap: 800_000_000_000.0,
                },
                "Platinum is a rare, dense, and corrosion-resistant metal. It is used in catalytic \
                 converters, jewelry, and various industrial applications. Platinum is one of the \
                 rarest precious metals and is highly valued for its unique properties and \
                 industrial uses.",
            ),
            standard_profile(
                MetalKind::Palladium,
                Baseline {
                    price: 1250.30,
                    change_24h: -5.70,
                    change_percent_24h: -0.45,
                    previous_close: 1256.00,
                    previous_open: 1258.50,
                    high_24h: 1265.20,
                    low_24h: 1245.80,
                    volume_24h: 320_000,
                    market_cap: 600_000_000_000.0,
                },
                "Palladium is a rare silvery-white metal used primarily in catalytic converters \
                 for automobiles and in jewelry. It is part of the platinum group metals and is \
                 highly valued for its catalytic properties and rarity.",
            ),
        ];

        Self { profiles }
    }

    /// Builds a catalog from arbitrary profiles.
    ///
    /// Every metal must appear exactly once and every profile must validate.
    pub fn from_profiles(profiles: Vec<MetalProfile>) -> Result<Self, ValidationError> {
        let mut slots: Vec<Option<MetalProfile>> = vec![None; MetalKind::ALL.len()];

        for profile in profiles {
            profile.validate()?;
            let slot = &mut slots[profile.kind.index()];
            if slot.is_some() {
                return Err(ValidationError::DuplicateProfile {
                    kind: profile.kind.as_str(),
                });
            }
            *slot = Some(profile);
        }

        let profiles = MetalKind::ALL
            .iter()
            .zip(slots)
            .map(|(kind, slot)| {
                slot.ok_or(ValidationError::MissingProfile {
                    kind: kind.as_str(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { profiles })
    }

    /// Parses a JSON array of profiles.
    pub fn from_json_str(input: &str) -> Result<Self, CoreError> {
        let profiles: Vec<MetalProfile> = serde_json::from_str(input)?;
        Ok(Self::from_profiles(profiles)?)
    }

    /// Reads a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn lookup(&self, kind: MetalKind) -> &MetalProfile {
        &self.profiles[kind.index()]
    }

    /// Profiles in enumeration order.
    pub fn profiles(&self) -> &[MetalProfile] {
        &self.profiles
    }
}

struct Baseline {
    price: f64,
    change_24h: f64,
    change_percent_24h: f64,
    previous_close: f64,
    previous_open: f64,
    high_24h: f64,
    low_24h: f64,
    volume_24h: u64,
    market_cap: f64,
}

fn standard_profile(kind: MetalKind, baseline: Baseline, description: &str) -> MetalProfile {
    MetalProfile {
        kind,
        price: baseline.price,
        change_24h: baseline.change_24h,
        change_percent_24h: baseline.change_percent_24h,
        previous_close: baseline.previous_close,
        previous_open: baseline.previous_open,
        high_24h: baseline.high_24h,
        low_24h: baseline.low_24h,
        volume_24h: baseline.volume_24h,
        currency: String::from(DEFAULT_CURRENCY),
        unit: String::from(DEFAULT_UNIT),
        description: description.to_owned(),
        purity: String::from(DEFAULT_PURITY),
        market_cap: Some(baseline.market_cap),
    }
}
