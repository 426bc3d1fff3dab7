//! # Domain Models
//!
//! Canonical domain types for bullion quotes.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MetalKind`] | One of the four tracked metals |
//! | [`MetalProfile`] | Static baseline and reference data for a metal |
//! | [`PriceQuote`] | Point-in-time synthesized quote |
//! | [`MetalDetails`] | Quote plus description, purity, and market cap |
//! | [`UtcDateTime`] | UTC timestamp |

mod metal;
mod models;
mod timestamp;

pub use metal::MetalKind;
pub use models::{validate_currency_code, MetalDetails, MetalProfile, PriceQuote};
pub use timestamp::UtcDateTime;
