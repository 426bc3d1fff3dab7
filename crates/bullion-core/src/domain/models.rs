use serde::{Deserialize, Serialize};

use crate::{MetalKind, UtcDateTime, ValidationError};

/// Static reference data for one metal.
///
/// Baseline values are what the synthesizer perturbs; the remaining fields are
/// copied verbatim into every quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalProfile {
    pub kind: MetalKind,
    pub price: f64,
    pub change_24h: f64,
    pub change_percent_24h: f64,
    pub previous_close: f64,
    pub previous_open: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub volume_24h: u64,
    pub currency: String,
    pub unit: String,
    pub description: String,
    pub purity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}

impl MetalProfile {
    /// Checks numeric fields and the currency code.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_negative("price", self.price)?;
        validate_finite("change_24h", self.change_24h)?;
        validate_finite("change_percent_24h", self.change_percent_24h)?;
        validate_non_negative("previous_close", self.previous_close)?;
        validate_non_negative("previous_open", self.previous_open)?;
        validate_non_negative("high_24h", self.high_24h)?;
        validate_non_negative("low_24h", self.low_24h)?;
        validate_optional_non_negative("market_cap", self.market_cap)?;
        validate_currency_code(&self.currency)?;
        Ok(())
    }
}

/// Point-in-time synthesized quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub kind: MetalKind,
    pub metal: String,
    pub price: f64,
    pub currency: String,
    pub unit: String,
    pub timestamp: UtcDateTime,
    pub change_24h: f64,
    pub change_percent_24h: f64,
    pub previous_close: f64,
    pub previous_open: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub volume_24h: u64,
}

impl PriceQuote {
    /// Builds a quote from a profile with the given synthesized figures.
    pub fn from_profile(
        profile: &MetalProfile,
        price: f64,
        change_24h: f64,
        change_percent_24h: f64,
        timestamp: UtcDateTime,
    ) -> Self {
        Self {
            kind: profile.kind,
            metal: profile.kind.display_name().to_owned(),
            price,
            currency: profile.currency.clone(),
            unit: profile.unit.clone(),
            timestamp,
            change_24h,
            change_percent_24h,
            previous_close: profile.previous_close,
            previous_open: profile.previous_open,
            high_24h: profile.high_24h,
            low_24h: profile.low_24h,
            volume_24h: profile.volume_24h,
        }
    }

    /// Unperturbed quote carrying the profile's baseline figures.
    pub fn baseline(profile: &MetalProfile, timestamp: UtcDateTime) -> Self {
        Self::from_profile(
            profile,
            profile.price,
            profile.change_24h,
            profile.change_percent_24h,
            timestamp,
        )
    }

    pub fn is_gain(&self) -> bool {
        self.change_24h >= 0.0
    }
}

/// Quote merged with the descriptive fields shown on the details screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalDetails {
    #[serde(flatten)]
    pub quote: PriceQuote,
    pub description: String,
    pub purity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}

impl MetalDetails {
    pub fn new(quote: PriceQuote, profile: &MetalProfile) -> Self {
        Self {
            quote,
            description: profile.description.clone(),
            purity: profile.purity.clone(),
            market_cap: profile.market_cap,
        }
    }
}

pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let valid = input.len() == 3 && input.chars().all(|ch| ch.is_ascii_uppercase());
    if !valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }
    Ok(input.to_owned())
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn validate_optional_non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        validate_non_negative(field, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PriceCatalog;

    #[test]
    fn rejects_negative_price() {
        let mut profile = PriceCatalog::standard().lookup(MetalKind::Gold).clone();
        profile.price = -1.0;
        let err = profile.validate().expect_err("must fail");
        assert_eq!(err, ValidationError::NegativeValue { field: "price" });
    }

    #[test]
    fn rejects_lowercase_currency() {
        let err = validate_currency_code("usd").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidCurrency { .. }));
    }

    #[test]
    fn negative_change_is_allowed() {
        let profile = PriceCatalog::standard().lookup(MetalKind::Silver).clone();
        assert!(profile.change_24h < 0.0);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn details_flatten_quote_fields() {
        let catalog = PriceCatalog::standard();
        let profile = catalog.lookup(MetalKind::Gold);
        let quote = PriceQuote::from_profile(profile, 1.0, 0.0, 0.0, UtcDateTime::now());
        let details = MetalDetails::new(quote, profile);

        let value = serde_json::to_value(&details).expect("serializes");
        assert_eq!(value["metal"], "Gold");
        assert_eq!(value["purity"], "24 Karat (99.9% pure)");
        assert!(value.get("quote").is_none());
    }
}
