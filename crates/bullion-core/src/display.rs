//! Human-readable formatting for quotes, mirroring the card and details views.

use crate::{MetalDetails, PriceQuote};

/// `$1,950.50`; negatives render as `-$0.15`.
pub fn format_price(value: f64) -> String {
    let rounded = round_half_up(value.abs(), 2);
    let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "" };
    let fixed = format!("{rounded:.2}");
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// `+$12.30 (+0.63%)` or `-$0.15 (-0.64%)`.
pub fn format_change(change: f64, percent: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!(
        "{sign}{} ({sign}{:.2}%)",
        format_price(change),
        round_half_up(percent, 2)
    )
}

/// `1.3M`, `850.0K`, or the raw count below one thousand.
pub fn format_volume(volume: u64) -> String {
    if volume >= 1_000_000 {
        format!("{:.1}M", round_half_up(volume as f64 / 1_000_000.0, 1))
    } else if volume >= 1_000 {
        format!("{:.1}K", round_half_up(volume as f64 / 1_000.0, 1))
    } else {
        volume.to_string()
    }
}

/// `$12.0T`, `$800.0B`, `$1.5M`, or `N/A` when absent or zero.
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    let Some(value) = market_cap.filter(|value| *value > 0.0) else {
        return String::from("N/A");
    };

    if value >= 1e12 {
        format!("${:.1}T", round_half_up(value / 1e12, 1))
    } else if value >= 1e9 {
        format!("${:.1}B", round_half_up(value / 1e9, 1))
    } else if value >= 1e6 {
        format!("${:.1}M", round_half_up(value / 1e6, 1))
    } else {
        format_price(value)
    }
}

/// One-line card summary: `Gold  $1,950.50  +$12.30 (+0.63%)  02:15 PM`.
pub fn card_line(quote: &PriceQuote) -> String {
    format!(
        "{:<10} {:>12}  {:<22} {}",
        quote.metal,
        format_price(quote.price),
        format_change(quote.change_24h, quote.change_percent_24h),
        quote.timestamp.time_of_day()
    )
}

/// Labelled rows for the details view.
pub fn detail_rows(details: &MetalDetails) -> Vec<(&'static str, String)> {
    let quote = &details.quote;
    vec![
        ("metal", quote.metal.clone()),
        ("price", format_price(quote.price)),
        (
            "change_24h",
            format_change(quote.change_24h, quote.change_percent_24h),
        ),
        ("unit", quote.unit.clone()),
        ("previous_close", format_price(quote.previous_close)),
        ("previous_open", format_price(quote.previous_open)),
        ("high_24h", format_price(quote.high_24h)),
        ("low_24h", format_price(quote.low_24h)),
        ("volume_24h", format_volume(quote.volume_24h)),
        ("market_cap", format_market_cap(details.market_cap)),
        ("purity", details.purity.clone()),
        ("last_updated", quote.timestamp.time_of_day()),
    ]
}

// `{:.N}` rounds ties to even; display figures round ties away from zero.
fn round_half_up(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
