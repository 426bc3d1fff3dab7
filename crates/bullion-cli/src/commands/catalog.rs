use bullion_core::display::{format_market_cap, format_price, format_volume};
use bullion_core::ServiceConfig;

use crate::error::CliError;

use super::CommandResult;

pub fn run(config: &ServiceConfig) -> Result<CommandResult, CliError> {
    let catalog = config.load_catalog()?;

    let table = catalog
        .profiles()
        .iter()
        .map(|profile| {
            format!(
                "{:<10} {:>12}  vol {:>7}  cap {:>8}  {}",
                profile.kind.display_name(),
                format_price(profile.price),
                format_volume(profile.volume_24h),
                format_market_cap(profile.market_cap),
                profile.purity
            )
        })
        .collect();
    let data = serde_json::to_value(catalog.profiles())?;

    Ok(CommandResult::ok(data, table))
}
