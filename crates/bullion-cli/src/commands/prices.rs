use bullion_core::display::card_line;
use bullion_core::{Aggregator, QuoteOrigin};

use crate::error::CliError;

use super::CommandResult;

pub async fn run(aggregator: &Aggregator) -> Result<CommandResult, CliError> {
    let aggregation = aggregator.aggregate_all().await;

    let table = aggregation
        .entries
        .iter()
        .map(|entry| match entry.origin {
            QuoteOrigin::Live => card_line(&entry.value),
            origin => format!("{}  [{}]", card_line(&entry.value), origin.as_str()),
        })
        .collect();
    let errors = aggregation.failures().cloned().collect();
    let data = serde_json::to_value(&aggregation.entries)?;

    Ok(CommandResult::ok(data, table)
        .with_warnings(aggregation.warnings)
        .with_errors(errors)
        .with_latency(aggregation.latency_ms)
        .with_source(aggregation.source))
}
