use bullion_core::display::card_line;
use bullion_core::{Aggregator, MetalKind};

use crate::error::CliError;

use super::CommandResult;

pub async fn run(aggregator: &Aggregator, kind: MetalKind) -> Result<CommandResult, CliError> {
    let entry = aggregator.refresh(kind).await;

    let table = vec![card_line(&entry.value)];
    let warnings = entry
        .failure
        .iter()
        .map(|failure| failure.user_message())
        .collect();
    let errors = entry.failure.iter().cloned().collect();
    let data = serde_json::to_value(&entry)?;

    Ok(CommandResult::ok(data, table)
        .with_warnings(warnings)
        .with_errors(errors)
        .with_latency(entry.latency_ms)
        .with_source(aggregator.source_id()))
}
