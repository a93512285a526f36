//! Dump command implementation.

use super::{CommandError, ConnectOptions};
use desec_sync_engine::MemoryZone;
use desec_sync_protocol::RecordSet;
use serde::Serialize;

/// Zone contents for output.
#[derive(Debug, Serialize)]
pub struct DumpOutput {
    /// Zone name.
    pub zone: String,
    /// Values skipped because their type is not managed.
    pub skipped: usize,
    /// Rrsets, ordered by name then type.
    pub records: Vec<RecordSet>,
}

/// Runs the dump command.
pub fn run(options: &ConnectOptions, zone: &str, format: &str) -> Result<(), CommandError> {
    if format != "text" && format != "json" {
        return Err(CommandError::UnknownFormat(format.to_string()));
    }

    let provider = options.connect()?;
    let mut memory = MemoryZone::new(zone);
    let report = provider.populate(&mut memory)?;

    let output = DumpOutput {
        zone: zone.to_string(),
        skipped: report.skipped,
        records: memory.to_record_sets(),
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => print!("{}", render_text(&output)),
    }

    Ok(())
}

/// Renders the zone in zone-file style, one line per value.
pub fn render_text(output: &DumpOutput) -> String {
    let mut text = format!(
        "; {} ({} rrsets, {} skipped)\n",
        output.zone,
        output.records.len(),
        output.skipped
    );
    for record in &output.records {
        let owner = if record.name.is_empty() { "@" } else { record.name.as_str() };
        for value in &record.values {
            text.push_str(&format!(
                "{:<24} {:>6} IN {:<6} {}\n",
                owner, record.ttl, record.rtype, value
            ));
        }
    }
    text
}
