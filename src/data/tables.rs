use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};

use crate::backtest::{CoreSignalEvent, RippleOutcome};
use crate::config::PERSISTENCE;

/// Write `rows` as CSV with a header row taken from the field names.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create directory: {}", parent.display()))?;
    }
    let mut writer =
        csv::Writer::from_path(path).context(format!("Failed to create table: {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .context(format!("Failed to write row to: {}", path.display()))?;
    }
    writer
        .flush()
        .context(format!("Failed to flush table: {}", path.display()))?;
    Ok(())
}

pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader =
        csv::Reader::from_path(path).context(format!("Failed to open table: {}", path.display()))?;
    reader
        .deserialize()
        .enumerate()
        .map(|(idx, record)| record.context(format!("Bad record {} in {}", idx + 1, path.display())))
        .collect()
}

/// Boolean cell that also accepts the capitalised spellings pandas writes.
pub fn bool_cell<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    match text.trim() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(de::Error::custom(format!("expected a boolean, found '{}'", other))),
    }
}

pub fn save_core_signals(events: &[CoreSignalEvent]) -> Result<()> {
    write_table(Path::new(PERSISTENCE.tables.core_signals), events)
}

pub fn load_core_signals() -> Result<Vec<CoreSignalEvent>> {
    read_table(Path::new(PERSISTENCE.tables.core_signals))
}

pub fn save_ripple_results(outcomes: &[RippleOutcome]) -> Result<()> {
    write_table(Path::new(PERSISTENCE.tables.ripple_results), outcomes)
}

pub fn load_ripple_results() -> Result<Vec<RippleOutcome>> {
    read_table(Path::new(PERSISTENCE.tables.ripple_results))
}
