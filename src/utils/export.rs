//! export.rs
//! CSV export of send statistics (one row per snapshot, header on first write).

use std::{
    fs::{OpenOptions, create_dir_all},
    io,
    path::Path,
};
use csv::WriterBuilder;
use log::info;

use crate::utils::metrics::StatsSnapshot;

/// Appends snapshots to `path`, creating parent directories and writing the
/// header only when the file is new or empty.
pub fn export_stats_csv(path: &Path, snapshots: &[StatsSnapshot]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }

    let needs_header = path.metadata().map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new().has_headers(needs_header).from_writer(file);

    for snapshot in snapshots {
        writer.serialize(snapshot)?;
    }
    writer.flush()?;

    info!("[Export] {} stats rows written to {}", snapshots.len(), path.display());
    Ok(())
}
