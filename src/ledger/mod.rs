use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::errors::{FixtureError, Result};
use crate::metrics;
use crate::models::{Position, PositionRecord};

const INDENT: &[u8] = b"    ";

/// Encode positions as a JSON array of ledger records, four-space indented.
pub fn serialize(positions: &[Position]) -> Result<Vec<u8>> {
    let records: Vec<PositionRecord> = positions.iter().map(PositionRecord::from).collect();

    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut ser)?;
    Ok(buf)
}

/// Write the ledger to `path`, replacing any existing file.
///
/// The bytes go to a temporary file next to `path` which is then renamed
/// over it, so readers see either the previous file or the complete new one.
pub fn write_ledger(path: &Path, positions: &[Position]) -> Result<()> {
    let bytes = serialize(positions)?;

    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut builder = tempfile::Builder::new();
    builder.prefix(".positions-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }

    let mut tmp = builder
        .tempfile_in(dir)
        .map_err(|e| FixtureError::io(path, e))?;
    tmp.write_all(&bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| FixtureError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| FixtureError::io(path, e.error))?;

    metrics::record_ledger_write();
    tracing::info!(
        path = %path.display(),
        positions = positions.len(),
        bytes = bytes.len(),
        "Ledger written"
    );
    Ok(())
}

/// Decode a ledger produced by [`serialize`].
pub fn parse_ledger(bytes: &[u8]) -> Result<Vec<Position>> {
    let records: Vec<PositionRecord> = serde_json::from_slice(bytes)?;
    records.into_iter().map(Position::try_from).collect()
}

pub fn read_ledger(path: &Path) -> Result<Vec<Position>> {
    let bytes = fs::read(path).map_err(|e| FixtureError::io(path, e))?;
    let positions = parse_ledger(&bytes)?;
    tracing::debug!(path = %path.display(), positions = positions.len(), "Ledger loaded");
    Ok(positions)
}
