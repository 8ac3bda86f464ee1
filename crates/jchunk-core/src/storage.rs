//! Write reports and per-artifact records to disk.

use crate::report::SUMMARY_FILE;
use crate::schema;
use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a record to `path`, creating parent directories if needed.
pub fn write_report<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }
    let json = schema::to_json(value, pretty)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Write one per-artifact record into `dir`, returning its path.
pub fn write_artifact<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    value: &T,
    pretty: bool,
) -> Result<PathBuf> {
    let path = dir.join(file_name);
    write_report(&path, value, pretty)?;
    Ok(path)
}

/// Path of the project summary inside an artifact directory.
pub fn summary_file(dir: &Path) -> PathBuf {
    dir.join(SUMMARY_FILE)
}

/// Read a previously written record.
pub fn read_report<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    schema::from_json(&json)
}
