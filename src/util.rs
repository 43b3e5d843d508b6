use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn utc_compact_string(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

pub fn sha256_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sheet for hashing: {}", path.display()))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

// Writes next to the target and renames over it so readers never observe a
// half-written document.
pub fn write_text_atomic(path: &Path, contents: &str) -> Result<()> {
    ensure_parent(path)?;

    let staging = staging_path(path);
    fs::write(&staging, contents)
        .with_context(|| format!("failed to write staging file: {}", staging.display()))?;
    fs::rename(&staging, path).with_context(|| {
        format!(
            "failed to move {} into place at {}",
            staging.display(),
            path.display()
        )
    })
}

pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut data = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;
    data.push('\n');
    write_text_atomic(path, &data)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn compact_timestamp_is_filename_safe() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 1, 8, 5, 9).single().expect("valid time");
        assert_eq!(utc_compact_string(ts), "20241001T080509Z");
    }

    #[test]
    fn hashes_sheet_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page1.json");
        fs::write(&path, "abc").expect("write");

        assert_eq!(
            sha256_file(&path).expect("hash"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn atomic_write_creates_parents_and_leaves_no_staging_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("deck").join("PPT1.html");

        write_text_atomic(&path, "<html></html>").expect("write");
        write_text_atomic(&path, "<html>2</html>").expect("overwrite");

        assert_eq!(fs::read_to_string(&path).expect("read"), "<html>2</html>");
        assert!(!staging_path(&path).exists());
    }
}
