use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::merge::is_blank;
use crate::model::SyncRunSnapshot;
use crate::state::load_page_data;

pub fn run(args: StatusArgs) -> Result<()> {
    info!(
        page_data = %args.page_data.display(),
        cache_root = %args.cache_root.display(),
        "status requested"
    );

    let state = load_page_data(&args.page_data)?;
    if state.is_empty() {
        warn!(path = %args.page_data.display(), "no persisted pages");
    }
    for (page_key, record) in state.pages() {
        let fields = filled_fields(record);
        info!(
            page = %page_key,
            filled = fields.len(),
            fields = %fields.join(","),
            "persisted page"
        );
    }

    let manifest_dir = args.cache_root.join("manifests");
    match latest_run_manifest(&manifest_dir)? {
        Some(path) => {
            let raw = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let snapshot: SyncRunSnapshot = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            info!(
                path = %path.display(),
                run_id = %snapshot.run_id.unwrap_or_default(),
                status = %snapshot.status.unwrap_or_default(),
                updated_at = %snapshot.updated_at.unwrap_or_default(),
                pages = snapshot.pages.len(),
                warnings = snapshot.warnings.len(),
                "latest sync run"
            );
            for page in &snapshot.pages {
                info!(
                    page = %page.page_key,
                    schema = %page.schema,
                    updates = page.text_updates,
                    sha256 = %page.sha256,
                    "synced page"
                );
            }
            for warning in &snapshot.warnings {
                warn!(warning = %warning, "sync run warning");
            }
        }
        None => warn!(path = %manifest_dir.display(), "no sync run manifest found"),
    }

    Ok(())
}

fn filled_fields(record: &Value) -> Vec<&str> {
    match record {
        Value::Object(fields) => fields
            .iter()
            .filter(|(_, value)| !is_blank(value))
            .map(|(key, _)| key.as_str())
            .collect(),
        _ => Vec::new(),
    }
}

// Manifest names embed a compact UTC timestamp, so the lexically greatest
// name is the newest run.
fn latest_run_manifest(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    let entries = match fs::read_dir(manifest_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", manifest_dir.display()));
        }
    };

    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();
        let is_run_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("sync_run_") && name.ends_with(".json"));

        if is_run_manifest && latest.as_ref().is_none_or(|current| path > *current) {
            latest = Some(path);
        }
    }

    Ok(latest)
}
