use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::util::write_text_atomic;

const ASSIGNMENT_PREFIX: &str = "window.PAGES_DATA = ";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    pages: Map<String, Value>,
}

impl PersistedState {
    pub fn page(&self, key: &str) -> Option<&Value> {
        self.pages.get(key)
    }

    pub fn set_page(&mut self, key: &str, record: Value) {
        self.pages.insert(key.to_string(), record);
    }

    pub fn pages(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn render(&self) -> Result<String> {
        let body = serde_json::to_string_pretty(&self.pages)
            .context("failed to serialize persisted page data")?;
        Ok(format!("{ASSIGNMENT_PREFIX}{body};\n"))
    }
}

pub fn load_page_data(path: &Path) -> Result<PersistedState> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "page data missing; starting from empty state");
            return Ok(PersistedState::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    let Ok(raw) = String::from_utf8(bytes) else {
        warn!(path = %path.display(), "page data is not valid UTF-8; starting from empty state");
        return Ok(PersistedState::default());
    };

    match parse_page_data(&raw)? {
        Some(pages) => Ok(PersistedState { pages }),
        None => {
            warn!(path = %path.display(), "page data is not a PAGES_DATA assignment; starting from empty state");
            Ok(PersistedState::default())
        }
    }
}

fn parse_page_data(raw: &str) -> Result<Option<Map<String, Value>>> {
    let pattern = Regex::new(r"window\.PAGES_DATA\s*=\s*(\{[\s\S]*\});?")
        .context("failed to compile page data regex")?;

    let Some(body) = pattern
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str())
    else {
        return Ok(None);
    };

    Ok(serde_json::from_str::<Map<String, Value>>(body).ok())
}

pub fn write_page_data(path: &Path, state: &PersistedState) -> Result<()> {
    write_text_atomic(path, &state.render()?)
}
