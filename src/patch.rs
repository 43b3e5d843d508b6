use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use serde::Serialize;
use tracing::warn;

use crate::model::TextUpdate;

const PAGE1_BLOCK_PATTERN: &str =
    r"const PAGE1_DATA = /\* PAGE1_DATA_START \*/[\s\S]*?/\* PAGE1_DATA_END \*/;";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    Unchanged,
    MissingElement,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchCounts {
    pub applied: usize,
    pub missed: usize,
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn replace_content_by_id(html: &mut String, id: &str, value: &str) -> Result<PatchOutcome> {
    if value.is_empty() {
        return Ok(PatchOutcome::Unchanged);
    }

    let pattern = Regex::new(&format!(
        r#"(<[^>]*id="{}"[^>]*>)[\s\S]*?(</[^>]+>)"#,
        regex::escape(id)
    ))
    .with_context(|| format!("failed to compile element pattern for id {id}"))?;

    let Some(captures) = pattern.captures(html) else {
        warn!(id, "element not found; leaving document unchanged");
        return Ok(PatchOutcome::MissingElement);
    };

    let (Some(open), Some(close)) = (captures.get(1), captures.get(2)) else {
        return Ok(PatchOutcome::MissingElement);
    };
    let (content_start, content_end) = (open.end(), close.start());
    html.replace_range(content_start..content_end, &escape_html(value));
    Ok(PatchOutcome::Applied)
}

pub fn apply_text_updates(html: &mut String, updates: &[TextUpdate]) -> Result<PatchCounts> {
    let mut counts = PatchCounts::default();
    for update in updates {
        match replace_content_by_id(html, &update.id, &update.value)? {
            PatchOutcome::Applied => counts.applied += 1,
            PatchOutcome::MissingElement => counts.missed += 1,
            PatchOutcome::Unchanged => {}
        }
    }
    Ok(counts)
}

pub fn apply_page1_constant<T: Serialize>(html: &mut String, record: &T) -> Result<bool> {
    let pattern = Regex::new(PAGE1_BLOCK_PATTERN).context("failed to compile PAGE1_DATA regex")?;
    if !pattern.is_match(html) {
        warn!("PAGE1_DATA block not found; skipping page 1 data update");
        return Ok(false);
    }

    let serialized =
        serde_json::to_string_pretty(record).context("failed to serialize page 1 record")?;
    let replacement = format!(
        "const PAGE1_DATA = /* PAGE1_DATA_START */ {serialized} /* PAGE1_DATA_END */;"
    );
    let updated = pattern.replace(html, NoExpand(&replacement)).into_owned();
    *html = updated;
    Ok(true)
}
