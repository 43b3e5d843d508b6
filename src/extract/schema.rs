use serde::{Serialize, Serializer};

use super::*;

const FIELD_KEY_MARKER: &str = "fieldkey";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyFormat {
    Cover,
    Page1,
    Page2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPath {
    FieldKey,
    Legacy(LegacyFormat),
    Unsupported,
}

impl SchemaPath {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FieldKey => "field_key",
            Self::Legacy(LegacyFormat::Cover) => "legacy_cover",
            Self::Legacy(LegacyFormat::Page1) => "legacy_page1",
            Self::Legacy(LegacyFormat::Page2) => "legacy_page2",
            Self::Unsupported => "unsupported",
        }
    }
}

impl Serialize for SchemaPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pub fn detect_schema(grid: &Grid, role: PageRole) -> SchemaPath {
    if has_field_key_header(grid.header()) {
        return SchemaPath::FieldKey;
    }

    match role {
        PageRole::Cover => SchemaPath::Legacy(LegacyFormat::Cover),
        PageRole::Page1 => SchemaPath::Legacy(LegacyFormat::Page1),
        PageRole::Page2 => SchemaPath::Legacy(LegacyFormat::Page2),
        PageRole::Generic(_) | PageRole::Unknown => SchemaPath::Unsupported,
    }
}

fn has_field_key_header(header: &[String]) -> bool {
    header
        .iter()
        .any(|text| compact_lowercase(text).contains(FIELD_KEY_MARKER))
}

fn compact_lowercase(text: &str) -> String {
    text.chars()
        .filter(|value| !value.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
