use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::grid::{Grid, Row, cell, is_blank_row, parse_number};
use crate::model::{
    ChartSeries, GenericField, GenericPageRecord, LabelValueDesc, LabelValueTag, NamedSeries,
    NamedValue, Page1Record, Page2Record, PageRecord, RankingRow, RingBuckets, Route, SeriesAxis,
    TextUpdate, TrendSeries, ValueDesc,
};

mod columns;
mod cursor;
mod dispatch;
mod interpret;
mod legacy;
mod schema;
#[cfg(test)]
mod tests;

pub use columns::ColumnRoleMap;
pub use schema::{LegacyFormat, SchemaPath, detect_schema};

use cursor::*;
use dispatch::*;
use interpret::*;
use legacy::*;

pub const GENERIC_PAGES: std::ops::RangeInclusive<u8> = 3..=13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageRole {
    Cover,
    Page1,
    Page2,
    Generic(u8),
    Unknown,
}

impl PageRole {
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        match tag.as_str() {
            "cover" => Self::Cover,
            "page1" => Self::Page1,
            "page2" => Self::Page2,
            _ => tag
                .strip_prefix("page")
                .and_then(|number| number.parse::<u8>().ok())
                .filter(|number| GENERIC_PAGES.contains(number))
                .map(Self::Generic)
                .unwrap_or(Self::Unknown),
        }
    }

    pub fn all() -> Vec<Self> {
        let mut roles = vec![Self::Cover, Self::Page1, Self::Page2];
        roles.extend(GENERIC_PAGES.map(Self::Generic));
        roles
    }

    pub fn page_number(self) -> Option<u8> {
        match self {
            Self::Page1 => Some(1),
            Self::Page2 => Some(2),
            Self::Generic(number) => Some(number),
            Self::Cover | Self::Unknown => None,
        }
    }

    pub fn page_key(self) -> Option<String> {
        self.page_number().map(|number| format!("page{number}"))
    }

    pub fn is_generic(self) -> bool {
        matches!(self, Self::Generic(_))
    }
}

impl fmt::Display for PageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cover => f.write_str("cover"),
            Self::Unknown => f.write_str("unknown"),
            other => write!(f, "page{}", other.page_number().unwrap_or_default()),
        }
    }
}

impl Serialize for PageRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSheet {
    pub role: PageRole,
    pub schema: SchemaPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnRoleMap>,
    pub text_updates: Vec<TextUpdate>,
    pub record: Option<PageRecord>,
}

impl ParsedSheet {
    fn empty(role: PageRole, schema: SchemaPath) -> Self {
        Self {
            role,
            schema,
            columns: None,
            text_updates: Vec::new(),
            record: None,
        }
    }
}

pub fn parse_sheet(grid: &Grid, role: PageRole) -> ParsedSheet {
    let schema = detect_schema(grid, role);
    debug!(role = %role, schema = schema.as_str(), rows = grid.len(), "detected sheet schema");

    match schema {
        SchemaPath::FieldKey => parse_field_key_sheet(grid, role),
        SchemaPath::Legacy(LegacyFormat::Cover) => ParsedSheet {
            text_updates: build_cover_updates(grid),
            ..ParsedSheet::empty(role, schema)
        },
        SchemaPath::Legacy(LegacyFormat::Page1) => ParsedSheet {
            record: Some(PageRecord::Page1(build_page1_record(grid))),
            ..ParsedSheet::empty(role, schema)
        },
        SchemaPath::Legacy(LegacyFormat::Page2) => ParsedSheet {
            record: Some(PageRecord::Page2(build_page2_record(grid))),
            ..ParsedSheet::empty(role, schema)
        },
        SchemaPath::Unsupported => ParsedSheet::empty(role, schema),
    }
}
