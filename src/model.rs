use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextUpdate {
    pub id: String,
    pub value: String,
}

impl TextUpdate {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeriesAxis {
    #[default]
    Times,
    Labels,
}

impl SeriesAxis {
    pub fn key(self) -> &'static str {
        match self {
            Self::Times => "times",
            Self::Labels => "labels",
        }
    }
}

// Serialized as `{times|labels, values}`; the deck scripts read the axis key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub axis: SeriesAxis,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(axis: SeriesAxis) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    pub fn push(&mut self, category: &str, value: f64) {
        self.categories.push(category.to_string());
        self.values.push(value);
    }
}

impl Serialize for ChartSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut series = serializer.serialize_struct("ChartSeries", 2)?;
        series.serialize_field(self.axis.key(), &self.categories)?;
        series.serialize_field("values", &self.values)?;
        series.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    pub categories: Vec<String>,
    pub series: Vec<NamedSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelValueDesc {
    pub label: String,
    pub value: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelValueTag {
    pub label: String,
    pub value: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingRow {
    pub rank: String,
    pub name: String,
    pub activity: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub name: String,
    pub theme: String,
    pub stops: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValueDesc {
    pub value: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page1Record {
    pub title: String,
    pub summary: String,
    pub total: ValueDesc,
    pub peak: ValueDesc,
    pub cross: ValueDesc,
    pub flow: ChartSeries,
    pub travel: ChartSeries,
}

impl Default for Page1Record {
    fn default() -> Self {
        Self {
            title: String::new(),
            summary: String::new(),
            total: ValueDesc::default(),
            peak: ValueDesc::default(),
            cross: ValueDesc::default(),
            flow: ChartSeries::new(SeriesAxis::Times),
            travel: ChartSeries::new(SeriesAxis::Labels),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RingBuckets {
    pub core: Vec<NamedValue>,
    pub potential: Vec<NamedValue>,
    pub position: Vec<NamedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page2Record {
    pub title: String,
    pub summary: String,
    pub highlights: Vec<String>,
    pub top_provinces: Vec<NamedValue>,
    pub heatmap: Vec<NamedValue>,
    pub ring: RingBuckets,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GenericField {
    Series(ChartSeries),
    Trend(TrendSeries),
    Strings(Vec<String>),
    LabelValueDesc(Vec<LabelValueDesc>),
    LabelValueTag(Vec<LabelValueTag>),
    Ranking(Vec<RankingRow>),
    Routes(Vec<Route>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenericPageRecord {
    pub title: String,
    pub summary: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, GenericField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageRecord {
    Page1(Page1Record),
    Page2(Page2Record),
    Generic(GenericPageRecord),
}

impl PageRecord {
    pub fn field_names(&self) -> Vec<String> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(fields)) => fields.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncPaths {
    pub grid_dir: String,
    pub html_target: String,
    pub page_data_path: String,
    pub manifest_path: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncCounts {
    pub pages_resolved: usize,
    pub pages_parsed: usize,
    pub pages_skipped: usize,
    pub text_updates_planned: usize,
    pub text_updates_applied: usize,
    pub text_updates_missed: usize,
    pub records_merged: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSyncReport {
    pub page_key: String,
    pub role: String,
    pub sheet_path: String,
    pub sha256: String,
    pub schema: String,
    pub text_updates: usize,
    pub record_fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub paths: SyncPaths,
    pub counts: SyncCounts,
    pub pages: Vec<PageSyncReport>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncRunSnapshot {
    pub run_id: Option<String>,
    pub status: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub pages: Vec<PageSyncReport>,
    #[serde(default)]
    pub warnings: Vec<String>,
}
