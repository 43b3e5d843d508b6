use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

pub type Row = Vec<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(rows: Vec<Row>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { rows }
    }

    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        )
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let value: Value = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Self::from_json(&value).with_context(|| format!("unrecognized grid in {}", path.display()))
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                if items.iter().all(Value::is_array) {
                    return Ok(Self::new(items.iter().map(row_from_json).collect()));
                }
                match items.first() {
                    Some(first @ Value::Object(_)) => Self::from_json(first),
                    _ => bail!("array is neither a list of rows nor a list of ranges"),
                }
            }
            Value::Object(object) => grid_from_object(object),
            _ => bail!("grid document must be an array or an object"),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn body(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

fn grid_from_object(object: &Map<String, Value>) -> Result<Grid> {
    if let Some(code) = object.get("code").and_then(Value::as_i64)
        && code != 0
    {
        let message = object.get("msg").and_then(Value::as_str).unwrap_or("");
        bail!("sheet API returned error {code}: {message}");
    }

    if let Some(values) = object.get("values") {
        return Grid::from_json(values);
    }
    if let Some(range) = object.get("valueRange") {
        return Grid::from_json(range);
    }
    if let Some(ranges) = object.get("valueRanges") {
        return Grid::from_json(ranges);
    }
    if let Some(data) = object.get("data") {
        return Grid::from_json(data);
    }
    if let (Some(Value::Array(columns)), Some(Value::Array(rows))) =
        (object.get("columns"), object.get("rows"))
    {
        return Ok(grid_from_table(columns, rows));
    }

    bail!("object carries no values, valueRange, valueRanges, data, or columns/rows")
}

fn grid_from_table(columns: &[Value], rows: &[Value]) -> Grid {
    let header = columns.iter().map(cell_text).collect::<Vec<String>>();
    let mut out = Vec::with_capacity(rows.len() + 1);

    for record in rows {
        let row = header
            .iter()
            .map(|column| match record {
                Value::Object(fields) => fields.get(column).map(cell_text).unwrap_or_default(),
                _ => String::new(),
            })
            .collect();
        out.push(row);
    }

    out.insert(0, header);
    Grid::new(out)
}

fn row_from_json(value: &Value) -> Row {
    match value {
        Value::Array(cells) => cells.iter().map(cell_text).collect(),
        other => vec![cell_text(other)],
    }
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if float.is_finite() && float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{}", float as i64)
            }
            _ => number.to_string(),
        },
        Value::Array(segments) => segments.iter().map(cell_text).collect(),
        Value::Object(fields) => fields.get("text").map(cell_text).unwrap_or_default(),
    }
}

pub fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(|value| value.trim()).unwrap_or("")
}

pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|value| value.trim().is_empty())
}

pub fn parse_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
