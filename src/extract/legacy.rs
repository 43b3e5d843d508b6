use std::collections::HashMap;

use super::*;

struct CoverField {
    header: &'static str,
    id: &'static str,
    prefix: &'static str,
    fallback: Option<&'static str>,
}

const COVER_FIELDS: &[CoverField] = &[
    CoverField {
        header: "标题",
        id: "coverTitle",
        prefix: "",
        fallback: None,
    },
    CoverField {
        header: "简介",
        id: "coverSummary",
        prefix: "",
        fallback: None,
    },
    CoverField {
        header: "年份",
        id: "coverYearBadge",
        prefix: "",
        fallback: None,
    },
    CoverField {
        header: "年度",
        id: "coverYearLabel",
        prefix: "年度：",
        fallback: Some("年份"),
    },
    CoverField {
        header: "主题",
        id: "coverThemeLabel",
        prefix: "主题：",
        fallback: None,
    },
    CoverField {
        header: "地市",
        id: "coverCityLabel",
        prefix: "地市：",
        fallback: None,
    },
    CoverField {
        header: "报告周期",
        id: "coverPeriodLabel",
        prefix: "报告周期：",
        fallback: Some("报告期"),
    },
    CoverField {
        header: "客流峰值",
        id: "coverFlowValue",
        prefix: "",
        fallback: None,
    },
    CoverField {
        header: "热点商圈",
        id: "coverBizValue",
        prefix: "",
        fallback: None,
    },
    CoverField {
        header: "网络覆盖",
        id: "coverNetValue",
        prefix: "",
        fallback: None,
    },
    CoverField {
        header: "城市场景",
        id: "coverSceneName",
        prefix: "",
        fallback: None,
    },
];

pub(super) fn build_cover_updates(grid: &Grid) -> Vec<TextUpdate> {
    let record = first_data_record(grid);
    let lookup = |header: &str| record.get(header).map(String::as_str).unwrap_or("");

    COVER_FIELDS
        .iter()
        .filter_map(|field| {
            let mut value = lookup(field.header);
            if value.is_empty()
                && let Some(fallback) = field.fallback
            {
                value = lookup(fallback);
            }
            (!value.is_empty()).then(|| TextUpdate::new(field.id, format!("{}{value}", field.prefix)))
        })
        .collect()
}

fn first_data_record(grid: &Grid) -> HashMap<String, String> {
    let mut record = HashMap::new();
    let Some(row) = grid.body().iter().find(|row| !is_blank_row(row)) else {
        return record;
    };

    for (index, header) in grid.header().iter().enumerate() {
        let header = header.trim();
        if !header.is_empty() {
            record.insert(header.to_string(), cell(row, index).to_string());
        }
    }
    record
}

const PAGE1_TITLE: &str = "标题";
const PAGE1_SUMMARY: &str = "简介";
const PAGE1_TOTAL: &str = "总客流";
const PAGE1_PEAK: &str = "峰值时段";
const PAGE1_CROSS: &str = "跨省出行";
const PAGE1_FLOW_TIMES: &str = "客流趋势（时间）";
const PAGE1_FLOW_VALUES: &str = "客流趋势（人数）";
const PAGE1_TRAVEL_LABELS: &str = "出行方式对比（方式）";
const PAGE1_TRAVEL_VALUES: &str = "出行方式对比（人数）";

struct NamedColumns<'g> {
    header: &'g [String],
    body: &'g [Row],
}

impl<'g> NamedColumns<'g> {
    fn index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|text| text.trim() == name)
    }

    fn cell(&self, name: &str, row: usize) -> &'g str {
        match (self.index(name), self.body.get(row)) {
            (Some(column), Some(row)) => cell(row, column),
            _ => "",
        }
    }

    fn metric(&self, name: &str) -> ValueDesc {
        ValueDesc {
            value: self.cell(name, 0).to_string(),
            desc: self.cell(name, 1).to_string(),
        }
    }

    fn series(&self, categories: &str, values: &str, axis: SeriesAxis) -> ChartSeries {
        let mut series = ChartSeries::new(axis);
        let Some(category_column) = self.index(categories) else {
            return series;
        };
        let value_column = self.index(values);

        for row in self.body {
            let category = cell(row, category_column);
            if category.is_empty() {
                continue;
            }
            let value = value_column
                .map(|column| parse_number(cell(row, column)))
                .unwrap_or(0.0);
            series.push(category, value);
        }
        series
    }
}

pub(super) fn build_page1_record(grid: &Grid) -> Page1Record {
    let columns = NamedColumns {
        header: grid.header(),
        body: grid.body(),
    };

    Page1Record {
        title: columns.cell(PAGE1_TITLE, 0).to_string(),
        summary: columns.cell(PAGE1_SUMMARY, 0).to_string(),
        total: columns.metric(PAGE1_TOTAL),
        peak: columns.metric(PAGE1_PEAK),
        cross: columns.metric(PAGE1_CROSS),
        flow: columns.series(PAGE1_FLOW_TIMES, PAGE1_FLOW_VALUES, SeriesAxis::Times),
        travel: columns.series(PAGE1_TRAVEL_LABELS, PAGE1_TRAVEL_VALUES, SeriesAxis::Labels),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SegmentKind {
    Base,
    Heatmap,
    TopProvinces,
    Ring,
}

struct SegmentRule {
    kind: SegmentKind,
    keyword: &'static str,
    position: usize,
}

const SEGMENT_RULES: &[SegmentRule] = &[
    SegmentRule {
        kind: SegmentKind::Base,
        keyword: "基础信息",
        position: 0,
    },
    SegmentRule {
        kind: SegmentKind::Heatmap,
        keyword: "热力",
        position: 1,
    },
    SegmentRule {
        kind: SegmentKind::TopProvinces,
        keyword: "Top5",
        position: 2,
    },
    SegmentRule {
        kind: SegmentKind::Ring,
        keyword: "圈层",
        position: 3,
    },
];

#[derive(Debug, Clone, Copy)]
enum RingBucket {
    Core,
    Potential,
    Position,
}

const RING_RULES: &[(&str, RingBucket)] = &[("核心", RingBucket::Core), ("潜力", RingBucket::Potential)];

const PAGE2_TITLE: &str = "页面标题";
const PAGE2_SUMMARY: &str = "摘要描述";
const PAGE2_HIGHLIGHTS: &[&str] = &["高亮 1", "高亮 2", "高亮 3"];

#[derive(Debug, Clone)]
pub(super) struct Segment<'g> {
    pub header: &'g [String],
    pub rows: &'g [Row],
}

pub(super) fn split_segments(rows: &[Row]) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut index = 0;

    while index < rows.len() {
        if is_blank_row(&rows[index]) {
            index += 1;
            continue;
        }

        let header = rows[index].as_slice();
        let start = index + 1;
        let mut end = start;
        while end < rows.len() && !is_blank_row(&rows[end]) {
            end += 1;
        }

        segments.push(Segment {
            header,
            rows: &rows[start..end],
        });
        index = end;
    }

    segments
}

pub(super) fn find_segment<'s, 'g>(
    segments: &'s [Segment<'g>],
    kind: SegmentKind,
) -> Option<&'s Segment<'g>> {
    let rule = SEGMENT_RULES.iter().find(|rule| rule.kind == kind)?;
    segments
        .iter()
        .find(|segment| cell(segment.header, 0).contains(rule.keyword))
        .or_else(|| segments.get(rule.position))
}

pub(super) fn build_page2_record(grid: &Grid) -> Page2Record {
    let segments = split_segments(grid.rows());
    let rows_of = |kind| {
        find_segment(&segments, kind)
            .map(|segment| segment.rows)
            .unwrap_or(&[])
    };

    let base = rows_of(SegmentKind::Base)
        .iter()
        .filter(|row| !cell(row, 0).is_empty())
        .map(|row| (cell(row, 0), cell(row, 1)))
        .collect::<HashMap<&str, &str>>();
    let base_value = |key: &str| base.get(key).copied().unwrap_or("");

    let heatmap = rows_of(SegmentKind::Heatmap)
        .iter()
        .map(|row| NamedValue {
            name: cell(row, 0).to_string(),
            value: parse_number(cell(row, 1)),
        })
        .collect();

    let top_provinces = rows_of(SegmentKind::TopProvinces)
        .iter()
        .map(|row| NamedValue {
            name: cell(row, 1).to_string(),
            value: parse_number(cell(row, 2)),
        })
        .collect();

    let mut ring = RingBuckets::default();
    for row in rows_of(SegmentKind::Ring) {
        let name = cell(row, 1);
        if name.is_empty() {
            continue;
        }
        let kind = cell(row, 0);
        let bucket = RING_RULES
            .iter()
            .find(|(keyword, _)| kind.contains(keyword))
            .map(|(_, bucket)| *bucket)
            .unwrap_or(RingBucket::Position);
        let entry = NamedValue {
            name: name.to_string(),
            value: parse_number(cell(row, 2)),
        };
        match bucket {
            RingBucket::Core => ring.core.push(entry),
            RingBucket::Potential => ring.potential.push(entry),
            RingBucket::Position => ring.position.push(entry),
        }
    }

    Page2Record {
        title: base_value(PAGE2_TITLE).to_string(),
        summary: base_value(PAGE2_SUMMARY).to_string(),
        highlights: PAGE2_HIGHLIGHTS
            .iter()
            .map(|key| base_value(key))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),
        top_provinces,
        heatmap,
        ring,
    }
}
