use super::*;

pub(super) fn parse_field_key_sheet(grid: &Grid, role: PageRole) -> ParsedSheet {
    let columns = ColumnRoleMap::resolve(grid.header());
    let mut builder = RecordBuilder::for_role(role);
    let mut text_updates = Vec::<TextUpdate>::new();
    let mut cursor = DirectiveCursor::new(grid.body(), &columns);

    while let Some(directive) = cursor.next_directive() {
        match resolve_handler(&directive, role) {
            Handler::Block(kind) => {
                let rows = cursor.take_block();
                builder.apply_block(kind, rows, &columns);
            }
            Handler::Scalar(field) => {
                let value = directive.value(1);
                if !directive.element_id.is_empty() && !value.is_empty() {
                    text_updates.push(TextUpdate::new(directive.element_id, value));
                }
                builder.set_scalar(field, directive.element_id, value);
            }
            Handler::Text => {
                let value = directive.value(1);
                text_updates.push(TextUpdate::new(directive.element_id, value));
                builder.bind_by_id(directive.element_id, value);
            }
            Handler::Skip => {
                debug!(
                    row = directive.row_index + 1,
                    field_key = directive.field_key,
                    data_type = directive.data_type,
                    "skipping directive"
                );
            }
        }
    }

    ParsedSheet {
        role,
        schema: SchemaPath::FieldKey,
        columns: Some(columns),
        text_updates,
        record: builder.finish(),
    }
}

#[derive(Debug)]
pub(super) enum RecordBuilder {
    Detached,
    Page1(Page1Record),
    Page2(Page2Record),
    Generic { page: u8, record: GenericPageRecord },
}

impl RecordBuilder {
    pub(super) fn for_role(role: PageRole) -> Self {
        match role {
            PageRole::Page1 => Self::Page1(Page1Record::default()),
            PageRole::Page2 => Self::Page2(Page2Record::default()),
            PageRole::Generic(page) => Self::Generic {
                page,
                record: GenericPageRecord::default(),
            },
            PageRole::Cover | PageRole::Unknown => Self::Detached,
        }
    }

    pub(super) fn finish(self) -> Option<PageRecord> {
        match self {
            Self::Detached => None,
            Self::Page1(record) => Some(PageRecord::Page1(record)),
            Self::Page2(record) => Some(PageRecord::Page2(record)),
            Self::Generic { record, .. } => Some(PageRecord::Generic(record)),
        }
    }

    fn page_number(&self) -> Option<u8> {
        match self {
            Self::Detached => None,
            Self::Page1(_) => Some(1),
            Self::Page2(_) => Some(2),
            Self::Generic { page, .. } => Some(*page),
        }
    }

    pub(super) fn bind_by_id(&mut self, id: &str, value: &str) {
        let Some(page) = self.page_number() else {
            return;
        };

        if id == format!("page{page}Title") {
            self.set_heading(|title, _| *title = value.to_string());
        } else if id == format!("page{page}Summary") {
            self.set_heading(|_, summary| *summary = value.to_string());
        }
    }

    fn set_heading(&mut self, apply: impl FnOnce(&mut String, &mut String)) {
        match self {
            Self::Detached => {}
            Self::Page1(record) => apply(&mut record.title, &mut record.summary),
            Self::Page2(record) => apply(&mut record.title, &mut record.summary),
            Self::Generic { record, .. } => apply(&mut record.title, &mut record.summary),
        }
    }

    pub(super) fn set_scalar(&mut self, field: ScalarField, id: &str, value: &str) {
        if matches!(field, ScalarField::Title | ScalarField::Summary) {
            self.bind_by_id(id, value);
            return;
        }
        let Self::Page1(record) = self else {
            return;
        };

        let slot = match field {
            ScalarField::TotalValue => &mut record.total.value,
            ScalarField::TotalDesc => &mut record.total.desc,
            ScalarField::PeakValue => &mut record.peak.value,
            ScalarField::PeakDesc => &mut record.peak.desc,
            ScalarField::CrossValue => &mut record.cross.value,
            ScalarField::CrossDesc => &mut record.cross.desc,
            ScalarField::Title | ScalarField::Summary => return,
        };
        *slot = value.to_string();
    }

    pub(super) fn apply_block<'g>(
        &mut self,
        kind: BlockKind,
        rows: impl Iterator<Item = &'g [String]>,
        columns: &ColumnRoleMap,
    ) {
        match (kind, self) {
            (BlockKind::Page1Flow, Self::Page1(record)) => {
                record.flow = chart_series(rows, columns, TIME_CHART_HEADERS, SeriesAxis::Times);
            }
            (BlockKind::Page1Travel, Self::Page1(record)) => {
                record.travel = chart_series(rows, columns, TRAVEL_CHART_HEADERS, SeriesAxis::Labels);
            }
            (BlockKind::Page2Highlights, Self::Page2(record)) => {
                record.highlights = flat_list(rows, columns, PLAIN_LIST_HEADERS);
            }
            (BlockKind::Page2TopProvinces, Self::Page2(record)) => {
                record.top_provinces = named_values(rows, columns, PROVINCE_HEADERS);
            }
            (BlockKind::Page2Heatmap, Self::Page2(record)) => {
                record.heatmap = named_values(rows, columns, NAMED_VALUE_HEADERS);
            }
            (kind, Self::Generic { record, .. }) => {
                if let Some((name, field)) = generic_field(kind, rows, columns) {
                    record.fields.insert(name.to_string(), field);
                }
            }
            (kind, _) => debug!(?kind, "block does not apply to this page"),
        }
    }
}

fn generic_field<'g>(
    kind: BlockKind,
    rows: impl Iterator<Item = &'g [String]>,
    columns: &ColumnRoleMap,
) -> Option<(&'static str, GenericField)> {
    let field = match kind {
        BlockKind::GenericFlow => (
            "flow",
            GenericField::Series(chart_series(
                rows,
                columns,
                TIME_CHART_HEADERS,
                SeriesAxis::Times,
            )),
        ),
        BlockKind::GenericTrend => (
            "trend",
            GenericField::Trend(trend_series(rows, columns, GENERIC_HEADERS)),
        ),
        BlockKind::GenericCards(name) => (
            name,
            GenericField::LabelValueDesc(label_value_desc(rows, columns, GENERIC_HEADERS, false)),
        ),
        BlockKind::GenericRanking => (
            "ranking",
            GenericField::Ranking(ranking_rows(rows, columns, GENERIC_HEADERS)),
        ),
        BlockKind::GenericPreferences => (
            "preferences",
            GenericField::LabelValueTag(label_value_tag(rows, columns, GENERIC_HEADERS)),
        ),
        BlockKind::GenericRoutes => (
            "routes",
            GenericField::Routes(routes(rows, columns, GENERIC_HEADERS)),
        ),
        BlockKind::GenericHighlights { label_value: true } => (
            "highlights",
            GenericField::LabelValueDesc(label_value_desc(
                rows,
                columns,
                LABEL_VALUE_HEADERS,
                true,
            )),
        ),
        BlockKind::GenericHighlights { label_value: false } => (
            "highlights",
            GenericField::Strings(flat_list(rows, columns, GENERIC_HEADERS)),
        ),
        BlockKind::Page1Flow
        | BlockKind::Page1Travel
        | BlockKind::Page2Highlights
        | BlockKind::Page2TopProvinces
        | BlockKind::Page2Heatmap => return None,
    };
    Some(field)
}

pub(super) fn chart_series<'g>(
    rows: impl Iterator<Item = &'g [String]>,
    columns: &ColumnRoleMap,
    headers: HeaderVocabulary,
    axis: SeriesAxis,
) -> ChartSeries {
    let mut series = ChartSeries::new(axis);
    for row in rows {
        let category = cell(row, columns.value(1));
        if category.is_empty() || headers.matches(category) {
            continue;
        }
        series.push(category, parse_number(cell(row, columns.value(2))));
    }
    series
}

pub(super) fn named_values<'g>(
    rows: impl Iterator<Item = &'g [String]>,
    columns: &ColumnRoleMap,
    headers: HeaderVocabulary,
) -> Vec<NamedValue> {
    rows.filter(|row| !headers.matches(cell(row, columns.value(1))))
        .filter_map(|row| {
            let name = cell(row, columns.value(1));
            (!name.is_empty()).then(|| NamedValue {
                name: name.to_string(),
                value: parse_number(cell(row, columns.value(2))),
            })
        })
        .collect()
}

pub(super) fn flat_list<'g>(
    rows: impl Iterator<Item = &'g [String]>,
    columns: &ColumnRoleMap,
    headers: HeaderVocabulary,
) -> Vec<String> {
    let mut items = Vec::new();
    for row in rows {
        for slot in 1..=3 {
            let value = cell(row, columns.value(slot));
            if !value.is_empty() && !headers.matches(value) {
                items.push(value.to_string());
            }
        }
    }
    items
}

pub(super) fn label_value_desc<'g>(
    rows: impl Iterator<Item = &'g [String]>,
    columns: &ColumnRoleMap,
    headers: HeaderVocabulary,
    allow_blank_label: bool,
) -> Vec<LabelValueDesc> {
    rows.filter(|row| !headers.matches(cell(row, columns.value(1))))
        .filter_map(|row| {
            let label = cell(row, columns.value(1));
            let value = cell(row, columns.value(2));
            let keep = if allow_blank_label {
                !label.is_empty() || !value.is_empty()
            } else {
                !label.is_empty()
            };
            keep.then(|| LabelValueDesc {
                label: label.to_string(),
                value: value.to_string(),
                desc: cell(row, columns.value(3)).to_string(),
            })
        })
        .collect()
}

pub(super) fn label_value_tag<'g>(
    rows: impl Iterator<Item = &'g [String]>,
    columns: &ColumnRoleMap,
    headers: HeaderVocabulary,
) -> Vec<LabelValueTag> {
    rows.filter_map(|row| {
        let label = cell(row, columns.value(1));
        (!label.is_empty() && !headers.matches(label)).then(|| LabelValueTag {
            label: label.to_string(),
            value: cell(row, columns.value(2)).to_string(),
            tag: cell(row, columns.value(3)).to_string(),
        })
    })
    .collect()
}

pub(super) fn ranking_rows<'g>(
    rows: impl Iterator<Item = &'g [String]>,
    columns: &ColumnRoleMap,
    headers: HeaderVocabulary,
) -> Vec<RankingRow> {
    rows.filter_map(|row| {
        let rank = cell(row, columns.value(1));
        let name = cell(row, columns.value(2));
        let keep = (!rank.is_empty() || !name.is_empty()) && !headers.matches(rank);
        keep.then(|| RankingRow {
            rank: rank.to_string(),
            name: name.to_string(),
            activity: cell(row, columns.value(3)).to_string(),
            value: cell(row, columns.value(4)).to_string(),
        })
    })
    .collect()
}

pub(super) fn routes<'g>(
    rows: impl Iterator<Item = &'g [String]>,
    columns: &ColumnRoleMap,
    headers: HeaderVocabulary,
) -> Vec<Route> {
    rows.filter_map(|row| {
        let name = cell(row, columns.value(1));
        if name.is_empty() || headers.matches(name) {
            return None;
        }
        let stops = [3, 4]
            .into_iter()
            .map(|slot| cell(row, columns.value(slot)))
            .find(|value| !value.is_empty());
        Some(Route {
            name: name.to_string(),
            theme: cell(row, columns.value(2)).to_string(),
            stops: stops.map(str::to_string).into_iter().collect(),
        })
    })
    .collect()
}

// The first block row names the series in value columns 2..=5; each later
// row contributes one category and one point per named series.
pub(super) fn trend_series<'g>(
    mut rows: impl Iterator<Item = &'g [String]>,
    columns: &ColumnRoleMap,
    headers: HeaderVocabulary,
) -> TrendSeries {
    let mut trend = TrendSeries::default();
    let Some(header_row) = rows.next() else {
        return trend;
    };

    let series_columns = (2..=5)
        .map(|slot| columns.value(slot))
        .filter(|column| !cell(header_row, *column).is_empty())
        .collect::<Vec<usize>>();
    trend.series = series_columns
        .iter()
        .map(|column| NamedSeries {
            name: cell(header_row, *column).to_string(),
            data: Vec::new(),
        })
        .collect();

    for row in rows {
        let category = cell(row, columns.value(1));
        if category.is_empty() || headers.matches(category) {
            continue;
        }
        trend.categories.push(category.to_string());
        for (series, column) in trend.series.iter_mut().zip(&series_columns) {
            series.data.push(parse_number(cell(row, *column)));
        }
    }

    trend
}
