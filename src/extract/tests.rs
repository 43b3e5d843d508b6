use super::*;

const HEADER: &[&str] = &[
    "Field Key",
    "Element",
    "HTML / Chart Hook",
    "Data Type",
    "说明",
    "默认值/列1",
    "列2",
    "列3",
    "列4",
    "列5",
];

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_string()).collect()
}

fn field_key_grid(rows: &[&[&str]]) -> Grid {
    let mut all = vec![row(HEADER)];
    all.extend(rows.iter().map(|cells| row(cells)));
    Grid::new(all)
}

fn generic_record(parsed: &ParsedSheet) -> &GenericPageRecord {
    match parsed.record.as_ref() {
        Some(PageRecord::Generic(record)) => record,
        other => panic!("expected generic record, got {other:?}"),
    }
}

fn page1_record(parsed: &ParsedSheet) -> &Page1Record {
    match parsed.record.as_ref() {
        Some(PageRecord::Page1(record)) => record,
        other => panic!("expected page1 record, got {other:?}"),
    }
}

fn page2_record(parsed: &ParsedSheet) -> &Page2Record {
    match parsed.record.as_ref() {
        Some(PageRecord::Page2(record)) => record,
        other => panic!("expected page2 record, got {other:?}"),
    }
}

#[test]
fn page_role_parses_known_tags() {
    assert_eq!(PageRole::from_tag("cover"), PageRole::Cover);
    assert_eq!(PageRole::from_tag(" Page2 "), PageRole::Page2);
    assert_eq!(PageRole::from_tag("page13"), PageRole::Generic(13));
    assert_eq!(PageRole::from_tag("page14"), PageRole::Unknown);
    assert_eq!(PageRole::from_tag("appendix"), PageRole::Unknown);
    assert_eq!(PageRole::Generic(7).page_key().as_deref(), Some("page7"));
    assert_eq!(PageRole::Cover.page_key(), None);
    assert_eq!(PageRole::all().len(), 14);
}

#[test]
fn header_row_alone_selects_schema_path() {
    let tagged = Grid::from_strs(&[&["  field   KEY ", "Element"], &["title"]]);
    let untagged = Grid::from_strs(&[&["标题", "简介"], &["报告", "摘要"]]);

    for _ in 0..2 {
        assert_eq!(detect_schema(&tagged, PageRole::Cover), SchemaPath::FieldKey);
        assert_eq!(detect_schema(&tagged, PageRole::Generic(4)), SchemaPath::FieldKey);
    }
    assert_eq!(
        detect_schema(&untagged, PageRole::Cover),
        SchemaPath::Legacy(LegacyFormat::Cover)
    );
    assert_eq!(
        detect_schema(&untagged, PageRole::Page2),
        SchemaPath::Legacy(LegacyFormat::Page2)
    );
    assert_eq!(
        detect_schema(&untagged, PageRole::Generic(5)),
        SchemaPath::Unsupported
    );
}

#[test]
fn legacy_grid_for_generic_page_yields_empty_result() {
    let grid = Grid::from_strs(&[&["标题"], &["报告"]]);
    let parsed = parse_sheet(&grid, PageRole::Generic(6));
    assert_eq!(parsed.schema, SchemaPath::Unsupported);
    assert!(parsed.text_updates.is_empty());
    assert!(parsed.record.is_none());
}

#[test]
fn page1_scenario_extracts_updates_and_record() {
    let grid = field_key_grid(&[
        &["title", "", "#page1Title", "text", "", "城市客流报告"],
        &["flow.times+values", "", "", "chart", "", "时间", "人数"],
        &["", "", "", "", "", "08:00", "120"],
        &["", "", "", "", "", "09:00", "340"],
        &["total.value", "", "#page1Total", "text", "", "5000"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Page1);

    assert_eq!(parsed.schema, SchemaPath::FieldKey);
    assert_eq!(
        parsed.text_updates,
        vec![
            TextUpdate::new("page1Title", "城市客流报告"),
            TextUpdate::new("page1Total", "5000"),
        ]
    );
    let record = page1_record(&parsed);
    assert_eq!(record.title, "城市客流报告");
    assert_eq!(record.flow.categories, vec!["08:00", "09:00"]);
    assert_eq!(record.flow.values, vec![120.0, 340.0]);
    assert_eq!(record.total.value, "5000");
}

#[test]
fn chart_block_skips_header_row_and_coerces_bad_numbers() {
    let grid = field_key_grid(&[
        &["travel.labels+values", "", "", "chart(bar)"],
        &["", "", "", "", "", "出行方式", "人数"],
        &["", "", "", "", "", "自驾", "12.5"],
        &["", "", "", "", "", "高铁", "n/a"],
        &["", "", "", "", "", "大巴", ""],
        &["summary", "", "#page1Summary", "text", "", "摘要"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Page1);
    let record = page1_record(&parsed);

    assert_eq!(record.travel.categories, vec!["自驾", "高铁", "大巴"]);
    assert_eq!(record.travel.values, vec![12.5, 0.0, 0.0]);
    assert_eq!(record.summary, "摘要");
}

#[test]
fn text_updates_follow_directive_row_order() {
    let grid = field_key_grid(&[
        &["b", "", "#second", "text", "", "2"],
        &["a", "", "#first", "", "", "1"],
        &["c", "", "#third", "text", "", "3"],
        &["c", "", "#third", "text", "", "4"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Cover);
    let ids = parsed
        .text_updates
        .iter()
        .map(|update| (update.id.as_str(), update.value.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        ids,
        vec![("second", "2"), ("first", "1"), ("third", "3"), ("third", "4")]
    );
    assert!(parsed.record.is_none());
}

#[test]
fn unmatched_directives_are_skipped_without_stalling() {
    let grid = field_key_grid(&[
        &["mystery", "", "", "gauge", "", "1"],
        &["", "", "", "", "", "stray"],
        &["nohook", "", "", "text", "", "value"],
        &["chart", "", "#chartHook", "chart", "", "value"],
        &["empty", "", "#emptyValue", "text", "", ""],
        &["label", "", "#kept", "text", "", "kept"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Page1);
    assert_eq!(parsed.text_updates, vec![TextUpdate::new("kept", "kept")]);
}

#[test]
fn page1_keys_do_not_bind_on_other_pages() {
    let grid = field_key_grid(&[
        &["title", "", "#page1Title", "text", "", "错页标题"],
        &["total.value", "", "#page1Total", "text", "", "10"],
        &["flow.times+values", "", "", "chart"],
        &["", "", "", "", "", "08:00", "1"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Page2);
    let record = page2_record(&parsed);
    assert_eq!(record.title, "");
    assert_eq!(parsed.text_updates.len(), 2);
}

#[test]
fn page2_lists_and_heatmap_consume_their_blocks() {
    let grid = field_key_grid(&[
        &["title", "", "#page2Title", "text", "", "客源地"],
        &["highlights", "", "", "list"],
        &["", "", "", "", "", "值", "值", "值"],
        &["", "", "", "", "", "亮点一", "亮点二", ""],
        &["", "", "", "", "", "亮点三"],
        &["topProvinces", "", "", "list(name,value)"],
        &["", "", "", "", "", "省份", "占比"],
        &["", "", "", "", "", "江苏", "41.2"],
        &["", "", "", "", "", "", "9"],
        &["", "", "", "", "", "浙江", "abc"],
        &["heatmap", "", "", "chart"],
        &["", "", "", "", "", "name", "value"],
        &["", "", "", "", "", "花山区", "88"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Page2);
    let record = page2_record(&parsed);

    assert_eq!(record.title, "客源地");
    assert_eq!(record.highlights, vec!["亮点一", "亮点二", "亮点三"]);
    assert_eq!(
        record.top_provinces,
        vec![
            NamedValue {
                name: "江苏".to_string(),
                value: 41.2
            },
            NamedValue {
                name: "浙江".to_string(),
                value: 0.0
            },
        ]
    );
    assert_eq!(record.heatmap.len(), 1);
    assert_eq!(record.heatmap[0].name, "花山区");
}

#[test]
fn block_length_equals_data_rows_between_sentinels() {
    for count in [0_usize, 1, 5] {
        let mut rows = vec![row(HEADER), row(&["flow", "", "", "chart"])];
        rows.push(row(&["", "", "", "", "", "时间", "人数"]));
        for index in 0..count {
            let time = format!("{index}:00");
            rows.push(row(&["", "", "", "", "", time.as_str(), "1"]));
        }
        rows.push(row(&["title", "", "#page3Title", "text", "", "标题"]));

        let parsed = parse_sheet(&Grid::new(rows), PageRole::Generic(3));
        let record = generic_record(&parsed);
        match record.fields.get("flow") {
            Some(GenericField::Series(series)) => {
                assert_eq!(series.categories.len(), count);
                assert_eq!(series.values.len(), count);
            }
            other => panic!("unexpected flow field: {other:?}"),
        }
        assert_eq!(record.title, "标题");
    }
}

#[test]
fn generic_trend_uses_first_block_row_as_series_names() {
    let grid = field_key_grid(&[
        &["trend.categories+series", "", "", "chart(line)"],
        &["", "", "", "", "", "月份", "本地", "", "外地"],
        &["", "", "", "", "", "1月", "10", "99", "x"],
        &["", "", "", "", "", "2月", "11", "", "7"],
        &["ranking", "", "", "table"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Generic(5));
    let record = generic_record(&parsed);
    let Some(GenericField::Trend(trend)) = record.fields.get("trend") else {
        panic!("trend missing: {:?}", record.fields);
    };

    assert_eq!(trend.categories, vec!["1月", "2月"]);
    assert_eq!(trend.series.len(), 2);
    assert_eq!(trend.series[0].name, "本地");
    assert_eq!(trend.series[0].data, vec![10.0, 11.0]);
    assert_eq!(trend.series[1].name, "外地");
    assert_eq!(trend.series[1].data, vec![0.0, 7.0]);
    for series in &trend.series {
        assert_eq!(series.data.len(), trend.categories.len());
    }
}

#[test]
fn trend_never_consumes_the_next_directive_as_its_header() {
    let grid = field_key_grid(&[
        &["trend.categories+series", "", "", "chart"],
        &["title", "", "#page4Title", "text", "", "标题"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Generic(4));
    let record = generic_record(&parsed);
    assert_eq!(record.title, "标题");
    assert!(matches!(
        record.fields.get("trend"),
        Some(GenericField::Trend(trend)) if trend.series.is_empty()
    ));
}

#[test]
fn generic_tables_and_lists_take_their_shapes() {
    let grid = field_key_grid(&[
        &["cards", "", "", "list(label, value, desc)"],
        &["", "", "", "", "", "label", "value", "desc"],
        &["", "", "", "", "", "日均", "3.2万", "同比+5%"],
        &["ranking", "", "", "table(rank,name,activity,value)"],
        &["", "", "", "", "", "rank", "name", "activity", "value"],
        &["", "", "", "", "", "1", "采石矶", "登高", "98"],
        &["", "", "", "", "", "", "", "空行"],
        &["preferences", "", "", "list(label,value,tag)"],
        &["", "", "", "", "", "美食", "62%", "热"],
        &["routes", "", "", "list(name,theme,stops)"],
        &["", "", "", "", "", "滨江线", "山水", "", "采石矶"],
        &["", "", "", "", "", "theme"],
        &["extras", "", "", "list(label,value,desc)"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Generic(8));
    let record = generic_record(&parsed);

    let Some(GenericField::LabelValueDesc(cards)) = record.fields.get("cards") else {
        panic!("cards missing");
    };
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].desc, "同比+5%");

    let Some(GenericField::Ranking(ranking)) = record.fields.get("ranking") else {
        panic!("ranking missing");
    };
    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking[0].activity, "登高");

    let Some(GenericField::LabelValueTag(preferences)) = record.fields.get("preferences") else {
        panic!("preferences missing");
    };
    assert_eq!(preferences[0].tag, "热");

    let Some(GenericField::Routes(routes)) = record.fields.get("routes") else {
        panic!("routes missing");
    };
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].stops, vec!["采石矶"]);

    assert!(matches!(
        record.fields.get("extras"),
        Some(GenericField::LabelValueDesc(extras)) if extras.is_empty()
    ));
}

#[test]
fn generic_highlights_pick_shape_from_data_type() {
    let labelled = field_key_grid(&[
        &["highlights", "", "", "list(label,value,desc)"],
        &["", "", "", "", "", "label", "value"],
        &["", "", "", "", "", "", "仅数值"],
        &["", "", "", "", "", "客流", "12万", "环比"],
    ]);
    let plain = field_key_grid(&[
        &["highlights", "", "", "list"],
        &["", "", "", "", "", "一", "二", "name"],
    ]);

    let parsed = parse_sheet(&labelled, PageRole::Generic(9));
    let Some(GenericField::LabelValueDesc(items)) = generic_record(&parsed).fields.get("highlights")
    else {
        panic!("labelled highlights missing");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].value, "仅数值");

    let parsed = parse_sheet(&plain, PageRole::Generic(9));
    let Some(GenericField::Strings(items)) = generic_record(&parsed).fields.get("highlights") else {
        panic!("plain highlights missing");
    };
    assert_eq!(items, &vec!["一".to_string(), "二".to_string()]);
}

#[test]
fn cursor_stops_blocks_at_sentinel_and_returns_to_scan() {
    let grid = field_key_grid(&[
        &["a", "", "", "chart"],
        &["", "", "", "", "", "1"],
        &["", "", "", "", "", "2"],
        &["b", "", "", "text"],
        &["", "", "", "", "", "3"],
    ]);
    let columns = ColumnRoleMap::resolve(grid.header());
    let mut cursor = DirectiveCursor::new(grid.body(), &columns);

    let first = cursor.next_directive().expect("first directive");
    assert_eq!(first.field_key, "a");
    {
        let mut block = cursor.take_block();
        assert_eq!(block.next().map(|row| cell(row, 5)), Some("1"));
    }
    assert_eq!(cursor.state(), CursorState::Scan);
    assert_eq!(cursor.position(), 3);

    let second = cursor.next_directive().expect("second directive");
    assert_eq!(second.field_key, "b");
    assert_eq!(second.row_index, 3);
    assert!(cursor.next_directive().is_none());
}

#[test]
fn header_vocabulary_matches_whole_cells_case_insensitively() {
    assert!(GENERIC_HEADERS.matches(" Rank "));
    assert!(TIME_CHART_HEADERS.matches("时间"));
    assert!(!TIME_CHART_HEADERS.matches("时间段"));
    assert!(!GENERIC_HEADERS.matches(""));
}

#[test]
fn legacy_cover_maps_headers_with_prefixes_and_fallbacks() {
    let grid = Grid::from_strs(&[
        &["标题", "年份", "报告期", "地市", "备注"],
        &["", "", "", "", ""],
        &["城市报告", "2024", "Q3", "", "忽略"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Cover);
    assert_eq!(parsed.schema, SchemaPath::Legacy(LegacyFormat::Cover));
    assert_eq!(
        parsed.text_updates,
        vec![
            TextUpdate::new("coverTitle", "城市报告"),
            TextUpdate::new("coverYearBadge", "2024"),
            TextUpdate::new("coverYearLabel", "年度：2024"),
            TextUpdate::new("coverPeriodLabel", "报告周期：Q3"),
        ]
    );
}

#[test]
fn legacy_page1_reads_named_columns() {
    let grid = Grid::from_strs(&[
        &[
            "标题",
            "总客流",
            "客流趋势（时间）",
            "客流趋势（人数）",
            "出行方式对比（方式）",
        ],
        &["页面一", "120万", "08:00", "10", "自驾"],
        &["", "同比增长", "09:00", "oops", ""],
        &["", "", "", "30", ""],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Page1);
    let record = page1_record(&parsed);

    assert_eq!(record.title, "页面一");
    assert_eq!(record.total.value, "120万");
    assert_eq!(record.total.desc, "同比增长");
    assert_eq!(record.peak, ValueDesc::default());
    assert_eq!(record.flow.categories, vec!["08:00", "09:00"]);
    assert_eq!(record.flow.values, vec![10.0, 0.0]);
    assert_eq!(record.travel.categories, vec!["自驾"]);
    assert_eq!(record.travel.values, vec![0.0]);
}

#[test]
fn legacy_page2_splits_segments_on_blank_rows() {
    let rows = vec![
        row(&["基础信息", "值"]),
        row(&["页面标题", "客源"]),
        row(&[""]),
        row(&["热力", "值"]),
        row(&["雨山区", "5"]),
    ];
    let segments = split_segments(&rows);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].rows.len(), 1);
    assert_eq!(cell(segments[1].header, 0), "热力");
}

#[test]
fn legacy_page2_keyword_overrides_position() {
    let grid = Grid::from_strs(&[
        &["圈层分布", "名称", "值"],
        &["核心圈", "南京", "50"],
        &["潜力圈", "合肥", "20"],
        &["辐射", "上海", "x"],
        &["", "", ""],
        &["", "", ""],
        &["基础信息", "值"],
        &["页面标题", "客源地分析"],
        &["摘要描述", "摘要"],
        &["高亮 1", "亮点A"],
        &["高亮 3", "亮点C"],
        &[""],
        &["热力图", "值"],
        &["花山区", "12"],
        &[""],
        &["Top5 省份", "省份", "占比"],
        &["1", "江苏", "40"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Page2);
    let record = page2_record(&parsed);

    assert_eq!(record.title, "客源地分析");
    assert_eq!(record.summary, "摘要");
    assert_eq!(record.highlights, vec!["亮点A", "亮点C"]);
    assert_eq!(record.heatmap[0].value, 12.0);
    assert_eq!(record.top_provinces[0].name, "江苏");
    assert_eq!(record.ring.core[0].name, "南京");
    assert_eq!(record.ring.potential[0].name, "合肥");
    assert_eq!(record.ring.position[0].value, 0.0);
}

#[test]
fn legacy_page2_falls_back_to_segment_order() {
    let grid = Grid::from_strs(&[
        &["说明", "值"],
        &["页面标题", "按顺序"],
        &[""],
        &["区域", "值"],
        &["当涂县", "3"],
    ]);

    let parsed = parse_sheet(&grid, PageRole::Page2);
    let record = page2_record(&parsed);
    assert_eq!(record.title, "按顺序");
    assert_eq!(record.heatmap.len(), 1);
    assert!(record.top_provinces.is_empty());
    assert!(record.ring.core.is_empty());
}
