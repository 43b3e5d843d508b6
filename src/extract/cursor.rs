use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Scan,
    InBlock,
}

#[derive(Debug, Clone)]
pub struct Directive<'g> {
    pub row_index: usize,
    pub field_key: &'g str,
    pub element_id: &'g str,
    pub data_type: &'g str,
    pub values: [&'g str; 5],
}

impl<'g> Directive<'g> {
    fn read(row_index: usize, row: &'g [String], columns: &ColumnRoleMap) -> Self {
        let hook = cell(row, columns.html_hook);
        Self {
            row_index,
            field_key: cell(row, columns.field_key),
            element_id: hook.strip_prefix('#').unwrap_or(hook).trim(),
            data_type: cell(row, columns.data_type),
            values: [1, 2, 3, 4, 5].map(|slot| cell(row, columns.value(slot))),
        }
    }

    pub fn value(&self, slot: usize) -> &'g str {
        self.values[slot.clamp(1, 5) - 1]
    }
}

pub struct DirectiveCursor<'g> {
    rows: &'g [Row],
    columns: &'g ColumnRoleMap,
    position: usize,
    state: CursorState,
}

impl<'g> DirectiveCursor<'g> {
    pub fn new(rows: &'g [Row], columns: &'g ColumnRoleMap) -> Self {
        Self {
            rows,
            columns,
            position: 0,
            state: CursorState::Scan,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn is_sentinel(&self, row: &[String]) -> bool {
        !cell(row, self.columns.field_key).is_empty()
    }

    // Rows between directives that no handler claimed are passed over here.
    pub fn next_directive(&mut self) -> Option<Directive<'g>> {
        self.state = CursorState::Scan;
        let rows = self.rows;

        while let Some(row) = rows.get(self.position) {
            let index = self.position;
            self.position += 1;
            if self.is_sentinel(row) {
                return Some(Directive::read(index, row, self.columns));
            }
        }

        None
    }

    pub fn take_block(&mut self) -> BlockRows<'_, 'g> {
        self.state = CursorState::InBlock;
        BlockRows { cursor: self }
    }
}

// Yields the rows of the current block and stops in front of the sentinel.
// Dropping it early still drains the block so the cursor lands on the sentinel.
pub struct BlockRows<'c, 'g> {
    cursor: &'c mut DirectiveCursor<'g>,
}

impl<'g> Iterator for BlockRows<'_, 'g> {
    type Item = &'g [String];

    fn next(&mut self) -> Option<Self::Item> {
        let rows = self.cursor.rows;
        match rows.get(self.cursor.position) {
            Some(row) if !self.cursor.is_sentinel(row) => {
                self.cursor.position += 1;
                Some(row.as_slice())
            }
            _ => {
                self.cursor.state = CursorState::Scan;
                None
            }
        }
    }
}

impl Drop for BlockRows<'_, '_> {
    fn drop(&mut self) {
        while self.next().is_some() {}
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HeaderVocabulary(pub &'static [&'static str]);

pub const TIME_CHART_HEADERS: HeaderVocabulary = HeaderVocabulary(&["时间", "人数", "默认表头"]);
pub const TRAVEL_CHART_HEADERS: HeaderVocabulary =
    HeaderVocabulary(&["出行方式", "占比", "默认表头", "人数"]);
pub const NAMED_VALUE_HEADERS: HeaderVocabulary = HeaderVocabulary(&["name", "value", "默认表头"]);
pub const PROVINCE_HEADERS: HeaderVocabulary =
    HeaderVocabulary(&["name", "value", "默认表头", "省份", "占比"]);
pub const PLAIN_LIST_HEADERS: HeaderVocabulary =
    HeaderVocabulary(&["值", "name", "label", "默认表头"]);
pub const LABEL_VALUE_HEADERS: HeaderVocabulary =
    HeaderVocabulary(&["label", "value", "desc", "默认表头"]);
pub const GENERIC_HEADERS: HeaderVocabulary = HeaderVocabulary(&[
    "值", "name", "label", "默认表头", "时间", "人数", "rank", "activity", "desc", "tag", "theme",
    "stops",
]);

impl HeaderVocabulary {
    pub fn matches(self, text: &str) -> bool {
        let text = text.trim();
        !text.is_empty() && self.0.iter().any(|word| word.eq_ignore_ascii_case(text))
    }
}
