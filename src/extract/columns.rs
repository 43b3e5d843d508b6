use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    FieldKey,
    Element,
    HtmlHook,
    DataType,
    Value(usize),
}

#[derive(Debug, Clone, Copy)]
enum HeaderMatch {
    Named(&'static str),
    ContainsAny(&'static [&'static str]),
}

impl HeaderMatch {
    fn matches(self, header: &str) -> bool {
        match self {
            Self::Named(name) => {
                header == name
                    || header.to_lowercase() == name.to_lowercase()
                    || (name.chars().count() > 2 && header.contains(name))
            }
            Self::ContainsAny(fragments) => {
                fragments.iter().any(|fragment| header.contains(fragment))
            }
        }
    }
}

struct ColumnRule {
    role: ColumnRole,
    matchers: &'static [HeaderMatch],
    fallback: usize,
}

const COLUMN_RULES: &[ColumnRule] = &[
    ColumnRule {
        role: ColumnRole::FieldKey,
        matchers: &[HeaderMatch::Named("Field Key"), HeaderMatch::Named("FieldKey")],
        fallback: 0,
    },
    ColumnRule {
        role: ColumnRole::Element,
        matchers: &[HeaderMatch::Named("Element")],
        fallback: 1,
    },
    ColumnRule {
        role: ColumnRole::HtmlHook,
        matchers: &[
            HeaderMatch::Named("HTML / Chart Hook"),
            HeaderMatch::Named("HTML"),
        ],
        fallback: 2,
    },
    ColumnRule {
        role: ColumnRole::DataType,
        matchers: &[HeaderMatch::Named("Data Type"), HeaderMatch::Named("DataType")],
        fallback: 3,
    },
    ColumnRule {
        role: ColumnRole::Value(1),
        matchers: &[HeaderMatch::ContainsAny(&["列1", "默认值"])],
        fallback: 5,
    },
    ColumnRule {
        role: ColumnRole::Value(2),
        matchers: &[HeaderMatch::ContainsAny(&["列2"])],
        fallback: 6,
    },
    ColumnRule {
        role: ColumnRole::Value(3),
        matchers: &[HeaderMatch::ContainsAny(&["列3"])],
        fallback: 7,
    },
    ColumnRule {
        role: ColumnRole::Value(4),
        matchers: &[HeaderMatch::ContainsAny(&["列4"])],
        fallback: 8,
    },
    ColumnRule {
        role: ColumnRole::Value(5),
        matchers: &[HeaderMatch::ContainsAny(&["列5"])],
        fallback: 9,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRoleMap {
    pub field_key: usize,
    pub element: usize,
    pub html_hook: usize,
    pub data_type: usize,
    pub values: [usize; 5],
}

impl Default for ColumnRoleMap {
    fn default() -> Self {
        let mut map = Self {
            field_key: 0,
            element: 0,
            html_hook: 0,
            data_type: 0,
            values: [0; 5],
        };
        for rule in COLUMN_RULES {
            map.set(rule.role, rule.fallback);
        }
        map
    }
}

impl ColumnRoleMap {
    pub fn resolve(header: &[String]) -> Self {
        let header = header
            .iter()
            .map(|text| text.trim())
            .collect::<Vec<&str>>();
        let mut map = Self::default();

        for rule in COLUMN_RULES {
            let found = rule.matchers.iter().find_map(|matcher| {
                header
                    .iter()
                    .position(|text| matcher.matches(text))
            });
            map.set(rule.role, found.unwrap_or(rule.fallback));
        }

        map
    }

    pub fn get(&self, role: ColumnRole) -> usize {
        match role {
            ColumnRole::FieldKey => self.field_key,
            ColumnRole::Element => self.element,
            ColumnRole::HtmlHook => self.html_hook,
            ColumnRole::DataType => self.data_type,
            ColumnRole::Value(slot) => self.values[value_slot(slot)],
        }
    }

    pub fn value(&self, slot: usize) -> usize {
        self.get(ColumnRole::Value(slot))
    }

    fn set(&mut self, role: ColumnRole, index: usize) {
        match role {
            ColumnRole::FieldKey => self.field_key = index,
            ColumnRole::Element => self.element = index,
            ColumnRole::HtmlHook => self.html_hook = index,
            ColumnRole::DataType => self.data_type = index,
            ColumnRole::Value(slot) => self.values[value_slot(slot)] = index,
        }
    }
}

// value slots are 1-based; anything outside 1..=5 clamps to the nearest slot
fn value_slot(slot: usize) -> usize {
    slot.clamp(1, 5) - 1
}
