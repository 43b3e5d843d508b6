use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Page1Flow,
    Page1Travel,
    Page2Highlights,
    Page2TopProvinces,
    Page2Heatmap,
    GenericFlow,
    GenericTrend,
    GenericCards(&'static str),
    GenericRanking,
    GenericPreferences,
    GenericRoutes,
    GenericHighlights { label_value: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Title,
    Summary,
    TotalValue,
    TotalDesc,
    PeakValue,
    PeakDesc,
    CrossValue,
    CrossDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Block(BlockKind),
    Scalar(ScalarField),
    Text,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoleScope {
    Page1,
    Page2,
    Generic,
}

impl RoleScope {
    fn admits(self, role: PageRole) -> bool {
        match self {
            Self::Page1 => role == PageRole::Page1,
            Self::Page2 => role == PageRole::Page2,
            Self::Generic => role.is_generic(),
        }
    }
}

struct BlockRule {
    field_key: &'static str,
    type_fragments: &'static [&'static str],
    scope: RoleScope,
    kind: BlockKind,
}

// Order matters: the label/value highlights rule must precede the plain one.
const BLOCK_RULES: &[BlockRule] = &[
    BlockRule {
        field_key: "flow.times+values",
        type_fragments: &["chart"],
        scope: RoleScope::Page1,
        kind: BlockKind::Page1Flow,
    },
    BlockRule {
        field_key: "travel.labels+values",
        type_fragments: &["chart"],
        scope: RoleScope::Page1,
        kind: BlockKind::Page1Travel,
    },
    BlockRule {
        field_key: "highlights",
        type_fragments: &["list"],
        scope: RoleScope::Page2,
        kind: BlockKind::Page2Highlights,
    },
    BlockRule {
        field_key: "topProvinces",
        type_fragments: &["list"],
        scope: RoleScope::Page2,
        kind: BlockKind::Page2TopProvinces,
    },
    BlockRule {
        field_key: "heatmap",
        type_fragments: &["chart"],
        scope: RoleScope::Page2,
        kind: BlockKind::Page2Heatmap,
    },
    BlockRule {
        field_key: "flow",
        type_fragments: &["chart"],
        scope: RoleScope::Generic,
        kind: BlockKind::GenericFlow,
    },
    BlockRule {
        field_key: "cards",
        type_fragments: &["list(label,value,desc)"],
        scope: RoleScope::Generic,
        kind: BlockKind::GenericCards("cards"),
    },
    BlockRule {
        field_key: "extras",
        type_fragments: &["list(label,value,desc)"],
        scope: RoleScope::Generic,
        kind: BlockKind::GenericCards("extras"),
    },
    BlockRule {
        field_key: "trend.categories+series",
        type_fragments: &["chart"],
        scope: RoleScope::Generic,
        kind: BlockKind::GenericTrend,
    },
    BlockRule {
        field_key: "ranking",
        type_fragments: &["table"],
        scope: RoleScope::Generic,
        kind: BlockKind::GenericRanking,
    },
    BlockRule {
        field_key: "preferences",
        type_fragments: &["list(label,value,tag)"],
        scope: RoleScope::Generic,
        kind: BlockKind::GenericPreferences,
    },
    BlockRule {
        field_key: "routes",
        type_fragments: &["list("],
        scope: RoleScope::Generic,
        kind: BlockKind::GenericRoutes,
    },
    BlockRule {
        field_key: "highlights",
        type_fragments: &["list", "label", "value"],
        scope: RoleScope::Generic,
        kind: BlockKind::GenericHighlights { label_value: true },
    },
    BlockRule {
        field_key: "highlights",
        type_fragments: &["list"],
        scope: RoleScope::Generic,
        kind: BlockKind::GenericHighlights { label_value: false },
    },
];

const SCALAR_RULES: &[(&str, ScalarField)] = &[
    ("title", ScalarField::Title),
    ("summary", ScalarField::Summary),
    ("total.value", ScalarField::TotalValue),
    ("total.desc", ScalarField::TotalDesc),
    ("peak.value", ScalarField::PeakValue),
    ("peak.desc", ScalarField::PeakDesc),
    ("cross.value", ScalarField::CrossValue),
    ("cross.desc", ScalarField::CrossDesc),
];

pub fn resolve_handler(directive: &Directive<'_>, role: PageRole) -> Handler {
    let data_type = normalize_data_type(directive.data_type);

    let block = BLOCK_RULES.iter().find(|rule| {
        rule.field_key == directive.field_key
            && rule.scope.admits(role)
            && rule
                .type_fragments
                .iter()
                .all(|fragment| data_type.contains(fragment))
    });
    if let Some(rule) = block {
        return Handler::Block(rule.kind);
    }

    if let Some((_, field)) = SCALAR_RULES
        .iter()
        .find(|(key, _)| *key == directive.field_key)
    {
        return Handler::Scalar(*field);
    }

    let plain_text = data_type.is_empty() || data_type == "text";
    if plain_text && !directive.element_id.is_empty() && !directive.value(1).is_empty() {
        return Handler::Text;
    }

    Handler::Skip
}

fn normalize_data_type(data_type: &str) -> String {
    data_type
        .chars()
        .filter(|value| !value.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
