use super::types::{CellValue, Row};
use super::utils::{clean_base_name, format_value, split_column_name};
use rayon::prelude::*;
use std::collections::HashMap;

/// The ten mandatory eLearning modules, in report order.
pub const MODULE_BASES: [&str; 10] = [
    "Bloodborne Pathogens and Workplace Safety",
    "Chemical Hazard Communication",
    "Compliance",
    "Emergency Procedures",
    "Magnetic Resonance Imaging Safety",
    "Patient Rights",
    "Patient Safety",
    "Infectious Medical Waste",
    "Fall Risk Prevention",
    "Infection Prevention and Standard Precautions",
];

/// Identity columns copied through untouched.
pub const BASE_FIELDS: [&str; 3] = ["Name", "Email", "Program"];

pub const MODULES_COLUMN: &str = "eLearning Modules";

const LINE_BREAK: &str = "\n";
const MODULE_PART_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedColumn {
    pub column: String,
    pub detail: Option<String>,
}

impl GroupedColumn {
    fn label(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.column)
    }
}

/// Columns sharing a base name, in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGroup {
    pub base: String,
    pub columns: Vec<GroupedColumn>,
}

#[derive(Debug, Clone, Default)]
pub struct ColumnGroups {
    groups: Vec<ColumnGroup>,
    index: HashMap<String, usize>,
}

impl ColumnGroups {
    /// Groups every non-identity column by its base, in first-appearance order.
    pub fn from_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Self {
        let mut grouped = ColumnGroups::default();
        for column in columns {
            if BASE_FIELDS.contains(&column) {
                continue;
            }
            let (base, detail) = split_column_name(column);
            let slot = match grouped.index.get(&base) {
                Some(&slot) => slot,
                None => {
                    grouped.groups.push(ColumnGroup {
                        base: base.clone(),
                        columns: Vec::new(),
                    });
                    grouped.index.insert(base, grouped.groups.len() - 1);
                    grouped.groups.len() - 1
                }
            };
            grouped.groups[slot].columns.push(GroupedColumn {
                column: column.to_string(),
                detail: (!detail.is_empty()).then_some(detail),
            });
        }
        grouped
    }

    pub fn get(&self, base: &str) -> Option<&ColumnGroup> {
        self.index.get(base).map(|&slot| &self.groups[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnGroup> {
        self.groups.iter()
    }
}

fn labelled_values<'a>(row: &'a Row, group: &'a ColumnGroup) -> impl Iterator<Item = String> + 'a {
    group.columns.iter().filter_map(move |col| {
        let value = format_value(row.get(&col.column).unwrap_or(&CellValue::Empty));
        (!value.is_empty()).then(|| format!("{}: {}", col.label(), value))
    })
}

/// One `label: value` line per non-empty member column.
pub fn summarize(row: &Row, group: &ColumnGroup) -> String {
    labelled_values(row, group).collect::<Vec<_>>().join(LINE_BREAK)
}

/// One line per module; a module without columns still gets its bare name.
pub fn build_module_cell(row: &Row, groups: &ColumnGroups) -> String {
    MODULE_BASES
        .iter()
        .map(|module| {
            let mut line = clean_base_name(module);
            if let Some(group) = groups.get(module) {
                let parts: Vec<String> = labelled_values(row, group).collect();
                if !parts.is_empty() {
                    line.push_str(MODULE_PART_SEPARATOR);
                    line.push_str(&parts.join(MODULE_PART_SEPARATOR));
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

/// Reshapes one export record into the report layout.
pub fn clean_row(row: &Row) -> Row {
    let groups = ColumnGroups::from_columns(row.keys());
    let mut out = Row::new();

    for field in BASE_FIELDS {
        out.set(field, row.get(field).cloned().unwrap_or_default());
    }

    for group in groups.iter() {
        if MODULE_BASES.contains(&group.base.as_str()) {
            continue;
        }
        out.set(
            clean_base_name(&group.base),
            CellValue::Text(summarize(row, group)),
        );
    }

    out.set(MODULES_COLUMN, CellValue::Text(build_module_cell(row, &groups)));
    out
}

pub fn clean_rows(rows: &[Row]) -> Vec<Row> {
    rows.par_iter().map(clean_row).collect()
}
