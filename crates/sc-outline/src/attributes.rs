//! Initial attribute values from an attribute-system document.
//!
//! Two layouts are read: a markdown table whose first two columns are name
//! and integer value, and a list of `Attribute name:` / `Initial value:`
//! pairs.

use sc_core::AttributeMap;

use crate::field::{clean_value, line_field};

const NAME_LABELS: &[&str] = &["attribute name", "属性名称", "属性名"];
const VALUE_LABELS: &[&str] = &["initial value", "初始值"];

fn parse_value(text: &str) -> Option<i64> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(text.len(), |(i, _)| i);
    text[..end].parse().ok()
}

/// A `| name | value |` row; header and divider rows yield `None`.
fn table_row(line: &str) -> Option<(&str, i64)> {
    let row = line.trim().strip_prefix('|')?;
    let mut cells = row.split('|').map(clean_value);
    let name = cells.next().filter(|name| !name.is_empty())?;
    let value = parse_value(cells.next()?)?;
    Some((name, value))
}

/// Initial attribute values found in `text`.
///
/// Later entries for the same attribute override earlier ones. Rows whose
/// value is not an integer are skipped.
pub fn parse_initial_attributes(text: &str) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    let mut pending: Option<&str> = None;

    for line in text.lines() {
        if let Some((name, value)) = table_row(line) {
            attributes.insert(name.to_string(), value);
        } else if let Some(name) = line_field(line, NAME_LABELS).filter(|name| !name.is_empty()) {
            pending = Some(name);
        } else if let Some(value) = line_field(line, VALUE_LABELS).and_then(parse_value) {
            if let Some(name) = pending.take() {
                attributes.insert(name.to_string(), value);
            }
        }
    }

    attributes
}
