//! Cell formatting and escaping for tabular output.

/// Decimal places kept for floating-point columns.
pub(super) const FLOAT_PRECISION: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// Cell values read as missing, in addition to the empty cell.
pub(super) const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Rendering of a missing value in any column.
const MISSING_TEXT: &str = "NaN";

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_TOKENS.contains(&cell)
}

/// Infer a column's kind from its non-missing cells.
///
/// A column that only has missing values is treated as floating point so
/// they render as `NaN`; so is an integer column with gaps.
pub(super) fn classify<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Integer;
    let mut has_missing = false;
    let mut seen = false;
    for cell in cells {
        let cell = cell.trim();
        if is_missing(cell) {
            has_missing = true;
            continue;
        }
        seen = true;
        if kind == ColumnKind::Integer && cell.parse::<i64>().is_ok() {
            continue;
        }
        if cell.parse::<f64>().is_ok() {
            kind = ColumnKind::Float;
            continue;
        }
        return ColumnKind::Text;
    }
    if !seen || (has_missing && kind == ColumnKind::Integer) {
        return ColumnKind::Float;
    }
    kind
}

pub(super) fn format_cell(kind: ColumnKind, raw: &str) -> String {
    let cell = raw.trim();
    if is_missing(cell) {
        return MISSING_TEXT.to_string();
    }
    match kind {
        ColumnKind::Integer => match cell.parse::<i64>() {
            Ok(value) => value.to_string(),
            Err(_) => cell.to_string(),
        },
        ColumnKind::Float => match cell.parse::<f64>() {
            Ok(value) => format!("{:.*}", FLOAT_PRECISION, value),
            Err(_) => MISSING_TEXT.to_string(),
        },
        ColumnKind::Text => latex_escape(cell),
    }
}

/// Escape LaTeX special characters in table text.
pub(crate) fn latex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            '^' => out.push_str("\\textasciicircum{}"),
            '_' => out.push_str("\\_"),
            '%' => out.push_str("\\%"),
            '~' => out.push_str("\\textasciitilde{}"),
            _ => out.push(c),
        }
    }
    out
}
