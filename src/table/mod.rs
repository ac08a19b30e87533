//! Render delimited result files as booktabs `tabular` fragments.
//!
//! Rendering never aborts a manuscript build: [`render_table_outcome`]
//! turns any read or render error into a one-row placeholder fragment and
//! reports the reason alongside it.

mod format;
mod read;

use anyhow::Result;
use format::{classify, format_cell, latex_escape, ColumnKind};
use read::{read_table, RawTable};
use serde::Serialize;
use std::path::Path;

/// Data rows rendered per table; later rows are dropped without notice.
pub const DEFAULT_MAX_ROWS: usize = 50;

/// Report stems rendered with grouped headers unless configured otherwise.
pub const DEFAULT_GROUPED_REPORTS: [&str; 1] = ["summary_by_cyl"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableLayout {
    /// Flat headers, left-aligned columns.
    Generic,
    /// First column is a row label; `<metric>_<stat>` columns share a
    /// metric header with statistic sub-headers.
    Grouped,
}

/// Chooses a layout for each table file by its stem.
#[derive(Debug, Clone)]
pub struct LayoutPolicy {
    grouped_reports: Vec<String>,
    grouped_all: bool,
}

impl LayoutPolicy {
    pub fn new(grouped_reports: Vec<String>, grouped_all: bool) -> Self {
        Self {
            grouped_reports,
            grouped_all,
        }
    }

    pub fn layout_for(&self, stem: &str) -> TableLayout {
        if self.grouped_all || self.grouped_reports.iter().any(|name| name == stem) {
            TableLayout::Grouped
        } else {
            TableLayout::Generic
        }
    }
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_GROUPED_REPORTS.iter().map(|s| s.to_string()).collect(),
            false,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub max_rows: usize,
    /// Prepend a 0-based row index column to generic tables.
    pub generic_row_index: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            generic_row_index: false,
        }
    }
}

/// A rendered `tabular` block and the label derived from its file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFragment {
    pub label: String,
    pub layout: TableLayout,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    Rendered(TableFragment),
    Placeholder {
        fragment: TableFragment,
        reason: String,
    },
}

impl TableOutcome {
    pub fn fragment(&self) -> &TableFragment {
        match self {
            TableOutcome::Rendered(fragment) => fragment,
            TableOutcome::Placeholder { fragment, .. } => fragment,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            TableOutcome::Rendered(_) => None,
            TableOutcome::Placeholder { reason, .. } => Some(reason),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, TableOutcome::Placeholder { .. })
    }
}

pub fn table_label(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("tab:{stem}")
}

pub fn render_table(
    path: &Path,
    layout: TableLayout,
    options: &RenderOptions,
) -> Result<TableFragment> {
    let table = read_table(path)?;
    let body = match layout {
        TableLayout::Grouped => render_grouped(&table, options.max_rows),
        TableLayout::Generic => {
            render_generic(&table, options.max_rows, options.generic_row_index)
        }
    };
    Ok(TableFragment {
        label: table_label(path),
        layout,
        body,
    })
}

/// Render `path`, substituting a placeholder fragment on any failure.
pub fn render_table_outcome(
    path: &Path,
    layout: TableLayout,
    options: &RenderOptions,
) -> TableOutcome {
    match render_table(path, layout, options) {
        Ok(fragment) => TableOutcome::Rendered(fragment),
        Err(err) => {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let reason = format!("{err:#}");
            tracing::warn!(table = %name, reason = %reason, "table replaced by placeholder");
            TableOutcome::Placeholder {
                fragment: TableFragment {
                    label: table_label(path),
                    layout,
                    body: placeholder_body(&name, &reason),
                },
                reason,
            }
        }
    }
}

fn placeholder_body(name: &str, reason: &str) -> String {
    // The reason may span lines; keep it inside the comment.
    let reason = reason.replace('\n', " ");
    let name = latex_escape(name);
    format!(
        "% Failed to read {name}: {reason}\n\\begin{{tabular}}{{l}}\n\\toprule\nUnable to render table {name}.\\\\\n\\bottomrule\n\\end{{tabular}}"
    )
}

fn column_kinds(table: &RawTable) -> Vec<ColumnKind> {
    (0..table.headers.len())
        .map(|idx| classify(table.column(idx)))
        .collect()
}

fn row_line(cells: &[String]) -> String {
    format!("{} \\\\", cells.join(" & "))
}

fn render_generic(table: &RawTable, max_rows: usize, row_index: bool) -> String {
    let kinds = column_kinds(table);
    let mut col_spec = String::new();
    if row_index {
        col_spec.push('l');
    }
    col_spec.push_str(&"l".repeat(table.headers.len()));

    let mut lines = vec![format!("\\begin{{tabular}}{{{col_spec}}}"), "\\toprule".to_string()];
    let mut header: Vec<String> = Vec::new();
    if row_index {
        header.push(String::new());
    }
    header.extend(table.headers.iter().map(|h| latex_escape(h)));
    lines.push(row_line(&header));
    lines.push("\\midrule".to_string());

    for (idx, row) in table.rows.iter().take(max_rows).enumerate() {
        let mut cells = Vec::with_capacity(row.len() + 1);
        if row_index {
            cells.push(idx.to_string());
        }
        cells.extend(
            row.iter()
                .zip(&kinds)
                .map(|(cell, kind)| format_cell(*kind, cell)),
        );
        lines.push(row_line(&cells));
    }

    lines.push("\\bottomrule".to_string());
    lines.push("\\end{tabular}".to_string());
    lines.join("\n")
}

/// Split `<metric>_<stat>` on the first underscore.
fn split_header(name: &str) -> (&str, &str) {
    name.split_once('_').unwrap_or((name, ""))
}

/// Adjacent columns sharing a metric collapse into one `(metric, span)` group.
fn header_groups<'a>(names: &[&'a str]) -> Vec<(&'a str, usize)> {
    let mut groups: Vec<(&str, usize)> = Vec::new();
    for &name in names {
        let (metric, _) = split_header(name);
        match groups.last_mut() {
            Some((last, span)) if *last == metric => *span += 1,
            _ => groups.push((metric, 1)),
        }
    }
    groups
}

fn render_grouped(table: &RawTable, max_rows: usize) -> String {
    let kinds = column_kinds(table);
    let label_name = table.headers[0].as_str();
    let data_names: Vec<&str> = table.headers[1..].iter().map(String::as_str).collect();

    let col_spec = format!("l{}", "r".repeat(data_names.len()));
    let mut lines = vec![format!("\\begin{{tabular}}{{{col_spec}}}"), "\\toprule".to_string()];

    let mut top = vec![String::new()];
    for (metric, span) in header_groups(&data_names) {
        let metric = latex_escape(metric);
        if span > 1 {
            top.push(format!("\\multicolumn{{{span}}}{{c}}{{{metric}}}"));
        } else {
            top.push(metric);
        }
    }
    lines.push(row_line(&top));

    let mut sub = vec![String::new()];
    sub.extend(
        data_names
            .iter()
            .map(|name| latex_escape(split_header(name).1)),
    );
    lines.push(row_line(&sub));

    let mut index_row = vec![latex_escape(label_name)];
    index_row.extend(data_names.iter().map(|_| String::new()));
    lines.push(row_line(&index_row));
    lines.push("\\midrule".to_string());

    for row in table.rows.iter().take(max_rows) {
        let cells: Vec<String> = row
            .iter()
            .zip(&kinds)
            .map(|(cell, kind)| format_cell(*kind, cell))
            .collect();
        lines.push(row_line(&cells));
    }

    lines.push("\\bottomrule".to_string());
    lines.push("\\end{tabular}".to_string());
    lines.join("\n")
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
