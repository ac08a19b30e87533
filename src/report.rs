//! Machine-readable summary of one manuscript build.
//!
//! Written next to the manuscript as `<stem>.build.json` so pipelines can
//! tell placeholder tables and failed compiles apart from clean builds.
use crate::compile::CompileOutcome;
use crate::document::{FiguresSection, TablesSection};
use crate::paths::DeploymentContext;
use crate::table::TableLayout;
use crate::util::{sha256_file, write_atomic};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const REPORT_SCHEMA_VERSION: u32 = 1;
pub const REPORT_SUFFIX: &str = "build.json";

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub schema_version: u32,
    pub tool_name: String,
    pub tool_version: String,
    pub generated_at_epoch_ms: u128,
    pub context: DeploymentContext,
    pub results_dir: PathBuf,
    pub publish_dir: PathBuf,
    pub output_path: PathBuf,
    pub figures: Vec<FigureEntry>,
    pub tables: Vec<TableEntry>,
    pub compile: CompileOutcome,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FigureEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Rendered,
    Placeholder,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableEntry {
    pub name: String,
    pub layout: TableLayout,
    pub status: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BuildReport {
    pub fn placeholder_count(&self) -> usize {
        self.tables
            .iter()
            .filter(|table| table.status == TableStatus::Placeholder)
            .count()
    }
}

pub fn figure_entries(section: &FiguresSection) -> Vec<FigureEntry> {
    section
        .figures
        .iter()
        .map(|figure| FigureEntry {
            name: figure.file_name(),
            sha256: sha256_file(&figure.path).ok(),
        })
        .collect()
}

pub fn table_entries(section: &TablesSection) -> Vec<TableEntry> {
    section
        .tables
        .iter()
        .map(|(artifact, outcome)| TableEntry {
            name: artifact.file_name(),
            layout: outcome.fragment().layout,
            status: if outcome.is_placeholder() {
                TableStatus::Placeholder
            } else {
                TableStatus::Rendered
            },
            reason: outcome.reason().map(str::to_string),
        })
        .collect()
}

pub fn report_path_for(tex_path: &Path) -> PathBuf {
    tex_path.with_extension(REPORT_SUFFIX)
}

pub fn write_report(path: &Path, report: &BuildReport) -> Result<()> {
    let mut text = serde_json::to_string_pretty(report).context("serialize build report")?;
    text.push('\n');
    write_atomic(path, text.as_bytes())
}
