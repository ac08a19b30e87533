//! Manuscript configuration.
//!
//! Every field is optional on disk; defaults follow the sandbox layout so a
//! pipeline can call `pman build` without any config at all.
use crate::table::{LayoutPolicy, RenderOptions, DEFAULT_GROUPED_REPORTS, DEFAULT_MAX_ROWS};
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_RESULTS_DIR: &str = "/results";
pub const DEFAULT_PUBLISH_DIR: &str = "/reports";
pub const DEFAULT_OUTPUT_PATH: &str = "/reports/manuscript.tex";
pub const DEFAULT_TITLE: &str = "Auto-generated Elsevier Manuscript";
pub const DEFAULT_AFFILIATION: &str = "Affiliation";
pub const DEFAULT_ABSTRACT: &str = "Auto-generated manuscript compiled from pipeline outputs.";
pub const DEFAULT_COMPILER: &str = "pdflatex";
pub const DEFAULT_BIBTEX: &str = "bibtex";

/// How absolute sandbox paths are treated.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    /// Sandboxed when both /reports and /scripts exist
    #[default]
    Auto,
    Local,
    Sandboxed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManuscriptConfig {
    pub context: ContextMode,
    pub results_dir: String,
    pub publish_dir: String,
    pub output_path: String,
    pub title: String,
    pub authors: Vec<String>,
    pub affiliation: String,
    pub abstract_text: String,
    pub tables: TableConfig,
    pub compile: CompileConfig,
}

impl Default for ManuscriptConfig {
    fn default() -> Self {
        Self {
            context: ContextMode::Auto,
            results_dir: DEFAULT_RESULTS_DIR.to_string(),
            publish_dir: DEFAULT_PUBLISH_DIR.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            title: DEFAULT_TITLE.to_string(),
            authors: Vec::new(),
            affiliation: DEFAULT_AFFILIATION.to_string(),
            abstract_text: DEFAULT_ABSTRACT.to_string(),
            tables: TableConfig::default(),
            compile: CompileConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    pub max_rows: usize,
    /// File stems rendered with grouped metric/statistic headers.
    pub grouped_reports: Vec<String>,
    pub grouped_all: bool,
    pub generic_row_index: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            grouped_reports: DEFAULT_GROUPED_REPORTS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            grouped_all: false,
            generic_row_index: false,
        }
    }
}

impl TableConfig {
    pub fn layout_policy(&self) -> LayoutPolicy {
        LayoutPolicy::new(self.grouped_reports.clone(), self.grouped_all)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_rows: self.max_rows,
            generic_row_index: self.generic_row_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    pub enabled: bool,
    /// Compiler command line; split with shell quoting rules.
    pub compiler: String,
    pub bibtex: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            compiler: DEFAULT_COMPILER.to_string(),
            bibtex: DEFAULT_BIBTEX.to_string(),
        }
    }
}

pub fn config_stub() -> Result<String> {
    serde_json::to_string_pretty(&ManuscriptConfig::default()).context("serialize config stub")
}

pub fn load_config(path: &Path) -> Result<ManuscriptConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: ManuscriptConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(config)
}

/// Write the default config, refusing to clobber an existing file unless forced.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.is_file() && !force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let text = config_stub()?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &ManuscriptConfig) -> Result<()> {
    for (label, value) in [
        ("results_dir", &config.results_dir),
        ("publish_dir", &config.publish_dir),
        ("output_path", &config.output_path),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!("{label} must be non-empty"));
        }
    }
    if config.tables.max_rows == 0 {
        return Err(anyhow!("tables.max_rows must be at least 1"));
    }
    if config.compile.enabled {
        let argv = shell_words::split(&config.compile.compiler)
            .with_context(|| format!("parse compiler command {:?}", config.compile.compiler))?;
        if argv.is_empty() {
            return Err(anyhow!("compile.compiler must be non-empty"));
        }
        if config.compile.bibtex.trim().is_empty() {
            return Err(anyhow!("compile.bibtex must be non-empty"));
        }
    }
    Ok(())
}
