//! End-to-end manuscript build.
//!
//! Directory creation and the document write are the only hard failures;
//! tables, compilation, and the build report degrade gracefully.
use crate::compile::{CompilationRunner, CompileOutcome, CompileStep};
use crate::config::{validate_config, ManuscriptConfig};
use crate::document::{
    back_matter, figures_section, front_matter, pdf_path_for, tables_section, FrontMatter,
    ManuscriptDocument,
};
use crate::paths::PathResolver;
use crate::report::{
    figure_entries, report_path_for, table_entries, write_report, BuildReport,
    REPORT_SCHEMA_VERSION,
};
use crate::util::{now_epoch_ms, write_atomic};
use anyhow::{Context, Result};
use std::fs;

pub fn build_manuscript(config: &ManuscriptConfig, resolver: &PathResolver) -> Result<BuildReport> {
    validate_config(config)?;

    let results = resolver.resolve(&config.results_dir);
    let publish = resolver.resolve(&config.publish_dir);
    let output = resolver.resolve(&config.output_path);
    tracing::info!(
        context = resolver.context().as_str(),
        results = %results.display(),
        publish = %publish.display(),
        output = %output.display(),
        "building manuscript"
    );

    fs::create_dir_all(&publish).with_context(|| format!("create {}", publish.display()))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }

    let front = front_matter(&FrontMatter {
        title: &config.title,
        authors: &config.authors,
        affiliation: &config.affiliation,
        abstract_text: &config.abstract_text,
    });
    let figures = figures_section(&results, &publish, Some(&pdf_path_for(&output)))?;
    let tables = tables_section(
        &results,
        &config.tables.layout_policy(),
        &config.tables.render_options(),
    );
    let document = ManuscriptDocument {
        front_matter: front,
        figures: figures.text.clone(),
        tables: tables.text.clone(),
        back_matter: back_matter().to_string(),
    };
    write_atomic(&output, document.to_tex().as_bytes())
        .with_context(|| format!("write manuscript {}", output.display()))?;
    tracing::info!(output = %output.display(), "manuscript written");

    let compile = if config.compile.enabled {
        match CompilationRunner::from_config(&config.compile) {
            Ok(runner) => runner.compile(&output),
            Err(err) => CompileOutcome::Failed {
                step: CompileStep::FirstPass,
                reason: format!("{err:#}"),
            },
        }
    } else {
        CompileOutcome::Skipped {
            reason: "compilation disabled".to_string(),
        }
    };

    let mut warnings = Vec::new();
    for (artifact, outcome) in &tables.tables {
        if let Some(reason) = outcome.reason() {
            warnings.push(format!(
                "table {} rendered as placeholder: {reason}",
                artifact.file_name()
            ));
        }
    }
    if let CompileOutcome::Failed { step, reason } = &compile {
        warnings.push(format!("PDF compilation failed ({}): {reason}", step.as_str()));
    }

    let report = BuildReport {
        schema_version: REPORT_SCHEMA_VERSION,
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at_epoch_ms: now_epoch_ms().unwrap_or_default(),
        context: resolver.context(),
        results_dir: results,
        publish_dir: publish,
        figures: figure_entries(&figures),
        tables: table_entries(&tables),
        compile,
        warnings,
        output_path: output,
    };

    let report_path = report_path_for(&report.output_path);
    if let Err(err) = write_report(&report_path, &report) {
        tracing::warn!(path = %report_path.display(), error = %format!("{err:#}"), "build report not written");
    }
    Ok(report)
}

#[cfg(test)]
#[path = "manuscript_tests.rs"]
mod tests;
