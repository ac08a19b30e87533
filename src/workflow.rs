use crate::cli::{BuildArgs, InitConfigArgs, ScanArgs};
use crate::config::{self, ContextMode, ManuscriptConfig};
use crate::manuscript::build_manuscript;
use crate::paths::{DeploymentContext, PathResolver};
use crate::scan::{self, Artifact};
use crate::util::display_path;
use anyhow::{Context, Result};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

pub fn run_build(args: BuildArgs) -> Result<()> {
    let mut config = match args.config.as_deref() {
        Some(path) => config::load_config(path)?,
        None => ManuscriptConfig::default(),
    };
    apply_overrides(&mut config, &args);
    let resolver = resolver_for(config.context)?;

    let report = build_manuscript(&config, &resolver)?;
    tracing::info!(
        figures = report.figures.len(),
        tables = report.tables.len(),
        placeholders = report.placeholder_count(),
        "build complete"
    );

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("serialize build report")?;
        println!("{text}");
        return Ok(());
    }
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    if let Some(pdf) = report.compile.pdf() {
        eprintln!("compiled {}", pdf.display());
    }
    println!("{}", report.output_path.display());
    Ok(())
}

/// Layer CLI flags over the loaded config.
pub(crate) fn apply_overrides(config: &mut ManuscriptConfig, args: &BuildArgs) {
    if let Some(context) = args.context {
        config.context = context;
    }
    if let Some(dir) = &args.results_dir {
        config.results_dir = dir.clone();
    }
    if let Some(dir) = &args.publish_dir {
        config.publish_dir = dir.clone();
    }
    if let Some(out) = &args.out {
        config.output_path = out.clone();
    }
    if let Some(title) = &args.title {
        config.title = title.clone();
    }
    if !args.authors.is_empty() {
        config.authors = args.authors.clone();
    }
    if let Some(affiliation) = &args.affiliation {
        config.affiliation = affiliation.clone();
    }
    if let Some(text) = &args.abstract_text {
        config.abstract_text = text.clone();
    }
    if let Some(max_rows) = args.max_rows {
        config.tables.max_rows = max_rows;
    }
    if args.grouped_all {
        config.tables.grouped_all = true;
    }
    if args.generic_row_index {
        config.tables.generic_row_index = true;
    }
    if args.no_compile {
        config.compile.enabled = false;
    }
}

fn resolver_for(mode: ContextMode) -> Result<PathResolver> {
    let cwd = env::current_dir().context("resolve working directory")?;
    Ok(PathResolver::new(deployment_context(mode), cwd))
}

fn deployment_context(mode: ContextMode) -> DeploymentContext {
    match mode {
        ContextMode::Auto => DeploymentContext::detect(),
        ContextMode::Local => DeploymentContext::Local,
        ContextMode::Sandboxed => DeploymentContext::Sandboxed,
    }
}

#[derive(Serialize)]
struct ScanOutput {
    dir: PathBuf,
    context: DeploymentContext,
    figures: Vec<Artifact>,
    tables: Vec<Artifact>,
}

pub fn run_scan(args: ScanArgs) -> Result<()> {
    let resolver = resolver_for(args.context)?;
    let dir = resolver.resolve(&args.dir);
    let set = scan::scan(&dir);

    if args.json {
        let output = ScanOutput {
            dir,
            context: resolver.context(),
            figures: set.figures,
            tables: set.tables,
        };
        let text = serde_json::to_string_pretty(&output).context("serialize scan output")?;
        println!("{text}");
        return Ok(());
    }

    if set.figures.is_empty() && set.tables.is_empty() {
        println!("no artifacts under {}", dir.display());
        return Ok(());
    }
    for artifact in set.figures.iter().chain(set.tables.iter()) {
        let label = match artifact.kind {
            scan::ArtifactKind::Figure => "figure",
            scan::ArtifactKind::Table => "table",
        };
        println!("{label}\t{}", display_path(&artifact.path, Some(&dir)));
    }
    Ok(())
}

pub fn run_init_config(args: InitConfigArgs) -> Result<()> {
    config::write_default_config(&args.path, args.force)?;
    println!("wrote {}", args.path.display());
    Ok(())
}
