//! Best-effort PDF compilation of an assembled manuscript.
//!
//! The `.tex` source is the deliverable; every failure here is reported as a
//! [`CompileOutcome`] and never returned as an error.
use crate::config::CompileConfig;
use crate::util::truncate_string;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Bibliography database looked up next to the manuscript.
pub const REFERENCES_FILE: &str = "references.bib";

const MAX_DETAIL_BYTES: usize = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileStep {
    FirstPass,
    Bibliography,
    SecondPass,
}

impl CompileStep {
    pub fn as_str(self) -> &'static str {
        match self {
            CompileStep::FirstPass => "first pass",
            CompileStep::Bibliography => "bibliography",
            CompileStep::SecondPass => "second pass",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompileOutcome {
    Skipped { reason: String },
    Compiled { pdf: PathBuf, bibliography: bool },
    Failed { step: CompileStep, reason: String },
}

impl CompileOutcome {
    pub fn pdf(&self) -> Option<&Path> {
        match self {
            CompileOutcome::Compiled { pdf, .. } => Some(pdf),
            _ => None,
        }
    }
}

/// Runs the compiler twice around an optional bibliography pass.
#[derive(Debug, Clone)]
pub struct CompilationRunner {
    compiler: Vec<String>,
    bibtex: Vec<String>,
}

impl CompilationRunner {
    pub fn from_config(config: &CompileConfig) -> Result<Self> {
        let compiler = shell_words::split(&config.compiler)
            .with_context(|| format!("parse compiler command: {}", config.compiler))?;
        let bibtex = shell_words::split(&config.bibtex)
            .with_context(|| format!("parse bibtex command: {}", config.bibtex))?;
        if compiler.is_empty() || bibtex.is_empty() {
            return Err(anyhow!("compiler commands must be non-empty"));
        }
        Ok(Self { compiler, bibtex })
    }

    pub fn compile(&self, tex_path: &Path) -> CompileOutcome {
        match self.run_passes(tex_path) {
            Ok(outcome) => outcome,
            Err((step, err)) => {
                let reason = format!("{err:#}");
                tracing::warn!(step = step.as_str(), reason = %reason, "PDF compilation failed");
                CompileOutcome::Failed { step, reason }
            }
        }
    }

    fn run_passes(&self, tex_path: &Path) -> Result<CompileOutcome, (CompileStep, anyhow::Error)> {
        let workdir = tex_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = tex_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                (
                    CompileStep::FirstPass,
                    anyhow!("manuscript path has no file name"),
                )
            })?;
        let aux_name = Path::new(&file_name)
            .with_extension("aux")
            .to_string_lossy()
            .into_owned();
        let compiler_args = ["-interaction=nonstopmode".to_string(), file_name];

        run_step(&self.compiler, &compiler_args, workdir)
            .map_err(|err| (CompileStep::FirstPass, err))?;

        let bibliography = workdir.join(REFERENCES_FILE).is_file();
        if bibliography {
            run_step(&self.bibtex, &[aux_name], workdir)
                .map_err(|err| (CompileStep::Bibliography, err))?;
        }

        run_step(&self.compiler, &compiler_args, workdir)
            .map_err(|err| (CompileStep::SecondPass, err))?;

        let pdf = tex_path.with_extension("pdf");
        if !pdf.is_file() {
            return Err((
                CompileStep::SecondPass,
                anyhow!("compiler exited cleanly but {} is missing", pdf.display()),
            ));
        }
        tracing::info!(pdf = %pdf.display(), "PDF generated");
        Ok(CompileOutcome::Compiled { pdf, bibliography })
    }
}

fn run_step(argv: &[String], extra: &[String], cwd: &Path) -> Result<()> {
    let (program, base_args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("command is empty"))?;
    let resolved = which::which(program).with_context(|| format!("locate {program}"))?;

    let start = Instant::now();
    let output = Command::new(&resolved)
        .args(base_args)
        .args(extra)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("run {program}"))?;
    let elapsed_ms = start.elapsed().as_millis();

    tracing::info!(
        program = %program,
        elapsed_ms,
        success = output.status.success(),
        "compile step complete"
    );

    if !output.status.success() {
        return Err(anyhow!(
            "{program} failed with status {}: {}",
            output.status,
            failure_detail(&output.stdout, &output.stderr)
        ));
    }
    Ok(())
}

/// TeX reports errors on stdout as `! ...` lines; prefer those, then stderr.
fn failure_detail(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    let detail = stdout
        .lines()
        .find(|line| line.starts_with('!'))
        .or_else(|| stderr.lines().find(|line| !line.trim().is_empty()))
        .or_else(|| stdout.lines().rev().find(|line| !line.trim().is_empty()))
        .unwrap_or("no output");
    truncate_string(detail.trim(), MAX_DETAIL_BYTES)
}
