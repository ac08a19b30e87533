//! LaTeX fragment producers and fixed-order composition.
//!
//! Text passed in for the front matter is interpolated verbatim; callers
//! supply well-formed LaTeX.
use crate::scan::{self, Artifact, ArtifactKind};
use crate::table::{render_table_outcome, LayoutPolicy, RenderOptions, TableOutcome};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const AUTHOR_SEPARATOR: &str = " \\\\ ";
pub const CAPTION_PLACEHOLDER: &str = "Place holder for caption";
pub const NO_FIGURES_NOTICE: &str = "No figures found in the publish directory.";
pub const NO_TABLES_NOTICE: &str = "No tables found in the results directory.";

/// The four sections of a manuscript, always emitted in field order.
#[derive(Debug, Clone)]
pub struct ManuscriptDocument {
    pub front_matter: String,
    pub figures: String,
    pub tables: String,
    pub back_matter: String,
}

impl ManuscriptDocument {
    pub fn to_tex(&self) -> String {
        let parts = [
            &self.front_matter,
            &self.figures,
            &self.tables,
            &self.back_matter,
        ];
        let mut tex = parts
            .iter()
            .map(|part| part.trim_end_matches('\n'))
            .collect::<Vec<_>>()
            .join("\n\n");
        tex.push('\n');
        tex
    }
}

pub struct FrontMatter<'a> {
    pub title: &'a str,
    pub authors: &'a [String],
    pub affiliation: &'a str,
    pub abstract_text: &'a str,
}

pub fn front_matter(meta: &FrontMatter<'_>) -> String {
    let authors = meta.authors.join(AUTHOR_SEPARATOR);
    let lines = [
        "\\documentclass[preprint,12pt]{elsarticle}".to_string(),
        "\\usepackage{graphicx}".to_string(),
        "\\usepackage{booktabs}".to_string(),
        "\\usepackage{siunitx}".to_string(),
        "\\usepackage{hyperref}".to_string(),
        "\\usepackage{caption}".to_string(),
        "\\captionsetup{font=small}".to_string(),
        "\\journal{ }".to_string(),
        String::new(),
        "\\begin{document}".to_string(),
        String::new(),
        "\\begin{frontmatter}".to_string(),
        format!("\\title{{{}}}", meta.title),
        format!("\\author[aff1]{{{authors}}}"),
        format!("\\address[aff1]{{{}}}", meta.affiliation),
        "\\begin{abstract}".to_string(),
        meta.abstract_text.to_string(),
        "\\end{abstract}".to_string(),
        "\\begin{keyword}".to_string(),
        "reproducibility \\sep manuscript \\sep pipeline".to_string(),
        "\\end{keyword}".to_string(),
        "\\end{frontmatter}".to_string(),
        String::new(),
        "\\section{Introduction}".to_string(),
        "This manuscript was auto-generated from pipeline outputs.".to_string(),
    ];
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Figures section plus the publish-directory figures it references.
#[derive(Debug, Clone)]
pub struct FiguresSection {
    pub text: String,
    pub figures: Vec<Artifact>,
    pub copied: usize,
}

/// Copy every figure under `results` into `publish`, then reference what
/// `publish` holds by file name only.
///
/// `exclude` keeps the manuscript's own compiled PDF from a previous run out
/// of the section.
pub fn figures_section(
    results: &Path,
    publish: &Path,
    exclude: Option<&Path>,
) -> Result<FiguresSection> {
    fs::create_dir_all(publish).with_context(|| format!("create {}", publish.display()))?;
    let mut copied = 0;
    for figure in scan::discover(results, ArtifactKind::Figure) {
        let target = publish.join(figure.file_name());
        if same_file(&figure.path, &target) {
            continue;
        }
        fs::copy(&figure.path, &target).with_context(|| {
            format!(
                "copy figure {} to {}",
                figure.path.display(),
                target.display()
            )
        })?;
        copied += 1;
    }

    let figures: Vec<Artifact> = scan::discover(publish, ArtifactKind::Figure)
        .into_iter()
        .filter(|figure| !exclude.is_some_and(|skip| same_file(&figure.path, skip)))
        .collect();
    tracing::info!(copied, referenced = figures.len(), "figures collected");

    let mut section = vec!["\\section{Figures}".to_string()];
    if figures.is_empty() {
        section.push(NO_FIGURES_NOTICE.to_string());
    } else {
        section.extend(figures.iter().map(figure_block));
    }
    Ok(FiguresSection {
        text: section.join("\n") + "\n",
        figures,
        copied,
    })
}

fn figure_block(figure: &Artifact) -> String {
    [
        "\\begin{figure}[ht]".to_string(),
        "\\centering".to_string(),
        format!(
            "\\includegraphics[width=0.9\\linewidth]{{{}}}",
            figure.file_name()
        ),
        format!("\\caption{{{CAPTION_PLACEHOLDER}}}"),
        format!("\\label{{fig:{}}}", figure.stem()),
        "\\end{figure}".to_string(),
    ]
    .join("\n")
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Tables section plus the per-file render outcome.
#[derive(Debug, Clone)]
pub struct TablesSection {
    pub text: String,
    pub tables: Vec<(Artifact, TableOutcome)>,
}

pub fn tables_section(
    results: &Path,
    policy: &LayoutPolicy,
    options: &RenderOptions,
) -> TablesSection {
    let tables: Vec<(Artifact, TableOutcome)> = scan::discover(results, ArtifactKind::Table)
        .into_iter()
        .map(|table| {
            let layout = policy.layout_for(&table.stem());
            let outcome = render_table_outcome(&table.path, layout, options);
            (table, outcome)
        })
        .collect();

    let mut section = vec!["\\section{Tables}".to_string()];
    if tables.is_empty() {
        section.push(NO_TABLES_NOTICE.to_string());
    } else {
        section.extend(tables.iter().map(|(_, outcome)| table_block(outcome)));
    }
    TablesSection {
        text: section.join("\n") + "\n",
        tables,
    }
}

fn table_block(outcome: &TableOutcome) -> String {
    let fragment = outcome.fragment();
    [
        "\\begin{table}[ht]".to_string(),
        format!("\\caption{{{CAPTION_PLACEHOLDER}}}"),
        format!("\\label{{{}}}", fragment.label),
        "\\centering".to_string(),
        fragment.body.clone(),
        "\\end{table}".to_string(),
    ]
    .join("\n")
}

pub fn back_matter() -> &'static str {
    r"\section{Methods}
Brief description of methods.

\section{Results}
Summary of key results.

\section{Discussion}
Discussion and limitations.

\section{Conclusion}
Final remarks.

\bibliographystyle{elsarticle-num}
\bibliography{references}
\end{document}
"
}

/// Path of the compiled PDF that sits next to `tex_path`.
pub fn pdf_path_for(tex_path: &Path) -> PathBuf {
    tex_path.with_extension("pdf")
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
