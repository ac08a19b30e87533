use super::*;
use crate::table::TableLayout;
use std::fs;
use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(path, contents.as_bytes()).expect("write file");
}

fn sample_front_matter() -> String {
    let authors = vec!["Ada Lovelace".to_string(), "Charles Babbage".to_string()];
    front_matter(&FrontMatter {
        title: "Fuel economy",
        authors: &authors,
        affiliation: "Analytical Engines Ltd",
        abstract_text: "We summarize $mpg$ by cylinder count.",
    })
}

#[test]
fn front_matter_interpolates_metadata_verbatim() {
    let text = sample_front_matter();
    assert!(text.starts_with("\\documentclass[preprint,12pt]{elsarticle}\n"));
    assert!(text.contains("\\title{Fuel economy}"));
    assert!(text.contains("\\author[aff1]{Ada Lovelace \\\\ Charles Babbage}"));
    assert!(text.contains("\\address[aff1]{Analytical Engines Ltd}"));
    assert!(text.contains("\nWe summarize $mpg$ by cylinder count.\n"));
    assert!(text.contains("\\section{Introduction}"));
}

#[test]
fn empty_artifact_directories_emit_notices() {
    let root = TempDir::new().expect("temp dir");
    let results = root.path().join("results");
    let publish = root.path().join("reports");
    fs::create_dir_all(&results).expect("create results");

    let figures = figures_section(&results, &publish, None).expect("figures section");
    assert!(figures.text.contains(NO_FIGURES_NOTICE));
    assert!(!figures.text.contains("\\begin{figure}"));
    assert!(figures.figures.is_empty());

    let tables = tables_section(
        &results,
        &LayoutPolicy::default(),
        &RenderOptions::default(),
    );
    assert!(tables.text.contains(NO_TABLES_NOTICE));
    assert!(!tables.text.contains("\\begin{table}"));
}

#[test]
fn figures_are_copied_and_referenced_by_file_name() {
    let root = TempDir::new().expect("temp dir");
    let results = root.path().join("results");
    let publish = root.path().join("reports");
    write_file(&results.join("mtcars_mpg_vs_hp.png"), "png");
    write_file(&results.join("nested/extra.jpg"), "jpg");
    write_file(&publish.join("extra.jpg"), "stale");

    let section = figures_section(&results, &publish, None).expect("figures section");
    assert_eq!(section.copied, 2);
    assert_eq!(
        fs::read_to_string(publish.join("extra.jpg")).expect("read copy"),
        "jpg"
    );
    assert!(section
        .text
        .contains("\\includegraphics[width=0.9\\linewidth]{mtcars_mpg_vs_hp.png}"));
    assert!(section.text.contains("\\label{fig:extra}"));
    assert!(!section.text.contains("nested"));
}

#[test]
fn compiled_manuscript_pdf_is_not_a_figure() {
    let root = TempDir::new().expect("temp dir");
    let results = root.path().join("results");
    let publish = root.path().join("reports");
    write_file(&results.join("plot.png"), "png");
    write_file(&publish.join("manuscript.pdf"), "%PDF");

    let exclude = publish.join("manuscript.pdf");
    let section = figures_section(&results, &publish, Some(&exclude)).expect("figures section");
    assert_eq!(section.figures.len(), 1);
    assert!(!section.text.contains("manuscript.pdf"));
}

#[test]
fn shared_results_and_publish_directory_keeps_figures_intact() {
    let root = TempDir::new().expect("temp dir");
    let shared = root.path().join("out");
    write_file(&shared.join("plot.png"), "png-bytes");

    let section = figures_section(&shared, &shared, None).expect("figures section");
    assert_eq!(section.copied, 0);
    assert_eq!(
        fs::read_to_string(shared.join("plot.png")).expect("read figure"),
        "png-bytes"
    );
    assert_eq!(section.figures.len(), 1);
}

#[test]
fn one_malformed_table_does_not_hide_the_others() {
    let root = TempDir::new().expect("temp dir");
    let results = root.path().join("results");
    write_file(
        &results.join("summary_by_cyl.csv"),
        "cyl,mpg_mean,mpg_median,hp_mean\n4,26.66,26.0,82.64\n",
    );
    write_file(&results.join("broken.csv"), "a,b\n1,2\n3\n");
    write_file(&results.join("raw.tsv"), "car\tmpg\nFiat\t32.4\n");

    let section = tables_section(
        &results,
        &LayoutPolicy::default(),
        &RenderOptions::default(),
    );
    let names: Vec<String> = section.tables.iter().map(|(a, _)| a.file_name()).collect();
    assert_eq!(names, vec!["broken.csv", "raw.tsv", "summary_by_cyl.csv"]);

    let placeholders: Vec<bool> = section
        .tables
        .iter()
        .map(|(_, outcome)| outcome.is_placeholder())
        .collect();
    assert_eq!(placeholders, vec![true, false, false]);
    assert_eq!(
        section.tables[2].1.fragment().layout,
        TableLayout::Grouped
    );

    assert!(section.text.contains("Unable to render table broken.csv."));
    assert!(section.text.contains("Fiat & 32.40 \\\\"));
    assert!(section.text.contains("\\multicolumn{2}{c}{mpg}"));
    assert_eq!(section.text.matches("\\begin{table}[ht]").count(), 3);
    assert!(section.text.contains("\\label{tab:summary_by_cyl}"));
}

#[test]
fn document_sections_follow_fixed_order() {
    let root = TempDir::new().expect("temp dir");
    let results = root.path().join("results");
    let publish = root.path().join("reports");
    write_file(&results.join("plot.png"), "png");
    write_file(&results.join("table.csv"), "a,b\n1,2\n");

    let document = ManuscriptDocument {
        front_matter: sample_front_matter(),
        figures: figures_section(&results, &publish, None)
            .expect("figures section")
            .text,
        tables: tables_section(
            &results,
            &LayoutPolicy::default(),
            &RenderOptions::default(),
        )
        .text,
        back_matter: back_matter().to_string(),
    };
    let tex = document.to_tex();

    let front = tex.find("\\begin{frontmatter}").expect("front matter");
    let figures = tex.find("\\section{Figures}").expect("figures");
    let last_figure = tex.rfind("\\end{figure}").expect("figure block");
    let tables = tex.find("\\section{Tables}").expect("tables");
    let methods = tex.find("\\section{Methods}").expect("back matter");
    assert!(front < figures);
    assert!(last_figure < tables);
    assert!(tables < methods);
    assert!(tex.contains("\\end{figure}\n\n\\section{Tables}"));
    assert!(tex.ends_with("\\end{document}\n"));
}

#[test]
fn pdf_sits_next_to_the_source() {
    assert_eq!(
        pdf_path_for(Path::new("/reports/manuscript.tex")),
        PathBuf::from("/reports/manuscript.pdf")
    );
}
