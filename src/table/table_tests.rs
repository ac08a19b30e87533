use super::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_table(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write table");
    path
}

fn data_rows(body: &str) -> Vec<&str> {
    let start = body.find("\\midrule").expect("midrule present") + "\\midrule".len();
    let end = body.find("\\bottomrule").expect("bottomrule present");
    body[start..end]
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect()
}

#[test]
fn grouped_layout_shares_metric_headers() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_table(
        &dir,
        "summary_by_cyl.csv",
        "cyl,mpg_mean,mpg_median,hp_mean\n4,26.6636,26.0,82.6364\n6,19.74,19.7,122.29\n",
    );

    let fragment =
        render_table(&path, TableLayout::Grouped, &RenderOptions::default()).expect("render");
    let expected = [
        "\\begin{tabular}{lrrr}",
        "\\toprule",
        " & \\multicolumn{2}{c}{mpg} & hp \\\\",
        " & mean & median & mean \\\\",
        "cyl &  &  &  \\\\",
        "\\midrule",
        "4 & 26.66 & 26.00 & 82.64 \\\\",
        "6 & 19.74 & 19.70 & 122.29 \\\\",
        "\\bottomrule",
        "\\end{tabular}",
    ]
    .join("\n");
    assert_eq!(fragment.body, expected);
    assert_eq!(fragment.label, "tab:summary_by_cyl");
    assert_eq!(fragment.layout, TableLayout::Grouped);
}

#[test]
fn grouped_layout_keeps_unsplit_columns_with_blank_subheader() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_table(&dir, "s.csv", "group,count,wt_std\na,3,0.5\n");

    let body = render_table(&path, TableLayout::Grouped, &RenderOptions::default())
        .expect("render")
        .body;
    assert!(body.contains(" & count & wt \\\\"), "{body}");
    assert!(body.contains(" &  & std \\\\"), "{body}");
    assert!(body.contains("a & 3 & 0.50 \\\\"), "{body}");
}

#[test]
fn generic_layout_is_flat_and_left_aligned() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_table(&dir, "cars.csv", "model_name,mpg\nMazda RX4,21\nDatsun,22.8\n");

    let fragment =
        render_table(&path, TableLayout::Generic, &RenderOptions::default()).expect("render");
    let expected = [
        "\\begin{tabular}{ll}",
        "\\toprule",
        "model\\_name & mpg \\\\",
        "\\midrule",
        "Mazda RX4 & 21.00 \\\\",
        "Datsun & 22.80 \\\\",
        "\\bottomrule",
        "\\end{tabular}",
    ]
    .join("\n");
    assert_eq!(fragment.body, expected);
}

#[test]
fn generic_layout_can_include_row_index() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_table(&dir, "t.tsv", "a\tb\nx\t1\ny\t2\n");
    let options = RenderOptions {
        generic_row_index: true,
        ..RenderOptions::default()
    };

    let body = render_table(&path, TableLayout::Generic, &options)
        .expect("render")
        .body;
    assert!(body.starts_with("\\begin{tabular}{lll}"), "{body}");
    assert_eq!(data_rows(&body), vec!["0 & x & 1 \\\\", "1 & y & 2 \\\\"]);
}

#[test]
fn rows_beyond_the_cap_are_dropped() {
    let dir = TempDir::new().expect("temp dir");
    let mut contents = String::from("id,value\n");
    for idx in 0..(DEFAULT_MAX_ROWS + 7) {
        contents.push_str(&format!("{idx},{idx}.5\n"));
    }
    let path = write_table(&dir, "long.csv", &contents);

    for layout in [TableLayout::Generic, TableLayout::Grouped] {
        let body = render_table(&path, layout, &RenderOptions::default())
            .expect("render")
            .body;
        assert_eq!(data_rows(&body).len(), DEFAULT_MAX_ROWS);
        assert!(!body.contains("\\hline"));
    }

    let small = RenderOptions {
        max_rows: 3,
        ..RenderOptions::default()
    };
    let body = render_table(&path, TableLayout::Generic, &small)
        .expect("render")
        .body;
    assert_eq!(data_rows(&body).len(), 3);
}

#[test]
fn malformed_table_becomes_placeholder() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_table(&dir, "broken.csv", "a,b\n1,2\n3,4,5\n");

    let outcome = render_table_outcome(&path, TableLayout::Generic, &RenderOptions::default());
    assert!(outcome.is_placeholder());
    assert!(outcome.reason().is_some());
    let body = &outcome.fragment().body;
    assert!(body.starts_with("% Failed to read broken.csv:"), "{body}");
    assert!(body.contains("Unable to render table broken.csv.\\\\"), "{body}");
    assert_eq!(outcome.fragment().label, "tab:broken");
}

#[test]
fn missing_file_becomes_placeholder() {
    let dir = TempDir::new().expect("temp dir");
    let outcome = render_table_outcome(
        &dir.path().join("gone.csv"),
        TableLayout::Grouped,
        &RenderOptions::default(),
    );
    assert!(outcome.is_placeholder());
}

#[test]
fn layout_policy_selects_by_stem() {
    let policy = LayoutPolicy::default();
    assert_eq!(policy.layout_for("summary_by_cyl"), TableLayout::Grouped);
    assert_eq!(policy.layout_for("other"), TableLayout::Generic);

    let all = LayoutPolicy::new(Vec::new(), true);
    assert_eq!(all.layout_for("other"), TableLayout::Grouped);
}

#[test]
fn na_tokens_render_as_nan_and_keep_numeric_rounding() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_table(&dir, "mpg.csv", "car,mpg,gear\nA,21.1234,4\nB,NA,\nC,19.456,007\n");

    let body = render_table(&path, TableLayout::Generic, &RenderOptions::default())
        .expect("render")
        .body;
    assert_eq!(
        data_rows(&body),
        vec![
            "A & 21.12 & 4.00 \\\\",
            "B & NaN & NaN \\\\",
            "C & 19.46 & 7.00 \\\\",
        ]
    );
}

#[test]
fn integer_and_text_cells_are_normalized() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_table(&dir, "codes.csv", "name,code\n  Mazda RX4 ,007\nDatsun,+5\n");

    let body = render_table(&path, TableLayout::Generic, &RenderOptions::default())
        .expect("render")
        .body;
    assert_eq!(
        data_rows(&body),
        vec!["Mazda RX4 & 7 \\\\", "Datsun & 5 \\\\"]
    );
}
