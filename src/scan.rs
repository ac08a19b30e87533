//! Recursive artifact discovery for figures and tables.
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const FIGURE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "pdf"];
pub const TABLE_EXTENSIONS: [&str; 2] = ["csv", "tsv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Figure,
    Table,
}

impl ArtifactKind {
    /// Classify a path by its lowercase extension alone.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if FIGURE_EXTENSIONS.contains(&ext.as_str()) {
            Some(ArtifactKind::Figure)
        } else if TABLE_EXTENSIONS.contains(&ext.as_str()) {
            Some(ArtifactKind::Table)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

impl Artifact {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Figures and tables found under one directory, each sorted by path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtifactSet {
    pub figures: Vec<Artifact>,
    pub tables: Vec<Artifact>,
}

/// Walk `root` once and split everything recognized into figures and tables.
///
/// A missing root yields an empty set.
pub fn scan(root: &Path) -> ArtifactSet {
    let mut set = ArtifactSet::default();
    for artifact in walk(root) {
        match artifact.kind {
            ArtifactKind::Figure => set.figures.push(artifact),
            ArtifactKind::Table => set.tables.push(artifact),
        }
    }
    set
}

pub fn discover(root: &Path, kind: ArtifactKind) -> Vec<Artifact> {
    walk(root)
        .into_iter()
        .filter(|artifact| artifact.kind == kind)
        .collect()
}

fn walk(root: &Path) -> Vec<Artifact> {
    if !root.exists() {
        return Vec::new();
    }
    let mut artifacts = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if let Some(kind) = ArtifactKind::from_path(&path) {
            artifacts.push(Artifact { path, kind });
        }
    }
    artifacts.sort_by(|a, b| a.path.cmp(&b.path));
    artifacts
}
