//! Path resolution across the two deployment contexts.
//!
//! Pipelines are written against the sandbox layout (`/results`, `/reports`).
//! When the same invocation runs on a workstation those absolute paths are
//! re-rooted under the working directory instead.
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Absolute prefixes that only exist inside the sandbox layout.
pub const SANDBOX_PREFIXES: [&str; 2] = ["/results", "/reports"];

/// Top-level directories whose joint presence marks a sandboxed run.
const SANDBOX_MARKERS: [&str; 2] = ["reports", "scripts"];

/// Where the current invocation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentContext {
    Sandboxed,
    Local,
}

impl DeploymentContext {
    /// Probe the real filesystem root for the sandbox markers.
    pub fn detect() -> Self {
        Self::detect_in(Path::new("/"))
    }

    /// Probe `root` for the sandbox markers; both must be directories.
    pub fn detect_in(root: &Path) -> Self {
        let sandboxed = SANDBOX_MARKERS
            .iter()
            .all(|marker| root.join(marker).is_dir());
        if sandboxed {
            DeploymentContext::Sandboxed
        } else {
            DeploymentContext::Local
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentContext::Sandboxed => "sandboxed",
            DeploymentContext::Local => "local",
        }
    }
}

/// Pure path resolver bound to one context and working directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    context: DeploymentContext,
    cwd: PathBuf,
}

impl PathResolver {
    pub fn new(context: DeploymentContext, cwd: PathBuf) -> Self {
        Self { context, cwd }
    }

    pub fn context(&self) -> DeploymentContext {
        self.context
    }

    /// Resolve `input` without touching the filesystem.
    pub fn resolve(&self, input: &str) -> PathBuf {
        let path = Path::new(input);
        if !path.is_absolute() {
            return self.cwd.join(path);
        }
        if self.context == DeploymentContext::Sandboxed {
            return path.to_path_buf();
        }
        let remap = SANDBOX_PREFIXES
            .iter()
            .any(|prefix| input.starts_with(prefix));
        if remap {
            self.cwd.join(input.trim_start_matches('/'))
        } else {
            path.to_path_buf()
        }
    }
}
