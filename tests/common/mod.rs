//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Scratch project directory the `pman` binary runs in.
pub struct Workspace {
    dir: TempDir,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp workspace"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|err| panic!("read {rel}: {err}"))
    }

    /// Run `pman` with `args` from the workspace root.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_pman"))
            .args(args)
            .current_dir(self.root())
            .env_remove("PMAN_LOG")
            .stdin(Stdio::null())
            .output()
            .expect("spawn pman")
    }

    /// Like [`Workspace::run`] but panics with captured output on failure.
    pub fn run_ok(&self, args: &[&str]) -> Output {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "pman {:?} failed\nstdout:\n{}\nstderr:\n{}",
            args,
            stdout(&output),
            stderr(&output)
        );
        output
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Minimal grouped summary in the `<metric>_<stat>` column layout.
#[allow(dead_code)]
pub const SUMMARY_BY_CYL: &str = "cyl,mpg_mean,mpg_std,hp_mean\n4,26.66,4.51,82.64\n6,19.74,1.45,122.29\n8,15.1,2.56,209.21\n";

/// One-pixel PNG; the content is never decoded, only copied.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n";
