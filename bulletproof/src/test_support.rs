//! Test-only helpers for building throwaway Elm projects.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// A typical application `elm.json` for a project that uses bulletproof.
pub const PROJECT_MANIFEST: &str = r#"{
    "type": "application",
    "source-directories": [
        "src"
    ],
    "elm-version": "0.19.1",
    "dependencies": {
        "direct": {
            "elm/browser": "1.0.2",
            "elm/core": "1.0.5",
            "elm/html": "1.0.0",
            "owanturist/elm-bulletproof": "1.0.0"
        },
        "indirect": {
            "elm/json": "1.1.3",
            "elm/time": "1.0.0",
            "elm/url": "1.0.0",
            "elm/virtual-dom": "1.0.3"
        }
    },
    "test-dependencies": {
        "direct": {},
        "indirect": {}
    }
}
"#;

const STORY_SOURCE: &str = "module Story exposing (stories)\n";

/// Temporary project directory, removed on drop.
pub struct TestProject {
    _temp: TempDir,
    root: PathBuf,
}

impl TestProject {
    /// Project with [`PROJECT_MANIFEST`] at its root.
    pub fn new() -> Result<Self> {
        Self::with_manifest(PROJECT_MANIFEST)
    }

    /// Project whose root `elm.json` holds `contents` verbatim.
    pub fn with_manifest(contents: &str) -> Result<Self> {
        let project = Self::empty()?;
        project.write_file("elm.json", contents)?;
        Ok(project)
    }

    /// Directory without any `elm.json`.
    pub fn empty() -> Result<Self> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        // Canonical form so comparisons survive symlinked temp dirs (macOS `/tmp`).
        let root = fs::canonicalize(temp.path()).context("canonicalize temp dir")?;
        Ok(Self { _temp: temp, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a placeholder stories module and return its absolute path.
    pub fn write_story(&self, relative: &str) -> Result<PathBuf> {
        self.write_file(relative, STORY_SOURCE)
    }

    pub fn write_file(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Output directory the tool generates into for this project.
    pub fn generated_dir(&self) -> PathBuf {
        crate::io::codegen::generated_dir(&self.root)
    }
}
