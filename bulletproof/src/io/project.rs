//! Project discovery and `elm.json` loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::core::location::ProjectLocation;
use crate::core::manifest::ProjectManifest;

/// Manifest file that marks an Elm project root.
pub const MANIFEST_FILE: &str = "elm.json";

/// Find the nearest ancestor of `file` that holds an `elm.json`.
///
/// The search starts at the file's own directory. Falls back to `cwd` when no
/// ancestor has a manifest.
#[instrument(skip_all, fields(file = %file.display()))]
pub fn find_project_root(file: &Path, cwd: &Path) -> PathBuf {
    let start = file.parent().unwrap_or(file);
    match start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
    {
        Some(root) => {
            debug!(root = %root.display(), "found project manifest");
            root.to_path_buf()
        }
        None => {
            warn!(
                cwd = %cwd.display(),
                "no elm.json above stories file, using current directory as project root"
            );
            cwd.to_path_buf()
        }
    }
}

/// Resolve the project location of an absolute stories `file`.
pub fn resolve_location(file: &Path, cwd: &Path) -> Result<ProjectLocation> {
    let root = find_project_root(file, cwd);
    let location = ProjectLocation::from_root(&root, file)?;
    debug!(
        root = %location.root.display(),
        stories_dir = %location.stories_dir.display(),
        module = %location.module,
        "resolved project location"
    );
    Ok(location)
}

/// Read and parse `{root}/elm.json`.
pub fn read_project_manifest(root: &Path) -> Result<ProjectManifest> {
    let path = root.join(MANIFEST_FILE);
    load_manifest(&path).context("Error reading elm.json")
}

fn load_manifest(path: &Path) -> Result<ProjectManifest> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    ProjectManifest::parse(&contents).with_context(|| format!("parse {}", path.display()))
}
