//! Generated project layout under `elm-stuff/elm-bulletproof/<version>/`.
//!
//! Files are only rewritten when their content changes. `elm make` keys its
//! incremental rebuilds off modification times, so an identical rewrite would
//! cost a full recompile.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use super::template::{ENTRY_POINT_MODULE, render_entry_point};
use crate::core::location::ProjectLocation;
use crate::core::manifest::{MergedManifest, RUNNER_SOURCE_DIR};
use crate::version::BULLETPROOF_VERSION;

/// Compiled bundle name inside the generated directory.
pub const BUNDLE_FILE: &str = "elmBulletproofOutput.js";

/// Result of an idempotent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

/// Paths of one generated runner project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProject {
    pub dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Entry point relative to `dir`, as passed to the compiler.
    pub entry_point: PathBuf,
    pub bundle_path: PathBuf,
}

impl GeneratedProject {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            manifest_path: dir.join("elm.json"),
            entry_point: entry_point_relative(),
            bundle_path: dir.join(BUNDLE_FILE),
            dir,
        }
    }

    pub fn entry_point_path(&self) -> PathBuf {
        self.dir.join(&self.entry_point)
    }
}

/// Version-namespaced output directory for the project at `root`.
pub fn generated_dir(root: &Path) -> PathBuf {
    root.join("elm-stuff")
        .join("elm-bulletproof")
        .join(BULLETPROOF_VERSION)
}

/// `src/` path of `ENTRY_POINT_MODULE`, one directory per module segment.
fn entry_point_relative() -> PathBuf {
    let mut path: PathBuf = std::iter::once(RUNNER_SOURCE_DIR)
        .chain(ENTRY_POINT_MODULE.split('.'))
        .collect();
    path.set_extension("elm");
    path
}

/// Write the merged manifest and entry point for `location`.
#[instrument(skip_all, fields(root = %location.root.display(), module = %location.module))]
pub fn generate(location: &ProjectLocation, manifest: &MergedManifest) -> Result<GeneratedProject> {
    let project = GeneratedProject::new(generated_dir(&location.root));
    write_manifest(&project.manifest_path, manifest)?;
    write_entry_point(&project.entry_point_path(), &location.module)?;
    debug!(dir = %project.dir.display(), "generated runner project");
    Ok(project)
}

pub fn write_manifest(path: &Path, manifest: &MergedManifest) -> Result<WriteStatus> {
    let json = manifest.to_json()?;
    write_if_changed(path, &json)
}

pub fn write_entry_point(path: &Path, module: &str) -> Result<WriteStatus> {
    let code = render_entry_point(module)?;
    write_if_changed(path, &code)
}

/// Write `contents` to `path` unless the file already holds exactly those bytes.
///
/// Missing parent directories are created.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<WriteStatus> {
    match fs::read(path) {
        Ok(existing) if existing == contents.as_bytes() => {
            debug!(path = %path.display(), "unchanged, skipping write");
            return Ok(WriteStatus::Unchanged);
        }
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "written");
    Ok(WriteStatus::Written)
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::core::manifest::{ProjectManifest, RunnerManifest, merge};
    use crate::test_support::{PROJECT_MANIFEST, TestProject};

    fn location(project: &TestProject) -> ProjectLocation {
        ProjectLocation {
            root: project.root().to_path_buf(),
            stories_dir: PathBuf::from("tests"),
            module: "Ui.ButtonStory".to_string(),
        }
    }

    fn merged(location: &ProjectLocation) -> MergedManifest {
        let runner = RunnerManifest::bundled().expect("runner");
        let project = ProjectManifest::parse(PROJECT_MANIFEST).expect("project");
        merge(location, &runner, &project)
    }

    fn mtime(path: &Path) -> std::time::SystemTime {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .expect("mtime")
    }

    #[test]
    fn write_creates_missing_directories() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("a").join("b").join("file.txt");

        let status = write_if_changed(&path, "hello").expect("write");
        assert_eq!(status, WriteStatus::Written);
        assert_eq!(fs::read_to_string(&path).expect("read"), "hello");
    }

    #[test]
    fn identical_content_is_not_rewritten() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("file.txt");
        write_if_changed(&path, "same").expect("first write");
        let before = mtime(&path);

        thread::sleep(Duration::from_millis(20));
        let status = write_if_changed(&path, "same").expect("second write");
        assert_eq!(status, WriteStatus::Unchanged);
        assert_eq!(mtime(&path), before);
    }

    #[test]
    fn changed_content_is_rewritten() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("file.txt");
        write_if_changed(&path, "old").expect("first write");

        let status = write_if_changed(&path, "new").expect("second write");
        assert_eq!(status, WriteStatus::Written);
        assert_eq!(fs::read_to_string(&path).expect("read"), "new");
    }

    #[test]
    fn generate_writes_layout_under_version_dir() {
        let project = TestProject::new().expect("project");
        let location = location(&project);

        let generated = generate(&location, &merged(&location)).expect("generate");
        assert_eq!(
            generated.dir,
            project
                .root()
                .join("elm-stuff/elm-bulletproof")
                .join(BULLETPROOF_VERSION)
        );
        assert!(generated.manifest_path.is_file());
        assert_eq!(
            generated.entry_point_path(),
            generated.dir.join("src/Bulletproof/Internal/Runner.elm")
        );
        let code = fs::read_to_string(generated.entry_point_path()).expect("entry point");
        assert!(code.contains("import Ui.ButtonStory exposing (stories)"));
        assert_eq!(generated.bundle_path, generated.dir.join(BUNDLE_FILE));
        assert!(!generated.bundle_path.exists());
    }

    #[test]
    fn regenerate_keeps_mtimes() {
        let project = TestProject::new().expect("project");
        let location = location(&project);
        let manifest = merged(&location);

        let generated = generate(&location, &manifest).expect("first generate");
        let manifest_before = mtime(&generated.manifest_path);
        let entry_before = mtime(&generated.entry_point_path());

        thread::sleep(Duration::from_millis(20));
        generate(&location, &manifest).expect("second generate");
        assert_eq!(mtime(&generated.manifest_path), manifest_before);
        assert_eq!(mtime(&generated.entry_point_path()), entry_before);
        assert_eq!(
            write_manifest(&generated.manifest_path, &manifest).expect("write"),
            WriteStatus::Unchanged
        );
        assert_eq!(
            write_entry_point(&generated.entry_point_path(), &location.module).expect("write"),
            WriteStatus::Unchanged
        );
    }
}
