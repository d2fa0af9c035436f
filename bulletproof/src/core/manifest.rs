//! Typed `elm.json` manifests and the runner/project merge.
//!
//! The bundled runner manifest is the structural base. The project manifest
//! only contributes its dependencies and source directories:
//!
//! - `direct`: runner entries overlaid with project entries (project wins).
//! - `indirect`: union of both, minus every key already in `direct`.
//! - `source-directories`: project directories (absolute), then `src`, then the
//!   stories directory, in that order.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::core::location::ProjectLocation;

const BUNDLED_RUNNER_MANIFEST: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/runner/elm.json"));

/// Source directory of the runner itself, relative to the generated project.
pub const RUNNER_SOURCE_DIR: &str = "src";

/// Package name to version constraint, ordered by name.
pub type DependencyMap = BTreeMap<String, String>;

/// A `direct`/`indirect` dependency pair as written in `elm.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    #[serde(default)]
    pub direct: DependencyMap,
    #[serde(default)]
    pub indirect: DependencyMap,
}

/// Merged dependencies where no `indirect` entry shadows a `direct` one.
///
/// Only [`ResolvedDependencies::merge`] can build this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependencies {
    direct: DependencyMap,
    indirect: DependencyMap,
}

impl ResolvedDependencies {
    /// Overlay `overlay` on `base` and drop indirect entries promoted to direct.
    pub fn merge(base: &Dependencies, overlay: &Dependencies) -> Self {
        let mut direct = base.direct.clone();
        direct.extend(overlay.direct.clone());

        let mut indirect = base.indirect.clone();
        indirect.extend(overlay.indirect.clone());
        indirect.retain(|name, _| !direct.contains_key(name));

        Self { direct, indirect }
    }

    pub fn direct(&self) -> &DependencyMap {
        &self.direct
    }

    pub fn indirect(&self) -> &DependencyMap {
        &self.indirect
    }
}

/// The runner application's own `elm.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunnerManifest {
    #[serde(rename = "type")]
    pub kind: String,
    pub source_directories: Vec<String>,
    pub elm_version: String,
    pub dependencies: Dependencies,
    #[serde(default)]
    pub test_dependencies: Dependencies,
    /// Any other top-level fields, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RunnerManifest {
    /// Parse the manifest embedded in the binary.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_RUNNER_MANIFEST).context("parse bundled runner elm.json")
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}

/// The fields of the user's `elm.json` that take part in the merge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectManifest {
    pub source_directories: Vec<String>,
    pub dependencies: Dependencies,
}

impl ProjectManifest {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}

/// The generated `elm.json` handed to the compiler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MergedManifest {
    #[serde(rename = "type")]
    pub kind: String,
    pub source_directories: Vec<String>,
    pub elm_version: String,
    pub dependencies: ResolvedDependencies,
    pub test_dependencies: Dependencies,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MergedManifest {
    /// Serialize with 4-space indentation and a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)
            .context("serialize merged elm.json")?;
        let mut json = String::from_utf8(buf).context("merged elm.json is not UTF-8")?;
        json.push('\n');
        Ok(json)
    }
}

/// Combine the runner manifest with the project manifest found at `location`.
pub fn merge(
    location: &ProjectLocation,
    runner: &RunnerManifest,
    project: &ProjectManifest,
) -> MergedManifest {
    let mut source_directories: Vec<String> = project
        .source_directories
        .iter()
        .map(|dir| {
            normalize_lexically(&location.root.join(dir))
                .display()
                .to_string()
        })
        .collect();
    source_directories.push(RUNNER_SOURCE_DIR.to_string());
    source_directories.push(
        normalize_lexically(&location.stories_path())
            .display()
            .to_string(),
    );

    MergedManifest {
        kind: runner.kind.clone(),
        source_directories,
        elm_version: runner.elm_version.clone(),
        dependencies: ResolvedDependencies::merge(&runner.dependencies, &project.dependencies),
        test_dependencies: runner.test_dependencies.clone(),
        extra: runner.extra.clone(),
    }
}

/// Collapse `.` and `..` without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
