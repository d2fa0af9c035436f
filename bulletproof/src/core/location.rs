//! Project location derived from a stories file path.

use std::path::{Component, Path, PathBuf};

use anyhow::{Result, anyhow, bail};

use crate::core::manifest::normalize_lexically;

/// Where the stories file lives relative to its Elm project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    /// Absolute project root (the directory holding `elm.json`).
    pub root: PathBuf,
    /// First directory under `root` that contains the stories file.
    pub stories_dir: PathBuf,
    /// Dotted Elm module name of the stories file, relative to `stories_dir`.
    pub module: String,
}

impl ProjectLocation {
    /// Split `file` against an already known project `root`.
    ///
    /// `file` must be absolute and live at least one directory below `root`:
    /// `/repo/tests/Ui/ButtonStory.elm` under `/repo` yields `tests` and
    /// `Ui.ButtonStory`.
    pub fn from_root(root: &Path, file: &Path) -> Result<Self> {
        let relative = file.strip_prefix(root).map_err(|_| {
            anyhow!(
                "{} is not inside the project root {}",
                file.display(),
                root.display()
            )
        })?;
        let segments = path_segments(relative)?;
        let Some((stories_dir, module_segments)) = segments.split_first() else {
            bail!("{} is the project root, not a file", file.display());
        };
        if module_segments.is_empty() {
            bail!(
                "{} must live in a directory below the project root {}",
                file.display(),
                root.display()
            );
        }

        let joined = module_segments.join(".");
        let module = joined.strip_suffix(".elm").unwrap_or(&joined).to_string();

        Ok(Self {
            root: root.to_path_buf(),
            stories_dir: PathBuf::from(stories_dir),
            module,
        })
    }

    /// Absolute path of the stories directory.
    pub fn stories_path(&self) -> PathBuf {
        self.root.join(&self.stories_dir)
    }
}

/// Make `file` absolute against `cwd` without resolving symlinks.
///
/// A symlinked stories directory keeps its in-project path, so the
/// `elm.json` walk still finds the project that links it.
pub fn absolute_path(file: &Path, cwd: &Path) -> PathBuf {
    normalize_lexically(&cwd.join(file))
}

fn path_segments(path: &Path) -> Result<Vec<&str>> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment),
            _ => None,
        })
        .map(|segment| {
            segment
                .to_str()
                .ok_or_else(|| anyhow!("path segment {:?} is not valid UTF-8", segment))
        })
        .collect()
}
