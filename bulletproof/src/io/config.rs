//! Optional project configuration stored in `elm-bulletproof.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::debug;

use crate::bundle::BuildVariant;

/// Configuration file name, looked up in the project root.
pub const CONFIG_FILE: &str = "elm-bulletproof.toml";

/// Bulletproof configuration (TOML).
///
/// Every field is optional; a missing file yields `BulletproofConfig::default()`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BulletproofConfig {
    /// Write the runner project without invoking the compiler.
    pub generate_only: bool,

    pub compiler: CompilerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Compiler executable. Bare names are looked up on `PATH`.
    pub path: PathBuf,

    /// Kill the compiler after this many seconds. Unset waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("elm"),
            timeout_secs: None,
        }
    }
}

impl BulletproofConfig {
    pub fn validate(&self) -> Result<()> {
        if self.compiler.path.as_os_str().is_empty() {
            return Err(anyhow!("compiler.path must not be empty"));
        }
        if self.compiler.timeout_secs == Some(0) {
            return Err(anyhow!("compiler.timeout_secs must be > 0"));
        }
        Ok(())
    }

    pub fn variant(&self) -> BuildVariant {
        if self.generate_only {
            BuildVariant::GenerateOnly
        } else {
            BuildVariant::GenerateAndCompile
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.compiler.timeout_secs.map(Duration::from_secs)
    }

    /// Anchor a relative compiler path with directory parts (`node_modules/.bin/elm`)
    /// at `base`. Bare names stay as-is for `PATH` lookup.
    pub fn anchor_compiler_path(&mut self, base: &Path) {
        self.compiler.path = anchor_program(&self.compiler.path, base);
    }
}

/// Resolve `program` against `base` when it is relative and has more than one component.
pub fn anchor_program(program: &Path, base: &Path) -> PathBuf {
    if program.is_relative() && program.components().count() > 1 {
        base.join(program)
    } else {
        program.to_path_buf()
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `BulletproofConfig::default()`.
pub fn load_config(path: &Path) -> Result<BulletproofConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        let cfg = BulletproofConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: BulletproofConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid {}", path.display()))?;
    debug!(path = %path.display(), ?cfg, "config loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join(CONFIG_FILE)).expect("load");
        assert_eq!(cfg, BulletproofConfig::default());
        assert_eq!(cfg.variant(), BuildVariant::GenerateAndCompile);
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn load_reads_all_fields() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "generate_only = true\n\n[compiler]\npath = \"node_modules/.bin/elm\"\ntimeout_secs = 90\n",
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.variant(), BuildVariant::GenerateOnly);
        assert_eq!(cfg.compiler.path, PathBuf::from("node_modules/.bin/elm"));
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "[compiler]\ntimeout_secs = 5\n").expect("write");

        let cfg = load_config(&path).expect("load");
        assert!(!cfg.generate_only);
        assert_eq!(cfg.compiler.path, PathBuf::from("elm"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "[compiler]\ntimeout_secs = 0\n").expect("write");

        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("timeout_secs must be > 0"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "compile = false\n").expect("write");

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn anchors_only_multi_component_relative_paths() {
        let base = Path::new("/repo");
        assert_eq!(anchor_program(Path::new("elm"), base), PathBuf::from("elm"));
        assert_eq!(
            anchor_program(Path::new("node_modules/.bin/elm"), base),
            PathBuf::from("/repo/node_modules/.bin/elm")
        );
        assert_eq!(
            anchor_program(Path::new("/usr/bin/elm"), base),
            PathBuf::from("/usr/bin/elm")
        );
    }
}
