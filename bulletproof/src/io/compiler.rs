//! Compiler abstraction for turning the generated project into a bundle.
//!
//! The [`Compiler`] trait decouples build orchestration from the actual `elm`
//! binary. Tests use fakes that return predetermined outcomes without spawning
//! processes.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};
use wait_timeout::ChildExt;

/// Parameters for one compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Working directory of the compiler (the generated project).
    pub workdir: PathBuf,
    /// Entry point, relative to `workdir`.
    pub entry: PathBuf,
    /// Absolute path of the bundle to produce.
    pub output: PathBuf,
}

/// How a compiler invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileOutcome {
    Success,
    /// Non-zero exit; `None` when the process was killed by a signal.
    Failure { exit_code: Option<i32> },
    TimedOut,
}

impl CompileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Abstraction over compiler backends.
pub trait Compiler {
    /// Compile `request.entry`. Spawn failures are errors; a failed build is an outcome.
    fn compile(&self, request: &CompileRequest) -> Result<CompileOutcome>;
}

/// Compiler that spawns `elm make`.
///
/// stdin and stderr are inherited so `elm` can print its own diagnostics;
/// stdout is discarded.
#[derive(Debug, Clone)]
pub struct ElmCompiler {
    pub program: PathBuf,
    /// Kill the compiler after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ElmCompiler {
    pub fn new(program: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl Compiler for ElmCompiler {
    #[instrument(skip_all, fields(program = %self.program.display(), workdir = %request.workdir.display()))]
    fn compile(&self, request: &CompileRequest) -> Result<CompileOutcome> {
        let mut output_arg = OsString::from("--output=");
        output_arg.push(&request.output);

        info!(entry = %request.entry.display(), "starting elm make");
        let mut child = Command::new(&self.program)
            .arg("make")
            .arg(&request.entry)
            .arg(output_arg)
            .current_dir(&request.workdir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("spawn {}", self.program.display()))?;

        let status = match self.timeout {
            None => child.wait().context("wait for compiler")?,
            Some(timeout) => match child.wait_timeout(timeout).context("wait for compiler")? {
                Some(status) => status,
                None => {
                    warn!(
                        timeout_secs = timeout.as_secs(),
                        "compiler timed out, killing"
                    );
                    child.kill().context("kill compiler")?;
                    child.wait().context("wait compiler after kill")?;
                    return Ok(CompileOutcome::TimedOut);
                }
            },
        };

        debug!(exit_code = ?status.code(), "compiler finished");
        if status.success() {
            Ok(CompileOutcome::Success)
        } else {
            Ok(CompileOutcome::Failure {
                exit_code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(workdir: &std::path::Path) -> CompileRequest {
        CompileRequest {
            workdir: workdir.to_path_buf(),
            entry: PathBuf::from("src/Bulletproof/Internal/Runner.elm"),
            output: workdir.join("elmBulletproofOutput.js"),
        }
    }

    #[test]
    fn missing_program_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let compiler = ElmCompiler::new("elm-bulletproof-no-such-compiler", None);

        let err = compiler.compile(&request(temp.path())).unwrap_err();
        assert!(err.to_string().contains("spawn elm-bulletproof-no-such-compiler"));
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let temp = tempfile::tempdir().expect("tempdir");
        let compiler = ElmCompiler::new("true", None);

        let outcome = compiler.compile(&request(temp.path())).expect("compile");
        assert_eq!(outcome, CompileOutcome::Success);
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let compiler = ElmCompiler::new("false", Some(Duration::from_secs(30)));

        let outcome = compiler.compile(&request(temp.path())).expect("compile");
        assert_eq!(outcome, CompileOutcome::Failure { exit_code: Some(1) });
        assert!(!outcome.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn hung_compiler_is_killed_after_timeout() {
        let temp = tempfile::tempdir().expect("tempdir");
        // `sh make ...` runs this script from the workdir.
        std::fs::write(temp.path().join("make"), "exec sleep 5\n").expect("write script");
        let compiler = ElmCompiler::new("sh", Some(Duration::from_millis(200)));

        let started = std::time::Instant::now();
        let outcome = compiler.compile(&request(temp.path())).expect("compile");
        assert_eq!(outcome, CompileOutcome::TimedOut);
        assert!(!outcome.is_success());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_workdir_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let compiler = ElmCompiler::new("elm", None);

        let result = compiler.compile(&request(&temp.path().join("missing")));
        assert!(result.is_err());
    }
}
