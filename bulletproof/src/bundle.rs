//! Orchestration for turning a stories file into a runner bundle.
//!
//! `bundle_stories` reads the project manifest, merges it with the bundled
//! runner manifest, writes the generated project and then hands it to
//! `run_build`. The generated directory is passed to the compiler explicitly;
//! the process working directory is never changed.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::core::location::ProjectLocation;
use crate::core::manifest::{RunnerManifest, merge};
use crate::io::codegen::{GeneratedProject, generate};
use crate::io::compiler::{CompileOutcome, CompileRequest, Compiler};
use crate::io::project::read_project_manifest;

/// Whether a run stops after generation or also compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildVariant {
    GenerateOnly,
    GenerateAndCompile,
}

/// Outcome of a bulletproof run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Project generated; the compiler was not invoked.
    Generated,
    /// Bundle compiled successfully.
    Compiled { bundle: PathBuf },
    /// The compiler ran but did not succeed.
    Failed(CompileOutcome),
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Build an already generated project according to `variant`.
#[instrument(skip_all, fields(dir = %generated.dir.display(), variant = ?variant))]
pub fn run_build<C: Compiler>(
    generated: &GeneratedProject,
    variant: BuildVariant,
    compiler: &C,
) -> Result<BuildOutcome> {
    if variant == BuildVariant::GenerateOnly {
        debug!("generate-only, skipping compiler");
        return Ok(BuildOutcome::Generated);
    }

    let request = CompileRequest {
        workdir: generated.dir.clone(),
        entry: generated.entry_point.clone(),
        output: generated.bundle_path.clone(),
    };
    let outcome = compiler.compile(&request)?;
    info!(?outcome, "compile finished");
    if outcome.is_success() {
        Ok(BuildOutcome::Compiled {
            bundle: generated.bundle_path.clone(),
        })
    } else {
        Ok(BuildOutcome::Failed(outcome))
    }
}

/// Generate the runner project for `location` and build it.
pub fn bundle_stories<C: Compiler>(
    location: &ProjectLocation,
    variant: BuildVariant,
    compiler: &C,
) -> Result<BuildOutcome> {
    let project = read_project_manifest(&location.root)?;
    let runner = RunnerManifest::bundled()?;
    let merged = merge(location, &runner, &project);
    let generated = generate(location, &merged)?;
    run_build(&generated, variant, compiler)
}
