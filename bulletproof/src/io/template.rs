//! Entry-point rendering for the generated runner program.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

const RUNNER_TEMPLATE: &str = include_str!("templates/Runner.elm");

/// Module name of the generated entry point.
pub const ENTRY_POINT_MODULE: &str = "Bulletproof.Internal.Runner";

/// Render the runner entry point that imports `stories` from `module`.
pub fn render_entry_point(module: &str) -> Result<String> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_template("runner", RUNNER_TEMPLATE)
        .context("load runner template")?;
    let template = env.get_template("runner")?;
    template
        .render(context! {
            entry_module => ENTRY_POINT_MODULE,
            module => module,
        })
        .context("render runner template")
}
