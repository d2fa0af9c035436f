//! `elm-bulletproof` command line entry point.
//!
//! Takes a single Elm stories file, generates the runner project next to the
//! enclosing `elm.json` and compiles it unless `--generate-only` is set.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use tracing::debug;

use elm_bulletproof::bundle::bundle_stories;
use elm_bulletproof::core::location::absolute_path;
use elm_bulletproof::exit_codes;
use elm_bulletproof::io::compiler::ElmCompiler;
use elm_bulletproof::io::config::{CONFIG_FILE, anchor_program, load_config};
use elm_bulletproof::io::project::resolve_location;
use elm_bulletproof::logging;

#[derive(Parser, Debug)]
#[command(
    name = "elm-bulletproof",
    version,
    about = "Generate and compile a bulletproof runner for an Elm stories file"
)]
struct Cli {
    /// Elm module exposing `stories`. Exactly one is expected.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Write the runner project without running `elm make`.
    #[arg(long)]
    generate_only: bool,

    /// Elm compiler executable (overrides `compiler.path` in elm-bulletproof.toml).
    #[arg(long, value_name = "PATH")]
    elm: Option<PathBuf>,
}

fn main() {
    logging::init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                debug!(error = %err, "argument parsing failed");
                println!("Bulletproof expects single file.");
                std::process::exit(exit_codes::FAILURE);
            }
        },
    };
    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::FAILURE
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32> {
    let [file] = cli.files.as_slice() else {
        println!("Bulletproof expects single file.");
        return Ok(exit_codes::FAILURE);
    };
    if !is_regular_file(file) {
        println!("Bulletproof expects a file.");
        return Ok(exit_codes::FAILURE);
    }

    let cwd = std::env::current_dir().context("read current directory")?;
    let file = absolute_path(file, &cwd);

    let location = match resolve_location(&file, &cwd) {
        Ok(location) => location,
        Err(err) => {
            println!("Bulletproof expects a file: {:#}", err);
            return Ok(exit_codes::FAILURE);
        }
    };

    let mut config = load_config(&location.root.join(CONFIG_FILE))?;
    config.anchor_compiler_path(&location.root);
    if cli.generate_only {
        config.generate_only = true;
    }
    if let Some(elm) = &cli.elm {
        config.compiler.path = anchor_program(elm, &cwd);
    }
    debug!(?config, "effective config");

    let compiler = ElmCompiler::new(config.compiler.path.clone(), config.timeout());
    let outcome = bundle_stories(&location, config.variant(), &compiler)?;
    if !outcome.is_success() {
        return Ok(exit_codes::FAILURE);
    }
    println!("Bulletproof is running!");
    Ok(exit_codes::OK)
}

/// True for an existing regular file. Symlinks are not followed.
fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
