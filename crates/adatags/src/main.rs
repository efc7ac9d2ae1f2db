//! The `adatags` CLI.
//!
//! Extracts a tag index from a single Ada compilation unit and prints
//! it either in a ctags-style tab-separated text format (the default)
//! or as JSON (`--json`).
//!
//! Options:
//! - `--file-scope` / `--no-file-scope` - include tags local to the file
//! - `--qualified-tags` - also emit dotted `parent.name` tags
//! - `--kinds <spec>` - ctags-style signed-letter kind toggles, e.g. `+P-v`
//! - `--json` - emit a JSON array of tags instead of text

use std::path::PathBuf;
use std::process::ExitCode;

use ada_common::{TagOptions, VecSink, WriteSink};
use adatags::driver::find_tags_in_file;
use clap::Parser;

#[derive(Parser)]
#[command(name = "adatags", version, about = "Extract a tag index from an Ada compilation unit")]
struct Cli {
    /// Ada source file to scan (.adb, .ads, or .Ada)
    file: PathBuf,

    /// Include tags that are local to the file (on by default)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    file_scope: bool,

    /// Also emit a dotted parent.name tag for qualifiable kinds
    #[arg(long)]
    qualified_tags: bool,

    /// ctags-style kind toggles: a run of signed letters, e.g. `+P-v`
    /// enables packspec and disables variable
    #[arg(long)]
    kinds: Option<String>,

    /// Emit tags as a JSON array instead of tab-separated text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut options = TagOptions::new();
    options.file_scope = cli.file_scope;
    options.qualified_tags = cli.qualified_tags;
    if let Some(spec) = &cli.kinds {
        if let Err(letter) = apply_kind_spec(&mut options, spec) {
            eprintln!("adatags: unrecognized kind letter '{letter}' in --kinds");
            return ExitCode::FAILURE;
        }
    }

    if cli.json {
        run_json(&cli.file, &options)
    } else {
        run_text(&cli.file, &options)
    }
}

fn run_text(file: &PathBuf, options: &TagOptions) -> ExitCode {
    let stdout = std::io::stdout();
    let mut sink = WriteSink::new(stdout.lock());
    match find_tags_in_file(file, options, &mut sink) {
        Ok(_outcome) => match sink.error() {
            Some(err) => {
                eprintln!("adatags: {err}");
                ExitCode::FAILURE
            }
            None => ExitCode::SUCCESS,
        },
        Err(err) => {
            eprintln!("adatags: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_json(file: &PathBuf, options: &TagOptions) -> ExitCode {
    let mut sink = VecSink::new();
    match find_tags_in_file(file, options, &mut sink) {
        Ok(_outcome) => match serde_json::to_writer_pretty(std::io::stdout(), &sink.tags) {
            Ok(()) => {
                println!();
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("adatags: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("adatags: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Applies a ctags-style `--kinds` spec: a run of `[+-]<letter>` pairs,
/// a sign applying to every letter until the next sign. Returns the
/// offending letter on the first one that isn't in the kind table.
fn apply_kind_spec(options: &mut TagOptions, spec: &str) -> Result<(), char> {
    let mut enabled = true;
    for c in spec.chars() {
        match c {
            '+' => enabled = true,
            '-' => enabled = false,
            letter => {
                if !options.set_by_letter(letter, enabled) {
                    return Err(letter);
                }
            }
        }
    }
    Ok(())
}
