use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Generate { config: Option<PathBuf> },
    Help,
}

/// Parse the arguments after the program name.
///
/// Supported forms:
///   sprint-review
///   sprint-review path/to/config.json
///   sprint-review --help
pub fn parse_args(args: &[String]) -> Result<Command> {
    let mut config: Option<PathBuf> = None;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" | "help" => return Ok(Command::Help),
            flag if flag.starts_with('-') => bail!("Unknown option: {flag}\n\nRun `sprint-review --help` for usage."),
            path => {
                if config.is_some() {
                    bail!("Only one config file may be given");
                }
                config = Some(PathBuf::from(path));
            }
        }
    }

    Ok(Command::Generate { config })
}

pub fn print_help() {
    println!("sprint-review: write the current sprint's user stories into a review slide\n");
    println!("USAGE:");
    println!("  sprint-review [CONFIG]");
    println!();
    println!("CONFIG defaults to ./config.json, ./config.toml, then ~/.sprint-review/config.toml.");
    println!("Required keys: project, team, pat, template_path");
    println!("Optional keys: base_url, slide_index, output_dir, accept_invalid_certs");
    println!();
    println!("Set RUST_LOG=debug for request-level logging.");
}
