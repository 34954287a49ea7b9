use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use cocoon_cli::{run, RunOptions};
use cocoon_core::init_tracing;

fn main() -> Result<()> {
    // Initialize logging
    init_tracing();

    let matches = Command::new("cocoon")
        .version(cocoon_core::VERSION)
        .about("Rewrite Java snippets into semantically equivalent variants")
        .arg(
            Arg::new("config")
                .value_name("CONFIG")
                .help("YAML configuration file")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("JSON object of snippet id to code; overrides inputFilePath")
                .value_parser(value_parser!(PathBuf))
                .index(2),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT")
                .help("Where to write the transformed snippets; overrides outputFilePath")
                .value_parser(value_parser!(PathBuf))
                .index(3),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Transform without writing output, then print the summary")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let options = RunOptions {
        config: matches
            .get_one::<PathBuf>("config")
            .cloned()
            .context("missing config path")?,
        input: matches.get_one::<PathBuf>("input").cloned(),
        output: matches.get_one::<PathBuf>("output").cloned(),
        dry_run: matches.get_flag("dry-run"),
    };

    let summary = run(&options)?;
    print!("{summary}");
    if !summary.success() {
        for failure in &summary.failures {
            eprintln!("failed: {failure}");
        }
    }
    Ok(())
}
