//! # Cocoon CLI
//!
//! Batch driver behind the `cocoon` binary: load a configuration, build the
//! synonym oracle and pass pipeline it describes, then rewrite every snippet
//! of a JSON collection.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cocoon_core::{CocoonConfig, TransformationSummary};
use tracing::{info, warn};

pub mod io;

pub use io::{load_snippets, write_snippets};

/// One batch run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: PathBuf,
    /// Overrides `inputFilePath` from the configuration
    pub input: Option<PathBuf>,
    /// Overrides `outputFilePath` from the configuration
    pub output: Option<PathBuf>,
    /// Transform without writing anything
    pub dry_run: bool,
}

/// Transform every snippet of the input collection.
///
/// The output file is rewritten after each snippet so an interrupted run
/// keeps the snippets it finished. A snippet that fails to transform is
/// written back unchanged and counted as a failure.
pub fn run(options: &RunOptions) -> Result<TransformationSummary> {
    let config = CocoonConfig::load(&options.config)
        .with_context(|| format!("loading config {}", options.config.display()))?;

    let Some(input) = options.input.clone().or_else(|| config.input_file_path.clone()) else {
        bail!("no input file: pass one on the command line or set inputFilePath");
    };
    let output = if options.dry_run {
        None
    } else {
        let Some(output) = options.output.clone().or_else(|| config.output_file_path.clone())
        else {
            bail!("no output file: pass one on the command line or set outputFilePath");
        };
        Some(output)
    };

    let oracle = config.build_oracle()?;
    let pipeline = config.build_pipeline(oracle)?;
    info!(passes = ?pipeline.names(), "pipeline ready");

    let mut snippets = load_snippets(&input)?;
    let mut summary = TransformationSummary::new();

    for index in 0..snippets.len() {
        let snippet = &mut snippets[index];
        match pipeline.transform(snippet) {
            Ok(()) => {
                info!(
                    id = %snippet.id,
                    applied = snippet.total_transformations(),
                    "transformed snippet"
                );
                summary.record(snippet);
            }
            Err(error) => {
                warn!(id = %snippet.id, %error, "snippet left unchanged");
                summary.record_failure(&snippet.id, &error);
            }
        }
        if let Some(output) = &output {
            write_snippets(output, &snippets)?;
        }
    }

    if let Some(output) = &output {
        info!(path = %output.display(), snippets = snippets.len(), "wrote snippets");
    }
    Ok(summary)
}
