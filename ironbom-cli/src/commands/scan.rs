//! `ironbom scan` command handler

use std::collections::BTreeSet;
use std::io::Write;

use serde::Serialize;
use tracing::info;

use ironbom_core::config::IronbomConfig;
use ironbom_sbom_loader::{
    FileSystem, LoadFailure, LoadOutcome, SbomLoader, SbomLoaderConfig, SbomLoaderError,
    ScannedFile,
};

use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
///
/// CLI flags override the `[loader]` section of the loaded configuration.
pub async fn execute(
    args: ScanArgs,
    mut config: IronbomConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    if let Some(path) = args.ignore_file {
        config.loader.ignore_file = path;
    }
    if let Some(path) = args.suppression_file {
        config.loader.suppression_file = path;
    }
    if let Some(size) = args.max_file_size {
        config.loader.max_file_size = size;
    }

    let loader_config = SbomLoaderConfig::from_core(&config.loader);
    loader_config.validate()?;

    info!(inputs = args.inputs.len(), "starting sbom load");

    let inputs = args.inputs;
    let (report, surfaced) = tokio::task::spawn_blocking(move || {
        let loader = SbomLoader::new(loader_config);
        collect(&loader, &inputs)
    })
    .await
    .map_err(|e| CliError::Command(format!("load task failed: {}", e)))??;

    // A failed final target still reports what earlier inputs produced.
    writer.render(&report)?;

    match surfaced {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Runs the path resolver and both ID loaders, merging the results into one report.
///
/// The second element is the failure of the final single-file input, if any.
fn collect<F: FileSystem>(
    loader: &SbomLoader<F>,
    inputs: &[String],
) -> Result<(ScanReport, Option<SbomLoaderError>), SbomLoaderError> {
    let LoadOutcome { output, surfaced } = loader.load_partial(inputs);

    let mut ignored: BTreeSet<String> = loader.load_ignore_list()?.into_iter().collect();
    ignored.extend(loader.load_suppressions()?);

    let report = ScanReport {
        files: output.files,
        purls: output.purls,
        licenses: output.licenses,
        ignored,
        failures: output.failures,
    };
    Ok((report, surfaced))
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub files: Vec<ScannedFile>,
    pub purls: BTreeSet<String>,
    pub licenses: BTreeSet<String>,
    pub ignored: BTreeSet<String>,
    pub failures: Vec<LoadFailure>,
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "{} ({})", "Scanned files".bold(), self.files.len())?;
        for file in &self.files {
            writeln!(w, "  {}  {}", file.sha256.dimmed(), file.name)?;
        }

        if !self.failures.is_empty() {
            writeln!(w)?;
            writeln!(w, "{} ({})", "Skipped".yellow().bold(), self.failures.len())?;
            for failure in &self.failures {
                writeln!(w, "  {}: {}", failure.path, failure.reason.yellow())?;
            }
        }

        writeln!(w)?;
        writeln!(w, "{} ({})", "Packages".bold(), self.purls.len())?;
        if self.purls.is_empty() {
            writeln!(w, "  {}", "No packages found.".yellow())?;
        }
        for purl in &self.purls {
            writeln!(w, "  {}", purl)?;
        }

        writeln!(w)?;
        writeln!(w, "{} ({})", "Licenses".bold(), self.licenses.len())?;
        for license in &self.licenses {
            writeln!(w, "  {}", license)?;
        }

        if !self.ignored.is_empty() {
            writeln!(w)?;
            writeln!(w, "{} ({})", "Ignored vulnerabilities".bold(), self.ignored.len())?;
            for id in &self.ignored {
                writeln!(w, "  {}", id)?;
            }
        }

        Ok(())
    }
}
