use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sniffs::Ruleset;

pub mod config;
pub mod discover;
pub mod report;

use config::{LintConfig, OutputFormat};
use report::{FileReport, Summary};

#[derive(Debug, Parser)]
#[command(name = "deka-lint")]
#[command(about = "Check PHP type declarations for lowercase keywords", long_about = None)]
pub struct Cli {
    /// Files or directories to check
    #[arg(name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Write fixes back to the files
    #[arg(long)]
    pub fix: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Config file (defaults to deka.json or lint.toml in the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Extensions to scan inside directories, comma separated
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,
}

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => LintConfig::from_path(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to get cwd")?;
            LintConfig::load(&cwd)
        }
    };

    let fix = cli.fix || config.fix.unwrap_or(false);
    let format = cli.format.or(config.format).unwrap_or_default();
    let extensions = cli
        .extensions
        .clone()
        .unwrap_or_else(|| config.extensions());
    let exclude = config.exclude_patterns()?;

    let files = discover::collect_files(&cli.paths, &extensions, &exclude)?;
    tracing::info!("checking {} files (fix: {fix})", files.len());

    let (reports, summary) = lint_files(&Ruleset::standard(), &files, fix);

    let output = match format {
        OutputFormat::Text => report::render_text(&reports, &summary),
        OutputFormat::Json => report::render_json(&reports, &summary)?,
    };
    println!("{output}");

    Ok(if summary.errors > 0 || summary.failed > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

/// Lint each file in turn. A file that cannot be read or written is logged
/// and counted as failed; the rest of the run continues.
pub fn lint_files(ruleset: &Ruleset, files: &[PathBuf], fix: bool) -> (Vec<FileReport>, Summary) {
    let mut reports = Vec::with_capacity(files.len());
    let mut summary = Summary::default();
    for path in files {
        match lint_file(ruleset, path, fix) {
            Ok(report) => {
                summary.record(&report);
                reports.push(report);
            }
            Err(err) => {
                tracing::warn!("skipping {}: {err:#}", path.display());
                summary.failed += 1;
            }
        }
    }
    (reports, summary)
}

pub fn lint_file(ruleset: &Ruleset, path: &Path, fix: bool) -> anyhow::Result<FileReport> {
    let source = sniffs::file::read_source(path)?;
    if !fix {
        return Ok(FileReport {
            path: path.to_path_buf(),
            diagnostics: ruleset.check(path, &source),
            fixed: 0,
            source,
        });
    }

    let outcome = ruleset.fix(path, &source);
    if outcome.contents != source {
        fs::write(path, &outcome.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("fixed {} violations in {}", outcome.fixes_applied, path.display());
    }
    Ok(FileReport {
        path: path.to_path_buf(),
        diagnostics: outcome.remaining,
        fixed: outcome.fixes_applied,
        source: outcome.contents,
    })
}
