//! Check command handler
//!
//! Loads each program, runs the analysis pipeline on the rayon pool and
//! renders the findings.

use crate::analysis::{analyze_programs, AnalysisReport};
use crate::cli::output::{render_json, render_text, FileReport};
use crate::config::{AnalysisConfig, OutputFormat, UsedefConfig};
use anyhow::{Context, Result};
use std::path::PathBuf;

use super::load_program;

/// Settings for one `check` run, after merging the config file with flags.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    pub files: Vec<PathBuf>,
    pub format: OutputFormat,
    pub color: bool,
    pub jobs: usize,
    pub analysis: AnalysisConfig,
}

/// Whether a run found anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Clean,
    Findings,
}

/// Pure function merging the config file with command-line overrides.
///
/// Flags win over the file; `--no-color` can only turn color off.
pub fn build_check_config(
    file_config: &UsedefConfig,
    files: Vec<PathBuf>,
    format: Option<OutputFormat>,
    no_color: bool,
    jobs: usize,
    max_iterations: Option<usize>,
) -> CheckConfig {
    CheckConfig {
        files,
        format: format.unwrap_or(file_config.output.format),
        color: file_config.output.color && !no_color,
        jobs,
        analysis: AnalysisConfig {
            max_iterations: max_iterations.unwrap_or(file_config.analysis.max_iterations),
        },
    }
}

/// Handle the check command, writing the report to stdout.
pub fn handle_check_command(config: CheckConfig) -> Result<CheckOutcome> {
    if config.analysis.max_iterations == 0 {
        anyhow::bail!("--max-iterations must be at least 1");
    }

    let programs = config
        .files
        .iter()
        .map(|path| Ok((path.clone(), load_program(path)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut reports: Vec<FileReport> = Vec::with_capacity(programs.len());
    for (path, result) in analyze_programs(&programs, &config.analysis) {
        let report: AnalysisReport =
            result.with_context(|| format!("analyzing {}", path.display()))?;
        tracing::info!(
            file = %path.display(),
            nodes = report.node_count,
            findings = report.errors.len(),
            "checked program"
        );
        reports.push(FileReport {
            file: path.clone(),
            report,
        });
    }

    let rendered = match config.format {
        OutputFormat::Text => render_text(&reports, config.color),
        OutputFormat::Json => render_json(&reports)?,
    };
    print!("{}", rendered);

    if reports.iter().all(|r| r.report.is_clean()) {
        Ok(CheckOutcome::Clean)
    } else {
        Ok(CheckOutcome::Findings)
    }
}
