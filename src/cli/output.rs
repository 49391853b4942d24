//! Rendering of check results.

use crate::analysis::AnalysisReport;
use crate::errors::{Error, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Report for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// One line per finding followed by a summary line.
pub fn render_text(reports: &[FileReport], color: bool) -> String {
    let mut out = String::new();
    let label = if color {
        "error".red().bold().to_string()
    } else {
        "error".to_string()
    };

    for file_report in reports {
        for err in &file_report.report.errors {
            out.push_str(&format!(
                "{}: {}: {}\n",
                file_report.file.display(),
                label,
                err
            ));
        }
    }

    let total: usize = reports.iter().map(|r| r.report.errors.len()).sum();
    let summary = if total == 0 {
        format!("no use-before-def errors in {} file(s)", reports.len())
    } else {
        let files = reports.iter().filter(|r| !r.report.is_clean()).count();
        format!("{} use-before-def error(s) in {} file(s)", total, files)
    };

    if color && total == 0 {
        out.push_str(&summary.green().to_string());
    } else if color {
        out.push_str(&summary.yellow().bold().to_string());
    } else {
        out.push_str(&summary);
    }
    out.push('\n');
    out
}

/// Pretty-printed JSON array with one object per file.
pub fn render_json(reports: &[FileReport]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(reports)?;
    json.push('\n');
    Ok(json)
}

/// Whether any error in the chain is an internal-consistency failure.
pub fn is_internal_failure(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<Error>())
        .any(Error::is_internal)
}

/// Message for a run that ended in a fatal error.
pub fn render_fatal(err: &anyhow::Error) -> String {
    let mut out = format!("Error: {:#}\n", err);
    if is_internal_failure(err) {
        out.push_str("note: this is a bug in usedef, not in the checked program\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::UseBeforeDefError;
    use crate::cfg::NodeId;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn sample() -> Vec<FileReport> {
        vec![
            FileReport {
                file: PathBuf::from("a.json"),
                report: AnalysisReport {
                    errors: BTreeSet::from([UseBeforeDefError {
                        node: NodeId(2),
                        var_name: "x".into(),
                        declared_at: NodeId(1),
                    }]),
                    node_count: 4,
                    iterations: 2,
                },
            },
            FileReport {
                file: PathBuf::from("b.json"),
                report: AnalysisReport {
                    errors: BTreeSet::new(),
                    node_count: 1,
                    iterations: 2,
                },
            },
        ]
    }

    #[test]
    fn test_render_text_plain() {
        let text = render_text(&sample(), false);
        assert_eq!(
            text,
            indoc! {"
                a.json: error: node 2: use of `x` before definition (declared at node 1)
                1 use-before-def error(s) in 1 file(s)
            "}
        );
    }

    #[test]
    fn test_render_text_clean() {
        let reports = vec![sample().remove(1)];
        assert_eq!(
            render_text(&reports, false),
            "no use-before-def errors in 1 file(s)\n"
        );
    }

    #[test]
    fn test_render_fatal_flags_internal_failures() {
        let err = anyhow::Error::from(Error::MissingReachingDefs { node: NodeId(3) })
            .context("analyzing a.json");

        assert!(is_internal_failure(&err));
        assert_eq!(
            render_fatal(&err),
            indoc! {"
                Error: analyzing a.json: internal error: no reaching definitions recorded for CFG node 3
                note: this is a bug in usedef, not in the checked program
            "}
        );
    }

    #[test]
    fn test_render_fatal_input_errors_have_no_note() {
        let err = anyhow::Error::from(
            Error::Configuration("bad value".into()).with_context("reading .usedef.toml"),
        );

        assert!(!is_internal_failure(&err));
        assert_eq!(
            render_fatal(&err),
            "Error: reading .usedef.toml: Configuration error: bad value\n"
        );
    }

    #[test]
    fn test_render_json_shape() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["file"], "a.json");
        assert_eq!(value[0]["node_count"], 4);
        assert_eq!(value[0]["errors"][0]["node"], 2);
        assert_eq!(value[0]["errors"][0]["var_name"], "x");
        assert_eq!(value[0]["errors"][0]["declared_at"], 1);
        assert_eq!(value[1]["errors"].as_array().unwrap().len(), 0);
    }
}
