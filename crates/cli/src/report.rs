use std::path::PathBuf;

use lint_format::{Annotation, format_annotation, format_summary};
use serde::Serialize;
use sniffs::Diagnostic;

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    /// Fixes written back to disk.
    pub fixed: usize,
    /// Contents the diagnostics refer to.
    #[serde(skip)]
    pub source: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files: usize,
    pub errors: usize,
    pub fixable: usize,
    pub fixed: usize,
    /// Files that could not be read or written back.
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, report: &FileReport) {
        self.files += 1;
        self.errors += report.diagnostics.len();
        self.fixable += report.diagnostics.iter().filter(|d| d.fixable).count();
        self.fixed += report.fixed;
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    files: &'a [FileReport],
    summary: Summary,
}

pub fn render_text(reports: &[FileReport], summary: &Summary) -> String {
    let mut out = String::new();
    for report in reports {
        let file_path = report.path.to_string_lossy();
        for diagnostic in &report.diagnostics {
            out.push_str(&format_annotation(
                &report.source,
                &Annotation {
                    file_path: &file_path,
                    code: &diagnostic.source,
                    line: diagnostic.line,
                    column: diagnostic.column,
                    message: &diagnostic.message,
                    underline_length: diagnostic.length,
                    severity: diagnostic.severity.as_str(),
                    fixable: diagnostic.fixable,
                    help: None,
                },
            ));
        }
    }
    if summary.failed > 0 {
        out.push_str(&format!("\nSkipped {} unreadable files.\n", summary.failed));
    }
    if summary.fixed > 0 {
        out.push_str(&format!("\nFixed {} violations.\n", summary.fixed));
    }
    out.push('\n');
    out.push_str(&format_summary(summary.files, summary.errors, summary.fixable));
    out.push('\n');
    out
}

pub fn render_json(reports: &[FileReport], summary: &Summary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        files: reports,
        summary: *summary,
    })
}
