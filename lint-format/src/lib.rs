//! Deka Lint Formatting
//!
//! Renders lint diagnostics the same way Deka's validation errors look:
//! a header with the violation code, a `file:line:col` pointer, the offending
//! source line with a caret underline, and optional help lines.

/// One diagnostic to render.
#[derive(Debug, Clone, Default)]
pub struct Annotation<'a> {
    pub file_path: &'a str,
    /// Violation code shown in the header, e.g. `PHP.LowerCaseTypeDeclaration.ReturnTypeFound`.
    pub code: &'a str,
    /// 1-indexed.
    pub line: usize,
    /// 1-indexed.
    pub column: usize,
    pub message: &'a str,
    pub underline_length: usize,
    /// `error` or `warning`.
    pub severity: &'a str,
    pub fixable: bool,
    pub help: Option<&'a str>,
}

/// Format a diagnostic against the source it was reported on.
///
/// ```rust
/// use lint_format::{format_annotation, Annotation};
///
/// let out = format_annotation(
///     "<?php\nfunction foo(Int $a) {}",
///     &Annotation {
///         file_path: "foo.php",
///         code: "PHP.LowerCaseTypeDeclaration.ParameterTypeFound",
///         line: 2,
///         column: 14,
///         message: "Parameter type declarations must be lowercase",
///         underline_length: 3,
///         severity: "error",
///         fixable: true,
///         help: None,
///     },
/// );
///
/// assert!(out.contains("┌─ foo.php:2:14"));
/// assert!(out.contains("^^^"));
/// ```
pub fn format_annotation(code: &str, annotation: &Annotation<'_>) -> String {
    format_with_color(code, annotation, use_color_output())
}

/// One-line totals printed after all files.
pub fn format_summary(files: usize, errors: usize, fixable: usize) -> String {
    if errors == 0 {
        return format!("No violations found in {} {}.", files, plural(files, "file", "files"));
    }
    let mut out = format!(
        "Found {} {} in {} {}.",
        errors,
        plural(errors, "violation", "violations"),
        files,
        plural(files, "file", "files")
    );
    if fixable > 0 {
        out.push_str(&format!(
            " {} can be fixed automatically with --fix.",
            fixable
        ));
    }
    out
}

fn format_with_color(code: &str, annotation: &Annotation<'_>, use_color: bool) -> String {
    let source_line = annotation
        .line
        .checked_sub(1)
        .and_then(|idx| code.lines().nth(idx))
        .unwrap_or("");
    let underline_length = annotation.underline_length.max(1);

    let (icon, label, color) = match annotation.severity {
        "warning" | "warn" => ("⚠️", "Lint Warning", "\x1b[33m"),
        _ => ("❌", "Lint Error", "\x1b[31m"),
    };
    let icon = colorize(icon, color, use_color);
    let label = colorize(label, color, use_color);
    let code_label = colorize(annotation.code, "\x1b[35m", use_color);
    let gutter = annotation.line.to_string().len().max(3);

    let mut out = format!(
        "\n{label}\n{icon} {code_label}\n\n┌─ {}:{}:{}\n│\n{:>gutter$} │ {}\n{:>gutter$} │ {}{} {}\n│\n",
        annotation.file_path,
        annotation.line,
        annotation.column,
        annotation.line,
        source_line,
        "",
        " ".repeat(annotation.column.saturating_sub(1)),
        "^".repeat(underline_length),
        annotation.message,
    );

    if let Some(help) = annotation.help.map(str::trim).filter(|help| !help.is_empty()) {
        out.push_str(&format!("= help: {help}\n"));
    }
    if annotation.fixable {
        let fix_label = colorize("fix", "\x1b[36m", use_color);
        out.push_str(&format!("= {fix_label}: run with --fix to correct automatically\n"));
    }
    out.push_str("│\n└─\n");
    out
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

fn use_color_output() -> bool {
    if cfg!(test) {
        return false;
    }
    if std::env::var("NO_COLOR").is_ok() || std::env::var("DEKA_NO_COLOR").is_ok() {
        return false;
    }
    !matches!(std::env::var("TERM").as_deref(), Ok("dumb"))
}

fn colorize(text: &str, color: &str, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    format!("{color}{text}\x1b[0m")
}
