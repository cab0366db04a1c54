use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Fully qualified code, e.g. `PHP.LowerCaseTypeDeclaration.ReturnTypeFound`.
    pub source: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
    pub message: String,
    pub data: Vec<String>,
    pub severity: Severity,
    pub fixable: bool,
    #[serde(skip)]
    pub token: usize,
}

impl Diagnostic {
    /// The violation code without the sniff prefix.
    pub fn code(&self) -> &str {
        self.source.rsplit('.').next().unwrap_or(&self.source)
    }
}
