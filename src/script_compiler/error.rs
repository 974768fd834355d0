// Script Compiler Error Handling
//
// Two layers: `CompilerError` stops the compiler before any line is touched
// (unreadable input, malformed command table). Everything found while
// compiling lines is a `Diagnostic`, collected and never fatal.

use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq)]
pub enum CompilerError {
    // Configuration errors
    CommandTableError(String),
    UnknownParameterKind { mnemonic: String, spec: String },
    DuplicateCommand(String),

    // IO errors
    IOError(String),
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompilerError::CommandTableError(msg) => {
                write!(f, "Invalid command table: {}", msg)
            }
            CompilerError::UnknownParameterKind { mnemonic, spec } => {
                write!(
                    f,
                    "Unknown parameter kind '{}' in command '{}'",
                    spec, mnemonic
                )
            }
            CompilerError::DuplicateCommand(mnemonic) => {
                write!(f, "Command '{}' is defined more than once", mnemonic)
            }
            CompilerError::IOError(msg) => {
                write!(f, "IO error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CompilerError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What went wrong on a line. The severity of each kind is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    DuplicateLabel,
    UnknownCommand,
    ArgumentCountMismatch,
    UnresolvedOperand,
    InvalidSymbolName,
    DuplicateVariableDeclaration,
    UnknownVariableReference,
    UndefinedLabel,
    ValueTruncation,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::ValueTruncation => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single error or warning, tagged with the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: usize,
    pub source: String,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: line {}: {}\n    {}",
            self.severity(),
            self.line,
            self.message,
            self.source
        )
    }
}

/// Collector for everything reported during one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => {
                self.errors += 1;
                log::debug!("line {}: {}", diagnostic.line, diagnostic.message);
            }
            Severity::Warning => {
                self.warnings += 1;
                log::debug!("line {} (warning): {}", diagnostic.line, diagnostic.message);
            }
        }
        self.entries.push(diagnostic);
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of diagnostics of the given kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for diagnostic in &self.entries {
            writeln!(out, "{}", diagnostic)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(kind: DiagnosticKind) -> Diagnostic {
        Diagnostic {
            kind,
            message: "message".to_string(),
            line: 3,
            source: "JUMP NOWHERE".to_string(),
        }
    }

    #[test]
    fn test_counts_split_by_severity() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(diagnostic(DiagnosticKind::ValueTruncation));
        diagnostics.report(diagnostic(DiagnosticKind::UndefinedLabel));
        diagnostics.report(diagnostic(DiagnosticKind::UndefinedLabel));

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.error_count(), 2);
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.count_of(DiagnosticKind::UndefinedLabel), 2);
    }

    #[test]
    fn test_warnings_alone_are_not_errors() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(diagnostic(DiagnosticKind::ValueTruncation));
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_render_format() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(diagnostic(DiagnosticKind::UndefinedLabel));

        let mut out = Vec::new();
        diagnostics.render(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "error: line 3: message\n    JUMP NOWHERE\n"
        );
    }
}
