//! Two-pass event script assembler
//!
//! Pass 1 walks lines in source order, emits opcode and operand bytes and
//! defines labels at the offset they appear at. Label operands always get a
//! zeroed 2-byte slot and a forward reference, even when the label is already
//! known, so forward and backward jumps are encoded the same way.
//!
//! Pass 2 (`resolve.rs`) runs from [`Assembler::finish`], after every line has
//! been emitted, and patches those slots.
//!
//! Nothing here aborts: each problem becomes a diagnostic and the assembler
//! moves on to the next operand or line.

use crate::script_compiler::commands::{CommandTable, ParamKind};
use crate::script_compiler::error::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::script_compiler::lexer::Line;
use crate::script_compiler::operands::{self, EncodedOperand, OperandError};
use crate::script_compiler::references::{ForwardReference, OutputBuffer, ReferenceLog};
use crate::script_compiler::symbols::{LabelTable, SymbolError, VariableTable};
use crate::script_compiler::syntax::TokenClassifier;

/// Compilation context for one unit. Start a fresh one per compilation.
pub struct Assembler<'t> {
    commands: &'t CommandTable,
    syntax: &'t dyn TokenClassifier,
    pub(crate) labels: LabelTable,
    pub(crate) variables: VariableTable,
    pub(crate) references: ReferenceLog,
    pub(crate) output: OutputBuffer,
    pub(crate) diagnostics: Diagnostics,
}

/// Result of a finished compilation unit.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub bytes: Vec<u8>,
    pub labels: LabelTable,
    pub variables: VariableTable,
    pub diagnostics: Diagnostics,
}

impl Assembly {
    /// The bytes are only meaningful when no errors were reported.
    pub fn is_usable(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

impl<'t> Assembler<'t> {
    pub fn new(commands: &'t CommandTable, syntax: &'t dyn TokenClassifier) -> Self {
        Assembler {
            commands,
            syntax,
            labels: LabelTable::new(),
            variables: VariableTable::new(),
            references: ReferenceLog::new(),
            output: OutputBuffer::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Run both passes over `lines`, annotating each with its code offset.
    pub fn assemble(mut self, lines: &mut [Line]) -> Assembly {
        for line in lines.iter_mut() {
            self.emit_line(line);
        }
        self.finish()
    }

    /// Pass 1 for a single line.
    pub fn emit_line(&mut self, line: &mut Line) {
        line.set_code_offset(self.output.offset());
        let line: &Line = line;

        let Some(first) = line.tokens().first() else {
            return;
        };

        if let Some(label) = self.syntax.label_definition(first) {
            if let Err(err) = self.labels.define(label, self.output.offset()) {
                self.report(DiagnosticKind::DuplicateLabel, err.to_string(), line);
            }
            if line.tokens().len() > 1 {
                log::debug!(
                    "line {}: {} token(s) after label '{}' ignored",
                    line.number(),
                    line.tokens().len() - 1,
                    label
                );
            }
            return;
        }

        if self.syntax.is_directive(first) {
            log::trace!("line {}: directive '{}' ignored", line.number(), first);
            return;
        }

        let commands = self.commands;
        let Some(command) = commands.get(first) else {
            self.report(
                DiagnosticKind::UnknownCommand,
                format!("Unknown command '{}'.", first),
                line,
            );
            return;
        };

        let args = &line.tokens()[1..];
        if args.len() != command.params.len() {
            self.report(
                DiagnosticKind::ArgumentCountMismatch,
                format!(
                    "Wrong number of arguments. Expected {} but got {}.",
                    command.params.len(),
                    args.len()
                ),
                line,
            );
            return;
        }

        log::trace!(
            "0x{:04x}: {} (opcode 0x{:02x})",
            self.output.offset(),
            command.mnemonic,
            command.opcode
        );
        self.output.emit_u8(command.opcode);

        for (&kind, token) in command.params.iter().zip(args) {
            self.encode_operand(kind, token, line);
        }
    }

    /// Run pass 2 and hand back the result.
    pub fn finish(mut self) -> Assembly {
        self.resolve_forward_references();

        log::info!(
            "Assembled {} bytes: {} labels, {} variables, {} errors, {} warnings",
            self.output.offset(),
            self.labels.len(),
            self.variables.len(),
            self.diagnostics.error_count(),
            self.diagnostics.warning_count()
        );

        Assembly {
            bytes: self.output.into_bytes(),
            labels: self.labels,
            variables: self.variables,
            diagnostics: self.diagnostics,
        }
    }

    /// Encode one operand. A failing operand contributes no bytes.
    fn encode_operand(&mut self, kind: ParamKind, token: &str, line: &Line) {
        let start = self.output.offset();

        match kind {
            ParamKind::Number { width } => {
                let result =
                    operands::encode_number(self.syntax, &self.variables, token, width);
                self.emit_encoded(result, line);
            }
            ParamKind::String => {
                let result = operands::encode_string(self.syntax, &self.variables, token);
                self.emit_encoded(result, line);
            }
            ParamKind::Either => {
                let result = operands::encode_either(self.syntax, &self.variables, token);
                self.emit_encoded(result, line);
            }
            ParamKind::Label => {
                if !self.require_symbolic_name(token, "label", line) {
                    return;
                }
                let location = self.output.reserve_word();
                self.references.push(ForwardReference {
                    location,
                    label: token.to_string(),
                    line: line.number(),
                    source: line.text().to_string(),
                });
            }
            ParamKind::DeclareVariable => {
                if !self.require_symbolic_name(token, "variable name", line) {
                    return;
                }
                match self.variables.declare(token) {
                    Ok(index) => self.output.emit_bytes(&operands::word_bytes(index)),
                    Err(err) => self.report_symbol_error(err, line),
                }
            }
            ParamKind::Variable => {
                if !self.require_symbolic_name(token, "variable name", line) {
                    return;
                }
                match self.variables.lookup(token) {
                    Ok(index) => self.output.emit_bytes(&operands::word_bytes(index)),
                    Err(err) => self.report_symbol_error(err, line),
                }
            }
        }

        log::trace!(
            "  {} '{}' -> {:02x?}",
            kind,
            token,
            &self.output.as_bytes()[start..]
        );
    }

    fn emit_encoded(&mut self, result: Result<EncodedOperand, OperandError>, line: &Line) {
        match result {
            Ok(encoded) => {
                if let Some(truncation) = encoded.truncation {
                    self.report(DiagnosticKind::ValueTruncation, truncation.to_string(), line);
                }
                self.output.emit_bytes(&encoded.bytes);
            }
            Err(err) => self.report(DiagnosticKind::UnresolvedOperand, err.to_string(), line),
        }
    }

    fn require_symbolic_name(&mut self, token: &str, what: &str, line: &Line) -> bool {
        if self.syntax.is_symbolic_name(token) {
            return true;
        }
        self.report(
            DiagnosticKind::InvalidSymbolName,
            format!("Cannot convert '{}' to {}.", token, what),
            line,
        );
        false
    }

    fn report_symbol_error(&mut self, err: SymbolError, line: &Line) {
        let kind = match err {
            SymbolError::DuplicateLabel { .. } => DiagnosticKind::DuplicateLabel,
            SymbolError::DuplicateVariable { .. } => DiagnosticKind::DuplicateVariableDeclaration,
            SymbolError::UnknownVariable(_) => DiagnosticKind::UnknownVariableReference,
        };
        self.report(kind, err.to_string(), line);
    }

    pub(crate) fn report(&mut self, kind: DiagnosticKind, message: String, line: &Line) {
        self.report_at(kind, message, line.number(), line.text());
    }

    pub(crate) fn report_at(
        &mut self,
        kind: DiagnosticKind,
        message: String,
        line: usize,
        source: &str,
    ) {
        self.diagnostics.report(Diagnostic {
            kind,
            message,
            line,
            source: source.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "assembler_tests.rs"]
mod tests;
