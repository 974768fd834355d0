// Event Script Compiler Module
// Compiles line-oriented map/event scripts into bytecode for the script runtime

pub mod assembler;
pub mod commands;
pub mod error;
pub mod lexer;
pub mod listing;
pub mod operands;
pub mod references;
mod resolve;
pub mod symbols;
pub mod syntax;

pub use assembler::{Assembler, Assembly};
pub use commands::{CommandSpec, CommandTable, ParamKind};
pub use error::{CompilerError, Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use lexer::Line;
pub use syntax::{ScriptSyntax, TokenClassifier};

/// Main compiler structure
pub struct ScriptCompiler {
    commands: CommandTable,
    syntax: ScriptSyntax,
}

impl ScriptCompiler {
    /// Compiler using the built-in event command set
    pub fn new() -> Result<Self, CompilerError> {
        Ok(Self::with_commands(CommandTable::builtin()?))
    }

    pub fn with_commands(commands: CommandTable) -> Self {
        ScriptCompiler {
            commands,
            syntax: ScriptSyntax,
        }
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Compile script source. Check `Assembly::is_usable` before using the bytes.
    pub fn compile(&self, source: &str) -> Assembly {
        let mut lines = lexer::split_source(source);
        self.compile_lines(&mut lines)
    }

    /// Compile already split lines, recording each line's code offset.
    /// Every call starts from empty symbol tables.
    pub fn compile_lines(&self, lines: &mut [Line]) -> Assembly {
        log::debug!("Compiling {} lines", lines.len());
        Assembler::new(&self.commands, &self.syntax).assemble(lines)
    }
}
