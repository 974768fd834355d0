//! Command table for event scripts
//!
//! Maps a mnemonic to its opcode byte and the ordered list of parameter
//! kinds its operands are encoded with. Tables are plain TOML:
//!
//! ```toml
//! [[command]]
//! mnemonic = "JUMP"
//! opcode = 0x10
//! params = ["l"]
//! ```
//!
//! Parameter specifiers:
//!
//! - `#` .. `####`: numeric immediate, width = number of `#` (1 to 4 bytes)
//! - `s`: string literal or string variable
//! - `e`: either integer or string
//! - `l`: label reference
//! - `d`: declare a new variable
//! - `v`: reference an existing variable

use crate::script_compiler::error::CompilerError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Widest numeric immediate a parameter spec can ask for.
pub const MAX_NUMBER_WIDTH: u8 = 4;

const BUILTIN_COMMANDS: &str = include_str!("default_commands.toml");

/// How one operand is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Number { width: u8 },
    String,
    Either,
    Label,
    DeclareVariable,
    Variable,
}

impl ParamKind {
    /// Parse a specifier. `None` for anything outside the closed set.
    pub fn from_spec(spec: &str) -> Option<ParamKind> {
        match spec {
            "s" => Some(ParamKind::String),
            "e" => Some(ParamKind::Either),
            "l" => Some(ParamKind::Label),
            "d" => Some(ParamKind::DeclareVariable),
            "v" => Some(ParamKind::Variable),
            _ if !spec.is_empty()
                && spec.len() <= MAX_NUMBER_WIDTH as usize
                && spec.chars().all(|c| c == '#') =>
            {
                Some(ParamKind::Number {
                    width: spec.len() as u8,
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamKind::Number { width } => write!(f, "{}", "#".repeat(*width as usize)),
            ParamKind::String => write!(f, "s"),
            ParamKind::Either => write!(f, "e"),
            ParamKind::Label => write!(f, "l"),
            ParamKind::DeclareVariable => write!(f, "d"),
            ParamKind::Variable => write!(f, "v"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub mnemonic: String,
    pub opcode: u8,
    pub params: Vec<ParamKind>,
}

#[derive(Debug, Deserialize)]
struct CommandFile {
    #[serde(default)]
    command: Vec<RawCommand>,
}

#[derive(Debug, Deserialize)]
struct RawCommand {
    mnemonic: String,
    opcode: u8,
    #[serde(default)]
    params: Vec<String>,
}

/// Mnemonic lookup is case-insensitive; keys are stored upper-cased.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: IndexMap<String, CommandSpec>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The event command set compiled into the crate.
    pub fn builtin() -> Result<Self, CompilerError> {
        Self::from_toml_str(BUILTIN_COMMANDS)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CompilerError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            CompilerError::IOError(format!("reading '{}': {}", path.display(), err))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, CompilerError> {
        let file: CommandFile = toml::from_str(text)
            .map_err(|err| CompilerError::CommandTableError(err.to_string()))?;

        let mut table = CommandTable::new();
        for raw in file.command {
            let params = raw
                .params
                .iter()
                .map(|spec| {
                    ParamKind::from_spec(spec).ok_or_else(|| CompilerError::UnknownParameterKind {
                        mnemonic: raw.mnemonic.clone(),
                        spec: spec.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            table.insert(CommandSpec {
                mnemonic: raw.mnemonic,
                opcode: raw.opcode,
                params,
            })?;
        }

        log::debug!("Loaded command table with {} commands", table.len());
        Ok(table)
    }

    pub fn insert(&mut self, spec: CommandSpec) -> Result<(), CompilerError> {
        let key = spec.mnemonic.to_ascii_uppercase();
        if key.is_empty() {
            return Err(CompilerError::CommandTableError(
                "empty mnemonic".to_string(),
            ));
        }
        if self.commands.contains_key(&key) {
            return Err(CompilerError::DuplicateCommand(spec.mnemonic));
        }
        self.commands.insert(key, spec);
        Ok(())
    }

    pub fn get(&self, mnemonic: &str) -> Option<&CommandSpec> {
        self.commands.get(&mnemonic.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }
}
