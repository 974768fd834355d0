//! Operand encoding
//!
//! Immediate and string operands are encoded by pure functions: they either
//! return every byte the operand needs or an error, never a partial write.
//! That lets the `either` kind probe the integer form and fall back to the
//! string form without rolling anything back.
//!
//! Operand layouts (all multi-byte values little-endian):
//!
//! | tag | meaning                   | payload                    |
//! |-----|---------------------------|----------------------------|
//! | 0   | raw immediate             | N bytes, N = spec width    |
//! | 1   | integer variable          | 2-byte variable index      |
//! | 2   | string variable           | 2-byte variable index      |
//! | 3   | string literal            | 2-byte length, then bytes  |

use crate::script_compiler::symbols::VariableTable;
use crate::script_compiler::syntax::TokenClassifier;
use std::fmt;

pub const TAG_IMMEDIATE: u8 = 0;
pub const TAG_INT_VARIABLE: u8 = 1;
pub const TAG_STRING_VARIABLE: u8 = 2;
pub const TAG_STRING_LITERAL: u8 = 3;

/// Longest string literal the 2-byte length field can describe.
pub const MAX_STRING_LEN: usize = 0xFFFF;

/// Width of the integer attempt of an `either` operand.
pub const EITHER_NUMBER_WIDTH: u8 = 1;

/// A value that had to be cut down to fit its encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    Value { original: u32, stored: u32, max: u32 },
    String { length: usize },
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Truncation::Value {
                original,
                stored,
                max,
            } => write!(
                f,
                "Truncation of argument value {} to {} (max {}).",
                original, stored, max
            ),
            Truncation::String { length } => write!(
                f,
                "Truncation of string of length {} to {} bytes.",
                length, MAX_STRING_LEN
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOperand {
    pub bytes: Vec<u8>,
    pub truncation: Option<Truncation>,
}

impl EncodedOperand {
    fn exact(bytes: Vec<u8>) -> Self {
        EncodedOperand {
            bytes,
            truncation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandError {
    UnknownVariable(String),
    NotAnInteger(String),
    NotAString(String),
    NotIntegerOrString(String),
}

impl fmt::Display for OperandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OperandError::UnknownVariable(token) => write!(f, "Unknown variable '{}'.", token),
            OperandError::NotAnInteger(token) => {
                write!(f, "Cannot convert '{}' to integer.", token)
            }
            OperandError::NotAString(token) => write!(f, "Cannot convert '{}' to string.", token),
            OperandError::NotIntegerOrString(token) => write!(
                f,
                "Expected int, string, or variable name but got '{}'.",
                token
            ),
        }
    }
}

impl std::error::Error for OperandError {}

/// Little-endian word; indices wider than 16 bits keep their low half.
pub fn word_bytes(value: usize) -> [u8; 2] {
    (value as u16).to_le_bytes()
}

pub fn width_mask(width: u8) -> u32 {
    if width >= 4 {
        u32::MAX
    } else {
        (1u32 << (8 * width as u32)) - 1
    }
}

/// Integer literal as tag 0 + `width` bytes, or a declared variable as tag 1.
pub fn encode_number(
    syntax: &dyn TokenClassifier,
    variables: &VariableTable,
    token: &str,
    width: u8,
) -> Result<EncodedOperand, OperandError> {
    let Some(value) = syntax.integer_literal(token) else {
        return encode_variable_operand(syntax, variables, token, TAG_INT_VARIABLE)
            .unwrap_or_else(|| Err(OperandError::NotAnInteger(token.to_string())));
    };

    let max = width_mask(width);
    let stored = value & max;
    let truncation = (stored != value).then_some(Truncation::Value {
        original: value,
        stored,
        max,
    });

    let mut bytes = Vec::with_capacity(1 + width as usize);
    bytes.push(TAG_IMMEDIATE);
    bytes.extend_from_slice(&stored.to_le_bytes()[..width.min(4) as usize]);

    Ok(EncodedOperand { bytes, truncation })
}

/// String literal as tag 3 + length + content, or a declared variable as tag 2.
pub fn encode_string(
    syntax: &dyn TokenClassifier,
    variables: &VariableTable,
    token: &str,
) -> Result<EncodedOperand, OperandError> {
    let Some(content) = syntax.string_literal(token) else {
        return encode_variable_operand(syntax, variables, token, TAG_STRING_VARIABLE)
            .unwrap_or_else(|| Err(OperandError::NotAString(token.to_string())));
    };

    let raw = content.as_bytes();
    let (raw, truncation) = if raw.len() > MAX_STRING_LEN {
        (
            &raw[..MAX_STRING_LEN],
            Some(Truncation::String { length: raw.len() }),
        )
    } else {
        (raw, None)
    };

    let mut bytes = Vec::with_capacity(3 + raw.len());
    bytes.push(TAG_STRING_LITERAL);
    bytes.extend_from_slice(&word_bytes(raw.len()));
    bytes.extend_from_slice(raw);

    Ok(EncodedOperand { bytes, truncation })
}

/// Integer first, then string. Only one error comes back if both fail.
pub fn encode_either(
    syntax: &dyn TokenClassifier,
    variables: &VariableTable,
    token: &str,
) -> Result<EncodedOperand, OperandError> {
    encode_number(syntax, variables, token, EITHER_NUMBER_WIDTH)
        .or_else(|_| encode_string(syntax, variables, token))
        .map_err(|_| OperandError::NotIntegerOrString(token.to_string()))
}

// `None` when the token is not a symbolic name at all, so the caller can
// report the literal conversion failure instead.
fn encode_variable_operand(
    syntax: &dyn TokenClassifier,
    variables: &VariableTable,
    token: &str,
    tag: u8,
) -> Option<Result<EncodedOperand, OperandError>> {
    if !syntax.is_symbolic_name(token) {
        return None;
    }
    Some(match variables.lookup(token) {
        Ok(index) => {
            let [low, high] = word_bytes(index);
            Ok(EncodedOperand::exact(vec![tag, low, high]))
        }
        Err(_) => Err(OperandError::UnknownVariable(token.to_string())),
    })
}

#[cfg(test)]
#[path = "operands_tests.rs"]
mod tests;
