// Label and variable tables for one compilation unit

use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolError {
    /// The label already exists; `offset` is the one that was kept.
    DuplicateLabel { name: String, offset: usize },
    DuplicateVariable { name: String, index: usize },
    UnknownVariable(String),
}

impl fmt::Display for SymbolError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolError::DuplicateLabel { name, .. } => {
                write!(f, "Redefinition of label '{}'.", name)
            }
            SymbolError::DuplicateVariable { name, .. } => {
                write!(f, "Redefinition of variable '{}'.", name)
            }
            SymbolError::UnknownVariable(name) => write!(f, "Unknown variable '{}'.", name),
        }
    }
}

impl std::error::Error for SymbolError {}

/// Label name -> absolute byte offset. First definition wins.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    offsets: IndexMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, offset: usize) -> Result<(), SymbolError> {
        if let Some(&existing) = self.offsets.get(name) {
            return Err(SymbolError::DuplicateLabel {
                name: name.to_string(),
                offset: existing,
            });
        }
        log::debug!("label '{}' -> 0x{:04x}", name, offset);
        self.offsets.insert(name.to_string(), offset);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.offsets.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Labels in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.offsets.iter().map(|(name, &offset)| (name.as_str(), offset))
    }
}

/// Variable name -> dense index, assigned in declaration order.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    indices: IndexMap<String, usize>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str) -> Result<usize, SymbolError> {
        if let Some(&index) = self.indices.get(name) {
            return Err(SymbolError::DuplicateVariable {
                name: name.to_string(),
                index,
            });
        }
        let index = self.indices.len();
        log::debug!("variable '{}' -> #{}", name, index);
        self.indices.insert(name.to_string(), index);
        Ok(index)
    }

    pub fn lookup(&self, name: &str) -> Result<usize, SymbolError> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| SymbolError::UnknownVariable(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.indices.iter().map(|(name, &index)| (name.as_str(), index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_label_definition_wins() {
        let mut labels = LabelTable::new();
        labels.define("LOOP", 4).unwrap();

        let err = labels.define("LOOP", 9).unwrap_err();
        assert_eq!(
            err,
            SymbolError::DuplicateLabel {
                name: "LOOP".to_string(),
                offset: 4
            }
        );
        assert_eq!(labels.lookup("LOOP"), Some(4));
        assert_eq!(labels.lookup("ELSEWHERE"), None);
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn test_variable_indices_are_dense() {
        let mut vars = VariableTable::new();
        assert_eq!(vars.declare("a"), Ok(0));
        assert_eq!(vars.declare("b"), Ok(1));
        assert_eq!(vars.declare("c"), Ok(2));
        assert_eq!(vars.lookup("b"), Ok(1));
    }

    #[test]
    fn test_duplicate_declaration_keeps_index() {
        let mut vars = VariableTable::new();
        vars.declare("a").unwrap();
        vars.declare("b").unwrap();

        assert!(matches!(
            vars.declare("a"),
            Err(SymbolError::DuplicateVariable { index: 0, .. })
        ));
        assert_eq!(vars.lookup("a"), Ok(0));
        assert_eq!(vars.declare("c"), Ok(2));
    }

    #[test]
    fn test_lookup_never_creates() {
        let vars = VariableTable::new();
        assert_eq!(
            vars.lookup("ghost"),
            Err(SymbolError::UnknownVariable("ghost".to_string()))
        );
        assert!(vars.is_empty());
    }

    #[test]
    fn test_iteration_follows_definition_order() {
        let mut labels = LabelTable::new();
        labels.define("Z", 0).unwrap();
        labels.define("A", 3).unwrap();
        let names: Vec<_> = labels.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Z", "A"]);
    }
}
