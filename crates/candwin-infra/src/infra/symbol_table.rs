//! Static symbol table standing in for the extension engine.

use std::collections::HashMap;

use crate::usecases::ports::SymbolLookup;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    values: HashMap<String, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(symbol.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SymbolLookup for SymbolTable {
    fn symbol_value_str(&self, symbol: &str) -> Option<String> {
        self.values.get(symbol).cloned()
    }
}
