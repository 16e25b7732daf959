//! Configuration symbol lookup port.
//!
//! Stands in for the extension engine's symbol table; only string values
//! are ever requested.

use std::sync::Arc;

pub trait SymbolLookup: Send + Sync {
    fn symbol_value_str(&self, symbol: &str) -> Option<String>;
}

pub type SymbolLookupHandle = Arc<dyn SymbolLookup>;
