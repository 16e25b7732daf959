//! Mock symbol table.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::usecases::ports::SymbolLookup;

#[derive(Default)]
pub struct MockSymbols {
    values: Mutex<HashMap<String, String>>,
    lookups: AtomicUsize,
}

impl MockSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, symbol: &str, value: &str) -> Self {
        self.set(symbol, value);
        self
    }

    pub fn set(&self, symbol: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(symbol.to_string(), value.to_string());
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl SymbolLookup for MockSymbols {
    fn symbol_value_str(&self, symbol: &str) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.values.lock().unwrap().get(symbol).cloned()
    }
}
