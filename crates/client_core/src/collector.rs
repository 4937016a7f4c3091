//! Symbol entry state: draft input, pending symbol list, inline error.

use shared::{
    domain::{Symbol, SymbolSet},
    error::SymbolEntryError,
};

/// Owns the list of pending ticker symbols and its validation rules. The
/// collector never talks to the network; `submit` hands a snapshot to the
/// submission side.
#[derive(Debug, Clone, Default)]
pub struct SymbolCollector {
    input: String,
    symbols: SymbolSet,
    error: Option<SymbolEntryError>,
}

impl SymbolCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Mutable access for direct text-edit binding.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn error(&self) -> Option<SymbolEntryError> {
        self.error
    }

    /// Editing the draft clears any stale inline error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Validates and appends the current draft input. On success the draft is
    /// reset to empty and the inline error cleared.
    pub fn add_from_input(&mut self) -> Result<Symbol, SymbolEntryError> {
        let raw = self.input.clone();
        self.add_symbol(&raw)
    }

    /// Validation order: empty, format, duplicate, capacity. The first failing
    /// rule wins and is retained for inline display.
    pub fn add_symbol(&mut self, raw: &str) -> Result<Symbol, SymbolEntryError> {
        let symbol = match Symbol::parse(raw) {
            Ok(symbol) => symbol,
            Err(err) => {
                self.error = Some(err);
                return Err(err);
            }
        };

        if let Err(err) = self.symbols.insert(symbol.clone()) {
            self.error = Some(err);
            return Err(err);
        }

        self.input.clear();
        self.error = None;
        Ok(symbol)
    }

    /// Removes a symbol if present; removing an absent symbol is a no-op.
    /// Either way the inline error is cleared.
    pub fn remove_symbol(&mut self, symbol: &Symbol) -> bool {
        let removed = self.symbols.remove(symbol);
        self.error = None;
        removed
    }

    pub fn can_submit(&self) -> bool {
        !self.symbols.is_empty()
    }

    /// Exactly at the capacity bound; drives the persistent informational
    /// notice, which is distinct from a rejected add.
    pub fn at_capacity(&self) -> bool {
        self.symbols.at_capacity()
    }

    /// Returns a snapshot of the pending set for submission. Later mutation of
    /// the live set does not affect the returned list.
    pub fn submit(&mut self) -> Result<SymbolSet, SymbolEntryError> {
        if self.symbols.is_empty() {
            self.error = Some(SymbolEntryError::EmptyCollection);
            return Err(SymbolEntryError::EmptyCollection);
        }
        Ok(self.symbols.clone())
    }
}
