use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::SymbolEntryError;

/// Maximum number of symbols a single analysis request may carry.
pub const MAX_SYMBOLS: usize = 5;

/// Maximum length of a validated ticker symbol.
pub const MAX_SYMBOL_LEN: usize = 5;

/// Normalized stock ticker: 1-5 uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Trims and upper-cases the input, then validates the ticker format.
    pub fn parse(raw: &str) -> Result<Self, SymbolEntryError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(SymbolEntryError::EmptyInput);
        }
        if normalized.len() > MAX_SYMBOL_LEN || !normalized.bytes().all(|b| b.is_ascii_uppercase())
        {
            return Err(SymbolEntryError::InvalidFormat);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = SymbolEntryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = SymbolEntryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// Ordered, duplicate-free list of pending symbols, capped at [`MAX_SYMBOLS`].
/// Insertion order is preserved; a submission snapshot is a plain clone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSet(Vec<Symbol>);

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a symbol at the end. Duplicates are checked before capacity so
    /// the first failing rule is the one reported.
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), SymbolEntryError> {
        if self.0.contains(&symbol) {
            return Err(SymbolEntryError::DuplicateSymbol);
        }
        if self.0.len() >= MAX_SYMBOLS {
            return Err(SymbolEntryError::CapacityExceeded);
        }
        self.0.push(symbol);
        Ok(())
    }

    /// Removes the matching symbol if present. Removing an absent symbol is a
    /// no-op, not an error.
    pub fn remove(&mut self, symbol: &Symbol) -> bool {
        match self.0.iter().position(|existing| existing == symbol) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn at_capacity(&self) -> bool {
        self.0.len() == MAX_SYMBOLS
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a SymbolSet {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse(" aapl ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "AAPL");
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(Symbol::parse("   "), Err(SymbolEntryError::EmptyInput));
    }

    #[test]
    fn rejects_non_letter_characters() {
        assert_eq!(Symbol::parse("BRK.B"), Err(SymbolEntryError::InvalidFormat));
        assert_eq!(Symbol::parse("A1"), Err(SymbolEntryError::InvalidFormat));
    }

    #[test]
    fn rejects_overlong_symbols() {
        assert_eq!(
            Symbol::parse("TOOLONG"),
            Err(SymbolEntryError::InvalidFormat)
        );
        assert!(Symbol::parse("GOOGL").is_ok());
    }

    #[test]
    fn insert_preserves_order_and_rejects_duplicates() {
        let mut set = SymbolSet::new();
        set.insert(Symbol::parse("AAPL").unwrap()).expect("first");
        set.insert(Symbol::parse("GOOG").unwrap()).expect("second");
        assert_eq!(
            set.insert(Symbol::parse("aapl").unwrap()),
            Err(SymbolEntryError::DuplicateSymbol)
        );
        let listed: Vec<&str> = set.iter().map(Symbol::as_str).collect();
        assert_eq!(listed, ["AAPL", "GOOG"]);
    }

    #[test]
    fn insert_rejects_sixth_symbol() {
        let mut set = SymbolSet::new();
        for ticker in ["AAPL", "GOOGL", "AMZN", "MSFT", "TSLA"] {
            set.insert(Symbol::parse(ticker).unwrap()).expect("add");
        }
        assert!(set.at_capacity());
        assert_eq!(
            set.insert(Symbol::parse("NFLX").unwrap()),
            Err(SymbolEntryError::CapacityExceeded)
        );
        assert_eq!(set.len(), MAX_SYMBOLS);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut set = SymbolSet::new();
        let aapl = Symbol::parse("AAPL").unwrap();
        set.insert(aapl.clone()).expect("add");
        assert!(set.remove(&aapl));
        assert!(!set.remove(&aapl));
        assert!(set.is_empty());
    }

    #[test]
    fn serde_round_trips_through_ticker_strings() {
        let mut set = SymbolSet::new();
        set.insert(Symbol::parse("AAPL").unwrap()).expect("add");
        let encoded = serde_json::to_string(&set).expect("encode");
        assert_eq!(encoded, r#"["AAPL"]"#);
        let decoded: SymbolSet = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, set);
    }
}
