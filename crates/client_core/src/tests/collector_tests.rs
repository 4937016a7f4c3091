use shared::{
    domain::{Symbol, SymbolSet, MAX_SYMBOLS},
    error::SymbolEntryError,
};

use crate::SymbolCollector;

fn listed(symbols: &SymbolSet) -> Vec<&str> {
    symbols.iter().map(Symbol::as_str).collect()
}

#[test]
fn valid_add_appends_at_end_and_clears_draft() {
    let mut collector = SymbolCollector::new();
    collector.add_symbol("AAPL").expect("add");
    *collector.input_mut() = "goog".to_string();
    let added = collector.add_from_input().expect("add from input");

    assert_eq!(added.as_str(), "GOOG");
    assert_eq!(listed(collector.symbols()), ["AAPL", "GOOG"]);
    assert!(collector.input().is_empty());
    assert_eq!(collector.error(), None);
}

#[test]
fn lowercase_input_is_normalized_before_storage() {
    let mut collector = SymbolCollector::new();
    let added = collector.add_symbol(" aapl ").expect("add");
    assert_eq!(added.as_str(), "AAPL");
    assert_eq!(listed(collector.symbols()), ["AAPL"]);
}

#[test]
fn empty_input_reports_empty_input() {
    let mut collector = SymbolCollector::new();
    assert_eq!(
        collector.add_symbol("   "),
        Err(SymbolEntryError::EmptyInput)
    );
    assert!(collector.symbols().is_empty());
    assert_eq!(collector.error(), Some(SymbolEntryError::EmptyInput));
}

#[test]
fn invalid_format_leaves_set_unchanged() {
    let mut collector = SymbolCollector::new();
    collector.add_symbol("AAPL").expect("add");
    assert_eq!(
        collector.add_symbol("AAPL123"),
        Err(SymbolEntryError::InvalidFormat)
    );
    assert_eq!(listed(collector.symbols()), ["AAPL"]);
    assert_eq!(collector.error(), Some(SymbolEntryError::InvalidFormat));
}

#[test]
fn duplicate_add_reports_on_second_attempt() {
    let mut collector = SymbolCollector::new();
    collector.add_symbol("AAPL").expect("first add");
    assert_eq!(
        collector.add_symbol("aapl"),
        Err(SymbolEntryError::DuplicateSymbol)
    );
    assert_eq!(collector.symbols().len(), 1);
}

#[test]
fn sixth_add_reports_capacity_exceeded() {
    let mut collector = SymbolCollector::new();
    for ticker in ["AAPL", "GOOGL", "AMZN", "MSFT", "TSLA"] {
        collector.add_symbol(ticker).expect("add");
    }
    assert!(collector.at_capacity());
    assert_eq!(
        collector.add_symbol("NFLX"),
        Err(SymbolEntryError::CapacityExceeded)
    );
    assert_eq!(collector.symbols().len(), MAX_SYMBOLS);
}

#[test]
fn remove_after_add_restores_prior_state() {
    let mut collector = SymbolCollector::new();
    collector.add_symbol("AAPL").expect("add");
    collector.add_symbol("GOOG").expect("add");
    let before = listed(collector.symbols())
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let tsla = collector.add_symbol("TSLA").expect("add");
    assert!(collector.remove_symbol(&tsla));
    assert_eq!(listed(collector.symbols()), before);
}

#[test]
fn remove_clears_inline_error_and_tolerates_absent_symbol() {
    let mut collector = SymbolCollector::new();
    collector.add_symbol("AAPL").expect("add");
    let _ = collector.add_symbol("bad!");
    assert!(collector.error().is_some());

    let goog = Symbol::parse("GOOG").expect("parse");
    assert!(!collector.remove_symbol(&goog));
    assert_eq!(collector.error(), None);
}

#[test]
fn submit_on_empty_set_reports_empty_collection() {
    let mut collector = SymbolCollector::new();
    assert!(!collector.can_submit());
    assert_eq!(
        collector.submit(),
        Err(SymbolEntryError::EmptyCollection)
    );
    assert_eq!(collector.error(), Some(SymbolEntryError::EmptyCollection));
}

#[test]
fn submit_snapshot_is_detached_from_live_set() {
    let mut collector = SymbolCollector::new();
    collector.add_symbol("AAPL").expect("add");
    let aapl = Symbol::parse("AAPL").expect("parse");

    let snapshot = collector.submit().expect("submit");
    collector.remove_symbol(&aapl);

    assert!(collector.symbols().is_empty());
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.as_slice()[0].as_str(), "AAPL");
}
