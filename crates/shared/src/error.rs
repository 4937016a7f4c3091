use thiserror::Error;

/// Validation failures local to symbol entry. Surfaced inline next to the
/// input field; these never touch the submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SymbolEntryError {
    #[error("Please enter a stock symbol")]
    EmptyInput,
    #[error("Invalid symbol format. Stock symbols should be 1-5 capital letters.")]
    InvalidFormat,
    #[error("This symbol has already been added")]
    DuplicateSymbol,
    #[error("Maximum of 5 symbols allowed at once")]
    CapacityExceeded,
    #[error("Please add at least one stock symbol")]
    EmptyCollection,
}

/// Submission-level failures, surfaced through the transient notification and
/// retained for inline display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Empty symbol list reached the controller; upstream checks should make
    /// this unreachable.
    #[error("prediction request requires at least one symbol")]
    InvalidRequest,
    /// The call itself failed: network error or non-parseable body.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-2xx status and an error body.
    #[error("{0}")]
    Service(String),
    /// The service answered 2xx but every prediction entry was absent or null.
    #[error("No valid predictions could be generated for the requested symbols")]
    NoValidPredictions,
}
