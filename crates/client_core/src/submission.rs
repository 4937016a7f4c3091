//! Submission lifecycle: request phase, retained result/error, notification.

use shared::{error::SubmitError, protocol::ResultPayload};

use crate::notification::{DismissTrigger, Notification};

/// Request lifecycle phase. Re-entrant: a new submit from `Succeeded` or
/// `Failed` returns to `Loading`; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Owns the submission state machine. At most one request is outstanding:
/// `begin` refuses re-entry while `Loading`; every started submission must be
/// settled or aborted.
#[derive(Debug, Clone, Default)]
pub struct SubmissionController {
    phase: SubmissionPhase,
    error: Option<String>,
    result: Option<ResultPayload>,
    notification: Option<Notification>,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SubmissionPhase::Loading
    }

    pub fn result(&self) -> Option<&ResultPayload> {
        self.result.as_ref()
    }

    /// Last failure message, retained for inline display alongside the
    /// transient notification.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Starts a submission of `symbol_count` symbols. Returns `false` without
    /// touching any state while a request is already in flight.
    pub fn begin(&mut self, symbol_count: usize) -> bool {
        if self.is_loading() {
            return false;
        }
        self.phase = SubmissionPhase::Loading;
        self.error = None;
        self.result = None;
        self.notification = Some(Notification::info(analyzing_message(symbol_count)));
        true
    }

    /// Records the outcome of the in-flight request. Both arms leave
    /// `Loading`; a new submission can be started from either.
    pub fn settle(&mut self, outcome: Result<ResultPayload, SubmitError>) {
        match outcome {
            Ok(payload) => {
                self.phase = SubmissionPhase::Succeeded;
                self.result = Some(payload);
                self.notification = Some(Notification::success("Analysis completed successfully"));
            }
            Err(err) => {
                let message = err.to_string();
                self.phase = SubmissionPhase::Failed;
                self.error = Some(message.clone());
                self.notification = Some(Notification::error(format!("Error: {message}")));
            }
        }
    }

    /// Exits `Loading` for a submission whose request never reached the
    /// worker (queue full or disconnected).
    pub fn abort(&mut self, reason: impl Into<String>) {
        let message = reason.into();
        self.phase = SubmissionPhase::Failed;
        self.error = Some(message.clone());
        self.notification = Some(Notification::error(format!("Error: {message}")));
    }

    pub fn dismiss_notification(&mut self, trigger: DismissTrigger) {
        if let Some(notification) = &mut self.notification {
            notification.dismiss(trigger);
        }
    }
}

fn analyzing_message(count: usize) -> String {
    if count == 1 {
        "Analyzing 1 stock symbol...".to_string()
    } else {
        format!("Analyzing {count} stock symbols...")
    }
}
