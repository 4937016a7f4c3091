use serde_json::json;
use shared::{error::SubmitError, protocol::ResultPayload};

use crate::{DismissTrigger, Severity, SubmissionController, SubmissionPhase};

fn payload_with_predictions() -> ResultPayload {
    serde_json::from_value(json!({
        "predictions": { "AAPL": [150.0, 151.2], "GOOG": [2800.0] }
    }))
    .expect("decode payload")
}

#[test]
fn begin_transitions_to_loading_and_announces_count() {
    let mut controller = SubmissionController::new();
    assert_eq!(controller.phase(), SubmissionPhase::Idle);

    assert!(controller.begin(2));
    assert!(controller.is_loading());

    let notification = controller.notification().expect("notification");
    assert_eq!(notification.severity(), Severity::Info);
    assert_eq!(notification.message(), "Analyzing 2 stock symbols...");
}

#[test]
fn single_symbol_announcement_is_singular() {
    let mut controller = SubmissionController::new();
    assert!(controller.begin(1));
    assert_eq!(
        controller.notification().expect("notification").message(),
        "Analyzing 1 stock symbol..."
    );
}

#[test]
fn begin_while_loading_is_a_no_op() {
    let mut controller = SubmissionController::new();
    assert!(controller.begin(2));
    let before = controller.notification().cloned();

    assert!(!controller.begin(3));
    assert!(controller.is_loading());
    assert_eq!(controller.notification().cloned(), before);
}

#[test]
fn successful_settle_stores_payload_and_notifies_success() {
    let mut controller = SubmissionController::new();
    controller.begin(2);
    controller.settle(Ok(payload_with_predictions()));

    assert_eq!(controller.phase(), SubmissionPhase::Succeeded);
    assert!(controller.result().is_some());
    assert_eq!(controller.error(), None);

    let notification = controller.notification().expect("notification");
    assert_eq!(notification.severity(), Severity::Success);
    assert!(notification.message().contains("completed successfully"));
}

#[test]
fn failed_settle_retains_message_for_inline_display() {
    let mut controller = SubmissionController::new();
    controller.begin(1);
    controller.settle(Err(SubmitError::Service("Network error".to_string())));

    assert_eq!(controller.phase(), SubmissionPhase::Failed);
    assert_eq!(controller.error(), Some("Network error"));
    assert!(controller.result().is_none());

    let notification = controller.notification().expect("notification");
    assert_eq!(notification.severity(), Severity::Error);
    assert!(notification.message().contains("Network error"));
}

#[test]
fn no_valid_predictions_settles_as_failure() {
    let mut controller = SubmissionController::new();
    controller.begin(1);
    controller.settle(Err(SubmitError::NoValidPredictions));

    assert_eq!(controller.phase(), SubmissionPhase::Failed);
    assert!(controller
        .notification()
        .expect("notification")
        .message()
        .contains("No valid predictions"));
}

#[test]
fn controller_is_reusable_after_failure() {
    let mut controller = SubmissionController::new();
    controller.begin(1);
    controller.settle(Err(SubmitError::Transport("connection refused".to_string())));
    assert_eq!(controller.phase(), SubmissionPhase::Failed);

    assert!(controller.begin(2));
    assert!(controller.is_loading());
    assert_eq!(controller.error(), None);

    controller.settle(Ok(payload_with_predictions()));
    assert_eq!(controller.phase(), SubmissionPhase::Succeeded);
}

#[test]
fn begin_clears_previous_result_and_error() {
    let mut controller = SubmissionController::new();
    controller.begin(1);
    controller.settle(Ok(payload_with_predictions()));
    assert!(controller.result().is_some());

    controller.begin(1);
    assert!(controller.result().is_none());
    assert_eq!(controller.error(), None);
}

#[test]
fn abort_exits_loading_when_dispatch_fails() {
    let mut controller = SubmissionController::new();
    controller.begin(3);
    controller.abort("prediction request could not be queued");

    assert_eq!(controller.phase(), SubmissionPhase::Failed);
    assert!(!controller.is_loading());
    assert!(controller
        .error()
        .expect("error")
        .contains("could not be queued"));
}

#[test]
fn explicit_close_hides_notification_but_clickaway_does_not() {
    let mut controller = SubmissionController::new();
    controller.begin(1);
    controller.settle(Ok(payload_with_predictions()));

    controller.dismiss_notification(DismissTrigger::ClickAway);
    assert!(controller.notification().expect("notification").is_visible());

    controller.dismiss_notification(DismissTrigger::Explicit);
    assert!(!controller.notification().expect("notification").is_visible());
}

#[test]
fn dismissal_does_not_alter_submission_state() {
    let mut controller = SubmissionController::new();
    controller.begin(1);

    controller.dismiss_notification(DismissTrigger::Explicit);
    assert!(controller.is_loading());
}
