//! Training form submission, confirmation timing and failure handling.

mod common;

use std::time::Duration;

use common::{names, network, remote, Call, FakeGateway};
use facewatch_core::training::{TrainingCompletion, IMAGE_URL_REQUIRED, PERSON_NAME_REQUIRED};
use facewatch_session::training::TrainingSession;
use facewatch_session::FacewatchContext;

const SHORT_DELAY: Duration = Duration::from_millis(20);

async fn training_session(fake: &std::sync::Arc<FakeGateway>) -> (FacewatchContext, TrainingSession) {
    fake.push_subjects(Ok(names(&["miri_michaeli"])));
    let context = FacewatchContext::start(fake.clone());
    context.subjects.wait_until_loaded().await;
    let training = context.training(SHORT_DELAY);
    (context, training)
}

fn train_calls(fake: &FakeGateway) -> usize {
    fake.count(|c| matches!(c, Call::Train { .. }))
}

// ---------------------------------------------------------------------------
// Test: validation happens before any call
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_fields_are_rejected_locally() {
    let fake = FakeGateway::new();
    let (_context, training) = training_session(&fake).await;

    let err = training.submit().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(training.view().await.error.as_deref(), Some(PERSON_NAME_REQUIRED));

    training.choose_new("  Dana ").await.unwrap();
    let err = training.submit().await.unwrap_err();
    assert_eq!(err.display_message(""), IMAGE_URL_REQUIRED);

    assert_eq!(train_calls(&fake), 0);
}

// ---------------------------------------------------------------------------
// Test: the picker offers cached subjects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn view_lists_cached_subjects() {
    let fake = FakeGateway::new();
    let (_context, training) = training_session(&fake).await;

    let view = training.view().await;
    assert_eq!(view.subjects, names(&["miri_michaeli"]));
    assert!(!view.subjects_loading);
    assert!(!view.can_submit);

    training.choose_existing("miri_michaeli").await.unwrap();
    training.set_image_url("https://img/m.jpg").await.unwrap();
    assert!(training.view().await.can_submit);
}

// ---------------------------------------------------------------------------
// Test: success confirms, clears the form, then auto-dismisses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn success_confirms_then_returns_to_clean_form() {
    let fake = FakeGateway::new();
    let (_context, training) = training_session(&fake).await;
    fake.push_train(Ok(()));

    training.choose_existing("miri_michaeli").await.unwrap();
    training.set_image_url(" https://img/miri.jpg ").await.unwrap();
    let completion = training.submit().await.unwrap();

    assert!(matches!(completion, TrainingCompletion::Confirmed { .. }));
    assert_eq!(
        fake.calls().last(),
        Some(&Call::Train {
            person_name: "miri_michaeli".into(),
            image_url: "https://img/miri.jpg".into(),
        })
    );

    let view = training.view().await;
    assert_eq!(view.confirmation, Some("Training image added successfully"));
    assert_eq!(view.form.person_name(), "");
    assert_eq!(view.form.image_url, "");

    tokio::time::sleep(SHORT_DELAY * 5).await;
    assert_eq!(training.view().await.confirmation, None);
}

// ---------------------------------------------------------------------------
// Test: failure keeps the entered values and shows server text verbatim
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failure_keeps_values_for_retry() {
    let fake = FakeGateway::new();
    let (_context, training) = training_session(&fake).await;
    fake.push_train(Err(remote("No face detected in training image")));
    fake.push_train(Ok(()));

    training.choose_new("Dana").await.unwrap();
    training.set_image_url("https://img/dana.jpg").await.unwrap();

    let err = training.submit().await.unwrap_err();
    assert_eq!(
        err.display_message("Failed to train subject"),
        "No face detected in training image"
    );

    let view = training.view().await;
    assert_eq!(view.error.as_deref(), Some("No face detected in training image"));
    assert_eq!(view.form.person_name(), "Dana");
    assert_eq!(view.form.image_url, "https://img/dana.jpg");
    assert!(view.can_submit);

    // Retry without re-entering anything.
    training.submit().await.unwrap();
    assert_eq!(train_calls(&fake), 2);
}

// ---------------------------------------------------------------------------
// Test: a bodiless failure uses the status-derived message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bodiless_failure_uses_generic_message() {
    let fake = FakeGateway::new();
    let (_context, training) = training_session(&fake).await;
    fake.push_train(Err(network("Failed to train subject")));

    training.choose_new("Dana").await.unwrap();
    training.set_image_url("https://img/dana.jpg").await.unwrap();
    training.submit().await.unwrap_err();

    assert_eq!(
        training.view().await.error.as_deref(),
        Some("Failed to train subject: Bad Gateway")
    );
}

// ---------------------------------------------------------------------------
// Test: shutdown stops the confirmation timer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_cancels_confirmation_timer() {
    let fake = FakeGateway::new();
    let (_context, training) = training_session(&fake).await;
    fake.push_train(Ok(()));

    training.choose_new("Dana").await.unwrap();
    training.set_image_url("https://img/dana.jpg").await.unwrap();
    training.submit().await.unwrap();

    training.shutdown();
    tokio::time::sleep(SHORT_DELAY * 5).await;

    assert!(training.view().await.confirmation.is_some());
}
