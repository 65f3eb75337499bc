//! Lifecycle tests for the dialog controller
//!
//! Drive a controller over the recording surface through show / update /
//! hide sequences and check what the surface was asked to draw.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use waiting_dialog::dialog::{DialogOptions, HeaderText};
use waiting_dialog::error::AppError;
use waiting_dialog::surface::recording::SurfaceCall;
use waiting_dialog::testing_utils::{TestDialogBuilder, recording_controller};

fn counting_on_hide(counter: &Arc<AtomicUsize>) -> DialogOptions {
    let counter = Arc::clone(counter);
    DialogOptions::new().with_on_hide(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_ratio_and_absolute_progress_agree() {
    let (ratio_dialog, _) = recording_controller();
    let (absolute_dialog, _) = recording_controller();
    ratio_dialog.show(None, DialogOptions::default()).unwrap();
    absolute_dialog.show(None, DialogOptions::default()).unwrap();

    for total in [1u64, 3, 7, 10, 64, 99, 1000] {
        for current in 0..=total.min(150) {
            let ratio = ratio_dialog.set_progress_ratio(current, total).unwrap();
            let absolute = absolute_dialog
                .set_progress((100 * current / total) as i64)
                .unwrap();
            assert_eq!(ratio, absolute, "current={current} total={total}");
            assert_eq!(ratio_dialog.progress(), absolute_dialog.progress());
        }
    }
}

#[test]
fn test_progress_without_session_is_sentinel() {
    let (dialog, probe) = recording_controller();

    assert_eq!(dialog.progress(), None);
    assert_eq!(dialog.set_progress(50).unwrap(), None);
    assert_eq!(dialog.set_progress_ratio(1, 2).unwrap(), None);
    // Nothing reached the surface
    assert!(probe.calls().is_empty());
}

#[test]
fn test_zero_total_fails_even_without_session() {
    let (dialog, _) = recording_controller();
    assert!(matches!(
        dialog.set_progress_ratio(1, 0),
        Err(AppError::DivisionByZero)
    ));

    dialog.show(None, DialogOptions::default()).unwrap();
    dialog.set_progress(30).unwrap();
    assert!(matches!(
        dialog.set_progress_ratio(1, 0),
        Err(AppError::DivisionByZero)
    ));
    assert_eq!(dialog.progress(), Some(30));
}

#[test]
fn test_second_show_replaces_first() {
    let (dialog, probe) = recording_controller();
    let first = dialog.show(Some("X"), DialogOptions::default()).unwrap();
    let second = dialog.show(Some("Y"), DialogOptions::default()).unwrap();

    assert_ne!(first, second);
    assert_eq!(probe.destroyed(), vec![first]);
    assert_eq!(probe.current_handle(), Some(second));

    let session = dialog.session().unwrap();
    assert_eq!(session.handle, second);
    assert_eq!(session.message, "Y");
    assert!(session.visible);
    assert_eq!(probe.header().as_deref(), Some("Y"));
    TestDialogBuilder::validate_consistency(&session, &probe).unwrap();
}

#[test]
fn test_replacing_show_does_not_fire_on_hide() {
    let (dialog, _) = recording_controller();
    let calls = Arc::new(AtomicUsize::new(0));
    dialog.show(Some("X"), counting_on_hide(&calls)).unwrap();
    dialog.show(Some("Y"), DialogOptions::default()).unwrap();
    dialog.hide().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_hide_without_show() {
    let (dialog, probe) = recording_controller();
    dialog.hide().unwrap();
    assert!(dialog.session().is_none());
    assert!(probe.calls().is_empty());
}

#[test]
fn test_hide_fires_on_hide_once_with_handle() {
    let (dialog, probe) = recording_controller();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handle = dialog
        .show(
            None,
            DialogOptions::new().with_on_hide(move |handle| {
                sink.lock().unwrap().push(handle);
            }),
        )
        .unwrap();

    dialog.hide().unwrap();
    dialog.hide().unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![handle]);

    // The hidden session is kept for inspection
    let session = dialog.session().unwrap();
    assert!(!session.visible);
    TestDialogBuilder::validate_consistency(&session, &probe).unwrap();
}

#[test]
fn test_dismissal_fires_on_hide_and_later_hide_is_noop() {
    let (dialog, probe) = recording_controller();
    let calls = Arc::new(AtomicUsize::new(0));
    dialog.show(None, counting_on_hide(&calls)).unwrap();

    assert!(probe.dismiss());
    assert!(!dialog.is_visible());
    assert!(!probe.is_open());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    dialog.hide().unwrap();
    assert!(!probe.dismiss());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_title_and_body_updates_are_independent() {
    let (dialog, probe) = recording_controller();
    dialog.show(None, DialogOptions::default()).unwrap();

    dialog.message(None, Some("Title")).unwrap();
    dialog.message(Some("Body"), None).unwrap();

    assert_eq!(probe.header().as_deref(), Some("Title"));
    assert_eq!(probe.body().as_deref(), Some("Body"));
    assert!(probe.header_visible());
    assert!(probe.body_visible());

    let session = dialog.session().unwrap();
    assert_eq!(session.header.as_deref(), Some("Title"));
    assert_eq!(session.body, "Body");
}

#[test]
fn test_message_with_neither_argument_is_noop() {
    let (dialog, probe) = recording_controller();
    dialog.show(Some("Loading"), DialogOptions::default()).unwrap();
    let before = probe.calls().len();
    dialog.message(None, None).unwrap();
    assert_eq!(probe.calls().len(), before);
}

#[test]
fn test_updates_before_show_are_ignored() {
    let (dialog, probe) = recording_controller();
    dialog.message(Some("Body"), Some("Title")).unwrap();
    assert!(probe.calls().is_empty());
    assert!(dialog.session().is_none());
}

#[test]
fn test_show_writes_in_order() {
    let (dialog, probe) = recording_controller();
    let handle = dialog
        .show(
            Some("Uploading"),
            DialogOptions::new().with_header_text("Please wait"),
        )
        .unwrap();

    assert_eq!(
        probe.calls(),
        vec![
            SurfaceCall::Construct(handle),
            SurfaceCall::SetHeader {
                text: "Please wait".to_string(),
                visible: true
            },
            SurfaceCall::SetBody {
                text: "Uploading".to_string(),
                visible: true
            },
            SurfaceCall::Open,
        ]
    );
}

#[test]
fn test_hidden_header_rejects_titles() {
    let (dialog, probe) = recording_controller();
    dialog
        .show(Some("Only body"), DialogOptions::new().with_header_text(false))
        .unwrap();

    assert_eq!(
        dialog.session().unwrap().config.header_text,
        HeaderText::Hidden
    );
    assert!(matches!(
        dialog.message(None, Some("Title")),
        Err(AppError::InvalidState(_))
    ));
    assert_eq!(probe.header(), None);
}

#[test]
fn test_spec_carries_presentational_options() {
    let (dialog, probe) = recording_controller();
    dialog
        .show(
            None,
            DialogOptions::new()
                .with_header_size(1)
                .with_header_class("title")
                .with_dialog_size("sm")
                .with_progress_type("warning")
                .with_content_element("div")
                .with_content_class("detail")
                .with_rtl(false),
        )
        .unwrap();

    let spec = probe.spec().unwrap();
    assert_eq!(spec.header_rank.get(), 1);
    assert_eq!(spec.header_class, "title");
    assert_eq!(spec.dialog_size, "sm");
    assert_eq!(spec.progress_type, "warning");
    assert_eq!(spec.content_element, "div");
    assert_eq!(spec.content_class, "detail");
    assert!(!spec.rtl);
}

#[test]
fn test_controller_clones_share_the_session() {
    let (dialog, _) = recording_controller();
    let other = dialog.clone();
    dialog.show(Some("Shared"), DialogOptions::default()).unwrap();
    other.set_progress(75).unwrap();
    assert_eq!(dialog.progress(), Some(75));
    other.hide().unwrap();
    assert!(!dialog.is_visible());
}
