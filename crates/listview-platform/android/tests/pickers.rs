use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::task::{Context, Poll};

use chrono::NaiveDate;
use futures::executor::{block_on, LocalPool};
use futures::task::{noop_waker, LocalSpawnExt};
use listview_platform_android::pickers::{
    ACTION_KEY, DATE_SET_ACTION, DISMISSED_ACTION, TIME_SET_ACTION,
};
use listview_platform_android::{
    DatePicker, DatePickerOptions, DatePickerResult, NativeMap, NativeRejection, PickerError,
    TimePicker, TimePickerOptions, TimePickerResult,
};
use listview_testing::FakeNativeDialogModule;

#[test]
fn time_picker_waits_for_the_dialog_to_close() {
    let module = FakeNativeDialogModule::new();
    let picker = TimePicker::new(module.clone());
    let result: Rc<RefCell<Option<Result<TimePickerResult, PickerError>>>> = Rc::default();

    let mut pool = LocalPool::new();
    let sink = Rc::clone(&result);
    pool.spawner()
        .spawn_local(async move {
            let picked = picker
                .open(TimePickerOptions::new().hour(9).minute(15).is_24_hour(true))
                .await;
            *sink.borrow_mut() = Some(picked);
        })
        .expect("spawn picker");

    pool.run_until_stalled();
    assert_eq!(module.pending_dialogs(), 1);
    assert!(result.borrow().is_none());

    let requests = module.requests();
    let request = &requests[0];
    assert_eq!(request.get_int("hour"), Some(9));
    assert_eq!(request.get_int("minute"), Some(15));
    assert_eq!(request.get_bool("is24Hour"), Some(true));

    assert!(module.resolve_next(Ok(NativeMap::new()
        .with(ACTION_KEY, TIME_SET_ACTION)
        .with("hour", 10i32)
        .with("minute", 45i32))));
    pool.run_until_stalled();

    assert_eq!(
        *result.borrow(),
        Some(Ok(TimePickerResult::TimeSet { hour: 10, minute: 45 }))
    );
    assert_eq!(module.pending_dialogs(), 0);
}

#[test]
fn queued_dismissal_resolves_immediately() {
    let module = FakeNativeDialogModule::new();
    module.reply_with(Ok(NativeMap::new().with(ACTION_KEY, DISMISSED_ACTION)));
    let picker = DatePicker::new(module.clone());

    let result = block_on(picker.open(DatePickerOptions::new()));
    assert_eq!(result, Ok(DatePickerResult::Dismissed));
    assert_eq!(module.requests()[0].get_str("mode"), Some("default"));
}

#[test]
fn date_picker_converts_months() {
    let module = FakeNativeDialogModule::new();
    module.reply_with(Ok(NativeMap::new()
        .with(ACTION_KEY, DATE_SET_ACTION)
        .with("year", 2021i32)
        .with("month", 11i32)
        .with("day", 31i32)));
    let picker = DatePicker::new(module.clone());

    let result = block_on(picker.open(DatePickerOptions::new()))
        .expect("date set");
    assert_eq!(result.date(), NaiveDate::from_ymd_opt(2021, 12, 31));
}

#[test]
fn rejections_and_torn_down_dialogs_are_errors() {
    let module = FakeNativeDialogModule::new();
    module.reply_with(Err(NativeRejection::new("E_ACTIVITY_DOES_NOT_EXIST", "no activity")));
    let picker = TimePicker::new(module.clone());

    let result = block_on(picker.open(TimePickerOptions::new()));
    assert!(matches!(
        result,
        Err(PickerError::Rejected(NativeRejection { ref code, .. })) if code == "E_ACTIVITY_DOES_NOT_EXIST"
    ));

    let mut pending = Box::pin(picker.open(TimePickerOptions::new()));
    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    assert!(pending.as_mut().poll(&mut cx).is_pending());
    assert_eq!(module.pending_dialogs(), 1);

    assert_eq!(module.tear_down(), 1);
    match pending.as_mut().poll(&mut cx) {
        Poll::Ready(Err(PickerError::Rejected(rejection))) => {
            assert_eq!(rejection.code, "E_DIALOG_DROPPED");
        }
        other => panic!("expected a dropped dialog, got {other:?}"),
    }
}
