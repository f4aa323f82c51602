//! Controller driven by the tokio tick source on a paused clock

use std::{sync::Arc, time::Duration};

use countdown_timer::{TimerController, TimerEvent, TimerState, TokioTickSource};
use tokio::time::sleep;

fn controller(seconds: u32) -> TimerController {
    TimerController::with_state(
        Arc::new(TokioTickSource::new()),
        TimerState::with_duration(0, 0, seconds),
        1000,
    )
}

#[tokio::test(start_paused = true)]
async fn test_countdown_finishes_on_time() {
    let controller = controller(5);
    let mut events = controller.events();
    controller.start().unwrap();

    let mut ticks = Vec::new();
    loop {
        match events.recv().await.unwrap() {
            TimerEvent::Tick { remaining_ms, .. } => ticks.push(remaining_ms),
            TimerEvent::Finished => break,
            _ => {}
        }
    }

    assert_eq!(ticks, vec![4000, 3000, 2000, 1000, 0]);
    let state = controller.state().unwrap();
    assert!(!state.is_running);
    assert_eq!(state.progress, 1.0);
    assert_eq!(state.formatted_time, "00:00:00");
}

#[tokio::test(start_paused = true)]
async fn test_no_ticks_after_cancel() {
    let controller = controller(10);
    let mut rx = controller.subscribe();
    controller.start().unwrap();

    sleep(Duration::from_millis(3500)).await;
    let cancelled = controller.cancel().unwrap();
    assert_eq!(cancelled.formatted_time, "00:00:07");
    let _ = rx.borrow_and_update();

    sleep(Duration::from_secs(30)).await;
    assert!(!rx.has_changed().unwrap());
    assert_eq!(controller.state().unwrap(), cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_watch_receiver_tracks_progress() {
    let controller = controller(4);
    let mut rx = controller.subscribe();
    controller.start().unwrap();

    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_running);

    rx.changed().await.unwrap();
    let first_tick = rx.borrow_and_update().clone();
    assert_eq!(first_tick.formatted_time, "00:00:03");
    assert!((first_tick.progress - 0.75).abs() < 1e-6);
}
