use super::*;

fn settle(frame_count: u32, loaded: u32, failed: u32) -> PreloadState {
    let mut s = PreloadState::new(frame_count);
    for i in 0..loaded {
        s = s.apply(PreloadEvent::FrameLoaded(i));
    }
    for i in loaded..loaded + failed {
        s = s.apply(PreloadEvent::FrameFailed(i));
    }
    s
}

#[test]
fn ready_when_every_frame_loaded() {
    let s = settle(41, 41, 0);
    assert!(s.is_ready());
    assert_eq!(s.progress_percent(), 100);
    assert_eq!(s.error_message(), None);
}

#[test]
fn ready_with_partial_failures_once_settled() {
    let s = settle(41, 21, 20);
    assert!(s.is_ready());
    assert_eq!(s.error_message(), None);
}

#[test]
fn never_ready_when_everything_failed() {
    let s = settle(41, 0, 41);
    assert!(s.is_settled());
    assert!(!s.is_ready());
    assert_eq!(s.error_message(), Some(MAJORITY_FAILURE_MESSAGE));
}

#[test]
fn not_ready_until_settled() {
    let s = settle(41, 40, 0);
    assert!(!s.is_ready());
    assert_eq!(s.progress_percent(), 97);
}

#[test]
fn majority_failure_threshold_is_strictly_above_half() {
    assert_eq!(settle(41, 0, 20).error_message(), None);
    assert_eq!(
        settle(41, 0, 21).error_message(),
        Some(MAJORITY_FAILURE_MESSAGE)
    );
    // Exactly half of an even count is not a majority.
    assert_eq!(settle(10, 0, 5).error_message(), None);
    assert!(settle(10, 0, 6).error_message().is_some());
}

#[test]
fn error_is_sticky_and_does_not_block_ready() {
    let s = settle(3, 1, 2);
    assert!(s.error_message().is_some());
    assert!(s.is_ready());
}

#[test]
fn progress_floors() {
    let s = settle(3, 1, 0);
    assert_eq!(s.progress_percent(), 33);
    let s = settle(3, 1, 1);
    assert_eq!(s.progress_percent(), 66);
    assert_eq!(PreloadState::new(7).progress_percent(), 0);
}

#[test]
fn settlement_order_does_not_matter() {
    let mut a = PreloadState::new(4);
    for e in [
        PreloadEvent::FrameFailed(3),
        PreloadEvent::FrameLoaded(0),
        PreloadEvent::FrameLoaded(2),
        PreloadEvent::FrameLoaded(1),
    ] {
        a = a.apply(e);
    }
    assert!(a.is_ready());
    assert_eq!(a.slot(3), Some(SlotStatus::Failed));
    assert_eq!(a.slot(2), Some(SlotStatus::Loaded));
}

#[test]
fn repeated_or_out_of_range_events_are_ignored() {
    let s = PreloadState::new(2)
        .apply(PreloadEvent::FrameLoaded(0))
        .apply(PreloadEvent::FrameLoaded(0))
        .apply(PreloadEvent::FrameFailed(0))
        .apply(PreloadEvent::FrameFailed(9));
    assert_eq!(s.loaded_count(), 1);
    assert_eq!(s.failed_count(), 0);
    assert_eq!(s.slot(0), Some(SlotStatus::Loaded));
    assert_eq!(s.slot(1), Some(SlotStatus::Pending));
    assert_eq!(s.slot(9), None);
}

#[test]
fn single_frame_sequence() {
    assert!(settle(1, 1, 0).is_ready());
    let failed = settle(1, 0, 1);
    assert!(!failed.is_ready());
    assert!(failed.error_message().is_some());
}

#[test]
fn empty_state_is_never_ready() {
    let empty = PreloadState::new(0);
    assert!(empty.is_settled());
    assert!(!empty.is_ready());
    assert_eq!(empty.progress_percent(), 0);
}
