use super::*;

fn vp(h: u32) -> Viewport {
    Viewport::new(1600, h).unwrap()
}

fn at(top: f64) -> ScrollMetrics {
    ScrollMetrics::new(top, 4000.0, vp(1000))
}

#[test]
fn mapping_table_for_83_frames() {
    assert_eq!(scroll_progress(&at(0.0)), 0.0);
    assert_eq!(frame_index(&at(0.0), 83), 0);

    assert_eq!(scroll_progress(&at(-3000.0)), 1.0);
    assert_eq!(frame_index(&at(-3000.0), 83), 82);

    assert_eq!(scroll_progress(&at(100.0)), 0.0);
    assert_eq!(frame_index(&at(100.0), 83), 0);

    assert_eq!(scroll_progress(&at(-4500.0)), 1.0);
    assert_eq!(frame_index(&at(-4500.0), 83), 82);
}

#[test]
fn mapping_is_a_floor_step() {
    // 82 steps over 3000px: each frame covers ~36.6px.
    assert_eq!(frame_index(&at(-1500.0), 83), 41);
    assert_eq!(frame_index(&at(-36.0), 83), 0);
    assert_eq!(frame_index(&at(-37.0), 83), 1);
    assert_eq!(frame_index(&at(-2999.0), 83), 81);
}

#[test]
fn mapping_is_monotonic() {
    let mut prev = 0;
    for step in 0..=400 {
        let idx = frame_index(&at(-(step as f64) * 10.0), 83);
        assert!(idx >= prev);
        prev = idx;
    }
    assert_eq!(prev, 82);
}

#[test]
fn single_frame_always_zero() {
    assert_eq!(frame_index(&at(-2000.0), 1), 0);
    assert_eq!(frame_for_progress(1.0, 1), 0);
}

#[test]
fn no_span_is_a_threshold() {
    let m = |top| ScrollMetrics::new(top, 1000.0, vp(1000));
    assert_eq!(scroll_progress(&m(0.0)), 0.0);
    assert_eq!(scroll_progress(&m(50.0)), 0.0);
    assert_eq!(scroll_progress(&m(-1.0)), 1.0);
    assert_eq!(sticky_offset(&m(-1.0)), 0.0);
}

#[test]
fn non_finite_reads_as_start() {
    assert_eq!(scroll_progress(&at(f64::NAN)), 0.0);
    assert_eq!(frame_for_progress(f64::NAN, 10), 0);
    assert_eq!(frame_for_progress(7.0, 10), 9);
}

#[test]
fn sticky_offset_pins_within_span() {
    assert_eq!(sticky_offset(&at(200.0)), 0.0);
    assert_eq!(sticky_offset(&at(-1234.0)), 1234.0);
    assert_eq!(sticky_offset(&at(-9000.0)), 3000.0);
}

#[test]
fn scroll_height_parses_units() {
    assert_eq!(ScrollHeight::parse("4000").unwrap(), ScrollHeight::Px(4000.0));
    assert_eq!(
        ScrollHeight::parse("4000px").unwrap(),
        ScrollHeight::Px(4000.0)
    );
    assert_eq!(
        "400vh".parse::<ScrollHeight>().unwrap(),
        ScrollHeight::Viewports(4.0)
    );
    assert!(ScrollHeight::parse("tall").is_err());
    assert!(ScrollHeight::parse("-5px").is_err());
}

#[test]
fn scroll_height_resolves_against_viewport() {
    assert_eq!(ScrollHeight::Viewports(4.0).resolve(vp(1000)), 4000.0);
    assert_eq!(ScrollHeight::Px(2500.0).resolve(vp(1000)), 2500.0);
}
