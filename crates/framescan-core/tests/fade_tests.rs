use framescan_core::color::ColorVector;
use framescan_core::fade::{
    search_length, resolve_in_point, resolve_out_point, FadeBoundary, FadeScan, FadeStep,
};
use framescan_core::sample::FrameSample;

fn samples(start: u64, values: &[f64]) -> Vec<FrameSample> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| FrameSample::new(start + i as u64, ColorVector::gray(*v)))
        .collect()
}

#[test]
fn test_in_point_falls_back_to_brightest_frame() {
    let s = samples(0, &[1.0, 4.0, 12.0, 7.0, 3.0]);
    assert_eq!(resolve_in_point(&s, 20.0), 2);
}

#[test]
fn test_in_point_takes_first_crossing_not_highest() {
    let s = samples(0, &[0.0, 5.0, 25.0, 90.0, 80.0]);
    assert_eq!(resolve_in_point(&s, 20.0), 2);
}

#[test]
fn test_threshold_must_be_exceeded_to_resolve() {
    // Equal to the threshold is not a crossing; the brightest frame wins instead.
    let s = samples(0, &[0.0, 20.0, 10.0]);
    assert_eq!(resolve_in_point(&s, 20.0), 1);
}

#[test]
fn test_out_point_scans_right_to_left() {
    let s = samples(50, &[60.0, 60.0, 45.0, 10.0, 0.0]);
    assert_eq!(resolve_out_point(&s, 20.0, 54), 52);
}

#[test]
fn test_out_point_fallback_to_brightest() {
    let s = samples(50, &[3.0, 9.0, 2.0, 1.0]);
    assert_eq!(resolve_out_point(&s, 20.0, 53), 51);
}

#[test]
fn test_empty_samples_resolve_to_source_ends() {
    assert_eq!(resolve_in_point(&[], 20.0), 0);
    assert_eq!(resolve_out_point(&[], 20.0, 99), 99);
}

#[test]
fn test_undecodable_samples_are_ignored() {
    let s = vec![
        FrameSample::empty(0),
        FrameSample::new(1, ColorVector::gray(8.0)),
        FrameSample::empty(2),
    ];
    assert_eq!(resolve_in_point(&s, 20.0), 1);
}

#[test]
fn test_search_length_is_capped_at_half_the_source() {
    assert_eq!(search_length(120, 1000), 120);
    assert_eq!(search_length(120, 100), 50);
    assert_eq!(search_length(120, 1), 0);
}

#[test]
fn test_full_boundary() {
    assert_eq!(FadeBoundary::full(100), FadeBoundary::new(0, 99));
    assert_eq!(FadeBoundary::full(0), FadeBoundary::new(0, 0));
}

#[test]
fn test_boundary_orders_its_ends() {
    let b = FadeBoundary::new(10, 4);
    assert!(b.in_frame <= b.out_frame);
}

/// Brightness 0 for frames 0..=9 and 91..=99, 50 in between.
fn fade_brightness(frame: u64) -> f64 {
    if (10..=90).contains(&frame) { 50.0 } else { 0.0 }
}

#[test]
fn test_fade_scan_end_to_end() {
    let mut scan = FadeScan::new(100, 50, 20.0);
    assert_eq!(scan.start_frame(), 0);

    let mut frame = scan.start_frame();
    let mut repositions = Vec::new();
    loop {
        let step = scan.record(FrameSample::new(frame, ColorVector::gray(fade_brightness(frame))));
        match step {
            FadeStep::Continue => frame += 1,
            FadeStep::Reposition(to) => {
                repositions.push(to);
                frame = to;
            }
            FadeStep::Finished => break,
        }
    }

    // Head stops as soon as frame 10 reaches the threshold.
    assert_eq!(scan.head_samples().len(), 11);
    assert_eq!(repositions, vec![49]);
    assert_eq!(scan.tail_samples().first().unwrap().frame_index, 49);
    assert_eq!(scan.tail_samples().last().unwrap().frame_index, 99);
    assert!(scan.is_finished());
    assert_eq!(scan.boundary(), FadeBoundary::new(10, 90));
}

#[test]
fn test_fade_scan_head_stops_after_search_length() {
    let mut scan = FadeScan::new(1000, 30, 20.0);
    for frame in 0..29 {
        assert_eq!(
            scan.record(FrameSample::new(frame, ColorVector::gray(1.0))),
            FadeStep::Continue
        );
    }
    assert_eq!(
        scan.record(FrameSample::new(29, ColorVector::gray(1.0))),
        FadeStep::Reposition(969)
    );
}

#[test]
fn test_fade_scan_progress_reaches_full() {
    let mut scan = FadeScan::new(10, 100, 20.0);
    assert_eq!(scan.search_length(), 5);
    let mut frame = 0;
    loop {
        match scan.record(FrameSample::new(frame, ColorVector::gray(0.0))) {
            FadeStep::Continue => frame += 1,
            FadeStep::Reposition(to) => frame = to,
            FadeStep::Finished => break,
        }
    }
    assert_eq!(scan.frames_scanned(), 5 + 6);
    assert_eq!(scan.progress_percent(), 100.0);
}

#[test]
fn test_single_frame_source_skips_head_scan() {
    let mut scan = FadeScan::new(1, 120, 20.0);
    assert_eq!(scan.search_length(), 0);
    assert_eq!(scan.start_frame(), 0);
    assert_eq!(
        scan.record(FrameSample::new(0, ColorVector::gray(80.0))),
        FadeStep::Finished
    );
    assert_eq!(scan.boundary(), FadeBoundary::new(0, 0));
}
