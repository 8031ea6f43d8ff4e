use framescan_core::retrieval::{Probe, RetrySearch, ThumbRequest};

fn frames(search: RetrySearch) -> Vec<u64> {
    search.map(|p| p.frame).collect()
}

#[test]
fn test_probe_starts_at_target() {
    let mut search = RetrySearch::new(20, 1000, 25);
    assert_eq!(search.next(), Some(Probe { offset: 0, frame: 20 }));
}

#[test]
fn test_searches_forward_away_from_end() {
    let search = RetrySearch::new(20, 1000, 25);
    assert!(search.is_forward());
    assert_eq!(frames(search), (20..=45).collect::<Vec<_>>());
}

#[test]
fn test_searches_backward_near_end() {
    let search = RetrySearch::new(990, 1000, 25);
    assert!(!search.is_forward());
    assert_eq!(frames(search), (965..=990).rev().collect::<Vec<_>>());
}

#[test]
fn test_offset_never_exceeds_limit() {
    for target in [0u64, 10, 24, 25, 26, 49, 500, 974, 975, 999] {
        for probe in RetrySearch::new(target, 1000, 25) {
            assert!(probe.offset.unsigned_abs() <= 25, "target {target}: {probe:?}");
        }
    }
}

#[test]
fn test_probes_are_clamped_and_deduplicated() {
    // Short source: the backward walk hits frame 0 and stops there.
    let got = frames(RetrySearch::new(3, 10, 25));
    assert_eq!(got, vec![3, 2, 1, 0]);
}

#[test]
fn test_zero_limit_probes_only_target() {
    assert_eq!(frames(RetrySearch::new(7, 100, 0)), vec![7]);
}

#[test]
fn test_thumb_request_ids_are_unique() {
    let a = ThumbRequest::new(5);
    let b = ThumbRequest::new(5);
    assert_ne!(a.thumb_id, b.thumb_id);
    assert_eq!(a.target_frame, b.target_frame);
}
