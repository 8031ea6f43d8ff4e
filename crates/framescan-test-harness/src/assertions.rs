use framescan_core::job::JobEvent;
use framescan_core::scene::SceneCutList;
use uuid::Uuid;

/// Assert that cuts strictly increase and keep at least `min_scene_length` between them.
pub fn assert_cuts_spaced(cuts: &SceneCutList, min_scene_length: u64) {
    for pair in cuts.cuts().windows(2) {
        assert!(
            pair[1].frame > pair[0].frame,
            "cuts not increasing: {} then {}",
            pair[0].frame,
            pair[1].frame
        );
        assert!(
            pair[1].frame - pair[0].frame >= min_scene_length,
            "cuts {} and {} closer than {min_scene_length} frames",
            pair[0].frame,
            pair[1].frame
        );
    }
}

/// Assert that progress for one job never goes backwards and stays within 0..=100.
pub fn assert_progress_monotonic(events: &[JobEvent], source_id: Uuid) {
    let mut last = 0.0f64;
    for event in events {
        if let JobEvent::Progress { source_id: id, percent } = event {
            if *id != source_id {
                continue;
            }
            assert!(
                (0.0..=100.0).contains(percent),
                "progress {percent} out of range"
            );
            assert!(*percent >= last, "progress went back from {last} to {percent}");
            last = *percent;
        }
    }
}

/// Assert that a job emitted exactly one terminal event and that it came last.
pub fn assert_single_terminal(events: &[JobEvent], source_id: Uuid) {
    let own: Vec<&JobEvent> = events.iter().filter(|e| e.source_id() == source_id).collect();
    let terminal = own.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminal, 1, "expected one terminal event, got {terminal}: {own:?}");
    assert!(
        own.last().is_some_and(|e| e.is_terminal()),
        "terminal event is not the last one: {own:?}"
    );
}
