use std::path::Path;

use framescan_core::config::AnalysisConfig;
use framescan_core::fade::FadeBoundary;
use framescan_core::job::{JobEvent, JobKind, JobRequest, MessageLevel};
use framescan_core::retrieval::{RetrievalMode, ThumbRequest};
use framescan_core::source::SeekTarget;
use framescan_media::error::MediaError;
use framescan_media::session::Session;
use framescan_test_harness::assertions::{assert_progress_monotonic, assert_single_terminal};
use framescan_test_harness::builders::SyntheticSourceBuilder;
use framescan_test_harness::fixtures;
use framescan_test_harness::recorder::RecordingSink;
use framescan_test_harness::synthetic::SyntheticOpener;
use uuid::Uuid;

const CLIP: &str = "/media/clip.mp4";
const OTHER: &str = "/media/other.mp4";

fn fade_job(path: &str) -> JobRequest {
    JobRequest::new(
        Uuid::new_v4(),
        path,
        JobKind::FadeBoundary {
            use_ratio: false,
            detect: true,
            threshold: None,
        },
    )
}

fn poster_job(path: &str) -> JobRequest {
    JobRequest::new(
        Uuid::new_v4(),
        path,
        JobKind::PosterFrame {
            poster_frame_id: Uuid::new_v4(),
        },
    )
}

fn faded(frame_count: u64) -> SyntheticSourceBuilder {
    SyntheticSourceBuilder::new(frame_count).brightness(move |f| {
        if (10..frame_count - 10).contains(&f) {
            100
        } else {
            0
        }
    })
}

#[test]
fn test_open_failure_is_reported() {
    let session = Session::new(SyntheticOpener::new(), AnalysisConfig::default());
    let sink = RecordingSink::new();
    let request = fade_job("/media/missing.mp4");

    let err = session.run(&request, &sink).unwrap_err();
    assert!(err.is_open_error());
    assert!(matches!(err, MediaError::Core(_) | MediaError::OpenFailed(_)));

    let errors = sink.messages(MessageLevel::Error);
    assert_eq!(errors, vec!["Failed to open /media/missing.mp4".to_string()]);
    assert_eq!(
        sink.terminal_events(),
        vec![JobEvent::OpenFailed {
            source_id: request.source_id
        }]
    );
    assert_eq!(session.open_count(), 0);
}

#[test]
fn test_file_details() {
    let builder = SyntheticSourceBuilder::new(250)
        .resolution(1920, 1080)
        .fps(25.0)
        .codec("mp4v");
    let session = Session::new(
        SyntheticOpener::new().with_source(CLIP, builder),
        AnalysisConfig::default(),
    );
    let sink = RecordingSink::new();
    let poster_frame_id = Uuid::new_v4();
    let request = JobRequest::new(Uuid::new_v4(), CLIP, JobKind::FileDetails { poster_frame_id });
    session.run(&request, &sink).unwrap();

    let details = sink.file_details().unwrap();
    assert_eq!(details.frame_count, 250);
    assert_eq!((details.width, details.height), (1920, 1080));
    assert_eq!(details.fps, 25.0);
    assert_eq!(details.codec_tag, "mp4v");

    match &sink.events()[0] {
        JobEvent::FileDetails {
            path,
            poster_frame_id: id,
            ..
        } => {
            assert_eq!(path, Path::new(CLIP));
            assert_eq!(*id, poster_frame_id);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_source_is_reused_between_jobs() {
    let session = Session::new(
        SyntheticOpener::new().with_source(CLIP, faded(200)),
        AnalysisConfig::default(),
    );
    let sink = RecordingSink::new();
    session.run(&fade_job(CLIP), &sink).unwrap();
    session.run(&poster_job(CLIP), &sink).unwrap();
    assert_eq!(session.open_count(), 1);
    assert!(session.is_open(Path::new(CLIP)));
}

#[test]
fn test_drift_flag_persists_across_jobs() {
    let builder = faded(200).drift(3);
    let seeks = builder.seek_log();
    let session = Session::new(
        SyntheticOpener::new().with_source(CLIP, builder),
        AnalysisConfig::default(),
    );
    let sink = RecordingSink::new();

    session.run(&poster_job(CLIP), &sink).unwrap();
    let (_, _, uses_ratio) = sink.poster_frame().unwrap();
    assert!(uses_ratio);
    assert_eq!(session.uses_ratio_seek(Path::new(CLIP)), Some(true));

    let poster_seeks = seeks.len();
    session.run(&fade_job(CLIP), &sink).unwrap();
    let later = &seeks.calls()[poster_seeks..];
    assert!(!later.is_empty());
    assert!(later.iter().all(|s| matches!(s, SeekTarget::Ratio(_))));
    assert_eq!(sink.fade_boundary(), Some(FadeBoundary::new(10, 189)));
}

#[test]
fn test_close_resets_seek_state() {
    let session = Session::new(
        SyntheticOpener::new().with_source(CLIP, faded(200).drift(3)),
        AnalysisConfig::default(),
    );
    let sink = RecordingSink::new();
    session.run(&poster_job(CLIP), &sink).unwrap();
    assert_eq!(session.uses_ratio_seek(Path::new(CLIP)), Some(true));

    assert!(session.close(Path::new(CLIP)));
    assert!(!session.close(Path::new(CLIP)));
    assert_eq!(session.uses_ratio_seek(Path::new(CLIP)), None);

    session.run(&fade_job(CLIP), &sink).unwrap();
    assert_eq!(session.uses_ratio_seek(Path::new(CLIP)), Some(false));
}

#[test]
fn test_decoder_fault_fails_job() {
    let session = Session::new(
        SyntheticOpener::new().with_source(CLIP, faded(200).fault_at(5)),
        AnalysisConfig::default(),
    );
    let sink = RecordingSink::new();
    let request = fade_job(CLIP);

    assert!(session.run(&request, &sink).is_err());
    let events = sink.events();
    assert!(matches!(events.last(), Some(JobEvent::JobFailed { .. })));
    assert_single_terminal(&events, request.source_id);

    let errors = sink.messages(MessageLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("fade-boundary failed"));
}

#[test]
fn test_each_job_ends_with_one_terminal_event() {
    let session = Session::new(
        SyntheticOpener::new().with_source(CLIP, faded(120)),
        AnalysisConfig::default(),
    );
    let sink = RecordingSink::new();
    let requests = vec![
        poster_job(CLIP),
        fade_job(CLIP),
        JobRequest::new(
            Uuid::new_v4(),
            CLIP,
            JobKind::SceneScan {
                use_ratio: false,
                threshold: Some(10.0),
            },
        ),
    ];
    for request in &requests {
        sink.clear();
        session.run(request, &sink).unwrap();
        let events = sink.events();
        assert_single_terminal(&events, request.source_id);
        assert_progress_monotonic(&events, request.source_id);
    }
}

#[test]
fn test_empty_thumb_request_warns() {
    let session = Session::new(
        SyntheticOpener::new().with_source(CLIP, faded(120)),
        AnalysisConfig::default(),
    );
    let sink = RecordingSink::new();
    let request = JobRequest::new(
        Uuid::new_v4(),
        CLIP,
        JobKind::Thumbs {
            requests: Vec::new(),
            use_ratio: false,
            mode: RetrievalMode::RetrySearch,
        },
    );
    session.run(&request, &sink).unwrap();
    assert_eq!(sink.messages(MessageLevel::Warning), vec!["No frames requested"]);
    assert!(sink.thumbs().is_empty());
}

#[test]
fn test_thumbs_through_session() {
    let session = Session::new(
        SyntheticOpener::new().with_source(CLIP, faded(120)),
        AnalysisConfig::default(),
    );
    let sink = RecordingSink::new();
    let requests: Vec<ThumbRequest> = [5, 60, 110].into_iter().map(ThumbRequest::new).collect();
    let request = JobRequest::new(
        Uuid::new_v4(),
        CLIP,
        JobKind::Thumbs {
            requests: requests.clone(),
            use_ratio: false,
            mode: RetrievalMode::RetrySearch,
        },
    );
    session.run(&request, &sink).unwrap();

    let thumbs = sink.thumbs();
    assert_eq!(thumbs.len(), 3);
    for (thumb, req) in thumbs.iter().zip(&requests) {
        assert_eq!(thumb.thumb_id, req.thumb_id);
        assert_eq!(thumb.actual_frame, req.target_frame);
    }
    assert_single_terminal(&sink.events(), request.source_id);
}

#[test]
fn test_run_all_keeps_per_file_order() {
    let clip = faded(150);
    let other = faded(90);
    let clip_seeks = clip.seek_log();
    let session = Session::new(
        SyntheticOpener::new()
            .with_source(CLIP, clip)
            .with_source(OTHER, other),
        AnalysisConfig::default(),
    );
    let sink = RecordingSink::new();

    let requests = vec![
        poster_job(CLIP),
        fade_job(OTHER),
        fade_job(CLIP),
        fade_job("/media/missing.mp4"),
        poster_job(OTHER),
    ];
    let outcomes = session.run_all(&requests, &sink);

    assert_eq!(outcomes.len(), 5);
    assert!(outcomes[0].is_ok());
    assert!(outcomes[1].is_ok());
    assert!(outcomes[2].is_ok());
    assert!(outcomes[3].as_ref().is_err_and(|e| e.is_open_error()));
    assert!(outcomes[4].is_ok());

    // Poster seek comes first on CLIP, then the fade scan.
    assert_eq!(clip_seeks.calls()[0], SeekTarget::Frame(75));
    assert_eq!(session.open_count(), 2);

    let events = sink.events();
    for request in &requests {
        assert_single_terminal(&events, request.source_id);
    }
}

#[test]
fn test_spellings_of_one_file_share_a_source() {
    let dir = fixtures::fixture_dir();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let clip = dir.path().join("clip.mp4");
    std::fs::write(&clip, b"").unwrap();
    let detour = dir.path().join("sub").join("..").join("clip.mp4");

    let builder = faded(200).drift(3);
    // Only the plain spelling can be opened; the detour must reuse that source.
    let session = Session::new(
        SyntheticOpener::new().with_source(&clip, builder),
        AnalysisConfig::default(),
    );
    let sink = RecordingSink::new();

    session.run(&poster_job(clip.to_str().unwrap()), &sink).unwrap();
    session.run(&fade_job(detour.to_str().unwrap()), &sink).unwrap();

    assert_eq!(session.open_count(), 1);
    assert!(session.is_open(&detour));
    assert_eq!(session.uses_ratio_seek(&detour), Some(true));
    assert!(session.close(&detour));
    assert!(!session.is_open(&clip));
}
