// Integration tests for the recording session
//
// These tests verify the session's drain semantics: frames appended between
// start() and stop() come back as one ordered capture, nothing is delivered
// twice, and racing commands stay consistent.

use noting_capture::{RecordingError, RecordingSession};
use std::sync::Arc;
use std::thread;

#[test]
fn stop_returns_appended_frames_in_order() {
    let session = RecordingSession::new(16000, 1);

    session.start();

    // Three 1-second frames at 16kHz, each with a distinct fill value
    for value in 0..3i16 {
        session.append_frame(&vec![value; 16000]);
    }

    let chunk = session.stop().expect("capture should not be empty");

    assert_eq!(chunk.samples.len(), 48000, "3 x 1s at 16kHz = 48000 samples");
    assert_eq!(chunk.sample_rate, 16000);
    assert_eq!(chunk.channels, 1);
    assert!((chunk.duration_seconds() - 3.0).abs() < f64::EPSILON);

    // Frames come back concatenated in append order
    assert!(chunk.samples[..16000].iter().all(|&s| s == 0));
    assert!(chunk.samples[16000..32000].iter().all(|&s| s == 1));
    assert!(chunk.samples[32000..].iter().all(|&s| s == 2));
}

#[test]
fn stop_on_idle_session_fails() {
    let session = RecordingSession::new(16000, 1);

    assert!(matches!(
        session.stop(),
        Err(RecordingError::EmptyRecording)
    ));
}

#[test]
fn stop_on_drained_session_fails() {
    let session = RecordingSession::new(16000, 1);

    session.start();
    session.append_frame(&[1, 2, 3]);
    session.stop().expect("first stop drains the capture");

    // The buffer is empty immediately after a drain
    assert!(matches!(
        session.stop(),
        Err(RecordingError::EmptyRecording)
    ));
}

#[test]
fn frames_outside_recording_are_discarded() {
    let session = RecordingSession::new(16000, 1);

    session.append_frame(&[9; 100]); // before any start
    session.start();
    session.append_frame(&[1; 100]);
    let chunk = session.stop().expect("capture should not be empty");
    session.append_frame(&[9; 100]); // after stop

    assert_eq!(chunk.samples, vec![1; 100]);
    assert_eq!(session.snapshot().buffered_samples, 0);
}

#[test]
fn start_is_idempotent_while_recording() {
    let session = RecordingSession::new(16000, 1);

    session.start();
    session.append_frame(&[1; 100]);
    session.start(); // no-op: must not clear the buffer
    session.append_frame(&[2; 100]);

    let chunk = session.stop().expect("capture should not be empty");
    assert_eq!(chunk.samples.len(), 200);
}

#[test]
fn start_clears_stale_state_for_a_new_session() {
    let session = RecordingSession::new(16000, 1);

    session.start();
    session.append_frame(&[1; 100]);
    session.stop().expect("drain first capture");

    session.start();
    session.append_frame(&[2; 50]);
    let chunk = session.stop().expect("capture should not be empty");

    assert_eq!(chunk.samples, vec![2; 50]);
}

#[test]
fn snapshot_reflects_session_state() {
    let session = RecordingSession::new(16000, 1);

    let idle = session.snapshot();
    assert!(!idle.recording);
    assert_eq!(idle.buffered_samples, 0);
    assert!(idle.started_at.is_none());

    session.start();
    session.append_frame(&[0; 8000]);

    let recording = session.snapshot();
    assert!(recording.recording);
    assert_eq!(recording.buffered_samples, 8000);
    assert!((recording.buffered_seconds - 0.5).abs() < f64::EPSILON);
    assert!(recording.started_at.is_some());

    session.stop().expect("drain");
    assert!(!session.snapshot().recording);
}

#[test]
fn concurrent_stops_yield_exactly_one_drain() {
    let session = Arc::new(RecordingSession::new(16000, 1));

    session.start();
    session.append_frame(&[7; 1600]);

    let mut handles = Vec::new();
    for _ in 0..2 {
        let session = Arc::clone(&session);
        handles.push(thread::spawn(move || session.stop()));
    }

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let drained: Vec<_> = outcomes.iter().filter(|r| r.is_ok()).collect();

    assert_eq!(drained.len(), 1, "exactly one stop observes the capture");
    let chunk = outcomes.into_iter().flatten().next().unwrap();
    assert_eq!(chunk.samples, vec![7; 1600]);
}

#[test]
fn producer_frames_are_never_torn_by_a_racing_stop() {
    const FRAME_LEN: usize = 160;

    let session = Arc::new(RecordingSession::new(16000, 1));
    session.start();

    // A producer thread appends numbered frames while the main thread stops
    // mid-stream. Every drained frame must be whole and in sequence.
    let producer_session = Arc::clone(&session);
    let producer = thread::spawn(move || {
        for value in 0..500i16 {
            producer_session.append_frame(&vec![value; FRAME_LEN]);
        }
    });

    thread::sleep(std::time::Duration::from_millis(2));
    let chunk = match session.stop() {
        Ok(chunk) => chunk,
        // The stop may have raced ahead of the first append; drain the rest.
        Err(RecordingError::EmptyRecording) => {
            producer.join().unwrap();
            return;
        }
    };
    producer.join().unwrap();

    assert_eq!(
        chunk.samples.len() % FRAME_LEN,
        0,
        "no frame may be split across the drain"
    );
    for (index, frame) in chunk.samples.chunks_exact(FRAME_LEN).enumerate() {
        assert!(
            frame.iter().all(|&s| s == index as i16),
            "frame {} out of order or torn",
            index
        );
    }
}
