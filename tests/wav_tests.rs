// Integration tests for WAV encoding
//
// Recognition payloads must be self-describing containers; the archive path
// must produce a readable file.

use noting_capture::audio::{archive_capture, encode_wav};
use tempfile::TempDir;

#[test]
fn encoded_payload_is_a_readable_wav_container() {
    let samples: Vec<i16> = (0..1600).map(|i| (i % 128) as i16).collect();

    let wav = encode_wav(&samples, 16000, 1).expect("encode should succeed");

    let mut reader =
        hound::WavReader::new(std::io::Cursor::new(wav)).expect("payload must parse as WAV");
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);

    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(decoded, samples);
}

#[test]
fn empty_window_still_produces_a_valid_container() {
    let wav = encode_wav(&[], 16000, 1).expect("encode should succeed");

    let reader = hound::WavReader::new(std::io::Cursor::new(wav)).expect("must parse as WAV");
    assert_eq!(reader.len(), 0);
}

#[test]
fn archive_creates_directory_and_wav_file() {
    let temp_dir = TempDir::new().expect("temp dir");
    let archive_dir = temp_dir.path().join("recordings");

    let samples = vec![42i16; 16000];
    let path = archive_capture(&archive_dir, "capture-test", &samples, 16000, 1)
        .expect("archive should succeed");

    assert!(path.exists());
    assert!(path.to_string_lossy().ends_with("capture-test.wav"));

    let mut reader = hound::WavReader::open(&path).expect("archived file must parse");
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.len(), 16000);
    assert!(reader.samples::<i16>().all(|s| s.unwrap() == 42));
}
