use anyhow::{Context, Result};
use std::io::Cursor;
use std::path::{Path, PathBuf};

fn pcm_spec(sample_rate: u32, channels: u16) -> hound::WavSpec {
    hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Encode samples into an in-memory WAV container.
///
/// The recognition service auto-detects the encoding, so every window is sent
/// as a self-describing WAV payload rather than raw PCM.
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = Cursor::new(Vec::new());

    let mut writer = hound::WavWriter::new(&mut cursor, pcm_spec(sample_rate, channels))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

/// Write a drained capture to `<dir>/<capture_id>.wav`.
pub fn archive_capture(
    dir: &Path,
    capture_id: &str,
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create recordings directory: {}", dir.display()))?;

    let path = dir.join(format!("{capture_id}.wav"));

    let mut writer = hound::WavWriter::create(&path, pcm_spec(sample_rate, channels))
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .context("Failed to write sample to WAV")?;
    }
    writer.finalize().context("Failed to finalize WAV file")?;

    Ok(path)
}
