//! Microphone capture via cpal.
//!
//! The device's native format is normalized in the callback: samples are
//! converted to i16, interleaved channels are downmixed to mono, and the
//! stream is decimated down to the target rate.

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};

const FRAME_CHANNEL_CAPACITY: usize = 64;

/// Microphone capture backend.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated thread for
/// the whole capture lifetime; frames cross into async land over a bounded
/// channel.
pub struct MicrophoneBackend {
    config: AudioBackendConfig,
    capturing: Arc<AtomicBool>,
    dropped_frames: Arc<AtomicUsize>,
    stop_tx: Option<std::sync::mpsc::Sender<()>>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl MicrophoneBackend {
    pub fn new(config: AudioBackendConfig) -> Self {
        Self {
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            dropped_frames: Arc::new(AtomicUsize::new(0)),
            stop_tx: None,
            worker: None,
        }
    }

    /// List microphone names so operators can pick the right input.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host.input_devices().context("no input devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }
}

#[async_trait::async_trait]
impl AudioBackend for MicrophoneBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing.load(Ordering::SeqCst) {
            anyhow::bail!("microphone capture already running");
        }

        let (frame_tx, frame_rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let (stop_tx, stop_rx) = std::sync::mpsc::channel::<()>();
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel::<Result<String>>();

        let config = self.config.clone();
        let capturing = Arc::clone(&self.capturing);
        let dropped = Arc::clone(&self.dropped_frames);

        let worker = std::thread::spawn(move || {
            match open_stream(&config, frame_tx, dropped) {
                Ok((stream, device_name)) => {
                    capturing.store(true, Ordering::SeqCst);
                    let _ = ready_tx.send(Ok(device_name));

                    // Block until stop() fires or the backend is dropped.
                    let _ = stop_rx.recv();

                    if let Err(e) = stream.pause() {
                        warn!("Failed to pause input stream: {}", e);
                    }
                    drop(stream);
                    capturing.store(false, Ordering::SeqCst);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            }
        });

        self.stop_tx = Some(stop_tx);
        self.worker = Some(worker);

        let device_name = ready_rx
            .await
            .context("capture thread exited before reporting status")??;

        info!(
            "Microphone capture started on '{}' ({} Hz mono target)",
            device_name, self.config.target_sample_rate
        );

        Ok(frame_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Capture thread panicked during shutdown");
            }
        }

        let dropped = self.dropped_frames.load(Ordering::Relaxed);
        if dropped > 0 {
            warn!("{} audio buffers dropped during capture", dropped);
        }

        info!("Microphone capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

/// Normalizes callback buffers and forwards them as frames.
struct FramePump {
    frames: mpsc::Sender<AudioFrame>,
    dropped: Arc<AtomicUsize>,
    channels: usize,
    device_rate: u32,
    target_rate: u32,
}

impl FramePump {
    fn push<T: Copy>(&self, data: &[T], convert: impl Fn(T) -> i16) {
        let mono = downmix_to_mono(data, self.channels, convert);
        let samples = decimate(mono, self.device_rate, self.target_rate);
        if samples.is_empty() {
            return;
        }

        let frame = AudioFrame {
            samples,
            sample_rate: self.target_rate,
            channels: 1,
        };

        // Never block the audio callback; drop the buffer when the consumer
        // falls behind and account for it.
        if self.frames.try_send(frame).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn open_stream(
    config: &AudioBackendConfig,
    frames: mpsc::Sender<AudioFrame>,
    dropped: Arc<AtomicUsize>,
) -> Result<(cpal::Stream, String)> {
    let host = cpal::default_host();
    let device = match &config.device {
        Some(name) => {
            let mut devices = host.input_devices().context("no input devices available")?;
            devices
                .find(|d| d.name().map(|n| n == *name).unwrap_or(false))
                .ok_or_else(|| anyhow!("input device '{}' not found", name))?
        }
        None => host
            .default_input_device()
            .context("no default input device available")?,
    };
    let device_name = device
        .name()
        .unwrap_or_else(|_| "unknown input device".to_string());

    let default_config = device.default_input_config()?;
    let format = default_config.sample_format();
    let stream_config: StreamConfig = default_config.into();

    let pump = FramePump {
        frames,
        dropped,
        channels: usize::from(stream_config.channels.max(1)),
        device_rate: stream_config.sample_rate.0,
        target_rate: config.target_sample_rate,
    };

    let err_fn = |err| warn!("Audio stream error: {}", err);

    // Convert every supported sample type to i16 up front so the rest of the
    // pipeline stays format-agnostic.
    let stream = match format {
        SampleFormat::I16 => device.build_input_stream(
            &stream_config,
            move |data: &[i16], _| pump.push(data, |sample| sample),
            err_fn,
            None,
        )?,
        SampleFormat::U16 => device.build_input_stream(
            &stream_config,
            move |data: &[u16], _| pump.push(data, |sample| (sample as i32 - 32_768) as i16),
            err_fn,
            None,
        )?,
        SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            move |data: &[f32], _| {
                pump.push(data, |sample| {
                    (sample * 32_767.0).clamp(i16::MIN as f32, i16::MAX as f32) as i16
                })
            },
            err_fn,
            None,
        )?,
        other => return Err(anyhow!("unsupported sample format: {other:?}")),
    };

    stream.play()?;

    Ok((stream, device_name))
}

/// Average interleaved channels down to mono.
fn downmix_to_mono<T: Copy>(data: &[T], channels: usize, convert: impl Fn(T) -> i16) -> Vec<i16> {
    if channels <= 1 {
        return data.iter().map(|&sample| convert(sample)).collect();
    }

    let mut mono = Vec::with_capacity(data.len() / channels + 1);
    for group in data.chunks(channels) {
        let sum: i32 = group.iter().map(|&sample| convert(sample) as i32).sum();
        mono.push((sum / group.len() as i32) as i16);
    }
    mono
}

/// Downsample by decimation: take every Nth sample.
fn decimate(samples: Vec<i16>, device_rate: u32, target_rate: u32) -> Vec<i16> {
    if device_rate <= target_rate {
        return samples; // Can't upsample
    }

    let ratio = (device_rate / target_rate) as usize;
    if ratio <= 1 {
        return samples;
    }

    samples.into_iter().step_by(ratio).collect()
}
