use anyhow::Result;
use clap::Parser;
use noting_capture::audio::{AudioBackend, AudioBackendConfig, MicrophoneBackend};
use noting_capture::speech::{ChunkedTranscriber, CloudSpeechClient, TranscriberConfig};
use noting_capture::summarize::{
    GenerativeClient, HierarchicalSummarizer, SummarizerConfig, TextGenerator, TitleConfig,
    TitleGenerator,
};
use noting_capture::{create_router, AppState, Config, RecordingSession};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "noting-capture", about = "Voice note capture and transcription service")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/noting")]
    config: String,

    /// List available input devices and exit
    #[arg(long)]
    list_devices: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if args.list_devices {
        for name in MicrophoneBackend::list_devices()? {
            println!("{name}");
        }
        return Ok(());
    }

    let cfg = Config::load(&args.config)?;

    info!("{} v0.1.0", cfg.service.name);

    // The recording session is shared between the audio producer and the
    // HTTP command handlers.
    let session = Arc::new(RecordingSession::new(
        cfg.audio.sample_rate,
        cfg.audio.channels,
    ));

    // Open the microphone stream once, for the process lifetime. Frames flow
    // continuously; the session decides whether to keep them.
    let mut backend = MicrophoneBackend::new(AudioBackendConfig {
        target_sample_rate: cfg.audio.sample_rate,
        device: cfg.audio.device.clone(),
    });
    let mut frames = backend.start().await?;

    let producer_session = Arc::clone(&session);
    tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            producer_session.append_frame(&frame.samples);
        }
        info!("Audio producer channel closed");
    });

    let recognizer = Arc::new(CloudSpeechClient::new(&cfg.speech)?);
    if cfg.speech.resolve_api_key().is_none() {
        warn!("No speech API key configured; transcription requests will fail");
    }
    let transcriber = Arc::new(ChunkedTranscriber::new(
        recognizer,
        TranscriberConfig::from(&cfg.speech),
    ));

    let generator: Option<Arc<dyn TextGenerator>> = match cfg.summarizer.resolve_api_key() {
        Some(api_key) => Some(Arc::new(GenerativeClient::new(
            &cfg.summarizer.endpoint,
            api_key,
        )?)),
        None => {
            warn!("No generative API key configured; titles fall back to heuristics");
            None
        }
    };
    let summarizer = Arc::new(HierarchicalSummarizer::new(
        generator.clone(),
        SummarizerConfig::from(&cfg.summarizer),
    ));
    let titles = Arc::new(TitleGenerator::new(
        generator,
        TitleConfig::from(&cfg.summarizer),
    ));

    let state = AppState {
        session,
        transcriber,
        summarizer,
        titles,
        archive_dir: cfg.audio.recordings_path.as_ref().map(PathBuf::from),
    };

    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router).await?;

    backend.stop().await?;

    Ok(())
}
