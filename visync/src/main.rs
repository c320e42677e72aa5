#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod surface;

use std::sync::Arc;

use args::{Args, Command};
use clap::Parser;
use speech::SpeechClient;
use surface::LogSurface;
use tokio_util::sync::CancellationToken;
use visync_config::Config;
use visync_core::{Emotion, SpeakerId, SpeechContext, VisemeSet};
use visync_frames::FrameCache;
use visync_player::{
    AudioOutput, AvatarEngine, ClockAudio, EngineOptions, IntervalScheduler, PlayOptions, PlaybackState,
};
use visync_timeline::HeuristicSynthesizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config)?;

    visync_telemetry::init(&config.telemetry, "info")?;

    tracing::debug!(config_path = %args.config.display(), "configuration loaded");

    match args.command {
        Command::Speak {
            text,
            speaker,
            emotion,
            context,
            basic,
            audio,
        } => {
            restrict(&mut config, basic);
            speak(&config, &text, speaker, emotion, context, audio).await
        }
        Command::Timeline { text, duration, basic } => {
            restrict(&mut config, basic);
            timeline(&config, &text, duration)
        }
        Command::Preload { speaker, basic } => {
            restrict(&mut config, basic);
            preload(&config, speaker).await
        }
    }
}

fn restrict(config: &mut Config, basic: bool) {
    if basic {
        config.player.viseme_set = VisemeSet::Basic;
    }
}

fn speaker_or_default(config: &Config, speaker: Option<String>) -> SpeakerId {
    speaker.map_or_else(|| SpeakerId::new(&config.player.default_speaker), SpeakerId::from)
}

async fn speak(
    config: &Config,
    text: &str,
    speaker: Option<String>,
    emotion: Option<Emotion>,
    context: Option<SpeechContext>,
    device: bool,
) -> anyhow::Result<()> {
    let engine = AvatarEngine::new(
        Arc::new(SpeechClient::new(&config.speech)),
        Arc::new(FrameCache::new(config.assets.clone())),
        open_audio(device)?,
        Arc::new(LogSurface),
        Arc::new(IntervalScheduler::new(config.player.frame_rate)),
        EngineOptions::from_config(&config.player),
    );

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    let speaker = speaker_or_default(config, speaker);
    let mut states = engine.subscribe();

    tokio::select! {
        result = engine.play(text, Some(speaker), PlayOptions { emotion, context }) => result?,
        () = shutdown.cancelled() => {
            engine.stop();
            return Ok(());
        }
    }

    tracing::info!(
        endpoint = engine.resolved_endpoint().as_deref().unwrap_or("-"),
        duration = engine.duration().unwrap_or_default(),
        entries = engine.timeline_len(),
        "speaking"
    );

    tokio::select! {
        finished = states.wait_for(|s| matches!(s, PlaybackState::Ended | PlaybackState::Error | PlaybackState::Idle)) => {
            finished?;
        }
        () = shutdown.cancelled() => engine.stop(),
    }

    println!("{}", serde_json::to_string_pretty(&engine.viseme_stats())?);

    if let Some(error) = engine.last_error() {
        anyhow::bail!("playback failed: {error}");
    }

    Ok(())
}

fn open_audio(device: bool) -> anyhow::Result<Arc<dyn AudioOutput>> {
    if device {
        #[cfg(feature = "rodio")]
        return Ok(Arc::new(visync_player::RodioAudio::open_default()?));

        #[cfg(not(feature = "rodio"))]
        anyhow::bail!("--audio requires building with the `rodio` feature");
    }

    Ok(Arc::new(ClockAudio::new()))
}

fn timeline(config: &Config, text: &str, duration: f64) -> anyhow::Result<()> {
    let timeline = HeuristicSynthesizer::new(config.player.viseme_set).synthesize(text, duration);
    println!("{}", serde_json::to_string_pretty(&timeline)?);
    Ok(())
}

async fn preload(config: &Config, speaker: Option<String>) -> anyhow::Result<()> {
    let frames = FrameCache::new(config.assets.clone());
    let speaker = speaker_or_default(config, speaker);
    let set = config.player.viseme_set;

    let report = frames.preload(&speaker, set).await;

    println!(
        "{speaker}: {}/{} frames from {}{}",
        report.loaded,
        set.len(),
        report.origin,
        if report.local_fallback { " (local fallback)" } else { "" }
    );
    for viseme in &report.missing {
        println!("  missing {viseme}");
    }

    Ok(())
}

/// Wait for Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutdown signal received");
}
