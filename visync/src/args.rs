use std::path::PathBuf;

use clap::{Parser, Subcommand};
use visync_core::{Emotion, SpeechContext};

/// Lip-synced talking avatar engine
#[derive(Debug, Parser)]
#[command(name = "visync", about = "Drive a talking avatar from synthesized speech")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "visync.toml", env = "VISYNC_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Speak text through the engine, logging frame changes
    Speak {
        text: String,

        #[arg(long)]
        speaker: Option<String>,

        /// happy, serious or excited
        #[arg(long)]
        emotion: Option<Emotion>,

        /// teaching, question or emphasis
        #[arg(long)]
        context: Option<SpeechContext>,

        /// Restrict to the basic viseme set
        #[arg(long)]
        basic: bool,

        /// Play through the default audio device (needs the `rodio` feature)
        #[arg(long)]
        audio: bool,
    },

    /// Print the heuristic timeline for text
    Timeline {
        text: String,

        /// Reported duration in seconds, 0 to estimate from the text
        #[arg(long, default_value_t = 0.0)]
        duration: f64,

        #[arg(long)]
        basic: bool,
    },

    /// Warm the frame cache for a speaker and report what was found
    Preload {
        #[arg(long)]
        speaker: Option<String>,

        #[arg(long)]
        basic: bool,
    },
}
