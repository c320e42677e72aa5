#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod client;
mod error;
mod http_client;
mod resolver;
mod types;

pub use client::{SpeechClient, SpeechSource};
pub use error::{Result, SpeechError};
pub use resolver::{EndpointResolver, Resolved};
pub use types::{AudioData, AudioFormat, SpeechRequest, SpeechResponse};
