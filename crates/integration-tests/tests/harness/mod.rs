//! Shared fixtures; each test binary uses a subset
#![allow(dead_code)]

pub mod config;
pub mod engine;
pub mod mock_cdn;
pub mod mock_tts;
