//! Engine wired to real HTTP clients, a software audio clock and a
//! recording surface

use std::sync::{Arc, Mutex};
use std::time::Duration;

use speech::SpeechClient;
use visync_config::Config;
use visync_core::VisemeId;
use visync_frames::{AssetRef, FrameCache};
use visync_player::{
    AvatarEngine, AvatarSurface, ClockAudio, EngineOptions, IntervalScheduler, PlaybackState,
};

#[derive(Default)]
pub struct RecordingSurface {
    frames: Mutex<Vec<(VisemeId, AssetRef)>>,
    speaking: Mutex<Vec<bool>>,
}

impl RecordingSurface {
    pub fn frames(&self) -> Vec<(VisemeId, AssetRef)> {
        self.frames.lock().unwrap().clone()
    }

    pub fn visemes(&self) -> Vec<VisemeId> {
        self.frames().into_iter().map(|(viseme, _)| viseme).collect()
    }

    pub fn speaking(&self) -> Vec<bool> {
        self.speaking.lock().unwrap().clone()
    }
}

impl AvatarSurface for RecordingSurface {
    fn show_frame(&self, viseme: VisemeId, frame: &AssetRef) {
        self.frames.lock().unwrap().push((viseme, frame.clone()));
    }

    fn set_speaking(&self, speaking: bool) {
        self.speaking.lock().unwrap().push(speaking);
    }
}

pub struct TestEngine {
    pub engine: AvatarEngine,
    pub surface: Arc<RecordingSurface>,
}

impl TestEngine {
    pub fn start(config: &Config) -> Self {
        let surface = Arc::new(RecordingSurface::default());

        let engine = AvatarEngine::new(
            Arc::new(SpeechClient::new(&config.speech)),
            Arc::new(FrameCache::new(config.assets.clone())),
            Arc::new(ClockAudio::new()),
            surface.clone(),
            Arc::new(IntervalScheduler::new(config.player.frame_rate)),
            EngineOptions::from_config(&config.player),
        );

        Self { engine, surface }
    }

    /// Wait until the engine reaches `state`
    pub async fn wait_for(&self, state: PlaybackState) {
        let mut states = self.engine.subscribe();
        tokio::time::timeout(Duration::from_secs(5), states.wait_for(|s| *s == state))
            .await
            .expect("timed out waiting for playback state")
            .expect("engine dropped");
    }
}
