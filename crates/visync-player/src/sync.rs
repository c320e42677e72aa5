//! Per-frame sync loop
//!
//! Reads the audio output's clock each frame, looks up the timeline entry
//! and touches the surface only when the entry changes.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use visync_core::{SpeakerId, VisemeId};
use visync_frames::AssetRef;
use visync_timeline::Timeline;

use crate::{audio::AudioStatus, engine::Inner};

/// What the surface currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Shown {
    /// Timeline entry on screen, `None` for the idle rest frame
    pub index: Option<usize>,
    pub viseme: VisemeId,
    pub speaking: bool,
    /// Asset last handed to the surface
    pub frame: Option<AssetRef>,
}

impl Shown {
    pub const REST: Self = Self {
        index: None,
        viseme: VisemeId::Rest,
        speaking: false,
        frame: None,
    };
}

/// One running instance of the loop
pub(crate) struct SyncRun {
    token: CancellationToken,
    running: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SyncRun {
    pub fn spawn(inner: Arc<Inner>, generation: u64, speaker: SpeakerId, timeline: Arc<Timeline>) -> Self {
        let token = CancellationToken::new();
        let running = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn(run(
            inner,
            generation,
            speaker,
            timeline,
            token.clone(),
            running.clone(),
        ));

        Self { token, running, task }
    }

    /// Stop frame updates; the task exits at its next suspension point
    pub fn cancel(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.token.cancel();
    }

    pub fn into_task(self) -> JoinHandle<()> {
        self.task
    }
}

async fn run(
    inner: Arc<Inner>,
    generation: u64,
    speaker: SpeakerId,
    timeline: Arc<Timeline>,
    token: CancellationToken,
    running: Arc<AtomicBool>,
) {
    tracing::debug!(generation, entries = timeline.len(), "sync loop started");

    loop {
        if token.is_cancelled() || !running.load(Ordering::SeqCst) {
            break;
        }

        match inner.audio.status() {
            AudioStatus::Ended => {
                inner.finish(generation, &speaker, None);
                break;
            }
            AudioStatus::Failed(reason) => {
                inner.finish(generation, &speaker, Some(reason));
                break;
            }
            AudioStatus::Idle | AudioStatus::Playing | AudioStatus::Paused => {}
        }

        inner.render(&running, &speaker, &timeline, inner.audio.current_time());

        tokio::select! {
            () = token.cancelled() => break,
            () = inner.scheduler.next_frame() => {}
        }
    }

    tracing::debug!(generation, "sync loop stopped");
}

impl Inner {
    /// Show the entry audible at `time` if it differs from what is shown
    fn render(&self, running: &AtomicBool, speaker: &SpeakerId, timeline: &Timeline, time: f64) {
        let (viseme, index) = timeline.viseme_at(time);

        let mut shown = self.shown();
        // Checked under the lock so a cancelled run never draws
        if !running.load(Ordering::SeqCst) || shown.index == index {
            return;
        }

        let frame = self.frames.frame_for(speaker, viseme);
        self.surface.show_frame(viseme, &frame);

        let speaking = !viseme.is_rest();
        if speaking != shown.speaking {
            self.surface.set_speaking(speaking);
        }

        tracing::trace!(time, viseme = %viseme, ?index, "frame changed");

        *shown = Shown {
            index,
            viseme,
            speaking,
            frame: Some(frame),
        };
    }
}
