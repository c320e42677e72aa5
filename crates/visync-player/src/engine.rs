use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use speech::{SpeechRequest, SpeechSource};
use tokio::sync::watch;
use visync_config::PlayerConfig;
use visync_core::{Emotion, SpeakerId, SpeechContext, VisemeClass, VisemeId, VisemeSet};
use visync_frames::FrameCache;
use visync_timeline::{HeuristicSynthesizer, RefinementHints, Timeline, TimelineBuilder, TimelineOrigin};

use crate::{
    audio::{AudioHandle, AudioOutput},
    error::{PlayerError, Result},
    scheduler::FrameScheduler,
    state::{PlaybackState, VisemeStats},
    surface::AvatarSurface,
    sync::{Shown, SyncRun},
};

/// Per-call delivery hints for [`AvatarEngine::play`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayOptions {
    pub emotion: Option<Emotion>,
    pub context: Option<SpeechContext>,
}

/// Engine-wide settings
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub viseme_set: VisemeSet,
    /// Speaker used when `play` is given none
    pub default_speaker: SpeakerId,
}

impl EngineOptions {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            viseme_set: config.viseme_set,
            default_speaker: SpeakerId::new(&config.default_speaker),
        }
    }
}

/// The active (or most recent) playback session
struct Session {
    generation: u64,
    speaker: SpeakerId,
    hints: RefinementHints,
    timeline: Option<Arc<Timeline>>,
    audio: Option<AudioHandle>,
    sync: Option<SyncRun>,
}

pub(crate) struct Inner {
    pub(crate) speech: Arc<dyn SpeechSource>,
    pub(crate) frames: Arc<FrameCache>,
    pub(crate) audio: Arc<dyn AudioOutput>,
    pub(crate) surface: Arc<dyn AvatarSurface>,
    pub(crate) scheduler: Arc<dyn FrameScheduler>,
    options: EngineOptions,
    /// Bumped by every `play` and `stop`; setup steps compare against it
    generation: AtomicU64,
    session: Mutex<Option<Session>>,
    shown: Mutex<Shown>,
    /// Serializes attaching audio to the shared output
    attach: tokio::sync::Mutex<()>,
    state: watch::Sender<PlaybackState>,
    last_error: Mutex<Option<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    pub(crate) fn shown(&self) -> MutexGuard<'_, Shown> {
        lock(&self.shown)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn ensure_current(&self, generation: u64) -> Result<()> {
        if self.is_current(generation) {
            Ok(())
        } else {
            Err(PlayerError::Superseded)
        }
    }

    fn set_state(&self, state: PlaybackState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            tracing::debug!(from = %previous, to = %state, "playback state changed");
        }
    }

    fn show_rest(&self, speaker: &SpeakerId) {
        let mut shown = self.shown();
        let frame = self.frames.frame_for(speaker, VisemeId::Rest);
        self.surface.show_frame(VisemeId::Rest, &frame);
        self.surface.set_speaking(false);
        *shown = Shown {
            frame: Some(frame),
            ..Shown::REST
        };
    }

    /// Redraw the idle rest frame when preloading changed the asset it
    /// resolves to
    fn refresh_rest(&self, speaker: &SpeakerId) {
        let mut shown = self.shown();
        if shown.index.is_some() {
            return;
        }

        let frame = self.frames.frame_for(speaker, VisemeId::Rest);
        if shown.frame.as_ref() == Some(&frame) {
            return;
        }

        self.surface.show_frame(VisemeId::Rest, &frame);
        shown.frame = Some(frame);
    }

    /// Cancel a loop run and wait out any frame it is drawing
    fn cancel_run(&self, run: &SyncRun) {
        run.cancel();
        drop(self.shown());
    }

    /// Cancel the loop and give back the audio resources of `session`
    fn teardown(&self, session: &mut Session) -> Option<tokio::task::JoinHandle<()>> {
        let task = session.sync.take().map(|run| {
            self.cancel_run(&run);
            run.into_task()
        });

        self.audio.stop();
        if let Some(handle) = session.audio.take() {
            self.audio.release(handle);
        }

        task
    }

    /// Terminal transition reported by the sync loop of `generation`
    pub(crate) fn finish(&self, generation: u64, speaker: &SpeakerId, failure: Option<String>) {
        let mut guard = lock(&self.session);
        let Some(session) = guard.as_mut().filter(|s| s.generation == generation) else {
            return;
        };
        if let Some(run) = session.sync.take() {
            run.cancel();
        }

        self.show_rest(speaker);

        match failure {
            None => {
                tracing::info!(speaker = %speaker, "playback ended");
                self.set_state(PlaybackState::Ended);
            }
            Some(reason) => {
                tracing::error!(speaker = %speaker, error = %reason, "playback failed");
                self.audio.stop();
                *lock(&self.last_error) = Some(reason);
                self.set_state(PlaybackState::Error);
            }
        }
    }
}

/// Caller-owned talking-avatar engine
///
/// Cloning yields another handle to the same engine. At most one session
/// is active; `play` tears down its predecessor first.
#[derive(Clone)]
pub struct AvatarEngine {
    inner: Arc<Inner>,
}

impl AvatarEngine {
    pub fn new(
        speech: Arc<dyn SpeechSource>,
        frames: Arc<FrameCache>,
        audio: Arc<dyn AudioOutput>,
        surface: Arc<dyn AvatarSurface>,
        scheduler: Arc<dyn FrameScheduler>,
        options: EngineOptions,
    ) -> Self {
        let (state, _) = watch::channel(PlaybackState::Idle);

        Self {
            inner: Arc::new(Inner {
                speech,
                frames,
                audio,
                surface,
                scheduler,
                options,
                generation: AtomicU64::new(0),
                session: Mutex::new(None),
                shown: Mutex::new(Shown::REST),
                attach: tokio::sync::Mutex::new(()),
                state,
                last_error: Mutex::new(None),
            }),
        }
    }

    /// Speak `text` as `speaker` (the default speaker when `None`)
    ///
    /// Returns once audio is playing and the sync loop runs. Setup
    /// failures leave the engine `Idle` with the avatar at rest.
    pub async fn play(&self, text: &str, speaker: Option<SpeakerId>, options: PlayOptions) -> Result<()> {
        let inner = &self.inner;
        let speaker = speaker.unwrap_or_else(|| inner.options.default_speaker.clone());
        let hints = RefinementHints {
            emotion: options.emotion,
            context: options.context,
        };

        let (generation, previous) = {
            let mut guard = lock(&inner.session);
            // Bumped under the session lock so the counter and the
            // installed session always agree
            let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let task = guard.as_mut().and_then(|session| inner.teardown(session));
            *guard = Some(Session {
                generation,
                speaker: speaker.clone(),
                hints,
                timeline: None,
                audio: None,
                sync: None,
            });
            inner.show_rest(&speaker);
            *lock(&inner.last_error) = None;
            inner.surface.set_loading(true);
            inner.set_state(PlaybackState::Loading);
            (generation, task)
        };
        if let Some(task) = previous {
            let _ = task.await;
        }

        tracing::info!(speaker = %speaker, chars = text.chars().count(), generation, "starting playback");

        let result = self.setup(generation, text, &speaker, hints).await;

        {
            let _guard = lock(&inner.session);
            if inner.is_current(generation) {
                inner.surface.set_loading(false);
            }
        }

        match result {
            Ok(()) => Ok(()),
            Err(PlayerError::Superseded) => {
                tracing::debug!(generation, "playback superseded during setup");
                Err(PlayerError::Superseded)
            }
            Err(e) => {
                let guard = lock(&inner.session);
                if inner.is_current(generation) {
                    tracing::error!(speaker = %speaker, error = %e, "playback setup failed");
                    *lock(&inner.last_error) = Some(e.to_string());
                    inner.show_rest(&speaker);
                    inner.set_state(PlaybackState::Idle);
                }
                drop(guard);
                Err(e)
            }
        }
    }

    async fn setup(&self, generation: u64, text: &str, speaker: &SpeakerId, hints: RefinementHints) -> Result<()> {
        let inner = &self.inner;
        let set = inner.options.viseme_set;

        let request = SpeechRequest::new(text, speaker.clone());
        let response = inner.speech.synthesize(&request).await?;
        inner.ensure_current(generation)?;

        let builder = TimelineBuilder::new(set).with_hints(hints);
        let synthesizer = HeuristicSynthesizer::new(set);
        let mut timeline = visync_timeline::plan(&builder, &synthesizer, &response.phonemes, text, response.duration);

        inner.frames.preload(speaker, set).await;
        {
            let _guard = lock(&inner.session);
            inner.ensure_current(generation)?;
            inner.refresh_rest(speaker);
        }

        let _attach = inner.attach.lock().await;
        inner.ensure_current(generation)?;

        let reported = (response.duration > 0.0).then_some(response.duration);
        let handle = inner.audio.load(&response.audio, reported).await?;
        if !inner.is_current(generation) {
            inner.audio.release(handle);
            return Err(PlayerError::Superseded);
        }

        if timeline.origin() == TimelineOrigin::Heuristic
            && reported.is_none()
            && let Some(duration) = inner.audio.duration().filter(|d| d.is_finite() && *d > 0.0)
        {
            tracing::debug!(duration, "resizing heuristic timeline to audio duration");
            timeline = synthesizer.synthesize(text, duration);
        }
        let timeline = Arc::new(timeline);

        let mut guard = lock(&inner.session);
        let Some(session) = guard.as_mut().filter(|s| s.generation == generation) else {
            inner.audio.release(handle);
            return Err(PlayerError::Superseded);
        };

        if let Err(e) = inner.audio.play() {
            inner.audio.release(handle);
            return Err(e.into());
        }

        session.timeline = Some(timeline.clone());
        session.audio = Some(handle);
        session.sync = Some(SyncRun::spawn(inner.clone(), generation, speaker.clone(), timeline.clone()));
        inner.set_state(PlaybackState::Playing);
        drop(guard);

        tracing::info!(
            speaker = %speaker,
            endpoint = %response.endpoint,
            entries = timeline.len(),
            origin = ?timeline.origin(),
            "playback started"
        );

        Ok(())
    }

    /// Pause audio and the sync loop; no-op unless playing
    pub fn pause(&self) {
        let inner = &self.inner;
        let mut guard = lock(&inner.session);
        let Some(session) = guard.as_mut() else {
            return;
        };
        if *inner.state.borrow() != PlaybackState::Playing {
            return;
        }

        if let Some(run) = session.sync.take() {
            inner.cancel_run(&run);
        }
        inner.audio.pause();
        inner.set_state(PlaybackState::Paused);
    }

    /// Continue a paused session with its existing timeline and frames
    pub fn resume(&self) -> Result<()> {
        let inner = &self.inner;
        let mut guard = lock(&inner.session);
        let Some(session) = guard.as_mut() else {
            return Ok(());
        };
        if *inner.state.borrow() != PlaybackState::Paused {
            return Ok(());
        }
        let Some(timeline) = session.timeline.clone() else {
            return Ok(());
        };

        inner.audio.play()?;
        session.sync = Some(SyncRun::spawn(
            inner.clone(),
            session.generation,
            session.speaker.clone(),
            timeline,
        ));
        inner.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// End the session: rewind to 0, show the rest frame, go `Idle`
    ///
    /// Also abandons a `play` still in setup.
    pub fn stop(&self) {
        let inner = &self.inner;
        let mut guard = lock(&inner.session);
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let speaker = match guard.as_mut() {
            Some(session) => {
                // The loop exits on its own once cancelled
                drop(inner.teardown(session));
                session.generation = generation;
                session.speaker.clone()
            }
            None => {
                inner.audio.stop();
                inner.options.default_speaker.clone()
            }
        };

        inner.surface.set_loading(false);
        inner.show_rest(&speaker);
        inner.set_state(PlaybackState::Idle);
    }

    pub fn state(&self) -> PlaybackState {
        *self.inner.state.borrow()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.inner.state.subscribe()
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    /// Audio playback position in seconds
    pub fn current_time(&self) -> f64 {
        self.inner.audio.current_time()
    }

    pub fn duration(&self) -> Option<f64> {
        self.inner.audio.duration()
    }

    pub fn cache_len(&self) -> usize {
        self.inner.frames.len()
    }

    pub fn frames(&self) -> &Arc<FrameCache> {
        &self.inner.frames
    }

    pub fn current_viseme(&self) -> VisemeId {
        self.inner.shown().viseme
    }

    pub fn speaker(&self) -> Option<SpeakerId> {
        lock(&self.inner.session).as_ref().map(|s| s.speaker.clone())
    }

    pub fn timeline(&self) -> Option<Arc<Timeline>> {
        lock(&self.inner.session).as_ref().and_then(|s| s.timeline.clone())
    }

    pub fn timeline_len(&self) -> usize {
        self.timeline().map_or(0, |t| t.len())
    }

    /// Last setup or playback failure, cleared by the next `play`
    pub fn last_error(&self) -> Option<String> {
        lock(&self.inner.last_error).clone()
    }

    pub fn resolved_endpoint(&self) -> Option<String> {
        self.inner.speech.resolved_endpoint()
    }

    pub fn viseme_stats(&self) -> VisemeStats {
        let set = self.inner.options.viseme_set;
        let count = |class: VisemeClass| set.visemes().filter(|v| v.class() == class).count();
        let (speaker, hints) = lock(&self.inner.session)
            .as_ref()
            .map_or((None, RefinementHints::default()), |s| (Some(s.speaker.clone()), s.hints));

        VisemeStats {
            viseme_set: set,
            total: set.len(),
            basic: count(VisemeClass::Basic),
            enhanced: count(VisemeClass::Enhanced),
            emotional: count(VisemeClass::Emotional),
            contextual: count(VisemeClass::Contextual),
            cached_frames: self.cache_len(),
            speaker,
            emotion: hints.emotion,
            context: hints.context,
        }
    }
}
