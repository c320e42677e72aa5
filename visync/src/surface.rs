use visync_core::VisemeId;
use visync_frames::AssetRef;
use visync_player::AvatarSurface;

/// Surface that only logs what it would draw
pub struct LogSurface;

impl AvatarSurface for LogSurface {
    fn show_frame(&self, viseme: VisemeId, frame: &AssetRef) {
        tracing::info!(viseme = %viseme, frame = %frame, "frame");
    }

    fn set_speaking(&self, speaking: bool) {
        tracing::debug!(speaking, "speaking changed");
    }

    fn set_loading(&self, loading: bool) {
        tracing::debug!(loading, "loading changed");
    }
}
