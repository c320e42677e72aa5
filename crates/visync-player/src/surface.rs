use visync_core::VisemeId;
use visync_frames::AssetRef;

/// Where the avatar is drawn
///
/// Calls arrive from the sync loop task; implementations should return
/// quickly.
pub trait AvatarSurface: Send + Sync {
    /// Swap the displayed mouth frame
    fn show_frame(&self, viseme: VisemeId, frame: &AssetRef);

    /// Speaking indicator, off only while the rest shape is shown
    fn set_speaking(&self, speaking: bool);

    /// Session setup in progress
    fn set_loading(&self, _loading: bool) {}
}
