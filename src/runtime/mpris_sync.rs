use crate::mpris::MprisHandle;
use crate::player::PlaybackState;

pub fn update_mpris(mpris: &MprisHandle, state: &PlaybackState) {
    mpris.set_track_metadata(state.current());
    mpris.set_playback(state.status());
}
