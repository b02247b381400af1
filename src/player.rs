//! Audio player for storytelling episodes.
//!
//! [`AudioPlayer`] drives a [`MediaElement`] (the `<audio>` element in a
//! browser binding, [`SimulatedMedia`] natively) and keeps the small amount of
//! UI state the element does not: whether we asked it to play, and the skip
//! step. Positions are seconds as `f64`, volume is `0.0..=1.0`.
//!
//! # Example
//!
//! ```rust
//! use themekeeper::{AudioPlayer, SimulatedMedia};
//!
//! let mut player = AudioPlayer::new(SimulatedMedia::new(120.0));
//! assert!(player.toggle_play().unwrap());
//!
//! player.skip_forward();
//! assert_eq!(player.current_time(), 10.0);
//!
//! player.seek_fraction(0.5);
//! assert_eq!(player.elapsed_label(), "1:00");
//! assert_eq!(player.duration_label(), "2:00");
//! ```

use crate::error::PlaybackError;
use crate::util::{clamp_or_min, format_time};

/// Seconds moved by [`AudioPlayer::skip_forward`] and
/// [`AudioPlayer::skip_backward`] unless configured otherwise.
pub const DEFAULT_SKIP_SECONDS: f64 = 10.0;

/// The media element the player controls.
pub trait MediaElement {
    /// Starts playback. May be refused, e.g. by an autoplay policy.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// Total length in seconds, `None` until metadata is loaded.
    fn duration(&self) -> Option<f64>;

    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);

    fn muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);
}

/// Player state on top of a [`MediaElement`].
#[derive(Debug)]
pub struct AudioPlayer<M> {
    media: M,
    playing: bool,
    skip_step: f64,
}

impl<M: MediaElement> AudioPlayer<M> {
    pub fn new(media: M) -> Self {
        Self {
            media,
            playing: false,
            skip_step: DEFAULT_SKIP_SECONDS,
        }
    }

    /// Sets the step used by [`skip_forward`](Self::skip_forward) and
    /// [`skip_backward`](Self::skip_backward). Negative steps are made positive.
    pub fn with_skip_step(mut self, seconds: f64) -> Self {
        self.skip_step = seconds.abs();
        self
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn into_inner(self) -> M {
        self.media
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if let Err(e) = self.media.play() {
            tracing::warn!("playback did not start: {}", e);
            self.playing = false;
            return Err(e);
        }
        self.playing = true;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.media.pause();
        self.playing = false;
    }

    /// Pauses if playing, plays otherwise. Returns the new playing state.
    pub fn toggle_play(&mut self) -> Result<bool, PlaybackError> {
        if self.playing {
            self.pause();
        } else {
            self.play()?;
        }
        Ok(self.playing)
    }

    pub fn current_time(&self) -> f64 {
        self.media.current_time()
    }

    pub fn duration(&self) -> Option<f64> {
        self.media.duration().filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Moves to `seconds`, clamped to the track. Returns the applied position.
    pub fn seek(&mut self, seconds: f64) -> f64 {
        let max = self.duration().unwrap_or(f64::INFINITY);
        let target = clamp_or_min(seconds, 0.0, max);
        self.media.set_current_time(target);
        target
    }

    /// Moves to a fraction of the track (a progress-bar click). No-op while the
    /// duration is unknown.
    pub fn seek_fraction(&mut self, fraction: f64) -> Option<f64> {
        let duration = self.duration()?;
        Some(self.seek(clamp_or_min(fraction, 0.0, 1.0) * duration))
    }

    /// Relative seek by `delta` seconds.
    pub fn skip(&mut self, delta: f64) -> f64 {
        self.seek(self.current_time() + delta)
    }

    pub fn skip_forward(&mut self) -> f64 {
        self.skip(self.skip_step)
    }

    pub fn skip_backward(&mut self) -> f64 {
        self.skip(-self.skip_step)
    }

    pub fn volume(&self) -> f64 {
        self.media.volume()
    }

    /// Sets the volume, clamped to `0.0..=1.0`. Zero mutes; anything above
    /// zero unmutes.
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        let volume = clamp_or_min(volume, 0.0, 1.0);
        self.media.set_volume(volume);
        self.media.set_muted(volume == 0.0);
        volume
    }

    pub fn is_muted(&self) -> bool {
        self.media.muted()
    }

    /// Flips mute and returns the new state.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.media.muted();
        self.media.set_muted(muted);
        muted
    }

    /// Position as a fraction of the track; 0 while the duration is unknown.
    pub fn progress(&self) -> f64 {
        match self.duration() {
            Some(duration) => clamp_or_min(self.current_time() / duration, 0.0, 1.0),
            None => 0.0,
        }
    }

    /// Handles the element's `ended` event: stop and rewind.
    pub fn on_ended(&mut self) {
        self.playing = false;
        self.media.set_current_time(0.0);
    }

    pub fn elapsed_label(&self) -> String {
        format_time(self.current_time())
    }

    pub fn duration_label(&self) -> String {
        format_time(self.duration().unwrap_or(0.0))
    }
}

/// In-memory media element.
///
/// Time does not advance on its own; call [`advance`](Self::advance) to
/// simulate playback.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedMedia {
    duration: Option<f64>,
    current_time: f64,
    volume: f64,
    muted: bool,
    paused: bool,
    reject_play: Option<String>,
}

impl SimulatedMedia {
    /// A loaded track of `duration` seconds.
    pub fn new(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::unloaded()
        }
    }

    /// A track whose metadata has not loaded yet.
    pub fn unloaded() -> Self {
        Self {
            duration: None,
            current_time: 0.0,
            volume: 1.0,
            muted: false,
            paused: true,
            reject_play: None,
        }
    }

    /// Makes every `play()` call fail with `reason`.
    pub fn rejecting_play(mut self, reason: impl Into<String>) -> Self {
        self.reject_play = Some(reason.into());
        self
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advances playback by `seconds` if playing, stopping at the end.
    /// Returns true if the end was reached.
    pub fn advance(&mut self, seconds: f64) -> bool {
        if self.paused {
            return false;
        }
        self.current_time += seconds;
        match self.duration {
            Some(duration) if self.current_time >= duration => {
                self.current_time = duration;
                self.paused = true;
                true
            }
            _ => false,
        }
    }
}

impl MediaElement for SimulatedMedia {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if let Some(reason) = &self.reject_play {
            return Err(PlaybackError::Rejected(reason.clone()));
        }
        if self.duration.is_none() {
            return Err(PlaybackError::NoSource);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(duration: f64) -> AudioPlayer<SimulatedMedia> {
        AudioPlayer::new(SimulatedMedia::new(duration))
    }

    #[test]
    fn test_toggle_play_pauses_and_resumes() {
        let mut p = player(60.0);
        assert!(p.toggle_play().unwrap());
        assert!(!p.media().is_paused());

        assert!(!p.toggle_play().unwrap());
        assert!(p.media().is_paused());
    }

    #[test]
    fn test_rejected_play_stays_paused() {
        let mut p = AudioPlayer::new(SimulatedMedia::new(60.0).rejecting_play("autoplay blocked"));
        let err = p.toggle_play().unwrap_err();
        assert_eq!(err, PlaybackError::Rejected("autoplay blocked".into()));
        assert!(!p.is_playing());
    }

    #[test]
    fn test_play_without_source_fails() {
        let mut p = AudioPlayer::new(SimulatedMedia::unloaded());
        assert_eq!(p.play(), Err(PlaybackError::NoSource));
    }

    #[test]
    fn test_seek_clamps_to_track() {
        let mut p = player(100.0);
        assert_eq!(p.seek(150.0), 100.0);
        assert_eq!(p.seek(-5.0), 0.0);
        assert_eq!(p.seek(42.0), 42.0);
        assert_eq!(p.seek(f64::NAN), 0.0);
    }

    #[test]
    fn test_seek_without_duration_only_clamps_below() {
        let mut p = AudioPlayer::new(SimulatedMedia::unloaded());
        assert_eq!(p.seek(500.0), 500.0);
        assert_eq!(p.seek(-1.0), 0.0);
    }

    #[test]
    fn test_seek_fraction() {
        let mut p = player(200.0);
        assert_eq!(p.seek_fraction(0.25), Some(50.0));
        assert_eq!(p.seek_fraction(2.0), Some(200.0));

        let mut unloaded = AudioPlayer::new(SimulatedMedia::unloaded());
        assert_eq!(unloaded.seek_fraction(0.5), None);
    }

    #[test]
    fn test_skip_clamps_at_both_ends() {
        let mut p = player(25.0);
        assert_eq!(p.skip_backward(), 0.0);
        assert_eq!(p.skip_forward(), 10.0);
        assert_eq!(p.skip_forward(), 20.0);
        assert_eq!(p.skip_forward(), 25.0);
    }

    #[test]
    fn test_custom_skip_step() {
        let mut p = player(100.0).with_skip_step(-15.0);
        assert_eq!(p.skip_forward(), 15.0);
    }

    #[test]
    fn test_volume_clamps_and_mutes_at_zero() {
        let mut p = player(10.0);
        assert_eq!(p.set_volume(1.7), 1.0);
        assert!(!p.is_muted());

        assert_eq!(p.set_volume(0.0), 0.0);
        assert!(p.is_muted());

        assert_eq!(p.set_volume(0.4), 0.4);
        assert!(!p.is_muted());
    }

    #[test]
    fn test_toggle_mute_keeps_volume() {
        let mut p = player(10.0);
        p.set_volume(0.6);
        assert!(p.toggle_mute());
        assert_eq!(p.volume(), 0.6);
        assert!(!p.toggle_mute());
    }

    #[test]
    fn test_progress() {
        let mut p = player(80.0);
        p.seek(20.0);
        assert_eq!(p.progress(), 0.25);
        assert_eq!(AudioPlayer::new(SimulatedMedia::unloaded()).progress(), 0.0);
    }

    #[test]
    fn test_ended_rewinds_and_stops() {
        let mut p = player(30.0);
        p.play().unwrap();
        p.seek(25.0);

        let mut media = p.into_inner();
        assert!(media.advance(10.0));

        let mut p = AudioPlayer::new(media);
        p.on_ended();
        assert!(!p.is_playing());
        assert_eq!(p.current_time(), 0.0);
    }

    #[test]
    fn test_labels() {
        let mut p = player(185.0);
        p.seek(65.0);
        assert_eq!(p.elapsed_label(), "1:05");
        assert_eq!(p.duration_label(), "3:05");
        assert_eq!(AudioPlayer::new(SimulatedMedia::unloaded()).duration_label(), "0:00");
    }
}
