//! Transport-control state for the library's video player.
//!
//! The media element itself lives in the player shell page; this is the authoritative
//! copy of what the controls show, driven by commands and media events.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::error::{StudioError, StudioResult};
use crate::ids::VideoId;
use crate::models::VideoRecord;

pub const PLAYBACK_RATES: [f64; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];
pub const SEEK_STEP_SECS: f64 = 10.0;
pub const VOLUME_STEP: f64 = 0.1;
pub const CONTROLS_IDLE: Duration = Duration::from_secs(3);
pub const SUBTITLE_PLACEHOLDER: &str = "Sample subtitle text appears here...";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlayerCommand {
    TogglePlay,
    /// Media finished loading its metadata.
    Loaded { duration: f64 },
    TimeUpdate { time: f64 },
    Seek { to: f64 },
    SeekBy { delta: f64 },
    /// Click on the progress bar, 0.0..=1.0 of its width.
    SeekFraction { fraction: f64 },
    SetVolume { volume: f64 },
    VolumeBy { delta: f64 },
    ToggleMute,
    SetRate { rate: f64 },
    ToggleFullscreen,
    ToggleSubtitles,
    PointerMoved,
}

/// Keyboard shortcut for a `KeyboardEvent.key` value.
pub fn command_for_key(key: &str) -> Option<PlayerCommand> {
    match key {
        " "          => Some(PlayerCommand::TogglePlay),
        "ArrowLeft"  => Some(PlayerCommand::SeekBy { delta: -SEEK_STEP_SECS }),
        "ArrowRight" => Some(PlayerCommand::SeekBy { delta: SEEK_STEP_SECS }),
        "ArrowUp"    => Some(PlayerCommand::VolumeBy { delta: VOLUME_STEP }),
        "ArrowDown"  => Some(PlayerCommand::VolumeBy { delta: -VOLUME_STEP }),
        "f"          => Some(PlayerCommand::ToggleFullscreen),
        "m"          => Some(PlayerCommand::ToggleMute),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    video_id: VideoId,
    title: String,
    src: String,
    playing: bool,
    loading: bool,
    duration: f64,
    current_time: f64,
    volume: f64,
    muted: bool,
    rate: f64,
    fullscreen: bool,
    subtitles: bool,
    last_activity: Instant,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub video_id: VideoId,
    pub title: String,
    pub src: String,
    pub playing: bool,
    pub loading: bool,
    pub duration: f64,
    pub current_time: f64,
    pub progress: f64,
    pub elapsed: String,
    pub total: String,
    pub volume: f64,
    pub muted: bool,
    pub effective_volume: f64,
    pub rate: f64,
    pub fullscreen: bool,
    pub controls_visible: bool,
    pub subtitle: Option<&'static str>,
}

/// "m:ss", as the control bar prints times.
pub fn format_time(secs: f64) -> String {
    let secs = if secs.is_finite() && secs > 0.0 { secs as u64 } else { 0 };
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn finite(field: &'static str, v: f64) -> StudioResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(StudioError::Unsupported { field, value: v.to_string() })
    }
}

impl Player {
    pub fn open(video: &VideoRecord, now: Instant) -> Self {
        Self {
            video_id: video.id,
            title: video.title.clone(),
            src: video.url.clone(),
            playing: false,
            loading: true,
            duration: 0.0,
            current_time: 0.0,
            volume: 1.0,
            muted: false,
            rate: 1.0,
            fullscreen: false,
            subtitles: false,
            last_activity: now,
        }
    }

    pub fn video_id(&self) -> VideoId {
        self.video_id
    }

    pub fn controls_visible(&self, now: Instant) -> bool {
        !self.playing || now.saturating_duration_since(self.last_activity) < CONTROLS_IDLE
    }

    /// Seeks outside `[0, duration]` are ignored, as are seeks before metadata loads.
    fn seek(&mut self, to: f64) {
        if self.loading || to < 0.0 || to > self.duration {
            return;
        }
        self.current_time = to;
    }

    pub fn apply(&mut self, cmd: PlayerCommand, now: Instant) -> StudioResult<()> {
        match cmd {
            PlayerCommand::TogglePlay => {
                self.playing = !self.playing;
                self.last_activity = now;
            }
            PlayerCommand::Loaded { duration } => {
                self.duration = finite("duration", duration)?.max(0.0);
                self.loading = false;
            }
            PlayerCommand::TimeUpdate { time } => {
                if !self.loading {
                    self.current_time = finite("time", time)?.clamp(0.0, self.duration);
                }
            }
            PlayerCommand::Seek { to } => self.seek(finite("seek", to)?),
            PlayerCommand::SeekBy { delta } => self.seek(self.current_time + finite("seek", delta)?),
            PlayerCommand::SeekFraction { fraction } => {
                self.seek(finite("seek", fraction)?.clamp(0.0, 1.0) * self.duration)
            }
            PlayerCommand::SetVolume { volume } => self.volume = finite("volume", volume)?.clamp(0.0, 1.0),
            PlayerCommand::VolumeBy { delta } => {
                self.volume = (self.volume + finite("volume", delta)?).clamp(0.0, 1.0)
            }
            PlayerCommand::ToggleMute => self.muted = !self.muted,
            PlayerCommand::SetRate { rate } => {
                if !PLAYBACK_RATES.contains(&rate) {
                    return Err(StudioError::Unsupported { field: "playback rate", value: rate.to_string() });
                }
                self.rate = rate;
            }
            PlayerCommand::ToggleFullscreen => self.fullscreen = !self.fullscreen,
            PlayerCommand::ToggleSubtitles => self.subtitles = !self.subtitles,
            PlayerCommand::PointerMoved => self.last_activity = now,
        }
        Ok(())
    }

    pub fn view(&self, now: Instant) -> PlayerView {
        let progress = if self.duration > 0.0 {
            self.current_time / self.duration * 100.0
        } else {
            0.0
        };
        PlayerView {
            video_id: self.video_id,
            title: self.title.clone(),
            src: self.src.clone(),
            playing: self.playing,
            loading: self.loading,
            duration: self.duration,
            current_time: self.current_time,
            progress,
            elapsed: format_time(self.current_time),
            total: format_time(self.duration),
            volume: self.volume,
            muted: self.muted,
            effective_volume: if self.muted { 0.0 } else { self.volume },
            rate: self.rate,
            fullscreen: self.fullscreen,
            controls_visible: self.controls_visible(now),
            subtitle: self.subtitles.then_some(SUBTITLE_PLACEHOLDER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdGen;
    use crate::library::ContentLibrary;

    fn loaded(duration: f64) -> (Player, Instant) {
        let lib = ContentLibrary::with_samples(&mut IdGen::default());
        let now = Instant::now();
        let mut p = Player::open(&lib.videos()[0], now);
        p.apply(PlayerCommand::Loaded { duration }, now).unwrap();
        (p, now)
    }

    #[test]
    fn relative_seek_respects_bounds() {
        let (mut p, now) = loaded(100.0);
        p.apply(command_for_key("ArrowRight").unwrap(), now).unwrap();
        assert_eq!(p.view(now).current_time, 10.0);
        p.apply(PlayerCommand::Seek { to: 95.0 }, now).unwrap();
        p.apply(command_for_key("ArrowRight").unwrap(), now).unwrap();
        assert_eq!(p.view(now).current_time, 95.0);
        p.apply(PlayerCommand::Seek { to: 5.0 }, now).unwrap();
        p.apply(command_for_key("ArrowLeft").unwrap(), now).unwrap();
        assert_eq!(p.view(now).current_time, 5.0);
        p.apply(PlayerCommand::SeekFraction { fraction: 0.25 }, now).unwrap();
        assert_eq!(p.view(now).current_time, 25.0);
        assert_eq!(p.view(now).progress, 25.0);
    }

    #[test]
    fn mute_is_independent_of_volume() {
        let (mut p, now) = loaded(10.0);
        p.apply(PlayerCommand::SetVolume { volume: 0.4 }, now).unwrap();
        p.apply(command_for_key("m").unwrap(), now).unwrap();
        let v = p.view(now);
        assert_eq!((v.volume, v.muted, v.effective_volume), (0.4, true, 0.0));
        p.apply(PlayerCommand::ToggleMute, now).unwrap();
        assert_eq!(p.view(now).effective_volume, 0.4);
    }

    #[test]
    fn volume_keys_clamp() {
        let (mut p, now) = loaded(10.0);
        p.apply(command_for_key("ArrowUp").unwrap(), now).unwrap();
        assert_eq!(p.view(now).volume, 1.0);
        for _ in 0..12 {
            p.apply(command_for_key("ArrowDown").unwrap(), now).unwrap();
        }
        assert_eq!(p.view(now).volume, 0.0);
    }

    #[test]
    fn only_listed_rates_are_accepted() {
        let (mut p, now) = loaded(10.0);
        p.apply(PlayerCommand::SetRate { rate: 1.25 }, now).unwrap();
        assert!(p.apply(PlayerCommand::SetRate { rate: 3.0 }, now).is_err());
        assert_eq!(p.view(now).rate, 1.25);
    }

    #[test]
    fn controls_hide_after_idle_while_playing() {
        let (mut p, now) = loaded(10.0);
        let later = now + Duration::from_secs(4);
        assert!(p.view(later).controls_visible);
        p.apply(command_for_key(" ").unwrap(), now).unwrap();
        assert!(p.view(now + Duration::from_secs(2)).controls_visible);
        assert!(!p.view(later).controls_visible);
        p.apply(PlayerCommand::PointerMoved, later).unwrap();
        assert!(p.view(later + Duration::from_secs(1)).controls_visible);
    }

    #[test]
    fn toggles_and_placeholder_subtitles() {
        let (mut p, now) = loaded(10.0);
        p.apply(command_for_key("f").unwrap(), now).unwrap();
        p.apply(PlayerCommand::ToggleSubtitles, now).unwrap();
        let v = p.view(now);
        assert!(v.fullscreen);
        assert_eq!(v.subtitle, Some(SUBTITLE_PLACEHOLDER));
        assert!(command_for_key("x").is_none());
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.7), "1:05");
        assert_eq!(format_time(f64::NAN), "0:00");
    }
}
