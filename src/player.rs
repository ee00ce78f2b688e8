//! Playback state for the watch view.
//!
//! `Playback` never touches a real stream. Every user action updates state and
//! queues [`Command`]s for the platform; every platform notification comes back
//! in through a method (`play_settled`, `metadata_loaded`, `fullscreen_changed`,
//! ...). The transport is a small state machine:
//!
//! ```text
//!  Paused --toggle--> Starting --settled ok--> Playing --toggle--> Paused
//!                        |  ^                                        ^
//!                  toggle|  |toggle                                  |
//!                        v  |                                        |
//!                      Pausing ----------settled (ok: Pause)---------+
//! ```
//!
//! A pause is never issued while a play is in flight: toggling during
//! `Starting` parks the request in `Pausing` and the `Pause` command is only
//! queued once the play settles.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use tracing::debug;

use crate::error::Notice;
use crate::types::MediaItem;

pub const DEFAULT_VOLUME: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// No playable stream; the still image is shown.
    Idle,
    Starting,
    Playing,
    /// Pause requested while a play was still in flight.
    Pausing,
    Paused,
}

/// Instruction for the platform's media surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Seek(f64),
    Volume { level: f64, muted: bool },
    EnterFullscreen,
    ExitFullscreen,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AspectRatio {
    #[default]
    Original,
    Square,
    Vintage,
    Classic,
    Hd,
    Mobile,
    Cinema,
    SuperWide,
    Imperial,
    Vertical,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 10] = [
        AspectRatio::Original,
        AspectRatio::Square,
        AspectRatio::Vintage,
        AspectRatio::Classic,
        AspectRatio::Hd,
        AspectRatio::Mobile,
        AspectRatio::Cinema,
        AspectRatio::SuperWide,
        AspectRatio::Imperial,
        AspectRatio::Vertical,
    ];

    /// Width:height, or `None` for the stream's own shape.
    pub fn ratio(&self) -> Option<(u32, u32)> {
        match self {
            AspectRatio::Original => None,
            AspectRatio::Square => Some((1, 1)),
            AspectRatio::Vintage => Some((4, 3)),
            AspectRatio::Classic => Some((3, 2)),
            AspectRatio::Hd => Some((16, 9)),
            AspectRatio::Mobile => Some((18, 9)),
            AspectRatio::Cinema => Some((21, 9)),
            AspectRatio::SuperWide => Some((32, 9)),
            AspectRatio::Imperial => Some((4, 1)),
            AspectRatio::Vertical => Some((9, 16)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Original => "Original",
            AspectRatio::Square => "1:1 Square",
            AspectRatio::Vintage => "4:3 Vintage",
            AspectRatio::Classic => "3:2 Classic",
            AspectRatio::Hd => "16:9 HD",
            AspectRatio::Mobile => "18:9 Mobile",
            AspectRatio::Cinema => "21:9 Cinema",
            AspectRatio::SuperWide => "32:9 SuperWide",
            AspectRatio::Imperial => "4:1 Imperial",
            AspectRatio::Vertical => "9:16 Vertical",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl FromStr for AspectRatio {
    type Err = anyhow::Error;

    /// Accepts `original`, `16:9` or `16/9`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        if t == "original" || t == "auto" { return Ok(AspectRatio::Original); }
        let norm = t.replace('/', ":");
        AspectRatio::ALL
            .iter()
            .copied()
            .find(|a| a.ratio().map(|(w, h)| format!("{}:{}", w, h)).as_deref() == Some(norm.as_str()))
            .ok_or_else(|| anyhow!("unknown aspect ratio `{}`", s))
    }
}

/// `m:ss`
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds.floor() as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

#[derive(Debug, Clone)]
pub struct Playback {
    has_stream: bool,
    transport: Transport,
    elapsed: f64,
    duration: Option<f64>,
    volume: f64,
    muted: bool,
    aspect: AspectRatio,
    fullscreen: bool,
    guide_open: bool,
    static_overlay: bool,
    outbox: VecDeque<Command>,
    notices: Vec<Notice>,
}

impl Playback {
    /// Fresh state for a newly selected item. Items with a stream autoplay.
    pub fn mount(item: &MediaItem) -> Self {
        let has_stream = item.has_stream();
        let mut outbox = VecDeque::new();
        let transport = if has_stream {
            outbox.push_back(Command::Play);
            Transport::Starting
        } else {
            Transport::Idle
        };
        Self {
            has_stream,
            transport,
            elapsed: 0.0,
            duration: None,
            volume: DEFAULT_VOLUME,
            muted: false,
            aspect: AspectRatio::Original,
            fullscreen: false,
            guide_open: false,
            static_overlay: true,
            outbox,
            notices: Vec::new(),
        }
    }

    pub fn has_stream(&self) -> bool { self.has_stream }
    pub fn transport(&self) -> Transport { self.transport }

    /// What the play/pause button shows. A deferred pause still reads as
    /// playing until the stream actually stops.
    pub fn is_playing(&self) -> bool {
        matches!(self.transport, Transport::Starting | Transport::Playing | Transport::Pausing)
    }

    pub fn elapsed(&self) -> f64 { self.elapsed }
    /// Zero until the stream's metadata arrives.
    pub fn duration(&self) -> f64 { self.duration.unwrap_or(0.0) }
    pub fn volume(&self) -> f64 { self.volume }
    pub fn muted(&self) -> bool { self.muted }
    pub fn is_effectively_muted(&self) -> bool { self.muted || self.volume == 0.0 }
    /// Level shown on the slider.
    pub fn displayed_volume(&self) -> f64 { if self.muted { 0.0 } else { self.volume } }
    pub fn aspect_ratio(&self) -> AspectRatio { self.aspect }
    pub fn is_fullscreen(&self) -> bool { self.fullscreen }
    pub fn guide_open(&self) -> bool { self.guide_open }
    pub fn static_overlay(&self) -> bool { self.static_overlay }

    pub fn progress_label(&self) -> String {
        format!("{} / {}", format_time(self.elapsed), format_time(self.duration()))
    }

    fn send(&mut self, cmd: Command) {
        debug!(?cmd, transport = ?self.transport, "queue playback command");
        self.outbox.push_back(cmd);
    }

    pub fn drain_commands(&mut self) -> Vec<Command> { self.outbox.drain(..).collect() }
    pub fn take_notices(&mut self) -> Vec<Notice> { std::mem::take(&mut self.notices) }

    pub fn toggle_play(&mut self) {
        self.transport = match self.transport {
            Transport::Idle => Transport::Idle,
            Transport::Paused => {
                self.send(Command::Play);
                Transport::Starting
            }
            Transport::Starting => Transport::Pausing,
            Transport::Pausing => Transport::Starting,
            Transport::Playing => {
                self.send(Command::Pause);
                Transport::Paused
            }
        };
    }

    /// The platform's play operation finished.
    pub fn play_settled(&mut self, result: Result<(), String>) {
        self.transport = match (self.transport, result) {
            (Transport::Starting, Ok(())) => Transport::Playing,
            (Transport::Pausing, Ok(())) => {
                self.send(Command::Pause);
                Transport::Paused
            }
            (Transport::Starting, Err(reason)) => {
                self.notices.push(Notice::info(format!("playback could not start: {}", reason)));
                Transport::Paused
            }
            (Transport::Pausing, Err(_)) => Transport::Paused,
            (other, _) => other,
        };
    }

    pub fn ended(&mut self) {
        if self.has_stream && self.transport == Transport::Playing {
            self.transport = Transport::Paused;
        }
    }

    pub fn metadata_loaded(&mut self, duration: f64) {
        if duration.is_finite() && duration >= 0.0 {
            self.duration = Some(duration);
            self.elapsed = self.elapsed.min(duration);
        }
    }

    pub fn time_update(&mut self, position: f64) {
        if position.is_finite() {
            self.elapsed = position.clamp(0.0, self.duration());
        }
    }

    /// Jump within `[0, duration]`. Inert without a stream or before the
    /// duration is known.
    pub fn seek(&mut self, target: f64) {
        let Some(duration) = self.duration.filter(|_| self.has_stream) else { return };
        if !target.is_finite() { return; }
        let t = target.clamp(0.0, duration);
        self.elapsed = t;
        self.send(Command::Seek(t));
    }

    pub fn set_volume(&mut self, level: f64) {
        if !level.is_finite() { return; }
        self.volume = level.clamp(0.0, 1.0);
        if self.volume > 0.0 { self.muted = false; }
        self.push_volume();
    }

    /// Flips the mute flag; the stored level is kept for unmuting.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.push_volume();
    }

    fn push_volume(&mut self) {
        if self.has_stream {
            let (level, muted) = (self.volume, self.muted);
            self.send(Command::Volume { level, muted });
        }
    }

    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) { self.aspect = aspect; }

    /// Ask the platform to change fullscreen. The flag itself only moves on
    /// [`Playback::fullscreen_changed`].
    pub fn toggle_fullscreen(&mut self) {
        if self.fullscreen { self.send(Command::ExitFullscreen) } else { self.send(Command::EnterFullscreen) }
    }

    pub fn fullscreen_changed(&mut self, active: bool) { self.fullscreen = active; }

    pub fn fullscreen_failed(&mut self, reason: &str) {
        self.notices.push(Notice::permission_denied(format!("error attempting to enable fullscreen: {}", reason)));
    }

    pub fn set_guide(&mut self, open: bool) { self.guide_open = open; }
    pub fn toggle_static(&mut self) { self.static_overlay = !self.static_overlay; }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::types::MediaKind;

    fn streaming() -> Playback {
        let item = seed::seed_media().into_iter().find(|m| m.id == "m1").unwrap();
        Playback::mount(&item)
    }

    fn settled_playing() -> Playback {
        let mut p = streaming();
        p.drain_commands();
        p.play_settled(Ok(()));
        p
    }

    #[test]
    fn mount_autoplays_when_a_stream_exists() {
        let mut p = streaming();
        assert_eq!(p.transport(), Transport::Starting);
        assert!(p.is_playing());
        assert_eq!(p.volume(), DEFAULT_VOLUME);
        assert!(!p.muted());
        assert_eq!(p.aspect_ratio(), AspectRatio::Original);
        assert!(p.static_overlay());
        assert_eq!(p.drain_commands(), vec![Command::Play]);
    }

    #[test]
    fn still_images_stay_idle() {
        let photo = seed::seed_media().into_iter().find(|m| m.kind == MediaKind::Photo).unwrap();
        let mut p = Playback::mount(&photo);
        assert_eq!(p.transport(), Transport::Idle);
        p.toggle_play();
        p.seek(3.0);
        p.set_volume(0.2);
        assert_eq!(p.transport(), Transport::Idle);
        assert!(p.drain_commands().is_empty());
        assert_eq!(p.volume(), 0.2);
    }

    #[test]
    fn pause_during_pending_play_waits_for_settlement() {
        let mut p = streaming();
        assert_eq!(p.drain_commands(), vec![Command::Play]);
        p.toggle_play();
        assert_eq!(p.transport(), Transport::Pausing);
        assert!(p.drain_commands().is_empty(), "no pause before play settles");
        p.play_settled(Ok(()));
        assert_eq!(p.transport(), Transport::Paused);
        assert_eq!(p.drain_commands(), vec![Command::Pause]);
        assert!(!p.is_playing());
    }

    #[test]
    fn failed_play_with_deferred_pause_issues_nothing() {
        let mut p = streaming();
        p.drain_commands();
        p.toggle_play();
        p.play_settled(Err("interrupted".into()));
        assert_eq!(p.transport(), Transport::Paused);
        assert!(p.drain_commands().is_empty());
        assert!(p.take_notices().is_empty());
    }

    #[test]
    fn refused_autoplay_raises_notice() {
        let mut p = streaming();
        p.play_settled(Err("autoplay blocked".into()));
        assert_eq!(p.transport(), Transport::Paused);
        assert_eq!(p.take_notices().len(), 1);
    }

    #[test]
    fn toggling_twice_while_starting_cancels_the_pause() {
        let mut p = streaming();
        p.drain_commands();
        p.toggle_play();
        p.toggle_play();
        p.play_settled(Ok(()));
        assert_eq!(p.transport(), Transport::Playing);
        assert!(p.drain_commands().is_empty());
    }

    #[test]
    fn playing_pauses_immediately() {
        let mut p = settled_playing();
        p.toggle_play();
        assert_eq!(p.drain_commands(), vec![Command::Pause]);
        p.toggle_play();
        assert_eq!(p.drain_commands(), vec![Command::Play]);
        assert_eq!(p.transport(), Transport::Starting);
    }

    #[test]
    fn seek_is_inert_until_metadata() {
        let mut p = settled_playing();
        p.seek(10.0);
        assert_eq!(p.elapsed(), 0.0);
        assert!(p.drain_commands().is_empty());
        assert_eq!(p.progress_label(), "0:00 / 0:00");
    }

    #[test]
    fn seek_clamps_into_duration() {
        let mut p = settled_playing();
        p.metadata_loaded(125.0);
        p.seek(500.0);
        assert_eq!(p.elapsed(), 125.0);
        p.seek(-4.0);
        assert_eq!(p.elapsed(), 0.0);
        p.seek(61.5);
        assert_eq!(p.drain_commands(), vec![Command::Seek(125.0), Command::Seek(0.0), Command::Seek(61.5)]);
        assert_eq!(p.progress_label(), "1:01 / 2:05");
    }

    #[test]
    fn zero_volume_is_effectively_muted_and_raising_unmutes() {
        let mut p = settled_playing();
        p.toggle_mute();
        p.set_volume(0.0);
        assert!(p.is_effectively_muted());
        p.set_volume(0.4);
        assert!(!p.muted());
        assert_eq!(p.volume(), 0.4);
        assert!(!p.is_effectively_muted());
    }

    #[test]
    fn double_mute_toggle_restores_state() {
        let mut p = settled_playing();
        p.set_volume(0.35);
        let before = (p.muted(), p.displayed_volume());
        p.toggle_mute();
        assert_eq!(p.displayed_volume(), 0.0);
        assert_eq!(p.volume(), 0.35);
        p.toggle_mute();
        assert_eq!((p.muted(), p.displayed_volume()), before);
    }

    #[test]
    fn fullscreen_flag_follows_platform_only() {
        let mut p = settled_playing();
        p.toggle_fullscreen();
        assert!(!p.is_fullscreen());
        assert_eq!(p.drain_commands(), vec![Command::EnterFullscreen]);
        p.fullscreen_failed("denied");
        assert!(!p.is_fullscreen());
        assert_eq!(p.take_notices()[0].kind, crate::error::NoticeKind::PermissionDenied);

        p.fullscreen_changed(true);
        p.toggle_fullscreen();
        assert_eq!(p.drain_commands(), vec![Command::ExitFullscreen]);
        // escape key outside the app
        p.fullscreen_changed(false);
        assert!(!p.is_fullscreen());
    }

    #[test]
    fn aspect_ratio_is_presentational() {
        let mut p = settled_playing();
        p.metadata_loaded(30.0);
        p.time_update(12.0);
        p.set_aspect_ratio("21:9".parse().unwrap());
        assert_eq!(p.aspect_ratio(), AspectRatio::Cinema);
        assert_eq!(p.elapsed(), 12.0);
        assert_eq!(p.transport(), Transport::Playing);
    }

    #[test]
    fn aspect_ratio_parses_both_separators() {
        assert_eq!("16/9".parse::<AspectRatio>().unwrap(), AspectRatio::Hd);
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Vertical);
        assert_eq!("Original".parse::<AspectRatio>().unwrap(), AspectRatio::Original);
        assert!("5:4".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn time_formats_as_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn ended_returns_to_paused() {
        let mut p = settled_playing();
        p.ended();
        assert_eq!(p.transport(), Transport::Paused);
    }
}
