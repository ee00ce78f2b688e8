//! The watch page: one channel playing out of the ordered media collection.

use tracing::debug;

use crate::error::EmpireError;
use crate::player::{AspectRatio, Playback, Transport};
use crate::types::MediaItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// One line of the guide overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideEntry {
    pub number: usize,
    pub id: String,
    pub title: String,
    pub current: bool,
}

/// Read-only view of the watch page for renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchStatus {
    pub id: String,
    pub title: String,
    pub channel: usize,
    pub channels: usize,
    pub transport: Transport,
    pub playing: bool,
    pub elapsed: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub aspect: AspectRatio,
    pub fullscreen: bool,
    pub guide_open: bool,
    pub static_overlay: bool,
    /// Sequence number of the last handle event applied; see
    /// [`WatchHandle::apply`](crate::surface::WatchHandle::apply).
    pub applied: u64,
}

#[derive(Debug, Clone)]
pub struct WatchView {
    channels: Vec<MediaItem>,
    current: usize,
    playback: Playback,
}

impl WatchView {
    /// `None` when `id` is not in `channels`.
    pub fn open(channels: Vec<MediaItem>, id: &str) -> Option<Self> {
        let current = channels.iter().position(|m| m.id == id)?;
        let playback = Playback::mount(&channels[current]);
        Some(Self { channels, current, playback })
    }

    pub fn current(&self) -> &MediaItem { &self.channels[self.current] }
    pub fn channels(&self) -> &[MediaItem] { &self.channels }

    /// 1-based position in the collection.
    pub fn channel_number(&self) -> usize { self.current + 1 }

    pub fn playback(&self) -> &Playback { &self.playback }
    pub fn playback_mut(&mut self) -> &mut Playback { &mut self.playback }

    /// Remount on `index`. Fullscreen belongs to the platform, not the item,
    /// so the mirrored flag carries over.
    fn select(&mut self, index: usize) {
        let fullscreen = self.playback.is_fullscreen();
        self.current = index;
        self.playback = Playback::mount(&self.channels[index]);
        self.playback.fullscreen_changed(fullscreen);
        debug!(channel = index + 1, id = %self.channels[index].id, "channel selected");
    }

    /// Step one channel, wrapping at both ends. Always remounts playback.
    pub fn switch_channel(&mut self, direction: Direction) {
        let n = self.channels.len();
        let next = match direction {
            Direction::Next => (self.current + 1) % n,
            Direction::Prev => (self.current + n - 1) % n,
        };
        self.select(next);
    }

    pub fn jump_to(&mut self, id: &str) -> Result<(), EmpireError> {
        let index = self
            .channels
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| EmpireError::UnknownMedia(id.to_string()))?;
        self.select(index);
        Ok(())
    }

    pub fn open_guide(&mut self) { self.playback.set_guide(true); }
    pub fn close_guide(&mut self) { self.playback.set_guide(false); }

    pub fn guide(&self) -> Vec<GuideEntry> {
        self.channels
            .iter()
            .enumerate()
            .map(|(i, m)| GuideEntry { number: i + 1, id: m.id.clone(), title: m.title.clone(), current: i == self.current })
            .collect()
    }

    /// Jump to a guide entry; the remount leaves the guide closed.
    pub fn select_from_guide(&mut self, id: &str) -> Result<(), EmpireError> {
        self.jump_to(id)?;
        self.close_guide();
        Ok(())
    }

    pub fn status(&self) -> WatchStatus {
        let item = self.current();
        let p = &self.playback;
        WatchStatus {
            id: item.id.clone(),
            title: item.title.clone(),
            channel: self.channel_number(),
            channels: self.channels.len(),
            transport: p.transport(),
            playing: p.is_playing(),
            elapsed: p.elapsed(),
            duration: p.duration(),
            volume: p.displayed_volume(),
            muted: p.is_effectively_muted(),
            aspect: p.aspect_ratio(),
            fullscreen: p.is_fullscreen(),
            guide_open: p.guide_open(),
            static_overlay: p.static_overlay(),
            applied: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Command;
    use crate::seed;
    use crate::types::MediaKind;
    use proptest::prelude::*;

    fn item(id: &str) -> MediaItem {
        MediaItem {
            id: id.into(),
            kind: MediaKind::Video,
            title: id.to_uppercase(),
            year: "2011".into(),
            rating: 5,
            image_url: seed::EMPIRE_LOGO.into(),
            video_url: Some(seed::PLACEHOLDER_VIDEO.into()),
            description: String::new(),
            tags: Vec::new(),
            is_cached: None,
        }
    }

    fn channels(n: usize) -> Vec<MediaItem> { (0..n).map(|i| item(&format!("c{}", i))).collect() }

    #[test]
    fn prev_from_first_wraps_to_last() {
        let mut view = WatchView::open(vec![item("a"), item("b"), item("c")], "a").unwrap();
        view.switch_channel(Direction::Prev);
        assert_eq!(view.current().id, "c");
        assert_eq!(view.channel_number(), 3);
        view.switch_channel(Direction::Next);
        assert_eq!(view.current().id, "a");
    }

    #[test]
    fn unknown_id_does_not_open() {
        assert!(WatchView::open(channels(2), "zzz").is_none());
    }

    #[test]
    fn switching_resets_playback() {
        let mut view = WatchView::open(channels(3), "c0").unwrap();
        let p = view.playback_mut();
        p.play_settled(Ok(()));
        p.metadata_loaded(90.0);
        p.seek(40.0);
        p.set_volume(0.1);
        p.set_aspect_ratio(AspectRatio::Cinema);
        view.switch_channel(Direction::Next);
        let s = view.status();
        assert_eq!(s.id, "c1");
        assert_eq!(s.elapsed, 0.0);
        assert_eq!(s.volume, crate::player::DEFAULT_VOLUME);
        assert_eq!(s.aspect, AspectRatio::Original);
        assert_eq!(s.transport, Transport::Starting);
    }

    #[test]
    fn fullscreen_survives_channel_switch() {
        let mut view = WatchView::open(channels(3), "c0").unwrap();
        view.playback_mut().fullscreen_changed(true);
        view.switch_channel(Direction::Next);
        assert!(view.status().fullscreen);
        view.jump_to("c0").unwrap();
        assert!(view.status().fullscreen);
        view.playback_mut().toggle_fullscreen();
        assert_eq!(view.playback_mut().drain_commands(), vec![Command::Play, Command::ExitFullscreen]);
    }

    #[test]
    fn guide_selection_jumps_and_closes() {
        let mut view = WatchView::open(channels(4), "c0").unwrap();
        view.open_guide();
        assert!(view.status().guide_open);
        view.select_from_guide("c2").unwrap();
        assert_eq!(view.current().id, "c2");
        assert!(!view.status().guide_open);
        let guide = view.guide();
        assert!(guide[2].current);
        assert_eq!(guide.iter().filter(|g| g.current).count(), 1);
        assert!(matches!(view.select_from_guide("nope"), Err(EmpireError::UnknownMedia(_))));
        assert_eq!(view.current().id, "c2");
    }

    proptest! {
        #[test]
        fn next_cycles_back_after_len_steps(n in 1usize..12, start in 0usize..12) {
            let start = start % n;
            let list = channels(n);
            let id = list[start].id.clone();
            let mut view = WatchView::open(list, &id).unwrap();
            for _ in 0..n {
                view.switch_channel(Direction::Next);
            }
            prop_assert_eq!(&view.current().id, &id);
        }

        #[test]
        fn prev_undoes_next(n in 2usize..12, start in 0usize..12) {
            let start = start % n;
            let list = channels(n);
            let id = list[start].id.clone();
            let mut view = WatchView::open(list, &id).unwrap();
            view.switch_channel(Direction::Next);
            prop_assert_ne!(&view.current().id, &id);
            view.switch_channel(Direction::Prev);
            prop_assert_eq!(&view.current().id, &id);
        }
    }
}
