//! Platform seams for the watch page and the event loop that drives them.
//!
//! A [`WatchSession`] owns the [`WatchView`] and is the only thing that talks
//! to the [`MediaSurface`]. User input and platform notifications arrive as
//! [`PlayerEvent`]s on one channel and are applied in order. `play` runs in a
//! spawned task and reports back with the mount generation it was issued
//! under, so settlements from a channel that is no longer shown are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Notice;
use crate::player::{AspectRatio, Command};
use crate::types::MediaItem;
use crate::watch::{Direction, WatchStatus, WatchView};

/// The element that actually renders a stream.
#[async_trait]
pub trait MediaSurface: Send + Sync {
    /// Show `item`: its stream when it has one, its still image otherwise.
    async fn load(&self, item: &MediaItem) -> Result<()>;
    /// Resolves once playback has really started (or was refused).
    async fn play(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn seek(&self, position: f64) -> Result<()>;
    async fn set_volume(&self, level: f64, muted: bool) -> Result<()>;
}

#[async_trait]
pub trait FullscreenHost: Send + Sync {
    async fn request(&self) -> Result<()>;
    async fn exit(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    TogglePlay,
    Seek(f64),
    SetVolume(f64),
    ToggleMute,
    SetAspect(AspectRatio),
    ToggleFullscreen,
    ToggleStatic,
    Switch(Direction),
    Jump(String),
    OpenGuide,
    CloseGuide,
    SelectFromGuide(String),
    MetadataLoaded(f64),
    TimeUpdate(f64),
    Ended,
    PlaySettled { generation: u64, result: Result<(), String> },
    FullscreenChanged(bool),
    FullscreenFailed(String),
    Shutdown,
}

/// An event on the session's channel. `seq` is set for events sent through
/// the [`WatchHandle`].
struct Queued {
    seq: Option<u64>,
    event: PlayerEvent,
}

impl Queued {
    fn internal(event: PlayerEvent) -> Self { Self { seq: None, event } }
}

pub struct WatchSession {
    view: WatchView,
    surface: Arc<dyn MediaSurface>,
    host: Arc<dyn FullscreenHost>,
    generation: u64,
    applied: u64,
    events_tx: mpsc::UnboundedSender<Queued>,
    events_rx: mpsc::UnboundedReceiver<Queued>,
    status_tx: watch::Sender<WatchStatus>,
    notice_tx: mpsc::UnboundedSender<Notice>,
}

impl WatchSession {
    /// Build a session and the handle that feeds it. Nothing reaches the
    /// surface until [`WatchSession::start`] or [`WatchSession::run`].
    pub fn new(view: WatchView, surface: Arc<dyn MediaSurface>, host: Arc<dyn FullscreenHost>) -> (Self, WatchHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(view.status());
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let handle = WatchHandle {
            events: events_tx.clone(),
            seq: AtomicU64::new(0),
            status: status_rx,
            notices: notice_rx,
            task: None,
        };
        let session = Self { view, surface, host, generation: 0, applied: 0, events_tx, events_rx, status_tx, notice_tx };
        (session, handle)
    }

    /// Run the session on the current runtime.
    pub fn spawn(view: WatchView, surface: Arc<dyn MediaSurface>, host: Arc<dyn FullscreenHost>) -> WatchHandle {
        let (session, mut handle) = Self::new(view, surface, host);
        handle.task = Some(tokio::spawn(session.run()));
        handle
    }

    pub fn view(&self) -> &WatchView { &self.view }
    pub fn generation(&self) -> u64 { self.generation }

    /// Load the mounted channel and send its autoplay.
    pub async fn start(&mut self) {
        self.load_current().await;
        self.dispatch().await;
    }

    pub async fn run(mut self) {
        self.start().await;
        while let Some(Queued { seq, event }) = self.events_rx.recv().await {
            if event == PlayerEvent::Shutdown {
                break;
            }
            if let Some(seq) = seq {
                self.applied = seq;
            }
            self.handle(event).await;
        }
        debug!(id = %self.view.current().id, "watch session stopped");
    }

    pub async fn handle(&mut self, event: PlayerEvent) {
        debug!(?event, "player event");
        match event {
            PlayerEvent::TogglePlay => self.view.playback_mut().toggle_play(),
            PlayerEvent::Seek(t) => self.view.playback_mut().seek(t),
            PlayerEvent::SetVolume(v) => self.view.playback_mut().set_volume(v),
            PlayerEvent::ToggleMute => self.view.playback_mut().toggle_mute(),
            PlayerEvent::SetAspect(a) => self.view.playback_mut().set_aspect_ratio(a),
            PlayerEvent::ToggleFullscreen => self.view.playback_mut().toggle_fullscreen(),
            PlayerEvent::ToggleStatic => self.view.playback_mut().toggle_static(),
            PlayerEvent::OpenGuide => self.view.open_guide(),
            PlayerEvent::CloseGuide => self.view.close_guide(),
            PlayerEvent::MetadataLoaded(d) => self.view.playback_mut().metadata_loaded(d),
            PlayerEvent::TimeUpdate(t) => self.view.playback_mut().time_update(t),
            PlayerEvent::Ended => self.view.playback_mut().ended(),
            PlayerEvent::FullscreenChanged(active) => self.view.playback_mut().fullscreen_changed(active),
            PlayerEvent::FullscreenFailed(reason) => self.view.playback_mut().fullscreen_failed(&reason),
            PlayerEvent::PlaySettled { generation, result } => {
                if generation != self.generation {
                    debug!(generation, current = self.generation, "dropping stale play settlement");
                    return;
                }
                self.view.playback_mut().play_settled(result);
            }
            PlayerEvent::Switch(direction) => {
                self.view.switch_channel(direction);
                self.remount().await;
            }
            PlayerEvent::Jump(id) => match self.view.jump_to(&id) {
                Ok(()) => self.remount().await,
                Err(e) => self.notify(Notice::from(&e)),
            },
            PlayerEvent::SelectFromGuide(id) => match self.view.select_from_guide(&id) {
                Ok(()) => self.remount().await,
                Err(e) => self.notify(Notice::from(&e)),
            },
            PlayerEvent::Shutdown => {}
        }
        self.dispatch().await;
    }

    async fn remount(&mut self) {
        self.generation += 1;
        self.load_current().await;
    }

    async fn load_current(&mut self) {
        let item = self.view.current().clone();
        if let Err(e) = self.surface.load(&item).await {
            warn!(id = %item.id, error = %e, "media surface failed to load item");
            self.notify(Notice::network(format!("could not load {}: {:#}", item.title, e)));
        }
    }

    /// Send queued commands to the platform, forward notices, publish status.
    async fn dispatch(&mut self) {
        for cmd in self.view.playback_mut().drain_commands() {
            let outcome = match cmd {
                Command::Play => {
                    self.spawn_play();
                    Ok(())
                }
                Command::Pause => self.surface.pause().await,
                Command::Seek(t) => self.surface.seek(t).await,
                Command::Volume { level, muted } => self.surface.set_volume(level, muted).await,
                Command::EnterFullscreen => {
                    self.spawn_fullscreen(true);
                    Ok(())
                }
                Command::ExitFullscreen => {
                    self.spawn_fullscreen(false);
                    Ok(())
                }
            };
            if let Err(e) = outcome {
                warn!(error = %e, "media surface command failed");
            }
        }
        for notice in self.view.playback_mut().take_notices() {
            self.notify(notice);
        }
        let mut status = self.view.status();
        status.applied = self.applied;
        self.status_tx.send_replace(status);
    }

    fn spawn_play(&self) {
        let surface = self.surface.clone();
        let events = self.events_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = surface.play().await.map_err(|e| format!("{:#}", e));
            let _ = events.send(Queued::internal(PlayerEvent::PlaySettled { generation, result }));
        });
    }

    fn spawn_fullscreen(&self, enter: bool) {
        let host = self.host.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let event = if enter {
                match host.request().await {
                    Ok(()) => PlayerEvent::FullscreenChanged(true),
                    Err(e) => PlayerEvent::FullscreenFailed(format!("{:#}", e)),
                }
            } else {
                match host.exit().await {
                    Ok(()) => PlayerEvent::FullscreenChanged(false),
                    Err(e) => {
                        warn!(error = %e, "leaving fullscreen failed");
                        return;
                    }
                }
            };
            let _ = events.send(Queued::internal(event));
        });
    }

    fn notify(&self, notice: Notice) {
        info!(kind = ?notice.kind, message = %notice.message, "notice");
        let _ = self.notice_tx.send(notice);
    }
}

/// Caller's side of a [`WatchSession`]. Dropping it stops the session.
pub struct WatchHandle {
    events: mpsc::UnboundedSender<Queued>,
    seq: AtomicU64,
    status: watch::Receiver<WatchStatus>,
    notices: mpsc::UnboundedReceiver<Notice>,
    task: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Queue `event`; returns its sequence number.
    pub fn send(&self, event: PlayerEvent) -> Result<u64> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.events
            .send(Queued { seq: Some(seq), event })
            .map_err(|_| anyhow!("watch session has stopped"))?;
        Ok(seq)
    }

    /// Send `event` and wait for the first status that includes it. Status
    /// published for other reasons in between (a play settling) is skipped.
    pub async fn apply(&mut self, event: PlayerEvent) -> Result<WatchStatus> {
        let seq = self.send(event)?;
        self.wait_for(|s| s.applied >= seq).await
    }

    pub fn status(&self) -> WatchStatus { self.status.borrow().clone() }

    /// Wait until the published status satisfies `pred`.
    pub async fn wait_for(&mut self, pred: impl FnMut(&WatchStatus) -> bool) -> Result<WatchStatus> {
        let status = self.status.wait_for(pred).await.map_err(|_| anyhow!("watch session has stopped"))?;
        Ok(status.clone())
    }

    pub async fn next_notice(&mut self) -> Option<Notice> { self.notices.recv().await }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut out = Vec::new();
        while let Ok(n) = self.notices.try_recv() {
            out.push(n);
        }
        out
    }

    pub async fn shutdown(mut self) {
        let _ = self.events.send(Queued::internal(PlayerEvent::Shutdown));
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "watch session task failed");
            }
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        let _ = self.events.send(Queued::internal(PlayerEvent::Shutdown));
    }
}
