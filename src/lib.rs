pub mod capture;
pub mod config;
pub mod db;
pub mod editors;
pub mod error;
pub mod library;
pub mod mall;
pub mod mapping;
pub mod oracle;
pub mod persist;
pub mod player;
pub mod seed;
pub mod shell;
pub mod storage;
pub mod surface;
pub mod types;
pub mod watch;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::editors::{BlogDraft, CardField, ContactForm, MediaDraft, PressDraft, Upload};
    pub use crate::error::{EmpireError, Notice, NoticeKind};
    pub use crate::player::{AspectRatio, Command, Playback, Transport};
    pub use crate::shell::{AppShell, Change, UploadChoice};
    pub use crate::surface::{FullscreenHost, MediaSurface, PlayerEvent, WatchHandle, WatchSession};
    pub use crate::types::{BlogPost, Category, Connectivity, Location, MediaItem, MediaKind, Page, PressContent};
    pub use crate::watch::{Direction, WatchStatus, WatchView};
    pub use crate::Empire;
}

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::EmpireConfig;
use crate::db::Database;
use crate::editors::{BlogDraft, MediaDraft, PressDraft};
use crate::error::{EmpireError, Notice};
use crate::mall::Mall;
use crate::persist::Snapshot;
use crate::shell::{AppShell, Change};
use crate::storage::Storage;
use crate::types::{BlogPost, MediaItem};

/// The site's state plus the store it is saved to.
///
/// Everything is read once in [`Empire::load`]; each operation that changes a
/// durable slot writes that slot straight away. A failed write keeps the
/// in-memory change and leaves a storage notice.
pub struct Empire<S: Storage> {
    store: S,
    shell: AppShell,
    mall: Mall,
}

impl Empire<Database> {
    /// Open the configured database (migrating it) and load from it.
    pub async fn open(config: &EmpireConfig) -> Result<Self> {
        let db = Database::open(config.database_url.as_deref()).await?;
        Ok(Self::load(db, config.prefer_dark).await)
    }
}

impl<S: Storage> Empire<S> {
    pub async fn load(store: S, prefer_dark: bool) -> Self {
        let snapshot = Snapshot::load(&store).await;
        info!(
            user_posts = snapshot.user_posts.len(),
            user_media = snapshot.user_media.len(),
            "loaded empire state"
        );
        Self { store, shell: AppShell::from_snapshot(snapshot, prefer_dark), mall: Mall::new() }
    }

    pub fn shell(&self) -> &AppShell { &self.shell }
    pub fn shell_mut(&mut self) -> &mut AppShell { &mut self.shell }
    pub fn mall(&self) -> &Mall { &self.mall }
    pub fn mall_mut(&mut self) -> &mut Mall { &mut self.mall }
    pub fn store(&self) -> &S { &self.store }

    pub fn take_notices(&mut self) -> Vec<Notice> { self.shell.take_notices() }

    async fn persist(&mut self, change: Change) {
        let lib = self.shell.library();
        let result = match change {
            Change::Posts => persist::save_posts(&self.store, lib.user_posts()).await,
            Change::Media => persist::save_media(&self.store, lib.user_media()).await,
            Change::Press => persist::save_press(&self.store, self.shell.press()).await,
            Change::Theme => persist::save_theme(&self.store, self.shell.dark_mode()).await,
            Change::Cached => persist::save_cached(&self.store, lib.cached()).await,
        };
        if let Err(e) = result {
            warn!(?change, error = %e, "failed to persist change");
            let err = EmpireError::Storage(format!("{:#}", e));
            self.shell.push_notice(Notice::from(&err));
        }
    }

    pub async fn publish_post(&mut self, draft: &BlogDraft) -> Result<BlogPost, EmpireError> {
        self.publish_post_on(draft, today()).await
    }

    pub async fn publish_post_on(&mut self, draft: &BlogDraft, date: NaiveDate) -> Result<BlogPost, EmpireError> {
        let (post, change) = self.shell.submit_post(draft, new_id(), date)?;
        self.persist(change).await;
        Ok(post)
    }

    pub async fn publish_media(&mut self, draft: &MediaDraft) -> Result<MediaItem, EmpireError> {
        let (item, change) = self.shell.submit_media(draft, new_id())?;
        self.persist(change).await;
        Ok(item)
    }

    pub async fn save_press(&mut self, draft: PressDraft) {
        let change = self.shell.save_press(draft);
        self.persist(change).await;
    }

    /// Returns the new theme (`true` = dark).
    pub async fn toggle_theme(&mut self) -> bool {
        let change = self.shell.toggle_theme();
        self.persist(change).await;
        self.shell.dark_mode()
    }

    /// Returns whether `id` is now available offline.
    pub async fn toggle_cached(&mut self, id: &str) -> Result<bool, EmpireError> {
        let (cached, change) = self.shell.toggle_cached(id)?;
        self.persist(change).await;
        Ok(cached)
    }
}

fn new_id() -> String { uuid::Uuid::new_v4().simple().to_string() }

fn today() -> NaiveDate { chrono::Local::now().date_naive() }
