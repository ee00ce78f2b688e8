//! Load-at-start / save-on-change boundary between the app state and the
//! durable key-value store.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::seed;
use crate::storage::Storage;
use crate::types::{BlogPost, MediaItem, PressContent};

pub const USER_POSTS_KEY: &str = "issb_user_posts";
pub const USER_MEDIA_KEY: &str = "issb_user_media";
pub const PRESS_CONTENT_KEY: &str = "issb_press_content";
pub const THEME_KEY: &str = "issb_dark_mode";
pub const CACHED_MEDIA_KEY: &str = "issb_cached_media";

/// Everything that survives navigation, as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub user_posts: Vec<BlogPost>,
    pub user_media: Vec<MediaItem>,
    pub press: PressContent,
    /// `None` when no theme was ever stored.
    pub dark_mode: Option<bool>,
    /// `None` when no cached set was ever stored.
    pub cached_media: Option<BTreeSet<String>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            user_posts: Vec::new(),
            user_media: Vec::new(),
            press: seed::default_press(),
            dark_mode: None,
            cached_media: None,
        }
    }
}

impl Snapshot {
    /// Read every key. Absent, unreadable or malformed values fall back to
    /// their defaults; loading never fails.
    pub async fn load(store: &dyn Storage) -> Self {
        let defaults = Snapshot::default();
        Self {
            user_posts: load_json(store, USER_POSTS_KEY).await.unwrap_or(defaults.user_posts),
            user_media: load_json(store, USER_MEDIA_KEY).await.unwrap_or(defaults.user_media),
            press: load_json(store, PRESS_CONTENT_KEY).await.unwrap_or(defaults.press),
            dark_mode: load_json(store, THEME_KEY).await,
            cached_media: load_json(store, CACHED_MEDIA_KEY).await,
        }
    }
}

async fn load_json<T: DeserializeOwned>(store: &dyn Storage, key: &str) -> Option<T> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no stored value, using default");
            return None;
        }
        Err(e) => {
            warn!(key, error = %e, "failed to read stored value, using default");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, error = %e, "malformed stored value, using default");
            None
        }
    }
}

async fn save_json<T: Serialize + ?Sized>(store: &dyn Storage, key: &str, value: &T) -> Result<()> {
    let payload = serde_json::to_string(value).with_context(|| format!("serializing {key}"))?;
    store.put(key, &payload).await?;
    debug!(key, bytes = payload.len(), "saved");
    Ok(())
}

pub async fn save_posts(store: &dyn Storage, posts: &[BlogPost]) -> Result<()> {
    save_json(store, USER_POSTS_KEY, posts).await
}

pub async fn save_media(store: &dyn Storage, media: &[MediaItem]) -> Result<()> {
    save_json(store, USER_MEDIA_KEY, media).await
}

pub async fn save_press(store: &dyn Storage, press: &PressContent) -> Result<()> {
    save_json(store, PRESS_CONTENT_KEY, press).await
}

pub async fn save_theme(store: &dyn Storage, dark: bool) -> Result<()> {
    save_json(store, THEME_KEY, &dark).await
}

pub async fn save_cached(store: &dyn Storage, cached: &BTreeSet<String>) -> Result<()> {
    save_json(store, CACHED_MEDIA_KEY, cached).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn empty_store_yields_defaults() {
        let store = MemoryStorage::new();
        let snap = Snapshot::load(&store).await;
        assert_eq!(snap, Snapshot::default());
        assert_eq!(snap.press, seed::default_press());
    }

    #[tokio::test]
    async fn malformed_posts_fall_back_to_empty() {
        let store = MemoryStorage::with_entries([(USER_POSTS_KEY, "[{not json"), (THEME_KEY, "true")]);
        let snap = Snapshot::load(&store).await;
        assert!(snap.user_posts.is_empty());
        assert_eq!(snap.dark_mode, Some(true));
    }

    #[tokio::test]
    async fn press_with_wrong_card_count_is_treated_as_absent() {
        let mut value = serde_json::to_value(seed::default_press()).unwrap();
        value["networkCards"].as_array_mut().unwrap().pop();
        let store = MemoryStorage::with_entries([(PRESS_CONTENT_KEY, value.to_string())]);
        assert_eq!(Snapshot::load(&store).await.press, seed::default_press());
    }

    #[tokio::test]
    async fn saved_values_round_trip_through_load() {
        let store = MemoryStorage::new();
        let mut press = seed::default_press();
        press.hero_title = "New Era".into();
        save_press(&store, &press).await.unwrap();
        save_theme(&store, false).await.unwrap();
        save_cached(&store, &BTreeSet::from(["m1".to_string()])).await.unwrap();

        let snap = Snapshot::load(&store).await;
        assert_eq!(snap.press.hero_title, "New Era");
        assert_eq!(snap.dark_mode, Some(false));
        assert_eq!(snap.cached_media, Some(BTreeSet::from(["m1".to_string()])));
    }
}
