//! Content collections: seed lists merged with user submissions, plus the
//! set of media kept for offline viewing.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::mapping::parse_display_date;
use crate::persist::Snapshot;
use crate::seed;
use crate::types::{BlogPost, Connectivity, Location, MediaItem, MediaKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(MediaKind),
}

impl KindFilter {
    fn admits(&self, kind: MediaKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(k) => *k == kind,
        }
    }
}

/// Page-local gallery state; discarded on navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryFilter {
    pub kind: KindFilter,
    pub search: String,
    pub connectivity: Connectivity,
}

impl GalleryFilter {
    pub fn for_kind(kind: MediaKind) -> Self {
        Self { kind: KindFilter::Only(kind), ..Self::default() }
    }

    pub fn title(&self, location: Location) -> &'static str {
        match location {
            Location::Arcade => return "Pixel Palace Games",
            Location::McDonalds => return "Imperial McPlay House",
            Location::Travel => return "Roaming Archives",
            Location::Home => {}
        }
        match self.kind {
            KindFilter::Only(MediaKind::Movie) => "Imperial Cinema",
            KindFilter::Only(MediaKind::Tv) => "Kingdom Television",
            KindFilter::Only(MediaKind::Video) => "Big Media Lab",
            KindFilter::Only(MediaKind::Photo) => "Imperial Gallery",
            KindFilter::All => "Imperial Archives",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Library {
    seed_posts: Vec<BlogPost>,
    seed_media: Vec<MediaItem>,
    user_posts: Vec<BlogPost>,
    user_media: Vec<MediaItem>,
    cached: BTreeSet<String>,
}

impl Library {
    pub fn new(user_posts: Vec<BlogPost>, user_media: Vec<MediaItem>, cached: Option<BTreeSet<String>>) -> Self {
        let seed_posts = seed::seed_posts();
        let seed_media = seed::seed_media();
        let cached = cached.unwrap_or_else(|| {
            user_media
                .iter()
                .chain(seed_media.iter())
                .filter(|m| m.is_cached == Some(true))
                .map(|m| m.id.clone())
                .collect()
        });
        Self { seed_posts, seed_media, user_posts, user_media, cached }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::new(snapshot.user_posts.clone(), snapshot.user_media.clone(), snapshot.cached_media.clone())
    }

    /// User posts then seed posts, newest date first. Undated posts sink to
    /// the end; ties keep their concatenation order.
    pub fn posts(&self) -> Vec<&BlogPost> {
        let mut all: Vec<(&BlogPost, Option<chrono::NaiveDate>)> = self
            .user_posts
            .iter()
            .chain(self.seed_posts.iter())
            .map(|p| (p, parse_display_date(&p.date)))
            .collect();
        all.sort_by(|(_, a), (_, b)| match (a, b) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        all.into_iter().map(|(p, _)| p).collect()
    }

    pub fn featured_posts(&self, n: usize) -> Vec<&BlogPost> {
        self.posts().into_iter().take(n).collect()
    }

    /// User media then seed media: the channel order.
    pub fn media(&self) -> Vec<&MediaItem> {
        self.user_media.iter().chain(self.seed_media.iter()).collect()
    }

    pub fn find_post(&self, id: &str) -> Option<&BlogPost> {
        self.user_posts.iter().chain(self.seed_posts.iter()).find(|p| p.id == id)
    }

    pub fn find_media(&self, id: &str) -> Option<&MediaItem> {
        self.user_media.iter().chain(self.seed_media.iter()).find(|m| m.id == id)
    }

    pub fn user_posts(&self) -> &[BlogPost] { &self.user_posts }
    pub fn user_media(&self) -> &[MediaItem] { &self.user_media }
    pub fn cached(&self) -> &BTreeSet<String> { &self.cached }

    pub fn add_post(&mut self, post: BlogPost) { self.user_posts.insert(0, post); }
    pub fn add_media(&mut self, item: MediaItem) { self.user_media.insert(0, item); }

    pub fn is_cached(&self, id: &str) -> bool { self.cached.contains(id) }

    /// Flip offline availability. Returns the new state.
    pub fn toggle_cached(&mut self, id: &str) -> bool {
        if self.cached.remove(id) {
            false
        } else {
            self.cached.insert(id.to_string());
            true
        }
    }

    pub fn gallery(&self, filter: &GalleryFilter) -> Vec<&MediaItem> {
        self.media()
            .into_iter()
            .filter(|m| filter.connectivity == Connectivity::Online || self.is_cached(&m.id))
            .filter(|m| filter.kind.admits(m.kind))
            .filter(|m| m.matches_search(&filter.search))
            .collect()
    }
}
