//! Application shell: which page is showing, what is selected, and the state
//! that survives navigation. Pure state; the caller persists whatever
//! [`Change`] an operation reports.

use chrono::NaiveDate;
use tracing::debug;

use crate::editors::{BlogDraft, MediaDraft, PressDraft};
use crate::error::{EmpireError, Notice};
use crate::library::{GalleryFilter, Library};
use crate::mapping::{media_from_draft, post_from_draft};
use crate::persist::Snapshot;
use crate::types::{BlogPost, Connectivity, Location, MediaItem, MediaKind, Page, PressContent};
use crate::watch::WatchView;

pub const FEATURED_POSTS: usize = 3;

/// A durable slot that needs writing after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Posts,
    Media,
    Press,
    Theme,
    Cached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadChoice {
    Blog,
    Media(MediaKind),
}

#[derive(Debug, Clone)]
pub struct AppShell {
    page: Page,
    selected_post: Option<String>,
    watch: Option<WatchView>,
    upload: UploadChoice,
    upload_modal_open: bool,
    library: Library,
    press: PressContent,
    dark_mode: bool,
    location: Location,
    connectivity: Connectivity,
    gallery: GalleryFilter,
    notices: Vec<Notice>,
}

impl AppShell {
    /// `prefer_dark` applies only when no theme was ever stored.
    pub fn from_snapshot(snapshot: Snapshot, prefer_dark: bool) -> Self {
        Self {
            page: Page::Home,
            selected_post: None,
            watch: None,
            upload: UploadChoice::Blog,
            upload_modal_open: false,
            library: Library::from_snapshot(&snapshot),
            dark_mode: snapshot.dark_mode.unwrap_or(prefer_dark),
            press: snapshot.press,
            location: Location::Home,
            connectivity: Connectivity::Online,
            gallery: GalleryFilter::default(),
            notices: Vec::new(),
        }
    }

    pub fn page(&self) -> Page { self.page }
    pub fn library(&self) -> &Library { &self.library }
    pub fn press(&self) -> &PressContent { &self.press }
    pub fn dark_mode(&self) -> bool { self.dark_mode }
    pub fn location(&self) -> Location { self.location }
    pub fn connectivity(&self) -> Connectivity { self.connectivity }
    pub fn upload_choice(&self) -> UploadChoice { self.upload }
    pub fn upload_modal_open(&self) -> bool { self.upload_modal_open }
    pub fn watch(&self) -> Option<&WatchView> { self.watch.as_ref() }
    pub fn watch_mut(&mut self) -> Option<&mut WatchView> { self.watch.as_mut() }

    pub fn selected_post(&self) -> Option<&BlogPost> {
        self.selected_post.as_deref().and_then(|id| self.library.find_post(id))
    }

    pub fn featured(&self) -> Vec<&BlogPost> { self.library.featured_posts(FEATURED_POSTS) }

    pub fn navigate(&mut self, page: Page) {
        debug!(from = ?self.page, to = ?page, "navigate");
        self.page = page;
        self.selected_post = None;
        self.watch = None;
        self.gallery = match page {
            Page::Cinema => GalleryFilter::for_kind(MediaKind::Movie),
            Page::TvLab => GalleryFilter::for_kind(MediaKind::Video),
            _ => GalleryFilter::default(),
        };
    }

    pub fn open_post(&mut self, id: &str) -> Result<&BlogPost, EmpireError> {
        if self.library.find_post(id).is_none() {
            return Err(EmpireError::UnknownPost(id.to_string()));
        }
        self.page = Page::Post;
        self.selected_post = Some(id.to_string());
        self.library.find_post(id).ok_or_else(|| EmpireError::UnknownPost(id.to_string()))
    }

    /// Open the player on `id` with every media item as a channel.
    pub fn watch_media(&mut self, id: &str) -> Result<&mut WatchView, EmpireError> {
        let channels: Vec<MediaItem> = self.library.media().into_iter().cloned().collect();
        let view = WatchView::open(channels, id).ok_or_else(|| EmpireError::UnknownMedia(id.to_string()))?;
        self.page = Page::Watch;
        Ok(self.watch.insert(view))
    }

    /// Leave a detail page or editor for the page it was reached from.
    pub fn back(&mut self) {
        let target = match self.page {
            Page::Watch => match self.watch.as_ref().map(|w| w.current().kind) {
                Some(MediaKind::Movie) => Page::Cinema,
                _ => Page::TvLab,
            },
            Page::Post => Page::Blog,
            Page::Upload => Page::Home,
            Page::PressEdit => Page::Press,
            _ => return,
        };
        self.navigate(target);
    }

    pub fn open_upload_modal(&mut self) { self.upload_modal_open = true; }
    pub fn close_upload_modal(&mut self) { self.upload_modal_open = false; }

    pub fn choose_upload(&mut self, choice: UploadChoice) {
        self.upload = choice;
        self.upload_modal_open = false;
        self.navigate(Page::Upload);
    }

    /// Empty draft for the editor currently chosen.
    pub fn media_draft(&self) -> MediaDraft {
        match self.upload {
            UploadChoice::Media(kind) => MediaDraft::new(kind),
            UploadChoice::Blog => MediaDraft::new(MediaKind::Photo),
        }
    }

    pub fn submit_post(&mut self, draft: &BlogDraft, id: String, today: NaiveDate) -> Result<(BlogPost, Change), EmpireError> {
        draft.validate()?;
        let post = post_from_draft(id, draft, today);
        self.library.add_post(post.clone());
        self.navigate(Page::Blog);
        Ok((post, Change::Posts))
    }

    pub fn submit_media(&mut self, draft: &MediaDraft, id: String) -> Result<(MediaItem, Change), EmpireError> {
        draft.validate()?;
        let item = media_from_draft(id, draft);
        self.library.add_media(item.clone());
        self.navigate(if item.kind == MediaKind::Movie { Page::Cinema } else { Page::TvLab });
        Ok((item, Change::Media))
    }

    pub fn edit_press(&mut self) -> PressDraft {
        self.navigate(Page::PressEdit);
        PressDraft::new(&self.press)
    }

    pub fn save_press(&mut self, draft: PressDraft) -> Change {
        self.press = draft.finish();
        self.navigate(Page::Press);
        Change::Press
    }

    pub fn toggle_theme(&mut self) -> Change {
        self.dark_mode = !self.dark_mode;
        Change::Theme
    }

    pub fn toggle_cached(&mut self, id: &str) -> Result<(bool, Change), EmpireError> {
        if self.library.find_media(id).is_none() {
            return Err(EmpireError::UnknownMedia(id.to_string()));
        }
        Ok((self.library.toggle_cached(id), Change::Cached))
    }

    pub fn set_location(&mut self, location: Location) { self.location = location; }
    pub fn set_connectivity(&mut self, connectivity: Connectivity) { self.connectivity = connectivity; }

    pub fn gallery_filter(&self) -> &GalleryFilter { &self.gallery }
    pub fn gallery_filter_mut(&mut self) -> &mut GalleryFilter { &mut self.gallery }

    /// Gallery listing under the current connectivity mode.
    pub fn gallery(&self) -> Vec<&MediaItem> {
        let filter = GalleryFilter { connectivity: self.connectivity, ..self.gallery.clone() };
        self.library.gallery(&filter)
    }

    pub fn gallery_title(&self) -> &'static str { self.gallery.title(self.location) }

    pub fn push_notice(&mut self, notice: Notice) { self.notices.push(notice); }
    pub fn take_notices(&mut self) -> Vec<Notice> { std::mem::take(&mut self.notices) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::KindFilter;

    fn shell() -> AppShell { AppShell::from_snapshot(Snapshot::default(), false) }

    fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 10, 17).unwrap() }

    #[test]
    fn stored_theme_beats_preference() {
        let snap = Snapshot { dark_mode: Some(false), ..Snapshot::default() };
        assert!(!AppShell::from_snapshot(snap, true).dark_mode());
        assert!(AppShell::from_snapshot(Snapshot::default(), true).dark_mode());
    }

    #[test]
    fn navigation_clears_selection() {
        let mut s = shell();
        s.open_post("1").unwrap();
        assert_eq!(s.page(), Page::Post);
        assert!(s.selected_post().is_some());
        s.navigate(Page::Mall);
        assert!(s.selected_post().is_none());
        assert!(s.watch().is_none());
    }

    #[test]
    fn back_from_watch_depends_on_kind() {
        let mut s = shell();
        s.watch_media("m1").unwrap();
        s.back();
        assert_eq!(s.page(), Page::Cinema);
        assert_eq!(s.gallery_filter().kind, KindFilter::Only(MediaKind::Movie));
        s.watch_media("tv2").unwrap();
        s.back();
        assert_eq!(s.page(), Page::TvLab);
        assert!(s.watch().is_none());
        assert!(matches!(s.watch_media("zzz"), Err(EmpireError::UnknownMedia(_))));
    }

    #[test]
    fn upload_chooser_lands_on_editor() {
        let mut s = shell();
        s.open_upload_modal();
        s.choose_upload(UploadChoice::Media(MediaKind::Tv));
        assert!(!s.upload_modal_open());
        assert_eq!(s.page(), Page::Upload);
        assert_eq!(s.media_draft().kind, MediaKind::Tv);
        s.back();
        assert_eq!(s.page(), Page::Home);
    }

    #[test]
    fn submitted_post_is_featured_and_lands_on_blog() {
        let mut s = shell();
        let draft = BlogDraft { title: "New".into(), content: "fresh".into(), agreed_to_terms: true, ..BlogDraft::default() };
        let (post, change) = s.submit_post(&draft, "n1".into(), today()).unwrap();
        assert_eq!(change, Change::Posts);
        assert_eq!(post.date, "Oct 17, 2026");
        assert_eq!(s.page(), Page::Blog);
        assert_eq!(s.featured()[0].id, "n1");
        assert_eq!(s.featured().len(), FEATURED_POSTS);
    }

    #[test]
    fn invalid_draft_changes_nothing() {
        let mut s = shell();
        s.choose_upload(UploadChoice::Blog);
        let err = s.submit_post(&BlogDraft::default(), "x".into(), today()).unwrap_err();
        assert!(matches!(err, EmpireError::InvalidDraft(_)));
        assert_eq!(s.page(), Page::Upload);
        assert!(s.library().user_posts().is_empty());
    }

    #[test]
    fn submitted_media_routes_by_kind() {
        let mut s = shell();
        let mut draft = MediaDraft::new(MediaKind::Movie);
        draft.title = "Film".into();
        draft.description = "d".into();
        draft.agreed_to_terms = true;
        s.submit_media(&draft, "film".into()).unwrap();
        assert_eq!(s.page(), Page::Cinema);
        draft.kind = MediaKind::Photo;
        let (item, _) = s.submit_media(&draft, "pic".into()).unwrap();
        assert_eq!(s.page(), Page::TvLab);
        assert_eq!(s.library().media()[0].id, item.id);
    }

    #[test]
    fn press_edit_round_trip() {
        let mut s = shell();
        let mut draft = s.edit_press();
        assert_eq!(s.page(), Page::PressEdit);
        draft.content.hero_title = "Slay".into();
        assert_eq!(s.save_press(draft), Change::Press);
        assert_eq!(s.page(), Page::Press);
        assert_eq!(s.press().hero_title, "Slay");
    }

    #[test]
    fn offline_gallery_uses_shell_connectivity() {
        let mut s = shell();
        s.navigate(Page::TvLab);
        s.gallery_filter_mut().kind = KindFilter::All;
        s.set_connectivity(Connectivity::Offline);
        assert!(s.gallery().iter().all(|m| s.library().is_cached(&m.id)));
        assert!(!s.gallery().iter().any(|m| m.id == "m1"));
        assert!(s.toggle_cached("m1").unwrap().0);
        assert!(s.gallery().iter().any(|m| m.id == "m1"));
        assert!(s.toggle_cached("ghost").is_err());
        s.set_location(Location::Travel);
        assert_eq!(s.gallery_title(), "Roaming Archives");
    }
}
