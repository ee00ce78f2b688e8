//! Form drafts for the blog, media, press and contact editors.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::capture::{capture_jpeg, CaptureDevice};
use crate::error::EmpireError;
use crate::seed::StockAsset;
use crate::types::{Category, MediaKind, NetworkCard, PressContent};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("the imperial terms must be accepted before publishing")]
    TermsNotAccepted,

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("email address `{0}` is not valid")]
    InvalidEmail(String),

    #[error("network card index {0} is out of range (0-3)")]
    CardOutOfRange(usize),
}

fn require(value: &str, field: &'static str) -> Result<(), DraftError> {
    if value.trim().is_empty() { Err(DraftError::Missing(field)) } else { Ok(()) }
}

/// A file picked in an editor, carried as a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub mime: String,
    pub data_url: String,
}

impl Upload {
    /// A camera frame as a JPEG data URL.
    pub fn jpeg(bytes: &[u8]) -> Self {
        Self { mime: "image/jpeg".into(), data_url: format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes)) }
    }

    pub fn is_video(&self) -> bool { self.mime.starts_with("video/") }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    pub category: Category,
    pub excerpt: String,
    pub content: String,
    /// Comma-separated.
    pub tags: String,
    pub image: Option<String>,
    pub agreed_to_terms: bool,
}

impl Default for BlogDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: Category::SoulCandy,
            excerpt: String::new(),
            content: String::new(),
            tags: String::new(),
            image: None,
            agreed_to_terms: false,
        }
    }
}

impl BlogDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        require(&self.title, "title")?;
        require(&self.content, "content")?;
        if !self.agreed_to_terms { return Err(DraftError::TermsNotAccepted); }
        Ok(())
    }

    pub fn attach(&mut self, upload: Upload) { self.image = Some(upload.data_url); }

    /// Use a camera snapshot as the cover. The draft is untouched when the
    /// camera is refused.
    pub async fn attach_snapshot(&mut self, device: &dyn CaptureDevice) -> Result<(), EmpireError> {
        let frame = capture_jpeg(device).await?;
        self.attach(Upload::jpeg(&frame));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDraft {
    pub kind: MediaKind,
    pub title: String,
    pub year: String,
    pub rating: u8,
    pub description: String,
    pub tags: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub agreed_to_terms: bool,
}

impl MediaDraft {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            title: String::new(),
            year: "2011".into(),
            rating: 5,
            description: String::new(),
            tags: String::new(),
            image: None,
            video: None,
            agreed_to_terms: false,
        }
    }

    /// A video upload replaces any image and promotes a photo draft to a
    /// video; an image upload replaces any video.
    pub fn attach(&mut self, upload: Upload) {
        if upload.is_video() {
            self.video = Some(upload.data_url);
            self.image = None;
            if self.kind == MediaKind::Photo { self.kind = MediaKind::Video; }
        } else {
            self.image = Some(upload.data_url);
            self.video = None;
        }
    }

    /// A snapshot replaces any video, like an image upload.
    pub async fn attach_snapshot(&mut self, device: &dyn CaptureDevice) -> Result<(), EmpireError> {
        let frame = capture_jpeg(device).await?;
        self.attach(Upload::jpeg(&frame));
        Ok(())
    }

    /// Fill the draft from an archive clip. Rating, year and terms are kept.
    pub fn apply_stock(&mut self, asset: &StockAsset) {
        self.title = format!("My Imperial {}", asset.name);
        self.kind = asset.kind;
        self.video = Some(asset.video_url());
        self.image = Some(asset.image_url());
        self.description = "Exclusively selected from the Imperial Archives for the Big Media Mega Empire. ✨".into();
        self.tags = format!("imperial, {}, aesthetic", asset.kind);
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        require(&self.title, "title")?;
        require(&self.description, "description")?;
        if !(1..=5).contains(&self.rating) { return Err(DraftError::InvalidRating(self.rating)); }
        if !self.agreed_to_terms { return Err(DraftError::TermsNotAccepted); }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Title,
    Tagline,
    Desc,
}

/// Working copy of the press record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressDraft {
    pub content: PressContent,
}

impl PressDraft {
    pub fn new(initial: &PressContent) -> Self { Self { content: initial.clone() } }

    pub fn set_card(&mut self, index: usize, field: CardField, value: impl Into<String>) -> Result<(), DraftError> {
        let card: &mut NetworkCard = self.content.network_cards.get_mut(index).ok_or(DraftError::CardOutOfRange(index))?;
        let value = value.into();
        match field {
            CardField::Title => card.title = value,
            CardField::Tagline => card.tagline = value,
            CardField::Desc => card.desc = value,
        }
        Ok(())
    }

    pub fn finish(self) -> PressContent { self.content }
}

pub const DEFAULT_SUBJECT: &str = "Imperial Inquiry";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    Idle,
    Sending,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    status: ContactStatus,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            subject: DEFAULT_SUBJECT.into(),
            message: String::new(),
            status: ContactStatus::Idle,
        }
    }
}

impl ContactForm {
    /// A filled-in form with the default subject.
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), message: message.into(), ..Self::default() }
    }

    pub fn status(&self) -> ContactStatus { self.status }

    pub fn submit(&mut self) -> Result<(), DraftError> {
        require(&self.name, "name")?;
        require(&self.email, "email")?;
        if !self.email.contains('@') { return Err(DraftError::InvalidEmail(self.email.clone())); }
        require(&self.message, "message")?;
        self.status = ContactStatus::Sending;
        Ok(())
    }

    /// The scroll arrived; fields reset for the next one.
    pub fn delivered(&mut self) {
        if self.status != ContactStatus::Sending { return; }
        *self = ContactForm { status: ContactStatus::Success, ..ContactForm::default() };
    }

    pub fn acknowledge(&mut self) {
        if self.status == ContactStatus::Success { self.status = ContactStatus::Idle; }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureTrack;
    use crate::seed;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Lens(Arc<AtomicUsize>);

    #[async_trait]
    impl CaptureTrack for Lens {
        async fn grab_frame(&mut self) -> anyhow::Result<Vec<u8>> { Ok(b"ABC".to_vec()) }
        fn stop(&mut self) { self.0.fetch_add(1, Ordering::SeqCst); }
    }

    struct Webcam {
        stops: Arc<AtomicUsize>,
        allow: bool,
    }

    impl Webcam {
        fn new(allow: bool) -> Self { Self { stops: Arc::new(AtomicUsize::new(0)), allow } }
        fn stops(&self) -> usize { self.stops.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl CaptureDevice for Webcam {
        async fn open(&self) -> anyhow::Result<Box<dyn CaptureTrack>> {
            if !self.allow { anyhow::bail!("NotAllowedError") }
            Ok(Box::new(Lens(self.stops.clone())))
        }
    }

    #[tokio::test]
    async fn snapshot_becomes_cover_and_releases_camera() {
        let cam = Webcam::new(true);
        let mut post = BlogDraft::default();
        post.attach_snapshot(&cam).await.unwrap();
        assert_eq!(post.image.as_deref(), Some("data:image/jpeg;base64,QUJD"));
        assert_eq!(cam.stops(), 1);

        let mut media = MediaDraft::new(MediaKind::Movie);
        media.video = Some("clip.mp4".into());
        media.attach_snapshot(&cam).await.unwrap();
        assert_eq!(media.image.as_deref(), Some("data:image/jpeg;base64,QUJD"));
        assert!(media.video.is_none());
        assert_eq!(cam.stops(), 2);
    }

    #[tokio::test]
    async fn refused_camera_leaves_draft_alone() {
        let cam = Webcam::new(false);
        let mut media = MediaDraft::new(MediaKind::Video);
        media.video = Some("clip.mp4".into());
        let err = media.attach_snapshot(&cam).await.unwrap_err();
        assert!(matches!(err, EmpireError::PermissionDenied(_)));
        assert_eq!(media.video.as_deref(), Some("clip.mp4"));
        assert!(media.image.is_none());
        assert_eq!(cam.stops(), 0);

        let mut post = BlogDraft::default();
        assert!(post.attach_snapshot(&cam).await.is_err());
        assert!(post.image.is_none());
    }

    #[test]
    fn stock_asset_fills_the_draft() {
        let mut d = MediaDraft::new(MediaKind::Photo);
        d.rating = 3;
        d.apply_stock(&seed::STOCK_ASSETS[2]);
        assert_eq!(d.title, "My Imperial Lindsay Hometown Glory");
        assert_eq!(d.kind, MediaKind::Video);
        assert_eq!(d.tags, "imperial, video, aesthetic");
        assert!(d.video.as_deref().unwrap().ends_with("Lindsay-Hometown-Glory.mp4"));
        assert!(d.image.is_some());
        assert_eq!(d.rating, 3);
        d.agreed_to_terms = true;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn blog_draft_needs_title_content_and_terms() {
        let mut d = BlogDraft::default();
        assert_eq!(d.validate(), Err(DraftError::Missing("title")));
        d.title = "Hi".into();
        assert_eq!(d.validate(), Err(DraftError::Missing("content")));
        d.content = "body".into();
        assert_eq!(d.validate(), Err(DraftError::TermsNotAccepted));
        d.agreed_to_terms = true;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn video_upload_promotes_photo_draft() {
        let mut d = MediaDraft::new(MediaKind::Photo);
        d.attach(Upload { mime: "image/png".into(), data_url: "data:image/png;base64,AA".into() });
        assert!(d.image.is_some());
        d.attach(Upload { mime: "video/mp4".into(), data_url: "data:video/mp4;base64,BB".into() });
        assert_eq!(d.kind, MediaKind::Video);
        assert!(d.image.is_none());
        assert!(d.video.is_some());
    }

    #[test]
    fn media_draft_rejects_bad_rating() {
        let mut d = MediaDraft::new(MediaKind::Movie);
        d.title = "t".into();
        d.description = "d".into();
        d.agreed_to_terms = true;
        d.rating = 0;
        assert_eq!(d.validate(), Err(DraftError::InvalidRating(0)));
        d.rating = 3;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn press_cards_are_edited_by_index() {
        let mut d = PressDraft::new(&seed::default_press());
        d.set_card(2, CardField::Tagline, "Weekly").unwrap();
        assert_eq!(d.set_card(4, CardField::Title, "x"), Err(DraftError::CardOutOfRange(4)));
        assert_eq!(d.finish().network_cards[2].tagline, "Weekly");
    }

    #[test]
    fn contact_form_cycles_back_to_idle() {
        let mut f = ContactForm::new("Lindsay", "nope", "hi");
        assert_eq!(f.subject, DEFAULT_SUBJECT);
        assert_eq!(f.status(), ContactStatus::Idle);
        assert!(matches!(f.submit(), Err(DraftError::InvalidEmail(_))));
        f.email = "l@kingdom.tv".into();
        f.submit().unwrap();
        assert_eq!(f.status(), ContactStatus::Sending);
        f.delivered();
        assert_eq!(f.status(), ContactStatus::Success);
        assert!(f.name.is_empty());
        assert_eq!(f.subject, DEFAULT_SUBJECT);
        f.acknowledge();
        assert_eq!(f.status(), ContactStatus::Idle);
    }
}
