use chrono::NaiveDate;

use crate::editors::{BlogDraft, MediaDraft};
use crate::seed;
use crate::types::{BlogPost, MediaItem, MediaKind};

const EXCERPT_CHARS: usize = 100;

pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty()).map(String::from).collect()
}

pub fn excerpt_from(content: &str) -> String {
    let head: String = content.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", head)
}

/// `Oct 24, 2011`
pub fn display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn parse_display_date(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    NaiveDate::parse_from_str(t, "%b %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(t, "%B %d, %Y"))
        .or_else(|_| NaiveDate::parse_from_str(t, "%Y-%m-%d"))
        .ok()
}

pub fn post_from_draft(id: String, draft: &BlogDraft, today: NaiveDate) -> BlogPost {
    let excerpt = if draft.excerpt.trim().is_empty() { excerpt_from(&draft.content) } else { draft.excerpt.clone() };
    let image_url = draft.image.clone().unwrap_or_else(|| seed::placeholder_post_image(&id));
    BlogPost {
        title: draft.title.clone(),
        category: draft.category.clone(),
        excerpt,
        date: display_date(today),
        image_url,
        content: draft.content.clone(),
        tags: parse_tags(&draft.tags),
        id,
    }
}

pub fn media_from_draft(id: String, draft: &MediaDraft) -> MediaItem {
    let video_url = draft
        .video
        .clone()
        .or_else(|| (draft.kind != MediaKind::Photo).then(|| seed::PLACEHOLDER_VIDEO.to_string()));
    MediaItem {
        id,
        kind: draft.kind,
        title: draft.title.clone(),
        year: draft.year.clone(),
        rating: draft.rating.clamp(1, 5),
        image_url: draft.image.clone().unwrap_or_else(|| seed::EMPIRE_LOGO.to_string()),
        video_url,
        description: draft.description.clone(),
        tags: parse_tags(&draft.tags),
        is_cached: None,
    }
}
