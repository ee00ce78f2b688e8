use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
    Video,
    Photo,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
            MediaKind::Video => "video",
            MediaKind::Photo => "photo",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "film" => Ok(MediaKind::Movie),
            "tv" | "tv-episode" | "episode" => Ok(MediaKind::Tv),
            "video" | "short-video" => Ok(MediaKind::Video),
            "photo" | "image" => Ok(MediaKind::Photo),
            other => Err(anyhow!("unknown media kind `{}` (expected movie, tv, video, photo)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    pub year: String,
    pub rating: u8,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_cached: Option<bool>,
}

impl MediaItem {
    pub fn has_stream(&self) -> bool {
        self.video_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    /// Case-insensitive match against title, description and tags.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() { return true; }
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

/// Blog category. Stored as its display string; values outside the editor's
/// enumeration are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    SparkleScience,
    KawaiiCloset,
    DreamyDecor,
    GossipGirlies,
    SoulCandy,
    ImperialCinema,
    KingdomTv,
    FreebieVault,
    VipExclusives,
    Other(String),
}

impl Category {
    pub const EDITOR_CHOICES: [Category; 9] = [
        Category::SparkleScience,
        Category::KawaiiCloset,
        Category::DreamyDecor,
        Category::GossipGirlies,
        Category::SoulCandy,
        Category::ImperialCinema,
        Category::KingdomTv,
        Category::FreebieVault,
        Category::VipExclusives,
    ];

    pub fn label(&self) -> &str {
        match self {
            Category::SparkleScience => "Sparkle Science",
            Category::KawaiiCloset => "Kawaii Closet",
            Category::DreamyDecor => "Dreamy Decor",
            Category::GossipGirlies => "Gossip Girlies",
            Category::SoulCandy => "Soul Candy",
            Category::ImperialCinema => "Imperial Cinema",
            Category::KingdomTv => "Kingdom TV",
            Category::FreebieVault => "Freebie Vault",
            Category::VipExclusives => "VIP Exclusives",
            Category::Other(s) => s,
        }
    }
}

impl Default for Category {
    fn default() -> Self { Category::SoulCandy }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::EDITOR_CHOICES
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .cloned()
            .unwrap_or(Category::Other(s))
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        match c {
            Category::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub excerpt: String,
    /// Display date, e.g. `Oct 24, 2011`.
    pub date: String,
    pub image_url: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCard {
    pub title: String,
    pub tagline: String,
    pub desc: String,
}

/// Press kit singleton; replaced wholesale on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressContent {
    pub hero_title: String,
    pub hero_tagline: String,
    pub hero_intro: String,
    pub hero_image_url: String,
    pub quote_text: String,
    pub quote_author: String,
    pub network_cards: [NetworkCard; 4],
    pub collab_pitch_title: String,
    pub collab_pitch_desc: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Price {
    Free,
    Credits(u32),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Free => f.write_str("FREE"),
            Price::Credits(n) => write!(f, "{} Credits", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub is_vip: bool,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Blog,
    Post,
    Cinema,
    TvLab,
    Watch,
    Oracle,
    Upload,
    Mall,
    Clubs,
    Contact,
    Terms,
    Press,
    PressEdit,
}

/// Where the visitor says they are; only changes presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Location {
    #[default]
    Home,
    Travel,
    McDonalds,
    Arcade,
}

impl FromStr for Location {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Location::Home),
            "travel" => Ok(Location::Travel),
            "mcdonalds" | "mcd" => Ok(Location::McDonalds),
            "arcade" => Ok(Location::Arcade),
            other => Err(anyhow!("unknown location `{}` (expected home, travel, mcdonalds, arcade)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connectivity {
    #[default]
    Online,
    Offline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_item_uses_stored_field_names() {
        let raw = r#"{"id":"x","type":"tv","title":"T","year":"2011","rating":4,
            "imageUrl":"i.jpg","videoUrl":"v.mp4","description":"d","tags":["a"],"isCached":true}"#;
        let item: MediaItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.kind, MediaKind::Tv);
        assert_eq!(item.video_url.as_deref(), Some("v.mp4"));
        assert_eq!(item.is_cached, Some(true));
        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["type"], "tv");
        assert_eq!(back["imageUrl"], "i.jpg");
    }

    #[test]
    fn category_keeps_unknown_labels() {
        let c: Category = "Youth Clubs Nostalgia".to_string().into();
        assert_eq!(c, Category::Other("Youth Clubs Nostalgia".into()));
        let k: Category = "kingdom tv".to_string().into();
        assert_eq!(k, Category::KingdomTv);
        assert_eq!(String::from(Category::KingdomTv), "Kingdom TV");
    }

    #[test]
    fn price_renders_catalog_strings() {
        assert_eq!(Price::Free.to_string(), "FREE");
        assert_eq!(Price::Credits(250).to_string(), "250 Credits");
    }

    #[test]
    fn search_is_case_insensitive_over_tags() {
        let item = MediaItem {
            id: "1".into(),
            kind: MediaKind::Photo,
            title: "Finding Nemo".into(),
            year: "2011".into(),
            rating: 4,
            image_url: String::new(),
            video_url: None,
            description: "fish".into(),
            tags: vec!["Pixar".into()],
            is_cached: None,
        };
        assert!(item.matches_search("pixar"));
        assert!(item.matches_search("NEMO"));
        assert!(!item.matches_search("dory"));
        assert!(!item.has_stream());
    }
}
