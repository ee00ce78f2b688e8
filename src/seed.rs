//! Content baked into the site: seed posts and media, the default press kit
//! and the mall catalog.

use crate::types::{BlogPost, Category, MediaItem, MediaKind, NetworkCard, PressContent, Price, ShopItem};

const UPLOADS: &str = "https://live-cheekymonkeybabygirl2010.pantheonsite.io/wp-content/uploads";

pub const EMPIRE_LOGO: &str =
    "https://live-cheekymonkeybabygirl2010.pantheonsite.io/wp-content/uploads/2026/01/Omg-its-So-Sick-Babygirl-Kingdom.png";

/// Loop used when a non-photo upload has no video of its own.
pub const PLACEHOLDER_VIDEO: &str =
    "https://assets.mixkit.co/videos/preview/mixkit-pink-neon-city-lights-reflecting-on-a-river-loop-32742-large.mp4";

pub fn placeholder_post_image(seed: &str) -> String {
    format!("https://picsum.photos/seed/{}/800/600", seed)
}

fn upload(path: &str) -> String { format!("{}/{}", UPLOADS, path) }

fn tags(list: &[&str]) -> Vec<String> { list.iter().map(|t| t.to_string()).collect() }

pub fn seed_posts() -> Vec<BlogPost> {
    vec![
        BlogPost {
            id: "1".into(),
            title: "Do You Remember Youth Clubs In 2000s".into(),
            category: Category::Other("Youth Clubs Nostalgia".into()),
            excerpt: "A look back at the glory days of the local youth club...".into(),
            date: "Oct 24, 2011".into(),
            image_url: upload("2026/01/Youth-clubs-2000s.jpg"),
            content: "Youth clubs in the 2000s were the ultimate hub for social life before smartphones took over. From pool tables to questionable snacks, we had it all.".into(),
            tags: tags(&["kids after school 2000s", "youth clubs", "2000s kids"]),
        },
        BlogPost {
            id: "2".into(),
            title: "Bernard Matthews Mini Kievs 2011".into(),
            category: Category::Other("Childhood Classics".into()),
            excerpt: "The undisputed king of the after-school dinner table.".into(),
            date: "Oct 24, 2011".into(),
            image_url: upload("2026/01/Bernard-Matthews-Mini-Kievs-2010-mp4-image.jpg"),
            content: "Bernard Matthews Mini Kievs were a staple. That garlic butter center was everything.".into(),
            tags: tags(&["nostalgia", "bernard matthews", "childhood food"]),
        },
        BlogPost {
            id: "3".into(),
            title: "Flat Bedroom Tour 3 2011".into(),
            category: Category::DreamyDecor,
            excerpt: "Stepping into the ultimate 2011 teenage girl sanctuary.".into(),
            date: "Nov 02, 2011".into(),
            image_url: upload("2026/01/Flat-Bedroom-Tour-3-2014-mp4-image.jpg"),
            content: "Neon lights, polaroids everywhere, and a stack of magazines. This is peak 2011 aesthetic.".into(),
            tags: tags(&["nostalgia", "room tour", "2011"]),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn media(
    id: &str,
    kind: MediaKind,
    title: &str,
    year: &str,
    rating: u8,
    image: &str,
    video: Option<String>,
    description: &str,
    tag_list: &[&str],
    cached: bool,
) -> MediaItem {
    MediaItem {
        id: id.into(),
        kind,
        title: title.into(),
        year: year.into(),
        rating,
        image_url: upload(image),
        video_url: video,
        description: description.into(),
        tags: tags(tag_list),
        is_cached: Some(cached),
    }
}

pub fn seed_media() -> Vec<MediaItem> {
    use MediaKind::*;
    vec![
        media("p1", Photo, "Rugrats Burger King Toys 2000s", "2011", 5,
            "2026/01/Rugrats-Burger-King-Toys-2000s-mp4-image.jpg", None,
            "Rugrats Burger King Toys 2000s.", &["Rugrats Burger King Toys 2000s"], true),
        media("p2", Photo, "Finding Nemo 2000s", "2011", 4,
            "2026/01/Finding-Nemo-2000s.jpg", None,
            "Finding Nemo 2000s", &["Finding Nemo 2000s"], true),
        media("m1", Movie, "High School Musical 1 2000s", "2004", 5,
            "2026/01/High-School-Musical-1-2000s.jpg", Some(upload("2025/11/Waterloo-Road-Lindsay-James-1.mp4")),
            "High School Musical 1 2000s.", &["High School Musical 1", "Disney"], false),
        media("m2", Movie, "High School Musical 2 2000s", "2006", 5,
            "2026/01/High-School-Musical-2-2000s.jpg", Some(upload("2025/11/Waterloo-road-Lindsay-James2.mp4")),
            "High School Musical 2 2000s.", &["Summer Slay", "HSM2"], false),
        media("tv1", Tv, "Dora the Explorer 2000s", "2007-2012", 5,
            "2026/01/Dora-the-Explorer-2000s.jpg", None,
            "Dora the Explorer 2000s.", &["Dora", "Adventure"], true),
        media("tv2", Tv, "Hannah Montana", "2006-2011", 4,
            "2026/01/Hannah-Montana-2000s-pic.jpg", Some(upload("2025/11/Lindsay-Hometown-Glory.mp4")),
            "The best of both worlds. The original secret identity queen.", &["music", "wig", "nostalgia"], true),
        media("v1", Video, "Metroland In Metrocentre 2000s", "2011", 5,
            "2026/01/Metroland-In-Metrocentre-2000s-Pic.jpg", Some(PLACEHOLDER_VIDEO.to_string()),
            "Metroland In Metrocentre 2000s", &["Metroland", "Retro"], true),
        media("v2", Video, "Angel Delight", "2012", 3,
            "2026/01/Angel-Delight.jpeg", Some(upload("2025/11/Lindsay-Hometown-Glory.mp4")),
            "Angel Delight", &["Sweet", "Clouds"], true),
    ]
}

/// Archive clip offered in the media editor's stock picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAsset {
    pub name: &'static str,
    pub kind: MediaKind,
    pub video_path: &'static str,
    pub image_path: &'static str,
}

impl StockAsset {
    pub fn video_url(&self) -> String { upload(self.video_path) }
    pub fn image_url(&self) -> String { upload(self.image_path) }
}

pub const STOCK_ASSETS: [StockAsset; 3] = [
    StockAsset {
        name: "Waterloo Road Lindsay James 2",
        kind: MediaKind::Video,
        video_path: "2025/11/Waterloo-road-Lindsay-James2.mp4",
        image_path: "2025/11/Waterloo-Road-Lindsay-James-2010-IMG-009.jpg",
    },
    StockAsset {
        name: "Waterloo Road Lindsay James (1)",
        kind: MediaKind::Video,
        video_path: "2025/11/Waterloo-Road-Lindsay-James-1.mp4",
        image_path: "2026/01/Flat-Bedroom-Tour-3-2014-mp4-image.jpg",
    },
    StockAsset {
        name: "Lindsay Hometown Glory",
        kind: MediaKind::Video,
        video_path: "2025/11/Lindsay-Hometown-Glory.mp4",
        image_path: "2026/01/Bernard-Matthews-Mini-Kievs-2010-mp4-image.jpg",
    },
];

fn card(title: &str, tagline: &str, desc: &str) -> NetworkCard {
    NetworkCard { title: title.into(), tagline: tagline.into(), desc: desc.into() }
}

pub fn default_press() -> PressContent {
    PressContent {
        hero_title: "The Sovereign Authority On Slay.".into(),
        hero_tagline: "Global Media Powerhouse".into(),
        hero_intro: "OMG It’s So Sick Babygirl Kingdom is not just an empire; it’s the definitive cultural blueprint for the nostalgic, hyper-feminine digital age.".into(),
        hero_image_url: EMPIRE_LOGO.into(),
        quote_text: "Trendsetter of the Era".into(),
        quote_author: "Imperial Press".into(),
        network_cards: [
            card("Sovereign Sweetheart", "Digital Fashion & Pop Culture Weekly",
                "The Kingdom's primary editorial outlet for aesthetic forecasting and cultural commentary."),
            card("Nostalgia Nexus", "High-Def 2011 Deep Dives",
                "Dedicated to preserving the golden era of the internet through archived media and storytelling."),
            card("Favorite Things", "The Daily Curation Service",
                "A premium product highlight network focusing on luxury, pink, and nostalgic essentials."),
            card("Imperial Vibe Lab", "Bespoke Aesthetic Consultancy",
                "Our creative arm helping external brands find their 'Babygirl Sparkle' through targeted design."),
        ],
        collab_pitch_title: "Partner With The Monarchy".into(),
        collab_pitch_desc: "We specialize in turning brands into icons. Our audience doesn't just consume; they belong to a digital sovereignty.".into(),
        contact_email: "xoxoempire2010@gmail.com".into(),
    }
}

fn shop(id: &str, name: &str, price: Price, image: &str, is_vip: bool, category: &str) -> ShopItem {
    ShopItem { id: id.into(), name: name.into(), price, image_url: upload(image), is_vip, category: category.into() }
}

pub fn freebies() -> Vec<ShopItem> {
    vec![
        shop("f1", "Birthday party food 2000s pic", Price::Free, "2026/01/Birthday-party-food-2000s-pic.jpg", false, "Posters"),
        shop("f2", "Nuggets & Nostalgia Nights", Price::Free, "2025/11/Nuggets-Nostalgia-Nights.pdf", false, "Posters"),
        shop("fg1", "BABYGIRL KINGDOM CREDIT Romford x Barking Edition 💖", Price::Free, "2026/02/1.jpg", false, "Gift Cards"),
        shop("fg2", "Drama Queen Diaries", Price::Free, "2025/11/Drama-Queen-Diaries-1.pdf", false, "Collages"),
    ]
}

pub fn vip_items() -> Vec<ShopItem> {
    vec![
        shop("vt1", "Princessrachael Seymour 2010", Price::Credits(2500), "2025/11/Princessrachael-Seymour-2010.pdf", true, "Collages"),
        shop("vt2", "Playboy Princess 2010", Price::Credits(1500), "2025/11/Playboy-Princess-2010.pdf", true, "Posters"),
        shop("v1", "Lindsay James 2010", Price::Credits(250), "2025/11/Lindsay-James-2010.pdf", true, "Posters"),
        shop("v2", "Princessrachael Sarah Seymour 2010", Price::Credits(500), "2025/11/Princessrachael-Sarah-Seymour-2010-IMG-010.jpg", true, "Posters"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_media_ids_are_unique() {
        let items = seed_media();
        let ids: HashSet<_> = items.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), items.len());
        assert!(items.iter().all(|m| (1..=5).contains(&m.rating)));
    }

    #[test]
    fn catalog_tabs_are_split_by_vip_flag() {
        assert!(freebies().iter().all(|i| !i.is_vip && i.price == Price::Free));
        assert!(vip_items().iter().all(|i| i.is_vip && matches!(i.price, Price::Credits(_))));
    }
}
