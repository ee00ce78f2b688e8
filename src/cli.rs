use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use empire::editors::CardField;
use empire::mall::MallTab;
use empire::types::{Category, Location, MediaKind};

/// Development front-end for the empire core
#[derive(Parser)]
#[command(name = "empire")]
#[command(author, version, about = "Browse, publish and watch from the terminal", long_about = None)]
pub struct Cli {
    /// Config file (defaults to empire.toml in the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Database URL, overriding the config file
    #[arg(long, global = true, value_name = "URL")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List blog posts, newest first
    Posts {
        /// Only the three featured on the home page
        #[arg(long, action = ArgAction::SetTrue)]
        featured: bool,
    },
    /// Show one post in full
    Post { id: String },
    /// List the media gallery
    Media {
        /// movie, tv, video or photo
        #[arg(short, long)]
        kind: Option<MediaKind>,
        /// Match title, description or tags
        #[arg(short, long)]
        search: Option<String>,
        /// Only items kept for offline viewing
        #[arg(long, action = ArgAction::SetTrue)]
        offline: bool,
        /// home, travel, mcdonalds or arcade
        #[arg(long, value_name = "LOCATION")]
        at: Option<Location>,
    },
    /// Open the player on a media item (interactive)
    Watch { id: String },
    /// Publish a blog post
    PublishPost {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "Soul Candy")]
        category: Category,
        /// Defaults to the start of the content
        #[arg(long)]
        excerpt: Option<String>,
        /// Comma-separated
        #[arg(long, default_value = "")]
        tags: String,
        /// Cover image file
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
        /// Accept the imperial terms
        #[arg(long, action = ArgAction::SetTrue)]
        agree: bool,
    },
    /// Publish a media item
    PublishMedia {
        #[arg(long, default_value = "movie")]
        kind: MediaKind,
        /// Start from an archive clip (1-3)
        #[arg(long, value_name = "N")]
        stock: Option<usize>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "2011")]
        year: String,
        #[arg(long, default_value_t = 5)]
        rating: u8,
        /// Comma-separated
        #[arg(long)]
        tags: Option<String>,
        /// Image or video file
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
        #[arg(long, action = ArgAction::SetTrue)]
        agree: bool,
    },
    /// Show or edit the press kit
    Press {
        #[command(subcommand)]
        action: PressAction,
    },
    /// Show the theme, or flip it
    Theme {
        #[arg(long, action = ArgAction::SetTrue)]
        toggle: bool,
    },
    /// Toggle offline availability of a media item
    Cache { id: String },
    /// Ask the oracle
    Oracle {
        #[command(subcommand)]
        action: OracleAction,
    },
    /// Browse the mall and claim items
    Mall {
        /// free or vip
        #[arg(long, default_value = "free")]
        tab: MallTab,
        /// Item ids to claim
        #[arg(long, value_name = "ID")]
        claim: Vec<String>,
    },
    /// Send a scroll to the palace
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        message: String,
    },
}

#[derive(Subcommand)]
pub enum PressAction {
    Show,
    /// Set a top-level field (hero-title, hero-tagline, hero-intro, hero-image,
    /// quote, quote-author, pitch-title, pitch-desc, email)
    Set { field: String, value: String },
    /// Set a network card field by index (0-3)
    Card {
        index: usize,
        #[arg(value_parser = parse_card_field)]
        field: CardField,
        value: String,
    },
}

#[derive(Subcommand)]
pub enum OracleAction {
    /// Daily mantra for a mood
    Mantra {
        #[arg(default_value = "sparkly")]
        mood: String,
    },
    /// Ask a question, optionally about a picture
    Ask {
        #[arg(default_value = "")]
        question: String,
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },
    /// "What do I like?"
    Profile { input: String },
}

fn parse_card_field(s: &str) -> Result<CardField, String> {
    match s.to_ascii_lowercase().as_str() {
        "title" => Ok(CardField::Title),
        "tagline" => Ok(CardField::Tagline),
        "desc" | "description" => Ok(CardField::Desc),
        other => Err(format!("unknown card field `{}` (expected title, tagline, desc)", other)),
    }
}
