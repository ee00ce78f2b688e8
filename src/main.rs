mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use cli::{Cli, Commands, OracleAction, PressAction};
use empire::config::EmpireConfig;
use empire::db::Database;
use empire::editors::{BlogDraft, ContactForm, MediaDraft, Upload};
use empire::error::Notice;
use empire::library::KindFilter;
use empire::oracle::{AdviceBackend, FailingBackend, GeminiClient, InlineImage, Oracle};
use empire::player::{format_time, AspectRatio};
use empire::seed::STOCK_ASSETS;
use empire::storage::Storage;
use empire::surface::{FullscreenHost, MediaSurface, PlayerEvent, WatchSession};
use empire::types::{BlogPost, Connectivity, MediaItem, Page};
use empire::watch::{Direction, WatchStatus};
use empire::Empire;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = EmpireConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.database {
        config.database_url = Some(url);
    }

    match cli.command {
        Commands::Oracle { action } => return run_oracle(&config, action).await,
        Commands::Contact { name, email, subject, message } => {
            let mut form = ContactForm::new(name, email, message);
            if let Some(subject) = subject {
                form.subject = subject;
            }
            form.submit()?;
            println!("Sending scroll \"{}\" to the palace...", form.subject);
            form.delivered();
            println!("Scroll delivered! The Empress will read it soon. 💌");
            return Ok(());
        }
        _ => {}
    }

    let mut empire = Empire::open(&config).await?;
    match cli.command {
        Commands::Posts { featured } => {
            let shell = empire.shell();
            let posts = if featured { shell.featured() } else { shell.library().posts() };
            for post in posts {
                print_post_line(post);
            }
        }
        Commands::Post { id } => {
            let post = empire.shell_mut().open_post(&id)?;
            println!("{}\n{} | {}\n", post.title, post.category, post.date);
            println!("{}", post.content);
            if !post.tags.is_empty() {
                println!("\n#{}", post.tags.join(" #"));
            }
        }
        Commands::Media { kind, search, offline, at } => {
            let shell = empire.shell_mut();
            shell.navigate(Page::Cinema);
            let filter = shell.gallery_filter_mut();
            filter.kind = kind.map(KindFilter::Only).unwrap_or_default();
            filter.search = search.unwrap_or_default();
            shell.set_connectivity(if offline { Connectivity::Offline } else { Connectivity::Online });
            if let Some(at) = at {
                shell.set_location(at);
            }
            println!("== {} ==", shell.gallery_title());
            for item in shell.gallery() {
                print_media_line(item, shell.library().is_cached(&item.id));
            }
        }
        Commands::Watch { id } => run_watch(&mut empire, &id).await?,
        Commands::PublishPost { title, content, category, excerpt, tags, image, agree } => {
            let mut draft = BlogDraft { title, content, category, tags, agreed_to_terms: agree, ..BlogDraft::default() };
            draft.excerpt = excerpt.unwrap_or_default();
            if let Some(path) = image {
                draft.attach(upload_from_file(&path).await?);
            }
            let post = empire.publish_post(&draft).await?;
            println!("Published {} ({})", post.title, post.id);
        }
        Commands::PublishMedia { kind, stock, title, description, year, rating, tags, file, agree } => {
            let mut draft = MediaDraft::new(kind);
            if let Some(n) = stock {
                let asset = n
                    .checked_sub(1)
                    .and_then(|i| STOCK_ASSETS.get(i))
                    .ok_or_else(|| anyhow!("no archive clip {} (expected 1-{})", n, STOCK_ASSETS.len()))?;
                draft.apply_stock(asset);
            }
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(tags) = tags {
                draft.tags = tags;
            }
            draft.year = year;
            draft.rating = rating;
            draft.agreed_to_terms = agree;
            if let Some(path) = file {
                draft.attach(upload_from_file(&path).await?);
            }
            let item = empire.publish_media(&draft).await?;
            println!("Published {} {} ({})", item.kind, item.title, item.id);
        }
        Commands::Press { action } => match action {
            PressAction::Show => print_press(&empire),
            PressAction::Set { field, value } => {
                let mut draft = empire.shell_mut().edit_press();
                let c = &mut draft.content;
                let slot = match field.as_str() {
                    "hero-title" => &mut c.hero_title,
                    "hero-tagline" => &mut c.hero_tagline,
                    "hero-intro" => &mut c.hero_intro,
                    "hero-image" => &mut c.hero_image_url,
                    "quote" => &mut c.quote_text,
                    "quote-author" => &mut c.quote_author,
                    "pitch-title" => &mut c.collab_pitch_title,
                    "pitch-desc" => &mut c.collab_pitch_desc,
                    "email" => &mut c.contact_email,
                    other => bail!("unknown press field `{}`", other),
                };
                *slot = value;
                empire.save_press(draft).await;
                print_press(&empire);
            }
            PressAction::Card { index, field, value } => {
                let mut draft = empire.shell_mut().edit_press();
                draft.set_card(index, field, value)?;
                empire.save_press(draft).await;
                print_press(&empire);
            }
        },
        Commands::Theme { toggle } => {
            let dark = if toggle { empire.toggle_theme().await } else { empire.shell().dark_mode() };
            println!("{}", if dark { "dark" } else { "light" });
        }
        Commands::Cache { id } => {
            let cached = empire.toggle_cached(&id).await?;
            println!("{} {}", id, if cached { "is now in the Imperial Cache" } else { "needs a connection again" });
        }
        Commands::Mall { tab, claim } => {
            let mall = empire.mall_mut();
            for id in &claim {
                println!("{}", mall.claim(id)?.message());
            }
            println!("== {} ==", tab.title());
            for item in mall.catalog(tab) {
                let mark = if mall.is_claimed(&item.id) { "✓" } else { " " };
                println!("[{}] {:<5} {:<12} {} ({})", mark, item.id, item.price.to_string(), item.name, item.category);
            }
        }
        Commands::Oracle { .. } | Commands::Contact { .. } => {}
    }

    print_notices(&empire.take_notices());
    Ok(())
}

fn print_post_line(post: &BlogPost) {
    println!("{:<34} {:<14} {:<16} {}", post.id, post.date, post.category.to_string(), post.title);
}

fn print_media_line(item: &MediaItem, cached: bool) {
    let stream = if item.has_stream() { "▶" } else { " " };
    let offline = if cached { "⬇" } else { " " };
    println!("{}{} {:<34} {:<6} {:<10} {}", stream, offline, item.id, item.kind.as_str(), item.year, item.title);
}

fn print_press<S: Storage>(empire: &Empire<S>) {
    let p = empire.shell().press();
    println!("{}\n{}\n\n{}\n", p.hero_title, p.hero_tagline, p.hero_intro);
    println!("\"{}\" - {}\n", p.quote_text, p.quote_author);
    for (i, card) in p.network_cards.iter().enumerate() {
        println!("[{}] {}: {}\n    {}", i, card.title, card.tagline, card.desc);
    }
    println!("\n{}\n{}\n{}", p.collab_pitch_title, p.collab_pitch_desc, p.contact_email);
}

fn print_notices(notices: &[Notice]) {
    for n in notices {
        eprintln!("! [{:?}] {}", n.kind, n.message);
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        _ => "image/jpeg",
    }
}

async fn upload_from_file(path: &Path) -> Result<Upload> {
    let bytes = tokio::fs::read(path).await.with_context(|| format!("failed to read {}", path.display()))?;
    let mime = mime_for(path).to_string();
    let data_url = format!("data:{};base64,{}", mime, STANDARD.encode(&bytes));
    Ok(Upload { mime, data_url })
}

async fn run_oracle(config: &EmpireConfig, action: OracleAction) -> Result<()> {
    let backend: Box<dyn AdviceBackend> = match GeminiClient::new(&config.oracle) {
        Ok(client) => Box::new(client),
        Err(e) => {
            info!(error = %e, "oracle offline");
            Box::new(FailingBackend::new(e.to_string()))
        }
    };
    let oracle = Oracle::new(backend);
    let reply = match action {
        OracleAction::Mantra { mood } => Some(oracle.mantra(&mood).await),
        OracleAction::Ask { question, image } => {
            let image = match image {
                Some(path) => {
                    let upload = upload_from_file(&path).await?;
                    let mut inline = InlineImage::from_data_url(&upload.data_url);
                    inline.mime_type = upload.mime;
                    Some(inline)
                }
                None => None,
            };
            oracle.ask(&question, image).await
        }
        OracleAction::Profile { input } => oracle.profile(&input).await,
    };
    match reply {
        Some(text) => println!("{}", text),
        None => bail!("ask the oracle something first"),
    }
    Ok(())
}

/// Stands in for a video element: every request succeeds at once.
struct TerminalSurface;

#[async_trait]
impl MediaSurface for TerminalSurface {
    async fn load(&self, item: &MediaItem) -> Result<()> {
        match &item.video_url {
            Some(url) if item.has_stream() => println!("~ tuned to {} ({})", item.title, url),
            _ => println!("~ showing still of {} ({})", item.title, item.image_url),
        }
        Ok(())
    }
    async fn play(&self) -> Result<()> { Ok(()) }
    async fn pause(&self) -> Result<()> { Ok(()) }
    async fn seek(&self, _position: f64) -> Result<()> { Ok(()) }
    async fn set_volume(&self, _level: f64, _muted: bool) -> Result<()> { Ok(()) }
}

struct TerminalHost;

#[async_trait]
impl FullscreenHost for TerminalHost {
    async fn request(&self) -> Result<()> { Err(anyhow!("a terminal has no fullscreen")) }
    async fn exit(&self) -> Result<()> { Ok(()) }
}

const WATCH_HELP: &str = "commands: play | seek <s> | vol <0-1> | mute | aspect <ratio> | fs | static | next | prev | guide | go <id> | meta <secs> | time <secs> | end | status | quit";

fn parse_watch_command(line: &str) -> Result<Option<PlayerEvent>> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else { return Ok(None) };
    let arg = words.next();
    let num = |a: Option<&str>| -> Result<f64> {
        a.ok_or_else(|| anyhow!("`{}` needs a number", cmd))?.parse::<f64>().context("not a number")
    };
    let event = match cmd {
        "play" | "pause" | "p" => PlayerEvent::TogglePlay,
        "seek" => PlayerEvent::Seek(num(arg)?),
        "vol" | "volume" => PlayerEvent::SetVolume(num(arg)?),
        "mute" | "m" => PlayerEvent::ToggleMute,
        "aspect" => PlayerEvent::SetAspect(arg.unwrap_or("original").parse::<AspectRatio>()?),
        "fs" | "fullscreen" => PlayerEvent::ToggleFullscreen,
        "static" => PlayerEvent::ToggleStatic,
        "next" | "n" => PlayerEvent::Switch(Direction::Next),
        "prev" => PlayerEvent::Switch(Direction::Prev),
        "guide" | "g" => PlayerEvent::OpenGuide,
        "close" => PlayerEvent::CloseGuide,
        "go" => PlayerEvent::SelectFromGuide(arg.ok_or_else(|| anyhow!("`go` needs an id"))?.to_string()),
        "meta" => PlayerEvent::MetadataLoaded(num(arg)?),
        "time" => PlayerEvent::TimeUpdate(num(arg)?),
        "end" => PlayerEvent::Ended,
        "status" | "s" => return Ok(None),
        other => bail!("unknown command `{}`\n{}", other, WATCH_HELP),
    };
    Ok(Some(event))
}

fn print_status(s: &WatchStatus) {
    let state = if s.playing { "▶" } else { "⏸" };
    let volume = if s.muted { "muted".to_string() } else { format!("{:.0}%", s.volume * 100.0) };
    println!(
        "CH {:02}/{:02} {} {} | {} / {} | vol {} | {}{}{}",
        s.channel,
        s.channels,
        state,
        s.title,
        format_time(s.elapsed),
        format_time(s.duration),
        volume,
        s.aspect,
        if s.fullscreen { " | fullscreen" } else { "" },
        if s.static_overlay { " | static" } else { "" },
    );
}

async fn run_watch(empire: &mut Empire<Database>, id: &str) -> Result<()> {
    let view = empire.shell_mut().watch_media(id)?.clone();
    let guide = view.guide();
    let mut handle = WatchSession::spawn(view, Arc::new(TerminalSurface), Arc::new(TerminalHost));
    println!("{}", WATCH_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if matches!(line, "quit" | "q" | "exit") {
            break;
        }
        match parse_watch_command(line) {
            Ok(Some(event)) => {
                let opens_guide = event == PlayerEvent::OpenGuide;
                let status = handle.apply(event).await?;
                if opens_guide {
                    let current = status.id;
                    for entry in &guide {
                        let mark = if entry.id == current { ">" } else { " " };
                        println!("{} {:02} {:<34} {}", mark, entry.number, entry.id, entry.title);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("{:#}", e);
                continue;
            }
        }
        print_status(&handle.status());
        print_notices(&handle.drain_notices());
    }

    handle.shutdown().await;
    empire.shell_mut().back();
    Ok(())
}
