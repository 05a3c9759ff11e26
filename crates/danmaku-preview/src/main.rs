//! Danmaku Preview
//!
//! Renders a single frame of danmaku to a PNG so styles can be checked
//! without a player. With no comment file the placeholder danmaku is drawn.

mod config;
mod scene;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::PreviewConfig;
use danmaku_render::{
    dummy_danmaku, Canvas, Color, DanmakuLocation, DanmakuPresentation, FontdueMeasurer,
    SizeSpecifiedDanmaku, StyledDanmaku, TextStyle,
};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

// Use mimalloc as the global allocator for reduced memory fragmentation
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Debug, Parser)]
#[command(name = "danmaku-preview", version, about = "Render danmaku to a PNG preview")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON array of danmaku presentations
    #[arg(long)]
    comments: Option<PathBuf>,

    /// Font file, overrides the config
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Output PNG, overrides the config
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append emission timestamps to comment text
    #[arg(long)]
    debug: bool,

    /// Log measurements and image creation
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .compact()
        .init();

    let mut config = match &args.config {
        Some(path) => PreviewConfig::from_toml_file(path)?,
        None => PreviewConfig::default(),
    };
    if let Some(font) = args.font {
        config.font_path = Some(font);
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if args.debug {
        config.danmaku.is_debug = true;
    }

    let Some(font_path) = config.font_path.clone() else {
        bail!("no font given; pass --font or set font_path in the config");
    };
    let measurer = FontdueMeasurer::from_file(&font_path)
        .with_context(|| format!("failed to load font {}", font_path.display()))?;

    let base_style = TextStyle::new(config.base_font_size);
    let danmaku = match &args.comments {
        Some(path) => load_comments(path)?
            .into_iter()
            .map(|p| StyledDanmaku::from_config(p, &measurer, &base_style, &config.danmaku))
            .collect(),
        None => vec![dummy_danmaku(&measurer, &base_style, &config.danmaku.style)],
    };

    info!("Rendering {} danmaku", danmaku.len());

    let items: Vec<_> = danmaku
        .iter()
        .map(|d| (d.presentation().danmaku.location, d))
        .collect();
    let placements = scene::layout(
        &items,
        config.frame_width,
        config.frame_height,
        config.lane_spacing,
    );

    let mut frame = Canvas::filled(
        config.frame_width,
        config.frame_height,
        Color::from_argb(config.background),
    );
    for (d, placement) in danmaku.iter().zip(&placements) {
        debug!(
            "{:?} {}x{} at ({}, {})",
            d.presentation().danmaku.id,
            d.danmaku_width(),
            d.danmaku_height(),
            placement.x,
            placement.y
        );
        d.draw(&mut frame, || placement.x, || placement.y);
    }

    frame
        .save_png(&config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    info!("Wrote {}", config.output.display());
    Ok(())
}

fn load_comments(path: &std::path::Path) -> Result<Vec<DanmakuPresentation>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let comments: Vec<DanmakuPresentation> = serde_json::from_str(&content)
        .with_context(|| format!("invalid comment list {}", path.display()))?;

    let pinned = comments
        .iter()
        .filter(|c| c.danmaku.location != DanmakuLocation::Normal)
        .count();
    info!(
        "Loaded {} comments ({} pinned) from {}",
        comments.len(),
        pinned,
        path.display()
    );
    Ok(comments)
}
