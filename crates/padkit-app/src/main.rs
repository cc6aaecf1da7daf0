//! padkit skin inspector.
//!
//! Loads a controller skin, resolves a trait against it, and prints the
//! layout, screen placement and hit regions for a container size. An
//! optional touch script is replayed through the input mapper and the
//! resulting press/release events are printed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use padkit_skin::{
    Device, DisplayType, FsImageLoader, ImageLoader, Orientation, SkinDescriptor, SkinImage,
    SkinRegistry, SkinTraits, SkinView,
};
use padkit_types::config::EngineConfig;
use padkit_types::geometry::{Point, Size};
use padkit_types::input::{InputEvent, RecordingSink, TouchPhase};

// ---------------------------------------------------------------------------
// CLI parsing
// ---------------------------------------------------------------------------

const USAGE: &str = "Usage: padkit-inspect <skin.json|skin-dir|skin-id> [--skins DIR] \
[--device phone|tablet] [--display standard|edgeToEdge|splitView|stageManager|externalDisplay] \
[--orientation portrait|landscape] [--size WxH] [--config engine.toml] [--touch x,y ...]";

#[derive(Debug, PartialEq)]
struct Args {
    /// Skin identifier or filesystem path.
    skin: String,
    /// Directory of skins to register before resolving `skin`.
    skins_dir: Option<PathBuf>,
    traits: SkinTraits,
    container: Size,
    config: Option<PathBuf>,
    /// Touch samples in container space, replayed as one finger.
    touches: Vec<Point>,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut skin = None;
    let mut skins_dir = None;
    let mut device = Device::Phone;
    let mut display = DisplayType::EdgeToEdge;
    let mut orientation = Orientation::Portrait;
    let mut container = Size::new(390.0, 844.0);
    let mut config = None;
    let mut touches = Vec::new();

    let mut iter = argv.into_iter();
    while let Some(arg) = iter.next() {
        let mut value = || iter.next().with_context(|| format!("{arg} needs a value"));
        match arg.as_str() {
            "--skins" => skins_dir = Some(PathBuf::from(value()?)),
            "--device" => {
                let v = value()?;
                device = Device::from_key(&v).with_context(|| format!("unknown device '{v}'"))?;
            },
            "--display" => {
                let v = value()?;
                display = DisplayType::from_key(&v)
                    .with_context(|| format!("unknown display type '{v}'"))?;
            },
            "--orientation" => {
                let v = value()?;
                orientation = Orientation::from_key(&v)
                    .with_context(|| format!("unknown orientation '{v}'"))?;
            },
            "--size" => container = parse_size(&value()?)?,
            "--config" => config = Some(PathBuf::from(value()?)),
            "--touch" => touches.push(parse_point(&value()?)?),
            "-h" | "--help" => bail!("{USAGE}"),
            other if other.starts_with("--") => bail!("unknown argument: {other}\n{USAGE}"),
            other => {
                if skin.replace(other.to_string()).is_some() {
                    bail!("more than one skin given\n{USAGE}");
                }
            },
        }
    }

    Ok(Args {
        skin: skin.with_context(|| format!("no skin given\n{USAGE}"))?,
        skins_dir,
        traits: SkinTraits::new(device, display, orientation),
        container,
        config,
        touches,
    })
}

fn parse_size(s: &str) -> Result<Size> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("size '{s}' is not WxH"))?;
    let size = Size::new(w.trim().parse()?, h.trim().parse()?);
    if !size.is_valid() {
        bail!("size '{s}' must be positive");
    }
    Ok(size)
}

fn parse_point(s: &str) -> Result<Point> {
    let (x, y) = s
        .split_once(',')
        .with_context(|| format!("touch '{s}' is not x,y"))?;
    Ok(Point::new(x.trim().parse()?, y.trim().parse()?))
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

fn load_skin(args: &Args) -> Result<Arc<SkinDescriptor>> {
    let mut registry = SkinRegistry::new();
    if let Some(ref dir) = args.skins_dir {
        registry.load_directory(dir);
    }
    let skin = registry
        .resolve(&args.skin)
        .with_context(|| format!("loading skin '{}'", args.skin))?;
    log::info!("Loaded skin '{}' from {}", skin.identifier(), args.skin);
    Ok(skin)
}

/// Load the artwork for the view's resolved trait. Failures are logged and
/// leave the report without artwork.
fn load_artwork(view: &SkinView, loader: &dyn ImageLoader) -> Option<SkinImage> {
    match loader.load(view.skin(), view.traits()) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("Artwork for {} unavailable: {e}", view.traits());
            None
        },
    }
}

/// Replay the touch script: first sample begins, the rest move, and a
/// final touch-up ends it.
fn replay(view: &mut SkinView, touches: &[Point]) -> Vec<InputEvent> {
    let mut sink = RecordingSink::new();
    for (i, point) in touches.iter().enumerate() {
        let phase = if i == 0 {
            TouchPhase::Began
        } else {
            TouchPhase::Moved
        };
        view.handle_touch(*point, phase, &mut sink);
    }
    if let Some(last) = touches.last() {
        view.handle_touch(*last, TouchPhase::Ended, &mut sink);
    }
    sink.take()
}

fn print_report(view: &SkinView) {
    let skin = view.skin();
    println!("Skin:        {} ({})", skin.name(), skin.identifier());
    println!("Game type:   {}", skin.game_type().as_str());
    println!("Requested:   {}", view.requested_traits());
    println!("Resolved:    {}", view.traits());
    println!(
        "Container:   {}x{}",
        view.container_size().width,
        view.container_size().height
    );

    let supported: Vec<String> = skin.supported_traits().iter().map(|t| t.to_string()).collect();
    println!("Supported:   {}", supported.join(", "));

    match view.current_layout() {
        Some(l) => println!(
            "Layout:      scale {:.4}, {:.1}x{:.1} at ({:.1}, {:.1})",
            l.scale, l.width, l.height, l.x_offset, l.y_offset
        ),
        None => println!("Layout:      none"),
    }

    let frames = view.screen_frames();
    if frames.is_empty() {
        println!("Screen:      none");
    }
    for (i, f) in frames.iter().enumerate() {
        println!(
            "Screen {i}:    {:.1}x{:.1} at ({:.1}, {:.1})",
            f.width, f.height, f.x, f.y
        );
    }

    let regions = view.debug_hit_regions();
    println!("Hit regions: {}", regions.len());
    for r in &regions {
        println!(
            "  {:<40} frame ({:.1}, {:.1}, {:.1}, {:.1})  hit ({:.1}, {:.1}, {:.1}, {:.1})",
            r.button_id,
            r.frame.x,
            r.frame.y,
            r.frame.width,
            r.frame.height,
            r.hit_frame.x,
            r.hit_frame.y,
            r.hit_frame.width,
            r.hit_frame.height
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = match args.config {
        Some(ref path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let skin = load_skin(&args)?;
    let mut view = SkinView::new(skin, args.traits, args.container, &config);
    print_report(&view);

    match load_artwork(&view, &FsImageLoader) {
        Some(image) => println!("Artwork:     {}x{}", image.width, image.height),
        None => println!("Artwork:     unavailable"),
    }

    if !args.touches.is_empty() {
        println!("Events:");
        for event in replay(&mut view, &args.touches) {
            match event {
                InputEvent::Pressed(c) => println!("  pressed  {c}"),
                InputEvent::Released(c) => println!("  released {c}"),
            }
        }
    }
    Ok(())
}
