use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use photostrip::{
    Canvas, CaptionStyle, Compositor, CompositorConfig, FontBook, FrameCatalog,
    ImageSource, LayoutCatalog, LayoutTemplate, Point, RedrawFlag, RenderOptions, StickerEngine,
};

#[derive(Parser, Debug)]
#[command(name = "photostrip", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog layouts and their frames.
    Layouts(CatalogArgs),
    /// Render thumbnails of every frame option for a layout.
    Frames(FramesArgs),
    /// Composite photos into a layout and write a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Layout catalog JSON (defaults to the built-in catalog).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Frame catalog JSON (defaults to the built-in frames).
    #[arg(long)]
    frames: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct AssetArgs {
    /// Directory containing .ttf/.otf fonts for text layers.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Root for relative frame image paths.
    #[arg(long, default_value = ".")]
    assets: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    #[command(flatten)]
    assets: AssetArgs,

    /// Layout id.
    #[arg(long)]
    layout: String,

    /// Photo path or data URL; repeat in slot order.
    #[arg(long = "photo")]
    photos: Vec<String>,

    /// Directory receiving `<frame-id>.png` thumbnails.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CaptionArg {
    Quoted,
    Dashed,
    Questioning,
}

impl From<CaptionArg> for CaptionStyle {
    fn from(v: CaptionArg) -> Self {
        match v {
            CaptionArg::Quoted => Self::Quoted,
            CaptionArg::Dashed => Self::Dashed,
            CaptionArg::Questioning => Self::Questioning,
        }
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    #[command(flatten)]
    assets: AssetArgs,

    /// Layout id.
    #[arg(long)]
    layout: String,

    /// Frame id to dress the layout with.
    #[arg(long)]
    frame: Option<String>,

    /// Photo path or data URL; repeat in slot order.
    #[arg(long = "photo")]
    photos: Vec<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render options JSON applied before the flags below.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Hide branding text (ignored for layouts with locked branding).
    #[arg(long, default_value_t = false)]
    no_text: bool,

    /// Print the date in the meta line.
    #[arg(long, default_value_t = false)]
    date: bool,

    /// Date to print instead of today (YYYY-MM-DD).
    #[arg(long)]
    on: Option<chrono::NaiveDate>,

    /// Location text for the meta line.
    #[arg(long)]
    location: Option<String>,

    /// Caption text.
    #[arg(long)]
    caption: Option<String>,

    /// Caption decoration.
    #[arg(long, value_enum)]
    caption_style: Option<CaptionArg>,

    /// Background color for frameless layouts.
    #[arg(long)]
    bg_color: Option<String>,

    /// Output scale factor.
    #[arg(long)]
    scale: Option<f64>,

    /// Sticker as `path[@x,y[,scale[,rotation_deg]]]`; repeat to stack.
    #[arg(long = "sticker")]
    stickers: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Layouts(args) => cmd_layouts(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_layouts(args: CatalogArgs) -> anyhow::Result<()> {
    let (layouts, frames) = load_catalogs(&args)?;
    for l in layouts.iter() {
        println!(
            "{:<14} {:>4}x{:<4} {} photo(s)  {}",
            l.id, l.width, l.height, l.photo_count, l.name
        );
        for f in frames.frames_for_layout(&l.id) {
            println!("    frame {:<16} {}", f.id, f.name);
        }
    }
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (layouts, frames) = load_catalogs(&args.catalog)?;
    let layout = find_layout(&layouts, &args.layout)?;
    let options = frames.frames_for_layout(&layout.id).collect::<Vec<_>>();
    let photos = photo_sources(&args.photos)?;

    let mut compositor = compositor(&args.assets)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for preview in compositor.render_frame_previews(layout, &options, &photos) {
        let out = args.out_dir.join(format!("{}.png", preview.frame_id));
        preview.image?.save_png(&out)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (layouts, frames) = load_catalogs(&args.catalog)?;
    let mut layout = find_layout(&layouts, &args.layout)?.clone();
    if let Some(id) = &args.frame {
        let frame = frames
            .get_by_id(id)
            .with_context(|| format!("unknown frame '{id}'"))?;
        if frame.layout_id != layout.id {
            anyhow::bail!("frame '{id}' belongs to layout '{}'", frame.layout_id);
        }
        layout = layout.with_frame(frame);
    }

    let options = render_options(&args)?;
    let photos = photo_sources(&args.photos)?;
    let stickers = sticker_engine(&layout, &args.stickers)?;

    let mut compositor = compositor(&args.assets)?;
    let image = compositor.render(&layout, &photos, stickers.as_ref(), &options)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn load_catalogs(args: &CatalogArgs) -> anyhow::Result<(LayoutCatalog, FrameCatalog)> {
    let layouts = match &args.catalog {
        Some(path) => LayoutCatalog::from_path(path)?,
        None => LayoutCatalog::builtin(),
    };
    let frames = match &args.frames {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read frame catalog '{}'", path.display()))?;
            FrameCatalog::from_json(&json)?
        }
        None => FrameCatalog::builtin(),
    };
    Ok((layouts, frames))
}

fn find_layout<'a>(layouts: &'a LayoutCatalog, id: &str) -> anyhow::Result<&'a LayoutTemplate> {
    layouts
        .get_by_id(id)
        .with_context(|| format!("unknown layout '{id}'"))
}

fn compositor(args: &AssetArgs) -> anyhow::Result<Compositor> {
    let fonts = match &args.fonts {
        Some(dir) => FontBook::from_dir(dir)?,
        None => FontBook::new(),
    }
    .with_system_fallback();
    if fonts.is_empty() && fonts.fallback().is_none() {
        tracing::warn!("no fonts found; text layers will be skipped");
    }
    Ok(Compositor::new(CompositorConfig {
        assets_root: args.assets.clone(),
        fonts,
    }))
}

fn render_options(args: &RenderArgs) -> anyhow::Result<RenderOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read options '{}'", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parse options '{}'", path.display()))?
        }
        None => RenderOptions::default(),
    };

    if args.no_text {
        options.show_text = false;
    }
    if args.date {
        options.show_date = true;
    }
    if args.on.is_some() {
        options.date = args.on;
    }
    if let Some(loc) = &args.location {
        options.show_location = true;
        options.location_text = loc.clone();
    }
    if let Some(caption) = &args.caption {
        options.show_caption = true;
        options.caption_text = caption.clone();
    }
    if let Some(style) = args.caption_style {
        options.caption_style = style.into();
    }
    if let Some(bg) = &args.bg_color {
        options.bg_color = bg.clone();
    }
    if let Some(scale) = args.scale {
        options.scale = scale;
    }
    Ok(options)
}

/// Photo and sticker arguments are relative to the working directory, not the assets root.
fn cwd_source(reference: &str) -> anyhow::Result<ImageSource> {
    match ImageSource::from_reference(reference) {
        ImageSource::Path(p) if p.is_relative() => {
            let cwd = std::env::current_dir().context("resolve working directory")?;
            Ok(ImageSource::Path(cwd.join(p)))
        }
        other => Ok(other),
    }
}

fn photo_sources(refs: &[String]) -> anyhow::Result<Vec<ImageSource>> {
    refs.iter().map(|r| cwd_source(r)).collect()
}

#[derive(Debug, PartialEq)]
struct StickerSpec {
    path: String,
    center: Option<Point>,
    scale: f64,
    rotation_deg: f64,
}

fn parse_sticker_spec(spec: &str) -> anyhow::Result<StickerSpec> {
    let (path, placement) = match spec.rsplit_once('@') {
        Some((path, placement)) => (path, Some(placement)),
        None => (spec, None),
    };
    if path.is_empty() {
        anyhow::bail!("sticker '{spec}' has no image path");
    }

    let mut out = StickerSpec {
        path: path.to_string(),
        center: None,
        scale: 1.0,
        rotation_deg: 0.0,
    };
    let Some(placement) = placement else {
        return Ok(out);
    };

    let nums = placement
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .with_context(|| format!("sticker '{spec}': '{s}' is not a number"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    match nums.as_slice() {
        [x, y, rest @ ..] if rest.len() <= 2 => {
            out.center = Some(Point::new(*x, *y));
            if let Some(scale) = rest.first() {
                out.scale = *scale;
            }
            if let Some(rot) = rest.get(1) {
                out.rotation_deg = *rot;
            }
            Ok(out)
        }
        _ => anyhow::bail!("sticker '{spec}': expected path@x,y[,scale[,rotation_deg]]"),
    }
}

fn sticker_engine(
    layout: &LayoutTemplate,
    specs: &[String],
) -> anyhow::Result<Option<StickerEngine>> {
    if specs.is_empty() {
        return Ok(None);
    }
    let canvas = Canvas {
        width: layout.width,
        height: layout.height,
    };
    let mut engine = StickerEngine::new(canvas, RedrawFlag::new());
    for spec in specs {
        let spec = parse_sticker_spec(spec)?;
        let Some(id) = engine.add_sticker(&cwd_source(&spec.path)?, spec.scale) else {
            continue;
        };
        let center = spec.center.unwrap_or_else(|| canvas.center());
        engine.place(id, center, spec.rotation_deg.to_radians());
    }
    Ok(Some(engine))
}
