use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use makeover::face::reference::reference_face;
use makeover::makeup::sprites::{FsSpriteLoader, MemorySpriteLoader, SpriteCache, SpriteLoader};
use makeover::texture::color::dominant_color;
use makeover::{
    Canvas, ComparisonController, ContainerBounds, EngineProfile, EntitlementPayload,
    FeatureManager, HexColor, ImageModeManager, MakeupStudio, MakeupType, Pixmap, RenderContext,
    StaticDetector,
};

#[derive(Parser, Debug)]
#[command(name = "makeover", version)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply one makeup type to a still image and write a PNG.
    Apply(ApplyArgs),
    /// List enabled makeup types and their patterns.
    Patterns(PatternsArgs),
    /// Print the dominant color of a swatch image.
    Swatch(SwatchArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input PNG or JPEG.
    #[arg(long)]
    image: PathBuf,

    /// Landmark JSON (`[{x, y}, ...]`, normalized to the image). Defaults to a
    /// centered reference face.
    #[arg(long)]
    landmarks: Option<PathBuf>,

    /// Makeup type, e.g. `lips` or `eyeliner`.
    #[arg(long = "type", default_value = "lips")]
    kind: String,

    /// `#RRGGBB`.
    #[arg(long, default_value = "#FF0000")]
    color: String,

    #[arg(long)]
    pattern: Option<String>,

    /// Universal strength knob in `[0, 1]`.
    #[arg(long, value_parser = parse_unit)]
    transparency: Option<f64>,

    /// Split-view divider position in `[0, 1]`; the left part shows the makeup.
    #[arg(long, value_parser = parse_unit)]
    compare: Option<f64>,

    /// Entitlement JSON (`allowedFeatures` / `allowedPatterns`).
    #[arg(long)]
    entitlements: Option<PathBuf>,

    /// Sprite directory (`<feature>/<style>-left.png`). Built-in sprites otherwise.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Browser user agent used to pick engine tuning.
    #[arg(long, default_value = "")]
    user_agent: String,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PatternsArgs {
    #[arg(long)]
    entitlements: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SwatchArgs {
    #[arg(long)]
    image: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Patterns(args) => cmd_patterns(args),
        Command::Swatch(args) => cmd_swatch(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_unit(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("{v} is outside [0, 1]"))
    }
}

fn read_image(path: &Path) -> anyhow::Result<Pixmap> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    Pixmap::decode(&bytes).with_context(|| format!("decode image '{}'", path.display()))
}

fn load_features(path: Option<&Path>) -> anyhow::Result<FeatureManager> {
    let payload = path.map(EntitlementPayload::from_path).transpose()?;
    Ok(FeatureManager::new(payload))
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let image = read_image(&args.image)?;
    let kind: MakeupType = args.kind.parse()?;
    let color: HexColor = args.color.parse()?;
    let features = load_features(args.entitlements.as_deref())?;
    if !features.is_enabled(kind) {
        anyhow::bail!("makeup type '{kind}' is not enabled");
    }
    if let Some(pattern) = &args.pattern
        && !features.allowed_patterns(kind).contains(pattern)
    {
        anyhow::bail!("pattern '{pattern}' is not allowed for {kind}");
    }

    let loader: Arc<dyn SpriteLoader> = match &args.assets {
        Some(dir) => Arc::new(FsSpriteLoader::new(dir)),
        None => Arc::new(MemorySpriteLoader::builtin()?),
    };
    let profile = EngineProfile::from_user_agent(&args.user_agent);
    let mut studio = MakeupStudio::new(profile, SpriteCache::blocking(loader)).with_seed(args.seed);
    let mut detector = match &args.landmarks {
        Some(path) => StaticDetector::from_json_file(path)?,
        None => StaticDetector::new(reference_face()),
    };

    let (w, h) = (image.width(), image.height());
    let mut comparison = ComparisonController::new(ContainerBounds {
        left: 0.0,
        width: f64::from(w),
    });
    if let Some(position) = args.compare {
        comparison.enable();
        comparison.set_position(position);
    }

    let mut mgr = ImageModeManager::new(Canvas::new(w, h)?, w, h)?;
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: Some(&comparison),
    };
    if !mgr.load_image(image, &mut detector, &mut cx) {
        anyhow::bail!("no face detected in '{}'", args.image.display());
    }
    mgr.update_makeup(
        kind,
        color,
        args.pattern.as_deref(),
        args.transparency,
        &mut cx,
    );

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = mgr.png_bytes()?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_patterns(args: PatternsArgs) -> anyhow::Result<()> {
    let features = load_features(args.entitlements.as_deref())?;
    for kind in features.enabled_features() {
        println!("{kind}: {}", features.allowed_patterns(kind).join(", "));
    }
    Ok(())
}

fn cmd_swatch(args: SwatchArgs) -> anyhow::Result<()> {
    let image = read_image(&args.image)?;
    println!("{}", dominant_color(&image));
    Ok(())
}
