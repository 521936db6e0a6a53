//! Left/right sprite pairs for the image-driven layers (brows, eyelashes, eyeliner).
//!
//! Sprites are cached per `(feature, style)`. Loads run on the rayon pool and are
//! collected by [`SpriteCache::poll`]; a load that finishes after its feature moved
//! to another style is discarded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use anyhow::Context;
use kurbo::Rect;

use crate::foundation::core::HexColor;
use crate::foundation::error::{MakeoverError, MakeoverResult};
use crate::makeup::MakeupType;
use crate::raster::blend::CompositeOp;
use crate::raster::canvas::Canvas;
use crate::raster::paint::Paint;
use crate::raster::pixmap::Pixmap;

#[derive(Clone, Debug)]
pub struct SpritePair {
    pub left: Pixmap,
    pub right: Pixmap,
}

impl SpritePair {
    pub fn new(left: Pixmap, right: Pixmap) -> MakeoverResult<Self> {
        if left.is_empty() || right.is_empty() {
            return Err(MakeoverError::asset("sprite loaded with invalid dimensions"));
        }
        Ok(Self { left, right })
    }
}

pub trait SpriteLoader: Send + Sync {
    fn load(&self, feature: MakeupType, style: &str) -> MakeoverResult<SpritePair>;
}

/// Reads `<root>/<feature>/<style>-left.png` and `-right.png`.
#[derive(Clone, Debug)]
pub struct FsSpriteLoader {
    root: PathBuf,
}

impl FsSpriteLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, feature: MakeupType, style: &str, side: &str) -> PathBuf {
        self.root
            .join(feature.name())
            .join(format!("{style}-{side}.png"))
    }
}

fn read_sprite(path: &Path) -> MakeoverResult<Pixmap> {
    let bytes = std::fs::read(path).with_context(|| format!("read sprite {}", path.display()))?;
    Pixmap::decode(&bytes)
}

impl SpriteLoader for FsSpriteLoader {
    fn load(&self, feature: MakeupType, style: &str) -> MakeoverResult<SpritePair> {
        let left = read_sprite(&self.path_for(feature, style, "left"))?;
        let right = read_sprite(&self.path_for(feature, style, "right"))?;
        SpritePair::new(left, right)
    }
}

/// In-memory sprites, for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySpriteLoader {
    sprites: HashMap<(MakeupType, String), SpritePair>,
}

impl MemorySpriteLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, feature: MakeupType, style: &str, pair: SpritePair) -> Self {
        self.sprites.insert((feature, style.to_string()), pair);
        self
    }

    /// Procedural stand-ins for every built-in sprite style.
    pub fn builtin() -> MakeoverResult<Self> {
        let mut out = Self::new();
        for (feature, style) in [
            (MakeupType::Brows, "normal"),
            (MakeupType::Eyelashes, "long-lash"),
            (MakeupType::Eyelashes, "volume-boost"),
            (MakeupType::Eyeliner, "normal"),
            (MakeupType::Eyeliner, "lashed"),
        ] {
            let right = builtin_sprite(feature, style)?;
            let left = mirror(&right)?;
            out = out.with(feature, style, SpritePair::new(left, right)?);
        }
        Ok(out)
    }
}

impl SpriteLoader for MemorySpriteLoader {
    fn load(&self, feature: MakeupType, style: &str) -> MakeoverResult<SpritePair> {
        self.sprites
            .get(&(feature, style.to_string()))
            .cloned()
            .ok_or_else(|| MakeoverError::asset(format!("no {feature} sprite for style '{style}'")))
    }
}

// Dark alpha shapes; tinting recolors them, so only coverage matters.
fn builtin_sprite(feature: MakeupType, style: &str) -> MakeoverResult<Pixmap> {
    use kurbo::{BezPath, Point};

    use crate::foundation::core::Rgba;
    use crate::raster::coverage::{FillRule, StrokeStyle};

    let ink = Paint::from(Rgba::black(1.0));
    let (w, h) = match feature {
        MakeupType::Brows => (120, 30),
        MakeupType::Eyelashes => (120, 40),
        _ => (120, 24),
    };
    let mut c = Canvas::new(w, h)?;
    let (wf, hf) = (f64::from(w), f64::from(h));
    match feature {
        MakeupType::Brows => {
            let mut p = BezPath::new();
            p.move_to((0.0, hf * 0.7));
            p.quad_to((wf * 0.55, 0.0), (wf, hf * 0.45));
            p.quad_to((wf * 0.55, hf * 0.35), (0.0, hf));
            p.close_path();
            c.fill_path(&p, &ink, FillRule::NonZero);
        }
        MakeupType::Eyelashes => {
            let count = if style == "volume-boost" { 18 } else { 12 };
            let width = if style == "volume-boost" { 2.2 } else { 1.4 };
            for i in 0..count {
                let t = (f64::from(i) + 0.5) / f64::from(count);
                let base = Point::new(wf * t, hf * 0.85);
                let tip = Point::new(wf * t + wf * 0.06 * (t - 0.3), hf * 0.1);
                let mut p = BezPath::new();
                p.move_to(base);
                p.quad_to(Point::new(base.x, hf * 0.35), tip);
                c.stroke_path(&p, &ink, StrokeStyle::round(width));
            }
        }
        _ => {
            let wing = if style == "lashed" { 0.1 } else { 0.3 };
            let mut p = BezPath::new();
            p.move_to((0.0, hf * 0.6));
            p.quad_to((wf * 0.5, hf * 0.35), (wf, hf * wing));
            p.quad_to((wf * 0.5, hf * 0.75), (0.0, hf * 0.8));
            p.close_path();
            c.fill_path(&p, &ink, FillRule::NonZero);
            if style == "lashed" {
                for i in 0..8 {
                    let x = wf * (0.3 + 0.08 * f64::from(i));
                    let mut l = BezPath::new();
                    l.move_to((x, hf * 0.5));
                    l.line_to((x + 4.0, 0.0));
                    c.stroke_path(&l, &ink, StrokeStyle::round(1.2));
                }
            }
        }
    }
    Ok(c.into_pixmap())
}

fn mirror(src: &Pixmap) -> MakeoverResult<Pixmap> {
    let (w, h) = (src.width(), src.height());
    let mut c = Canvas::new(w, h)?;
    c.translate(f64::from(w), 0.0);
    c.scale(-1.0, 1.0);
    c.draw_pixmap(src, Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
    Ok(c.into_pixmap())
}

/// Scales `image` to `width x height` and recolors it, keeping its alpha.
pub fn tint(image: &Pixmap, width: u32, height: u32, color: HexColor) -> MakeoverResult<Pixmap> {
    let mut c = Canvas::new(width.max(1), height.max(1))?;
    let full = Rect::new(0.0, 0.0, f64::from(c.width()), f64::from(c.height()));
    c.draw_pixmap(image, full);
    c.set_composite_op(CompositeOp::SourceIn);
    c.fill_rect(full, &Paint::from(color.opaque()));
    Ok(c.into_pixmap())
}

/// Segment a sprite is stretched along, in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SpriteSpan {
    pub start: kurbo::Point,
    pub end: kurbo::Point,
}

impl SpriteSpan {
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn angle(&self) -> f64 {
        (self.end - self.start).atan2()
    }

    /// Pixel size for a temporary sprite surface, never below one.
    pub fn ceil_px(v: f64) -> u32 {
        if v.is_finite() { v.ceil().clamp(1.0, f64::from(u16::MAX)) as u32 } else { 1 }
    }
}

#[derive(Clone, Debug)]
enum Entry {
    Pending,
    Ready(Arc<SpritePair>),
    Failed,
}

struct Loaded {
    feature: MakeupType,
    style: String,
    result: MakeoverResult<SpritePair>,
}

/// Sprite cache keyed by `(feature, style)`.
pub struct SpriteCache {
    loader: Arc<dyn SpriteLoader>,
    entries: HashMap<(MakeupType, String), Entry>,
    active: HashMap<MakeupType, String>,
    tx: Sender<Loaded>,
    rx: Receiver<Loaded>,
    background: bool,
    loads_started: usize,
}

impl std::fmt::Debug for SpriteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteCache")
            .field("entries", &self.entries)
            .field("active", &self.active)
            .field("background", &self.background)
            .field("loads_started", &self.loads_started)
            .finish()
    }
}

impl SpriteCache {
    /// Cache whose loads run on the rayon pool.
    pub fn new(loader: Arc<dyn SpriteLoader>) -> Self {
        let (tx, rx) = channel();
        Self {
            loader,
            entries: HashMap::new(),
            active: HashMap::new(),
            tx,
            rx,
            background: true,
            loads_started: 0,
        }
    }

    /// Cache that loads on the calling thread; requests resolve immediately.
    pub fn blocking(loader: Arc<dyn SpriteLoader>) -> Self {
        Self {
            background: false,
            ..Self::new(loader)
        }
    }

    /// Number of loads started so far.
    pub fn loads_started(&self) -> usize {
        self.loads_started
    }

    pub fn is_ready(&self, feature: MakeupType, style: &str) -> bool {
        matches!(
            self.entries.get(&(feature, style.to_string())),
            Some(Entry::Ready(_))
        )
    }

    /// Marks `style` active for `feature` and starts loading it if needed.
    pub fn prefetch(&mut self, feature: MakeupType, style: &str) {
        let _ = self.request(feature, style);
    }

    /// Returns the pair if loaded. Otherwise starts (or keeps waiting on) a load and
    /// returns `None`; failed entries are retried.
    pub fn request(&mut self, feature: MakeupType, style: &str) -> Option<Arc<SpritePair>> {
        self.active.insert(feature, style.to_string());
        let key = (feature, style.to_string());
        match self.entries.get(&key) {
            Some(Entry::Ready(pair)) => return Some(Arc::clone(pair)),
            Some(Entry::Pending) => return None,
            Some(Entry::Failed) | None => {}
        }
        self.start_load(feature, style);
        match self.entries.get(&key) {
            Some(Entry::Ready(pair)) => Some(Arc::clone(pair)),
            _ => None,
        }
    }

    /// Drops the entry so the next request reloads it.
    pub fn invalidate(&mut self, feature: MakeupType, style: &str) {
        self.entries.remove(&(feature, style.to_string()));
    }

    /// Collects finished background loads. Returns the keys that became ready.
    pub fn poll(&mut self) -> Vec<(MakeupType, String)> {
        let mut ready = Vec::new();
        while let Ok(done) = self.rx.try_recv() {
            if let Some(key) = self.finish(done) {
                ready.push(key);
            }
        }
        ready
    }

    fn start_load(&mut self, feature: MakeupType, style: &str) {
        self.loads_started += 1;
        self.entries
            .insert((feature, style.to_string()), Entry::Pending);
        tracing::debug!(%feature, style, "loading sprites");

        if !self.background {
            let result = self.loader.load(feature, style);
            self.finish(Loaded {
                feature,
                style: style.to_string(),
                result,
            });
            return;
        }

        let loader = Arc::clone(&self.loader);
        let tx = self.tx.clone();
        let style = style.to_string();
        rayon::spawn(move || {
            let result = loader.load(feature, &style);
            // The cache may be gone by now; nothing to report then.
            let _ = tx.send(Loaded {
                feature,
                style,
                result,
            });
        });
    }

    fn finish(&mut self, done: Loaded) -> Option<(MakeupType, String)> {
        let key = (done.feature, done.style);
        if self.active.get(&key.0) != Some(&key.1) {
            tracing::debug!(feature = %key.0, style = %key.1, "discarding superseded sprite load");
            self.entries.remove(&key);
            return None;
        }
        match done.result {
            Ok(pair) => {
                self.entries.insert(key.clone(), Entry::Ready(Arc::new(pair)));
                Some(key)
            }
            Err(err) => {
                tracing::warn!(feature = %key.0, style = %key.1, %err, "sprite load failed");
                self.entries.insert(key, Entry::Failed);
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/makeup/sprites.rs"]
mod tests;
