use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::core::Vec2;
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::scene::node::{Glyph, Node, NodeKind, PlacedGlyph};
use crate::text::cache::{FontCache, FontEntry};

/// Shaped single character: glyphs relative to the top-left of its line box.
#[derive(Clone, Debug, PartialEq)]
pub struct CharLayout {
    pub glyphs: Vec<PlacedGlyph>,
    pub advance: f32,
    pub height: f32,
    pub font_size: f32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LayoutKey {
    family: String,
    ch: char,
    size_bits: u32,
}

/// Font loading and text shaping on top of `parley`.
///
/// `parley` keeps every registered font for the lifetime of its collection, so each font file is
/// registered once and a file evicted from the [`FontCache`] is restored from that registration.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    fonts: FontCache,
    registered: HashMap<PathBuf, FontEntry>,
    layouts: HashMap<LayoutKey, CharLayout>,
    layout_capacity: usize,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Shaped characters kept before the memo is reset.
    pub const DEFAULT_LAYOUT_CAPACITY: usize = 4096;

    /// Engine with a font cache sized from the environment.
    pub fn new() -> Self {
        Self::with_font_cache(FontCache::new())
    }

    pub fn with_font_cache(fonts: FontCache) -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts,
            registered: HashMap::new(),
            layouts: HashMap::new(),
            layout_capacity: Self::DEFAULT_LAYOUT_CAPACITY,
        }
    }

    /// Bound the per-character layout memo (at least one entry).
    pub fn with_layout_capacity(mut self, capacity: usize) -> Self {
        self.layout_capacity = capacity.max(1);
        self
    }

    pub fn font_cache(&self) -> &FontCache {
        &self.fonts
    }

    /// Number of distinct font files registered with the shaper.
    pub fn registered_fonts(&self) -> usize {
        self.registered.len()
    }

    /// Number of memoized character layouts.
    pub fn memoized_layouts(&self) -> usize {
        self.layouts.len()
    }

    /// Load a font file through the cache.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load_font(&mut self, path: &Path) -> KinemaResult<Arc<FontEntry>> {
        if let Some(entry) = self.fonts.get(path) {
            return Ok(entry);
        }
        if let Some(entry) = self.registered.get(path) {
            tracing::debug!(family = %entry.family, "font restored from registration");
            return Ok(self.fonts.insert(path.to_path_buf(), entry.clone()));
        }
        let bytes = std::fs::read(path).map_err(|e| {
            KinemaError::validation(format!("read font '{}': {e}", path.display()))
        })?;
        let entry = self.register(bytes)?;
        tracing::debug!(family = %entry.family, "font loaded");
        self.registered.insert(path.to_path_buf(), entry.clone());
        Ok(self.fonts.insert(path.to_path_buf(), entry))
    }

    /// Register font bytes with the shaper without caching them by path.
    ///
    /// Every call adds to the shaper's collection; [`Self::load_font`] registers a file once.
    pub fn register(&mut self, bytes: Vec<u8>) -> KinemaResult<FontEntry> {
        let bytes = Arc::new(bytes);
        // shaper and rasterizer share one allocation
        let shared: Arc<dyn AsRef<[u8]> + Send + Sync> = bytes.clone();
        let blob = parley::fontique::Blob::new(shared);
        let families = self
            .font_ctx
            .collection
            .register_fonts(blob.clone(), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            KinemaError::validation("no font families registered from font bytes")
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| KinemaError::validation("registered font family has no name"))?
            .to_string();
        let font = vello_cpu::peniko::FontData::new(blob, 0);
        Ok(FontEntry {
            bytes,
            family,
            font,
        })
    }

    /// Shape one character. Results are memoized per family, character and size.
    pub fn layout_char(
        &mut self,
        font: &FontEntry,
        ch: char,
        size_px: f32,
    ) -> KinemaResult<CharLayout> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(KinemaError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let key = LayoutKey {
            family: font.family.clone(),
            ch,
            size_bits: size_px.to_bits(),
        };
        if let Some(hit) = self.layouts.get(&key) {
            return Ok(hit.clone());
        }

        let mut buf = [0u8; 4];
        let text: &str = ch.encode_utf8(&mut buf);
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut font_size = size_px;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                font_size = run.run().font_size();
                glyphs.extend(run.glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        let out = CharLayout {
            glyphs,
            advance: layout.full_width(),
            height: layout.height(),
            font_size,
        };
        if self.layouts.len() >= self.layout_capacity {
            tracing::debug!(
                entries = self.layouts.len(),
                "layout memo full, starting over"
            );
            self.layouts.clear();
        }
        self.layouts.insert(key, out.clone());
        Ok(out)
    }
}

/// Text as a group of individually animatable characters.
pub struct Text;

impl Text {
    /// Lay out `content` one character at a time.
    ///
    /// Returns a group named after the content whose children are one `Glyph` node per
    /// character (named `content[i]`), placed by advance so the whole line is centred on the
    /// group origin. Each character pivots around the centre of its own cell. Whitespace gets a
    /// node too, so `char_at(i)` always addresses the `i`-th character of `content`.
    #[tracing::instrument(skip(engine))]
    pub fn build(
        engine: &mut TextLayoutEngine,
        content: &str,
        font_path: &Path,
        size_px: f32,
    ) -> KinemaResult<Node> {
        let font = engine.load_font(font_path)?;

        let mut cells = Vec::new();
        let mut pen = 0.0f32;
        let mut height = 0.0f32;
        for ch in content.chars() {
            let cell = engine.layout_char(&font, ch, size_px)?;
            height = height.max(cell.height);
            let x = pen;
            pen += cell.advance;
            cells.push((ch, x, cell));
        }

        let origin = Vec2::new(f64::from(pen) / 2.0, f64::from(height) / 2.0);
        let children = cells
            .into_iter()
            .enumerate()
            .map(|(i, (ch, x, cell))| {
                let anchor = Vec2::new(f64::from(cell.advance) / 2.0, f64::from(height) / 2.0);
                Node::new(
                    format!("{content}[{i}]"),
                    NodeKind::Glyph(Glyph {
                        ch,
                        font: font.font.clone(),
                        font_size: cell.font_size,
                        glyphs: cell.glyphs,
                        advance: cell.advance,
                    }),
                )
                .with_position(Vec2::new(f64::from(x), 0.0) - origin)
                .with_anchor(anchor)
                .into_ref()
            })
            .collect();

        Ok(Node::group(content, children))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
