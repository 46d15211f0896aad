use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, OnceLock},
};

use anyhow::Context;

use crate::foundation::{
    core::Rgba8,
    error::{PhotostripError, PhotostripResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// One font file registered under a lookup name (its file stem by default).
#[derive(Clone)]
pub struct FontFace {
    /// Lookup name, e.g. `Sriracha-Regular`.
    pub name: String,
    bytes: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Fonts available to text overlays.
///
/// Lookups match a requested family against face names case-insensitively, ignoring spaces,
/// dashes and underscores, and accept a name that starts with the family (`Sriracha` finds
/// `Sriracha-Regular`). Unmatched lookups fall back to the first registered face, then to the
/// system fallback face when [`FontBook::with_system_fallback`] found one.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
    fallback: Option<FontFace>,
}

impl FontBook {
    /// Empty font book; every text layer is skipped until a face is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes under `name`.
    pub fn add(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.faces.push(FontFace {
            name: name.into(),
            bytes: Arc::new(bytes),
            index: 0,
        });
    }

    /// Use an installed sans-serif face when no registered face matches.
    ///
    /// Leaves the book unchanged on hosts without system fonts.
    pub fn with_system_fallback(mut self) -> Self {
        self.fallback = system_fonts().fallback_face();
        if self.fallback.is_none() {
            tracing::debug!("no system font found for text fallback");
        }
        self
    }

    /// Face used when nothing is registered, if any.
    pub fn fallback(&self) -> Option<&FontFace> {
        self.fallback.as_ref()
    }

    /// Load every `.ttf`, `.otf` and `.ttc` file in `dir` (non-recursive), sorted by file name.
    pub fn from_dir(dir: &Path) -> PhotostripResult<Self> {
        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("read font dir '{}'", dir.display()))?;

        let mut paths = rd
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.extension()
                    .and_then(|s| s.to_str())
                    .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();
        paths.sort();

        let mut book = Self::new();
        for path in paths {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read font '{}'", path.display()))?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            book.add(name, bytes);
        }
        Ok(book)
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether no face is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Face for `family`, falling back to the first registered face and then the system face.
    pub fn resolve(&self, family: Option<&str>) -> Option<&FontFace> {
        if let Some(family) = family.map(fold_name).filter(|f| !f.is_empty()) {
            if let Some(face) = self
                .faces
                .iter()
                .find(|face| fold_name(&face.name).starts_with(&family))
            {
                return Some(face);
            }
        }
        self.faces.first().or(self.fallback.as_ref())
    }
}

/// Installed fonts, loaded once per process.
pub(crate) struct SystemFonts {
    db: Arc<usvg::fontdb::Database>,
    fallback: Option<usvg::fontdb::ID>,
}

const FALLBACK_FAMILIES: [usvg::fontdb::Family<'static>; 6] = [
    usvg::fontdb::Family::SansSerif,
    usvg::fontdb::Family::Name("DejaVu Sans"),
    usvg::fontdb::Family::Name("Liberation Sans"),
    usvg::fontdb::Family::Name("Noto Sans"),
    usvg::fontdb::Family::Name("Helvetica"),
    usvg::fontdb::Family::Serif,
];

/// Process-wide system font database shared by text layers and SVG parsing.
pub(crate) fn system_fonts() -> &'static SystemFonts {
    static FONTS: OnceLock<SystemFonts> = OnceLock::new();
    FONTS.get_or_init(SystemFonts::load)
}

impl SystemFonts {
    fn load() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();

        let query = usvg::fontdb::Query {
            families: &FALLBACK_FAMILIES,
            weight: usvg::fontdb::Weight::NORMAL,
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };
        let fallback = db.query(&query).or_else(|| db.faces().next().map(|f| f.id));
        tracing::debug!(faces = db.len(), found = fallback.is_some(), "loaded system fonts");

        // Generic families that name uninstalled fonts resolve to the fallback instead.
        let fallback_family = fallback
            .and_then(|id| db.face(id))
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone());
        if let Some(family) = fallback_family {
            if !has_generic(&db, usvg::fontdb::Family::SansSerif) {
                db.set_sans_serif_family(family.clone());
            }
            if !has_generic(&db, usvg::fontdb::Family::Serif) {
                db.set_serif_family(family);
            }
        }

        Self {
            db: Arc::new(db),
            fallback,
        }
    }

    /// Shared database, as handed to `usvg`.
    pub(crate) fn database(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(&self.db)
    }

    /// Family name of the fallback face.
    pub(crate) fn fallback_family(&self) -> Option<&str> {
        let face = self.db.face(self.fallback?)?;
        face.families.first().map(|(name, _)| name.as_str())
    }

    fn fallback_face(&self) -> Option<FontFace> {
        let id = self.fallback?;
        let name = self.db.face(id)?.post_script_name.clone();
        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;
        Some(FontFace {
            name,
            bytes: Arc::new(bytes),
            index,
        })
    }
}

fn has_generic(db: &usvg::fontdb::Database, family: usvg::fontdb::Family<'_>) -> bool {
    db.query(&usvg::fontdb::Query {
        families: &[family],
        weight: usvg::fontdb::Weight::NORMAL,
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    })
    .is_some()
}

fn fold_name(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A shaped, single-paragraph text layout plus the font needed to rasterize its glyphs.
pub struct ShapedText {
    /// Parley layout with line breaking applied.
    pub layout: parley::Layout<TextBrushRgba8>,
    /// Font data handed to the rasterizer.
    pub font: vello_cpu::peniko::FontData,
}

impl ShapedText {
    /// Advance width of the widest line.
    pub fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    /// Total height of all lines.
    pub fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }
}

#[derive(Clone)]
struct RegisteredFace {
    family: String,
    font: vello_cpu::peniko::FontData,
}

/// Stateful helper for building Parley text layouts from registered font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<String, RegisteredFace>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn register(&mut self, face: &FontFace) -> PhotostripResult<RegisteredFace> {
        if let Some(r) = self.registered.get(&face.name) {
            return Ok(r.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .iter()
            .find(|(_, fonts)| fonts.iter().any(|f| f.index() == face.index))
            .or(families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                PhotostripError::decode(format!(
                    "no font families registered from '{}'",
                    face.name
                ))
            })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PhotostripError::decode("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
            face.index,
        );
        let out = RegisteredFace { family, font };
        self.registered.insert(face.name.clone(), out.clone());
        Ok(out)
    }

    /// Shape `text` on a single line with the given face, size and color.
    pub fn shape_line(
        &mut self,
        face: &FontFace,
        text: &str,
        size_px: f32,
        color: Rgba8,
    ) -> PhotostripResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PhotostripError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let registered = self.register(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(registered.family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(ShapedText {
            layout,
            font: registered.font,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
