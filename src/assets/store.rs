use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use base64::Engine as _;
use rayon::prelude::*;

use crate::{
    assets::decode as assets_decode,
    foundation::error::{PhotostripError, PhotostripResult},
    foundation::math::Fnv1a64,
};

/// Decoded raster image in premultiplied RGBA8 form, ready to paint.
#[derive(Clone)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for PreparedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixmap_ptr", &Arc::as_ptr(&self.pixmap))
            .finish()
    }
}

impl PreparedImage {
    /// Wrap tightly packed, row-major premultiplied RGBA8 bytes.
    pub fn from_premul_bytes(width: u32, height: u32, bytes: Vec<u8>) -> PhotostripResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| PhotostripError::decode("image width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PhotostripError::decode("image height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(PhotostripError::decode("image has zero width or height"));
        }
        if bytes.len()
            != (width as usize)
                .saturating_mul(height as usize)
                .saturating_mul(4)
        {
            return Err(PhotostripError::decode("image byte len mismatch"));
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|px| {
                vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
            })
            .collect::<Vec<_>>();
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
        Ok(Self {
            width,
            height,
            pixmap: Arc::new(pixmap),
        })
    }

    /// Build a single-color image; mostly useful for placeholders and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PhotostripResult<Self> {
        let mut bytes = rgba.repeat((width as usize) * (height as usize));
        assets_decode::premultiply_rgba8_in_place(&mut bytes);
        Self::from_premul_bytes(width, height, bytes)
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Reference to a raster image the engine should paint.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// File path; relative paths resolve against the loader's root.
    Path(PathBuf),
    /// Encoded image bytes (PNG, JPEG, SVG, ...).
    Bytes(Arc<[u8]>),
    /// `data:<mime>;base64,<payload>` URL, as produced by camera captures.
    DataUrl(String),
    /// Already decoded image.
    Prepared(PreparedImage),
}

impl ImageSource {
    /// Interpret a textual reference: `data:` URLs stay inline, anything else is a path.
    pub fn from_reference(reference: &str) -> Self {
        if reference.starts_with("data:") {
            Self::DataUrl(reference.to_string())
        } else {
            Self::Path(PathBuf::from(reference))
        }
    }

    /// Stable identity used by [`ImageCache`]. Prepared images are never cached.
    fn cache_key(&self) -> Option<u64> {
        let mut hasher = Fnv1a64::new_default();
        match self {
            Self::Path(p) => {
                hasher.write_u8(b'P');
                hasher.write_bytes(p.to_string_lossy().as_bytes());
            }
            Self::Bytes(b) => {
                hasher.write_u8(b'B');
                hasher.write_bytes(b);
            }
            Self::DataUrl(s) => {
                hasher.write_u8(b'D');
                hasher.write_bytes(s.as_bytes());
            }
            Self::Prepared(_) => return None,
        }
        Some(hasher.finish())
    }
}

impl From<PreparedImage> for ImageSource {
    fn from(img: PreparedImage) -> Self {
        Self::Prepared(img)
    }
}

/// Resolves [`ImageSource`] values to decoded images, relative to a filesystem root.
#[derive(Clone, Debug)]
pub struct AssetLoader {
    root: PathBuf,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetLoader {
    /// Loader resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory used for relative paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read and decode `source`.
    pub fn load(&self, source: &ImageSource) -> PhotostripResult<PreparedImage> {
        match source {
            ImageSource::Prepared(img) => Ok(img.clone()),
            ImageSource::Bytes(bytes) => assets_decode::decode_image(bytes),
            ImageSource::DataUrl(url) => assets_decode::decode_image(&decode_data_url(url)?),
            ImageSource::Path(path) => {
                let bytes = self.read_bytes(path)?;
                assets_decode::decode_image(&bytes)
            }
        }
    }

    fn read_bytes(&self, path: &Path) -> PhotostripResult<Vec<u8>> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            let norm = normalize_rel_path(&path.to_string_lossy())?;
            self.root.join(Path::new(&norm))
        };
        std::fs::read(&full)
            .with_context(|| format!("read image bytes from '{}'", full.display()))
            .map_err(PhotostripError::from)
    }
}

/// Decode the payload of a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> PhotostripResult<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| PhotostripError::decode("data url must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PhotostripError::decode("data url has no payload separator"))?;
    if !meta.ends_with(";base64") {
        return Err(PhotostripError::decode("only base64 data urls are supported"));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("decode base64 data url payload")?;
    Ok(bytes)
}

/// Default number of decoded images an [`ImageCache`] keeps.
pub const DEFAULT_IMAGE_CACHE_CAPACITY: usize = 32;

/// Owned cache of decoded images keyed by source identity.
///
/// The cache lives as long as its owner (typically one [`crate::Compositor`]); nothing is shared
/// globally. Once `capacity` entries are held, the least recently used one is evicted.
#[derive(Debug)]
pub struct ImageCache {
    entries: HashMap<u64, PreparedImage>,
    recency: VecDeque<u64>,
    capacity: usize,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_IMAGE_CACHE_CAPACITY)
    }
}

impl ImageCache {
    /// Empty cache holding up to [`DEFAULT_IMAGE_CACHE_CAPACITY`] images.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cache holding up to `capacity` images; `0` disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recency: VecDeque::new(),
            capacity,
        }
    }

    /// Maximum number of cached images.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `source` is currently cached.
    pub fn contains(&self, source: &ImageSource) -> bool {
        source
            .cache_key()
            .is_some_and(|key| self.entries.contains_key(&key))
    }

    /// Drop every cached image.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    /// Load `sources`, decoding uncached entries in parallel.
    ///
    /// The result is index-aligned with `sources`; each failure is reported in place so callers can
    /// omit just that layer.
    pub fn load_all(
        &mut self,
        loader: &AssetLoader,
        sources: &[ImageSource],
    ) -> Vec<PhotostripResult<PreparedImage>> {
        let entries = &self.entries;
        let decoded = sources
            .par_iter()
            .map(|src| match src.cache_key() {
                Some(key) => match entries.get(&key) {
                    Some(img) => Ok((Some(key), img.clone())),
                    None => loader.load(src).map(|img| (Some(key), img)),
                },
                None => loader.load(src).map(|img| (None, img)),
            })
            .collect::<Vec<_>>();

        decoded
            .into_iter()
            .map(|res| {
                res.map(|(key, img)| {
                    if let Some(key) = key {
                        self.remember(key, &img);
                    }
                    img
                })
            })
            .collect()
    }

    /// Load a single source through the cache.
    pub fn load(
        &mut self,
        loader: &AssetLoader,
        source: &ImageSource,
    ) -> PhotostripResult<PreparedImage> {
        let Some(key) = source.cache_key() else {
            return loader.load(source);
        };
        let img = match self.entries.get(&key) {
            Some(img) => img.clone(),
            None => loader.load(source)?,
        };
        self.remember(key, &img);
        Ok(img)
    }

    fn remember(&mut self, key: u64, img: &PreparedImage) {
        if let Some(pos) = self.recency.iter().position(|k| *k == key) {
            self.recency.remove(pos);
        } else {
            self.entries.insert(key, img.clone());
        }
        self.recency.push_back(key);

        while self.entries.len() > self.capacity {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> PhotostripResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(PhotostripError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(PhotostripError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PhotostripError::validation(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(PhotostripError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
