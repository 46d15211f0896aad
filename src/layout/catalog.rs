use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{PhotostripError, PhotostripResult},
    layout::template::{BrandingText, LayoutTemplate, Slot},
};

const BRAND: &str = "Starlight Studio";

/// Read-only catalog of layout templates keyed by identifier.
#[derive(Clone, Debug, Default)]
pub struct LayoutCatalog {
    layouts: Vec<LayoutTemplate>,
}

impl LayoutCatalog {
    /// Catalog from already built templates; each is validated and ids must be unique.
    pub fn new(layouts: Vec<LayoutTemplate>) -> PhotostripResult<Self> {
        for (i, l) in layouts.iter().enumerate() {
            l.validate()?;
            if layouts[..i].iter().any(|o| o.id == l.id) {
                return Err(PhotostripError::layout(format!(
                    "duplicate layout id '{}'",
                    l.id
                )));
            }
        }
        Ok(Self { layouts })
    }

    /// The stock strip and postcard layouts.
    pub fn builtin() -> Self {
        fn strip(id: &str, name: &str, photo_count: usize, slots: Vec<Slot>) -> LayoutTemplate {
            LayoutTemplate {
                id: id.to_string(),
                name: name.to_string(),
                kind: "strip".to_string(),
                width: 600,
                height: 1800,
                photo_count,
                slots,
                text: Some(branding(300.0, 1700.0, 32.0)),
                image: None,
                lock_branding: false,
                archive_label: None,
            }
        }

        fn postcard(id: &str, name: &str, photo_count: usize, slots: Vec<Slot>) -> LayoutTemplate {
            LayoutTemplate {
                id: id.to_string(),
                name: name.to_string(),
                kind: "postcard".to_string(),
                width: 1200,
                height: 1800,
                photo_count,
                slots,
                text: Some(branding(600.0, 1600.0, 40.0)),
                image: None,
                lock_branding: true,
                archive_label: None,
            }
        }

        Self {
            layouts: vec![
                strip(
                    "layout-6x2-2",
                    "6x2 Strip (2 Pose)",
                    2,
                    vec![
                        Slot::new(50.0, 50.0, 500.0, 750.0),
                        Slot::new(50.0, 850.0, 500.0, 750.0),
                    ],
                ),
                strip(
                    "layout-6x2-4",
                    "6x2 Strip (4 Pose)",
                    4,
                    vec![
                        Slot::new(50.0, 50.0, 500.0, 375.0),
                        Slot::new(50.0, 450.0, 500.0, 375.0),
                        Slot::new(50.0, 850.0, 500.0, 375.0),
                        Slot::new(50.0, 1250.0, 500.0, 375.0),
                    ],
                ),
                postcard(
                    "layout-6x4-1",
                    "6x4 Postcard (1 Pose)",
                    1,
                    vec![Slot::new(100.0, 100.0, 1000.0, 1400.0)],
                ),
                postcard(
                    "layout-6x4-2",
                    "6x4 Postcard (2 Pose)",
                    2,
                    vec![
                        Slot::new(100.0, 100.0, 1000.0, 700.0),
                        Slot::new(100.0, 850.0, 1000.0, 700.0),
                    ],
                ),
                postcard(
                    "layout-6x4-4",
                    "6x4 Postcard (4 Pose)",
                    4,
                    vec![
                        Slot::new(50.0, 50.0, 525.0, 700.0),
                        Slot::new(625.0, 50.0, 525.0, 700.0),
                        Slot::new(50.0, 800.0, 525.0, 700.0),
                        Slot::new(625.0, 800.0, 525.0, 700.0),
                    ],
                ),
                postcard(
                    "layout-6x4-6",
                    "6x4 Postcard (6 Pose)",
                    6,
                    vec![
                        Slot::new(50.0, 50.0, 500.0, 450.0),
                        Slot::new(650.0, 50.0, 500.0, 450.0),
                        Slot::new(50.0, 550.0, 500.0, 450.0),
                        Slot::new(650.0, 550.0, 500.0, 450.0),
                        Slot::new(50.0, 1050.0, 500.0, 450.0),
                        Slot::new(650.0, 1050.0, 500.0, 450.0),
                    ],
                ),
            ],
        }
    }

    /// Parse a JSON array of layouts.
    pub fn from_json(json: &str) -> PhotostripResult<Self> {
        let layouts: Vec<LayoutTemplate> = serde_json::from_str(json)?;
        Self::new(layouts)
    }

    /// Read and parse a JSON catalog file.
    pub fn from_path(path: &Path) -> PhotostripResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read layout catalog '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Layout with identifier `id`.
    pub fn get_by_id(&self, id: &str) -> Option<&LayoutTemplate> {
        self.layouts.iter().find(|l| l.id == id)
    }

    /// All layouts in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutTemplate> {
        self.layouts.iter()
    }

    /// Number of layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

fn branding(x: f64, y: f64, font_size: f64) -> BrandingText {
    BrandingText {
        x,
        y,
        font_size,
        color: "#000000".to_string(),
        text: BRAND.to_string(),
        font_family: None,
    }
}

/// A decorative frame that can dress one layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOption {
    /// Frame identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Layout this frame belongs to.
    pub layout_id: String,
    /// Overlay image; `None` is the plain (frameless) variant.
    #[serde(default)]
    pub strip_image: Option<String>,
    /// Slot geometry matching the frame art; `None` keeps the layout's slots.
    #[serde(default)]
    pub slots: Option<Vec<Slot>>,
}

/// Catalog of frame options.
#[derive(Clone, Debug, Default)]
pub struct FrameCatalog {
    frames: Vec<FrameOption>,
}

impl FrameCatalog {
    /// Catalog from explicit frames.
    pub fn new(frames: Vec<FrameOption>) -> Self {
        Self { frames }
    }

    /// A plain frame per stock layout plus the Kodak film frames.
    pub fn builtin() -> Self {
        let plain = |layout: &str| FrameOption {
            id: layout.replacen("layout", "default", 1),
            name: "Default".to_string(),
            layout_id: layout.to_string(),
            strip_image: None,
            slots: None,
        };

        let mut frames = [
            "layout-6x2-2",
            "layout-6x2-4",
            "layout-6x4-1",
            "layout-6x4-2",
            "layout-6x4-4",
            "layout-6x4-6",
        ]
        .into_iter()
        .map(plain)
        .collect::<Vec<_>>();

        frames.push(FrameOption {
            id: "kodak-6x4-4".to_string(),
            name: "Kodak".to_string(),
            layout_id: "layout-6x4-4".to_string(),
            strip_image: Some("photostrips/kodak6x4-4pose.png".to_string()),
            slots: Some(vec![
                Slot::new(49.0, 85.0, 532.0, 708.0),
                Slot::new(620.0, 85.0, 532.0, 708.0),
                Slot::new(49.0, 958.0, 532.0, 708.0),
                Slot::new(620.0, 958.0, 532.0, 708.0),
            ]),
        });
        frames.push(FrameOption {
            id: "kodak-6x4-1".to_string(),
            name: "Kodak Film".to_string(),
            layout_id: "layout-6x4-1".to_string(),
            strip_image: Some("photostrips/kodak6x4-1pose.png".to_string()),
            slots: Some(vec![Slot::new(158.0, 167.0, 955.0, 1515.0)]),
        });

        Self { frames }
    }

    /// Parse a JSON array of frames.
    pub fn from_json(json: &str) -> PhotostripResult<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Frames that dress `layout_id`, in catalog order.
    pub fn frames_for_layout<'a>(
        &'a self,
        layout_id: &'a str,
    ) -> impl Iterator<Item = &'a FrameOption> + 'a {
        self.frames.iter().filter(move |f| f.layout_id == layout_id)
    }

    /// Frame with identifier `id`.
    pub fn get_by_id(&self, id: &str) -> Option<&FrameOption> {
        self.frames.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/catalog.rs"]
mod tests;
