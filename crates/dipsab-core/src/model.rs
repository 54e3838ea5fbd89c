use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::Color;

/// Axis-aligned rectangle (pixels). `x,y` is top-left and may be negative when
/// content overflows its container; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i64, y: i64, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    pub fn translate(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// A decoded source image together with its sort key.
#[derive(Debug, Clone)]
pub struct PackingItem {
    pub key: String,
    pub path: PathBuf,
    pub image: RgbaImage,
}

/// Where one image ends up, in the coordinate space of its container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub key: String,
    pub path: PathBuf,
    pub rect: Rect,
}

/// Geometry of one section layer without its pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionLayout {
    pub directory: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rows: usize,
    /// Image placements relative to the layer's top-left corner, in reading order.
    pub placements: Vec<Placement>,
}

/// How a layer was positioned on the canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    Header,
    Footer,
    Middle,
}

/// Canvas position of one section layer. `index` refers to the section order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerSlot {
    pub index: usize,
    pub role: LayerRole,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub app: String,
    pub version: String,
    pub background: Color,
    pub border_size: u32,
}

/// Geometry of a whole canvas: every layer slot plus the layouts they carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
    pub sections: Vec<SectionLayout>,
    /// Layer slots in paste order (header, footer, then middle layers).
    pub slots: Vec<LayerSlot>,
    pub meta: Meta,
}

impl CanvasLayout {
    /// All image placements translated into canvas coordinates, in paste order.
    pub fn canvas_placements(&self) -> Vec<Placement> {
        let mut out = Vec::new();
        for slot in &self.slots {
            let Some(section) = self.sections.get(slot.index) else {
                continue;
            };
            out.extend(section.placements.iter().map(|p| Placement {
                key: p.key.clone(),
                path: p.path.clone(),
                rect: p.rect.translate(slot.x, slot.y),
            }));
        }
        out
    }
}
