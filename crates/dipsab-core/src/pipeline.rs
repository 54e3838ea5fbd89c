use std::path::PathBuf;

use image::{RgbImage, RgbaImage};
use tracing::{info, instrument};

use crate::compositing::{blend_masked, flatten, paste};
use crate::config::{CanvasConfig, Color, LayoutRequest, SectionConfig};
use crate::error::{DipsabError, Result};
use crate::layout::{canvas_offsets, layer_offsets, row_offsets};
use crate::model::{CanvasLayout, Meta, Placement, Rect, SectionLayout};
use crate::packer::{Packable, Raster, Row, pack_rows};
use crate::scan::DirectoryImageSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Renders one row: the items centred as a group, each centred vertically,
/// alpha-blended over `background`. The result is `layout_width` x `row.height`.
pub fn compose_row<T: Raster>(row: &Row<T>, layout_width: u32, background: Color) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(layout_width, row.height, background.to_rgba());
    for (item, (x, y)) in row.items.iter().zip(row_offsets(row, layout_width)) {
        blend_masked(&mut canvas, item.rgba(), x, y);
    }
    canvas
}

/// Stacks rows into one opaque section layer.
///
/// `rows` is in packing (completion) order, as returned by `pack_rows`; it is
/// read back-to-front so the layer shows keys ascending top-to-bottom. A layer
/// with no rows is zero pixels tall.
pub fn compose_layer<T: Raster>(
    rows: &[Row<T>],
    layout_width: u32,
    vpad: u32,
    background: Color,
) -> RgbImage {
    let (offsets, total) = layer_offsets(rows.iter().rev().map(|r| r.height), vpad);
    let mut layer = RgbaImage::from_pixel(layout_width, total, background.to_rgba());
    for (row, y) in rows.iter().rev().zip(offsets) {
        let strip = compose_row(row, layout_width, background);
        paste(&mut layer, &strip, 0, y as i64);
    }
    flatten(layer)
}

/// Places section layers on a `cfg.width` x `cfg.height` canvas filled with the
/// background colour. Layers are opaque; a later paste simply overwrites.
pub fn compose_canvas(layers: &[RgbImage], cfg: &CanvasConfig) -> RgbImage {
    let heights: Vec<u32> = layers.iter().map(|l| l.height()).collect();
    let mut canvas = RgbImage::from_pixel(cfg.width, cfg.height, cfg.background.to_rgb());
    for slot in canvas_offsets(&heights, cfg) {
        paste(&mut canvas, &layers[slot.index], slot.x, slot.y);
    }
    canvas
}

#[instrument(skip_all, fields(dir = %req.directory.display()))]
/// Scans, decodes, packs and composites one directory into its section layer.
pub fn render_section(req: &LayoutRequest) -> Result<RgbImage> {
    req.validate()?;
    let set = DirectoryImageSet::scan(&req.directory, req.sort, &req.image_suffixes)?;
    let items = set.load()?;
    let rows = pack_rows(items, req.layout_width, req.hpad);
    let layer = compose_layer(&rows, req.layout_width, req.vpad, req.background);
    info!(
        images = set.len(),
        rows = rows.len(),
        height = layer.height(),
        "section rendered"
    );
    Ok(layer)
}

/// Computes one section's placements without decoding pixels.
pub fn layout_section(req: &LayoutRequest) -> Result<SectionLayout> {
    req.validate()?;
    let set = DirectoryImageSet::scan(&req.directory, req.sort, &req.image_suffixes)?;
    let sized: Vec<((String, PathBuf), u32, u32)> = set
        .dimensions()?
        .into_iter()
        .map(|(key, path, w, h)| ((key, path), w, h))
        .collect();
    let rows = pack_rows(sized, req.layout_width, req.hpad);
    let (row_ys, height) = layer_offsets(rows.iter().rev().map(|r| r.height), req.vpad);

    let mut placements = Vec::new();
    for (row, row_y) in rows.iter().rev().zip(row_ys) {
        for (item, (x, y)) in row.items.iter().zip(row_offsets(row, req.layout_width)) {
            let ((key, path), _, _) = item;
            let (w, h) = item.size();
            placements.push(Placement {
                key: key.clone(),
                path: path.clone(),
                rect: Rect::new(x, row_y as i64 + y, w, h),
            });
        }
    }
    Ok(SectionLayout {
        directory: req.directory.clone(),
        width: req.layout_width,
        height,
        rows: rows.len(),
        placements,
    })
}

/// Fails on the first section whose directory does not exist, before any work is done.
/// Indices in the error are 1-based.
pub fn check_sections(sections: &[SectionConfig]) -> Result<()> {
    for (idx, section) in sections.iter().enumerate() {
        if !section.directory.is_dir() {
            return Err(DipsabError::InvalidSection {
                index: idx + 1,
                path: section.directory.clone(),
            });
        }
    }
    Ok(())
}

#[instrument(skip_all)]
/// Renders every section and assembles the final canvas.
///
/// Notes:
/// - The configuration and every section directory are validated up front; nothing is rendered
///   when any of them is invalid.
/// - With the `parallel` feature, sections are rendered concurrently; the output is identical.
pub fn render_project(cfg: &CanvasConfig, sections: &[SectionConfig]) -> Result<RgbImage> {
    cfg.validate()?;
    check_sections(sections)?;
    let requests: Vec<LayoutRequest> = sections.iter().map(|s| cfg.layout_request(s)).collect();

    #[cfg(feature = "parallel")]
    let layers: Vec<RgbImage> = requests
        .par_iter()
        .map(render_section)
        .collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let layers: Vec<RgbImage> = requests
        .iter()
        .map(render_section)
        .collect::<Result<Vec<_>>>()?;

    Ok(compose_canvas(&layers, cfg))
}

/// Geometry-only counterpart of `render_project`.
pub fn layout_project(cfg: &CanvasConfig, sections: &[SectionConfig]) -> Result<CanvasLayout> {
    cfg.validate()?;
    check_sections(sections)?;
    let layouts = sections
        .iter()
        .map(|s| layout_section(&cfg.layout_request(s)))
        .collect::<Result<Vec<_>>>()?;
    let heights: Vec<u32> = layouts.iter().map(|l| l.height).collect();
    let slots = canvas_offsets(&heights, cfg);
    Ok(CanvasLayout {
        width: cfg.width,
        height: cfg.height,
        sections: layouts,
        slots,
        meta: Meta {
            app: "dipsab".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            background: cfg.background,
            border_size: cfg.border_size,
        },
    })
}
