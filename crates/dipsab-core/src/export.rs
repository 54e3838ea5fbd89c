use crate::model::CanvasLayout;
use serde_json::{Value, json};

/// Serialize a `CanvasLayout` as `{ canvas, layers, images, meta }`.
///
/// `layers` lists every section in stacking order with its slot on the canvas;
/// `images` lists every placed image in canvas coordinates, in paste order.
pub fn to_json(layout: &CanvasLayout) -> Value {
    let layers: Vec<Value> = layout
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            let slot = layout.slots.iter().find(|s| s.index == index);
            json!({
                "index": index,
                "directory": section.directory.to_string_lossy(),
                "role": slot.map(|s| json!(s.role)),
                "frame": {
                    "x": slot.map(|s| s.x),
                    "y": slot.map(|s| s.y),
                    "w": section.width,
                    "h": section.height,
                },
                "rows": section.rows,
                "images": section.placements.len(),
            })
        })
        .collect();
    let images: Vec<Value> = layout
        .canvas_placements()
        .iter()
        .map(|p| {
            json!({
                "key": p.key,
                "path": p.path.to_string_lossy(),
                "frame": {"x": p.rect.x, "y": p.rect.y, "w": p.rect.w, "h": p.rect.h},
            })
        })
        .collect();
    json!({
        "canvas": {"w": layout.width, "h": layout.height},
        "layers": layers,
        "images": images,
        "meta": &layout.meta,
    })
}
