use image::RgbImage;
use image::imageops::{self, FilterType};

/// Largest size with `candidate`'s aspect ratio that fits inside `available`.
///
/// Sizes already inside the box are returned unchanged; nothing is ever enlarged.
pub fn fit_within(available: (u32, u32), candidate: (u32, u32)) -> (u32, u32) {
    let (aw, ah) = available;
    let (cw, ch) = candidate;
    if cw > aw || ch > ah {
        let factor = (aw as f64 / cw as f64).min(ah as f64 / ch as f64);
        (
            (factor * cw as f64) as u32,
            (factor * ch as f64) as u32,
        )
    } else {
        candidate
    }
}

/// Downscaled copy of a finished canvas for display. Source images are never resized.
pub fn preview(canvas: &RgbImage, available: (u32, u32)) -> RgbImage {
    let (w, h) = fit_within(available, canvas.dimensions());
    if (w, h) == canvas.dimensions() {
        return canvas.clone();
    }
    imageops::resize(canvas, w.max(1), h.max(1), FilterType::Triangle)
}
