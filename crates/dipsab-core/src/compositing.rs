use image::{DynamicImage, Pixel, RgbImage, RgbaImage};

/// Visible overlap of a `src_len` span placed at `offset` within `dst_len`.
/// Returns `(src_start, dst_start, len)`, or `None` when nothing is visible.
fn clip_span(dst_len: u32, src_len: u32, offset: i64) -> Option<(u32, u32, u32)> {
    let start = offset.max(0);
    let end = (offset + src_len as i64).min(dst_len as i64);
    if end <= start {
        return None;
    }
    Some(((start - offset) as u32, start as u32, (end - start) as u32))
}

/// Blend `src` onto `canvas` at (dx, dy) using the source alpha channel as the mask.
///
/// Each channel becomes `src * a + dst * (1 - a)`, so opaque pixels replace the
/// canvas and fully transparent ones leave it untouched. Parts falling outside
/// the canvas (including negative offsets) are dropped.
pub fn blend_masked(canvas: &mut RgbaImage, src: &RgbaImage, dx: i64, dy: i64) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    let (Some((sx, cx, w)), Some((sy, cy, h))) = (clip_span(cw, sw, dx), clip_span(ch, sh, dy))
    else {
        return;
    };
    for yy in 0..h {
        for xx in 0..w {
            let s = *src.get_pixel(sx + xx, sy + yy);
            let a = s[3] as u32;
            match a {
                0 => {}
                255 => canvas.put_pixel(cx + xx, cy + yy, s),
                _ => {
                    let d = canvas.get_pixel_mut(cx + xx, cy + yy);
                    let blended = d.map2(&s, |dc, sc| {
                        ((sc as u32 * a + dc as u32 * (255 - a) + 127) / 255) as u8
                    });
                    *d = blended;
                }
            }
        }
    }
}

/// Copy `src` onto `canvas` at (dx, dy) without blending, clipped to the canvas.
pub fn paste<P: Pixel>(
    canvas: &mut image::ImageBuffer<P, Vec<P::Subpixel>>,
    src: &image::ImageBuffer<P, Vec<P::Subpixel>>,
    dx: i64,
    dy: i64,
) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    let (Some((sx, cx, w)), Some((sy, cy, h))) = (clip_span(cw, sw, dx), clip_span(ch, sh, dy))
    else {
        return;
    };
    for yy in 0..h {
        for xx in 0..w {
            canvas.put_pixel(cx + xx, cy + yy, *src.get_pixel(sx + xx, sy + yy));
        }
    }
}

/// Drop the alpha channel.
pub fn flatten(rgba: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(rgba).into_rgb8()
}
