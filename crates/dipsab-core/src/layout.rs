//! Pure placement arithmetic shared by the compositors and the layout-only export.
//!
//! Every function here works in signed pixels: centering divides with floor
//! semantics and may go negative when content is wider or taller than its
//! container. Nothing is clipped; overlapping output is rendered as-is.

use tracing::warn;

use crate::config::CanvasConfig;
use crate::model::{LayerRole, LayerSlot};
use crate::packer::{Packable, Row};

/// Top-left offsets of each item of `row` inside a `layout_width`-wide row image.
///
/// The group is centred horizontally; each item is centred vertically within the
/// row height.
pub fn row_offsets<T: Packable>(row: &Row<T>, layout_width: u32) -> Vec<(i64, i64)> {
    let total = row.width as i64;
    if total > layout_width as i64 {
        warn!(
            row_width = total,
            layout_width, "row is wider than the layout; rendering as-is"
        );
    }
    let mut x = (layout_width as i64 - total).div_euclid(2);
    let mut out = Vec::with_capacity(row.items.len());
    for item in &row.items {
        let (w, h) = item.size();
        let y = (row.height as i64 - h as i64).div_euclid(2);
        out.push((x, y));
        x += w as i64 + row.spacing as i64;
    }
    out
}

/// Vertical offsets for row images stacked with `vpad` between them, plus the
/// total stacked height (0 when there are no rows).
pub fn layer_offsets<I>(row_heights: I, vpad: u32) -> (Vec<u32>, u32)
where
    I: IntoIterator<Item = u32>,
{
    let mut offsets = Vec::new();
    let mut y = 0u32;
    for h in row_heights {
        if !offsets.is_empty() {
            y = y.saturating_add(vpad);
        }
        offsets.push(y);
        y = y.saturating_add(h);
    }
    (offsets, y)
}

/// Places section layers of the given heights on the canvas.
///
/// With `header` on, the first layer sits directly beneath the top border and the
/// free span starts right below it. With `footer` on, the last remaining layer sits
/// directly above the bottom border. The other layers are stacked with
/// `border_size` between them and centred in the span left over.
///
/// Slots are returned in paste order: header, footer, then middle layers top-down.
pub fn canvas_offsets(layer_heights: &[u32], cfg: &CanvasConfig) -> Vec<LayerSlot> {
    let border = cfg.border_size as i64;
    let x = border;
    let mut top = border;
    let mut bottom = cfg.height as i64 - border;
    let mut first = 0usize;
    let mut end = layer_heights.len();
    let mut slots = Vec::with_capacity(layer_heights.len());

    if cfg.header && end > first {
        slots.push(LayerSlot {
            index: first,
            role: LayerRole::Header,
            x,
            y: top,
        });
        top += layer_heights[first] as i64;
        first += 1;
    }
    if cfg.footer && end > first {
        end -= 1;
        bottom -= layer_heights[end] as i64;
        slots.push(LayerSlot {
            index: end,
            role: LayerRole::Footer,
            x,
            y: bottom,
        });
    }

    let middle = &layer_heights[first..end];
    if !middle.is_empty() {
        let gaps = border * (middle.len() as i64 - 1);
        let total: i64 = middle.iter().map(|&h| h as i64).sum::<i64>() + gaps;
        if total > bottom - top {
            warn!(
                content = total,
                available = bottom - top,
                "layers overflow the canvas span; rendering as-is"
            );
        }
        let mut y = top + (bottom - top - total).div_euclid(2);
        for (offset, &h) in middle.iter().enumerate() {
            slots.push(LayerSlot {
                index: first + offset,
                role: LayerRole::Middle,
                x,
                y,
            });
            y += h as i64 + border;
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_item_row_is_centred() {
        let row = Row::new(vec![("a", 100, 40), ("b", 50, 20)], 10);
        assert_eq!(row.width, 160);
        assert_eq!(row_offsets(&row, 300), vec![(70, 0), (180, 10)]);
    }

    #[test]
    fn overflowing_row_starts_left_of_zero() {
        let row = Row::new(vec![("wide", 101, 10)], 0);
        // floor((40 - 101) / 2)
        assert_eq!(row_offsets(&row, 40), vec![(-31, 0)]);
    }

    #[test]
    fn stacked_heights_include_padding_between_rows_only() {
        let (offsets, total) = layer_offsets([40, 60, 50], 10);
        assert_eq!(offsets, vec![0, 50, 120]);
        assert_eq!(total, 170);
        let (offsets, total) = layer_offsets(std::iter::empty(), 10);
        assert!(offsets.is_empty());
        assert_eq!(total, 0);
    }
}
