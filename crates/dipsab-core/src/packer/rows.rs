use tracing::debug;

use super::Packable;

/// A left-to-right band of items sharing one row of a section layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<T> {
    /// Items in display order (ascending sort key, left to right).
    pub items: Vec<T>,
    /// Horizontal gap between neighbouring items.
    pub spacing: u32,
    /// Sum of item widths plus `spacing * (n - 1)`.
    pub width: u32,
    /// Tallest item height.
    pub height: u32,
}

impl<T: Packable> Row<T> {
    pub fn new(items: Vec<T>, spacing: u32) -> Self {
        let gaps = spacing.saturating_mul(items.len().saturating_sub(1) as u32);
        let width = items
            .iter()
            .fold(gaps, |acc, it| acc.saturating_add(it.width()));
        let height = items.iter().map(|it| it.height()).max().unwrap_or(0);
        Self {
            items,
            spacing,
            width,
            height,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Greedily partitions `items` into rows no wider than `layout_width`.
///
/// `items` must arrive in descending key order. An empty row always accepts the
/// next item, however wide, so an oversized image gets a row of its own. Each
/// completed row is reversed into ascending display order.
///
/// Rows are returned in completion order: the first row holds the latest keys.
/// Reverse the sequence to read rows top-to-bottom (see `compose_layer`).
pub fn pack_rows<T, I>(items: I, layout_width: u32, hpad: u32) -> Vec<Row<T>>
where
    T: Packable,
    I: IntoIterator<Item = T>,
{
    let max = layout_width as i64;
    let pad = hpad as i64;
    let mut rows: Vec<Row<T>> = Vec::new();
    let mut pending: Vec<T> = Vec::new();
    let mut remaining = max;

    for item in items {
        let w = item.width() as i64;
        if pending.is_empty() {
            remaining = max - w;
        } else if remaining - w - pad >= 0 {
            remaining -= w + pad;
        } else {
            rows.push(close_row(std::mem::take(&mut pending), hpad));
            remaining = max - w;
        }
        pending.push(item);
    }
    if !pending.is_empty() {
        rows.push(close_row(pending, hpad));
    }
    rows
}

fn close_row<T: Packable>(mut items: Vec<T>, hpad: u32) -> Row<T> {
    items.reverse();
    let row = Row::new(items, hpad);
    debug!(items = row.len(), width = row.width, height = row.height, "row packed");
    row
}
