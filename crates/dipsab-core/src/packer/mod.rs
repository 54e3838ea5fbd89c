use image::RgbaImage;

use crate::model::PackingItem;

pub mod rows;

pub use rows::{Row, pack_rows};

/// Anything with intrinsic pixel dimensions can be packed into rows.
pub trait Packable {
    fn size(&self) -> (u32, u32);

    fn width(&self) -> u32 {
        self.size().0
    }
    fn height(&self) -> u32 {
        self.size().1
    }
}

/// A packable item that also carries pixels for compositing.
pub trait Raster: Packable {
    fn rgba(&self) -> &RgbaImage;
}

impl Packable for PackingItem {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl Raster for PackingItem {
    fn rgba(&self) -> &RgbaImage {
        &self.image
    }
}

impl Packable for RgbaImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }
}

impl Raster for RgbaImage {
    fn rgba(&self) -> &RgbaImage {
        self
    }
}

/// Layout-only items: `(key, width, height)`.
impl<K> Packable for (K, u32, u32) {
    fn size(&self) -> (u32, u32) {
        (self.1, self.2)
    }
}

impl<T: Packable> Packable for &T {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }
}

impl<T: Raster> Raster for &T {
    fn rgba(&self) -> &RgbaImage {
        (**self).rgba()
    }
}
