//! Core library for dipsab: directory images padded, stacked and bordered.
//!
//! - Scanning: each section directory yields its leaf-directory images, ordered by a
//!   file-name sort key (optionally case-folded and article-stripped)
//! - Packing: a single greedy pass fills rows up to the layout width
//! - Compositing: rows are centred and alpha-blended, stacked into an opaque layer per
//!   section, and layers are placed on a fixed-size bordered canvas with optional
//!   header/footer bands
//! - Layout-only: the same geometry is available without decoding pixels
//!
//! Quick example:
//! ```ignore
//! use dipsab_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let cfg = CanvasConfig::builder()
//!     .with_dimensions(1920, 1080)
//!     .border_size(40)
//!     .header(true)
//!     .build();
//! let sections = vec![
//!     SectionConfig::new("icons/title"),
//!     SectionConfig::new("icons/tools").with_padding(8, 8),
//! ];
//! let canvas = render_project(&cfg, &sections)?;
//! canvas.save("out.jpg")?;
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod preview;
pub mod project;
pub mod scan;
pub mod sort_key;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `dipsab_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        CanvasConfig, CanvasConfigBuilder, Color, LayoutRequest, SectionConfig, SortOptions,
    };
    pub use crate::layout::{canvas_offsets, layer_offsets, row_offsets};
    pub use crate::model::{
        CanvasLayout, LayerRole, LayerSlot, PackingItem, Placement, Rect, SectionLayout,
    };
    pub use crate::packer::{Packable, Raster, Row, pack_rows};
    pub use crate::preview::{fit_within, preview};
    pub use crate::project::Project;
    pub use crate::scan::DirectoryImageSet;
    pub use crate::sort_key::sort_key;
    pub use crate::{
        compose_canvas, compose_layer, compose_row, layout_project, layout_section,
        render_project, render_section,
    };
}
