use image::{Rgb, Rgba};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::DipsabError;

/// Opaque RGB colour used for section and canvas backgrounds.
///
/// Parses `#rgb`, `#rrggbb` and a handful of CSS colour names; serialises as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }

    /// Fully opaque RGBA version of this colour.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    fn named(name: &str) -> Option<Self> {
        let c = match name {
            "black" => Self::rgb(0, 0, 0),
            "white" => Self::rgb(255, 255, 255),
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "lime" => Self::rgb(0, 255, 0),
            "blue" => Self::rgb(0, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "silver" => Self::rgb(192, 192, 192),
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" | "aqua" => Self::rgb(0, 255, 255),
            "magenta" | "fuchsia" => Self::rgb(255, 0, 255),
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "navy" => Self::rgb(0, 0, 128),
            "maroon" => Self::rgb(128, 0, 0),
            "olive" => Self::rgb(128, 128, 0),
            "teal" => Self::rgb(0, 128, 128),
            _ => return None,
        };
        Some(c)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = DipsabError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || DipsabError::InvalidColor(s.to_string());
        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            return match hex.len() {
                3 => {
                    let mut parts = [0u8; 3];
                    for (i, part) in parts.iter_mut().enumerate() {
                        let v = u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| invalid())?;
                        *part = v * 17;
                    }
                    Ok(Self::rgb(parts[0], parts[1], parts[2]))
                }
                6 => {
                    let channel = |i: usize| {
                        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid())
                    };
                    Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
                }
                _ => Err(invalid()),
            };
        }
        Self::named(&trimmed.to_ascii_lowercase()).ok_or_else(invalid)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = DipsabError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

/// File-name ordering switches shared by every section of a canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortOptions {
    /// Compare names as written; when false names are lower-cased first.
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    /// Keep a leading "a ", "an " or "the " in the key; when false it is stripped.
    #[serde(default = "default_true")]
    pub include_articles: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            include_articles: true,
        }
    }
}

/// One directory layer of the canvas. Sections stack top-to-bottom in list order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionConfig {
    pub directory: PathBuf,
    /// Pixels between images within a row.
    #[serde(default = "default_pad")]
    pub hpad: u32,
    /// Pixels between rows.
    #[serde(default = "default_pad")]
    pub vpad: u32,
}

impl SectionConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            hpad: default_pad(),
            vpad: default_pad(),
        }
    }

    pub fn with_padding(mut self, hpad: u32, vpad: u32) -> Self {
        self.hpad = hpad;
        self.vpad = vpad;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasConfig {
    /// Final image width in pixels.
    pub width: u32,
    /// Final image height in pixels.
    pub height: u32,
    /// Inset applied on the left, top and bottom, and the gap between middle layers.
    pub border_size: u32,
    pub background: Color,
    #[serde(default)]
    pub sort: SortOptions,
    /// Pin the first section directly beneath the top border.
    #[serde(default)]
    pub header: bool,
    /// Pin the last section directly above the bottom border.
    #[serde(default)]
    pub footer: bool,
    /// File name suffixes treated as images (matched ASCII case-insensitively).
    #[serde(default = "default_image_suffixes")]
    pub image_suffixes: Vec<String>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            border_size: 40,
            background: Color::BLACK,
            sort: SortOptions::default(),
            header: false,
            footer: false,
            image_suffixes: default_image_suffixes(),
        }
    }
}

impl CanvasConfig {
    /// Validates the canvas geometry.
    ///
    /// Returns an error if either dimension is zero or the left/right borders
    /// leave no width for section layers.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DipsabError::InvalidConfig(format!(
                "canvas dimensions must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        if self.border_size.saturating_mul(2) >= self.width {
            return Err(DipsabError::InvalidConfig(format!(
                "border_size ({}) * 2 leaves no layout width in a {}px wide canvas",
                self.border_size, self.width
            )));
        }
        Ok(())
    }

    /// Width available to every section layer: canvas width minus both side borders.
    pub fn layout_width(&self) -> u32 {
        self.width.saturating_sub(self.border_size.saturating_mul(2))
    }

    /// Builds the per-section layout request for `section` under this canvas.
    pub fn layout_request(&self, section: &SectionConfig) -> LayoutRequest {
        LayoutRequest {
            directory: section.directory.clone(),
            layout_width: self.layout_width(),
            hpad: section.hpad,
            vpad: section.vpad,
            background: self.background,
            sort: self.sort,
            image_suffixes: self.image_suffixes.clone(),
        }
    }

    /// Create a fluent builder for `CanvasConfig`.
    pub fn builder() -> CanvasConfigBuilder {
        CanvasConfigBuilder::new()
    }
}

/// Everything needed to turn one directory into one section layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutRequest {
    pub directory: PathBuf,
    pub layout_width: u32,
    pub hpad: u32,
    pub vpad: u32,
    pub background: Color,
    #[serde(default)]
    pub sort: SortOptions,
    #[serde(default = "default_image_suffixes")]
    pub image_suffixes: Vec<String>,
}

impl LayoutRequest {
    pub fn new(directory: impl Into<PathBuf>, layout_width: u32) -> Self {
        Self {
            directory: directory.into(),
            layout_width,
            hpad: 0,
            vpad: 0,
            background: Color::BLACK,
            sort: SortOptions::default(),
            image_suffixes: default_image_suffixes(),
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.layout_width == 0 {
            return Err(DipsabError::InvalidConfig(
                "layout width must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_pad() -> u32 {
    10
}
pub fn default_image_suffixes() -> Vec<String> {
    vec![".jpg".into(), ".png".into()]
}

/// Builder for `CanvasConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct CanvasConfigBuilder {
    cfg: CanvasConfig,
}

impl CanvasConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: CanvasConfig::default(),
        }
    }
    pub fn with_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.width = w;
        self.cfg.height = h;
        self
    }
    pub fn border_size(mut self, v: u32) -> Self {
        self.cfg.border_size = v;
        self
    }
    pub fn background(mut self, v: Color) -> Self {
        self.cfg.background = v;
        self
    }
    pub fn case_sensitive(mut self, v: bool) -> Self {
        self.cfg.sort.case_sensitive = v;
        self
    }
    pub fn include_articles(mut self, v: bool) -> Self {
        self.cfg.sort.include_articles = v;
        self
    }
    pub fn header(mut self, v: bool) -> Self {
        self.cfg.header = v;
        self
    }
    pub fn footer(mut self, v: bool) -> Self {
        self.cfg.footer = v;
        self
    }
    pub fn image_suffixes(mut self, v: Vec<String>) -> Self {
        self.cfg.image_suffixes = v;
        self
    }
    pub fn build(self) -> CanvasConfig {
        self.cfg
    }
}
