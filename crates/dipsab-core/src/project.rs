//! Project files: canvas properties plus the ordered section list.
//!
//! On disk a project is a two-element JSON array `[props, sections]`:
//!
//! ```json
//! [
//!     {"bgcolor": "#000000", "bordersize": 40, "hsize": 1920, "vsize": 1080,
//!      "header": 0, "footer": 0, "exportpath": "", "case": 1, "articles": 1},
//!     [{"directory": "icons/tools", "hpad": 10, "vpad": 10}]
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CanvasConfig, Color, SectionConfig, SortOptions, default_image_suffixes};
use crate::error::{DipsabError, Result};

/// Canvas-wide properties as stored in a project file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectProps {
    #[serde(default)]
    pub bgcolor: Color,
    #[serde(default = "default_border")]
    pub bordersize: u32,
    #[serde(default = "default_hsize")]
    pub hsize: u32,
    #[serde(default = "default_vsize")]
    pub vsize: u32,
    #[serde(default, with = "flag")]
    pub header: bool,
    #[serde(default, with = "flag")]
    pub footer: bool,
    #[serde(default)]
    pub exportpath: String,
    #[serde(default = "default_on", with = "flag")]
    pub case: bool,
    #[serde(default = "default_on", with = "flag")]
    pub articles: bool,
}

impl Default for ProjectProps {
    fn default() -> Self {
        Self {
            bgcolor: Color::BLACK,
            bordersize: default_border(),
            hsize: default_hsize(),
            vsize: default_vsize(),
            header: false,
            footer: false,
            exportpath: String::new(),
            case: true,
            articles: true,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ProjectDocument(ProjectProps, Vec<SectionConfig>);

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "ProjectDocument", into = "ProjectDocument")]
pub struct Project {
    pub props: ProjectProps,
    pub sections: Vec<SectionConfig>,
}

impl From<ProjectDocument> for Project {
    fn from(doc: ProjectDocument) -> Self {
        Self {
            props: doc.0,
            sections: doc.1,
        }
    }
}

impl From<Project> for ProjectDocument {
    fn from(p: Project) -> Self {
        ProjectDocument(p.props, p.sections)
    }
}

impl Project {
    /// Builds a project from a canvas configuration and sections.
    pub fn from_parts(
        cfg: &CanvasConfig,
        sections: Vec<SectionConfig>,
        export_path: Option<&Path>,
    ) -> Self {
        Self {
            props: ProjectProps {
                bgcolor: cfg.background,
                bordersize: cfg.border_size,
                hsize: cfg.width,
                vsize: cfg.height,
                header: cfg.header,
                footer: cfg.footer,
                exportpath: export_path
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                case: cfg.sort.case_sensitive,
                articles: cfg.sort.include_articles,
            },
            sections,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn canvas_config(&self) -> CanvasConfig {
        CanvasConfig {
            width: self.props.hsize,
            height: self.props.vsize,
            border_size: self.props.bordersize,
            background: self.props.bgcolor,
            sort: SortOptions {
                case_sensitive: self.props.case,
                include_articles: self.props.articles,
            },
            header: self.props.header,
            footer: self.props.footer,
            image_suffixes: default_image_suffixes(),
        }
    }

    pub fn sections(&self) -> &[SectionConfig] {
        &self.sections
    }

    /// The configured export destination, if any.
    pub fn export_path(&self) -> Option<PathBuf> {
        if self.props.exportpath.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.props.exportpath))
        }
    }

    /// Appends a section with default padding.
    pub fn add_section(&mut self, directory: impl Into<PathBuf>) {
        self.sections.push(SectionConfig::new(directory));
    }

    /// Swaps two sections (0-based), changing their stacking order.
    pub fn swap_sections(&mut self, one: usize, other: usize) -> Result<()> {
        let len = self.sections.len();
        if one >= len || other >= len {
            return Err(DipsabError::InvalidConfig(format!(
                "cannot swap sections {one} and {other}: project has {len}"
            )));
        }
        self.sections.swap(one, other);
        Ok(())
    }
}

fn default_border() -> u32 {
    40
}
fn default_hsize() -> u32 {
    1920
}
fn default_vsize() -> u32 {
    1080
}
fn default_on() -> bool {
    true
}

/// Flags are written as 0/1 integers; booleans are accepted on read.
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
    }

    pub fn serialize<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Raw::deserialize(d)? {
            Raw::Bool(b) => b,
            Raw::Int(i) => i != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"[
        {"bgcolor": "#102030", "bordersize": 20, "hsize": 800, "vsize": 600,
         "header": 1, "footer": 0, "exportpath": "out.jpg", "case": 0, "articles": 1},
        [{"directory": "a", "hpad": 4, "vpad": 6}, {"directory": "b", "hpad": 10, "vpad": 10}]
    ]"##;

    #[test]
    fn reads_two_element_array_document() {
        let p = Project::from_json(SAMPLE).unwrap();
        assert_eq!(p.props.bgcolor, Color::rgb(0x10, 0x20, 0x30));
        assert!(p.props.header);
        assert!(!p.props.footer);
        assert_eq!(p.sections.len(), 2);
        assert_eq!(p.sections[0].hpad, 4);
        assert_eq!(p.export_path(), Some(PathBuf::from("out.jpg")));

        let cfg = p.canvas_config();
        assert_eq!((cfg.width, cfg.height, cfg.border_size), (800, 600, 20));
        assert!(!cfg.sort.case_sensitive);
        assert!(cfg.sort.include_articles);
    }

    #[test]
    fn writes_flags_as_integers() {
        let p = Project::from_json(SAMPLE).unwrap();
        let v: serde_json::Value = serde_json::from_str(&p.to_json().unwrap()).unwrap();
        assert!(v.is_array());
        assert_eq!(v[0]["header"], serde_json::json!(1));
        assert_eq!(v[0]["case"], serde_json::json!(0));
        assert_eq!(v[1][1]["directory"], serde_json::json!("b"));
        assert_eq!(Project::from_json(&p.to_json().unwrap()).unwrap(), p);
    }

    #[test]
    fn sections_can_be_added_and_reordered() {
        let mut p = Project::from_json(SAMPLE).unwrap();
        p.add_section("c");
        assert_eq!(p.sections().len(), 3);
        assert_eq!(p.sections()[2], SectionConfig::new("c"));

        p.swap_sections(0, 2).unwrap();
        let dirs: Vec<_> = p.sections().iter().map(|s| s.directory.clone()).collect();
        assert_eq!(dirs, vec![PathBuf::from("c"), PathBuf::from("b"), PathBuf::from("a")]);
        assert_eq!(p.sections()[2].hpad, 4);

        let err = p.swap_sections(1, 3).unwrap_err();
        assert!(matches!(err, DipsabError::InvalidConfig(_)));
        assert_eq!(p.sections()[1].directory, PathBuf::from("b"));
    }

    #[test]
    fn missing_props_fall_back_to_defaults() {
        let p = Project::from_json(r#"[{}, []]"#).unwrap();
        assert_eq!(p.props, ProjectProps::default());
        assert_eq!(p.export_path(), None);
    }
}
