//! Directory enumeration for one section.
//!
//! Only leaf directories contribute files: a directory that has any
//! subdirectory is skipped for file collection, though leaf directories
//! beneath it still count.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use image::ImageReader;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::SortOptions;
use crate::error::{DipsabError, Result};
use crate::model::PackingItem;
use crate::sort_key::sort_key;

/// The eligible images of one directory tree, ordered by descending sort key.
#[derive(Debug, Clone)]
pub struct DirectoryImageSet {
    entries: Vec<(String, PathBuf)>,
}

impl DirectoryImageSet {
    /// Enumerates `dir` and orders its images by descending key.
    ///
    /// Fails with `InvalidDirectory` when `dir` is not a directory. A directory
    /// without eligible images yields an empty set.
    pub fn scan(dir: &Path, sort: SortOptions, suffixes: &[String]) -> Result<Self> {
        if !dir.is_dir() {
            return Err(DipsabError::InvalidDirectory {
                path: dir.to_path_buf(),
            });
        }
        let mut entries: Vec<(String, PathBuf)> = leaf_image_paths(dir, suffixes)
            .into_iter()
            .map(|p| (sort_key(&p, sort), p))
            .collect();
        // Equal keys fall back to the full path so the order never depends on the filesystem.
        entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        debug!(dir = %dir.display(), images = entries.len(), "scanned section directory");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Image paths in descending key order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|(_, p)| p.as_path())
    }

    /// `(key, path)` pairs in descending key order.
    pub fn entries(&self) -> &[(String, PathBuf)] {
        &self.entries
    }

    /// Decodes every image, preserving order. The first undecodable file aborts.
    pub fn load(&self) -> Result<Vec<PackingItem>> {
        self.entries
            .iter()
            .map(|(key, path)| {
                let image = decode(path)?.into_rgba8();
                Ok(PackingItem {
                    key: key.clone(),
                    path: path.clone(),
                    image,
                })
            })
            .collect()
    }

    /// Reads only the dimensions of every image: `(key, path, width, height)`.
    pub fn dimensions(&self) -> Result<Vec<(String, PathBuf, u32, u32)>> {
        self.entries
            .iter()
            .map(|(key, path)| {
                let (w, h) = ImageReader::open(path)?
                    .with_guessed_format()?
                    .into_dimensions()
                    .map_err(|source| DipsabError::ImageDecode {
                        path: path.clone(),
                        source,
                    })?;
                Ok((key.clone(), path.clone(), w, h))
            })
            .collect()
    }
}

fn decode(path: &Path) -> Result<image::DynamicImage> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| DipsabError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })
}

/// True when `name` ends with one of `suffixes`. The match is exact, so `.png`
/// does not accept `B.PNG`.
pub fn has_image_suffix(name: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
}

/// A directory contributes files only if none of its children is a directory.
fn is_leaf_dir(dir: &Path, parents_of_dirs: &HashSet<PathBuf>) -> bool {
    !parents_of_dirs.contains(dir)
}

fn leaf_image_paths(root: &Path, suffixes: &[String]) -> Vec<PathBuf> {
    let mut parents_of_dirs: HashSet<PathBuf> = HashSet::new();
    let mut candidates: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        // Symlinked directories count as subdirectories but are not descended into.
        let is_dir = entry.file_type().is_dir()
            || (entry.path_is_symlink() && entry.path().is_dir());
        if is_dir {
            if entry.depth() > 0 {
                if let Some(parent) = entry.path().parent() {
                    parents_of_dirs.insert(parent.to_path_buf());
                }
            }
            continue;
        }
        let is_image = has_image_suffix(&entry.file_name().to_string_lossy(), suffixes);
        if is_image {
            candidates.push(entry.into_path());
        }
    }
    candidates
        .into_iter()
        .filter(|p| p.parent().is_some_and(|dir| is_leaf_dir(dir, &parents_of_dirs)))
        .collect()
}
