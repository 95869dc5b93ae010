//! Export planning: size constraints, formats, output names and preview sizes.
//!
//! Nothing here touches pixels or the filesystem. Existence checks are passed
//! in as a predicate so the naming rules stay testable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{MAX_PREVIEW_SIZE, MIN_PREVIEW_SIZE};
use crate::error::CropError;
use crate::geometry::fit_within;

/// Export size presets offered next to "no limit" and a custom value.
pub const SIZE_PRESETS: [u32; 5] = [184, 500, 750, 1000, 1920];

/// Smallest custom export edge.
pub const MIN_CUSTOM_SIZE: u32 = 2;

/// Largest custom export edge.
pub const MAX_CUSTOM_SIZE: u32 = 10000;

/// Preview edge used when the list would otherwise be empty.
pub const DEFAULT_PREVIEW_SIZE: u32 = 184;

/// Upper bound on the exported image's longest edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeConstraint {
    /// Export at the cropped size.
    #[default]
    None,
    /// Shrink to fit a `n` x `n` box.
    Max(u32),
}

impl SizeConstraint {
    /// A user-entered limit, checked against the custom range.
    pub fn custom(size: u32) -> Result<Self, CropError> {
        if !(MIN_CUSTOM_SIZE..=MAX_CUSTOM_SIZE).contains(&size) {
            return Err(CropError::InvalidConfig(format!(
                "export size {size} outside {MIN_CUSTOM_SIZE}..={MAX_CUSTOM_SIZE}"
            )));
        }
        Ok(SizeConstraint::Max(size))
    }

    /// `0` means no limit; anything else must be a valid custom size.
    pub fn from_max_edge(edge: u32) -> Result<Self, CropError> {
        match edge {
            0 => Ok(SizeConstraint::None),
            edge => Self::custom(edge),
        }
    }

    pub fn max_edge(self) -> Option<u32> {
        match self {
            SizeConstraint::None => None,
            SizeConstraint::Max(size) => Some(size),
        }
    }
}

/// Size of a `width` x `height` region after the constraint is applied.
///
/// Never upscales. This is the figure shown next to the crop size label.
pub fn export_dimensions(width: u32, height: u32, constraint: SizeConstraint) -> (u32, u32) {
    match constraint.max_edge() {
        Some(edge) => fit_within(width, height, edge, edge),
        None => (width, height),
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
        }
    }
}

/// Per-export choices made in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub constraint: SizeConstraint,
    pub format: ExportFormat,
    /// Carry the source EXIF block into JPEG output.
    pub keep_exif: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            constraint: SizeConstraint::None,
            format: ExportFormat::Jpeg,
            keep_exif: true,
        }
    }
}

impl ExportSettings {
    /// Reject a size limit outside the custom range.
    pub fn validate(&self) -> Result<(), CropError> {
        match self.constraint {
            SizeConstraint::None => Ok(()),
            SizeConstraint::Max(edge) => SizeConstraint::custom(edge).map(|_| ()),
        }
    }
}

/// Build `folder/stem[-cropped][-scaled][(n)].ext`, bumping `n` until the
/// name is free.
pub fn plan_output_path(
    folder: &Path,
    stem: &str,
    cropped: bool,
    scaled: bool,
    format: ExportFormat,
    exists: impl Fn(&Path) -> bool,
) -> PathBuf {
    let mut base = stem.to_string();
    if cropped {
        base.push_str("-cropped");
    }
    if scaled {
        base.push_str("-scaled");
    }

    let ext = format.extension();
    let mut candidate = folder.join(format!("{base}.{ext}"));
    let mut n = 0u32;
    while exists(&candidate) {
        n += 1;
        candidate = folder.join(format!("{base}({n}).{ext}"));
    }
    candidate
}

/// File name without directory or extension, used as the export stem.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// Preview thumbnail edges, kept unique and largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSizes(Vec<u32>);

impl PreviewSizes {
    /// Sizes outside the preview range are discarded.
    pub fn new(sizes: &[u32]) -> Self {
        let mut previews = Self(Vec::with_capacity(sizes.len()));
        for &size in sizes {
            previews.add(size);
        }
        previews.ensure_one();
        previews
    }

    /// Add `size`; returns false for duplicates and out-of-range values.
    pub fn add(&mut self, size: u32) -> bool {
        if !(MIN_PREVIEW_SIZE..=MAX_PREVIEW_SIZE).contains(&size) || self.0.contains(&size) {
            return false;
        }
        self.0.push(size);
        self.0.sort_unstable_by(|a, b| b.cmp(a));
        true
    }

    /// Remove `size`. Removing the last entry leaves the default size.
    pub fn remove(&mut self, size: u32) -> bool {
        let before = self.0.len();
        self.0.retain(|&s| s != size);
        let removed = self.0.len() != before;
        self.ensure_one();
        removed
    }

    pub fn reset(&mut self) {
        self.0 = vec![DEFAULT_PREVIEW_SIZE];
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    fn ensure_one(&mut self) {
        if self.0.is_empty() {
            self.reset();
        }
    }
}

impl Default for PreviewSizes {
    fn default() -> Self {
        Self(vec![184, 64, 32])
    }
}
