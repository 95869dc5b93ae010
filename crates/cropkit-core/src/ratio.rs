//! Crop ratio policies, presets and the ratio quantization rule.
//!
//! A locked ratio does not scale proportionally: the height is divided by the
//! ratio's height term (integer division) and both sides are rebuilt from that
//! unit. The result is always an exact multiple of the ratio, which is what
//! the size label highlights.
//!
//! Two ratios carry a snap exception for video-frame crops: 16:9 and 21:9
//! within 50px of a 1080px height are pinned to 1920x1080 and 2560x1080.

use serde::{Deserialize, Serialize};

use crate::error::CropError;

/// Height the snap ratios pin to.
pub const SNAP_HEIGHT: i32 = 1080;

/// Heights strictly closer than this to [`SNAP_HEIGHT`] snap.
pub const SNAP_TOLERANCE: i32 = 50;

/// Policy governing the crop rectangle's aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropRatio {
    /// Free rectangle.
    Unlocked,
    /// Width:height locked to small positive integers.
    Locked { width: u32, height: u32 },
}

impl CropRatio {
    /// 1:1 lock.
    pub const SQUARE: CropRatio = CropRatio::Locked {
        width: 1,
        height: 1,
    };

    /// Create a locked ratio, rejecting zero terms.
    pub fn locked(width: u32, height: u32) -> Result<Self, CropError> {
        let ratio = CropRatio::Locked { width, height };
        ratio.validate()?;
        Ok(ratio)
    }

    /// Reject ratios with a zero term.
    pub fn validate(&self) -> Result<(), CropError> {
        match *self {
            CropRatio::Locked { width, height } if width == 0 || height == 0 => {
                Err(CropError::InvalidRatio { width, height })
            }
            _ => Ok(()),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, CropRatio::Locked { .. })
    }

    pub fn is_square(&self) -> bool {
        matches!(self, CropRatio::Locked { width, height } if width == height)
    }

    /// Canonical pixel size this ratio snaps to, if it is a snap ratio.
    pub fn snap_size(&self) -> Option<(i32, i32)> {
        match *self {
            CropRatio::Locked {
                width: 16,
                height: 9,
            } => Some((1920, SNAP_HEIGHT)),
            CropRatio::Locked {
                width: 21,
                height: 9,
            } => Some((2560, SNAP_HEIGHT)),
            _ => None,
        }
    }

    /// Rebuild `(width, height)` from `height` under this policy.
    ///
    /// Unlocked returns the input unchanged. The ratio unit never drops below
    /// one, so the result is never empty.
    pub fn quantize(&self, width: i32, height: i32) -> (i32, i32) {
        let CropRatio::Locked {
            width: ratio_w,
            height: ratio_h,
        } = *self
        else {
            return (width, height);
        };

        if let Some(snapped) = self.snap_size() {
            if (height - SNAP_HEIGHT).abs() < SNAP_TOLERANCE {
                return snapped;
            }
        }

        let (ratio_w, ratio_h) = (ratio_w as i32, ratio_h as i32);
        let unit = (height / ratio_h).max(1);
        (unit.saturating_mul(ratio_w), unit * ratio_h)
    }

    /// Largest exact ratio multiple no bigger than the given limits.
    ///
    /// Returns `None` when not even one ratio unit fits.
    pub fn largest_multiple_within(&self, max_width: i32, max_height: i32) -> Option<(i32, i32)> {
        let CropRatio::Locked {
            width: ratio_w,
            height: ratio_h,
        } = *self
        else {
            return Some((max_width, max_height));
        };
        let (ratio_w, ratio_h) = (ratio_w as i32, ratio_h as i32);
        let unit = (max_width / ratio_w).min(max_height / ratio_h);
        (unit >= 1).then_some((unit * ratio_w, unit * ratio_h))
    }
}

/// Ratio choices offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatioPreset {
    #[default]
    Square,
    Free,
    #[serde(rename = "16:10")]
    Ratio16x10,
    #[serde(rename = "16:9")]
    Ratio16x9,
    #[serde(rename = "21:9")]
    Ratio21x9,
}

impl RatioPreset {
    pub fn policy(self) -> CropRatio {
        match self {
            RatioPreset::Square => CropRatio::SQUARE,
            RatioPreset::Free => CropRatio::Unlocked,
            RatioPreset::Ratio16x10 => CropRatio::Locked {
                width: 16,
                height: 10,
            },
            RatioPreset::Ratio16x9 => CropRatio::Locked {
                width: 16,
                height: 9,
            },
            RatioPreset::Ratio21x9 => CropRatio::Locked {
                width: 21,
                height: 9,
            },
        }
    }

    /// Parse a preset name as shown in the UI (`"square"`, `"free"`, `"16:9"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "square" => Some(RatioPreset::Square),
            "free" | "rect" => Some(RatioPreset::Free),
            "16:10" => Some(RatioPreset::Ratio16x10),
            "16:9" => Some(RatioPreset::Ratio16x9),
            "21:9" => Some(RatioPreset::Ratio21x9),
            _ => None,
        }
    }
}

/// How the size label of the crop rectangle should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatioIndicator {
    /// Exactly one of the canonical 1080p frame sizes.
    Snapped,
    /// An exact multiple of a locked, non-square ratio.
    Exact,
    Plain,
}

impl RatioIndicator {
    /// Classify a source-space size under a policy.
    pub fn classify(policy: CropRatio, width: i32, height: i32) -> Self {
        if height == SNAP_HEIGHT && (width == 2560 || width == 1920) {
            return RatioIndicator::Snapped;
        }
        match policy {
            CropRatio::Locked {
                width: ratio_w,
                height: ratio_h,
            } if ratio_w != ratio_h => {
                // Cross-multiplied so the check is exact in integers.
                if i64::from(width) * i64::from(ratio_h) == i64::from(height) * i64::from(ratio_w)
                {
                    RatioIndicator::Exact
                } else {
                    RatioIndicator::Plain
                }
            }
            _ => RatioIndicator::Plain,
        }
    }
}
