//! Tunables for the crop session and the export pipeline.
//!
//! All fields have defaults, so a partial JSON object (or an empty one) is a
//! valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::CropError;

/// Smallest preview thumbnail edge accepted.
pub const MIN_PREVIEW_SIZE: u32 = 16;

/// Largest preview thumbnail edge accepted.
pub const MAX_PREVIEW_SIZE: u32 = 512;

/// Largest value accepted for any pixel length or coordinate setting.
pub const MAX_PIXEL_SETTING: i32 = 100_000;

/// Crop session and export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Side of a corner hot zone, display pixels.
    pub hot_zone_size: i32,
    /// Source-space width + height under which the whole body moves the rect.
    pub all_drag_min: i32,
    /// Pointer offset divisor for shift-drags.
    pub slow_drag_divisor: i32,
    /// Initial crop edge in display pixels when an image is loaded.
    pub default_display_size: i32,
    /// Initial crop origin in source pixels.
    pub default_origin: (i32, i32),
    /// Preview thumbnail edges, largest first.
    pub preview_sizes: Vec<u32>,
    /// JPEG export quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            hot_zone_size: 60,
            all_drag_min: 400,
            slow_drag_divisor: 10,
            default_display_size: 250,
            default_origin: (10, 10),
            preview_sizes: vec![184, 64, 32],
            jpeg_quality: 95,
        }
    }
}

impl CropConfig {
    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), CropError> {
        check_pixels("hot_zone_size", self.hot_zone_size, 1)?;
        check_pixels("all_drag_min", self.all_drag_min, 0)?;
        if self.slow_drag_divisor < 1 {
            return Err(invalid(format!(
                "slow_drag_divisor must be at least 1, got {}",
                self.slow_drag_divisor
            )));
        }
        check_pixels("default_display_size", self.default_display_size, 1)?;
        check_pixels("default_origin.x", self.default_origin.0, 0)?;
        check_pixels("default_origin.y", self.default_origin.1, 0)?;
        if let Some(size) = self
            .preview_sizes
            .iter()
            .find(|&&size| !(MIN_PREVIEW_SIZE..=MAX_PREVIEW_SIZE).contains(&size))
        {
            return Err(invalid(format!(
                "preview size {size} outside {MIN_PREVIEW_SIZE}..={MAX_PREVIEW_SIZE}"
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(invalid(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

fn check_pixels(name: &str, value: i32, min: i32) -> Result<(), CropError> {
    if (min..=MAX_PIXEL_SETTING).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!(
            "{name} must be within {min}..={MAX_PIXEL_SETTING}, got {value}"
        )))
    }
}

fn invalid(message: String) -> CropError {
    CropError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CropConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hot_zone_size, 60);
        assert_eq!(config.all_drag_min, 400);
        assert_eq!(config.preview_sizes, vec![184, 64, 32]);
        assert_eq!(config.jpeg_quality, 95);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let config = CropConfig {
            slow_drag_divisor: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CropError::InvalidConfig(_))
        ));

        let config = CropConfig {
            preview_sizes: vec![184, 8],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("preview size 8"));

        let config = CropConfig {
            jpeg_quality: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_pixel_settings() {
        let config = CropConfig {
            default_origin: (i32::MAX - 10, 0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_origin.x"));

        let config = CropConfig {
            hot_zone_size: MAX_PIXEL_SETTING + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CropConfig {
            default_display_size: i32::MAX,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CropConfig {
            default_origin: (MAX_PIXEL_SETTING, MAX_PIXEL_SETTING),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
