// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PageliftError, Result};
use crate::types::CornerOrdering;

/// Tunables for detection, rectification and the multi-page host flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Side of the square Gaussian smoothing kernel (odd).
    pub blur_kernel_size: u32,
    /// Gaussian sigma; `None` derives it from the kernel size.
    pub blur_sigma: Option<f32>,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Douglas-Peucker epsilon as a fraction of the contour perimeter.
    pub epsilon_factor: f64,
    /// How polygon vertices are assigned to quad corners.
    pub corner_ordering: CornerOrdering,
    /// Maximum number of pages accepted in one scan session.
    pub max_pages: usize,
    /// JPEG quality (1-100) used when the host persists pages.
    pub jpeg_quality: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: None,
            canny_low: 75.0,
            canny_high: 200.0,
            epsilon_factor: 0.02,
            corner_ordering: CornerOrdering::RowMajor,
            max_pages: 50,
            jpeg_quality: 90,
        }
    }
}

impl ScanConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(PageliftError::InvalidConfig(format!(
                "blur_kernel_size must be odd and non-zero, got {}",
                self.blur_kernel_size
            )));
        }
        if let Some(sigma) = self.blur_sigma {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(PageliftError::InvalidConfig(format!(
                    "blur_sigma must be positive, got {sigma}"
                )));
            }
        }
        if !(self.canny_low > 0.0 && self.canny_low <= self.canny_high) {
            return Err(PageliftError::InvalidConfig(format!(
                "canny thresholds must satisfy 0 < low <= high, got {} / {}",
                self.canny_low, self.canny_high
            )));
        }
        if !(self.epsilon_factor.is_finite() && self.epsilon_factor > 0.0) {
            return Err(PageliftError::InvalidConfig(format!(
                "epsilon_factor must be positive, got {}",
                self.epsilon_factor
            )));
        }
        if self.max_pages == 0 {
            return Err(PageliftError::InvalidConfig(
                "max_pages must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(PageliftError::InvalidConfig(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Sigma for the smoothing kernel, derived from the kernel size when not
    /// set explicitly: `0.3 * ((k - 1) * 0.5 - 1) + 0.8`.
    pub fn effective_blur_sigma(&self) -> f32 {
        self.blur_sigma.unwrap_or_else(|| {
            let k = self.blur_kernel_size as f32;
            0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::default();
        config.validate().unwrap();
        assert_eq!(config.blur_kernel_size, 5);
        assert_eq!(config.canny_low, 75.0);
        assert_eq!(config.canny_high, 200.0);
        assert_eq!(config.max_pages, 50);
    }

    #[test]
    fn auto_sigma_for_five_tap_kernel() {
        let sigma = ScanConfig::default().effective_blur_sigma();
        assert!((sigma - 1.1).abs() < 1e-6, "got {sigma}");
    }

    #[test]
    fn explicit_sigma_wins() {
        let config = ScanConfig {
            blur_sigma: Some(2.5),
            ..Default::default()
        };
        assert_eq!(config.effective_blur_sigma(), 2.5);
    }

    #[test]
    fn even_kernel_rejected() {
        let config = ScanConfig {
            blur_kernel_size: 4,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PageliftError::InvalidConfig(_))
        ));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let config = ScanConfig {
            canny_low: 210.0,
            canny_high: 200.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_page_limit_rejected() {
        let config = ScanConfig {
            max_pages: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "corner_ordering": "centroid-quadrant", "max_pages": 3 }}"#
        )
        .unwrap();

        let config = ScanConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.corner_ordering, CornerOrdering::CentroidQuadrant);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.blur_kernel_size, 5);
    }

    #[test]
    fn invalid_json_file_is_a_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ScanConfig::from_json_file(file.path()),
            Err(PageliftError::Serialization(_))
        ));
    }
}
