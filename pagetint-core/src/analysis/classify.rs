//! Color-ratio measurement and tier assignment.
//!
//! A pixel counts as colored when its three channels are not all equal;
//! the page's color ratio is the percentage of colored pixels in its
//! raster. Two thresholds then split the ratio into three tiers:
//!
//! - ratio >= photo threshold: photographic
//! - ratio >= color threshold: color
//! - otherwise: black-and-white
//!
//! Comparisons are inclusive on purpose: a page sitting exactly on a
//! threshold counts as the richer class.

use crate::error::AnalysisError;
use crate::raster::PixelBuffer;

/// Default color threshold: at least this percentage of colored pixels
/// makes a page a color page.
pub const DEFAULT_COLOR_THRESHOLD: f64 = 10.0;

/// Default photo threshold: at least this percentage of colored pixels
/// makes a page photographic.
pub const DEFAULT_PHOTO_THRESHOLD: f64 = 30.0;

/// Classification tier of a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PageClass {
    /// Colored-pixel ratio below the color threshold.
    BlackAndWhite,
    /// Ratio at or above the color threshold but below the photo threshold.
    Color,
    /// Ratio at or above the photo threshold.
    Photographic,
}

impl PageClass {
    pub fn is_black_and_white(&self) -> bool {
        matches!(self, PageClass::BlackAndWhite)
    }

    pub fn is_color(&self) -> bool {
        matches!(self, PageClass::Color)
    }

    pub fn is_photographic(&self) -> bool {
        matches!(self, PageClass::Photographic)
    }

    /// Stable string form used in reports and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageClass::BlackAndWhite => "black-and-white",
            PageClass::Color => "color",
            PageClass::Photographic => "photographic",
        }
    }
}

impl std::fmt::Display for PageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two tier thresholds for one analysis run, as percentages in
/// [0, 100] with `photo >= color`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassificationThresholds {
    pub color: f64,
    pub photo: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR_THRESHOLD,
            photo: DEFAULT_PHOTO_THRESHOLD,
        }
    }
}

impl ClassificationThresholds {
    pub fn new(color: f64, photo: f64) -> Self {
        Self { color, photo }
    }

    /// Reject non-finite or out-of-range values and mis-ordered tiers.
    /// Runs before any page work is dispatched.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, value) in [("color", self.color), ("photo", self.photo)] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(AnalysisError::InvalidThreshold { name, value });
            }
        }
        if self.photo < self.color {
            return Err(AnalysisError::ThresholdOrdering {
                color: self.color,
                photo: self.photo,
            });
        }
        Ok(())
    }
}

/// Percentage of pixels in the buffer whose channels are not all equal.
///
/// Returns a value in [0, 100], rounded to two decimals half-up (the
/// domain is non-negative, so `f64::round`'s ties-away-from-zero behaves
/// as half-up). A zero-area buffer is an error, never a silent 0%.
///
/// Reads one buffer and returns a value; safe to call from any number of
/// threads at once.
pub fn color_ratio(buffer: &PixelBuffer) -> Result<f64, AnalysisError> {
    let total = buffer.pixel_count();
    if total == 0 {
        return Err(AnalysisError::EmptyRaster {
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    // R==G && G==B implies R==B, so two comparisons cover all three.
    let colored = buffer.pixels().filter(|[r, g, b]| r != g || g != b).count();

    Ok(round2(100.0 * colored as f64 / total as f64))
}

/// Assign a tier from a color ratio. Checks the photo tier first; ties on
/// either threshold promote to the richer class.
pub fn classify_ratio(percentage: f64, thresholds: &ClassificationThresholds) -> PageClass {
    if percentage >= thresholds.photo {
        PageClass::Photographic
    } else if percentage >= thresholds.color {
        PageClass::Color
    } else {
        PageClass::BlackAndWhite
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_gray_is_zero_percent() {
        let buffer = PixelBuffer::solid(100, 100, [128, 128, 128]);
        assert_eq!(color_ratio(&buffer).unwrap(), 0.0);
    }

    #[test]
    fn test_uniform_color_is_hundred_percent() {
        let buffer = PixelBuffer::solid(100, 100, [10, 20, 30]);
        assert_eq!(color_ratio(&buffer).unwrap(), 100.0);
    }

    #[test]
    fn test_ratio_in_range_for_mixed_buffer() {
        // 1 colored pixel out of 4
        let mut data = vec![50u8; 9];
        data.extend_from_slice(&[200, 0, 0]);
        let buffer = PixelBuffer::new(2, 2, data).unwrap();
        assert_eq!(color_ratio(&buffer).unwrap(), 25.0);
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 1 colored pixel out of 800 = 0.125%, which rounds up to 0.13
        let mut data = vec![0u8; 799 * 3];
        data.extend_from_slice(&[1, 2, 3]);
        let buffer = PixelBuffer::new(800, 1, data).unwrap();
        assert_eq!(color_ratio(&buffer).unwrap(), 0.13);
    }

    #[test]
    fn test_two_decimal_rounding() {
        // 1 colored pixel out of 3 = 33.333...%
        let mut data = vec![10u8; 6];
        data.extend_from_slice(&[9, 10, 10]);
        let buffer = PixelBuffer::new(3, 1, data).unwrap();
        assert_eq!(color_ratio(&buffer).unwrap(), 33.33);
    }

    #[test]
    fn test_zero_area_buffer_is_an_error() {
        let buffer = PixelBuffer::new(0, 50, vec![]).unwrap();
        assert!(matches!(
            color_ratio(&buffer),
            Err(AnalysisError::EmptyRaster {
                width: 0,
                height: 50
            })
        ));
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        let thresholds = ClassificationThresholds::new(10.0, 50.0);

        assert_eq!(classify_ratio(50.0, &thresholds), PageClass::Photographic);
        assert_eq!(classify_ratio(49.99, &thresholds), PageClass::Color);
        assert_eq!(classify_ratio(10.0, &thresholds), PageClass::Color);
        assert_eq!(classify_ratio(9.99, &thresholds), PageClass::BlackAndWhite);
        assert_eq!(classify_ratio(0.0, &thresholds), PageClass::BlackAndWhite);
    }

    #[test]
    fn test_equal_thresholds_skip_color_tier() {
        let thresholds = ClassificationThresholds::new(20.0, 20.0);
        assert!(thresholds.validate().is_ok());
        assert_eq!(classify_ratio(20.0, &thresholds), PageClass::Photographic);
        assert_eq!(classify_ratio(19.0, &thresholds), PageClass::BlackAndWhite);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(ClassificationThresholds::default().validate().is_ok());
        assert!(ClassificationThresholds::new(0.0, 100.0).validate().is_ok());

        let bad = [
            ClassificationThresholds::new(-1.0, 30.0),
            ClassificationThresholds::new(10.0, 100.5),
            ClassificationThresholds::new(f64::NAN, 30.0),
            ClassificationThresholds::new(10.0, f64::INFINITY),
        ];
        for thresholds in bad {
            assert!(matches!(
                thresholds.validate(),
                Err(AnalysisError::InvalidThreshold { .. })
            ));
        }

        assert!(matches!(
            ClassificationThresholds::new(40.0, 10.0).validate(),
            Err(AnalysisError::ThresholdOrdering {
                color, photo
            }) if color == 40.0 && photo == 10.0
        ));
    }

    #[test]
    fn test_page_class_predicates() {
        assert!(PageClass::BlackAndWhite.is_black_and_white());
        assert!(!PageClass::BlackAndWhite.is_color());
        assert!(PageClass::Color.is_color());
        assert!(PageClass::Photographic.is_photographic());
        assert_eq!(PageClass::BlackAndWhite.as_str(), "black-and-white");
        assert_eq!(PageClass::Photographic.to_string(), "photographic");
    }
}
