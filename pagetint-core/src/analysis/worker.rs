//! Per-page classification work: the unit the analyzer fans out.

use super::classify::{classify_ratio, color_ratio, ClassificationThresholds};
use super::summary::PageAnalysis;
use crate::error::AnalysisError;
use crate::raster::{PixelBuffer, RasterDocument};

/// Classify one page end to end: render it at the given scale, measure the
/// color ratio, assign a tier.
///
/// A render failure carries the 1-based page number and fails the whole
/// document analysis; pages are never silently dropped from a summary.
pub fn classify_page<D: RasterDocument>(
    document: &D,
    page_index: usize,
    scale: f64,
    thresholds: &ClassificationThresholds,
) -> Result<PageAnalysis, AnalysisError> {
    let buffer = document
        .render_page(page_index, scale)
        .map_err(|e| AnalysisError::PageRender {
            page: page_index + 1,
            reason: e.to_string(),
        })?;
    classify_buffer(page_index, &buffer, thresholds)
}

/// The rasterization-free half of [`classify_page`], for callers that
/// already hold the page's pixel buffer.
pub fn classify_buffer(
    page_index: usize,
    buffer: &PixelBuffer,
    thresholds: &ClassificationThresholds,
) -> Result<PageAnalysis, AnalysisError> {
    let color_percentage = color_ratio(buffer)?;
    Ok(PageAnalysis {
        page_number: page_index + 1,
        class: classify_ratio(color_percentage, thresholds),
        color_percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classify::PageClass;
    use crate::raster::mock::MockRasterBackend;
    use crate::raster::RasterBackend;

    #[test]
    fn test_classify_buffer_packages_page_number() {
        let buffer = PixelBuffer::solid(10, 10, [255, 0, 0]);
        let result =
            classify_buffer(4, &buffer, &ClassificationThresholds::default()).unwrap();
        assert_eq!(result.page_number, 5);
        assert_eq!(result.class, PageClass::Photographic);
        assert_eq!(result.color_percentage, 100.0);
    }

    #[test]
    fn test_render_failure_carries_page_number() {
        let backend = MockRasterBackend::new()
            .with_page(PixelBuffer::solid(4, 4, [0, 0, 0]))
            .with_failing_page("unsupported content stream");
        let doc = backend.open_document(b"x").unwrap();

        let error =
            classify_page(&doc, 1, 0.25, &ClassificationThresholds::default()).unwrap_err();
        assert!(matches!(
            error,
            AnalysisError::PageRender { page: 2, .. }
        ));
    }
}
