//! # pagetint
//!
//! Per-page color classification of PDF documents for print pricing and
//! reporting.
//!
//! Each page is rasterized, the fraction of non-grayscale pixels is
//! measured, and a two-tier threshold policy assigns the page to one of
//! three classes: black-and-white, color, or photographic. Pages are
//! processed in parallel and folded into a per-document summary whose
//! detail list is always in page order.
//!
//! ## Quick start
//!
//! ```rust
//! use pagetint::{
//!     ClassificationThresholds, DocumentAnalyzer, MockRasterBackend, PageClass, PixelBuffer,
//! };
//!
//! # fn main() -> Result<(), pagetint::AnalysisError> {
//! // An in-memory backend; real documents go through PdfiumBackend
//! // (enable the `pdfium` feature).
//! let backend = MockRasterBackend::new()
//!     .with_page(PixelBuffer::solid(8, 8, [40, 40, 40]))
//!     .with_page(PixelBuffer::solid(8, 8, [200, 30, 60]));
//!
//! let analyzer = DocumentAnalyzer::new(backend);
//! let summary = analyzer.analyze(b"%PDF-1.7 ...", ClassificationThresholds::default())?;
//!
//! assert_eq!(summary.total_pages, 2);
//! assert_eq!(summary.pages[0].class, PageClass::BlackAndWhite);
//! assert_eq!(summary.pages[1].class, PageClass::Photographic);
//! # Ok(())
//! # }
//! ```
//!
//! Real documents go through the PDFium-backed rasterizer behind the
//! `pdfium` feature; see [`raster::pdfium::PdfiumBackend`].

pub mod analysis;
pub mod error;
pub mod pricing;
pub mod raster;

pub use analysis::{
    classify_buffer, classify_page, classify_ratio, color_ratio, AnalysisSummary,
    AnalyzerOptions, ClassificationThresholds, DocumentAnalyzer, PageAnalysis, PageClass,
    DEFAULT_COLOR_THRESHOLD, DEFAULT_DOWNSAMPLE, DEFAULT_PHOTO_THRESHOLD,
};
pub use error::{AnalysisError, Result};
pub use pricing::{CostBreakdown, RateCard};
pub use raster::mock::{MockRasterBackend, MockRasterDocument};
pub use raster::{PixelBuffer, RasterBackend, RasterDocument, RasterError};

#[cfg(feature = "pdfium")]
pub use raster::pdfium::{PdfiumBackend, PdfiumRasterDocument};
