//! Page color analysis pipeline.
//!
//! The pipeline has three layers, leaves first:
//!
//! - [`classify`]: pure measurement (color ratio) and policy (tier
//!   assignment from two thresholds).
//! - [`worker`]: one page's worth of work — render, measure, assign,
//!   package.
//! - [`analyzer`]: orchestration across all pages of a document, with
//!   bounded parallelism and deterministic result ordering.

pub mod analyzer;
pub mod classify;
pub mod summary;
pub mod worker;

pub use analyzer::{AnalyzerOptions, DocumentAnalyzer, DEFAULT_DOWNSAMPLE};
pub use classify::{
    classify_ratio, color_ratio, ClassificationThresholds, PageClass, DEFAULT_COLOR_THRESHOLD,
    DEFAULT_PHOTO_THRESHOLD,
};
pub use summary::{AnalysisSummary, PageAnalysis};
pub use worker::{classify_buffer, classify_page};
