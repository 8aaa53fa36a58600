//! Per-page and per-document analysis results.

use super::classify::{ClassificationThresholds, PageClass};

/// Classification result for a single page. Created once by the worker
/// that rasterized the page and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageAnalysis {
    /// 1-based page number, matching document order.
    pub page_number: usize,
    /// Assigned classification tier.
    pub class: PageClass,
    /// Percentage of colored pixels, rounded to two decimals.
    pub color_percentage: f64,
}

/// Aggregate result of analyzing one document.
///
/// The per-page list is ordered by ascending page number regardless of the
/// order workers completed in, and the per-class counts always sum to
/// `total_pages`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisSummary {
    pub total_pages: usize,
    pub bw_pages: usize,
    pub color_pages: usize,
    pub photo_pages: usize,
    pub pages: Vec<PageAnalysis>,
    /// The thresholds this run was configured with.
    pub thresholds: ClassificationThresholds,
}

impl AnalysisSummary {
    /// Summary for a document with no pages. An empty document is valid
    /// input, not an error.
    pub(crate) fn empty(thresholds: ClassificationThresholds) -> Self {
        Self::from_pages(Vec::new(), thresholds)
    }

    /// Tally per-class counts from an already page-ordered result list.
    pub(crate) fn from_pages(
        pages: Vec<PageAnalysis>,
        thresholds: ClassificationThresholds,
    ) -> Self {
        let mut bw_pages = 0;
        let mut color_pages = 0;
        let mut photo_pages = 0;
        for page in &pages {
            match page.class {
                PageClass::BlackAndWhite => bw_pages += 1,
                PageClass::Color => color_pages += 1,
                PageClass::Photographic => photo_pages += 1,
            }
        }
        Self {
            total_pages: pages.len(),
            bw_pages,
            color_pages,
            photo_pages,
            pages,
            thresholds,
        }
    }

    /// Count of pages assigned the given tier.
    pub fn count_for(&self, class: PageClass) -> usize {
        match class {
            PageClass::BlackAndWhite => self.bw_pages,
            PageClass::Color => self.color_pages,
            PageClass::Photographic => self.photo_pages,
        }
    }
}
