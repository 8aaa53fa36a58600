//! Price quoting from per-class page counts.
//!
//! Downstream of classification: a rate card assigns a per-page price to
//! each tier and a summary's counts multiply through to a quote.

use crate::analysis::AnalysisSummary;

/// Per-page rates for each classification tier. Currency-agnostic; the
/// defaults mirror a per-page print shop price list.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateCard {
    pub bw: f64,
    pub color: f64,
    pub photo: f64,
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            bw: 500.0,
            color: 1500.0,
            photo: 1500.0,
        }
    }
}

impl RateCard {
    pub fn new(bw: f64, color: f64, photo: f64) -> Self {
        Self { bw, color, photo }
    }

    /// Price a document from its analysis summary.
    pub fn quote(&self, summary: &AnalysisSummary) -> CostBreakdown {
        let bw_cost = self.bw * summary.bw_pages as f64;
        let color_cost = self.color * summary.color_pages as f64;
        let photo_cost = self.photo * summary.photo_pages as f64;
        CostBreakdown {
            bw_cost,
            color_cost,
            photo_cost,
            total: bw_cost + color_cost + photo_cost,
        }
    }
}

/// Per-tier costs and their total for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    pub bw_cost: f64,
    pub color_cost: f64,
    pub photo_cost: f64,
    pub total: f64,
}
