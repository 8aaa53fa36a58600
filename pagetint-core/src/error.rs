use thiserror::Error;

/// Errors surfaced by document analysis.
///
/// Every failure propagates synchronously out of the `analyze` call that
/// caused it; nothing is swallowed or logged-and-ignored inside the library.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The document byte buffer was empty. Rejected before any work starts.
    #[error("document input is empty")]
    EmptyInput,

    /// A threshold was non-finite or outside [0, 100].
    #[error("invalid {name} threshold {value}: must be a finite percentage in [0, 100]")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// The photographic threshold was below the color threshold, which would
    /// make the photographic tier shadow the color tier.
    #[error("photo threshold {photo} must not be below color threshold {color}")]
    ThresholdOrdering { color: f64, photo: f64 },

    /// The downsample factor was non-finite or outside (0, 1].
    #[error("invalid downsample factor {0}: must be in (0, 1]")]
    InvalidDownsample(f64),

    /// The document could not be opened or decoded at all. Distinct from
    /// [`AnalysisError::PageRender`] so callers can tell a bad file from a
    /// bad page.
    #[error("could not open document: {0}")]
    OpenDocument(String),

    /// One page's raster could not be produced. Fails the whole analysis;
    /// a summary with a missing page would be silently wrong.
    #[error("failed to render page {page}: {reason}")]
    PageRender { page: usize, reason: String },

    /// A rendered page had zero area. Never reported as a silent 0%.
    #[error("zero-area page raster ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },

    /// The configured wall-clock deadline elapsed before every page was
    /// classified.
    #[error("analysis deadline exceeded")]
    DeadlineExceeded,

    /// The collected results do not cover every page. Guards the
    /// one-result-per-page invariant; reaching this is a bug.
    #[error("collected {actual} page results, expected {expected}")]
    ResultCountMismatch { expected: usize, actual: usize },
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
