//! In-memory rasterizer for tests and examples.
//!
//! `MockRasterBackend` serves pre-built pixel buffers instead of decoding
//! real documents. Pages can be configured to fail on render or to take a
//! fixed amount of time, which lets tests exercise failure propagation and
//! out-of-order worker completion deterministically.

use super::{PixelBuffer, RasterBackend, RasterDocument, RasterError};
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockPage {
    Buffer {
        buffer: PixelBuffer,
        delay: Option<Duration>,
    },
    Fail(String),
}

/// A rasterizer backend backed by in-memory buffers.
#[derive(Debug, Clone, Default)]
pub struct MockRasterBackend {
    pages: Vec<MockPage>,
    open_failure: Option<String>,
}

impl MockRasterBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page that renders to the given buffer.
    pub fn with_page(mut self, buffer: PixelBuffer) -> Self {
        self.pages.push(MockPage::Buffer {
            buffer,
            delay: None,
        });
        self
    }

    /// Append a page that renders to the given buffer after sleeping for
    /// `delay`. Descending delays across pages force workers to complete
    /// out of page order.
    pub fn with_delayed_page(mut self, buffer: PixelBuffer, delay: Duration) -> Self {
        self.pages.push(MockPage::Buffer {
            buffer,
            delay: Some(delay),
        });
        self
    }

    /// Append a page whose render fails with the given reason.
    pub fn with_failing_page(mut self, reason: &str) -> Self {
        self.pages.push(MockPage::Fail(reason.to_string()));
        self
    }

    /// Make `open_document` fail with the given reason.
    pub fn with_open_failure(mut self, reason: &str) -> Self {
        self.open_failure = Some(reason.to_string());
        self
    }
}

impl RasterBackend for MockRasterBackend {
    type Document = MockRasterDocument;

    fn open_document(&self, _bytes: &[u8]) -> Result<MockRasterDocument, RasterError> {
        match &self.open_failure {
            Some(reason) => Err(RasterError::Open(reason.clone())),
            None => Ok(MockRasterDocument {
                pages: self.pages.clone(),
            }),
        }
    }
}

/// Document handle produced by [`MockRasterBackend`]. `Sync`, so it works
/// with both of the analyzer's collection strategies.
#[derive(Debug)]
pub struct MockRasterDocument {
    pages: Vec<MockPage>,
}

impl RasterDocument for MockRasterDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn render_page(&self, index: usize, _scale: f64) -> Result<PixelBuffer, RasterError> {
        match self.pages.get(index) {
            Some(MockPage::Buffer { buffer, delay }) => {
                if let Some(delay) = delay {
                    std::thread::sleep(*delay);
                }
                Ok(buffer.clone())
            }
            Some(MockPage::Fail(reason)) => Err(RasterError::Render(reason.clone())),
            None => Err(RasterError::Render(format!("page {index} out of bounds"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_round_trip() {
        let backend = MockRasterBackend::new()
            .with_page(PixelBuffer::solid(2, 2, [1, 2, 3]))
            .with_failing_page("boom");

        let doc = backend.open_document(b"ignored").unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.render_page(0, 1.0).unwrap().pixel_count(), 4);
        assert!(doc.render_page(1, 1.0).is_err());
        assert!(doc.render_page(2, 1.0).is_err());
    }

    #[test]
    fn test_mock_open_failure() {
        let backend = MockRasterBackend::new().with_open_failure("not a document");
        assert!(matches!(
            backend.open_document(b"x"),
            Err(RasterError::Open(_))
        ));
    }
}
