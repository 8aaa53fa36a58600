//! Rasterization contract consumed by the analyzer.
//!
//! The analyzer never decodes page content itself. It drives a
//! [`RasterBackend`], which opens raw document bytes into a
//! [`RasterDocument`], which in turn renders individual pages into
//! [`PixelBuffer`]s. Real rendering engines plug in behind these traits
//! (see [`PdfiumBackend`](crate::raster::pdfium::PdfiumBackend) behind the
//! `pdfium` feature); tests use the in-memory [`mock`] backend.
//!
//! # Threading contract
//!
//! `render_page` is driven from one thread at a time unless the document
//! type is also `Sync`. A backend whose rendering engine is safe to call
//! concurrently opts in simply by being `Sync`; the analyzer's
//! concurrent-render path is only available for such documents. Documents
//! release their underlying resources on `Drop`, on every exit path.

pub mod mock;

#[cfg(feature = "pdfium")]
pub mod pdfium;

use thiserror::Error;

/// Errors produced by rasterization backends.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The document bytes could not be opened or decoded.
    #[error("could not open document: {0}")]
    Open(String),

    /// A single page could not be rendered.
    #[error("could not render page: {0}")]
    Render(String),

    /// Pixel data does not match the stated dimensions.
    #[error("pixel data length {actual} does not match {width}x{height} RGB dimensions")]
    BufferShape {
        width: u32,
        height: u32,
        actual: usize,
    },

    /// The rendering engine is not available in this environment.
    #[error("rasterizer unavailable: {0}")]
    Unavailable(String),
}

/// One rasterized page: row-major packed RGB, 3 bytes per pixel.
///
/// Buffers are immutable once produced and owned exclusively by the worker
/// that rasterized them; they are dropped right after classification, so
/// memory for large documents is bounded by the number of in-flight workers
/// rather than the page count.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap packed RGB data, validating that its length matches the
    /// dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(RasterError::BufferShape {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with a single RGB value.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 3);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels in the buffer.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Iterate over `[r, g, b]` triples in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }
}

/// Opens raw document bytes into a renderable document.
pub trait RasterBackend {
    type Document: RasterDocument;

    /// Open a document from raw bytes. The handle owns whatever resources
    /// the engine needs and releases them when dropped.
    fn open_document(&self, bytes: &[u8]) -> Result<Self::Document, RasterError>;
}

/// A document whose pages can be rendered to pixel buffers.
pub trait RasterDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Render one page (0-based index) at the given linear scale factor in
    /// (0, 1], where 1.0 is the page's natural render size.
    fn render_page(&self, index: usize, scale: f64) -> Result<PixelBuffer, RasterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_shape_validation() {
        assert!(PixelBuffer::new(2, 2, vec![0; 12]).is_ok());
        assert!(matches!(
            PixelBuffer::new(2, 2, vec![0; 11]),
            Err(RasterError::BufferShape { actual: 11, .. })
        ));
    }

    #[test]
    fn test_zero_area_buffer_is_constructible() {
        // Classification rejects zero-area buffers; construction does not.
        let buffer = PixelBuffer::new(0, 100, vec![]).unwrap();
        assert_eq!(buffer.pixel_count(), 0);
    }

    #[test]
    fn test_solid_buffer_pixels() {
        let buffer = PixelBuffer::solid(3, 2, [10, 20, 30]);
        assert_eq!(buffer.pixel_count(), 6);
        assert_eq!(buffer.pixels().count(), 6);
        assert!(buffer.pixels().all(|p| p == [10, 20, 30]));
    }
}
