//! PDFium-backed rasterizer.
//!
//! Adapts the `pdfium-render` crate to the [`RasterBackend`] contract.
//! PDFium's library initialization is not thread-safe, so the binding is
//! created once per process and never torn down. Rendering through a given
//! document must stay on one thread at a time; the document type is
//! deliberately not `Sync`, which routes the analyzer onto its pipelined
//! collection path.

use super::{PixelBuffer, RasterBackend, RasterDocument, RasterError};
use pdfium_render::prelude::*;
use std::sync::OnceLock;

static PDFIUM: OnceLock<Option<Pdfium>> = OnceLock::new();

/// Bind PDFium once for the whole process, preferring a library shipped
/// next to the executable over a system-wide install.
fn shared_pdfium() -> Result<&'static Pdfium, RasterError> {
    PDFIUM
        .get_or_init(|| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map(Pdfium::new)
                .ok()
        })
        .as_ref()
        .ok_or_else(|| {
            RasterError::Unavailable("no PDFium library could be bound".to_string())
        })
}

/// Rasterizer backend over PDFium.
///
/// # Examples
///
/// ```rust,no_run
/// use pagetint::{ClassificationThresholds, DocumentAnalyzer, PdfiumBackend};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("scan.pdf")?;
/// let analyzer = DocumentAnalyzer::new(PdfiumBackend::new());
/// let summary = analyzer.analyze(&bytes, ClassificationThresholds::default())?;
/// println!("{} of {} pages in color", summary.color_pages, summary.total_pages);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumBackend;

impl PdfiumBackend {
    pub fn new() -> Self {
        Self
    }
}

impl RasterBackend for PdfiumBackend {
    type Document = PdfiumRasterDocument;

    fn open_document(&self, bytes: &[u8]) -> Result<PdfiumRasterDocument, RasterError> {
        let pdfium = shared_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_vec(bytes.to_vec(), None)
            .map_err(|e| RasterError::Open(e.to_string()))?;
        Ok(PdfiumRasterDocument { document })
    }
}

/// Document handle over a loaded PDFium document. Dropping it releases the
/// underlying PDFium document object.
pub struct PdfiumRasterDocument {
    document: PdfDocument<'static>,
}

impl RasterDocument for PdfiumRasterDocument {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f64) -> Result<PixelBuffer, RasterError> {
        let index = u16::try_from(index)
            .map_err(|_| RasterError::Render(format!("page index {index} out of range")))?;
        let page = self
            .document
            .pages()
            .get(index)
            .map_err(|e| RasterError::Render(e.to_string()))?;

        // Scale against the page's natural width; PDFium preserves the
        // aspect ratio from the target width alone.
        let target_width = ((f64::from(page.width().value) * scale).round() as i32).max(1);
        let config = PdfRenderConfig::new().set_target_width(target_width);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| RasterError::Render(e.to_string()))?;

        let image = bitmap.as_image().into_rgb8();
        let (width, height) = image.dimensions();
        PixelBuffer::new(width, height, image.into_raw())
    }
}
