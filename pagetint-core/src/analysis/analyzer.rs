//! Document-level orchestration: fan page work out across a bounded worker
//! pool, collect every result, and fold them into a summary.
//!
//! One analysis call dispatches exactly one unit of work per page. Workers
//! share no mutable state; each owns its page's pixel buffer and produces
//! an independent result, so the only synchronization point is the
//! collection barrier. Results arrive in completion order and are re-sorted
//! by page number before the summary is built.
//!
//! Two collection strategies exist because rasterization engines differ in
//! what they allow:
//!
//! - [`DocumentAnalyzer::analyze`] works with every backend. The calling
//!   thread renders pages sequentially and feeds them through a bounded
//!   channel to classification workers, so engines that require serialized
//!   access to the document handle never see a concurrent call, and the
//!   number of buffers alive at once is capped by the pool size.
//! - [`DocumentAnalyzer::analyze_concurrent`] requires the document type to
//!   be `Sync` — the backend's contract that concurrent render calls are
//!   safe — and lets each worker render its own pages.
//!
//! On the first failure a cancellation flag stops outstanding workers at
//! their next page boundary; partial results are discarded and the failure
//! is returned. The contract is all-or-nothing per document.

use super::classify::ClassificationThresholds;
use super::summary::{AnalysisSummary, PageAnalysis};
use super::worker::{classify_buffer, classify_page};
use crate::error::AnalysisError;
use crate::raster::{PixelBuffer, RasterBackend, RasterDocument};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default linear downsample factor. Renders at a quarter of the natural
/// page size, i.e. roughly 1/16 of the full pixel count. Downsampling
/// averages away small colored regions, so this trades classification
/// fidelity for speed.
pub const DEFAULT_DOWNSAMPLE: f64 = 0.25;

/// Upper bound on the automatically-sized worker pool.
const MAX_DEFAULT_WORKERS: usize = 8;

/// Tuning knobs for one analyzer instance.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Linear scale applied when rendering each page, in (0, 1].
    pub downsample: f64,
    /// Worker pool size. `None` sizes the pool to available parallelism,
    /// capped at 8; the pool never exceeds the page count.
    pub max_workers: Option<usize>,
    /// Wall-clock budget for a whole analysis call.
    pub deadline: Option<Duration>,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            downsample: DEFAULT_DOWNSAMPLE,
            max_workers: None,
            deadline: None,
        }
    }
}

impl AnalyzerOptions {
    /// Set the render downsample factor.
    pub fn with_downsample(mut self, downsample: f64) -> Self {
        self.downsample = downsample;
        self
    }

    /// Set the worker pool size. Clamped to at least one worker.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers.max(1));
        self
    }

    /// Set the wall-clock budget for each analysis call.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        if !self.downsample.is_finite() || self.downsample <= 0.0 || self.downsample > 1.0 {
            return Err(AnalysisError::InvalidDownsample(self.downsample));
        }
        Ok(())
    }
}

/// Classifies every page of a document and aggregates the results.
///
/// Stateless across calls: each `analyze` invocation opens its own document
/// handle and releases it on every exit path.
pub struct DocumentAnalyzer<B: RasterBackend> {
    backend: B,
    options: AnalyzerOptions,
}

impl<B: RasterBackend> DocumentAnalyzer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            options: AnalyzerOptions::default(),
        }
    }

    pub fn with_options(backend: B, options: AnalyzerOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze a document, rendering pages from the calling thread and
    /// classifying them on a bounded worker pool.
    ///
    /// Validation failures (empty input, bad thresholds, bad options) are
    /// reported before the document is opened; a zero-page document yields
    /// an empty summary rather than an error.
    pub fn analyze(
        &self,
        bytes: &[u8],
        thresholds: ClassificationThresholds,
    ) -> Result<AnalysisSummary, AnalysisError> {
        let document = self.open_validated(bytes, &thresholds)?;
        let page_count = document.page_count();
        if page_count == 0 {
            return Ok(AnalysisSummary::empty(thresholds));
        }

        let deadline = self.options.deadline.map(|limit| Instant::now() + limit);
        let pages = self.collect_pipelined(&document, page_count, &thresholds, deadline)?;
        drop(document);

        finish(page_count, pages, thresholds)
    }

    fn open_validated(
        &self,
        bytes: &[u8],
        thresholds: &ClassificationThresholds,
    ) -> Result<B::Document, AnalysisError> {
        if bytes.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        thresholds.validate()?;
        self.options.validate()?;

        self.backend
            .open_document(bytes)
            .map_err(|e| AnalysisError::OpenDocument(e.to_string()))
    }

    fn worker_count(&self, page_count: usize) -> usize {
        self.options
            .max_workers
            .unwrap_or_else(|| num_cpus::get().min(MAX_DEFAULT_WORKERS))
            .max(1)
            .min(page_count)
    }

    /// Render on the calling thread, classify on the pool. The job channel
    /// is bounded by the pool size, which caps how many page buffers are
    /// alive at once.
    fn collect_pipelined(
        &self,
        document: &B::Document,
        page_count: usize,
        thresholds: &ClassificationThresholds,
        deadline: Option<Instant>,
    ) -> Result<Vec<PageAnalysis>, AnalysisError> {
        let workers = self.worker_count(page_count);
        let scale = self.options.downsample;
        debug!(page_count, workers, scale, "starting pipelined analysis");

        let failed = AtomicBool::new(false);
        let (job_tx, job_rx) = mpsc::sync_channel::<(usize, PixelBuffer)>(workers);
        let job_rx = Mutex::new(job_rx);
        let (result_tx, result_rx) = mpsc::channel::<Result<PageAnalysis, AnalysisError>>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let result_tx = result_tx.clone();
                let job_rx = &job_rx;
                let failed = &failed;
                scope.spawn(move || loop {
                    let job = {
                        let Ok(receiver) = job_rx.lock() else { break };
                        receiver.recv()
                    };
                    let Ok((index, buffer)) = job else { break };
                    if failed.load(Ordering::SeqCst) {
                        // Keep draining so the renderer never blocks on a
                        // full channel after cancellation.
                        continue;
                    }
                    let outcome = classify_buffer(index, &buffer, thresholds);
                    if outcome.is_err() {
                        failed.store(true, Ordering::SeqCst);
                    }
                    if result_tx.send(outcome).is_err() {
                        break;
                    }
                });
            }
            drop(result_tx);

            let mut failure = None;
            for index in 0..page_count {
                if failed.load(Ordering::SeqCst) {
                    break;
                }
                if deadline_expired(deadline) {
                    failed.store(true, Ordering::SeqCst);
                    failure = Some(AnalysisError::DeadlineExceeded);
                    break;
                }
                match document.render_page(index, scale) {
                    Ok(buffer) => {
                        if job_tx.send((index, buffer)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        failed.store(true, Ordering::SeqCst);
                        failure = Some(AnalysisError::PageRender {
                            page: index + 1,
                            reason: e.to_string(),
                        });
                        break;
                    }
                }
            }
            drop(job_tx);

            let mut pages = Vec::with_capacity(page_count);
            for outcome in result_rx {
                match outcome {
                    Ok(page) => pages.push(page),
                    Err(error) => {
                        if failure.is_none() {
                            failure = Some(error);
                        }
                    }
                }
            }

            match failure {
                Some(error) => Err(error),
                None => Ok(pages),
            }
        })
    }
}

impl<B: RasterBackend> DocumentAnalyzer<B>
where
    B::Document: Sync,
{
    /// Analyze a document with rendering issued from the workers
    /// themselves.
    ///
    /// Only available when the backend's document type is `Sync`, i.e. the
    /// rasterization engine guarantees that concurrent render calls on one
    /// document are safe. Engines without that guarantee go through
    /// [`DocumentAnalyzer::analyze`] instead.
    pub fn analyze_concurrent(
        &self,
        bytes: &[u8],
        thresholds: ClassificationThresholds,
    ) -> Result<AnalysisSummary, AnalysisError> {
        let document = self.open_validated(bytes, &thresholds)?;
        let page_count = document.page_count();
        if page_count == 0 {
            return Ok(AnalysisSummary::empty(thresholds));
        }

        let deadline = self.options.deadline.map(|limit| Instant::now() + limit);
        let pages = self.collect_concurrent(&document, page_count, &thresholds, deadline)?;
        drop(document);

        finish(page_count, pages, thresholds)
    }

    fn collect_concurrent(
        &self,
        document: &B::Document,
        page_count: usize,
        thresholds: &ClassificationThresholds,
        deadline: Option<Instant>,
    ) -> Result<Vec<PageAnalysis>, AnalysisError> {
        let workers = self.worker_count(page_count);
        let scale = self.options.downsample;
        debug!(page_count, workers, scale, "starting concurrent analysis");

        let next_page = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for _ in 0..workers {
                handles.push(scope.spawn(|| {
                    let mut local = Vec::new();
                    loop {
                        if failed.load(Ordering::SeqCst) {
                            break;
                        }
                        if deadline_expired(deadline) {
                            failed.store(true, Ordering::SeqCst);
                            return Err(AnalysisError::DeadlineExceeded);
                        }
                        let index = next_page.fetch_add(1, Ordering::SeqCst);
                        if index >= page_count {
                            break;
                        }
                        match classify_page(document, index, scale, thresholds) {
                            Ok(page) => local.push(page),
                            Err(error) => {
                                failed.store(true, Ordering::SeqCst);
                                return Err(error);
                            }
                        }
                    }
                    Ok(local)
                }));
            }

            let mut pages = Vec::with_capacity(page_count);
            let mut failure = None;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(local)) => pages.extend(local),
                    Ok(Err(error)) => {
                        if failure.is_none() {
                            failure = Some(error);
                        }
                    }
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }

            match failure {
                Some(error) => Err(error),
                None => Ok(pages),
            }
        })
    }
}

fn deadline_expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|at| Instant::now() >= at)
}

/// Re-order collected results by page number, check the one-result-per-page
/// invariant, and build the summary.
fn finish(
    page_count: usize,
    mut pages: Vec<PageAnalysis>,
    thresholds: ClassificationThresholds,
) -> Result<AnalysisSummary, AnalysisError> {
    pages.sort_by_key(|page| page.page_number);
    if pages.len() != page_count {
        return Err(AnalysisError::ResultCountMismatch {
            expected: page_count,
            actual: pages.len(),
        });
    }
    let summary = AnalysisSummary::from_pages(pages, thresholds);
    debug!(
        total = summary.total_pages,
        bw = summary.bw_pages,
        color = summary.color_pages,
        photo = summary.photo_pages,
        "analysis complete"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod analyzer_tests;
