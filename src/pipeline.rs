//! Resize → encode → measure, recomputed whenever an input changes.
//!
//! [`recompute`] is a pure function from [`PipelineInput`] to an optional
//! [`PipelineOutput`]. Any failure becomes `None` ("no output available"),
//! so the caller can render a placeholder instead of crashing.
//!
//! Two drivers wrap it:
//!
//! - [`Session`] holds the current source/quality/target and recomputes
//!   synchronously from each setter. This is the single-threaded model.
//! - [`Recomputer`] runs the pipeline on one background worker. At most one
//!   computation is in flight, queued inputs are coalesced to the newest,
//!   and a result is only visible while its input is still the newest
//!   submitted one (last write wins).
//!
//! ```text
//! source ──resize_to_fit(target)──▶ resized ──encode_jpeg(quality)──▶ output ─┐
//!    └──────────encode_jpeg(FULL)────────────────────────────────▶ reference ─┴▶ metrics
//! ```

use crate::imaging::{
    BackendError, ImageBackend, Quality, RustBackend, TargetSize, encode_jpeg, resize_to_fit,
};
use crate::metrics::CompressionMetrics;
use crate::types::{EncodedImage, RasterImage};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

/// Everything the pipeline reads.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub source: RasterImage,
    pub quality: Quality,
    pub target: TargetSize,
}

impl PipelineInput {
    pub fn new(source: RasterImage) -> Self {
        Self {
            source,
            quality: Quality::default(),
            target: TargetSize::default(),
        }
    }
}

/// Everything the pipeline derives. Rebuilt from scratch on every change.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Source encoded at full quality; the denominator of the ratio.
    pub reference: EncodedImage,
    /// Source after fit-scaling (the source itself when it already fit).
    pub resized: RasterImage,
    /// `resized` encoded at the requested quality.
    pub output: EncodedImage,
    pub metrics: CompressionMetrics,
}

/// Run the pipeline, surfacing the failure cause.
pub fn try_recompute(
    backend: &impl ImageBackend,
    input: &PipelineInput,
) -> Result<PipelineOutput, BackendError> {
    let reference = encode_jpeg(backend, &input.source, Quality::FULL)?;
    let resized = resize_to_fit(backend, &input.source, input.target)?;
    let output = encode_jpeg(backend, &resized, input.quality)?;
    let metrics = CompressionMetrics::new(&reference, &output);

    tracing::debug!(
        source = ?input.source.dimensions(),
        resized = ?resized.dimensions(),
        quality = %input.quality,
        input_bytes = metrics.input_bytes,
        output_bytes = metrics.output_bytes,
        "pipeline recomputed"
    );

    Ok(PipelineOutput {
        reference,
        resized,
        output,
        metrics,
    })
}

/// Run the pipeline; any error means "no output available".
pub fn recompute(backend: &impl ImageBackend, input: &PipelineInput) -> Option<PipelineOutput> {
    try_recompute(backend, input).inspect_err(log_no_output).ok()
}

/// Decode `path` and run the pipeline on it, surfacing the failure cause.
///
/// An unreadable file fails the same way a failed resize or encode does.
pub fn try_recompute_file(
    backend: &RustBackend,
    path: &Path,
    quality: Quality,
    target: TargetSize,
) -> Result<PipelineOutput, BackendError> {
    let source = backend.decode_file(path)?;
    try_recompute(
        backend,
        &PipelineInput {
            source,
            quality,
            target,
        },
    )
}

/// Decode `path` and run the pipeline; any error means "no output available".
pub fn recompute_file(
    backend: &RustBackend,
    path: &Path,
    quality: Quality,
    target: TargetSize,
) -> Option<PipelineOutput> {
    try_recompute_file(backend, path, quality, target)
        .inspect_err(log_no_output)
        .ok()
}

/// The one place a failed recompute is logged.
fn log_no_output(e: &BackendError) {
    tracing::warn!("no output available: {e}");
}

// ============================================================================
// Synchronous driver
// ============================================================================

/// Current inputs plus the output derived from them.
///
/// Each setter replaces one input and recomputes immediately. Until a source
/// is set there is no output.
pub struct Session<B: ImageBackend> {
    backend: B,
    source: Option<RasterImage>,
    quality: Quality,
    target: TargetSize,
    output: Option<PipelineOutput>,
    last_error: Option<String>,
}

impl<B: ImageBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, Quality::default(), TargetSize::default())
    }

    pub fn with_settings(backend: B, quality: Quality, target: TargetSize) -> Self {
        Self {
            backend,
            source: None,
            quality,
            target,
            output: None,
            last_error: None,
        }
    }

    pub fn set_source(&mut self, source: RasterImage) {
        self.source = Some(source);
        self.refresh();
    }

    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
        self.refresh();
    }

    pub fn set_target(&mut self, target: TargetSize) {
        self.target = target;
        self.refresh();
    }

    pub fn source(&self) -> Option<&RasterImage> {
        self.source.as_ref()
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn target(&self) -> TargetSize {
        self.target
    }

    pub fn output(&self) -> Option<&PipelineOutput> {
        self.output.as_ref()
    }

    /// Why the latest recompute produced nothing, if it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn refresh(&mut self) {
        let Some(source) = &self.source else {
            return;
        };
        let input = PipelineInput {
            source: source.clone(),
            quality: self.quality,
            target: self.target,
        };
        match try_recompute(&self.backend, &input).inspect_err(log_no_output) {
            Ok(output) => {
                self.output = Some(output);
                self.last_error = None;
            }
            Err(e) => {
                self.output = None;
                self.last_error = Some(e.to_string());
            }
        }
    }
}

// ============================================================================
// Background driver
// ============================================================================

/// A finished computation tagged with the submission it answers.
#[derive(Debug, Clone)]
pub struct Completed {
    pub generation: u64,
    pub output: Option<PipelineOutput>,
}

struct Job {
    generation: u64,
    input: PipelineInput,
}

/// Drain everything queued behind `job` and keep the highest generation.
///
/// Concurrent `submit` calls can enqueue out of order, so arrival order
/// says nothing about which job is newest.
fn newest_queued(mut job: Job, rx: &mpsc::Receiver<Job>) -> Job {
    while let Ok(queued) = rx.try_recv() {
        if queued.generation > job.generation {
            job = queued;
        }
    }
    job
}

#[derive(Default)]
struct Shared {
    submitted: AtomicU64,
    published: Mutex<Option<Completed>>,
    changed: Condvar,
    /// Set once the worker thread has exited, including by panic.
    stopped: AtomicBool,
}

impl Shared {
    fn lock_published(&self) -> std::sync::MutexGuard<'_, Option<Completed>> {
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Marks the worker stopped when dropped, so waiters wake up even if the
/// worker unwinds out of a backend panic.
struct StopOnExit(Arc<Shared>);

impl Drop for StopOnExit {
    fn drop(&mut self) {
        self.0.stopped.store(true, Ordering::Release);
        // Notify under the lock so no waiter misses the flag
        let _published = self.0.lock_published();
        self.0.changed.notify_all();
    }
}

/// Single-worker recomputation with last-write-wins publication.
pub struct Recomputer {
    sender: Option<mpsc::Sender<Job>>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Recomputer {
    pub fn spawn<B>(backend: Arc<B>) -> Self
    where
        B: ImageBackend + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Job>();
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);

        let worker = std::thread::spawn(move || {
            let _stop = StopOnExit(Arc::clone(&worker_shared));
            while let Ok(job) = rx.recv() {
                let job = newest_queued(job, &rx);
                if job.generation < worker_shared.submitted.load(Ordering::Acquire) {
                    // A newer submission is already on its way
                    continue;
                }

                let output = recompute(&*backend, &job.input);

                let mut published = worker_shared.lock_published();
                let newer_than_published = published
                    .as_ref()
                    .is_none_or(|p| job.generation > p.generation);
                if newer_than_published {
                    *published = Some(Completed {
                        generation: job.generation,
                        output,
                    });
                    worker_shared.changed.notify_all();
                }
            }
        });

        Self {
            sender: Some(tx),
            shared,
            worker: Some(worker),
        }
    }

    /// Queue an input; returns its generation number.
    pub fn submit(&self, input: PipelineInput) -> u64 {
        let generation = self.shared.submitted.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(sender) = &self.sender {
            // Send only fails once the worker is gone, which happens after drop
            let _ = sender.send(Job { generation, input });
        }
        generation
    }

    /// Generation of the newest submission (0 before any).
    pub fn current_generation(&self) -> u64 {
        self.shared.submitted.load(Ordering::Acquire)
    }

    /// The published result, if it answers the newest submission.
    pub fn latest(&self) -> Option<Completed> {
        let current = self.current_generation();
        self.lock_published()
            .as_ref()
            .filter(|c| c.generation == current)
            .cloned()
    }

    /// Block until `generation` is answered or superseded.
    ///
    /// Returns `None` when a later submission overtook it (its result was
    /// never published), when `generation` was never submitted, or when the
    /// worker has stopped without answering it.
    pub fn wait_for(&self, generation: u64) -> Option<Completed> {
        if generation == 0 || generation > self.current_generation() {
            return None;
        }
        let mut published = self.lock_published();
        loop {
            if let Some(done) = published.as_ref().filter(|c| c.generation >= generation) {
                return (done.generation == generation).then(|| done.clone());
            }
            if self.shared.stopped.load(Ordering::Acquire) {
                return None;
            }
            published = self
                .shared
                .changed
                .wait(published)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    fn lock_published(&self) -> std::sync::MutexGuard<'_, Option<Completed>> {
        self.shared.lock_published()
    }
}

impl Drop for Recomputer {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
