//! Background thread that computes previews off the render thread.
//!
//! Requests carry the selection generation they were made under, and results
//! come back tagged with it.

use super::cache::Preview;
use super::pipeline::ImagePreviewPipeline;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// One preview to compute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    /// Selection generation at request time.
    pub generation: u64,
    /// Index of the post the preview belongs to.
    pub post: usize,
    /// Resolved image URL.
    pub url: String,
    /// Target width in columns.
    pub width: usize,
    /// Maximum preview rows.
    pub max_lines: usize,
}

/// A finished preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewReady {
    /// The request this answers.
    pub request: PreviewRequest,
    /// Computed (or cached) result.
    pub preview: Preview,
}

/// Handle to the preview worker thread.
pub struct PreviewWorker {
    requests: Option<Sender<PreviewRequest>>,
    results: Receiver<PreviewReady>,
    stopped: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PreviewWorker {
    /// Start the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to create the thread.
    pub fn spawn(pipeline: Arc<ImagePreviewPipeline>) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<PreviewRequest>();
        let (result_tx, result_rx) = mpsc::channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stopped);

        let handle = thread::Builder::new()
            .name("preview-worker".to_string())
            .spawn(move || {
                for request in request_rx {
                    if stop_flag.load(Ordering::Relaxed) {
                        break;
                    }
                    trace!(url = %request.url, generation = request.generation, "Preview job");
                    let preview = pipeline.preview(&request.url, request.width, request.max_lines);
                    if result_tx.send(PreviewReady { request, preview }).is_err() {
                        break;
                    }
                }
                debug!("Preview worker stopped");
            })?;

        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            stopped,
            handle: Some(handle),
        })
    }

    /// Queue a request. Returns `false` if the worker has stopped.
    pub fn request(&self, request: PreviewRequest) -> bool {
        self.requests
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok())
    }

    /// Take one finished result, if any, without blocking.
    pub fn try_recv(&self) -> Option<PreviewReady> {
        match self.results.try_recv() {
            Ok(ready) => Some(ready),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// Queued requests are dropped. Only the job already running is waited
    /// for; its download and renderer are bounded by their timeouts, and its
    /// temporary file is removed before the thread exits.
    pub fn shutdown(self) {
        let Self {
            requests,
            results,
            stopped,
            handle,
        } = self;
        stopped.store(true, Ordering::Relaxed);
        drop(requests);
        drop(results);
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("Preview worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::error::PreviewError;
    use crate::preview::backend::{BackendChoice, BackendKind, RenderMode, Renderer};
    use crate::preview::fetch::ByteFetcher;
    use crate::preview::pipeline::PreviewSettings;
    use std::path::Path;
    use std::time::{Duration, Instant};

    struct FixedFetcher;

    impl ByteFetcher for FixedFetcher {
        fn fetch(&self, _url: &str, _max_bytes: usize) -> Result<Vec<u8>, PreviewError> {
            Ok(vec![1, 2, 3])
        }
    }

    struct EchoRenderer {
        delay: Duration,
    }

    impl Renderer for EchoRenderer {
        fn available(&self, _kind: BackendKind) -> bool {
            true
        }

        fn render(
            &self,
            _kind: BackendKind,
            _path: &Path,
            width: usize,
            _height: usize,
            _mode: RenderMode,
        ) -> Result<String, PreviewError> {
            thread::sleep(self.delay);
            Ok("x".repeat(width))
        }
    }

    fn worker() -> PreviewWorker {
        worker_with_delay(Duration::ZERO)
    }

    fn worker_with_delay(delay: Duration) -> PreviewWorker {
        let pipeline = ImagePreviewPipeline::new(
            Box::new(FixedFetcher),
            Box::new(EchoRenderer { delay }),
            BackendChoice::Auto,
            PreviewSettings::default(),
        );
        PreviewWorker::spawn(Arc::new(pipeline)).unwrap()
    }

    fn wait_for(worker: &PreviewWorker) -> PreviewReady {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(ready) = worker.try_recv() {
                return ready;
            }
            assert!(Instant::now() < deadline, "no preview result within 5s");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn request(generation: u64, width: usize) -> PreviewRequest {
        PreviewRequest {
            generation,
            post: 0,
            url: "https://x.test/a.png".to_string(),
            width,
            max_lines: 4,
        }
    }

    #[test]
    fn results_carry_their_request() {
        let worker = worker();
        assert!(worker.request(request(3, 5)));

        let ready = wait_for(&worker);
        assert_eq!(ready.request.generation, 3);
        assert_eq!(ready.preview.lines()[0].as_str(), "xxxxx");
        worker.shutdown();
    }

    #[test]
    fn results_arrive_in_request_order() {
        let worker = worker();
        worker.request(request(1, 2));
        worker.request(request(2, 3));

        let generations: Vec<u64> = (0..2)
            .map(|_| wait_for(&worker).request.generation)
            .collect();
        assert_eq!(generations, vec![1, 2]);
        worker.shutdown();
    }

    #[test]
    fn try_recv_is_empty_without_requests() {
        let worker = worker();
        assert_eq!(worker.try_recv(), None);
        worker.shutdown();
    }

    #[test]
    fn shutdown_drops_queued_requests() {
        let worker = worker_with_delay(Duration::from_millis(200));
        // Distinct widths so nothing is served from the cache.
        for width in 1..=10 {
            worker.request(request(0, width));
        }

        let started = Instant::now();
        worker.shutdown();

        // At most the running job finishes; the other nine never start.
        assert!(started.elapsed() < Duration::from_millis(1500));
    }
}
