use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag. Clones share state, so a caller can keep
/// one handle and cancel a run that holds another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) { self.cancelled.store(true, Ordering::SeqCst); }

    pub fn is_cancelled(&self) -> bool { self.cancelled.load(Ordering::SeqCst) }
}

/// Emitted after each scanned block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub rows_done: usize,
    pub rows_total: usize,
    pub edges_found: usize,
}

pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, progress: ScanProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(ScanProgress) + Send + Sync,
{
    fn on_progress(&self, progress: ScanProgress) {
        self(progress)
    }
}

/// Per-run cancellation and progress hooks. The default never cancels and
/// reports nowhere.
#[derive(Default)]
pub struct RunControl<'a> {
    cancel: CancellationToken,
    progress: Option<&'a dyn ProgressSink>,
}

impl<'a> RunControl<'a> {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel, progress: None }
    }

    pub fn with_progress(mut self, sink: &'a dyn ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn report(&self, progress: ScanProgress) {
        if let Some(sink) = self.progress {
            sink.on_progress(progress);
        }
    }
}
