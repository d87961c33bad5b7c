use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::SummaryGenerator;
use crate::models::{SummaryRequest, SummaryStatus, SUMMARY_FAILED_MESSAGE};

/// Drives the single summary dialog.
///
/// Each request gets a token. A newer request or closing the dialog bumps
/// the token and cancels the previous generator call; a completion carrying
/// an outdated token is dropped.
pub struct SummaryRequester<G> {
    generator: Arc<G>,
    inner: Arc<Mutex<DialogState>>,
}

#[derive(Default)]
struct DialogState {
    current: Option<SummaryRequest>,
    token: u64,
    cancel: Option<CancellationToken>,
}

/// Handle to one spawned summary request.
#[derive(Debug)]
pub struct SummaryTicket {
    token: u64,
    handle: JoinHandle<()>,
}

impl SummaryTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Wait until the request has settled, been cancelled, or been discarded.
    pub async fn settled(self) {
        let _ = self.handle.await;
    }
}

impl<G> SummaryRequester<G>
where
    G: SummaryGenerator + 'static,
{
    pub fn new(generator: G) -> Self {
        Self::with_shared(Arc::new(generator))
    }

    pub fn with_shared(generator: Arc<G>) -> Self {
        Self {
            generator,
            inner: Arc::new(Mutex::new(DialogState::default())),
        }
    }

    /// The dialog as it stands, `None` when closed.
    pub fn dialog(&self) -> Option<SummaryRequest> {
        self.lock().current.clone()
    }

    /// Open the dialog in the pending state and start generating.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request_summary(&self, content: impl Into<String>) -> SummaryTicket {
        let content = content.into();
        let cancel = CancellationToken::new();

        let token = {
            let mut state = self.lock();
            if let Some(previous) = state.cancel.replace(cancel.clone()) {
                previous.cancel();
            }
            state.token += 1;
            state.current = Some(SummaryRequest {
                source_content: content.clone(),
                status: SummaryStatus::Pending,
            });
            state.token
        };
        tracing::debug!(token, "Summary requested");

        let generator = Arc::clone(&self.generator);
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(token, "Summary request cancelled");
                    return;
                }
                result = generator.summarize(&content) => result,
            };

            let mut state = inner.lock().expect("summary dialog lock poisoned");
            if state.token != token {
                tracing::debug!(token, latest = state.token, "Discarding stale summary");
                return;
            }

            let status = match result {
                Ok(summary) => SummaryStatus::Succeeded { summary },
                Err(e) => {
                    tracing::warn!(token, error = %e, "Summary generation failed");
                    SummaryStatus::Failed {
                        message: SUMMARY_FAILED_MESSAGE.to_string(),
                    }
                }
            };
            if let Some(current) = state.current.as_mut() {
                current.status = status;
            }
            state.cancel = None;
        });

        SummaryTicket { token, handle }
    }

    /// Reset to idle. Any in-flight request is cancelled and its result ignored.
    pub fn close_dialog(&self) {
        let mut state = self.lock();
        if let Some(cancel) = state.cancel.take() {
            cancel.cancel();
        }
        state.token += 1;
        state.current = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DialogState> {
        self.inner.lock().expect("summary dialog lock poisoned")
    }
}

impl<G> Drop for SummaryRequester<G> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.inner.lock() {
            if let Some(cancel) = state.cancel.take() {
                cancel.cancel();
            }
        }
    }
}
