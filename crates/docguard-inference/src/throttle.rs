//! Completion-call throttle: a serializing FIFO queue with a minimum
//! inter-dispatch delay.
//!
//! The completion service enforces a rate limit; violating it must be
//! structurally impossible for any caller, not merely discouraged. Every
//! completion call in the process goes through one of these: submissions
//! from any number of concurrent callers are appended to an internal FIFO,
//! and a single worker task drains it, enforcing a fixed minimum delay
//! between the start of one dispatched call and the next.
//!
//! The throttle is an owned object, instantiated once and injected into its
//! callers; multiple independent throttles (e.g. one per external service)
//! can coexist in the same process. When the queue is empty the worker is
//! parked on `recv()`; there is no polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info};

use docguard_core::defaults::{THROTTLE_MIN_INTERVAL_MS, THROTTLE_QUEUE_CAPACITY};
use docguard_core::{CompletionBackend, CompletionOptions, Error, Result};

/// Configuration for a completion throttle.
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Minimum delay between the start of consecutive dispatched calls.
    pub min_interval: Duration,
    /// Bounded submission queue capacity.
    pub queue_capacity: usize,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(THROTTLE_MIN_INTERVAL_MS),
            queue_capacity: THROTTLE_QUEUE_CAPACITY,
        }
    }
}

impl ThrottleConfig {
    /// Set the minimum inter-dispatch interval.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }
}

/// One queued completion call awaiting dispatch.
struct QueuedCall {
    system: String,
    prompt: String,
    opts: CompletionOptions,
    reply: oneshot::Sender<Result<String>>,
}

/// Serializing throttle for completion-service calls.
///
/// Cloning the handle shares the same queue and worker. Dropping every
/// handle closes the queue; calls already accepted are still dispatched
/// before the worker exits.
#[derive(Clone)]
pub struct CompletionThrottle {
    tx: mpsc::Sender<QueuedCall>,
}

impl CompletionThrottle {
    /// Spawn a throttle worker over the given backend.
    pub fn spawn(backend: Arc<dyn CompletionBackend>, config: ThrottleConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity);

        info!(
            min_interval_ms = config.min_interval.as_millis() as u64,
            queue_capacity = config.queue_capacity,
            model = backend.model_name(),
            "completion throttle started"
        );

        tokio::spawn(run_worker(backend, rx, config.min_interval));

        Self { tx }
    }

    /// Spawn with default configuration.
    pub fn spawn_default(backend: Arc<dyn CompletionBackend>) -> Self {
        Self::spawn(backend, ThrottleConfig::default())
    }

    /// Submit a completion call and await its result.
    ///
    /// The caller receives the task's own outcome: the throttle never
    /// rewrites results, and one task's failure does not block subsequent
    /// tasks. The only throttle-originated errors are queue shutdown.
    pub async fn submit(
        &self,
        system: &str,
        prompt: &str,
        opts: CompletionOptions,
    ) -> Result<String> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(QueuedCall {
                system: system.to_string(),
                prompt: prompt.to_string(),
                opts,
                reply: reply_tx,
            })
            .await
            .map_err(|_| Error::Internal("completion throttle worker has stopped".to_string()))?;

        reply_rx
            .await
            .map_err(|_| Error::Internal("completion throttle dropped a reply".to_string()))?
    }
}

/// Worker loop: drain the FIFO, spacing dispatch starts by `min_interval`.
async fn run_worker(
    backend: Arc<dyn CompletionBackend>,
    mut rx: mpsc::Receiver<QueuedCall>,
    min_interval: Duration,
) {
    // Earliest time the next call may start. Initialized in the past so the
    // first submission dispatches immediately.
    let mut next_dispatch = Instant::now();

    while let Some(call) = rx.recv().await {
        let now = Instant::now();
        if now < next_dispatch {
            tokio::time::sleep_until(next_dispatch).await;
        }
        // Spacing is measured from dispatch start, not completion.
        next_dispatch = Instant::now() + min_interval;

        debug!(
            prompt_len = call.prompt.len(),
            "dispatching throttled completion call"
        );
        let result = backend.complete(&call.system, &call.prompt, &call.opts).await;

        // A caller that gave up on the reply is not an error for the queue.
        let _ = call.reply.send(result);
    }

    debug!("completion throttle worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCompletionBackend;

    fn fast_config() -> ThrottleConfig {
        ThrottleConfig::default().with_min_interval(Duration::from_millis(30))
    }

    #[tokio::test]
    async fn submit_returns_backend_result() {
        let backend = Arc::new(MockCompletionBackend::new().with_response("hello"));
        let throttle = CompletionThrottle::spawn(backend, fast_config());

        let out = throttle
            .submit("sys", "prompt", CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn dispatches_in_fifo_order() {
        let backend = Arc::new(MockCompletionBackend::new().with_response("ok"));
        let throttle = CompletionThrottle::spawn(backend.clone(), fast_config());

        let (a, b, c) = tokio::join!(
            throttle.submit("sys", "first", CompletionOptions::default()),
            throttle.submit("sys", "second", CompletionOptions::default()),
            throttle.submit("sys", "third", CompletionOptions::default()),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let prompts: Vec<String> = backend.calls().into_iter().map(|c| c.prompt).collect();
        assert_eq!(prompts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn enforces_minimum_spacing_between_dispatch_starts() {
        let backend = Arc::new(MockCompletionBackend::new().with_response("ok"));
        let throttle = CompletionThrottle::spawn(backend.clone(), fast_config());

        let (a, b, c) = tokio::join!(
            throttle.submit("sys", "one", CompletionOptions::default()),
            throttle.submit("sys", "two", CompletionOptions::default()),
            throttle.submit("sys", "three", CompletionOptions::default()),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        for pair in calls.windows(2) {
            let gap = pair[1].at.duration_since(pair[0].at);
            // Allow a small scheduling tolerance below the 30ms interval.
            assert!(
                gap >= Duration::from_millis(25),
                "dispatch gap too small: {:?}",
                gap
            );
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_block_subsequent_tasks() {
        let backend = Arc::new(
            MockCompletionBackend::new()
                .with_response("ok")
                .with_failure_for("boom"),
        );
        let throttle = CompletionThrottle::spawn(backend.clone(), fast_config());

        let (bad, good) = tokio::join!(
            throttle.submit("sys", "boom", CompletionOptions::default()),
            throttle.submit("sys", "fine", CompletionOptions::default()),
        );

        assert!(matches!(bad, Err(Error::Completion(_))));
        assert_eq!(good.unwrap(), "ok");
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn idle_queue_restarts_on_new_submission() {
        let backend = Arc::new(MockCompletionBackend::new().with_response("ok"));
        let throttle = CompletionThrottle::spawn(backend.clone(), fast_config());

        throttle
            .submit("sys", "first", CompletionOptions::default())
            .await
            .unwrap();

        // Let the worker go idle, then submit again.
        tokio::time::sleep(Duration::from_millis(80)).await;
        throttle
            .submit("sys", "second", CompletionOptions::default())
            .await
            .unwrap();

        assert_eq!(backend.calls().len(), 2);
    }
}
