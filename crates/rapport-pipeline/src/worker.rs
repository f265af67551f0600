//! Async facade that runs the pipeline off the caller's thread
//!
//! Layout is CPU-bound, so every run goes to tokio's blocking pool. Callers
//! either await a result directly, hold a [`PendingLayout`] handle, or feed
//! requests through a channel and receive each answer on a oneshot.

use crate::{GraphPipeline, PipelineConfig, PipelineError, PipelineMetrics, PipelineOutput};
use rapport_domain::GraphInput;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Reply half of a queued layout request
pub type LayoutReply = oneshot::Sender<Result<PipelineOutput, PipelineError>>;

/// One queued layout request
#[derive(Debug)]
pub struct LayoutRequest {
    /// Input to build and lay out
    pub input: GraphInput,

    /// Where the result is sent
    pub reply: LayoutReply,
}

impl LayoutRequest {
    /// Create a request and the receiver its answer will arrive on
    pub fn new(
        input: GraphInput,
    ) -> (Self, oneshot::Receiver<Result<PipelineOutput, PipelineError>>) {
        let (reply, rx) = oneshot::channel();
        (Self { input, reply }, rx)
    }
}

/// Handle to a layout running in the background
///
/// Dropping the handle detaches the run and its result is discarded.
#[derive(Debug)]
pub struct PendingLayout {
    handle: JoinHandle<Result<PipelineOutput, PipelineError>>,
}

impl PendingLayout {
    /// Wait for the result
    pub async fn wait(self) -> Result<PipelineOutput, PipelineError> {
        self.handle
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?
    }

    /// Discard the result
    ///
    /// A run already on the blocking pool finishes its iterations; only the
    /// result is dropped.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Whether the run has finished
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Background worker that runs the pipeline on tokio's blocking pool
///
/// # Examples
///
/// ```no_run
/// use rapport_domain::GraphInput;
/// use rapport_pipeline::{PipelineConfig, PipelineWorker};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let worker = PipelineWorker::new(PipelineConfig::default());
///     let output = worker.compute(GraphInput::default()).await?;
///     println!("{} nodes", output.summary.node_count);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PipelineWorker {
    config: PipelineConfig,
    metrics: Arc<Mutex<PipelineMetrics>>,
}

impl PipelineWorker {
    /// Create a new worker with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(Mutex::new(PipelineMetrics::new())),
        }
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::new(PipelineConfig::default())
    }

    /// Build and lay out on the blocking pool, then return the result
    pub async fn compute(&self, input: GraphInput) -> Result<PipelineOutput, PipelineError> {
        self.spawn(input).wait().await
    }

    /// Start a run and return a handle to it
    pub fn spawn(&self, input: GraphInput) -> PendingLayout {
        let config = self.config.clone();
        let metrics = Arc::clone(&self.metrics);

        let handle = tokio::task::spawn_blocking(move || -> Result<PipelineOutput, PipelineError> {
            let mut pipeline = GraphPipeline::new(config);
            let output = pipeline.run(&input)?;

            let mut shared = metrics
                .lock()
                .map_err(|e| PipelineError::Worker(format!("metrics lock poisoned: {}", e)))?;
            shared.merge(pipeline.metrics());
            Ok(output)
        });

        PendingLayout { handle }
    }

    /// Answer requests until every sender is dropped
    ///
    /// Returns the number of requests processed.
    pub async fn serve(&self, mut requests: mpsc::Receiver<LayoutRequest>) -> usize {
        tracing::info!("Layout worker started");
        let mut served = 0;

        while let Some(request) = requests.recv().await {
            let result = self.compute(request.input).await;
            if let Err(e) = &result {
                tracing::error!("Layout request failed: {}", e);
            }
            if request.reply.send(result).is_err() {
                tracing::debug!("Requester went away before the layout finished");
            }
            served += 1;
        }

        tracing::info!("Layout worker stopped after {} requests", served);
        served
    }

    /// Snapshot of metrics across all runs of this worker
    pub fn metrics(&self) -> PipelineMetrics {
        match self.metrics.lock() {
            Ok(metrics) => metrics.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Reset the metrics counters
    pub fn reset_metrics(&self) {
        match self.metrics.lock() {
            Ok(mut metrics) => metrics.reset(),
            Err(poisoned) => poisoned.into_inner().reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_domain::{Person, PersonId, Referral};

    fn pair_input() -> GraphInput {
        let mut input = GraphInput::new(vec![
            Person::new(PersonId::from_value(1), "Ann"),
            Person::new(PersonId::from_value(2), "Ben"),
        ]);
        input.referrals.push(Referral {
            referrer: PersonId::from_value(1),
            referred: PersonId::from_value(2),
        });
        input
    }

    #[tokio::test]
    async fn test_worker_creation() {
        let worker = PipelineWorker::default_config();
        assert_eq!(worker.metrics().runs, 0);
    }

    #[tokio::test]
    async fn test_compute_matches_synchronous_run() {
        let worker = PipelineWorker::default_config();
        let async_output = worker.compute(pair_input()).await.unwrap();

        let mut pipeline = GraphPipeline::default_config();
        let sync_output = pipeline.run(&pair_input()).unwrap();

        assert_eq!(async_output, sync_output);
        assert_eq!(worker.metrics().runs, 1);
    }

    #[tokio::test]
    async fn test_spawn_and_wait() {
        let worker = PipelineWorker::default_config();
        let pending = worker.spawn(pair_input());
        let output = pending.wait().await.unwrap();
        assert_eq!(output.summary.edge_count, 1);
    }

    #[tokio::test]
    async fn test_pending_layout_finishes() {
        let worker = PipelineWorker::default_config();
        let pending = worker.spawn(pair_input());
        while !pending.is_finished() {
            tokio::task::yield_now().await;
        }
        assert!(pending.wait().await.is_ok());
    }

    #[tokio::test]
    async fn test_aborted_layout_is_discarded_or_completes() {
        let worker = PipelineWorker::default_config();
        let pending = worker.spawn(pair_input());
        pending.abort();

        // A blocking task that already started runs to completion
        match pending.wait().await {
            Ok(output) => assert_eq!(output.summary.node_count, 2),
            Err(e) => assert!(matches!(e, PipelineError::Worker(_))),
        }
    }

    #[tokio::test]
    async fn test_serve_answers_each_request() {
        let worker = PipelineWorker::default_config();
        let (tx, rx) = mpsc::channel(4);
        let server = tokio::spawn({
            let worker = worker.clone();
            async move { worker.serve(rx).await }
        });

        let (first, first_rx) = LayoutRequest::new(pair_input());
        let (second, second_rx) = LayoutRequest::new(GraphInput::default());
        tx.send(first).await.unwrap();
        tx.send(second).await.unwrap();
        drop(tx);

        assert_eq!(first_rx.await.unwrap().unwrap().summary.node_count, 2);
        assert!(second_rx.await.unwrap().unwrap().graph.is_empty());
        assert_eq!(server.await.unwrap(), 2);
        assert_eq!(worker.metrics().runs, 2);
    }

    #[tokio::test]
    async fn test_serve_survives_dropped_requester() {
        let worker = PipelineWorker::default_config();
        let (tx, rx) = mpsc::channel(1);

        let (request, reply_rx) = LayoutRequest::new(pair_input());
        drop(reply_rx);
        tx.send(request).await.unwrap();
        drop(tx);

        assert_eq!(worker.serve(rx).await, 1);
    }

    #[tokio::test]
    async fn test_reset_metrics() {
        let worker = PipelineWorker::default_config();
        worker.compute(pair_input()).await.unwrap();
        worker.reset_metrics();
        assert_eq!(worker.metrics().runs, 0);
    }
}
