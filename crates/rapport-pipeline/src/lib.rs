//! Rapport Pipeline
//!
//! Application layer that turns loaded relationship data into a laid-out graph.
//!
//! # Overview
//!
//! The pipeline is responsible for:
//! - **Configuration**: Iteration count, canvas size and force coefficients from TOML
//! - **Orchestration**: Build, cluster, then lay out, with tracing at each stage
//! - **Background execution**: Running the CPU-bound layout on tokio's blocking pool
//! - **Metrics collection**: Tracking graph sizes and runtime across runs
//!
//! # Usage
//!
//! ## One-shot Run
//!
//! ```
//! use rapport_domain::GraphInput;
//! use rapport_pipeline::GraphPipeline;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pipeline = GraphPipeline::default_config();
//! let output = pipeline.run(&GraphInput::default())?;
//! assert!(output.graph.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use rapport_domain::GraphInput;
//! use rapport_pipeline::{LayoutRequest, PipelineWorker};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let worker = PipelineWorker::default_config();
//!     let (tx, rx) = mpsc::channel(8);
//!     let server = tokio::spawn(async move { worker.serve(rx).await });
//!
//!     let (request, reply) = LayoutRequest::new(GraphInput::default());
//!     tx.send(request).await?;
//!     let output = reply.await??;
//!     println!("{} nodes", output.summary.node_count);
//!
//!     drop(tx);
//!     server.await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! iterations = 300
//! canvas_width = 1000.0
//! canvas_height = 800.0
//! cluster_contexts = true
//!
//! [forces]
//! repulsion = 2000.0
//! spring_strength = 0.08
//! spring_length = 80.0
//! cluster_strength = 0.2
//! gravity = 0.01
//! damping = 0.85
//! seed = 42
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod pipeline;
mod worker;

pub use config::{ForceConfig, PipelineConfig, MAX_ITERATIONS};
pub use error::PipelineError;
pub use metrics::PipelineMetrics;
pub use pipeline::{GraphPipeline, PipelineOutput};
pub use worker::{LayoutReply, LayoutRequest, PendingLayout, PipelineWorker};
