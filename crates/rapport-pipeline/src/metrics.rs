//! Metrics collection for pipeline runs

use rapport_domain::{EdgeType, GraphSummary};
use std::collections::BTreeMap;

/// Metrics collected across pipeline runs
///
/// Tracks graph sizes, edges per type, and runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineMetrics {
    /// Completed runs
    pub runs: usize,

    /// Nodes produced across all runs
    pub total_nodes: usize,

    /// Edges produced across all runs
    pub total_edges: usize,

    /// Ghost nodes produced across all runs
    pub total_ghosts: usize,

    /// Orphaned nodes produced across all runs
    pub total_orphans: usize,

    /// Edges per type across all runs
    pub edges_by_type: BTreeMap<EdgeType, usize>,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,

    /// Largest residual speed of the most recent run
    pub last_residual_speed: f64,
}

impl PipelineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed run
    pub fn record_run(&mut self, summary: &GraphSummary, residual_speed: f64, elapsed_ms: u64) {
        self.runs += 1;
        self.total_nodes += summary.node_count;
        self.total_edges += summary.edge_count;
        self.total_ghosts += summary.ghost_count;
        self.total_orphans += summary.orphan_count;
        for (edge_type, count) in &summary.edges_by_type {
            *self.edges_by_type.entry(*edge_type).or_insert(0) += count;
        }
        self.total_runtime_ms += elapsed_ms;
        self.last_residual_speed = residual_speed;
    }

    /// Fold another set of metrics into this one
    pub fn merge(&mut self, other: &PipelineMetrics) {
        self.runs += other.runs;
        self.total_nodes += other.total_nodes;
        self.total_edges += other.total_edges;
        self.total_ghosts += other.total_ghosts;
        self.total_orphans += other.total_orphans;
        for (edge_type, count) in &other.edges_by_type {
            *self.edges_by_type.entry(*edge_type).or_insert(0) += count;
        }
        self.total_runtime_ms += other.total_runtime_ms;
        if other.runs > 0 {
            self.last_residual_speed = other.last_residual_speed;
        }
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Pipeline Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Runs: {}", self.runs),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            format!("Nodes: {}", self.total_nodes),
            format!("  Ghosts: {}", self.total_ghosts),
            format!("  Orphans: {}", self.total_orphans),
            format!("Edges: {}", self.total_edges),
        ];

        for (edge_type, count) in &self.edges_by_type {
            lines.push(format!("  {}: {}", edge_type.as_str(), count));
        }

        lines.push(format!("Last residual speed: {:.4}", self.last_residual_speed));
        lines.join("\n")
    }
}
