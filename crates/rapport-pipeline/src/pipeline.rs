//! Core pipeline: build the graph, then lay it out

use crate::{PipelineConfig, PipelineError, PipelineMetrics};
use rapport_domain::layout::max_residual_speed;
use rapport_domain::traits::GraphSource;
use rapport_domain::{
    clusters_from_contexts, layout_graph_with_config, GraphInput, GraphSummary, RelationshipGraph,
};
use std::time::Instant;

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Graph with positions assigned
    pub graph: RelationshipGraph,

    /// Counts over the graph
    pub summary: GraphSummary,

    /// Largest node speed after the final step
    pub max_residual_speed: f64,
}

/// Stateless build-and-layout service with run metrics
///
/// Holds no per-graph state; every run takes its input by reference and
/// returns a fresh [`PipelineOutput`].
///
/// # Examples
///
/// ```
/// use rapport_domain::{GraphInput, Person, PersonId, Referral};
/// use rapport_pipeline::GraphPipeline;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let alice = Person::new(PersonId::from_value(1), "Alice");
/// let bob = Person::new(PersonId::from_value(2), "Bob");
/// let mut input = GraphInput::new(vec![alice, bob]);
/// input.referrals.push(Referral {
///     referrer: PersonId::from_value(1),
///     referred: PersonId::from_value(2),
/// });
///
/// let mut pipeline = GraphPipeline::default_config();
/// let output = pipeline.run(&input)?;
/// assert_eq!(output.summary.edge_count, 1);
/// println!("{}", pipeline.metrics().summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GraphPipeline {
    config: PipelineConfig,
    metrics: PipelineMetrics,
}

impl GraphPipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            metrics: PipelineMetrics::new(),
        }
    }

    /// Create a pipeline with default configuration
    pub fn default_config() -> Self {
        Self::new(PipelineConfig::default())
    }

    /// Current configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Build and lay out one graph
    ///
    /// 1. Validates the configuration
    /// 2. Builds nodes and edges from the input
    /// 3. Derives clusters from household/business contexts (if enabled)
    /// 4. Runs the layout for the configured iteration count
    pub fn run(&mut self, input: &GraphInput) -> Result<PipelineOutput, PipelineError> {
        self.config.validate().map_err(PipelineError::Config)?;
        let start = Instant::now();

        let graph = input.build();
        tracing::debug!(
            "Built graph: {} nodes, {} edges from {} people and {} facts",
            graph.nodes.len(),
            graph.edges.len(),
            input.people.len(),
            input.fact_count()
        );

        let clusters = if self.config.cluster_contexts {
            clusters_from_contexts(&input.contexts)
        } else {
            Vec::new()
        };
        tracing::debug!("Using {} layout clusters", clusters.len());

        let (nodes, edges) = graph.into_parts();
        let nodes = layout_graph_with_config(
            nodes,
            &edges,
            self.config.iterations,
            self.config.canvas(),
            Some(&clusters),
            &self.config.layout_config(),
        );

        let graph = RelationshipGraph { nodes, edges };
        let summary = graph.summary();
        let residual = max_residual_speed(&graph.nodes);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        self.metrics.record_run(&summary, residual, elapsed_ms);
        tracing::info!(
            "Pipeline run completed: {} nodes ({} ghosts, {} orphans), {} edges in {}ms",
            summary.node_count,
            summary.ghost_count,
            summary.orphan_count,
            summary.edge_count,
            elapsed_ms
        );

        Ok(PipelineOutput {
            graph,
            summary,
            max_residual_speed: residual,
        })
    }

    /// Load input from a source, then run
    pub fn run_from_source<S>(&mut self, source: &S) -> Result<PipelineOutput, PipelineError>
    where
        S: GraphSource,
        S::Error: std::fmt::Display,
    {
        let input = source
            .load_input()
            .map_err(|e| PipelineError::Source(e.to_string()))?;
        self.run(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_domain::{CanvasBounds, Context, Person, PersonId};

    struct FailingSource;

    impl GraphSource for FailingSource {
        type Error = String;

        fn load_input(&self) -> Result<GraphInput, Self::Error> {
            Err("database unavailable".to_string())
        }
    }

    fn household_input() -> GraphInput {
        let people: Vec<_> = (1..=3)
            .map(|i| Person::new(PersonId::from_value(i), format!("P{}", i)))
            .collect();
        let mut input = GraphInput::new(people);
        input.contexts.push(Context::new(
            PersonId::from_value(10),
            "Household",
            (1..=3).map(PersonId::from_value).collect(),
        ));
        input
    }

    #[test]
    fn test_empty_run() {
        let mut pipeline = GraphPipeline::default_config();
        let output = pipeline.run(&GraphInput::default()).unwrap();
        assert!(output.graph.is_empty());
        assert_eq!(output.max_residual_speed, 0.0);
        assert_eq!(pipeline.metrics().runs, 1);
    }

    #[test]
    fn test_run_positions_every_node() {
        let mut pipeline = GraphPipeline::default_config();
        let output = pipeline.run(&household_input()).unwrap();

        assert_eq!(output.summary.edge_count, 3);
        let canvas = CanvasBounds::default();
        for node in &output.graph.nodes {
            let p = node.position.unwrap();
            assert!(p.x >= 0.0 && p.x <= canvas.width);
            assert!(p.y >= 0.0 && p.y <= canvas.height);
        }
        assert!(output.max_residual_speed < 5.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PipelineConfig::default();
        config.forces.damping = 0.0;
        let mut pipeline = GraphPipeline::new(config);

        let err = pipeline.run(&household_input()).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert_eq!(pipeline.metrics().runs, 0);
    }

    #[test]
    fn test_run_from_source() {
        let mut pipeline = GraphPipeline::default_config();
        let output = pipeline.run_from_source(&household_input()).unwrap();
        assert_eq!(output.summary.node_count, 3);

        let err = pipeline.run_from_source(&FailingSource).unwrap_err();
        assert!(matches!(err, PipelineError::Source(msg) if msg.contains("unavailable")));
    }

    #[test]
    fn test_reset_metrics() {
        let mut pipeline = GraphPipeline::default_config();
        pipeline.run(&household_input()).unwrap();
        pipeline.reset_metrics();
        assert_eq!(pipeline.metrics().runs, 0);
    }
}
