//! Layout engine
//!
//! Fixed-iteration force-directed simulation:
//! 1. Pairwise repulsion (inverse distance)
//! 2. Edge springs scaled by edge weight
//! 3. Cluster attraction toward each cluster's current centroid
//! 4. Mild gravity toward the canvas center
//!
//! Velocities are damped every step and capped by a temperature that cools
//! linearly to zero over the run, so residual motion at the end is small
//! regardless of the starting positions.

use crate::geometry::{CanvasBounds, Point};
use crate::graph::{GraphEdge, GraphNode};
use crate::{Context, ContextKind, PersonId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap};

/// Default number of simulation steps
pub const DEFAULT_ITERATIONS: usize = 300;

/// Default generator seed for initial positions
pub const DEFAULT_SEED: u64 = 42;

/// Largest accepted `max_speed`; the cooling cap is what settles the run
pub const MAX_SPEED_LIMIT: f64 = 1000.0;

/// Set of node ids the layout should draw close together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    /// Member node ids
    pub members: Vec<PersonId>,
}

impl Cluster {
    /// Create a cluster from member ids
    pub fn new(members: impl IntoIterator<Item = PersonId>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }
}

/// One cluster per household or business context with at least two members
pub fn clusters_from_contexts(contexts: &[Context]) -> Vec<Cluster> {
    contexts
        .iter()
        .filter(|c| matches!(c.kind(), ContextKind::Household | ContextKind::Business))
        .map(|c| Cluster::new(c.distinct_participants()))
        .filter(|c| c.members.len() >= 2)
        .collect()
}

/// Force coefficients and integration settings
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Repulsion constant; force magnitude is `repulsion / distance`
    pub repulsion: f64,

    /// Spring stiffness per unit of edge weight
    pub spring_strength: f64,

    /// Rest length of edge springs
    pub spring_length: f64,

    /// Pull toward the cluster centroid per unit of distance
    pub cluster_strength: f64,

    /// Pull toward the canvas center per unit of distance
    pub gravity: f64,

    /// Velocity multiplier applied every step, in (0, 1)
    pub damping: f64,

    /// Integration time step
    pub time_step: f64,

    /// Speed cap at the start of the run; cools linearly to zero
    ///
    /// The final step moves at most `max_speed / iterations`. Damping alone
    /// does not settle larger graphs.
    pub max_speed: f64,

    /// Distance floor for repulsion
    pub min_distance: f64,

    /// Margin kept free along the canvas edges
    pub padding: f64,

    /// Seed for initial positions
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 2000.0,
            spring_strength: 0.08,
            spring_length: 80.0,
            cluster_strength: 0.2,
            gravity: 0.01,
            damping: 0.85,
            time_step: 1.0,
            max_speed: 50.0,
            min_distance: 1.0,
            padding: 20.0,
            seed: DEFAULT_SEED,
        }
    }
}

impl LayoutConfig {
    /// Tighter layout: weaker repulsion, shorter springs, stronger gravity
    pub fn compact() -> Self {
        Self {
            repulsion: 1200.0,
            spring_length: 60.0,
            gravity: 0.02,
            ..Self::default()
        }
    }

    /// Looser layout: stronger repulsion, longer springs, weaker gravity
    pub fn spacious() -> Self {
        Self {
            repulsion: 3500.0,
            spring_length: 120.0,
            gravity: 0.006,
            ..Self::default()
        }
    }

    /// Same settings with a different seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("repulsion", self.repulsion),
            ("spring_strength", self.spring_strength),
            ("spring_length", self.spring_length),
            ("cluster_strength", self.cluster_strength),
            ("gravity", self.gravity),
            ("padding", self.padding),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number", name));
            }
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err("damping must be in (0, 1)".to_string());
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err("time_step must be greater than 0".to_string());
        }
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err("max_speed must be greater than 0".to_string());
        }
        if self.max_speed > MAX_SPEED_LIMIT {
            return Err(format!("max_speed must not exceed {}", MAX_SPEED_LIMIT));
        }
        if !(self.min_distance.is_finite() && self.min_distance > 0.0) {
            return Err("min_distance must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Lay out nodes with the default force settings
///
/// Returns the nodes with `position` and `velocity` updated; every other
/// field passes through unchanged.
///
/// # Examples
///
/// ```
/// use rapport_domain::layout::{layout_graph, DEFAULT_ITERATIONS};
/// use rapport_domain::CanvasBounds;
///
/// let nodes = layout_graph(Vec::new(), &[], DEFAULT_ITERATIONS, CanvasBounds::default(), None);
/// assert!(nodes.is_empty());
/// ```
pub fn layout_graph(
    nodes: Vec<GraphNode>,
    edges: &[GraphEdge],
    iterations: usize,
    canvas: CanvasBounds,
    clusters: Option<&[Cluster]>,
) -> Vec<GraphNode> {
    layout_graph_with_config(nodes, edges, iterations, canvas, clusters, &LayoutConfig::default())
}

/// Lay out nodes with explicit force settings
pub fn layout_graph_with_config(
    mut nodes: Vec<GraphNode>,
    edges: &[GraphEdge],
    iterations: usize,
    canvas: CanvasBounds,
    clusters: Option<&[Cluster]>,
    config: &LayoutConfig,
) -> Vec<GraphNode> {
    if nodes.is_empty() {
        return nodes;
    }

    let canvas = canvas.sanitized();
    let index = node_index(&nodes);
    let springs = springs(edges, &index);
    let groups = cluster_groups(clusters.unwrap_or(&[]), &index);

    let mut positions = seed_positions(&nodes, canvas, config);
    let mut velocities: Vec<Point> = nodes
        .iter()
        .map(|n| if n.velocity.is_finite() { n.velocity } else { Point::ZERO })
        .collect();
    let mut forces = vec![Point::ZERO; nodes.len()];
    let center = canvas.center();

    for step in 0..iterations {
        forces.fill(Point::ZERO);

        apply_repulsion(&positions, &mut forces, config);
        apply_springs(&positions, &springs, &mut forces, config);
        apply_cluster_attraction(&positions, &groups, &mut forces, config);
        apply_gravity(&positions, center, &mut forces, config);

        let temperature = config.max_speed * (1.0 - step as f64 / iterations as f64);
        integrate(&mut positions, &mut velocities, &forces, temperature, canvas, config);
    }

    for ((node, position), velocity) in nodes.iter_mut().zip(positions).zip(velocities) {
        node.position = Some(position);
        node.velocity = velocity;
    }
    nodes
}

/// Largest velocity magnitude across nodes
pub fn max_residual_speed(nodes: &[GraphNode]) -> f64 {
    nodes.iter().map(|n| n.velocity.length()).fold(0.0, f64::max)
}

/// Edge resolved to node indices
#[derive(Debug, Clone, Copy)]
struct Spring {
    a: usize,
    b: usize,
    weight: f64,
}

/// Map node id to its first index
fn node_index(nodes: &[GraphNode]) -> HashMap<PersonId, usize> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id).or_insert(i);
    }
    index
}

fn springs(edges: &[GraphEdge], index: &HashMap<PersonId, usize>) -> Vec<Spring> {
    edges
        .iter()
        .filter_map(|e| {
            let a = *index.get(&e.source)?;
            let b = *index.get(&e.target)?;
            let weight = if e.weight.is_finite() { e.weight.clamp(0.0, 1.0) } else { 0.0 };
            (a != b && weight > 0.0).then_some(Spring { a, b, weight })
        })
        .collect()
}

/// Resolve clusters to distinct node indices, skipping those with <2 known members
fn cluster_groups(clusters: &[Cluster], index: &HashMap<PersonId, usize>) -> Vec<Vec<usize>> {
    clusters
        .iter()
        .map(|c| {
            c.members
                .iter()
                .filter_map(|id| index.get(id).copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect::<Vec<_>>()
        })
        .filter(|members| members.len() >= 2)
        .collect()
}

/// Existing finite positions are kept (clamped); others are seeded uniformly
fn seed_positions(nodes: &[GraphNode], canvas: CanvasBounds, config: &LayoutConfig) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (min, max) = canvas.inner(config.padding);

    nodes
        .iter()
        .map(|n| match n.position {
            Some(p) if p.is_finite() => canvas.clamp(p, config.padding),
            _ => Point::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y)),
        })
        .collect()
}

/// Unit vector for a coincident pair, fixed per pair so runs stay reproducible
fn separation_direction(i: usize, j: usize) -> Point {
    let angle = ((i * 7919 + j * 104_729) % 360) as f64;
    let radians = angle.to_radians();
    Point::new(radians.cos(), radians.sin())
}

fn apply_repulsion(positions: &[Point], forces: &mut [Point], config: &LayoutConfig) {
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let delta = positions[i] - positions[j];
            let dist = delta.length();
            let direction = if dist > f64::EPSILON {
                delta * (1.0 / dist)
            } else {
                separation_direction(i, j)
            };

            let push = direction * (config.repulsion / dist.max(config.min_distance));
            forces[i] += push;
            forces[j] -= push;
        }
    }
}

fn apply_springs(positions: &[Point], springs: &[Spring], forces: &mut [Point], config: &LayoutConfig) {
    for spring in springs {
        let delta = positions[spring.b] - positions[spring.a];
        let dist = delta.length();
        if dist <= f64::EPSILON {
            continue;
        }

        let stretch = dist - config.spring_length;
        let pull = delta * (config.spring_strength * spring.weight * stretch / dist);
        forces[spring.a] += pull;
        forces[spring.b] -= pull;
    }
}

fn apply_cluster_attraction(
    positions: &[Point],
    groups: &[Vec<usize>],
    forces: &mut [Point],
    config: &LayoutConfig,
) {
    for members in groups {
        let sum = members.iter().fold(Point::ZERO, |acc, &i| acc + positions[i]);
        let centroid = sum * (1.0 / members.len() as f64);
        for &i in members {
            forces[i] += (centroid - positions[i]) * config.cluster_strength;
        }
    }
}

fn apply_gravity(positions: &[Point], center: Point, forces: &mut [Point], config: &LayoutConfig) {
    for (force, position) in forces.iter_mut().zip(positions) {
        *force += (center - *position) * config.gravity;
    }
}

/// Advance one step; velocity pushing into a wall is zeroed after clamping
fn integrate(
    positions: &mut [Point],
    velocities: &mut [Point],
    forces: &[Point],
    temperature: f64,
    canvas: CanvasBounds,
    config: &LayoutConfig,
) {
    for ((position, velocity), force) in positions.iter_mut().zip(velocities.iter_mut()).zip(forces) {
        let force = if force.is_finite() { *force } else { Point::ZERO };

        let mut v = ((*velocity + force * config.time_step) * config.damping).limit(temperature.max(0.0));
        if !v.is_finite() {
            v = Point::ZERO;
        }

        let next = *position + v;
        let clamped = canvas.clamp(next, config.padding);
        if clamped.x != next.x {
            v.x = 0.0;
        }
        if clamped.y != next.y {
            v.y = 0.0;
        }

        *position = clamped;
        *velocity = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeType;
    use crate::RelationshipHealth;

    fn node(id: u128) -> GraphNode {
        GraphNode {
            id: PersonId::from_value(id),
            name: format!("N{}", id),
            primary_role: None,
            health: RelationshipHealth::Healthy,
            production: 0.0,
            status: None,
            pipeline_stage: None,
            is_ghost: false,
            is_orphaned: true,
            position: None,
            velocity: Point::ZERO,
        }
    }

    fn edge(a: u128, b: u128, weight: f64) -> GraphEdge {
        GraphEdge::new(PersonId::from_value(a), PersonId::from_value(b), EdgeType::CoAttendee, weight)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
        assert!(LayoutConfig::compact().validate().is_ok());
        assert!(LayoutConfig::spacious().validate().is_ok());
    }

    #[test]
    fn test_invalid_damping_rejected() {
        let config = LayoutConfig { damping: 1.0, ..LayoutConfig::default() };
        assert!(config.validate().is_err());

        let config = LayoutConfig { repulsion: f64::NAN, ..LayoutConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_uncapped_speed_rejected() {
        let config = LayoutConfig { max_speed: 1e12, ..LayoutConfig::default() };
        assert!(config.validate().is_err());

        let config = LayoutConfig { max_speed: MAX_SPEED_LIMIT, ..LayoutConfig::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_seeded_positions_inside_canvas() {
        let nodes: Vec<_> = (0..20).map(node).collect();
        let canvas = CanvasBounds::new(400.0, 300.0);
        let config = LayoutConfig::default();
        for p in seed_positions(&nodes, canvas, &config) {
            assert!(p.x >= config.padding && p.x <= 400.0 - config.padding);
            assert!(p.y >= config.padding && p.y <= 300.0 - config.padding);
        }
    }

    #[test]
    fn test_existing_position_kept() {
        let mut n = node(1);
        n.position = Some(Point::new(123.0, 456.0));
        let positions = seed_positions(&[n], CanvasBounds::default(), &LayoutConfig::default());
        assert_eq!(positions[0], Point::new(123.0, 456.0));
    }

    #[test]
    fn test_coincident_nodes_separate() {
        let mut a = node(1);
        let mut b = node(2);
        a.position = Some(Point::new(500.0, 400.0));
        b.position = Some(Point::new(500.0, 400.0));

        let out = layout_graph(vec![a, b], &[], DEFAULT_ITERATIONS, CanvasBounds::default(), None);
        let pa = out[0].position.unwrap();
        let pb = out[1].position.unwrap();
        assert!(pa.is_finite() && pb.is_finite());
        assert!(pa.distance(&pb) > 10.0);
    }

    #[test]
    fn test_zero_iterations_only_seeds() {
        let out = layout_graph(vec![node(1)], &[], 0, CanvasBounds::default(), None);
        assert!(out[0].position.is_some());
        assert_eq!(out[0].velocity, Point::ZERO);
    }

    #[test]
    fn test_heavier_edge_pulls_closer() {
        let nodes: Vec<_> = (1..=4).map(node).collect();
        let edges = vec![edge(1, 2, 1.0), edge(3, 4, 0.1)];
        let out = layout_graph(nodes, &edges, DEFAULT_ITERATIONS, CanvasBounds::default(), None);

        let strong = out[0].position.unwrap().distance(&out[1].position.unwrap());
        let weak = out[2].position.unwrap().distance(&out[3].position.unwrap());
        assert!(strong < weak, "strong {} should be shorter than weak {}", strong, weak);
    }

    #[test]
    fn test_unknown_edges_and_cluster_members_ignored() {
        let nodes: Vec<_> = (1..=2).map(node).collect();
        let edges = vec![edge(1, 99, 1.0)];
        let clusters = vec![Cluster::new([PersonId::from_value(1), PersonId::from_value(77)])];
        let out = layout_graph(nodes, &edges, 50, CanvasBounds::default(), Some(&clusters));
        assert!(out.iter().all(|n| n.position.unwrap().is_finite()));
    }

    #[test]
    fn test_clusters_from_contexts() {
        let a = PersonId::from_value(1);
        let b = PersonId::from_value(2);
        let contexts = vec![
            Context::new(PersonId::from_value(10), "Household", vec![a, b]),
            Context::new(PersonId::from_value(11), "Business", vec![a]),
            Context::new(PersonId::from_value(12), "Book Club", vec![a, b]),
        ];
        let clusters = clusters_from_contexts(&contexts);
        assert_eq!(clusters, vec![Cluster::new([a, b])]);
    }

    #[test]
    fn test_max_residual_speed() {
        let mut a = node(1);
        a.velocity = Point::new(3.0, 4.0);
        assert_eq!(max_residual_speed(&[a, node(2)]), 5.0);
        assert_eq!(max_residual_speed(&[]), 0.0);
    }
}
