//! Graph output types: nodes, typed weighted edges and the graph itself

use crate::geometry::Point;
use crate::{PersonId, RelationshipHealth};
use std::collections::{BTreeMap, BTreeSet};

/// Type of an edge in the relationship graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeType {
    /// Members of the same household
    Household,

    /// Members of the same business
    Business,

    /// Referrer to referred (directed)
    Referral,

    /// Recruiter to recruit (directed)
    RecruitingTree,

    /// Attended calendar events together
    CoAttendee,

    /// Messaging/call contact
    CommunicationLink,

    /// Mentioned together, including ghost mentions
    MentionedTogether,
}

impl EdgeType {
    /// Every edge type
    pub const ALL: [EdgeType; 7] = [
        EdgeType::Household,
        EdgeType::Business,
        EdgeType::Referral,
        EdgeType::RecruitingTree,
        EdgeType::CoAttendee,
        EdgeType::CommunicationLink,
        EdgeType::MentionedTogether,
    ];

    /// Get the edge type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Household => "household",
            EdgeType::Business => "business",
            EdgeType::Referral => "referral",
            EdgeType::RecruitingTree => "recruiting_tree",
            EdgeType::CoAttendee => "co_attendee",
            EdgeType::CommunicationLink => "communication_link",
            EdgeType::MentionedTogether => "mentioned_together",
        }
    }

    /// Parse an edge type from a string (`-` and `_` are interchangeable)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|t| t.as_str() == normalized)
    }

    /// Whether source and target carry meaning
    pub fn is_directed(&self) -> bool {
        matches!(self, EdgeType::Referral | EdgeType::RecruitingTree)
    }
}

impl std::str::FromStr for EdgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid edge type: {}", s))
    }
}

/// A node in the relationship graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Person id, or a synthesized id for a ghost
    pub id: PersonId,

    /// Display name
    pub name: String,

    /// Highest-priority role label
    pub primary_role: Option<String>,

    /// Relationship health
    pub health: RelationshipHealth,

    /// Production value
    pub production: f64,

    /// Short status text
    pub status: Option<String>,

    /// Pipeline stage label
    pub pipeline_stage: Option<String>,

    /// Synthesized from a mention rather than a tracked person
    pub is_ghost: bool,

    /// No edge references this node
    pub is_orphaned: bool,

    /// Layout position, set by the layout engine
    pub position: Option<Point>,

    /// Residual velocity after layout
    pub velocity: Point,
}

/// A typed, weighted edge between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    /// Source node id
    pub source: PersonId,

    /// Target node id
    pub target: PersonId,

    /// Edge type
    pub edge_type: EdgeType,

    /// Strength [0.0, 1.0]
    pub weight: f64,

    /// Display label
    pub label: Option<String>,

    /// Contact flows in both directions
    pub is_reciprocal: bool,
}

impl GraphEdge {
    /// Create an edge, clamping the weight into [0, 1]
    ///
    /// Non-finite weights become 0.
    pub fn new(source: PersonId, target: PersonId, edge_type: EdgeType, weight: f64) -> Self {
        let weight = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            source,
            target,
            edge_type,
            weight,
            label: None,
            is_reciprocal: false,
        }
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the reciprocity flag
    pub fn reciprocal(mut self, is_reciprocal: bool) -> Self {
        self.is_reciprocal = is_reciprocal;
        self
    }

    /// Whether this edge touches `id`
    pub fn touches(&self, id: PersonId) -> bool {
        self.source == id || self.target == id
    }

    /// The endpoint opposite to `id`, if this edge touches it
    pub fn other(&self, id: PersonId) -> Option<PersonId> {
        if self.source == id {
            Some(self.target)
        } else if self.target == id {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Nodes and edges produced by one build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipGraph {
    /// Nodes: people in input order, then ghosts
    pub nodes: Vec<GraphNode>,

    /// Edges in rule order
    pub edges: Vec<GraphEdge>,
}

impl RelationshipGraph {
    /// Split into `(nodes, edges)`
    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id
    pub fn node(&self, id: PersonId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges touching `id`
    pub fn edges_of(&self, id: PersonId) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.touches(id))
    }

    /// Distinct neighbor ids of `id`, ordered by id
    pub fn neighbors(&self, id: PersonId) -> BTreeSet<PersonId> {
        self.edges_of(id).filter_map(|e| e.other(id)).collect()
    }

    /// Aggregate counts for reporting
    pub fn summary(&self) -> GraphSummary {
        let mut edges_by_type = BTreeMap::new();
        for edge in &self.edges {
            *edges_by_type.entry(edge.edge_type).or_insert(0) += 1;
        }

        GraphSummary {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            ghost_count: self.nodes.iter().filter(|n| n.is_ghost).count(),
            orphan_count: self.nodes.iter().filter(|n| n.is_orphaned).count(),
            edges_by_type,
        }
    }
}

/// Aggregate counts over a graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSummary {
    /// Total nodes
    pub node_count: usize,
    /// Total edges
    pub edge_count: usize,
    /// Ghost nodes
    pub ghost_count: usize,
    /// Nodes with no edges
    pub orphan_count: usize,
    /// Edge count per type
    pub edges_by_type: BTreeMap<EdgeType, usize>,
}

impl GraphSummary {
    /// Number of edges of one type
    pub fn edges_of_type(&self, edge_type: EdgeType) -> usize {
        self.edges_by_type.get(&edge_type).copied().unwrap_or(0)
    }
}
