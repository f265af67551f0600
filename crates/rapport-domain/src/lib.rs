//! Rapport Domain Layer
//!
//! This crate turns a list of people and already-resolved relationship facts
//! into a typed, weighted graph and lays it out on a 2-D canvas. It holds no
//! I/O, no logging and no storage; callers pass plain values in and get plain
//! values back.
//!
//! ## Key Concepts
//!
//! - **Person**: A tracked contact with roles, health and production
//! - **Facts**: Contexts, referrals, recruiting links, co-attendance,
//!   communications, mentions and ghost mentions
//! - **Ghost**: A node synthesized for a mentioned name nobody tracks yet
//! - **Orphan**: A node no edge touches
//! - **Layout**: Deterministic force-directed positions inside a canvas
//!
//! ## Architecture
//!
//! - Pure functions over owned data
//! - Only `uuid` (ghost ids) and `rand` (seeded initial positions) as dependencies
//! - Loading and reporting live in `rapport-pipeline` and `rapport-cli`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod facts;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod person;
pub mod roles;
pub mod traits;

// Re-exports for convenience
pub use builder::{build_graph, GraphInput};
pub use facts::{
    CoAttendance, CommunicationDirection, CommunicationLink, Context, ContextKind, GhostMention,
    MentionPair, RecruitingLink, Referral,
};
pub use geometry::{CanvasBounds, Point};
pub use graph::{EdgeType, GraphEdge, GraphNode, GraphSummary, RelationshipGraph};
pub use layout::{
    clusters_from_contexts, layout_graph, layout_graph_with_config, max_residual_speed, Cluster,
    LayoutConfig, DEFAULT_ITERATIONS, MAX_SPEED_LIMIT,
};
pub use person::{Person, PersonId, RelationshipHealth};
pub use roles::{primary_role, KnownRole};
pub use traits::GraphSource;
