//! Graph builder
//!
//! Converts people and relationship facts into a node list and a typed,
//! weighted edge list. Each rule appends edges independently; edges are never
//! merged across rules, so two different fact types between the same pair
//! both surface.
//!
//! The builder cannot fail. Facts referencing unknown ids are dropped.

use crate::facts::normalize_name;
use crate::graph::{EdgeType, GraphEdge, GraphNode, RelationshipGraph};
use crate::geometry::Point;
use crate::roles::primary_role;
use crate::{
    CoAttendance, CommunicationDirection, CommunicationLink, Context, ContextKind, GhostMention,
    MentionPair, Person, PersonId, RecruitingLink, Referral, RelationshipHealth,
};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Meeting count at which a co-attendee edge reaches full weight
pub const CO_ATTENDANCE_SATURATION: f64 = 10.0;

/// Evidence count at which a communication edge reaches full weight
pub const COMMUNICATION_SATURATION: f64 = 20.0;

/// Co-mention count at which a mentioned-together edge reaches full weight
pub const MENTION_SATURATION: f64 = 5.0;

/// All builder inputs in one bundle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphInput {
    /// Tracked people
    pub people: Vec<Person>,
    /// Household/business/other grouping records
    pub contexts: Vec<Context>,
    /// Referral links
    pub referrals: Vec<Referral>,
    /// Recruiting links
    pub recruiting_links: Vec<RecruitingLink>,
    /// Co-attendance pairs
    pub co_attendance: Vec<CoAttendance>,
    /// Communication links
    pub communications: Vec<CommunicationLink>,
    /// Mention pairs between known people
    pub mentions: Vec<MentionPair>,
    /// Mentions of untracked names
    pub ghost_mentions: Vec<GhostMention>,
}

impl GraphInput {
    /// Input with people only
    pub fn new(people: Vec<Person>) -> Self {
        Self {
            people,
            ..Default::default()
        }
    }

    /// Run the builder over this input
    pub fn build(&self) -> RelationshipGraph {
        build_graph(
            &self.people,
            &self.contexts,
            &self.referrals,
            &self.recruiting_links,
            &self.co_attendance,
            &self.communications,
            &self.mentions,
            &self.ghost_mentions,
        )
    }

    /// Total number of relationship facts (contexts included)
    pub fn fact_count(&self) -> usize {
        self.contexts.len()
            + self.referrals.len()
            + self.recruiting_links.len()
            + self.co_attendance.len()
            + self.communications.len()
            + self.mentions.len()
            + self.ghost_mentions.len()
    }
}

/// Build the relationship graph
///
/// Nodes are one per person in input order (a repeated id keeps its first
/// occurrence), followed by one ghost per distinct mentioned name. Edges
/// appear in rule order: contexts, referrals, recruiting, co-attendance,
/// communication, mentions, ghost mentions.
///
/// # Examples
///
/// ```
/// use rapport_domain::{build_graph, Person, PersonId, Referral};
///
/// let alice = Person::new(PersonId::from_value(1), "Alice");
/// let bob = Person::new(PersonId::from_value(2), "Bob");
/// let referral = Referral { referrer: alice.id, referred: bob.id };
///
/// let graph = build_graph(&[alice, bob], &[], &[referral], &[], &[], &[], &[], &[]);
/// assert_eq!(graph.nodes.len(), 2);
/// assert_eq!(graph.edges.len(), 1);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn build_graph(
    people: &[Person],
    contexts: &[Context],
    referrals: &[Referral],
    recruiting_links: &[RecruitingLink],
    co_attendance: &[CoAttendance],
    communications: &[CommunicationLink],
    mentions: &[MentionPair],
    ghost_mentions: &[GhostMention],
) -> RelationshipGraph {
    // Step 1: Person nodes
    let mut nodes = person_nodes(people);

    // Step 2: Edge rules
    let mut edges = Vec::new();
    context_edges(contexts, &mut edges);
    referral_edges(referrals, &mut edges);
    recruiting_edges(recruiting_links, &mut edges);
    co_attendance_edges(co_attendance, &mut edges);
    communication_edges(communications, &mut edges);
    mention_edges(mentions, &mut edges);
    ghost_edges(ghost_mentions, &mut nodes, &mut edges);

    // Step 3: Drop edges with unknown or identical endpoints
    let known: HashSet<PersonId> = nodes.iter().map(|n| n.id).collect();
    edges.retain(|e| e.source != e.target && known.contains(&e.source) && known.contains(&e.target));

    // Step 4: Orphan flags from the surviving edges
    let referenced: HashSet<PersonId> = edges.iter().flat_map(|e| [e.source, e.target]).collect();
    for node in &mut nodes {
        node.is_orphaned = !referenced.contains(&node.id);
    }

    RelationshipGraph { nodes, edges }
}

/// Weight for a count that saturates at `saturation`
fn saturating_weight(count: i64, saturation: f64) -> f64 {
    (count.max(0) as f64 / saturation).min(1.0)
}

fn person_nodes(people: &[Person]) -> Vec<GraphNode> {
    let mut seen = HashSet::with_capacity(people.len());
    people
        .iter()
        .filter(|p| seen.insert(p.id))
        .map(|p| GraphNode {
            id: p.id,
            name: p.name.clone(),
            primary_role: primary_role(&p.roles),
            health: p.health,
            production: p.normalized_production(),
            status: p.status.clone(),
            pipeline_stage: p.pipeline_stage.clone(),
            is_ghost: false,
            is_orphaned: true,
            position: None,
            velocity: Point::ZERO,
        })
        .collect()
}

/// Household and business contexts connect every pair of participants
fn context_edges(contexts: &[Context], edges: &mut Vec<GraphEdge>) {
    for context in contexts {
        let edge_type = match context.kind() {
            ContextKind::Household => EdgeType::Household,
            ContextKind::Business => EdgeType::Business,
            ContextKind::Other(_) => continue,
        };

        let members = context.distinct_participants();
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                edges.push(GraphEdge::new(a, b, edge_type, 1.0));
            }
        }
    }
}

fn referral_edges(referrals: &[Referral], edges: &mut Vec<GraphEdge>) {
    edges.extend(
        referrals
            .iter()
            .map(|r| GraphEdge::new(r.referrer, r.referred, EdgeType::Referral, 1.0)),
    );
}

fn recruiting_edges(links: &[RecruitingLink], edges: &mut Vec<GraphEdge>) {
    edges.extend(links.iter().map(|l| {
        GraphEdge::new(l.recruiter, l.recruit, EdgeType::RecruitingTree, 1.0).with_label(l.stage.clone())
    }));
}

fn co_attendance_edges(pairs: &[CoAttendance], edges: &mut Vec<GraphEdge>) {
    edges.extend(pairs.iter().map(|p| {
        GraphEdge::new(
            p.a,
            p.b,
            EdgeType::CoAttendee,
            saturating_weight(p.meeting_count, CO_ATTENDANCE_SATURATION),
        )
        .with_label(format!("{} meetings", p.meeting_count))
    }));
}

/// Only balanced communication is reciprocal
fn communication_edges(links: &[CommunicationLink], edges: &mut Vec<GraphEdge>) {
    edges.extend(links.iter().map(|l| {
        GraphEdge::new(
            l.a,
            l.b,
            EdgeType::CommunicationLink,
            saturating_weight(l.evidence_count, COMMUNICATION_SATURATION),
        )
        .reciprocal(l.direction == CommunicationDirection::Balanced)
    }));
}

fn mention_edges(mentions: &[MentionPair], edges: &mut Vec<GraphEdge>) {
    edges.extend(mentions.iter().map(|m| {
        GraphEdge::new(
            m.a,
            m.b,
            EdgeType::MentionedTogether,
            saturating_weight(m.co_mention_count, MENTION_SATURATION),
        )
    }));
}

/// Mentions of one name, merged across facts
struct GhostGroup {
    key: String,
    name: String,
    mentioned_by: BTreeSet<PersonId>,
    suggested_role: Option<String>,
}

/// One ghost per distinct name, linked to every mentioner
///
/// A name matching a tracked person's display name is attached to that
/// person instead of producing a ghost.
fn ghost_edges(mentions: &[GhostMention], nodes: &mut Vec<GraphNode>, edges: &mut Vec<GraphEdge>) {
    let mut groups: Vec<GhostGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for mention in mentions {
        let key = normalize_name(&mention.name);
        if key.is_empty() {
            continue;
        }

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(GhostGroup {
                key: key.clone(),
                name: mention.name.split_whitespace().collect::<Vec<_>>().join(" "),
                mentioned_by: BTreeSet::new(),
                suggested_role: None,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.mentioned_by.extend(mention.mentioned_by.iter().copied());
        if group.suggested_role.is_none() {
            group.suggested_role = mention
                .suggested_role
                .as_ref()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty());
        }
    }

    if groups.is_empty() {
        return;
    }

    let mut known_names: HashMap<String, PersonId> = HashMap::new();
    for node in nodes.iter() {
        known_names.entry(normalize_name(&node.name)).or_insert(node.id);
    }

    for group in groups {
        let anchor = match known_names.get(&group.key) {
            Some(&id) => id,
            None => {
                let id = PersonId::for_ghost(&group.key);
                nodes.push(ghost_node(id, group.name, group.suggested_role));
                id
            }
        };

        edges.extend(
            group
                .mentioned_by
                .into_iter()
                .filter(|&mentioner| mentioner != anchor)
                .map(|mentioner| GraphEdge::new(anchor, mentioner, EdgeType::MentionedTogether, 1.0)),
        );
    }
}

fn ghost_node(id: PersonId, name: String, suggested_role: Option<String>) -> GraphNode {
    GraphNode {
        id,
        name,
        primary_role: suggested_role,
        health: RelationshipHealth::Healthy,
        production: 0.0,
        status: None,
        pipeline_stage: None,
        is_ghost: true,
        is_orphaned: true,
        position: None,
        velocity: Point::ZERO,
    }
}
