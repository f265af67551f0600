//! Integration tests for rapport-domain
//!
//! These tests exercise the builder and the layout engine through the public API.

use rapport_domain::layout::max_residual_speed;
use rapport_domain::{
    build_graph, layout_graph, primary_role, CanvasBounds, Cluster, CoAttendance,
    CommunicationDirection, CommunicationLink, Context, EdgeType, GhostMention, GraphInput,
    LayoutConfig, MentionPair, Person, PersonId, RecruitingLink, Referral, DEFAULT_ITERATIONS,
};
use std::collections::BTreeSet;

fn person(id: u128, name: &str) -> Person {
    Person::new(PersonId::from_value(id), name)
}

fn id(v: u128) -> PersonId {
    PersonId::from_value(v)
}

fn input(people: Vec<Person>) -> GraphInput {
    GraphInput::new(people)
}

#[test]
fn test_empty_input_builds_empty_graph() {
    let graph = GraphInput::default().build();
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
}

#[test]
fn test_people_without_facts_are_orphans() {
    let graph = input(vec![person(1, "Ann"), person(2, "Ben"), person(3, "Cy")]).build();
    assert_eq!(graph.nodes.len(), 3);
    assert!(graph.edges.is_empty());
    assert!(graph.nodes.iter().all(|n| n.is_orphaned));
}

#[test]
fn test_household_context_is_complete() {
    let mut graph_input = input((1..=4).map(|i| person(i, "P")).collect());
    graph_input.contexts.push(Context::new(id(100), "Household", (1..=4).map(id).collect()));

    let graph = graph_input.build();
    assert_eq!(graph.edges.len(), 6);
    assert!(graph.edges.iter().all(|e| e.edge_type == EdgeType::Household));
    assert!(graph.nodes.iter().all(|n| !n.is_orphaned));
    for a in 1..=4u128 {
        assert_eq!(graph.neighbors(id(a)).len(), 3);
    }
}

#[test]
fn test_business_context_uses_business_type() {
    let mut graph_input = input(vec![person(1, "A"), person(2, "B"), person(3, "C")]);
    graph_input.contexts.push(Context::new(id(100), "Business", vec![id(1), id(2), id(3)]));

    let summary = graph_input.build().summary();
    assert_eq!(summary.edges_of_type(EdgeType::Business), 3);
    assert_eq!(summary.edge_count, 3);
}

#[test]
fn test_referral_edge_is_directed() {
    let mut graph_input = input(vec![person(1, "A"), person(2, "B")]);
    graph_input.referrals.push(Referral { referrer: id(1), referred: id(2) });

    let graph = graph_input.build();
    assert_eq!(graph.edges.len(), 1);
    let edge = &graph.edges[0];
    assert_eq!(edge.edge_type, EdgeType::Referral);
    assert_eq!(edge.source, id(1));
    assert_eq!(edge.target, id(2));
    assert!(!edge.is_reciprocal);
}

#[test]
fn test_recruiting_edge_carries_stage_label() {
    let mut graph_input = input(vec![person(1, "A"), person(2, "B")]);
    graph_input.recruiting_links.push(RecruitingLink {
        recruiter: id(1),
        recruit: id(2),
        stage: "Studying".to_string(),
    });

    let graph = graph_input.build();
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].edge_type, EdgeType::RecruitingTree);
    assert_eq!(graph.edges[0].label.as_deref(), Some("Studying"));
}

#[test]
fn test_co_attendance_weight_and_label() {
    let mut graph_input = input(vec![person(1, "A"), person(2, "B")]);
    graph_input.co_attendance.push(CoAttendance { a: id(1), b: id(2), meeting_count: 5 });

    let graph = graph_input.build();
    assert_eq!(graph.edges.len(), 1);
    let edge = &graph.edges[0];
    assert_eq!(edge.edge_type, EdgeType::CoAttendee);
    assert!((edge.weight - 0.5).abs() < 1e-9);
    assert_eq!(edge.label.as_deref(), Some("5 meetings"));
}

#[test]
fn test_balanced_communication_is_capped_and_reciprocal() {
    let mut graph_input = input(vec![person(1, "A"), person(2, "B")]);
    graph_input.communications.push(CommunicationLink {
        a: id(1),
        b: id(2),
        evidence_count: 30,
        last_contact: 1_700_000_000_000,
        direction: CommunicationDirection::Balanced,
    });

    let graph = graph_input.build();
    assert_eq!(graph.edges.len(), 1);
    let edge = &graph.edges[0];
    assert_eq!(edge.edge_type, EdgeType::CommunicationLink);
    assert_eq!(edge.weight, 1.0);
    assert!(edge.is_reciprocal);
}

#[test]
fn test_mention_weight() {
    let mut graph_input = input(vec![person(1, "A"), person(2, "B")]);
    graph_input.mentions.push(MentionPair { a: id(1), b: id(2), co_mention_count: 3 });

    let graph = graph_input.build();
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].edge_type, EdgeType::MentionedTogether);
    assert!((graph.edges[0].weight - 0.6).abs() < 1e-9);
}

#[test]
fn test_ghost_mention_adds_ghost_node() {
    let mut graph_input = input(vec![person(1, "Ann"), person(2, "Ben")]);
    graph_input.ghost_mentions.push(GhostMention::new("Carol Smith", [id(1)]));

    let graph = graph_input.build();
    assert_eq!(graph.nodes.len(), 3);

    let ghost = graph.nodes.iter().find(|n| n.is_ghost).unwrap();
    assert_eq!(ghost.name, "Carol Smith");
    assert!(!ghost.is_orphaned);

    assert_eq!(graph.edges.len(), 1);
    let edge = &graph.edges[0];
    assert_eq!(edge.edge_type, EdgeType::MentionedTogether);
    assert_eq!(edge.source, ghost.id);
    assert_eq!(edge.target, id(1));
}

#[test]
fn test_unknown_ids_contribute_nothing() {
    let mut graph_input = input(vec![person(1, "A")]);
    let stranger = id(999);
    graph_input.contexts.push(Context::new(id(100), "Household", vec![id(1), stranger]));
    graph_input.referrals.push(Referral { referrer: id(1), referred: stranger });
    graph_input.recruiting_links.push(RecruitingLink {
        recruiter: stranger,
        recruit: id(1),
        stage: "Licensed".to_string(),
    });
    graph_input.co_attendance.push(CoAttendance { a: id(1), b: stranger, meeting_count: 4 });
    graph_input.communications.push(CommunicationLink {
        a: stranger,
        b: id(1),
        evidence_count: 3,
        last_contact: 0,
        direction: CommunicationDirection::Inbound,
    });
    graph_input.mentions.push(MentionPair { a: id(1), b: stranger, co_mention_count: 2 });

    let graph = graph_input.build();
    assert!(graph.edges.is_empty());
    assert!(graph.nodes[0].is_orphaned);
}

#[test]
fn test_edges_not_merged_across_types() {
    let a = person(1, "A");
    let b = person(2, "B");
    let contexts = vec![Context::new(id(100), "Household", vec![a.id, b.id])];
    let referrals = vec![Referral { referrer: a.id, referred: b.id }];
    let communications = vec![CommunicationLink {
        a: a.id,
        b: b.id,
        evidence_count: 10,
        last_contact: 0,
        direction: CommunicationDirection::Outbound,
    }];

    let graph = build_graph(&[a, b], &contexts, &referrals, &[], &[], &communications, &[], &[]);
    assert_eq!(graph.edges.len(), 3);
    let types: BTreeSet<_> = graph.edges.iter().map(|e| e.edge_type).collect();
    assert_eq!(
        types,
        [EdgeType::Household, EdgeType::Referral, EdgeType::CommunicationLink]
            .into_iter()
            .collect()
    );
}

#[test]
fn test_role_priority_resolution() {
    let roles = |labels: &[&str]| labels.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();

    assert_eq!(primary_role(&roles(&["Vendor", "Client"])).as_deref(), Some("Client"));
    assert_eq!(primary_role(&roles(&["Lead", "Agent"])).as_deref(), Some("Agent"));
    assert_eq!(primary_role(&roles(&[])), None);
    assert_eq!(primary_role(&roles(&["Golf Buddy", "Vendor"])).as_deref(), Some("Vendor"));
}

#[test]
fn test_primary_role_on_nodes() {
    let graph = input(vec![person(1, "A").with_role("Lead").with_role("Agent")]).build();
    assert_eq!(graph.nodes[0].primary_role.as_deref(), Some("Agent"));
}

#[test]
fn test_layout_empty_graph() {
    let out = layout_graph(Vec::new(), &[], DEFAULT_ITERATIONS, CanvasBounds::default(), None);
    assert!(out.is_empty());
}

fn sample_graph_input() -> GraphInput {
    let mut graph_input = input((1..=8).map(|i| person(i, "P")).collect());
    graph_input.contexts.push(Context::new(id(100), "Household", vec![id(1), id(2), id(3)]));
    graph_input.referrals.push(Referral { referrer: id(3), referred: id(4) });
    graph_input.co_attendance.push(CoAttendance { a: id(4), b: id(5), meeting_count: 7 });
    graph_input.mentions.push(MentionPair { a: id(5), b: id(6), co_mention_count: 1 });
    graph_input.ghost_mentions.push(GhostMention::new("Dana", [id(6), id(7)]));
    graph_input
}

#[test]
fn test_layout_converges() {
    let graph = sample_graph_input().build();
    let (nodes, edges) = graph.into_parts();
    let canvas = CanvasBounds::new(1000.0, 800.0);

    let out = layout_graph(nodes, &edges, DEFAULT_ITERATIONS, canvas, None);
    assert_eq!(out.len(), 9);
    assert!(max_residual_speed(&out) < 5.0);
    for node in &out {
        let p = node.position.unwrap();
        assert!(p.is_finite());
        assert!(p.x >= 0.0 && p.x <= canvas.width);
        assert!(p.y >= 0.0 && p.y <= canvas.height);
    }
}

#[test]
fn test_layout_cluster_draws_members_together() {
    let graph = input((1..=4).map(|i| person(i, "P")).collect()).build();
    let (nodes, edges) = graph.into_parts();
    let clusters = vec![Cluster::new([id(1), id(2), id(3)])];

    let out = layout_graph(nodes, &edges, DEFAULT_ITERATIONS, CanvasBounds::default(), Some(&clusters));
    let pos = |v: u128| out.iter().find(|n| n.id == id(v)).unwrap().position.unwrap();

    let members = [pos(1), pos(2), pos(3)];
    let outsider = pos(4);
    let max_inner = [(0, 1), (0, 2), (1, 2)]
        .iter()
        .map(|&(i, j)| members[i].distance(&members[j]))
        .fold(0.0, f64::max);
    let min_outer = members
        .iter()
        .map(|m| m.distance(&outsider))
        .fold(f64::INFINITY, f64::min);

    assert!(max_inner < min_outer, "cluster spread {} vs outsider {}", max_inner, min_outer);
}

#[test]
fn test_layout_is_deterministic_for_seed() {
    let graph = sample_graph_input().build();
    let canvas = CanvasBounds::default();
    let config = LayoutConfig::default().with_seed(7);

    let run = || {
        rapport_domain::layout_graph_with_config(
            graph.nodes.clone(),
            &graph.edges,
            DEFAULT_ITERATIONS,
            canvas,
            None,
            &config,
        )
    };
    let first: Vec<_> = run().into_iter().map(|n| n.position).collect();
    let second: Vec<_> = run().into_iter().map(|n| n.position).collect();
    assert_eq!(first, second);
}

#[test]
fn test_layout_preserves_node_fields() {
    let graph = sample_graph_input().build();
    let before = graph.nodes.clone();
    let out = layout_graph(graph.nodes, &graph.edges, 10, CanvasBounds::default(), None);

    for (a, b) in before.iter().zip(&out) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
        assert_eq!(a.is_ghost, b.is_ghost);
        assert_eq!(a.is_orphaned, b.is_orphaned);
    }
}
