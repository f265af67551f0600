//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::input::IdLabels;
use colored::*;
use rapport_domain::{GraphEdge, GraphNode, GraphSummary, RelationshipGraph};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a graph's nodes and edges.
    pub fn format_graph(&self, graph: &RelationshipGraph, labels: &IdLabels) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_graph_json(graph, labels),
            OutputFormat::Table => Ok(self.format_graph_table(graph, labels)),
            OutputFormat::Quiet => Ok(self.format_graph_quiet(graph, labels)),
        }
    }

    /// Format summary statistics.
    pub fn format_summary(&self, summary: &GraphSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let by_type: serde_json::Map<String, serde_json::Value> = summary
                    .edges_by_type
                    .iter()
                    .map(|(t, n)| (t.as_str().to_string(), serde_json::json!(n)))
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "nodes": summary.node_count,
                    "edges": summary.edge_count,
                    "ghosts": summary.ghost_count,
                    "orphans": summary.orphan_count,
                    "edges_by_type": by_type,
                }))?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Count"]);
                builder.push_record(["Nodes".to_string(), summary.node_count.to_string()]);
                builder.push_record(["Edges".to_string(), summary.edge_count.to_string()]);
                builder.push_record(["Ghosts".to_string(), summary.ghost_count.to_string()]);
                builder.push_record(["Orphans".to_string(), summary.orphan_count.to_string()]);
                for (edge_type, count) in &summary.edges_by_type {
                    builder.push_record([format!("  {}", edge_type.as_str()), count.to_string()]);
                }
                Ok(self.render(builder))
            }
            OutputFormat::Quiet => Ok(format!("{} {}", summary.node_count, summary.edge_count)),
        }
    }

    fn format_graph_json(&self, graph: &RelationshipGraph, labels: &IdLabels) -> Result<String> {
        let nodes: Vec<serde_json::Value> = graph.nodes.iter().map(|n| node_json(n, labels)).collect();
        let edges: Vec<serde_json::Value> = graph.edges.iter().map(|e| edge_json(e, labels)).collect();
        Ok(serde_json::to_string_pretty(&serde_json::json!({
            "nodes": nodes,
            "edges": edges,
        }))?)
    }

    fn format_graph_table(&self, graph: &RelationshipGraph, labels: &IdLabels) -> String {
        if graph.is_empty() {
            return self.colorize("No people found.", "yellow");
        }

        let mut nodes = Builder::default();
        nodes.push_record(["ID", "Name", "Role", "Health", "Flags", "Position"]);
        for node in &graph.nodes {
            let mut flags = Vec::new();
            if node.is_ghost {
                flags.push("ghost");
            }
            if node.is_orphaned {
                flags.push("orphan");
            }
            let position = node
                .position
                .map(|p| format!("({:.1}, {:.1})", p.x, p.y))
                .unwrap_or_else(|| "-".to_string());

            nodes.push_record([
                short(&labels.label(node.id)),
                node.name.clone(),
                node.primary_role.clone().unwrap_or_else(|| "-".to_string()),
                node.health.as_str().to_string(),
                flags.join(","),
                position,
            ]);
        }

        let mut out = self.render(nodes);
        if graph.edges.is_empty() {
            out.push('\n');
            out.push_str(&self.colorize("No relationships found.", "yellow"));
            return out;
        }

        let mut edges = Builder::default();
        edges.push_record(["Source", "Target", "Type", "Weight", "Label", "Reciprocal"]);
        for edge in &graph.edges {
            edges.push_record([
                short(&labels.label(edge.source)),
                short(&labels.label(edge.target)),
                edge.edge_type.as_str().to_string(),
                format!("{:.2}", edge.weight),
                edge.label.clone().unwrap_or_default(),
                if edge.is_reciprocal { "yes" } else { "no" }.to_string(),
            ]);
        }
        out.push('\n');
        out.push_str(&self.render(edges));
        out
    }

    fn format_graph_quiet(&self, graph: &RelationshipGraph, labels: &IdLabels) -> String {
        graph
            .nodes
            .iter()
            .map(|n| labels.label(n.id))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Whether structured output is selected (no decorations expected).
    pub fn is_plain(&self) -> bool {
        !matches!(self.format, OutputFormat::Table)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Shorten UUID labels for table display; short keys pass through.
fn short(label: &str) -> String {
    if label.len() == 36 && label.chars().filter(|c| *c == '-').count() == 4 {
        label[..8].to_string()
    } else {
        label.to_string()
    }
}

fn node_json(node: &GraphNode, labels: &IdLabels) -> serde_json::Value {
    serde_json::json!({
        "id": labels.label(node.id),
        "name": node.name,
        "primary_role": node.primary_role,
        "health": node.health.as_str(),
        "production": node.production,
        "status": node.status,
        "pipeline_stage": node.pipeline_stage,
        "is_ghost": node.is_ghost,
        "is_orphaned": node.is_orphaned,
        "position": node.position.map(|p| serde_json::json!({ "x": p.x, "y": p.y })),
    })
}

fn edge_json(edge: &GraphEdge, labels: &IdLabels) -> serde_json::Value {
    serde_json::json!({
        "source": labels.label(edge.source),
        "target": labels.label(edge.target),
        "type": edge.edge_type.as_str(),
        "weight": edge.weight,
        "label": edge.label,
        "is_reciprocal": edge.is_reciprocal,
    })
}
