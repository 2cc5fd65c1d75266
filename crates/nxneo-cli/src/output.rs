//! Terminal output formatting.

use colored::Colorize;
use nxneo_graph::{EdgeEntry, GraphHandle, NodeEntry, NodeId};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

/// Print node view entries, one per line.
pub fn print_nodes(entries: &[NodeEntry]) {
    if entries.is_empty() {
        println!("{}", "No nodes.".dimmed());
        return;
    }

    for entry in entries {
        match entry {
            NodeEntry::Id(id) => println!("{}", id.to_string().cyan()),
            NodeEntry::WithProperties(id, props) => {
                println!("{} {}", id.to_string().cyan(), serde_json::Value::Object(props.clone()))
            }
            NodeEntry::WithValue(id, value) => println!("{} {}", id.to_string().cyan(), value),
        }
    }

    println!();
    println!("{} node(s)", entries.len());
}

/// Print edge view entries as `u → v`.
pub fn print_edges(entries: &[EdgeEntry]) {
    if entries.is_empty() {
        println!("{}", "No edges.".dimmed());
        return;
    }

    for entry in entries {
        let (u, v) = entry.endpoints();
        let pair = format!("{} {} {}", u.to_string().cyan(), "→".dimmed(), v.to_string().cyan());
        match entry {
            EdgeEntry::Pair(..) => println!("{}", pair),
            EdgeEntry::WithProperties(_, _, props) => {
                println!("{} {}", pair, serde_json::Value::Object(props.clone()))
            }
            EdgeEntry::WithValue(_, _, value) => println!("{} {}", pair, value),
        }
    }

    println!();
    println!("{} edge(s)", entries.len());
}

pub fn print_edges_disabled() {
    println!("{}", "No relationship type configured; edges are disabled.".yellow());
}

pub fn print_counts(graph: &GraphHandle, nodes: usize, edges: usize) {
    let options = graph.options();
    println!("{} {}", "Graph".bold(), options.node_label.cyan());
    println!("{}", "─".repeat(40));
    println!("  Nodes: {}", nodes.to_string().cyan());
    match &options.relationship_type {
        Some(rel) => println!("  Edges: {} {}", edges.to_string().cyan(), format!("({})", rel).dimmed()),
        None => println!("  Edges: {}", "disabled".yellow()),
    }
    println!("{}", "─".repeat(40));
}

/// Print a per-node result, highest first.
pub fn print_scores<T: Display + PartialOrd + Copy>(title: &str, scores: &HashMap<NodeId, T>) {
    println!("{}", title.bold());
    println!("{}", "─".repeat(40));

    if scores.is_empty() {
        println!("{}", "No results.".dimmed());
        return;
    }

    let mut ranked: Vec<(&NodeId, T)> = scores.iter().map(|(id, score)| (id, *score)).collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    for (id, score) in ranked {
        println!("  {:<30} {}", truncate(&id.to_string(), 28), score.to_string().yellow());
    }
}

pub fn print_scalar(title: &str, value: f64) {
    println!("{}: {}", title.bold(), value.to_string().yellow());
}

pub fn print_communities(title: &str, groups: &[BTreeSet<NodeId>]) {
    println!("{} ({})", title.bold(), groups.len());

    for (i, group) in groups.iter().enumerate() {
        let members = group.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        println!("  {} {{{}}}", format!("{}.", i + 1).dimmed(), members);
    }
}

pub fn print_path(path: &[NodeId]) {
    if path.is_empty() {
        println!("{}", "No path.".dimmed());
        return;
    }

    let hops = path.iter().map(|id| id.to_string().cyan().to_string()).collect::<Vec<_>>();
    println!("{}", hops.join(&format!(" {} ", "→".dimmed())));
    println!("{} hop(s)", path.len() - 1);
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
