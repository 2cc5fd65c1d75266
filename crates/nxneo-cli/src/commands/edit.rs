//! Mutating commands.

use anyhow::Result;
use colored::Colorize;
use nxneo_graph::{GraphHandle, Properties};
use serde_json::Value;

use super::{into_properties, parse_id};

pub async fn add_node(graph: &GraphHandle, id: &str, props: Vec<(String, Value)>) -> Result<()> {
    let id = parse_id(id);
    graph.add_node(id.clone(), into_properties(props)).await?;
    println!("{} Merged node {}", "✓".green().bold(), id.to_string().cyan());
    Ok(())
}

pub async fn add_edge(graph: &GraphHandle, u: &str, v: &str, props: Vec<(String, Value)>) -> Result<()> {
    if !graph.has_relationship_type() {
        println!("{}", "No relationship type configured; edge not added.".yellow());
        return Ok(());
    }

    let (u, v) = (parse_id(u), parse_id(v));
    graph.add_edge(u.clone(), v.clone(), into_properties(props)).await?;
    println!(
        "{} Merged edge {} {} {}",
        "✓".green().bold(),
        u.to_string().cyan(),
        "→".dimmed(),
        v.to_string().cyan()
    );
    Ok(())
}

pub async fn add_path(graph: &GraphHandle, ids: &[String]) -> Result<()> {
    let ids: Vec<_> = ids.iter().map(|raw| parse_id(raw)).collect();
    graph.add_path(ids.clone(), Properties::new()).await?;

    let chain = ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(" → ");
    println!("{} Merged path {}", "✓".green().bold(), chain.cyan());
    Ok(())
}

pub async fn remove_node(graph: &GraphHandle, id: &str) -> Result<()> {
    let id = parse_id(id);
    graph.remove_node(id.clone()).await?;
    println!("{} Removed node {}", "✓".green().bold(), id.to_string().cyan());
    Ok(())
}

pub async fn clear(graph: &GraphHandle) -> Result<()> {
    graph.clear().await?;
    println!(
        "{} Cleared every {} node",
        "✓".green().bold(),
        graph.options().node_label.cyan()
    );
    Ok(())
}
