//! Graph document import.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use nxneo_graph::{GraphHandle, IdProps, MemoryGraph};
use std::path::PathBuf;

#[derive(Args)]
pub struct ImportArgs {
    /// JSON document: {"nodes": [{"key", "properties"}], "edges": [{"source", "target", "properties"}]}
    pub file: PathBuf,

    /// Property that keeps each node's original key; repeat to spread a composite key
    #[arg(long = "id-prop")]
    pub id_props: Vec<String>,
}

pub async fn execute(graph: &GraphHandle, args: ImportArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let source = MemoryGraph::from_json(&text)?;
    let id_props = IdProps::from_names(args.id_props);

    println!("{} {}", "Importing".bold(), args.file.display());
    let (nodes, edges) = graph.update_from_graph(&source, id_props.as_ref()).await?;

    println!("\n{}", "Import complete:".green().bold());
    println!("  Nodes merged: {}", nodes.to_string().cyan());
    println!("  Edges merged: {}", edges.to_string().cyan());
    Ok(())
}
