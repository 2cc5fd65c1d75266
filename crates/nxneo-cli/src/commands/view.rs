//! Listing commands.

use anyhow::Result;
use clap::Args;
use nxneo_graph::{GraphHandle, NodeData};
use serde_json::Value;

use super::parse_value;
use crate::output;

#[derive(Args)]
pub struct ViewArgs {
    /// Include every property
    #[arg(long, conflicts_with = "property")]
    pub data: bool,

    /// Include a single property
    #[arg(long)]
    pub property: Option<String>,

    /// Value shown when the property is unset (JSON or plain text)
    #[arg(long, requires = "property", value_parser = parse_default)]
    pub default: Option<Value>,
}

impl ViewArgs {
    fn selector(self) -> NodeData {
        match self.property {
            Some(name) => NodeData::property(name, self.default.unwrap_or(Value::Null)),
            None if self.data => NodeData::All,
            None => NodeData::NoData,
        }
    }
}

fn parse_default(raw: &str) -> Result<Value, String> {
    Ok(parse_value(raw))
}

pub async fn nodes(graph: &GraphHandle, args: ViewArgs) -> Result<()> {
    let entries = graph.nodes().fetch(&args.selector()).await?;
    output::print_nodes(&entries);
    Ok(())
}

pub async fn edges(graph: &GraphHandle, args: ViewArgs) -> Result<()> {
    if !graph.has_relationship_type() {
        output::print_edges_disabled();
        return Ok(());
    }
    let entries = graph.edges().fetch(&args.selector()).await?;
    output::print_edges(&entries);
    Ok(())
}

pub async fn count(graph: &GraphHandle) -> Result<()> {
    let nodes = graph.number_of_nodes().await?;
    let edges = graph.number_of_edges().await?;
    output::print_counts(graph, nodes, edges);
    Ok(())
}
