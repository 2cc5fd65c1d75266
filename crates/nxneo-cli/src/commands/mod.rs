//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nxneo_graph::{Direction, GraphHandle, NodeId, Properties, Settings};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod algo;
pub mod edit;
pub mod import;
pub mod view;

/// Settings file read when `--config` is not given.
const DEFAULT_CONFIG: &str = "nxneo.toml";

/// NetworkX-style graph operations on Neo4j
#[derive(Parser)]
#[command(name = "nxneo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file [default: ./nxneo.toml when present]
    #[arg(short, long, global = true, env = "NXNEO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Node label
    #[arg(long, global = true)]
    pub label: Option<String>,

    /// Relationship type
    #[arg(long, global = true, conflicts_with = "no_relationship")]
    pub relationship: Option<String>,

    /// Disable edge operations
    #[arg(long, global = true)]
    pub no_relationship: bool,

    /// Identifier property
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Traversal direction for algorithms (OUTGOING, INCOMING, BOTH)
    #[arg(long, global = true)]
    pub direction: Option<Direction>,

    /// Algorithm engine
    #[arg(long, global = true)]
    pub engine: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List nodes
    Nodes(view::ViewArgs),

    /// List edges
    Edges(view::ViewArgs),

    /// Count nodes and edges
    Count,

    /// Merge a node
    AddNode {
        /// Node identifier
        id: String,
        /// Creation-time property as key=value
        #[arg(long = "prop", value_parser = parse_prop)]
        props: Vec<(String, Value)>,
    },

    /// Merge an edge and its endpoints
    AddEdge {
        u: String,
        v: String,
        /// Creation-time property as key=value
        #[arg(long = "prop", value_parser = parse_prop)]
        props: Vec<(String, Value)>,
    },

    /// Merge a chain of edges through the given nodes
    AddPath {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete a node and its relationships
    RemoveNode { id: String },

    /// Delete every node and edge under the label
    Clear,

    /// Import a graph document
    Import(import::ImportArgs),

    /// Run a graph algorithm
    #[command(subcommand)]
    Algo(algo::AlgoCommands),
}

impl Cli {
    /// Settings file, then environment, then flags.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path).with_context(|| format!("loading {}", path.display()))?,
            None => Settings::load_or_default(Path::new(DEFAULT_CONFIG))
                .with_context(|| format!("loading {}", DEFAULT_CONFIG))?,
        };
        settings.connection = settings.connection.with_env_overrides();

        let graph = &mut settings.graph;
        if let Some(label) = &self.label {
            graph.node_label = label.clone();
        }
        if let Some(relationship) = &self.relationship {
            graph.relationship_type = Some(relationship.clone());
        }
        if self.no_relationship {
            graph.relationship_type = None;
        }
        if let Some(key) = &self.key {
            graph.identifier_property = key.clone();
        }
        if let Some(direction) = self.direction {
            graph.direction = direction;
        }
        if let Some(engine) = &self.engine {
            graph.engine = engine.clone();
        }
        Ok(settings)
    }

    pub async fn execute(self) -> Result<()> {
        let settings = self.settings()?;
        debug!(
            uri = %settings.connection.uri,
            label = %settings.graph.node_label,
            relationship = ?settings.graph.relationship_type,
            "Resolved settings"
        );
        let graph = GraphHandle::connect(&settings.connection, settings.graph)
            .await
            .with_context(|| format!("connecting to {}", settings.connection.uri))?;

        match self.command {
            Commands::Nodes(args) => view::nodes(&graph, args).await,
            Commands::Edges(args) => view::edges(&graph, args).await,
            Commands::Count => view::count(&graph).await,
            Commands::AddNode { id, props } => edit::add_node(&graph, &id, props).await,
            Commands::AddEdge { u, v, props } => edit::add_edge(&graph, &u, &v, props).await,
            Commands::AddPath { ids } => edit::add_path(&graph, &ids).await,
            Commands::RemoveNode { id } => edit::remove_node(&graph, &id).await,
            Commands::Clear => edit::clear(&graph).await,
            Commands::Import(args) => import::execute(&graph, args).await,
            Commands::Algo(cmd) => algo::execute(&graph, cmd).await,
        }
    }
}

/// JSON when it parses, a plain string otherwise.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Integers and JSON strings keep their type; anything else is text.
pub fn parse_id(raw: &str) -> NodeId {
    NodeId::from_value(&parse_value(raw)).unwrap_or_else(|| NodeId::from(raw))
}

fn parse_prop(raw: &str) -> Result<(String, Value), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), parse_value(value))),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

pub fn into_properties(pairs: Vec<(String, Value)>) -> Properties {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("60"), json!(60));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("round"), json!("round"));
        assert_eq!(parse_value("\"60\""), json!("60"));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), NodeId::Int(42));
        assert_eq!(parse_id("\"42\""), NodeId::from("42"));
        assert_eq!(parse_id("Cherry juice"), NodeId::from("Cherry juice"));
        assert_eq!(parse_id("1.5"), NodeId::from("1.5"));
    }

    #[test]
    fn test_parse_prop() {
        assert_eq!(parse_prop("percentage=60"), Ok(("percentage".to_string(), json!(60))));
        assert_eq!(parse_prop("note=a=b"), Ok(("note".to_string(), json!("a=b"))));
        assert!(parse_prop("=1").is_err());
        assert!(parse_prop("shape").is_err());
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::try_parse_from([
            "nxneo",
            "--label",
            "Food",
            "--key",
            "name",
            "--direction",
            "outgoing",
            "nodes",
        ])
        .unwrap();

        let settings = cli.settings().unwrap();
        assert_eq!(settings.graph.node_label, "Food");
        assert_eq!(settings.graph.identifier_property, "name");
        assert_eq!(settings.graph.direction, Direction::Outgoing);
        assert_eq!(settings.graph.relationship_type.as_deref(), Some("CONNECTED"));
    }

    #[test]
    fn test_no_relationship_flag() {
        let cli = Cli::try_parse_from(["nxneo", "--no-relationship", "count"]).unwrap();
        assert!(cli.settings().unwrap().graph.relationship_type.is_none());

        assert!(Cli::try_parse_from(["nxneo", "--relationship", "X", "--no-relationship", "count"]).is_err());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let cli = Cli::try_parse_from(["nxneo", "--config", "no-such-dir/nxneo.toml", "count"]).unwrap();
        let err = cli.settings().unwrap_err();
        assert!(err.to_string().contains("no-such-dir/nxneo.toml"));
    }

    #[test]
    fn test_add_edge_props() {
        let cli = Cli::try_parse_from([
            "nxneo",
            "add-edge",
            "Apple-banana juice",
            "Apple",
            "--prop",
            "percentage=60",
        ])
        .unwrap();

        match cli.command {
            Commands::AddEdge { u, v, props } => {
                assert_eq!(u, "Apple-banana juice");
                assert_eq!(v, "Apple");
                assert_eq!(into_properties(props).get("percentage"), Some(&json!(60)));
            }
            _ => panic!("expected add-edge"),
        }
    }
}
