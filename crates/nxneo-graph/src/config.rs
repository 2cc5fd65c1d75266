//! Connection and graph configuration.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GraphError, GraphResult};

/// Settings for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: "neo4j".to_string(),
            max_connections: 4,
            fetch_size: 200,
        }
    }
}

impl ConnectionConfig {
    /// Override fields from `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD` and
    /// `NEO4J_DATABASE` when they are set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(uri) = std::env::var("NEO4J_URI") {
            self.uri = uri;
        }
        if let Ok(user) = std::env::var("NEO4J_USER") {
            self.user = user;
        }
        if let Ok(password) = std::env::var("NEO4J_PASSWORD") {
            self.password = password;
        }
        if let Ok(database) = std::env::var("NEO4J_DATABASE") {
            self.database = database;
        }
        self
    }
}

/// Traversal direction passed to the graph-algorithm procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Outgoing,
    Incoming,
    #[default]
    Both,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outgoing => "OUTGOING",
            Direction::Incoming => "INCOMING",
            Direction::Both => "BOTH",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OUTGOING" | "OUT" => Ok(Self::Outgoing),
            "INCOMING" | "IN" => Ok(Self::Incoming),
            "BOTH" => Ok(Self::Both),
            other => Err(GraphError::Config(format!("unknown direction '{}'", other))),
        }
    }
}

/// Options resolved once when a graph handle is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    pub node_label: String,
    /// `None` disables every edge operation. TOML has no null, so an empty
    /// string there means `None`.
    #[serde(deserialize_with = "empty_as_none")]
    pub relationship_type: Option<String>,
    pub identifier_property: String,
    pub direction: Direction,
    /// Algorithm engine handed to procedures as `graph`.
    #[serde(rename = "graph")]
    pub engine: String,
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            node_label: "Node".to_string(),
            relationship_type: Some("CONNECTED".to_string()),
            identifier_property: "id".to_string(),
            direction: Direction::Both,
            engine: "heavy".to_string(),
        }
    }
}

impl GraphOptions {
    /// Options for an undirected graph (`BOTH`).
    pub fn undirected() -> Self {
        Self::default()
    }

    /// Options for a directed graph (`OUTGOING`).
    pub fn directed() -> Self {
        Self {
            direction: Direction::Outgoing,
            ..Self::default()
        }
    }

    pub fn node_label(mut self, label: impl Into<String>) -> Self {
        self.node_label = label.into();
        self
    }

    pub fn relationship_type(mut self, rel: Option<&str>) -> Self {
        self.relationship_type = rel.map(str::to_string);
        self
    }

    pub fn identifier_property(mut self, key: impl Into<String>) -> Self {
        self.identifier_property = key.into();
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }
}

/// Contents of an `nxneo.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub connection: ConnectionConfig,
    pub graph: GraphOptions,
}

impl Settings {
    pub fn from_toml(text: &str) -> GraphResult<Self> {
        toml::from_str(text).map_err(|e| GraphError::Config(e.to_string()))
    }

    /// Load settings from a file that must exist.
    pub fn load(path: &Path) -> GraphResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GraphError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Load an optional settings file; a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> GraphResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
