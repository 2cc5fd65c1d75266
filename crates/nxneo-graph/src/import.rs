//! Importing foreign graphs.
//!
//! A [`GraphSource`] exposes nodes under its own native keys. On import a
//! node is identified by the value of the target graph's identifier property
//! when it carries one, by its native key otherwise; edge endpoints resolve
//! the same way.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GraphError, GraphResult};
use crate::graph::{EdgeSpec, NodeSpec};
use crate::value::{NodeId, Properties};

/// Anything that can enumerate nodes and edges under native keys.
pub trait GraphSource {
    /// `(native key, properties)` for every node.
    fn node_entries(&self) -> Vec<(Value, Properties)>;

    /// `(native source key, native target key, properties)` for every edge.
    fn edge_entries(&self) -> Vec<(Value, Value, Properties)>;
}

/// Where to keep an imported node's native key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdProps {
    /// Store the whole key under one property.
    Single(String),
    /// Zip a composite (array) key over several properties.
    Tuple(Vec<String>),
}

impl IdProps {
    /// One name is `Single`, several are `Tuple`, none is `None`.
    pub fn from_names(mut names: Vec<String>) -> Option<Self> {
        match names.len() {
            0 => None,
            1 => names.pop().map(Self::Single),
            _ => Some(Self::Tuple(names)),
        }
    }

    fn stash(&self, key: &Value, props: &mut Properties) -> GraphResult<()> {
        match self {
            IdProps::Single(name) => {
                props.insert(name.clone(), key.clone());
            }
            IdProps::Tuple(names) => {
                let parts = match key {
                    Value::Array(parts) if parts.len() == names.len() => parts,
                    other => {
                        return Err(GraphError::validation(format!(
                            "key {} cannot be spread over {} properties",
                            other,
                            names.len()
                        )))
                    }
                };
                for (name, part) in names.iter().zip(parts) {
                    props.insert(name.clone(), part.clone());
                }
            }
        }
        Ok(())
    }
}

/// Turn a source graph into merge batches for a graph keyed by `key_prop`.
pub(crate) fn plan_import(
    source: &dyn GraphSource,
    key_prop: &str,
    id_props: Option<&IdProps>,
) -> GraphResult<(Vec<NodeSpec>, Vec<EdgeSpec>)> {
    let node_entries = source.node_entries();

    // Native key (serialized) -> identifier in the target graph.
    let mut resolved: HashMap<String, NodeId> = HashMap::with_capacity(node_entries.len());
    let mut nodes = Vec::with_capacity(node_entries.len());

    for (key, mut props) in node_entries {
        let id = match props.get(key_prop) {
            Some(value) => NodeId::from_value(value),
            None => NodeId::from_value(&key),
        }
        .ok_or_else(|| GraphError::validation(format!("node {} has no usable identifier", key)))?;

        if let Some(id_props) = id_props {
            id_props.stash(&key, &mut props)?;
        }

        resolved.insert(key.to_string(), id.clone());
        nodes.push(NodeSpec::with_properties(id, props));
    }

    let resolve = |key: &Value| -> GraphResult<NodeId> {
        match resolved.get(&key.to_string()) {
            Some(id) => Ok(id.clone()),
            None => NodeId::from_value(key)
                .ok_or_else(|| GraphError::validation(format!("edge endpoint {} has no usable identifier", key))),
        }
    };

    let edges = source
        .edge_entries()
        .into_iter()
        .map(|(u, v, props)| Ok(EdgeSpec::new(resolve(&u)?, resolve(&v)?, props)))
        .collect::<GraphResult<Vec<_>>>()?;

    Ok((nodes, edges))
}

/// A node of a [`MemoryGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryNode {
    pub key: Value,
    #[serde(default)]
    pub properties: Properties,
}

/// An edge of a [`MemoryGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEdge {
    pub source: Value,
    pub target: Value,
    #[serde(default)]
    pub properties: Properties,
}

/// Small in-process graph with NetworkX-like insertion semantics.
///
/// Serializes as `{"nodes": [{"key", "properties"}], "edges": [{"source",
/// "target", "properties"}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryGraph {
    #[serde(default)]
    nodes: Vec<MemoryNode>,
    #[serde(default)]
    edges: Vec<MemoryEdge>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node or merge properties into an existing one.
    pub fn add_node(&mut self, key: impl Into<Value>, properties: Properties) -> &mut Self {
        let key = key.into();
        match self.nodes.iter_mut().find(|n| n.key == key) {
            Some(node) => node.properties.extend(properties),
            None => self.nodes.push(MemoryNode { key, properties }),
        }
        self
    }

    /// Add an edge, creating missing endpoints. Properties merge into an
    /// existing edge between the same endpoints.
    pub fn add_edge(&mut self, source: impl Into<Value>, target: impl Into<Value>, properties: Properties) -> &mut Self {
        let (source, target) = (source.into(), target.into());
        self.add_node(source.clone(), Properties::new());
        self.add_node(target.clone(), Properties::new());

        match self
            .edges
            .iter_mut()
            .find(|e| e.source == source && e.target == target)
        {
            Some(edge) => edge.properties.extend(properties),
            None => self.edges.push(MemoryEdge {
                source,
                target,
                properties,
            }),
        }
        self
    }

    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn from_json(text: &str) -> GraphResult<Self> {
        serde_json::from_str(text).map_err(|e| GraphError::validation(format!("invalid graph document: {}", e)))
    }
}

impl GraphSource for MemoryGraph {
    fn node_entries(&self) -> Vec<(Value, Properties)> {
        self.nodes
            .iter()
            .map(|n| (n.key.clone(), n.properties.clone()))
            .collect()
    }

    fn edge_entries(&self) -> Vec<(Value, Value, Properties)> {
        self.edges
            .iter()
            .map(|e| (e.source.clone(), e.target.clone(), e.properties.clone()))
            .collect()
    }
}
