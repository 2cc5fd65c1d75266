//! Graph handle and mutation operations.
//!
//! Nodes are merged by identifier and edges by endpoints and type. Property
//! payloads are applied with `ON CREATE SET`, so merging an entity that
//! already exists leaves its properties untouched. Callers expecting
//! overwrite-on-upsert semantics will be surprised: re-adding a node with new
//! properties is a no-op.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::client::{CypherExecutor, GraphClient};
use crate::config::{ConnectionConfig, GraphOptions};
use crate::cypher::{Record, Schema, Statement};
use crate::error::{GraphError, GraphResult};
use crate::import::{self, GraphSource, IdProps};
use crate::templates;
use crate::value::{NodeId, Properties};
use crate::views::{EdgeView, NodeView};

/// A node to merge: an identifier with optional creation-time properties.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: NodeId,
    pub properties: Properties,
}

impl NodeSpec {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_properties(id: impl Into<NodeId>, properties: Properties) -> Self {
        Self {
            id: id.into(),
            properties,
        }
    }
}

impl From<NodeId> for NodeSpec {
    fn from(id: NodeId) -> Self {
        Self::new(id)
    }
}

impl From<&str> for NodeSpec {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeSpec {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<i64> for NodeSpec {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl<T: Into<NodeId>> From<(T, Properties)> for NodeSpec {
    fn from((id, properties): (T, Properties)) -> Self {
        Self::with_properties(id, properties)
    }
}

/// An edge to merge: endpoints with optional creation-time properties.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub u: NodeId,
    pub v: NodeId,
    pub properties: Properties,
}

impl EdgeSpec {
    pub fn new(u: impl Into<NodeId>, v: impl Into<NodeId>, properties: Properties) -> Self {
        Self {
            u: u.into(),
            v: v.into(),
            properties,
        }
    }
}

impl<A: Into<NodeId>, B: Into<NodeId>> From<(A, B)> for EdgeSpec {
    fn from((u, v): (A, B)) -> Self {
        Self::new(u, v, Properties::new())
    }
}

impl<A: Into<NodeId>, B: Into<NodeId>> From<(A, B, Properties)> for EdgeSpec {
    fn from((u, v, properties): (A, B, Properties)) -> Self {
        Self::new(u, v, properties)
    }
}

/// A NetworkX-style view of one labelled subgraph in Neo4j.
///
/// Configuration is fixed at construction. The handle holds no graph data;
/// every call is a fresh round trip.
#[derive(Clone)]
pub struct GraphHandle {
    executor: Arc<dyn CypherExecutor>,
    options: GraphOptions,
    schema: Schema,
}

impl GraphHandle {
    /// Build a handle over any executor. Fails if a schema name cannot be
    /// quoted.
    pub fn new(executor: Arc<dyn CypherExecutor>, options: GraphOptions) -> GraphResult<Self> {
        let schema = Schema::new(
            &options.node_label,
            options.relationship_type.as_deref(),
            &options.identifier_property,
        )?;

        Ok(Self {
            executor,
            options,
            schema,
        })
    }

    /// Connect to Neo4j and build a handle on the pooled client.
    pub async fn connect(config: &ConnectionConfig, options: GraphOptions) -> GraphResult<Self> {
        let client = GraphClient::connect(config).await?;
        Self::new(Arc::new(client), options)
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether edge operations are enabled (a relationship type is set).
    pub fn has_relationship_type(&self) -> bool {
        self.schema.relationship.is_some()
    }

    pub(crate) fn statement(&self, template: &str) -> GraphResult<Statement> {
        Statement::from_template(&self.schema, template)
    }

    pub(crate) async fn run(&self, statement: Statement) -> GraphResult<Vec<Record>> {
        self.executor.run(&statement).await
    }

    /// Node view; each iteration re-queries.
    pub fn nodes(&self) -> NodeView<'_> {
        NodeView::new(self)
    }

    /// Edge view; empty without a relationship type.
    pub fn edges(&self) -> EdgeView<'_> {
        EdgeView::new(self)
    }

    // Nodes

    /// Merge a node by identifier.
    ///
    /// Properties are only written when the node is created; an existing
    /// node keeps its current properties.
    pub async fn add_node(&self, id: impl Into<NodeId>, properties: Properties) -> GraphResult<()> {
        let id = id.into();

        let statement = if properties.is_empty() {
            self.statement(templates::ADD_NODE)?
                .param("value", id.to_value())
        } else {
            let mut props = properties;
            props.insert(self.schema.key.name().to_string(), id.to_value());
            self.statement(templates::ADD_NODE_WITH_PROPS)?
                .param("value", id.to_value())
                .param("props", Value::Object(props))
        };

        self.run(statement).await?;
        debug!(node = %id, "Merged node");
        Ok(())
    }

    /// Merge many nodes in one statement.
    ///
    /// `shared` fills every key an element does not set itself; the
    /// identifier property always comes from the element's identifier.
    /// Properties are only written on creation. Returns the number of
    /// elements submitted.
    pub async fn add_nodes_from<I, N>(&self, nodes: I, shared: Properties) -> GraphResult<usize>
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeSpec>,
    {
        let key = self.schema.key.name();
        let payload: Vec<Value> = nodes
            .into_iter()
            .map(Into::into)
            .map(|node: NodeSpec| {
                let mut props = shared.clone();
                props.extend(node.properties);
                props.insert(key.to_string(), node.id.to_value());
                json!({ "value": node.id.to_value(), "props": props })
            })
            .collect();

        if payload.is_empty() {
            return Ok(0);
        }

        let count = payload.len();
        let statement = self
            .statement(templates::ADD_NODES)?
            .param("nodes", Value::Array(payload));

        self.run(statement).await?;
        debug!(count, "Merged nodes");
        Ok(count)
    }

    /// Delete a node and its relationships.
    ///
    /// Unlike `add_node`, this is not idempotent: a missing node is a
    /// `NotFound` error.
    pub async fn remove_node(&self, id: impl Into<NodeId>) -> GraphResult<()> {
        let id = id.into();
        let statement = self
            .statement(templates::REMOVE_NODE)?
            .param("value", id.to_value())
            .returns(&["removed"]);

        let records = self.run(statement).await?;
        if count_column(&records, "removed")? == 0 {
            return Err(GraphError::not_found(format!("node '{}' is not in the graph", id)));
        }

        debug!(node = %id, "Removed node");
        Ok(())
    }

    /// Delete every listed node that exists; absent identifiers are skipped.
    /// Returns the number removed.
    pub async fn remove_nodes_from<I, N>(&self, ids: I) -> GraphResult<usize>
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeId>,
    {
        let values: Vec<Value> = ids.into_iter().map(|id| id.into().to_value()).collect();
        if values.is_empty() {
            return Ok(0);
        }

        let statement = self
            .statement(templates::REMOVE_NODES)?
            .param("values", Value::Array(values))
            .returns(&["removed"]);

        let records = self.run(statement).await?;
        let removed = count_column(&records, "removed")?;
        debug!(removed, "Removed nodes");
        Ok(removed)
    }

    pub async fn has_node(&self, id: impl Into<NodeId>) -> GraphResult<bool> {
        let statement = self
            .statement(templates::HAS_NODE)?
            .param("value", id.into().to_value())
            .returns(&["found"]);

        let records = self.run(statement).await?;
        bool_column(&records, "found")
    }

    pub async fn number_of_nodes(&self) -> GraphResult<usize> {
        let statement = self
            .statement(templates::NUMBER_OF_NODES)?
            .returns(&["numberOfNodes"]);

        let records = self.run(statement).await?;
        count_column(&records, "numberOfNodes")
    }

    // Edges

    /// Merge both endpoints as bare nodes, then merge the relationship.
    ///
    /// Edge properties are only written when the relationship is created.
    /// A no-op without a relationship type.
    pub async fn add_edge(
        &self,
        u: impl Into<NodeId>,
        v: impl Into<NodeId>,
        properties: Properties,
    ) -> GraphResult<()> {
        if !self.has_relationship_type() {
            debug!("No relationship type configured, add_edge skipped");
            return Ok(());
        }

        let (u, v) = (u.into(), v.into());
        let statement = self
            .statement(templates::ADD_EDGE)?
            .param("u", u.to_value())
            .param("v", v.to_value())
            .param("props", Value::Object(properties));

        self.run(statement).await?;
        debug!(u = %u, v = %v, "Merged edge");
        Ok(())
    }

    /// Merge many edges in one statement. Returns the number submitted,
    /// zero without a relationship type.
    pub async fn add_edges_from<I, E>(&self, edges: I) -> GraphResult<usize>
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeSpec>,
    {
        if !self.has_relationship_type() {
            debug!("No relationship type configured, add_edges_from skipped");
            return Ok(0);
        }

        let payload: Vec<Value> = edges
            .into_iter()
            .map(Into::into)
            .map(|edge: EdgeSpec| {
                json!({
                    "u": edge.u.to_value(),
                    "v": edge.v.to_value(),
                    "props": edge.properties,
                })
            })
            .collect();

        if payload.is_empty() {
            return Ok(0);
        }

        let count = payload.len();
        let statement = self
            .statement(templates::ADD_EDGES)?
            .param("edges", Value::Array(payload));

        self.run(statement).await?;
        debug!(count, "Merged edges");
        Ok(count)
    }

    /// Merge edges between consecutive nodes, all carrying `properties`.
    ///
    /// A single node is merged on its own.
    pub async fn add_path<I, N>(&self, nodes: I, properties: Properties) -> GraphResult<()>
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeId>,
    {
        let nodes: Vec<NodeId> = nodes.into_iter().map(Into::into).collect();

        match nodes.as_slice() {
            [] => Ok(()),
            [single] => self.add_node(single.clone(), Properties::new()).await,
            _ => {
                let edges = nodes
                    .windows(2)
                    .map(|pair| EdgeSpec::new(pair[0].clone(), pair[1].clone(), properties.clone()));
                self.add_edges_from(edges).await?;
                Ok(())
            }
        }
    }

    /// Delete the relationship `u -> v`. `NotFound` when there is none;
    /// a no-op without a relationship type.
    pub async fn remove_edge(&self, u: impl Into<NodeId>, v: impl Into<NodeId>) -> GraphResult<()> {
        if !self.has_relationship_type() {
            debug!("No relationship type configured, remove_edge skipped");
            return Ok(());
        }

        let (u, v) = (u.into(), v.into());
        let statement = self
            .statement(templates::REMOVE_EDGE)?
            .param("u", u.to_value())
            .param("v", v.to_value())
            .returns(&["removed"]);

        let records = self.run(statement).await?;
        if count_column(&records, "removed")? == 0 {
            return Err(GraphError::not_found(format!("edge '{}' -> '{}' is not in the graph", u, v)));
        }

        debug!(u = %u, v = %v, "Removed edge");
        Ok(())
    }

    pub async fn has_edge(&self, u: impl Into<NodeId>, v: impl Into<NodeId>) -> GraphResult<bool> {
        if !self.has_relationship_type() {
            return Ok(false);
        }

        let statement = self
            .statement(templates::HAS_EDGE)?
            .param("u", u.into().to_value())
            .param("v", v.into().to_value())
            .returns(&["found"]);

        let records = self.run(statement).await?;
        bool_column(&records, "found")
    }

    pub async fn number_of_edges(&self) -> GraphResult<usize> {
        if !self.has_relationship_type() {
            return Ok(0);
        }

        let statement = self
            .statement(templates::NUMBER_OF_EDGES)?
            .returns(&["numberOfEdges"]);

        let records = self.run(statement).await?;
        count_column(&records, "numberOfEdges")
    }

    // Bulk

    /// Merge a batch of nodes, then a batch of edges.
    pub async fn update_from_parts<NI, N, EI, E>(&self, nodes: NI, edges: EI) -> GraphResult<(usize, usize)>
    where
        NI: IntoIterator<Item = N>,
        N: Into<NodeSpec>,
        EI: IntoIterator<Item = E>,
        E: Into<EdgeSpec>,
    {
        let node_count = self.add_nodes_from(nodes, Properties::new()).await?;
        let edge_count = self.add_edges_from(edges).await?;
        Ok((node_count, edge_count))
    }

    /// Import every node and edge of a foreign graph.
    ///
    /// Nodes are identified by their identifier property when they carry
    /// one, by their native key otherwise. `id_props` keeps the native key
    /// on the imported node.
    pub async fn update_from_graph(
        &self,
        source: &(dyn GraphSource + Sync),
        id_props: Option<&IdProps>,
    ) -> GraphResult<(usize, usize)> {
        let (nodes, edges) = import::plan_import(source, self.schema.key.name(), id_props)?;
        let counts = self.update_from_parts(nodes, edges).await?;
        info!(nodes = counts.0, edges = counts.1, "Imported graph");
        Ok(counts)
    }

    /// Delete every relationship of the configured type between labelled
    /// nodes, then every labelled node.
    pub async fn clear(&self) -> GraphResult<()> {
        if self.has_relationship_type() {
            self.run(self.statement(templates::CLEAR_EDGES)?).await?;
        }
        self.run(self.statement(templates::CLEAR_NODES)?).await?;

        info!(label = self.schema.label.name(), "Cleared graph");
        Ok(())
    }
}

/// Read a non-negative integer out of the first row.
pub(crate) fn count_column(records: &[Record], column: &str) -> GraphResult<usize> {
    let value = first_column(records, column)?;
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| GraphError::Decode(format!("'{}' is not a count: {}", column, value)))
}

pub(crate) fn bool_column(records: &[Record], column: &str) -> GraphResult<bool> {
    let value = first_column(records, column)?;
    value
        .as_bool()
        .ok_or_else(|| GraphError::Decode(format!("'{}' is not a boolean: {}", column, value)))
}

fn first_column<'a>(records: &'a [Record], column: &str) -> GraphResult<&'a Value> {
    records
        .first()
        .and_then(|record| record.get(column))
        .ok_or_else(|| GraphError::Decode(format!("missing '{}' column", column)))
}

/// Read an identifier column.
pub(crate) fn id_column(record: &Record, column: &str) -> GraphResult<NodeId> {
    let value = record
        .get(column)
        .ok_or_else(|| GraphError::Decode(format!("missing '{}' column", column)))?;
    NodeId::from_value(value)
        .ok_or_else(|| GraphError::Decode(format!("'{}' is not a node identifier: {}", column, value)))
}
