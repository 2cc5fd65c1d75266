//! Node and edge views.
//!
//! Views borrow the handle and hold nothing else. Every `fetch`, `len` or
//! `stream` is a new round trip, so concurrent writes show up on the next
//! call.

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde_json::Value;

use crate::cypher::Record;
use crate::error::{GraphError, GraphResult};
use crate::graph::{id_column, GraphHandle};
use crate::templates;
use crate::value::{NodeId, Properties};

/// What to return alongside each node identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NodeData {
    /// Bare identifiers.
    #[default]
    NoData,
    /// Every property except the identifier property.
    All,
    /// One property, `default` where it is unset.
    Property { name: String, default: Value },
}

impl NodeData {
    pub fn property(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::Property {
            name: name.into(),
            default: default.into(),
        }
    }
}

/// Edges project the same way nodes do.
pub type EdgeData = NodeData;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeEntry {
    Id(NodeId),
    WithProperties(NodeId, Properties),
    WithValue(NodeId, Value),
}

impl NodeEntry {
    pub fn id(&self) -> &NodeId {
        match self {
            NodeEntry::Id(id) | NodeEntry::WithProperties(id, _) | NodeEntry::WithValue(id, _) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EdgeEntry {
    Pair(NodeId, NodeId),
    WithProperties(NodeId, NodeId, Properties),
    WithValue(NodeId, NodeId, Value),
}

impl EdgeEntry {
    pub fn endpoints(&self) -> (&NodeId, &NodeId) {
        match self {
            EdgeEntry::Pair(u, v) | EdgeEntry::WithProperties(u, v, _) | EdgeEntry::WithValue(u, v, _) => (u, v),
        }
    }
}

/// Restartable view over the graph's nodes.
#[derive(Clone, Copy)]
pub struct NodeView<'g> {
    graph: &'g GraphHandle,
}

impl<'g> NodeView<'g> {
    pub(crate) fn new(graph: &'g GraphHandle) -> Self {
        Self { graph }
    }

    /// Query every node with the requested projection.
    pub async fn fetch(&self, data: &NodeData) -> GraphResult<Vec<NodeEntry>> {
        let statement = match data {
            NodeData::NoData => self.graph.statement(templates::GET_NODES)?.returns(&["node"]),
            NodeData::All => self
                .graph
                .statement(templates::GET_NODES_WITH_DATA)?
                .returns(&["node", "props"]),
            NodeData::Property { name, .. } => self
                .graph
                .statement(templates::GET_NODES_WITH_PROPERTY)?
                .param("property", name.as_str())
                .returns(&["node", "value"]),
        };

        let key = self.graph.schema().key.name();
        self.graph
            .run(statement)
            .await?
            .iter()
            .map(|record| {
                let id = id_column(record, "node")?;
                Ok(match data {
                    NodeData::NoData => NodeEntry::Id(id),
                    NodeData::All => NodeEntry::WithProperties(id, props_column(record, "props", Some(key))?),
                    NodeData::Property { default, .. } => NodeEntry::WithValue(id, value_or(record, default)),
                })
            })
            .collect()
    }

    /// Identifiers only.
    pub async fn ids(&self) -> GraphResult<Vec<NodeId>> {
        let entries = self.fetch(&NodeData::NoData).await?;
        Ok(entries.into_iter().map(|e| e.id().clone()).collect())
    }

    /// `(identifier, properties)` pairs; the identifier property is left out.
    pub async fn with_data(&self) -> GraphResult<Vec<(NodeId, Properties)>> {
        let entries = self.fetch(&NodeData::All).await?;
        Ok(entries
            .into_iter()
            .filter_map(|e| match e {
                NodeEntry::WithProperties(id, props) => Some((id, props)),
                _ => None,
            })
            .collect())
    }

    /// `(identifier, value)` pairs, `default` where the property is unset.
    pub async fn with_property(&self, name: &str, default: impl Into<Value>) -> GraphResult<Vec<(NodeId, Value)>> {
        let entries = self.fetch(&NodeData::property(name, default)).await?;
        Ok(entries
            .into_iter()
            .filter_map(|e| match e {
                NodeEntry::WithValue(id, value) => Some((id, value)),
                _ => None,
            })
            .collect())
    }

    /// Lazy stream; the query runs on first poll.
    pub fn stream(&self, data: NodeData) -> BoxStream<'g, GraphResult<NodeEntry>> {
        let view = *self;
        stream::once(async move { view.fetch(&data).await })
            .map_ok(|entries| stream::iter(entries.into_iter().map(Ok::<_, GraphError>)))
            .try_flatten()
            .boxed()
    }

    /// Node count; matches the length of a full `fetch`.
    pub async fn len(&self) -> GraphResult<usize> {
        self.graph.number_of_nodes().await
    }

    pub async fn is_empty(&self) -> GraphResult<bool> {
        Ok(self.len().await? == 0)
    }

    pub async fn contains(&self, id: impl Into<NodeId>) -> GraphResult<bool> {
        self.graph.has_node(id).await
    }

    /// Properties of one node, without the identifier property.
    pub async fn get(&self, id: impl Into<NodeId>) -> GraphResult<Properties> {
        let id = id.into();
        let statement = self
            .graph
            .statement(templates::GET_NODE)?
            .param("value", id.to_value())
            .returns(&["props"]);

        let records = self.graph.run(statement).await?;
        let record = records
            .first()
            .ok_or_else(|| GraphError::not_found(format!("node '{}' is not in the graph", id)))?;
        props_column(record, "props", Some(self.graph.schema().key.name()))
    }
}

/// Restartable view over the graph's edges.
///
/// Without a relationship type every call is empty and issues no query.
#[derive(Clone, Copy)]
pub struct EdgeView<'g> {
    graph: &'g GraphHandle,
}

impl<'g> EdgeView<'g> {
    pub(crate) fn new(graph: &'g GraphHandle) -> Self {
        Self { graph }
    }

    /// Query every edge with the requested projection.
    pub async fn fetch(&self, data: &EdgeData) -> GraphResult<Vec<EdgeEntry>> {
        if !self.graph.has_relationship_type() {
            return Ok(Vec::new());
        }

        let statement = match data {
            NodeData::NoData => self.graph.statement(templates::GET_EDGES)?.returns(&["u", "v"]),
            NodeData::All => self
                .graph
                .statement(templates::GET_EDGES_WITH_DATA)?
                .returns(&["u", "v", "props"]),
            NodeData::Property { name, .. } => self
                .graph
                .statement(templates::GET_EDGES_WITH_PROPERTY)?
                .param("property", name.as_str())
                .returns(&["u", "v", "value"]),
        };

        self.graph
            .run(statement)
            .await?
            .iter()
            .map(|record| {
                let u = id_column(record, "u")?;
                let v = id_column(record, "v")?;
                Ok(match data {
                    NodeData::NoData => EdgeEntry::Pair(u, v),
                    NodeData::All => EdgeEntry::WithProperties(u, v, props_column(record, "props", None)?),
                    NodeData::Property { default, .. } => EdgeEntry::WithValue(u, v, value_or(record, default)),
                })
            })
            .collect()
    }

    pub async fn pairs(&self) -> GraphResult<Vec<(NodeId, NodeId)>> {
        let entries = self.fetch(&NodeData::NoData).await?;
        Ok(entries
            .into_iter()
            .map(|e| {
                let (u, v) = e.endpoints();
                (u.clone(), v.clone())
            })
            .collect())
    }

    pub async fn with_data(&self) -> GraphResult<Vec<(NodeId, NodeId, Properties)>> {
        let entries = self.fetch(&NodeData::All).await?;
        Ok(entries
            .into_iter()
            .filter_map(|e| match e {
                EdgeEntry::WithProperties(u, v, props) => Some((u, v, props)),
                _ => None,
            })
            .collect())
    }

    pub async fn with_property(
        &self,
        name: &str,
        default: impl Into<Value>,
    ) -> GraphResult<Vec<(NodeId, NodeId, Value)>> {
        let entries = self.fetch(&NodeData::property(name, default)).await?;
        Ok(entries
            .into_iter()
            .filter_map(|e| match e {
                EdgeEntry::WithValue(u, v, value) => Some((u, v, value)),
                _ => None,
            })
            .collect())
    }

    /// Lazy stream; the query runs on first poll.
    pub fn stream(&self, data: EdgeData) -> BoxStream<'g, GraphResult<EdgeEntry>> {
        let view = *self;
        stream::once(async move { view.fetch(&data).await })
            .map_ok(|entries| stream::iter(entries.into_iter().map(Ok::<_, GraphError>)))
            .try_flatten()
            .boxed()
    }

    pub async fn len(&self) -> GraphResult<usize> {
        self.graph.number_of_edges().await
    }

    pub async fn is_empty(&self) -> GraphResult<bool> {
        Ok(self.len().await? == 0)
    }

    pub async fn contains(&self, u: impl Into<NodeId>, v: impl Into<NodeId>) -> GraphResult<bool> {
        self.graph.has_edge(u, v).await
    }
}

fn props_column(record: &Record, column: &str, strip: Option<&str>) -> GraphResult<Properties> {
    match record.get(column) {
        Some(Value::Object(map)) => {
            let mut props = map.clone();
            if let Some(key) = strip {
                props.remove(key);
            }
            Ok(props)
        }
        Some(other) => Err(GraphError::Decode(format!("'{}' is not a property map: {}", column, other))),
        None => Err(GraphError::Decode(format!("missing '{}' column", column))),
    }
}

fn value_or(record: &Record, default: &Value) -> Value {
    match record.get("value") {
        Some(Value::Null) | None => default.clone(),
        Some(value) => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{food_options, handle};
    use futures::TryStreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_node_ids() {
        let (g, exec) = handle(food_options());
        exec.respond(vec![json!({"node": "Apple"}), json!({"node": 42})]);

        let ids = g.nodes().ids().await.unwrap();
        assert_eq!(ids, vec![NodeId::from("Apple"), NodeId::Int(42)]);
        assert_eq!(exec.last().text(), "MATCH (n:`Food`)\nRETURN n.`name` AS node");
    }

    #[tokio::test]
    async fn test_node_data_strips_identifier() {
        let (g, exec) = handle(food_options());
        exec.respond(vec![json!({"node": "Apple", "props": {"name": "Apple", "shape": "round"}})]);

        let nodes = g.nodes().with_data().await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].0, NodeId::from("Apple"));
        assert_eq!(nodes[0].1.get("shape"), Some(&json!("round")));
        assert!(nodes[0].1.get("name").is_none());
    }

    #[tokio::test]
    async fn test_node_property_with_default() {
        let (g, exec) = handle(food_options());
        exec.respond(vec![
            json!({"node": "Alice", "value": 3000}),
            json!({"node": "Bob", "value": null}),
        ]);

        let salaries = g.nodes().with_property("salary", 0).await.unwrap();
        assert_eq!(
            salaries,
            vec![(NodeId::from("Alice"), json!(3000)), (NodeId::from("Bob"), json!(0))]
        );

        let stmt = exec.last();
        assert!(stmt.text().contains("n[$property] AS value"));
        assert_eq!(stmt.params().get("property"), Some(&json!("salary")));
    }

    #[tokio::test]
    async fn test_views_requery_each_time() {
        let (g, exec) = handle(food_options());
        exec.respond(vec![json!({"node": "Apple"})]);
        exec.respond(vec![json!({"node": "Apple"}), json!({"node": "Banana"})]);

        let view = g.nodes();
        assert_eq!(view.ids().await.unwrap().len(), 1);
        assert_eq!(view.ids().await.unwrap().len(), 2);
        assert_eq!(exec.statements().len(), 2);
    }

    #[tokio::test]
    async fn test_node_stream_is_lazy() {
        let (g, exec) = handle(food_options());
        exec.respond(vec![json!({"node": "Apple"}), json!({"node": "Banana"})]);

        let stream = g.nodes().stream(NodeData::NoData);
        assert!(exec.statements().is_empty());

        let entries: Vec<NodeEntry> = stream.try_collect().await.unwrap();
        assert_eq!(
            entries,
            vec![NodeEntry::Id("Apple".into()), NodeEntry::Id("Banana".into())]
        );
        assert_eq!(exec.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_node_get_missing_is_not_found() {
        let (g, exec) = handle(food_options());
        exec.respond(vec![json!({"props": {"name": "Apple", "shape": "round"}})]);
        let props = g.nodes().get("Apple").await.unwrap();
        assert_eq!(props.get("shape"), Some(&json!("round")));
        assert!(props.get("name").is_none());

        assert!(matches!(g.nodes().get("Durian").await, Err(GraphError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_node_len_uses_count_query() {
        let (g, exec) = handle(food_options());
        exec.respond(vec![json!({"numberOfNodes": 2})]);
        assert_eq!(g.nodes().len().await.unwrap(), 2);
        assert!(exec.last().text().contains("count(*) AS numberOfNodes"));
    }

    #[tokio::test]
    async fn test_edge_projection_with_default() {
        let (g, exec) = handle(food_options());
        exec.respond(vec![
            json!({"u": "Apple-banana juice", "v": "Apple", "value": 60}),
            json!({"u": "Apple-banana juice", "v": "Banana", "value": null}),
        ]);

        let edges = g.edges().with_property("percentage", -1).await.unwrap();
        assert_eq!(
            edges,
            vec![
                (NodeId::from("Apple-banana juice"), NodeId::from("Apple"), json!(60)),
                (NodeId::from("Apple-banana juice"), NodeId::from("Banana"), json!(-1)),
            ]
        );
        assert!(exec.last().text().contains("r[$property] AS value"));
    }

    #[tokio::test]
    async fn test_edge_data_keeps_all_properties() {
        let (g, exec) = handle(food_options());
        exec.respond(vec![json!({"u": "Cherry juice", "v": "Cherry", "props": {"percentage": 100}})]);

        let edges = g.edges().with_data().await.unwrap();
        assert_eq!(edges[0].2.get("percentage"), Some(&json!(100)));

        exec.respond(vec![json!({"u": "Cherry juice", "v": "Cherry"})]);
        let pairs = g.edges().pairs().await.unwrap();
        assert_eq!(pairs, vec![(NodeId::from("Cherry juice"), NodeId::from("Cherry"))]);
    }

    #[tokio::test]
    async fn test_edge_view_empty_without_relationship_type() {
        let (g, exec) = handle(food_options().relationship_type(None));

        assert!(g.edges().pairs().await.unwrap().is_empty());
        assert!(g.edges().with_data().await.unwrap().is_empty());
        assert_eq!(g.edges().len().await.unwrap(), 0);
        let streamed: Vec<EdgeEntry> = g.edges().stream(NodeData::All).try_collect().await.unwrap();
        assert!(streamed.is_empty());
        assert!(exec.statements().is_empty());
    }

    #[tokio::test]
    async fn test_bad_row_is_decode_error() {
        let (g, exec) = handle(food_options());
        exec.respond(vec![json!({"node": null})]);
        assert!(matches!(g.nodes().ids().await, Err(GraphError::Decode(_))));

        exec.respond(vec![json!({"node": "Apple", "props": "oops"})]);
        assert!(matches!(g.nodes().with_data().await, Err(GraphError::Decode(_))));
    }
}
