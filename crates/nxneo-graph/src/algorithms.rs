//! Remote graph algorithms.
//!
//! Each method calls one `algo.*` procedure scoped to the handle's label,
//! relationship type, direction and engine, then maps the procedure's
//! internal node ids back to identifier values. Nothing is computed locally:
//! when the procedure library is not installed the call fails with
//! [`GraphError::ProcedureUnavailable`].

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use tracing::debug;

use crate::cypher::{Record, Statement};
use crate::error::{GraphError, GraphResult};
use crate::graph::{id_column, GraphHandle};
use crate::templates;
use crate::value::NodeId;

impl GraphHandle {
    /// Statement for an algorithm template with the scope parameters bound.
    fn algorithm(&self, template: &str) -> GraphResult<Statement> {
        let options = self.options();
        let statement = self
            .statement(template)?
            .param("nodeLabel", self.schema().label.name())
            .param(
                "relationshipType",
                self.schema()
                    .relationship
                    .as_ref()
                    .map(|rel| Value::from(rel.name()))
                    .unwrap_or(Value::Null),
            )
            .param("direction", options.direction.as_str())
            .param("graph", options.engine.as_str());
        Ok(statement)
    }

    async fn score_map(&self, statement: Statement, column: &str) -> GraphResult<HashMap<NodeId, f64>> {
        if !self.has_relationship_type() {
            return Ok(HashMap::new());
        }
        let records = self.run(statement.returns(&["node", column])).await?;
        records
            .iter()
            .map(|record| Ok((id_column(record, "node")?, float_column(record, column)?)))
            .collect()
    }

    async fn communities(&self, statement: Statement, set_column: &str) -> GraphResult<Vec<BTreeSet<NodeId>>> {
        if !self.has_relationship_type() {
            return Ok(Vec::new());
        }
        let records = self.run(statement.returns(&[set_column, "nodes"])).await?;
        records.iter().map(members).collect()
    }

    pub async fn betweenness_centrality(&self) -> GraphResult<HashMap<NodeId, f64>> {
        let statement = self.algorithm(templates::BETWEENNESS_CENTRALITY)?;
        self.score_map(statement, "score").await
    }

    /// Closeness centrality. `wf_improved` selects the Wasserman-Faust
    /// normalization for graphs with several components.
    pub async fn closeness_centrality(&self, wf_improved: bool) -> GraphResult<HashMap<NodeId, f64>> {
        let statement = self
            .algorithm(templates::CLOSENESS_CENTRALITY)?
            .param("wfImproved", wf_improved);
        self.score_map(statement, "score").await
    }

    pub async fn harmonic_centrality(&self) -> GraphResult<HashMap<NodeId, f64>> {
        let statement = self.algorithm(templates::HARMONIC_CENTRALITY)?;
        self.score_map(statement, "score").await
    }

    /// PageRank with damping factor `alpha`, stopping after `max_iter`
    /// iterations.
    pub async fn pagerank(&self, alpha: f64, max_iter: u32) -> GraphResult<HashMap<NodeId, f64>> {
        let statement = self
            .algorithm(templates::PAGERANK)?
            .param("dampingFactor", alpha)
            .param("iterations", max_iter);
        self.score_map(statement, "score").await
    }

    /// Number of triangles each node takes part in.
    pub async fn triangles(&self) -> GraphResult<HashMap<NodeId, i64>> {
        if !self.has_relationship_type() {
            return Ok(HashMap::new());
        }
        let statement = self
            .algorithm(templates::TRIANGLE_COUNT)?
            .returns(&["node", "triangles", "coefficient"]);
        let records = self.run(statement).await?;

        records
            .iter()
            .map(|record| {
                let count = record
                    .get("triangles")
                    .and_then(Value::as_i64)
                    .ok_or_else(|| GraphError::Decode("'triangles' is not an integer".to_string()))?;
                Ok((id_column(record, "node")?, count))
            })
            .collect()
    }

    /// Local clustering coefficient per node.
    pub async fn clustering(&self) -> GraphResult<HashMap<NodeId, f64>> {
        let statement = self.algorithm(templates::TRIANGLE_COUNT)?;
        self.score_map(statement, "coefficient").await
    }

    pub async fn average_clustering(&self) -> GraphResult<f64> {
        if !self.has_relationship_type() {
            return Ok(0.0);
        }
        let statement = self
            .algorithm(templates::AVERAGE_CLUSTERING)?
            .returns(&["averageClusteringCoefficient"]);
        let records = self.run(statement).await?;
        let record = records
            .first()
            .ok_or_else(|| GraphError::Decode("triangle count returned no summary row".to_string()))?;
        float_column(record, "averageClusteringCoefficient")
    }

    /// Communities found by label propagation, one set per label.
    pub async fn label_propagation(&self) -> GraphResult<Vec<BTreeSet<NodeId>>> {
        let statement = self.algorithm(templates::LABEL_PROPAGATION)?;
        self.communities(statement, "label").await
    }

    /// Connected components as sets of identifiers.
    pub async fn connected_components(&self) -> GraphResult<Vec<BTreeSet<NodeId>>> {
        let statement = self.algorithm(templates::CONNECTED_COMPONENTS)?;
        self.communities(statement, "setId").await
    }

    /// Unweighted shortest path from `source` to `target`, endpoints
    /// included. Empty when either endpoint is missing or no path exists.
    pub async fn shortest_path(
        &self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> GraphResult<Vec<NodeId>> {
        self.path(source.into(), target.into(), None).await
    }

    /// Shortest path minimising the sum of the `weight` relationship
    /// property.
    pub async fn shortest_weighted_path(
        &self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        weight: &str,
    ) -> GraphResult<Vec<NodeId>> {
        self.path(source.into(), target.into(), Some(weight)).await
    }

    async fn path(&self, source: NodeId, target: NodeId, weight: Option<&str>) -> GraphResult<Vec<NodeId>> {
        if !self.has_relationship_type() {
            return Ok(Vec::new());
        }
        let statement = self
            .algorithm(templates::SHORTEST_PATH)?
            .param("source", source.to_value())
            .param("target", target.to_value())
            .param("propertyName", weight.map(Value::from).unwrap_or(Value::Null))
            .returns(&["node", "cost"]);

        let records = self.run(statement).await?;
        let path = records
            .iter()
            .map(|record| id_column(record, "node"))
            .collect::<GraphResult<Vec<_>>>()?;

        debug!(%source, %target, hops = path.len().saturating_sub(1), "Shortest path");
        Ok(path)
    }
}

fn float_column(record: &Record, column: &str) -> GraphResult<f64> {
    record
        .get(column)
        .and_then(Value::as_f64)
        .ok_or_else(|| GraphError::Decode(format!("'{}' is not a number", column)))
}

fn members(record: &Record) -> GraphResult<BTreeSet<NodeId>> {
    let Some(Value::Array(nodes)) = record.get("nodes") else {
        return Err(GraphError::Decode("'nodes' is not a list".to_string()));
    };
    nodes
        .iter()
        .map(|value| {
            NodeId::from_value(value)
                .ok_or_else(|| GraphError::Decode(format!("community member {} is not a node identifier", value)))
        })
        .collect()
}
