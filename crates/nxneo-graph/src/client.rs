//! Neo4j session gateway.

use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, ConfigBuilder, Graph, Query};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::cypher::{Record, Statement};
use crate::error::{GraphError, GraphResult};

/// Runs one statement and hands back its fully-consumed rows.
#[async_trait]
pub trait CypherExecutor: Send + Sync {
    async fn run(&self, statement: &Statement) -> GraphResult<Vec<Record>>;
}

/// Pooled Neo4j client.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Build the connection pool and check the server answers.
    ///
    /// `Graph::connect` only creates the pool; the `RETURN 1` ping forces a
    /// real handshake so a dead or misconfigured server fails here.
    pub async fn connect(config: &ConnectionConfig) -> GraphResult<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Config(format!("invalid Neo4j config: {}", e)))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(driver_error)?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .map_err(driver_error)?;

        info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self { graph })
    }
}

#[async_trait]
impl CypherExecutor for GraphClient {
    async fn run(&self, statement: &Statement) -> GraphResult<Vec<Record>> {
        debug!(
            statement = statement.text(),
            params = ?statement.params().keys().collect::<Vec<_>>(),
            "Running Cypher"
        );

        let mut query = Query::new(statement.text().to_string());
        for (key, value) in statement.params() {
            query = query.param(key, to_bolt(value));
        }

        // The pooled connection goes back to the pool when `stream` drops,
        // including on the early returns below.
        let mut stream = self
            .graph
            .execute(query)
            .await
            .map_err(driver_error)?;

        let mut records = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(driver_error)?
        {
            let mut record = Record::new();
            for column in statement.columns() {
                let value: Value = row
                    .get(column)
                    .map_err(|e| GraphError::Decode(format!("column '{}': {}", column, e)))?;
                record.insert(column.clone(), value);
            }
            records.push(record);
        }

        debug!(rows = records.len(), "Cypher complete");
        Ok(records)
    }
}

/// Map a driver error onto the taxonomy by its variant.
pub(crate) fn driver_error(error: neo4rs::Error) -> GraphError {
    match error {
        neo4rs::Error::IOError { .. }
        | neo4rs::Error::ConnectionError
        | neo4rs::Error::AuthenticationError(_)
        | neo4rs::Error::InvalidDnsName(_)
        | neo4rs::Error::UnsupportedScheme(_)
        | neo4rs::Error::UrlParseError(_) => GraphError::Connectivity(error.to_string()),
        neo4rs::Error::InvalidConfig => GraphError::Config(error.to_string()),
        neo4rs::Error::Neo4j(ref status) => GraphError::from_status(status.code(), error.to_string()),
        other => GraphError::classify(other.to_string()),
    }
}

/// Convert a JSON parameter into its Bolt representation.
///
/// Integers that fit in `i64` stay integers; other numbers become floats.
pub(crate) fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => BoltType::List(BoltList {
            value: items.iter().map(to_bolt).collect(),
        }),
        Value::Object(map) => BoltType::Map(BoltMap {
            value: map
                .iter()
                .map(|(k, v)| (BoltString::from(k.as_str()), to_bolt(v)))
                .collect(),
        }),
    }
}
