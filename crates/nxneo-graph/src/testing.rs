//! Recording executor for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::CypherExecutor;
use crate::config::GraphOptions;
use crate::cypher::{Record, Statement};
use crate::error::{GraphError, GraphResult};
use crate::graph::GraphHandle;

/// Records every statement and replays queued responses in order.
/// An empty queue answers with no rows.
#[derive(Default)]
pub struct RecordingExecutor {
    statements: Mutex<Vec<Statement>>,
    responses: Mutex<VecDeque<GraphResult<Vec<Record>>>>,
}

impl RecordingExecutor {
    pub fn respond(&self, rows: Vec<Value>) {
        let records = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => map,
                other => panic!("test row must be an object, got {}", other),
            })
            .collect();
        self.responses.lock().unwrap().push_back(Ok(records));
    }

    pub fn fail(&self, error: GraphError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }

    pub fn last(&self) -> Statement {
        self.statements
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no statement was run")
    }
}

#[async_trait]
impl CypherExecutor for RecordingExecutor {
    async fn run(&self, statement: &Statement) -> GraphResult<Vec<Record>> {
        self.statements.lock().unwrap().push(statement.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Food graph: label `Food`, relationship `CONTAINS`, keyed by `name`.
pub fn food_options() -> GraphOptions {
    GraphOptions::default()
        .node_label("Food")
        .relationship_type(Some("CONTAINS"))
        .identifier_property("name")
}

pub fn handle(options: GraphOptions) -> (GraphHandle, Arc<RecordingExecutor>) {
    let executor = Arc::new(RecordingExecutor::default());
    let graph = GraphHandle::new(executor.clone(), options).unwrap();
    (graph, executor)
}
