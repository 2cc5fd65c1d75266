//! # nxneo graph
//!
//! NetworkX-style graph API backed by Neo4j.
//!
//! Every method on [`GraphHandle`] renders one Cypher template, binds its
//! values as parameters and runs it through a [`CypherExecutor`]. The handle
//! keeps no node or edge state: the database is the only source of truth.

pub mod algorithms;
pub mod client;
pub mod config;
pub mod cypher;
pub mod error;
pub mod graph;
pub mod import;
pub mod templates;
pub mod value;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{CypherExecutor, GraphClient};
pub use config::{ConnectionConfig, Direction, GraphOptions, Settings};
pub use cypher::{Ident, Record, Schema, Statement};
pub use error::{GraphError, GraphResult};
pub use graph::{EdgeSpec, GraphHandle, NodeSpec};
pub use import::{GraphSource, IdProps, MemoryGraph};
pub use value::{properties, NodeId, Properties};
pub use views::{EdgeData, EdgeEntry, EdgeView, NodeData, NodeEntry, NodeView};
