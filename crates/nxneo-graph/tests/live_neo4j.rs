//! Tests against a running Neo4j server.
//!
//! Each test works on its own label and clears it first. Algorithm tests
//! additionally need the graph-algorithms procedure library.
//!
//! ```bash
//! NEO4J_URI=bolt://localhost:7687 NEO4J_PASSWORD=secret \
//!     cargo test -p nxneo-graph --test live_neo4j -- --ignored
//! ```

use std::collections::BTreeSet;

use nxneo_graph::{
    properties, ConnectionConfig, GraphError, GraphHandle, GraphOptions, IdProps, MemoryGraph, NodeId,
    Properties,
};
use serde_json::{json, Value};

async fn fresh(label: &str, relationship: Option<&str>) -> GraphHandle {
    let config = ConnectionConfig::default().with_env_overrides();
    let options = GraphOptions::default()
        .node_label(label)
        .relationship_type(relationship)
        .identifier_property("name");
    let graph = GraphHandle::connect(&config, options)
        .await
        .expect("Neo4j must be reachable through NEO4J_URI");
    graph.clear().await.unwrap();
    graph
}

#[tokio::test]
#[ignore] // Requires Neo4j running
async fn test_food_graph() {
    let graph = fresh("LiveFood", Some("CONTAINS")).await;

    graph.add_node("Apple", properties([("shape", "round")])).await.unwrap();
    graph.add_node("Cherry", Properties::new()).await.unwrap();
    graph
        .add_edge("Cherry juice", "Cherry", properties([("percentage", 100)]))
        .await
        .unwrap();

    assert_eq!(graph.number_of_nodes().await.unwrap(), 3);
    assert_eq!(graph.number_of_edges().await.unwrap(), 1);
    assert!(graph.has_edge("Cherry juice", "Cherry").await.unwrap());
    assert!(!graph.has_edge("Cherry", "Cherry juice").await.unwrap());

    let with_data = graph.nodes().with_data().await.unwrap();
    let apple = with_data
        .iter()
        .find(|(id, _)| *id == NodeId::from("Apple"))
        .map(|(_, props)| props.clone());
    assert_eq!(apple, Some(properties([("shape", "round")])));

    let weights = graph.edges().with_property("percentage", Value::Null).await.unwrap();
    assert_eq!(
        weights,
        vec![(NodeId::from("Cherry juice"), NodeId::from("Cherry"), json!(100))]
    );

    graph.clear().await.unwrap();
    assert!(graph.nodes().is_empty().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Neo4j running
async fn test_merge_is_create_only() {
    let graph = fresh("LiveCreateOnly", Some("CONTAINS")).await;

    graph.add_node("Kiwi", properties([("color", "green")])).await.unwrap();
    graph.add_node("Kiwi", properties([("color", "brown")])).await.unwrap();

    assert_eq!(graph.number_of_nodes().await.unwrap(), 1);
    assert_eq!(
        graph.nodes().get("Kiwi").await.unwrap(),
        properties([("color", "green")])
    );
    graph.clear().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Neo4j running
async fn test_remove_missing_node_is_not_found() {
    let graph = fresh("LiveRemove", Some("CONTAINS")).await;

    graph.add_path(["Apple", "Pear", "Plum"], Properties::new()).await.unwrap();
    graph.remove_node("Pear").await.unwrap();

    assert_eq!(graph.number_of_edges().await.unwrap(), 0);
    assert!(matches!(graph.remove_node("Pear").await, Err(GraphError::NotFound(_))));
    graph.clear().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Neo4j running
async fn test_import_keeps_native_key() {
    let graph = fresh("LiveImport", Some("CONTAINS")).await;

    let mut source = MemoryGraph::new();
    source.add_node("Cherry", properties([("shape", "curved")]));
    source.add_edge("Cherry juice", "Cherry", properties([("percentage", 100)]));

    let id_props = IdProps::Single("original_id".to_string());
    graph.update_from_graph(&source, Some(&id_props)).await.unwrap();

    let cherry = graph.nodes().get("Cherry").await.unwrap();
    assert_eq!(cherry.get("original_id"), Some(&json!("Cherry")));
    assert!(graph.has_edge("Cherry juice", "Cherry").await.unwrap());
    graph.clear().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Neo4j running
async fn test_no_relationship_type_leaves_edges_alone() {
    let graph = fresh("LiveNoEdges", None).await;

    graph.add_edge("Apple", "Pear", Properties::new()).await.unwrap();
    graph.add_node("Apple", Properties::new()).await.unwrap();

    assert_eq!(graph.number_of_nodes().await.unwrap(), 1);
    assert!(graph.edges().pairs().await.unwrap().is_empty());
    graph.clear().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Neo4j with the graph-algorithms library
async fn test_components_and_paths() {
    let graph = fresh("LiveAlgo", Some("LINKS")).await;

    graph.add_path([1, 2, 3], Properties::new()).await.unwrap();
    graph.add_node(4, Properties::new()).await.unwrap();

    let mut components = graph.connected_components().await.unwrap();
    components.sort_by_key(|c| std::cmp::Reverse(c.len()));
    assert_eq!(
        components,
        vec![
            BTreeSet::from([NodeId::Int(1), NodeId::Int(2), NodeId::Int(3)]),
            BTreeSet::from([NodeId::Int(4)]),
        ]
    );

    let path = graph.shortest_path(1, 3).await.unwrap();
    assert_eq!(path, vec![NodeId::Int(1), NodeId::Int(2), NodeId::Int(3)]);
    graph.clear().await.unwrap();
}
