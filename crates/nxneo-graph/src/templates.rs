//! Cypher templates, one per operation.
//!
//! Slots `{label}`, `{rel}` and `{key}` are filled by [`crate::Schema::render`];
//! every `$name` is a bound parameter.

// Nodes

pub const GET_NODES: &str = "MATCH (n:{label})
RETURN n.{key} AS node";

pub const GET_NODES_WITH_DATA: &str = "MATCH (n:{label})
RETURN n.{key} AS node, properties(n) AS props";

pub const GET_NODES_WITH_PROPERTY: &str = "MATCH (n:{label})
RETURN n.{key} AS node, n[$property] AS value";

pub const GET_NODE: &str = "MATCH (n:{label} {{key}: $value})
RETURN properties(n) AS props
LIMIT 1";

pub const HAS_NODE: &str = "MATCH (n:{label} {{key}: $value})
RETURN count(n) > 0 AS found";

pub const ADD_NODE: &str = "MERGE (:{label} {{key}: $value})";

pub const ADD_NODE_WITH_PROPS: &str = "MERGE (n:{label} {{key}: $value})
ON CREATE SET n += $props";

pub const ADD_NODES: &str = "UNWIND $nodes AS node
MERGE (n:{label} {{key}: node.value})
ON CREATE SET n += node.props";

pub const REMOVE_NODE: &str = "MATCH (n:{label} {{key}: $value})
DETACH DELETE n
RETURN count(*) AS removed";

pub const REMOVE_NODES: &str = "UNWIND $values AS value
MATCH (n:{label} {{key}: value})
DETACH DELETE n
RETURN count(*) AS removed";

pub const NUMBER_OF_NODES: &str = "MATCH (:{label})
RETURN count(*) AS numberOfNodes";

// Edges

pub const GET_EDGES: &str = "MATCH (u:{label})-[:{rel}]->(v:{label})
RETURN u.{key} AS u, v.{key} AS v";

pub const GET_EDGES_WITH_DATA: &str = "MATCH (u:{label})-[r:{rel}]->(v:{label})
RETURN u.{key} AS u, v.{key} AS v, properties(r) AS props";

pub const GET_EDGES_WITH_PROPERTY: &str = "MATCH (u:{label})-[r:{rel}]->(v:{label})
RETURN u.{key} AS u, v.{key} AS v, r[$property] AS value";

pub const HAS_EDGE: &str = "MATCH (:{label} {{key}: $u})-[r:{rel}]->(:{label} {{key}: $v})
RETURN count(r) > 0 AS found";

pub const ADD_EDGE: &str = "MERGE (u:{label} {{key}: $u})
MERGE (v:{label} {{key}: $v})
MERGE (u)-[r:{rel}]->(v)
ON CREATE SET r += $props";

pub const ADD_EDGES: &str = "UNWIND $edges AS edge
MERGE (u:{label} {{key}: edge.u})
MERGE (v:{label} {{key}: edge.v})
MERGE (u)-[r:{rel}]->(v)
ON CREATE SET r += edge.props";

pub const REMOVE_EDGE: &str = "MATCH (:{label} {{key}: $u})-[r:{rel}]->(:{label} {{key}: $v})
DELETE r
RETURN count(*) AS removed";

pub const NUMBER_OF_EDGES: &str = "MATCH (:{label})-[r:{rel}]->(:{label})
RETURN count(r) AS numberOfEdges";

// Clear

pub const CLEAR_EDGES: &str = "MATCH (:{label})-[r:{rel}]-(:{label})
DELETE r";

pub const CLEAR_NODES: &str = "MATCH (n:{label})
DETACH DELETE n";

// Algorithms

pub const BETWEENNESS_CENTRALITY: &str = "CALL algo.betweenness.stream($nodeLabel, $relationshipType, {
  direction: $direction,
  graph: $graph
})
YIELD nodeId, centrality
MATCH (n) WHERE id(n) = nodeId
RETURN n.{key} AS node, centrality AS score";

pub const CLOSENESS_CENTRALITY: &str = "CALL algo.closeness.stream($nodeLabel, $relationshipType, {
  direction: $direction,
  improved: $wfImproved,
  graph: $graph
})
YIELD nodeId, centrality
MATCH (n) WHERE id(n) = nodeId
RETURN n.{key} AS node, centrality AS score";

pub const HARMONIC_CENTRALITY: &str = "CALL algo.closeness.harmonic.stream($nodeLabel, $relationshipType, {
  direction: $direction,
  graph: $graph
})
YIELD nodeId, centrality
MATCH (n) WHERE id(n) = nodeId
RETURN n.{key} AS node, centrality AS score";

pub const PAGERANK: &str = "CALL algo.pageRank.stream($nodeLabel, $relationshipType, {
  direction: $direction,
  graph: $graph,
  iterations: $iterations,
  dampingFactor: $dampingFactor
})
YIELD nodeId, score
MATCH (n) WHERE id(n) = nodeId
RETURN n.{key} AS node, score";

pub const TRIANGLE_COUNT: &str = "CALL algo.triangleCount.stream($nodeLabel, $relationshipType, {
  direction: $direction,
  graph: $graph
})
YIELD nodeId, triangles, coefficient
MATCH (n) WHERE id(n) = nodeId
RETURN n.{key} AS node, triangles, coefficient";

pub const AVERAGE_CLUSTERING: &str = "CALL algo.triangleCount($nodeLabel, $relationshipType, {
  direction: $direction,
  graph: $graph,
  write: false
})
YIELD averageClusteringCoefficient
RETURN averageClusteringCoefficient";

pub const LABEL_PROPAGATION: &str = "CALL algo.labelPropagation.stream($nodeLabel, $relationshipType, {
  direction: $direction,
  graph: $graph
})
YIELD nodeId, label
MATCH (n) WHERE id(n) = nodeId
RETURN label, collect(n.{key}) AS nodes";

pub const CONNECTED_COMPONENTS: &str = "CALL algo.unionFind.stream($nodeLabel, $relationshipType, {
  direction: $direction,
  graph: $graph
})
YIELD nodeId, setId
MATCH (n) WHERE id(n) = nodeId
RETURN setId, collect(n.{key}) AS nodes";

pub const SHORTEST_PATH: &str = "MATCH (source:{label} {{key}: $source})
MATCH (target:{label} {{key}: $target})
CALL algo.shortestPath.stream(source, target, $propertyName, {
  direction: $direction,
  graph: $graph
})
YIELD nodeId, cost
MATCH (n) WHERE id(n) = nodeId
RETURN n.{key} AS node, cost";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::Schema;

    const ALL: &[&str] = &[
        GET_NODES, GET_NODES_WITH_DATA, GET_NODES_WITH_PROPERTY, GET_NODE, HAS_NODE,
        ADD_NODE, ADD_NODE_WITH_PROPS, ADD_NODES, REMOVE_NODE, REMOVE_NODES, NUMBER_OF_NODES,
        GET_EDGES, GET_EDGES_WITH_DATA, GET_EDGES_WITH_PROPERTY, HAS_EDGE, ADD_EDGE, ADD_EDGES,
        REMOVE_EDGE, NUMBER_OF_EDGES, CLEAR_EDGES, CLEAR_NODES, BETWEENNESS_CENTRALITY,
        CLOSENESS_CENTRALITY, HARMONIC_CENTRALITY, PAGERANK, TRIANGLE_COUNT, AVERAGE_CLUSTERING,
        LABEL_PROPAGATION, CONNECTED_COMPONENTS, SHORTEST_PATH,
    ];

    #[test]
    fn test_every_template_renders() {
        let schema = Schema::new("Food", Some("CONTAINS"), "name").unwrap();
        for template in ALL {
            let text = schema.render(template).unwrap();
            assert!(!text.contains("{label}"), "{}", text);
            assert!(!text.contains("{key}"), "{}", text);
            assert!(!text.contains("{rel}"), "{}", text);
        }
    }

    #[test]
    fn test_add_node_with_props_is_create_only() {
        let schema = Schema::new("Food", Some("CONTAINS"), "name").unwrap();
        let text = schema.render(ADD_NODE_WITH_PROPS).unwrap();
        assert_eq!(text, "MERGE (n:`Food` {`name`: $value})\nON CREATE SET n += $props");
    }

    #[test]
    fn test_algorithm_map_literal_survives() {
        let schema = Schema::new("Node", None, "id").unwrap();
        let text = schema.render(PAGERANK).unwrap();
        assert!(text.contains("dampingFactor: $dampingFactor"));
        assert!(text.contains("RETURN n.`id` AS node, score"));
    }
}
