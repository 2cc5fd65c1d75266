//! Graph algorithm commands.

use anyhow::Result;
use clap::Subcommand;
use nxneo_graph::GraphHandle;

use super::parse_id;
use crate::output;

#[derive(Subcommand)]
pub enum AlgoCommands {
    /// Betweenness centrality per node
    Betweenness,

    /// Closeness centrality per node
    Closeness {
        /// Wasserman-Faust normalization
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        wf_improved: bool,
    },

    /// Harmonic centrality per node
    Harmonic,

    /// PageRank per node
    Pagerank {
        /// Damping factor
        #[arg(long, default_value_t = 0.85)]
        alpha: f64,
        /// Iteration limit
        #[arg(long, default_value_t = 20)]
        max_iter: u32,
    },

    /// Triangle count per node
    Triangles,

    /// Local clustering coefficient per node
    Clustering,

    /// Mean clustering coefficient
    AverageClustering,

    /// Communities by label propagation
    LabelPropagation,

    /// Connected components
    Components,

    /// Shortest path between two nodes
    ShortestPath {
        source: String,
        target: String,
        /// Relationship property to minimise
        #[arg(long)]
        weight: Option<String>,
    },
}

pub async fn execute(graph: &GraphHandle, cmd: AlgoCommands) -> Result<()> {
    if !graph.has_relationship_type() {
        output::print_edges_disabled();
    }

    match cmd {
        AlgoCommands::Betweenness => output::print_scores("Betweenness", &graph.betweenness_centrality().await?),
        AlgoCommands::Closeness { wf_improved } => {
            output::print_scores("Closeness", &graph.closeness_centrality(wf_improved).await?)
        }
        AlgoCommands::Harmonic => output::print_scores("Harmonic", &graph.harmonic_centrality().await?),
        AlgoCommands::Pagerank { alpha, max_iter } => {
            output::print_scores("PageRank", &graph.pagerank(alpha, max_iter).await?)
        }
        AlgoCommands::Triangles => output::print_scores("Triangles", &graph.triangles().await?),
        AlgoCommands::Clustering => output::print_scores("Clustering", &graph.clustering().await?),
        AlgoCommands::AverageClustering => {
            output::print_scalar("Average clustering", graph.average_clustering().await?)
        }
        AlgoCommands::LabelPropagation => {
            output::print_communities("Communities", &graph.label_propagation().await?)
        }
        AlgoCommands::Components => output::print_communities("Components", &graph.connected_components().await?),
        AlgoCommands::ShortestPath { source, target, weight } => {
            let (source, target) = (parse_id(&source), parse_id(&target));
            let path = match weight {
                Some(weight) => graph.shortest_weighted_path(source, target, &weight).await?,
                None => graph.shortest_path(source, target).await?,
            };
            output::print_path(&path)
        }
    }

    Ok(())
}
