//! End-to-end dataset loading.
//!
//! Drives the stages in order — edge-list load, adjacency build, row
//! normalization, optional feature load — each a pure transformation
//! producing a new immutable artifact. Independent datasets can therefore
//! be processed in parallel runs with no shared state.

use tracing::info;

use crate::adjacency::{build_adjacency, normalize, NormalizedAdjacency};
use crate::config::DatasetConfig;
use crate::edgelist::{read_edge_list, NodeIndex};
use crate::error::PrepResult;
use crate::features::FeatureDataset;

/// A fully loaded dataset: the normalized adjacency and, when configured,
/// the node feature matrix.
#[derive(Debug)]
pub struct LoadedDataset {
    pub name: String,
    pub adjacency: NormalizedAdjacency,
    pub features: Option<FeatureDataset>,
}

/// Run the pipeline for one dataset: load → build → normalize.
///
/// Raw ids are expected to be 0-based and contiguous over
/// `config.num_nodes`; use [`load_dataset_with_index`] for remapped ids.
pub fn load_dataset(config: &DatasetConfig) -> PrepResult<LoadedDataset> {
    let index = NodeIndex::contiguous(config.num_nodes);
    load_dataset_with_index(config, &index)
}

/// Run the pipeline with an explicit raw-id mapping.
pub fn load_dataset_with_index(
    config: &DatasetConfig,
    index: &NodeIndex,
) -> PrepResult<LoadedDataset> {
    info!(dataset = %config.name, nodes = config.num_nodes, "loading dataset");

    let edges = read_edge_list(&config.edge_list, index)?;
    let adj = build_adjacency(config.num_nodes, &edges)?;
    let adjacency = normalize(config.num_nodes, adj)?;

    let features = match &config.features {
        Some(path) => Some(FeatureDataset::load(path)?),
        None => None,
    };

    info!(
        dataset = %config.name,
        nnz = adjacency.coo().nnz(),
        "dataset loaded"
    );
    Ok(LoadedDataset {
        name: config.name.clone(),
        adjacency,
        features,
    })
}
