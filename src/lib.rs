//! Graphprep — batch preprocessing of flat-text graph data.
//!
//! Ingests edge-list and adjacency-list files plus per-node feature
//! matrices, normalizes them into a canonical sparse adjacency
//! representation, and exports coordinate, compressed-row and dense views
//! for downstream graph-learning consumers.
//!
//! The pipeline is `load → build → normalize → convert`: parse edges into
//! dense node indices, symmetrize with the transpose-dominance merge and
//! unit self-loops, scale each row to sum 1, then derive the three
//! value-equivalent matrix views from the single normalized artifact.

pub mod adjacency;
pub mod adjlist;
pub mod config;
pub mod convert;
pub mod edgelist;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod sparse;

pub use adjacency::{build_adjacency, normalize, NormalizedAdjacency};
pub use adjlist::{read_adjlist, OrderedGraph};
pub use config::DatasetConfig;
pub use edgelist::{read_edge_list, NodeIndex};
pub use error::{PrepError, PrepResult};
pub use features::FeatureDataset;
pub use pipeline::{load_dataset, load_dataset_with_index, LoadedDataset};
pub use sparse::{CooMatrix, CooTensor, CsrMatrix};
