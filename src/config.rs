//! Per-dataset configuration.
//!
//! Which graph to load, how many nodes it has and where its files live is
//! explicit configuration handed to the pipeline, never process-wide state.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, PrepResult};

/// Configuration for one named dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Dataset name, e.g. "bio72" or "dpwk"
    pub name: String,
    /// Fixed node count; never inferred from the files
    pub num_nodes: usize,
    /// Edge-list file path
    pub edge_list: PathBuf,
    /// Optional feature file path
    #[serde(default)]
    pub features: Option<PathBuf>,
}

impl DatasetConfig {
    /// Read a dataset configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> PrepResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PrepError::io(path, e))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| {
            PrepError::format(path, e.line(), format!("invalid dataset config: {}", e))
        })
    }
}
