//! Graphprep CLI — batch graph preprocessing from the command line.
//!
//! Each subcommand is one file-to-file (or file-to-report) transform; a
//! failed parse aborts the run with a nonzero exit code.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use graphprep::{convert, load_dataset, DatasetConfig, OrderedGraph};

#[derive(Parser)]
#[command(name = "graphprep", version, about = "Batch graph preprocessing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline for a dataset described by a JSON config
    Build {
        /// Dataset config file (name, num_nodes, edge_list, features)
        config: PathBuf,

        /// Also materialize the dense view and report its shape
        #[arg(long)]
        dense: bool,
    },
    /// Expand an adjacency-list file into an edge-list file
    Adj2edge {
        input: PathBuf,
        output: PathBuf,

        /// Header lines to skip before the first node line
        #[arg(long, default_value_t = 0)]
        skip_rows: usize,
    },
    /// Merge two adjacency-list files into one graph
    Merge {
        first: PathBuf,
        second: PathBuf,

        /// Merged adjacency-list output
        out_adjlist: PathBuf,

        /// Merged edge-list output
        out_edgelist: PathBuf,
    },
    /// Re-order an embedding file by node id
    ReorderEmbeddings {
        input: PathBuf,
        output: PathBuf,
    },
    /// Convert a CSV feature matrix to whitespace-delimited text
    Csv2txt {
        input: PathBuf,
        output: PathBuf,
    },
    /// Load an adjacency-list file and report its diagnostic counts
    Inspect {
        input: PathBuf,

        /// Header lines to skip before the first node line
        #[arg(long, default_value_t = 0)]
        skip_rows: usize,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Build { config, dense } => {
            let config = DatasetConfig::from_file(&config)
                .with_context(|| format!("reading config {}", config.display()))?;
            let loaded = load_dataset(&config)
                .with_context(|| format!("building dataset {}", config.name))?;

            let tensor = loaded.adjacency.tensor();
            println!(
                "{}: {} nodes, {} nonzeros",
                loaded.name,
                loaded.adjacency.node_count(),
                tensor.nnz()
            );
            if let Some(features) = &loaded.features {
                println!("features: {} rows x {} dims", features.len(), features.dim());
            }
            if dense {
                let dense = loaded.adjacency.dense();
                println!("dense view: {} x {}", dense.nrows(), dense.ncols());
            }
        }
        Commands::Adj2edge { input, output, skip_rows } => {
            let count = convert::adjlist_to_edgelist(&input, &output, skip_rows)?;
            println!("{} edges written to {}", count, output.display());
        }
        Commands::Merge { first, second, out_adjlist, out_edgelist } => {
            let stats = convert::merge_adjlists(&first, &second, &out_adjlist, &out_edgelist)?;
            println!("merged: {} nodes, {} edges", stats.nodes, stats.edges);
        }
        Commands::ReorderEmbeddings { input, output } => {
            let rows = convert::reorder_embeddings(&input, &output)?;
            println!("{} rows written to {}", rows, output.display());
        }
        Commands::Csv2txt { input, output } => {
            let rows = convert::csv_to_txt(&input, &output)?;
            println!("{} rows written to {}", rows, output.display());
        }
        Commands::Inspect { input, skip_rows } => {
            let graph = OrderedGraph::load(&input, skip_rows)?;
            println!(
                "{}: {} nodes, {} directed edge pairs (symmetric, self-looped)",
                input.display(),
                graph.node_count(),
                graph.edge_count()
            );
        }
    }
    Ok(())
}
