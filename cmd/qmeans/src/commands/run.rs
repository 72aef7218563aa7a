//! Clustering command.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use qmeans_kmeans::{ClusterResult, Config, KMeans, SequenceKind};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{load_document, output_result};
use crate::Cli;
use crate::load::{InputOptions, load};

/// Cluster a dataset file.
///
/// Settings come from an optional YAML/JSON run file; flags override it.
#[derive(Args)]
pub struct RunCommand {
    /// Dataset file (.csv, .tsv or .json)
    input: PathBuf,

    /// Run file with clustering and input settings (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of clusters
    #[arg(short = 'k', long)]
    k: Option<usize>,

    /// Convergence tolerance on centroid movement
    #[arg(long)]
    tolerance: Option<f64>,

    /// Iteration cap per restart
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Number of restarts; the lowest-dispersion run is kept
    #[arg(short = 'r', long)]
    restarts: Option<usize>,

    /// Seeding sequence (sobol or halton)
    #[arg(long)]
    sequence: Option<SequenceKind>,

    /// Comma-separated zero-based columns to use (default: all)
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<usize>>,

    /// CSV field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Treat the first CSV row as data
    #[arg(long)]
    no_header: bool,
}

/// Run file format.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunFile {
    #[serde(flatten)]
    pub kmeans: Config,

    pub input: InputOptions,
}

/// What `qmeans run` prints.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub input: String,
    pub observations: usize,
    pub features: usize,
    pub config: &'a Config,
    pub cluster_sizes: Vec<usize>,
    pub result: &'a ClusterResult,
}

impl RunCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let settings = self.settings()?;

        let data = load(&self.input, &settings.input)?;
        info!(
            input = %self.input.display(),
            observations = data.len(),
            features = data.dim(),
            "loaded dataset"
        );

        let engine = KMeans::new(settings.kmeans.clone());
        let result = engine
            .cluster(&data)
            .with_context(|| format!("cluster {}", self.input.display()))?;
        info!(
            iterations = result.iterations,
            converged = result.converged,
            dispersion = result.dispersion,
            restart = result.restart,
            "clustering finished"
        );

        let report = Report {
            input: self.input.display().to_string(),
            observations: data.len(),
            features: data.dim(),
            config: engine.config(),
            cluster_sizes: result.cluster_sizes(),
            result: &result,
        };
        output_result(&report, cli.output.as_deref(), cli.json)
    }

    /// Merges the run file (if any) with command-line overrides.
    fn settings(&self) -> anyhow::Result<RunFile> {
        let mut settings = match &self.config {
            Some(path) => load_document::<RunFile>(path)?,
            None => RunFile::default(),
        };

        let cfg = &mut settings.kmeans;
        if let Some(k) = self.k {
            cfg.k = k;
        }
        if let Some(t) = self.tolerance {
            cfg.tolerance = t;
        }
        if let Some(m) = self.max_iterations {
            cfg.max_iterations = m;
        }
        if let Some(r) = self.restarts {
            cfg.restarts = r;
        }
        if let Some(s) = self.sequence {
            cfg.sequence = s;
        }

        let input = &mut settings.input;
        if let Some(columns) = &self.columns {
            input.columns = Some(columns.clone());
        }
        if let Some(d) = self.delimiter {
            input.delimiter = Some(d);
        }
        if self.no_header {
            input.header = Some(false);
        }

        Ok(settings)
    }
}
