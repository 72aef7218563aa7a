//! Sequence inspection command.

use clap::Args;
use qmeans_seq::{LowDiscrepancy, SequenceKind};
use serde::Serialize;

use super::output_result;
use crate::Cli;

/// Print points of a low-discrepancy sequence in [0, 1)^dim.
#[derive(Args)]
pub struct PointsCommand {
    /// Point dimension
    #[arg(short = 'd', long, default_value_t = 2)]
    dim: usize,

    /// Number of points to print
    #[arg(short = 'n', long, default_value_t = 16)]
    count: usize,

    /// Draws to skip before the first printed point
    #[arg(long, default_value_t = 0)]
    skip: u64,

    /// Sequence kind (sobol or halton)
    #[arg(long, default_value_t = SequenceKind::Sobol)]
    sequence: SequenceKind,
}

#[derive(Debug, Serialize)]
struct Points {
    sequence: SequenceKind,
    dimension: usize,
    /// Draw index of the first point (1-based).
    first_index: u64,
    points: Vec<Vec<f64>>,
}

impl PointsCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let points = self.generate()?;
        output_result(&points, cli.output.as_deref(), cli.json)
    }

    fn generate(&self) -> anyhow::Result<Points> {
        let mut seq = self.sequence.build(self.dim)?;
        seq.skip(self.skip);
        let first_index = seq.index() + 1;
        let points = (0..self.count).map(|_| seq.next_point().to_vec()).collect();
        Ok(Points {
            sequence: self.sequence,
            dimension: self.dim,
            first_index,
            points,
        })
    }
}
