//! CLI commands module.

mod points;
mod run;
mod util;

pub use points::PointsCommand;
pub use run::RunCommand;

pub(crate) use util::*;
