//! Plot artifacts of an integration run: PNG charts and the plot data behind them.

pub mod chart;
pub mod table;

use crate::error::Result;
use fepath::core::models::dataset::Dataset;
use fepath::workflows::free_energy::FreeEnergyResult;
use std::path::{Path, PathBuf};

pub use chart::PngPlotRenderer;
pub use table::CsvPlotRenderer;

pub const FORCE_CURVE_STEM: &str = "r_vs_g";
pub const FREE_ENERGY_STEM: &str = "r_vs_tg";

/// Produces the force-curve and free-energy plot artifacts of an integration run.
pub trait PlotRenderer {
    /// Mean-force samples with their standard errors, plus the fitted curve if there is one.
    fn render_force_curve(&self, dataset: &Dataset, result: &FreeEnergyResult) -> Result<PathBuf>;

    /// The normalized free-energy profile with its barrier.
    fn render_free_energy(&self, result: &FreeEnergyResult) -> Result<PathBuf>;
}

/// `<dir>/<stem>_<suffix>.<extension>`
fn artifact_path(dir: &Path, stem: &str, result: &FreeEnergyResult, extension: &str) -> PathBuf {
    dir.join(format!("{}_{}.{}", stem, result.filename_suffix, extension))
}
