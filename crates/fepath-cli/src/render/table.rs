use super::{FORCE_CURVE_STEM, FREE_ENERGY_STEM, PlotRenderer, artifact_path};
use crate::error::Result;
use anyhow::Context;
use fepath::core::models::dataset::Dataset;
use fepath::workflows::free_energy::FreeEnergyResult;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct ForceRow<'a> {
    series: &'a str,
    r: f64,
    g: f64,
    #[serde(rename = "std-error")]
    std_error: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ProfileRow {
    r: f64,
    tg: f64,
}

/// Writes plot data as CSV files named `r_vs_g_<suffix>.csv` and `r_vs_tg_<suffix>.csv`.
///
/// Lines starting with `#` carry plot annotations (axis direction, barrier).
pub struct CsvPlotRenderer {
    output_dir: PathBuf,
}

impl CsvPlotRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn create(path: &Path, result: &FreeEnergyResult) -> anyhow::Result<BufWriter<File>> {
        let mut writer = BufWriter::new(File::create(path)?);
        if result.invert_axis {
            writeln!(writer, "# x-axis: inverted")?;
        }
        Ok(writer)
    }
}

impl PlotRenderer for CsvPlotRenderer {
    fn render_force_curve(&self, dataset: &Dataset, result: &FreeEnergyResult) -> Result<PathBuf> {
        let path = artifact_path(&self.output_dir, FORCE_CURVE_STEM, result, "csv");
        let write = || -> anyhow::Result<()> {
            let mut csv = csv::Writer::from_writer(Self::create(&path, result)?);
            for point in dataset.points() {
                csv.serialize(ForceRow {
                    series: "Data",
                    r: point.coordinate,
                    g: point.value,
                    std_error: Some(point.standard_error),
                })?;
            }
            for sample in &result.curve_samples {
                csv.serialize(ForceRow {
                    series: &result.label,
                    r: sample.coordinate,
                    g: sample.value,
                    std_error: None,
                })?;
            }
            csv.flush()?;
            Ok(())
        };
        write().with_context(|| format!("Failed to write force curve to {}", path.display()))?;
        Ok(path)
    }

    fn render_free_energy(&self, result: &FreeEnergyResult) -> Result<PathBuf> {
        let path = artifact_path(&self.output_dir, FREE_ENERGY_STEM, result, "csv");
        let write = || -> anyhow::Result<()> {
            let mut writer = Self::create(&path, result)?;
            writeln!(writer, "# series: {}", result.label)?;
            if let Some(barrier) = result.barrier() {
                writeln!(
                    writer,
                    "# barrier: {:.3} eV at r = {:.4}",
                    barrier.value, barrier.coordinate
                )?;
            }
            let mut csv = csv::Writer::from_writer(writer);
            for point in result.profile.iter() {
                csv.serialize(ProfileRow {
                    r: point.coordinate,
                    tg: point.value,
                })?;
            }
            csv.flush()?;
            Ok(())
        };
        write().with_context(|| format!("Failed to write free-energy profile to {}", path.display()))?;
        Ok(path)
    }
}
