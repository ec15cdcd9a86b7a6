use super::{FORCE_CURVE_STEM, FREE_ENERGY_STEM, PlotRenderer, artifact_path};
use crate::error::Result;
use anyhow::Context;
use fepath::core::models::dataset::Dataset;
use fepath::workflows::free_energy::FreeEnergyResult;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

const IMAGE_SIZE: (u32, u32) = (800, 800);
const FONT: &str = "sans-serif";
/// Upper G limit of the profile chart unless the profile rises above it.
const PROFILE_Y_MAX: f64 = 2.0;
const ERROR_BAR_WIDTH: u32 = 10;

/// Maps reaction coordinates onto the chart x-axis, mirrored when the axis is inverted.
///
/// An inverted axis is drawn on negated coordinates with negated tick labels, so the
/// chart reads from right to left.
#[derive(Debug, Clone, Copy)]
struct AxisMap {
    inverted: bool,
}

impl AxisMap {
    fn new(inverted: bool) -> Self {
        Self { inverted }
    }

    fn to_chart(self, coordinate: f64) -> f64 {
        if self.inverted { -coordinate } else { coordinate }
    }

    fn tick_label(self, x: f64) -> String {
        format!("{:.2}", self.to_chart(x))
    }

    fn range(self, lo: f64, hi: f64) -> Range<f64> {
        let (a, b) = (self.to_chart(lo), self.to_chart(hi));
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let pad = ((hi - lo) * 0.05).max(1e-3);
        (lo - pad)..(hi + pad)
    }
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    let pad = ((hi - lo) * 0.1).max(1e-3);
    (lo - pad)..(hi + pad)
}

/// Draws the charts as PNG files named `r_vs_g_<suffix>.png` and `r_vs_tg_<suffix>.png`.
pub struct PngPlotRenderer {
    output_dir: PathBuf,
}

impl PngPlotRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn draw_force_curve(path: &Path, dataset: &Dataset, result: &FreeEnergyResult) -> anyhow::Result<()> {
        let axis = AxisMap::new(result.invert_axis);
        let x_labels = |x: &f64| axis.tick_label(*x);
        let (lo, hi) = dataset
            .coordinate_range()
            .context("no data points to plot")?;

        let y_values = dataset
            .points()
            .iter()
            .flat_map(|p| [p.value - p.standard_error, p.value + p.standard_error])
            .chain(result.curve_samples.iter().map(|s| s.value))
            .chain(std::iter::once(0.0));
        let (y_lo, y_hi) = y_values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

        let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption("r vs g", (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(axis.range(lo, hi), padded(y_lo, y_hi))?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Coordinate")
            .y_desc("Mean Force (eV/Å)")
            .x_label_formatter(&x_labels)
            .draw()?;

        chart
            .draw_series(dataset.points().iter().map(|p| {
                ErrorBar::new_vertical(
                    axis.to_chart(p.coordinate),
                    p.value - p.standard_error,
                    p.value,
                    p.value + p.standard_error,
                    BLACK.stroke_width(1),
                    ERROR_BAR_WIDTH,
                )
            }))?
            .label("r vs g (with SEM)")
            .legend(|(x, y)| Circle::new((x + 10, y), 4, BLACK.stroke_width(1)));

        if !result.curve_samples.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    result
                        .curve_samples
                        .iter()
                        .map(|s| (axis.to_chart(s.coordinate), s.value)),
                    RED.stroke_width(2),
                ))?
                .label(result.label.as_str())
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
        }

        let x_span = axis.range(lo, hi);
        chart
            .draw_series(DashedLineSeries::new(
                vec![(x_span.start, 0.0), (x_span.end, 0.0)],
                8,
                6,
                BLACK.stroke_width(1),
            ))?
            .label("g = 0")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 16))
            .draw()?;
        root.present()?;
        Ok(())
    }

    fn draw_free_energy(path: &Path, result: &FreeEnergyResult) -> anyhow::Result<()> {
        let axis = AxisMap::new(result.invert_axis);
        let x_labels = |x: &f64| axis.tick_label(*x);
        let (lo, hi) = result
            .profile
            .iter()
            .map(|p| p.coordinate)
            .fold(None, |acc: Option<(f64, f64)>, x| match acc {
                None => Some((x, x)),
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            })
            .context("empty free-energy profile")?;
        let barrier = result.barrier();
        let y_max = barrier.map_or(PROFILE_Y_MAX, |b| PROFILE_Y_MAX.max(b.value * 1.1));

        let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(axis.range(lo, hi), 0.0..y_max)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Reaction Coordinate")
            .y_desc("G (eV)")
            .x_label_formatter(&x_labels)
            .draw()?;

        let points: Vec<(f64, f64)> = result
            .profile
            .iter()
            .map(|p| (axis.to_chart(p.coordinate), p.value))
            .collect();
        chart.draw_series(LineSeries::new(points.iter().copied(), BLACK.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 4, BLACK.filled())),
        )?;

        if let Some(barrier) = barrier {
            chart.draw_series(std::iter::once(
                EmptyElement::at((axis.to_chart(barrier.coordinate), barrier.value))
                    + Text::new(
                        format!("{:.3} eV", barrier.value),
                        (8, -24),
                        (FONT, 18).into_font(),
                    ),
            ))?;
        }
        root.present()?;
        Ok(())
    }
}

impl PlotRenderer for PngPlotRenderer {
    fn render_force_curve(&self, dataset: &Dataset, result: &FreeEnergyResult) -> Result<PathBuf> {
        let path = artifact_path(&self.output_dir, FORCE_CURVE_STEM, result, "png");
        Self::draw_force_curve(&path, dataset, result)
            .with_context(|| format!("Failed to draw force curve to {}", path.display()))?;
        Ok(path)
    }

    fn render_free_energy(&self, result: &FreeEnergyResult) -> Result<PathBuf> {
        let path = artifact_path(&self.output_dir, FREE_ENERGY_STEM, result, "png");
        Self::draw_free_energy(&path, result)
            .with_context(|| format!("Failed to draw free-energy profile to {}", path.display()))?;
        Ok(path)
    }
}
