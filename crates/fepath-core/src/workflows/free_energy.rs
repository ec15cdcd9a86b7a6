use crate::core::models::dataset::{Dataset, MIN_DATA_POINTS};
use crate::core::models::profile::{IntegralProfile, ProfilePoint};
use crate::engine::config::{CurveModel, IntegrationConfig};
use crate::engine::error::EngineError;
use crate::engine::fitting::{self, FitSpec, FittedCurve};
use crate::engine::integration::{self, DENSE_GRID_POINTS, IntegrationMethod, linspace};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct FreeEnergyResult {
    /// Cumulative integral, shifted so that its minimum is `0.0`.
    pub profile: IntegralProfile,
    /// `None` in raw mode.
    pub curve: Option<FittedCurve>,
    /// The fitted curve on [`DENSE_GRID_POINTS`] points over the data range; empty in raw mode.
    pub curve_samples: Vec<ProfilePoint>,
    pub label: String,
    pub filename_suffix: String,
    pub method: IntegrationMethod,
    pub invert_axis: bool,
}

impl FreeEnergyResult {
    /// Highest point of the normalized profile.
    pub fn barrier(&self) -> Option<ProfilePoint> {
        self.profile.peak()
    }
}

#[instrument(skip_all, name = "free_energy_workflow")]
pub fn run(
    dataset: &Dataset,
    config: &IntegrationConfig,
    reporter: &ProgressReporter,
) -> Result<FreeEnergyResult, EngineError> {
    if dataset.len() < MIN_DATA_POINTS {
        return Err(EngineError::InsufficientData {
            found: dataset.len(),
            required: MIN_DATA_POINTS,
        });
    }
    let xs = dataset.coordinates();
    let ys = dataset.values();

    reporter.report(Progress::StageStart { name: "Fitting" });
    let curve = match config.model {
        CurveModel::Polynomial { degree } => Some(fitting::fit(&xs, &ys, FitSpec::Polynomial { degree })?),
        CurveModel::Spline => Some(fitting::fit(&xs, &ys, FitSpec::Spline)?),
        CurveModel::Raw => None,
    };
    reporter.report(Progress::StageFinish);

    reporter.report(Progress::StageStart { name: "Integration" });
    let raw_profile = match &curve {
        Some(curve) => integration::integrate_curve(curve, &xs, config.method, config.sampling)?,
        None => integration::integrate_samples(&xs, &ys)?,
    };
    let profile = raw_profile.normalized();
    reporter.report(Progress::StageFinish);

    let curve_samples = match (&curve, dataset.coordinate_range()) {
        (Some(curve), Some((lo, hi))) => linspace(lo, hi, DENSE_GRID_POINTS)
            .into_iter()
            .map(|coordinate| ProfilePoint {
                coordinate,
                value: curve.evaluate(coordinate),
            })
            .collect(),
        _ => Vec::new(),
    };
    debug!("Sampled the fitted curve at {} point(s).", curve_samples.len());

    info!(
        "Integrated {} data point(s) with {} ({}) into {} profile point(s).",
        dataset.len(),
        config.model.label(),
        config.method,
        profile.len()
    );

    Ok(FreeEnergyResult {
        profile,
        curve,
        curve_samples,
        label: config.model.label(),
        filename_suffix: config.filename_suffix(),
        method: config.method,
        invert_axis: config.invert_axis,
    })
}
