use crate::engine::integration::{IntegrationMethod, SamplingMode};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Unsupported {name} '{value}'. Choose {expected}.")]
    InvalidArgument {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// How the mean-force samples are turned into an integrable curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitType {
    Polynomial,
    Spline,
    /// No fit: integrate the samples directly.
    Raw,
}

impl FromStr for FitType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poly" | "polynomial" => Ok(FitType::Polynomial),
            "spline" => Ok(FitType::Spline),
            "raw" => Ok(FitType::Raw),
            _ => Err(ConfigError::InvalidArgument {
                name: "fit type",
                value: s.to_string(),
                expected: "'poly', 'spline' or 'raw'",
            }),
        }
    }
}

impl fmt::Display for FitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FitType::Polynomial => "poly",
            FitType::Spline => "spline",
            FitType::Raw => "raw",
        };
        f.write_str(name)
    }
}

/// A fit type with its parameters resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveModel {
    Polynomial { degree: usize },
    Spline,
    Raw,
}

impl CurveModel {
    /// Legend text used for the fitted curve.
    pub fn label(&self) -> String {
        match self {
            CurveModel::Polynomial { degree } => format!("{}-degree poly", degree),
            CurveModel::Spline => "Spline fit".to_string(),
            CurveModel::Raw => "Raw data".to_string(),
        }
    }

    fn suffix_stem(&self) -> String {
        match self {
            CurveModel::Polynomial { degree } => format!("poly{}", degree),
            CurveModel::Spline => "spline".to_string(),
            CurveModel::Raw => "raw".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationConfig {
    pub model: CurveModel,
    pub method: IntegrationMethod,
    pub sampling: SamplingMode,
    pub invert_axis: bool,
}

impl IntegrationConfig {
    /// Suffix shared by the output artifacts of a run, e.g. `poly3_dense` or `spline_rval`.
    pub fn filename_suffix(&self) -> String {
        format!("{}_{}", self.model.suffix_stem(), self.sampling.tag())
    }
}

#[derive(Default)]
pub struct IntegrationConfigBuilder {
    fit_type: Option<FitType>,
    degree: Option<usize>,
    method: Option<IntegrationMethod>,
    dense: Option<bool>,
    invert_axis: Option<bool>,
}

impl IntegrationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit_type(mut self, fit_type: FitType) -> Self {
        self.fit_type = Some(fit_type);
        self
    }
    pub fn degree(mut self, degree: usize) -> Self {
        self.degree = Some(degree);
        self
    }
    pub fn method(mut self, method: IntegrationMethod) -> Self {
        self.method = Some(method);
        self
    }
    pub fn dense(mut self, dense: bool) -> Self {
        self.dense = Some(dense);
        self
    }
    pub fn invert_axis(mut self, invert: bool) -> Self {
        self.invert_axis = Some(invert);
        self
    }

    /// Validates the options.
    ///
    /// The polynomial degree is only required for polynomial fits, and the raw mode always
    /// integrates with the trapezoidal rule regardless of the requested method.
    pub fn build(self) -> Result<IntegrationConfig, ConfigError> {
        let fit_type = self
            .fit_type
            .ok_or(ConfigError::MissingParameter("fit_type"))?;
        let model = match fit_type {
            FitType::Polynomial => {
                let degree = self.degree.ok_or(ConfigError::MissingParameter("degree"))?;
                if degree < 1 {
                    return Err(ConfigError::InvalidParameter {
                        name: "degree",
                        reason: "polynomial degree must be >= 1".to_string(),
                    });
                }
                CurveModel::Polynomial { degree }
            }
            FitType::Spline => CurveModel::Spline,
            FitType::Raw => CurveModel::Raw,
        };
        let method = match model {
            CurveModel::Raw => IntegrationMethod::Trapezoid,
            _ => self.method.ok_or(ConfigError::MissingParameter("method"))?,
        };
        let dense = self.dense.ok_or(ConfigError::MissingParameter("dense"))?;

        Ok(IntegrationConfig {
            model,
            method,
            sampling: SamplingMode::from_dense(dense),
            invert_axis: self.invert_axis.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationConfig {
    /// Labels of the atoms to move, e.g. `["O35", "H21", "H22"]`.
    pub atom_labels: Vec<String>,
    /// Number of intermediate images between the two endpoints.
    pub num_images: usize,
}

impl InterpolationConfig {
    /// Total number of images written, endpoints included.
    pub fn total_images(&self) -> usize {
        self.num_images + 2
    }
}

#[derive(Default)]
pub struct InterpolationConfigBuilder {
    atom_labels: Option<Vec<String>>,
    num_images: Option<usize>,
}

impl InterpolationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom_labels(mut self, labels: Vec<String>) -> Self {
        self.atom_labels = Some(labels);
        self
    }
    pub fn num_images(mut self, n: usize) -> Self {
        self.num_images = Some(n);
        self
    }

    pub fn build(self) -> Result<InterpolationConfig, ConfigError> {
        let atom_labels: Vec<String> = self
            .atom_labels
            .ok_or(ConfigError::MissingParameter("atom_labels"))?
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if atom_labels.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "atom_labels",
                reason: "at least one atom label is required".to_string(),
            });
        }
        let num_images = self
            .num_images
            .ok_or(ConfigError::MissingParameter("num_images"))?;
        if num_images == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "num_images",
                reason: "at least one intermediate image is required".to_string(),
            });
        }
        Ok(InterpolationConfig {
            atom_labels,
            num_images,
        })
    }
}

/// Splits a comma-separated atom list such as `"O35, H21,H22"`.
pub fn parse_atom_labels(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
