/// Smallest number of samples that can be integrated.
pub const MIN_DATA_POINTS: usize = 2;

/// A single mean-force sample along the reaction coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    /// Free-form identifier of the sample (usually the image name).
    pub label: String,
    /// Position on the reaction coordinate.
    pub coordinate: f64,
    /// Mean force at `coordinate`.
    pub value: f64,
    /// Standard error of `value`.
    pub standard_error: f64,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, coordinate: f64, value: f64, standard_error: f64) -> Self {
        Self {
            label: label.into(),
            coordinate,
            value,
            standard_error,
        }
    }
}

/// An ordered collection of [`DataPoint`]s.
///
/// The order is the order in which the samples were read. It is not required to be
/// sorted by coordinate, and the raw integration mode depends on this order being kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    points: Vec<DataPoint>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<DataPoint>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: DataPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn coordinates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.coordinate).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn standard_errors(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.standard_error).collect()
    }

    /// Returns `(min, max)` of the coordinates, or `None` for an empty dataset.
    pub fn coordinate_range(&self) -> Option<(f64, f64)> {
        coordinate_range(self.points.iter().map(|p| p.coordinate))
    }
}

pub(crate) fn coordinate_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
    })
}
