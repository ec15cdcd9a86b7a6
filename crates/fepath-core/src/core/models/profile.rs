/// One point of a cumulative integral profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub coordinate: f64,
    pub value: f64,
}

/// Running integral of a curve along the sample coordinates.
///
/// The first point always carries the integral from the first sample to itself, i.e.
/// `0.0` before normalization. Values are only meaningful up to an additive constant;
/// [`IntegralProfile::normalized`] fixes that constant so the minimum is zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegralProfile {
    points: Vec<ProfilePoint>,
}

impl IntegralProfile {
    /// Pairs coordinates with cumulative values. Extra entries of the longer slice are ignored.
    pub fn from_parts(coordinates: &[f64], values: &[f64]) -> Self {
        let points = coordinates
            .iter()
            .zip(values)
            .map(|(&coordinate, &value)| ProfilePoint { coordinate, value })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProfilePoint> {
        self.points.iter()
    }

    pub fn minimum(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::min)
    }

    /// The highest point of the profile; the first one wins on ties.
    pub fn peak(&self) -> Option<ProfilePoint> {
        self.points.iter().copied().reduce(|best, p| {
            if p.value > best.value { p } else { best }
        })
    }

    /// Shifts every value by the profile minimum so that the lowest point is exactly `0.0`.
    pub fn normalized(self) -> Self {
        let Some(min) = self.minimum() else {
            return self;
        };
        let points = self
            .points
            .into_iter()
            .map(|p| ProfilePoint {
                coordinate: p.coordinate,
                value: p.value - min,
            })
            .collect();
        Self { points }
    }
}
