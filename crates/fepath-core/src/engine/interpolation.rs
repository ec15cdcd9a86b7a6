use crate::core::models::structure::{
    AtomRecord, CoordinateComponent, CoordinateSystem, FractionalCoordinate, Structure,
};
use crate::engine::config::InterpolationConfig;
use crate::engine::error::EngineError;
use crate::engine::integration::linspace;
use tracing::{debug, warn};

/// Which endpoint supplies the atoms that are not interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseStructure {
    Initial,
    Final,
}

/// Interpolation fractions of images `1..=n`: `n + 2` evenly spaced values over `[0, 1]`
/// with both endpoints dropped.
pub fn interpolation_fractions(num_images: usize) -> Vec<f64> {
    let all = linspace(0.0, 1.0, num_images + 2);
    all[1..=num_images].to_vec()
}

/// Base structure for the 1-based image `index` out of `num_images`.
///
/// Images up to and including `num_images / 2` keep the initial spectators.
pub fn base_for_image(index: usize, num_images: usize) -> BaseStructure {
    if index <= num_images / 2 {
        BaseStructure::Initial
    } else {
        BaseStructure::Final
    }
}

/// Subtracts 1.0 once from values that reached the upper cell boundary.
///
/// Negative values and values of 2.0 or more are left as they are.
#[inline]
pub fn wrap_once(value: f64) -> f64 {
    if value >= 1.0 { value - 1.0 } else { value }
}

#[inline]
pub fn blend(start: f64, end: f64, t: f64) -> f64 {
    wrap_once(start + t * (end - start))
}

/// Builds a new structure in which the `selected` atoms sit at fraction `t` between the
/// two endpoints.
///
/// Header, lattice and selective-dynamics flag come from `initial`; every other atom is
/// copied from the structure chosen by `base`. Callers guarantee that `selected` indexes
/// valid atoms of both structures.
pub fn interpolate(
    initial: &Structure,
    final_structure: &Structure,
    selected: &[usize],
    t: f64,
    base: BaseStructure,
) -> Structure {
    let mut atoms: Vec<AtomRecord> = match base {
        BaseStructure::Initial => initial.atoms.clone(),
        BaseStructure::Final => final_structure.atoms.clone(),
    };

    for &index in selected {
        let start = initial.atoms[index].coordinate.values();
        let end = final_structure.atoms[index].coordinate.values();
        let components = [0, 1, 2].map(|c| CoordinateComponent::from_value(blend(start[c], end[c], t)));
        atoms[index].coordinate = FractionalCoordinate::new(components);
    }

    initial.with_atoms(atoms)
}

/// Two validated endpoint structures and the atoms to move between them.
#[derive(Debug, Clone)]
pub struct InterpolationPlan {
    initial: Structure,
    final_structure: Structure,
    selected: Vec<usize>,
    num_images: usize,
}

impl InterpolationPlan {
    /// Validates the endpoints against `config`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnsupportedCoordinates`] if either structure is Cartesian.
    /// - [`EngineError::StructureMismatch`] if the atom counts differ.
    /// - [`EngineError::AtomNotFound`] for a label absent from the initial structure.
    pub fn new(
        initial: Structure,
        final_structure: Structure,
        config: &InterpolationConfig,
    ) -> Result<Self, EngineError> {
        if initial.coordinate_system == CoordinateSystem::Cartesian {
            return Err(EngineError::UnsupportedCoordinates { which: "initial" });
        }
        if final_structure.coordinate_system == CoordinateSystem::Cartesian {
            return Err(EngineError::UnsupportedCoordinates { which: "final" });
        }
        if initial.atom_count() != final_structure.atom_count() {
            return Err(EngineError::StructureMismatch(format!(
                "initial has {} atoms, final has {}",
                initial.atom_count(),
                final_structure.atom_count()
            )));
        }

        let mut selected = Vec::with_capacity(config.atom_labels.len());
        for label in &config.atom_labels {
            let index = initial
                .index_of(label)
                .ok_or_else(|| EngineError::AtomNotFound {
                    label: label.clone(),
                })?;
            let counterpart = &final_structure.atoms[index].label;
            if counterpart != label {
                warn!(
                    "Atom {} of the initial structure is labelled {} in the final structure.",
                    label, counterpart
                );
            }
            debug!("Selected atom {} at index {}.", label, index);
            selected.push(index);
        }

        Ok(Self {
            initial,
            final_structure,
            selected,
            num_images: config.num_images,
        })
    }

    pub fn initial(&self) -> &Structure {
        &self.initial
    }

    pub fn final_structure(&self) -> &Structure {
        &self.final_structure
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn num_images(&self) -> usize {
        self.num_images
    }

    /// The intermediate images in order, as `(1-based index, fraction, base, structure)`.
    pub fn images(&self) -> impl Iterator<Item = (usize, f64, BaseStructure, Structure)> + '_ {
        interpolation_fractions(self.num_images)
            .into_iter()
            .enumerate()
            .map(move |(i, t)| {
                let index = i + 1;
                let base = base_for_image(index, self.num_images);
                let structure =
                    interpolate(&self.initial, &self.final_structure, &self.selected, t, base);
                (index, t, base, structure)
            })
    }
}
