use nalgebra::Matrix3;

/// Number of raw header lines (comment, scale, three lattice vectors, symbols, counts).
pub const HEADER_LINE_COUNT: usize = 7;

/// One fractional-coordinate component, holding both its value and its source text.
///
/// Keeping the text lets untouched atoms be written back exactly as they were read.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateComponent {
    value: f64,
    token: String,
}

impl CoordinateComponent {
    /// Parses a text token, returning `None` if it is not a floating-point number.
    pub fn parse(token: &str) -> Option<Self> {
        token.parse::<f64>().ok().map(|value| Self {
            value,
            token: token.to_string(),
        })
    }

    /// Creates a component from a computed value using the shortest round-trip notation.
    pub fn from_value(value: f64) -> Self {
        Self {
            value,
            token: format!("{:?}", value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Position of an atom in units of the lattice vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct FractionalCoordinate {
    components: [CoordinateComponent; 3],
}

impl FractionalCoordinate {
    pub fn new(components: [CoordinateComponent; 3]) -> Self {
        Self { components }
    }

    pub fn from_values(values: [f64; 3]) -> Self {
        Self::new(values.map(CoordinateComponent::from_value))
    }

    pub fn components(&self) -> &[CoordinateComponent; 3] {
        &self.components
    }

    pub fn values(&self) -> [f64; 3] {
        [
            self.components[0].value,
            self.components[1].value,
            self.components[2].value,
        ]
    }
}

/// A single atom line of a structure file.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Species symbol followed by its 1-based index within the species block, e.g. `O35`.
    pub label: String,
    pub coordinate: FractionalCoordinate,
    /// Tokens after the three coordinates, typically selective-dynamics flags (`T T F`).
    pub extra_tokens: Vec<String>,
}

impl AtomRecord {
    /// All tokens of the atom line in output order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.coordinate
            .components
            .iter()
            .map(CoordinateComponent::token)
            .chain(self.extra_tokens.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    Direct,
    Cartesian,
}

impl CoordinateSystem {
    /// Interprets a coordinate-system marker line; anything not starting with `C` or `K` is direct.
    pub fn from_marker(line: &str) -> Self {
        match line.trim_start().chars().next() {
            Some('C' | 'c' | 'K' | 'k') => CoordinateSystem::Cartesian,
            _ => CoordinateSystem::Direct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Species {
    pub symbol: String,
    pub count: usize,
}

/// A periodic crystal structure in the POSCAR layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// The first [`HEADER_LINE_COUNT`] lines of the source file, verbatim and with their
    /// line terminators. Lines without a terminator are written with `\n`.
    pub header_lines: Vec<String>,
    pub scale: f64,
    /// Lattice vectors as rows.
    pub lattice: Matrix3<f64>,
    pub species: Vec<Species>,
    pub selective_dynamics: bool,
    pub coordinate_system: CoordinateSystem,
    pub atoms: Vec<AtomRecord>,
}

impl Structure {
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.atoms.iter().map(|a| a.label.as_str())
    }

    /// Index of the first atom carrying `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.atoms.iter().position(|a| a.label == label)
    }

    /// A new structure sharing this one's header and cell but with a different atom table.
    pub fn with_atoms(&self, atoms: Vec<AtomRecord>) -> Self {
        Self {
            header_lines: self.header_lines.clone(),
            scale: self.scale,
            lattice: self.lattice,
            species: self.species.clone(),
            selective_dynamics: self.selective_dynamics,
            coordinate_system: self.coordinate_system,
            atoms,
        }
    }
}

/// Expands species counts into per-atom labels (`Ti1`, `Ti2`, `O1`, ...).
pub fn species_labels(species: &[Species]) -> Vec<String> {
    species
        .iter()
        .flat_map(|s| (1..=s.count).map(move |i| format!("{}{}", s.symbol, i)))
        .collect()
}
