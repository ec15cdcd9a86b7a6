use crate::core::io::traits::StructureFile;
use crate::core::models::structure::{
    AtomRecord, CoordinateComponent, CoordinateSystem, FractionalCoordinate, HEADER_LINE_COUNT,
    Species, Structure, species_labels,
};
use nalgebra::Matrix3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Maximum number of tokens kept from an atom line (three coordinates plus three flags).
const MAX_ATOM_TOKENS: usize = 6;

#[derive(Debug, Error)]
pub enum PoscarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PoscarParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PoscarParseErrorKind {
    #[error("Invalid scale factor (value: '{value}')")]
    InvalidScale { value: String },
    #[error("Lattice vector needs three numeric components (value: '{value}')")]
    InvalidLatticeVector { value: String },
    #[error("Invalid atom count (value: '{value}')")]
    InvalidCount { value: String },
    #[error("Atom line needs three numeric fractional coordinates (value: '{value}')")]
    InvalidCoordinates { value: String },
}

fn parse_error(line: usize, kind: PoscarParseErrorKind) -> PoscarError {
    PoscarError::Parse { line, kind }
}

/// Reads every line with its terminator (`\n` or `\r\n`) still attached.
fn read_raw_lines(reader: &mut impl BufRead) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(lines);
        }
        lines.push(line);
    }
}

/// VASP POSCAR/CONTCAR structure format (VASP 5 layout with an element-symbol line).
pub struct PoscarFile;

impl PoscarFile {
    fn parse_scale(line: &str, line_num: usize) -> Result<f64, PoscarError> {
        line.split_whitespace()
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| {
                parse_error(
                    line_num,
                    PoscarParseErrorKind::InvalidScale {
                        value: line.trim().into(),
                    },
                )
            })
    }

    fn parse_lattice_vector(line: &str, line_num: usize) -> Result<[f64; 3], PoscarError> {
        let invalid = || {
            parse_error(
                line_num,
                PoscarParseErrorKind::InvalidLatticeVector {
                    value: line.trim().into(),
                },
            )
        };
        let values = line
            .split_whitespace()
            .take(3)
            .map(|t| t.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            &[x, y, z] => Ok([x, y, z]),
            _ => Err(invalid()),
        }
    }

    fn parse_atom_line(line: &str, line_num: usize, label: String) -> Result<AtomRecord, PoscarError> {
        let invalid = || {
            parse_error(
                line_num,
                PoscarParseErrorKind::InvalidCoordinates {
                    value: line.trim().into(),
                },
            )
        };
        let tokens: Vec<&str> = line.split_whitespace().take(MAX_ATOM_TOKENS).collect();
        if tokens.len() < 3 {
            return Err(invalid());
        }
        let component = |t: &str| CoordinateComponent::parse(t).ok_or_else(invalid);
        let coordinate = FractionalCoordinate::new([
            component(tokens[0])?,
            component(tokens[1])?,
            component(tokens[2])?,
        ]);
        Ok(AtomRecord {
            label,
            coordinate,
            extra_tokens: tokens[3..].iter().map(|t| t.to_string()).collect(),
        })
    }
}

impl StructureFile for PoscarFile {
    type Error = PoscarError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let lines = read_raw_lines(reader)?;
        if lines.len() < HEADER_LINE_COUNT {
            return Err(PoscarError::MissingRecord(format!(
                "header (expected {} lines, found {})",
                HEADER_LINE_COUNT,
                lines.len()
            )));
        }

        let scale = Self::parse_scale(&lines[1], 2)?;
        let a = Self::parse_lattice_vector(&lines[2], 3)?;
        let b = Self::parse_lattice_vector(&lines[3], 4)?;
        let c = Self::parse_lattice_vector(&lines[4], 5)?;
        let lattice = Matrix3::new(a[0], a[1], a[2], b[0], b[1], b[2], c[0], c[1], c[2]);

        let symbols: Vec<&str> = lines[5].split_whitespace().collect();
        let counts = lines[6]
            .split_whitespace()
            .map(|t| {
                t.parse::<usize>().map_err(|_| {
                    parse_error(7, PoscarParseErrorKind::InvalidCount { value: t.into() })
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if symbols.len() != counts.len() {
            return Err(PoscarError::Inconsistency(format!(
                "{} element symbol(s) but {} atom count(s)",
                symbols.len(),
                counts.len()
            )));
        }
        let species: Vec<Species> = symbols
            .iter()
            .zip(&counts)
            .map(|(symbol, &count)| Species {
                symbol: symbol.to_string(),
                count,
            })
            .collect();

        let mut cursor = HEADER_LINE_COUNT;
        let selective_dynamics = lines
            .get(cursor)
            .and_then(|l| l.chars().next())
            .is_some_and(|ch| matches!(ch, 'S' | 's'));
        if selective_dynamics {
            cursor += 1;
        }

        let marker = lines
            .get(cursor)
            .ok_or_else(|| PoscarError::MissingRecord("coordinate system line".into()))?;
        let coordinate_system = CoordinateSystem::from_marker(marker);
        cursor += 1;

        let labels = species_labels(&species);
        let mut atoms = Vec::with_capacity(labels.len());
        for (offset, label) in labels.into_iter().enumerate() {
            let index = cursor + offset;
            let line = lines.get(index).ok_or_else(|| {
                PoscarError::MissingRecord(format!("coordinates for atom {}", label))
            })?;
            atoms.push(Self::parse_atom_line(line, index + 1, label)?);
        }

        Ok(Structure {
            header_lines: lines[..HEADER_LINE_COUNT].to_vec(),
            scale,
            lattice,
            species,
            selective_dynamics,
            coordinate_system,
            atoms,
        })
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        for line in &structure.header_lines {
            writer.write_all(line.as_bytes())?;
            if !line.ends_with('\n') {
                writeln!(writer)?;
            }
        }
        if structure.selective_dynamics {
            writeln!(writer, "Selective dynamics")?;
        }
        writeln!(writer, "Direct")?;
        for atom in &structure.atoms {
            let line = atom.tokens().collect::<Vec<_>>().join(" ");
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}
