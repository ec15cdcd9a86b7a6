use crate::core::models::dataset::{DataPoint, Dataset, MIN_DATA_POINTS};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const FIELDS_PER_ROW: usize = 4;

#[derive(Debug, Error)]
pub enum ForceTableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Not enough data for integration: found {found} valid row(s), at least {required} required")]
    InsufficientData { found: usize, required: usize },
}

/// Reader for whitespace-delimited mean-force tables.
///
/// Each row is `<label> <coordinate> <mean force> <standard error>`. Malformed rows are
/// skipped with a warning rather than failing the whole file; only a table left with
/// fewer than [`MIN_DATA_POINTS`] valid rows is rejected.
pub struct ForceTable;

impl ForceTable {
    pub fn read_from(reader: &mut impl BufRead) -> Result<Dataset, ForceTableError> {
        let mut dataset = Dataset::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != FIELDS_PER_ROW {
                warn!(
                    "Skipping line {}: expected {} fields, found {}: {:?}",
                    line_num,
                    FIELDS_PER_ROW,
                    fields.len(),
                    fields
                );
                continue;
            }

            match (
                fields[1].parse::<f64>(),
                fields[2].parse::<f64>(),
                fields[3].parse::<f64>(),
            ) {
                (Ok(coordinate), Ok(value), Ok(standard_error)) => {
                    dataset.push(DataPoint::new(fields[0], coordinate, value, standard_error));
                }
                _ => {
                    warn!("Skipping invalid line {}: {:?}", line_num, fields);
                }
            }
        }

        if dataset.len() < MIN_DATA_POINTS {
            return Err(ForceTableError::InsufficientData {
                found: dataset.len(),
                required: MIN_DATA_POINTS,
            });
        }
        debug!("Read {} data point(s) from force table.", dataset.len());
        Ok(dataset)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Dataset, ForceTableError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str) -> Result<Dataset, ForceTableError> {
        ForceTable::read_from(&mut Cursor::new(text))
    }

    #[test]
    fn reads_all_valid_rows_in_order() {
        let dataset = read("img00 1.50 0.30 0.01\nimg01 1.75 0.10 0.02\nimg02 2.00 -0.20 0.01\n").unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.coordinates(), vec![1.50, 1.75, 2.00]);
        assert_eq!(dataset.values(), vec![0.30, 0.10, -0.20]);
        assert_eq!(dataset.points()[1].label, "img01");
        assert_eq!(dataset.points()[1].standard_error, 0.02);
    }

    #[test]
    fn skips_rows_with_wrong_field_count() {
        let dataset = read("# r g sem\na 1.0 2.0 0.1\nb 2.0 3.0\nc 3.0 4.0 0.1 extra\nd 4.0 5.0 0.1\n").unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.coordinates(), vec![1.0, 4.0]);
    }

    #[test]
    fn skips_rows_with_non_numeric_fields() {
        let dataset = read("a 1.0 2.0 0.1\nb two 3.0 0.1\nc 3.0 4.0 n/a\nd 4.0 5.0 0.1\n").unwrap();
        let labels: Vec<_> = dataset.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "d"]);
    }

    #[test]
    fn ignores_blank_lines() {
        let dataset = read("\n  \na 1.0 2.0 0.1\n\nb 2.0 3.0 0.1\n").unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn fewer_than_two_rows_is_fatal() {
        let err = read("a 1.0 2.0 0.1\nbad row\n").unwrap_err();
        assert!(matches!(
            err,
            ForceTableError::InsufficientData {
                found: 1,
                required: 2
            }
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ForceTable::read_from_path(dir.path().join("absent.dat")).unwrap_err();
        assert!(matches!(err, ForceTableError::Io(_)));
    }
}
