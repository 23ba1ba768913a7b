use super::ATOM_RECORD_MARKER;
use super::error::{ParseErrorKind, StructureError};
use super::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use crate::core::models::particle::ParticleModel;
use nalgebra::Point3;
use std::io::BufRead;

const X_COLUMNS: (usize, usize) = (30, 38);
const Y_COLUMNS: (usize, usize) = (38, 46);
const Z_COLUMNS: (usize, usize) = (46, 54);
const OCCUPANCY_COLUMNS: (usize, usize) = (54, 60);

/// Reader for the fixed-column atom record layout (`.pdb`).
pub struct PdbFile;

/// Returns the trimmed contents of `[start, end)`, clamped to the line length.
fn column(line: &str, start: usize, end: usize) -> Option<&str> {
    if start >= line.len() {
        return None;
    }
    line.get(start..end.min(line.len()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_column(
    line: &str,
    (start, end): (usize, usize),
    line_num: usize,
) -> Result<f64, StructureError> {
    let columns = format!("{}-{}", start + 1, end);
    let value = column(line, start, end).ok_or_else(|| StructureError::Parse {
        line: line_num,
        kind: ParseErrorKind::MissingColumns {
            columns: columns.clone(),
        },
    })?;
    value.parse().map_err(|_| StructureError::Parse {
        line: line_num,
        kind: ParseErrorKind::InvalidColumnFloat {
            columns,
            value: value.into(),
        },
    })
}

impl StructureFile for PdbFile {
    type Error = StructureError;

    fn read_from(reader: &mut impl BufRead) -> Result<ParticleModel, Self::Error> {
        let mut model = ParticleModel::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if !line.starts_with(ATOM_RECORD_MARKER) {
                continue;
            }

            let x = parse_column(&line, X_COLUMNS, line_num)?;
            let y = parse_column(&line, Y_COLUMNS, line_num)?;
            let z = parse_column(&line, Z_COLUMNS, line_num)?;
            let occupancy = parse_column(&line, OCCUPANCY_COLUMNS, line_num)?;

            model.push(AtomRecord::new(Point3::new(x, y, z), occupancy));
        }

        if model.is_empty() {
            return Err(StructureError::NoAtomRecords);
        }
        Ok(model)
    }
}
