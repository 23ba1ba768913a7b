use super::ATOM_RECORD_MARKER;
use super::error::{ParseErrorKind, StructureError};
use super::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use crate::core::models::particle::ParticleModel;
use nalgebra::Point3;
use std::io::BufRead;

const X_TOKEN: usize = 9;
const Y_TOKEN: usize = 10;
const Z_TOKEN: usize = 11;
const OCCUPANCY_TOKEN: usize = 12;

/// Reader for the whitespace-tokenized atom-site layout (`.cif`).
///
/// Each `ATOM` line is split on whitespace; fields 9, 10 and 11 (0-indexed) hold the
/// Cartesian coordinates and field 12 the occupancy.
pub struct CifFile;

fn parse_token(tokens: &[&str], index: usize, line: usize) -> Result<f64, StructureError> {
    let value = tokens[index];
    value.parse().map_err(|_| StructureError::Parse {
        line,
        kind: ParseErrorKind::InvalidTokenFloat {
            index,
            value: value.into(),
        },
    })
}

impl StructureFile for CifFile {
    type Error = StructureError;

    fn read_from(reader: &mut impl BufRead) -> Result<ParticleModel, Self::Error> {
        let mut model = ParticleModel::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if !line.starts_with(ATOM_RECORD_MARKER) {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() <= OCCUPANCY_TOKEN {
                return Err(StructureError::Parse {
                    line: line_num,
                    kind: ParseErrorKind::MissingToken {
                        expected: OCCUPANCY_TOKEN + 1,
                        found: tokens.len(),
                    },
                });
            }

            let x = parse_token(&tokens, X_TOKEN, line_num)?;
            let y = parse_token(&tokens, Y_TOKEN, line_num)?;
            let z = parse_token(&tokens, Z_TOKEN, line_num)?;
            let occupancy = parse_token(&tokens, OCCUPANCY_TOKEN, line_num)?;

            model.push(AtomRecord::new(Point3::new(x, y, z), occupancy));
        }

        if model.is_empty() {
            return Err(StructureError::NoAtomRecords);
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    const SAMPLE: &str = "\
data_model
loop_
_atom_site.group_PDB
_atom_site.id
_atom_site.type_symbol
_atom_site.label_atom_id
_atom_site.label_alt_id
_atom_site.label_comp_id
_atom_site.label_asym_id
_atom_site.label_entity_id
_atom_site.label_seq_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
_atom_site.occupancy
ATOM 1 C CA . ASP A 1 1 10.500 -3.250 7.000 1.00
ATOM 2 C CA . ASP A 1 2 11.000 -2.000 6.500 0.80
HETATM 3 O O . HOH B 2 1 0.000 0.000 0.000 1.00
ATOM 3 C CA . ASP A 1 3 12.125 -1.500 6.000 0.40
";

    fn read(content: &str) -> Result<ParticleModel, StructureError> {
        let mut reader = BufReader::new(Cursor::new(content));
        CifFile::read_from(&mut reader)
    }

    #[test]
    fn reads_coordinates_and_occupancy_from_fixed_tokens() {
        let model = read(SAMPLE).unwrap();

        assert_eq!(model.len(), 3);
        assert_eq!(model.coordinates()[0], Point3::new(10.5, -3.25, 7.0));
        assert_eq!(model.coordinates()[2], Point3::new(12.125, -1.5, 6.0));
        assert_eq!(model.occupancies(), &[1.0, 0.8, 0.4]);
    }

    #[test]
    fn non_atom_lines_are_ignored() {
        let model = read(SAMPLE).unwrap();
        assert!(
            model
                .coordinates()
                .iter()
                .all(|p| *p != Point3::new(0.0, 0.0, 0.0))
        );
    }

    #[test]
    fn file_without_atom_records_is_an_error() {
        let result = read("data_model\nloop_\n_atom_site.id\n");
        assert!(matches!(result, Err(StructureError::NoAtomRecords)));
    }

    #[test]
    fn short_atom_line_reports_missing_token() {
        let result = read("ATOM 1 C CA . ASP A 1 1 1.0 2.0\n");
        match result {
            Err(StructureError::Parse { line, kind }) => {
                assert_eq!(line, 1);
                assert_eq!(
                    kind,
                    ParseErrorKind::MissingToken {
                        expected: 13,
                        found: 11
                    }
                );
            }
            other => panic!("Expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn invalid_float_reports_line_and_field() {
        let content = "# header\nATOM 1 C CA . ASP A 1 1 1.0 abc 3.0 1.0\n";
        match read(content) {
            Err(StructureError::Parse { line, kind }) => {
                assert_eq!(line, 2);
                assert_eq!(
                    kind,
                    ParseErrorKind::InvalidTokenFloat {
                        index: 10,
                        value: "abc".into()
                    }
                );
            }
            other => panic!("Expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn read_from_path_reads_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.cif");
        std::fs::write(&path, SAMPLE).unwrap();

        let model = CifFile::read_from_path(&path).unwrap();
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn read_from_path_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = CifFile::read_from_path(dir.path().join("missing.cif"));
        assert!(matches!(result, Err(StructureError::Io(_))));
    }
}
