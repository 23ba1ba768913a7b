use super::cif::CifFile;
use super::error::StructureError;
use super::pdb::PdbFile;
use super::traits::StructureFile;
use crate::core::models::particle::ParticleModel;
use std::fmt;
use std::path::Path;

/// The structure file layouts damviz can read, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureFormat {
    /// Whitespace-tokenized atom-site records (`.cif`).
    Cif,
    /// Fixed-column atom records (`.pdb`).
    Pdb,
}

impl StructureFormat {
    pub const ALL: [StructureFormat; 2] = [StructureFormat::Cif, StructureFormat::Pdb];

    pub fn extension(self) -> &'static str {
        match self {
            StructureFormat::Cif => "cif",
            StructureFormat::Pdb => "pdb",
        }
    }

    /// Matches an extension case-insensitively, with or without a leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn read_path(self, path: &Path) -> Result<ParticleModel, StructureError> {
        match self {
            StructureFormat::Cif => CifFile::read_from_path(path),
            StructureFormat::Pdb => PdbFile::read_from_path(path),
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Reads a structure file, choosing the reader from the file extension.
pub fn read_structure(path: &Path) -> Result<ParticleModel, StructureError> {
    let format = StructureFormat::from_path(path).ok_or_else(|| {
        StructureError::UnsupportedFormat(
            path.extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })?;
    format.read_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert_eq!(
            StructureFormat::from_extension("CIF"),
            Some(StructureFormat::Cif)
        );
        assert_eq!(
            StructureFormat::from_extension(".Pdb"),
            Some(StructureFormat::Pdb)
        );
        assert_eq!(StructureFormat::from_extension("xyz"), None);
        assert_eq!(StructureFormat::from_extension(""), None);
    }

    #[test]
    fn from_path_uses_final_extension() {
        assert_eq!(
            StructureFormat::from_path(&PathBuf::from("/data/model.damfilt.pdb")),
            Some(StructureFormat::Pdb)
        );
        assert_eq!(StructureFormat::from_path(&PathBuf::from("model")), None);
    }

    #[test]
    fn read_structure_rejects_unknown_extension() {
        let result = read_structure(&PathBuf::from("model.dat"));
        assert!(matches!(result, Err(StructureError::UnsupportedFormat(ext)) if ext == "dat"));
    }

    #[test]
    fn read_structure_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let cif_path = dir.path().join("a.CIF");
        std::fs::write(&cif_path, "ATOM 1 C CA . ASP A 1 1 1.0 2.0 3.0 0.5\n").unwrap();

        let model = read_structure(&cif_path).unwrap();
        assert_eq!(model.occupancies(), &[0.5]);
    }

    #[test]
    fn display_prints_extension() {
        assert_eq!(StructureFormat::Cif.to_string(), "cif");
        assert_eq!(StructureFormat::Pdb.to_string(), "pdb");
    }
}
