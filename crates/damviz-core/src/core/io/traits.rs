use crate::core::models::particle::ParticleModel;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading an atom-model structure format.
///
/// Implementors scan the input for atom records and collect their coordinates and
/// occupancies into a [`ParticleModel`]. Lines that are not atom records are ignored.
pub trait StructureFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads a particle model from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if an atom record is malformed, if no atom records are present, or
    /// if the underlying reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<ParticleModel, Self::Error>;

    /// Reads a particle model from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<ParticleModel, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
