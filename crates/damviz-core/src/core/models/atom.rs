use nalgebra::Point3;

/// A single atom record read from a structure file.
///
/// Dummy atom models carry no chemistry; each record is a bead position with an
/// occupancy value describing how often the bead was present across the modelling runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomRecord {
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The raw (unnormalized) occupancy value.
    pub occupancy: f64,
}

impl AtomRecord {
    pub fn new(position: Point3<f64>, occupancy: f64) -> Self {
        Self {
            position,
            occupancy,
        }
    }
}
