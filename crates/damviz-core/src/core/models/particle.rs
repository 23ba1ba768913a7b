use super::atom::AtomRecord;
use nalgebra::{Matrix3, Point3, Vector3};

/// All atoms read from one structure file, unfiltered.
///
/// Coordinates and occupancies are stored as parallel arrays in file order. Readers never
/// return an empty model; an input without atom records is reported as an error instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleModel {
    coordinates: Vec<Point3<f64>>,
    occupancies: Vec<f64>,
}

impl ParticleModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = AtomRecord>) -> Self {
        let mut model = Self::new();
        for record in records {
            model.push(record);
        }
        model
    }

    pub fn push(&mut self, record: AtomRecord) {
        self.coordinates.push(record.position);
        self.occupancies.push(record.occupancy);
    }

    pub fn coordinates(&self) -> &[Point3<f64>] {
        &self.coordinates
    }

    pub fn occupancies(&self) -> &[f64] {
        &self.occupancies
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// The subset of a [`ParticleModel`] whose normalized occupancy reaches the threshold.
///
/// Occupancies are stored normalized to `[0, 1]` by the maximum of the full model. Order is
/// preserved from the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredModel {
    pub coordinates: Vec<Point3<f64>>,
    pub normalized_occupancies: Vec<f64>,
    /// The normalized occupancy threshold that produced this subset.
    pub threshold: f64,
    /// Number of atoms removed by the filter.
    pub discarded: usize,
}

impl FilteredModel {
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Filtered coordinates re-expressed in the particle's principal-axis frame.
///
/// Axis 0 is the direction of largest spread (the "x-axis" of the rendered scene) and
/// axis 2 the direction of smallest spread. Coordinates are centred on their own
/// bounding-box midpoint and then translated by `offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedModel {
    pub coordinates: Vec<Point3<f64>>,
    pub occupancies: Vec<f64>,
    /// Principal axes as rows, expressed in the input coordinate frame.
    pub axes: Matrix3<f64>,
    /// Variance of the filtered coordinates along each principal axis, descending.
    pub explained_variance: Vector3<f64>,
    /// Mean of the filtered coordinates in the input frame.
    pub centroid: Point3<f64>,
    pub offset: Vector3<f64>,
}

impl OrientedModel {
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_records_keeps_arrays_parallel_and_ordered() {
        let model = ParticleModel::from_records(vec![
            AtomRecord::new(Point3::new(1.0, 0.0, 0.0), 0.5),
            AtomRecord::new(Point3::new(0.0, 2.0, 0.0), 1.0),
        ]);

        assert_eq!(model.len(), 2);
        assert_eq!(model.coordinates()[1], Point3::new(0.0, 2.0, 0.0));
        assert_eq!(model.occupancies(), &[0.5, 1.0]);
    }

    #[test]
    fn new_model_is_empty() {
        let model = ParticleModel::new();
        assert!(model.is_empty());
        assert_eq!(model.len(), 0);
    }
}
