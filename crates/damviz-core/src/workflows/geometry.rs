use crate::core::io::format::{StructureFormat, read_structure};
use crate::core::models::bounds::{BoundingBox, DimensionLabel};
use crate::core::models::particle::{OrientedModel, ParticleModel};
use crate::engine::config::AnimationConfig;
use crate::engine::error::EngineError;
use crate::engine::filter::filter_by_occupancy;
use crate::engine::labels::{bounding_box, dimension_labels};
use crate::engine::orientation::orient;
use std::path::Path;
use tracing::{debug, instrument};

/// The geometric result of one input: oriented cloud, its box and the dimension labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedGeometry {
    pub format: Option<StructureFormat>,
    pub total_atoms: usize,
    pub oriented: OrientedModel,
    pub bounds: BoundingBox,
    pub labels: [DimensionLabel; 3],
}

impl PreparedGeometry {
    pub fn kept_atoms(&self) -> usize {
        self.oriented.len()
    }
}

/// Filter, orient, bound and label an already parsed model.
pub fn prepare_model(
    model: &ParticleModel,
    config: &AnimationConfig,
) -> Result<PreparedGeometry, EngineError> {
    let filtered = filter_by_occupancy(model, config.filter.occupancy_threshold)?;
    let oriented = orient(&filtered, &config.orientation.offset)?;
    let bounds = bounding_box(&oriented)?;
    let labels = dimension_labels(&bounds, config.scene.flip_on_head);

    debug!(
        "Bounding box sides: {}, {}, {}",
        labels[0].text, labels[1].text, labels[2].text
    );

    Ok(PreparedGeometry {
        format: None,
        total_atoms: model.len(),
        oriented,
        bounds,
        labels,
    })
}

/// Reads `path` and runs the geometric pipeline on it.
#[instrument(skip(config), fields(path = %path.display()))]
pub fn prepare(path: &Path, config: &AnimationConfig) -> Result<PreparedGeometry, EngineError> {
    let model = read_structure(path)?;
    debug!("Parsed {} atoms.", model.len());
    let mut geometry = prepare_model(&model, config)?;
    geometry.format = StructureFormat::from_path(path);
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomRecord;
    use nalgebra::{Point3, Vector3};

    fn elongated_model() -> ParticleModel {
        let mut records = Vec::new();
        for i in 0..10 {
            for j in 0..3 {
                records.push(AtomRecord::new(
                    Point3::new(j as f64 * 2.0, i as f64 * 3.0, 0.0),
                    1.0,
                ));
            }
        }
        records.push(AtomRecord::new(Point3::new(500.0, 500.0, 500.0), 0.1));
        ParticleModel::from_records(records)
    }

    #[test]
    fn low_occupancy_outlier_does_not_affect_the_box() {
        let geometry = prepare_model(&elongated_model(), &AnimationConfig::default()).unwrap();

        assert_eq!(geometry.total_atoms, 31);
        assert_eq!(geometry.kept_atoms(), 30);
        let sides = geometry.bounds.side_lengths();
        assert!((sides[0] - 27.0).abs() < 1e-6, "sides = {:?}", sides);
        assert_eq!(geometry.labels[0].text, "27 Å");
    }

    #[test]
    fn offset_moves_the_box_centre_only() {
        let base = prepare_model(&elongated_model(), &AnimationConfig::default()).unwrap();
        let config = AnimationConfig::builder()
            .offset(Vector3::new(0.0, 0.0, 10.0))
            .build()
            .unwrap();
        let moved = prepare_model(&elongated_model(), &config).unwrap();

        let delta = moved.bounds.center() - base.bounds.center();
        assert!((delta - Vector3::new(0.0, 0.0, 10.0)).norm() < 1e-9);
        for (a, b) in base.labels.iter().zip(moved.labels.iter()) {
            assert_eq!(a.text, b.text);
        }
    }

    #[test]
    fn all_zero_occupancies_fail_before_orientation() {
        let model = ParticleModel::from_records([
            AtomRecord::new(Point3::origin(), 0.0),
            AtomRecord::new(Point3::new(1.0, 0.0, 0.0), 0.0),
        ]);
        assert!(matches!(
            prepare_model(&model, &AnimationConfig::default()),
            Err(EngineError::DegenerateOccupancy { .. })
        ));
    }
}
