use super::error::EngineError;
use crate::core::models::bounds::{BoundingBox, DimensionLabel};
use crate::core::models::particle::OrientedModel;
use nalgebra::Vector3;

pub fn bounding_box(model: &OrientedModel) -> Result<BoundingBox, EngineError> {
    BoundingBox::from_points(&model.coordinates)
        .ok_or_else(|| EngineError::Internal("oriented model has no coordinates".into()))
}

/// Formats a side length as a whole number of Angstroms (ties round to even).
pub fn format_length(length: f64) -> String {
    format!("{:.0} Å", length)
}

/// Places one label per axis at the centre of the box edge parallel to that axis.
///
/// The anchor for axis `k` is the box centre moved by half the side length along each of
/// the other two axes. With `flip` set, the axis-0 component is mirrored so that labels
/// stay on the visible side of an upside-down camera.
pub fn dimension_labels(bbox: &BoundingBox, flip: bool) -> [DimensionLabel; 3] {
    let center = bbox.center();
    let sides = bbox.side_lengths();

    std::array::from_fn(|axis| {
        let mut shift = Vector3::zeros();
        for other in (0..3).filter(|&j| j != axis) {
            shift[other] = sides[other] * 0.5;
        }
        if flip {
            shift[0] = -shift[0];
        }
        DimensionLabel {
            axis,
            anchor: center + shift,
            length: sides[axis],
            text: format_length(sides[axis]),
        }
    })
}
