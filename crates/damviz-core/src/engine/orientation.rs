use super::error::EngineError;
use crate::core::models::bounds::BoundingBox;
use crate::core::models::particle::{FilteredModel, OrientedModel};
use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Principal directions of a point set, ordered by decreasing variance.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalAxes {
    /// Unit axes as rows; row 0 has the largest variance.
    pub axes: Matrix3<f64>,
    pub variances: Vector3<f64>,
    pub centroid: Point3<f64>,
}

impl PrincipalAxes {
    /// Expresses a point in the principal frame, relative to the centroid.
    pub fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.axes * (point - self.centroid))
    }
}

fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Point3::from(sum / points.len() as f64)
}

/// Population covariance of the mean-centred points.
fn covariance(points: &[Point3<f64>], center: &Point3<f64>) -> Matrix3<f64> {
    let sum = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p - center;
        acc + d * d.transpose()
    });
    sum / points.len() as f64
}

/// Flips `axis` so that its component of largest magnitude is positive.
///
/// Eigenvectors are only defined up to sign; fixing the sign this way makes the oriented
/// frame a pure function of the input coordinates.
fn normalize_sign(axis: Vector3<f64>) -> Vector3<f64> {
    let mut dominant = 0;
    for i in 1..3 {
        if axis[i].abs() > axis[dominant].abs() {
            dominant = i;
        }
    }
    if axis[dominant] < 0.0 { -axis } else { axis }
}

/// Computes the principal axes of `points` from the eigen-decomposition of their
/// covariance matrix.
///
/// Returns `None` for an empty point set.
pub fn principal_axes(points: &[Point3<f64>]) -> Option<PrincipalAxes> {
    if points.is_empty() {
        return None;
    }

    let center = centroid(points);
    let cov = covariance(points, &center);
    let eigen = SymmetricEigen::new(cov);
    trace!("Covariance eigenvalues: {:?}", eigen.eigenvalues.as_slice());

    // Stable sort: equal variances keep their decomposition order.
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut axes = Matrix3::zeros();
    let mut variances = Vector3::zeros();
    for (row, &col) in order.iter().enumerate() {
        let axis = normalize_sign(eigen.eigenvectors.column(col).normalize());
        axes.set_row(row, &axis.transpose());
        variances[row] = eigen.eigenvalues[col].max(0.0);
    }

    Some(PrincipalAxes {
        axes,
        variances,
        centroid: center,
    })
}

/// Re-expresses the filtered coordinates in their principal-axis frame.
///
/// The projected set is centred on its own bounding-box midpoint and then translated by
/// `offset`. Occupancies are carried over unchanged.
///
/// # Errors
///
/// Returns [`EngineError::EmptyFilterResult`] for an empty model, since the orientation of
/// zero points is undefined.
pub fn orient(
    filtered: &FilteredModel,
    offset: &Vector3<f64>,
) -> Result<OrientedModel, EngineError> {
    let principal =
        principal_axes(&filtered.coordinates).ok_or(EngineError::EmptyFilterResult {
            threshold: filtered.threshold,
            total: filtered.discarded,
        })?;

    let projected: Vec<Point3<f64>> = filtered
        .coordinates
        .iter()
        .map(|p| principal.project(p))
        .collect();

    let bbox = BoundingBox::from_points(&projected)
        .ok_or_else(|| EngineError::Internal("projected point set is empty".into()))?;
    let shift = offset - bbox.center().coords;
    let coordinates = projected.into_iter().map(|p| p + shift).collect();

    debug!(
        "Principal variances: {:.3}, {:.3}, {:.3}",
        principal.variances[0], principal.variances[1], principal.variances[2]
    );

    Ok(OrientedModel {
        coordinates,
        occupancies: filtered.normalized_occupancies.clone(),
        axes: principal.axes,
        explained_variance: principal.variances,
        centroid: principal.centroid,
        offset: *offset,
    })
}
