use nalgebra::{Point3, Vector3};

/// Index pairs into [`BoundingBox::corners`] forming the twelve box edges.
pub const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// An axis-aligned box in the oriented (principal-axis) frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Computes the per-axis extents of a point set. Returns `None` for an empty set.
    pub fn from_points(points: &[Point3<f64>]) -> Option<Self> {
        let first = points.first()?;
        let (min, max) = points
            .iter()
            .skip(1)
            .fold((*first, *first), |(min, max), p| {
                (
                    Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                    Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
                )
            });
        Some(Self { min, max })
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn side_lengths(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Radius of the sphere through all eight corners.
    pub fn bounding_radius(&self) -> f64 {
        self.side_lengths().norm() / 2.0
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// The eight corners; bit 0 of the index selects max x, bit 1 max y, bit 2 max z.
    pub fn corners(&self) -> [Point3<f64>; 8] {
        std::array::from_fn(|i| {
            Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    pub fn edges(&self) -> [(Point3<f64>, Point3<f64>); 12] {
        let corners = self.corners();
        BOX_EDGES.map(|(a, b)| (corners[a], corners[b]))
    }
}

/// A dimension annotation for one axis of a [`BoundingBox`].
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionLabel {
    /// Principal axis index (0 = longest spread, 2 = shortest).
    pub axis: usize,
    pub anchor: Point3<f64>,
    /// Side length along `axis` in Angstroms.
    pub length: f64,
    pub text: String,
}
