use crate::core::models::bounds::BoundingBox;
use nalgebra::{Point3, Rotation3, Unit, Vector3};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Vertical field of view of a freshly placed camera, in degrees.
pub const DEFAULT_VIEW_ANGLE_DEGREES: f64 = 30.0;

const NEAR_PLANE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            'z' => Some(Axis::Z),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

/// Initial camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraView {
    /// Looking at the model from the (+1, +1, +1) diagonal with +z up.
    #[default]
    Iso,
    /// `horizontal` runs left to right and `vertical` bottom to top on screen.
    AxisPair { horizontal: Axis, vertical: Axis },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid camera view '{0}': expected 'iso' or two distinct axes such as 'xy' or 'zx'")]
pub struct ParseViewError(pub String);

impl FromStr for CameraView {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("iso") || trimmed.eq_ignore_ascii_case("isometric") {
            return Ok(CameraView::Iso);
        }
        let mut chars = trimmed.chars();
        match (
            chars.next().and_then(Axis::from_char),
            chars.next().and_then(Axis::from_char),
            chars.next(),
        ) {
            (Some(horizontal), Some(vertical), None) if horizontal != vertical => {
                Ok(CameraView::AxisPair {
                    horizontal,
                    vertical,
                })
            }
            _ => Err(ParseViewError(s.to_string())),
        }
    }
}

impl fmt::Display for CameraView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraView::Iso => f.write_str("iso"),
            CameraView::AxisPair {
                horizontal,
                vertical,
            } => write!(f, "{}{}", horizontal.as_char(), vertical.as_char()),
        }
    }
}

impl CameraView {
    /// Unit vector from the focal point towards the camera, and the requested up vector.
    fn direction_and_up(&self) -> (Vector3<f64>, Vector3<f64>) {
        match self {
            CameraView::Iso => (Vector3::new(1.0, 1.0, 1.0).normalize(), Vector3::z()),
            CameraView::AxisPair {
                horizontal,
                vertical,
            } => (
                horizontal.unit().cross(&vertical.unit()),
                vertical.unit(),
            ),
        }
    }
}

/// A perspective camera orbiting a focal point.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
    pub focal_point: Point3<f64>,
    /// Unit vector, kept orthogonal to the viewing direction.
    pub view_up: Vector3<f64>,
    pub view_angle_degrees: f64,
}

impl Camera {
    /// Places the camera for `view` so that the whole of `bbox` fits in the frame.
    pub fn for_view(view: &CameraView, bbox: &BoundingBox) -> Self {
        let (direction, up) = view.direction_and_up();
        let view_angle_degrees = DEFAULT_VIEW_ANGLE_DEGREES;

        let radius = bbox.bounding_radius();
        let radius = if radius > 0.0 { radius } else { 1.0 };
        let distance = radius / (view_angle_degrees.to_radians() / 2.0).sin();

        let focal_point = bbox.center();
        let view_up = (up - direction * up.dot(&direction)).normalize();

        Self {
            position: focal_point + direction * distance,
            focal_point,
            view_up,
            view_angle_degrees,
        }
    }

    /// Narrows the view angle by `factor`; values above 1 magnify.
    pub fn zoom(&mut self, factor: f64) {
        if factor > 0.0 {
            self.view_angle_degrees /= factor;
        }
    }

    /// Turns the camera upside down.
    pub fn invert_up(&mut self) {
        self.view_up = -self.view_up;
    }

    /// Rotates the camera position about the view-up axis through the focal point.
    pub fn azimuth(&mut self, degrees: f64) {
        let axis = Unit::new_normalize(self.view_up);
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        self.position = self.focal_point + rotation * (self.position - self.focal_point);
    }

    /// Orthonormal camera basis: (right, up, forward).
    fn basis(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let forward = (self.focal_point - self.position).normalize();
        let right = forward.cross(&self.view_up).normalize();
        let up = right.cross(&forward);
        (right, up, forward)
    }

    /// Pixels per world unit at unit depth for a frame `height` pixels tall.
    pub fn focal_length_pixels(&self, height: u32) -> f64 {
        (height as f64 / 2.0) / (self.view_angle_degrees.to_radians() / 2.0).tan()
    }

    /// Maps a world point to pixel coordinates and view depth.
    ///
    /// Returns `None` for points at or behind the camera.
    pub fn project(&self, point: &Point3<f64>, width: u32, height: u32) -> Option<ScreenPoint> {
        let (right, up, forward) = self.basis();
        let rel = point - self.position;
        let depth = rel.dot(&forward);
        if depth <= NEAR_PLANE {
            return None;
        }
        let scale = self.focal_length_pixels(height) / depth;
        Some(ScreenPoint {
            x: width as f64 / 2.0 + rel.dot(&right) * scale,
            y: height as f64 / 2.0 - rel.dot(&up) * scale,
            depth,
        })
    }

    /// Direction from the focal point towards the camera.
    pub fn view_direction(&self) -> Vector3<f64> {
        (self.position - self.focal_point).normalize()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> BoundingBox {
        BoundingBox::new(Point3::new(-2.0, -2.0, -2.0), Point3::new(2.0, 2.0, 2.0))
    }

    fn assert_vec_close(a: &Vector3<f64>, b: &Vector3<f64>) {
        assert!((a - b).norm() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn parses_view_names() {
        assert_eq!("iso".parse::<CameraView>().unwrap(), CameraView::Iso);
        assert_eq!(
            "ZX".parse::<CameraView>().unwrap(),
            CameraView::AxisPair {
                horizontal: Axis::Z,
                vertical: Axis::X
            }
        );
        assert!("xx".parse::<CameraView>().is_err());
        assert!("xyz".parse::<CameraView>().is_err());
        assert!("".parse::<CameraView>().is_err());
    }

    #[test]
    fn view_display_round_trips_through_parse() {
        for name in ["iso", "xy", "yx", "xz", "zx", "yz", "zy"] {
            let view: CameraView = name.parse().unwrap();
            assert_eq!(view.to_string(), name);
        }
    }

    #[test]
    fn axis_pair_looks_down_the_remaining_axis() {
        let camera = Camera::for_view(
            &CameraView::AxisPair {
                horizontal: Axis::X,
                vertical: Axis::Y,
            },
            &cube(),
        );
        assert_vec_close(&camera.view_direction(), &Vector3::z());
        assert_vec_close(&camera.view_up, &Vector3::y());

        let right = camera.project(&Point3::new(1.0, 0.0, 0.0), 100, 100).unwrap();
        let top = camera.project(&Point3::new(0.0, 1.0, 0.0), 100, 100).unwrap();
        assert!(right.x > 50.0);
        assert!(top.y < 50.0);
    }

    #[test]
    fn whole_box_fits_in_frame_after_reset() {
        let bbox = cube();
        let camera = Camera::for_view(&CameraView::Iso, &bbox);
        for corner in bbox.corners() {
            let p = camera.project(&corner, 200, 200).unwrap();
            assert!((0.0..=200.0).contains(&p.x) && (0.0..=200.0).contains(&p.y));
        }
        assert_eq!(camera.focal_point, bbox.center());
    }

    #[test]
    fn iso_up_is_orthogonal_and_points_upward() {
        let camera = Camera::for_view(&CameraView::Iso, &cube());
        assert!(camera.view_up.dot(&camera.view_direction()).abs() < 1e-12);
        assert!(camera.view_up.z > 0.0);
    }

    #[test]
    fn azimuth_preserves_distance_and_completes_a_circle() {
        let mut camera = Camera::for_view(&CameraView::Iso, &cube());
        let start = camera.position;
        let distance = (camera.position - camera.focal_point).norm();

        for _ in 0..300 {
            camera.azimuth(1.2);
            assert!(((camera.position - camera.focal_point).norm() - distance).abs() < 1e-9);
        }
        assert!((camera.position - start).norm() < 1e-8);
    }

    #[test]
    fn zoom_narrows_the_view_angle() {
        let mut camera = Camera::for_view(&CameraView::Iso, &cube());
        camera.zoom(2.0);
        assert!((camera.view_angle_degrees - 15.0).abs() < 1e-12);
    }

    #[test]
    fn inverted_camera_mirrors_vertical_screen_position() {
        let mut camera = Camera::for_view(&CameraView::Iso, &cube());
        let point = Point3::new(0.0, 0.0, 1.5);
        let before = camera.project(&point, 100, 100).unwrap();
        camera.invert_up();
        let after = camera.project(&point, 100, 100).unwrap();

        assert!(before.y < 50.0);
        assert!(after.y > 50.0);
    }

    #[test]
    fn points_behind_the_camera_are_not_projected() {
        let camera = Camera::for_view(&CameraView::Iso, &cube());
        let behind = camera.position + camera.view_direction() * 5.0;
        assert!(camera.project(&behind, 100, 100).is_none());
    }
}
