use super::camera::Camera;
use super::colormap::Colormap;
use super::config::{AnimationConfig, LabelStyle, LegendStyle, SceneConfig};
use super::error::EngineError;
use crate::core::models::bounds::{BoundingBox, DimensionLabel};
use crate::core::models::particle::OrientedModel;
use image::Rgb;
use nalgebra::Point3;
use tracing::debug;

/// One rendered atom, coloured by its normalized occupancy.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAtom {
    pub position: Point3<f64>,
    pub scalar: f64,
    pub color: Rgb<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxOverlay {
    pub edges: [(Point3<f64>, Point3<f64>); 12],
    pub color: Rgb<u8>,
    pub line_width: f64,
}

/// Screen-space text pinned to a world position; drawn on top of everything.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLabel {
    pub anchor: Point3<f64>,
    pub text: String,
    pub style: LabelStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub colormap: Colormap,
    pub style: LegendStyle,
}

/// Everything a [`FrameRenderer`](super::raster::FrameRenderer) needs besides the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    /// Sphere diameter in pixels.
    pub point_size: f64,
    pub bounds: BoundingBox,
    pub atoms: Vec<SceneAtom>,
    pub bounding_box: Option<BoxOverlay>,
    pub labels: Vec<SceneLabel>,
    pub legend: Option<Legend>,
}

impl Scene {
    /// A scene with no actors and default frame settings.
    pub fn empty(bounds: BoundingBox) -> Self {
        let defaults = SceneConfig::default();
        Self {
            width: defaults.width,
            height: defaults.height,
            background: defaults.background,
            point_size: defaults.sphere_size * defaults.zoom_factor,
            bounds,
            atoms: Vec::new(),
            bounding_box: None,
            labels: Vec::new(),
            legend: None,
        }
    }
}

/// Assembles the atom cloud, the optional box and labels, and the legend.
///
/// Labels are only added together with the box, since they annotate its edges.
pub fn compose(
    model: &OrientedModel,
    bounds: &BoundingBox,
    labels: &[DimensionLabel],
    config: &AnimationConfig,
) -> Result<Scene, EngineError> {
    let scene_config = &config.scene;
    let colormap = Colormap::by_name(&scene_config.colormap).ok_or_else(|| {
        EngineError::Render(format!("unknown colour map '{}'", scene_config.colormap))
    })?;

    let atoms = model
        .coordinates
        .iter()
        .zip(&model.occupancies)
        .map(|(&position, &scalar)| SceneAtom {
            position,
            scalar,
            color: colormap.sample(scalar),
        })
        .collect();

    let (bounding_box, labels) = if scene_config.show_bounding_box {
        let overlay = BoxOverlay {
            edges: bounds.edges(),
            color: scene_config.box_color,
            line_width: scene_config.box_line_width,
        };
        let labels = labels
            .iter()
            .map(|label| SceneLabel {
                anchor: label.anchor,
                text: label.text.clone(),
                style: config.labels.clone(),
            })
            .collect();
        (Some(overlay), labels)
    } else {
        (None, Vec::new())
    };

    debug!(
        "Composed scene with {} atoms, box {}.",
        model.len(),
        if bounding_box.is_some() { "shown" } else { "hidden" }
    );

    Ok(Scene {
        width: scene_config.width,
        height: scene_config.height,
        background: scene_config.background,
        point_size: scene_config.sphere_size * scene_config.zoom_factor,
        bounds: *bounds,
        atoms,
        bounding_box,
        labels,
        legend: Some(Legend {
            colormap,
            style: config.legend.clone(),
        }),
    })
}

/// Places the camera for the configured view, then applies zoom and the head flip.
pub fn initial_camera(config: &SceneConfig, bounds: &BoundingBox) -> Camera {
    let mut camera = Camera::for_view(&config.view, bounds);
    camera.zoom(config.zoom_factor);
    if config.flip_on_head {
        camera.invert_up();
    }
    camera
}
