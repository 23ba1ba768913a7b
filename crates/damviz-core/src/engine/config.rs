use super::camera::CameraView;
use super::colormap::Colormap;
use image::Rgb;
use nalgebra::Vector3;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_VIDEO_DURATION_SECS: f64 = 10.0;
pub const DEFAULT_VIDEO_FPS: f64 = 30.0;
pub const DEFAULT_NUMBER_OF_ROTATIONS: f64 = 1.0;
pub const DEFAULT_OCCUPANCY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_SPHERE_SIZE: f64 = 50.0;
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.0;
pub const DEFAULT_FRAME_WIDTH: u32 = 1024;
pub const DEFAULT_FRAME_HEIGHT: u32 = 768;
pub const DEFAULT_COLORMAP: &str = "viridis";
pub const DEFAULT_LEGEND_TITLE: &str = "Normalized Occupancy";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoConfig {
    pub duration_secs: f64,
    pub fps: f64,
    pub rotations: f64,
    /// Encoder executable used by the MP4 frame sink.
    pub ffmpeg_path: PathBuf,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_VIDEO_DURATION_SECS,
            fps: DEFAULT_VIDEO_FPS,
            rotations: DEFAULT_NUMBER_OF_ROTATIONS,
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Minimum normalized occupancy (0..=1) an atom needs to be kept.
    pub occupancy_threshold: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            occupancy_threshold: DEFAULT_OCCUPANCY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrientationConfig {
    /// Translation applied after the oriented model is centred, in Angstroms.
    pub offset: Vector3<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Rendered sphere diameter in pixels before zoom is applied.
    pub sphere_size: f64,
    /// Values above 1 zoom in, values below 1 zoom out.
    pub zoom_factor: f64,
    pub view: CameraView,
    pub show_bounding_box: bool,
    /// Turns the camera upside down and mirrors the labels along the x-axis.
    pub flip_on_head: bool,
    pub colormap: String,
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    pub box_color: Rgb<u8>,
    pub box_line_width: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sphere_size: DEFAULT_SPHERE_SIZE,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            view: CameraView::Iso,
            show_bounding_box: true,
            flip_on_head: false,
            colormap: DEFAULT_COLORMAP.to_string(),
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
            background: Rgb([255, 255, 255]),
            box_color: Rgb([0, 0, 0]),
            box_line_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub font_size: u32,
    pub color: Rgb<u8>,
    pub bold: bool,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size: 20,
            color: Rgb([255, 0, 0]),
            bold: false,
        }
    }
}

/// Appearance and placement of the colour legend (scalar bar).
///
/// Geometry is given as fractions of the frame, measured from the bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendStyle {
    pub title: String,
    pub title_font_size: u32,
    pub label_font_size: u32,
    pub color: Rgb<u8>,
    pub bold: bool,
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    /// Vertical distance of the title above the bar.
    pub title_offset_y: f64,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            title: DEFAULT_LEGEND_TITLE.to_string(),
            title_font_size: 16,
            label_font_size: 16,
            color: Rgb([0, 0, 0]),
            bold: false,
            position_x: 0.35,
            position_y: 0.05,
            width: 0.3,
            height: 0.05,
            title_offset_y: 0.02,
        }
    }
}

/// The complete, immutable parameter set for one run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationConfig {
    pub video: VideoConfig,
    pub filter: FilterConfig,
    pub orientation: OrientationConfig,
    pub scene: SceneConfig,
    pub labels: LabelStyle,
    pub legend: LegendStyle,
}

impl AnimationConfig {
    pub fn builder() -> AnimationConfigBuilder {
        AnimationConfigBuilder::new()
    }
}

/// Builds an [`AnimationConfig`] starting from the defaults and validates it once.
#[derive(Debug, Clone, Default)]
pub struct AnimationConfigBuilder {
    config: AnimationConfig,
}

impl AnimationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn video_duration(mut self, seconds: f64) -> Self {
        self.config.video.duration_secs = seconds;
        self
    }
    pub fn video_fps(mut self, fps: f64) -> Self {
        self.config.video.fps = fps;
        self
    }
    pub fn number_of_rotations(mut self, rotations: f64) -> Self {
        self.config.video.rotations = rotations;
        self
    }
    pub fn ffmpeg_path(mut self, path: PathBuf) -> Self {
        self.config.video.ffmpeg_path = path;
        self
    }
    pub fn occupancy_threshold(mut self, threshold: f64) -> Self {
        self.config.filter.occupancy_threshold = threshold;
        self
    }
    pub fn offset(mut self, offset: Vector3<f64>) -> Self {
        self.config.orientation.offset = offset;
        self
    }
    pub fn sphere_size(mut self, pixels: f64) -> Self {
        self.config.scene.sphere_size = pixels;
        self
    }
    pub fn zoom_factor(mut self, zoom: f64) -> Self {
        self.config.scene.zoom_factor = zoom;
        self
    }
    pub fn view(mut self, view: CameraView) -> Self {
        self.config.scene.view = view;
        self
    }
    pub fn show_bounding_box(mut self, show: bool) -> Self {
        self.config.scene.show_bounding_box = show;
        self
    }
    pub fn flip_on_head(mut self, flip: bool) -> Self {
        self.config.scene.flip_on_head = flip;
        self
    }
    pub fn colormap(mut self, name: impl Into<String>) -> Self {
        self.config.scene.colormap = name.into();
        self
    }
    pub fn frame_size(mut self, width: u32, height: u32) -> Self {
        self.config.scene.width = width;
        self.config.scene.height = height;
        self
    }
    pub fn background(mut self, color: Rgb<u8>) -> Self {
        self.config.scene.background = color;
        self
    }
    pub fn box_style(mut self, color: Rgb<u8>, line_width: f64) -> Self {
        self.config.scene.box_color = color;
        self.config.scene.box_line_width = line_width;
        self
    }
    pub fn label_style(mut self, style: LabelStyle) -> Self {
        self.config.labels = style;
        self
    }
    pub fn legend_style(mut self, style: LegendStyle) -> Self {
        self.config.legend = style;
        self
    }

    pub fn build(self) -> Result<AnimationConfig, ConfigError> {
        let c = self.config;

        let positive = |name: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(invalid(name, format!("must be a positive number, got {}", value)))
            }
        };
        let fraction = |name: &'static str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(invalid(name, format!("must be within [0, 1], got {}", value)))
            }
        };

        positive("video.duration", c.video.duration_secs)?;
        positive("video.fps", c.video.fps)?;
        if !c.video.rotations.is_finite() {
            return Err(invalid("video.rotations", "must be a finite number"));
        }
        if (c.video.duration_secs * c.video.fps).round() < 1.0 {
            return Err(invalid(
                "video.duration",
                "duration multiplied by fps must yield at least one frame",
            ));
        }

        fraction("filter.occupancy-threshold", c.filter.occupancy_threshold)?;

        if c.orientation.offset.iter().any(|v| !v.is_finite()) {
            return Err(invalid("orientation.offset", "components must be finite"));
        }

        positive("scene.sphere-size", c.scene.sphere_size)?;
        positive("scene.zoom", c.scene.zoom_factor)?;
        positive("scene.box-line-width", c.scene.box_line_width)?;
        if Colormap::by_name(&c.scene.colormap).is_none() {
            return Err(invalid(
                "scene.colormap",
                format!(
                    "unknown colour map '{}' (available: {})",
                    c.scene.colormap,
                    Colormap::names().join(", ")
                ),
            ));
        }
        for (name, value) in [("scene.width", c.scene.width), ("scene.height", c.scene.height)] {
            if value < 16 || value % 2 != 0 {
                return Err(invalid(
                    name,
                    format!("must be an even number of pixels >= 16, got {}", value),
                ));
            }
        }

        if c.labels.font_size == 0 {
            return Err(invalid("labels.font-size", "must be at least 1"));
        }
        if c.legend.title_font_size == 0 || c.legend.label_font_size == 0 {
            return Err(invalid("legend.font-size", "must be at least 1"));
        }
        fraction("legend.position-x", c.legend.position_x)?;
        fraction("legend.position-y", c.legend.position_y)?;
        fraction("legend.width", c.legend.width)?;
        fraction("legend.height", c.legend.height)?;
        fraction("legend.title-offset-y", c.legend.title_offset_y)?;

        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::Axis;

    #[test]
    fn builder_without_overrides_yields_documented_defaults() {
        let config = AnimationConfigBuilder::new().build().unwrap();

        assert_eq!(config.video.duration_secs, 10.0);
        assert_eq!(config.video.fps, 30.0);
        assert_eq!(config.video.rotations, 1.0);
        assert_eq!(config.filter.occupancy_threshold, 0.5);
        assert_eq!(config.scene.sphere_size, 50.0);
        assert_eq!(config.scene.view, CameraView::Iso);
        assert!(config.scene.show_bounding_box);
        assert!(!config.scene.flip_on_head);
        assert_eq!(config.orientation.offset, Vector3::zeros());
        assert_eq!(config.legend.title, "Normalized Occupancy");
    }

    #[test]
    fn setters_are_applied() {
        let config = AnimationConfig::builder()
            .video_duration(4.0)
            .video_fps(25.0)
            .number_of_rotations(2.0)
            .occupancy_threshold(0.7)
            .offset(Vector3::new(1.0, 2.0, 3.0))
            .view(CameraView::AxisPair {
                horizontal: Axis::Y,
                vertical: Axis::X,
            })
            .flip_on_head(true)
            .frame_size(640, 480)
            .build()
            .unwrap();

        assert_eq!(config.video.duration_secs, 4.0);
        assert_eq!(config.video.rotations, 2.0);
        assert_eq!(config.filter.occupancy_threshold, 0.7);
        assert_eq!(config.orientation.offset, Vector3::new(1.0, 2.0, 3.0));
        assert!(config.scene.flip_on_head);
        assert_eq!((config.scene.width, config.scene.height), (640, 480));
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let err = AnimationConfig::builder()
            .occupancy_threshold(1.5)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "filter.occupancy-threshold",
                ..
            }
        ));
    }

    #[test]
    fn zero_frame_video_is_rejected() {
        let result = AnimationConfig::builder()
            .video_duration(0.01)
            .video_fps(10.0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn odd_frame_size_is_rejected() {
        let result = AnimationConfig::builder().frame_size(641, 480).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "scene.width",
                ..
            })
        ));
    }

    #[test]
    fn unknown_colormap_is_rejected_with_available_names() {
        let err = AnimationConfig::builder()
            .colormap("rainbow")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("viridis"));
    }

    #[test]
    fn non_positive_zoom_is_rejected() {
        assert!(AnimationConfig::builder().zoom_factor(0.0).build().is_err());
        assert!(
            AnimationConfig::builder()
                .zoom_factor(f64::NAN)
                .build()
                .is_err()
        );
    }
}
