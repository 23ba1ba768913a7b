use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::RenderConfig;
use crate::cli::{GeometryArgs, InspectArgs, RenderArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use damviz::engine::camera::CameraView;
use damviz::engine::colormap::parse_color;
use damviz::engine::config as core_config;
use image::Rgb;
use nalgebra::Vector3;
use std::path::PathBuf;
use std::str::FromStr;

/// Scene and video values only the `render` command exposes as flags.
#[derive(Debug, Default)]
struct RenderOverrides<'a> {
    duration: Option<f64>,
    fps: Option<f64>,
    rotations: Option<f64>,
    view: Option<CameraView>,
    zoom: Option<f64>,
    sphere_size: Option<f64>,
    colormap: Option<&'a str>,
    hide_bounding_box: bool,
    flip: bool,
}

pub fn build_render_config(args: &RenderArgs) -> Result<RenderConfig> {
    let overrides = RenderOverrides {
        duration: args.duration,
        fps: args.fps,
        rotations: args.rotations,
        view: args.view,
        zoom: args.zoom,
        sphere_size: args.sphere_size,
        colormap: args.colormap.as_deref(),
        hide_bounding_box: args.no_bounding_box,
        flip: args.flip,
    };
    let core_config = merge(&args.geometry, &overrides)?;

    Ok(RenderConfig {
        core_config,
        output_dir: args.output_dir.clone(),
        frames_dir: args.frames_dir.clone(),
        write_video: !args.no_video,
    })
}

pub fn build_inspect_config(args: &InspectArgs) -> Result<core_config::AnimationConfig> {
    merge(&args.geometry, &RenderOverrides::default())
}

fn config_error(key: &str, value: &str, reason: impl std::fmt::Display) -> CliError {
    CliError::Config(format!("Invalid value for {}: '{}' ({})", key, value, reason))
}

fn color_or(value: Option<&str>, fallback: Rgb<u8>, key: &str) -> Result<Rgb<u8>> {
    match value {
        Some(text) => parse_color(text).map_err(|e| config_error(key, text, e)),
        None => Ok(fallback),
    }
}

fn merge(
    geometry: &GeometryArgs,
    overrides: &RenderOverrides<'_>,
) -> Result<core_config::AnimationConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &geometry.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let mut file_config = apply_set_values(file_config, &geometry.set_values)?;

    let video = file_config.video.take().unwrap_or_default();
    let filter = file_config.filter.take().unwrap_or_default();
    let orientation = file_config.orientation.take().unwrap_or_default();
    let scene = file_config.scene.take().unwrap_or_default();
    let labels = file_config.labels.take().unwrap_or_default();
    let legend = file_config.legend.take().unwrap_or_default();

    let offset = geometry
        .offset
        .or_else(|| orientation.offset.map(Vector3::from))
        .unwrap_or_else(Vector3::zeros);

    let view = match (overrides.view, scene.view.as_deref()) {
        (Some(view), _) => view,
        (None, Some(text)) => {
            parser::parse_view(text).map_err(|e| config_error("scene.view", text, e))?
        }
        (None, None) => defaults.scene.view,
    };

    let show_bounding_box = !overrides.hide_bounding_box
        && scene
            .show_bounding_box
            .unwrap_or(defaults.scene.show_bounding_box);
    let flip_on_head = overrides.flip || scene.flip_on_head.unwrap_or(defaults.scene.flip_on_head);

    let colormap = overrides
        .colormap
        .map(str::to_string)
        .or(scene.colormap)
        .unwrap_or(defaults.scene.colormap);

    let label_style = core_config::LabelStyle {
        font_size: labels.font_size.unwrap_or(defaults.labels.font_size),
        color: color_or(labels.color.as_deref(), defaults.labels.color, "labels.color")?,
        bold: labels.bold.unwrap_or(defaults.labels.bold),
    };

    let d = &defaults.legend;
    let legend_style = core_config::LegendStyle {
        title: legend.title.unwrap_or_else(|| d.title.clone()),
        title_font_size: legend.title_font_size.unwrap_or(d.title_font_size),
        label_font_size: legend.label_font_size.unwrap_or(d.label_font_size),
        color: color_or(legend.color.as_deref(), d.color, "legend.color")?,
        bold: legend.bold.unwrap_or(d.bold),
        position_x: legend.position_x.unwrap_or(d.position_x),
        position_y: legend.position_y.unwrap_or(d.position_y),
        width: legend.width.unwrap_or(d.width),
        height: legend.height.unwrap_or(d.height),
        title_offset_y: legend.title_offset_y.unwrap_or(d.title_offset_y),
    };

    core_config::AnimationConfig::builder()
        .video_duration(
            overrides
                .duration
                .or(video.duration)
                .unwrap_or(defaults.video.duration_secs),
        )
        .video_fps(overrides.fps.or(video.fps).unwrap_or(defaults.video.fps))
        .number_of_rotations(
            overrides
                .rotations
                .or(video.rotations)
                .unwrap_or(defaults.video.rotations),
        )
        .ffmpeg_path(video.ffmpeg_path.unwrap_or(defaults.video.ffmpeg_path))
        .occupancy_threshold(
            geometry
                .occupancy_threshold
                .or(filter.occupancy_threshold)
                .unwrap_or(defaults.occupancy_threshold),
        )
        .offset(offset)
        .sphere_size(
            overrides
                .sphere_size
                .or(scene.sphere_size)
                .unwrap_or(defaults.scene.sphere_size),
        )
        .zoom_factor(
            overrides
                .zoom
                .or(scene.zoom)
                .unwrap_or(defaults.scene.zoom_factor),
        )
        .view(view)
        .show_bounding_box(show_bounding_box)
        .flip_on_head(flip_on_head)
        .colormap(colormap)
        .frame_size(
            scene.width.unwrap_or(defaults.scene.width),
            scene.height.unwrap_or(defaults.scene.height),
        )
        .background(color_or(
            scene.background.as_deref(),
            defaults.scene.background,
            "scene.background",
        )?)
        .box_style(
            color_or(
                scene.box_color.as_deref(),
                defaults.scene.box_color,
                "scene.box-color",
            )?,
            scene
                .box_line_width
                .unwrap_or(defaults.scene.box_line_width),
        )
        .label_style(label_style)
        .legend_style(legend_style)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn float(key: &str, value: &str) -> Result<Option<f64>> {
    parse_value(key, value, "float").map(Some)
}

fn integer(key: &str, value: &str) -> Result<Option<u32>> {
    parse_value(key, value, "integer").map(Some)
}

fn boolean(key: &str, value: &str) -> Result<Option<bool>> {
    parser::parse_bool(value)
        .map(Some)
        .map_err(|e| config_error(key, value, e))
}

fn text(value: &str) -> Option<String> {
    Some(value.trim().to_string())
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            _ if key.starts_with("video.") => {
                let video = config.video.get_or_insert_with(Default::default);
                match key {
                    "video.duration" => video.duration = float(key, value)?,
                    "video.fps" => video.fps = float(key, value)?,
                    "video.rotations" => video.rotations = float(key, value)?,
                    "video.ffmpeg-path" => video.ffmpeg_path = Some(PathBuf::from(value.trim())),
                    _ => return Err(unsupported_key(key)),
                }
            }
            "filter.occupancy-threshold" => {
                config
                    .filter
                    .get_or_insert_with(Default::default)
                    .occupancy_threshold = float(key, value)?
            }
            "orientation.offset" => {
                let offset = parser::parse_offset(value).map_err(|e| config_error(key, value, e))?;
                config
                    .orientation
                    .get_or_insert_with(Default::default)
                    .offset = Some([offset.x, offset.y, offset.z])
            }
            _ if key.starts_with("scene.") => apply_scene_value(&mut config, key, value)?,
            _ if key.starts_with("labels.") => {
                let labels = config.labels.get_or_insert_with(Default::default);
                match key {
                    "labels.font-size" => labels.font_size = integer(key, value)?,
                    "labels.color" => labels.color = text(value),
                    "labels.bold" => labels.bold = boolean(key, value)?,
                    _ => return Err(unsupported_key(key)),
                }
            }
            _ if key.starts_with("legend.") => {
                let legend = config.legend.get_or_insert_with(Default::default);
                match key {
                    "legend.title" => legend.title = text(value),
                    "legend.title-font-size" => legend.title_font_size = integer(key, value)?,
                    "legend.label-font-size" => legend.label_font_size = integer(key, value)?,
                    "legend.color" => legend.color = text(value),
                    "legend.bold" => legend.bold = boolean(key, value)?,
                    "legend.position-x" => legend.position_x = float(key, value)?,
                    "legend.position-y" => legend.position_y = float(key, value)?,
                    "legend.width" => legend.width = float(key, value)?,
                    "legend.height" => legend.height = float(key, value)?,
                    "legend.title-offset-y" => legend.title_offset_y = float(key, value)?,
                    _ => return Err(unsupported_key(key)),
                }
            }
            _ => return Err(unsupported_key(key)),
        }
    }
    Ok(config)
}

fn apply_scene_value(config: &mut FileConfig, key: &str, value: &str) -> Result<()> {
    let scene = config.scene.get_or_insert_with(Default::default);
    match key {
        "scene.sphere-size" => scene.sphere_size = float(key, value)?,
        "scene.zoom" => scene.zoom = float(key, value)?,
        "scene.view" => scene.view = text(value),
        "scene.show-bounding-box" => scene.show_bounding_box = boolean(key, value)?,
        "scene.flip-on-head" => scene.flip_on_head = boolean(key, value)?,
        "scene.colormap" => scene.colormap = text(value),
        "scene.width" => scene.width = integer(key, value)?,
        "scene.height" => scene.height = integer(key, value)?,
        "scene.background" => scene.background = text(value),
        "scene.box-color" => scene.box_color = text(value),
        "scene.box-line-width" => scene.box_line_width = float(key, value)?,
        _ => return Err(unsupported_key(key)),
    }
    Ok(())
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!("Unsupported configuration key for --set: '{}'", key))
}
