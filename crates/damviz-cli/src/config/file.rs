use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileVideoConfig {
    pub duration: Option<f64>,
    pub fps: Option<f64>,
    pub rotations: Option<f64>,
    pub ffmpeg_path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileFilterConfig {
    pub occupancy_threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOrientationConfig {
    pub offset: Option<[f64; 3]>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSceneConfig {
    pub sphere_size: Option<f64>,
    pub zoom: Option<f64>,
    pub view: Option<String>,
    pub show_bounding_box: Option<bool>,
    pub flip_on_head: Option<bool>,
    pub colormap: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub background: Option<String>,
    pub box_color: Option<String>,
    pub box_line_width: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLabelsConfig {
    pub font_size: Option<u32>,
    pub color: Option<String>,
    pub bold: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLegendConfig {
    pub title: Option<String>,
    pub title_font_size: Option<u32>,
    pub label_font_size: Option<u32>,
    pub color: Option<String>,
    pub bold: Option<bool>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub title_offset_y: Option<f64>,
}

/// The TOML configuration file; every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub video: Option<FileVideoConfig>,
    pub filter: Option<FileFilterConfig>,
    pub orientation: Option<FileOrientationConfig>,
    pub scene: Option<FileSceneConfig>,
    pub labels: Option<FileLabelsConfig>,
    pub legend: Option<FileLegendConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(FileConfig::from_toml_str("").unwrap(), FileConfig::default());
    }

    #[test]
    fn reads_kebab_case_sections() {
        let config = FileConfig::from_toml_str(
            r##"
            [video]
            duration = 12.5
            fps = 24
            ffmpeg-path = "/opt/ffmpeg/bin/ffmpeg"

            [filter]
            occupancy-threshold = 0.65

            [orientation]
            offset = [0.0, -2.0, 4.5]

            [scene]
            view = "yx"
            show-bounding-box = false
            background = "#202020"

            [legend]
            title-offset-y = 0.03
            "##,
        )
        .unwrap();

        let video = config.video.unwrap();
        assert_eq!(video.duration, Some(12.5));
        assert_eq!(video.fps, Some(24.0));
        assert_eq!(video.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
        assert_eq!(config.filter.unwrap().occupancy_threshold, Some(0.65));
        assert_eq!(config.orientation.unwrap().offset, Some([0.0, -2.0, 4.5]));
        let scene = config.scene.unwrap();
        assert_eq!(scene.view.as_deref(), Some("yx"));
        assert_eq!(scene.show_bounding_box, Some(false));
        assert_eq!(config.legend.unwrap().title_offset_y, Some(0.03));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml_str("[video]\nspeed = 2\n").is_err());
        assert!(FileConfig::from_toml_str("[camera]\nview = \"iso\"\n").is_err());
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[video\n").unwrap();

        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
