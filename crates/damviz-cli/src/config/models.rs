use damviz::engine::config::AnimationConfig;
use std::path::PathBuf;

/// Fully resolved settings for the `render` command.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub core_config: AnimationConfig,
    pub output_dir: Option<PathBuf>,
    pub frames_dir: Option<PathBuf>,
    pub write_video: bool,
}
