use damviz::engine::config::{AnimationConfig, LabelStyle, LegendStyle, SceneConfig, VideoConfig};

/// Built-in fallbacks used when neither the command line nor the config file set a value.
pub struct DefaultsConfig {
    pub video: VideoConfig,
    pub occupancy_threshold: f64,
    pub scene: SceneConfig,
    pub labels: LabelStyle,
    pub legend: LegendStyle,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let core = AnimationConfig::default();
        Self {
            video: core.video,
            occupancy_threshold: core.filter.occupancy_threshold,
            scene: core.scene,
            labels: core.labels,
            legend: core.legend,
        }
    }
}
