mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_inspect_config, build_render_config};
pub use models::RenderConfig;
