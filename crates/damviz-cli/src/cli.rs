use crate::utils::parser;
use clap::{Args, Parser, Subcommand};
use damviz::engine::camera::CameraView;
use nalgebra::Vector3;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "damviz contributors",
    version,
    about = "damviz - Turn dummy atom models (.cif / .pdb) into rotating MP4 videos with a principal-axis bounding box and particle dimensions.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for the final summary
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a rotating-camera video for every structure file found in the given paths.
    Render(RenderArgs),
    /// Print the oriented dimensions of every structure file without rendering.
    Inspect(InspectArgs),
}

/// Options shared by every command that runs the geometric pipeline.
#[derive(Args, Debug, Clone, Default)]
pub struct GeometryArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Minimum normalized occupancy (0-1) an atom needs to be kept.
    #[arg(short = 't', long = "threshold", value_name = "FLOAT")]
    pub occupancy_threshold: Option<f64>,

    /// Translation applied to the oriented model, in Angstroms.
    #[arg(long, value_name = "X,Y,Z", value_parser = parser::parse_offset, allow_hyphen_values = true)]
    pub offset: Option<Vector3<f64>>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S video.fps=60
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `render` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Structure files (.cif, .pdb) or directories containing them.
    #[arg(required = true, value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub geometry: GeometryArgs,

    /// Write videos into this directory instead of next to each input.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    // --- Video Overrides ---
    /// Video length in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Frames per second.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f64>,

    /// Number of full turns over the whole video.
    #[arg(long, value_name = "N")]
    pub rotations: Option<f64>,

    // --- Scene Overrides ---
    /// Initial camera: 'iso' or two axes, horizontal first (e.g. 'yx').
    #[arg(long, value_name = "VIEW", value_parser = parser::parse_view)]
    pub view: Option<CameraView>,

    /// Values above 1 zoom in, values below 1 zoom out.
    #[arg(long, value_name = "FACTOR")]
    pub zoom: Option<f64>,

    /// Rendered sphere diameter in pixels before zoom.
    #[arg(long, value_name = "PIXELS")]
    pub sphere_size: Option<f64>,

    /// Colour map for the occupancy colouring.
    #[arg(long, value_name = "NAME")]
    pub colormap: Option<String>,

    /// Hide the bounding box and its dimension labels.
    #[arg(long)]
    pub no_bounding_box: bool,

    /// Turn the camera upside down and mirror the labels.
    #[arg(long)]
    pub flip: bool,

    // --- Output Modes ---
    /// Also write every frame as a PNG into DIR/<input-stem>/.
    #[arg(long, value_name = "DIR")]
    pub frames_dir: Option<PathBuf>,

    /// Skip MP4 encoding; only useful together with --frames-dir.
    #[arg(long, requires = "frames_dir")]
    pub no_video: bool,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Structure files (.cif, .pdb) or directories containing them.
    #[arg(required = true, value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub geometry: GeometryArgs,

    /// Write the per-file summary as CSV.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}
