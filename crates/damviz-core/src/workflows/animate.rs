use super::geometry::{PreparedGeometry, prepare};
use crate::engine::config::AnimationConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::raster::{FrameRenderer, RasterRenderer};
use crate::engine::rotation::{RotationPlan, animate};
use crate::engine::scene::{compose, initial_camera};
use crate::engine::video::{FfmpegSink, FrameSink, PngSequenceSink, TeeSink};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, instrument};

pub const VIDEO_EXTENSION: &str = "mp4";

/// One input file and where its outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationJob {
    pub input: PathBuf,
    /// MP4 destination; `None` skips encoding.
    pub video: Option<PathBuf>,
    /// Directory for a PNG copy of every frame.
    pub frames_dir: Option<PathBuf>,
}

impl AnimationJob {
    /// A job writing `<stem>.mp4` next to the input, or into `output_dir` when given.
    pub fn for_input(input: &Path, output_dir: Option<&Path>) -> Self {
        Self {
            input: input.to_path_buf(),
            video: Some(output_path_for(input, output_dir)),
            frames_dir: None,
        }
    }
}

/// `<stem>.mp4` alongside `input`, or inside `output_dir`.
pub fn output_path_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let mut name = PathBuf::from(stem);
    name.set_extension(VIDEO_EXTENSION);
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationResult {
    pub input: PathBuf,
    pub video: Option<PathBuf>,
    pub frames_dir: Option<PathBuf>,
    pub frames: usize,
    pub total_atoms: usize,
    pub kept_atoms: usize,
    pub labels: [String; 3],
}

/// A failure tied to the input file that caused it.
#[derive(Debug, Error)]
#[error("{}: {source}", path.display())]
pub struct FileError {
    pub path: PathBuf,
    pub source: EngineError,
}

/// Per-file outcomes of a batch; one failing file never prevents the others.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub successes: Vec<AnimationResult>,
    pub failures: Vec<FileError>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} file(s) rendered, {} failed",
            self.successes.len(),
            self.total(),
            self.failures.len()
        )
    }
}

fn open_sink(
    job: &AnimationJob,
    config: &AnimationConfig,
) -> Result<Box<dyn FrameSink>, EngineError> {
    let (width, height) = (config.scene.width, config.scene.height);
    let mut tee = TeeSink::new();
    // The encoder finishes first so a failed encode also discards the PNG frames.
    if let Some(video) = &job.video {
        tee.push(Box::new(FfmpegSink::create(
            &config.video.ffmpeg_path,
            video,
            width,
            height,
            config.video.fps,
        )?));
    }
    if let Some(dir) = &job.frames_dir {
        tee.push(Box::new(PngSequenceSink::create(dir, width, height)?));
    }
    if tee.is_empty() {
        return Err(EngineError::Internal(
            "animation job has neither a video nor a frames directory".into(),
        ));
    }
    Ok(Box::new(tee))
}

/// Composes the scene for prepared geometry and streams every frame into `sink`.
pub fn render_frames<R, S>(
    geometry: &PreparedGeometry,
    config: &AnimationConfig,
    renderer: &mut R,
    sink: &mut S,
    reporter: &ProgressReporter,
) -> Result<usize, EngineError>
where
    R: FrameRenderer + ?Sized,
    S: FrameSink + ?Sized,
{
    let plan = RotationPlan::new(
        config.video.duration_secs,
        config.video.fps,
        config.video.rotations,
    )?;
    let scene = compose(&geometry.oriented, &geometry.bounds, &geometry.labels, config)?;
    let mut camera = initial_camera(&config.scene, &geometry.bounds);
    animate(&plan, &scene, &mut camera, renderer, sink, reporter)
}

/// Renders one input file into its outputs.
#[instrument(skip_all, name = "animate_workflow", fields(input = %job.input.display()))]
pub fn run(
    job: &AnimationJob,
    config: &AnimationConfig,
    reporter: &ProgressReporter,
) -> Result<AnimationResult, EngineError> {
    reporter.report(Progress::StatusUpdate {
        text: "Preparing geometry".to_string(),
    });
    let geometry = prepare(&job.input, config)?;
    let summary = format!(
        "Kept {} of {} atoms; box {} x {} x {}",
        geometry.kept_atoms(),
        geometry.total_atoms,
        geometry.labels[0].text,
        geometry.labels[1].text,
        geometry.labels[2].text
    );
    info!("{}", summary);
    reporter.report(Progress::Message(summary));

    // Opened only after the geometry succeeded so failing inputs leave no partial output.
    let mut sink = open_sink(job, config)?;
    let mut renderer = RasterRenderer::new();
    reporter.report(Progress::StatusUpdate {
        text: "Rendering frames".to_string(),
    });
    let frames = render_frames(&geometry, config, &mut renderer, sink.as_mut(), reporter)?;
    reporter.report(Progress::StatusUpdate {
        text: "Finalizing output".to_string(),
    });
    sink.finish()?;
    reporter.report(Progress::TaskFinish);

    Ok(AnimationResult {
        input: job.input.clone(),
        video: job.video.clone(),
        frames_dir: job.frames_dir.clone(),
        frames,
        total_atoms: geometry.total_atoms,
        kept_atoms: geometry.kept_atoms(),
        labels: geometry.labels.clone().map(|label| label.text),
    })
}

/// Runs every job in order and collects per-file outcomes.
pub fn run_batch(
    jobs: &[AnimationJob],
    config: &AnimationConfig,
    reporter: &ProgressReporter,
) -> BatchReport {
    let mut report = BatchReport::default();
    for job in jobs {
        let name = job
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| job.input.display().to_string());
        reporter.report(Progress::PhaseStart { name });

        match run(job, config, reporter) {
            Ok(result) => report.successes.push(result),
            Err(source) => {
                let failure = FileError {
                    path: job.input.clone(),
                    source,
                };
                error!("{}", failure);
                report.failures.push(failure);
            }
        }
        reporter.report(Progress::PhaseFinish);
    }
    info!("{}", report);
    report
}
