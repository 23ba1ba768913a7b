use crate::cli::RenderArgs;
use crate::config::{RenderConfig, build_render_config};
use crate::error::{CliError, Result};
use crate::ui::{CliProgressHandler, UiEvent};
use damviz::core::io::discovery::{discover_inputs, partition_inputs};
use damviz::engine::progress::ProgressReporter;
use damviz::workflows::animate::{self, AnimationJob};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::info;

pub async fn run(args: RenderArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_render_config(&args)?;

    let (files, discovery_errors) = partition_inputs(discover_inputs(&args.paths));
    for e in &discovery_errors {
        eprintln!("✗ {}", e);
    }
    if files.is_empty() {
        return Err(discovery_errors
            .into_iter()
            .next()
            .map(CliError::from)
            .unwrap_or(CliError::NoInputs));
    }

    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir)?;
    }
    let jobs = build_jobs(&files, &config);

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Rendering {} file(s)...", jobs.len());
    info!("Invoking the animation workflow for {} job(s)...", jobs.len());
    let report = tokio::task::block_in_place(|| {
        animate::run_batch(&jobs, &config.core_config, &reporter)
    });

    for result in &report.successes {
        let [a, b, c] = &result.labels;
        let destination = result
            .video
            .as_ref()
            .or(result.frames_dir.as_ref())
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        println!(
            "  {} -> {} ({} x {} x {}, {} of {} atoms)",
            result.input.display(),
            destination,
            a,
            b,
            c,
            result.kept_atoms,
            result.total_atoms
        );
    }
    for failure in &report.failures {
        eprintln!("✗ {}", failure);
    }
    println!("{}", report);

    let failed = report.failures.len() + discovery_errors.len();
    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: report.total() + discovery_errors.len(),
        });
    }
    Ok(())
}

/// One job per input; PNG frames of each input go to their own subdirectory.
fn build_jobs(files: &[PathBuf], config: &RenderConfig) -> Vec<AnimationJob> {
    files
        .iter()
        .map(|input| {
            let mut job = AnimationJob::for_input(input, config.output_dir.as_deref());
            if !config.write_video {
                job.video = None;
            }
            job.frames_dir = config
                .frames_dir
                .as_deref()
                .map(|dir| frames_dir_for(dir, input));
            job
        })
        .collect()
}

fn frames_dir_for(root: &Path, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    root.join(stem)
}
