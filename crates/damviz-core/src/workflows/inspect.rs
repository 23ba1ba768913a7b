use super::animate::FileError;
use super::geometry::prepare;
use crate::engine::config::AnimationConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, instrument};

/// Geometry summary of one particle, without rendering anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleReport {
    pub file: PathBuf,
    pub format: String,
    pub total_atoms: usize,
    pub kept_atoms: usize,
    pub occupancy_threshold: f64,
    /// Bounding-box side lengths along the principal axes, longest spread first.
    pub side_lengths: [f64; 3],
    pub labels: [String; 3],
    pub explained_variance: [f64; 3],
    pub bounds_min: [f64; 3],
    pub bounds_max: [f64; 3],
}

#[instrument(skip_all, name = "inspect_workflow", fields(input = %path.display()))]
pub fn run(path: &Path, config: &AnimationConfig) -> Result<ParticleReport, EngineError> {
    let geometry = prepare(path, config)?;
    let sides = geometry.bounds.side_lengths();
    let variance = geometry.oriented.explained_variance;

    Ok(ParticleReport {
        file: path.to_path_buf(),
        format: geometry
            .format
            .map(|f| f.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        total_atoms: geometry.total_atoms,
        kept_atoms: geometry.kept_atoms(),
        occupancy_threshold: config.filter.occupancy_threshold,
        side_lengths: [sides.x, sides.y, sides.z],
        labels: geometry.labels.clone().map(|label| label.text),
        explained_variance: [variance.x, variance.y, variance.z],
        bounds_min: geometry.bounds.min.coords.into(),
        bounds_max: geometry.bounds.max.coords.into(),
    })
}

pub fn run_batch(
    paths: &[PathBuf],
    config: &AnimationConfig,
    reporter: &ProgressReporter,
) -> (Vec<ParticleReport>, Vec<FileError>) {
    reporter.report(Progress::TaskStart {
        total: paths.len() as u64,
    });
    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for path in paths {
        match run(path, config) {
            Ok(report) => reports.push(report),
            Err(source) => {
                let failure = FileError {
                    path: path.clone(),
                    source,
                };
                error!("{}", failure);
                failures.push(failure);
            }
        }
        reporter.report(Progress::TaskIncrement { amount: 1 });
    }
    reporter.report(Progress::TaskFinish);
    (reports, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn pdb_line(serial: usize, x: f64, y: f64, z: f64, occupancy: f64) -> String {
        format!(
            "ATOM  {:>5}  CA  DUM A   1    {:>8.3}{:>8.3}{:>8.3}{:>6.2}  0.00\n",
            serial, x, y, z, occupancy
        )
    }

    #[test]
    fn reports_geometry_of_a_pdb_particle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rod.pdb");
        let mut text = String::new();
        for i in 0..5 {
            text.push_str(&pdb_line(i + 1, 0.0, 0.0, i as f64 * 2.5, 1.0));
        }
        text.push_str(&pdb_line(6, 1.0, 0.0, 0.0, 0.9));
        fs::write(&path, text).unwrap();

        let report = run(&path, &AnimationConfig::default()).unwrap();

        assert_eq!(report.format, "pdb");
        assert_eq!(report.total_atoms, 6);
        assert_eq!(report.kept_atoms, 6);
        assert!(report.side_lengths[0] >= report.side_lengths[1]);
        assert!(report.explained_variance[0] >= report.explained_variance[1]);
        assert_eq!(report.occupancy_threshold, 0.5);
    }

    #[test]
    fn batch_collects_failures_with_file_names() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.cif");
        fs::write(&broken, "ATOM 1 C CA . DUM A 1 1 x 0.0 0.0 1.0\n").unwrap();

        let (reports, failures) = run_batch(
            &[broken.clone()],
            &AnimationConfig::default(),
            &ProgressReporter::new(),
        );

        assert!(reports.is_empty());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, broken);
        assert!(failures[0].to_string().contains("broken.cif"));
    }
}
