use crate::cli::InspectArgs;
use crate::config::build_inspect_config;
use crate::error::{CliError, Result};
use crate::ui::{CliProgressHandler, UiEvent};
use damviz::core::io::discovery::{discover_inputs, partition_inputs};
use damviz::engine::progress::{Progress, ProgressReporter};
use damviz::workflows::inspect::{self, ParticleReport};
use serde::Serialize;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::info;

/// Flat CSV record; the csv writer cannot emit nested arrays under a header row.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    file: String,
    format: &'a str,
    total_atoms: usize,
    kept_atoms: usize,
    occupancy_threshold: f64,
    side_a: f64,
    side_b: f64,
    side_c: f64,
    variance_a: f64,
    variance_b: f64,
    variance_c: f64,
    min_x: f64,
    min_y: f64,
    min_z: f64,
    max_x: f64,
    max_y: f64,
    max_z: f64,
}

impl<'a> From<&'a ParticleReport> for CsvRow<'a> {
    fn from(r: &'a ParticleReport) -> Self {
        Self {
            file: r.file.display().to_string(),
            format: &r.format,
            total_atoms: r.total_atoms,
            kept_atoms: r.kept_atoms,
            occupancy_threshold: r.occupancy_threshold,
            side_a: r.side_lengths[0],
            side_b: r.side_lengths[1],
            side_c: r.side_lengths[2],
            variance_a: r.explained_variance[0],
            variance_b: r.explained_variance[1],
            variance_c: r.explained_variance[2],
            min_x: r.bounds_min[0],
            min_y: r.bounds_min[1],
            min_z: r.bounds_min[2],
            max_x: r.bounds_max[0],
            max_y: r.bounds_max[1],
            max_z: r.bounds_max[2],
        }
    }
}

pub async fn run(args: InspectArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    let config = build_inspect_config(&args)?;

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

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    reporter.report(Progress::PhaseStart {
        name: "Inspecting particles".to_string(),
    });
    info!("Inspecting {} file(s)...", files.len());
    let (reports, failures) =
        tokio::task::block_in_place(|| inspect::run_batch(&files, &config, &reporter));
    reporter.report(Progress::PhaseFinish);

    println!("{}", format_table(&reports));
    for failure in &failures {
        eprintln!("✗ {}", failure);
    }

    if let Some(csv_path) = &args.csv {
        write_csv(csv_path, &reports)?;
        println!("Report written to {}", csv_path.display());
    }

    let failed = failures.len() + discovery_errors.len();
    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: reports.len() + failed,
        });
    }
    Ok(())
}

fn format_table(reports: &[ParticleReport]) -> String {
    let name_width = reports
        .iter()
        .filter_map(|r| r.file.file_name())
        .map(|n| n.to_string_lossy().chars().count())
        .max()
        .unwrap_or(0)
        .max("file".len());

    let mut out = format!(
        "{:<name_width$}  {:>6}  {:>6}  {:>8}  {:>8}  {:>8}",
        "file", "atoms", "kept", "a", "b", "c"
    );
    for r in reports {
        let name = r
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        out.push_str(&format!(
            "\n{:<name_width$}  {:>6}  {:>6}  {:>8}  {:>8}  {:>8}",
            name, r.total_atoms, r.kept_atoms, r.labels[0], r.labels[1], r.labels[2]
        ));
    }
    out
}

fn write_csv(path: &Path, reports: &[ParticleReport]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for report in reports {
        writer.serialize(CsvRow::from(report))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::GeometryArgs;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn report(name: &str, sides: [f64; 3], labels: [&str; 3]) -> ParticleReport {
        ParticleReport {
            file: PathBuf::from(name),
            format: "pdb".to_string(),
            total_atoms: 120,
            kept_atoms: 100,
            occupancy_threshold: 0.5,
            side_lengths: sides,
            labels: labels.map(String::from),
            explained_variance: [10.0, 5.0, 1.0],
            bounds_min: [-sides[0] / 2.0, -sides[1] / 2.0, -sides[2] / 2.0],
            bounds_max: [sides[0] / 2.0, sides[1] / 2.0, sides[2] / 2.0],
        }
    }

    fn write_pdb(path: &Path) {
        let mut text = String::new();
        for i in 0..10 {
            text.push_str(&format!(
                "ATOM  {:>5}  CA  DUM A   1    {:>8.3}{:>8.3}{:>8.3}{:>6.2}  0.00\n",
                i + 1,
                i as f64 * 2.0,
                (i % 2) as f64,
                0.0,
                1.0
            ));
        }
        fs::write(path, text).unwrap();
    }

    #[test]
    fn table_lists_one_row_per_report() {
        let table = format_table(&[
            report("/data/long_particle_name.pdb", [40.0, 20.0, 10.0], ["40 Å", "20 Å", "10 Å"]),
            report("b.cif", [8.0, 4.0, 2.0], ["8 Å", "4 Å", "2 Å"]),
        ]);

        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("file"));
        assert!(lines[1].starts_with("long_particle_name.pdb"));
        assert!(lines[1].contains("40 Å"));
        assert!(lines[2].starts_with("b.cif"));
        assert!(lines[2].trim_end().ends_with("2 Å"));
    }

    #[test]
    fn csv_has_flat_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_csv(&path, &[report("a.pdb", [40.0, 20.0, 10.0], ["40 Å", "20 Å", "10 Å"])])
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "file,format,total_atoms,kept_atoms,occupancy_threshold,side_a,side_b,side_c,\
             variance_a,variance_b,variance_c,min_x,min_y,min_z,max_x,max_y,max_z"
        );
        assert_eq!(
            lines.next().unwrap(),
            "a.pdb,pdb,120,100,0.5,40.0,20.0,10.0,10.0,5.0,1.0,-20.0,-10.0,-5.0,20.0,10.0,5.0"
        );
        assert!(lines.next().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn inspects_files_and_writes_csv() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("particle.pdb");
        write_pdb(&input);
        let csv_path = dir.path().join("out.csv");
        let (sender, _receiver) = mpsc::channel(64);

        let args = InspectArgs {
            paths: vec![dir.path().to_path_buf()],
            geometry: GeometryArgs::default(),
            csv: Some(csv_path.clone()),
        };
        run(args, sender).await.unwrap();

        let content = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("particle.pdb"));
    }
}
