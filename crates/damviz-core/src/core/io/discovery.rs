use super::format::StructureFormat;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Path does not exist: {}", path.display())]
    PathNotFound { path: PathBuf },
    #[error("Unsupported file extension for {} (expected .cif or .pdb)", path.display())]
    UnsupportedExtension { path: PathBuf },
    #[error("Path is neither a file nor a directory: {}", path.display())]
    NotFileOrDirectory { path: PathBuf },
    #[error("Failed to read directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The outcome of expanding one user-supplied path.
#[derive(Debug)]
pub struct DiscoveredInput {
    pub requested: PathBuf,
    pub result: Result<Vec<PathBuf>, DiscoveryError>,
}

/// Expands each path into the structure files it designates.
///
/// A file is accepted when its extension names a supported format; a directory
/// contributes its direct children with supported extensions, sorted by file name.
/// Every requested path gets its own entry so that invalid paths can be reported
/// without discarding the valid ones.
pub fn discover_inputs<P: AsRef<Path>>(paths: &[P]) -> Vec<DiscoveredInput> {
    paths
        .iter()
        .map(|p| {
            let requested = p.as_ref().to_path_buf();
            let result = discover_path(&requested);
            if let Err(e) = &result {
                warn!("{}", e);
            }
            DiscoveredInput { requested, result }
        })
        .collect()
}

/// Flattens discovery results into the accepted files and the errors, preserving order
/// and dropping duplicate files.
pub fn partition_inputs(inputs: Vec<DiscoveredInput>) -> (Vec<PathBuf>, Vec<DiscoveryError>) {
    let mut files: Vec<PathBuf> = Vec::new();
    let mut errors = Vec::new();
    for input in inputs {
        match input.result {
            Ok(found) => {
                for file in found {
                    if !files.contains(&file) {
                        files.push(file);
                    }
                }
            }
            Err(e) => errors.push(e),
        }
    }
    (files, errors)
}

fn discover_path(path: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !path.exists() {
        return Err(DiscoveryError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    if path.is_file() {
        return match StructureFormat::from_path(path) {
            Some(_) => {
                debug!("Input is a file: {}", path.display());
                Ok(vec![path.to_path_buf()])
            }
            None => Err(DiscoveryError::UnsupportedExtension {
                path: path.to_path_buf(),
            }),
        };
    }

    if path.is_dir() {
        debug!("Input is a folder: {}", path.display());
        return scan_directory(path);
    }

    Err(DiscoveryError::NotFileOrDirectory {
        path: path.to_path_buf(),
    })
}

fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let io_err = |source| DiscoveryError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && StructureFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    debug!("Found {} structure file(s) in {}", files.len(), dir.display());
    Ok(files)
}
