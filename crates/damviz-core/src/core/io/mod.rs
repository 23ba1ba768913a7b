//! Provides input functionality for atom-model structure files.
//!
//! Two fixed record layouts are supported, both keyed on lines starting with the `ATOM`
//! marker: a whitespace-tokenized layout (`.cif`) and a fixed-column layout (`.pdb`). The
//! [`traits::StructureFile`] trait gives both readers a common API, [`format`] selects a
//! reader from a file extension and [`discovery`] expands user-supplied paths into the
//! list of files to process.

pub mod cif;
pub mod discovery;
pub mod error;
pub mod format;
pub mod pdb;
pub mod traits;

/// Record marker shared by both supported layouts.
pub const ATOM_RECORD_MARKER: &str = "ATOM";
