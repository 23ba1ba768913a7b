//! # Core Module
//!
//! Fundamental data structures and file handling for damviz.
//!
//! - **Particle Representation** ([`models`]) - Atom records, the raw, filtered and
//!   oriented particle models, and the bounding box with its dimension labels
//! - **File I/O** ([`io`]) - Readers for the two fixed atom-record formats and discovery of
//!   input files from user-supplied paths

pub mod io;
pub mod models;
