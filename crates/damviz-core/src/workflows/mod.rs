//! # Workflows Module
//!
//! High-level entry points that run the whole pipeline for one or many input files.
//!
//! - [`geometry`] - Parse, filter, orient, bound and label one particle
//! - [`animate`] - Render a rotating-camera video per input, with per-file batch outcomes
//! - [`inspect`] - Report the oriented geometry of each input without rendering

pub mod animate;
pub mod geometry;
pub mod inspect;
