//! # Engine Module
//!
//! The geometric pipeline and the rendering machinery that turn a parsed particle model
//! into video frames.
//!
//! ## Overview
//!
//! Each input is processed strictly in sequence: occupancy normalization and filtering,
//! principal-axis orientation, bounding box and dimension labels, scene composition, and
//! finally a fixed-step azimuthal camera rotation that emits one frame per step to a
//! frame sink.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - The immutable per-run parameter set and its builder
//! - **Error Handling** ([`error`]) - Engine-specific error types
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Geometry** ([`filter`], [`orientation`], [`labels`]) - The occupancy filter, the
//!   principal-axis solver and the bounding box / label generator
//! - **Rendering** ([`camera`], [`colormap`], [`scene`], [`raster`]) - Camera presets,
//!   colour maps, scene composition and the software rasterizer
//! - **Animation** ([`rotation`], [`video`]) - The rotation plan, the animator loop and the
//!   frame sinks that encode or store the frames

pub mod camera;
pub mod colormap;
pub mod config;
pub mod error;
pub mod filter;
pub mod labels;
pub mod orientation;
pub mod progress;
pub mod raster;
pub mod rotation;
pub mod scene;
pub(crate) mod text;
pub mod video;
