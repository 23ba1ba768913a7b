//! # damviz Core Library
//!
//! Converts dummy atom models (DAMs) of particle shapes into rotating-camera videos that
//! show the occupancy-filtered point cloud, its principal-axis-aligned bounding box and
//! the particle dimensions.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ParticleModel`, `OrientedModel`,
//!   `BoundingBox`) and the readers for the two supported structure formats, plus input
//!   discovery.
//!
//! - **[`engine`]: The Logic Core.** The geometric pipeline (occupancy filtering,
//!   principal-axis orientation, bounding box and label generation), the camera and the
//!   software renderer, the rotation animator and the video frame sinks.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together: one input file
//!   becomes one video (`animate`) or one geometry report (`inspect`), and batches report
//!   per-file outcomes instead of aborting on the first failure.

pub mod core;
pub mod engine;
pub mod workflows;
