//! Data models describing a particle at each stage of the pipeline.

pub mod atom;
pub mod bounds;
pub mod particle;
