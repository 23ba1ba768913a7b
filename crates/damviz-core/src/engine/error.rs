use super::video::VideoError;
use crate::core::io::error::StructureError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(
        "Occupancy values cannot be normalized: maximum occupancy is {max} (all values zero or invalid)"
    )]
    DegenerateOccupancy { max: f64 },

    #[error("Occupancy values cannot be normalized: found negative occupancy {value}")]
    NegativeOccupancy { value: f64 },

    #[error(
        "No atoms left after filtering: 0 of {total} atoms reach normalized occupancy {threshold}"
    )]
    EmptyFilterResult { threshold: f64, total: usize },

    #[error("Invalid rotation plan: {0}")]
    InvalidRotationPlan(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Video output failed: {source}")]
    Video {
        #[from]
        source: VideoError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
