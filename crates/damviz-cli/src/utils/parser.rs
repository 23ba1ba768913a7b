use damviz::engine::camera::CameraView;
use nalgebra::Vector3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid offset '{0}'. Expected three comma-separated numbers (e.g., '0,0,-5.5').")]
    InvalidOffset(String),

    #[error("Invalid boolean '{0}'. Expected 'true' or 'false'.")]
    InvalidBool(String),

    #[error("{0}")]
    InvalidView(String),
}

/// Parses `x,y,z` (optionally wrapped in brackets) into an offset vector.
pub fn parse_offset(s: &str) -> Result<Vector3<f64>, ParseError> {
    let err = || ParseError::InvalidOffset(s.to_string());
    let inner = s
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();

    let values = inner
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|_| err()))
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        &[x, y, z] if values.iter().all(|v| v.is_finite()) => Ok(Vector3::new(x, y, z)),
        _ => Err(err()),
    }
}

pub fn parse_view(s: &str) -> Result<CameraView, ParseError> {
    s.parse::<CameraView>()
        .map_err(|e| ParseError::InvalidView(e.to_string()))
}

pub fn parse_bool(s: &str) -> Result<bool, ParseError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ParseError::InvalidBool(s.to_string())),
    }
}
