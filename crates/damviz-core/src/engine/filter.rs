use super::error::EngineError;
use crate::core::models::particle::{FilteredModel, ParticleModel};
use tracing::debug;

/// Scales occupancies so that the largest value becomes exactly 1.0.
///
/// # Errors
///
/// Returns [`EngineError::DegenerateOccupancy`] when the maximum is zero, negative or not
/// finite, or when any occupancy is negative. Normalized values always lie in `[0, 1]`.
pub fn normalize_occupancies(occupancies: &[f64]) -> Result<Vec<f64>, EngineError> {
    let max = occupancies
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    if !max.is_finite() || max <= 0.0 {
        return Err(EngineError::DegenerateOccupancy { max });
    }
    if let Some(&min) = occupancies.iter().find(|&&o| o < 0.0) {
        return Err(EngineError::NegativeOccupancy { value: min });
    }

    Ok(occupancies.iter().map(|&o| o / max).collect())
}

pub fn keep_mask(normalized: &[f64], threshold: f64) -> Vec<bool> {
    normalized.iter().map(|&o| o >= threshold).collect()
}

/// Keeps the atoms whose normalized occupancy is at least `threshold`.
///
/// Coordinates and normalized occupancies are filtered jointly and keep their file order.
///
/// # Errors
///
/// Returns [`EngineError::DegenerateOccupancy`] if normalization is impossible and
/// [`EngineError::EmptyFilterResult`] if no atom reaches the threshold.
pub fn filter_by_occupancy(
    model: &ParticleModel,
    threshold: f64,
) -> Result<FilteredModel, EngineError> {
    let normalized = normalize_occupancies(model.occupancies())?;
    let mask = keep_mask(&normalized, threshold);

    let (coordinates, normalized_occupancies): (Vec<_>, Vec<_>) = model
        .coordinates()
        .iter()
        .zip(normalized)
        .zip(&mask)
        .filter(|(_, keep)| **keep)
        .map(|((&p, o), _)| (p, o))
        .unzip();

    if coordinates.is_empty() {
        return Err(EngineError::EmptyFilterResult {
            threshold,
            total: model.len(),
        });
    }

    let discarded = model.len() - coordinates.len();
    debug!(
        "Occupancy filter at {:.3} kept {} of {} atoms.",
        threshold,
        coordinates.len(),
        model.len()
    );

    Ok(FilteredModel {
        coordinates,
        normalized_occupancies,
        threshold,
        discarded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomRecord;
    use nalgebra::Point3;

    fn model_with_occupancies(occupancies: &[f64]) -> ParticleModel {
        ParticleModel::from_records(
            occupancies
                .iter()
                .enumerate()
                .map(|(i, &o)| AtomRecord::new(Point3::new(i as f64, 0.0, 0.0), o)),
        )
    }

    #[test]
    fn normalized_values_have_unit_maximum_and_stay_in_range() {
        let normalized = normalize_occupancies(&[0.2, 0.8, 0.4, 0.0]).unwrap();
        let max = normalized.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        assert_eq!(max, 1.0);
        assert!(normalized.iter().all(|&o| (0.0..=1.0).contains(&o)));
        assert_eq!(normalized[0], 0.25);
    }

    #[test]
    fn all_zero_occupancies_are_degenerate() {
        let result = normalize_occupancies(&[0.0, 0.0, 0.0]);
        assert!(matches!(
            result,
            Err(EngineError::DegenerateOccupancy { max }) if max == 0.0
        ));
    }

    #[test]
    fn nan_occupancy_maximum_is_degenerate() {
        assert!(normalize_occupancies(&[f64::NAN]).is_err());
        assert!(normalize_occupancies(&[1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn negative_occupancy_is_rejected() {
        let result = normalize_occupancies(&[1.0, -0.25, 0.5]);
        assert!(matches!(
            result,
            Err(EngineError::NegativeOccupancy { value }) if value == -0.25
        ));

        let model = model_with_occupancies(&[1.0, -0.5]);
        assert!(filter_by_occupancy(&model, 0.0).is_err());
    }

    #[test]
    fn four_atom_scenario_keeps_first_two() {
        let model = model_with_occupancies(&[1.0, 0.8, 0.4, 0.1]);
        let filtered = filter_by_occupancy(&model, 0.5).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.coordinates[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(filtered.coordinates[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(filtered.normalized_occupancies, vec![1.0, 0.8]);
        assert_eq!(filtered.discarded, 2);
    }

    #[test]
    fn threshold_is_inclusive() {
        let model = model_with_occupancies(&[2.0, 1.0]);
        let filtered = filter_by_occupancy(&model, 0.5).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn filtering_is_idempotent() {
        let model = model_with_occupancies(&[0.8, 0.2, 0.6, 0.4, 0.5]);
        let once = filter_by_occupancy(&model, 0.5).unwrap();

        let refiltered_input = ParticleModel::from_records(
            once.coordinates
                .iter()
                .zip(&once.normalized_occupancies)
                .map(|(&p, &o)| AtomRecord::new(p, o)),
        );
        let twice = filter_by_occupancy(&refiltered_input, 0.5).unwrap();

        assert_eq!(twice.coordinates, once.coordinates);
        assert_eq!(twice.normalized_occupancies, once.normalized_occupancies);
        assert_eq!(twice.discarded, 0);
    }

    #[test]
    fn threshold_above_every_value_is_an_empty_result() {
        let model = model_with_occupancies(&[1.0, 0.2]);
        // The maximum always normalizes to 1.0, so only thresholds above 1 can empty the set.
        let result = filter_by_occupancy(&model, 1.01);
        assert!(matches!(
            result,
            Err(EngineError::EmptyFilterResult { total: 2, .. })
        ));
    }
}
