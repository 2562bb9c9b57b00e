//! Calorie expenditure estimation
//!
//! Four interchangeable estimators plus a selector that picks one based on
//! which measurements are present:
//!
//! - **MET-based**: `kcal = METs × weight(kg) × hours`, the universal fallback
//! - **Heart-rate-based**: linear HR formula for cardio with a heart-rate reading
//! - **Distance-based**: `kcal = weight × km × factor` for cardio with a distance
//! - **Strength-adjusted**: MET-based over the fraction of the session spent under load
//!
//! Every estimator is pure and returns whole kilocalories, never negative.
//! Rounding happens once, at the end of each calculation.

use crate::errors::{CalcError, CalcResult};
use crate::mets::lookup_mets;
use crate::models::ExerciseType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body weight assumed when the caller has none on record
pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;

/// Share of a strength session actually spent working (the rest is rest)
pub const STRENGTH_EFFICIENCY: f64 = 0.35;

/// Assumed time per strength set when no duration was logged
pub const STRENGTH_SECONDS_PER_SET: u32 = 600;

/// Age plugged into the heart-rate formula
pub const HEART_RATE_REFERENCE_AGE: f64 = 30.0;

/// Speeds above this count as running for the distance estimator
pub const RUNNING_PACE_THRESHOLD_KMH: f64 = 6.0;

const RUNNING_DISTANCE_FACTOR: f64 = 1.0;
const WALKING_DISTANCE_FACTOR: f64 = 0.6;
const MAX_INTENSITY_FACTOR: f64 = 2.0;

// ============================================================================
// Settings
// ============================================================================

/// Tunable constants of the estimators
///
/// The defaults reproduce the fixed formulas; callers normally leave them
/// alone and only override through configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalorieSettings {
    /// Weight used when params carry none
    pub default_body_weight_kg: f64,
    /// Multiplier applied to strength session duration
    pub strength_efficiency: f64,
    /// Duration inferred per strength set when none was logged
    pub strength_seconds_per_set: u32,
    /// Age used by the heart-rate formula
    pub heart_rate_reference_age: f64,
    /// Scale strength calories by lifted volume and reps (up to 2×)
    pub strength_intensity_adjustment: bool,
}

impl Default for CalorieSettings {
    fn default() -> Self {
        Self {
            default_body_weight_kg: DEFAULT_BODY_WEIGHT_KG,
            strength_efficiency: STRENGTH_EFFICIENCY,
            strength_seconds_per_set: STRENGTH_SECONDS_PER_SET,
            heart_rate_reference_age: HEART_RATE_REFERENCE_AGE,
            strength_intensity_adjustment: false,
        }
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Inputs to a calorie estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieCalculationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_heart_rate: Option<f64>,
    pub exercise_type: ExerciseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    /// Sum of weight × reps across the sets (strength only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_reps: Option<f64>,
}

impl CalorieCalculationParams {
    pub fn new(exercise_type: ExerciseType) -> Self {
        Self {
            weight_kg: None,
            duration_seconds: None,
            distance_km: None,
            avg_heart_rate: None,
            exercise_type,
            exercise_name: None,
            total_weight_kg: None,
            total_reps: None,
        }
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    pub fn with_duration(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = Some(duration_seconds);
        self
    }

    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }

    pub fn with_heart_rate(mut self, avg_heart_rate: f64) -> Self {
        self.avg_heart_rate = Some(avg_heart_rate);
        self
    }

    pub fn with_name(mut self, exercise_name: impl Into<String>) -> Self {
        self.exercise_name = Some(exercise_name.into());
        self
    }

    pub fn with_totals(mut self, total_weight_kg: f64, total_reps: f64) -> Self {
        self.total_weight_kg = Some(total_weight_kg);
        self.total_reps = Some(total_reps);
        self
    }

    /// Reject inputs outside the physical domain
    ///
    /// The estimators never call this; it exists for callers that prefer an
    /// error over arithmetic on nonsense values.
    pub fn validate(&self) -> CalcResult<()> {
        if let Some(weight) = self.weight_kg {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(CalcError::InvalidInput(format!(
                    "weight_kg must be positive, got {}",
                    weight
                )));
            }
        }
        let non_negative = [
            ("duration_seconds", self.duration_seconds),
            ("distance_km", self.distance_km),
            ("avg_heart_rate", self.avg_heart_rate),
            ("total_weight_kg", self.total_weight_kg),
            ("total_reps", self.total_reps),
        ];
        for (field, value) in non_negative {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(CalcError::InvalidInput(format!(
                        "{} must be a non-negative number, got {}",
                        field, v
                    )));
                }
            }
        }
        Ok(())
    }

    fn duration(&self) -> f64 {
        self.duration_seconds.unwrap_or(0.0)
    }

    fn heart_rate(&self) -> Option<f64> {
        self.avg_heart_rate.filter(|hr| *hr > 0.0)
    }

    fn distance(&self) -> Option<f64> {
        self.distance_km.filter(|km| *km > 0.0)
    }
}

// ============================================================================
// Strategy selection
// ============================================================================

/// Which estimator produced a figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalorieMethod {
    Mets,
    HeartRate,
    Distance,
    Strength,
}

impl fmt::Display for CalorieMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalorieMethod::Mets => "METs",
            CalorieMethod::HeartRate => "heart rate",
            CalorieMethod::Distance => "distance",
            CalorieMethod::Strength => "strength",
        };
        write!(f, "{}", name)
    }
}

/// Pick the estimator for a parameter set
///
/// Fixed priority: strength exercises always use the strength estimator;
/// cardio prefers heart rate, then distance, then METs.
pub fn select_method(params: &CalorieCalculationParams) -> CalorieMethod {
    match params.exercise_type {
        ExerciseType::Strength => CalorieMethod::Strength,
        ExerciseType::Cardio if params.heart_rate().is_some() => CalorieMethod::HeartRate,
        ExerciseType::Cardio if params.distance().is_some() => CalorieMethod::Distance,
        ExerciseType::Cardio => CalorieMethod::Mets,
    }
}

/// An estimate together with the method that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieEstimate {
    pub kcal: u32,
    pub method: CalorieMethod,
}

// ============================================================================
// Estimators
// ============================================================================

/// Round to whole kilocalories, clamped to `0..=u32::MAX`
fn to_kcal(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Calorie estimators bound to a set of [`CalorieSettings`]
#[derive(Debug, Clone, Default)]
pub struct CalorieEstimator {
    settings: CalorieSettings,
}

impl CalorieEstimator {
    pub fn new(settings: CalorieSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CalorieSettings {
        &self.settings
    }

    fn weight(&self, params: &CalorieCalculationParams) -> f64 {
        params.weight_kg.unwrap_or(self.settings.default_body_weight_kg)
    }

    /// Unrounded MET energy over an arbitrary duration
    fn mets_energy(&self, params: &CalorieCalculationParams, duration_seconds: f64) -> f64 {
        let mets = lookup_mets(params.exercise_name.as_deref(), params.exercise_type);
        mets * self.weight(params) * (duration_seconds / 3600.0)
    }

    /// `kcal = METs × weight(kg) × hours`
    pub fn by_mets(&self, params: &CalorieCalculationParams) -> u32 {
        to_kcal(self.mets_energy(params, params.duration()))
    }

    /// Heart-rate formula with a fixed reference age
    ///
    /// kcal/min = (0.6309 × HR + 0.1988 × weight + 0.2017 × age − 55.0969) / 4.184
    ///
    /// Falls back to METs when no positive heart rate is present.
    pub fn by_heart_rate(&self, params: &CalorieCalculationParams) -> u32 {
        let Some(heart_rate) = params.heart_rate() else {
            return self.by_mets(params);
        };

        let kcal_per_minute = (0.6309 * heart_rate
            + 0.1988 * self.weight(params)
            + 0.2017 * self.settings.heart_rate_reference_age
            - 55.0969)
            / 4.184;

        to_kcal(kcal_per_minute * (params.duration() / 60.0))
    }

    /// `kcal = weight × km × factor`, factor 1.0 above 6 km/h else 0.6
    ///
    /// Falls back to METs when no positive distance is present.
    pub fn by_distance(&self, params: &CalorieCalculationParams) -> u32 {
        let Some(distance_km) = params.distance() else {
            return self.by_mets(params);
        };

        let duration = params.duration();
        let pace_kmh = if duration > 0.0 {
            distance_km / (duration / 3600.0)
        } else {
            0.0
        };
        let factor = if pace_kmh > RUNNING_PACE_THRESHOLD_KMH {
            RUNNING_DISTANCE_FACTOR
        } else {
            WALKING_DISTANCE_FACTOR
        };

        to_kcal(self.weight(params) * distance_km * factor)
    }

    /// METs over the working share of a strength session
    ///
    /// `total_weight_kg`/`total_reps` only matter when
    /// `strength_intensity_adjustment` is enabled.
    pub fn strength(&self, params: &CalorieCalculationParams) -> u32 {
        let effective_duration = params.duration() * self.settings.strength_efficiency;
        let base = to_kcal(self.mets_energy(params, effective_duration));

        if !self.settings.strength_intensity_adjustment {
            return base;
        }

        match (params.total_weight_kg, params.total_reps) {
            (Some(total_weight), Some(total_reps)) if total_weight > 0.0 && total_reps > 0.0 => {
                let factor =
                    (1.0 + total_weight / 1000.0 + total_reps / 100.0).min(MAX_INTENSITY_FACTOR);
                to_kcal(base as f64 * factor)
            }
            _ => base,
        }
    }

    /// Estimate with the method [`select_method`] picks
    pub fn estimate(&self, params: &CalorieCalculationParams) -> CalorieEstimate {
        let method = select_method(params);
        let kcal = match method {
            CalorieMethod::Strength => self.strength(params),
            CalorieMethod::HeartRate => self.by_heart_rate(params),
            CalorieMethod::Distance => self.by_distance(params),
            CalorieMethod::Mets => self.by_mets(params),
        };
        CalorieEstimate { kcal, method }
    }

    pub fn optimal(&self, params: &CalorieCalculationParams) -> u32 {
        self.estimate(params).kcal
    }
}

// ============================================================================
// Default-settings entry points
// ============================================================================

pub fn calculate_calories_by_mets(params: &CalorieCalculationParams) -> u32 {
    CalorieEstimator::default().by_mets(params)
}

pub fn calculate_calories_by_heart_rate(params: &CalorieCalculationParams) -> u32 {
    CalorieEstimator::default().by_heart_rate(params)
}

pub fn calculate_calories_by_distance(params: &CalorieCalculationParams) -> u32 {
    CalorieEstimator::default().by_distance(params)
}

pub fn calculate_strength_calories(params: &CalorieCalculationParams) -> u32 {
    CalorieEstimator::default().strength(params)
}

/// Estimate with whichever method the available inputs allow
pub fn calculate_optimal_calories(params: &CalorieCalculationParams) -> u32 {
    CalorieEstimator::default().optimal(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn cardio() -> CalorieCalculationParams {
        CalorieCalculationParams::new(ExerciseType::Cardio)
    }

    fn strength() -> CalorieCalculationParams {
        CalorieCalculationParams::new(ExerciseType::Strength)
    }

    // =========================================================================
    // MET-based
    // =========================================================================

    #[test]
    fn test_mets_running_one_hour() {
        let params = cardio()
            .with_weight(70.0)
            .with_duration(3600.0)
            .with_name("ランニング");
        assert_eq!(calculate_calories_by_mets(&params), 560);
    }

    #[test]
    fn test_mets_defaults() {
        // No weight: 70kg. No duration: zero.
        assert_eq!(calculate_calories_by_mets(&cardio()), 0);
        let params = cardio().with_duration(1800.0);
        // 6.0 × 70 × 0.5
        assert_eq!(calculate_calories_by_mets(&params), 210);
    }

    #[test]
    fn test_mets_clamps_to_u32() {
        let params = cardio().with_weight(1.0e9).with_duration(3600.0);
        assert_eq!(calculate_calories_by_mets(&params), u32::MAX);
    }

    // =========================================================================
    // Heart rate
    // =========================================================================

    #[test]
    fn test_heart_rate_formula() {
        let params = cardio()
            .with_weight(70.0)
            .with_duration(1800.0)
            .with_heart_rate(150.0);
        assert_eq!(calculate_calories_by_heart_rate(&params), 427);
    }

    #[test]
    fn test_heart_rate_clamps_negative() {
        let params = cardio()
            .with_weight(50.0)
            .with_duration(1800.0)
            .with_heart_rate(60.0);
        assert_eq!(calculate_calories_by_heart_rate(&params), 0);
    }

    #[test]
    fn test_heart_rate_reference_age_is_configurable() {
        let params = cardio()
            .with_weight(70.0)
            .with_duration(1800.0)
            .with_heart_rate(150.0);
        let older = CalorieEstimator::new(CalorieSettings {
            heart_rate_reference_age: 50.0,
            ..Default::default()
        });
        assert!(older.by_heart_rate(&params) > calculate_calories_by_heart_rate(&params));
    }

    // =========================================================================
    // Distance
    // =========================================================================

    #[rstest]
    #[case::running(5.0, 1800.0, 350)]
    #[case::walking(3.0, 3600.0, 126)]
    #[case::exactly_six_kmh(6.0, 3600.0, 252)]
    #[case::no_duration(5.0, 0.0, 210)]
    fn test_distance_factor(#[case] km: f64, #[case] seconds: f64, #[case] expected: u32) {
        let params = cardio()
            .with_weight(70.0)
            .with_duration(seconds)
            .with_distance(km);
        assert_eq!(calculate_calories_by_distance(&params), expected);
    }

    // =========================================================================
    // Strength
    // =========================================================================

    #[test]
    fn test_strength_efficiency() {
        // 1800s × 0.35 = 630s; 3.5 × 70 × 0.175 = 42.875
        let params = strength().with_weight(70.0).with_duration(1800.0);
        assert_eq!(calculate_strength_calories(&params), 43);
    }

    #[test]
    fn test_strength_totals_ignored_by_default() {
        let base = strength().with_weight(70.0).with_duration(1800.0);
        let loaded = base.clone().with_totals(3000.0, 30.0);
        assert_eq!(
            calculate_strength_calories(&base),
            calculate_strength_calories(&loaded)
        );
    }

    #[test]
    fn test_strength_intensity_adjustment() {
        let estimator = CalorieEstimator::new(CalorieSettings {
            strength_intensity_adjustment: true,
            ..Default::default()
        });
        let params = strength()
            .with_weight(70.0)
            .with_duration(1800.0)
            .with_totals(3000.0, 30.0);
        // factor capped at 2.0
        assert_eq!(estimator.strength(&params), 86);

        let light = strength()
            .with_weight(70.0)
            .with_duration(1800.0)
            .with_totals(100.0, 10.0);
        // 43 × 1.2 = 51.6
        assert_eq!(estimator.strength(&light), 52);
    }

    // =========================================================================
    // Selector
    // =========================================================================

    #[test]
    fn test_selection_order() {
        let hr_and_distance = cardio().with_heart_rate(140.0).with_distance(5.0);
        assert_eq!(select_method(&hr_and_distance), CalorieMethod::HeartRate);

        let zero_hr = cardio().with_heart_rate(0.0).with_distance(5.0);
        assert_eq!(select_method(&zero_hr), CalorieMethod::Distance);

        let nothing = cardio().with_distance(0.0);
        assert_eq!(select_method(&nothing), CalorieMethod::Mets);

        let lifting = strength().with_heart_rate(150.0).with_distance(2.0);
        assert_eq!(select_method(&lifting), CalorieMethod::Strength);
    }

    #[test]
    fn test_optimal_matches_selected_estimator() {
        let params = cardio()
            .with_weight(80.0)
            .with_duration(2400.0)
            .with_distance(8.0);
        assert_eq!(
            calculate_optimal_calories(&params),
            calculate_calories_by_distance(&params)
        );
        let estimate = CalorieEstimator::default().estimate(&params);
        assert_eq!(estimate.method, CalorieMethod::Distance);
        assert_eq!(estimate.kcal, 640);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn test_validate() {
        assert!(cardio().with_weight(70.0).with_duration(60.0).validate().is_ok());
        assert!(matches!(
            cardio().with_weight(0.0).validate(),
            Err(CalcError::InvalidInput(_))
        ));
        assert!(cardio().with_duration(-1.0).validate().is_err());
        assert!(cardio().with_distance(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_params_json_defaults() {
        let params: CalorieCalculationParams =
            serde_json::from_str(r#"{"exercise_type":"cardio","exercise_name":"running","duration_seconds":3600}"#)
                .unwrap();
        assert_eq!(params.weight_kg, None);
        assert_eq!(calculate_optimal_calories(&params), 560);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: heart rate ≤ 0 behaves exactly like METs
        #[test]
        fn prop_heart_rate_fallback(
            weight in 30.0f64..200.0,
            duration in 0.0f64..14400.0,
            hr in -50.0f64..=0.0
        ) {
            let params = cardio().with_weight(weight).with_duration(duration).with_heart_rate(hr);
            prop_assert_eq!(
                calculate_calories_by_heart_rate(&params),
                calculate_calories_by_mets(&params)
            );
        }

        /// Property: distance ≤ 0 behaves exactly like METs
        #[test]
        fn prop_distance_fallback(
            weight in 30.0f64..200.0,
            duration in 0.0f64..14400.0,
            km in -10.0f64..=0.0
        ) {
            let params = cardio().with_weight(weight).with_duration(duration).with_distance(km);
            prop_assert_eq!(
                calculate_calories_by_distance(&params),
                calculate_calories_by_mets(&params)
            );
        }

        /// Property: strength burns less than unadjusted METs over the same time
        #[test]
        fn prop_strength_not_above_mets(weight in 30.0f64..200.0, duration in 0.0f64..14400.0) {
            let params = strength().with_weight(weight).with_duration(duration);
            prop_assert!(calculate_strength_calories(&params) <= calculate_calories_by_mets(&params));
        }

        /// Property: more time at the same MET value never burns less
        #[test]
        fn prop_mets_monotonic_in_duration(
            weight in 30.0f64..200.0,
            short in 0.0f64..3600.0,
            extra in 0.0f64..3600.0
        ) {
            let a = cardio().with_weight(weight).with_duration(short);
            let b = cardio().with_weight(weight).with_duration(short + extra);
            prop_assert!(calculate_calories_by_mets(&b) >= calculate_calories_by_mets(&a));
        }
    }

    // Non-negativity is carried by the u32 return type; this checks the
    // estimators stay finite and sane across the whole valid domain.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_estimates_bounded(
            weight in 1.0f64..300.0,
            duration in 0.0f64..86400.0,
            km in 0.0f64..200.0,
            hr in 0.0f64..220.0,
            is_cardio in any::<bool>()
        ) {
            let exercise_type = if is_cardio { ExerciseType::Cardio } else { ExerciseType::Strength };
            let params = CalorieCalculationParams::new(exercise_type)
                .with_weight(weight)
                .with_duration(duration)
                .with_distance(km)
                .with_heart_rate(hr);
            // 24h at 8 METs and 300kg is the ceiling of this domain.
            let ceiling = 8.0 * 300.0 * 24.0 + 300.0 * 200.0;
            for kcal in [
                calculate_calories_by_mets(&params),
                calculate_calories_by_heart_rate(&params),
                calculate_calories_by_distance(&params),
                calculate_strength_calories(&params),
                calculate_optimal_calories(&params),
            ] {
                prop_assert!((kcal as f64) <= ceiling);
            }
        }
    }
}
