//! One-rep-max estimation (Epley)

use crate::errors::{CalcError, CalcResult};
use crate::models::{SetRecord, StrengthSet, Workout};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entries kept in a one-rep-max history
pub const ONE_REP_MAX_HISTORY_LIMIT: usize = 20;

/// How a one-rep max was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OneRepMaxFormula {
    /// A single rep was lifted; the weight is the max
    Actual,
    /// `weight × (1 + reps / 30)`
    Epley,
}

impl fmt::Display for OneRepMaxFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OneRepMaxFormula::Actual => write!(f, "Actual"),
            OneRepMaxFormula::Epley => write!(f, "Epley"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneRepMaxResult {
    pub estimated_weight_kg: f64,
    pub formula: OneRepMaxFormula,
}

/// Estimate a one-rep max from a weight lifted for `reps` repetitions
///
/// A single rep is returned unchanged. Anything else goes through Epley,
/// rounded to one decimal. Weight is not validated and propagates
/// arithmetically; see [`try_estimate_one_rep_max`] for a checked version.
pub fn estimate_one_rep_max(weight_kg: f64, reps: u32) -> OneRepMaxResult {
    if reps == 1 {
        return OneRepMaxResult {
            estimated_weight_kg: weight_kg,
            formula: OneRepMaxFormula::Actual,
        };
    }

    let estimated = weight_kg * (1.0 + reps as f64 / 30.0);
    OneRepMaxResult {
        estimated_weight_kg: (estimated * 10.0).round() / 10.0,
        formula: OneRepMaxFormula::Epley,
    }
}

/// Like [`estimate_one_rep_max`] but rejects non-positive weight and zero reps
pub fn try_estimate_one_rep_max(weight_kg: f64, reps: u32) -> CalcResult<OneRepMaxResult> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "weight_kg must be positive, got {}",
            weight_kg
        )));
    }
    if reps < 1 {
        return Err(CalcError::InvalidInput("reps must be at least 1".to_string()));
    }
    Ok(estimate_one_rep_max(weight_kg, reps))
}

/// One-rep max of the heaviest strength set
///
/// The first set wins when several share the top weight. Returns `None` when
/// there is no strength set, or the heaviest one has no load or no reps.
pub fn best_set_one_rep_max(sets: &[SetRecord]) -> Option<OneRepMaxResult> {
    let heaviest = sets
        .iter()
        .filter_map(SetRecord::as_strength)
        .fold(None, |best: Option<&StrengthSet>, set| match best {
            Some(b) if set.weight_kg <= b.weight_kg => Some(b),
            _ => Some(set),
        })?;

    if heaviest.weight_kg > 0.0 && heaviest.reps > 0 {
        Some(estimate_one_rep_max(heaviest.weight_kg, heaviest.reps))
    } else {
        None
    }
}

// ============================================================================
// History
// ============================================================================

/// One working set of an exercise with its estimated max
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneRepMaxEntry {
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub reps: u32,
    pub estimated_1rm: f64,
    pub rpe: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneRepMaxHistory {
    pub exercise_name: String,
    pub muscle_group: String,
    /// Best estimate over every working set, not only the listed ones; 0 when none
    pub max_estimated_1rm: f64,
    /// Newest first, at most [`ONE_REP_MAX_HISTORY_LIMIT`]
    pub history: Vec<OneRepMaxEntry>,
}

/// Estimated one-rep maxes of every working set of an exercise
///
/// Exercise names match after trimming and lower-casing. Warm-up sets are
/// skipped. Sets from the same day keep their logged order.
pub fn one_rep_max_history<'a>(
    workouts: impl IntoIterator<Item = &'a Workout>,
    exercise_name: &str,
) -> OneRepMaxHistory {
    let wanted = exercise_name.trim().to_lowercase();
    let mut muscle_group = None;
    let mut entries: Vec<OneRepMaxEntry> = Vec::new();

    for workout in workouts {
        for (exercise, set) in workout.sets() {
            if set.is_warmup || exercise.name.trim().to_lowercase() != wanted {
                continue;
            }
            let Some(strength) = set.as_strength() else {
                continue;
            };
            muscle_group.get_or_insert_with(|| exercise.muscle_group.clone());
            entries.push(OneRepMaxEntry {
                date: workout.date,
                weight_kg: strength.weight_kg,
                reps: strength.reps,
                estimated_1rm: estimate_one_rep_max(strength.weight_kg, strength.reps).estimated_weight_kg,
                rpe: strength.rpe,
            });
        }
    }

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    let max_estimated_1rm = entries
        .iter()
        .map(|e| e.estimated_1rm)
        .fold(0.0, f64::max);
    entries.truncate(ONE_REP_MAX_HISTORY_LIMIT);

    OneRepMaxHistory {
        exercise_name: exercise_name.trim().to_string(),
        muscle_group: muscle_group.unwrap_or_default(),
        max_estimated_1rm,
        history: entries,
    }
}
