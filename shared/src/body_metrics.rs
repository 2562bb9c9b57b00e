//! Body metrics analysis
//!
//! BMI, basal metabolic rate, daily calorie needs and body-fat estimates
//! derived from weigh-ins, the latest height and the user's profile.
//!
//! All calculations are pure; values are rounded the way they are displayed
//! (one decimal for weights and BMI, whole kilocalories for energy).

use crate::errors::{CalcError, CalcResult};
use crate::models::BodyMetricRecord;
use crate::round1;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Weigh-ins older than this are ignored by the summary
pub const ANALYSIS_WINDOW_DAYS: i64 = 30;

/// Default look-back for the BMI history
pub const BMI_HISTORY_DAYS: u32 = 90;

/// First day of a look-back window ending at `today`
fn window_start(today: NaiveDate, days: i64) -> NaiveDate {
    today
        .checked_sub_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MIN)
}

// ============================================================================
// Profile
// ============================================================================

/// Gender as recorded on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Profile fields the calculations depend on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Latest recorded height
    #[serde(default)]
    pub height_cm: Option<f64>,
}

impl UserProfile {
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.map(|birth| age_on(birth, today))
    }
}

/// Whole years between `birth_date` and `today`; zero for future births
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

// ============================================================================
// BMI
// ============================================================================

/// BMI = weight(kg) / height(m)², one decimal
///
/// `None` for a non-positive height.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(round1(weight_kg / (height_m * height_m)))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
}

/// Weights giving a BMI between 18.5 and 24.9 at this height
pub fn ideal_weight_range(height_cm: f64) -> WeightRange {
    let height_m_sq = (height_cm / 100.0).powi(2);
    WeightRange {
        min: round1(18.5 * height_m_sq),
        max: round1(24.9 * height_m_sq),
    }
}

/// BMI band, with a more lenient scale from age 65
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiForAgeCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

pub fn classify_bmi_for_age(bmi: f64, age_years: u32) -> BmiForAgeCategory {
    if age_years < 65 {
        return classify_bmi(bmi);
    }
    if bmi < 20.0 {
        BmiForAgeCategory::Underweight
    } else if bmi < 27.0 {
        BmiForAgeCategory::Normal
    } else {
        BmiForAgeCategory::Overweight
    }
}

/// Standard adult BMI bands
pub fn classify_bmi(bmi: f64) -> BmiForAgeCategory {
    if bmi < 18.5 {
        BmiForAgeCategory::Underweight
    } else if bmi < 25.0 {
        BmiForAgeCategory::Normal
    } else if bmi < 30.0 {
        BmiForAgeCategory::Overweight
    } else {
        BmiForAgeCategory::Obese
    }
}

// ============================================================================
// Energy
// ============================================================================

/// Mifflin-St Jeor basal metabolic rate, whole kcal
///
/// Men: 10 × kg + 6.25 × cm − 5 × age + 5
/// Women: 10 × kg + 6.25 × cm − 5 × age − 161
///
/// `None` when gender is `Other`; the equation has no neutral form.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> Option<f64> {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match gender {
        Gender::Male => Some((base + 5.0).round()),
        Gender::Female => Some((base - 161.0).round()),
        Gender::Other => None,
    }
}

/// Daily energy needs per activity level, whole kcal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyCalorieNeeds {
    /// Desk job, little exercise
    pub sedentary: f64,
    pub light: f64,
    pub moderate: f64,
    pub active: f64,
    pub very_active: f64,
}

impl DailyCalorieNeeds {
    pub fn from_bmr(bmr: f64) -> Self {
        Self {
            sedentary: (bmr * 1.2).round(),
            light: (bmr * 1.375).round(),
            moderate: (bmr * 1.55).round(),
            active: (bmr * 1.725).round(),
            very_active: (bmr * 1.9).round(),
        }
    }
}

// ============================================================================
// Body fat
// ============================================================================

/// Body-fat percentage estimated from BMI, clamped to 5–50%
pub fn estimate_body_fat(bmi: f64, age_years: u32, gender: Gender) -> Option<f64> {
    let offset = match gender {
        Gender::Male => 16.2,
        Gender::Female => 5.4,
        Gender::Other => return None,
    };
    let estimate = round1(1.20 * bmi + 0.23 * age_years as f64 - offset);
    Some(estimate.clamp(5.0, 50.0))
}

/// Direction of recent body-fat readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatTrend {
    Improving,
    #[default]
    Stable,
    Concerning,
}

/// Compare the newest three readings with the oldest three
///
/// `newest_first` must be ordered most recent first. Fewer than three
/// readings is reported as stable.
pub fn body_fat_trend(newest_first: &[f64]) -> BodyFatTrend {
    if newest_first.len() < 3 {
        return BodyFatTrend::Stable;
    }
    let recent: f64 = newest_first[..3].iter().sum::<f64>() / 3.0;
    let older: f64 = newest_first[newest_first.len() - 3..].iter().sum::<f64>() / 3.0;
    let diff = recent - older;

    if diff < -1.0 {
        BodyFatTrend::Improving
    } else if diff > 1.0 {
        BodyFatTrend::Concerning
    } else {
        BodyFatTrend::Stable
    }
}

// ============================================================================
// Summary
// ============================================================================

/// One weigh-in with derived figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyAnalysisEntry {
    pub date: NaiveDate,
    pub body_weight_kg: f64,
    pub bmi: Option<f64>,
    pub body_fat_percent: Option<f64>,
    pub estimated_body_fat: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyAnalyticsSummary {
    pub latest_weight: Option<f64>,
    pub latest_height: Option<f64>,
    pub latest_bmi: Option<f64>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub weight_change_30days: Option<f64>,
    pub bmi_change_30days: Option<f64>,
    pub body_fat_trend: BodyFatTrend,
    pub ideal_weight_range: Option<WeightRange>,
    pub bmr: Option<f64>,
    pub daily_calorie_needs: Option<DailyCalorieNeeds>,
    pub bmi_for_age_category: Option<BmiForAgeCategory>,
    pub total_records: usize,
    /// Weigh-ins in the window, newest first
    pub history: Vec<BodyAnalysisEntry>,
}

/// Basal metabolic rate for the profile at a given body weight
pub fn profile_bmr(profile: &UserProfile, weight_kg: f64, today: NaiveDate) -> Option<f64> {
    let height = profile.height_cm?;
    let age = profile.age_on(today)?;
    let gender = profile.gender?;
    calculate_bmr(weight_kg, height, age, gender)
}

/// Analyse the last 30 days of body metrics
pub fn summarize_body_metrics(
    records: &[BodyMetricRecord],
    profile: &UserProfile,
    today: NaiveDate,
) -> BodyAnalyticsSummary {
    let window_start = window_start(today, ANALYSIS_WINDOW_DAYS);
    let in_window = |r: &&BodyMetricRecord| r.date >= window_start && r.date <= today;

    let mut weigh_ins: Vec<(&BodyMetricRecord, f64)> = records
        .iter()
        .filter(in_window)
        .filter_map(|r| r.body_weight_kg.map(|w| (r, w)))
        .collect();
    weigh_ins.sort_by(|a, b| b.0.date.cmp(&a.0.date));

    let age = profile.age_on(today);
    let height = profile.height_cm;
    let latest_weight = weigh_ins.first().map(|(_, w)| *w);
    let bmi_at = |weight: f64| height.and_then(|h| calculate_bmi(weight, h));
    let latest_bmi = latest_weight.and_then(bmi_at);

    let (weight_change_30days, bmi_change_30days) = match (weigh_ins.first(), weigh_ins.last()) {
        (Some((_, latest)), Some((_, oldest))) if weigh_ins.len() > 1 => {
            let bmi_change = match (latest_bmi, height) {
                (Some(bmi), Some(h)) => {
                    let old_bmi = oldest / (h / 100.0).powi(2);
                    Some(round1(bmi - old_bmi))
                }
                _ => None,
            };
            (Some(round1(latest - oldest)), bmi_change)
        }
        _ => (None, None),
    };

    let bmr = latest_weight.and_then(|w| profile_bmr(profile, w, today));

    let mut fat_readings: Vec<&BodyMetricRecord> = records
        .iter()
        .filter(in_window)
        .filter(|r| r.body_fat_percent.is_some())
        .collect();
    fat_readings.sort_by(|a, b| b.date.cmp(&a.date));
    let fat_values: Vec<f64> = fat_readings.iter().filter_map(|r| r.body_fat_percent).collect();

    let history = weigh_ins
        .iter()
        .map(|(record, weight)| {
            let bmi = bmi_at(*weight);
            let estimated_body_fat = match (bmi, age, profile.gender) {
                (Some(bmi), Some(age), Some(gender)) => estimate_body_fat(bmi, age, gender),
                _ => None,
            };
            BodyAnalysisEntry {
                date: record.date,
                body_weight_kg: *weight,
                bmi,
                body_fat_percent: record.body_fat_percent,
                estimated_body_fat,
                note: record.note.clone(),
            }
        })
        .collect();

    BodyAnalyticsSummary {
        latest_weight,
        latest_height: height,
        latest_bmi,
        age,
        gender: profile.gender,
        weight_change_30days,
        bmi_change_30days,
        body_fat_trend: body_fat_trend(&fat_values),
        ideal_weight_range: height.map(ideal_weight_range),
        bmr,
        daily_calorie_needs: bmr.map(DailyCalorieNeeds::from_bmr),
        bmi_for_age_category: match (latest_bmi, age) {
            (Some(bmi), Some(age)) => Some(classify_bmi_for_age(bmi, age)),
            _ => None,
        },
        total_records: records.len(),
        history,
    }
}

// ============================================================================
// BMI history
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiHistoryEntry {
    pub date: NaiveDate,
    pub body_weight_kg: f64,
    pub bmi: f64,
    pub bmi_category: BmiForAgeCategory,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiHistory {
    pub height_cm: f64,
    pub period_days: u32,
    pub total_records: usize,
    pub latest_bmi: Option<f64>,
    /// Newest first
    pub history: Vec<BmiHistoryEntry>,
}

/// BMI of every weigh-in in the last `days` days at a fixed height
///
/// Fails when the height is not positive.
pub fn bmi_history(
    records: &[BodyMetricRecord],
    height_cm: f64,
    today: NaiveDate,
    days: u32,
) -> CalcResult<BmiHistory> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "height_cm must be positive, got {}",
            height_cm
        )));
    }
    let start = window_start(today, days as i64);

    let mut history: Vec<BmiHistoryEntry> = records
        .iter()
        .filter(|r| r.date >= start && r.date <= today)
        .filter_map(|r| {
            let weight = r.body_weight_kg?;
            let bmi = calculate_bmi(weight, height_cm)?;
            Some(BmiHistoryEntry {
                date: r.date,
                body_weight_kg: weight,
                bmi,
                bmi_category: classify_bmi(bmi),
                note: r.note.clone(),
            })
        })
        .collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(BmiHistory {
        height_cm,
        period_days: days,
        total_records: history.len(),
        latest_bmi: history.first().map(|e| e.bmi),
        history,
    })
}
