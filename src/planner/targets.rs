use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PlannerError, Result};
use crate::models::{ActivityLevel, Gender, MacroTarget, MealType, Profile};
use crate::planner::constants::*;

/// TDEE multipliers per activity level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityFactors {
    pub sedentary: f64,
    pub light: f64,
    pub moderate: f64,
    pub active: f64,
    pub very_active: f64,
}

impl Default for ActivityFactors {
    fn default() -> Self {
        Self {
            sedentary: ACTIVITY_SEDENTARY,
            light: ACTIVITY_LIGHT,
            moderate: ACTIVITY_MODERATE,
            active: ACTIVITY_ACTIVE,
            very_active: ACTIVITY_VERY_ACTIVE,
        }
    }
}

impl ActivityFactors {
    pub fn multiplier(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Active => self.active,
            ActivityLevel::VeryActive => self.very_active,
        }
    }

    fn all(&self) -> [f64; 5] {
        [
            self.sedentary,
            self.light,
            self.moderate,
            self.active,
            self.very_active,
        ]
    }
}

/// Share of daily calories for one meal: a band plus the value actually used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MealShare {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl MealShare {
    const fn new(min: f64, avg: f64, max: f64) -> Self {
        Self { min, avg, max }
    }
}

/// Fraction of the daily target assigned to each meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MealDistribution {
    pub breakfast: MealShare,
    pub morning_snack: MealShare,
    pub lunch: MealShare,
    pub afternoon_snack: MealShare,
    pub dinner: MealShare,
}

impl Default for MealDistribution {
    fn default() -> Self {
        Self {
            breakfast: MealShare::new(0.20, 0.225, 0.25),
            morning_snack: MealShare::new(0.05, 0.075, 0.10),
            lunch: MealShare::new(0.35, 0.375, 0.40),
            afternoon_snack: MealShare::new(0.05, 0.075, 0.10),
            dinner: MealShare::new(0.20, 0.225, 0.25),
        }
    }
}

impl MealDistribution {
    pub fn share(&self, meal: MealType) -> MealShare {
        match meal {
            MealType::Breakfast => self.breakfast,
            MealType::MorningSnack => self.morning_snack,
            MealType::Lunch => self.lunch,
            MealType::AfternoonSnack => self.afternoon_snack,
            MealType::Dinner => self.dinner,
        }
    }
}

/// Tables driving the daily and per-meal targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub activity_factors: ActivityFactors,
    pub daily_deficit_kcal: f64,
    pub protein_min_g_per_kg: f64,
    pub protein_calorie_share: f64,
    pub fat_calorie_share: f64,
    pub daily_fiber_g: f64,
    pub meal_distribution: MealDistribution,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            activity_factors: ActivityFactors::default(),
            daily_deficit_kcal: DAILY_DEFICIT_KCAL,
            protein_min_g_per_kg: PROTEIN_MIN_G_PER_KG,
            protein_calorie_share: PROTEIN_CALORIE_SHARE,
            fat_calorie_share: FAT_CALORIE_SHARE,
            daily_fiber_g: DAILY_FIBER_G,
            meal_distribution: MealDistribution::default(),
        }
    }
}

impl TargetConfig {
    pub fn validate(&self) -> Result<()> {
        if self.activity_factors.all().iter().any(|m| *m <= 0.0) {
            return Err(PlannerError::InvalidConfig(
                "activity multipliers must be positive".to_string(),
            ));
        }
        if self.daily_deficit_kcal < 0.0 {
            return Err(PlannerError::InvalidConfig(
                "daily deficit cannot be negative".to_string(),
            ));
        }
        let shares = self.protein_calorie_share + self.fat_calorie_share;
        if self.protein_calorie_share < 0.0 || self.fat_calorie_share < 0.0 || shares >= 1.0 {
            return Err(PlannerError::InvalidConfig(
                "protein and fat shares must be non-negative and leave room for carbs".to_string(),
            ));
        }
        for meal in MealType::ALL {
            let share = self.meal_distribution.share(meal);
            let in_range = |v: f64| v > 0.0 && v <= 1.0;
            if !(in_range(share.min) && in_range(share.avg) && in_range(share.max))
                || share.min > share.avg
                || share.avg > share.max
            {
                return Err(PlannerError::InvalidConfig(format!(
                    "meal share for {} must satisfy 0 < min <= avg <= max <= 1",
                    meal.key()
                )));
            }
        }
        Ok(())
    }
}

/// Grams, calories and share of the day for one macro.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroShare {
    pub grams: f64,
    pub calories: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyMacros {
    pub carbs: MacroShare,
    pub protein: MacroShare,
    pub fats: MacroShare,
    /// Calories the split was computed from.
    pub total_calories: f64,
}

/// Daily energy target derived from body metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTarget {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: f64,
    pub safe_minimum: f64,
    /// False when TDEE minus the deficit fell below BMR and the target was
    /// raised to BMR. Callers must surface this.
    pub is_safe: bool,
    pub deficit: f64,
    pub macros: DailyMacros,
}

/// Calorie band for one meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealCalorieRange {
    pub min: u32,
    pub target: u32,
    pub max: u32,
}

/// Mifflin-St Jeor resting energy, rounded to whole kcal.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = MSJ_WEIGHT_COEF * weight_kg + MSJ_HEIGHT_COEF * height_cm
        + MSJ_AGE_COEF * f64::from(age);
    let bmr = match gender {
        Gender::Male => base + MSJ_MALE_CONSTANT,
        Gender::Female => base + MSJ_FEMALE_CONSTANT,
    };
    bmr.round()
}

pub fn calculate_tdee(bmr: f64, activity: ActivityLevel, config: &TargetConfig) -> f64 {
    (bmr * config.activity_factors.multiplier(activity)).round()
}

/// Split target calories into protein, fats and carbs.
///
/// Protein takes the larger of the per-kg floor and its calorie share, fats
/// take their fixed share and carbs get what is left.
pub fn calculate_macros(
    target_calories: f64,
    weight_kg: f64,
    config: &TargetConfig,
) -> DailyMacros {
    let protein_floor = weight_kg * config.protein_min_g_per_kg;
    let protein_from_share = target_calories * config.protein_calorie_share / KCAL_PER_G_PROTEIN;
    let protein_grams = protein_floor.max(protein_from_share);
    let protein_calories = protein_grams * KCAL_PER_G_PROTEIN;

    let fats_calories = target_calories * config.fat_calorie_share;
    let fats_grams = fats_calories / KCAL_PER_G_FAT;

    let carbs_calories = target_calories - protein_calories - fats_calories;
    let carbs_grams = carbs_calories / KCAL_PER_G_CARBS;

    let share = |grams: f64, calories: f64| MacroShare {
        grams: grams.round(),
        calories: calories.round(),
        percentage: if target_calories > 0.0 {
            (calories / target_calories * 100.0).round()
        } else {
            0.0
        },
    };

    DailyMacros {
        carbs: share(carbs_grams, carbs_calories),
        protein: share(protein_grams, protein_calories),
        fats: share(fats_grams, fats_calories),
        total_calories: target_calories,
    }
}

/// Full daily target for a profile.
pub fn daily_target(profile: &Profile, config: &TargetConfig) -> Result<DailyTarget> {
    Profile::validate_metrics(profile.age, profile.height_cm, profile.weight_kg)?;

    let bmr = calculate_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.gender);
    let tdee = calculate_tdee(bmr, profile.activity, config);
    let raw_target = (tdee - config.daily_deficit_kcal).round();
    let is_safe = raw_target >= bmr;
    let target_calories = if is_safe { raw_target } else { bmr };

    if !is_safe {
        warn!(
            profile = %profile.name,
            bmr,
            tdee,
            requested = raw_target,
            "deficit capped: target raised to BMR"
        );
    }

    Ok(DailyTarget {
        bmr,
        tdee,
        target_calories,
        safe_minimum: bmr,
        is_safe,
        deficit: tdee - target_calories,
        macros: calculate_macros(target_calories, profile.weight_kg, config),
    })
}

/// Per-meal macro target from the daily split.
pub fn meal_target(meal: MealType, macros: &DailyMacros, config: &TargetConfig) -> MacroTarget {
    let pct = config.meal_distribution.share(meal).avg;
    MacroTarget {
        calories: (macros.total_calories * pct).round(),
        protein: (macros.protein.grams * pct).round(),
        carbs: (macros.carbs.grams * pct).round(),
        fats: (macros.fats.grams * pct).round(),
        fiber: (config.daily_fiber_g > 0.0).then(|| (config.daily_fiber_g * pct).round()),
    }
}

/// Same as [`meal_target`] for a raw meal key; unknown keys are an error.
pub fn meal_target_for_key(
    key: &str,
    macros: &DailyMacros,
    config: &TargetConfig,
) -> Result<MacroTarget> {
    let meal: MealType = key.parse()?;
    Ok(meal_target(meal, macros, config))
}

/// Acceptable calorie band for a meal.
pub fn meal_calorie_range(
    meal: MealType,
    daily_calories: f64,
    config: &TargetConfig,
) -> MealCalorieRange {
    let share = config.meal_distribution.share(meal);
    let kcal = |pct: f64| (daily_calories * pct).round().max(0.0) as u32;
    MealCalorieRange {
        min: kcal(share.min),
        target: kcal(share.avg),
        max: kcal(share.max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(gender: Gender, age: u32, height: f64, weight: f64) -> Profile {
        Profile {
            id: 1,
            name: "Test".to_string(),
            age,
            gender,
            height_cm: height,
            weight_kg: weight,
            activity: ActivityLevel::Light,
            bmi: 0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_bmr_mifflin_st_jeor() {
        // 10*80 + 6.25*180 - 5*30 + 5 = 1780
        assert_eq!(calculate_bmr(80.0, 180.0, 30, Gender::Male), 1780.0);
        // 10*60 + 6.25*165 - 5*30 - 161 = 1320.25
        assert_eq!(calculate_bmr(60.0, 165.0, 30, Gender::Female), 1320.0);
    }

    #[test]
    fn test_tdee_uses_activity_table() {
        let config = TargetConfig::default();
        assert_eq!(calculate_tdee(1000.0, ActivityLevel::Sedentary, &config), 1200.0);
        assert_eq!(calculate_tdee(1000.0, ActivityLevel::VeryActive, &config), 1900.0);
    }

    #[test]
    fn test_daily_target_safe_deficit() {
        let config = TargetConfig::default();
        let mut athlete = profile(Gender::Male, 30, 180.0, 80.0);
        athlete.activity = ActivityLevel::VeryActive;
        let target = daily_target(&athlete, &config).unwrap();

        // 1780 * 1.9 = 3382
        assert_eq!(target.tdee, 3382.0);
        assert_eq!(target.target_calories, 2382.0);
        assert!(target.is_safe);
        assert_eq!(target.deficit, 1000.0);
    }

    #[test]
    fn test_daily_target_capped_at_bmr() {
        let config = TargetConfig::default();
        let target = daily_target(&profile(Gender::Female, 30, 165.0, 60.0), &config).unwrap();

        // 1320 * 1.375 = 1815, minus 1000 = 815 < BMR
        assert!(!target.is_safe);
        assert_eq!(target.target_calories, target.bmr);
        assert_eq!(target.deficit, target.tdee - target.bmr);
    }

    #[test]
    fn test_macro_split_sums_to_target() {
        let config = TargetConfig::default();
        let macros = calculate_macros(2000.0, 70.0, &config);
        let sum = macros.protein.calories + macros.fats.calories + macros.carbs.calories;
        assert!((sum - 2000.0).abs() <= 2.0);
        // 17.5% of 2000 / 4 = 87.5g beats the 84g floor
        assert_eq!(macros.protein.grams, 88.0);
        assert_eq!(macros.fats.grams, 61.0);
    }

    #[test]
    fn test_protein_floor_wins_for_heavy_profile() {
        let config = TargetConfig::default();
        let macros = calculate_macros(1500.0, 100.0, &config);
        // floor 120g beats 65.6g from the share
        assert_eq!(macros.protein.grams, 120.0);
    }

    #[test]
    fn test_meal_target_uses_distribution() {
        let config = TargetConfig::default();
        let macros = calculate_macros(2000.0, 70.0, &config);
        let lunch = meal_target(MealType::Lunch, &macros, &config);
        assert_eq!(lunch.calories, 750.0);
        assert_eq!(lunch.fiber, Some(9.0));

        let snack = meal_target(MealType::MorningSnack, &macros, &config);
        assert_eq!(snack.calories, 150.0);
    }

    #[test]
    fn test_meal_target_for_unknown_key_fails() {
        let config = TargetConfig::default();
        let macros = calculate_macros(2000.0, 70.0, &config);
        assert!(meal_target_for_key("dinner", &macros, &config).is_ok());
        assert!(matches!(
            meal_target_for_key("midnightSnack", &macros, &config),
            Err(PlannerError::UnknownMealType(_))
        ));
    }

    #[test]
    fn test_meal_calorie_range() {
        let config = TargetConfig::default();
        let range = meal_calorie_range(MealType::Breakfast, 2000.0, &config);
        assert_eq!(
            range,
            MealCalorieRange {
                min: 400,
                target: 450,
                max: 500
            }
        );
    }

    #[test]
    fn test_validate_rejects_bad_shares() {
        let mut config = TargetConfig::default();
        assert!(config.validate().is_ok());
        config.meal_distribution.lunch.avg = 0.5;
        assert!(config.validate().is_err());
    }
}
