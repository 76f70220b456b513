// ─────────────────────────────────────────────────────────────────────────────
// Metabolic model
// ─────────────────────────────────────────────────────────────────────────────

/// Mifflin-St Jeor coefficients.
pub const MSJ_WEIGHT_COEF: f64 = 10.0;
pub const MSJ_HEIGHT_COEF: f64 = 6.25;
pub const MSJ_AGE_COEF: f64 = -5.0;
pub const MSJ_MALE_CONSTANT: f64 = 5.0;
pub const MSJ_FEMALE_CONSTANT: f64 = -161.0;

/// TDEE multipliers per activity level.
pub const ACTIVITY_SEDENTARY: f64 = 1.2;
pub const ACTIVITY_LIGHT: f64 = 1.375;
pub const ACTIVITY_MODERATE: f64 = 1.55;
pub const ACTIVITY_ACTIVE: f64 = 1.725;
pub const ACTIVITY_VERY_ACTIVE: f64 = 1.9;

/// Daily deficit for roughly 1 kg/week of loss.
pub const DAILY_DEFICIT_KCAL: f64 = 1000.0;

/// Protein floor to preserve lean mass.
pub const PROTEIN_MIN_G_PER_KG: f64 = 1.2;

/// Share of target calories from protein (before the floor) and from fat.
pub const PROTEIN_CALORIE_SHARE: f64 = 0.175;
pub const FAT_CALORIE_SHARE: f64 = 0.275;

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Daily fiber goal, split across meals like calories.
pub const DAILY_FIBER_G: f64 = 25.0;

// ─────────────────────────────────────────────────────────────────────────────
// Portion optimizer
// ─────────────────────────────────────────────────────────────────────────────

pub const MAX_ITERATIONS: usize = 20;

/// Calorie error accepted as converged, as a fraction of the target.
pub const CALORIE_TOLERANCE: f64 = 0.03;

pub const MIN_PORTION_GRAMS: f64 = 10.0;
pub const MAX_PORTION_GRAMS: f64 = 500.0;

pub const MAX_FOODS_PER_MEAL: usize = 5;

/// Seed used when a food's calories per gram cannot drive the split.
pub const FALLBACK_SEED_GRAMS: f64 = 50.0;

/// Multiplicative step applied to macro-rich foods.
pub const MACRO_NUDGE: f64 = 0.05;

/// Macro error (fraction of the macro target) below which no nudge is applied.
pub const MACRO_DEADBAND: f64 = 0.05;

/// Per-100g amounts above which a food counts as rich in that macro.
pub const PROTEIN_RICH_THRESHOLD: f64 = 10.0;
pub const CARBS_RICH_THRESHOLD: f64 = 15.0;
pub const FATS_RICH_THRESHOLD: f64 = 5.0;

/// Fallback cap for categories without an entry.
pub const DEFAULT_CATEGORY_CAP: f64 = 150.0;

// ─────────────────────────────────────────────────────────────────────────────
// Analysis
// ─────────────────────────────────────────────────────────────────────────────

/// Deviation (percent) below which adherence is "excellent".
pub const EXCELLENT_DEVIATION_PCT: f64 = 5.0;

/// Deviation (percent) below which adherence is "good".
pub const GOOD_DEVIATION_PCT: f64 = 15.0;

/// Calorie ratio under which poor adherence means "portions too small".
pub const CALORIE_FLOOR_RATIO: f64 = 0.85;

/// Tolerance used when checking a whole day against the daily targets.
pub const DAILY_TOLERANCE: f64 = 0.10;
