use std::fmt;

use serde::Serialize;

use crate::models::nutrition::round_tenth;
use crate::models::{MacroTarget, NutritionAmounts, Portion, total_nutrition};
use crate::planner::constants::*;
use crate::planner::optimizer::RichThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdherenceLevel {
    Excellent,
    Good,
    Poor,
}

impl AdherenceLevel {
    pub fn from_deviation(deviation_percent: f64) -> Self {
        let abs = deviation_percent.abs();
        if abs < EXCELLENT_DEVIATION_PCT {
            AdherenceLevel::Excellent
        } else if abs < GOOD_DEVIATION_PCT {
            AdherenceLevel::Good
        } else {
            AdherenceLevel::Poor
        }
    }
}

impl fmt::Display for AdherenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AdherenceLevel::Excellent => "excellent",
            AdherenceLevel::Good => "good",
            AdherenceLevel::Poor => "poor",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroAdherence {
    pub level: AdherenceLevel,
    /// Signed: negative when under target.
    pub deviation_percent: f64,
}

impl MacroAdherence {
    fn measure(actual: f64, target: f64) -> Self {
        let deviation_percent = if target > 0.0 {
            round_tenth((actual - target) / target * 100.0)
        } else if actual > 0.0 {
            100.0
        } else {
            0.0
        };
        Self {
            level: AdherenceLevel::from_deviation(deviation_percent),
            deviation_percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Adherence {
    pub calories: MacroAdherence,
    pub protein: MacroAdherence,
    pub carbs: MacroAdherence,
    pub fats: MacroAdherence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealAnalysis {
    pub total: NutritionAmounts,
    pub adherence: Adherence,
    pub suggestions: Vec<String>,
}

impl MealAnalysis {
    /// Worst level across calories and macros.
    pub fn overall(&self) -> AdherenceLevel {
        let a = &self.adherence;
        [a.calories, a.protein, a.carbs, a.fats]
            .iter()
            .map(|m| m.level)
            .fold(AdherenceLevel::Excellent, |worst, level| match (worst, level) {
                (AdherenceLevel::Poor, _) | (_, AdherenceLevel::Poor) => AdherenceLevel::Poor,
                (AdherenceLevel::Good, _) | (_, AdherenceLevel::Good) => AdherenceLevel::Good,
                _ => AdherenceLevel::Excellent,
            })
    }
}

/// Score finished portions against their target and suggest fixes.
pub fn analyze(portions: &[Portion], target: &MacroTarget) -> MealAnalysis {
    analyze_with(portions, target, &RichThresholds::default())
}

/// [`analyze`] with explicit macro-rich thresholds.
pub fn analyze_with(
    portions: &[Portion],
    target: &MacroTarget,
    rich: &RichThresholds,
) -> MealAnalysis {
    let total = total_nutrition(portions);

    let adherence = Adherence {
        calories: MacroAdherence::measure(f64::from(total.calories), target.calories),
        protein: MacroAdherence::measure(total.protein, target.protein),
        carbs: MacroAdherence::measure(total.carbs, target.carbs),
        fats: MacroAdherence::measure(total.fats, target.fats),
    };

    let mut suggestions = Vec::new();

    if portions.is_empty() {
        suggestions.push("Select at least one food to build this meal.".to_string());
        return MealAnalysis {
            total,
            adherence,
            suggestions,
        };
    }

    let has = |pred: fn(&RichThresholds, &crate::models::Food) -> bool| {
        portions.iter().any(|p| pred(rich, &p.food))
    };

    if adherence.protein.level != AdherenceLevel::Excellent && !has(RichThresholds::protein_rich) {
        suggestions.push(
            "Add a protein source (meat, fish, eggs, legumes or cheese).".to_string(),
        );
    }
    if adherence.carbs.level != AdherenceLevel::Excellent && !has(RichThresholds::carbs_rich) {
        suggestions.push("Add a carbohydrate source (bread, pasta, rice or fruit).".to_string());
    }
    if adherence.fats.level != AdherenceLevel::Excellent && !has(RichThresholds::fats_rich) {
        suggestions.push("Add a healthy fat source (olive oil, nuts or seeds).".to_string());
    }

    if adherence.calories.level == AdherenceLevel::Poor {
        let ratio = if target.calories > 0.0 {
            f64::from(total.calories) / target.calories
        } else {
            0.0
        };
        if ratio < CALORIE_FLOOR_RATIO {
            suggestions.push(format!(
                "Portions are too small: {} kcal against a {:.0} kcal target. Add another food or pick denser options.",
                total.calories, target.calories
            ));
        } else {
            suggestions.push(format!(
                "Portions are too large: {} kcal against a {:.0} kcal target. Drop a food or pick lighter options.",
                total.calories, target.calories
            ));
        }
    }

    MealAnalysis {
        total,
        adherence,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Food, FoodGroup};

    fn olive_oil() -> Food {
        Food {
            name: "Olio extravergine d'oliva".to_string(),
            category: FoodGroup::Oils,
            calories: 884.0,
            protein: 0.0,
            carbs: 0.0,
            fats: 100.0,
            fiber: 0.0,
        }
    }

    fn target(calories: f64, protein: f64, carbs: f64, fats: f64) -> MacroTarget {
        MacroTarget {
            calories,
            protein,
            carbs,
            fats,
            fiber: None,
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(AdherenceLevel::from_deviation(4.9), AdherenceLevel::Excellent);
        assert_eq!(AdherenceLevel::from_deviation(-5.0), AdherenceLevel::Good);
        assert_eq!(AdherenceLevel::from_deviation(14.9), AdherenceLevel::Good);
        assert_eq!(AdherenceLevel::from_deviation(-15.0), AdherenceLevel::Poor);
    }

    #[test]
    fn test_capped_oil_reports_poor_calories() {
        let portions = vec![Portion::new(olive_oil(), 15)];
        let analysis = analyze(&portions, &target(300.0, 0.0, 0.0, 30.0));

        // 884 * 0.15 = 132.6 -> 133
        assert_eq!(analysis.total.calories, 133);
        assert_eq!(analysis.adherence.calories.level, AdherenceLevel::Poor);
        assert!((analysis.adherence.calories.deviation_percent + 55.7).abs() < 1e-9);
        assert!(analysis.suggestions.iter().any(|s| s.contains("too small")));
    }

    #[test]
    fn test_missing_protein_source_suggested() {
        let portions = vec![Portion::new(olive_oil(), 15)];
        let analysis = analyze(&portions, &target(130.0, 20.0, 0.0, 15.0));
        assert!(analysis.suggestions.iter().any(|s| s.contains("protein source")));
        // fats come from the oil itself
        assert!(!analysis.suggestions.iter().any(|s| s.contains("fat source")));
    }

    #[test]
    fn test_too_large_direction() {
        let portions = vec![Portion::new(olive_oil(), 30)];
        let analysis = analyze(&portions, &target(200.0, 0.0, 0.0, 30.0));
        assert_eq!(analysis.adherence.calories.level, AdherenceLevel::Poor);
        assert!(analysis.suggestions.iter().any(|s| s.contains("too large")));
    }

    #[test]
    fn test_zero_macro_target() {
        let portions = vec![Portion::new(olive_oil(), 15)];
        let analysis = analyze(&portions, &target(133.0, 0.0, 0.0, 15.0));
        assert_eq!(analysis.adherence.protein.deviation_percent, 0.0);
        assert_eq!(analysis.adherence.protein.level, AdherenceLevel::Excellent);
        assert_eq!(analysis.adherence.fats.level, AdherenceLevel::Excellent);
    }

    #[test]
    fn test_empty_portions() {
        let analysis = analyze(&[], &target(300.0, 20.0, 30.0, 10.0));
        assert_eq!(analysis.total.calories, 0);
        assert_eq!(analysis.adherence.calories.level, AdherenceLevel::Poor);
        assert_eq!(analysis.suggestions.len(), 1);
    }

    #[test]
    fn test_overall_is_worst_level() {
        let portions = vec![Portion::new(olive_oil(), 15)];
        let analysis = analyze(&portions, &target(300.0, 0.0, 0.0, 15.0));
        assert_eq!(analysis.overall(), AdherenceLevel::Poor);
    }
}
