use serde::{Deserialize, Serialize};

use crate::models::Food;

/// Absorbs float noise such as `31.0 * 0.9 = 27.900000000000002`
/// before a ceiling is taken.
const CEIL_EPSILON: f64 = 1e-6;

/// Round calories up to a whole kcal. Never under-reports.
pub fn ceil_kcal(value: f64) -> u32 {
    (value - CEIL_EPSILON).ceil().max(0.0) as u32
}

/// Round grams of a nutrient up to one decimal.
pub fn ceil_tenth(value: f64) -> f64 {
    ((value * 10.0 - CEIL_EPSILON).ceil() / 10.0).max(0.0)
}

/// Round to one decimal (used when summing already-rounded amounts).
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Per-meal macro target. Calories in kcal, the rest in grams.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroTarget {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
}

impl MacroTarget {
    pub fn is_valid(&self) -> bool {
        self.calories.is_finite()
            && self.calories > 0.0
            && [self.protein, self.carbs, self.fats]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Nutrition delivered by a given weight of food.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionAmounts {
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub fiber: f64,
}

impl NutritionAmounts {
    /// Scale per-100g values to `grams`, rounding every field up.
    pub fn for_grams(food: &Food, grams: f64) -> Self {
        let factor = grams / 100.0;
        Self {
            calories: ceil_kcal(food.calories * factor),
            protein: ceil_tenth(food.protein * factor),
            carbs: ceil_tenth(food.carbs * factor),
            fats: ceil_tenth(food.fats * factor),
            fiber: ceil_tenth(food.fiber * factor),
        }
    }

    /// Sum a set of amounts, keeping one decimal on the gram fields.
    pub fn total<'a>(amounts: impl IntoIterator<Item = &'a NutritionAmounts>) -> Self {
        let sum = amounts
            .into_iter()
            .fold(NutritionAmounts::default(), |acc, n| NutritionAmounts {
                calories: acc.calories + n.calories,
                protein: acc.protein + n.protein,
                carbs: acc.carbs + n.carbs,
                fats: acc.fats + n.fats,
                fiber: acc.fiber + n.fiber,
            });

        NutritionAmounts {
            protein: round_tenth(sum.protein),
            carbs: round_tenth(sum.carbs),
            fats: round_tenth(sum.fats),
            fiber: round_tenth(sum.fiber),
            ..sum
        }
    }
}

/// A food with its chosen weight and the resulting nutrition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portion {
    pub food: Food,
    pub grams: u32,
    pub nutrition: NutritionAmounts,
}

impl Portion {
    pub fn new(food: Food, grams: u32) -> Self {
        let nutrition = NutritionAmounts::for_grams(&food, f64::from(grams));
        Self {
            food,
            grams,
            nutrition,
        }
    }

    /// Manual edit: change the weight and recompute this portion's nutrition.
    pub fn set_grams(&mut self, grams: u32) {
        self.grams = grams;
        self.nutrition = NutritionAmounts::for_grams(&self.food, f64::from(grams));
    }
}

/// Total nutrition of a set of portions.
pub fn total_nutrition(portions: &[Portion]) -> NutritionAmounts {
    NutritionAmounts::total(portions.iter().map(|p| &p.nutrition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodGroup;

    fn chicken() -> Food {
        Food {
            name: "Petto di pollo".to_string(),
            category: FoodGroup::Meat,
            calories: 165.0,
            protein: 31.0,
            carbs: 0.0,
            fats: 3.6,
            fiber: 0.0,
        }
    }

    #[test]
    fn test_ceil_absorbs_float_noise() {
        assert_eq!(ceil_tenth(31.0 * 0.9), 27.9);
        assert_eq!(ceil_kcal(34.0 * 3.0), 102);
    }

    #[test]
    fn test_calories_round_up() {
        // 165 * 0.9 = 148.5
        let n = NutritionAmounts::for_grams(&chicken(), 90.0);
        assert_eq!(n.calories, 149);
        assert_eq!(n.protein, 27.9);
        // 3.6 * 0.9 = 3.24 -> 3.3
        assert_eq!(n.fats, 3.3);
    }

    #[test]
    fn test_set_grams_recomputes_nutrition() {
        let mut portion = Portion::new(chicken(), 100);
        assert_eq!(portion.nutrition.calories, 165);

        portion.set_grams(200);
        assert_eq!(portion.grams, 200);
        assert_eq!(portion.nutrition.calories, 330);
        assert_eq!(portion.nutrition.protein, 62.0);
    }

    #[test]
    fn test_total_keeps_one_decimal() {
        let a = NutritionAmounts {
            calories: 10,
            protein: 0.1,
            carbs: 0.2,
            fats: 0.0,
            fiber: 0.0,
        };
        let b = NutritionAmounts {
            calories: 5,
            protein: 0.2,
            carbs: 0.1,
            fats: 0.0,
            fiber: 0.0,
        };
        let total = NutritionAmounts::total([&a, &b]);
        assert_eq!(total.calories, 15);
        assert_eq!(total.protein, 0.3);
        assert_eq!(total.carbs, 0.3);
    }

    #[test]
    fn test_target_validity() {
        let target = MacroTarget {
            calories: 400.0,
            protein: 30.0,
            carbs: 40.0,
            fats: 10.0,
            fiber: None,
        };
        assert!(target.is_valid());
        assert!(!MacroTarget::default().is_valid());
        assert!(
            !MacroTarget {
                calories: f64::NAN,
                ..target
            }
            .is_valid()
        );
    }
}
