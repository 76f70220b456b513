use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Coarse catalog grouping of a food.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FoodGroup {
    Vegetables,
    Fruits,
    Nuts,
    Grains,
    Legumes,
    Fish,
    Meat,
    Eggs,
    Dairy,
    Oils,
    Herbs,
    Sweeteners,
    Beverages,
    #[serde(other)]
    Other,
}

impl FoodGroup {
    /// Heading used in listings and exports.
    pub fn label(&self) -> &'static str {
        match self {
            FoodGroup::Vegetables => "Vegetables",
            FoodGroup::Fruits => "Fresh fruit",
            FoodGroup::Nuts => "Nuts and seeds",
            FoodGroup::Grains => "Grains",
            FoodGroup::Legumes => "Legumes",
            FoodGroup::Fish => "Fish and seafood",
            FoodGroup::Meat => "Meat",
            FoodGroup::Eggs => "Eggs",
            FoodGroup::Dairy => "Dairy",
            FoodGroup::Oils => "Oils and fats",
            FoodGroup::Herbs => "Herbs and spices",
            FoodGroup::Sweeteners => "Sweeteners",
            FoodGroup::Beverages => "Beverages",
            FoodGroup::Other => "Other",
        }
    }
}

impl fmt::Display for FoodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog food. All nutrient values are per 100g.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub name: String,

    pub category: FoodGroup,

    pub calories: f64,

    pub protein: f64,

    pub carbs: f64,

    pub fats: f64,

    #[serde(default)]
    pub fiber: f64,
}

impl Food {
    /// Non-negative, finite nutrient values.
    pub fn is_valid(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fats, self.fiber]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Valid and carrying energy. Zero-calorie foods (water, coffee)
    /// cannot be portioned against a calorie target.
    pub fn is_usable(&self) -> bool {
        self.is_valid() && self.calories > 0.0
    }

    /// Calories per gram.
    #[inline]
    pub fn calories_per_gram(&self) -> f64 {
        self.calories / 100.0
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{}: {} kcal, P:{} C:{} F:{} Fi:{} ({})",
            self.name, self.calories, self.protein, self.carbs, self.fats, self.fiber, self.category
        )
    }

    /// Canonical key for lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl PartialEq for Food {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Food {}

impl std::hash::Hash for Food {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_food() -> Food {
        Food {
            name: "Mele".to_string(),
            category: FoodGroup::Fruits,
            calories: 52.0,
            protein: 0.3,
            carbs: 13.8,
            fats: 0.2,
            fiber: 2.4,
        }
    }

    #[test]
    fn test_is_usable() {
        let food = sample_food();
        assert!(food.is_usable());

        let mut water = sample_food();
        water.calories = 0.0;
        assert!(water.is_valid());
        assert!(!water.is_usable());

        let mut broken = sample_food();
        broken.protein = -1.0;
        assert!(!broken.is_valid());
        assert!(!broken.is_usable());
    }

    #[test]
    fn test_equality_case_insensitive() {
        let food1 = sample_food();
        let mut food2 = sample_food();
        food2.name = "MELE".to_string();
        assert_eq!(food1, food2);
    }

    #[test]
    fn test_unknown_group_deserializes_as_other() {
        let json = r#"{"name": "Tofu", "category": "soy", "calories": 76, "protein": 8, "carbs": 1.9, "fats": 4.8}"#;
        let food: Food = serde_json::from_str(json).unwrap();
        assert_eq!(food.category, FoodGroup::Other);
        assert_eq!(food.fiber, 0.0);
    }
}
