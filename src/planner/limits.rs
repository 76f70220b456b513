use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::MealType;
use crate::planner::classifier::PortionCategory;
use crate::planner::constants::DEFAULT_CATEGORY_CAP;

/// Maximum grams per portion for each category, with sparse per-meal
/// overrides. A category missing from an override map uses its global cap;
/// a category missing from `caps` uses `default_cap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryLimits {
    pub default_cap: f64,
    pub caps: BTreeMap<PortionCategory, f64>,
    pub meal_overrides: BTreeMap<MealType, BTreeMap<PortionCategory, f64>>,
}

impl Default for CategoryLimits {
    fn default() -> Self {
        use PortionCategory::*;

        let caps = BTreeMap::from([
            (FreshCheese, 100.0),
            (AgedCheese, 50.0),
            (Yogurt, 150.0),
            (Milk, 200.0),
            (Eggs, 120.0),
            (CuredMeat, 50.0),
            (WhiteMeat, 150.0),
            (RedMeat, 130.0),
            (Fish, 150.0),
            (Legumes, 150.0),
            (Potatoes, 200.0),
            (Rice, 90.0),
            (Pasta, 100.0),
            (Bread, 80.0),
            (Crackers, 40.0),
            (Cereals, 80.0),
            (Vegetables, 300.0),
            (Fruit, 200.0),
            (Nuts, 30.0),
            (Oil, 15.0),
            (Olives, 30.0),
            (Herbs, 10.0),
            (Sweeteners, 20.0),
            (Default, DEFAULT_CATEGORY_CAP),
        ]);

        let dinner = BTreeMap::from([(Pasta, 80.0), (Rice, 70.0), (Bread, 50.0)]);

        Self {
            default_cap: DEFAULT_CATEGORY_CAP,
            caps,
            meal_overrides: BTreeMap::from([(MealType::Dinner, dinner)]),
        }
    }
}

impl CategoryLimits {
    /// Cap in grams for a category at a given meal.
    pub fn cap_for(&self, category: PortionCategory, meal: MealType) -> f64 {
        self.meal_overrides
            .get(&meal)
            .and_then(|overrides| overrides.get(&category))
            .or_else(|| self.caps.get(&category))
            .copied()
            .unwrap_or(self.default_cap)
    }

    /// Every cap must admit at least the minimum portion.
    pub fn validate(&self, min_portion_grams: f64) -> Result<()> {
        let too_small = |cap: f64| !cap.is_finite() || cap < min_portion_grams;

        if too_small(self.default_cap) {
            return Err(PlannerError::InvalidConfig(format!(
                "default cap {} is below the minimum portion of {}g",
                self.default_cap, min_portion_grams
            )));
        }

        let overrides = self
            .meal_overrides
            .values()
            .flat_map(|m| m.iter());

        for (category, cap) in self.caps.iter().chain(overrides) {
            if too_small(*cap) {
                return Err(PlannerError::InvalidConfig(format!(
                    "cap for {} ({}g) is below the minimum portion of {}g",
                    category, cap, min_portion_grams
                )));
            }
        }

        Ok(())
    }
}
