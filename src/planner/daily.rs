use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{MealRecord, MealType, NutritionAmounts};
use crate::planner::constants::DAILY_TOLERANCE;
use crate::planner::targets::DailyMacros;

/// One line of the daily check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetStatus {
    pub current: f64,
    pub target: f64,
    pub met: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyCheck {
    pub calories: TargetStatus,
    pub protein: TargetStatus,
    pub carbs: TargetStatus,
    pub fats: TargetStatus,
}

impl DailyCheck {
    pub fn all_met(&self) -> bool {
        self.calories.met && self.protein.met && self.carbs.met && self.fats.met
    }
}

/// Sum the stored totals of a day's meals.
pub fn daily_nutrition<'a>(meals: impl IntoIterator<Item = &'a MealRecord>) -> NutritionAmounts {
    NutritionAmounts::total(meals.into_iter().map(|m| &m.total))
}

/// Sum a day's meals and compare them with the daily macros.
pub fn check_daily_targets<'a>(
    meals: impl IntoIterator<Item = &'a MealRecord>,
    macros: &DailyMacros,
) -> DailyCheck {
    check_intake(&daily_nutrition(meals), macros)
}

/// Compare an intake with the daily macros.
///
/// Calories, carbs and fats are met within 10% either way. Protein only has
/// a floor: anything from 90% of the target up counts.
pub fn check_intake(intake: &NutritionAmounts, macros: &DailyMacros) -> DailyCheck {
    let within = |current: f64, target: f64| TargetStatus {
        current,
        target,
        met: (current - target).abs() <= target * DAILY_TOLERANCE,
    };

    DailyCheck {
        calories: within(f64::from(intake.calories), macros.total_calories),
        protein: TargetStatus {
            current: intake.protein,
            target: macros.protein.grams,
            met: intake.protein >= macros.protein.grams * (1.0 - DAILY_TOLERANCE),
        },
        carbs: within(intake.carbs, macros.carbs.grams),
        fats: within(intake.fats, macros.fats.grams),
    }
}

/// Meal slots already filled, in day order.
pub fn completed_meals<'a>(meals: impl IntoIterator<Item = &'a MealRecord>) -> Vec<MealType> {
    let filled: BTreeSet<MealType> = meals.into_iter().map(|m| m.meal_type).collect();
    filled.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::targets::MacroShare;

    fn macros() -> DailyMacros {
        let share = |grams: f64| MacroShare {
            grams,
            calories: 0.0,
            percentage: 0.0,
        };
        DailyMacros {
            carbs: share(200.0),
            protein: share(100.0),
            fats: share(60.0),
            total_calories: 1800.0,
        }
    }

    fn intake(calories: u32, protein: f64, carbs: f64, fats: f64) -> NutritionAmounts {
        NutritionAmounts {
            calories,
            protein,
            carbs,
            fats,
            fiber: 0.0,
        }
    }

    #[test]
    fn test_on_target_day() {
        let check = check_intake(&intake(1750, 105.0, 190.0, 58.0), &macros());
        assert!(check.all_met());
    }

    #[test]
    fn test_protein_has_only_a_floor() {
        let check = check_intake(&intake(1800, 150.0, 200.0, 60.0), &macros());
        assert!(check.protein.met);

        let check = check_intake(&intake(1800, 89.0, 200.0, 60.0), &macros());
        assert!(!check.protein.met);
    }

    #[test]
    fn test_completed_meals_in_day_order() {
        use crate::models::{Food, FoodGroup, Portion};
        use chrono::{NaiveDate, Utc};

        let apple = Food {
            name: "Mele".to_string(),
            category: FoodGroup::Fruits,
            calories: 52.0,
            protein: 0.3,
            carbs: 13.8,
            fats: 0.2,
            fiber: 2.4,
        };
        let record = |id: u64, meal_type: MealType| {
            let portions = vec![Portion::new(apple.clone(), 150)];
            MealRecord {
                id,
                profile_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
                meal_type,
                total: crate::models::total_nutrition(&portions),
                portions,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }
        };
        let meals = [
            record(1, MealType::Dinner),
            record(2, MealType::Breakfast),
            record(3, MealType::Dinner),
        ];

        assert_eq!(
            completed_meals(&meals),
            vec![MealType::Breakfast, MealType::Dinner]
        );
        assert!(completed_meals(Vec::<&MealRecord>::new()).is_empty());
    }

    #[test]
    fn test_calories_out_of_band() {
        let check = check_intake(&intake(2000, 100.0, 200.0, 60.0), &macros());
        assert!(!check.calories.met);
        assert!(check.carbs.met);
        assert!(!check.all_met());
    }
}
