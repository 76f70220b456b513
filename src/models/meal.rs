use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::models::nutrition::{NutritionAmounts, Portion, total_nutrition};

/// The five meals of a planned day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MealType {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::MorningSnack,
        MealType::Lunch,
        MealType::AfternoonSnack,
        MealType::Dinner,
    ];

    /// Stable key, as stored.
    pub fn key(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::MorningSnack => "morningSnack",
            MealType::Lunch => "lunch",
            MealType::AfternoonSnack => "afternoonSnack",
            MealType::Dinner => "dinner",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::MorningSnack => "Morning snack",
            MealType::Lunch => "Lunch",
            MealType::AfternoonSnack => "Afternoon snack",
            MealType::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for MealType {
    type Err = PlannerError;

    /// Accepts the stored camelCase keys plus snake/kebab spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "morningsnack" => Ok(MealType::MorningSnack),
            "lunch" => Ok(MealType::Lunch),
            "afternoonsnack" => Ok(MealType::AfternoonSnack),
            "dinner" => Ok(MealType::Dinner),
            _ => Err(PlannerError::UnknownMealType(s.to_string())),
        }
    }
}

/// A stored meal: the portions chosen for one meal slot on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: u64,
    pub profile_id: u64,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub portions: Vec<Portion>,
    pub total: NutritionAmounts,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MealRecord {
    /// Recompute `total` after the portions changed.
    pub fn refresh_total(&mut self) {
        self.total = total_nutrition(&self.portions);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meal_type_keys() {
        for meal in MealType::ALL {
            assert_eq!(meal.key().parse::<MealType>().unwrap(), meal);
        }
        assert_eq!(
            "morning_snack".parse::<MealType>().unwrap(),
            MealType::MorningSnack
        );
        assert_eq!(
            "Afternoon-Snack".parse::<MealType>().unwrap(),
            MealType::AfternoonSnack
        );
    }

    #[test]
    fn test_parse_unknown_meal_type_fails() {
        let err = "brunch".parse::<MealType>().unwrap_err();
        assert!(matches!(err, PlannerError::UnknownMealType(ref k) if k == "brunch"));
    }

    #[test]
    fn test_serde_uses_stored_keys() {
        let json = serde_json::to_string(&MealType::AfternoonSnack).unwrap();
        assert_eq!(json, "\"afternoonSnack\"");
    }
}
