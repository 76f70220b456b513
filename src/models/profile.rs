use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Activity level, mapped to a TDEE multiplier by the target model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    #[default]
    Light,
    Moderate,
    Active,
    VeryActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese => "obese",
        };
        f.write_str(name)
    }
}

/// Body mass index, one decimal.
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    ((weight_kg / (height_m * height_m)) * 10.0).round() / 10.0
}

/// Body metrics needed to create a profile.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity: ActivityLevel,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity: Option<ActivityLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub activity: ActivityLevel,
    pub bmi: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.bmi)
    }

    /// Range checks on body metrics. The metabolic formulas are only
    /// meaningful inside these bounds.
    pub fn validate_metrics(age: u32, height_cm: f64, weight_kg: f64) -> Result<()> {
        if !(10..=120).contains(&age) {
            return Err(PlannerError::InvalidInput(
                "Age must be between 10 and 120 years".to_string(),
            ));
        }
        if !(height_cm > 0.0 && height_cm <= 300.0) {
            return Err(PlannerError::InvalidInput(
                "Height must be between 0 and 300 cm".to_string(),
            ));
        }
        if !(weight_kg > 0.0 && weight_kg <= 300.0) {
            return Err(PlannerError::InvalidInput(
                "Weight must be between 0 and 300 kg".to_string(),
            ));
        }
        Ok(())
    }
}

/// One body-weight measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: u64,
    pub profile_id: u64,
    pub weight_kg: f64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        assert_eq!(calculate_bmi(180.0, 81.0), 25.0);
        assert_eq!(calculate_bmi(165.0, 60.0), 22.0);
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_validate_metrics() {
        assert!(Profile::validate_metrics(30, 175.0, 70.0).is_ok());
        assert!(Profile::validate_metrics(9, 175.0, 70.0).is_err());
        assert!(Profile::validate_metrics(30, 0.0, 70.0).is_err());
        assert!(Profile::validate_metrics(30, 175.0, 301.0).is_err());
    }
}
