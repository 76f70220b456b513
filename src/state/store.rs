use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use crate::models::profile::calculate_bmi;
use crate::models::{
    MealRecord, MealType, NewProfile, Portion, Profile, ProfileUpdate, WeightEntry,
    total_nutrition,
};

/// Summary of a profile's weight history.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WeightStats {
    pub initial: f64,
    pub current: f64,
    /// Current minus initial; negative means weight lost.
    pub change: f64,
    /// Change per week between the first and last entry. Zero when all
    /// entries share a date.
    pub weekly_average: f64,
}

/// All user records: profiles, saved meals and weight entries.
///
/// Ids are sequential and shared across record kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerStore {
    next_id: u64,
    current_profile: Option<u64>,
    profiles: BTreeMap<u64, Profile>,
    meals: BTreeMap<u64, MealRecord>,
    weights: BTreeMap<u64, WeightEntry>,
}

impl PlannerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // ─── Profiles ────────────────────────────────────────────────────────────

    /// Create a profile and record its starting weight for today.
    pub fn create_profile(&mut self, new: NewProfile) -> Result<&Profile> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(PlannerError::InvalidInput(
                "Profile name cannot be empty".to_string(),
            ));
        }
        Profile::validate_metrics(new.age, new.height_cm, new.weight_kg)?;

        let id = self.allocate_id();
        let now = Utc::now();
        let profile = Profile {
            id,
            name,
            age: new.age,
            gender: new.gender,
            height_cm: new.height_cm,
            weight_kg: new.weight_kg,
            activity: new.activity,
            bmi: calculate_bmi(new.height_cm, new.weight_kg),
            created_at: now,
            updated_at: now,
        };
        info!(id, name = %profile.name, "created profile");
        self.profiles.insert(id, profile);

        self.add_weight(id, new.weight_kg, now.date_naive())?;
        self.profile(id)
    }

    pub fn profile(&self, id: u64) -> Result<&Profile> {
        self.profiles.get(&id).ok_or(PlannerError::ProfileNotFound(id))
    }

    /// Profiles sorted by id.
    pub fn profiles(&self) -> Vec<&Profile> {
        self.profiles.values().collect()
    }

    /// Apply the fields present in `update`. BMI follows height and weight.
    pub fn update_profile(&mut self, id: u64, update: ProfileUpdate) -> Result<&Profile> {
        let current = self.profile(id)?;
        let age = update.age.unwrap_or(current.age);
        let height_cm = update.height_cm.unwrap_or(current.height_cm);
        let weight_kg = update.weight_kg.unwrap_or(current.weight_kg);
        Profile::validate_metrics(age, height_cm, weight_kg)?;

        let profile = self
            .profiles
            .get_mut(&id)
            .ok_or(PlannerError::ProfileNotFound(id))?;

        if let Some(name) = update.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            profile.name = name;
        }
        if let Some(gender) = update.gender {
            profile.gender = gender;
        }
        if let Some(activity) = update.activity {
            profile.activity = activity;
        }
        profile.age = age;
        if update.height_cm.is_some() || update.weight_kg.is_some() {
            profile.height_cm = height_cm;
            profile.weight_kg = weight_kg;
            profile.bmi = calculate_bmi(height_cm, weight_kg);
        }
        profile.updated_at = Utc::now();

        Ok(&*profile)
    }

    /// Remove a profile with its meals and weight entries.
    pub fn delete_profile(&mut self, id: u64) -> Result<Profile> {
        let profile = self
            .profiles
            .remove(&id)
            .ok_or(PlannerError::ProfileNotFound(id))?;

        let meals_before = self.meals.len();
        self.meals.retain(|_, m| m.profile_id != id);
        self.weights.retain(|_, w| w.profile_id != id);
        if self.current_profile == Some(id) {
            self.current_profile = None;
        }

        info!(
            id,
            meals_removed = meals_before - self.meals.len(),
            "deleted profile"
        );
        Ok(profile)
    }

    pub fn set_current_profile(&mut self, id: u64) -> Result<()> {
        self.profile(id)?;
        self.current_profile = Some(id);
        Ok(())
    }

    pub fn current_profile(&self) -> Option<&Profile> {
        self.current_profile.and_then(|id| self.profiles.get(&id))
    }

    // ─── Meals ───────────────────────────────────────────────────────────────

    /// Store the portions for one meal slot. Replaces the existing meal for
    /// the same profile, date and meal type.
    pub fn save_meal(
        &mut self,
        profile_id: u64,
        date: NaiveDate,
        meal_type: MealType,
        portions: Vec<Portion>,
    ) -> Result<&MealRecord> {
        self.profile(profile_id)?;
        let total = total_nutrition(&portions);
        let now = Utc::now();

        let existing = self.meal_for(profile_id, date, meal_type).map(|m| m.id);
        let id = match existing {
            Some(id) => {
                let meal = self.meals.get_mut(&id).ok_or(PlannerError::MealNotFound(id))?;
                meal.portions = portions;
                meal.total = total;
                meal.updated_at = now;
                debug!(id, meal = meal_type.key(), %date, "replaced saved meal");
                id
            }
            None => {
                let id = self.allocate_id();
                self.meals.insert(
                    id,
                    MealRecord {
                        id,
                        profile_id,
                        date,
                        meal_type,
                        portions,
                        total,
                        created_at: now,
                        updated_at: now,
                    },
                );
                debug!(id, meal = meal_type.key(), %date, "saved meal");
                id
            }
        };

        self.meal(id)
    }

    pub fn meal(&self, id: u64) -> Result<&MealRecord> {
        self.meals.get(&id).ok_or(PlannerError::MealNotFound(id))
    }

    /// A profile's meals ordered by date, then meal slot.
    pub fn meals_for_profile(&self, profile_id: u64) -> Vec<&MealRecord> {
        let mut meals: Vec<&MealRecord> = self
            .meals
            .values()
            .filter(|m| m.profile_id == profile_id)
            .collect();
        meals.sort_by_key(|m| (m.date, m.meal_type));
        meals
    }

    pub fn meals_on(&self, profile_id: u64, date: NaiveDate) -> Vec<&MealRecord> {
        self.meals_between(profile_id, date, date)
    }

    /// Meals with `start <= date <= end`.
    pub fn meals_between(
        &self,
        profile_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<&MealRecord> {
        self.meals_for_profile(profile_id)
            .into_iter()
            .filter(|m| m.date >= start && m.date <= end)
            .collect()
    }

    pub fn meal_for(
        &self,
        profile_id: u64,
        date: NaiveDate,
        meal_type: MealType,
    ) -> Option<&MealRecord> {
        self.meals
            .values()
            .find(|m| m.profile_id == profile_id && m.date == date && m.meal_type == meal_type)
    }

    /// Manual edit of one portion. Only that portion's nutrition and the meal
    /// total are recomputed; the other portions keep their grams.
    pub fn adjust_portion(
        &mut self,
        meal_id: u64,
        food_name: &str,
        grams: u32,
    ) -> Result<&MealRecord> {
        let meal = self
            .meals
            .get_mut(&meal_id)
            .ok_or(PlannerError::MealNotFound(meal_id))?;

        let key = food_name.trim().to_lowercase();
        let portion = meal
            .portions
            .iter_mut()
            .find(|p| p.food.key() == key)
            .ok_or_else(|| PlannerError::FoodNotFound(food_name.to_string()))?;

        portion.set_grams(grams.max(1));
        meal.refresh_total();
        info!(meal_id, food = food_name, grams = grams.max(1), "portion adjusted");
        Ok(&*meal)
    }

    /// Returns whether a meal was removed.
    pub fn delete_meal(&mut self, id: u64) -> bool {
        let removed = self.meals.remove(&id).is_some();
        if removed {
            info!(id, "deleted meal");
        }
        removed
    }

    // ─── Weight ──────────────────────────────────────────────────────────────

    /// Record a weight. When it is the most recent entry the profile's
    /// weight and BMI follow it.
    pub fn add_weight(
        &mut self,
        profile_id: u64,
        weight_kg: f64,
        date: NaiveDate,
    ) -> Result<&WeightEntry> {
        if !(weight_kg > 0.0 && weight_kg <= 300.0) {
            return Err(PlannerError::InvalidInput(
                "Weight must be between 0 and 300 kg".to_string(),
            ));
        }
        self.profile(profile_id)?;

        let is_latest = self
            .weights
            .values()
            .filter(|w| w.profile_id == profile_id)
            .all(|w| w.date <= date);

        let id = self.allocate_id();
        self.weights.insert(
            id,
            WeightEntry {
                id,
                profile_id,
                weight_kg,
                date,
                created_at: Utc::now(),
            },
        );

        if is_latest {
            if let Some(profile) = self.profiles.get_mut(&profile_id) {
                profile.weight_kg = weight_kg;
                profile.bmi = calculate_bmi(profile.height_cm, weight_kg);
                profile.updated_at = Utc::now();
            }
        }

        self.weights
            .get(&id)
            .ok_or_else(|| PlannerError::InvalidInput(format!("weight entry {} missing", id)))
    }

    /// Entries sorted by date, oldest first.
    pub fn weight_history(&self, profile_id: u64) -> Vec<&WeightEntry> {
        let mut history: Vec<&WeightEntry> = self
            .weights
            .values()
            .filter(|w| w.profile_id == profile_id)
            .collect();
        history.sort_by_key(|w| (w.date, w.id));
        history
    }

    pub fn weight_stats(&self, profile_id: u64) -> WeightStats {
        let history = self.weight_history(profile_id);
        let (Some(first), Some(last)) = (history.first(), history.last()) else {
            return WeightStats::default();
        };

        let change = last.weight_kg - first.weight_kg;
        let weeks = (last.date - first.date).num_days() as f64 / 7.0;
        WeightStats {
            initial: first.weight_kg,
            current: last.weight_kg,
            change,
            weekly_average: if weeks > 0.0 { change / weeks } else { 0.0 },
        }
    }

    pub fn meal_count(&self) -> usize {
        self.meals.len()
    }
}
