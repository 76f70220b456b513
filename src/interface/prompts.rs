use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{PlannerError, Result};
use crate::models::{ActivityLevel, Food, Gender, MealType, NewProfile};
use crate::state::FoodCatalog;

/// Minimum Jaro-Winkler similarity for a fuzzy suggestion.
const FUZZY_THRESHOLD: f64 = 0.7;
const MAX_SUGGESTIONS: usize = 5;

/// Catalog foods ranked by similarity to `input`, best first.
pub fn fuzzy_candidates<'a>(foods: &[&'a Food], input: &str) -> Vec<&'a Food> {
    let input = input.trim().to_lowercase();
    let mut candidates: Vec<(&Food, f64)> = foods
        .iter()
        .map(|f| (*f, jaro_winkler(&f.key(), &input)))
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(f, _)| f)
        .collect()
}

/// Resolve a food name given on the command line. Exact (case-insensitive)
/// matches only; the error lists close names.
pub fn resolve_food<'a>(catalog: &'a FoodCatalog, name: &str) -> Result<&'a Food> {
    if let Some(food) = catalog.get_food(name) {
        return Ok(food);
    }

    let all = catalog.all_foods();
    let close: Vec<&str> = fuzzy_candidates(&all, name)
        .into_iter()
        .map(|f| f.name.as_str())
        .collect();

    if close.is_empty() {
        Err(PlannerError::FoodNotFound(name.to_string()))
    } else {
        Err(PlannerError::FoodNotFound(format!(
            "{} (did you mean: {}?)",
            name,
            close.join(", ")
        )))
    }
}

/// Pick foods for a meal, one name at a time, with fuzzy matching.
pub fn prompt_foods(catalog: &FoodCatalog, max_foods: usize) -> Result<Vec<Food>> {
    let all = catalog.all_foods();
    let mut selected: Vec<Food> = Vec::new();

    while selected.len() < max_foods {
        let input: String = Input::new()
            .with_prompt(format!(
                "Add a food ({}/{}, press Enter to finish)",
                selected.len(),
                max_foods
            ))
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            break;
        }

        let chosen = match catalog.get_food(input) {
            Some(food) => Some(food),
            None => pick_candidate(&fuzzy_candidates(&all, input), input)?,
        };

        if let Some(food) = chosen {
            if selected.contains(food) {
                println!("{} is already in this meal", food.name);
            } else {
                println!("Added: {}", food.name);
                selected.push(food.clone());
            }
        }
    }

    Ok(selected)
}

fn pick_candidate<'a>(candidates: &[&'a Food], input: &str) -> Result<Option<&'a Food>> {
    match candidates {
        [] => {
            println!("No matching food found for '{}'", input);
            Ok(None)
        }
        [food] => {
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}'?", food.name))
                .default(true)
                .interact()?;
            Ok(confirm.then_some(*food))
        }
        _ => {
            let mut options: Vec<String> = candidates.iter().map(|f| f.name.clone()).collect();
            options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&options)
                .default(0)
                .interact()?;

            Ok(candidates.get(selection).copied())
        }
    }
}

pub fn prompt_meal_type() -> Result<MealType> {
    let options: Vec<&str> = MealType::ALL.iter().map(|m| m.display_name()).collect();
    let selection = Select::new()
        .with_prompt("Which meal?")
        .items(&options)
        .default(2)
        .interact()?;

    MealType::ALL
        .get(selection)
        .copied()
        .ok_or_else(|| PlannerError::InvalidInput("No meal selected".to_string()))
}

fn prompt_number<T: std::str::FromStr>(prompt: &str, default: &str) -> Result<T> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| PlannerError::InvalidInput(format!("Invalid number: {}", input)))
}

/// New grams for a saved portion.
pub fn prompt_grams(food_name: &str, current: u32) -> Result<u32> {
    prompt_number(&format!("Grams of {}", food_name), &current.to_string())
}

/// Collect body metrics for a new profile.
pub fn prompt_new_profile() -> Result<NewProfile> {
    let name: String = Input::new().with_prompt("Name").interact_text()?;
    let age: u32 = prompt_number("Age (years)", "30")?;

    let genders = [Gender::Female, Gender::Male];
    let gender = Select::new()
        .with_prompt("Gender")
        .items(&["Female", "Male"])
        .default(0)
        .interact()?;

    let height_cm: f64 = prompt_number("Height (cm)", "170")?;
    let weight_kg: f64 = prompt_number("Weight (kg)", "70")?;

    let levels = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];
    let activity = Select::new()
        .with_prompt("Activity level")
        .items(&["Sedentary", "Light", "Moderate", "Active", "Very active"])
        .default(1)
        .interact()?;

    Ok(NewProfile {
        name,
        age,
        gender: genders[gender.min(genders.len() - 1)],
        height_cm,
        weight_kg,
        activity: levels[activity.min(levels.len() - 1)],
    })
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
