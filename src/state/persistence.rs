use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::models::Food;
use crate::state::catalog::FoodCatalog;
use crate::state::store::PlannerStore;

/// Load foods from a JSON file.
///
/// Deduplicates by lowercase name (last occurrence wins) and drops records
/// with negative or non-finite nutrients.
pub fn load_foods<P: AsRef<Path>>(path: P) -> Result<Vec<Food>> {
    let content = fs::read_to_string(path)?;
    let foods: Vec<Food> = serde_json::from_str(&content)?;

    let mut seen: HashMap<String, Food> = HashMap::new();
    for food in foods {
        if !food.is_valid() {
            warn!(food = %food.debug_string(), "skipping food with invalid nutrients");
            continue;
        }
        seen.insert(food.key(), food);
    }

    Ok(seen.into_values().collect())
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<FoodCatalog> {
    let path = path.as_ref();
    let catalog = FoodCatalog::new(load_foods(path)?);
    info!(path = %path.display(), foods = catalog.len(), "loaded food catalog");
    Ok(catalog)
}

/// Load the record store. A missing file is an empty store.
pub fn load_store<P: AsRef<Path>>(path: P) -> Result<PlannerStore> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "no store file yet, starting empty");
        return Ok(PlannerStore::new());
    }

    let content = fs::read_to_string(path)?;
    let store: PlannerStore = serde_json::from_str(&content)?;
    info!(
        path = %path.display(),
        profiles = store.profiles().len(),
        meals = store.meal_count(),
        "loaded store"
    );
    Ok(store)
}

pub fn save_store<P: AsRef<Path>>(path: P, store: &PlannerStore) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(store)?;
    fs::write(path, json)?;
    info!(path = %path.display(), meals = store.meal_count(), "saved store");
    Ok(())
}
