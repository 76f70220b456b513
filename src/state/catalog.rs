use std::collections::HashMap;

use crate::models::{Food, FoodGroup};

/// Read-only food catalog keyed by lowercase name.
pub struct FoodCatalog {
    foods: HashMap<String, Food>,
}

impl FoodCatalog {
    /// Build a catalog; later duplicates (case-insensitive) replace earlier ones.
    pub fn new(foods: Vec<Food>) -> Self {
        let mut map = HashMap::new();
        for food in foods {
            map.insert(food.key(), food);
        }
        Self { foods: map }
    }

    /// Get a food by name (case-insensitive).
    pub fn get_food(&self, name: &str) -> Option<&Food> {
        self.foods.get(&name.trim().to_lowercase())
    }

    /// Foods whose name contains `query`, sorted by name.
    pub fn search(&self, query: &str) -> Vec<&Food> {
        let query = query.trim().to_lowercase();
        let mut found: Vec<&Food> = self
            .foods
            .iter()
            .filter(|(key, _)| key.contains(&query))
            .map(|(_, f)| f)
            .collect();
        found.sort_by_key(|f| f.key());
        found
    }

    pub fn in_group(&self, group: FoodGroup) -> Vec<&Food> {
        let mut found: Vec<&Food> = self
            .foods
            .values()
            .filter(|f| f.category == group)
            .collect();
        found.sort_by_key(|f| f.key());
        found
    }

    /// All foods sorted by name.
    pub fn all_foods(&self) -> Vec<&Food> {
        let mut all: Vec<&Food> = self.foods.values().collect();
        all.sort_by_key(|f| f.key());
        all
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}
