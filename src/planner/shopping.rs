use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{FoodGroup, MealRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingItem {
    pub name: String,
    pub grams: u32,
    /// Number of portions that used this food.
    pub occurrences: u32,
}

/// Ingredients needed for a set of saved meals, grouped by food group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShoppingList {
    pub sections: BTreeMap<FoodGroup, Vec<ShoppingItem>>,
    pub total_meals: usize,
    pub days: Vec<NaiveDate>,
}

impl ShoppingList {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Plain-text rendering, one section per food group.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.is_empty() {
            out.push_str("No meals saved in the selected period.\n");
            return out;
        }

        let _ = writeln!(
            out,
            "Shopping list from {} meals over {} days",
            self.total_meals,
            self.days.len()
        );
        for (group, items) in &self.sections {
            let _ = writeln!(out, "\n{}", group.label().to_uppercase());
            for item in items {
                let _ = writeln!(
                    out,
                    "  ☐ {} - {}g (x{})",
                    item.name, item.grams, item.occurrences
                );
            }
        }
        out
    }
}

/// Aggregate the portions of `meals` by food. Items are sorted by name
/// inside each group.
pub fn build_shopping_list<'a>(meals: impl IntoIterator<Item = &'a MealRecord>) -> ShoppingList {
    let mut by_food: HashMap<String, (FoodGroup, ShoppingItem)> = HashMap::new();
    let mut days = BTreeSet::new();
    let mut total_meals = 0;

    for meal in meals {
        total_meals += 1;
        days.insert(meal.date);
        for portion in &meal.portions {
            let entry = by_food.entry(portion.food.key()).or_insert_with(|| {
                (
                    portion.food.category,
                    ShoppingItem {
                        name: portion.food.name.clone(),
                        grams: 0,
                        occurrences: 0,
                    },
                )
            });
            entry.1.grams += portion.grams;
            entry.1.occurrences += 1;
        }
    }

    let mut sections: BTreeMap<FoodGroup, Vec<ShoppingItem>> = BTreeMap::new();
    for (group, item) in by_food.into_values() {
        sections.entry(group).or_default().push(item);
    }
    for items in sections.values_mut() {
        items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }

    ShoppingList {
        sections,
        total_meals,
        days: days.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Food, MealType, Portion, total_nutrition};
    use chrono::Utc;

    fn food(name: &str, group: FoodGroup) -> Food {
        Food {
            name: name.to_string(),
            category: group,
            calories: 100.0,
            protein: 5.0,
            carbs: 10.0,
            fats: 2.0,
            fiber: 1.0,
        }
    }

    fn meal(id: u64, day: u32, portions: Vec<Portion>) -> MealRecord {
        let total = total_nutrition(&portions);
        MealRecord {
            id,
            profile_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            meal_type: MealType::Lunch,
            portions,
            total,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_aggregates_by_food_and_groups() {
        let meals = vec![
            meal(
                1,
                4,
                vec![
                    Portion::new(food("Zucchine", FoodGroup::Vegetables), 200),
                    Portion::new(food("Riso", FoodGroup::Grains), 80),
                ],
            ),
            meal(
                2,
                5,
                vec![
                    Portion::new(food("zucchine", FoodGroup::Vegetables), 150),
                    Portion::new(food("Broccoli", FoodGroup::Vegetables), 300),
                ],
            ),
        ];

        let list = build_shopping_list(&meals);
        assert_eq!(list.total_meals, 2);
        assert_eq!(list.days.len(), 2);
        assert_eq!(list.item_count(), 3);

        let veg = &list.sections[&FoodGroup::Vegetables];
        assert_eq!(veg[0].name, "Broccoli");
        assert_eq!(veg[1].grams, 350);
        assert_eq!(veg[1].occurrences, 2);
    }

    #[test]
    fn test_empty_list() {
        let list = build_shopping_list(&[]);
        assert!(list.is_empty());
        assert!(list.to_text().contains("No meals"));
    }
}
