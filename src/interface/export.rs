use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::models::MealRecord;
use crate::planner::ShoppingList;

#[derive(Serialize)]
struct ShoppingRow<'a> {
    group: &'a str,
    name: &'a str,
    grams: u32,
    occurrences: u32,
}

#[derive(Serialize)]
struct PortionRow<'a> {
    date: String,
    meal: &'a str,
    food: &'a str,
    grams: u32,
    calories: u32,
    protein: f64,
    carbs: f64,
    fats: f64,
}

/// Write the shopping list as CSV: `group,name,grams,occurrences`.
pub fn write_shopping_csv<W: Write>(list: &ShoppingList, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for (group, items) in &list.sections {
        for item in items {
            writer.serialize(ShoppingRow {
                group: group.label(),
                name: &item.name,
                grams: item.grams,
                occurrences: item.occurrences,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write one row per saved portion.
pub fn write_meals_csv<W: Write>(meals: &[&MealRecord], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for meal in meals {
        for p in &meal.portions {
            writer.serialize(PortionRow {
                date: meal.date.to_string(),
                meal: meal.meal_type.key(),
                food: &p.food.name,
                grams: p.grams,
                calories: p.nutrition.calories,
                protein: p.nutrition.protein,
                carbs: p.nutrition.carbs,
                fats: p.nutrition.fats,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Export the shopping list to `path`; `.csv` selects CSV, anything else text.
pub fn export_shopping_list<P: AsRef<Path>>(list: &ShoppingList, path: P) -> Result<()> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        write_shopping_csv(list, fs::File::create(path)?)?;
    } else {
        fs::write(path, list.to_text())?;
    }
    info!(path = %path.display(), items = list.item_count(), "exported shopping list");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodGroup;
    use crate::planner::ShoppingItem;
    use std::collections::BTreeMap;

    fn list() -> ShoppingList {
        ShoppingList {
            sections: BTreeMap::from([(
                FoodGroup::Vegetables,
                vec![ShoppingItem {
                    name: "Broccoli".to_string(),
                    grams: 600,
                    occurrences: 2,
                }],
            )]),
            total_meals: 2,
            days: Vec::new(),
        }
    }

    #[test]
    fn test_shopping_csv() {
        let mut buf = Vec::new();
        write_shopping_csv(&list(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("group,name,grams,occurrences"));
        assert_eq!(lines.next(), Some("Vegetables,Broccoli,600,2"));
    }

    #[test]
    fn test_export_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("list.csv");
        export_shopping_list(&list(), &csv_path).unwrap();
        assert!(fs::read_to_string(&csv_path).unwrap().starts_with("group,"));

        let txt_path = dir.path().join("list.txt");
        export_shopping_list(&list(), &txt_path).unwrap();
        assert!(fs::read_to_string(&txt_path).unwrap().contains("Broccoli - 600g"));
    }
}
