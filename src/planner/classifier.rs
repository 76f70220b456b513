use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Food, FoodGroup};

/// Portion-size class of a food. Finer than [`FoodGroup`]: it exists to
/// pick a realistic per-meal gram cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortionCategory {
    FreshCheese,
    AgedCheese,
    Yogurt,
    Milk,
    Eggs,
    CuredMeat,
    WhiteMeat,
    RedMeat,
    Fish,
    Legumes,
    Potatoes,
    Rice,
    Pasta,
    Bread,
    Crackers,
    Cereals,
    Vegetables,
    Fruit,
    Nuts,
    Oil,
    Olives,
    Herbs,
    Sweeteners,
    Default,
}

impl fmt::Display for PortionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reuse the serde key so logs and config files agree.
        let key = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        f.write_str(&key)
    }
}

/// Keywords that place a food in a category when found in its name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: PortionCategory,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    fn new(category: PortionCategory, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        // keywords loaded from config may carry capitals
        self.keywords
            .iter()
            .any(|k| name.contains(k.to_lowercase().as_str()))
    }
}

/// Ordered keyword rules, evaluated on the food name first and then on
/// the food's catalog group. First match wins, so narrower rules must be
/// declared before broader ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodClassifier {
    pub rules: Vec<CategoryRule>,
}

impl Default for FoodClassifier {
    fn default() -> Self {
        use PortionCategory::*;

        let rules = vec![
            // fresh cheeses contain "formaggio" too, keep them first
            CategoryRule::new(
                FreshCheese,
                &[
                    "formaggio fresco",
                    "ricotta",
                    "mozzarella",
                    "fiocchi di latte",
                    "stracchino",
                    "crescenza",
                    "feta",
                    "cottage",
                    "burrata",
                    "philadelphia",
                ],
            ),
            CategoryRule::new(
                AgedCheese,
                &[
                    "parmigiano",
                    "grana padano",
                    "pecorino",
                    "provolone",
                    "fontina",
                    "asiago",
                    "gorgonzola",
                    "caciotta",
                    "scamorza",
                    "formaggio",
                    "cheese",
                ],
            ),
            CategoryRule::new(Yogurt, &["yogurt", "kefir"]),
            CategoryRule::new(Milk, &["latte", "milk"]),
            // egg pasta is pasta
            CategoryRule::new(
                Pasta,
                &[
                    "pasta", "spaghetti", "penne", "fusilli", "linguine", "tagliatelle", "gnocchi",
                ],
            ),
            CategoryRule::new(Eggs, &["uova", "uovo", "albume", "egg"]),
            CategoryRule::new(
                CuredMeat,
                &[
                    "prosciutto",
                    "bresaola",
                    "speck",
                    "salame",
                    "mortadella",
                    "pancetta",
                ],
            ),
            CategoryRule::new(
                WhiteMeat,
                &["pollo", "tacchino", "coniglio", "chicken", "turkey"],
            ),
            CategoryRule::new(
                RedMeat,
                &[
                    "manzo", "vitello", "maiale", "agnello", "cavallo", "salsiccia", "beef", "pork",
                    "lamb",
                ],
            ),
            CategoryRule::new(
                Fish,
                &[
                    "pesce", "salmone", "tonno", "merluzzo", "orata", "branzino", "spigola",
                    "sgombro", "alici", "acciughe", "sardine", "gamberi", "calamari", "polpo",
                    "cozze", "vongole", "fish", "salmon", "tuna", "cod",
                ],
            ),
            // green beans, not dried ones
            CategoryRule::new(Vegetables, &["fagiolini"]),
            CategoryRule::new(
                Legumes,
                &[
                    "ceci", "lenticchie", "fagioli", "piselli secchi", "fave secche", "lupini",
                    "chickpea", "lentil", "bean",
                ],
            ),
            // before vegetables: potatoes carry a starch-sized cap
            CategoryRule::new(Potatoes, &["patate", "potato"]),
            CategoryRule::new(Rice, &["riso", "rice"]),
            CategoryRule::new(Crackers, &["fette biscottate", "crackers", "gallette", "grissini"]),
            CategoryRule::new(Bread, &["pane", "bread", "focaccia", "friselle"]),
            CategoryRule::new(
                Cereals,
                &[
                    "avena", "oat", "farro", "orzo", "quinoa", "couscous", "cereali", "muesli",
                    "polenta", "bulgur",
                ],
            ),
            CategoryRule::new(Fruit, &["pesche noci"]),
            CategoryRule::new(Oil, &["olio", "olive oil", "burro", "butter"]),
            // after oil: "olive oil" is oil
            CategoryRule::new(Olives, &["olive", "olives"]),
            CategoryRule::new(
                Nuts,
                &[
                    "mandorle", "noci", "nocciole", "pistacchi", "anacardi", "semi", "pinoli",
                    "almond", "walnut", "nut",
                ],
            ),
            CategoryRule::new(
                Herbs,
                &[
                    "basilico", "origano", "rosmarino", "salvia", "timo", "prezzemolo", "alloro",
                    "curcuma", "cannella", "noce moscata", "zenzero", "spezie",
                ],
            ),
            CategoryRule::new(
                Sweeteners,
                &["miele", "zucchero", "marmellata", "sciroppo", "honey", "sugar"],
            ),
        ];

        Self { rules }
    }
}

impl FoodClassifier {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Category of a food. Always returns something; `Default` when neither
    /// the name nor the catalog group says more.
    pub fn classify(&self, food: &Food) -> PortionCategory {
        let name = food.name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&name))
            .map(|rule| rule.category)
            .unwrap_or_else(|| Self::from_group(food.category))
    }

    fn from_group(group: FoodGroup) -> PortionCategory {
        match group {
            FoodGroup::Vegetables => PortionCategory::Vegetables,
            FoodGroup::Fruits => PortionCategory::Fruit,
            FoodGroup::Nuts => PortionCategory::Nuts,
            FoodGroup::Oils => PortionCategory::Oil,
            FoodGroup::Legumes => PortionCategory::Legumes,
            FoodGroup::Fish => PortionCategory::Fish,
            FoodGroup::Eggs => PortionCategory::Eggs,
            FoodGroup::Grains => PortionCategory::Cereals,
            FoodGroup::Sweeteners => PortionCategory::Sweeteners,
            FoodGroup::Herbs => PortionCategory::Herbs,
            FoodGroup::Meat | FoodGroup::Dairy | FoodGroup::Beverages | FoodGroup::Other => {
                PortionCategory::Default
            }
        }
    }
}
