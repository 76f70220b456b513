pub mod export;
pub mod prompts;
pub mod render;

pub use export::{export_shopping_list, write_meals_csv, write_shopping_csv};
pub use prompts::{
    fuzzy_candidates, prompt_foods, prompt_grams, prompt_meal_type, prompt_new_profile,
    prompt_yes_no, resolve_food,
};
pub use render::{
    display_analysis, display_daily_target, display_day, display_food_list, display_meal,
    display_meal_targets, display_optimization, display_portions, display_profiles,
    display_weight_stats,
};
