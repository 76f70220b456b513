pub mod analyzer;
pub mod classifier;
pub mod constants;
pub mod daily;
pub mod limits;
pub mod optimizer;
pub mod shopping;
pub mod targets;

pub use analyzer::{Adherence, AdherenceLevel, MacroAdherence, MealAnalysis, analyze, analyze_with};
pub use classifier::{CategoryRule, FoodClassifier, PortionCategory};
pub use daily::{
    DailyCheck, TargetStatus, check_daily_targets, check_intake, completed_meals, daily_nutrition,
};
pub use limits::CategoryLimits;
pub use optimizer::{
    InputIssue, Optimization, OptimizerConfig, PortionOptimizer, RichThresholds, practical_round,
};
pub use shopping::{ShoppingItem, ShoppingList, build_shopping_list};
pub use targets::{
    DailyMacros, DailyTarget, MacroShare, MealCalorieRange, TargetConfig, calculate_bmr,
    calculate_macros, calculate_tdee, daily_target, meal_calorie_range, meal_target,
    meal_target_for_key,
};
