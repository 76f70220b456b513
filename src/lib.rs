pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod state;

pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use models::{Food, FoodGroup, MacroTarget, MealType, NutritionAmounts, Portion};
