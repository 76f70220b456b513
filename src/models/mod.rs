pub mod food;
pub mod meal;
pub mod nutrition;
pub mod profile;

pub use food::{Food, FoodGroup};
pub use meal::{MealRecord, MealType};
pub use nutrition::{MacroTarget, NutritionAmounts, Portion, total_nutrition};
pub use profile::{
    ActivityLevel, BmiCategory, Gender, NewProfile, Profile, ProfileUpdate, WeightEntry,
};
