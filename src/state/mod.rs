mod catalog;
mod persistence;
mod store;

pub use catalog::FoodCatalog;
pub use persistence::{load_catalog, load_foods, load_store, save_store};
pub use store::{PlannerStore, WeightStats};
