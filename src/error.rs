use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Food not found: {0}")]
    FoodNotFound(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(u64),

    #[error("Meal not found: {0}")]
    MealNotFound(u64),

    #[error("Unknown meal type: {0}")]
    UnknownMealType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
