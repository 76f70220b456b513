use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use crate::models::{ActivityLevel, FoodGroup, Gender, MealType};

/// Meal planner: daily calorie targets and per-meal portion sizing for a
/// weight-loss diet.
#[derive(Parser, Debug)]
#[command(name = "meal_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the JSON record store (profiles, meals, weights).
    #[arg(short, long, global = true, default_value = "planner_store.json")]
    pub store: String,

    /// Path to the food catalog JSON file.
    #[arg(short, long, global = true, default_value = "data/foods.json")]
    pub catalog: String,

    /// Optional JSON file overriding the planner tables.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a profile. Missing fields are asked interactively.
    ProfileAdd {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        age: Option<u32>,

        #[arg(long, value_enum)]
        gender: Option<Gender>,

        /// Height in cm.
        #[arg(long)]
        height: Option<f64>,

        /// Weight in kg.
        #[arg(long)]
        weight: Option<f64>,

        #[arg(long, value_enum, default_value_t = ActivityLevel::Light)]
        activity: ActivityLevel,
    },

    /// List profiles; the current one is marked with '*'.
    Profiles,

    /// Make a profile the current one.
    ProfileUse { id: u64 },

    /// Delete a profile with all its meals and weight entries.
    ProfileDelete {
        id: u64,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Show daily and per-meal targets.
    Targets {
        #[arg(short, long)]
        profile: Option<u64>,
    },

    /// Compute portions for a meal from selected foods.
    Plan {
        /// breakfast, morningSnack, lunch, afternoonSnack or dinner.
        #[arg(short, long)]
        meal: Option<MealType>,

        /// Food name from the catalog (repeatable, up to 5).
        #[arg(short, long = "food")]
        foods: Vec<String>,

        /// Day to save the meal under (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        profile: Option<u64>,

        /// Save without asking.
        #[arg(short, long)]
        yes: bool,
    },

    /// Change the grams of one food in a saved meal.
    Adjust {
        meal_id: u64,

        food: String,

        /// New weight in grams; asked when omitted.
        grams: Option<u32>,
    },

    /// Delete a saved meal.
    MealDelete {
        id: u64,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Show a day's meals against the daily targets.
    Day {
        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        profile: Option<u64>,

        /// Also write the day's portions to a CSV file.
        #[arg(long)]
        csv: Option<String>,
    },

    /// Build a shopping list from saved meals.
    Shopping {
        /// First day (defaults to today).
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day (defaults to six days after the first).
        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(short, long)]
        profile: Option<u64>,

        /// Write to a file instead of stdout; a .csv extension selects CSV.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Record a weight and show progress.
    Weight {
        /// Weight in kg; omit to only show progress.
        kg: Option<f64>,

        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        profile: Option<u64>,
    },

    /// List or search catalog foods.
    Foods {
        /// Substring to search for.
        query: Option<String>,

        #[arg(short, long, value_enum)]
        group: Option<FoodGroup>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Targets { profile: None }
    }
}
