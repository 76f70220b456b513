use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use meal_planner_rs::cli::{Cli, Command};
use meal_planner_rs::config::PlannerConfig;
use meal_planner_rs::error::{PlannerError, Result};
use meal_planner_rs::interface::{
    display_daily_target, display_day, display_food_list, display_meal, display_meal_targets,
    display_optimization, display_profiles, display_weight_stats, export_shopping_list,
    prompt_foods, prompt_grams, prompt_meal_type, prompt_new_profile, prompt_yes_no,
    resolve_food, write_meals_csv,
};
use meal_planner_rs::models::{Food, FoodGroup, MealType, NewProfile, Profile};
use meal_planner_rs::planner::{
    PortionOptimizer, analyze_with, build_shopping_list, check_daily_targets, completed_meals,
    daily_target, meal_calorie_range, meal_target,
};
use meal_planner_rs::state::{PlannerStore, load_catalog, load_store, save_store};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Shared paths and tables for every command.
struct Context {
    store_path: String,
    catalog_path: String,
    config: PlannerConfig,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context {
        config: PlannerConfig::load_or_default(cli.config.as_deref())?,
        store_path: cli.store,
        catalog_path: cli.catalog,
    };

    match cli.command.unwrap_or_default() {
        Command::ProfileAdd {
            name,
            age,
            gender,
            height,
            weight,
            activity,
        } => {
            let new = match (name, age, gender, height, weight) {
                (Some(name), Some(age), Some(gender), Some(height_cm), Some(weight_kg)) => {
                    NewProfile {
                        name,
                        age,
                        gender,
                        height_cm,
                        weight_kg,
                        activity,
                    }
                }
                _ => prompt_new_profile()?,
            };
            cmd_profile_add(&ctx, new)
        }
        Command::Profiles => cmd_profiles(&ctx),
        Command::ProfileUse { id } => cmd_profile_use(&ctx, id),
        Command::ProfileDelete { id, yes } => cmd_profile_delete(&ctx, id, yes),
        Command::Targets { profile } => cmd_targets(&ctx, profile),
        Command::Plan {
            meal,
            foods,
            date,
            profile,
            yes,
        } => cmd_plan(&ctx, meal, &foods, date.unwrap_or_else(today), profile, yes),
        Command::Adjust {
            meal_id,
            food,
            grams,
        } => cmd_adjust(&ctx, meal_id, &food, grams),
        Command::MealDelete { id, yes } => cmd_meal_delete(&ctx, id, yes),
        Command::Day { date, profile, csv } => {
            cmd_day(&ctx, date.unwrap_or_else(today), profile, csv.as_deref())
        }
        Command::Shopping {
            from,
            to,
            profile,
            output,
        } => {
            let from = from.unwrap_or_else(today);
            let to = to.unwrap_or(from + Duration::days(6));
            cmd_shopping(&ctx, from, to, profile, output.as_deref())
        }
        Command::Weight { kg, date, profile } => {
            cmd_weight(&ctx, kg, date.unwrap_or_else(today), profile)
        }
        Command::Foods { query, group } => cmd_foods(&ctx, query.as_deref(), group),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The requested profile, or the current one.
fn select_profile(store: &PlannerStore, id: Option<u64>) -> Result<Profile> {
    match id {
        Some(id) => store.profile(id).cloned(),
        None => store.current_profile().cloned().ok_or_else(|| {
            PlannerError::InvalidInput(
                "No profile selected. Use 'profile-use <id>' or pass --profile.".to_string(),
            )
        }),
    }
}

fn cmd_profile_add(ctx: &Context, new: NewProfile) -> Result<()> {
    let mut store = load_store(&ctx.store_path)?;
    let profile = store.create_profile(new)?.clone();

    if store.current_profile().is_none() {
        store.set_current_profile(profile.id)?;
    }
    save_store(&ctx.store_path, &store)?;

    println!(
        "Created profile [{}] {} (BMI {:.1}, {})",
        profile.id,
        profile.name,
        profile.bmi,
        profile.bmi_category()
    );
    Ok(())
}

fn cmd_profiles(ctx: &Context) -> Result<()> {
    let store = load_store(&ctx.store_path)?;
    display_profiles(&store.profiles(), store.current_profile().map(|p| p.id));
    Ok(())
}

fn cmd_profile_use(ctx: &Context, id: u64) -> Result<()> {
    let mut store = load_store(&ctx.store_path)?;
    store.set_current_profile(id)?;
    save_store(&ctx.store_path, &store)?;
    println!("Now using profile [{}] {}", id, store.profile(id)?.name);
    Ok(())
}

fn cmd_profile_delete(ctx: &Context, id: u64, yes: bool) -> Result<()> {
    let mut store = load_store(&ctx.store_path)?;
    let name = store.profile(id)?.name.clone();

    let confirmed = yes
        || prompt_yes_no(
            &format!("Delete '{}' with all meals and weight entries?", name),
            false,
        )?;
    if !confirmed {
        println!("Nothing deleted.");
        return Ok(());
    }

    store.delete_profile(id)?;
    save_store(&ctx.store_path, &store)?;
    println!("Deleted profile '{}'.", name);
    Ok(())
}

fn cmd_targets(ctx: &Context, profile_id: Option<u64>) -> Result<()> {
    let store = load_store(&ctx.store_path)?;
    let profile = select_profile(&store, profile_id)?;
    let targets = &ctx.config.targets;
    let daily = daily_target(&profile, targets)?;

    display_daily_target(&profile, &daily);

    let rows: Vec<_> = MealType::ALL
        .iter()
        .map(|meal| {
            (
                meal.display_name().to_string(),
                meal_calorie_range(*meal, daily.target_calories, targets),
                meal_target(*meal, &daily.macros, targets),
            )
        })
        .collect();
    display_meal_targets(&rows);
    Ok(())
}

/// Optimize portions for one meal and offer to save them.
fn cmd_plan(
    ctx: &Context,
    meal: Option<MealType>,
    food_names: &[String],
    date: NaiveDate,
    profile_id: Option<u64>,
    yes: bool,
) -> Result<()> {
    let mut store = load_store(&ctx.store_path)?;
    let profile = select_profile(&store, profile_id)?;
    let catalog = load_catalog(&ctx.catalog_path)?;

    if catalog.is_empty() {
        println!("The food catalog at {} is empty.", ctx.catalog_path);
        return Ok(());
    }

    let daily = daily_target(&profile, &ctx.config.targets)?;
    if !daily.is_safe {
        println!(
            "WARNING: target raised to your BMR ({:.0} kcal), the usual deficit is unsafe.",
            daily.safe_minimum
        );
    }

    let meal = match meal {
        Some(meal) => meal,
        None => prompt_meal_type()?,
    };
    let target = meal_target(meal, &daily.macros, &ctx.config.targets);

    let foods: Vec<Food> = if food_names.is_empty() {
        prompt_foods(&catalog, ctx.config.optimizer.max_foods)?
    } else {
        food_names
            .iter()
            .map(|name| resolve_food(&catalog, name).cloned())
            .collect::<Result<_>>()?
    };

    println!();
    println!(
        "Planning {} for {} on {} ({:.0} kcal)...",
        meal, profile.name, date, target.calories
    );

    let optimizer = PortionOptimizer::from_config(&ctx.config);
    let result = optimizer.optimize(&foods, &target, meal);
    let analysis = analyze_with(&result.portions, &target, &ctx.config.optimizer.rich);

    display_optimization(&result, &target, &analysis);

    if result.is_empty() {
        return Ok(());
    }

    let replacing = store.meal_for(profile.id, date, meal).is_some();
    let prompt = if replacing {
        format!("Replace the saved {} for {}?", meal, date)
    } else {
        "Save this meal?".to_string()
    };

    if yes || prompt_yes_no(&prompt, true)? {
        let id = store.save_meal(profile.id, date, meal, result.portions)?.id;
        save_store(&ctx.store_path, &store)?;
        println!("Meal saved (id {}).", id);
    }

    Ok(())
}

fn cmd_adjust(ctx: &Context, meal_id: u64, food: &str, grams: Option<u32>) -> Result<()> {
    let mut store = load_store(&ctx.store_path)?;

    let grams = match grams {
        Some(g) => g,
        None => {
            let current = store
                .meal(meal_id)?
                .portions
                .iter()
                .find(|p| p.food.key() == food.trim().to_lowercase())
                .map(|p| p.grams)
                .ok_or_else(|| PlannerError::FoodNotFound(food.to_string()))?;
            prompt_grams(food, current)?
        }
    };

    let meal = store.adjust_portion(meal_id, food, grams)?.clone();
    save_store(&ctx.store_path, &store)?;

    println!();
    display_meal(&meal);
    Ok(())
}

fn cmd_meal_delete(ctx: &Context, id: u64, yes: bool) -> Result<()> {
    let mut store = load_store(&ctx.store_path)?;
    let meal = store.meal(id)?;
    let label = format!("{} on {}", meal.meal_type, meal.date);

    if !(yes || prompt_yes_no(&format!("Delete {}?", label), false)?) {
        println!("Nothing deleted.");
        return Ok(());
    }

    if store.delete_meal(id) {
        save_store(&ctx.store_path, &store)?;
        println!("Deleted {}.", label);
    }
    Ok(())
}

fn cmd_day(
    ctx: &Context,
    date: NaiveDate,
    profile_id: Option<u64>,
    csv_path: Option<&str>,
) -> Result<()> {
    let store = load_store(&ctx.store_path)?;
    let profile = select_profile(&store, profile_id)?;
    let daily = daily_target(&profile, &ctx.config.targets)?;

    let meals = store.meals_on(profile.id, date);
    let check = check_daily_targets(meals.iter().copied(), &daily.macros);
    let completed = completed_meals(meals.iter().copied());

    println!("=== {} on {} ===", profile.name, date);
    display_day(&meals, &completed, &check);

    if let Some(path) = csv_path {
        write_meals_csv(&meals, std::fs::File::create(path)?)?;
        println!("Portions written to {}", path);
    }
    Ok(())
}

fn cmd_shopping(
    ctx: &Context,
    from: NaiveDate,
    to: NaiveDate,
    profile_id: Option<u64>,
    output: Option<&str>,
) -> Result<()> {
    if to < from {
        return Err(PlannerError::InvalidInput(format!(
            "end date {} is before start date {}",
            to, from
        )));
    }

    let store = load_store(&ctx.store_path)?;
    let profile = select_profile(&store, profile_id)?;
    let meals = store.meals_between(profile.id, from, to);
    let list = build_shopping_list(meals.iter().copied());

    match output {
        Some(path) => {
            export_shopping_list(&list, path)?;
            println!(
                "Shopping list with {} items written to {}",
                list.item_count(),
                path
            );
        }
        None => print!("{}", list.to_text()),
    }
    Ok(())
}

fn cmd_weight(
    ctx: &Context,
    kg: Option<f64>,
    date: NaiveDate,
    profile_id: Option<u64>,
) -> Result<()> {
    let mut store = load_store(&ctx.store_path)?;
    let profile = select_profile(&store, profile_id)?;

    if let Some(kg) = kg {
        store.add_weight(profile.id, kg, date)?;
        save_store(&ctx.store_path, &store)?;
        println!("Recorded {:.1} kg on {}.", kg, date);
    }

    for entry in store.weight_history(profile.id) {
        println!("  {}  {:>5.1} kg", entry.date, entry.weight_kg);
    }
    display_weight_stats(&store.weight_stats(profile.id));
    Ok(())
}

fn cmd_foods(ctx: &Context, query: Option<&str>, group: Option<FoodGroup>) -> Result<()> {
    let catalog = load_catalog(&ctx.catalog_path)?;

    let foods = match (query, group) {
        (Some(q), Some(group)) => {
            let mut found = catalog.search(q);
            found.retain(|f| f.category == group);
            found
        }
        (Some(q), None) => catalog.search(q),
        (None, Some(group)) => catalog.in_group(group),
        (None, None) => catalog.all_foods(),
    };

    let title = match group {
        Some(group) => group.label().to_string(),
        None => "Foods".to_string(),
    };
    display_food_list(&foods, &title);
    Ok(())
}
