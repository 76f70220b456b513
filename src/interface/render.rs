use crate::models::{Food, MacroTarget, MealRecord, MealType, Portion, Profile};
use crate::planner::{
    AdherenceLevel, DailyCheck, DailyTarget, MacroAdherence, MealAnalysis, MealCalorieRange,
    Optimization, TargetStatus,
};
use crate::state::WeightStats;

/// Display a profile's daily and per-meal targets.
pub fn display_daily_target(profile: &Profile, target: &DailyTarget) {
    println!();
    println!("=== Targets for {} ===", profile.name);
    println!();
    println!(
        "BMI {:.1} ({}) | {} y, {:.0} cm, {:.1} kg",
        profile.bmi,
        profile.bmi_category(),
        profile.age,
        profile.height_cm,
        profile.weight_kg
    );
    println!("BMR:    {:>5.0} kcal", target.bmr);
    println!("TDEE:   {:>5.0} kcal", target.tdee);
    println!(
        "Target: {:>5.0} kcal (deficit {:.0})",
        target.target_calories, target.deficit
    );

    if !target.is_safe {
        println!();
        println!(
            "WARNING: the standard deficit would drop below your BMR. Target raised to {:.0} kcal.",
            target.safe_minimum
        );
    }

    let m = &target.macros;
    println!();
    println!(
        "Protein: {:>4.0} g ({:.0}%)  Carbs: {:>4.0} g ({:.0}%)  Fats: {:>4.0} g ({:.0}%)",
        m.protein.grams,
        m.protein.percentage,
        m.carbs.grams,
        m.carbs.percentage,
        m.fats.grams,
        m.fats.percentage
    );
}

/// One line per meal with its calorie band and macro target.
pub fn display_meal_targets(rows: &[(String, MealCalorieRange, MacroTarget)]) {
    println!();
    println!("--- Per meal ---");
    for (name, range, target) in rows {
        println!(
            "  {:<16} {:>4} kcal ({}-{})  P:{:>3.0} C:{:>3.0} F:{:>3.0}",
            name, range.target, range.min, range.max, target.protein, target.carbs, target.fats
        );
    }
    println!();
}

pub fn display_portions(portions: &[Portion]) {
    let width = portions
        .iter()
        .map(|p| p.food.name.len())
        .max()
        .unwrap_or(10);

    for (i, p) in portions.iter().enumerate() {
        println!(
            "{:>3}. {:<width$} {:>4} g | {:>4} kcal  P:{:>5.1} C:{:>5.1} F:{:>5.1}",
            i + 1,
            p.food.name,
            p.grams,
            p.nutrition.calories,
            p.nutrition.protein,
            p.nutrition.carbs,
            p.nutrition.fats,
            width = width
        );
    }
}

/// Display an optimizer result with its analysis.
pub fn display_optimization(result: &Optimization, target: &MacroTarget, analysis: &MealAnalysis) {
    if !result.excluded.is_empty() {
        println!("Skipped (no calories): {}", result.excluded.join(", "));
    }
    if let Some(issue) = result.issue {
        println!("No portions computed: {}.", issue);
        return;
    }

    println!();
    println!("=== Portions ===");
    println!();
    display_portions(&result.portions);

    println!();
    println!(
        "Target: {:.0} kcal  P:{:.0} C:{:.0} F:{:.0}",
        target.calories, target.protein, target.carbs, target.fats
    );
    display_analysis(analysis);

    if !result.converged {
        println!(
            "Calorie target not reached after {} iterations: portion caps limit this selection.",
            result.iterations
        );
    }
    println!();
}

fn adherence_line(label: &str, a: &MacroAdherence) -> String {
    let marker = match a.level {
        AdherenceLevel::Excellent => "++",
        AdherenceLevel::Good => "+ ",
        AdherenceLevel::Poor => "--",
    };
    format!(
        "  {} {:<9} {:>+7.1}% ({})",
        marker, label, a.deviation_percent, a.level
    )
}

pub fn display_analysis(analysis: &MealAnalysis) {
    let t = &analysis.total;
    println!(
        "Total:  {} kcal  P:{:.1} C:{:.1} F:{:.1} Fiber:{:.1}",
        t.calories, t.protein, t.carbs, t.fats, t.fiber
    );

    let a = &analysis.adherence;
    println!();
    println!("{}", adherence_line("calories", &a.calories));
    println!("{}", adherence_line("protein", &a.protein));
    println!("{}", adherence_line("carbs", &a.carbs));
    println!("{}", adherence_line("fats", &a.fats));

    if !analysis.suggestions.is_empty() {
        println!();
        for s in &analysis.suggestions {
            println!("  * {}", s);
        }
    }
}

pub fn display_meal(meal: &MealRecord) {
    println!(
        "[{}] {} {} - {} kcal",
        meal.id, meal.date, meal.meal_type, meal.total.calories
    );
    display_portions(&meal.portions);
}

fn status_line(label: &str, s: &TargetStatus) -> String {
    format!(
        "  [{}] {:<9} {:>7.1} / {:.0}",
        if s.met { "x" } else { " " },
        label,
        s.current,
        s.target
    )
}

/// Display a day's meals and the check against the daily targets.
pub fn display_day(meals: &[&MealRecord], completed: &[MealType], check: &DailyCheck) {
    println!();
    if meals.is_empty() {
        println!("No meals saved for this day.");
    }
    for meal in meals {
        display_meal(meal);
        println!();
    }

    let names: Vec<&str> = completed.iter().map(|m| m.display_name()).collect();
    println!(
        "Meals logged: {}/{} {}",
        completed.len(),
        MealType::ALL.len(),
        if names.is_empty() {
            String::new()
        } else {
            format!("({})", names.join(", "))
        }
    );

    println!("--- Daily targets ---");
    println!("{}", status_line("calories", &check.calories));
    println!("{}", status_line("protein", &check.protein));
    println!("{}", status_line("carbs", &check.carbs));
    println!("{}", status_line("fats", &check.fats));
    println!();
}

pub fn display_profiles(profiles: &[&Profile], current: Option<u64>) {
    if profiles.is_empty() {
        println!("No profiles yet. Create one with 'profile-add'.");
        return;
    }
    for p in profiles {
        let marker = if Some(p.id) == current { "*" } else { " " };
        println!(
            "{} [{}] {:<20} {:>3} y {:>5.0} cm {:>5.1} kg  BMI {:.1}",
            marker, p.id, p.name, p.age, p.height_cm, p.weight_kg, p.bmi
        );
    }
}

pub fn display_weight_stats(stats: &WeightStats) {
    println!(
        "Initial {:.1} kg -> current {:.1} kg ({:+.1} kg, {:+.2} kg/week)",
        stats.initial, stats.current, stats.change, stats.weekly_average
    );
}

/// Display a simple list of foods with their details.
pub fn display_food_list(foods: &[&Food], title: &str) {
    if foods.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, foods.len());
    println!();

    for food in foods {
        println!(
            "  {} - {} kcal, P:{} C:{} F:{} ({})",
            food.name, food.calories, food.protein, food.carbs, food.fats, food.category
        );
    }

    println!();
}
