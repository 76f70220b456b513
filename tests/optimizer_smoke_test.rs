use assert_float_eq::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use meal_planner_rs::models::{Food, FoodGroup, MacroTarget, MealType, NutritionAmounts};
use meal_planner_rs::planner::{
    AdherenceLevel, InputIssue, PortionOptimizer, analyze, practical_round,
};

fn make_food(name: &str, group: FoodGroup, cal: f64, p: f64, c: f64, f: f64) -> Food {
    Food {
        name: name.to_string(),
        category: group,
        calories: cal,
        protein: p,
        carbs: c,
        fats: f,
        fiber: 0.0,
    }
}

fn chicken() -> Food {
    make_food("Petto di pollo", FoodGroup::Meat, 165.0, 31.0, 0.0, 3.6)
}

fn rice() -> Food {
    make_food("Riso", FoodGroup::Grains, 130.0, 2.7, 28.0, 0.3)
}

fn broccoli() -> Food {
    make_food("Broccoli", FoodGroup::Vegetables, 34.0, 2.8, 7.0, 0.4)
}

fn olive_oil() -> Food {
    make_food("Olio extravergine d'oliva", FoodGroup::Oils, 884.0, 0.0, 0.0, 100.0)
}

fn target(calories: f64, protein: f64, carbs: f64, fats: f64) -> MacroTarget {
    MacroTarget {
        calories,
        protein,
        carbs,
        fats,
        fiber: None,
    }
}

#[test]
fn test_chicken_and_broccoli_converge() {
    let optimizer = PortionOptimizer::default();
    let result = optimizer.optimize(
        &[chicken(), broccoli()],
        &target(250.0, 30.0, 10.0, 5.0),
        MealType::Lunch,
    );

    assert!(result.converged);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.portions[0].grams, 90);
    // vegetables cap
    assert_eq!(result.portions[1].grams, 300);

    let total = result.total();
    assert_eq!(total.calories, 251);

    let analysis = analyze(&result.portions, &target(250.0, 30.0, 10.0, 5.0));
    assert_eq!(analysis.adherence.calories.level, AdherenceLevel::Excellent);
}

#[test]
fn test_chicken_and_rice_clamped_to_caps() {
    let optimizer = PortionOptimizer::default();
    let meal_target = target(400.0, 30.0, 40.0, 10.0);
    let result = optimizer.optimize(&[chicken(), rice()], &meal_target, MealType::Lunch);

    // 150g chicken + 90g rice top out at 365 kcal
    assert!(!result.converged);
    assert_eq!(result.iterations, 20);
    assert_eq!(result.portions[0].grams, 150);
    assert_eq!(result.portions[1].grams, 90);
    assert_eq!(result.total().calories, 365);

    let analysis = analyze(&result.portions, &meal_target);
    assert_eq!(analysis.adherence.calories.level, AdherenceLevel::Good);
    assert_float_absolute_eq!(analysis.adherence.calories.deviation_percent, -8.8, 0.05);
}

#[test]
fn test_dinner_caps_rice_lower() {
    let optimizer = PortionOptimizer::default();
    let result = optimizer.optimize(
        &[chicken(), rice()],
        &target(400.0, 30.0, 40.0, 10.0),
        MealType::Dinner,
    );
    assert_eq!(result.portions[1].grams, 70);
}

#[test]
fn test_rounded_portions_still_reach_target() {
    let optimizer = PortionOptimizer::default();
    let dry_rice = make_food("Riso basmati", FoodGroup::Grains, 370.0, 7.5, 79.0, 0.6);
    let result = optimizer.optimize(
        &[chicken(), dry_rice],
        &target(400.0, 30.0, 40.0, 10.0),
        MealType::Lunch,
    );

    // rounding alone lands on 120g + 50g = 383 kcal
    assert!(result.converged);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.portions[0].grams, 130);
    assert_eq!(result.portions[1].grams, 50);
    assert_eq!(result.total().calories, 400);
}

#[test]
fn test_olive_oil_alone_is_poor() {
    let optimizer = PortionOptimizer::default();
    let oil_target = target(300.0, 0.0, 0.0, 30.0);
    let result = optimizer.optimize(&[olive_oil()], &oil_target, MealType::Lunch);

    assert_eq!(result.portions.len(), 1);
    assert_eq!(result.portions[0].grams, 15);
    assert!(!result.converged);

    let analysis = analyze(&result.portions, &oil_target);
    assert_eq!(analysis.adherence.calories.level, AdherenceLevel::Poor);
    assert!(analysis.suggestions.iter().any(|s| s.contains("too small")));
}

#[test]
fn test_water_only_returns_empty() {
    let optimizer = PortionOptimizer::default();
    let water = make_food("Acqua", FoodGroup::Beverages, 0.0, 0.0, 0.0, 0.0);
    let result =
        optimizer.optimize(&[water], &target(300.0, 20.0, 30.0, 10.0), MealType::Lunch);

    assert!(result.is_empty());
    assert_eq!(result.issue, Some(InputIssue::NoUsableFoods));
    assert_eq!(result.excluded, vec!["Acqua".to_string()]);
}

#[test]
fn test_empty_selection_returns_empty() {
    let optimizer = PortionOptimizer::default();
    let result = optimizer.optimize(&[], &target(300.0, 20.0, 30.0, 10.0), MealType::Lunch);
    assert!(result.is_empty());
    assert_eq!(result.issue, Some(InputIssue::NoFoods));
}

#[test]
fn test_analysis_is_idempotent() {
    let optimizer = PortionOptimizer::default();
    let meal_target = target(400.0, 30.0, 40.0, 10.0);
    let foods = [chicken(), rice(), broccoli()];
    let result = optimizer.optimize(&foods, &meal_target, MealType::Lunch);

    let first = analyze(&result.portions, &meal_target);
    let second = analyze(&result.portions, &meal_target);
    assert_eq!(first, second);
}

const NAMES: [(&str, FoodGroup); 12] = [
    ("Petto di pollo", FoodGroup::Meat),
    ("Riso basmati", FoodGroup::Grains),
    ("Pane integrale", FoodGroup::Grains),
    ("Pasta integrale", FoodGroup::Grains),
    ("Zucchine", FoodGroup::Vegetables),
    ("Mele", FoodGroup::Fruits),
    ("Mandorle", FoodGroup::Nuts),
    ("Olio extravergine d'oliva", FoodGroup::Oils),
    ("Salmone fresco", FoodGroup::Fish),
    ("Ricotta vaccina", FoodGroup::Dairy),
    ("Ceci secchi", FoodGroup::Legumes),
    ("Basilico fresco", FoodGroup::Herbs),
];

fn random_food(rng: &mut StdRng) -> Food {
    let (name, group) = NAMES[rng.gen_range(0..NAMES.len())];
    make_food(
        name,
        group,
        rng.gen_range(5.0..900.0),
        rng.gen_range(0.0..40.0),
        rng.gen_range(0.0..80.0),
        rng.gen_range(0.0..60.0),
    )
}

#[test]
fn test_bounds_and_effort_hold_for_random_inputs() {
    let mut rng = StdRng::seed_from_u64(42);
    let optimizer = PortionOptimizer::default();

    for _ in 0..300 {
        let count = rng.gen_range(1..=5);
        let foods: Vec<Food> = (0..count).map(|_| random_food(&mut rng)).collect();
        let meal = MealType::ALL[rng.gen_range(0..MealType::ALL.len())];
        let meal_target = target(
            rng.gen_range(50.0..1200.0),
            rng.gen_range(0.0..60.0),
            rng.gen_range(0.0..120.0),
            rng.gen_range(0.0..40.0),
        );

        let result = optimizer.optimize(&foods, &meal_target, meal);
        assert!(result.iterations <= 20);

        for portion in &result.portions {
            assert!(portion.grams >= 10 && portion.grams <= 500);
            assert!(f64::from(portion.grams) <= optimizer.cap_for(&portion.food, meal));
        }

        let calories = f64::from(result.total().calories);
        if result.converged {
            assert!((calories - meal_target.calories).abs() <= meal_target.calories * 0.03);
        }
        if result.portions.len() > 1 && result.iterations < 20 {
            assert!(result.converged);
        }
    }
}

#[test]
fn test_calories_never_drop_with_more_grams() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let food = random_food(&mut rng);
        let mut previous = 0;
        for grams in 1..=500 {
            let calories = NutritionAmounts::for_grams(&food, f64::from(grams)).calories;
            assert!(calories >= previous, "{} at {}g", food.name, grams);
            previous = calories;
        }
    }
}

#[test]
fn test_single_food_matches_direct_solution() {
    let mut rng = StdRng::seed_from_u64(11);
    let optimizer = PortionOptimizer::default();

    for _ in 0..100 {
        let food = random_food(&mut rng);
        let calories = rng.gen_range(50.0..800.0);
        let meal = MealType::ALL[rng.gen_range(0..MealType::ALL.len())];

        let result = optimizer.optimize(
            std::slice::from_ref(&food),
            &target(calories, 10.0, 10.0, 10.0),
            meal,
        );

        let expected = practical_round(100.0 * calories / food.calories)
            .clamp(10.0, optimizer.cap_for(&food, meal));
        assert_eq!(result.iterations, 0);
        assert_eq!(f64::from(result.portions[0].grams), expected);
    }
}
