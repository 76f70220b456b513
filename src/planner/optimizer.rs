use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::models::{Food, MacroTarget, MealType, NutritionAmounts, Portion};
use crate::planner::classifier::FoodClassifier;
use crate::planner::constants::*;
use crate::planner::limits::CategoryLimits;

/// Per-100g amounts from which a food counts as rich in a macro.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RichThresholds {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Default for RichThresholds {
    fn default() -> Self {
        Self {
            protein: PROTEIN_RICH_THRESHOLD,
            carbs: CARBS_RICH_THRESHOLD,
            fats: FATS_RICH_THRESHOLD,
        }
    }
}

impl RichThresholds {
    pub fn protein_rich(&self, food: &Food) -> bool {
        food.protein >= self.protein
    }

    pub fn carbs_rich(&self, food: &Food) -> bool {
        food.carbs >= self.carbs
    }

    pub fn fats_rich(&self, food: &Food) -> bool {
        food.fats >= self.fats
    }
}

/// Tunable knobs of the portion solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub max_iterations: usize,
    /// Fraction of target calories accepted as converged.
    pub calorie_tolerance: f64,
    pub min_grams: f64,
    pub max_grams: f64,
    pub max_foods: usize,
    pub fallback_seed_grams: f64,
    /// Multiplicative step for macro-rich foods.
    pub macro_nudge: f64,
    /// Macro errors within this fraction of the macro target are left alone.
    pub macro_deadband: f64,
    pub rich: RichThresholds,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            calorie_tolerance: CALORIE_TOLERANCE,
            min_grams: MIN_PORTION_GRAMS,
            max_grams: MAX_PORTION_GRAMS,
            max_foods: MAX_FOODS_PER_MEAL,
            fallback_seed_grams: FALLBACK_SEED_GRAMS,
            macro_nudge: MACRO_NUDGE,
            macro_deadband: MACRO_DEADBAND,
            rich: RichThresholds::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(PlannerError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.calorie_tolerance > 0.0 && self.calorie_tolerance < 1.0) {
            return Err(PlannerError::InvalidConfig(
                "calorie_tolerance must be between 0 and 1".to_string(),
            ));
        }
        if !(self.min_grams > 0.0 && self.min_grams <= self.max_grams) {
            return Err(PlannerError::InvalidConfig(format!(
                "portion bounds must satisfy 0 < min ({}) <= max ({})",
                self.min_grams, self.max_grams
            )));
        }
        if self.max_foods == 0 {
            return Err(PlannerError::InvalidConfig(
                "max_foods must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.macro_nudge) || self.macro_deadband < 0.0 {
            return Err(PlannerError::InvalidConfig(
                "macro_nudge must be in [0, 1) and macro_deadband non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Why an optimization produced no portions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputIssue {
    /// Target calories missing, non-positive or not finite.
    InvalidTarget,
    NoFoods,
    /// Every selected food was rejected (zero calories or invalid values).
    NoUsableFoods,
    TooManyFoods { count: usize, max: usize },
}

impl fmt::Display for InputIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputIssue::InvalidTarget => write!(f, "the meal target has no positive calorie goal"),
            InputIssue::NoFoods => write!(f, "no foods were selected"),
            InputIssue::NoUsableFoods => {
                write!(f, "none of the selected foods provide calories")
            }
            InputIssue::TooManyFoods { count, max } => {
                write!(f, "{} foods selected, at most {} can be portioned", count, max)
            }
        }
    }
}

/// Result of one optimization call.
#[derive(Debug, Clone, Default)]
pub struct Optimization {
    pub portions: Vec<Portion>,
    /// Adjustment passes performed.
    pub iterations: usize,
    /// Total calories ended within tolerance of the target.
    pub converged: bool,
    /// Names of selected foods left out because they carry no calories.
    pub excluded: Vec<String>,
    pub issue: Option<InputIssue>,
}

impl Optimization {
    fn rejected(issue: InputIssue, excluded: Vec<String>) -> Self {
        warn!(%issue, "portion optimization skipped");
        Self {
            issue: Some(issue),
            excluded,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.portions.is_empty()
    }

    pub fn total(&self) -> NutritionAmounts {
        crate::models::total_nutrition(&self.portions)
    }
}

/// Snap grams to what a kitchen scale reads comfortably:
/// 5g steps below 50g, 10g steps up to 200g, 25g steps above.
pub fn practical_round(grams: f64) -> f64 {
    let step = if grams < 50.0 {
        5.0
    } else if grams <= 200.0 {
        10.0
    } else {
        25.0
    };
    (grams / step).round() * step
}

/// Next weight up on the [`practical_round`] scale.
fn step_up(grams: f64) -> f64 {
    grams
        + if grams < 50.0 {
            5.0
        } else if grams < 200.0 {
            10.0
        } else {
            25.0
        }
}

/// Next weight down on the [`practical_round`] scale.
fn step_down(grams: f64) -> f64 {
    grams
        - if grams <= 50.0 {
            5.0
        } else if grams <= 200.0 {
            10.0
        } else {
            25.0
        }
}

/// Iterative proportional-adjustment solver for per-food grams.
///
/// Calories drive convergence; protein, carbs and fats only steer the mix
/// between foods. Each pass scales every portion by the calorie error,
/// nudges foods rich in an off-target macro, hands the calories that capped
/// foods cannot absorb to the others, snaps to practical grams within
/// `[min_grams, cap]`, then walks single foods along the scale while that
/// closes the calorie gap left by snapping.
#[derive(Debug, Clone, Default)]
pub struct PortionOptimizer {
    config: OptimizerConfig,
    limits: CategoryLimits,
    classifier: FoodClassifier,
}

impl PortionOptimizer {
    pub fn new(
        config: OptimizerConfig,
        limits: CategoryLimits,
        classifier: FoodClassifier,
    ) -> Self {
        Self {
            config,
            limits,
            classifier,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(
            config.optimizer.clone(),
            config.limits.clone(),
            config.classifier.clone(),
        )
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Largest portion this food may receive at `meal`, in whole grams.
    pub fn cap_for(&self, food: &Food, meal: MealType) -> f64 {
        let category = self.classifier.classify(food);
        self.limits
            .cap_for(category, meal)
            .min(self.config.max_grams)
            .floor()
            .max(self.min_grams())
    }

    fn min_grams(&self) -> f64 {
        self.config.min_grams.ceil()
    }

    fn snap(&self, grams: f64, cap: f64) -> f64 {
        practical_round(grams).clamp(self.min_grams(), cap)
    }

    /// Compute grams for 1..=max_foods foods so their total calories
    /// approach `target.calories`.
    ///
    /// Never fails: bad input yields an empty result with `issue` set, and an
    /// unreachable target yields the best portions found once the iteration
    /// budget runs out.
    pub fn optimize(&self, foods: &[Food], target: &MacroTarget, meal: MealType) -> Optimization {
        if !target.is_valid() {
            return Optimization::rejected(InputIssue::InvalidTarget, Vec::new());
        }
        if foods.is_empty() {
            return Optimization::rejected(InputIssue::NoFoods, Vec::new());
        }

        let (usable, rejected): (Vec<&Food>, Vec<&Food>) =
            foods.iter().partition(|f| f.is_usable());
        let excluded: Vec<String> = rejected.iter().map(|f| f.name.clone()).collect();
        if !excluded.is_empty() {
            warn!(?excluded, "skipping foods without usable calories");
        }

        if usable.is_empty() {
            return Optimization::rejected(InputIssue::NoUsableFoods, excluded);
        }
        if usable.len() > self.config.max_foods {
            let issue = InputIssue::TooManyFoods {
                count: usable.len(),
                max: self.config.max_foods,
            };
            return Optimization::rejected(issue, excluded);
        }

        let caps: Vec<f64> = usable.iter().map(|f| self.cap_for(f, meal)).collect();
        let tolerance = target.calories * self.config.calorie_tolerance;

        let (grams, iterations) = if usable.len() == 1 {
            (self.solve_single(usable[0], caps[0], target), 0)
        } else {
            self.solve_multiple(&usable, &caps, target, tolerance)
        };

        let portions: Vec<Portion> = usable
            .iter()
            .zip(&grams)
            .map(|(food, g)| Portion::new((*food).clone(), g.round() as u32))
            .collect();

        let total = crate::models::total_nutrition(&portions);
        let converged = (target.calories - f64::from(total.calories)).abs() <= tolerance;

        if converged {
            info!(
                meal = meal.key(),
                iterations,
                calories = total.calories,
                target = target.calories,
                "portions converged"
            );
        } else {
            warn!(
                meal = meal.key(),
                iterations,
                calories = total.calories,
                target = target.calories,
                "calorie target not reached; returning best approximation"
            );
        }

        Optimization {
            portions,
            iterations,
            converged,
            excluded,
            issue: None,
        }
    }

    /// One food: solve grams straight from the calorie target.
    fn solve_single(&self, food: &Food, cap: f64, target: &MacroTarget) -> Vec<f64> {
        vec![self.snap(target.calories / food.calories_per_gram(), cap)]
    }

    fn solve_multiple(
        &self,
        foods: &[&Food],
        caps: &[f64],
        target: &MacroTarget,
        tolerance: f64,
    ) -> (Vec<f64>, usize) {
        let n = foods.len() as f64;

        // Even calorie split to start.
        let mut grams: Vec<f64> = foods
            .iter()
            .zip(caps)
            .map(|(food, cap)| {
                let per_gram = food.calories_per_gram();
                let seed = if per_gram > 0.0 && per_gram.is_finite() {
                    target.calories / n / per_gram
                } else {
                    self.config.fallback_seed_grams
                };
                self.snap(seed, *cap)
            })
            .collect();

        let mut iterations = 0;
        loop {
            let current = Self::totals(foods, &grams);
            let calorie_error = target.calories - f64::from(current.calories);

            debug!(
                iteration = iterations,
                calories = current.calories,
                calorie_error,
                protein = current.protein,
                carbs = current.carbs,
                fats = current.fats,
                ?grams,
                "portion pass"
            );

            if calorie_error.abs() <= tolerance || iterations >= self.config.max_iterations {
                break;
            }

            grams = self.adjust(foods, &grams, caps, target, &current, tolerance);
            iterations += 1;
        }

        (grams, iterations)
    }

    fn totals(foods: &[&Food], grams: &[f64]) -> NutritionAmounts {
        let amounts: Vec<NutritionAmounts> = foods
            .iter()
            .zip(grams)
            .map(|(food, g)| NutritionAmounts::for_grams(food, *g))
            .collect();
        NutritionAmounts::total(&amounts)
    }

    fn adjust(
        &self,
        foods: &[&Food],
        grams: &[f64],
        caps: &[f64],
        target: &MacroTarget,
        current: &NutritionAmounts,
        tolerance: f64,
    ) -> Vec<f64> {
        let factor = if current.calories > 0 {
            target.calories / f64::from(current.calories)
        } else {
            1.0
        };

        let protein_dir = self.nudge_direction(target.protein, current.protein);
        let carbs_dir = self.nudge_direction(target.carbs, current.carbs);
        let fats_dir = self.nudge_direction(target.fats, current.fats);
        let rich = &self.config.rich;
        let step = self.config.macro_nudge;

        let mut next: Vec<f64> = foods
            .iter()
            .zip(grams)
            .map(|(food, g)| {
                let mut g = g * factor;
                if rich.protein_rich(food) {
                    g *= 1.0 + protein_dir * step;
                }
                if rich.carbs_rich(food) {
                    g *= 1.0 + carbs_dir * step;
                }
                if rich.fats_rich(food) {
                    g *= 1.0 + fats_dir * step;
                }
                g
            })
            .collect();

        self.rebalance(foods, &mut next, caps, target.calories);

        let mut snapped: Vec<f64> = next
            .iter()
            .zip(caps)
            .map(|(g, cap)| self.snap(*g, *cap))
            .collect();
        self.refine(foods, &mut snapped, caps, target.calories, tolerance);
        snapped
    }

    /// Greedy one-step moves on snapped grams. Each move shifts a single food
    /// one step up or down the practical scale and is kept only when it
    /// brings total calories strictly closer to the target.
    fn refine(
        &self,
        foods: &[&Food],
        grams: &mut [f64],
        caps: &[f64],
        target_calories: f64,
        tolerance: f64,
    ) {
        let min = self.min_grams();
        let gap = |grams: &[f64]| {
            (target_calories - f64::from(Self::totals(foods, grams).calories)).abs()
        };

        for _ in 0..grams.len() * 4 {
            let current = gap(grams);
            if current <= tolerance {
                return;
            }

            let mut best: Option<(f64, usize, f64)> = None;
            for i in 0..grams.len() {
                for candidate in [step_up(grams[i]), step_down(grams[i])] {
                    let candidate = candidate.clamp(min, caps[i]);
                    if candidate == grams[i] {
                        continue;
                    }
                    let previous = grams[i];
                    grams[i] = candidate;
                    let moved = gap(grams);
                    grams[i] = previous;
                    if best.is_none_or(|(b, _, _)| moved < b) {
                        best = Some((moved, i, candidate));
                    }
                }
            }

            match best {
                Some((moved, i, candidate)) if moved < current => grams[i] = candidate,
                _ => return,
            }
        }
    }

    /// +1 when the macro is short, -1 when in excess, 0 inside the dead-band.
    fn nudge_direction(&self, target: f64, current: f64) -> f64 {
        if target <= 0.0 {
            return 0.0;
        }
        let error = target - current;
        if error.abs() <= target * self.config.macro_deadband {
            0.0
        } else {
            error.signum()
        }
    }

    /// Rescale portions to the calorie target while honouring the bounds.
    /// A portion that would cross its cap (or the minimum) is pinned there
    /// and the remaining calories are spread over the free ones.
    fn rebalance(&self, foods: &[&Food], grams: &mut [f64], caps: &[f64], target_calories: f64) {
        let min = self.min_grams();
        let mut pinned = vec![false; grams.len()];

        for _ in 0..grams.len() {
            let kcal = |i: usize| grams[i] * foods[i].calories_per_gram();
            let fixed: f64 = (0..grams.len()).filter(|&i| pinned[i]).map(kcal).sum();
            let free: f64 = (0..grams.len()).filter(|&i| !pinned[i]).map(kcal).sum();
            if free <= 0.0 {
                return;
            }

            let scale = ((target_calories - fixed) / free).max(0.0);
            let mut pinned_any = false;
            for i in 0..grams.len() {
                if pinned[i] {
                    continue;
                }
                let scaled = grams[i] * scale;
                if scaled > caps[i] {
                    grams[i] = caps[i];
                    pinned[i] = true;
                    pinned_any = true;
                } else if scaled < min {
                    grams[i] = min;
                    pinned[i] = true;
                    pinned_any = true;
                }
            }

            if !pinned_any {
                for i in 0..grams.len() {
                    if !pinned[i] {
                        grams[i] *= scale;
                    }
                }
                return;
            }
        }
    }
}
