//! Meal plan builder
//!
//! Turns a TDEE and an objective into a calorie target, a fixed
//! protein/fat/carbohydrate split and a rotating meal outline.

use serde::{Deserialize, Serialize};

/// Client objective driving the caloric offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    FatLoss,
    #[default]
    Recomposition,
    Maintenance,
    MuscleGain,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::FatLoss => "fat_loss",
            Objective::Recomposition => "recomposition",
            Objective::Maintenance => "maintenance",
            Objective::MuscleGain => "muscle_gain",
        }
    }

    /// Parse an objective label. Unrecognized labels fall back to `Recomposition`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "fat_loss" | "weight_loss" | "cut" | "pérdida_de_grasa" | "perdida_de_grasa" => {
                Objective::FatLoss
            }
            "maintenance" | "maintain" | "mantenimiento" => Objective::Maintenance,
            "muscle_gain" | "bulk" | "ganancia_de_masa" => Objective::MuscleGain,
            _ => Objective::Recomposition,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Objective::FatLoss => "Fat loss",
            Objective::Recomposition => "Recomposition",
            Objective::Maintenance => "Maintenance",
            Objective::MuscleGain => "Muscle gain",
        }
    }

    /// kcal added to TDEE to get the daily target
    pub fn calorie_offset(&self) -> f64 {
        match self {
            Objective::FatLoss => -300.0,
            Objective::MuscleGain => 200.0,
            Objective::Maintenance => 0.0,
            Objective::Recomposition => -100.0,
        }
    }

    /// Protein guideline in g/kg body weight.
    ///
    /// Informational only: `build_meal_plan` uses the fixed percentage split.
    pub fn protein_g_per_kg(&self) -> f64 {
        match self {
            Objective::FatLoss => 2.0,
            Objective::MuscleGain => 1.8,
            Objective::Maintenance => 1.6,
            Objective::Recomposition => 2.0,
        }
    }
}

// ============================================================================
// Macro Split Constants
// ============================================================================

/// Share of calories from protein
pub const PROTEIN_SHARE: f64 = 0.30;
/// Share of calories from fat
pub const FAT_SHARE: f64 = 0.25;
/// Share of calories from carbohydrate
pub const CARB_SHARE: f64 = 0.45;

/// kcal per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// kcal per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;
/// kcal per gram of carbohydrate
pub const KCAL_PER_G_CARB: f64 = 4.0;

/// Meal templates, rotated over the requested number of meals
pub const MEAL_TEMPLATES: [&str; 3] = [
    "Breakfast: protein (whole eggs/egg whites) + carbs (oats/tortillas) + vegetables + 1 fruit + avocado",
    "Lunch: protein (chicken/lean beef/fish) + carbs (rice/pasta/potatoes/tortillas) + vegetables + avocado",
    "Dinner: protein (tilapia/tuna/chicken) + low carbs (tostadas/vegetables) + salad with avocado",
];

/// Daily calorie and macro targets with a meal outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPlan {
    pub calories: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub carb_g: i64,
    pub meals: Vec<String>,
}

/// Nearest whole number, halves away from zero.
///
/// Saturating `as` cast: NaN becomes 0 and out-of-range values clamp to
/// `i64::MIN`/`i64::MAX`. Callers validate inputs before they get here.
fn round_to_i64(value: f64) -> i64 {
    value.round() as i64
}

/// Build a meal plan from TDEE, objective and number of meals.
///
/// The calorie target is `tdee + objective offset` and is not clamped.
/// Grams come from a fixed 30/25/45 split of that target regardless of
/// objective. Meal `i` uses template `i % 3`.
pub fn build_meal_plan(tdee: f64, objective: Objective, meals_per_day: u32) -> MacroPlan {
    let target_calories = tdee + objective.calorie_offset();

    let protein_g = round_to_i64(target_calories * PROTEIN_SHARE / KCAL_PER_G_PROTEIN);
    let fat_g = round_to_i64(target_calories * FAT_SHARE / KCAL_PER_G_FAT);
    let carb_g = round_to_i64(target_calories * CARB_SHARE / KCAL_PER_G_CARB);

    let meals = (0..meals_per_day as usize)
        .map(|i| MEAL_TEMPLATES[i % MEAL_TEMPLATES.len()].to_string())
        .collect();

    MacroPlan {
        calories: round_to_i64(target_calories),
        protein_g,
        fat_g,
        carb_g,
        meals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OBJECTIVES: [Objective; 4] = [
        Objective::FatLoss,
        Objective::Recomposition,
        Objective::Maintenance,
        Objective::MuscleGain,
    ];

    /// Energy implied by the rounded gram targets
    fn macro_energy_kcal(plan: &MacroPlan) -> i64 {
        plan.protein_g * KCAL_PER_G_PROTEIN as i64
            + plan.fat_g * KCAL_PER_G_FAT as i64
            + plan.carb_g * KCAL_PER_G_CARB as i64
    }

    #[test]
    fn test_recomposition_reference_plan() {
        let plan = build_meal_plan(2507.125, Objective::Recomposition, 3);
        assert_eq!(plan.calories, 2407);
        assert_eq!(plan.protein_g, 181);
        assert_eq!(plan.fat_g, 67);
        assert_eq!(plan.carb_g, 271);
        assert_eq!(plan.meals.len(), 3);
        assert_eq!(plan.meals[0], MEAL_TEMPLATES[0]);
        assert_eq!(plan.meals[2], MEAL_TEMPLATES[2]);
    }

    #[test]
    fn test_calories_follow_offset_table() {
        let tdee = 2249.825;
        let expected = [
            (Objective::FatLoss, 1950),
            (Objective::Recomposition, 2150),
            (Objective::Maintenance, 2250),
            (Objective::MuscleGain, 2450),
        ];
        for (objective, calories) in expected {
            let plan = build_meal_plan(tdee, objective, 3);
            assert_eq!(plan.calories, calories, "{:?}", objective);
            assert_eq!(plan.calories, (tdee + objective.calorie_offset()).round() as i64);
        }
    }

    #[test]
    fn test_split_ignores_objective() {
        // Same target calories via different objectives give the same grams
        let fat_loss = build_meal_plan(2500.0, Objective::FatLoss, 3);
        let maintenance = build_meal_plan(2200.0, Objective::Maintenance, 3);
        assert_eq!(fat_loss, maintenance);
    }

    #[test]
    fn test_meal_rotation_wraps() {
        for n in 1..=8u32 {
            let plan = build_meal_plan(2000.0, Objective::Maintenance, n);
            assert_eq!(plan.meals.len(), n as usize);
            for (i, meal) in plan.meals.iter().enumerate() {
                assert_eq!(meal, &plan.meals[i % 3]);
                assert_eq!(meal, MEAL_TEMPLATES[i % 3]);
            }
        }

        let plan = build_meal_plan(2000.0, Objective::Maintenance, 5);
        assert_eq!(plan.meals[3], plan.meals[0]);
        assert_eq!(plan.meals[4], plan.meals[1]);
    }

    #[test]
    fn test_zero_meals_is_empty() {
        let plan = build_meal_plan(2000.0, Objective::Maintenance, 0);
        assert!(plan.meals.is_empty());
        assert_eq!(plan.calories, 2000);
    }

    #[test]
    fn test_unknown_objective_falls_back_to_recomposition() {
        let objective = Objective::from_str("get shredded");
        assert_eq!(objective, Objective::Recomposition);
        assert_eq!(objective.calorie_offset(), -100.0);
        assert_eq!(objective.protein_g_per_kg(), 2.0);
    }

    #[test]
    fn test_parse_objective_labels() {
        assert_eq!(Objective::from_str("fat-loss"), Objective::FatLoss);
        assert_eq!(Objective::from_str("pérdida de grasa"), Objective::FatLoss);
        assert_eq!(Objective::from_str("Muscle Gain"), Objective::MuscleGain);
        assert_eq!(Objective::from_str("ganancia de masa"), Objective::MuscleGain);
        assert_eq!(Objective::from_str("mantenimiento"), Objective::Maintenance);
        assert_eq!(Objective::from_str("recomposición"), Objective::Recomposition);
    }

    #[test]
    fn test_negative_target_is_not_clamped() {
        let plan = build_meal_plan(100.0, Objective::FatLoss, 1);
        assert_eq!(plan.calories, -200);
        assert_eq!(plan.protein_g, -15);
        assert!(plan.fat_g < 0);
    }

    #[test]
    fn test_macro_energy_close_to_target() {
        for objective in ALL_OBJECTIVES {
            for tdee in [1450.0, 2249.825, 2507.125, 3120.4] {
                let plan = build_meal_plan(tdee, objective, 3);
                let target = tdee + objective.calorie_offset();
                let diff = (macro_energy_kcal(&plan) as f64 - target).abs();
                assert!(diff <= 8.5, "{:?} {} off by {}", objective, tdee, diff);
            }
        }
    }

    #[test]
    fn test_idempotent() {
        for objective in ALL_OBJECTIVES {
            let a = build_meal_plan(2333.3, objective, 4);
            let b = build_meal_plan(2333.3, objective, 4);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_non_finite_tdee_saturates() {
        let plan = build_meal_plan(f64::NAN, Objective::Maintenance, 3);
        assert_eq!(plan.calories, 0);
        assert_eq!(plan.protein_g, 0);

        let plan = build_meal_plan(f64::INFINITY, Objective::Maintenance, 3);
        assert_eq!(plan.calories, i64::MAX);
    }
}
