//! Print the energy target and GS preset meal plan as JSON
//!
//! Usage: plan_preview <weight_kg> <height_cm> <age> <sex> [activity] [objective] [meals_per_day]

use serde::Serialize;

use gs_coach::planner::{build_meal_plan, ActivityLevel, AnthropometricInput, EnergyTarget, MacroPlan, Objective, Sex};

const USAGE: &str =
    "Usage: plan_preview <weight_kg> <height_cm> <age> <sex> [activity] [objective] [meals_per_day]";

#[derive(Serialize)]
struct Preview {
    input: AnthropometricInput,
    objective: Objective,
    energy: EnergyTarget,
    plan: MacroPlan,
}

fn parse<T: std::str::FromStr>(args: &[String], index: usize, name: &str) -> Result<T, String> {
    let raw = args.get(index).ok_or_else(|| format!("Missing {}\n{}", name, USAGE))?;
    raw.parse().map_err(|_| format!("Invalid {}: '{}'", name, raw))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let input = AnthropometricInput {
        weight_kg: parse(&args, 0, "weight_kg")?,
        height_cm: parse(&args, 1, "height_cm")?,
        age_years: parse(&args, 2, "age")?,
        sex: Sex::from_str(args.get(3).ok_or_else(|| format!("Missing sex\n{}", USAGE))?),
        activity_level: args.get(4).map(|s| ActivityLevel::from_str(s)).unwrap_or_default(),
    };
    let objective = args.get(5).map(|s| Objective::from_str(s)).unwrap_or_default();
    let meals_per_day: u32 = match args.get(6) {
        Some(_) => parse(&args, 6, "meals_per_day")?,
        None => 3,
    };

    let energy = input.estimate_energy();
    let plan = build_meal_plan(energy.tdee, objective, meals_per_day);

    let preview = Preview {
        input,
        objective,
        energy,
        plan,
    };
    println!("{}", serde_json::to_string_pretty(&preview)?);

    Ok(())
}
