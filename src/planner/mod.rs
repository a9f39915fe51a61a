//! Nutrition planner
//!
//! Pure calculation engine: energy estimate, calorie target, macro split
//! and meal outline. Holds no state and performs no I/O.

pub mod energy;
pub mod meal_plan;

pub use energy::{estimate_energy, ActivityLevel, AnthropometricInput, EnergyTarget, Sex};
pub use meal_plan::{build_meal_plan, MacroPlan, Objective, MEAL_TEMPLATES};
