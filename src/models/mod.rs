//! Data models
//!
//! Rust structs representing database entities, each with associated
//! CRUD functions taking a `&rusqlite::Connection`.

mod client;
mod meal_plan;
mod measurement;
mod training_plan;

pub use client::{
    Client, ClientCreate, ClientUpdate, EconomicLevel, DEFAULT_AGE_YEARS, DEFAULT_HEIGHT_CM,
    DEFAULT_WEIGHT_KG,
};
pub use meal_plan::{MealPlanCreate, MealPlanRecord};
pub use measurement::{Measurement, MeasurementCreate};
pub use training_plan::{TrainingPlan, TrainingPlanCreate};
