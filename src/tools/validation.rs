//! Input validation
//!
//! The planner accepts any numbers; bounds are enforced here, before
//! anything is computed or written.

use std::fmt::Display;
use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::models::{ClientCreate, ClientUpdate, MeasurementCreate, TrainingPlanCreate};

pub const AGE_RANGE: RangeInclusive<u32> = 1..=120;
pub const HEIGHT_CM_RANGE: RangeInclusive<f64> = 80.0..=230.0;
pub const WEIGHT_KG_RANGE: RangeInclusive<f64> = 10.0..=400.0;
pub const PERCENT_RANGE: RangeInclusive<f64> = 0.0..=80.0;
pub const VISCERAL_FAT_RANGE: RangeInclusive<u32> = 0..=30;
pub const MEALS_PER_DAY_RANGE: RangeInclusive<u32> = 1..=8;
pub const CIRCUMFERENCE_CM_RANGE: RangeInclusive<f64> = 20.0..=200.0;
pub const ARM_CM_RANGE: RangeInclusive<f64> = 10.0..=80.0;
pub const DAYS_PER_WEEK_RANGE: RangeInclusive<u32> = 1..=7;
pub const SESSION_MINUTES_RANGE: RangeInclusive<u32> = 30..=180;

/// Check that `value` lies within `range`. NaN is always rejected.
pub fn check_range<T>(field: &str, value: T, range: &RangeInclusive<T>) -> Result<(), String>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} must be between {} and {} (got {})",
            field,
            range.start(),
            range.end(),
            value
        ))
    }
}

fn check_optional<T>(field: &str, value: Option<T>, range: &RangeInclusive<T>) -> Result<(), String>
where
    T: PartialOrd + Display,
{
    match value {
        Some(v) => check_range(field, v, range),
        None => Ok(()),
    }
}

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    Ok(())
}

/// Dates are stored as `YYYY-MM-DD`
pub fn validate_date(date: &str) -> Result<(), String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", date))
}

pub fn validate_client_create(data: &ClientCreate) -> Result<(), String> {
    validate_name(&data.name)?;
    check_optional("age", data.age, &AGE_RANGE)?;
    check_optional("height_cm", data.height_cm, &HEIGHT_CM_RANGE)?;
    check_optional("weight_kg", data.weight_kg, &WEIGHT_KG_RANGE)?;
    check_optional("body_fat_pct", data.body_fat_pct, &PERCENT_RANGE)?;
    check_optional("muscle_pct", data.muscle_pct, &PERCENT_RANGE)?;
    check_optional("visceral_fat", data.visceral_fat, &VISCERAL_FAT_RANGE)?;
    check_optional("meals_per_day", data.meals_per_day, &MEALS_PER_DAY_RANGE)?;
    Ok(())
}

pub fn validate_client_update(data: &ClientUpdate) -> Result<(), String> {
    if let Some(ref name) = data.name {
        validate_name(name)?;
    }
    check_optional("age", data.age, &AGE_RANGE)?;
    check_optional("height_cm", data.height_cm, &HEIGHT_CM_RANGE)?;
    check_optional("weight_kg", data.weight_kg, &WEIGHT_KG_RANGE)?;
    check_optional("body_fat_pct", data.body_fat_pct, &PERCENT_RANGE)?;
    check_optional("muscle_pct", data.muscle_pct, &PERCENT_RANGE)?;
    check_optional("visceral_fat", data.visceral_fat, &VISCERAL_FAT_RANGE)?;
    check_optional("meals_per_day", data.meals_per_day, &MEALS_PER_DAY_RANGE)?;
    Ok(())
}

pub fn validate_measurement(data: &MeasurementCreate) -> Result<(), String> {
    validate_date(&data.date)?;
    check_optional("weight_kg", data.weight_kg, &WEIGHT_KG_RANGE)?;
    check_optional("body_fat_pct", data.body_fat_pct, &PERCENT_RANGE)?;
    check_optional("muscle_pct", data.muscle_pct, &PERCENT_RANGE)?;
    check_optional("visceral_fat", data.visceral_fat, &VISCERAL_FAT_RANGE)?;
    check_optional("waist_cm", data.waist_cm, &CIRCUMFERENCE_CM_RANGE)?;
    check_optional("hip_cm", data.hip_cm, &CIRCUMFERENCE_CM_RANGE)?;
    check_optional("chest_cm", data.chest_cm, &CIRCUMFERENCE_CM_RANGE)?;
    check_optional("thigh_cm", data.thigh_cm, &CIRCUMFERENCE_CM_RANGE)?;
    check_optional("arm_cm", data.arm_cm, &ARM_CM_RANGE)?;
    Ok(())
}

pub fn validate_training_plan(data: &TrainingPlanCreate) -> Result<(), String> {
    validate_date(&data.date)?;
    check_optional("days_per_week", data.days_per_week, &DAYS_PER_WEEK_RANGE)?;
    check_optional("session_duration_min", data.session_duration_min, &SESSION_MINUTES_RANGE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(check_range("age", 30, &AGE_RANGE).is_ok());
        assert!(check_range("age", 1, &AGE_RANGE).is_ok());
        assert!(check_range("age", 0, &AGE_RANGE).is_err());

        let err = check_range("height_cm", 250.0, &HEIGHT_CM_RANGE).unwrap_err();
        assert!(err.contains("height_cm must be between 80 and 230"));

        assert!(check_range("weight_kg", f64::NAN, &WEIGHT_KG_RANGE).is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2025-02-28").is_ok());
        assert!(validate_date("2025-02-30").is_err());
        assert!(validate_date("28/02/2025").is_err());
    }

    #[test]
    fn test_client_requires_name() {
        let data = ClientCreate { name: "   ".to_string(), ..Default::default() };
        assert_eq!(validate_client_create(&data).unwrap_err(), "Name is required");
    }

    #[test]
    fn test_client_bounds() {
        let data = ClientCreate {
            name: "Ana".to_string(),
            meals_per_day: Some(9),
            ..Default::default()
        };
        assert!(validate_client_create(&data).is_err());

        let update = ClientUpdate { visceral_fat: Some(31), ..Default::default() };
        assert!(validate_client_update(&update).is_err());

        assert!(validate_client_update(&ClientUpdate::default()).is_ok());
    }

    #[test]
    fn test_measurement_bounds() {
        let mut data = MeasurementCreate {
            client_id: 1,
            date: "2025-01-01".to_string(),
            arm_cm: Some(32.0),
            waist_cm: Some(80.0),
            ..Default::default()
        };
        assert!(validate_measurement(&data).is_ok());

        data.arm_cm = Some(9.5);
        assert!(validate_measurement(&data).is_err());
    }
}
