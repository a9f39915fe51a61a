//! Energy estimation
//!
//! Basal metabolic rate via Mifflin-St Jeor and total daily energy
//! expenditure via a fixed activity multiplier table.

use serde::{Deserialize, Serialize};

/// Biological sex category. Only selects the BMR offset term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    #[default]
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }

    /// Parse a sex label. Accepts the practice's short form labels ("M", "F", "Otro").
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "man" | "h" | "hombre" | "masculino" => Sex::Male,
            "f" | "female" | "woman" | "mujer" | "femenino" => Sex::Female,
            _ => Sex::Other,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Other => "Other",
        }
    }

    /// Constant term of the Mifflin-St Jeor equation
    pub fn bmr_offset(&self) -> f64 {
        match self {
            Sex::Male => MALE_BMR_OFFSET,
            Sex::Female | Sex::Other => FEMALE_BMR_OFFSET,
        }
    }
}

/// Activity level used to scale BMR into TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    High,
    Athlete,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
            ActivityLevel::Athlete => "athlete",
        }
    }

    /// Parse an activity label. Unrecognized labels fall back to `Moderate`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sedentary" | "sedentario" => ActivityLevel::Sedentary,
            "light" | "lightly_active" | "ligero" => ActivityLevel::Light,
            "moderate" | "moderately_active" | "moderado" => ActivityLevel::Moderate,
            "high" | "very_active" | "alto" => ActivityLevel::High,
            "athlete" | "extra_active" | "atleta" => ActivityLevel::Athlete,
            _ => ActivityLevel::Moderate,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
            ActivityLevel::Athlete => 1.9,
        }
    }
}

// ============================================================================
// Mifflin-St Jeor Coefficients
// ============================================================================

/// kcal per kilogram of body weight
pub const WEIGHT_COEF: f64 = 10.0;
/// kcal per centimeter of height
pub const HEIGHT_COEF: f64 = 6.25;
/// kcal per year of age (subtracted)
pub const AGE_COEF: f64 = 5.0;
/// Constant term for men
pub const MALE_BMR_OFFSET: f64 = 5.0;
/// Constant term for women and unspecified sex
pub const FEMALE_BMR_OFFSET: f64 = -161.0;

/// Basal metabolic rate and total daily energy expenditure, kcal/day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyTarget {
    pub bmr: f64,
    pub tdee: f64,
}

/// Body measurements and lifestyle inputs for the energy estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnthropometricInput {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
}

impl AnthropometricInput {
    pub fn estimate_energy(&self) -> EnergyTarget {
        estimate_energy(
            self.weight_kg,
            self.height_cm,
            self.age_years,
            self.sex,
            self.activity_level,
        )
    }
}

/// Estimate BMR (Mifflin-St Jeor) and TDEE.
///
/// - Men: `10*w + 6.25*h - 5*age + 5`
/// - Women and other: `10*w + 6.25*h - 5*age - 161`
///
/// Inputs are not validated; implausible values propagate through the
/// arithmetic.
pub fn estimate_energy(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: Sex,
    activity_level: ActivityLevel,
) -> EnergyTarget {
    let bmr = WEIGHT_COEF * weight_kg + HEIGHT_COEF * height_cm - AGE_COEF * f64::from(age_years)
        + sex.bmr_offset();
    let tdee = bmr * activity_level.multiplier();

    EnergyTarget { bmr, tdee }
}
