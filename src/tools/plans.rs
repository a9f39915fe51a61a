//! Plan MCP Tools
//!
//! Meal plan generation from a client's profile, and training plan records.

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{Client, MealPlanCreate, MealPlanRecord, TrainingPlan, TrainingPlanCreate};
use crate::planner::{
    build_meal_plan, ActivityLevel, AnthropometricInput, EnergyTarget, MacroPlan, Objective, Sex,
};

use super::measurements::today;
use super::validation::{
    check_range, validate_training_plan, AGE_RANGE, HEIGHT_CM_RANGE, MEALS_PER_DAY_RANGE,
    WEIGHT_KG_RANGE,
};

pub const DEFAULT_MEALS_PER_DAY: u32 = 3;

/// Parameters for generating a meal plan.
///
/// Anthropometric overrides win over the client's stored profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanRequest {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub objective: Option<String>,
    pub meals_per_day: Option<u32>,
}

/// Inputs actually used for a calculation
#[derive(Debug, Serialize)]
pub struct PlanInputs {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: String,
    pub activity_level: String,
    pub objective: String,
    pub meals_per_day: u32,
}

/// Response for generate_meal_plan and preview_meal_plan
#[derive(Debug, Serialize)]
pub struct MealPlanResponse {
    /// `None` for previews
    pub plan_id: Option<i64>,
    pub client_id: i64,
    pub client_name: String,
    pub date: String,
    pub inputs: PlanInputs,
    pub bmr: i64,
    pub tdee: i64,
    pub plan: MacroPlan,
    /// g/day from the objective's g/kg guideline, for reference only
    pub protein_guideline_g: i64,
    pub notes: Option<String>,
}

/// Stored meal plan with its meal list decoded
#[derive(Debug, Serialize)]
pub struct MealPlanSummary {
    pub id: i64,
    pub date: String,
    pub objective: String,
    pub objective_display: String,
    pub calories: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub carb_g: i64,
    pub meals: Vec<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl TryFrom<MealPlanRecord> for MealPlanSummary {
    type Error = String;

    fn try_from(record: MealPlanRecord) -> Result<Self, Self::Error> {
        let meals = record
            .meals()
            .map_err(|e| format!("Corrupt meal list in plan {}: {}", record.id, e))?;

        Ok(Self {
            id: record.id,
            date: record.date,
            objective: record.objective.as_str().to_string(),
            objective_display: record.objective.display_name().to_string(),
            calories: record.calories,
            protein_g: record.protein_g,
            fat_g: record.fat_g,
            carb_g: record.carb_g,
            meals,
            notes: record.notes,
            created_at: record.created_at,
        })
    }
}

/// Response for list_meal_plans
#[derive(Debug, Serialize)]
pub struct ListMealPlansResponse {
    pub client_id: i64,
    pub plans: Vec<MealPlanSummary>,
    pub total: usize,
}

/// Response for list_training_plans
#[derive(Debug, Serialize)]
pub struct ListTrainingPlansResponse {
    pub client_id: i64,
    pub plans: Vec<TrainingPlan>,
    pub total: usize,
}

struct Calculation {
    input: AnthropometricInput,
    objective: Objective,
    meals_per_day: u32,
    energy: EnergyTarget,
    plan: MacroPlan,
}

/// Fill inputs from request, then profile, then defaults, and run the planner
fn calculate(client: &Client, request: &PlanRequest) -> Result<Calculation, String> {
    let activity_level = request
        .activity_level
        .as_deref()
        .map(ActivityLevel::from_str)
        .unwrap_or_default();
    let objective = request
        .objective
        .as_deref()
        .map(Objective::from_str)
        .unwrap_or_default();

    let profile = client.anthropometrics(activity_level);
    let input = AnthropometricInput {
        weight_kg: request.weight_kg.unwrap_or(profile.weight_kg),
        height_cm: request.height_cm.unwrap_or(profile.height_cm),
        age_years: request.age.unwrap_or(profile.age_years),
        sex: request.sex.as_deref().map(Sex::from_str).unwrap_or(profile.sex),
        activity_level,
    };
    let meals_per_day = request
        .meals_per_day
        .or(client.meals_per_day)
        .unwrap_or(DEFAULT_MEALS_PER_DAY);

    check_range("weight_kg", input.weight_kg, &WEIGHT_KG_RANGE)?;
    check_range("height_cm", input.height_cm, &HEIGHT_CM_RANGE)?;
    check_range("age", input.age_years, &AGE_RANGE)?;
    check_range("meals_per_day", meals_per_day, &MEALS_PER_DAY_RANGE)?;

    let energy = input.estimate_energy();
    let plan = build_meal_plan(energy.tdee, objective, meals_per_day);

    Ok(Calculation {
        input,
        objective,
        meals_per_day,
        energy,
        plan,
    })
}

fn load_client(db: &Database, client_id: i64) -> Result<Client, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Client::get_by_id(&conn, client_id)
        .map_err(|e| format!("Failed to get client: {}", e))?
        .ok_or_else(|| format!("Client not found with id: {}", client_id))
}

fn build_response(
    client: &Client,
    calc: Calculation,
    plan_id: Option<i64>,
    date: String,
    notes: Option<String>,
) -> MealPlanResponse {
    let protein_guideline_g = (calc.input.weight_kg * calc.objective.protein_g_per_kg()).round() as i64;

    MealPlanResponse {
        plan_id,
        client_id: client.id,
        client_name: client.name.clone(),
        date,
        inputs: PlanInputs {
            weight_kg: calc.input.weight_kg,
            height_cm: calc.input.height_cm,
            age: calc.input.age_years,
            sex: calc.input.sex.as_str().to_string(),
            activity_level: calc.input.activity_level.as_str().to_string(),
            objective: calc.objective.as_str().to_string(),
            meals_per_day: calc.meals_per_day,
        },
        bmr: calc.energy.bmr.round() as i64,
        tdee: calc.energy.tdee.round() as i64,
        plan: calc.plan,
        protein_guideline_g,
        notes,
    }
}

/// Compute a meal plan for a client and store it, dated today
pub fn generate_meal_plan(
    db: &Database,
    client_id: i64,
    request: &PlanRequest,
) -> Result<MealPlanResponse, String> {
    let client = load_client(db, client_id)?;
    let calc = calculate(&client, request)?;

    let date = today();
    let notes = format!("Objective: {}. GS preset.", calc.objective.display_name());
    let data = MealPlanCreate::from_plan(client_id, &date, calc.objective, &calc.plan, Some(notes));

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let record =
        MealPlanRecord::create(&conn, &data).map_err(|e| format!("Failed to save meal plan: {}", e))?;

    tracing::info!(
        client_id,
        plan_id = record.id,
        objective = calc.objective.as_str(),
        calories = record.calories,
        "Generated meal plan"
    );

    Ok(build_response(&client, calc, Some(record.id), record.date, record.notes))
}

/// Same calculation as `generate_meal_plan`, nothing is stored
pub fn preview_meal_plan(
    db: &Database,
    client_id: i64,
    request: &PlanRequest,
) -> Result<MealPlanResponse, String> {
    let client = load_client(db, client_id)?;
    let calc = calculate(&client, request)?;

    tracing::debug!(client_id, tdee = calc.energy.tdee, "Previewed meal plan");
    Ok(build_response(&client, calc, None, today(), None))
}

/// List a client's stored meal plans, newest first
pub fn list_meal_plans(db: &Database, client_id: i64) -> Result<ListMealPlansResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let records = MealPlanRecord::list_for_client(&conn, client_id)
        .map_err(|e| format!("Failed to list meal plans: {}", e))?;

    let plans = records
        .into_iter()
        .map(MealPlanSummary::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let total = plans.len();

    Ok(ListMealPlansResponse {
        client_id,
        plans,
        total,
    })
}

/// Record a training plan. An empty date means today.
pub fn add_training_plan(db: &Database, mut data: TrainingPlanCreate) -> Result<TrainingPlan, String> {
    if data.date.trim().is_empty() {
        data.date = today();
    }
    validate_training_plan(&data)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let client = Client::get_by_id(&conn, data.client_id).map_err(|e| format!("Database error: {}", e))?;
    if client.is_none() {
        return Err(format!("Client not found with id: {}", data.client_id));
    }

    let plan =
        TrainingPlan::create(&conn, &data).map_err(|e| format!("Failed to save training plan: {}", e))?;

    tracing::info!(client_id = data.client_id, plan_id = plan.id, "Added training plan");
    Ok(plan)
}

pub fn list_training_plans(db: &Database, client_id: i64) -> Result<ListTrainingPlansResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let plans = TrainingPlan::list_for_client(&conn, client_id)
        .map_err(|e| format!("Failed to list training plans: {}", e))?;
    let total = plans.len();

    Ok(ListTrainingPlansResponse {
        client_id,
        plans,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientCreate, DEFAULT_AGE_YEARS, DEFAULT_HEIGHT_CM, DEFAULT_WEIGHT_KG};
    use crate::tools::clients::create_client;

    fn client_with(data: ClientCreate) -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let client = create_client(&db, data).unwrap();
        (db, client.id)
    }

    fn reference_client() -> ClientCreate {
        ClientCreate {
            name: "Carlos Soto".to_string(),
            sex: Some(Sex::Male),
            age: Some(30),
            height_cm: Some(180.0),
            weight_kg: Some(80.0),
            meals_per_day: Some(4),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_uses_profile_and_persists() {
        let (db, client_id) = client_with(reference_client());
        let request = PlanRequest {
            activity_level: Some("moderate".to_string()),
            objective: Some("recomposition".to_string()),
            ..Default::default()
        };

        let response = generate_meal_plan(&db, client_id, &request).unwrap();
        // BMR 1780, TDEE 2759
        assert_eq!(response.bmr, 1780);
        assert_eq!(response.tdee, 2759);
        assert_eq!(response.plan.calories, 2659);
        assert_eq!(response.plan.meals.len(), 4);
        assert_eq!(response.inputs.sex, "male");
        assert_eq!(response.notes.as_deref(), Some("Objective: Recomposition. GS preset."));
        assert_eq!(response.protein_guideline_g, 160);

        let listed = list_meal_plans(&db, client_id).unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(Some(listed.plans[0].id), response.plan_id);
        assert_eq!(listed.plans[0].meals, response.plan.meals);
        assert_eq!(listed.plans[0].date, today());
    }

    #[test]
    fn test_defaults_fill_empty_profile() {
        let (db, client_id) = client_with(ClientCreate {
            name: "No Data".to_string(),
            ..Default::default()
        });

        let response = preview_meal_plan(&db, client_id, &PlanRequest::default()).unwrap();
        assert_eq!(response.inputs.weight_kg, DEFAULT_WEIGHT_KG);
        assert_eq!(response.inputs.height_cm, DEFAULT_HEIGHT_CM);
        assert_eq!(response.inputs.age, DEFAULT_AGE_YEARS);
        assert_eq!(response.inputs.meals_per_day, DEFAULT_MEALS_PER_DAY);
        assert_eq!(response.inputs.sex, "female");
        assert_eq!(response.inputs.activity_level, "moderate");
        assert_eq!(response.inputs.objective, "recomposition");
        // 10*70 + 6.25*170 - 5*30 - 161 = 1451.5
        assert_eq!(response.bmr, 1452);
    }

    #[test]
    fn test_overrides_win_and_preview_does_not_store() {
        let (db, client_id) = client_with(reference_client());
        let request = PlanRequest {
            weight_kg: Some(90.0),
            sex: Some("F".to_string()),
            objective: Some("fat loss".to_string()),
            ..Default::default()
        };

        let response = preview_meal_plan(&db, client_id, &request).unwrap();
        assert!(response.plan_id.is_none());
        assert_eq!(response.inputs.weight_kg, 90.0);
        assert_eq!(response.inputs.height_cm, 180.0);
        assert_eq!(response.inputs.sex, "female");
        assert_eq!(response.inputs.objective, "fat_loss");
        assert_eq!(list_meal_plans(&db, client_id).unwrap().total, 0);
    }

    #[test]
    fn test_out_of_range_override_rejected() {
        let (db, client_id) = client_with(reference_client());
        let request = PlanRequest { meals_per_day: Some(0), ..Default::default() };
        assert!(generate_meal_plan(&db, client_id, &request).is_err());
        assert_eq!(list_meal_plans(&db, client_id).unwrap().total, 0);
    }

    #[test]
    fn test_missing_client() {
        let db = Database::open_in_memory().unwrap();
        let err = generate_meal_plan(&db, 5, &PlanRequest::default()).unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_training_plans() {
        let (db, client_id) = client_with(reference_client());
        let plan = add_training_plan(
            &db,
            TrainingPlanCreate {
                client_id,
                goal: Some("Hypertrophy".to_string()),
                days_per_week: Some(5),
                session_duration_min: Some(75),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(plan.date, today());

        let bad = TrainingPlanCreate {
            client_id,
            date: "2025-01-01".to_string(),
            days_per_week: Some(8),
            ..Default::default()
        };
        assert!(add_training_plan(&db, bad).is_err());

        let listed = list_training_plans(&db, client_id).unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.plans[0].goal.as_deref(), Some("Hypertrophy"));
    }
}
