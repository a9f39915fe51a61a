//! GS Coach MCP Server Implementation
//!
//! Exposes the client, measurement, plan and report tools over MCP.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::db::Database;
use crate::models::{ClientCreate, ClientUpdate, EconomicLevel, MeasurementCreate, TrainingPlanCreate};
use crate::planner::Sex;
use crate::tools::plans::PlanRequest;
use crate::tools::status::StatusTracker;
use crate::tools::{clients, measurements, plans, reports};

/// GS Coach MCP Service
#[derive(Clone)]
pub struct GsCoachService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    export_dir: PathBuf,
    tool_router: ToolRouter<GsCoachService>,
}

impl GsCoachService {
    pub fn new(config: &AppConfig, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                config.database_path.clone(),
                config.export_dir.clone(),
            ))),
            database,
            export_dir: config.export_dir.clone(),
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(entity: &str, id: i64) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        entity, id
    ))])
}

fn tool_error(e: String) -> McpError {
    McpError::internal_error(e, None)
}

fn default_true() -> bool { true }

// ============================================================================
// Client Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateClientParams {
    /// Full name (required)
    pub name: String,
    /// "male", "female" or "other" (also accepts M/F, hombre/mujer)
    pub sex: Option<String>,
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    /// Skinfold readings, free format
    pub skinfolds: Option<String>,
    pub body_fat_pct: Option<f64>,
    pub muscle_pct: Option<f64>,
    /// Visceral fat rating (0-30)
    pub visceral_fat: Option<u32>,
    pub preferred_foods: Option<String>,
    /// Meals per day (1-8)
    pub meals_per_day: Option<u32>,
    pub allergies: Option<String>,
    /// "low", "medium" or "high"
    pub economic_level: Option<String>,
    pub occupation: Option<String>,
    /// Injuries, goals, anything else
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClientIdParams {
    pub client_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListClientsParams {
    /// Matches name, occupation or notes
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateClientParams {
    pub client_id: i64,
    pub name: Option<String>,
    pub sex: Option<String>,
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub skinfolds: Option<String>,
    pub body_fat_pct: Option<f64>,
    pub muscle_pct: Option<f64>,
    pub visceral_fat: Option<u32>,
    pub preferred_foods: Option<String>,
    pub meals_per_day: Option<u32>,
    pub allergies: Option<String>,
    pub economic_level: Option<String>,
    pub occupation: Option<String>,
    pub notes: Option<String>,
}

// ============================================================================
// Measurement Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddMeasurementParams {
    pub client_id: i64,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    pub weight_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub muscle_pct: Option<f64>,
    pub visceral_fat: Option<u32>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub thigh_cm: Option<f64>,
    pub arm_cm: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

// ============================================================================
// Plan Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealPlanParams {
    pub client_id: i64,
    /// Overrides the client's stored weight
    pub weight_kg: Option<f64>,
    /// Overrides the client's stored height
    pub height_cm: Option<f64>,
    /// Overrides the client's stored age
    pub age: Option<u32>,
    /// Overrides the client's stored sex
    pub sex: Option<String>,
    /// sedentary, light, moderate (default), high or athlete
    pub activity_level: Option<String>,
    /// fat_loss, recomposition (default), maintenance or muscle_gain
    pub objective: Option<String>,
    /// Overrides the client's meals per day
    pub meals_per_day: Option<u32>,
}

impl MealPlanParams {
    fn into_request(self) -> (i64, PlanRequest) {
        let request = PlanRequest {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age: self.age,
            sex: self.sex,
            activity_level: self.activity_level,
            objective: self.objective,
            meals_per_day: self.meals_per_day,
        };
        (self.client_id, request)
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddTrainingPlanParams {
    pub client_id: i64,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    /// e.g. "Recomposition / Hypertrophy"
    pub goal: Option<String>,
    /// e.g. "5 days (3 shoulders, 2 legs)"
    pub split: Option<String>,
    /// 1-7
    pub days_per_week: Option<u32>,
    /// 30-180
    pub session_duration_min: Option<u32>,
    pub cardio_plan: Option<String>,
    /// Full routine, free text
    pub routine_text: Option<String>,
    pub notes: Option<String>,
}

// ============================================================================
// Report Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportClientPdfParams {
    pub client_id: i64,
    /// Include the latest meal plan (default true)
    #[serde(default = "default_true")]
    pub include_meal: bool,
    /// Include the latest training plan (default true)
    #[serde(default = "default_true")]
    pub include_training: bool,
    /// Output file; defaults to <export dir>/client_sheet_<id>.pdf
    pub output_path: Option<String>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl GsCoachService {
    // --- Status ---

    #[tool(description = "Get the current status of the GS Coach service including build info, database status, and process information")]
    async fn gs_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get the coaching workflow guide: formulas, presets, input ranges. Call this before working with a client for the first time.")]
    fn gs_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::GS_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(GS_INSTRUCTIONS)]))
    }

    // --- Clients ---

    #[tool(description = "Register a new client. Only name is required.")]
    fn create_client(&self, Parameters(p): Parameters<CreateClientParams>) -> Result<CallToolResult, McpError> {
        let data = ClientCreate {
            name: p.name,
            sex: p.sex.as_deref().map(Sex::from_str),
            age: p.age,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            skinfolds: p.skinfolds,
            body_fat_pct: p.body_fat_pct,
            muscle_pct: p.muscle_pct,
            visceral_fat: p.visceral_fat,
            preferred_foods: p.preferred_foods,
            meals_per_day: p.meals_per_day,
            allergies: p.allergies,
            economic_level: p.economic_level.as_deref().map(EconomicLevel::from_str),
            occupation: p.occupation,
            notes: p.notes,
        };
        let client = clients::create_client(&self.database, data).map_err(tool_error)?;
        json_result(&client)
    }

    #[tool(description = "Get a client's full profile")]
    fn get_client(&self, Parameters(p): Parameters<ClientIdParams>) -> Result<CallToolResult, McpError> {
        match clients::get_client(&self.database, p.client_id).map_err(tool_error)? {
            Some(client) => json_result(&client),
            None => Ok(not_found("Client", p.client_id)),
        }
    }

    #[tool(description = "List clients, newest first, optionally filtered by a search on name, occupation or notes")]
    fn list_clients(&self, Parameters(p): Parameters<ListClientsParams>) -> Result<CallToolResult, McpError> {
        let result = clients::list_clients(&self.database, p.search.as_deref()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Update a client's profile. Only provided fields are changed.")]
    fn update_client(&self, Parameters(p): Parameters<UpdateClientParams>) -> Result<CallToolResult, McpError> {
        let data = ClientUpdate {
            name: p.name,
            sex: p.sex.as_deref().map(Sex::from_str),
            age: p.age,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            skinfolds: p.skinfolds,
            body_fat_pct: p.body_fat_pct,
            muscle_pct: p.muscle_pct,
            visceral_fat: p.visceral_fat,
            preferred_foods: p.preferred_foods,
            meals_per_day: p.meals_per_day,
            allergies: p.allergies,
            economic_level: p.economic_level.as_deref().map(EconomicLevel::from_str),
            occupation: p.occupation,
            notes: p.notes,
        };
        match clients::update_client(&self.database, p.client_id, data).map_err(tool_error)? {
            Some(client) => json_result(&client),
            None => Ok(not_found("Client", p.client_id)),
        }
    }

    #[tool(description = "Delete a client together with all their measurements and plans")]
    fn delete_client(&self, Parameters(p): Parameters<ClientIdParams>) -> Result<CallToolResult, McpError> {
        let result = clients::delete_client(&self.database, p.client_id).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Measurements ---

    #[tool(description = "Record a body measurement for a client (weight, composition, circumferences)")]
    fn add_measurement(&self, Parameters(p): Parameters<AddMeasurementParams>) -> Result<CallToolResult, McpError> {
        let data = MeasurementCreate {
            client_id: p.client_id,
            date: p.date.unwrap_or_default(),
            weight_kg: p.weight_kg,
            body_fat_pct: p.body_fat_pct,
            muscle_pct: p.muscle_pct,
            visceral_fat: p.visceral_fat,
            waist_cm: p.waist_cm,
            hip_cm: p.hip_cm,
            chest_cm: p.chest_cm,
            thigh_cm: p.thigh_cm,
            arm_cm: p.arm_cm,
            notes: p.notes,
        };
        let measurement = measurements::add_measurement(&self.database, data).map_err(tool_error)?;
        json_result(&measurement)
    }

    #[tool(description = "List a client's measurements, newest first")]
    fn list_measurements(&self, Parameters(p): Parameters<ClientIdParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::list_measurements(&self.database, p.client_id).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a measurement by ID")]
    fn delete_measurement(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::delete_measurement(&self.database, p.id).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Plans ---

    #[tool(description = "Calculate BMR/TDEE (Mifflin-St Jeor) and build a GS preset meal plan for a client, then save it dated today. Missing inputs come from the client profile.")]
    fn generate_meal_plan(&self, Parameters(p): Parameters<MealPlanParams>) -> Result<CallToolResult, McpError> {
        let (client_id, request) = p.into_request();
        let result = plans::generate_meal_plan(&self.database, client_id, &request).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Same calculation as generate_meal_plan without saving. Use to compare activity levels or objectives.")]
    fn preview_meal_plan(&self, Parameters(p): Parameters<MealPlanParams>) -> Result<CallToolResult, McpError> {
        let (client_id, request) = p.into_request();
        let result = plans::preview_meal_plan(&self.database, client_id, &request).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "List a client's saved meal plans, newest first")]
    fn list_meal_plans(&self, Parameters(p): Parameters<ClientIdParams>) -> Result<CallToolResult, McpError> {
        let result = plans::list_meal_plans(&self.database, p.client_id).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Save a training plan (goal, split, frequency, session length, cardio, routine) for a client")]
    fn add_training_plan(&self, Parameters(p): Parameters<AddTrainingPlanParams>) -> Result<CallToolResult, McpError> {
        let data = TrainingPlanCreate {
            client_id: p.client_id,
            date: p.date.unwrap_or_default(),
            goal: p.goal,
            split: p.split,
            days_per_week: p.days_per_week,
            session_duration_min: p.session_duration_min,
            cardio_plan: p.cardio_plan,
            routine_text: p.routine_text,
            notes: p.notes,
        };
        let plan = plans::add_training_plan(&self.database, data).map_err(tool_error)?;
        json_result(&plan)
    }

    #[tool(description = "List a client's training plans, newest first")]
    fn list_training_plans(&self, Parameters(p): Parameters<ClientIdParams>) -> Result<CallToolResult, McpError> {
        let result = plans::list_training_plans(&self.database, p.client_id).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Reports ---

    #[tool(description = "Export a one-page PDF client sheet: profile grid, latest meal and training plans, and a weight/body fat chart when there are at least two measurements")]
    fn export_client_pdf(&self, Parameters(p): Parameters<ExportClientPdfParams>) -> Result<CallToolResult, McpError> {
        let result = reports::export_client_pdf(
            &self.database,
            p.client_id,
            p.include_meal,
            p.include_training,
            p.output_path.as_deref(),
            &self.export_dir,
        )
        .map_err(tool_error)?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for GsCoachService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "gs-coach".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("GS Coach".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "GS Coach - client profiles, measurements, meal and training plans for a nutrition/fitness coach. \
                 IMPORTANT: Call gs_instructions first for formulas, presets and input ranges. \
                 Clients: create/get/list/update/delete_client. \
                 Measurements: add/list/delete_measurement. \
                 Meal plans: generate_meal_plan (saves), preview_meal_plan (no save), list_meal_plans. \
                 Training: add/list_training_plan(s). \
                 Reports: export_client_pdf. \
                 Status: gs_status."
                    .into(),
            ),
        }
    }
}
