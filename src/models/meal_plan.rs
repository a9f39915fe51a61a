//! Meal plan record
//!
//! A generated `MacroPlan` persisted against a client and a date.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::planner::{MacroPlan, Objective};

/// A stored meal plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanRecord {
    pub id: i64,
    pub client_id: i64,
    pub date: String,
    pub objective: Objective,
    pub calories: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub carb_g: i64,
    pub meals_json: String,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Data for storing a meal plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanCreate {
    pub client_id: i64,
    pub date: String,
    pub objective: Objective,
    pub calories: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub carb_g: i64,
    pub meals: Vec<String>,
    pub notes: Option<String>,
}

impl MealPlanCreate {
    pub fn from_plan(
        client_id: i64,
        date: &str,
        objective: Objective,
        plan: &MacroPlan,
        notes: Option<String>,
    ) -> Self {
        Self {
            client_id,
            date: date.to_string(),
            objective,
            calories: plan.calories,
            protein_g: plan.protein_g,
            fat_g: plan.fat_g,
            carb_g: plan.carb_g,
            meals: plan.meals.clone(),
            notes,
        }
    }
}

impl MealPlanRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let objective: String = row.get("objective")?;

        Ok(Self {
            id: row.get("id")?,
            client_id: row.get("client_id")?,
            date: row.get("date")?,
            objective: Objective::from_str(&objective),
            calories: row.get("calories")?,
            protein_g: row.get("protein_g")?,
            fat_g: row.get("fat_g")?,
            carb_g: row.get("carb_g")?,
            meals_json: row.get("meals_json")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &MealPlanCreate) -> DbResult<Self> {
        let meals_json = serde_json::to_string(&data.meals)?;

        conn.execute(
            r#"
            INSERT INTO meal_plans (
                client_id, date, objective, calories, protein_g, fat_g, carb_g, meals_json, notes
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.client_id,
                data.date,
                data.objective.as_str(),
                data.calories,
                data.protein_g,
                data.fat_g,
                data.carb_g,
                meals_json,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "Meal plan", id })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_plans WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a client's meal plans, most recent first
    pub fn list_for_client(conn: &Connection, client_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_plans WHERE client_id = ?1 ORDER BY date DESC, id DESC",
        )?;
        let plans = stmt
            .query_map([client_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    pub fn latest_for_client(conn: &Connection, client_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_plans WHERE client_id = ?1 ORDER BY date DESC, id DESC LIMIT 1",
        )?;

        let result = stmt.query_row([client_id], Self::from_row);
        match result {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Decode the stored meal list
    pub fn meals(&self) -> DbResult<Vec<String>> {
        Ok(serde_json::from_str(&self.meals_json)?)
    }
}
