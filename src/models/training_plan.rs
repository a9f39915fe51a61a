//! Training plan model

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A training plan written for a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub id: i64,
    pub client_id: i64,
    pub date: String,
    pub goal: Option<String>,
    pub split: Option<String>,  // e.g. "5 days (3 shoulders, 2 legs)"
    pub days_per_week: Option<u32>,
    pub session_duration_min: Option<u32>,
    pub cardio_plan: Option<String>,
    pub routine_text: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Data for creating a training plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingPlanCreate {
    pub client_id: i64,
    pub date: String,
    pub goal: Option<String>,
    pub split: Option<String>,
    pub days_per_week: Option<u32>,
    pub session_duration_min: Option<u32>,
    pub cardio_plan: Option<String>,
    pub routine_text: Option<String>,
    pub notes: Option<String>,
}

impl TrainingPlan {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            client_id: row.get("client_id")?,
            date: row.get("date")?,
            goal: row.get("goal")?,
            split: row.get("split")?,
            days_per_week: row.get("days_per_week")?,
            session_duration_min: row.get("session_duration_min")?,
            cardio_plan: row.get("cardio_plan")?,
            routine_text: row.get("routine_text")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &TrainingPlanCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO training_plans (
                client_id, date, goal, split, days_per_week, session_duration_min,
                cardio_plan, routine_text, notes
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.client_id,
                data.date,
                data.goal,
                data.split,
                data.days_per_week,
                data.session_duration_min,
                data.cardio_plan,
                data.routine_text,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "Training plan", id })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM training_plans WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_for_client(conn: &Connection, client_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM training_plans WHERE client_id = ?1 ORDER BY date DESC, id DESC",
        )?;
        let plans = stmt
            .query_map([client_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    pub fn latest_for_client(conn: &Connection, client_id: i64) -> DbResult<Option<Self>> {
        Ok(Self::list_for_client(conn, client_id)?.into_iter().next())
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM training_plans WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Client, ClientCreate};

    #[test]
    fn test_create_list_latest_delete() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        let client = Client::create(
            &conn,
            &ClientCreate { name: "Test Client".to_string(), ..Default::default() },
        )
        .unwrap();

        let older = TrainingPlan::create(
            &conn,
            &TrainingPlanCreate {
                client_id: client.id,
                date: "2025-01-10".to_string(),
                goal: Some("Hypertrophy".to_string()),
                days_per_week: Some(4),
                ..Default::default()
            },
        )
        .unwrap();
        let newer = TrainingPlan::create(
            &conn,
            &TrainingPlanCreate {
                client_id: client.id,
                date: "2025-02-10".to_string(),
                goal: Some("Recomposition / Hypertrophy".to_string()),
                split: Some("5 days (3 shoulders, 2 legs)".to_string()),
                days_per_week: Some(5),
                session_duration_min: Some(90),
                ..Default::default()
            },
        )
        .unwrap();

        let latest = TrainingPlan::latest_for_client(&conn, client.id).unwrap().unwrap();
        assert_eq!(latest.id, newer.id);
        assert_eq!(latest.session_duration_min, Some(90));

        assert!(TrainingPlan::delete(&conn, newer.id).unwrap());
        let latest = TrainingPlan::latest_for_client(&conn, client.id).unwrap().unwrap();
        assert_eq!(latest.id, older.id);
    }
}
