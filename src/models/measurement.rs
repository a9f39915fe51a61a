//! Measurement model
//!
//! Body composition and circumference check-ins for a client.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A dated measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub client_id: i64,
    pub date: String,  // ISO date: "2025-01-09"
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
    pub created_at: String,
}

/// Data for creating a measurement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurementCreate {
    pub client_id: i64,
    pub date: String,
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

impl Measurement {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            client_id: row.get("client_id")?,
            date: row.get("date")?,
            weight_kg: row.get("weight_kg")?,
            body_fat_pct: row.get("body_fat_pct")?,
            muscle_pct: row.get("muscle_pct")?,
            visceral_fat: row.get("visceral_fat")?,
            waist_cm: row.get("waist_cm")?,
            hip_cm: row.get("hip_cm")?,
            chest_cm: row.get("chest_cm")?,
            thigh_cm: row.get("thigh_cm")?,
            arm_cm: row.get("arm_cm")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &MeasurementCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO measurements (
                client_id, date, weight_kg, body_fat_pct, muscle_pct, visceral_fat,
                waist_cm, hip_cm, chest_cm, thigh_cm, arm_cm, notes
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                data.client_id,
                data.date,
                data.weight_kg,
                data.body_fat_pct,
                data.muscle_pct,
                data.visceral_fat,
                data.waist_cm,
                data.hip_cm,
                data.chest_cm,
                data.thigh_cm,
                data.arm_cm,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "Measurement", id })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM measurements WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a client's measurements, most recent date first
    pub fn list_for_client(conn: &Connection, client_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM measurements WHERE client_id = ?1 ORDER BY date DESC, id DESC",
        )?;
        let measurements = stmt
            .query_map([client_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(measurements)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM measurements WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Client, ClientCreate};

    fn test_conn() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        let client = Client::create(
            &conn,
            &ClientCreate { name: "Test Client".to_string(), ..Default::default() },
        )
        .unwrap();
        (conn, client.id)
    }

    #[test]
    fn test_list_is_newest_first() {
        let (conn, client_id) = test_conn();
        for (date, weight) in [("2025-01-05", 80.0), ("2025-02-05", 78.4), ("2025-01-20", 79.1)] {
            Measurement::create(
                &conn,
                &MeasurementCreate {
                    client_id,
                    date: date.to_string(),
                    weight_kg: Some(weight),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let list = Measurement::list_for_client(&conn, client_id).unwrap();
        let dates: Vec<&str> = list.iter().map(|m| m.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-02-05", "2025-01-20", "2025-01-05"]);
        assert_eq!(list[0].weight_kg, Some(78.4));
    }

    #[test]
    fn test_unknown_client_is_rejected() {
        let (conn, _) = test_conn();
        let result = Measurement::create(
            &conn,
            &MeasurementCreate { client_id: 999, date: "2025-01-01".to_string(), ..Default::default() },
        );
        assert!(matches!(result, Err(DbError::Sqlite(_))));
    }

    #[test]
    fn test_deleting_client_cascades() {
        let (conn, client_id) = test_conn();
        let m = Measurement::create(
            &conn,
            &MeasurementCreate { client_id, date: "2025-01-01".to_string(), ..Default::default() },
        )
        .unwrap();

        Client::delete(&conn, client_id).unwrap();
        assert!(Measurement::get_by_id(&conn, m.id).unwrap().is_none());
    }
}
