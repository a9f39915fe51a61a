//! Client model
//!
//! A coaching client's intake profile: anthropometrics, body composition
//! snapshot, dietary preferences and free-form notes.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::planner::{ActivityLevel, AnthropometricInput, Sex};

pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
pub const DEFAULT_HEIGHT_CM: f64 = 170.0;
pub const DEFAULT_AGE_YEARS: u32 = 30;

/// Client's economic level, used when suggesting foods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EconomicLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EconomicLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EconomicLevel::Low => "low",
            EconomicLevel::Medium => "medium",
            EconomicLevel::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" | "bajo" => EconomicLevel::Low,
            "high" | "alto" => EconomicLevel::High,
            _ => EconomicLevel::Medium,
        }
    }
}

/// A client profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub sex: Option<Sex>,
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
    pub economic_level: Option<EconomicLevel>,
    pub occupation: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientCreate {
    pub name: String,
    pub sex: Option<Sex>,
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
    pub economic_level: Option<EconomicLevel>,
    pub occupation: Option<String>,
    pub notes: Option<String>,
}

/// Data for updating a client. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub sex: Option<Sex>,
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
    pub economic_level: Option<EconomicLevel>,
    pub occupation: Option<String>,
    pub notes: Option<String>,
}

impl Client {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex: Option<String> = row.get("sex")?;
        let economic_level: Option<String> = row.get("economic_level")?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            sex: sex.as_deref().map(Sex::from_str),
            age: row.get("age")?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            skinfolds: row.get("skinfolds")?,
            body_fat_pct: row.get("body_fat_pct")?,
            muscle_pct: row.get("muscle_pct")?,
            visceral_fat: row.get("visceral_fat")?,
            preferred_foods: row.get("preferred_foods")?,
            meals_per_day: row.get("meals_per_day")?,
            allergies: row.get("allergies")?,
            economic_level: economic_level.as_deref().map(EconomicLevel::from_str),
            occupation: row.get("occupation")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new client
    pub fn create(conn: &Connection, data: &ClientCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO clients (
                name, sex, age, height_cm, weight_kg, skinfolds, body_fat_pct,
                muscle_pct, visceral_fat, preferred_foods, meals_per_day, allergies,
                economic_level, occupation, notes
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                data.name,
                data.sex.map(|s| s.as_str()),
                data.age,
                data.height_cm,
                data.weight_kg,
                data.skinfolds,
                data.body_fat_pct,
                data.muscle_pct,
                data.visceral_fat,
                data.preferred_foods,
                data.meals_per_day,
                data.allergies,
                data.economic_level.map(|e| e.as_str()),
                data.occupation,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "Client", id })
    }

    /// Get a client by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM clients WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(client) => Ok(Some(client)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List clients, newest first. `search` matches name, occupation or notes.
    pub fn list(conn: &Connection, search: Option<&str>) -> DbResult<Vec<Self>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let clients = match search {
            Some(query) => {
                let pattern = format!("%{}%", query);
                let mut stmt = conn.prepare(
                    r#"
                    SELECT * FROM clients
                    WHERE name LIKE ?1 OR occupation LIKE ?1 OR notes LIKE ?1
                    ORDER BY created_at DESC, id DESC
                    "#,
                )?;
                let rows = stmt
                    .query_map([&pattern], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT * FROM clients ORDER BY created_at DESC, id DESC")?;
                let rows = stmt
                    .query_map([], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(clients)
    }

    /// Update a client
    pub fn update(conn: &Connection, id: i64, data: &ClientUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        let mut push = |column: &str, value: Box<dyn rusqlite::ToSql>| {
            params_vec.push(value);
            updates.push(format!("{} = ?{}", column, params_vec.len()));
        };

        if let Some(ref name) = data.name {
            push("name", Box::new(name.clone()));
        }
        if let Some(sex) = data.sex {
            push("sex", Box::new(sex.as_str()));
        }
        if let Some(age) = data.age {
            push("age", Box::new(age));
        }
        if let Some(height) = data.height_cm {
            push("height_cm", Box::new(height));
        }
        if let Some(weight) = data.weight_kg {
            push("weight_kg", Box::new(weight));
        }
        if let Some(ref skinfolds) = data.skinfolds {
            push("skinfolds", Box::new(skinfolds.clone()));
        }
        if let Some(body_fat) = data.body_fat_pct {
            push("body_fat_pct", Box::new(body_fat));
        }
        if let Some(muscle) = data.muscle_pct {
            push("muscle_pct", Box::new(muscle));
        }
        if let Some(visceral) = data.visceral_fat {
            push("visceral_fat", Box::new(visceral));
        }
        if let Some(ref foods) = data.preferred_foods {
            push("preferred_foods", Box::new(foods.clone()));
        }
        if let Some(meals) = data.meals_per_day {
            push("meals_per_day", Box::new(meals));
        }
        if let Some(ref allergies) = data.allergies {
            push("allergies", Box::new(allergies.clone()));
        }
        if let Some(level) = data.economic_level {
            push("economic_level", Box::new(level.as_str()));
        }
        if let Some(ref occupation) = data.occupation {
            push("occupation", Box::new(occupation.clone()));
        }
        if let Some(ref notes) = data.notes {
            push("notes", Box::new(notes.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE clients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Energy estimate inputs from the profile, defaults filling the gaps
    pub fn anthropometrics(&self, activity_level: ActivityLevel) -> AnthropometricInput {
        AnthropometricInput {
            weight_kg: self.weight_kg.unwrap_or(DEFAULT_WEIGHT_KG),
            height_cm: self.height_cm.unwrap_or(DEFAULT_HEIGHT_CM),
            age_years: self.age.unwrap_or(DEFAULT_AGE_YEARS),
            sex: self.sex.unwrap_or_default(),
            activity_level,
        }
    }

    /// Delete a client along with its measurements and plans
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM clients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn sample(name: &str) -> ClientCreate {
        ClientCreate {
            name: name.to_string(),
            sex: Some(Sex::Male),
            age: Some(30),
            height_cm: Some(170.0),
            weight_kg: Some(70.0),
            meals_per_day: Some(4),
            economic_level: Some(EconomicLevel::High),
            occupation: Some("Engineer".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = test_conn();
        let client = Client::create(&conn, &sample("Ana Ruiz")).unwrap();

        let fetched = Client::get_by_id(&conn, client.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Ana Ruiz");
        assert_eq!(fetched.sex, Some(Sex::Male));
        assert_eq!(fetched.meals_per_day, Some(4));
        assert_eq!(fetched.economic_level, Some(EconomicLevel::High));
        assert_eq!(fetched.body_fat_pct, None);
    }

    #[test]
    fn test_missing_client_is_none() {
        let conn = test_conn();
        assert!(Client::get_by_id(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn test_list_search_and_order() {
        let conn = test_conn();
        let first = Client::create(&conn, &sample("Ana Ruiz")).unwrap();
        let mut nurse = sample("Luis Vega");
        nurse.occupation = Some("Nurse".to_string());
        let second = Client::create(&conn, &nurse).unwrap();

        let all = Client::list(&conn, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        let nurses = Client::list(&conn, Some("nurs")).unwrap();
        assert_eq!(nurses.len(), 1);
        assert_eq!(nurses[0].name, "Luis Vega");

        // Blank search lists everyone
        assert_eq!(Client::list(&conn, Some("   ")).unwrap().len(), 2);
    }

    #[test]
    fn test_partial_update() {
        let conn = test_conn();
        let client = Client::create(&conn, &sample("Ana Ruiz")).unwrap();

        let update = ClientUpdate {
            weight_kg: Some(68.5),
            notes: Some("Knee injury 2023".to_string()),
            ..Default::default()
        };
        let updated = Client::update(&conn, client.id, &update).unwrap().unwrap();
        assert_eq!(updated.weight_kg, Some(68.5));
        assert_eq!(updated.notes.as_deref(), Some("Knee injury 2023"));
        assert_eq!(updated.height_cm, Some(170.0));
        assert_eq!(updated.name, "Ana Ruiz");
    }

    #[test]
    fn test_delete() {
        let conn = test_conn();
        let client = Client::create(&conn, &sample("Ana Ruiz")).unwrap();
        assert!(Client::delete(&conn, client.id).unwrap());
        assert!(!Client::delete(&conn, client.id).unwrap());
        assert!(Client::get_by_id(&conn, client.id).unwrap().is_none());
    }

    #[test]
    fn test_anthropometrics_defaults() {
        let conn = test_conn();
        let client = Client::create(
            &conn,
            &ClientCreate { name: "Bare".to_string(), weight_kg: Some(90.0), ..Default::default() },
        )
        .unwrap();

        let input = client.anthropometrics(ActivityLevel::High);
        assert_eq!(input.weight_kg, 90.0);
        assert_eq!(input.height_cm, DEFAULT_HEIGHT_CM);
        assert_eq!(input.age_years, DEFAULT_AGE_YEARS);
        assert_eq!(input.sex, Sex::Female);
        assert_eq!(input.activity_level, ActivityLevel::High);
    }

    #[test]
    fn test_economic_level_labels() {
        assert_eq!(EconomicLevel::from_str("Bajo"), EconomicLevel::Low);
        assert_eq!(EconomicLevel::from_str("alto"), EconomicLevel::High);
        assert_eq!(EconomicLevel::from_str("whatever"), EconomicLevel::Medium);
    }
}
