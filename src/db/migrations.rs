//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        tracing::info!("Applying schema migration v1");
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: clients, measurements, meal plans, training plans
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- CLIENTS
        -- Profile captured at intake, editable later
        -- ============================================
        CREATE TABLE clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            sex TEXT CHECK(sex IN ('male', 'female', 'other')),
            age INTEGER,
            height_cm REAL,
            weight_kg REAL,
            skinfolds TEXT,                      -- free-form caliper notes
            body_fat_pct REAL,
            muscle_pct REAL,
            visceral_fat INTEGER,
            preferred_foods TEXT,                -- comma-separated
            meals_per_day INTEGER,
            allergies TEXT,
            economic_level TEXT CHECK(economic_level IN ('low', 'medium', 'high')),
            occupation TEXT,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_clients_name ON clients(name);
        CREATE INDEX idx_clients_created ON clients(created_at);

        -- ============================================
        -- MEASUREMENTS
        -- Body composition check-ins
        -- ============================================
        CREATE TABLE measurements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            weight_kg REAL,
            body_fat_pct REAL,
            muscle_pct REAL,
            visceral_fat INTEGER,
            waist_cm REAL,
            hip_cm REAL,
            chest_cm REAL,
            thigh_cm REAL,
            arm_cm REAL,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_measurements_client_date ON measurements(client_id, date);

        -- ============================================
        -- MEAL PLANS
        -- Generated calorie/macro targets
        -- ============================================
        CREATE TABLE meal_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            objective TEXT NOT NULL,
            calories INTEGER NOT NULL,
            protein_g INTEGER NOT NULL,
            fat_g INTEGER NOT NULL,
            carb_g INTEGER NOT NULL,
            meals_json TEXT NOT NULL DEFAULT '[]',  -- JSON array of meal descriptions
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meal_plans_client_date ON meal_plans(client_id, date);

        -- ============================================
        -- TRAINING PLANS
        -- ============================================
        CREATE TABLE training_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            goal TEXT,
            split TEXT,
            days_per_week INTEGER,
            session_duration_min INTEGER,
            cardio_plan TEXT,
            routine_text TEXT,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_training_plans_client_date ON training_plans(client_id, date);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration. A fresh file always does.
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let tracked: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
        [],
        |row| row.get(0),
    )?;
    if !tracked {
        return Ok(true);
    }

    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_fresh_schema_has_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["clients", "measurements", "meal_plans", "training_plans"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }
}
