//! Measurement MCP Tools
//!
//! Dated body composition and circumference check-ins.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Client, Measurement, MeasurementCreate};

use super::clients::DeleteResponse;
use super::validation::validate_measurement;

/// Response for list_measurements
#[derive(Debug, Serialize)]
pub struct ListMeasurementsResponse {
    pub client_id: i64,
    pub measurements: Vec<Measurement>,
    pub total: usize,
}

/// Today's date in the format measurements and plans are stored with
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Record a measurement. An empty date means today.
pub fn add_measurement(db: &Database, mut data: MeasurementCreate) -> Result<Measurement, String> {
    if data.date.trim().is_empty() {
        data.date = today();
    }
    validate_measurement(&data)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let client = Client::get_by_id(&conn, data.client_id).map_err(|e| format!("Database error: {}", e))?;
    if client.is_none() {
        return Err(format!("Client not found with id: {}", data.client_id));
    }

    let measurement =
        Measurement::create(&conn, &data).map_err(|e| format!("Failed to add measurement: {}", e))?;

    tracing::info!(
        client_id = data.client_id,
        measurement_id = measurement.id,
        date = %measurement.date,
        "Added measurement"
    );
    Ok(measurement)
}

/// List a client's measurements, newest first
pub fn list_measurements(db: &Database, client_id: i64) -> Result<ListMeasurementsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let measurements = Measurement::list_for_client(&conn, client_id)
        .map_err(|e| format!("Failed to list measurements: {}", e))?;
    let total = measurements.len();

    Ok(ListMeasurementsResponse {
        client_id,
        measurements,
        total,
    })
}

pub fn delete_measurement(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted =
        Measurement::delete(&conn, id).map_err(|e| format!("Failed to delete measurement: {}", e))?;
    if !deleted {
        return Err(format!("Measurement not found with id: {}", id));
    }

    tracing::info!(measurement_id = id, "Deleted measurement");
    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientCreate;
    use crate::tools::clients::create_client;

    fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let client = create_client(
            &db,
            ClientCreate { name: "Luis Vega".to_string(), ..Default::default() },
        )
        .unwrap();
        (db, client.id)
    }

    #[test]
    fn test_date_defaults_to_today() {
        let (db, client_id) = setup();
        let m = add_measurement(
            &db,
            MeasurementCreate { client_id, weight_kg: Some(82.4), ..Default::default() },
        )
        .unwrap();
        assert_eq!(m.date, today());
        assert_eq!(m.weight_kg, Some(82.4));
    }

    #[test]
    fn test_unknown_client_rejected() {
        let (db, _) = setup();
        let err = add_measurement(
            &db,
            MeasurementCreate { client_id: 77, date: "2025-01-01".to_string(), ..Default::default() },
        )
        .unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_invalid_values_not_written() {
        let (db, client_id) = setup();
        let result = add_measurement(
            &db,
            MeasurementCreate {
                client_id,
                date: "2025-01-01".to_string(),
                waist_cm: Some(250.0),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(list_measurements(&db, client_id).unwrap().total, 0);
    }

    #[test]
    fn test_list_and_delete() {
        let (db, client_id) = setup();
        for date in ["2025-01-05", "2025-02-05"] {
            add_measurement(
                &db,
                MeasurementCreate { client_id, date: date.to_string(), ..Default::default() },
            )
            .unwrap();
        }

        let listed = list_measurements(&db, client_id).unwrap();
        assert_eq!(listed.total, 2);
        assert_eq!(listed.measurements[0].date, "2025-02-05");

        let id = listed.measurements[0].id;
        assert!(delete_measurement(&db, id).unwrap().success);
        assert!(delete_measurement(&db, id).is_err());
    }
}
