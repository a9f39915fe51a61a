//! Client MCP Tools
//!
//! Intake profiles: create, look up, search, edit and remove clients.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Client, ClientCreate, ClientUpdate};

use super::validation::{validate_client_create, validate_client_update};

/// Client summary for listing
#[derive(Debug, Serialize)]
pub struct ClientSummary {
    pub id: i64,
    pub name: String,
    pub sex: Option<String>,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub occupation: Option<String>,
    pub created_at: String,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
            sex: client.sex.map(|s| s.display_name().to_string()),
            age: client.age,
            weight_kg: client.weight_kg,
            occupation: client.occupation.clone(),
            created_at: client.created_at.clone(),
        }
    }
}

/// Response for list_clients
#[derive(Debug, Serialize)]
pub struct ListClientsResponse {
    pub clients: Vec<ClientSummary>,
    pub total: usize,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Create a new client
pub fn create_client(db: &Database, data: ClientCreate) -> Result<Client, String> {
    validate_client_create(&data)?;

    let data = ClientCreate {
        name: data.name.trim().to_string(),
        ..data
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let client = Client::create(&conn, &data).map_err(|e| format!("Failed to create client: {}", e))?;

    tracing::info!(client_id = client.id, "Created client");
    Ok(client)
}

/// Get a client by ID
pub fn get_client(db: &Database, id: i64) -> Result<Option<Client>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Client::get_by_id(&conn, id).map_err(|e| format!("Failed to get client: {}", e))
}

/// List clients, optionally filtered by name, occupation or notes
pub fn list_clients(db: &Database, search: Option<&str>) -> Result<ListClientsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let clients = Client::list(&conn, search).map_err(|e| format!("Failed to list clients: {}", e))?;

    let summaries: Vec<ClientSummary> = clients.iter().map(ClientSummary::from).collect();
    let total = summaries.len();

    Ok(ListClientsResponse {
        clients: summaries,
        total,
    })
}

/// Update a client. Returns `None` if the client doesn't exist.
pub fn update_client(db: &Database, id: i64, data: ClientUpdate) -> Result<Option<Client>, String> {
    validate_client_update(&data)?;

    let data = ClientUpdate {
        name: data.name.map(|n| n.trim().to_string()),
        ..data
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let updated = Client::update(&conn, id, &data).map_err(|e| format!("Failed to update client: {}", e))?;

    if updated.is_some() {
        tracing::info!(client_id = id, "Updated client");
    }
    Ok(updated)
}

/// Delete a client together with its measurements and plans
pub fn delete_client(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Client::delete(&conn, id).map_err(|e| format!("Failed to delete client: {}", e))?;
    if !deleted {
        return Err(format!("Client not found with id: {}", id));
    }

    tracing::info!(client_id = id, "Deleted client");
    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}
