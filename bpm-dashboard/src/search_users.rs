use crate::error::ServiceError;
use crate::state::{AppState, DATA_USERS_FILE};
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    pub name: Option<String>,
}

impl SearchParams {
    /// Pick the `name` filter out of the raw query pairs. A repeated `name`
    /// is a list rather than a single string and means no filter.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut names = pairs
            .into_iter()
            .filter(|(k, _)| k == "name")
            .map(|(_, v)| v);
        let name = match (names.next(), names.next()) {
            (Some(n), None) => Some(n),
            _ => None,
        };
        SearchParams { name }
    }
}

/// Normalize a raw `name` parameter into the lowercase key it is compared
/// with. Blank input means "no filter".
pub fn normalize_query(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

/// Keep the records whose `name`, lowercased, equals `query` exactly.
///
/// Records are matched on the raw JSON so everything else passes through
/// untouched; order is preserved. Without a query the document is returned
/// unchanged.
pub fn filter_users(users: Value, query: Option<&str>) -> Result<Value, ServiceError> {
    let Some(query) = normalize_query(query) else {
        return Ok(users);
    };

    let records = match users {
        Value::Array(records) => records,
        other => {
            return Err(ServiceError::InvalidJson(format!(
                "expected an array of users, found {}",
                json_kind(&other)
            )))
        }
    };

    let matched: Vec<Value> = records
        .into_iter()
        .filter(|user| {
            user.get("name")
                .and_then(Value::as_str)
                .map(|n| n.to_lowercase() == query)
                .unwrap_or(false)
        })
        .collect();
    Ok(Value::Array(matched))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub async fn search_users_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ServiceError> {
    let params = SearchParams::from_pairs(pairs);
    let path = state.data_file(DATA_USERS_FILE);
    let raw = tokio::fs::read(&path).await.map_err(|e| {
        error!("Error reading {}: {}", path.display(), e);
        ServiceError::DataFileNotFound(e)
    })?;

    let users: Value = serde_json::from_slice(&raw).map_err(|e| {
        error!("Error parsing {}: {}", path.display(), e);
        ServiceError::InvalidJson(e.to_string())
    })?;

    let name = params.name.as_deref();
    let result = filter_users(users, name).map_err(|e| {
        if let ServiceError::InvalidJson(detail) = &e {
            error!("Cannot filter {}: {}", path.display(), detail);
        }
        e
    })?;

    match name {
        Some(n) if !n.trim().is_empty() => {
            let found = result.as_array().map(Vec::len).unwrap_or(0);
            info!("/search-users?name={} - found {} users", n, found);
        }
        _ => debug!("/search-users without filter, returning all users"),
    }
    Ok(Json(result))
}
