//! HTTP helpers used by hosted contents that load or save their own data.

use gloo_net::http::Request;
use serde_json::{Map, Value};

/// `endpoint` with `filter` appended as a query string
pub fn query_url(endpoint: &str, filter: &Map<String, Value>) -> String {
    if filter.is_empty() {
        return endpoint.to_string();
    }
    match serde_qs::to_string(filter) {
        Ok(query) if !query.is_empty() => {
            let separator = if endpoint.contains('?') { '&' } else { '?' };
            format!("{endpoint}{separator}{query}")
        }
        Ok(_) => endpoint.to_string(),
        Err(e) => {
            log::warn!("filter not encodable as query string, sent without it: {e}");
            endpoint.to_string()
        }
    }
}

pub async fn fetch_entities(endpoint: &str, filter: &Map<String, Value>) -> Result<Vec<Value>, String> {
    let response = Request::get(&query_url(endpoint, filter))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    response.json().await.map_err(|e| e.to_string())
}

/// POST `entity`; the server answers with the stored entity
pub async fn save_entity(endpoint: &str, entity: &Value) -> Result<Value, String> {
    let response = Request::post(endpoint)
        .json(entity)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    response.json().await.map_err(|e| e.to_string())
}
