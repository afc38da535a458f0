//! In-memory stand-in for a FlexiBee company REST endpoint.
//!
//! Serves `GET|PUT /<resource>[/(<filter>)].json` for the five resource
//! kinds the client knows, framed in the `winstrom` envelope. The `detail`
//! query parameter is ignored on purpose: every stored attribute (plus the
//! server-assigned `id` and `lastUpdate`) is returned, like a service that
//! does not honor the hint.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const RESOURCES: [&str; 5] = [
    "kurz",
    "banka",
    "prikaz-k-uhrade",
    "faktura-prijata",
    "pokladni-pohyb",
];

pub const VERSION: &str = "1.0";
pub const LAST_UPDATE: &str = "2015-11-02T10:00:00.000+01:00";

#[derive(Default)]
struct Store {
    records: HashMap<String, Vec<Map<String, Value>>>,
    next_id: u64,
}

type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    authorization: Option<String>,
}

#[derive(Deserialize)]
struct PutBody {
    winstrom: Map<String, Value>,
}

/// Router without authentication.
pub fn app() -> Router {
    router(None)
}

/// Router that requires HTTP basic auth with the given credentials.
pub fn app_with_credentials(username: &str, password: &str) -> Router {
    let token = STANDARD.encode(format!("{username}:{password}"));
    router(Some(format!("Basic {token}")))
}

fn router(authorization: Option<String>) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        authorization,
    };
    Router::new()
        .route("/{*path}", get(fetch).put(store))
        .with_state(state)
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// `kurz.json` → `("kurz", None)`, `c/demo/kurz/(12).json` → `("kurz", Some("12"))`.
/// Leading segments (the company prefix) are ignored.
pub fn parse_path(path: &str) -> Option<(&str, Option<&str>)> {
    let path = path.strip_suffix(".json")?;
    let (prefix, filter) = match path.find("/(") {
        Some(index) => {
            let filter = path[index + 2..].strip_suffix(')')?;
            (&path[..index], Some(filter))
        }
        None => (path, None),
    };
    let resource = prefix.rsplit('/').next()?;
    Some((resource, filter))
}

/// Supported filters: a numeric id or `code:<kod>`.
pub fn filter_matches(filter: &str, record: &Map<String, Value>) -> Option<bool> {
    if let Some(code) = filter.strip_prefix("code:") {
        return Some(record.get("kod").and_then(Value::as_str) == Some(code));
    }
    filter.parse::<u64>().ok()?;
    Some(record.get("id").and_then(Value::as_str) == Some(filter))
}

pub fn failure_envelope(message: &str) -> Value {
    json!({"winstrom": {"@version": VERSION, "success": "false", "message": message}})
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(failure_envelope(message))).into_response()
}

fn authorized(state: &AppState, headers: &HeaderMap) -> bool {
    match &state.authorization {
        None => true,
        Some(expected) => headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            == Some(expected.as_str()),
    }
}

fn is_complete_rate(object: &Map<String, Value>) -> bool {
    object.contains_key("mena") && object.contains_key("nbStred")
}

fn known_resource(path: &str) -> Result<(&str, Option<&str>), Response> {
    let (resource, filter) =
        parse_path(path).ok_or_else(|| failure(StatusCode::NOT_FOUND, "Neplatná URL"))?;
    if !RESOURCES.contains(&resource) {
        return Err(failure(StatusCode::NOT_FOUND, &format!("Neznámá evidence: {resource}")));
    }
    Ok((resource, filter))
}

async fn fetch(State(state): State<AppState>, Path(path): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    let (resource, filter) = match known_resource(&path) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    if filter.is_some_and(|f| filter_matches(f, &Map::new()).is_none()) {
        let message = format!("Nepodporovaný filtr: {}", filter.unwrap_or_default());
        return failure(StatusCode::BAD_REQUEST, &message);
    }
    let db = state.db.read().await;
    let selected: Vec<Value> = db
        .records
        .get(resource)
        .into_iter()
        .flatten()
        .filter(|record| filter.map_or(true, |f| filter_matches(f, record) == Some(true)))
        .cloned()
        .map(Value::Object)
        .collect();
    let mut inner = Map::new();
    inner.insert("@version".to_string(), json!(VERSION));
    inner.insert(resource.to_string(), Value::Array(selected));
    (StatusCode::OK, Json(json!({ "winstrom": inner }))).into_response()
}

async fn store(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !authorized(&state, &headers) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    let (resource, _) = match known_resource(&path) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    let Ok(body) = serde_json::from_str::<PutBody>(&body) else {
        return failure(StatusCode::BAD_REQUEST, "Chybí element winstrom");
    };
    let Some(Value::Array(items)) = body.winstrom.get(resource) else {
        return failure(StatusCode::BAD_REQUEST, &format!("Chybí seznam {resource}"));
    };

    // All items are checked before anything is stored.
    let mut batch = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(object) if resource != "kurz" || is_complete_rate(object) => batch.push(object.clone()),
            _ => {
                return failure(StatusCode::BAD_REQUEST, &format!("Záznam {} je neplatný", index + 1));
            }
        }
    }

    let mut guard = state.db.write().await;
    let db = &mut *guard;
    let mut results = Vec::new();
    let (mut created, mut updated) = (0, 0);
    for mut object in batch {
        let existing_id = object.get("id").and_then(Value::as_str).map(str::to_string);
        let records = db.records.entry(resource.to_string()).or_default();
        let position = existing_id
            .as_deref()
            .and_then(|id| records.iter().position(|r| r.get("id").and_then(Value::as_str) == Some(id)));
        match position {
            Some(index) => {
                records[index].extend(object);
                updated += 1;
                results.push(json!({ "id": existing_id }));
            }
            None => {
                db.next_id += 1;
                let id = db.next_id.to_string();
                object.insert("id".to_string(), json!(id));
                object.insert("lastUpdate".to_string(), json!(LAST_UPDATE));
                records.push(object);
                created += 1;
                results.push(json!({ "id": id }));
            }
        }
    }

    let envelope = json!({"winstrom": {
        "@version": VERSION,
        "success": "true",
        "stats": {
            "created": created.to_string(),
            "updated": updated.to_string(),
            "deleted": "0",
            "skipped": "0",
            "failed": "0"
        },
        "results": results
    }});
    (StatusCode::CREATED, Json(envelope)).into_response()
}
