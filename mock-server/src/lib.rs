use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

const CATEGORIES: [&str; 3] = ["work", "study", "life"];
const MAX_TITLE_LEN: usize = 255;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: i64,
    pub completed: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: i64,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: i64,
    pub version: i64,
}

#[derive(Deserialize)]
pub struct UpdateStatus {
    pub completed: bool,
    pub version: i64,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// Body of every response except version conflicts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionConflict {
    pub code: i64,
    pub message: String,
    pub current_version: i64,
    pub provided_version: i64,
    pub latest_data: Todo,
}

#[derive(Default)]
pub struct Store {
    next_id: u32,
    todos: BTreeMap<u32, Todo>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug)]
pub enum ServiceError {
    Invalid(String),
    NotFound(u32),
    Conflict { latest: Todo, provided: i64 },
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::Invalid(message) => failure(StatusCode::BAD_REQUEST, message),
            ServiceError::NotFound(id) => {
                failure(StatusCode::NOT_FOUND, format!("todo not found: id={id}"))
            }
            ServiceError::Conflict { latest, provided } => {
                let body = VersionConflict {
                    code: i64::from(StatusCode::CONFLICT.as_u16()),
                    message: "version conflict: data has been modified by another user".to_string(),
                    current_version: latest.version,
                    provided_version: provided,
                    latest_data: latest,
                };
                (StatusCode::CONFLICT, Json(body)).into_response()
            }
        }
    }
}

fn failure(status: StatusCode, message: String) -> Response {
    let body = Envelope::<()> {
        code: i64::from(status.as_u16()),
        message,
        data: None,
    };
    (status, Json(body)).into_response()
}

fn success<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        code: 0,
        message: "success".to_string(),
        data: Some(data),
    })
}

type ApiResult<T> = Result<Json<Envelope<T>>, ServiceError>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/todos/{id}/status", put(update_status));
    Router::new()
        .route("/ping", get(ping))
        .nest("/api", api)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "pong" }))
}

fn parse_id(raw: &str) -> Result<u32, ServiceError> {
    let id: u32 = raw
        .parse()
        .map_err(|_| ServiceError::Invalid("Invalid ID format".to_string()))?;
    if id == 0 {
        return Err(ServiceError::Invalid(
            "invalid id: id must be greater than 0".to_string(),
        ));
    }
    Ok(id)
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| ServiceError::Invalid(format!("Invalid input: {}", rejection.body_text())))
}

fn check_category(category: &str) -> Result<(), ServiceError> {
    if CATEGORIES.contains(&category) {
        return Ok(());
    }
    Err(ServiceError::Invalid(format!(
        "invalid category: {category}, must be one of: work, study, life"
    )))
}

fn check_title(title: &str) -> Result<(), ServiceError> {
    if title.trim().is_empty() {
        return Err(ServiceError::Invalid(
            "title is required and cannot be empty".to_string(),
        ));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(ServiceError::Invalid(
            "title cannot exceed 255 characters".to_string(),
        ));
    }
    Ok(())
}

fn check_priority(priority: i64) -> Result<(), ServiceError> {
    if !(0..=5).contains(&priority) {
        return Err(ServiceError::Invalid(
            "priority must be between 0 and 5".to_string(),
        ));
    }
    Ok(())
}

fn check_version(version: i64) -> Result<(), ServiceError> {
    if version < 0 {
        return Err(ServiceError::Invalid(
            "invalid version: version must be non-negative".to_string(),
        ));
    }
    Ok(())
}

/// Look up `id` and make sure the caller saw its latest version.
fn fresh_mut(store: &mut Store, id: u32, version: i64) -> Result<&mut Todo, ServiceError> {
    let todo = store.todos.get_mut(&id).ok_or(ServiceError::NotFound(id))?;
    if todo.version != version {
        return Err(ServiceError::Conflict {
            latest: todo.clone(),
            provided: version,
        });
    }
    Ok(todo)
}

async fn list_todos(State(db): State<Db>, Query(params): Query<ListParams>) -> ApiResult<Vec<Todo>> {
    let category = params.category.unwrap_or_default();
    if !category.is_empty() && category != "all" {
        check_category(&category)?;
    }
    let sort = params.sort.unwrap_or_default();
    if !sort.is_empty() && sort != "priority" && sort != "created_at" {
        return Err(ServiceError::Invalid(format!(
            "invalid sort parameter: {sort}, must be: priority or created_at"
        )));
    }

    let store = db.read().await;
    let mut todos: Vec<Todo> = store
        .todos
        .values()
        .filter(|todo| category.is_empty() || category == "all" || todo.category == category)
        .cloned()
        .collect();
    // Newest first; ids break ties between items created in the same instant.
    let newest_first = |a: &Todo, b: &Todo| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id));
    if sort == "priority" {
        todos.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| newest_first(a, b)));
    } else {
        todos.sort_by(newest_first);
    }
    Ok(success(todos))
}

async fn create_todo(
    State(db): State<Db>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> ApiResult<Todo> {
    let input = parse_body(payload)?;
    check_title(&input.title)?;
    if !input.category.is_empty() {
        check_category(&input.category)?;
    }
    check_priority(input.priority)?;

    let mut store = db.write().await;
    store.next_id += 1;
    let now = Utc::now();
    let todo = Todo {
        id: store.next_id,
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        category: if input.category.is_empty() {
            "life".to_string()
        } else {
            input.category
        },
        priority: input.priority,
        completed: false,
        version: 0,
        created_at: now,
        updated_at: now,
    };
    store.todos.insert(todo.id, todo.clone());
    log::info!("created todo {}", todo.id);
    Ok(success(todo))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Todo> {
    let id = parse_id(&id)?;
    let store = db.read().await;
    let todo = store.todos.get(&id).cloned().ok_or(ServiceError::NotFound(id))?;
    Ok(success(todo))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> ApiResult<Todo> {
    let id = parse_id(&id)?;
    let input = parse_body(payload)?;
    check_title(&input.title)?;
    check_category(&input.category)?;
    check_priority(input.priority)?;
    check_version(input.version)?;

    let mut store = db.write().await;
    let todo = fresh_mut(&mut store, id, input.version)?;
    todo.title = input.title.trim().to_string();
    todo.description = input.description.trim().to_string();
    todo.category = input.category;
    todo.priority = input.priority;
    todo.version += 1;
    todo.updated_at = Utc::now();
    Ok(success(todo.clone()))
}

async fn update_status(
    State(db): State<Db>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatus>, JsonRejection>,
) -> ApiResult<Todo> {
    let id = parse_id(&id)?;
    let input = parse_body(payload)?;
    check_version(input.version)?;

    let mut store = db.write().await;
    let todo = fresh_mut(&mut store, id, input.version)?;
    todo.completed = input.completed;
    todo.version += 1;
    todo.updated_at = Utc::now();
    Ok(success(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    store.todos.remove(&id).ok_or(ServiceError::NotFound(id))?;
    log::info!("deleted todo {id}");
    Ok(Json(Envelope {
        code: 0,
        message: "Todo deleted successfully".to_string(),
        data: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_todo_requires_title_field() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"priority":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_todo_defaults_optional_fields() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"Only title"}"#).unwrap();
        assert_eq!(input.title, "Only title");
        assert!(input.category.is_empty());
        assert_eq!(input.priority, 0);
    }

    #[test]
    fn update_status_requires_version() {
        let result: Result<UpdateStatus, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn parse_id_rejects_garbage_and_zero() {
        assert!(matches!(parse_id("abc"), Err(ServiceError::Invalid(m)) if m == "Invalid ID format"));
        assert!(matches!(parse_id("0"), Err(ServiceError::Invalid(m)) if m.starts_with("invalid id")));
        assert_eq!(parse_id("12").unwrap(), 12);
    }

    #[test]
    fn title_checks_trim_and_length() {
        assert!(check_title("   ").is_err());
        assert!(check_title(&"a".repeat(255)).is_ok());
        assert!(matches!(
            check_title(&"a".repeat(256)),
            Err(ServiceError::Invalid(m)) if m == "title cannot exceed 255 characters"
        ));
    }

    #[test]
    fn success_envelope_serializes_with_zero_code() {
        let Json(body) = success(vec![1, 2]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "success");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn envelope_without_data_omits_the_field() {
        let body = Envelope::<()> {
            code: 404,
            message: "todo not found: id=1".to_string(),
            data: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("data").is_none());
    }
}
