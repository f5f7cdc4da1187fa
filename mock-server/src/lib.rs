//! In-memory stand-in for the staff directory backend.
//!
//! Serves `/departments`, `/employees`, `/files` and `/users` with the same
//! JSON shapes and status codes as the real service, including its habit of
//! answering 404 instead of an empty list.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub age: u32,
    pub image: Option<String>,
    pub is_active: bool,
    pub department_id: Uuid,
}

#[derive(Debug, Default)]
pub struct Store {
    pub departments: HashMap<Uuid, Department>,
    pub employees: HashMap<Uuid, Employee>,
    /// username -> user id
    pub users: HashMap<String, Uuid>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// When set, department and employee routes require this `X-ACCESS-TOKEN`,
    /// and sign-up hands it out.
    pub access_token: Option<String>,
}

impl ServerConfig {
    /// Reads `MOCK_ACCESS_TOKEN`; empty counts as unset.
    pub fn from_env() -> Self {
        Self {
            access_token: std::env::var("MOCK_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Clone)]
struct AppState {
    db: Db,
    access_token: Option<Arc<str>>,
}

#[derive(Deserialize)]
struct SearchParams {
    search: Option<String>,
}

pub fn app() -> Router {
    app_with_config(ServerConfig::default())
}

pub fn app_with_config(config: ServerConfig) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        access_token: config.access_token.map(Arc::from),
    };
    Router::new()
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/{id}",
            delete(delete_department).patch(update_department),
        )
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/{id}", delete(delete_employee))
        .route("/files", post(upload_image))
        .route("/users", post(create_user))
        .fallback(not_found)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_config(listener, ServerConfig::default()).await
}

pub async fn run_with_config(
    listener: TcpListener,
    config: ServerConfig,
) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, guarded = config.access_token.is_some(), "mock backend serving");
    }
    axum::serve(listener, app_with_config(config)).await
}

// --- responses ---

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "message": message}))).into_response()
}

fn invalid(message: &str, errors: Vec<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"success": false, "message": message, "errors": errors})),
    )
        .into_response()
}

async fn not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "Resource not found")
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(expected) = state.access_token.as_deref() else {
        return Ok(());
    };
    match headers.get(ACCESS_TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        None => Err(failure(
            StatusCode::UNAUTHORIZED,
            "Unauthenticated user, please provide your credentials",
        )),
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(failure(
            StatusCode::UNAUTHORIZED,
            "Invalid Token, try a new token",
        )),
    }
}

// --- body field helpers ---

fn required_str(body: &Map<String, Value>, key: &str, errors: &mut Vec<String>) -> Option<String> {
    match body.get(key).and_then(Value::as_str) {
        Some(s) => Some(s.to_string()),
        None => {
            errors.push(format!("{key} is required"));
            None
        }
    }
}

fn required_u32(body: &Map<String, Value>, key: &str, errors: &mut Vec<String>) -> Option<u32> {
    match body.get(key).and_then(Value::as_u64).map(u32::try_from) {
        Some(Ok(n)) => Some(n),
        _ => {
            errors.push(format!("{key} is required"));
            None
        }
    }
}

fn required_id(
    body: &Map<String, Value>,
    key: &str,
    label: &str,
    errors: &mut Vec<String>,
) -> Option<Uuid> {
    match body.get(key).and_then(Value::as_str).map(Uuid::parse_str) {
        Some(Ok(id)) => Some(id),
        _ => {
            errors.push(format!("{label} is required"));
            None
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn allowed_image(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            ALLOWED_IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

// --- departments ---

async fn list_departments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let store = state.db.read().await;
    let mut departments: Vec<Department> = store
        .departments
        .values()
        .filter(|d| match params.search.as_deref() {
            Some(q) if !q.is_empty() => contains_ci(&d.name, q) || contains_ci(&d.short_name, q),
            _ => true,
        })
        .cloned()
        .collect();
    if departments.is_empty() {
        return failure(StatusCode::NOT_FOUND, "Resource not found");
    }
    departments.sort_by(|a, b| a.name.cmp(&b.name));
    Json(json!({"success": true, "departments": departments})).into_response()
}

async fn create_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let mut errors = Vec::new();
    let name = required_str(&body, "name", &mut errors);
    let short_name = required_str(&body, "short_name", &mut errors);
    let (Some(name), Some(short_name)) = (name, short_name) else {
        return invalid("Error creating department", errors);
    };

    let department = Department {
        id: Uuid::new_v4(),
        name,
        short_name,
    };
    let id = department.id;
    debug!(%id, name = %department.name, "department created");
    state.db.write().await.departments.insert(id, department);
    (
        StatusCode::CREATED,
        Json(json!({"id": id, "success": true, "message": "Department created successfully!"})),
    )
        .into_response()
}

async fn update_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let mut store = state.db.write().await;
    let Some(department) = store.departments.get_mut(&id) else {
        return failure(StatusCode::NOT_FOUND, "Resource not found");
    };
    if let Some(name) = body.get("name").and_then(Value::as_str) {
        department.name = name.to_string();
    }
    if let Some(short_name) = body.get("short_name").and_then(Value::as_str) {
        department.short_name = short_name.to_string();
    }
    Json(json!({"success": true, "message": "Department updated successfully"})).into_response()
}

async fn delete_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    match state.db.write().await.departments.remove(&id) {
        Some(_) => {
            Json(json!({"success": true, "message": "Department deleted successfully"}))
                .into_response()
        }
        None => failure(StatusCode::NOT_FOUND, "Resource not found"),
    }
}

// --- employees ---

async fn list_employees(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let store = state.db.read().await;
    let mut employees: Vec<Employee> = store
        .employees
        .values()
        .filter(|e| match params.search.as_deref() {
            Some(q) if !q.is_empty() => contains_ci(&e.firstname, q),
            _ => true,
        })
        .cloned()
        .collect();
    if employees.is_empty() {
        return failure(StatusCode::NOT_FOUND, "No employees found");
    }
    employees.sort_by(|a, b| (&a.lastname, &a.firstname).cmp(&(&b.lastname, &b.firstname)));
    Json(json!({"success": true, "data": employees})).into_response()
}

async fn create_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let mut errors = Vec::new();
    let firstname = required_str(&body, "firstname", &mut errors);
    let lastname = required_str(&body, "lastname", &mut errors);
    let age = required_u32(&body, "age", &mut errors);
    let department_id = required_id(&body, "selectDepartment", "department", &mut errors);

    let mut store = state.db.write().await;
    if let Some(id) = department_id {
        if !store.departments.contains_key(&id) {
            errors.push("department does not exist".to_string());
        }
    }
    let (Some(firstname), Some(lastname), Some(age), Some(department_id), true) =
        (firstname, lastname, age, department_id, errors.is_empty())
    else {
        return invalid("Error creating employee", errors);
    };

    let employee = Employee {
        id: Uuid::new_v4(),
        firstname,
        lastname,
        age,
        image: None,
        is_active: true,
        department_id,
    };
    let id = employee.id;
    debug!(%id, "employee created");
    store.employees.insert(id, employee);
    (
        StatusCode::CREATED,
        Json(json!({"id": id, "success": true, "message": "Employee Created successfully!"})),
    )
        .into_response()
}

async fn delete_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    match state.db.write().await.employees.remove(&id) {
        Some(_) => Json(json!({"success": true, "message": "Employee deleted successfully"}))
            .into_response(),
        None => failure(StatusCode::NOT_FOUND, "Resource not found"),
    }
}

async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let mut errors = Vec::new();
    let employee_id = required_id(&body, "employee_id", "employee_id", &mut errors);
    let image = required_str(&body, "image", &mut errors);
    let (Some(employee_id), Some(image)) = (employee_id, image) else {
        return invalid("Error uploading file", errors);
    };
    if !allowed_image(&image) {
        return failure(StatusCode::BAD_REQUEST, "Image format not allowed");
    }

    let mut store = state.db.write().await;
    let Some(employee) = store.employees.get_mut(&employee_id) else {
        return failure(StatusCode::NOT_FOUND, "Resource not found");
    };
    employee.image = Some(image);
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "message": "File uploaded successfully!"})),
    )
        .into_response()
}

// --- users ---

async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    let mut errors = Vec::new();
    let username = required_str(&body, "username", &mut errors);
    let password = required_str(&body, "password", &mut errors);
    let confirmation = required_str(&body, "confirmationPassword", &mut errors);

    let mut store = state.db.write().await;
    if let Some(username) = username.as_deref() {
        if store.users.contains_key(username) {
            errors.push("An account with this username already exists".to_string());
        }
    }
    if let (Some(password), Some(confirmation)) = (password.as_deref(), confirmation.as_deref()) {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(format!(
                "Password must have at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }
        if password != confirmation {
            errors.push("password and confirmationPassword does not match".to_string());
        }
    }
    let (Some(username), true) = (username, errors.is_empty()) else {
        return invalid("Error creating a new user", errors);
    };

    let user_id = Uuid::new_v4();
    store.users.insert(username, user_id);
    let token = state
        .access_token
        .as_deref()
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "token": token, "user_created_id": user_id})),
    )
        .into_response()
}
