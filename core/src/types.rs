//! Request and response schemas of the staff directory API.
//!
//! # Design
//! Field names follow the backend's JSON exactly (`short_name`,
//! `selectDepartment`, `confirmationPassword`), so these types decode the
//! server's replies without any mapping layer. Unknown fields are ignored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A department as listed by `GET /departments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
}

/// Request payload for `POST /departments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentPayload {
    pub name: String,
    pub short_name: String,
}

/// Request payload for `PATCH /departments/{id}`. Omitted fields stay as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentList {
    pub success: bool,
    #[serde(default)]
    pub departments: Vec<Department>,
}

/// An employee as listed by `GET /employees`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub age: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub department_id: Uuid,
}

fn default_active() -> bool {
    true
}

/// Request payload for `POST /employees`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeePayload {
    pub firstname: String,
    pub lastname: String,
    pub age: u32,
    #[serde(rename = "selectDepartment")]
    pub department_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeList {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Employee>,
}

/// Request payload for `POST /files`: attaches an image to an employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageUpload {
    pub employee_id: Uuid,
    /// File name of the image, e.g. `portrait.png`.
    pub image: String,
}

/// Request payload for `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignUpPayload {
    pub username: String,
    pub password: String,
    #[serde(rename = "confirmationPassword")]
    pub confirmation_password: String,
}

impl SignUpPayload {
    /// Payload whose confirmation matches the password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            confirmation_password: password.clone(),
            password,
        }
    }
}

/// Reply to a successful sign-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignUp {
    pub success: bool,
    pub token: String,
    pub user_created_id: Uuid,
}

/// Reply to a successful create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Created {
    pub id: Uuid,
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Reply carrying only a status flag and message (update, delete, upload).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
