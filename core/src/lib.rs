//! Async client for the staff directory REST API.
//!
//! # Overview
//! One generic `ResourceClient` performs a single HTTP request per call
//! (`create`, `list`, `search`, `upload`, `update`, `delete`) and returns the
//! decoded response body. `DepartmentsApi`, `EmployeesApi` and `UsersApi`
//! put typed schemas on top of it; `StaffApi` builds all three from one
//! `ClientConfig`.
//!
//! # Design
//! - Request construction (`build_*`) and response interpretation
//!   (`parse_response`) are pure; only `Transport::execute` does I/O.
//! - Credentials are an explicit `AuthContext`, and each endpoint's
//!   `AuthPolicy` decides whether the `X-ACCESS-TOKEN` header is sent.
//! - Nothing is retried. Errors are classified by `ApiError::kind`.
//!
//! ```no_run
//! # async fn run() -> Result<(), staffdesk_core::ApiError> {
//! use staffdesk_core::{ClientConfig, DepartmentPayload, StaffApi};
//!
//! let api = StaffApi::from_config(&ClientConfig::new("http://127.0.0.1:5002").with_token("t"))?;
//! let created = api
//!     .departments
//!     .create(&DepartmentPayload { name: "Engineering".into(), short_name: "ENG".into() })
//!     .await?;
//! println!("created {}", created.id);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod resources;
pub mod transport;
pub mod types;

pub use auth::{AuthContext, AuthPolicy};
pub use client::{parse_response, ResourceClient};
pub use config::ClientConfig;
pub use endpoint::Endpoint;
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ACCESS_TOKEN_HEADER};
pub use resources::{DepartmentsApi, EmployeesApi, StaffApi, UsersApi};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    Ack, Created, Department, DepartmentList, DepartmentPatch, DepartmentPayload, Employee,
    EmployeeList, EmployeePayload, ImageUpload, SignUp, SignUpPayload,
};
