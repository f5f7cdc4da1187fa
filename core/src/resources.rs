//! Typed wrappers for the three collections of the staff directory API.
//!
//! Departments and employees send the access token; sign-up does not, since
//! it is how a token is obtained in the first place.

use std::sync::Arc;

use crate::auth::{AuthContext, AuthPolicy};
use crate::client::ResourceClient;
use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    Ack, Created, DepartmentList, DepartmentPatch, DepartmentPayload, EmployeeList,
    EmployeePayload, ImageUpload, SignUp, SignUpPayload,
};

pub const DEPARTMENTS_PATH: &str = "departments";
pub const EMPLOYEES_PATH: &str = "employees";
pub const FILES_PATH: &str = "files";
pub const USERS_PATH: &str = "users";

/// `/departments`
#[derive(Debug)]
pub struct DepartmentsApi<T = ReqwestTransport> {
    inner: ResourceClient<T>,
}

impl<T> Clone for DepartmentsApi<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> DepartmentsApi<T> {
    pub fn endpoint(base_url: &str) -> Result<Endpoint, ApiError> {
        Endpoint::collection(base_url, DEPARTMENTS_PATH)
    }

    pub fn new(inner: ResourceClient<T>) -> Self {
        Self { inner }
    }

    pub fn resource(&self) -> &ResourceClient<T> {
        &self.inner
    }
}

impl<T: Transport> DepartmentsApi<T> {
    pub async fn create(&self, payload: &DepartmentPayload) -> Result<Created, ApiError> {
        self.inner.create(payload).await
    }

    /// The backend answers 404 rather than an empty list when nothing exists.
    pub async fn list(&self) -> Result<DepartmentList, ApiError> {
        self.inner.list().await
    }

    /// Substring match on name or short name.
    pub async fn search(&self, query: &str) -> Result<DepartmentList, ApiError> {
        self.inner.search(query).await
    }

    pub async fn update(&self, id: &str, patch: &DepartmentPatch) -> Result<Ack, ApiError> {
        self.inner.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<Ack, ApiError> {
        self.inner.delete(id).await
    }
}

/// `/employees`, with image uploads going to `/files`.
#[derive(Debug)]
pub struct EmployeesApi<T = ReqwestTransport> {
    inner: ResourceClient<T>,
}

impl<T> Clone for EmployeesApi<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> EmployeesApi<T> {
    pub fn endpoint(base_url: &str) -> Result<Endpoint, ApiError> {
        Endpoint::collection(base_url, EMPLOYEES_PATH)?.with_upload_path(base_url, FILES_PATH)
    }

    pub fn new(inner: ResourceClient<T>) -> Self {
        Self { inner }
    }

    pub fn resource(&self) -> &ResourceClient<T> {
        &self.inner
    }
}

impl<T: Transport> EmployeesApi<T> {
    pub async fn create(&self, payload: &EmployeePayload) -> Result<Created, ApiError> {
        self.inner.create(payload).await
    }

    /// The backend answers 404 rather than an empty list when nothing exists.
    pub async fn list(&self) -> Result<EmployeeList, ApiError> {
        self.inner.list().await
    }

    /// Substring match on first name.
    pub async fn search(&self, query: &str) -> Result<EmployeeList, ApiError> {
        self.inner.search(query).await
    }

    pub async fn upload_image(&self, upload: &ImageUpload) -> Result<Ack, ApiError> {
        self.inner.upload(upload).await
    }

    pub async fn delete(&self, id: &str) -> Result<Ack, ApiError> {
        self.inner.delete(id).await
    }
}

/// `/users`
#[derive(Debug)]
pub struct UsersApi<T = ReqwestTransport> {
    inner: ResourceClient<T>,
}

impl<T> Clone for UsersApi<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> UsersApi<T> {
    pub fn endpoint(base_url: &str) -> Result<Endpoint, ApiError> {
        Ok(Endpoint::collection(base_url, USERS_PATH)?.with_auth_policy(AuthPolicy::Omit))
    }

    pub fn new(inner: ResourceClient<T>) -> Self {
        Self { inner }
    }

    pub fn resource(&self) -> &ResourceClient<T> {
        &self.inner
    }
}

impl<T: Transport> UsersApi<T> {
    pub async fn sign_up(&self, payload: &SignUpPayload) -> Result<SignUp, ApiError> {
        self.inner.create(payload).await
    }
}

/// All three collections sharing one transport and one set of credentials.
#[derive(Debug)]
pub struct StaffApi<T = ReqwestTransport> {
    pub departments: DepartmentsApi<T>,
    pub employees: EmployeesApi<T>,
    pub users: UsersApi<T>,
}

impl<T> Clone for StaffApi<T> {
    fn clone(&self) -> Self {
        Self {
            departments: self.departments.clone(),
            employees: self.employees.clone(),
            users: self.users.clone(),
        }
    }
}

impl StaffApi<ReqwestTransport> {
    /// Build the clients with a reqwest transport configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::with_transport(&config.base_url, config.auth.clone(), transport)
    }

    /// Same as `from_config(&ClientConfig::from_env()?)`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_config(&ClientConfig::from_env()?)
    }
}

impl<T> StaffApi<T> {
    pub fn with_transport(base_url: &str, auth: AuthContext, transport: T) -> Result<Self, ApiError> {
        let transport = Arc::new(transport);
        let client = |endpoint: Endpoint| {
            ResourceClient::with_shared_transport(endpoint, auth.clone(), Arc::clone(&transport))
        };
        Ok(Self {
            departments: DepartmentsApi::new(client(DepartmentsApi::<T>::endpoint(base_url)?)),
            employees: EmployeesApi::new(client(EmployeesApi::<T>::endpoint(base_url)?)),
            users: UsersApi::new(client(UsersApi::<T>::endpoint(base_url)?)),
        })
    }

    /// Rebuild every client with new credentials, e.g. the token returned by sign-up.
    pub fn with_auth(&self, auth: AuthContext) -> Self {
        Self {
            departments: DepartmentsApi::new(self.departments.inner.with_auth(auth.clone())),
            employees: EmployeesApi::new(self.employees.inner.with_auth(auth.clone())),
            users: UsersApi::new(self.users.inner.with_auth(auth)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    #[derive(Debug)]
    struct Unreachable;

    impl Transport for Unreachable {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("unreachable".into()))
        }
    }

    fn api() -> StaffApi<Unreachable> {
        StaffApi::with_transport("http://127.0.0.1:5002", AuthContext::new("tok"), Unreachable)
            .unwrap()
    }

    #[test]
    fn endpoints_follow_backend_layout() {
        let api = api();
        assert_eq!(
            api.departments.resource().endpoint().url(),
            "http://127.0.0.1:5002/departments"
        );
        assert_eq!(
            api.employees.resource().endpoint().upload_url(),
            Some("http://127.0.0.1:5002/files")
        );
        assert_eq!(
            api.users.resource().endpoint().url(),
            "http://127.0.0.1:5002/users"
        );
    }

    #[test]
    fn sign_up_never_sends_token() {
        let req = api()
            .users
            .resource()
            .build_create(&SignUpPayload::new("u", "password1"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert!(req.header("x-access-token").is_none());
    }

    #[test]
    fn departments_and_employees_send_token() {
        let api = api();
        assert_eq!(
            api.departments.resource().build_list().header("x-access-token"),
            Some("tok")
        );
        assert_eq!(
            api.employees.resource().build_list().header("x-access-token"),
            Some("tok")
        );
    }

    #[test]
    fn with_auth_replaces_token_everywhere() {
        let api = api().with_auth(AuthContext::new("fresh"));
        assert_eq!(api.departments.resource().auth().token(), Some("fresh"));
        assert_eq!(api.employees.resource().auth().token(), Some("fresh"));
    }

    #[test]
    fn clients_share_one_transport() {
        let api = api();
        let a: *const Unreachable = api.departments.resource().transport();
        let b: *const Unreachable = api.users.resource().transport();
        assert_eq!(a, b);
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = StaffApi::with_transport("::nope::", AuthContext::anonymous(), Unreachable)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn from_config_builds_reqwest_clients() {
        let api = StaffApi::from_config(&ClientConfig::new("http://localhost:3000")).unwrap();
        assert!(api.departments.resource().auth().is_anonymous());
    }

    #[tokio::test]
    async fn typed_calls_surface_transport_errors() {
        let err = api().departments.list().await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Transport);
    }
}
