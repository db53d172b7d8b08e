//! Resource wrappers: one function per backend endpoint.
//!
//! Each wrapper only builds the request and names the response type; auth
//! headers, status handling and mock fallback all live in [`ApiClient`].
//! Every wrapper fails with the `ApiError` the pipeline produced.

#![allow(clippy::missing_errors_doc)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::http::{ApiClient, ApiError};
use super::transport::OutboundRequest;

fn with_json<T: Serialize>(request: OutboundRequest, body: &T) -> Result<OutboundRequest, ApiError> {
    request.json(body).map_err(ApiError::Encode)
}

async fn call<T: DeserializeOwned>(api: &ApiClient, request: OutboundRequest) -> Result<T, ApiError> {
    api.request(request).await
}

/// `/api/auth/*`.
pub mod auth {
    use super::{ApiClient, ApiError, OutboundRequest, call, with_json};
    use crate::net::types::{LoginRequest, LoginResponse, MessageResponse, SignupRequest};

    /// `POST /api/auth/signin`.
    ///
    /// # Errors
    ///
    /// Any pipeline failure; bad credentials arrive as `Unauthorized` or `Http`.
    pub async fn signin(api: &ApiClient, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        call(api, with_json(OutboundRequest::post("/api/auth/signin"), request)?).await
    }

    /// `POST /api/auth/signup`.
    ///
    /// # Errors
    ///
    /// Any pipeline failure; a taken username arrives as `Http` with the
    /// server's message.
    pub async fn signup(api: &ApiClient, request: &SignupRequest) -> Result<MessageResponse, ApiError> {
        call(api, with_json(OutboundRequest::post("/api/auth/signup"), request)?).await
    }
}

/// `/api/admin/roles`.
pub mod roles {
    use super::{ApiClient, ApiError, OutboundRequest, call, with_json};
    use crate::net::types::{MessageResponse, Role};

    const BASE: &str = "/api/admin/roles";

    pub async fn list(api: &ApiClient) -> Result<Vec<Role>, ApiError> {
        call(api, OutboundRequest::get(BASE)).await
    }

    pub async fn get(api: &ApiClient, id: i64) -> Result<Role, ApiError> {
        call(api, OutboundRequest::get(format!("{BASE}/{id}"))).await
    }

    pub async fn create(api: &ApiClient, role: &Role) -> Result<Role, ApiError> {
        call(api, with_json(OutboundRequest::post(BASE), role)?).await
    }

    pub async fn update(api: &ApiClient, id: i64, role: &Role) -> Result<Role, ApiError> {
        call(api, with_json(OutboundRequest::put(format!("{BASE}/{id}")), role)?).await
    }

    pub async fn delete(api: &ApiClient, id: i64) -> Result<MessageResponse, ApiError> {
        call(api, OutboundRequest::delete(format!("{BASE}/{id}"))).await
    }

    /// Case-insensitive match on name or description.
    pub async fn search(api: &ApiClient, keyword: &str) -> Result<Vec<Role>, ApiError> {
        call(api, OutboundRequest::get(format!("{BASE}/search")).query("keyword", keyword)).await
    }
}

/// `/api/admin/users`.
pub mod users {
    use super::{ApiClient, ApiError, OutboundRequest, call, with_json};
    use crate::net::types::{AdminUser, AssignRolesRequest, MessageResponse, StatusRequest};

    const BASE: &str = "/api/admin/users";

    pub async fn list(api: &ApiClient) -> Result<Vec<AdminUser>, ApiError> {
        call(api, OutboundRequest::get(BASE)).await
    }

    pub async fn get(api: &ApiClient, id: i64) -> Result<AdminUser, ApiError> {
        call(api, OutboundRequest::get(format!("{BASE}/{id}"))).await
    }

    pub async fn create(api: &ApiClient, user: &AdminUser) -> Result<AdminUser, ApiError> {
        call(api, with_json(OutboundRequest::post(BASE), user)?).await
    }

    pub async fn update(api: &ApiClient, id: i64, user: &AdminUser) -> Result<AdminUser, ApiError> {
        call(api, with_json(OutboundRequest::put(format!("{BASE}/{id}")), user)?).await
    }

    pub async fn delete(api: &ApiClient, id: i64) -> Result<MessageResponse, ApiError> {
        call(api, OutboundRequest::delete(format!("{BASE}/{id}"))).await
    }

    /// Case-insensitive match on username or email.
    pub async fn search(api: &ApiClient, keyword: &str) -> Result<Vec<AdminUser>, ApiError> {
        call(api, OutboundRequest::get(format!("{BASE}/search")).query("keyword", keyword)).await
    }

    /// Replace the user's roles with `role_ids`.
    pub async fn assign_roles(api: &ApiClient, id: i64, role_ids: Vec<i64>) -> Result<MessageResponse, ApiError> {
        let body = AssignRolesRequest { role_ids };
        call(api, with_json(OutboundRequest::post(format!("{BASE}/{id}/roles")), &body)?).await
    }

    /// Enable (`1`) or disable (`0`) the account.
    pub async fn toggle_user_status(api: &ApiClient, id: i64, status: i32) -> Result<MessageResponse, ApiError> {
        call(api, with_json(OutboundRequest::put(format!("{BASE}/{id}/status")), &StatusRequest { status })?).await
    }
}
