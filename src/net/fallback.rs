//! Fallback resolution for requests the backend could not answer.
//!
//! DESIGN
//! ======
//! The pipeline consults a `FallbackResolver` only for transport failures,
//! 404s, and (when explicitly allow-listed) auth failures. Production builds
//! use `NoFallback`; `MockFallback` is the development/demo resolver that
//! answers role and user endpoints from in-memory tables, mutating them so
//! writes appear to persist until the page reloads.

#[cfg(test)]
#[path = "fallback_test.rs"]
mod fallback_test;

use std::cell::RefCell;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::fixtures::{self, PROTECTED_ID};
use super::transport::{Method, OutboundRequest};
use super::types::{AdminUser, AssignRolesRequest, MessageResponse, Role, StatusRequest};

/// Supplies a substitute response body for a failed request, if it can.
#[async_trait::async_trait(?Send)]
pub trait FallbackResolver {
    /// Whether this resolver has an answer shaped for `request`'s endpoint.
    fn recognizes(&self, request: &OutboundRequest) -> bool;

    /// Produce the substitute body, or `None` to let the failure propagate.
    async fn resolve(&self, request: &OutboundRequest) -> Option<Value>;
}

/// Resolver that never substitutes anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFallback;

#[async_trait::async_trait(?Send)]
impl FallbackResolver for NoFallback {
    fn recognizes(&self, _request: &OutboundRequest) -> bool {
        false
    }

    async fn resolve(&self, _request: &OutboundRequest) -> Option<Value> {
        None
    }
}

// =============================================================================
// MOCK ROUTING
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MockRoute {
    Roles,
    RoleSearch,
    Role(i64),
    Users,
    UserSearch,
    User(i64),
    UserRoles(i64),
    UserStatus(i64),
}

fn route(request: &OutboundRequest) -> Option<MockRoute> {
    let path = request.path.split('?').next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let route = match segments.as_slice() {
        ["api", "admin", "roles"] => MockRoute::Roles,
        ["api", "admin", "roles", "search"] => MockRoute::RoleSearch,
        ["api", "admin", "roles", id] => MockRoute::Role(id.parse().ok()?),
        ["api", "admin", "users"] => MockRoute::Users,
        ["api", "admin", "users", "search"] => MockRoute::UserSearch,
        ["api", "admin", "users", id] => MockRoute::User(id.parse().ok()?),
        ["api", "admin", "users", id, "roles"] => MockRoute::UserRoles(id.parse().ok()?),
        ["api", "admin", "users", id, "status"] => MockRoute::UserStatus(id.parse().ok()?),
        _ => return None,
    };

    let supported = match (request.method, route) {
        (Method::Get | Method::Post, MockRoute::Roles | MockRoute::Users)
        | (Method::Get, MockRoute::RoleSearch | MockRoute::UserSearch)
        | (Method::Get | Method::Put | Method::Delete, MockRoute::Role(_) | MockRoute::User(_))
        | (Method::Post, MockRoute::UserRoles(_))
        | (Method::Put, MockRoute::UserStatus(_)) => true,
        _ => false,
    };
    supported.then_some(route)
}

// =============================================================================
// MOCK FALLBACK
// =============================================================================

/// In-memory role and user tables.
#[derive(Clone, Debug, PartialEq)]
pub struct MockTables {
    pub roles: Vec<Role>,
    pub users: Vec<AdminUser>,
}

impl Default for MockTables {
    fn default() -> Self {
        Self { roles: fixtures::seed_roles(), users: fixtures::seed_users() }
    }
}

pub struct MockFallback {
    tables: RefCell<MockTables>,
    latency: Duration,
}

impl MockFallback {
    pub fn new(latency: Duration) -> Self {
        Self { tables: RefCell::new(MockTables::default()), latency }
    }

    /// Snapshot of the current tables.
    pub fn tables(&self) -> MockTables {
        self.tables.borrow().clone()
    }

    /// Answer `request` immediately, without simulated latency.
    pub fn answer(&self, request: &OutboundRequest) -> Option<Value> {
        let route = route(request)?;
        let mut tables = self.tables.borrow_mut();
        match (request.method, route) {
            (Method::Get, MockRoute::Roles) => to_value(&tables.roles),
            (Method::Get, MockRoute::RoleSearch) => {
                let keyword = keyword(request);
                let hits: Vec<&Role> = tables
                    .roles
                    .iter()
                    .filter(|r| {
                        matches_keyword(&r.name, &keyword)
                            || r.description.as_deref().is_some_and(|d| matches_keyword(d, &keyword))
                    })
                    .collect();
                to_value(&hits)
            }
            (Method::Get, MockRoute::Role(id)) => to_value(tables.roles.iter().find(|r| r.id == Some(id))?),
            (Method::Post, MockRoute::Roles) => {
                let mut role: Role = body(request)?;
                role.id = Some(next_id(tables.roles.iter().filter_map(|r| r.id)));
                tables.roles.push(role.clone());
                to_value(&role)
            }
            (Method::Put, MockRoute::Role(id)) => {
                let update: Role = body(request)?;
                let role = tables.roles.iter_mut().find(|r| r.id == Some(id))?;
                role.name = update.name;
                if update.description.is_some() {
                    role.description = update.description;
                }
                if !update.permissions.is_empty() {
                    role.permissions = update.permissions;
                }
                to_value(&*role)
            }
            (Method::Delete, MockRoute::Role(id)) => {
                if id != PROTECTED_ID {
                    tables.roles.retain(|r| r.id != Some(id));
                }
                message("Role deleted successfully!")
            }
            (Method::Get, MockRoute::Users) => to_value(&tables.users),
            (Method::Get, MockRoute::UserSearch) => {
                let keyword = keyword(request);
                let hits: Vec<&AdminUser> = tables
                    .users
                    .iter()
                    .filter(|u| matches_keyword(&u.username, &keyword) || matches_keyword(&u.email, &keyword))
                    .collect();
                to_value(&hits)
            }
            (Method::Get, MockRoute::User(id)) => to_value(tables.users.iter().find(|u| u.id == Some(id))?),
            (Method::Post, MockRoute::Users) => {
                let mut user: AdminUser = body(request)?;
                user.id = Some(next_id(tables.users.iter().filter_map(|u| u.id)));
                user.password = None;
                user.status.get_or_insert(1);
                user.roles.get_or_insert_with(Vec::new);
                tables.users.push(user.clone());
                to_value(&user)
            }
            (Method::Put, MockRoute::User(id)) => {
                let update: AdminUser = body(request)?;
                let user = tables.users.iter_mut().find(|u| u.id == Some(id))?;
                merge_user(user, update);
                to_value(&*user)
            }
            (Method::Delete, MockRoute::User(id)) => {
                if id != PROTECTED_ID {
                    tables.users.retain(|u| u.id != Some(id));
                }
                message("User deleted successfully!")
            }
            (Method::Post, MockRoute::UserRoles(id)) => {
                let req: AssignRolesRequest = body(request)?;
                let names: Vec<String> = tables
                    .roles
                    .iter()
                    .filter(|r| r.id.is_some_and(|rid| req.role_ids.contains(&rid)))
                    .map(|r| r.name.clone())
                    .collect();
                let user = tables.users.iter_mut().find(|u| u.id == Some(id))?;
                user.roles = Some(names);
                message("Roles assigned successfully!")
            }
            (Method::Put, MockRoute::UserStatus(id)) => {
                let req: StatusRequest = body(request)?;
                let user = tables.users.iter_mut().find(|u| u.id == Some(id))?;
                user.status = Some(req.status);
                message("User status updated successfully!")
            }
            _ => None,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl FallbackResolver for MockFallback {
    fn recognizes(&self, request: &OutboundRequest) -> bool {
        route(request).is_some()
    }

    async fn resolve(&self, request: &OutboundRequest) -> Option<Value> {
        if !self.recognizes(request) {
            return None;
        }
        crate::util::time::sleep(self.latency).await;
        self.answer(request)
    }
}

fn merge_user(user: &mut AdminUser, update: AdminUser) {
    if !update.username.is_empty() {
        user.username = update.username;
    }
    if !update.email.is_empty() {
        user.email = update.email;
    }
    if update.user_type.is_some() {
        user.user_type = update.user_type;
    }
    if update.status.is_some() {
        user.status = update.status;
    }
    if update.roles.is_some() {
        user.roles = update.roles;
    }
    if update.phone.is_some() {
        user.phone = update.phone;
    }
    if update.real_name.is_some() {
        user.real_name = update.real_name;
    }
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

fn keyword(request: &OutboundRequest) -> String {
    request
        .query_value("keyword")
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

fn matches_keyword(field: &str, keyword: &str) -> bool {
    keyword.is_empty() || field.to_lowercase().contains(keyword)
}

fn body<T: DeserializeOwned>(request: &OutboundRequest) -> Option<T> {
    serde_json::from_value(request.body.clone()?).ok()
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

fn message(text: &str) -> Option<Value> {
    to_value(&MessageResponse { message: text.to_owned() })
}
