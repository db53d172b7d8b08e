//! Static route table for the dashboard.
//!
//! Paths are absolute and flattened; a `:name` segment matches any single
//! non-empty segment. Titles and icons are display-only and never consulted
//! by the guard.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::net::types::roles;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const LANDING_PATH: &str = "/dashboard";

/// Access requirements and display metadata for one navigable location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub title: Option<&'static str>,
    pub icon: Option<&'static str>,
    pub requires_auth: bool,
    /// When set, the user needs at least one of these roles.
    pub allowed_roles: Option<&'static [&'static str]>,
    /// Navigable but left out of the sidebar menu.
    pub hidden: bool,
    /// Entering this path forwards to another one.
    pub redirect: Option<&'static str>,
}

impl RouteDescriptor {
    const fn private(path: &'static str, name: &'static str, title: &'static str, icon: &'static str) -> Self {
        Self {
            path,
            name,
            title: Some(title),
            icon: Some(icon),
            requires_auth: true,
            allowed_roles: None,
            hidden: false,
            redirect: None,
        }
    }

    const fn roles(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed_roles = Some(allowed);
        self
    }

    const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Whether `path` (already normalized) matches this descriptor's pattern.
    pub fn matches(&self, path: &str) -> bool {
        let mut pattern = segments(self.path);
        let mut actual = segments(path);
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return true,
                (Some(p), Some(a)) if p.starts_with(':') || p == a => {}
                _ => return false,
            }
        }
    }

    /// Whether a user holding `user_roles` passes this route's role list.
    pub fn permits(&self, user_roles: &[String]) -> bool {
        self.allowed_roles
            .is_none_or(|allowed| user_roles.iter().any(|r| allowed.contains(&r.as_str())))
    }
}

const USER_OR_ADMIN: &[&str] = &[roles::USER, roles::ADMIN];
const MERCHANTS: &[&str] = &[roles::MERCHANT_HOSPITAL, roles::MERCHANT_HOUSE, roles::MERCHANT_GOODS];
const MERCHANTS_OR_ADMIN: &[&str] =
    &[roles::MERCHANT_HOSPITAL, roles::MERCHANT_HOUSE, roles::MERCHANT_GOODS, roles::ADMIN];
const ADMIN_ONLY: &[&str] = &[roles::ADMIN];
const DATA_ADMINS: &[&str] = &[roles::ADMIN, roles::DATA_MANAGER];

pub static ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        path: LOGIN_PATH,
        name: "Login",
        title: Some("Sign in"),
        icon: None,
        requires_auth: false,
        allowed_roles: None,
        hidden: true,
        redirect: None,
    },
    RouteDescriptor {
        path: REGISTER_PATH,
        name: "Register",
        title: Some("Create account"),
        icon: None,
        requires_auth: false,
        allowed_roles: None,
        hidden: true,
        redirect: None,
    },
    RouteDescriptor {
        path: "/",
        name: "Layout",
        title: None,
        icon: None,
        requires_auth: true,
        allowed_roles: None,
        hidden: true,
        redirect: Some(LANDING_PATH),
    },
    RouteDescriptor::private(LANDING_PATH, "Dashboard", "Dashboard", "HomeFilled"),
    RouteDescriptor::private("/pets", "Pets", "Pets", "PieChart").roles(USER_OR_ADMIN),
    RouteDescriptor::private("/health-records", "HealthRecords", "Health records", "DocumentChecked")
        .roles(USER_OR_ADMIN),
    RouteDescriptor::private("/orders", "Orders", "My orders", "Document"),
    RouteDescriptor::private("/customers", "Customers", "Customers", "User").roles(MERCHANTS_OR_ADMIN),
    RouteDescriptor::private("/customers/:id", "CustomerDetail", "Customer detail", "User")
        .roles(MERCHANTS_OR_ADMIN)
        .hidden(),
    RouteDescriptor::private("/services", "Services", "Services", "ShoppingCart").roles(MERCHANTS),
    RouteDescriptor::private("/nfc-tags", "NfcTags", "NFC tags", "Postcard").roles(ADMIN_ONLY),
    RouteDescriptor::private("/base-data", "BaseData", "Base data", "Setting").roles(DATA_ADMINS),
    RouteDescriptor::private("/organization", "Organization", "Organization", "Setting").roles(ADMIN_ONLY),
    RouteDescriptor::private("/organization/roles", "Roles", "Roles & permissions", "UserFilled")
        .roles(ADMIN_ONLY),
    RouteDescriptor::private("/organization/users", "UserAccounts", "User accounts", "Users").roles(ADMIN_ONLY),
];

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strip query/fragment and collapse trailing slashes (`/pets/` -> `/pets`).
pub fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let joined = segments(path).collect::<Vec<_>>().join("/");
    format!("/{joined}")
}

/// The descriptor for `path`, if any route declares it.
pub fn find_route(path: &str) -> Option<&'static RouteDescriptor> {
    let path = normalize(path);
    ROUTES.iter().find(|r| r.matches(&path))
}

/// Sidebar entries: titled, visible routes the holder of `user_roles` may open.
pub fn menu_for(user_roles: &[String]) -> Vec<&'static RouteDescriptor> {
    ROUTES
        .iter()
        .filter(|r| r.requires_auth && !r.hidden && r.title.is_some() && r.permits(user_roles))
        .collect()
}
