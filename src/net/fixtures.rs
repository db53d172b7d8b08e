//! Seed data for the mock fallback: roles and user accounts.

use std::collections::BTreeMap;

use super::types::{AdminUser, Permission, Role, roles};

/// Id of the administrator role and account; the mock never deletes them.
pub const PROTECTED_ID: i64 = 1;

const ADMIN_MODULES: &[&str] = &[
    "dashboard",
    "pets",
    "nfc-tags",
    "services",
    "orders",
    "base-data",
    "health-records",
    "organization",
    "roles",
    "users",
];

fn permissions(entries: &[(&str, Permission)]) -> BTreeMap<String, Permission> {
    entries
        .iter()
        .map(|(module, perm)| ((*module).to_owned(), *perm))
        .collect()
}

pub fn seed_roles() -> Vec<Role> {
    let business = Permission { can_view: true, can_create: false, can_update: true, can_delete: false };
    vec![
        Role {
            id: Some(1),
            name: roles::ADMIN.to_owned(),
            description: Some("System administrator with every permission".to_owned()),
            permissions: ADMIN_MODULES
                .iter()
                .map(|m| ((*m).to_owned(), Permission::ALL))
                .collect(),
        },
        Role {
            id: Some(2),
            name: roles::BUSINESS.to_owned(),
            description: Some("Merchant managing services and orders".to_owned()),
            permissions: permissions(&[
                ("dashboard", Permission::VIEW),
                ("services", Permission::ALL),
                ("orders", business),
                ("health-records", Permission::ALL),
            ]),
        },
        Role {
            id: Some(3),
            name: roles::PET_OWNER.to_owned(),
            description: Some("Pet owner viewing their own pets".to_owned()),
            permissions: permissions(&[
                ("dashboard", Permission::VIEW),
                ("pets", Permission::VIEW),
                ("orders", Permission::VIEW),
                ("health-records", Permission::VIEW),
            ]),
        },
    ]
}

pub fn seed_users() -> Vec<AdminUser> {
    [
        (1, "admin", roles::ADMIN),
        (2, "business", roles::BUSINESS),
        (3, "user", roles::PET_OWNER),
        (4, "zhang_san", roles::PET_OWNER),
        (5, "li_si", roles::BUSINESS),
        (6, "wang_wu", roles::PET_OWNER),
    ]
    .into_iter()
    .map(|(id, username, role)| AdminUser {
        id: Some(id),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        status: Some(1),
        roles: Some(vec![role.to_owned()]),
        ..AdminUser::default()
    })
    .collect()
}
