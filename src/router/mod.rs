//! Route table, navigation guard, and the navigation seam.
//!
//! ARCHITECTURE
//! ============
//! `routes` is static configuration, `guard` is a pure decision over a
//! session snapshot, and `Navigator` lets the request pipeline issue the
//! login redirect without depending on the router component itself.

pub mod guard;
pub mod routes;

/// Something that can move the app to another location.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str),
{
    fn navigate(&self, path: &str) {
        self(path);
    }
}

/// Navigator that only logs; used before a router is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        leptos::logging::log!("navigation requested without a router: {path}");
    }
}
