//! Navigation guard.
//!
//! One synchronous evaluation per navigation attempt. The return type makes
//! "exactly one terminal action" structural: the caller either proceeds to
//! the requested location or redirects, never both and never neither.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::routes::{LANDING_PATH, LOGIN_PATH, find_route, normalize};
use crate::state::auth::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Redirect(&'static str),
}

/// Decide what happens when `session` tries to open `target`.
pub fn evaluate(target: &str, session: &Session) -> NavigationDecision {
    let path = normalize(target);
    let route = find_route(&path);
    let authenticated = session.is_authenticated();

    // Unknown paths are private by default.
    let requires_auth = route.is_none_or(|r| r.requires_auth);
    if requires_auth && !authenticated {
        leptos::logging::log!("guard: {path} requires auth -> {LOGIN_PATH}");
        return NavigationDecision::Redirect(LOGIN_PATH);
    }

    if path == LOGIN_PATH && authenticated {
        leptos::logging::log!("guard: already signed in -> {LANDING_PATH}");
        return NavigationDecision::Redirect(LANDING_PATH);
    }

    let Some(route) = route else {
        return NavigationDecision::Proceed;
    };

    if !route.permits(session.roles()) && path != LANDING_PATH {
        leptos::logging::warn!("guard: roles {:?} not allowed on {path} -> {LANDING_PATH}", session.roles());
        return NavigationDecision::Redirect(LANDING_PATH);
    }

    if let Some(to) = route.redirect {
        return NavigationDecision::Redirect(to);
    }

    NavigationDecision::Proceed
}
