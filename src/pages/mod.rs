//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages are only reached through the route gate, so none of them re-checks
//! access. Form validation lives in plain functions next to each page.

pub mod login;
pub mod register;
pub mod section;
