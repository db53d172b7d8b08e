//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`auth`, `notice`) so the request pipeline and
//! router guard depend only on the small models they read.

pub mod auth;
pub mod notice;
