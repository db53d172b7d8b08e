//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` sends raw requests, `outcome` classifies what came back,
//! `http` runs the shared pipeline over both, and `api` holds the thin
//! per-endpoint wrappers. `fallback` and `fixtures` supply mock data for
//! development builds; `types` defines the wire schema.

pub mod api;
pub mod expiry;
pub mod fallback;
pub mod fixtures;
pub mod http;
pub mod outcome;
pub mod transport;
pub mod types;
