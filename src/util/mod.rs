//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, clocks,
//! timers) from the session and request state machines so those can be
//! driven natively in tests.

pub mod storage;
pub mod time;
