//! Vendor trust and reputation engine for the marketplace backend.
//!
//! The interesting logic lives in [`workflows::trust`]: pure scoring and
//! recovery-goal functions plus a stateful orchestrator that talks to the
//! profile store and the authoritative recalculation service. Everything else
//! in this crate is service shell (configuration, telemetry, HTTP wiring).

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
