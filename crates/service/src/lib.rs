//! Shared service infrastructure for the formid CLI and embedders.
//!
//! This crate provides the components above the core protocol layer:
//! - Configuration (record TTL, domain fee, legacy alias table)
//! - State management (`State` wiring providers, vault, and resolver)
//! - Identity flows (create / update / recover sagas across the content
//!   store, pointer network, and registry ledger)

pub mod config;
pub mod flows;
pub mod state;

// Re-export key types for convenience
pub use config::{Config, ConfigError};
pub use flows::{
    CreateError, CreateReport, IdentityService, RecoverError, RotateError, StepStatus,
    UpdateError,
};
pub use state::{State, StateSetupError};
