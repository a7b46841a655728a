//! Guardrail module for Guardplane
//!
//! This module provides the content-safety side of the console engine:
//! - Typed guardrail configuration blocks and the guardrail record wire shape
//! - The session store with snapshot-based change detection
//! - Provider-indexed wizard step tables
//! - The per-step validation engine and the wizard controller

pub mod config;
pub mod steps;
pub mod store;
pub mod validation;
pub mod wizard;

// Re-export specific types to avoid conflicts
pub use config::{
    BlockStatus, ConfigData, FilterAction, FilterEntry, FilterStrength, GuardrailConfigBlock,
    GuardrailConfigType, GuardrailRecord,
};
pub use steps::{steps_for_provider, StepDefinition, StepId, StepValidation, PROVIDER_AWS};
pub use store::{ChangeKind, GuardrailConfigStore};
pub use validation::{StepRunReport, WizardValidationEngine};
pub use wizard::{build_save_payload, WizardController};
