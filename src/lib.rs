//! Guardplane - policy and guardrail configuration engine
//!
//! This crate provides the core logic of an administrative console for AI
//! application governance: reconciliation of allow/deny permission lists
//! (including the "Everyone"/"Others" pseudo-groups) into canonical payloads,
//! and a provider-dependent multi-step wizard for configuring content-safety
//! guardrails with per-step validation and save-payload reduction.
//!
//! Data fetching, rendering, routing, and session handling are external
//! collaborators; this crate only consumes and produces plain data records at
//! those boundaries.

pub mod error;
pub mod guardrail;
pub mod permission;

pub use error::{ConsoleError, Result};
pub use guardrail::{
    build_save_payload, steps_for_provider, BlockStatus, FilterEntry, GuardrailConfigBlock,
    GuardrailConfigStore, GuardrailConfigType, GuardrailRecord, StepDefinition, StepId,
    WizardController, WizardValidationEngine,
};
pub use permission::{
    decode_for_display, encode_from_selection, has_any_selection, to_wire_payload,
    PermissionPayload, PermissionSet, PrincipalSearch, PrincipalSource, PseudoGroup,
    RestrictionRow, Side,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display label for the allow-side pseudo-group
pub const EVERYONE: &str = permission::model::EVERYONE_LABEL;

/// Wire-level sentinel for "all principals"
pub const PUBLIC: &str = permission::model::PUBLIC_SENTINEL;
