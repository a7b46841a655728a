//! Per-step validation for the guardrail wizard
//!
//! Routines run against the full guardrail record and return errors as data;
//! nothing here ever panics or returns `Err` for a failed check. Each run of
//! a step replaces only that step's error group, leaving other groups
//! untouched. Steps without a validation routine are always valid.

use ahash::AHashMap;
use tracing::debug;

use crate::guardrail::config::{GuardrailConfigType, GuardrailRecord};
use crate::guardrail::steps::{StepDefinition, StepId, StepValidation};

/// Inline message for a missing required field
pub const REQUIRED_MESSAGE: &str = "Required!";

/// Inline message for an over-long guardrail name
pub const NAME_TOO_LONG_MESSAGE: &str = "Max 64 characters allowed!";

/// Message for an enabled filter with no entries
pub const EMPTY_FILTER_MESSAGE: &str = "Please add at least one filter.";

/// Message for the denied-terms special case
pub const DENIED_TERMS_MESSAGE: &str =
    "Please add at least one denied term, or enable profanity filter.";

/// Longest accepted guardrail name
pub const MAX_NAME_LENGTH: usize = 64;

/// Errors for one step, keyed by field
pub type FieldErrors = AHashMap<&'static str, String>;

/// Result of running every validated step in the active sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRunReport {
    pub valid: bool,
    pub failed_steps: Vec<StepId>,
}

/// Runs step validation routines and accumulates per-step error groups
pub struct WizardValidationEngine {
    sequence: &'static [StepDefinition],
    errors: AHashMap<StepId, FieldErrors>,
}

impl WizardValidationEngine {
    pub fn new(sequence: &'static [StepDefinition]) -> Self {
        Self {
            sequence,
            errors: AHashMap::new(),
        }
    }

    /// Validate one step; returns `true` iff the step's error group is empty
    ///
    /// A step outside the active sequence, or without a validation routine,
    /// is always valid and leaves the error map untouched.
    pub fn run_step(&mut self, step_id: StepId, record: &GuardrailRecord) -> bool {
        let Some(step) = self.sequence.iter().find(|step| step.step == step_id) else {
            return true;
        };
        let Some(validation) = step.validation else {
            return true;
        };

        let group = run_routine(validation, record);
        let passed = group.is_empty();
        if passed {
            self.errors.remove(&step_id);
        } else {
            debug!(step = step_id.as_str(), fields = group.len(), "step failed validation");
            self.errors.insert(step_id, group);
        }
        passed
    }

    /// Validate every step in the active sequence that has a routine
    pub fn run_all(&mut self, record: &GuardrailRecord) -> StepRunReport {
        let step_ids: Vec<StepId> = self
            .sequence
            .iter()
            .filter(|step| step.validation.is_some())
            .map(|step| step.step)
            .collect();
        let failed_steps: Vec<StepId> = step_ids
            .into_iter()
            .filter(|step_id| !self.run_step(*step_id, record))
            .collect();
        StepRunReport {
            valid: failed_steps.is_empty(),
            failed_steps,
        }
    }

    /// Current error group for a step, if it failed its last run
    pub fn step_errors(&self, step_id: StepId) -> Option<&FieldErrors> {
        self.errors.get(&step_id)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Drop all cached error state (used when the provider sequence changes)
    pub fn reset(&mut self) {
        self.errors.clear();
    }
}

/// Dispatch one named validation routine
fn run_routine(validation: StepValidation, record: &GuardrailRecord) -> FieldErrors {
    match validation {
        StepValidation::BasicInfo => validate_basic_info(record),
        StepValidation::ContentModeration => {
            validate_filter_block(record, GuardrailConfigType::ContentModeration)
        }
        StepValidation::SensitiveData => {
            validate_filter_block(record, GuardrailConfigType::SensitiveData)
        }
        StepValidation::OffTopic => validate_filter_block(record, GuardrailConfigType::OffTopic),
        StepValidation::DeniedTerms => validate_denied_terms(record),
        StepValidation::PromptSafety => {
            validate_filter_block(record, GuardrailConfigType::PromptSafety)
        }
    }
}

/// Name is required and bounded; a provider requires a connection name
fn validate_basic_info(record: &GuardrailRecord) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let name = record.name.trim();
    if name.is_empty() {
        errors.insert("name", REQUIRED_MESSAGE.to_string());
    } else if name.chars().count() > MAX_NAME_LENGTH {
        errors.insert("name", NAME_TOO_LONG_MESSAGE.to_string());
    }

    let provider_set = !record.provider_str().is_empty();
    let connection_blank = record
        .guardrail_connection_name
        .as_deref()
        .map(|name| name.trim().is_empty())
        .unwrap_or(true);
    if provider_set && connection_blank {
        errors.insert("guardrailConnectionName", REQUIRED_MESSAGE.to_string());
    }
    errors
}

/// Shared contract for filter steps: a disabled or absent block cannot fail;
/// an enabled block must have at least one entry
fn validate_filter_block(record: &GuardrailRecord, config_type: GuardrailConfigType) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(block) = record.block(config_type) {
        if block.is_enabled() && block.entries().is_empty() {
            errors.insert("configs", EMPTY_FILTER_MESSAGE.to_string());
        }
    }
    errors
}

/// Denied-terms exception: an enabled profanity entry is a sufficient
/// configuration on its own, and so is any non-profanity term entry. A single
/// disabled profanity entry with nothing else fails.
fn validate_denied_terms(record: &GuardrailRecord) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(block) = record.block(GuardrailConfigType::DeniedTerms) {
        if block.is_enabled() {
            let profanity_enabled = block.entries().iter().any(|entry| entry.is_enabled_profanity());
            let has_terms = block.entries().iter().any(|entry| !entry.is_profanity());
            if !profanity_enabled && !has_terms {
                errors.insert("configs", DENIED_TERMS_MESSAGE.to_string());
            }
        }
    }
    errors
}
