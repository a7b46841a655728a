//! Wizard orchestration: navigation, provider sequences, and the save payload
//!
//! The controller captures its step sequence once at session start. Steps are
//! not sequential gates: any step may be jumped to at any time, and only the
//! finish action requires every validated step to pass. A provider change
//! assigns a fresh sequence and drops cached validation state.

use tracing::{debug, info};

use crate::error::{ConsoleError, Result};
use crate::guardrail::config::{BlockStatus, GuardrailRecord};
use crate::guardrail::steps::{steps_for_provider, StepDefinition, StepId};
use crate::guardrail::store::GuardrailConfigStore;
use crate::guardrail::validation::{StepRunReport, WizardValidationEngine};

/// Produce the exact payload sent to the backing service
///
/// Pure and side-effect free: works on a clone of the record so retried saves
/// recompute cleanly from current state.
/// 1. Empty provider drops both provider and connection name.
/// 2. Empty description is omitted rather than sent as "".
/// 3. Disabled blocks are dropped.
/// 4. With a known active sequence, blocks whose category has no step in that
///    sequence are dropped too, so a filter configured under a previously
///    selected provider never leaks into a save for a different one.
pub fn build_save_payload(
    record: &GuardrailRecord,
    active_sequence: Option<&[StepDefinition]>,
) -> GuardrailRecord {
    let mut payload = record.clone();

    if payload.provider_str().is_empty() {
        payload.guardrail_provider = None;
        payload.guardrail_connection_name = None;
    }
    if payload
        .description
        .as_deref()
        .map(str::is_empty)
        .unwrap_or(false)
    {
        payload.description = None;
    }

    payload
        .guardrail_configs
        .retain(|block| block.status == BlockStatus::Enabled);

    if let Some(sequence) = active_sequence {
        payload.guardrail_configs.retain(|block| {
            sequence
                .iter()
                .any(|step| step.config_type == Some(block.config_type))
        });
    }

    debug!(
        blocks = payload.guardrail_configs.len(),
        provider = payload.provider_str(),
        "built save payload"
    );
    payload
}

/// Orchestrates one wizard session over a guardrail store
pub struct WizardController {
    store: GuardrailConfigStore,
    sequence: &'static [StepDefinition],
    engine: WizardValidationEngine,
    active: usize,
}

impl WizardController {
    /// Start a session; the step sequence is captured from the record's provider
    pub fn new(record: GuardrailRecord) -> Self {
        let sequence = steps_for_provider(record.provider_str());
        Self {
            store: GuardrailConfigStore::new(record),
            sequence,
            engine: WizardValidationEngine::new(sequence),
            active: 0,
        }
    }

    pub fn store(&self) -> &GuardrailConfigStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GuardrailConfigStore {
        &mut self.store
    }

    pub fn sequence(&self) -> &'static [StepDefinition] {
        self.sequence
    }

    pub fn active_step(&self) -> &StepDefinition {
        &self.sequence[self.active]
    }

    /// Change the provider: assign a fresh sequence and reset validation state
    ///
    /// The previous sequence is never edited in place, and the session returns
    /// to the first step (the provider is chosen there).
    pub fn set_provider(&mut self, provider: Option<String>) {
        self.store.set_provider(provider);
        self.sequence = steps_for_provider(self.store.data().provider_str());
        self.engine = WizardValidationEngine::new(self.sequence);
        self.active = 0;
        info!(
            provider = self.store.data().provider_str(),
            steps = self.sequence.len(),
            "captured fresh step sequence"
        );
    }

    /// Jump to any step in the active sequence
    ///
    /// Visiting a step that owns a config block lazily creates its default
    /// empty block.
    pub fn go_to(&mut self, step_id: StepId) -> Result<()> {
        let index = self
            .sequence
            .iter()
            .position(|step| step.step == step_id)
            .ok_or_else(|| {
                ConsoleError::wizard(format!(
                    "Step {} is not part of the active sequence",
                    step_id.as_str()
                ))
            })?;
        self.active = index;
        if let Some(config_type) = self.sequence[index].config_type {
            self.store.ensure_block(config_type);
        }
        Ok(())
    }

    pub fn next(&mut self) -> Result<()> {
        if self.active + 1 >= self.sequence.len() {
            return Err(ConsoleError::wizard("Already at the last step"));
        }
        let step_id = self.sequence[self.active + 1].step;
        self.go_to(step_id)
    }

    pub fn back(&mut self) -> Result<()> {
        if self.active == 0 {
            return Err(ConsoleError::wizard("Already at the first step"));
        }
        let step_id = self.sequence[self.active - 1].step;
        self.go_to(step_id)
    }

    /// Re-validate the currently active step
    pub fn run_active_step(&mut self) -> bool {
        let step_id = self.active_step().step;
        self.engine.run_step(step_id, self.store.data())
    }

    /// Validate every step in the sequence
    pub fn run_all(&mut self) -> StepRunReport {
        self.engine.run_all(self.store.data())
    }

    pub fn engine(&self) -> &WizardValidationEngine {
        &self.engine
    }

    /// Finish the session: all validated steps must pass
    ///
    /// On success returns the reduced save payload; the caller's save flow is
    /// responsible for calling `store_mut().mark_saved()` once persistence
    /// succeeds.
    pub fn finish(&mut self) -> Result<GuardrailRecord> {
        let report = self.run_all();
        if !report.valid {
            let failed: Vec<&str> = report.failed_steps.iter().map(StepId::as_str).collect();
            return Err(ConsoleError::validation(format!(
                "Cannot save guardrail, failing steps: {}",
                failed.join(", ")
            )));
        }
        Ok(build_save_payload(self.store.data(), Some(self.sequence)))
    }
}
