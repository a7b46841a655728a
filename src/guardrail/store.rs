//! Session store for one guardrail being created or edited
//!
//! The store owns the record for the duration of a wizard session, keeps a
//! "last known good" snapshot for unsaved-change detection, and emits an
//! explicit change event after each mutating operation. Callers needing
//! reactivity subscribe to that event; there is no implicit property
//! interception.

use tracing::debug;

use crate::guardrail::config::{GuardrailConfigBlock, GuardrailConfigType, GuardrailRecord};

/// What part of the record a mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    BasicInfo,
    Provider,
    Block(GuardrailConfigType),
    ApplicationKeys,
}

type ChangeListener = Box<dyn Fn(ChangeKind) + Send + Sync>;

/// Owns the full set of config blocks plus top-level guardrail metadata
pub struct GuardrailConfigStore {
    record: GuardrailRecord,
    snapshot: GuardrailRecord,
    listeners: Vec<ChangeListener>,
}

impl GuardrailConfigStore {
    /// Start a session from a server-provided record (edit) or a blank one (create)
    pub fn new(record: GuardrailRecord) -> Self {
        let snapshot = record.clone();
        Self {
            record,
            snapshot,
            listeners: Vec::new(),
        }
    }

    pub fn data(&self) -> &GuardrailRecord {
        &self.record
    }

    /// Register a listener fired after each mutating operation
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(ChangeKind) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.record.name = name.into();
        self.notify(ChangeKind::BasicInfo);
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.record.description = description;
        self.notify(ChangeKind::BasicInfo);
    }

    /// Assign a provider; the wizard layer reacts by capturing a fresh step sequence
    pub fn set_provider(&mut self, provider: Option<String>) {
        debug!(provider = provider.as_deref().unwrap_or(""), "provider changed");
        self.record.guardrail_provider = provider;
        self.notify(ChangeKind::Provider);
    }

    pub fn set_connection_name(&mut self, connection_name: Option<String>) {
        self.record.guardrail_connection_name = connection_name;
        self.notify(ChangeKind::BasicInfo);
    }

    pub fn set_application_keys(&mut self, keys: Vec<String>) {
        self.record.application_keys = keys;
        self.notify(ChangeKind::ApplicationKeys);
    }

    /// Create the default empty block for a category if it does not exist yet
    ///
    /// Called when the owning step is first visited.
    pub fn ensure_block(&mut self, config_type: GuardrailConfigType) {
        if self.record.block(config_type).is_none() {
            self.record
                .guardrail_configs
                .push(GuardrailConfigBlock::new(config_type));
            self.notify(ChangeKind::Block(config_type));
        }
    }

    /// Mutate one block through a per-filter editor, then emit the change event
    pub fn update_block<F>(&mut self, config_type: GuardrailConfigType, editor: F)
    where
        F: FnOnce(&mut GuardrailConfigBlock),
    {
        self.ensure_block(config_type);
        if let Some(block) = self
            .record
            .guardrail_configs
            .iter_mut()
            .find(|block| block.config_type == config_type)
        {
            editor(block);
            self.notify(ChangeKind::Block(config_type));
        }
    }

    /// Whether the record differs from the last saved snapshot
    pub fn has_unsaved_changes(&self) -> bool {
        self.record != self.snapshot
    }

    /// Refresh the snapshot after a successful save
    pub fn mark_saved(&mut self) {
        self.snapshot = self.record.clone();
    }

    fn notify(&self, kind: ChangeKind) {
        for listener in &self.listeners {
            listener(kind);
        }
    }
}
