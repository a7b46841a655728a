//! Provider-indexed wizard step tables
//!
//! The sequence of wizard steps depends on the selected guardrail provider.
//! Tables are static and never mutated; a session captures its sequence once
//! at start, and a provider change assigns a fresh sequence rather than
//! editing the active one.

use once_cell::sync::Lazy;

use crate::guardrail::config::GuardrailConfigType;

/// Provider name whose guardrails carry the full filter set
pub const PROVIDER_AWS: &str = "AWS";

/// Stable identifier of one wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    BasicInformation,
    ContentModerationFilters,
    SensitiveDataFilters,
    OffTopicFilters,
    DeniedTermsFilters,
    PromptSafetyFilters,
    Review,
    TestGuardrail,
    ConnectAccounts,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::BasicInformation => "BASIC_INFORMATION",
            StepId::ContentModerationFilters => "CONTENT_MODERATION_FILTERS",
            StepId::SensitiveDataFilters => "SENSITIVE_DATA_FILTERS",
            StepId::OffTopicFilters => "OFF_TOPIC_FILTERS",
            StepId::DeniedTermsFilters => "DENIED_TERMS_FILTERS",
            StepId::PromptSafetyFilters => "PROMPT_SAFETY_FILTERS",
            StepId::Review => "REVIEW",
            StepId::TestGuardrail => "TEST_GUARDRAIL",
            StepId::ConnectAccounts => "CONNECT_ACCOUNTS",
        }
    }
}

/// Validation routine a step runs against the guardrail record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepValidation {
    BasicInfo,
    ContentModeration,
    SensitiveData,
    OffTopic,
    DeniedTerms,
    PromptSafety,
}

/// One wizard step: title, optional owned config block, validation routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub step: StepId,
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Config block this step edits, if any
    pub config_type: Option<GuardrailConfigType>,
    /// Validation routine; steps without one are always valid
    pub validation: Option<StepValidation>,
}

impl StepDefinition {
    const fn new(
        step: StepId,
        title: &'static str,
        subtitle: &'static str,
        config_type: Option<GuardrailConfigType>,
        validation: Option<StepValidation>,
    ) -> Self {
        Self {
            step,
            title,
            subtitle,
            config_type,
            validation,
        }
    }
}

static AWS_STEPS: Lazy<Vec<StepDefinition>> = Lazy::new(|| {
    vec![
        StepDefinition::new(
            StepId::BasicInformation,
            "Basic Information",
            "Name the guardrail and pick its provider",
            None,
            Some(StepValidation::BasicInfo),
        ),
        StepDefinition::new(
            StepId::ContentModerationFilters,
            "Content Moderation",
            "Block harmful categories in prompts and responses",
            Some(GuardrailConfigType::ContentModeration),
            Some(StepValidation::ContentModeration),
        ),
        StepDefinition::new(
            StepId::SensitiveDataFilters,
            "Sensitive Data Filters",
            "Redact or deny sensitive data elements",
            Some(GuardrailConfigType::SensitiveData),
            Some(StepValidation::SensitiveData),
        ),
        StepDefinition::new(
            StepId::OffTopicFilters,
            "Off-topic Filters",
            "Keep conversations on approved topics",
            Some(GuardrailConfigType::OffTopic),
            Some(StepValidation::OffTopic),
        ),
        StepDefinition::new(
            StepId::DeniedTermsFilters,
            "Denied Terms",
            "Block profanity and specific words or phrases",
            Some(GuardrailConfigType::DeniedTerms),
            Some(StepValidation::DeniedTerms),
        ),
        StepDefinition::new(
            StepId::PromptSafetyFilters,
            "Prompt Safety",
            "Detect prompt attacks and jailbreak attempts",
            Some(GuardrailConfigType::PromptSafety),
            Some(StepValidation::PromptSafety),
        ),
        StepDefinition::new(
            StepId::Review,
            "Review",
            "Review the guardrail before saving",
            None,
            None,
        ),
        StepDefinition::new(
            StepId::TestGuardrail,
            "Test Guardrail",
            "Try the guardrail against sample prompts",
            None,
            None,
        ),
        StepDefinition::new(
            StepId::ConnectAccounts,
            "Connected Applications",
            "Link AI applications to this guardrail",
            None,
            None,
        ),
    ]
});

static DEFAULT_STEPS: Lazy<Vec<StepDefinition>> = Lazy::new(|| {
    vec![
        StepDefinition::new(
            StepId::BasicInformation,
            "Basic Information",
            "Name the guardrail and pick its provider",
            None,
            Some(StepValidation::BasicInfo),
        ),
        StepDefinition::new(
            StepId::SensitiveDataFilters,
            "Sensitive Data Filters",
            "Redact or deny sensitive data elements",
            Some(GuardrailConfigType::SensitiveData),
            Some(StepValidation::SensitiveData),
        ),
        StepDefinition::new(
            StepId::Review,
            "Review",
            "Review the guardrail before saving",
            None,
            None,
        ),
        StepDefinition::new(
            StepId::TestGuardrail,
            "Test Guardrail",
            "Try the guardrail against sample prompts",
            None,
            None,
        ),
        StepDefinition::new(
            StepId::ConnectAccounts,
            "Connected Applications",
            "Link AI applications to this guardrail",
            None,
            None,
        ),
    ]
});

/// Ordered step sequence for a provider
///
/// Unknown or empty providers fall back to the default sequence. Callers must
/// capture the returned slice once per session; the tables themselves are
/// immutable.
pub fn steps_for_provider(provider: &str) -> &'static [StepDefinition] {
    match provider {
        PROVIDER_AWS => &AWS_STEPS,
        _ => &DEFAULT_STEPS,
    }
}
