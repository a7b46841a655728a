//! Guardrail configuration blocks and the guardrail record wire shape
//!
//! A guardrail bundles one configuration block per filter category. Blocks
//! are passive containers: enabled/disabled status, a response message, and a
//! list of typed filter entries. Consistency rules (an enabled block must
//! have entries, provider/connection pairing) are enforced by the validation
//! engine, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Filter categories a guardrail can carry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GuardrailConfigType {
    #[serde(rename = "CONTENT_MODERATION")]
    ContentModeration,
    #[serde(rename = "SENSITIVE_DATA")]
    SensitiveData,
    #[serde(rename = "OFF_TOPIC")]
    OffTopic,
    #[serde(rename = "DENIED_TERMS")]
    DeniedTerms,
    #[serde(rename = "PROMPT_SAFETY")]
    PromptSafety,
}

/// Enabled/disabled status of a configuration block (0|1 on the wire)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum BlockStatus {
    #[default]
    Disabled,
    Enabled,
}

impl TryFrom<u8> for BlockStatus {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(BlockStatus::Disabled),
            1 => Ok(BlockStatus::Enabled),
            other => Err(format!("Invalid block status: {}", other)),
        }
    }
}

impl From<BlockStatus> for u8 {
    fn from(status: BlockStatus) -> u8 {
        match status {
            BlockStatus::Disabled => 0,
            BlockStatus::Enabled => 1,
        }
    }
}

/// Filter strength levels used by moderation and prompt-safety entries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterStrength {
    None,
    Low,
    Medium,
    High,
}

/// Action taken when a sensitive-data filter matches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterAction {
    Allow,
    Deny,
    Redact,
}

/// Literal `"PROFANITY"` discriminant for denied-terms profanity entries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProfanityTag {
    #[serde(rename = "PROFANITY")]
    Profanity,
}

/// Literal `"regex"` discriminant for custom sensitive-data patterns
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RegexTag {
    #[serde(rename = "regex")]
    Regex,
}

/// One filter entry; the shape depends on the owning block's config type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterEntry {
    /// Denied-terms profanity toggle: `{type: "PROFANITY", value: bool}`
    Profanity {
        #[serde(rename = "type")]
        tag: ProfanityTag,
        value: bool,
    },
    /// Custom sensitive-data pattern: `{type: "regex", name, pattern, action}`
    RegexRule {
        #[serde(rename = "type")]
        tag: RegexTag,
        name: String,
        pattern: String,
        action: FilterAction,
    },
    /// Content-moderation category with per-direction strengths
    #[serde(rename_all = "camelCase")]
    ContentModeration {
        category: String,
        filter_strength_prompt: FilterStrength,
        filter_strength_response: FilterStrength,
        #[serde(skip_serializing_if = "Option::is_none")]
        custom_reply: Option<String>,
    },
    /// Prompt-safety category with a single strength
    #[serde(rename_all = "camelCase")]
    PromptSafety {
        category: String,
        filter_strength: FilterStrength,
    },
    /// Built-in sensitive-data category: `{category, action}`
    SensitiveCategory {
        category: String,
        action: FilterAction,
    },
    /// Off-topic definition
    #[serde(rename_all = "camelCase")]
    Topic {
        topic: String,
        definition: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        sample_phrases: Option<Vec<String>>,
    },
    /// Free-text denied term
    Term { term: String },
}

impl FilterEntry {
    pub fn profanity(enabled: bool) -> Self {
        FilterEntry::Profanity {
            tag: ProfanityTag::Profanity,
            value: enabled,
        }
    }

    pub fn term<S: Into<String>>(term: S) -> Self {
        FilterEntry::Term { term: term.into() }
    }

    pub fn is_profanity(&self) -> bool {
        matches!(self, FilterEntry::Profanity { .. })
    }

    /// Whether this entry is an enabled profanity toggle
    pub fn is_enabled_profanity(&self) -> bool {
        matches!(self, FilterEntry::Profanity { value: true, .. })
    }
}

/// Typed sub-configuration entries of one block
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigData {
    #[serde(default)]
    pub configs: Vec<FilterEntry>,
}

/// Fallback reply when a filter blocks a prompt or response
pub const DEFAULT_RESPONSE_MESSAGE: &str = "Sorry, the message violates our usage policy.";

/// One named configuration unit of a guardrail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailConfigBlock {
    pub config_type: GuardrailConfigType,
    /// 0 = disabled, 1 = enabled; disabled blocks never reach the save payload
    #[serde(default)]
    pub status: BlockStatus,
    pub response_message: String,
    pub config_data: ConfigData,
}

impl GuardrailConfigBlock {
    /// Default empty block, created the first time its owning step is visited
    pub fn new(config_type: GuardrailConfigType) -> Self {
        Self {
            config_type,
            status: BlockStatus::Disabled,
            response_message: DEFAULT_RESPONSE_MESSAGE.to_string(),
            config_data: ConfigData::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.status == BlockStatus::Enabled
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.config_data.configs
    }
}

/// Guardrail record as exchanged with the backing service
///
/// Optional fields are omitted from the serialized form when absent; an empty
/// description is never sent as an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardrail_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardrail_connection_name: Option<String>,
    #[serde(default)]
    pub guardrail_configs: Vec<GuardrailConfigBlock>,
    /// Keys of the AI applications this guardrail is linked to
    #[serde(default)]
    pub application_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl GuardrailRecord {
    /// Provider name, empty when unset
    pub fn provider_str(&self) -> &str {
        self.guardrail_provider.as_deref().unwrap_or("")
    }

    /// Look up the block for a filter category, if one was ever created
    pub fn block(&self, config_type: GuardrailConfigType) -> Option<&GuardrailConfigBlock> {
        self.guardrail_configs
            .iter()
            .find(|block| block.config_type == config_type)
    }

    /// Parse a record from its YAML form
    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Serialize the record to YAML for export
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_status_wire_form() {
        let block = GuardrailConfigBlock {
            status: BlockStatus::Enabled,
            ..GuardrailConfigBlock::new(GuardrailConfigType::SensitiveData)
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["status"], json!(1));
        assert_eq!(value["configType"], json!("SENSITIVE_DATA"));

        let invalid = serde_json::from_value::<BlockStatus>(json!(2));
        assert!(invalid.is_err());
    }

    #[test]
    fn test_filter_entry_wire_shapes() {
        let profanity: FilterEntry =
            serde_json::from_value(json!({"type": "PROFANITY", "value": true})).unwrap();
        assert!(profanity.is_enabled_profanity());

        let regex: FilterEntry = serde_json::from_value(json!({
            "type": "regex", "name": "ssn", "pattern": r"\d{3}-\d{2}-\d{4}", "action": "REDACT"
        }))
        .unwrap();
        assert!(matches!(regex, FilterEntry::RegexRule { .. }));

        let moderation: FilterEntry = serde_json::from_value(json!({
            "category": "HATE", "filterStrengthPrompt": "HIGH", "filterStrengthResponse": "MEDIUM"
        }))
        .unwrap();
        assert!(matches!(moderation, FilterEntry::ContentModeration { .. }));

        let category: FilterEntry =
            serde_json::from_value(json!({"category": "EMAIL", "action": "DENY"})).unwrap();
        assert!(matches!(category, FilterEntry::SensitiveCategory { .. }));

        let term: FilterEntry = serde_json::from_value(json!({"term": "codename"})).unwrap();
        assert!(matches!(term, FilterEntry::Term { .. }));
    }

    #[test]
    fn test_record_omits_absent_optionals() {
        let record = GuardrailRecord {
            name: "pii-shield".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("description"));
        assert!(!object.contains_key("guardrailProvider"));
        assert!(!object.contains_key("guardrailConnectionName"));
        assert!(!object.contains_key("id"));
    }

    #[test]
    fn test_record_yaml_round_trip() {
        let record = GuardrailRecord {
            name: "pii-shield".to_string(),
            description: Some("Blocks PII".to_string()),
            guardrail_provider: Some("AWS".to_string()),
            guardrail_connection_name: Some("prod-account".to_string()),
            guardrail_configs: vec![GuardrailConfigBlock {
                status: BlockStatus::Enabled,
                config_data: ConfigData {
                    configs: vec![FilterEntry::SensitiveCategory {
                        category: "EMAIL".to_string(),
                        action: FilterAction::Redact,
                    }],
                },
                ..GuardrailConfigBlock::new(GuardrailConfigType::SensitiveData)
            }],
            ..Default::default()
        };
        let yaml = record.to_yaml().unwrap();
        let parsed = GuardrailRecord::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, record);
    }
}
