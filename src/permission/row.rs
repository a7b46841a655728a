//! Content-restriction row validation
//!
//! A restriction row pairs allow/deny permission sets with an optional
//! metadata-key selector and a request-type selection. Errors are kept in a
//! reactive map keyed by field: a key clears the moment its condition is
//! satisfied again, rather than only on submit.

use ahash::AHashMap;

use crate::permission::model::{PermissionSet, Side};

/// Inline message for a missing required field
pub const REQUIRED_MESSAGE: &str = "Required!";

/// Error field keys a restriction row can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowErrorKey {
    /// No user, group, role, or pseudo-group selected on the given side
    RoleUserGroup(Side),
    /// No metadata key selected
    MetadataKey,
}

impl RowErrorKey {
    /// Stable string form used by the rendering layer
    pub fn as_key(&self) -> String {
        match self {
            RowErrorKey::RoleUserGroup(side) => format!("{}_role_user_group", side.key_prefix()),
            RowErrorKey::MetadataKey => "meta_data".to_string(),
        }
    }
}

/// One access-restriction row (metadata rule or content-tag rule)
#[derive(Debug, Clone, Default)]
pub struct RestrictionRow {
    pub allow: PermissionSet,
    pub deny: PermissionSet,
    /// "Apply to metadata key" selector
    pub metadata_key: Option<String>,
    pub metadata_value: Option<String>,
    /// Request types this rule applies to
    pub request_types: Vec<String>,
}

impl RestrictionRow {
    fn side(&self, side: Side) -> &PermissionSet {
        match side {
            Side::Allow => &self.allow,
            Side::Deny => &self.deny,
        }
    }

    fn has_metadata_key(&self) -> bool {
        self.metadata_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Classify one row against the restriction decision table
///
/// Predicates: any principal selected on `side`, metadata key set, request
/// type selected. A selected request type never compensates for a missing
/// principal or metadata key; a row passes only with both a principal
/// selection and a metadata key.
pub fn classify_row(row: &RestrictionRow, side: Side) -> Vec<RowErrorKey> {
    let any_selection = row.side(side).has_principal();
    let metadata_key_set = row.has_metadata_key();

    let mut errors = Vec::new();
    if !any_selection {
        errors.push(RowErrorKey::RoleUserGroup(side));
    }
    if !metadata_key_set {
        errors.push(RowErrorKey::MetadataKey);
    }
    errors
}

/// Reactive error map for one editing row
///
/// `record` captures failures from a classification pass; `refresh` clears
/// every key whose condition has since been satisfied, leaving stale messages
/// only for conditions that still fail.
#[derive(Debug, Default, Clone)]
pub struct RowErrors {
    errors: AHashMap<String, String>,
}

impl RowErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run classification and store a message per failing key
    pub fn record(&mut self, row: &RestrictionRow, side: Side) -> bool {
        let failing = classify_row(row, side);
        for key in &failing {
            self.errors.insert(key.as_key(), REQUIRED_MESSAGE.to_string());
        }
        failing.is_empty()
    }

    /// Clear any key whose condition is now satisfied
    pub fn refresh(&mut self, row: &RestrictionRow, side: Side) {
        let still_failing: Vec<String> = classify_row(row, side)
            .iter()
            .map(RowErrorKey::as_key)
            .collect();
        self.errors.retain(|key, _| still_failing.contains(key));
    }

    pub fn message(&self, key: &RowErrorKey) -> Option<&str> {
        self.errors.get(&key.as_key()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}
