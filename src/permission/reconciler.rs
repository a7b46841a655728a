//! Permission reconciliation between wire payloads and picker selection tokens
//!
//! The combined users/groups/roles picker transports its selections as
//! `"<type>##__##<value>"` tokens joined with commas. This module converts
//! between that transport, the canonical [`PermissionSet`], and the wire
//! payload with its `"public"` sentinel. The token format is never persisted.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{ConsoleError, Result};
use crate::permission::model::{
    dedup_preserving_order, PermissionPayload, PseudoGroup, Side, PUBLIC_SENTINEL,
};

/// Delimiter between a token's type tag and its value
pub const TOKEN_DELIMITER: &str = "##__##";

/// Matches a valid token head (`users##__##`, `groups##__##`, ...)
///
/// Used to decide which commas are token boundaries: values may themselves
/// contain commas, so the concatenated string is only split on commas that
/// are immediately followed by a token head.
static TOKEN_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(users|groups|roles|others)##__##").expect("valid token head regex"));

/// Bucket tag for one picker selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Users,
    Groups,
    Roles,
    /// Pseudo-selection covering every principal not otherwise listed
    Others,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Users => "users",
            TokenType::Groups => "groups",
            TokenType::Roles => "roles",
            TokenType::Others => "others",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "users" => Some(TokenType::Users),
            "groups" => Some(TokenType::Groups),
            "roles" => Some(TokenType::Roles),
            "others" => Some(TokenType::Others),
            _ => None,
        }
    }
}

/// One tagged selection from the combined picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionToken {
    pub token_type: TokenType,
    pub value: String,
}

impl SelectionToken {
    pub fn new<S: Into<String>>(token_type: TokenType, value: S) -> Self {
        Self {
            token_type,
            value: value.into(),
        }
    }

    /// Encode to the picker transport form
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.token_type.as_str(), TOKEN_DELIMITER, self.value)
    }

    /// Decode a single token, splitting on the first delimiter only
    pub fn decode(token: &str) -> Result<Self> {
        let (tag, value) = token.split_once(TOKEN_DELIMITER).ok_or_else(|| {
            ConsoleError::permission(format!("Malformed selection token: {}", token))
        })?;
        let token_type = TokenType::parse(tag).ok_or_else(|| {
            ConsoleError::permission(format!("Unknown selection token type: {}", tag))
        })?;
        Ok(Self::new(token_type, value))
    }
}

/// One `{label, value}` entry for the picker's option/selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOption {
    /// Text shown to the user
    pub label: String,
    /// Encoded selection token
    pub value: String,
}

impl SelectionOption {
    pub fn from_token(label: &str, token_type: TokenType) -> Self {
        Self {
            label: label.to_string(),
            value: SelectionToken::new(token_type, label).encode(),
        }
    }
}

/// Buckets recovered from a concatenated token string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionBuckets {
    pub users: Vec<String>,
    pub groups: Vec<String>,
    pub roles: Vec<String>,
    pub others: Vec<String>,
}

/// One side of the wire payload, ready to merge into a policy record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireSide {
    pub users: Vec<String>,
    pub groups: Vec<String>,
    pub roles: Vec<String>,
}

/// Split a concatenated token string into individual tokens
///
/// Splits only on commas immediately followed by a valid token head, so
/// values containing commas survive intact.
pub fn split_tokens(raw: &str) -> Vec<&str> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut tokens = Vec::new();
    let mut start = 0usize;
    for (idx, _) in raw.match_indices(',') {
        if TOKEN_HEAD.is_match(&raw[idx + 1..]) {
            tokens.push(&raw[start..idx]);
            start = idx + 1;
        }
    }
    tokens.push(&raw[start..]);
    tokens
}

/// Decode one side of a permission payload into picker display entries
///
/// Emission order: users, then groups, then roles, then one synthetic
/// `others` entry when the side resolves to a pseudo-group. Entries are
/// deduplicated by exact token equality before emission.
pub fn decode_for_display(payload: &PermissionPayload, side: Side) -> Vec<SelectionOption> {
    let set = payload.side(side);
    let mut options = Vec::new();
    for user in &set.users {
        options.push(SelectionOption::from_token(user, TokenType::Users));
    }
    for group in &set.groups {
        options.push(SelectionOption::from_token(group, TokenType::Groups));
    }
    for role in &set.roles {
        options.push(SelectionOption::from_token(role, TokenType::Roles));
    }
    if let Some(label) = set.pseudo_group.label() {
        options.push(SelectionOption::from_token(label, TokenType::Others));
    }

    let mut seen = ahash::AHashSet::with_capacity(options.len());
    options.retain(|option| seen.insert(option.value.clone()));
    options
}

/// Recover selection buckets from a concatenated token string
///
/// When the `others` bucket is non-empty it is treated as "select all" and
/// REPLACES the explicit selections: users and roles are reset, `groups`
/// becomes the others contents, and `others` is drained. Partial retention
/// (e.g. keeping roles) is deliberately not attempted.
pub fn encode_from_selection(raw: &str) -> Result<SelectionBuckets> {
    let mut buckets = SelectionBuckets::default();
    for token in split_tokens(raw) {
        if token.is_empty() {
            continue;
        }
        let parsed = SelectionToken::decode(token)?;
        let bucket = match parsed.token_type {
            TokenType::Users => &mut buckets.users,
            TokenType::Groups => &mut buckets.groups,
            TokenType::Roles => &mut buckets.roles,
            TokenType::Others => &mut buckets.others,
        };
        bucket.push(parsed.value);
    }

    if !buckets.others.is_empty() {
        debug!(
            dropped_users = buckets.users.len(),
            dropped_groups = buckets.groups.len(),
            dropped_roles = buckets.roles.len(),
            "others selection overrides explicit principals"
        );
        buckets.groups = std::mem::take(&mut buckets.others);
        buckets.users.clear();
        buckets.roles.clear();
    }

    buckets.users = dedup_preserving_order(&buckets.users);
    buckets.groups = dedup_preserving_order(&buckets.groups);
    buckets.roles = dedup_preserving_order(&buckets.roles);
    Ok(buckets)
}

/// Encode selection buckets to the wire shape for one payload side
///
/// A single-element `groups` of `"Everyone"` or `"Others"` is rewritten to
/// the `"public"` sentinel; anything else passes through unchanged.
pub fn to_wire_payload(buckets: &SelectionBuckets, side: Side) -> WireSide {
    let mut groups = buckets.groups.clone();
    if groups.len() == 1 && !PseudoGroup::from_label(&groups[0]).is_none() {
        debug!(side = side.key_prefix(), "encoding pseudo-group as public sentinel");
        groups = vec![PUBLIC_SENTINEL.to_string()];
    }
    WireSide {
        users: buckets.users.clone(),
        groups,
        roles: buckets.roles.clone(),
    }
}

/// Whether the payload selects at least one user or group on either side
///
/// Roles alone do not satisfy the save precondition.
pub fn has_any_selection(payload: &PermissionPayload) -> bool {
    !payload.allowed_users.is_empty()
        || !payload.allowed_groups.is_empty()
        || !payload.denied_users.is_empty()
        || !payload.denied_groups.is_empty()
}

/// Save precondition: a policy without any user or group selection is
/// rejected with a one-shot notification message rather than a field error
pub fn ensure_any_selection(payload: &PermissionPayload) -> Result<()> {
    if has_any_selection(payload) {
        Ok(())
    } else {
        Err(ConsoleError::permission(
            "Please select at least one user or group",
        ))
    }
}
