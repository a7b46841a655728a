//! Canonical permission-set model with pseudo-group resolution
//!
//! The wire format overloads the `groups` array with the sentinel `"public"`
//! to mean "all principals". Internally that sentinel is lifted into an
//! explicit [`PseudoGroup`] tag so the rest of the engine never compares
//! magic strings; encoding and decoding happen only at the payload boundary.

use serde::{Deserialize, Serialize};

/// Wire-level sentinel for "all principals"
pub const PUBLIC_SENTINEL: &str = "public";

/// Display label for the allow-side pseudo-group
pub const EVERYONE_LABEL: &str = "Everyone";

/// Display label for the deny-side pseudo-group
pub const OTHERS_LABEL: &str = "Others";

/// Which side of a policy a permission set belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Allow,
    Deny,
}

impl Side {
    /// Display form of the pseudo-group for this side
    pub fn pseudo_label(&self) -> &'static str {
        match self {
            Side::Allow => EVERYONE_LABEL,
            Side::Deny => OTHERS_LABEL,
        }
    }

    /// Key prefix used for row-level error fields (`allow_role_user_group`)
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Side::Allow => "allow",
            Side::Deny => "deny",
        }
    }
}

/// Explicit tag for the `"public"` sentinel
///
/// `Everyone` is the allow-side display form; `Others` is produced only for
/// read-only rendering of a deny-side group list. Both re-encode to
/// `"public"` on save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PseudoGroup {
    Everyone,
    Others,
    #[default]
    None,
}

impl PseudoGroup {
    /// Display label, if any
    pub fn label(&self) -> Option<&'static str> {
        match self {
            PseudoGroup::Everyone => Some(EVERYONE_LABEL),
            PseudoGroup::Others => Some(OTHERS_LABEL),
            PseudoGroup::None => None,
        }
    }

    /// Map a display label back to its tag
    pub fn from_label(label: &str) -> Self {
        match label {
            EVERYONE_LABEL => PseudoGroup::Everyone,
            OTHERS_LABEL => PseudoGroup::Others,
            _ => PseudoGroup::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, PseudoGroup::None)
    }
}

/// Canonical allow/deny access rule over users, groups, and roles
///
/// Invariant: when `pseudo_group` is set, `users` and `groups` are empty; the
/// pseudo-group stands in for the whole `groups` bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionSet {
    /// Individual user names, insertion-ordered, deduplicated
    pub users: Vec<String>,
    /// Concrete group names (never contains a pseudo-group label)
    pub groups: Vec<String>,
    /// Role names
    pub roles: Vec<String>,
    /// Pseudo-group resolution for the `"public"` sentinel
    pub pseudo_group: PseudoGroup,
}

impl PermissionSet {
    /// Decode one side of a wire payload, lifting the `"public"` sentinel
    ///
    /// The sentinel is recognized only when `groups` is exactly `["public"]`
    /// and no individual users are present; any other occurrence is passed
    /// through as a literal group name.
    pub fn from_wire(users: &[String], groups: &[String], roles: &[String], side: Side) -> Self {
        let is_public = groups.len() == 1 && groups[0] == PUBLIC_SENTINEL && users.is_empty();
        let pseudo_group = if is_public {
            match side {
                Side::Allow => PseudoGroup::Everyone,
                Side::Deny => PseudoGroup::Others,
            }
        } else {
            PseudoGroup::None
        };
        Self {
            users: dedup_preserving_order(users),
            groups: if is_public {
                Vec::new()
            } else {
                dedup_preserving_order(groups)
            },
            roles: dedup_preserving_order(roles),
            pseudo_group,
        }
    }

    /// True when nothing at all is selected on this side
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.groups.is_empty()
            && self.roles.is_empty()
            && self.pseudo_group.is_none()
    }

    /// True when at least one user, group, role, or pseudo-group is present
    pub fn has_principal(&self) -> bool {
        !self.is_empty()
    }

    /// Per-bucket counts for display
    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            users: self.users.len(),
            groups: self.groups.len() + usize::from(!self.pseudo_group.is_none()),
            roles: self.roles.len(),
            everyone: !self.pseudo_group.is_none(),
        }
    }
}

/// Small statistics summary of a permission set, for display
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SelectionSummary {
    pub users: usize,
    pub groups: usize,
    pub roles: usize,
    /// Whether the groups count includes a pseudo-group
    pub everyone: bool,
}

/// Permission payload as read from / written to a policy record
///
/// Any `*_groups` array may contain the `"public"` sentinel on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPayload {
    #[serde(default)]
    pub allowed_users: Vec<String>,
    #[serde(default)]
    pub allowed_groups: Vec<String>,
    #[serde(default)]
    pub allowed_roles: Vec<String>,
    #[serde(default)]
    pub denied_users: Vec<String>,
    #[serde(default)]
    pub denied_groups: Vec<String>,
    #[serde(default)]
    pub denied_roles: Vec<String>,
}

impl PermissionPayload {
    /// Decode the requested side into a canonical permission set
    pub fn side(&self, side: Side) -> PermissionSet {
        match side {
            Side::Allow => PermissionSet::from_wire(
                &self.allowed_users,
                &self.allowed_groups,
                &self.allowed_roles,
                side,
            ),
            Side::Deny => PermissionSet::from_wire(
                &self.denied_users,
                &self.denied_groups,
                &self.denied_roles,
                side,
            ),
        }
    }
}

/// Deduplicate by exact string equality, keeping first occurrence order
pub(crate) fn dedup_preserving_order(items: &[String]) -> Vec<String> {
    let mut seen = ahash::AHashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(item.as_str().to_owned()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_sentinel_decodes_per_side() {
        let groups = vec![PUBLIC_SENTINEL.to_string()];
        let allow = PermissionSet::from_wire(&[], &groups, &[], Side::Allow);
        assert_eq!(allow.pseudo_group, PseudoGroup::Everyone);
        assert!(allow.groups.is_empty());

        let deny = PermissionSet::from_wire(&[], &groups, &[], Side::Deny);
        assert_eq!(deny.pseudo_group, PseudoGroup::Others);
    }

    #[test]
    fn test_public_with_users_is_literal() {
        // A user alongside "public" disqualifies the sentinel reading
        let users = vec!["alice".to_string()];
        let groups = vec![PUBLIC_SENTINEL.to_string()];
        let set = PermissionSet::from_wire(&users, &groups, &[], Side::Allow);
        assert_eq!(set.pseudo_group, PseudoGroup::None);
        assert_eq!(set.groups, vec![PUBLIC_SENTINEL.to_string()]);
    }

    #[test]
    fn test_dedup_preserves_order() {
        let items = vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ];
        assert_eq!(dedup_preserving_order(&items), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_summary_counts_pseudo_group() {
        let set = PermissionSet::from_wire(
            &[],
            &[PUBLIC_SENTINEL.to_string()],
            &["admin".to_string()],
            Side::Allow,
        );
        let summary = set.summary();
        assert_eq!(summary.groups, 1);
        assert_eq!(summary.roles, 1);
        assert!(summary.everyone);
    }
}
