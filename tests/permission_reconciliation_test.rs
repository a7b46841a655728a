//! Tests for permission reconciliation and restriction-row validation

use guardplane::permission::model::{PermissionPayload, Side};
use guardplane::permission::reconciler::{
    decode_for_display, encode_from_selection, ensure_any_selection, has_any_selection,
    to_wire_payload, SelectionBuckets,
};
use guardplane::permission::row::{classify_row, RestrictionRow, RowErrorKey, RowErrors};
use guardplane::permission::search::{PrincipalSearch, PrincipalSource, SearchOutcome};

mod reconciler_tests {
    use super::*;

    #[test]
    fn test_scenario_simple_user_and_group() {
        let buckets = encode_from_selection("users##__##alice,groups##__##eng").unwrap();
        assert_eq!(
            buckets,
            SelectionBuckets {
                users: vec!["alice".to_string()],
                groups: vec!["eng".to_string()],
                roles: vec![],
                others: vec![],
            }
        );
    }

    #[test]
    fn test_scenario_others_wins_over_user() {
        let buckets = encode_from_selection("others##__##Everyone,users##__##alice").unwrap();
        assert!(buckets.users.is_empty());
        assert!(buckets.roles.is_empty());
        assert!(buckets.others.is_empty());
        assert_eq!(buckets.groups, vec!["Everyone"]);

        let wire = to_wire_payload(&buckets, Side::Allow);
        assert_eq!(wire.groups, vec!["public"]);
    }

    #[test]
    fn test_public_payload_round_trip() {
        let payload = PermissionPayload {
            allowed_groups: vec!["public".to_string()],
            ..Default::default()
        };
        let raw = decode_for_display(&payload, Side::Allow)
            .iter()
            .map(|option| option.value.clone())
            .collect::<Vec<_>>()
            .join(",");
        let buckets = encode_from_selection(&raw).unwrap();
        let wire = to_wire_payload(&buckets, Side::Allow);

        assert_eq!(wire.users, payload.allowed_users);
        assert_eq!(wire.groups, payload.allowed_groups);
        assert_eq!(wire.roles, payload.allowed_roles);
    }

    #[test]
    fn test_concrete_selection_round_trip() {
        let payload = PermissionPayload {
            allowed_users: vec!["alice".to_string(), "bob".to_string()],
            allowed_groups: vec!["eng".to_string()],
            allowed_roles: vec!["admin".to_string()],
            ..Default::default()
        };
        let options = decode_for_display(&payload, Side::Allow);
        assert_eq!(options.len(), 4);
        assert_eq!(options[0].value, "users##__##alice");
        assert_eq!(options[3].value, "roles##__##admin");

        let raw = options
            .iter()
            .map(|option| option.value.clone())
            .collect::<Vec<_>>()
            .join(",");
        let wire = to_wire_payload(&encode_from_selection(&raw).unwrap(), Side::Allow);
        assert_eq!(wire.users, payload.allowed_users);
        assert_eq!(wire.groups, payload.allowed_groups);
        assert_eq!(wire.roles, payload.allowed_roles);
    }

    #[test]
    fn test_value_containing_comma_survives() {
        let buckets =
            encode_from_selection("groups##__##sales, emea,users##__##alice").unwrap();
        assert_eq!(buckets.groups, vec!["sales, emea"]);
        assert_eq!(buckets.users, vec!["alice"]);
    }

    #[test]
    fn test_duplicate_tokens_deduplicate() {
        let buckets =
            encode_from_selection("users##__##alice,users##__##alice,users##__##bob").unwrap();
        assert_eq!(buckets.users, vec!["alice", "bob"]);
    }

    #[test]
    fn test_save_precondition_message() {
        let payload = PermissionPayload::default();
        assert!(!has_any_selection(&payload));
        let err = ensure_any_selection(&payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Permission error: Please select at least one user or group"
        );

        let payload = PermissionPayload {
            denied_users: vec!["mallory".to_string()],
            ..Default::default()
        };
        assert!(has_any_selection(&payload));
    }
}

mod restriction_row_tests {
    use super::*;

    fn base_row() -> RestrictionRow {
        RestrictionRow::default()
    }

    #[test]
    fn test_empty_row_fails_both_checks() {
        let errors = classify_row(&base_row(), Side::Allow);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&RowErrorKey::RoleUserGroup(Side::Allow)));
        assert!(errors.contains(&RowErrorKey::MetadataKey));
    }

    #[test]
    fn test_request_type_never_compensates() {
        let mut row = base_row();
        row.request_types.push("enabled".to_string());
        let errors = classify_row(&row, Side::Allow);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_complete_row_passes() {
        let mut row = base_row();
        row.allow.roles.push("admin".to_string());
        row.metadata_key = Some("confidentiality".to_string());
        assert!(classify_row(&row, Side::Allow).is_empty());
    }

    #[test]
    fn test_error_map_clears_reactively_while_editing() {
        let mut errors = RowErrors::new();
        let mut row = base_row();
        assert!(!errors.record(&row, Side::Deny));
        assert_eq!(errors.len(), 2);

        row.deny.users.push("mallory".to_string());
        errors.refresh(&row, Side::Deny);
        assert!(errors.message(&RowErrorKey::RoleUserGroup(Side::Deny)).is_none());
        assert!(errors.message(&RowErrorKey::MetadataKey).is_some());

        row.metadata_key = Some("country".to_string());
        errors.refresh(&row, Side::Deny);
        assert!(errors.is_empty());
    }
}

mod search_tests {
    use super::*;
    use async_trait::async_trait;
    use guardplane::permission::reconciler::{SelectionOption, TokenType};

    struct NamedSource(Vec<&'static str>);

    #[async_trait]
    impl PrincipalSource for NamedSource {
        async fn lookup(&self, term: &str) -> guardplane::Result<Vec<SelectionOption>> {
            Ok(self
                .0
                .iter()
                .filter(|name| name.starts_with(term))
                .map(|name| SelectionOption::from_token(name, TokenType::Users))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_empty_term_never_queries_everything() {
        let search = PrincipalSearch::default();
        let outcome = search
            .search("row-0-allow", "", &NamedSource(vec!["alice"]))
            .await
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Options(Vec::new()));
    }

    #[tokio::test]
    async fn test_everyone_option_surfaces_without_matches() {
        let search = PrincipalSearch::default();
        let outcome = search
            .search("row-0-allow", "Every", &NamedSource(vec!["alice"]))
            .await
            .unwrap();
        match outcome {
            SearchOutcome::Options(options) => {
                assert_eq!(options.len(), 1);
                assert_eq!(options[0].label, "Everyone");
            }
            SearchOutcome::Superseded => panic!("single search cannot be superseded"),
        }
    }
}
