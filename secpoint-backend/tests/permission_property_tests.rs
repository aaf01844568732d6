// secpoint-backend/tests/permission_property_tests.rs
//! Property-based tests for effective permission resolution
//!
//! **Property 1: Determinism**
//! *For any* combination of group and user permission sets, resolving twice
//! SHALL yield identical mappings (same keys, same sources).
//!
//! **Property 2: Key Consistency**
//! *For any* resolved mapping, every entry SHALL be keyed by the id of the
//! security point it carries, so the mapping holds at most one entry per id.
//!
//! **Property 3: User Override Totality**
//! *For any* input where the user override set is non-empty, the resolved
//! mapping SHALL contain exactly the override set's ids, all sourced from
//! `User:OvrSecPoints`.
//!
//! **Property 4: No Invented Grants**
//! *For any* input, every resolved id SHALL originate from some add or
//! override set; delete sets can never introduce a grant.
//!
//! **Property 5: Superuser Bypass**
//! *For any* resolved mapping containing the superuser point, every check
//! SHALL pass.

use proptest::prelude::*;
use secpoint_backend::domain::effective_permission::{
    has_security_point, resolve_effective_permissions, GroupPermissionSets, UserPermissionSets,
};
use secpoint_backend::domain::security_point_model::{well_known, Model as SecurityPoint};
use std::collections::BTreeSet;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Generate a security point with a small id space so sets overlap often
fn arb_security_point() -> impl Strategy<Value = SecurityPoint> {
    (1i32..30).prop_map(|id| SecurityPoint {
        id,
        group_tag: "prop".to_string(),
        point_type: "access".to_string(),
        name: format!("point_{}", id),
        description: String::new(),
    })
}

fn arb_point_set() -> impl Strategy<Value = Vec<SecurityPoint>> {
    prop::collection::vec(arb_security_point(), 0..6)
}

/// Generate groups with arbitrary priorities and add/del/ovr sets
fn arb_groups() -> impl Strategy<Value = Vec<GroupPermissionSets>> {
    prop::collection::vec(
        (-10i32..10, arb_point_set(), arb_point_set(), arb_point_set()),
        0..5,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (priority, add, del, ovr))| GroupPermissionSets {
                group_id: i as i32 + 1,
                name: format!("group_{}", i),
                priority,
                add,
                del,
                ovr,
            })
            .collect()
    })
}

fn arb_user_sets() -> impl Strategy<Value = UserPermissionSets> {
    (arb_point_set(), arb_point_set(), arb_point_set()).prop_map(|(add, del, ovr)| {
        UserPermissionSets { add, del, ovr }
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig { max_global_rejects: 200_000, ..ProptestConfig::default() })]

    #[test]
    fn prop_resolution_is_deterministic(
        groups in arb_groups(),
        user in arb_user_sets(),
    ) {
        let first = resolve_effective_permissions(&groups, &user);
        let second = resolve_effective_permissions(&groups, &user);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_entries_are_keyed_by_point_id(
        groups in arb_groups(),
        user in arb_user_sets(),
    ) {
        let resolved = resolve_effective_permissions(&groups, &user);
        for (id, entry) in &resolved {
            prop_assert_eq!(*id, entry.point.id);
        }
    }

    #[test]
    fn prop_user_override_is_total(
        groups in arb_groups(),
        user in arb_user_sets(),
    ) {
        prop_assume!(!user.ovr.is_empty());

        let resolved = resolve_effective_permissions(&groups, &user);

        let expected: BTreeSet<i32> = user.ovr.iter().map(|p| p.id).collect();
        let actual: BTreeSet<i32> = resolved.keys().copied().collect();
        prop_assert_eq!(actual, expected);

        for entry in resolved.values() {
            prop_assert_eq!(entry.source.as_str(), "User:OvrSecPoints");
        }
    }

    #[test]
    fn prop_no_invented_grants(
        groups in arb_groups(),
        user in arb_user_sets(),
    ) {
        let resolved = resolve_effective_permissions(&groups, &user);

        let mut grantable: BTreeSet<i32> = BTreeSet::new();
        for g in &groups {
            grantable.extend(g.add.iter().map(|p| p.id));
            grantable.extend(g.ovr.iter().map(|p| p.id));
        }
        grantable.extend(user.add.iter().map(|p| p.id));
        grantable.extend(user.ovr.iter().map(|p| p.id));

        for id in resolved.keys() {
            prop_assert!(grantable.contains(id), "id {} was never granted", id);
        }
    }

    #[test]
    fn prop_superuser_passes_every_check(
        groups in arb_groups(),
        user in arb_user_sets(),
        probe in -100i32..100,
    ) {
        let resolved = resolve_effective_permissions(&groups, &user);
        prop_assume!(resolved.contains_key(&well_known::SUPERUSER));

        prop_assert!(has_security_point(&resolved, probe));
    }

    #[test]
    fn prop_check_without_superuser_matches_membership(
        groups in arb_groups(),
        user in arb_user_sets(),
        probe in -100i32..100,
    ) {
        let resolved = resolve_effective_permissions(&groups, &user);
        prop_assume!(!resolved.contains_key(&well_known::SUPERUSER));

        prop_assert_eq!(
            has_security_point(&resolved, probe),
            resolved.contains_key(&probe)
        );
    }

    #[test]
    fn prop_resolution_ignores_group_argument_order(
        groups in arb_groups(),
        user in arb_user_sets(),
    ) {
        // priority が全て異なる場合、引数順は結果に影響しない
        let mut priorities: Vec<i32> = groups.iter().map(|g| g.priority).collect();
        priorities.sort_unstable();
        priorities.dedup();
        prop_assume!(priorities.len() == groups.len());

        let mut reversed = groups.clone();
        reversed.reverse();

        prop_assert_eq!(
            resolve_effective_permissions(&groups, &user),
            resolve_effective_permissions(&reversed, &user)
        );
    }
}
