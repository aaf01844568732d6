// secpoint-backend/tests/effective_permission_tests.rs
//
// 実効セキュリティポイント評価の公開APIに対する結合テスト。
// グループ優先度マージ、上書き、ユーザー規則、スーパーユーザーの各挙動を
// 外部から観測できる形で検証する。

use secpoint_backend::domain::effective_permission::{
    check_security_point, has_security_point, resolve_effective_permissions, CheckOutcome,
    GroupPermissionSets, UserPermissionSets,
};
use secpoint_backend::domain::security_point_model::{well_known, Model as SecurityPoint};

fn sp(id: i32, name: &str) -> SecurityPoint {
    SecurityPoint {
        id,
        group_tag: "test".to_string(),
        point_type: "access".to_string(),
        name: name.to_string(),
        description: String::new(),
    }
}

fn group(id: i32, name: &str, priority: i32) -> GroupPermissionSets {
    GroupPermissionSets {
        group_id: id,
        name: name.to_string(),
        priority,
        ..Default::default()
    }
}

#[test]
fn resolution_is_deterministic() {
    let mut staff = group(1, "staff", 1);
    staff.add = vec![sp(10, "a"), sp(11, "b")];
    let mut audit = group(2, "audit", 2);
    audit.del = vec![sp(11, "b")];
    let user = UserPermissionSets {
        add: vec![sp(12, "c")],
        ..Default::default()
    };

    let first = resolve_effective_permissions(&[staff.clone(), audit.clone()], &user);
    let second = resolve_effective_permissions(&[staff, audit], &user);

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn superuser_grants_every_check() {
    let mut admins = group(1, "administrators", 1);
    admins.add = vec![sp(well_known::SUPERUSER, "superuser")];

    let resolved = resolve_effective_permissions(&[admins], &UserPermissionSets::default());

    for id in [2, 5, 8, 1000, -3] {
        assert!(has_security_point(&resolved, id), "id {} should pass", id);
    }
    assert_eq!(
        check_security_point(&resolved, 1000),
        CheckOutcome::GrantedAsSuperuser
    );
}

#[test]
fn later_priority_del_removes_earlier_add() {
    let mut adder = group(1, "adder", 1);
    adder.add = vec![sp(10, "a")];
    let mut remover = group(2, "remover", 2);
    remover.del = vec![sp(10, "a")];

    let resolved = resolve_effective_permissions(&[adder, remover], &Default::default());
    assert!(resolved.is_empty());
}

#[test]
fn group_override_wins_over_lower_groups() {
    let mut base = group(1, "base", 1);
    base.add = vec![sp(10, "a"), sp(11, "b")];
    let mut kiosk = group(2, "kiosk", 2);
    kiosk.ovr = vec![sp(20, "c")];

    let resolved = resolve_effective_permissions(&[base, kiosk], &Default::default());

    assert_eq!(resolved.len(), 1);
    assert!(resolved.contains_key(&20));
    assert_eq!(resolved[&20].source, "kiosk:OvrSecPoints");
}

#[test]
fn user_override_beats_group_override() {
    let mut base = group(1, "base", 1);
    base.add = vec![sp(10, "a"), sp(11, "b")];
    let mut kiosk = group(2, "kiosk", 2);
    kiosk.ovr = vec![sp(20, "c")];
    let user = UserPermissionSets {
        ovr: vec![sp(30, "d")],
        ..Default::default()
    };

    let resolved = resolve_effective_permissions(&[base, kiosk], &user);

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[&30].source, "User:OvrSecPoints");
}

#[test]
fn empty_override_of_last_group_changes_nothing() {
    let mut base = group(1, "base", 1);
    base.add = vec![sp(10, "a")];
    let plain = group(2, "plain", 2); // Ovrは空

    let with_plain = resolve_effective_permissions(
        &[base.clone(), plain],
        &UserPermissionSets::default(),
    );
    let without_plain = resolve_effective_permissions(&[base], &UserPermissionSets::default());

    assert_eq!(with_plain, without_plain);
}

#[test]
fn removing_absent_point_is_silent_noop() {
    let mut g = group(1, "staff", 1);
    g.add = vec![sp(10, "a")];
    let user = UserPermissionSets {
        del: vec![sp(99, "never_granted")],
        ..Default::default()
    };

    let resolved = resolve_effective_permissions(&[g], &user);
    assert_eq!(resolved.len(), 1);
    assert!(resolved.contains_key(&10));
}

#[test]
fn no_groups_and_no_grants_denies_everything() {
    let resolved = resolve_effective_permissions(&[], &UserPermissionSets::default());

    assert!(resolved.is_empty());
    for id in [well_known::SUPERUSER, well_known::WEB_LOGIN, 42] {
        assert!(!has_security_point(&resolved, id));
        assert_eq!(check_security_point(&resolved, id), CheckOutcome::Denied);
    }
}

#[test]
fn sources_report_the_granting_rule() {
    let mut ops = group(1, "operators", 1);
    ops.add = vec![sp(10, "view")];
    let mut admins = group(2, "admins", 2);
    admins.add = vec![sp(10, "view"), sp(11, "edit")];
    let user = UserPermissionSets {
        add: vec![sp(12, "export")],
        ..Default::default()
    };

    let resolved = resolve_effective_permissions(&[ops, admins], &user);

    // 先に評価されたグループがソースラベルを取る。後からのAddは何もしない
    assert_eq!(resolved[&10].source, "operators:AddSecPoints");
    assert_eq!(resolved[&11].source, "admins:AddSecPoints");
    assert_eq!(resolved[&12].source, "User:AddSecPoints");
}
