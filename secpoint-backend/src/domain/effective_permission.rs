// secpoint-backend/src/domain/effective_permission.rs

use super::security_point_model::{well_known, Model as SecurityPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// グループ1件分の評価入力
///
/// priority が小さいグループから順に評価される。同値の場合は渡された順を保つ。
#[derive(Debug, Clone, Default)]
pub struct GroupPermissionSets {
    pub group_id: i32,
    pub name: String,
    pub priority: i32,
    pub add: Vec<SecurityPoint>,
    pub del: Vec<SecurityPoint>,
    pub ovr: Vec<SecurityPoint>,
}

/// ユーザー個別の評価入力
#[derive(Debug, Clone, Default)]
pub struct UserPermissionSets {
    pub add: Vec<SecurityPoint>,
    pub del: Vec<SecurityPoint>,
    pub ovr: Vec<SecurityPoint>,
}

/// 評価済みセキュリティポイント。永続化せず、認可チェック1回分の寿命で使う
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermission {
    /// どの規則が付与したか (例: "admins:AddSecPoints", "User:OvrSecPoints")
    pub source: String,
    pub point: SecurityPoint,
}

/// ポイントID -> 評価結果のマップ。1ポイントにつき高々1エントリ
pub type EffectivePermissionMap = HashMap<i32, EffectivePermission>;

/// グループ・ユーザー両方の規則を優先度順にマージして実効ポイント集合を求める。
///
/// 入力のみに依存する純粋関数。I/Oもロックも行わないため、呼び出し側が
/// スナップショットを渡す限り並行に呼んでよい。
///
/// 評価順:
/// 1. priority 昇順 (安定ソート) で各グループの Add を未登録なら追加、
///    Del を登録済みなら削除
/// 2. 最後に評価したグループの Ovr が空でなければ全体をそれで置換
/// 3. ユーザーの Add / Del を同様に適用
/// 4. ユーザーの Ovr が空でなければ全体をそれで置換 (グループ結果より常に優先)
pub fn resolve_effective_permissions(
    groups: &[GroupPermissionSets],
    user: &UserPermissionSets,
) -> EffectivePermissionMap {
    // 挿入順を規則評価に使うため Vec で組み立て、最後にマップへ詰め替える
    let mut prioritized: Vec<&GroupPermissionSets> = groups.iter().collect();
    prioritized.sort_by_key(|g| g.priority);

    let mut effective: Vec<EffectivePermission> = Vec::new();

    for group in &prioritized {
        // Add: 既にあるポイントはそのまま (先に付与したグループがソースを保持)
        for sp in &group.add {
            if !effective.iter().any(|e| e.point.id == sp.id) {
                effective.push(EffectivePermission {
                    source: format!("{}:AddSecPoints", group.name),
                    point: sp.clone(),
                });
            }
        }
        // Del: 無いポイントの削除は黙って無視
        for sp in &group.del {
            if let Some(idx) = effective.iter().position(|e| e.point.id == sp.id) {
                effective.remove(idx);
            }
        }
    }

    // Ovr は最後に評価したグループのものだけが効く。全グループの和ではない
    if let Some(last) = prioritized.last() {
        if !last.ovr.is_empty() {
            effective = last
                .ovr
                .iter()
                .map(|sp| EffectivePermission {
                    source: format!("{}:OvrSecPoints", last.name),
                    point: sp.clone(),
                })
                .collect();
        }
    }

    for sp in &user.add {
        if !effective.iter().any(|e| e.point.id == sp.id) {
            effective.push(EffectivePermission {
                source: "User:AddSecPoints".to_string(),
                point: sp.clone(),
            });
        }
    }

    for sp in &user.del {
        if let Some(idx) = effective.iter().position(|e| e.point.id == sp.id) {
            effective.remove(idx);
        }
    }

    // ユーザーのOvrはグループ由来の結果 (グループOvr含む) を無条件に上書きする
    if !user.ovr.is_empty() {
        effective = user
            .ovr
            .iter()
            .map(|sp| EffectivePermission {
                source: "User:OvrSecPoints".to_string(),
                point: sp.clone(),
            })
            .collect();
    }

    effective.into_iter().map(|e| (e.point.id, e)).collect()
}

/// 実効ポイント集合に対するチェック。
///
/// 対象IDが含まれるか、スーパーユーザーポイント (ID 1) を保持していれば許可。
/// 未知のIDに対するチェックは拒否であってエラーではない。
pub fn has_security_point(effective: &EffectivePermissionMap, sec_point_id: i32) -> bool {
    effective.contains_key(&sec_point_id) || effective.contains_key(&well_known::SUPERUSER)
}

/// チェック結果とその理由。監査ログの SUPERUSER / DENY を区別するために使う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// 対象ポイントを直接保持している
    Granted,
    /// 対象ポイントは無いがスーパーユーザーとして許可
    GrantedAsSuperuser,
    Denied,
}

impl CheckOutcome {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, CheckOutcome::Denied)
    }
}

/// has_security_point と同じ判定で、どの経路で許可されたかも返す
pub fn check_security_point(
    effective: &EffectivePermissionMap,
    sec_point_id: i32,
) -> CheckOutcome {
    if effective.contains_key(&sec_point_id) {
        CheckOutcome::Granted
    } else if effective.contains_key(&well_known::SUPERUSER) {
        CheckOutcome::GrantedAsSuperuser
    } else {
        CheckOutcome::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_empty_membership_resolves_empty() {
        let resolved = resolve_effective_permissions(&[], &UserPermissionSets::default());
        assert!(resolved.is_empty());
        assert!(!has_security_point(&resolved, 42));
    }

    #[test]
    fn test_first_group_wins_source_label() {
        let mut ops = group(1, "operators", 1);
        ops.add = vec![sp(10, "view_reports")];
        let mut admins = group(2, "admins", 2);
        admins.add = vec![sp(10, "view_reports"), sp(11, "edit_reports")];

        let resolved = resolve_effective_permissions(&[ops, admins], &Default::default());
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[&10].source, "operators:AddSecPoints");
        assert_eq!(resolved[&11].source, "admins:AddSecPoints");
    }

    #[test]
    fn test_later_group_del_removes_earlier_add() {
        let mut first = group(1, "staff", 1);
        first.add = vec![sp(10, "view_reports")];
        let mut second = group(2, "restricted", 2);
        second.del = vec![sp(10, "view_reports")];

        let resolved = resolve_effective_permissions(&[first, second], &Default::default());
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_priority_orders_evaluation_not_encounter_order() {
        // 逆順で渡しても priority 順に評価される
        let mut second = group(2, "restricted", 2);
        second.del = vec![sp(10, "view_reports")];
        let mut first = group(1, "staff", 1);
        first.add = vec![sp(10, "view_reports")];

        let resolved = resolve_effective_permissions(&[second, first], &Default::default());
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_del_of_absent_point_is_noop() {
        let mut g = group(1, "staff", 1);
        g.add = vec![sp(10, "view_reports")];
        g.del = vec![sp(99, "not_present")];

        let resolved = resolve_effective_permissions(&[g], &Default::default());
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains_key(&10));
    }

    #[test]
    fn test_last_group_override_replaces_everything() {
        let mut first = group(1, "staff", 1);
        first.add = vec![sp(10, "a"), sp(11, "b")];
        let mut last = group(2, "kiosk", 2);
        last.ovr = vec![sp(20, "c")];

        let resolved = resolve_effective_permissions(&[first, last], &Default::default());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[&20].source, "kiosk:OvrSecPoints");
    }

    #[test]
    fn test_only_last_group_override_counts() {
        // 途中のグループのOvrは無視される
        let mut first = group(1, "kiosk", 1);
        first.ovr = vec![sp(20, "c")];
        let mut last = group(2, "staff", 2);
        last.add = vec![sp(10, "a")];

        let resolved = resolve_effective_permissions(&[first, last], &Default::default());
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains_key(&10));
    }

    #[test]
    fn test_empty_last_override_keeps_merged_result() {
        let mut first = group(1, "staff", 1);
        first.add = vec![sp(10, "a")];
        let last = group(2, "plain", 2);

        let resolved = resolve_effective_permissions(&[first, last], &Default::default());
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains_key(&10));
    }

    #[test]
    fn test_user_rules_apply_on_top_of_groups() {
        let mut g = group(1, "staff", 1);
        g.add = vec![sp(10, "a"), sp(11, "b")];
        let user = UserPermissionSets {
            add: vec![sp(12, "c")],
            del: vec![sp(11, "b")],
            ovr: vec![],
        };

        let resolved = resolve_effective_permissions(&[g], &user);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[&12].source, "User:AddSecPoints");
        assert!(!resolved.contains_key(&11));
    }

    #[test]
    fn test_user_add_does_not_steal_group_source() {
        let mut g = group(1, "staff", 1);
        g.add = vec![sp(10, "a")];
        let user = UserPermissionSets {
            add: vec![sp(10, "a")],
            ..Default::default()
        };

        let resolved = resolve_effective_permissions(&[g], &user);
        assert_eq!(resolved[&10].source, "staff:AddSecPoints");
    }

    #[test]
    fn test_user_override_beats_group_override() {
        let mut first = group(1, "staff", 1);
        first.add = vec![sp(10, "a"), sp(11, "b")];
        let mut last = group(2, "kiosk", 2);
        last.ovr = vec![sp(20, "c")];
        let user = UserPermissionSets {
            ovr: vec![sp(30, "d")],
            ..Default::default()
        };

        let resolved = resolve_effective_permissions(&[first, last], &user);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[&30].source, "User:OvrSecPoints");
    }

    #[test]
    fn test_zero_groups_user_rules_only() {
        let user = UserPermissionSets {
            add: vec![sp(10, "a")],
            ..Default::default()
        };
        let resolved = resolve_effective_permissions(&[], &user);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[&10].source, "User:AddSecPoints");
    }

    #[test]
    fn test_determinism_same_input_same_output() {
        let mut g1 = group(1, "staff", 1);
        g1.add = vec![sp(10, "a"), sp(11, "b")];
        let mut g2 = group(2, "restricted", 2);
        g2.del = vec![sp(11, "b")];
        let user = UserPermissionSets {
            add: vec![sp(12, "c")],
            ..Default::default()
        };

        let first = resolve_effective_permissions(&[g1.clone(), g2.clone()], &user);
        let second = resolve_effective_permissions(&[g1, g2], &user);
        assert_eq!(first, second);
    }

    #[test]
    fn test_superuser_bypass() {
        let user = UserPermissionSets {
            add: vec![sp(well_known::SUPERUSER, "superuser")],
            ..Default::default()
        };
        let resolved = resolve_effective_permissions(&[], &user);

        assert!(has_security_point(&resolved, 9999));
        assert_eq!(
            check_security_point(&resolved, 9999),
            CheckOutcome::GrantedAsSuperuser
        );
        assert_eq!(
            check_security_point(&resolved, well_known::SUPERUSER),
            CheckOutcome::Granted
        );
    }

    #[test]
    fn test_denied_outcome_for_missing_point() {
        let resolved = resolve_effective_permissions(&[], &Default::default());
        assert_eq!(check_security_point(&resolved, 5), CheckOutcome::Denied);
        assert!(!CheckOutcome::Denied.is_allowed());
    }

    #[test]
    fn test_tied_priorities_keep_encounter_order() {
        // priority 同値: 先に渡したグループが先に評価され、ソースを取る
        let mut a = group(1, "alpha", 5);
        a.add = vec![sp(10, "a")];
        let mut b = group(2, "beta", 5);
        b.add = vec![sp(10, "a")];

        let resolved = resolve_effective_permissions(&[a, b], &Default::default());
        assert_eq!(resolved[&10].source, "alpha:AddSecPoints");
    }
}
