// secpoint-backend/src/api/dto/user_dto.rs

use crate::domain::effective_permission::EffectivePermissionMap;
use crate::domain::group_model;
use crate::domain::user_model::SafeUser;
use crate::repository::user_repository::SecPointSet;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// ユーザー更新コマンド
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserCommand {
    /// ユーザーを無効化する (旧 delete_user)
    Deactivate,
    /// ユーザーを再有効化する (旧 undelete_user)
    Reactivate,
    AddGroup {
        group_id: i32,
    },
    RemoveGroup {
        group_id: i32,
    },
    AddSecPoint {
        sec_point_id: i32,
        set: SecPointSetDto,
    },
    RemoveSecPoint {
        sec_point_id: i32,
        set: SecPointSetDto,
    },
}

impl UserCommand {
    /// ユーザー個別セキュリティポイントを触るコマンドか
    pub fn touches_sec_points(&self) -> bool {
        matches!(
            self,
            UserCommand::AddSecPoint { .. } | UserCommand::RemoveSecPoint { .. }
        )
    }
}

/// 書き込み先セットのワイヤ表現
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SecPointSetDto {
    Add,
    Del,
    Ovr,
}

impl From<SecPointSetDto> for SecPointSet {
    fn from(dto: SecPointSetDto) -> Self {
        match dto {
            SecPointSetDto::Add => SecPointSet::Add,
            SecPointSetDto::Del => SecPointSet::Del,
            SecPointSetDto::Ovr => SecPointSet::Ovr,
        }
    }
}

/// ユーザー更新リクエスト。監査のため理由は必須
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCommandRequest {
    #[serde(flatten)]
    pub command: UserCommand,

    #[validate(length(min = 1, max = 500, message = "Reason is required"))]
    pub reason: String,
}

/// 所属グループの要約
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: i32,
    pub name: String,
    pub priority: i32,
}

impl From<group_model::Model> for GroupSummary {
    fn from(group: group_model::Model) -> Self {
        Self {
            id: group.id,
            name: group.name,
            priority: group.priority,
        }
    }
}

/// 実効セキュリティポイント1件のワイヤ表現
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectivePermissionDto {
    pub id: i32,
    pub name: String,
    pub source: String,
}

/// ユーザープロフィールレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileResponse {
    pub user: SafeUser,
    pub groups: Vec<GroupSummary>,
    pub security_points: Vec<EffectivePermissionDto>,
}

impl UserProfileResponse {
    pub fn new(
        user: SafeUser,
        groups: Vec<group_model::Model>,
        effective: &EffectivePermissionMap,
    ) -> Self {
        let mut security_points: Vec<EffectivePermissionDto> = effective
            .values()
            .map(|e| EffectivePermissionDto {
                id: e.point.id,
                name: e.point.name.clone(),
                source: e.source.clone(),
            })
            .collect();
        // HashMapの列挙順は不定なのでID順に揃える
        security_points.sort_by_key(|p| p.id);

        Self {
            user,
            groups: groups.into_iter().map(GroupSummary::from).collect(),
            security_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_command_wire_format() {
        let json = r#"{"action":"add_sec_point","sec_point_id":8,"set":"ovr","reason":"INC-42"}"#;
        let request: UserCommandRequest = serde_json::from_str(json).unwrap();

        assert_eq!(
            request.command,
            UserCommand::AddSecPoint {
                sec_point_id: 8,
                set: SecPointSetDto::Ovr,
            }
        );
        assert!(request.command.touches_sec_points());
        assert_eq!(request.reason, "INC-42");
    }

    #[test]
    fn test_deactivate_command_wire_format() {
        let json = r#"{"action":"deactivate","reason":"left the company"}"#;
        let request: UserCommandRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.command, UserCommand::Deactivate);
        assert!(!request.command.touches_sec_points());
    }

    #[test]
    fn test_command_request_requires_reason() {
        let json = r#"{"action":"deactivate","reason":""}"#;
        let request: UserCommandRequest = serde_json::from_str(json).unwrap();
        assert!(validator::Validate::validate(&request).is_err());
    }

    #[test]
    fn test_sec_point_set_conversion() {
        assert_eq!(SecPointSet::from(SecPointSetDto::Add), SecPointSet::Add);
        assert_eq!(SecPointSet::from(SecPointSetDto::Del), SecPointSet::Del);
        assert_eq!(SecPointSet::from(SecPointSetDto::Ovr), SecPointSet::Ovr);
    }
}
