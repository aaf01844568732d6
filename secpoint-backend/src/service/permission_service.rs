// secpoint-backend/src/service/permission_service.rs

use crate::domain::effective_permission::{
    check_security_point, resolve_effective_permissions, CheckOutcome, EffectivePermissionMap,
};
use crate::domain::server_event_model::status;
use crate::domain::user_model::UserClaims;
use crate::error::{AppError, AppResult};
use crate::repository::group_repository::GroupRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::server_event_service::ServerEventService;
use std::sync::Arc;
use uuid::Uuid;

/// セキュリティポイント評価・チェックサービス
///
/// 評価本体 (domain::effective_permission) は純粋関数のまま、
/// ここで入力のスナップショット読み出しとチェック結果の監査記録を行う。
pub struct PermissionService {
    user_repo: Arc<UserRepository>,
    group_repo: Arc<GroupRepository>,
    events: Arc<ServerEventService>,
}

impl PermissionService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        group_repo: Arc<GroupRepository>,
        events: Arc<ServerEventService>,
    ) -> Self {
        Self {
            user_repo,
            group_repo,
            events,
        }
    }

    /// ユーザーの実効セキュリティポイント集合を評価
    pub async fn effective_permissions(&self, user_id: Uuid) -> AppResult<EffectivePermissionMap> {
        let bundle = self
            .user_repo
            .load_permission_bundle(user_id, &self.group_repo)
            .await?;
        Ok(resolve_effective_permissions(&bundle.groups, &bundle.user))
    }

    /// チェックを実行し、SUPERUSER / DENY の結果を監査記録する
    pub async fn check(&self, claims: &UserClaims, sec_point_id: i32) -> AppResult<CheckOutcome> {
        let effective = self.effective_permissions(claims.user_id).await?;
        let outcome = check_security_point(&effective, sec_point_id);

        match outcome {
            CheckOutcome::GrantedAsSuperuser => {
                self.events
                    .log(
                        "SPCheck",
                        format!("User: {} SPID: {}", claims.username, sec_point_id),
                        status::SUPERUSER,
                    )
                    .await;
            }
            CheckOutcome::Denied => {
                tracing::warn!(
                    username = %claims.username,
                    sec_point_id = sec_point_id,
                    "Security point check denied"
                );
                self.events
                    .log(
                        "SPCheck",
                        format!("User: {} SPID: {}", claims.username, sec_point_id),
                        status::DENY,
                    )
                    .await;
            }
            CheckOutcome::Granted => {}
        }

        Ok(outcome)
    }

    /// チェックに失敗したら Forbidden を返す
    pub async fn ensure(&self, claims: &UserClaims, sec_point_id: i32) -> AppResult<()> {
        if self.check(claims, sec_point_id).await?.is_allowed() {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Missing security point {}",
                sec_point_id
            )))
        }
    }
}
