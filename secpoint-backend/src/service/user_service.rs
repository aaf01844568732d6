// secpoint-backend/src/service/user_service.rs
use crate::api::dto::user_dto::{UserCommand, UserCommandRequest, UserProfileResponse};
use crate::domain::effective_permission::resolve_effective_permissions;
use crate::domain::server_event_model::status;
use crate::domain::user_model::UserClaims;
use crate::error::{AppError, AppResult};
use crate::repository::group_repository::GroupRepository;
use crate::repository::security_point_repository::SecurityPointRepository;
use crate::repository::user_repository::{SecPointSet, UserRepository};
use crate::service::permission_service::PermissionService;
use crate::service::server_event_service::ServerEventService;
use std::sync::Arc;
use validator::Validate;

/// ユーザー管理サービス
pub struct UserService {
    user_repo: Arc<UserRepository>,
    group_repo: Arc<GroupRepository>,
    sec_point_repo: Arc<SecurityPointRepository>,
    permissions: Arc<PermissionService>,
    events: Arc<ServerEventService>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        group_repo: Arc<GroupRepository>,
        sec_point_repo: Arc<SecurityPointRepository>,
        permissions: Arc<PermissionService>,
        events: Arc<ServerEventService>,
    ) -> Self {
        Self {
            user_repo,
            group_repo,
            sec_point_repo,
            permissions,
            events,
        }
    }

    /// ユーザープロフィール (所属グループ + 実効セキュリティポイント) を取得
    pub async fn get_profile(&self, username: &str) -> AppResult<UserProfileResponse> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} does not exist", username)))?;

        let groups = self.user_repo.groups_for_user(user.id).await?;
        let bundle = self
            .user_repo
            .load_permission_bundle(user.id, &self.group_repo)
            .await?;
        let effective = resolve_effective_permissions(&bundle.groups, &bundle.user);

        Ok(UserProfileResponse::new(
            user.to_safe_user(),
            groups,
            &effective,
        ))
    }

    /// ユーザー更新コマンドを実行
    ///
    /// 全コマンドが監査理由付きでサーバーイベントに記録される。
    pub async fn execute_command(
        &self,
        acting: &UserClaims,
        target_username: &str,
        request: UserCommandRequest,
    ) -> AppResult<String> {
        request.validate()?;

        let target = self
            .user_repo
            .find_by_username(target_username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User {} does not exist", target_username))
            })?;

        let message = match &request.command {
            UserCommand::Deactivate => {
                // 自分自身の無効化は拒否する
                if target.id == acting.user_id {
                    self.events
                        .log_error(
                            "UpdateUser:Deactivate",
                            &"user cannot deactivate self",
                            &format!("User {} attempted to deactivate self", acting.username),
                        )
                        .await;
                    return Err(AppError::BadRequest(
                        "User cannot deactivate self".to_string(),
                    ));
                }
                if !target.is_active {
                    return Err(AppError::Conflict(
                        "User already deactivated".to_string(),
                    ));
                }
                self.user_repo.set_active(target.id, false).await?;
                format!("User deactivated: {}", target.username)
            }
            UserCommand::Reactivate => {
                if target.is_active {
                    return Err(AppError::Conflict(
                        "User currently active, cannot reactivate".to_string(),
                    ));
                }
                self.user_repo.set_active(target.id, true).await?;
                format!("User reactivated: {}", target.username)
            }
            UserCommand::AddGroup { group_id } => {
                let group = self
                    .group_repo
                    .find_by_id(*group_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

                if self.user_repo.is_in_group(target.id, group.id).await? {
                    return Err(AppError::Conflict("User already in group".to_string()));
                }
                self.user_repo.add_to_group(target.id, group.id).await?;
                format!("User added to group: {}", group.name)
            }
            UserCommand::RemoveGroup { group_id } => {
                let group = self
                    .group_repo
                    .find_by_id(*group_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

                if !self.user_repo.is_in_group(target.id, group.id).await? {
                    return Err(AppError::BadRequest("User not in group".to_string()));
                }
                self.user_repo.remove_from_group(target.id, group.id).await?;
                format!("User removed from group: {}", group.name)
            }
            UserCommand::AddSecPoint { sec_point_id, set } => {
                let point = self
                    .sec_point_repo
                    .find_by_id(*sec_point_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "Security point {} does not exist",
                            sec_point_id
                        ))
                    })?;

                let set: SecPointSet = (*set).into();
                // Addセットへの付与は、既に実効集合に含まれていれば拒否する
                if set == SecPointSet::Add {
                    let effective =
                        self.permissions.effective_permissions(target.id).await?;
                    if let Some(existing) = effective.get(sec_point_id) {
                        return Err(AppError::Conflict(format!(
                            "User already has security point {}, source: {}",
                            sec_point_id, existing.source
                        )));
                    }
                }

                self.user_repo
                    .add_sec_point(target.id, point.id, set)
                    .await?;
                format!(
                    "Security point {} added to {} set for user: {}",
                    point.id,
                    set.as_str(),
                    target.username
                )
            }
            UserCommand::RemoveSecPoint { sec_point_id, set } => {
                let set: SecPointSet = (*set).into();
                // 存在しない行の削除は黙って成功させる
                self.user_repo
                    .remove_sec_point(target.id, *sec_point_id, set)
                    .await?;
                format!(
                    "Security point {} removed from {} set for user: {}",
                    sec_point_id,
                    set.as_str(),
                    target.username
                )
            }
        };

        self.events
            .log(
                "UpdateUser",
                format!(
                    "{}\nRequested by: {}\nReason: {}",
                    message, acting.username, request.reason
                ),
                status::INFO,
            )
            .await;

        Ok(message)
    }
}
