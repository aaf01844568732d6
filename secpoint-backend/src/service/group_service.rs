// secpoint-backend/src/service/group_service.rs
use crate::api::dto::group_dto::{GroupDetailResponse, GroupListResponse};
use crate::error::{AppError, AppResult};
use crate::repository::group_repository::GroupRepository;
use std::sync::Arc;

/// グループ参照サービス
pub struct GroupService {
    group_repo: Arc<GroupRepository>,
}

impl GroupService {
    pub fn new(group_repo: Arc<GroupRepository>) -> Self {
        Self { group_repo }
    }

    /// グループ詳細 (3セット込み) を取得
    pub async fn get_group(&self, group_id: i32) -> AppResult<GroupDetailResponse> {
        let group = self
            .group_repo
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {} does not exist", group_id)))?;

        let add = self.group_repo.add_sec_points(group.id).await?;
        let del = self.group_repo.del_sec_points(group.id).await?;
        let ovr = self.group_repo.ovr_sec_points(group.id).await?;

        Ok(GroupDetailResponse::new(group, add, del, ovr))
    }

    /// グループ一覧を優先度順に取得
    pub async fn list_groups(&self) -> AppResult<GroupListResponse> {
        Ok(GroupListResponse {
            groups: self.group_repo.find_all().await?,
        })
    }
}
