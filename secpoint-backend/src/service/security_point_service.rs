// secpoint-backend/src/service/security_point_service.rs
use crate::api::dto::security_point_dto::{
    SecurityPointDetailResponse, SecurityPointListResponse,
};
use crate::error::{AppError, AppResult};
use crate::repository::security_point_repository::SecurityPointRepository;
use std::sync::Arc;

/// セキュリティポイントカタログ参照サービス
pub struct SecurityPointService {
    sec_point_repo: Arc<SecurityPointRepository>,
}

impl SecurityPointService {
    pub fn new(sec_point_repo: Arc<SecurityPointRepository>) -> Self {
        Self { sec_point_repo }
    }

    /// ポイント詳細と、それを参照しているグループを取得
    pub async fn get_point(&self, sec_point_id: i32) -> AppResult<SecurityPointDetailResponse> {
        let point = self
            .sec_point_repo
            .find_by_id(sec_point_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Security point {} does not exist", sec_point_id))
            })?;

        let referencing_groups = self.sec_point_repo.referencing_groups(point.id).await?;

        Ok(SecurityPointDetailResponse {
            point,
            referencing_groups,
        })
    }

    /// カタログ一覧を取得
    pub async fn list_points(&self) -> AppResult<SecurityPointListResponse> {
        Ok(SecurityPointListResponse {
            security_points: self.sec_point_repo.find_all().await?,
        })
    }
}
