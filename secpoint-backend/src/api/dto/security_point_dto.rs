// secpoint-backend/src/api/dto/security_point_dto.rs

use crate::domain::group_model;
use crate::domain::security_point_model;
use serde::{Deserialize, Serialize};

/// セキュリティポイント詳細レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityPointDetailResponse {
    #[serde(flatten)]
    pub point: security_point_model::Model,
    /// いずれかのセットでこのポイントを参照しているグループ
    pub referencing_groups: Vec<group_model::Model>,
}

/// カタログ一覧レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityPointListResponse {
    pub security_points: Vec<security_point_model::Model>,
}
