// secpoint-backend/src/api/dto/group_dto.rs

use crate::domain::group_model;
use crate::domain::security_point_model;
use serde::{Deserialize, Serialize};

/// グループ詳細レスポンス (3セット込み)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDetailResponse {
    pub id: i32,
    pub priority: i32,
    pub name: String,
    pub description: String,
    pub add_sec_points: Vec<security_point_model::Model>,
    pub del_sec_points: Vec<security_point_model::Model>,
    pub ovr_sec_points: Vec<security_point_model::Model>,
}

impl GroupDetailResponse {
    pub fn new(
        group: group_model::Model,
        add: Vec<security_point_model::Model>,
        del: Vec<security_point_model::Model>,
        ovr: Vec<security_point_model::Model>,
    ) -> Self {
        Self {
            id: group.id,
            priority: group.priority,
            name: group.name,
            description: group.description,
            add_sec_points: add,
            del_sec_points: del,
            ovr_sec_points: ovr,
        }
    }
}

/// グループ一覧レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupListResponse {
    pub groups: Vec<group_model::Model>,
}
