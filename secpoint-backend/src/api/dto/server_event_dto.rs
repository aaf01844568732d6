// secpoint-backend/src/api/dto/server_event_dto.rs

use crate::domain::server_event_model;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// サーバーイベント検索クエリ
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerEventQuery {
    pub limit: Option<u64>,
    pub event_type: Option<String>,
    pub server_run_id: Option<Uuid>,
}

/// サーバーイベント一覧レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEventsResponse {
    pub limit: u64,
    pub events: Vec<server_event_model::Model>,
}
