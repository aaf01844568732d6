// secpoint-backend/src/repository/server_event_repository.rs

use crate::domain::server_event_model::{self, Entity as ServerEventEntity};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

/// イベント検索のフィルタ
#[derive(Debug, Clone, Default)]
pub struct ServerEventFilter {
    pub limit: Option<u64>,
    pub event_type: Option<String>,
    pub server_run_id: Option<Uuid>,
}

#[derive(Debug)]
pub struct ServerEventRepository {
    db: DbConn,
}

impl ServerEventRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// イベントを記録
    pub async fn insert(
        &self,
        server_run_id: Uuid,
        event_type: String,
        details: String,
        status: String,
    ) -> Result<server_event_model::Model, DbErr> {
        let active = server_event_model::ActiveModel {
            server_run_id: Set(server_run_id),
            event_type: Set(event_type),
            details: Set(details),
            status: Set(status),
            ..server_event_model::ActiveModel::new()
        };
        active.insert(&self.db).await
    }

    /// フィルタ条件に一致するイベントを新しい順に取得
    pub async fn find_filtered(
        &self,
        filter: ServerEventFilter,
    ) -> Result<Vec<server_event_model::Model>, DbErr> {
        let mut query = ServerEventEntity::find()
            .order_by(server_event_model::Column::CreatedAt, Order::Desc);

        if let Some(event_type) = filter.event_type {
            query = query.filter(server_event_model::Column::EventType.eq(event_type));
        }
        if let Some(run_id) = filter.server_run_id {
            query = query.filter(server_event_model::Column::ServerRunId.eq(run_id));
        }

        let limit = filter.limit.unwrap_or(10);
        query.limit(limit).all(&self.db).await
    }
}
