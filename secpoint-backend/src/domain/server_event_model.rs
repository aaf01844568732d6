// secpoint-backend/src/domain/server_event_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// サーバーイベントエンティティ
///
/// セキュリティ上意味のある操作 (ログイン、権限チェック、ユーザー更新など) の
/// 監査証跡。server_run_id でプロセス起動単位に紐付く。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "server_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub server_run_id: Uuid,

    pub event_type: String,

    pub details: String,

    pub status: String,

    pub archived: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            archived: Set(false),
            ..ActiveModelTrait::default()
        }
    }
}

/// イベントステータス定数
pub mod status {
    pub const INFO: &str = "INFO";
    pub const ERROR: &str = "ERROR";
    pub const LOGIN: &str = "LOGIN";
    pub const DENY: &str = "DENY";
    pub const SUPERUSER: &str = "SUPERUSER";
    pub const PENDING: &str = "PENDING";
}
