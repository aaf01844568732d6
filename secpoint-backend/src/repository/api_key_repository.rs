// secpoint-backend/src/repository/api_key_repository.rs

use crate::domain::api_key_model::{self, Entity as ApiKeyEntity};
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, QueryFilter, Set};
use uuid::Uuid;

/// APIキー作成の入力
#[derive(Debug, Clone)]
pub struct CreateApiKey {
    pub user_id: Uuid,
    pub key_value: String,
    pub description: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ApiKeyRepository {
    db: DbConn,
}

impl ApiKeyRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// APIキーを作成
    pub async fn create(&self, input: CreateApiKey) -> Result<api_key_model::Model, DbErr> {
        let active = api_key_model::ActiveModel {
            user_id: Set(input.user_id),
            key_value: Set(input.key_value),
            description: Set(input.description),
            expires_at: Set(input.expires_at),
            ..api_key_model::ActiveModel::new()
        };
        active.insert(&self.db).await
    }

    /// キー文字列でAPIキーを検索。失効済みは返さない
    pub async fn find_valid_by_value(
        &self,
        key_value: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<api_key_model::Model>, DbErr> {
        Ok(ApiKeyEntity::find()
            .filter(api_key_model::Column::KeyValue.eq(key_value))
            .one(&self.db)
            .await?
            .filter(|key| key.is_valid_at(now)))
    }

    /// ユーザーのAPIキーを全て取得
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<api_key_model::Model>, DbErr> {
        ApiKeyEntity::find()
            .filter(api_key_model::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
    }
}
