// secpoint-backend/src/service/server_event_service.rs

use crate::domain::server_event_model::{self, status};
use crate::error::AppResult;
use crate::repository::server_event_repository::{ServerEventFilter, ServerEventRepository};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// プロセス起動1回分の識別子。
///
/// グローバル変数ではなく起動時に生成してアプリ状態に持たせ、
/// イベント記録に明示的に引き回す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerRunId(Uuid);

impl ServerRunId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ServerRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// サーバーイベント (監査証跡) サービス
pub struct ServerEventService {
    repo: Arc<ServerEventRepository>,
    run_id: ServerRunId,
}

impl ServerEventService {
    pub fn new(repo: Arc<ServerEventRepository>, run_id: ServerRunId) -> Self {
        Self { repo, run_id }
    }

    pub fn run_id(&self) -> ServerRunId {
        self.run_id
    }

    /// イベントを記録する。監査の失敗で本処理を落とさない
    pub async fn log(&self, event_type: &str, details: impl Into<String>, event_status: &str) {
        let details = details.into();
        tracing::info!(
            event_type = %event_type,
            status = %event_status,
            details = %details,
            "Server event"
        );

        if let Err(e) = self
            .repo
            .insert(
                self.run_id.as_uuid(),
                event_type.to_string(),
                details,
                event_status.to_string(),
            )
            .await
        {
            tracing::error!(error = %e, event_type = %event_type, "Failed to persist server event");
        }
    }

    /// エラーイベントを記録
    pub async fn log_error(
        &self,
        event_type: &str,
        error: &(dyn fmt::Display + Send + Sync),
        details: &str,
    ) {
        self.log(
            event_type,
            format!("Error: {}\nDetails: {}", error, details),
            status::ERROR,
        )
        .await;
    }

    /// サーバー起動イベントを記録
    pub async fn record_server_start(&self) {
        self.log("StartingServer", "Starting server", status::PENDING)
            .await;
    }

    /// フィルタ条件に一致するイベントを取得
    pub async fn list(
        &self,
        filter: ServerEventFilter,
    ) -> AppResult<Vec<server_event_model::Model>> {
        Ok(self.repo.find_filtered(filter).await?)
    }
}
