// secpoint-backend/src/domain/security_point_model.rs
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// セキュリティポイントエンティティ
///
/// 認可の最小単位。IDはカタログで固定採番されるため自動増分にしない。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "security_points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    /// カタログ上の分類タグ (例: "auth", "admin")
    pub group_tag: String,

    pub point_type: String,

    #[sea_orm(unique)]
    pub name: String,

    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// 予約済みセキュリティポイントID
pub mod well_known {
    /// 全チェックをバイパスするスーパーユーザーポイント
    pub const SUPERUSER: i32 = 1;
    /// ユーザー作成
    pub const CREATE_USERS: i32 = 2;
    /// ユーザー・グループ・ポイント情報の参照と更新
    pub const MANAGE_USERS: i32 = 3;
    /// Webログイン
    pub const WEB_LOGIN: i32 = 5;
    /// サーバーイベントの参照
    pub const VIEW_SERVER_EVENTS: i32 = 6;
    /// APIキーの発行
    pub const GENERATE_API_KEYS: i32 = 7;
    /// ユーザー個別セキュリティポイントの管理
    pub const MANAGE_USER_SEC_POINTS: i32 = 8;
}
