// secpoint-backend/src/domain/user_add_sec_point_model.rs
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// ユーザー個別のAddセット (user <-> security_point 中間テーブル)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_add_sec_points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,

    #[sea_orm(primary_key, auto_increment = false)]
    pub sec_point_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::UserId",
        to = "super::user_model::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::security_point_model::Entity",
        from = "Column::SecPointId",
        to = "super::security_point_model::Column::Id"
    )]
    SecurityPoint,
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::security_point_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SecurityPoint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
