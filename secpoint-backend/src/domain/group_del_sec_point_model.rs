// secpoint-backend/src/domain/group_del_sec_point_model.rs
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// グループのDelセット (group <-> security_point 中間テーブル)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_del_sec_points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub sec_point_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::group_model::Entity",
        from = "Column::GroupId",
        to = "super::group_model::Column::Id"
    )]
    Group,

    #[sea_orm(
        belongs_to = "super::security_point_model::Entity",
        from = "Column::SecPointId",
        to = "super::security_point_model::Column::Id"
    )]
    SecurityPoint,
}

impl Related<super::group_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::security_point_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SecurityPoint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
