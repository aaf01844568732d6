// secpoint-backend/src/domain/group_model.rs
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// グループエンティティ
///
/// priority が小さいグループから順に評価される。Add/Del/Ovr の各セットは
/// 中間テーブル (group_add_sec_points 等) に保持する。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub priority: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
