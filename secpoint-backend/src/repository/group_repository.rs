// secpoint-backend/src/repository/group_repository.rs

use crate::domain::effective_permission::GroupPermissionSets;
use crate::domain::group_add_sec_point_model::{self, Entity as GroupAddEntity};
use crate::domain::group_del_sec_point_model::{self, Entity as GroupDelEntity};
use crate::domain::group_model::{self, Entity as GroupEntity};
use crate::domain::group_ovr_sec_point_model::{self, Entity as GroupOvrEntity};
use crate::domain::security_point_model::{self, Entity as SecurityPointEntity};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, QueryFilter, QueryOrder, Set};

/// グループ作成・更新の入力
#[derive(Debug, Clone)]
pub struct UpsertGroup {
    pub id: i32,
    pub priority: i32,
    pub name: String,
    pub description: String,
    pub add_sec_point_ids: Vec<i32>,
    pub del_sec_point_ids: Vec<i32>,
    pub ovr_sec_point_ids: Vec<i32>,
}

#[derive(Debug)]
pub struct GroupRepository {
    db: DbConn,
}

impl GroupRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// グループをIDで検索
    pub async fn find_by_id(&self, id: i32) -> Result<Option<group_model::Model>, DbErr> {
        GroupEntity::find_by_id(id).one(&self.db).await
    }

    /// 全グループを優先度順に取得
    pub async fn find_all(&self) -> Result<Vec<group_model::Model>, DbErr> {
        GroupEntity::find()
            .order_by(group_model::Column::Priority, Order::Asc)
            .order_by(group_model::Column::Id, Order::Asc)
            .all(&self.db)
            .await
    }

    /// 指定セットのセキュリティポイントを取得
    async fn sec_points_by_ids(
        &self,
        ids: Vec<i32>,
    ) -> Result<Vec<security_point_model::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        SecurityPointEntity::find()
            .filter(security_point_model::Column::Id.is_in(ids))
            .order_by(security_point_model::Column::Id, Order::Asc)
            .all(&self.db)
            .await
    }

    /// グループのAddセットを取得
    pub async fn add_sec_points(
        &self,
        group_id: i32,
    ) -> Result<Vec<security_point_model::Model>, DbErr> {
        let ids = GroupAddEntity::find()
            .filter(group_add_sec_point_model::Column::GroupId.eq(group_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.sec_point_id)
            .collect();
        self.sec_points_by_ids(ids).await
    }

    /// グループのDelセットを取得
    pub async fn del_sec_points(
        &self,
        group_id: i32,
    ) -> Result<Vec<security_point_model::Model>, DbErr> {
        let ids = GroupDelEntity::find()
            .filter(group_del_sec_point_model::Column::GroupId.eq(group_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.sec_point_id)
            .collect();
        self.sec_points_by_ids(ids).await
    }

    /// グループのOvrセットを取得
    pub async fn ovr_sec_points(
        &self,
        group_id: i32,
    ) -> Result<Vec<security_point_model::Model>, DbErr> {
        let ids = GroupOvrEntity::find()
            .filter(group_ovr_sec_point_model::Column::GroupId.eq(group_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.sec_point_id)
            .collect();
        self.sec_points_by_ids(ids).await
    }

    /// グループと3セットをまとめて取得し、評価入力の形で返す
    pub async fn load_permission_sets(
        &self,
        group: &group_model::Model,
    ) -> Result<GroupPermissionSets, DbErr> {
        Ok(GroupPermissionSets {
            group_id: group.id,
            name: group.name.clone(),
            priority: group.priority,
            add: self.add_sec_points(group.id).await?,
            del: self.del_sec_points(group.id).await?,
            ovr: self.ovr_sec_points(group.id).await?,
        })
    }

    /// グループを作成、または既存グループのセットを全て差し替える (シード用)
    ///
    /// 既存グループでは中間テーブルの行を一旦全て消してから書き直す。
    pub async fn upsert(&self, input: UpsertGroup) -> Result<group_model::Model, DbErr> {
        let existing = self.find_by_id(input.id).await?;

        let group = match existing {
            Some(found) => {
                self.clear_sec_point_sets(found.id).await?;

                let mut active: group_model::ActiveModel = found.into();
                active.priority = Set(input.priority);
                active.name = Set(input.name.clone());
                active.description = Set(input.description.clone());
                active.update(&self.db).await?
            }
            None => {
                let active = group_model::ActiveModel {
                    id: Set(input.id),
                    priority: Set(input.priority),
                    name: Set(input.name.clone()),
                    description: Set(input.description.clone()),
                };
                active.insert(&self.db).await?
            }
        };

        for sp_id in &input.add_sec_point_ids {
            group_add_sec_point_model::ActiveModel {
                group_id: Set(group.id),
                sec_point_id: Set(*sp_id),
            }
            .insert(&self.db)
            .await?;
        }
        for sp_id in &input.del_sec_point_ids {
            group_del_sec_point_model::ActiveModel {
                group_id: Set(group.id),
                sec_point_id: Set(*sp_id),
            }
            .insert(&self.db)
            .await?;
        }
        for sp_id in &input.ovr_sec_point_ids {
            group_ovr_sec_point_model::ActiveModel {
                group_id: Set(group.id),
                sec_point_id: Set(*sp_id),
            }
            .insert(&self.db)
            .await?;
        }

        Ok(group)
    }

    /// グループの3セットの中間テーブル行を全て削除
    async fn clear_sec_point_sets(&self, group_id: i32) -> Result<(), DbErr> {
        GroupAddEntity::delete_many()
            .filter(group_add_sec_point_model::Column::GroupId.eq(group_id))
            .exec(&self.db)
            .await?;
        GroupDelEntity::delete_many()
            .filter(group_del_sec_point_model::Column::GroupId.eq(group_id))
            .exec(&self.db)
            .await?;
        GroupOvrEntity::delete_many()
            .filter(group_ovr_sec_point_model::Column::GroupId.eq(group_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
