// secpoint-backend/src/repository/security_point_repository.rs

use crate::domain::group_add_sec_point_model::{self, Entity as GroupAddEntity};
use crate::domain::group_del_sec_point_model::{self, Entity as GroupDelEntity};
use crate::domain::group_model::{self, Entity as GroupEntity};
use crate::domain::group_ovr_sec_point_model::{self, Entity as GroupOvrEntity};
use crate::domain::security_point_model::{self, Entity as SecurityPointEntity};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, QueryFilter, QueryOrder, Set};
use std::collections::BTreeSet;

#[derive(Debug)]
pub struct SecurityPointRepository {
    db: DbConn,
}

impl SecurityPointRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// セキュリティポイントをIDで検索
    pub async fn find_by_id(&self, id: i32) -> Result<Option<security_point_model::Model>, DbErr> {
        SecurityPointEntity::find_by_id(id).one(&self.db).await
    }

    /// カタログ全体を取得
    pub async fn find_all(&self) -> Result<Vec<security_point_model::Model>, DbErr> {
        SecurityPointEntity::find()
            .order_by(security_point_model::Column::Id, Order::Asc)
            .all(&self.db)
            .await
    }

    /// 存在しない場合のみ作成 (シード用。既存レコードは変更しない)
    pub async fn create_if_missing(
        &self,
        point: security_point_model::Model,
    ) -> Result<bool, DbErr> {
        if self.find_by_id(point.id).await?.is_some() {
            return Ok(false);
        }

        let active = security_point_model::ActiveModel {
            id: Set(point.id),
            group_tag: Set(point.group_tag),
            point_type: Set(point.point_type),
            name: Set(point.name),
            description: Set(point.description),
        };
        active.insert(&self.db).await?;
        Ok(true)
    }

    /// いずれかのセット (Add/Del/Ovr) でこのポイントを参照しているグループを取得
    pub async fn referencing_groups(
        &self,
        sec_point_id: i32,
    ) -> Result<Vec<group_model::Model>, DbErr> {
        let mut group_ids: BTreeSet<i32> = BTreeSet::new();

        for row in GroupAddEntity::find()
            .filter(group_add_sec_point_model::Column::SecPointId.eq(sec_point_id))
            .all(&self.db)
            .await?
        {
            group_ids.insert(row.group_id);
        }
        for row in GroupDelEntity::find()
            .filter(group_del_sec_point_model::Column::SecPointId.eq(sec_point_id))
            .all(&self.db)
            .await?
        {
            group_ids.insert(row.group_id);
        }
        for row in GroupOvrEntity::find()
            .filter(group_ovr_sec_point_model::Column::SecPointId.eq(sec_point_id))
            .all(&self.db)
            .await?
        {
            group_ids.insert(row.group_id);
        }

        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        GroupEntity::find()
            .filter(group_model::Column::Id.is_in(group_ids))
            .order_by(group_model::Column::Priority, Order::Asc)
            .all(&self.db)
            .await
    }
}
