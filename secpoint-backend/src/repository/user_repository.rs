// secpoint-backend/src/repository/user_repository.rs

use crate::domain::effective_permission::{GroupPermissionSets, UserPermissionSets};
use crate::domain::group_model::{self, Entity as GroupEntity};
use crate::domain::security_point_model::{self, Entity as SecurityPointEntity};
use crate::domain::user_add_sec_point_model::{self, Entity as UserAddEntity};
use crate::domain::user_del_sec_point_model::{self, Entity as UserDelEntity};
use crate::domain::user_group_model::{self, Entity as UserGroupEntity};
use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use crate::domain::user_ovr_sec_point_model::{self, Entity as UserOvrEntity};
use crate::repository::group_repository::GroupRepository;
use chrono::Utc;
use sea_orm::entity::*;
use sea_orm::{Condition, DbConn, DbErr, Order, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

/// ユーザー作成の入力
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// ユーザー個別セキュリティポイントの書き込み先セット
///
/// Ovr は Del とは別のテーブルに書く。ここを取り違えると上書き指定が
/// 削除として評価されてしまう。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecPointSet {
    Add,
    Del,
    Ovr,
}

impl SecPointSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecPointSet::Add => "add",
            SecPointSet::Del => "del",
            SecPointSet::Ovr => "ovr",
        }
    }
}

/// ユーザーと評価入力一式 (グループのセット + 個別セット)
#[derive(Debug, Clone)]
pub struct PermissionBundle {
    pub groups: Vec<GroupPermissionSets>,
    pub user: UserPermissionSets,
}

#[derive(Debug)]
pub struct UserRepository {
    db: DbConn,
}

impl UserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    // --- 基本CRUD操作 ---

    /// ユーザーをIDで検索
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find_by_id(id).one(&self.db).await
    }

    /// ユーザーをユーザー名で検索
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// メールアドレスまたはユーザー名でユーザーを検索
    pub async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(
                Condition::any()
                    .add(user_model::Column::Email.eq(identifier))
                    .add(user_model::Column::Username.eq(identifier)),
            )
            .one(&self.db)
            .await
    }

    /// ユーザー名が使用済みかチェック
    pub async fn is_username_taken(&self, username: &str) -> Result<bool, DbErr> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// メールアドレスが使用済みかチェック
    pub async fn is_email_taken(&self, email: &str) -> Result<bool, DbErr> {
        Ok(UserEntity::find()
            .filter(user_model::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .is_some())
    }

    /// ユーザーを作成
    pub async fn create(&self, create_user: CreateUser) -> Result<user_model::Model, DbErr> {
        let new_user = UserActiveModel {
            username: Set(create_user.username),
            email: Set(create_user.email),
            first_name: Set(create_user.first_name),
            last_name: Set(create_user.last_name),
            password_hash: Set(create_user.password_hash),
            ..UserActiveModel::new()
        };

        new_user.insert(&self.db).await
    }

    /// パスワードハッシュを更新
    pub async fn update_password(
        &self,
        id: Uuid,
        password_hash: String,
    ) -> Result<Option<user_model::Model>, DbErr> {
        let user = match UserEntity::find_by_id(id).one(&self.db).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let mut active: UserActiveModel = user.into();
        active.password_hash = Set(password_hash);
        Ok(Some(active.update(&self.db).await?))
    }

    /// アクティブフラグを更新 (無効化/再有効化)
    pub async fn set_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<user_model::Model>, DbErr> {
        let user = match UserEntity::find_by_id(id).one(&self.db).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let mut active: UserActiveModel = user.into();
        active.is_active = Set(is_active);
        Ok(Some(active.update(&self.db).await?))
    }

    /// 最終ログイン日時を記録
    pub async fn update_last_login(&self, id: Uuid) -> Result<(), DbErr> {
        let user = match UserEntity::find_by_id(id).one(&self.db).await? {
            Some(user) => user,
            None => return Ok(()),
        };

        let mut active: UserActiveModel = user.into();
        active.last_login_at = Set(Some(Utc::now()));
        active.update(&self.db).await?;
        Ok(())
    }

    // --- グループ所属 ---

    /// 所属グループを優先度順に取得
    pub async fn groups_for_user(&self, user_id: Uuid) -> Result<Vec<group_model::Model>, DbErr> {
        let group_ids: Vec<i32> = UserGroupEntity::find()
            .filter(user_group_model::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.group_id)
            .collect();

        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        GroupEntity::find()
            .filter(group_model::Column::Id.is_in(group_ids))
            .order_by(group_model::Column::Priority, Order::Asc)
            .order_by(group_model::Column::Id, Order::Asc)
            .all(&self.db)
            .await
    }

    /// ユーザーがグループに所属しているかチェック
    pub async fn is_in_group(&self, user_id: Uuid, group_id: i32) -> Result<bool, DbErr> {
        Ok(UserGroupEntity::find_by_id((user_id, group_id))
            .one(&self.db)
            .await?
            .is_some())
    }

    /// ユーザーをグループに追加
    pub async fn add_to_group(&self, user_id: Uuid, group_id: i32) -> Result<(), DbErr> {
        user_group_model::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(group_id),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    /// ユーザーをグループから除外
    pub async fn remove_from_group(&self, user_id: Uuid, group_id: i32) -> Result<(), DbErr> {
        UserGroupEntity::delete_many()
            .filter(user_group_model::Column::UserId.eq(user_id))
            .filter(user_group_model::Column::GroupId.eq(group_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    // --- ユーザー個別セキュリティポイント ---

    /// 指定セットにセキュリティポイントを追加
    pub async fn add_sec_point(
        &self,
        user_id: Uuid,
        sec_point_id: i32,
        set: SecPointSet,
    ) -> Result<(), DbErr> {
        match set {
            SecPointSet::Add => {
                user_add_sec_point_model::ActiveModel {
                    user_id: Set(user_id),
                    sec_point_id: Set(sec_point_id),
                }
                .insert(&self.db)
                .await?;
            }
            SecPointSet::Del => {
                user_del_sec_point_model::ActiveModel {
                    user_id: Set(user_id),
                    sec_point_id: Set(sec_point_id),
                }
                .insert(&self.db)
                .await?;
            }
            SecPointSet::Ovr => {
                user_ovr_sec_point_model::ActiveModel {
                    user_id: Set(user_id),
                    sec_point_id: Set(sec_point_id),
                }
                .insert(&self.db)
                .await?;
            }
        }
        Ok(())
    }

    /// 指定セットからセキュリティポイントを削除
    pub async fn remove_sec_point(
        &self,
        user_id: Uuid,
        sec_point_id: i32,
        set: SecPointSet,
    ) -> Result<(), DbErr> {
        match set {
            SecPointSet::Add => {
                UserAddEntity::delete_many()
                    .filter(user_add_sec_point_model::Column::UserId.eq(user_id))
                    .filter(user_add_sec_point_model::Column::SecPointId.eq(sec_point_id))
                    .exec(&self.db)
                    .await?;
            }
            SecPointSet::Del => {
                UserDelEntity::delete_many()
                    .filter(user_del_sec_point_model::Column::UserId.eq(user_id))
                    .filter(user_del_sec_point_model::Column::SecPointId.eq(sec_point_id))
                    .exec(&self.db)
                    .await?;
            }
            SecPointSet::Ovr => {
                UserOvrEntity::delete_many()
                    .filter(user_ovr_sec_point_model::Column::UserId.eq(user_id))
                    .filter(user_ovr_sec_point_model::Column::SecPointId.eq(sec_point_id))
                    .exec(&self.db)
                    .await?;
            }
        }
        Ok(())
    }

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

    /// 指定セットのセキュリティポイントを取得
    pub async fn sec_points_for_user(
        &self,
        user_id: Uuid,
        set: SecPointSet,
    ) -> Result<Vec<security_point_model::Model>, DbErr> {
        let ids: Vec<i32> = match set {
            SecPointSet::Add => UserAddEntity::find()
                .filter(user_add_sec_point_model::Column::UserId.eq(user_id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|row| row.sec_point_id)
                .collect(),
            SecPointSet::Del => UserDelEntity::find()
                .filter(user_del_sec_point_model::Column::UserId.eq(user_id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|row| row.sec_point_id)
                .collect(),
            SecPointSet::Ovr => UserOvrEntity::find()
                .filter(user_ovr_sec_point_model::Column::UserId.eq(user_id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|row| row.sec_point_id)
                .collect(),
        };
        self.sec_points_by_ids(ids).await
    }

    /// 実効ポイント評価に必要な入力一式を読み出す
    ///
    /// 所属グループそれぞれの3セットと、ユーザー個別の3セット。呼び出し1回分が
    /// 評価のスナップショットになる。
    pub async fn load_permission_bundle(
        &self,
        user_id: Uuid,
        group_repo: &GroupRepository,
    ) -> Result<PermissionBundle, DbErr> {
        let mut groups = Vec::new();
        for group in self.groups_for_user(user_id).await? {
            groups.push(group_repo.load_permission_sets(&group).await?);
        }

        let user = UserPermissionSets {
            add: self.sec_points_for_user(user_id, SecPointSet::Add).await?,
            del: self.sec_points_for_user(user_id, SecPointSet::Del).await?,
            ovr: self.sec_points_for_user(user_id, SecPointSet::Ovr).await?,
        };

        Ok(PermissionBundle { groups, user })
    }
}
