// secpoint-backend/src/service/seed_service.rs

use crate::domain::security_point_model;
use crate::domain::server_event_model::status;
use crate::error::{AppError, AppResult};
use crate::repository::group_repository::{GroupRepository, UpsertGroup};
use crate::repository::security_point_repository::SecurityPointRepository;
use crate::service::server_event_service::ServerEventService;
use serde::Deserialize;
use std::sync::Arc;

/// バイナリに埋め込むカタログ定義
const SECURITY_POINTS_JSON: &str = include_str!("../../seeds/security_points.json");
const GROUPS_JSON: &str = include_str!("../../seeds/groups.json");

/// セキュリティポイントのシード定義
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityPointSeed {
    pub id: i32,
    pub group_tag: String,
    pub point_type: String,
    pub name: String,
    pub description: String,
}

impl From<SecurityPointSeed> for security_point_model::Model {
    fn from(seed: SecurityPointSeed) -> Self {
        Self {
            id: seed.id,
            group_tag: seed.group_tag,
            point_type: seed.point_type,
            name: seed.name,
            description: seed.description,
        }
    }
}

/// グループのシード定義。セットはポイントIDでのみ参照する
#[derive(Debug, Clone, Deserialize)]
pub struct GroupSeed {
    pub id: i32,
    pub priority: i32,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub add_sec_points: Vec<i32>,
    #[serde(default)]
    pub del_sec_points: Vec<i32>,
    #[serde(default)]
    pub ovr_sec_points: Vec<i32>,
}

/// 埋め込みシードのパース
pub fn parse_security_point_seeds() -> AppResult<Vec<SecurityPointSeed>> {
    serde_json::from_str(SECURITY_POINTS_JSON)
        .map_err(|e| AppError::InternalServerError(format!("Invalid security point seed: {}", e)))
}

pub fn parse_group_seeds() -> AppResult<Vec<GroupSeed>> {
    serde_json::from_str(GROUPS_JSON)
        .map_err(|e| AppError::InternalServerError(format!("Invalid group seed: {}", e)))
}

/// 起動時シードサービス
pub struct SeedService {
    sec_point_repo: Arc<SecurityPointRepository>,
    group_repo: Arc<GroupRepository>,
    events: Arc<ServerEventService>,
}

impl SeedService {
    pub fn new(
        sec_point_repo: Arc<SecurityPointRepository>,
        group_repo: Arc<GroupRepository>,
        events: Arc<ServerEventService>,
    ) -> Self {
        Self {
            sec_point_repo,
            group_repo,
            events,
        }
    }

    /// カタログ全体を適用する。
    ///
    /// ポイントは存在しないものだけ作成し、グループは毎回セットを
    /// シードの内容で差し替える。
    pub async fn apply(&self) -> AppResult<()> {
        self.apply_security_points().await?;
        self.apply_groups().await?;
        Ok(())
    }

    async fn apply_security_points(&self) -> AppResult<()> {
        for seed in parse_security_point_seeds()? {
            let id = seed.id;
            let created = self.sec_point_repo.create_if_missing(seed.into()).await?;
            if created {
                self.events
                    .log(
                        "CreateSecPoints",
                        format!("Created security point {}", id),
                        status::INFO,
                    )
                    .await;
            } else {
                tracing::debug!(sec_point_id = id, "Security point already exists");
            }
        }
        Ok(())
    }

    async fn apply_groups(&self) -> AppResult<()> {
        for seed in parse_group_seeds()? {
            let add = self.resolve_point_ids(&seed, seed.add_sec_points.clone(), "Add").await?;
            let del = self.resolve_point_ids(&seed, seed.del_sec_points.clone(), "Del").await?;
            let ovr = self.resolve_point_ids(&seed, seed.ovr_sec_points.clone(), "Ovr").await?;

            self.group_repo
                .upsert(UpsertGroup {
                    id: seed.id,
                    priority: seed.priority,
                    name: seed.name.clone(),
                    description: seed.description.clone(),
                    add_sec_point_ids: add,
                    del_sec_point_ids: del,
                    ovr_sec_point_ids: ovr,
                })
                .await?;

            tracing::info!(group_id = seed.id, group = %seed.name, "Seeded group");
        }
        Ok(())
    }

    /// 参照先ポイントの存在を確認し、未知のIDは記録した上で読み飛ばす
    async fn resolve_point_ids(
        &self,
        seed: &GroupSeed,
        ids: Vec<i32>,
        which: &str,
    ) -> AppResult<Vec<i32>> {
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            if self.sec_point_repo.find_by_id(id).await?.is_some() {
                resolved.push(id);
            } else {
                self.events
                    .log_error(
                        &format!("CreateGroups:Eval{}SecPoints", which),
                        &format!("security point with ID {} does not exist", id),
                        &format!("Group {}", seed.name),
                    )
                    .await;
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::security_point_model::well_known;

    #[test]
    fn test_embedded_security_point_seeds_parse() {
        let seeds = parse_security_point_seeds().unwrap();
        assert!(!seeds.is_empty());

        // スーパーユーザーポイントは必ずカタログに存在する
        let superuser = seeds
            .iter()
            .find(|s| s.id == well_known::SUPERUSER)
            .expect("superuser point missing from seed");
        assert_eq!(superuser.name, "superuser");
    }

    #[test]
    fn test_embedded_group_seeds_parse() {
        let seeds = parse_group_seeds().unwrap();
        assert!(!seeds.is_empty());

        // グループが参照するIDはカタログ内に存在する
        let point_ids: Vec<i32> = parse_security_point_seeds()
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        for group in &seeds {
            for id in group
                .add_sec_points
                .iter()
                .chain(&group.del_sec_points)
                .chain(&group.ovr_sec_points)
            {
                assert!(
                    point_ids.contains(id),
                    "group {} references unknown point {}",
                    group.name,
                    id
                );
            }
        }
    }

    #[test]
    fn test_seed_priorities_are_unique() {
        let seeds = parse_group_seeds().unwrap();
        let mut priorities: Vec<i32> = seeds.iter().map(|g| g.priority).collect();
        priorities.sort_unstable();
        priorities.dedup();
        assert_eq!(priorities.len(), seeds.len());
    }
}
