// secpoint-backend/src/domain/mod.rs
pub mod api_key_model;
pub mod effective_permission;
pub mod group_add_sec_point_model;
pub mod group_del_sec_point_model;
pub mod group_model;
pub mod group_ovr_sec_point_model;
pub mod security_point_model;
pub mod server_event_model;
pub mod user_add_sec_point_model;
pub mod user_del_sec_point_model;
pub mod user_group_model;
pub mod user_model;
pub mod user_ovr_sec_point_model;
