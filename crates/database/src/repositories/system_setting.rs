//! Global key/value settings store. Not tenant-scoped — these are
//! operator-level switches, not per-tenant configuration.

use shared::{AppError, AppResult};
use sqlx::PgExecutor;

use crate::models::{SystemSetting, SystemSettingId};

pub async fn save<'e, E>(exec: E, setting: &SystemSetting) -> AppResult<SystemSetting>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        SystemSetting,
        r#"
        INSERT INTO system_settings (id, key, value, updated_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (key) DO UPDATE SET
            value = EXCLUDED.value,
            updated_at = EXCLUDED.updated_at
        RETURNING id, key, value, updated_at
        "#,
        setting.id as SystemSettingId,
        setting.key,
        setting.value,
        setting.updated_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_by_key<'e, E>(exec: E, key: &str) -> AppResult<SystemSetting>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        SystemSetting,
        "SELECT id, key, value, updated_at FROM system_settings WHERE key = $1",
        key,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("system setting {key} not found")))
}

pub async fn find_all<'e, E>(exec: E) -> AppResult<Vec<SystemSetting>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        SystemSetting,
        "SELECT id, key, value, updated_at FROM system_settings ORDER BY key ASC",
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}
