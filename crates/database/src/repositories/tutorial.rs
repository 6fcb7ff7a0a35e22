//! Tutorial repository. Tutorials are global reference content, not
//! tenant-scoped — the one entity in §3 without a `tenant_id` column.

use chrono::Utc;
use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{Tutorial, TutorialId};

pub async fn save<'e, E>(exec: E, tutorial: &Tutorial) -> AppResult<Tutorial>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Tutorial,
        r#"
        INSERT INTO tutorials (id, title, body, display_order, created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            title = EXCLUDED.title,
            body = EXCLUDED.body,
            display_order = EXCLUDED.display_order,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        RETURNING id, title, body, display_order, created_at, updated_at, deleted_at
        "#,
        tutorial.id as TutorialId,
        tutorial.title,
        tutorial.body,
        tutorial.display_order,
        tutorial.created_at,
        tutorial.updated_at,
        tutorial.deleted_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_by_id<'e, E>(exec: E, id: TutorialId) -> AppResult<Tutorial>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Tutorial,
        r#"
        SELECT id, title, body, display_order, created_at, updated_at, deleted_at
        FROM tutorials WHERE id = $1 AND deleted_at IS NULL
        "#,
        id as TutorialId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("tutorial {id} not found")))
}

pub async fn find_all<'e, E>(exec: E, params: &PaginationParams) -> AppResult<Vec<Tutorial>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        Tutorial,
        r#"
        SELECT id, title, body, display_order, created_at, updated_at, deleted_at
        FROM tutorials
        WHERE deleted_at IS NULL
        ORDER BY display_order ASC
        LIMIT $1 OFFSET $2
        "#,
        limit,
        offset,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn delete<'e, E>(exec: E, id: TutorialId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let now = Utc::now();
    let result = sqlx::query!(
        "UPDATE tutorials SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        id as TutorialId,
        now,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("tutorial {id} not found")));
    }
    Ok(())
}
