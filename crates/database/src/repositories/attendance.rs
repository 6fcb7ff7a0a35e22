//! AttendanceCollection and its owned children: target dates, group/role
//! assignments, and member responses (§4.4, §4.6, §9 open question (i)).

use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{
    AttendanceCollection, CollectionId, AttendanceCollectionStatus, AttendanceResponse,
    AttendanceResponseId, AttendanceTargetDate, CollectionGroupAssignmentId,
    CollectionRoleAssignmentId, MemberGroupId, MemberId, ResponseValue, RoleId, TargetDateId,
    TenantId,
};

/// Upserts the collection, then replaces its owned target-date rows
/// wholesale inside the caller's transaction, mirroring the event
/// template/item pattern (§4.4).
pub async fn save(
    tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
    collection: &AttendanceCollection,
    target_dates: &[AttendanceTargetDate],
) -> AppResult<AttendanceCollection> {
    let saved = sqlx::query_as!(
        AttendanceCollection,
        r#"
        INSERT INTO attendance_collections (id, tenant_id, name, public_token, status,
                                             created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            status = EXCLUDED.status,
            updated_at = EXCLUDED.updated_at,
            deleted_at = EXCLUDED.deleted_at
        RETURNING id, tenant_id, name, public_token,
                  status as "status: AttendanceCollectionStatus",
                  created_at, updated_at, deleted_at
        "#,
        collection.id as CollectionId,
        collection.tenant_id as TenantId,
        collection.name,
        collection.public_token,
        collection.status as AttendanceCollectionStatus,
        collection.created_at,
        collection.updated_at,
        collection.deleted_at,
    )
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    sqlx::query!(
        "DELETE FROM attendance_target_dates WHERE collection_id = $1",
        saved.id as CollectionId,
    )
    .execute(&mut **tx)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    for date in target_dates {
        sqlx::query!(
            r#"
            INSERT INTO attendance_target_dates (id, collection_id, target_date, display_order)
            VALUES ($1, $2, $3, $4)
            "#,
            date.id as TargetDateId,
            saved.id as CollectionId,
            date.target_date,
            date.display_order,
        )
        .execute(&mut **tx)
        .await
        .map_err(AppError::from_sqlx_classified)?;
    }

    Ok(saved)
}

pub async fn find_by_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    id: CollectionId,
) -> AppResult<AttendanceCollection>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        AttendanceCollection,
        r#"
        SELECT id, tenant_id, name, public_token,
               status as "status: AttendanceCollectionStatus",
               created_at, updated_at, deleted_at
        FROM attendance_collections WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as CollectionId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| {
        AppError::NotFound(format!(
            "attendance collection {id} not found in tenant {tenant_id}"
        ))
    })
}

/// Looked up by the unguessable `public_token` — this is how an
/// unauthenticated respondent reaches their collection (§4.6).
pub async fn find_by_public_token<'e, E>(
    exec: E,
    public_token: &str,
) -> AppResult<AttendanceCollection>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        AttendanceCollection,
        r#"
        SELECT id, tenant_id, name, public_token,
               status as "status: AttendanceCollectionStatus",
               created_at, updated_at, deleted_at
        FROM attendance_collections WHERE public_token = $1 AND deleted_at IS NULL
        "#,
        public_token,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound("attendance collection not found".into()))
}

pub async fn find_by_tenant_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    params: &PaginationParams,
) -> AppResult<Vec<AttendanceCollection>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        AttendanceCollection,
        r#"
        SELECT id, tenant_id, name, public_token,
               status as "status: AttendanceCollectionStatus",
               created_at, updated_at, deleted_at
        FROM attendance_collections
        WHERE tenant_id = $1 AND deleted_at IS NULL
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
        tenant_id as TenantId,
        limit,
        offset,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn delete<'e, E>(
    exec: E,
    tenant_id: TenantId,
    id: CollectionId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let now = chrono::Utc::now();
    let result = sqlx::query!(
        r#"
        UPDATE attendance_collections SET deleted_at = $3, updated_at = $3
        WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
        "#,
        tenant_id as TenantId,
        id as CollectionId,
        now,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "attendance collection {id} not found in tenant {tenant_id}"
        )));
    }
    Ok(())
}

pub async fn find_target_dates_by_collection_id<'e, E>(
    exec: E,
    collection_id: CollectionId,
) -> AppResult<Vec<AttendanceTargetDate>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        AttendanceTargetDate,
        r#"
        SELECT id, collection_id, target_date, display_order
        FROM attendance_target_dates
        WHERE collection_id = $1
        ORDER BY display_order ASC
        "#,
        collection_id as CollectionId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

/// Tenant-scoped association (§4.3): silently rejects a group from a
/// different tenant than the collection.
pub async fn assign_group<'e, E>(
    exec: E,
    collection_id: CollectionId,
    member_group_id: MemberGroupId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query!(
        r#"
        INSERT INTO collection_group_assignments (id, collection_id, member_group_id)
        SELECT $3, c.id, g.id
        FROM attendance_collections c
        JOIN member_groups g ON g.tenant_id = c.tenant_id
        WHERE c.id = $1 AND g.id = $2
        ON CONFLICT DO NOTHING
        "#,
        collection_id as CollectionId,
        member_group_id as MemberGroupId,
        CollectionGroupAssignmentId::new() as CollectionGroupAssignmentId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;
    Ok(())
}

pub async fn assign_role<'e, E>(
    exec: E,
    collection_id: CollectionId,
    role_id: RoleId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query!(
        r#"
        INSERT INTO collection_role_assignments (id, collection_id, role_id)
        SELECT $3, c.id, r.id
        FROM attendance_collections c
        JOIN roles r ON r.tenant_id = c.tenant_id
        WHERE c.id = $1 AND r.id = $2
        ON CONFLICT DO NOTHING
        "#,
        collection_id as CollectionId,
        role_id as RoleId,
        CollectionRoleAssignmentId::new() as CollectionRoleAssignmentId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;
    Ok(())
}

/// Upsert keyed `(collection_id, member_id, target_date_id)` only, per §9
/// open question (i) — responses are not further scoped by group or role.
pub async fn save_response<'e, E>(
    exec: E,
    response: &AttendanceResponse,
) -> AppResult<AttendanceResponse>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        AttendanceResponse,
        r#"
        INSERT INTO attendance_responses (id, tenant_id, collection_id, member_id,
                                           target_date_id, response, responded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (collection_id, member_id, target_date_id) DO UPDATE SET
            response = EXCLUDED.response,
            responded_at = EXCLUDED.responded_at
        RETURNING id, tenant_id, collection_id, member_id, target_date_id,
                  response as "response: ResponseValue", responded_at
        "#,
        response.id as AttendanceResponseId,
        response.tenant_id as TenantId,
        response.collection_id as CollectionId,
        response.member_id as MemberId,
        response.target_date_id as TargetDateId,
        response.response as ResponseValue,
        response.responded_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_responses_by_collection_id<'e, E>(
    exec: E,
    collection_id: CollectionId,
) -> AppResult<Vec<AttendanceResponse>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        AttendanceResponse,
        r#"
        SELECT id, tenant_id, collection_id, member_id, target_date_id,
               response as "response: ResponseValue", responded_at
        FROM attendance_responses
        WHERE collection_id = $1
        ORDER BY responded_at ASC
        "#,
        collection_id as CollectionId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tenant;
    use sqlx::PgPool;

    fn make_tenant() -> Tenant {
        let now = chrono::Utc::now();
        Tenant {
            id: TenantId::new(),
            name: "Acme".into(),
            timezone: "UTC".into(),
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn make_collection(tenant_id: TenantId) -> AttendanceCollection {
        let now = chrono::Utc::now();
        AttendanceCollection {
            id: CollectionId::new(),
            tenant_id,
            name: "Sprint planning".into(),
            public_token: shared::hashing::generate_token(),
            status: AttendanceCollectionStatus::Open,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn target_dates(collection_id: CollectionId, days: &[&str]) -> Vec<AttendanceTargetDate> {
        days.iter()
            .enumerate()
            .map(|(i, day)| AttendanceTargetDate {
                id: TargetDateId::new(),
                collection_id,
                target_date: day.parse().unwrap(),
                display_order: i as i32,
            })
            .collect()
    }

    /// §8 scenario (d): re-`save`ing a collection with a different set of
    /// target dates replaces the children wholesale — the old rows are
    /// gone, not merged with the new ones.
    #[sqlx::test]
    async fn save_replaces_target_dates(pool: PgPool) -> sqlx::Result<()> {
        let tenant = make_tenant();
        crate::repositories::tenant::save(&pool, &tenant)
            .await
            .unwrap();

        let collection = make_collection(tenant.id);

        let mut tx = pool.begin().await.unwrap();
        let first_dates = target_dates(collection.id, &["2026-08-01", "2026-08-02"]);
        save(&mut tx, &collection, &first_dates).await.unwrap();
        tx.commit().await.unwrap();

        let stored = find_target_dates_by_collection_id(&pool, collection.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);

        let mut tx = pool.begin().await.unwrap();
        let second_dates = target_dates(collection.id, &["2026-09-10"]);
        save(&mut tx, &collection, &second_dates).await.unwrap();
        tx.commit().await.unwrap();

        let stored = find_target_dates_by_collection_id(&pool, collection.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].target_date.to_string(), "2026-09-10");

        Ok(())
    }
}
