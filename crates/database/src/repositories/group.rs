//! Roles, role groups, member groups, and the tenant-scoped many-to-many
//! association tables between them (§4.3).
//!
//! Every association function below guards cross-tenant mixing with a
//! same-tenant subquery rather than trusting the caller's two IDs. This is
//! deliberately redundant with use-case-level authorization — the caller
//! has already checked both endpoints belong to the acting admin's tenant
//! — but it is the only thing standing between a programmer error and a
//! cross-tenant data leak, so every association path re-derives it from
//! the rows themselves.

use chrono::Utc;
use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{
    EventId, MemberGroup, MemberGroupId, MemberId, Role, RoleGroup, RoleGroupId, RoleId, TenantId,
};

macro_rules! named_entity_crud {
    ($mod_name:ident, $ty:ty, $id_ty:ty, $table:literal) => {
        pub mod $mod_name {
            use super::*;

            pub async fn save<'e, E>(exec: E, entity: &$ty) -> AppResult<$ty>
            where
                E: PgExecutor<'e>,
            {
                let query = format!(
                    r#"
                    INSERT INTO {table} (id, tenant_id, name, description, color, display_order,
                                          created_at, updated_at, deleted_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    ON CONFLICT (id) DO UPDATE SET
                        name = EXCLUDED.name,
                        description = EXCLUDED.description,
                        color = EXCLUDED.color,
                        display_order = EXCLUDED.display_order,
                        updated_at = EXCLUDED.updated_at,
                        deleted_at = EXCLUDED.deleted_at
                    RETURNING id, tenant_id, name, description, color, display_order,
                              created_at, updated_at, deleted_at
                    "#,
                    table = $table
                );
                sqlx::query_as::<_, $ty>(&query)
                    .bind(entity.id)
                    .bind(entity.tenant_id)
                    .bind(&entity.name)
                    .bind(&entity.description)
                    .bind(&entity.color)
                    .bind(entity.display_order)
                    .bind(entity.created_at)
                    .bind(entity.updated_at)
                    .bind(entity.deleted_at)
                    .fetch_one(exec)
                    .await
                    .map_err(AppError::from_sqlx_classified)
            }

            pub async fn find_by_id<'e, E>(
                exec: E,
                tenant_id: TenantId,
                id: $id_ty,
            ) -> AppResult<$ty>
            where
                E: PgExecutor<'e>,
            {
                let query = format!(
                    r#"
                    SELECT id, tenant_id, name, description, color, display_order,
                           created_at, updated_at, deleted_at
                    FROM {table} WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
                    "#,
                    table = $table
                );
                sqlx::query_as::<_, $ty>(&query)
                    .bind(tenant_id)
                    .bind(id)
                    .fetch_optional(exec)
                    .await
                    .map_err(AppError::from_sqlx_classified)?
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            concat!(stringify!($ty), " {} not found in tenant {}"),
                            id, tenant_id
                        ))
                    })
            }

            pub async fn find_by_tenant_id<'e, E>(
                exec: E,
                tenant_id: TenantId,
                params: &PaginationParams,
            ) -> AppResult<Vec<$ty>>
            where
                E: PgExecutor<'e>,
            {
                let (limit, offset) = super::super::pagination::limit_offset(params);
                let query = format!(
                    r#"
                    SELECT id, tenant_id, name, description, color, display_order,
                           created_at, updated_at, deleted_at
                    FROM {table} WHERE tenant_id = $1 AND deleted_at IS NULL
                    ORDER BY display_order ASC, name ASC
                    LIMIT $2 OFFSET $3
                    "#,
                    table = $table
                );
                sqlx::query_as::<_, $ty>(&query)
                    .bind(tenant_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(exec)
                    .await
                    .map_err(AppError::from_sqlx_classified)
            }

            pub async fn delete<'e, E>(exec: E, tenant_id: TenantId, id: $id_ty) -> AppResult<()>
            where
                E: PgExecutor<'e>,
            {
                let query = format!(
                    r#"
                    UPDATE {table} SET deleted_at = $3, updated_at = $3
                    WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
                    "#,
                    table = $table
                );
                let result = sqlx::query(&query)
                    .bind(tenant_id)
                    .bind(id)
                    .bind(Utc::now())
                    .execute(exec)
                    .await
                    .map_err(AppError::from_sqlx_classified)?;

                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound(format!(
                        concat!(stringify!($ty), " {} not found in tenant {}"),
                        id, tenant_id
                    )));
                }
                Ok(())
            }
        }
    };
}

named_entity_crud!(role, Role, RoleId, "roles");
named_entity_crud!(role_group, RoleGroup, RoleGroupId, "role_groups");
named_entity_crud!(member_group, MemberGroup, MemberGroupId, "member_groups");

/// `AssignMember(group_id, member_id)`: conditional insert. Succeeds with
/// zero rows inserted (and `Ok(())` returned) if the two endpoints are not
/// in the same live tenant — a silent rejection, not an error, per §4.3.
pub async fn assign_member_to_group<'e, E>(
    exec: E,
    member_id: MemberId,
    group_id: MemberGroupId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query!(
        r#"
        INSERT INTO member_group_memberships (member_id, group_id)
        SELECT m.id, g.id
        FROM members m
        JOIN member_groups g ON g.tenant_id = m.tenant_id
        WHERE m.id = $1 AND g.id = $2
          AND m.deleted_at IS NULL AND g.deleted_at IS NULL
        ON CONFLICT DO NOTHING
        "#,
        member_id as MemberId,
        group_id as MemberGroupId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;
    Ok(())
}

/// `RemoveMember(group_id, member_id)`: delete scoped by the same-tenant
/// join. Zero rows affected (cross-tenant or never-assigned) is `NotFound`.
pub async fn remove_member_from_group<'e, E>(
    exec: E,
    member_id: MemberId,
    group_id: MemberGroupId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query!(
        r#"
        DELETE FROM member_group_memberships mgm
        USING members m, member_groups g
        WHERE mgm.member_id = m.id AND mgm.group_id = g.id
          AND m.tenant_id = g.tenant_id
          AND mgm.member_id = $1 AND mgm.group_id = $2
        "#,
        member_id as MemberId,
        group_id as MemberGroupId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "member-group association not found".to_string(),
        ));
    }
    Ok(())
}

/// `SetMembersOfGroup(group_id, [member_ids])`: must run inside the
/// caller's transaction scope. Deletes every existing membership of
/// `group_id` then reinserts the conditional association for each supplied
/// member; cross-tenant members are silently dropped, never partially
/// applied.
pub async fn set_members_of_group<'a>(
    tx: &'a mut sqlx::Transaction<'static, sqlx::Postgres>,
    group_id: MemberGroupId,
    member_ids: &[MemberId],
) -> AppResult<()> {
    sqlx::query!(
        "DELETE FROM member_group_memberships WHERE group_id = $1",
        group_id as MemberGroupId,
    )
    .execute(&mut **tx)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    for member_id in member_ids {
        assign_member_to_group(&mut **tx, *member_id, group_id).await?;
    }
    Ok(())
}

/// `FindXByY`: always joins through both tables so a residual bad row
/// (e.g. left behind by a tenant rename) cannot leak into the result.
pub async fn find_member_ids_by_group_id<'e, E>(
    exec: E,
    group_id: MemberGroupId,
) -> AppResult<Vec<MemberId>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query!(
        r#"
        SELECT mgm.member_id as "member_id: MemberId"
        FROM member_group_memberships mgm
        JOIN members m ON m.id = mgm.member_id
        JOIN member_groups g ON g.id = mgm.group_id
        WHERE mgm.group_id = $1 AND m.tenant_id = g.tenant_id
          AND m.deleted_at IS NULL AND g.deleted_at IS NULL
        "#,
        group_id as MemberGroupId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    Ok(rows.into_iter().map(|r| r.member_id).collect())
}

pub async fn assign_role_to_member<'e, E>(exec: E, member_id: MemberId, role_id: RoleId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query!(
        r#"
        INSERT INTO member_role_assignments (member_id, role_id)
        SELECT m.id, r.id
        FROM members m
        JOIN roles r ON r.tenant_id = m.tenant_id
        WHERE m.id = $1 AND r.id = $2
          AND m.deleted_at IS NULL AND r.deleted_at IS NULL
        ON CONFLICT DO NOTHING
        "#,
        member_id as MemberId,
        role_id as RoleId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;
    Ok(())
}

pub async fn remove_role_from_member<'e, E>(exec: E, member_id: MemberId, role_id: RoleId) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query!(
        r#"
        DELETE FROM member_role_assignments mra
        USING members m, roles r
        WHERE mra.member_id = m.id AND mra.role_id = r.id
          AND m.tenant_id = r.tenant_id
          AND mra.member_id = $1 AND mra.role_id = $2
        "#,
        member_id as MemberId,
        role_id as RoleId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "member-role association not found".to_string(),
        ));
    }
    Ok(())
}

/// `SetRolesOfMember(member_id, [role_ids])`: must run inside the caller's
/// transaction scope, same replace-wholesale shape as `set_members_of_group`.
pub async fn set_roles_of_member<'a>(
    tx: &'a mut sqlx::Transaction<'static, sqlx::Postgres>,
    member_id: MemberId,
    role_ids: &[RoleId],
) -> AppResult<()> {
    sqlx::query!(
        "DELETE FROM member_role_assignments WHERE member_id = $1",
        member_id as MemberId,
    )
    .execute(&mut **tx)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    for role_id in role_ids {
        assign_role_to_member(&mut **tx, member_id, *role_id).await?;
    }
    Ok(())
}

/// `FindXByY`: joins through both tables so a residual bad row cannot leak
/// into the result.
pub async fn find_role_ids_by_member_id<'e, E>(
    exec: E,
    member_id: MemberId,
) -> AppResult<Vec<RoleId>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query!(
        r#"
        SELECT mra.role_id as "role_id: RoleId"
        FROM member_role_assignments mra
        JOIN members m ON m.id = mra.member_id
        JOIN roles r ON r.id = mra.role_id
        WHERE mra.member_id = $1 AND m.tenant_id = r.tenant_id
          AND m.deleted_at IS NULL AND r.deleted_at IS NULL
        "#,
        member_id as MemberId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    Ok(rows.into_iter().map(|r| r.role_id).collect())
}

pub async fn assign_role_to_role_group<'e, E>(
    exec: E,
    role_id: RoleId,
    role_group_id: RoleGroupId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query!(
        r#"
        INSERT INTO role_group_memberships (role_id, role_group_id)
        SELECT r.id, g.id
        FROM roles r
        JOIN role_groups g ON g.tenant_id = r.tenant_id
        WHERE r.id = $1 AND g.id = $2
          AND r.deleted_at IS NULL AND g.deleted_at IS NULL
        ON CONFLICT DO NOTHING
        "#,
        role_id as RoleId,
        role_group_id as RoleGroupId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;
    Ok(())
}

pub async fn remove_role_from_role_group<'e, E>(
    exec: E,
    role_id: RoleId,
    role_group_id: RoleGroupId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query!(
        r#"
        DELETE FROM role_group_memberships rgm
        USING roles r, role_groups g
        WHERE rgm.role_id = r.id AND rgm.role_group_id = g.id
          AND r.tenant_id = g.tenant_id
          AND rgm.role_id = $1 AND rgm.role_group_id = $2
        "#,
        role_id as RoleId,
        role_group_id as RoleGroupId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "role-role_group association not found".to_string(),
        ));
    }
    Ok(())
}

/// `SetRolesOfRoleGroup(role_group_id, [role_ids])`: must run inside the
/// caller's transaction scope.
pub async fn set_roles_of_role_group<'a>(
    tx: &'a mut sqlx::Transaction<'static, sqlx::Postgres>,
    role_group_id: RoleGroupId,
    role_ids: &[RoleId],
) -> AppResult<()> {
    sqlx::query!(
        "DELETE FROM role_group_memberships WHERE role_group_id = $1",
        role_group_id as RoleGroupId,
    )
    .execute(&mut **tx)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    for role_id in role_ids {
        assign_role_to_role_group(&mut **tx, *role_id, role_group_id).await?;
    }
    Ok(())
}

pub async fn find_role_ids_by_role_group_id<'e, E>(
    exec: E,
    role_group_id: RoleGroupId,
) -> AppResult<Vec<RoleId>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query!(
        r#"
        SELECT rgm.role_id as "role_id: RoleId"
        FROM role_group_memberships rgm
        JOIN roles r ON r.id = rgm.role_id
        JOIN role_groups g ON g.id = rgm.role_group_id
        WHERE rgm.role_group_id = $1 AND r.tenant_id = g.tenant_id
          AND r.deleted_at IS NULL AND g.deleted_at IS NULL
        "#,
        role_group_id as RoleGroupId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    Ok(rows.into_iter().map(|r| r.role_id).collect())
}

pub async fn assign_group_to_event<'e, E>(
    exec: E,
    event_id: EventId,
    member_group_id: MemberGroupId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query!(
        r#"
        INSERT INTO event_group_assignments (event_id, member_group_id)
        SELECT e.id, g.id
        FROM events e
        JOIN member_groups g ON g.tenant_id = e.tenant_id
        WHERE e.id = $1 AND g.id = $2
          AND e.deleted_at IS NULL AND g.deleted_at IS NULL
        ON CONFLICT DO NOTHING
        "#,
        event_id as EventId,
        member_group_id as MemberGroupId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;
    Ok(())
}

pub async fn remove_group_from_event<'e, E>(
    exec: E,
    event_id: EventId,
    member_group_id: MemberGroupId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query!(
        r#"
        DELETE FROM event_group_assignments ega
        USING events e, member_groups g
        WHERE ega.event_id = e.id AND ega.member_group_id = g.id
          AND e.tenant_id = g.tenant_id
          AND ega.event_id = $1 AND ega.member_group_id = $2
        "#,
        event_id as EventId,
        member_group_id as MemberGroupId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "event-group association not found".to_string(),
        ));
    }
    Ok(())
}

/// `SetGroupsOfEvent(event_id, [group_ids])`: must run inside the caller's
/// transaction scope.
pub async fn set_groups_of_event<'a>(
    tx: &'a mut sqlx::Transaction<'static, sqlx::Postgres>,
    event_id: EventId,
    member_group_ids: &[MemberGroupId],
) -> AppResult<()> {
    sqlx::query!(
        "DELETE FROM event_group_assignments WHERE event_id = $1",
        event_id as EventId,
    )
    .execute(&mut **tx)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    for member_group_id in member_group_ids {
        assign_group_to_event(&mut **tx, event_id, *member_group_id).await?;
    }
    Ok(())
}

pub async fn find_group_ids_by_event_id<'e, E>(
    exec: E,
    event_id: EventId,
) -> AppResult<Vec<MemberGroupId>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query!(
        r#"
        SELECT ega.member_group_id as "member_group_id: MemberGroupId"
        FROM event_group_assignments ega
        JOIN events e ON e.id = ega.event_id
        JOIN member_groups g ON g.id = ega.member_group_id
        WHERE ega.event_id = $1 AND e.tenant_id = g.tenant_id
          AND e.deleted_at IS NULL AND g.deleted_at IS NULL
        "#,
        event_id as EventId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    Ok(rows.into_iter().map(|r| r.member_group_id).collect())
}

pub async fn assign_role_group_to_event<'e, E>(
    exec: E,
    event_id: EventId,
    role_group_id: RoleGroupId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query!(
        r#"
        INSERT INTO event_role_group_assignments (event_id, role_group_id)
        SELECT e.id, g.id
        FROM events e
        JOIN role_groups g ON g.tenant_id = e.tenant_id
        WHERE e.id = $1 AND g.id = $2
          AND e.deleted_at IS NULL AND g.deleted_at IS NULL
        ON CONFLICT DO NOTHING
        "#,
        event_id as EventId,
        role_group_id as RoleGroupId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;
    Ok(())
}

pub async fn remove_role_group_from_event<'e, E>(
    exec: E,
    event_id: EventId,
    role_group_id: RoleGroupId,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query!(
        r#"
        DELETE FROM event_role_group_assignments erga
        USING events e, role_groups g
        WHERE erga.event_id = e.id AND erga.role_group_id = g.id
          AND e.tenant_id = g.tenant_id
          AND erga.event_id = $1 AND erga.role_group_id = $2
        "#,
        event_id as EventId,
        role_group_id as RoleGroupId,
    )
    .execute(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "event-role_group association not found".to_string(),
        ));
    }
    Ok(())
}

/// `SetRoleGroupsOfEvent(event_id, [role_group_ids])`: must run inside the
/// caller's transaction scope.
pub async fn set_role_groups_of_event<'a>(
    tx: &'a mut sqlx::Transaction<'static, sqlx::Postgres>,
    event_id: EventId,
    role_group_ids: &[RoleGroupId],
) -> AppResult<()> {
    sqlx::query!(
        "DELETE FROM event_role_group_assignments WHERE event_id = $1",
        event_id as EventId,
    )
    .execute(&mut **tx)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    for role_group_id in role_group_ids {
        assign_role_group_to_event(&mut **tx, event_id, *role_group_id).await?;
    }
    Ok(())
}

pub async fn find_role_group_ids_by_event_id<'e, E>(
    exec: E,
    event_id: EventId,
) -> AppResult<Vec<RoleGroupId>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query!(
        r#"
        SELECT erga.role_group_id as "role_group_id: RoleGroupId"
        FROM event_role_group_assignments erga
        JOIN events e ON e.id = erga.event_id
        JOIN role_groups g ON g.id = erga.role_group_id
        WHERE erga.event_id = $1 AND e.tenant_id = g.tenant_id
          AND e.deleted_at IS NULL AND g.deleted_at IS NULL
        "#,
        event_id as EventId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?;

    Ok(rows.into_iter().map(|r| r.role_group_id).collect())
}
