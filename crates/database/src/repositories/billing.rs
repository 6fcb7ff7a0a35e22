//! Plans, subscriptions, entitlements, and the append-only billing audit
//! trail.

use shared::{AppError, AppResult, PaginationParams};
use sqlx::PgExecutor;

use crate::models::{
    BillingAuditLog, BillingAuditLogId, Entitlement, EntitlementId, Plan, PlanId, Subscription,
    SubscriptionId, TenantId,
};

pub async fn save_plan<'e, E>(exec: E, plan: &Plan) -> AppResult<Plan>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Plan,
        r#"
        INSERT INTO plans (id, name, description, price_cents, currency, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            description = EXCLUDED.description,
            price_cents = EXCLUDED.price_cents,
            currency = EXCLUDED.currency,
            updated_at = EXCLUDED.updated_at
        RETURNING id, name, description, price_cents, currency, created_at, updated_at
        "#,
        plan.id as PlanId,
        plan.name,
        plan.description,
        plan.price_cents,
        plan.currency,
        plan.created_at,
        plan.updated_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_plan_by_id<'e, E>(exec: E, id: PlanId) -> AppResult<Plan>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Plan,
        r#"
        SELECT id, name, description, price_cents, currency, created_at, updated_at
        FROM plans WHERE id = $1
        "#,
        id as PlanId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("plan {id} not found")))
}

pub async fn find_all_plans<'e, E>(exec: E) -> AppResult<Vec<Plan>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Plan,
        r#"
        SELECT id, name, description, price_cents, currency, created_at, updated_at
        FROM plans ORDER BY price_cents ASC
        "#,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn save_subscription<'e, E>(
    exec: E,
    subscription: &Subscription,
) -> AppResult<Subscription>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Subscription,
        r#"
        INSERT INTO subscriptions (id, tenant_id, plan_id, status, current_period_end,
                                    created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            plan_id = EXCLUDED.plan_id,
            status = EXCLUDED.status,
            current_period_end = EXCLUDED.current_period_end,
            updated_at = EXCLUDED.updated_at
        RETURNING id, tenant_id, plan_id, status, current_period_end, created_at, updated_at
        "#,
        subscription.id as SubscriptionId,
        subscription.tenant_id as TenantId,
        subscription.plan_id as PlanId,
        subscription.status,
        subscription.current_period_end,
        subscription.created_at,
        subscription.updated_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_subscription_by_tenant_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
) -> AppResult<Subscription>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Subscription,
        r#"
        SELECT id, tenant_id, plan_id, status, current_period_end, created_at, updated_at
        FROM subscriptions WHERE tenant_id = $1
        "#,
        tenant_id as TenantId,
    )
    .fetch_optional(exec)
    .await
    .map_err(AppError::from_sqlx_classified)?
    .ok_or_else(|| AppError::NotFound(format!("subscription for tenant {tenant_id} not found")))
}

pub async fn save_entitlement<'e, E>(exec: E, entitlement: &Entitlement) -> AppResult<Entitlement>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Entitlement,
        r#"
        INSERT INTO entitlements (id, tenant_id, key, value, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (tenant_id, key) DO UPDATE SET
            value = EXCLUDED.value,
            updated_at = EXCLUDED.updated_at
        RETURNING id, tenant_id, key, value, created_at, updated_at
        "#,
        entitlement.id as EntitlementId,
        entitlement.tenant_id as TenantId,
        entitlement.key,
        entitlement.value,
        entitlement.created_at,
        entitlement.updated_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_entitlements_by_tenant_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
) -> AppResult<Vec<Entitlement>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        Entitlement,
        r#"
        SELECT id, tenant_id, key, value, created_at, updated_at
        FROM entitlements WHERE tenant_id = $1
        ORDER BY key ASC
        "#,
        tenant_id as TenantId,
    )
    .fetch_all(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

/// Append-only: no update or delete function exists for this table by
/// design (§3 — billing audit log entries are immutable).
pub async fn append_audit_log<'e, E>(
    exec: E,
    entry: &BillingAuditLog,
) -> AppResult<BillingAuditLog>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as!(
        BillingAuditLog,
        r#"
        INSERT INTO billing_audit_logs (id, tenant_id, action, detail, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, tenant_id, action, detail, created_at
        "#,
        entry.id as BillingAuditLogId,
        entry.tenant_id as Option<TenantId>,
        entry.action,
        entry.detail,
        entry.created_at,
    )
    .fetch_one(exec)
    .await
    .map_err(AppError::from_sqlx_classified)
}

pub async fn find_audit_log_by_tenant_id<'e, E>(
    exec: E,
    tenant_id: TenantId,
    params: &PaginationParams,
) -> AppResult<Vec<BillingAuditLog>>
where
    E: PgExecutor<'e>,
{
    let (limit, offset) = super::pagination::limit_offset(params);
    sqlx::query_as!(
        BillingAuditLog,
        r#"
        SELECT id, tenant_id, action, detail, created_at
        FROM billing_audit_logs
        WHERE tenant_id = $1
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
