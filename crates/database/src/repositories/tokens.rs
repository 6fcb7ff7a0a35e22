//! Single-use capability tokens: invitations, password resets, license
//! keys, and inbound webhook events. Redemption uses `SELECT ... FOR
//! UPDATE` row locking; webhook ingestion uses insert-conflict idempotency
//! instead, since provider event IDs are already unique (§4.5).

use shared::{hashing, AppError, AppResult};
use sqlx::PgExecutor;

use crate::models::{
    AdminId, AdminRole, Invitation, InvitationId, LicenseKey, LicenseKeyId, LicenseKeyStatus,
    PasswordResetToken, PasswordResetTokenId, TenantId, WebhookEvent,
};

pub mod invitation {
    use super::*;

    /// Upsert keyed on `id`. Per §9 open question (iii), a re-`save` on an
    /// existing invitation updates only `email`, `role`, and `accepted_at`
    /// — `expires_at` is set once at creation and never extended by a
    /// resend, so a stale invite can't be kept alive by re-sending it.
    pub async fn save<'e, E>(exec: E, invitation: &Invitation) -> AppResult<Invitation>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            Invitation,
            r#"
            INSERT INTO invitations (id, tenant_id, email, role, token_hash,
                                      created_by_admin_id, expires_at, accepted_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                role = EXCLUDED.role,
                accepted_at = EXCLUDED.accepted_at
            RETURNING id, tenant_id, email, role as "role: AdminRole", token_hash,
                      created_by_admin_id, expires_at, accepted_at, created_at
            "#,
            invitation.id as InvitationId,
            invitation.tenant_id as TenantId,
            invitation.email,
            invitation.role as AdminRole,
            invitation.token_hash,
            invitation.created_by_admin_id as AdminId,
            invitation.expires_at,
            invitation.accepted_at,
            invitation.created_at,
        )
        .fetch_one(exec)
        .await
        .map_err(AppError::from_sqlx_classified)
    }

    /// Redeems the invitation named by `raw_token`: locks the row, checks
    /// it is unexpired and unaccepted, then marks it accepted — all inside
    /// one transaction so a concurrent redemption attempt blocks on the
    /// lock rather than racing past the expiry/accepted check (§4.5).
    pub async fn redeem(
        tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
        tenant_id: TenantId,
        raw_token: &str,
    ) -> AppResult<Invitation> {
        let token_hash = hashing::hash_token(raw_token);

        let invitation = sqlx::query_as!(
            Invitation,
            r#"
            SELECT id, tenant_id, email, role as "role: AdminRole", token_hash,
                   created_by_admin_id, expires_at, accepted_at, created_at
            FROM invitations
            WHERE tenant_id = $1 AND token_hash = $2
            FOR UPDATE
            "#,
            tenant_id as TenantId,
            token_hash,
        )
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::from_sqlx_classified)?
        .ok_or_else(|| AppError::NotFound("invitation not found".into()))?;

        if invitation.accepted_at.is_some() {
            return Err(AppError::Conflict("invitation already accepted".into()));
        }
        if invitation.expires_at < chrono::Utc::now() {
            return Err(AppError::Conflict("invitation expired".into()));
        }

        let now = chrono::Utc::now();
        sqlx::query!(
            "UPDATE invitations SET accepted_at = $2 WHERE id = $1",
            invitation.id as InvitationId,
            now,
        )
        .execute(&mut **tx)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        Ok(Invitation {
            accepted_at: Some(now),
            ..invitation
        })
    }

    /// Storage-hygiene GC, not a correctness primitive (mirrors
    /// `webhook_event::delete_older_than`, §4.5): only unaccepted invitations
    /// past their expiry are removed, so an accepted invitation stays as a
    /// historical record.
    pub async fn delete_expired<'e, E>(exec: E, now: chrono::DateTime<chrono::Utc>) -> AppResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query!(
            "DELETE FROM invitations WHERE accepted_at IS NULL AND expires_at < $1",
            now,
        )
        .execute(exec)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        Ok(result.rows_affected())
    }
}

pub mod password_reset {
    use super::*;

    pub async fn save<'e, E>(exec: E, token: &PasswordResetToken) -> AppResult<PasswordResetToken>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            PasswordResetToken,
            r#"
            INSERT INTO password_reset_tokens (id, admin_id, token_hash, expires_at, used_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, admin_id, token_hash, expires_at, used_at, created_at
            "#,
            token.id as PasswordResetTokenId,
            token.admin_id as AdminId,
            token.token_hash,
            token.expires_at,
            token.used_at,
            token.created_at,
        )
        .fetch_one(exec)
        .await
        .map_err(AppError::from_sqlx_classified)
    }

    /// Redeems a reset token the same way `invitation::redeem` does:
    /// `FOR UPDATE` row lock, single-use check, mark used — never delete,
    /// so a re-presented token is rejected as already-used rather than
    /// falling through to `NotFound`. There is no `tenant_id` on this
    /// table (a password reset is scoped by `admin_id`, not the tenant
    /// directly), so the lookup is by hash alone.
    pub async fn redeem(
        tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
        raw_token: &str,
    ) -> AppResult<PasswordResetToken> {
        let token_hash = hashing::hash_token(raw_token);

        let token = sqlx::query_as!(
            PasswordResetToken,
            r#"
            SELECT id, admin_id, token_hash, expires_at, used_at, created_at
            FROM password_reset_tokens
            WHERE token_hash = $1
            FOR UPDATE
            "#,
            token_hash,
        )
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::from_sqlx_classified)?
        .ok_or_else(|| AppError::NotFound("password reset token not found".into()))?;

        if token.used_at.is_some() {
            return Err(AppError::Conflict(
                "password reset token already used".into(),
            ));
        }
        if token.expires_at < chrono::Utc::now() {
            return Err(AppError::Conflict("password reset token expired".into()));
        }

        let now = chrono::Utc::now();
        sqlx::query!(
            "UPDATE password_reset_tokens SET used_at = $2 WHERE id = $1",
            token.id as PasswordResetTokenId,
            now,
        )
        .execute(&mut **tx)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        Ok(PasswordResetToken {
            used_at: Some(now),
            ..token
        })
    }

    /// Storage-hygiene GC: unused reset tokens past their expiry carry no
    /// further value and are never redeemable again, so they are removed
    /// outright rather than flagged.
    pub async fn delete_expired<'e, E>(exec: E, now: chrono::DateTime<chrono::Utc>) -> AppResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query!(
            "DELETE FROM password_reset_tokens WHERE used_at IS NULL AND expires_at < $1",
            now,
        )
        .execute(exec)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        Ok(result.rows_affected())
    }

    /// `InvalidateAllByAdminID` (§4.5): marks every other outstanding reset
    /// token for `admin_id` used, so a successful reset can't be followed by
    /// someone redeeming an older token that was never revoked. Callers run
    /// this in the same transaction as `redeem`, after the redeemed token's
    /// own row is already locked and marked used.
    pub async fn invalidate_all_by_admin_id<'e, E>(
        exec: E,
        admin_id: AdminId,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query!(
            "UPDATE password_reset_tokens SET used_at = $2 WHERE admin_id = $1 AND used_at IS NULL",
            admin_id as AdminId,
            now,
        )
        .execute(exec)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        Ok(result.rows_affected())
    }
}

pub mod license_key {
    use super::*;

    pub async fn save<'e, E>(exec: E, key: &LicenseKey) -> AppResult<LicenseKey>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            LicenseKey,
            r#"
            INSERT INTO license_keys (id, key_hash, status, batch_id, expires_at, memo,
                                       used_at, used_tenant_id, revoked_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                memo = EXCLUDED.memo,
                used_at = EXCLUDED.used_at,
                used_tenant_id = EXCLUDED.used_tenant_id,
                revoked_at = EXCLUDED.revoked_at
            RETURNING id, key_hash, status as "status: LicenseKeyStatus", batch_id, expires_at,
                      memo, used_at, used_tenant_id, revoked_at, created_at
            "#,
            key.id as LicenseKeyId,
            key.key_hash,
            key.status as LicenseKeyStatus,
            key.batch_id,
            key.expires_at,
            key.memo,
            key.used_at,
            key.used_tenant_id as Option<TenantId>,
            key.revoked_at,
            key.created_at,
        )
        .fetch_one(exec)
        .await
        .map_err(AppError::from_sqlx_classified)
    }

    /// Redeems by the raw key text: locks the row behind the `(key_hash)`
    /// index (§6), rejects anything not `unused` or already expired/
    /// revoked, stamps the redeeming tenant, flips it to `used`.
    pub async fn redeem(
        tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
        raw_key: &str,
        tenant_id: TenantId,
    ) -> AppResult<LicenseKey> {
        let key_hash = hashing::hash_token(raw_key);

        let key = sqlx::query_as!(
            LicenseKey,
            r#"
            SELECT id, key_hash, status as "status: LicenseKeyStatus", batch_id, expires_at,
                   memo, used_at, used_tenant_id, revoked_at, created_at
            FROM license_keys
            WHERE key_hash = $1
            FOR UPDATE
            "#,
            key_hash,
        )
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::from_sqlx_classified)?
        .ok_or_else(|| AppError::NotFound("license key not found".into()))?;

        if !matches!(key.status, LicenseKeyStatus::Unused) {
            return Err(AppError::Conflict(format!(
                "license key is {}, not unused",
                key.status
            )));
        }
        if key.expires_at.is_some_and(|exp| exp < chrono::Utc::now()) {
            return Err(AppError::Conflict("license key expired".into()));
        }

        let now = chrono::Utc::now();
        sqlx::query!(
            r#"
            UPDATE license_keys
            SET status = 'used', used_at = $2, used_tenant_id = $3
            WHERE id = $1
            "#,
            key.id as LicenseKeyId,
            now,
            tenant_id as TenantId,
        )
        .execute(&mut **tx)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        Ok(LicenseKey {
            status: LicenseKeyStatus::Used,
            used_at: Some(now),
            used_tenant_id: Some(tenant_id),
            ..key
        })
    }

    /// Storage-hygiene GC: only `unused` keys past expiry are removed —
    /// `used`/`revoked` keys are kept as an audit trail of what a tenant
    /// redeemed or had revoked.
    pub async fn delete_expired<'e, E>(exec: E, now: chrono::DateTime<chrono::Utc>) -> AppResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query!(
            r#"
            DELETE FROM license_keys
            WHERE status = 'unused' AND expires_at IS NOT NULL AND expires_at < $1
            "#,
            now,
        )
        .execute(exec)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        Ok(result.rows_affected())
    }
}

pub mod webhook_event {
    use super::*;

    /// `TryInsert` idempotency (§4.5): the `(provider, event_id)` primary
    /// key makes redelivery of the same provider event a harmless
    /// `ON CONFLICT DO NOTHING` rather than a row-lock dance — there is no
    /// mutable state on this row to race over.
    pub async fn try_insert<'e, E>(exec: E, event: &WebhookEvent) -> AppResult<bool>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query!(
            r#"
            INSERT INTO webhook_events (provider, event_id, payload, received_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (provider, event_id) DO NOTHING
            "#,
            event.provider,
            event.event_id,
            event.payload,
            event.received_at,
        )
        .execute(exec)
        .await
        .map_err(AppError::from_sqlx_classified)?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn find_by_provider_event_id<'e, E>(
        exec: E,
        provider: &str,
        event_id: &str,
    ) -> AppResult<WebhookEvent>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as!(
            WebhookEvent,
            r#"
            SELECT provider, event_id, payload, received_at
            FROM webhook_events WHERE provider = $1 AND event_id = $2
            "#,
            provider,
            event_id,
        )
        .fetch_optional(exec)
        .await
        .map_err(AppError::from_sqlx_classified)?
        .ok_or_else(|| {
            AppError::NotFound(format!("webhook event {provider}/{event_id} not found"))
        })
    }

    /// `DeleteOlderThan` (§4.5): scheduled GC, not a correctness primitive —
    /// the idempotency key is `(provider, event_id)`, so a row is only ever
    /// needed to de-duplicate a redelivery that happens before this runs.
    pub async fn delete_older_than<'e, E>(
        exec: E,
        before: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query!("DELETE FROM webhook_events WHERE received_at < $1", before)
            .execute(exec)
            .await
            .map_err(AppError::from_sqlx_classified)?;

        Ok(result.rows_affected())
    }
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

    fn make_license_key(raw_key: &str) -> LicenseKey {
        let now = chrono::Utc::now();
        LicenseKey {
            id: LicenseKeyId::new(),
            key_hash: hashing::hash_token(raw_key),
            status: LicenseKeyStatus::Unused,
            batch_id: None,
            expires_at: None,
            memo: None,
            used_at: None,
            used_tenant_id: None,
            revoked_at: None,
            created_at: now,
        }
    }

    /// §8 scenario (b): two tenants race to redeem the same license key.
    /// The `FOR UPDATE` lock in `license_key::redeem` serializes the pair,
    /// so exactly one wins and the other observes the key already `used`
    /// rather than both succeeding.
    #[sqlx::test]
    async fn concurrent_redemption_only_one_winner(pool: PgPool) -> sqlx::Result<()> {
        let tenant_a = make_tenant();
        let tenant_b = make_tenant();
        crate::repositories::tenant::save(&pool, &tenant_a)
            .await
            .unwrap();
        crate::repositories::tenant::save(&pool, &tenant_b)
            .await
            .unwrap();

        let raw_key = "race-test-license-key";
        license_key::save(&pool, &make_license_key(raw_key))
            .await
            .unwrap();

        let pool_a = pool.clone();
        let pool_b = pool.clone();
        let key_a = raw_key.to_string();
        let key_b = raw_key.to_string();

        let redeem = |p: PgPool, key: String, tenant_id: TenantId| async move {
            let mut tx = p.begin().await.unwrap();
            let result = license_key::redeem(&mut tx, &key, tenant_id).await;
            match result {
                Ok(_) => {
                    tx.commit().await.unwrap();
                    Ok(())
                }
                Err(e) => {
                    tx.rollback().await.unwrap();
                    Err(e)
                }
            }
        };

        let (result_a, result_b) = tokio::join!(
            redeem(pool_a, key_a, tenant_a.id),
            redeem(pool_b, key_b, tenant_b.id),
        );

        let outcomes = [result_a.is_ok(), result_b.is_ok()];
        assert_eq!(
            outcomes.iter().filter(|ok| **ok).count(),
            1,
            "exactly one of the two racing redemptions must succeed"
        );

        let loser = if result_a.is_ok() { result_b } else { result_a };
        assert!(matches!(loser.unwrap_err(), AppError::Conflict(_)));

        let saved = license_key::save(&pool, &make_license_key("unused-check")).await;
        assert!(saved.is_ok());

        Ok(())
    }
}
