//! Multi-repository use-cases, each a single `with_tx` unit of work.

use chrono::Utc;
use database::{
    models::{Admin, AdminId, Tenant, TenantId},
    repositories, DatabaseManager,
};
use shared::{utils::hash_password, AppError, AppResult};

/// Redeems an invitation and creates the admin it names, atomically: if
/// admin creation fails (e.g. the invitation's email collides with an
/// already-live admin), the invitation's `accepted_at` stamp is rolled back
/// too, so a failed acceptance leaves the invitation redeemable again
/// (`spec.md` §4.5).
pub async fn accept_invitation(
    db: &DatabaseManager,
    tenant_id: TenantId,
    raw_token: &str,
    display_name: String,
    password: &str,
) -> AppResult<Admin> {
    let password_hash = hash_password(password)?;

    db.with_tx(move |tx| {
        Box::pin(async move {
            let invitation =
                repositories::tokens::invitation::redeem(tx, tenant_id, raw_token).await?;

            let now = Utc::now();
            let admin = Admin {
                id: AdminId::new(),
                tenant_id,
                email: invitation.email,
                password_hash,
                display_name,
                role: invitation.role,
                is_active: true,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };

            repositories::admin::save(&mut **tx, &admin).await
        })
    })
    .await
}

/// Redeems a license key on behalf of `tenant_id` and flips the tenant
/// active, atomically: a key that fails to redeem (already used, expired,
/// revoked) never activates a tenant, and a tenant save failure leaves the
/// key unredeemed (`spec.md` §4.5, §4.1).
pub async fn redeem_license_key_and_activate_tenant(
    db: &DatabaseManager,
    tenant_id: TenantId,
    raw_key: &str,
) -> AppResult<Tenant> {
    db.with_tx(move |tx| {
        Box::pin(async move {
            repositories::tokens::license_key::redeem(tx, raw_key, tenant_id).await?;

            let tenant = repositories::tenant::find_by_id(&mut **tx, tenant_id).await?;
            if tenant.is_active {
                return Err(AppError::Conflict("tenant is already active".into()));
            }

            let activated = Tenant {
                is_active: true,
                updated_at: Utc::now(),
                ..tenant
            };
            repositories::tenant::save(&mut **tx, &activated).await
        })
    })
    .await
}

/// Redeems a password reset token and sets the admin's new password hash,
/// atomically. Per `spec.md` §4.5's `InvalidateAllByAdminID`, every other
/// outstanding reset token for the same admin is marked used in the same
/// transaction, so an older, unredeemed reset link can't be replayed after
/// a newer one succeeds.
pub async fn reset_password(
    db: &DatabaseManager,
    raw_token: &str,
    new_password: &str,
) -> AppResult<Admin> {
    let password_hash = hash_password(new_password)?;

    db.with_tx(move |tx| {
        Box::pin(async move {
            let token = repositories::tokens::password_reset::redeem(tx, raw_token).await?;

            let now = Utc::now();
            repositories::tokens::password_reset::invalidate_all_by_admin_id(
                &mut **tx,
                token.admin_id,
                now,
            )
            .await?;

            let admin = repositories::admin::find_by_id_any_tenant(&mut **tx, token.admin_id).await?;
            let updated = Admin {
                password_hash,
                updated_at: now,
                ..admin
            };
            repositories::admin::save(&mut **tx, &updated).await
        })
    })
    .await
}
