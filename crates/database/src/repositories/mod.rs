//! Repository implementations for data access.
//!
//! One submodule per aggregate-root family. Every persistence operation is
//! a free function generic over `E: sqlx::PgExecutor<'_>` rather than a
//! method on a struct holding a `PgPool` — the executor parameter IS the
//! scope from `spec.md` §4.1/§9: pass `db.pool()` for a call outside a unit
//! of work, or the `&mut Transaction` a `DatabaseManager::with_tx` closure
//! receives (reborrowed with `&mut *tx`) to enlist in that transaction. A
//! repository function can never accidentally read the pool while a
//! transaction for its caller is live, because it never holds a pool
//! reference of its own.
//!
//! Every tenant-owned entity's functions take `tenant_id` right after the
//! executor, per the repository contract in §4.2. `find_by_id`-shaped
//! functions return `AppResult<T>` and surface a miss as `AppError::NotFound`
//! — never `Ok(None)` — including the `find_by_display_name` family, which
//! the source left inconsistent (§9 open question ii); this rewrite unifies
//! all of them on `NotFound`.

pub mod admin;
pub mod announcement;
pub mod attendance;
pub mod billing;
pub mod calendar;
pub mod event;
pub mod group;
pub mod import_job;
pub mod manager_permissions;
pub mod member;
pub mod schedule;
pub mod system_setting;
pub mod tenant;
pub mod tokens;
pub mod tutorial;

pub(crate) mod pagination {
    /// Clamp caller-supplied pagination the way every `find_by_tenant_id`
    /// query in this module applies it: `LIMIT`/`OFFSET` derived from
    /// `shared::PaginationParams`, defaulting and bounding exactly like the
    /// teacher's handlers did for `find_by_tenant`.
    pub fn limit_offset(params: &shared::PaginationParams) -> (i64, i64) {
        let limit = params
            .limit
            .unwrap_or(shared::constants::DEFAULT_PAGE_SIZE)
            .min(shared::constants::MAX_PAGE_SIZE) as i64;
        let offset = params.offset.unwrap_or(0) as i64;
        (limit, offset)
    }
}
