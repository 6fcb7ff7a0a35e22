//! Database models and entities.
//!
//! One struct per aggregate root (or owned child) named in the persistence
//! core's data model, plus the small closed enumerations ("target-type,
//! response-type, status, role-name, license-status") that round-trip
//! through a single parser/stringifier and reject unknown strings as
//! `AppError::Invalid` at reconstruction time, never silently defaulting.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{AppError, Entity, MultiTenant, SoftDelete};
use sqlx::FromRow;

pub use shared::ids::*;

/// Declares a closed, finite string enumeration: a Postgres-native enum on
/// the wire (the `CREATE TYPE ... AS ENUM` counterpart lives in the
/// migrations) and a manual `FromStr`/`Display` pair for the places this
/// system re-parses the tag from plain text (CSV import rows, config).
/// Unknown strings are rejected, never coerced to a default variant.
macro_rules! closed_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
        #[serde(rename_all = "snake_case")]
        #[sqlx(type_name = "text", rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    other => Err(AppError::Invalid(format!(
                        "unknown {}: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

closed_enum!(AdminRole {
    Owner => "owner",
    Manager => "manager",
    Viewer => "viewer",
});

closed_enum!(LicenseKeyStatus {
    Unused => "unused",
    Used => "used",
    Revoked => "revoked",
});

closed_enum!(AssignmentStatus {
    Confirmed => "confirmed",
    Cancelled => "cancelled",
});

closed_enum!(AttendanceCollectionStatus {
    Open => "open",
    Closed => "closed",
});

closed_enum!(DateScheduleStatus {
    Open => "open",
    Decided => "decided",
    Closed => "closed",
});

closed_enum!(ImportJobStatus {
    Pending => "pending",
    Processing => "processing",
    Completed => "completed",
    Failed => "failed",
});

closed_enum!(RecurrenceType {
    None => "none",
    Weekly => "weekly",
    Monthly => "monthly",
    Custom => "custom",
});

closed_enum!(OccurrenceType {
    Scheduled => "scheduled",
    Adhoc => "adhoc",
});

/// Shared by `AttendanceResponse` and `DateScheduleResponse`.
closed_enum!(ResponseValue {
    Yes => "yes",
    No => "no",
    Maybe => "maybe",
});

macro_rules! impl_entity {
    ($ty:ty, $id_ty:ty) => {
        impl Entity for $ty {
            type Id = $id_ty;

            fn id(&self) -> &Self::Id {
                &self.id
            }

            fn created_at(&self) -> &DateTime<Utc> {
                &self.created_at
            }

            fn updated_at(&self) -> &DateTime<Utc> {
                &self.updated_at
            }
        }
    };
}

macro_rules! impl_multi_tenant {
    ($ty:ty) => {
        impl MultiTenant for $ty {
            fn tenant_id(&self) -> &TenantId {
                &self.tenant_id
            }
        }
    };
}

macro_rules! impl_soft_delete {
    ($ty:ty) => {
        impl SoftDelete for $ty {
            fn deleted_at(&self) -> &Option<DateTime<Utc>> {
                &self.deleted_at
            }
        }
    };
}

/// Root of every scoping hierarchy. Never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub timezone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Tenant, TenantId);
impl_soft_delete!(Tenant);

/// Unique `(tenant_id, email)` among non-soft-deleted rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: AdminId,
    pub tenant_id: TenantId,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Admin, AdminId);
impl_multi_tenant!(Admin);
impl_soft_delete!(Admin);

/// Unique `(tenant_id, discord_user_id)` and `(tenant_id, email)` among live rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: MemberId,
    pub tenant_id: TenantId,
    pub display_name: String,
    pub discord_user_id: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Member, MemberId);
impl_multi_tenant!(Member);
impl_soft_delete!(Member);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: RoleId,
    pub tenant_id: TenantId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Role, RoleId);
impl_multi_tenant!(Role);
impl_soft_delete!(Role);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleGroup {
    pub id: RoleGroupId,
    pub tenant_id: TenantId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(RoleGroup, RoleGroupId);
impl_multi_tenant!(RoleGroup);
impl_soft_delete!(RoleGroup);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberGroup {
    pub id: MemberGroupId,
    pub tenant_id: TenantId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(MemberGroup, MemberGroupId);
impl_multi_tenant!(MemberGroup);
impl_soft_delete!(MemberGroup);

/// Tenant-scoped many-to-many association rows (`spec.md` §4.3). These are
/// hard-deleted (no `deleted_at`) and have no independent lifecycle outside
/// their `SetX`/`AssignX`/`RemoveX` free functions in `repositories::group`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberGroupMembership {
    pub member_id: MemberId,
    pub group_id: MemberGroupId,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberRoleAssignment {
    pub member_id: MemberId,
    pub role_id: RoleId,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleGroupMembership {
    pub role_id: RoleId,
    pub role_group_id: RoleGroupId,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventGroupAssignment {
    pub event_id: EventId,
    pub member_group_id: MemberGroupId,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRoleGroupAssignment {
    pub event_id: EventId,
    pub role_group_id: RoleGroupId,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalendarEventLink {
    pub calendar_id: CalendarId,
    pub event_id: EventId,
}

/// `deleted_at` is carried per the §6 schema table and its expected
/// `(tenant_id, deleted_at, created_at DESC)` index, even though the §3
/// narrative groups events under "hard-deletes" alongside shift slots and
/// assignments — see `DESIGN.md` for why soft-delete wins that conflict.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: EventId,
    pub tenant_id: TenantId,
    pub event_name: String,
    pub event_type: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub recurrence_type: RecurrenceType,
    pub recurrence_start_date: Option<NaiveDate>,
    pub recurrence_day_of_week: Option<i16>,
    pub default_start_time: Option<NaiveTime>,
    pub default_end_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Event, EventId);
impl_multi_tenant!(Event);
impl_soft_delete!(Event);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventBusinessDay {
    pub id: BusinessDayId,
    pub tenant_id: TenantId,
    pub event_id: EventId,
    pub target_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub occurrence_type: OccurrenceType,
    pub recurring_pattern_id: Option<String>,
    pub is_active: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(EventBusinessDay, BusinessDayId);
impl_multi_tenant!(EventBusinessDay);
impl_soft_delete!(EventBusinessDay);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShiftSlot {
    pub id: ShiftSlotId,
    pub tenant_id: TenantId,
    pub business_day_id: BusinessDayId,
    pub instance_id: Option<String>,
    pub slot_name: String,
    pub instance_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub required_count: i32,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(ShiftSlot, ShiftSlotId);
impl_multi_tenant!(ShiftSlot);
impl_soft_delete!(ShiftSlot);

/// Template owns its item list; `save` replaces items atomically (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShiftSlotTemplate {
    pub id: ShiftSlotTemplateId,
    pub tenant_id: TenantId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(ShiftSlotTemplate, ShiftSlotTemplateId);
impl_multi_tenant!(ShiftSlotTemplate);
impl_soft_delete!(ShiftSlotTemplate);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShiftSlotTemplateItem {
    pub id: ShiftSlotTemplateItemId,
    pub template_id: ShiftSlotTemplateId,
    pub slot_name: String,
    pub instance_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub required_count: i32,
    pub priority: i32,
    pub display_order: i32,
}

/// Unique live `(slot_id, member_id)` when `assignment_status = confirmed`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShiftAssignment {
    pub id: AssignmentId,
    pub tenant_id: TenantId,
    pub plan_id: Option<String>,
    pub slot_id: ShiftSlotId,
    pub member_id: MemberId,
    pub assignment_status: AssignmentStatus,
    pub assignment_method: String,
    pub is_outside_preference: bool,
    pub assigned_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(ShiftAssignment, AssignmentId);
impl_multi_tenant!(ShiftAssignment);
impl_soft_delete!(ShiftAssignment);

/// `public_token` unique; owns `TargetDate`, `CollectionGroupAssignment`,
/// `CollectionRoleAssignment` as replace-on-save children (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceCollection {
    pub id: CollectionId,
    pub tenant_id: TenantId,
    pub name: String,
    pub public_token: String,
    pub status: AttendanceCollectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(AttendanceCollection, CollectionId);
impl_multi_tenant!(AttendanceCollection);
impl_soft_delete!(AttendanceCollection);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceTargetDate {
    pub id: TargetDateId,
    pub collection_id: CollectionId,
    pub target_date: NaiveDate,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CollectionGroupAssignment {
    pub id: CollectionGroupAssignmentId,
    pub collection_id: CollectionId,
    pub member_group_id: MemberGroupId,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CollectionRoleAssignment {
    pub id: CollectionRoleAssignmentId,
    pub collection_id: CollectionId,
    pub role_id: RoleId,
}

/// Keyed by `(collection_id, member_id, target_date_id)` — the per-target-
/// date schema (§9 open question i), never the legacy two-column key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceResponse {
    pub id: AttendanceResponseId,
    pub tenant_id: TenantId,
    pub collection_id: CollectionId,
    pub member_id: MemberId,
    pub target_date_id: TargetDateId,
    pub response: ResponseValue,
    pub responded_at: DateTime<Utc>,
}

impl_multi_tenant!(AttendanceResponse);

/// `public_token` unique; owns `CandidateDate` as a replace-on-save child.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DateSchedule {
    pub id: ScheduleId,
    pub tenant_id: TenantId,
    pub name: String,
    pub public_token: String,
    pub status: DateScheduleStatus,
    pub decided_candidate_id: Option<CandidateId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(DateSchedule, ScheduleId);
impl_multi_tenant!(DateSchedule);
impl_soft_delete!(DateSchedule);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateDate {
    pub id: CandidateId,
    pub schedule_id: ScheduleId,
    pub candidate_date: NaiveDate,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DateScheduleResponse {
    pub id: ScheduleResponseId,
    pub tenant_id: TenantId,
    pub schedule_id: ScheduleId,
    pub member_id: MemberId,
    pub candidate_id: CandidateId,
    pub response: ResponseValue,
    pub responded_at: DateTime<Utc>,
}

impl_multi_tenant!(DateScheduleResponse);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Calendar {
    pub id: CalendarId,
    pub tenant_id: TenantId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Calendar, CalendarId);
impl_multi_tenant!(Calendar);
impl_soft_delete!(Calendar);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalendarEntry {
    pub id: CalendarEntryId,
    pub calendar_id: CalendarId,
    pub event_id: Option<EventId>,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(CalendarEntry, CalendarEntryId);
impl_soft_delete!(CalendarEntry);

/// `tenant_id IS NULL` ⇒ global, visible to every tenant's admins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub tenant_id: Option<TenantId>,
    pub title: String,
    pub body: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Announcement, AnnouncementId);
impl_soft_delete!(Announcement);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnnouncementRead {
    pub id: AnnouncementReadId,
    pub announcement_id: AnnouncementId,
    pub admin_id: AdminId,
    pub read_at: DateTime<Utc>,
}

/// Global, not tenant-scoped.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tutorial {
    pub id: TutorialId,
    pub title: String,
    pub body: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Tutorial, TutorialId);
impl_soft_delete!(Tutorial);

/// Single-use; `token` column stores only the hash, never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    pub id: InvitationId,
    pub tenant_id: TenantId,
    pub email: String,
    pub role: AdminRole,
    pub token_hash: String,
    pub created_by_admin_id: AdminId,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl_multi_tenant!(Invitation);

/// Single-use per token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PasswordResetToken {
    pub id: PasswordResetTokenId,
    pub admin_id: AdminId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Not tenant-owned at creation time; `used_tenant_id` is populated only
/// once the key transitions `unused -> used`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LicenseKey {
    pub id: LicenseKeyId,
    pub key_hash: String,
    pub status: LicenseKeyStatus,
    pub batch_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub memo: Option<String>,
    pub used_at: Option<DateTime<Utc>>,
    pub used_tenant_id: Option<TenantId>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub tenant_id: TenantId,
    pub plan_id: PlanId,
    pub status: String,
    pub current_period_end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_multi_tenant!(Subscription);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entitlement {
    pub id: EntitlementId,
    pub tenant_id: TenantId,
    pub key: String,
    pub value: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_multi_tenant!(Entitlement);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ImportJob {
    pub id: ImportJobId,
    pub tenant_id: TenantId,
    pub status: ImportJobStatus,
    pub source_filename: String,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub error_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl_multi_tenant!(ImportJob);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ImportJobLog {
    pub id: ImportJobLogId,
    pub import_job_id: ImportJobId,
    pub row_number: i32,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillingAuditLog {
    pub id: BillingAuditLogId,
    pub tenant_id: Option<TenantId>,
    pub action: String,
    pub detail: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Unique `(provider, event_id)`; the pair IS the primary key (§3, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WebhookEvent {
    pub provider: String,
    pub event_id: String,
    pub payload: Option<serde_json::Value>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SystemSetting {
    pub id: SystemSettingId,
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ManagerPermissions {
    pub id: ManagerPermissionsId,
    pub tenant_id: TenantId,
    pub admin_id: AdminId,
    pub permissions: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn closed_enum_round_trips_through_str() {
        for status in [LicenseKeyStatus::Unused, LicenseKeyStatus::Used, LicenseKeyStatus::Revoked] {
            let parsed = LicenseKeyStatus::from_str(status.as_str()).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn closed_enum_rejects_unknown_strings() {
        let err = LicenseKeyStatus::from_str("expired").unwrap_err();
        assert!(matches!(err, AppError::Invalid(_)));
    }

    #[test]
    fn closed_enum_has_no_expired_variant() {
        // LicenseKeyStatus only ever holds `unused`/`used`/`revoked` (SPEC_FULL.md
        // §4.4); expiry is a dynamic check against `expires_at`, not a stored state.
        assert_eq!(LicenseKeyStatus::Unused.as_str(), "unused");
        assert_eq!(LicenseKeyStatus::Used.as_str(), "used");
        assert_eq!(LicenseKeyStatus::Revoked.as_str(), "revoked");
        assert!(LicenseKeyStatus::from_str("unused").is_ok());
        assert!(LicenseKeyStatus::from_str("used").is_ok());
        assert!(LicenseKeyStatus::from_str("revoked").is_ok());
    }

    #[test]
    fn import_job_status_display_matches_as_str() {
        assert_eq!(ImportJobStatus::Processing.to_string(), "processing");
        assert_eq!(ImportJobStatus::Failed.as_str(), "failed");
    }
}

impl_multi_tenant!(ManagerPermissions);
