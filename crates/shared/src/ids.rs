//! Opaque, lexically-sortable entity identifiers.
//!
//! Every aggregate root is identified by a ULID (Crockford base32, 26
//! characters, millisecond-resolution timestamp prefix) rather than a plain
//! UUID: ordering by string equals ordering by creation time, and the type
//! system keeps a `MemberId` from being passed where an `EventId` is
//! expected. IDs are generated in application code (never `DEFAULT
//! gen_random_uuid()` at the SQL side) and stored as `CHAR(26)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type};
use ulid::Ulid;

use crate::errors::{AppError, AppResult};

/// Defines a newtype wrapper over [`ulid::Ulid`] with the full
/// parse/format/SQL round-trip every entity identifier needs.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Mint a fresh, time-ordered identifier.
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            pub fn as_ulid(&self) -> Ulid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> AppResult<Self> {
                Ulid::from_string(s)
                    .map($name)
                    .map_err(|e| AppError::Invalid(format!("malformed {}: {}", stringify!($name), e)))
            }
        }

        impl Type<Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as Type<Postgres>>::type_info()
            }
        }

        impl<'q> Encode<'q, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
                <String as Encode<Postgres>>::encode(self.0.to_string(), buf)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
                let s = <String as Decode<Postgres>>::decode(value)?;
                Ok($name(Ulid::from_string(&s)?))
            }
        }
    };
}

opaque_id!(
    /// Root of every scoping hierarchy.
    TenantId
);
opaque_id!(AdminId);
opaque_id!(MemberId);
opaque_id!(RoleId);
opaque_id!(RoleGroupId);
opaque_id!(MemberGroupId);
opaque_id!(EventId);
opaque_id!(BusinessDayId);
opaque_id!(ShiftSlotId);
opaque_id!(ShiftSlotTemplateId);
opaque_id!(ShiftSlotTemplateItemId);
opaque_id!(AssignmentId);
opaque_id!(CollectionId);
opaque_id!(TargetDateId);
opaque_id!(CollectionGroupAssignmentId);
opaque_id!(CollectionRoleAssignmentId);
opaque_id!(AttendanceResponseId);
opaque_id!(ScheduleId);
opaque_id!(CandidateId);
opaque_id!(ScheduleResponseId);
opaque_id!(CalendarId);
opaque_id!(CalendarEntryId);
opaque_id!(AnnouncementId);
opaque_id!(AnnouncementReadId);
opaque_id!(TutorialId);
opaque_id!(InvitationId);
opaque_id!(PasswordResetTokenId);
opaque_id!(LicenseKeyId);
opaque_id!(SubscriptionId);
opaque_id!(EntitlementId);
opaque_id!(PlanId);
opaque_id!(ImportJobId);
opaque_id!(ImportJobLogId);
opaque_id!(BillingAuditLogId);
opaque_id!(SystemSettingId);
opaque_id!(ManagerPermissionsId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_string() {
        let id = TenantId::new();
        let parsed: TenantId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_malformed_strings() {
        let err = TenantId::from_str("not-a-ulid").unwrap_err();
        assert!(matches!(err, AppError::Invalid(_)));
    }

    #[test]
    fn newer_ids_sort_after_older_ones() {
        let first = TenantId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = TenantId::new();
        assert!(first.to_string() < second.to_string());
    }
}
