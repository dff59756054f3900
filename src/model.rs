/// Marketplace document types shared across the console
use crate::error::{ConsoleError, ConsoleResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account roles on the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Employer,
    Worker,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Employer => "employer",
            AccountRole::Worker => "worker",
            AccountRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> ConsoleResult<Self> {
        match s.to_lowercase().as_str() {
            "employer" => Ok(AccountRole::Employer),
            "worker" => Ok(AccountRole::Worker),
            "admin" => Ok(AccountRole::Admin),
            _ => Err(ConsoleError::InvalidArgument(format!(
                "Invalid account role: {}",
                s
            ))),
        }
    }
}

/// Registration lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Freshly registered, awaiting review
    Pending,
    /// Cleared for the marketplace
    Approved,
    /// Registration refused
    Rejected,
    /// Removed from the marketplace after approval
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Approved => "approved",
            AccountStatus::Rejected => "rejected",
            AccountStatus::Suspended => "suspended",
        }
    }

    pub fn from_str(s: &str) -> ConsoleResult<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AccountStatus::Pending),
            "approved" => Ok(AccountStatus::Approved),
            "rejected" => Ok(AccountStatus::Rejected),
            "suspended" => Ok(AccountStatus::Suspended),
            _ => Err(ConsoleError::InvalidArgument(format!(
                "Invalid account status: {}",
                s
            ))),
        }
    }
}

/// CNIC photo references uploaded at registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CnicPhotos {
    pub front: String,
    pub back: String,
}

/// Profile block embedded in every account document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnic: Option<String>,
    #[serde(default)]
    pub cnic_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnic_photos: Option<CnicPhotos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Marketplace account (worker, employer, or admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub role: AccountRole,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    pub profile: Profile,
    pub status: AccountStatus,
    #[serde(default, with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Booking lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Every state, in the order analytics reports them
    pub fn all() -> [BookingStatus; 4] {
        [
            BookingStatus::Pending,
            BookingStatus::Accepted,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

/// Payment block embedded in a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub amount: f64,
    pub status: PaymentStatus,
}

/// Job site coordinates captured at booking time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
}

/// A job booked between an employer and a worker. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub worker_id: String,
    pub employer_id: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: Location,
    pub payment: Payment,
    #[serde(default, with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisputeKind {
    Payment,
    Service,
    Behavior,
    Other,
}

/// Dispute lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisputeStatus {
    Open,
    Investigating,
    Resolved,
    Closed,
}

impl DisputeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeStatus::Open => "open",
            DisputeStatus::Investigating => "investigating",
            DisputeStatus::Resolved => "resolved",
            DisputeStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> ConsoleResult<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(DisputeStatus::Open),
            "investigating" => Ok(DisputeStatus::Investigating),
            "resolved" => Ok(DisputeStatus::Resolved),
            "closed" => Ok(DisputeStatus::Closed),
            _ => Err(ConsoleError::InvalidArgument(format!(
                "Invalid dispute status: {}",
                s
            ))),
        }
    }
}

/// A user-filed dispute over a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    pub id: String,
    pub booking_id: String,
    pub reporter_id: String,
    pub reported_user_id: String,
    #[serde(rename = "type")]
    pub kind: DisputeKind,
    #[serde(default)]
    pub description: String,
    pub status: DisputeStatus,
    #[serde(default, with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, with = "lenient_datetime")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Administrative action kinds recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminActionKind {
    ApproveUser,
    RejectUser,
    SuspendUser,
    ResolveDispute,
    VerifyCnic,
}

impl AdminActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminActionKind::ApproveUser => "approve_user",
            AdminActionKind::RejectUser => "reject_user",
            AdminActionKind::SuspendUser => "suspend_user",
            AdminActionKind::ResolveDispute => "resolve_dispute",
            AdminActionKind::VerifyCnic => "verify_cnic",
        }
    }
}

/// One append-only audit trail entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAction {
    pub id: String,
    pub admin_id: String,
    pub target_user_id: String,
    pub action: AdminActionKind,
    #[serde(default)]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_id: Option<String>,
    #[serde(default, with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Headline numbers for the admin dashboard. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_workers: u64,
    pub total_employers: u64,
    pub pending_approvals: u64,
    pub active_bookings: u64,
    pub completed_bookings: u64,
    pub pending_disputes: u64,
    pub total_revenue: f64,
    pub monthly_revenue: f64,
}

/// RFC 3339 timestamps that degrade to `None` instead of failing the
/// whole document when the stored value is missing or malformed
pub mod lenient_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }
}
