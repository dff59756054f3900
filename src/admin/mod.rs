/// Admin Operations
///
/// Handles administrative functions including the account directory,
/// registration lifecycle decisions, dispute resolution, and the
/// append-only audit trail behind all of them.

pub mod audit;
pub mod directory;
pub mod disputes;
pub mod lifecycle;

pub use audit::AuditLog;
pub use directory::AccountDirectory;
pub use disputes::DisputeResolver;
pub use lifecycle::LifecycleEngine;
