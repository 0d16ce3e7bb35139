//! Auth types shared across Courier services.
//!
//! Authentication happens at the gateway; services only read the identity it injects.

pub mod identity;

/// Header carrying the authenticated account id (UUID).
pub const USER_ID_HEADER: &str = "x-courier-user-id";
/// Header carrying the account role as a `u8`.
pub const USER_ROLE_HEADER: &str = "x-courier-user-role";
