//! Operator accounts, roles and the capability check.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operator role.
///
/// Wire format: `u8` (0 = Client, 1 = Manager, 2 = Admin), as injected by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Client = 0,
    Manager = 1,
    Admin = 2,
}

impl AccountRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Client),
            1 => Some(Self::Manager),
            2 => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Something an operator may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create records and operate on records the account owns.
    ManageOwn,
    /// Read every account's records.
    ViewAll,
    /// Delete any account's records.
    EditAny,
    /// Deactivate or reactivate any mailing.
    ToggleAnyMailing,
    /// Block or unblock any recipient.
    BlockAnyRecipient,
    /// Trigger a dispatch sweep by hand.
    RunSweep,
}

/// Outcome of a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }
}

/// Capability check: may `role` perform `action` at all?
///
/// Managers supervise (read everything, toggle mailings, block recipients) but do not
/// author mailings of their own.
pub fn check(role: AccountRole, action: Action) -> Access {
    let allowed = match role {
        AccountRole::Admin => true,
        AccountRole::Manager => matches!(
            action,
            Action::ViewAll | Action::ToggleAnyMailing | Action::BlockAnyRecipient
        ),
        AccountRole::Client => action == Action::ManageOwn,
    };
    if allowed { Access::Allow } else { Access::Deny }
}

/// The authenticated operator performing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub account_id: Uuid,
    pub role: AccountRole,
}

impl Actor {
    pub fn new(account_id: Uuid, role: AccountRole) -> Self {
        Self { account_id, role }
    }

    pub fn can(&self, action: Action) -> bool {
        check(self.role, action).is_allowed()
    }

    /// Whether this actor may act on a record owned by `owner` when the non-owner
    /// path requires `any`.
    pub fn can_act_on(&self, owner: Option<Uuid>, any: Action) -> bool {
        self.can(any) || (self.can(Action::ManageOwn) && owner == Some(self.account_id))
    }

    /// Owner filter for list queries: `None` means every owner is visible.
    pub fn owner_scope(&self) -> Option<Uuid> {
        if self.can(Action::ViewAll) {
            None
        } else {
            Some(self.account_id)
        }
    }
}
