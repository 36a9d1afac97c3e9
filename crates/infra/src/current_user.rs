//! Acting-user providers.

use watchstock_core::UserId;
use watchstock_inventory::CurrentUser;

/// A fixed, authenticated user (request-scoped in a host application).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StaticUser(pub UserId);

impl CurrentUser for StaticUser {
    fn id(&self) -> Option<UserId> {
        Some(self.0)
    }
}

/// No authenticated user (console commands, background jobs).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Anonymous;

impl CurrentUser for Anonymous {
    fn id(&self) -> Option<UserId> {
        None
    }
}
