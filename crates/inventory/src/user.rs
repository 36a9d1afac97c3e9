//! Acting-user port.

use watchstock_core::UserId;

/// Resolves the user on whose behalf the current operation runs.
pub trait CurrentUser: Send + Sync {
    /// `None` when unauthenticated (jobs, console, tests).
    fn id(&self) -> Option<UserId>;

    fn is_authenticated(&self) -> bool {
        self.id().is_some()
    }
}

impl<U> CurrentUser for std::sync::Arc<U>
where
    U: CurrentUser + ?Sized,
{
    fn id(&self) -> Option<UserId> {
        (**self).id()
    }
}
