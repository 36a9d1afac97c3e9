//! Identity of persisted records.

use core::fmt::Debug;
use core::hash::Hash;

/// A record addressed by a stable, copyable id.
///
/// Stores key their tables by [`Entity::Id`].
pub trait Entity {
    type Id: Copy + Eq + Hash + Debug;

    fn id(&self) -> Self::Id;
}
