//! Mood state synchronization.
//!
//! Each signed-in viewer gets one [`MoodSynchronizer`]: a task that owns a
//! [`Roster`] of the viewer's connections, consumes the profile change feed,
//! filters every event through a [`VisibilityGate`] before it can touch the
//! roster, and pushes ordered snapshots plus urgent alerts to its owner.
//!
//! The roster is mutated from exactly one place -- the synchronizer's event
//! loop -- so events are applied strictly in arrival order with no lost
//! updates.

pub mod roster;
pub mod synchronizer;

pub use roster::{Roster, RosterEntry};
pub use synchronizer::{MoodSynchronizer, SyncUpdate, VisibilityGate};
