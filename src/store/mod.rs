//! Document stores - whole-document load and save.
//!
//! A [`DocumentStore`] persists the entire [`Document`](crate::Document) as
//! one unit. Reads never fail from the caller's point of view: an absent,
//! unreadable or malformed document loads as empty and the failure is logged.
//! Saves replace the persisted document atomically and report any failure.
//!
//! [`LockedStore`] wraps a store and serializes every load-mutate-save cycle
//! behind a single mutex so concurrent writers cannot lose each other's
//! updates.

mod file;
mod in_memory;
mod locked;
mod store;

pub use file::FileStore;
pub use in_memory::InMemoryStore;
pub use locked::LockedStore;
pub use store::DocumentStore;
