//! Adapters: concrete implementations of the outbound ports.

pub mod kv;
pub mod locks;
pub mod memory_store;

pub use kv::{FileBackedKVStore, InMemoryKVStore, KvItemStore, KvMoveJournal};
pub use locks::{HeldLocks, KeyedLocks};
pub use memory_store::InMemoryItemStore;
