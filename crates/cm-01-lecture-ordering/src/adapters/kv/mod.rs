//! Key-value backends and the adapters built on them.

mod blocking;
pub mod file;
pub mod item_store;
pub mod journal;
pub mod memory;

pub use file::FileBackedKVStore;
pub use item_store::KvItemStore;
pub use journal::KvMoveJournal;
pub use memory::InMemoryKVStore;
