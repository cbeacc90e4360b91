//! Record store abstraction and factory

pub mod factory;
pub mod traits;

pub use factory::create_record_store;
pub use traits::{ChangeKind, CollectionEvent, RecordStore, RecordSubscription};
